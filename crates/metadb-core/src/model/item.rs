use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::Mbid;

/// The optional data a scraper attaches to an item it has processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ItemPayload {
    #[default]
    None,

    /// Stored exactly as given.
    Text(String),

    /// Stored as JSON text.
    Json(serde_json::Value),
}

impl ItemPayload {
    /// Build a JSON payload from any serializable value.
    ///
    /// `chrono` timestamps serialize as ISO-8601 strings, so structured
    /// payloads carrying dates need no special handling.
    pub fn structured<T: Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Whether there is nothing worth storing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(text) => text.is_empty(),
            Self::Json(serde_json::Value::Null) => true,
            Self::Json(serde_json::Value::Object(map)) => map.is_empty(),
            Self::Json(serde_json::Value::Array(items)) => items.is_empty(),
            Self::Json(serde_json::Value::String(s)) => s.is_empty(),
            Self::Json(_) => false,
        }
    }
}

impl From<String> for ItemPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for ItemPayload {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Turns a payload into the text stored alongside an item.
pub trait PayloadEncoder {
    /// Returns `None` when the payload should not be stored at all.
    fn encode(&self, payload: &ItemPayload) -> crate::Result<Option<String>>;
}

/// Default encoder: text is kept verbatim, structured data becomes JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl PayloadEncoder for JsonEncoder {
    fn encode(&self, payload: &ItemPayload) -> crate::Result<Option<String>> {
        if payload.is_empty() {
            return Ok(None);
        }
        match payload {
            ItemPayload::None => Ok(None),
            ItemPayload::Text(text) => Ok(Some(text.clone())),
            ItemPayload::Json(value) => Ok(Some(serde_json::to_string(value)?)),
        }
    }
}

/// An item receipt as read back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: i64,
    pub mbid: Mbid,
    pub added: DateTime<Utc>,

    /// The encoded payload, if one was stored.
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Serialize)]
    struct Fetched {
        url: &'static str,
        fetched_at: DateTime<Utc>,
    }

    #[test]
    fn test_empty_payloads() {
        assert!(ItemPayload::None.is_empty());
        assert!(ItemPayload::Text(String::new()).is_empty());
        assert!(ItemPayload::Json(json!({})).is_empty());
        assert!(ItemPayload::Json(json!([])).is_empty());
        assert!(!ItemPayload::Json(json!({"a": 1})).is_empty());
        assert!(!ItemPayload::Json(json!(0)).is_empty());
    }

    #[test]
    fn test_json_encoder_skips_empty() {
        assert_eq!(JsonEncoder.encode(&ItemPayload::None).unwrap(), None);
        assert_eq!(JsonEncoder.encode(&ItemPayload::Json(json!({}))).unwrap(), None);
    }

    #[test]
    fn test_json_encoder_keeps_text() {
        let encoded = JsonEncoder
            .encode(&ItemPayload::from("<html/>".to_string()))
            .unwrap();
        assert_eq!(encoded.as_deref(), Some("<html/>"));
    }

    #[test]
    fn test_structured_payload_renders_iso_datetimes() {
        let fetched = Fetched {
            url: "https://example.org/r/1",
            fetched_at: Utc.with_ymd_and_hms(2019, 3, 1, 12, 30, 0).unwrap(),
        };
        let payload = ItemPayload::structured(&fetched).unwrap();
        let encoded = JsonEncoder.encode(&payload).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["fetched_at"], "2019-03-01T12:30:00Z");
        assert_eq!(value["url"], "https://example.org/r/1");
    }
}
