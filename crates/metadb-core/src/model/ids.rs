use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// A MusicBrainz identifier for a recording or release group.
///
/// Stored as lowercase hyphenated text, so two spellings of the same UUID
/// always land on the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mbid(Uuid);

impl Mbid {
    /// Parse an MBID, rejecting anything that is not a UUID.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| Error::InvalidArgument(format!("invalid MBID {s:?}: {e}")))
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for Mbid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Mbid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl AsRef<Uuid> for Mbid {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl ToSql for Mbid {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Mbid {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Uuid::parse_str(text)
            .map(Self)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MBID: &str = "8f3471b5-7e6a-48da-86a9-c1c07a0f47ae";

    #[test]
    fn test_mbid_parse() {
        let mbid = Mbid::parse(MBID).unwrap();
        assert_eq!(mbid.to_string(), MBID);
    }

    #[test]
    fn test_mbid_parse_normalises_case() {
        let upper = Mbid::parse(&MBID.to_uppercase()).unwrap();
        assert_eq!(upper.to_string(), MBID);
    }

    #[test]
    fn test_mbid_parse_rejects_garbage() {
        let err = Mbid::parse("not-an-mbid").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_mbid_serializes_as_string() {
        let mbid: Mbid = MBID.parse().unwrap();
        let json = serde_json::to_string(&mbid).unwrap();
        assert_eq!(json, format!("\"{MBID}\""));
    }
}
