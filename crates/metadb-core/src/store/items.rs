use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::model::{ItemPayload, JsonEncoder, Mbid, PayloadEncoder, Scraper, StoredItem};
use crate::schema::db::{format_timestamp, timestamp_column};
use crate::schema::Database;

// Item ledger
impl Database {
    /// Record that `scraper` has processed `mbid`, with the default JSON
    /// payload encoding. See [`Database::add_item_with`].
    pub fn add_item(&self, scraper: &Scraper, mbid: &Mbid, payload: &ItemPayload) -> Result<bool> {
        self.add_item_with(&JsonEncoder, scraper, mbid, payload)
    }

    /// Record that `scraper` has processed `mbid`.
    ///
    /// Returns `false` without writing anything if the pair is already in
    /// the ledger. Otherwise the item and its encoded payload (if the
    /// encoder produced one) are inserted together and `true` is returned.
    pub fn add_item_with<E: PayloadEncoder>(
        &self,
        encoder: &E,
        scraper: &Scraper,
        mbid: &Mbid,
        payload: &ItemPayload,
    ) -> Result<bool> {
        let data = encoder.encode(payload)?;

        let tx = self.conn().unchecked_transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM item WHERE scraper_id = ?1 AND mbid = ?2",
                params![scraper.id, mbid],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(false);
        }

        let item_id: i64 = tx.query_row(
            "INSERT INTO item (scraper_id, mbid, added) VALUES (?1, ?2, ?3) RETURNING id",
            params![scraper.id, mbid, format_timestamp(&Utc::now())],
            |row| row.get(0),
        )?;
        if let Some(data) = data {
            tx.execute(
                "INSERT INTO item_data (item_id, data) VALUES (?1, ?2)",
                params![item_id, data],
            )?;
        }
        tx.commit()?;

        log::debug!("Recorded item {mbid} for scraper {}", scraper.id);
        Ok(true)
    }

    /// Look up what the latest scraper of `source_name` stored for `mbid`.
    ///
    /// Returns `None` if the source, its scrapers, or the item is missing.
    pub fn load_item(&self, mbid: &Mbid, source_name: &str) -> Result<Option<StoredItem>> {
        let Some(source) = self.load_source(source_name)? else {
            return Ok(None);
        };
        let Some(scraper) = self.latest_scraper_for_source(&source)? else {
            return Ok(None);
        };
        self.item_for_scraper(&scraper, mbid)
    }

    /// The item `scraper` recorded for `mbid`, with its payload.
    pub fn item_for_scraper(&self, scraper: &Scraper, mbid: &Mbid) -> Result<Option<StoredItem>> {
        let item = self
            .conn()
            .query_row(
                "SELECT item.id, item.mbid, item.added, item_data.data
                 FROM item
                 LEFT JOIN item_data ON item_data.item_id = item.id
                 WHERE item.mbid = ?1 AND item.scraper_id = ?2",
                params![mbid, scraper.id],
                |row| {
                    Ok(StoredItem {
                        id: row.get(0)?,
                        mbid: row.get(1)?,
                        added: timestamp_column(row, 2)?,
                        data: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MbType;
    use crate::store::fixtures::{at, fail_inserts_into, mbid, scraper, test_db};
    use serde::Serialize;
    use serde_json::json;

    fn count(db: &Database, table: &str) -> i64 {
        db.conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_add_item_once() {
        let db = test_db();
        let s = scraper(&db, "spotify", MbType::Recording, 1);
        let payload = ItemPayload::Json(json!({"spotify_id": "abc"}));

        assert!(db.add_item(&s, &mbid(1), &payload).unwrap());
        assert!(!db.add_item(&s, &mbid(1), &payload).unwrap());
        assert_eq!(count(&db, "item"), 1);
        assert_eq!(count(&db, "item_data"), 1);
    }

    #[test]
    fn test_same_mbid_for_different_scrapers() {
        let db = test_db();
        let a = scraper(&db, "spotify", MbType::Recording, 1);
        let b = scraper(&db, "spotify", MbType::Recording, 2);

        assert!(db.add_item(&a, &mbid(1), &ItemPayload::None).unwrap());
        assert!(db.add_item(&b, &mbid(1), &ItemPayload::None).unwrap());
        assert_eq!(count(&db, "item"), 2);
    }

    #[test]
    fn test_empty_payload_stores_no_data() {
        let db = test_db();
        let s = scraper(&db, "spotify", MbType::Recording, 1);

        db.add_item(&s, &mbid(1), &ItemPayload::None).unwrap();
        db.add_item(&s, &mbid(2), &ItemPayload::Json(json!({})))
            .unwrap();
        assert_eq!(count(&db, "item"), 2);
        assert_eq!(count(&db, "item_data"), 0);

        let item = db.item_for_scraper(&s, &mbid(1)).unwrap().unwrap();
        assert_eq!(item.data, None);
    }

    #[test]
    fn test_load_item_uses_latest_scraper() {
        #[derive(Serialize)]
        struct Lookup {
            url: String,
            fetched_at: chrono::DateTime<Utc>,
        }

        let db = test_db();
        let old = scraper(&db, "spotify", MbType::Recording, 1);
        let new = scraper(&db, "spotify", MbType::Recording, 2);

        db.add_item(&old, &mbid(1), &ItemPayload::Text("old".to_string()))
            .unwrap();
        let payload = ItemPayload::structured(&Lookup {
            url: "https://example.org".to_string(),
            fetched_at: at(3),
        })
        .unwrap();
        db.add_item(&new, &mbid(1), &payload).unwrap();

        let item = db.load_item(&mbid(1), "spotify").unwrap().unwrap();
        assert_eq!(item.mbid, mbid(1));
        let data: serde_json::Value = serde_json::from_str(item.data.as_deref().unwrap()).unwrap();
        assert_eq!(data["fetched_at"], "2019-01-01T03:00:00Z");
    }

    #[test]
    fn test_load_item_missing() {
        let db = test_db();
        assert_eq!(db.load_item(&mbid(1), "nowhere").unwrap(), None);

        db.add_source("empty").unwrap();
        assert_eq!(db.load_item(&mbid(1), "empty").unwrap(), None);

        scraper(&db, "spotify", MbType::Recording, 1);
        assert_eq!(db.load_item(&mbid(1), "spotify").unwrap(), None);
    }

    #[test]
    fn test_custom_encoder() {
        struct Upper;

        impl PayloadEncoder for Upper {
            fn encode(&self, payload: &ItemPayload) -> crate::Result<Option<String>> {
                Ok(match payload {
                    ItemPayload::Text(text) => Some(text.to_uppercase()),
                    _ => None,
                })
            }
        }

        let db = test_db();
        let s = scraper(&db, "spotify", MbType::Recording, 1);
        db.add_item_with(&Upper, &s, &mbid(1), &ItemPayload::Text("abc".to_string()))
            .unwrap();

        let item = db.item_for_scraper(&s, &mbid(1)).unwrap().unwrap();
        assert_eq!(item.data.as_deref(), Some("ABC"));
    }

    #[test]
    fn test_item_is_not_recorded_when_payload_insert_fails() {
        let db = test_db();
        let s = scraper(&db, "spotify", MbType::Recording, 1);
        fail_inserts_into(&db, "item_data");

        let payload = ItemPayload::Json(json!({"spotify_id": "abc"}));
        assert!(db.add_item(&s, &mbid(1), &payload).is_err());
        assert_eq!(count(&db, "item"), 0);
        assert_eq!(db.item_for_scraper(&s, &mbid(1)).unwrap(), None);
    }
}
