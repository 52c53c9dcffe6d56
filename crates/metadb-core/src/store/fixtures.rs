use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::model::{MbType, Mbid, RecordingMeta, ReleaseGroupMeta, Scraper};
use crate::schema::Database;

pub(crate) fn test_db() -> Database {
    Database::open_in_memory().unwrap()
}

pub(crate) fn mbid(n: u128) -> Mbid {
    Mbid::from_uuid(Uuid::from_u128(n))
}

/// A fixed timestamp `hours` after midnight on 2019-01-01.
pub(crate) fn at(hours: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(i64::from(hours))
}

pub(crate) fn recording(n: u128, name: &str, hours: u32) -> RecordingMeta {
    RecordingMeta::new(mbid(n), name, "Some Artist", at(hours))
}

pub(crate) fn release_group(n: u128, name: &str, hours: u32) -> ReleaseGroupMeta {
    ReleaseGroupMeta::new(mbid(n), name, "Some Artist", at(hours))
}

pub(crate) fn scraper(db: &Database, source: &str, mb_type: MbType, version: i64) -> Scraper {
    let source = match db.load_source(source).unwrap() {
        Some(source) => source,
        None => db.add_source(source).unwrap(),
    };
    db.add_scraper(&source, "scrapers.test", mb_type.as_str(), version, "test scraper")
        .unwrap()
}

/// Make every insert into `table` fail, so a write can be broken partway.
pub(crate) fn fail_inserts_into(db: &Database, table: &str) {
    db.conn()
        .execute_batch(&format!(
            "CREATE TRIGGER fail_{table} BEFORE INSERT ON {table}
             BEGIN SELECT RAISE(ABORT, 'insert into {table} refused'); END;"
        ))
        .unwrap();
}
