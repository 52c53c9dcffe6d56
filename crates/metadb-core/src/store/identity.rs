use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::model::Mbid;
use crate::schema::db::format_timestamp;
use crate::schema::Database;

/// Register each MBID that is not yet known. Returns the ones added.
pub(crate) fn add_recording_mbids(conn: &Connection, mbids: &[Mbid]) -> Result<Vec<Mbid>> {
    let mut stmt = conn.prepare(
        "INSERT INTO recording (mbid, added) VALUES (?1, ?2)
         ON CONFLICT (mbid) DO NOTHING",
    )?;
    let added = format_timestamp(&Utc::now());

    let mut inserted = Vec::new();
    for mbid in mbids {
        if stmt.execute(params![mbid, added])? == 1 {
            inserted.push(*mbid);
        }
    }
    Ok(inserted)
}

// Recording identities and redirects
impl Database {
    /// Register recording MBIDs as known. Returns the MBIDs that were new.
    pub fn add_recording_mbids(&self, mbids: &[Mbid]) -> Result<Vec<Mbid>> {
        let tx = self.conn().unchecked_transaction()?;
        let inserted = add_recording_mbids(&tx, mbids)?;
        tx.commit()?;

        if !inserted.is_empty() {
            log::info!("Added {} new recording MBIDs", inserted.len());
        }
        Ok(inserted)
    }

    /// Register a single recording MBID. Returns whether it was new.
    pub fn record_identity(&self, mbid: &Mbid) -> Result<bool> {
        Ok(!add_recording_mbids(self.conn(), std::slice::from_ref(mbid))?.is_empty())
    }

    /// All known recording MBIDs, oldest first.
    pub fn recording_mbids(&self) -> Result<Vec<Mbid>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT mbid FROM recording ORDER BY added, rowid")?;
        let mbids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(mbids)
    }

    /// Record that the metadata service answered a lookup for `query_mbid`
    /// with `actual_mbid`.
    ///
    /// Equal MBIDs are not a redirect and are ignored. Otherwise the pair is
    /// stored once and `actual_mbid` becomes a known recording. Returns
    /// whether a new redirect was stored.
    pub fn record_redirect(&self, query_mbid: &Mbid, actual_mbid: &Mbid) -> Result<bool> {
        if query_mbid == actual_mbid {
            return Ok(false);
        }

        let tx = self.conn().unchecked_transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM recording_redirect WHERE mbid = ?1 AND new_mbid = ?2",
                params![query_mbid, actual_mbid],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(false);
        }

        add_recording_mbids(&tx, std::slice::from_ref(actual_mbid))?;
        tx.execute(
            "INSERT INTO recording_redirect (mbid, new_mbid) VALUES (?1, ?2)",
            params![query_mbid, actual_mbid],
        )?;
        tx.commit()?;

        log::info!("Recording {query_mbid} redirects to {actual_mbid}");
        Ok(true)
    }

    /// The MBIDs `mbid` has been redirected to. Chains are not followed.
    pub fn redirects_for(&self, mbid: &Mbid) -> Result<Vec<Mbid>> {
        let mut stmt = self.conn().prepare(
            "SELECT new_mbid FROM recording_redirect WHERE mbid = ?1 ORDER BY new_mbid",
        )?;
        let targets = stmt
            .query_map([mbid], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::fixtures::{fail_inserts_into, mbid, test_db};

    #[test]
    fn test_add_recording_mbids_returns_new_only() {
        let db = test_db();
        let added = db.add_recording_mbids(&[mbid(1), mbid(2)]).unwrap();
        assert_eq!(added, vec![mbid(1), mbid(2)]);

        let added = db.add_recording_mbids(&[mbid(2), mbid(3)]).unwrap();
        assert_eq!(added, vec![mbid(3)]);

        assert_eq!(db.recording_mbids().unwrap(), vec![mbid(1), mbid(2), mbid(3)]);
    }

    #[test]
    fn test_record_identity_is_idempotent() {
        let db = test_db();
        assert!(db.record_identity(&mbid(1)).unwrap());
        assert!(!db.record_identity(&mbid(1)).unwrap());
        assert_eq!(db.recording_mbids().unwrap().len(), 1);
    }

    #[test]
    fn test_redirect_to_self_is_ignored() {
        let db = test_db();
        assert!(!db.record_redirect(&mbid(1), &mbid(1)).unwrap());
        assert!(db.redirects_for(&mbid(1)).unwrap().is_empty());
        assert!(db.recording_mbids().unwrap().is_empty());
    }

    #[test]
    fn test_redirect_registers_target() {
        let db = test_db();
        db.record_identity(&mbid(1)).unwrap();

        assert!(db.record_redirect(&mbid(1), &mbid(2)).unwrap());
        assert_eq!(db.redirects_for(&mbid(1)).unwrap(), vec![mbid(2)]);
        assert!(db.recording_mbids().unwrap().contains(&mbid(2)));
    }

    #[test]
    fn test_redirect_stored_once() {
        let db = test_db();
        assert!(db.record_redirect(&mbid(1), &mbid(2)).unwrap());
        assert!(!db.record_redirect(&mbid(1), &mbid(2)).unwrap());

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM recording_redirect", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_redirect_chains_are_not_flattened() {
        let db = test_db();
        db.record_redirect(&mbid(1), &mbid(2)).unwrap();
        db.record_redirect(&mbid(2), &mbid(3)).unwrap();

        assert_eq!(db.redirects_for(&mbid(1)).unwrap(), vec![mbid(2)]);
        assert_eq!(db.redirects_for(&mbid(2)).unwrap(), vec![mbid(3)]);
    }

    #[test]
    fn test_failed_redirect_does_not_register_target() {
        let db = test_db();
        fail_inserts_into(&db, "recording_redirect");

        assert!(db.record_redirect(&mbid(1), &mbid(2)).is_err());
        assert!(db.recording_mbids().unwrap().is_empty());
        assert!(db.redirects_for(&mbid(1)).unwrap().is_empty());
    }
}
