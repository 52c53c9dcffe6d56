use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::model::{Mbid, RecordingMetadata};
use crate::schema::Database;

use super::meta::{upsert_recording_meta, upsert_release_group_meta};

fn link(conn: &Connection, recording_mbid: &Mbid, release_group_mbid: &Mbid) -> Result<bool> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM recording_release_group
             WHERE recording_mbid = ?1 AND release_group_mbid = ?2",
            params![recording_mbid, release_group_mbid],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO recording_release_group (recording_mbid, release_group_mbid)
         VALUES (?1, ?2)",
        params![recording_mbid, release_group_mbid],
    )?;
    Ok(true)
}

// Recording <-> release group links
impl Database {
    /// Link a recording to a release group. Returns whether the link is new.
    ///
    /// The release group must already be known.
    pub fn link_recording_to_release_group(
        &self,
        recording_mbid: &Mbid,
        release_group_mbid: &Mbid,
    ) -> Result<bool> {
        let tx = self.conn().unchecked_transaction()?;
        let created = link(&tx, recording_mbid, release_group_mbid)?;
        tx.commit()?;
        Ok(created)
    }

    /// Release groups linked to a recording.
    pub fn release_groups_for_recording(&self, recording_mbid: &Mbid) -> Result<Vec<Mbid>> {
        let mut stmt = self.conn().prepare(
            "SELECT release_group_mbid
             FROM recording_release_group
             WHERE recording_mbid = ?1
             ORDER BY release_group_mbid",
        )?;
        let mbids = stmt
            .query_map([recording_mbid], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(mbids)
    }

    /// Cache a recording delivered by the metadata scraper.
    ///
    /// Reconciles the recording's own meta, then every release group in its
    /// map, linking each one to the recording. Everything commits together
    /// or not at all.
    pub fn cache_metadata(&self, metadata: &RecordingMetadata) -> Result<()> {
        let recording_mbid = &metadata.recording.mbid;

        let tx = self.conn().unchecked_transaction()?;
        let outcome = upsert_recording_meta(&tx, &metadata.recording)?;
        let mut linked = 0;
        for release_group in metadata.release_group_map.values() {
            upsert_release_group_meta(&tx, release_group)?;
            if link(&tx, recording_mbid, &release_group.mbid)? {
                linked += 1;
            }
        }
        tx.commit()?;

        if outcome.changed() || linked > 0 {
            log::info!(
                "Cached metadata for recording {recording_mbid} ({:?}, {linked} new release group links)",
                outcome
            );
        }
        Ok(())
    }
}
