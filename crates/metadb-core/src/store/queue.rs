use rusqlite::params;

use crate::error::Result;
use crate::model::{Mbid, Scraper, UnprocessedRecording, UnprocessedReleaseGroup};
use crate::schema::Database;

// Work queues and diagnostics
impl Database {
    /// Recordings `scraper` still has to process.
    ///
    /// Only recordings with metadata are returned, and a recording that has
    /// been redirected elsewhere never is. `mbid` narrows the result to a
    /// single recording.
    pub fn unprocessed_recordings(
        &self,
        scraper: &Scraper,
        mbid: Option<&Mbid>,
    ) -> Result<Vec<UnprocessedRecording>> {
        let mut stmt = self.conn().prepare(
            "SELECT recording.mbid, recording_meta.name, recording_meta.artist_credit
             FROM recording
             JOIN recording_meta ON recording_meta.mbid = recording.mbid
             LEFT JOIN item
                ON item.mbid = recording.mbid
               AND item.scraper_id = ?1
             WHERE item.id IS NULL
               AND NOT EXISTS (
                   SELECT 1 FROM recording_redirect rr WHERE rr.mbid = recording.mbid
               )
               AND (?2 IS NULL OR recording.mbid = ?2)
             ORDER BY recording.mbid",
        )?;
        let rows = stmt
            .query_map(params![scraper.id, mbid], |row| {
                Ok(UnprocessedRecording {
                    mbid: row.get(0)?,
                    name: row.get(1)?,
                    artist_credit: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Release groups `scraper` still has to process.
    ///
    /// Release groups have no redirects, so only the item ledger and the
    /// presence of metadata decide.
    pub fn unprocessed_release_groups(
        &self,
        scraper: &Scraper,
        mbid: Option<&Mbid>,
    ) -> Result<Vec<UnprocessedReleaseGroup>> {
        let mut stmt = self.conn().prepare(
            "SELECT release_group.mbid
                  , release_group_meta.name
                  , release_group_meta.artist_credit
                  , release_group_meta.first_release_date
             FROM release_group
             JOIN release_group_meta ON release_group_meta.mbid = release_group.mbid
             LEFT JOIN item
                ON item.mbid = release_group.mbid
               AND item.scraper_id = ?1
             WHERE item.id IS NULL
               AND (?2 IS NULL OR release_group.mbid = ?2)
             ORDER BY release_group.mbid",
        )?;
        let rows = stmt
            .query_map(params![scraper.id, mbid], |row| {
                Ok(UnprocessedReleaseGroup {
                    mbid: row.get(0)?,
                    name: row.get(1)?,
                    artist_credit: row.get(2)?,
                    first_release_date: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Known recordings that have neither metadata nor a redirect, i.e. ones
    /// whose metadata lookup never ran or never succeeded.
    pub fn recordings_missing_meta(&self) -> Result<Vec<Mbid>> {
        let mut stmt = self.conn().prepare(
            "SELECT recording.mbid
             FROM recording
             LEFT JOIN recording_meta ON recording_meta.mbid = recording.mbid
             WHERE recording_meta.mbid IS NULL
               AND NOT EXISTS (
                   SELECT 1 FROM recording_redirect rr WHERE rr.mbid = recording.mbid
               )
             ORDER BY recording.mbid",
        )?;
        let mbids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(mbids)
    }
}
