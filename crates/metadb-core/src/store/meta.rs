use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::model::{Mbid, RecordingMeta, ReleaseGroupMeta, UpsertOutcome};
use crate::schema::db::{format_timestamp, timestamp_column};
use crate::schema::Database;

fn get_recording_meta(conn: &Connection, mbid: &Mbid) -> Result<Option<RecordingMeta>> {
    let meta = conn
        .query_row(
            "SELECT mbid, name, artist_credit, last_updated
             FROM recording_meta
             WHERE mbid = ?1",
            [mbid],
            |row| {
                Ok(RecordingMeta {
                    mbid: row.get(0)?,
                    name: row.get(1)?,
                    artist_credit: row.get(2)?,
                    last_updated: timestamp_column(row, 3)?,
                })
            },
        )
        .optional()?;
    Ok(meta)
}

fn get_release_group_meta(conn: &Connection, mbid: &Mbid) -> Result<Option<ReleaseGroupMeta>> {
    let meta = conn
        .query_row(
            "SELECT mbid, name, artist_credit, first_release_date, last_updated
             FROM release_group_meta
             WHERE mbid = ?1",
            [mbid],
            |row| {
                Ok(ReleaseGroupMeta {
                    mbid: row.get(0)?,
                    name: row.get(1)?,
                    artist_credit: row.get(2)?,
                    first_release_date: row.get(3)?,
                    last_updated: timestamp_column(row, 4)?,
                })
            },
        )
        .optional()?;
    Ok(meta)
}

/// Last-write-wins upsert of recording metadata on an open transaction.
pub(crate) fn upsert_recording_meta(conn: &Connection, meta: &RecordingMeta) -> Result<UpsertOutcome> {
    let outcome = match get_recording_meta(conn, &meta.mbid)? {
        Some(existing) if existing.last_updated >= meta.last_updated => {
            log::debug!(
                "Skipping recording meta for {}: stored {} is not older than {}",
                meta.mbid,
                existing.last_updated,
                meta.last_updated
            );
            return Ok(UpsertOutcome::Stale);
        }
        Some(_) => {
            conn.execute(
                "UPDATE recording_meta
                 SET name = ?2, artist_credit = ?3, last_updated = ?4
                 WHERE mbid = ?1",
                params![
                    meta.mbid,
                    meta.name,
                    meta.artist_credit,
                    format_timestamp(&meta.last_updated),
                ],
            )?;
            UpsertOutcome::Updated
        }
        None => {
            conn.execute(
                "INSERT INTO recording_meta (mbid, name, artist_credit, last_updated)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    meta.mbid,
                    meta.name,
                    meta.artist_credit,
                    format_timestamp(&meta.last_updated),
                ],
            )?;
            UpsertOutcome::Inserted
        }
    };
    Ok(outcome)
}

/// Last-write-wins upsert of release group metadata on an open transaction.
///
/// The bare release group row is created together with the first meta row.
pub(crate) fn upsert_release_group_meta(
    conn: &Connection,
    meta: &ReleaseGroupMeta,
) -> Result<UpsertOutcome> {
    let outcome = match get_release_group_meta(conn, &meta.mbid)? {
        Some(existing) if existing.last_updated >= meta.last_updated => {
            log::debug!(
                "Skipping release group meta for {}: stored {} is not older than {}",
                meta.mbid,
                existing.last_updated,
                meta.last_updated
            );
            return Ok(UpsertOutcome::Stale);
        }
        Some(_) => {
            conn.execute(
                "UPDATE release_group_meta
                 SET name = ?2, artist_credit = ?3, first_release_date = ?4, last_updated = ?5
                 WHERE mbid = ?1",
                params![
                    meta.mbid,
                    meta.name,
                    meta.artist_credit,
                    meta.first_release_date,
                    format_timestamp(&meta.last_updated),
                ],
            )?;
            UpsertOutcome::Updated
        }
        None => {
            conn.execute(
                "INSERT INTO release_group (mbid, added) VALUES (?1, ?2)
                 ON CONFLICT (mbid) DO NOTHING",
                params![meta.mbid, format_timestamp(&Utc::now())],
            )?;
            conn.execute(
                "INSERT INTO release_group_meta
                    (mbid, name, artist_credit, first_release_date, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    meta.mbid,
                    meta.name,
                    meta.artist_credit,
                    meta.first_release_date,
                    format_timestamp(&meta.last_updated),
                ],
            )?;
            UpsertOutcome::Inserted
        }
    };
    Ok(outcome)
}

// Recording and release group metadata
impl Database {
    /// Store recording metadata unless what is stored is at least as new.
    ///
    /// An older or equal `last_updated` is routine redelivery and returns
    /// [`UpsertOutcome::Stale`] without writing.
    pub fn upsert_recording_meta(&self, meta: &RecordingMeta) -> Result<UpsertOutcome> {
        let tx = self.conn().unchecked_transaction()?;
        let outcome = upsert_recording_meta(&tx, meta)?;
        tx.commit()?;
        Ok(outcome)
    }

    /// Store release group metadata unless what is stored is at least as new.
    pub fn upsert_release_group_meta(&self, meta: &ReleaseGroupMeta) -> Result<UpsertOutcome> {
        let tx = self.conn().unchecked_transaction()?;
        let outcome = upsert_release_group_meta(&tx, meta)?;
        tx.commit()?;
        Ok(outcome)
    }

    pub fn recording_meta(&self, mbid: &Mbid) -> Result<Option<RecordingMeta>> {
        get_recording_meta(self.conn(), mbid)
    }

    pub fn release_group_meta(&self, mbid: &Mbid) -> Result<Option<ReleaseGroupMeta>> {
        get_release_group_meta(self.conn(), mbid)
    }
}
