use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::Mbid;

/// Canonical metadata for a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingMeta {
    pub mbid: Mbid,
    pub name: String,
    pub artist_credit: String,

    /// When the metadata service last changed this recording.
    pub last_updated: DateTime<Utc>,
}

impl RecordingMeta {
    #[must_use]
    pub fn new(
        mbid: Mbid,
        name: impl Into<String>,
        artist_credit: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            mbid,
            name: name.into(),
            artist_credit: artist_credit.into(),
            last_updated,
        }
    }
}

/// Canonical metadata for a release group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseGroupMeta {
    pub mbid: Mbid,
    pub name: String,
    pub artist_credit: String,

    /// As delivered: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub first_release_date: Option<String>,

    pub last_updated: DateTime<Utc>,
}

impl ReleaseGroupMeta {
    #[must_use]
    pub fn new(
        mbid: Mbid,
        name: impl Into<String>,
        artist_credit: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            mbid,
            name: name.into(),
            artist_credit: artist_credit.into(),
            first_release_date: None,
            last_updated,
        }
    }

    #[must_use]
    pub fn with_first_release_date(mut self, date: impl Into<String>) -> Self {
        self.first_release_date = Some(date.into());
        self
    }
}

/// A recording as delivered by the metadata scraper, together with every
/// release group it appears on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    #[serde(flatten)]
    pub recording: RecordingMeta,

    /// Release groups keyed by their MBID.
    #[serde(default)]
    pub release_group_map: BTreeMap<Mbid, ReleaseGroupMeta>,
}

impl RecordingMetadata {
    #[must_use]
    pub fn new(recording: RecordingMeta) -> Self {
        Self {
            recording,
            release_group_map: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_release_group(mut self, release_group: ReleaseGroupMeta) -> Self {
        self.release_group_map
            .insert(release_group.mbid, release_group);
        self
    }
}

/// What a last-write-wins upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// The stored row was as new or newer; nothing was written.
    Stale,
}

impl UpsertOutcome {
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Stale)
    }
}
