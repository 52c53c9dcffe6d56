use serde::{Deserialize, Serialize};

use crate::model::ids::Mbid;

/// A recording a scraper has not processed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessedRecording {
    pub mbid: Mbid,
    pub name: String,
    pub artist_credit: String,
}

impl UnprocessedRecording {
    /// Field values in the order of [`MbType::export_keys`](crate::MbType::export_keys).
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.mbid.to_string(),
            self.name.clone(),
            self.artist_credit.clone(),
        ]
    }
}

/// A release group a scraper has not processed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessedReleaseGroup {
    pub mbid: Mbid,
    pub name: String,
    pub artist_credit: String,
    pub first_release_date: Option<String>,
}

impl UnprocessedReleaseGroup {
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.mbid.to_string(),
            self.name.clone(),
            self.artist_credit.clone(),
            self.first_release_date.clone().unwrap_or_default(),
        ]
    }
}
