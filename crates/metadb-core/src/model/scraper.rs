use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The kind of MusicBrainz entity a scraper works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MbType {
    Recording,
    ReleaseGroup,
}

impl MbType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recording => "recording",
            Self::ReleaseGroup => "release_group",
        }
    }

    /// Column names of the unprocessed-item rows for this kind, in export order.
    #[must_use]
    pub const fn export_keys(self) -> &'static [&'static str] {
        match self {
            Self::Recording => &["mbid", "name", "artist_credit"],
            Self::ReleaseGroup => &["mbid", "name", "artist_credit", "first_release_date"],
        }
    }
}

impl FromStr for MbType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recording" => Ok(Self::Recording),
            "release_group" => Ok(Self::ReleaseGroup),
            other => Err(Error::InvalidArgument(format!(
                "invalid mb_type {other:?}, must be one of [recording, release_group]"
            ))),
        }
    }
}

impl fmt::Display for MbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A scraper provider, e.g. a named external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
}

/// One version of a scraper bound to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scraper {
    pub id: i64,
    pub source_id: i64,

    /// Reference to the code that implements this scraper.
    pub module: String,

    pub mb_type: MbType,
    pub version: i64,
    pub description: String,
}
