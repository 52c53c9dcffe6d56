//! Core ledger for metadb.
//!
//! This crate owns the SQLite schema and every operation scrapers use to
//! record what they have processed: recording identities and MBID
//! redirects, last-write-wins metadata for recordings and release groups,
//! the scraper registry, the item ledger, and the unprocessed-work queries
//! derived from them.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;
pub mod store;

pub use error::{Error, Result};
pub use model::{
    ItemPayload, JsonEncoder, MbType, Mbid, PayloadEncoder, RecordingMeta, RecordingMetadata,
    ReleaseGroupMeta, Scraper, Source, StoredItem, Token, UnprocessedRecording,
    UnprocessedReleaseGroup, UpsertOutcome,
};
pub use schema::Database;
