pub mod ids;
pub mod item;
pub mod meta;
pub mod queue;
pub mod scraper;
pub mod token;

pub use ids::Mbid;
pub use item::{ItemPayload, JsonEncoder, PayloadEncoder, StoredItem};
pub use meta::{RecordingMeta, RecordingMetadata, ReleaseGroupMeta, UpsertOutcome};
pub use queue::{UnprocessedRecording, UnprocessedReleaseGroup};
pub use scraper::{MbType, Scraper, Source};
pub use token::Token;
