use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An API token. Admin tokens may manage sources and scrapers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: Uuid,
    pub admin: bool,
    pub added: DateTime<Utc>,
}

/// Parse a token string, accepting only version 4 UUIDs.
#[must_use]
pub fn parse_token(token: &str) -> Option<Uuid> {
    Uuid::parse_str(token)
        .ok()
        .filter(|uuid| uuid.get_version_num() == 4)
}
