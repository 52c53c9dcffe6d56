/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- API tokens
CREATE TABLE IF NOT EXISTS token (
    token TEXT PRIMARY KEY,
    admin INTEGER NOT NULL DEFAULT 0,
    added TEXT NOT NULL
);

-- Scraper providers
CREATE TABLE IF NOT EXISTS source (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Versioned scrapers, several per source
CREATE TABLE IF NOT EXISTS scraper (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES source(id),
    module TEXT NOT NULL,
    mb_type TEXT NOT NULL CHECK (mb_type IN ('recording', 'release_group')),
    version INTEGER NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_scraper_source_version ON scraper(source_id, version);

-- Known recording identities
CREATE TABLE IF NOT EXISTS recording (
    mbid TEXT PRIMARY KEY,
    added TEXT NOT NULL
);

-- Recordings the metadata service has merged into another MBID
CREATE TABLE IF NOT EXISTS recording_redirect (
    mbid TEXT NOT NULL,
    new_mbid TEXT NOT NULL REFERENCES recording(mbid),
    PRIMARY KEY (mbid, new_mbid),
    CHECK (mbid <> new_mbid)
);

CREATE TABLE IF NOT EXISTS recording_meta (
    mbid TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    artist_credit TEXT NOT NULL,
    last_updated TEXT NOT NULL
);

-- Known release group identities
CREATE TABLE IF NOT EXISTS release_group (
    mbid TEXT PRIMARY KEY,
    added TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS release_group_meta (
    mbid TEXT PRIMARY KEY REFERENCES release_group(mbid),
    name TEXT NOT NULL,
    artist_credit TEXT NOT NULL,
    first_release_date TEXT,
    last_updated TEXT NOT NULL
);

-- Recording <-> release group (many-to-many)
CREATE TABLE IF NOT EXISTS recording_release_group (
    recording_mbid TEXT NOT NULL,
    release_group_mbid TEXT NOT NULL REFERENCES release_group(mbid),
    PRIMARY KEY (recording_mbid, release_group_mbid)
);

-- Processing receipts
CREATE TABLE IF NOT EXISTS item (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scraper_id INTEGER NOT NULL REFERENCES scraper(id),
    mbid TEXT NOT NULL,
    added TEXT NOT NULL,
    UNIQUE (scraper_id, mbid)
);

CREATE INDEX IF NOT EXISTS idx_item_mbid ON item(mbid);

CREATE TABLE IF NOT EXISTS item_data (
    item_id INTEGER PRIMARY KEY REFERENCES item(id),
    data TEXT NOT NULL
);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
