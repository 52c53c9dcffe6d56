use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::model::{MbType, Scraper, Source};
use crate::schema::Database;

const SCRAPER_COLUMNS: &str = "id, source_id, module, mb_type, version, description";

fn row_to_scraper(row: &rusqlite::Row) -> rusqlite::Result<Scraper> {
    let mb_type: String = row.get(3)?;
    let mb_type = mb_type
        .parse::<MbType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Scraper {
        id: row.get(0)?,
        source_id: row.get(1)?,
        module: row.get(2)?,
        mb_type,
        version: row.get(4)?,
        description: row.get(5)?,
    })
}

// Sources and scrapers
impl Database {
    pub fn add_source(&self, name: &str) -> Result<Source> {
        let id = self.conn().query_row(
            "INSERT INTO source (name) VALUES (?1) RETURNING id",
            [name],
            |row| row.get(0),
        )?;
        log::info!("Added source {name} ({id})");
        Ok(Source {
            id,
            name: name.to_string(),
        })
    }

    pub fn load_source(&self, name: &str) -> Result<Option<Source>> {
        let source = self
            .conn()
            .query_row(
                "SELECT id, name FROM source WHERE name = ?1",
                [name],
                |row| {
                    Ok(Source {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(source)
    }

    /// Register a new scraper version for `source`.
    ///
    /// `mb_type` must be `recording` or `release_group`; anything else is
    /// rejected before the store is touched.
    pub fn add_scraper(
        &self,
        source: &Source,
        module: &str,
        mb_type: &str,
        version: i64,
        description: &str,
    ) -> Result<Scraper> {
        let mb_type: MbType = mb_type.parse()?;

        let id = self.conn().query_row(
            "INSERT INTO scraper (source_id, module, mb_type, version, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
            params![source.id, module, mb_type.as_str(), version, description],
            |row| row.get(0),
        )?;
        log::info!(
            "Added {mb_type} scraper {module} v{version} for source {}",
            source.name
        );

        Ok(Scraper {
            id,
            source_id: source.id,
            module: module.to_string(),
            mb_type,
            version,
            description: description.to_string(),
        })
    }

    /// Every scraper registered for `source`, oldest version first.
    pub fn scrapers_for_source(&self, source: &Source) -> Result<Vec<Scraper>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {SCRAPER_COLUMNS} FROM scraper WHERE source_id = ?1 ORDER BY version, id"
        ))?;
        let scrapers = stmt
            .query_map([source.id], row_to_scraper)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(scrapers)
    }

    /// The scraper with the highest version for `source`.
    ///
    /// When two scrapers share a version the most recently registered one
    /// (highest id) wins.
    pub fn latest_scraper_for_source(&self, source: &Source) -> Result<Option<Scraper>> {
        let scraper = self
            .conn()
            .query_row(
                &format!(
                    "SELECT {SCRAPER_COLUMNS} FROM scraper
                     WHERE source_id = ?1
                     ORDER BY version DESC, id DESC
                     LIMIT 1"
                ),
                [source.id],
                row_to_scraper,
            )
            .optional()?;
        Ok(scraper)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::model::MbType;
    use crate::store::fixtures::test_db;

    fn scraper_count(db: &crate::Database) -> i64 {
        db.conn()
            .query_row("SELECT COUNT(*) FROM scraper", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_add_and_load_source() {
        let db = test_db();
        let source = db.add_source("spotify").unwrap();

        assert_eq!(db.load_source("spotify").unwrap(), Some(source));
        assert_eq!(db.load_source("deezer").unwrap(), None);
    }

    #[test]
    fn test_duplicate_source_name_fails() {
        let db = test_db();
        db.add_source("spotify").unwrap();
        assert!(matches!(db.add_source("spotify"), Err(Error::Database(_))));
    }

    #[test]
    fn test_add_scraper() {
        let db = test_db();
        let source = db.add_source("spotify").unwrap();
        let scraper = db
            .add_scraper(&source, "scrapers.spotify", "recording", 1, "Spotify track lookup")
            .unwrap();

        assert!(scraper.id > 0);
        assert_eq!(scraper.source_id, source.id);
        assert_eq!(scraper.mb_type, MbType::Recording);
        assert_eq!(db.scrapers_for_source(&source).unwrap(), vec![scraper]);
    }

    #[test]
    fn test_add_scraper_rejects_unknown_mb_type() {
        let db = test_db();
        let source = db.add_source("spotify").unwrap();

        let err = db
            .add_scraper(&source, "scrapers.spotify", "album", 1, "")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(scraper_count(&db), 0);
    }

    #[test]
    fn test_latest_scraper_picks_highest_version() {
        let db = test_db();
        let source = db.add_source("lastfm").unwrap();
        db.add_scraper(&source, "scrapers.lastfm", "recording", 1, "")
            .unwrap();
        let v3 = db
            .add_scraper(&source, "scrapers.lastfm", "release_group", 3, "")
            .unwrap();
        db.add_scraper(&source, "scrapers.lastfm", "recording", 2, "")
            .unwrap();

        assert_eq!(db.latest_scraper_for_source(&source).unwrap(), Some(v3));
    }

    #[test]
    fn test_latest_scraper_tie_goes_to_highest_id() {
        let db = test_db();
        let source = db.add_source("lastfm").unwrap();
        let first = db
            .add_scraper(&source, "scrapers.lastfm", "recording", 2, "first")
            .unwrap();
        let second = db
            .add_scraper(&source, "scrapers.lastfm", "recording", 2, "second")
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(db.latest_scraper_for_source(&source).unwrap(), Some(second));
    }

    #[test]
    fn test_latest_scraper_for_source_without_scrapers() {
        let db = test_db();
        let source = db.add_source("empty").unwrap();
        assert_eq!(db.latest_scraper_for_source(&source).unwrap(), None);
    }

    #[test]
    fn test_scrapers_are_scoped_to_their_source() {
        let db = test_db();
        let a = db.add_source("a").unwrap();
        let b = db.add_source("b").unwrap();
        db.add_scraper(&a, "scrapers.a", "recording", 1, "").unwrap();

        assert!(db.scrapers_for_source(&b).unwrap().is_empty());
        assert_eq!(db.latest_scraper_for_source(&b).unwrap(), None);
    }
}
