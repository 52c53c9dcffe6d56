use anyhow::{Context, Result};
use metadb_core::{Database, Scraper, Source};
use std::path::Path;

fn require_source(db: &Database, name: &str) -> Result<Source> {
    db.load_source(name)?
        .with_context(|| format!("Unknown source: {name}"))
}

fn print_scraper(scraper: &Scraper) {
    println!(
        "{:>4}  v{:<4} {:<14} {}  {}",
        scraper.id, scraper.version, scraper.mb_type, scraper.module, scraper.description
    );
}

pub fn add_source(db_path: &Path, name: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    let source = db.add_source(name)?;
    println!("✓ Added source {} (id {})", source.name, source.id);
    Ok(())
}

pub fn add_scraper(
    db_path: &Path,
    source: &str,
    module: &str,
    mb_type: &str,
    version: i64,
    description: &str,
) -> Result<()> {
    let db = Database::open(db_path)?;
    let source = require_source(&db, source)?;
    let scraper = db.add_scraper(&source, module, mb_type, version, description)?;
    println!("✓ Added scraper for {}:", source.name);
    print_scraper(&scraper);
    Ok(())
}

pub fn list_scrapers(db_path: &Path, source: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    let source = require_source(&db, source)?;
    let scrapers = db.scrapers_for_source(&source)?;

    if scrapers.is_empty() {
        println!("No scrapers for {}", source.name);
    }
    for scraper in &scrapers {
        print_scraper(scraper);
    }
    Ok(())
}

pub fn latest_scraper(db_path: &Path, source: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    let source = require_source(&db, source)?;
    match db.latest_scraper_for_source(&source)? {
        Some(scraper) => print_scraper(&scraper),
        None => println!("No scrapers for {}", source.name),
    }
    Ok(())
}
