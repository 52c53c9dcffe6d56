use anyhow::Result;
use metadb_core::Database;
use std::path::Path;

/// Print recordings that are known but have no metadata.
pub fn show_missing_meta(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let missing = db.recordings_missing_meta()?;

    for mbid in &missing {
        println!("{mbid}");
    }
    log::info!("{} recordings without metadata", missing.len());

    Ok(())
}
