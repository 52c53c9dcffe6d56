use anyhow::{Context, Result};
use metadb_core::Database;
use std::path::{Path, PathBuf};

/// Create (or migrate) the database and optionally run a setup script.
pub fn run_init(db_path: &Path, script: Option<PathBuf>, no_transaction: bool) -> Result<()> {
    let db = Database::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    println!("✓ Database ready: {}", db_path.display());
    println!("  Schema version: {}", db.schema_version()?);

    let Some(script) = script else {
        return Ok(());
    };

    if no_transaction {
        if !db.run_sql_script_without_transaction(&script)? {
            anyhow::bail!("Setup script {} failed", script.display());
        }
    } else {
        db.run_sql_script(&script)
            .with_context(|| format!("Setup script {} failed", script.display()))?;
    }
    println!("✓ Ran {}", script.display());

    Ok(())
}
