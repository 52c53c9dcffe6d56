//! Running raw SQL setup scripts against the store.

use std::path::Path;

use crate::error::Result;
use crate::schema::Database;

const COMMENT_MARKER: &str = "--";

impl Database {
    /// Execute a whole script inside one transaction.
    ///
    /// Any statement error rolls the script back and is returned.
    pub fn run_sql_script(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let sql = std::fs::read_to_string(path)?;
        log::info!("Running SQL script {}", path.display());

        let tx = self.conn().unchecked_transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;
        Ok(())
    }

    /// Execute a script one line at a time, outside any transaction.
    ///
    /// Each non-empty line must be a complete statement; lines starting with
    /// `--` are skipped. Statements that cannot run inside a transaction go
    /// through here. The first failing statement stops the script: the error
    /// is logged and `false` is returned. Statements that ran before it stay
    /// committed.
    pub fn run_sql_script_without_transaction(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let sql = std::fs::read_to_string(path)?;
        log::info!("Running SQL script {} without a transaction", path.display());

        for line in sql.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }
            if let Err(e) = self.conn().execute_batch(line) {
                log::error!("Error: {e}");
                return Ok(false);
            }
        }

        Ok(true)
    }
}
