use anyhow::Result;
use metadb_core::Database;
use std::path::Path;

pub fn add_token(db_path: &Path, admin: bool) -> Result<()> {
    let db = Database::open(db_path)?;
    let token = db.add_token(admin)?;
    println!("{}", token.token);
    Ok(())
}

pub fn list_tokens(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let tokens = db.tokens()?;

    if tokens.is_empty() {
        println!("No tokens");
        return Ok(());
    }
    for token in tokens {
        println!(
            "{}  {}  {}",
            token.token,
            if token.admin { "admin" } else { "     " },
            token.added.to_rfc3339()
        );
    }
    Ok(())
}

pub fn remove_token(db_path: &Path, token: &str) -> Result<()> {
    let db = Database::open(db_path)?;
    if db.remove_token(token)? {
        println!("✓ Removed token {token}");
    } else {
        println!("No such token: {token}");
    }
    Ok(())
}
