use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::error::Result;
use crate::model::token::parse_token;
use crate::model::Token;
use crate::schema::db::{format_timestamp, timestamp_column};
use crate::schema::Database;

fn row_to_token(row: &rusqlite::Row) -> rusqlite::Result<Token> {
    let token: String = row.get(0)?;
    let token = Uuid::parse_str(&token).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Token {
        token,
        admin: row.get(1)?,
        added: timestamp_column(row, 2)?,
    })
}

// API tokens
impl Database {
    /// Create and store a new random token.
    pub fn add_token(&self, admin: bool) -> Result<Token> {
        let token = Token {
            token: Uuid::new_v4(),
            admin,
            added: Utc::now(),
        };
        self.conn().execute(
            "INSERT INTO token (token, admin, added) VALUES (?1, ?2, ?3)",
            params![
                token.token.to_string(),
                token.admin,
                format_timestamp(&token.added)
            ],
        )?;
        log::info!("Added {}token", if admin { "admin " } else { "" });
        Ok(token)
    }

    /// All tokens, oldest first.
    pub fn tokens(&self) -> Result<Vec<Token>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT token, admin, added FROM token ORDER BY added, rowid")?;
        let tokens = stmt
            .query_map([], row_to_token)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tokens)
    }

    /// Look a token up. A string that is not a v4 UUID is simply not found.
    pub fn get_token(&self, token: &str) -> Result<Option<Token>> {
        let Some(token) = parse_token(token) else {
            return Ok(None);
        };
        let token = self
            .conn()
            .query_row(
                "SELECT token, admin, added FROM token WHERE token = ?1",
                [token.to_string()],
                row_to_token,
            )
            .optional()?;
        Ok(token)
    }

    /// Delete a token. Returns whether a token was removed; a malformed
    /// token string removes nothing.
    pub fn remove_token(&self, token: &str) -> Result<bool> {
        let Some(token) = parse_token(token) else {
            return Ok(false);
        };
        let removed = self
            .conn()
            .execute("DELETE FROM token WHERE token = ?1", [token.to_string()])?;
        Ok(removed > 0)
    }
}
