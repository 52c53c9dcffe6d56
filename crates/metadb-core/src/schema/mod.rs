pub mod db;
pub mod migrations;
pub mod script;

pub use db::Database;
pub use migrations::{Migration, MIGRATIONS};
