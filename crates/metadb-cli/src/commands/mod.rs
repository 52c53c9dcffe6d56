pub mod config;
pub mod dump;
pub mod init;
pub mod scraper;
pub mod status;
pub mod token;

pub use dump::run_dump;
pub use init::run_init;
pub use status::show_missing_meta;
