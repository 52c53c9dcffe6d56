use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "metadb", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/metadb/metadb.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Create or migrate the database
    ///
    /// Opens the database, applying any pending schema migrations. An
    /// optional SQL script can be run afterwards, either as one transaction
    /// or, with --no-transaction, one line at a time for statements that
    /// cannot run inside a transaction. Lines starting with `--` are skipped
    /// in that mode.
    Init {
        /// SQL script to run after migrating
        #[arg(long)]
        script: Option<PathBuf>,

        /// Run the script line by line outside a transaction
        #[arg(long, requires = "script")]
        no_transaction: bool,
    },
    /// Manage API tokens
    #[command(subcommand)]
    Token(TokenCommands),
    /// Manage scraper sources
    #[command(subcommand)]
    Source(SourceCommands),
    /// Manage scrapers
    #[command(subcommand)]
    Scraper(ScraperCommands),
    /// List recordings that are known but have no metadata
    MissingMeta,
    /// Dump items the latest scraper of a source has not processed
    ///
    /// The scraper's mb_type decides what is dumped: recordings are written
    /// as mbid,name,artist_credit and release groups additionally carry
    /// first_release_date. Every file starts with a header row.
    DumpUnprocessed {
        /// Source name
        #[arg(long)]
        source: String,

        /// Filename template to write to (no extension)
        #[arg(long)]
        outname: String,

        /// Number of items to dump per file
        #[arg(long)]
        perfile: Option<usize>,
    },
    /// Show or initialize configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, clap::Subcommand)]
enum TokenCommands {
    /// Create a new token and print it
    Add {
        /// Grant admin privileges
        #[arg(long)]
        admin: bool,
    },
    /// List all tokens
    List,
    /// Remove a token
    Remove { token: String },
}

#[derive(Debug, clap::Subcommand)]
enum SourceCommands {
    /// Register a new source
    Add { name: String },
}

#[derive(Debug, clap::Subcommand)]
enum ScraperCommands {
    /// Register a new scraper version
    Add {
        #[arg(long)]
        source: String,

        /// Module implementing the scraper
        #[arg(long)]
        module: String,

        /// recording or release_group
        #[arg(long)]
        mb_type: String,

        #[arg(long)]
        version: i64,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// List the scrapers of a source
    List {
        #[arg(long)]
        source: String,
    },
    /// Show the latest scraper of a source
    Latest {
        #[arg(long)]
        source: String,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file
    Cat,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_with_db_path(cli.db)?;

    let level = config.logging.level_filter()?;
    if let Err(e) = twyg::setup(twyg::Opts::default()) {
        anyhow::bail!("Could not set up logging: {:?}", e);
    }
    log::set_max_level(level);

    let db_path = config.database_path.clone();

    // Ensure database directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    match cli.command {
        Commands::Init {
            script,
            no_transaction,
        } => commands::run_init(&db_path, script, no_transaction)?,
        Commands::Token(cmd) => match cmd {
            TokenCommands::Add { admin } => commands::token::add_token(&db_path, admin)?,
            TokenCommands::List => commands::token::list_tokens(&db_path)?,
            TokenCommands::Remove { token } => commands::token::remove_token(&db_path, &token)?,
        },
        Commands::Source(SourceCommands::Add { name }) => {
            commands::scraper::add_source(&db_path, &name)?;
        }
        Commands::Scraper(cmd) => match cmd {
            ScraperCommands::Add {
                source,
                module,
                mb_type,
                version,
                description,
            } => commands::scraper::add_scraper(
                &db_path,
                &source,
                &module,
                &mb_type,
                version,
                &description,
            )?,
            ScraperCommands::List { source } => commands::scraper::list_scrapers(&db_path, &source)?,
            ScraperCommands::Latest { source } => {
                commands::scraper::latest_scraper(&db_path, &source)?;
            }
        },
        Commands::MissingMeta => commands::show_missing_meta(&db_path)?,
        Commands::DumpUnprocessed {
            source,
            outname,
            perfile,
        } => {
            commands::run_dump(&db_path, &source, &outname, perfile)?;
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show_config(&config)?,
            ConfigCommands::Cat => commands::config::cat_config()?,
            ConfigCommands::Path => commands::config::show_path()?,
            ConfigCommands::Example => commands::config::show_example()?,
            ConfigCommands::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
