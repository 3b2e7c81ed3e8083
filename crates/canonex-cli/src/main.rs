//! Canonex CLI
//!
//! Command-line interface for managing canonical training examples

use std::path::PathBuf;
use std::sync::Arc;

use canonex_core::logging_facility::{init, Profile};
use canonex_core::{EngineConfig, TracingSink};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "canonex")]
#[command(about = "Canonex - canonical training example management", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "CANONEX_DB", default_value = ".canonex/store.db")]
    db: PathBuf,

    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import examples from a JSON or YAML file
    Import(commands::import::ImportArgs),
    /// List examples
    List(commands::list::ListArgs),
    /// Show one example and what may be done with it
    Show(commands::show::ShowArgs),
    /// Mark or unmark canonical examples
    Canonical(commands::canonical::CanonicalArgs),
    /// Edit an example's text or intent
    Update(commands::update::UpdateArgs),
    /// Delete an example
    Delete(commands::delete::DeleteArgs),
    /// Verify the stored corpus
    Check,
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let store = canonex_store::open_store(&cli.db, config, Arc::new(TracingSink))?;

    match cli.command {
        Commands::Import(args) => commands::import::execute(&store, args),
        Commands::List(args) => commands::list::execute(&store, args),
        Commands::Show(args) => commands::show::execute(&store, args),
        Commands::Canonical(args) => commands::canonical::execute(&store, args),
        Commands::Update(args) => commands::update::execute(&store, args),
        Commands::Delete(args) => commands::delete::execute(&store, args),
        Commands::Check => commands::check::execute(&store),
    }
}
