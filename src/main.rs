//! welearn-db CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use welearn_database::{
    commands::{
        cmd_init, cmd_status, cmd_validate, print_init, print_status, print_validation,
    },
    config::Config,
    db::Database,
    error::Result,
};

#[derive(Parser)]
#[command(name = "welearn-db")]
#[command(version, about = "WeLearn database administration", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration and create the database schema
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Show row counts per table and documents per pipeline step
    Status,

    /// Validate a JSON document draft
    Validate {
        /// Path to the draft file
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let base_dir = cli.config.as_deref().map(Config::base_dir_for).transpose()?;

    match cli.command {
        Commands::Init { force } => {
            let report = cmd_init(base_dir, force).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_init(&report);
            }
        }

        Commands::Status => {
            let config = Config::load_initialized(base_dir)?;
            let db = Database::connect(&config).await?;
            let status = cmd_status(&config, &db).await;
            db.close().await;
            let status = status?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Validate { file } => {
            // Validation needs no database, defaults apply without a config file
            let config = Config::load_from(base_dir)?;
            let report = cmd_validate(&config, &file)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_validation(&report);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "welearn-db", &mut std::io::stdout());
        }
    }

    Ok(())
}
