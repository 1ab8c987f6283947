//! CLI for running or checking the patient seed import
//!
//! `import` runs the same importer the server runs at startup, against the
//! configured database, and prints the summary as JSON. `check` only parses
//! the file and needs no database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use registry_core::config::Config;
use registry_core::domains::patients::seed::{import_seed, inspect_seed, SeedFile};
use registry_core::kernel::PgPatientStore;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seed_cli")]
#[command(about = "Patient seed import CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a seed file into the configured database
    Import {
        /// CSV file to import; defaults to the configured or embedded seed
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Parse a seed file and report what an import would see
    Check {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Output<T: Serialize> {
    file: String,
    source: String,
    #[serde(flatten)]
    result: T,
}

fn output<T: Serialize>(file: &SeedFile, result: T) -> Result<()> {
    let out = Output {
        file: file.name.clone(),
        source: file.origin.to_string(),
        result,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// `--file` wins; otherwise the same lookup the server does
fn load_seed_file(file: Option<PathBuf>, seed_root: Option<PathBuf>) -> Result<SeedFile> {
    match file {
        Some(path) => SeedFile::from_path(&path),
        None => SeedFile::locate(seed_root.as_deref())?
            .context("No seed file found (tried seed/hms_patients.csv and seed/patients.csv)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,registry_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            let seed_root = std::env::var("SEED_ROOT").ok().map(PathBuf::from);
            let seed = load_seed_file(file, seed_root)?;
            output(&seed, inspect_seed(seed.lines()))
        }
        Commands::Import { file } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let seed = load_seed_file(file, config.seed_root.clone())?;

            let pool = PgPoolOptions::new()
                .max_connections(2)
                .connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            let store = PgPatientStore::new(pool);
            let summary = import_seed(seed.lines(), &store)
                .await
                .with_context(|| format!("Seed import from {} failed", seed.name))?;

            output(&seed, summary)
        }
    }
}
