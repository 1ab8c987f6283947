use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    /// Run the CSV seed importer before binding the listener
    pub seed_on_startup: bool,
    /// Directory to resolve `seed/*.csv` against; embedded resources when unset
    pub seed_root: Option<PathBuf>,
    /// Emit masked REQUEST/RESPONSE payload lines for every handler call
    pub payload_logging_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            seed_on_startup: parse_flag("SEED_ON_STARTUP", true)?,
            seed_root: env::var("SEED_ROOT").ok().map(PathBuf::from),
            payload_logging_enabled: parse_flag("PAYLOAD_LOGGING_ENABLED", true)?,
        })
    }
}

/// Read a boolean flag, accepting true/false/1/0 (case-insensitive)
fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(raw) => parse_bool(&raw).with_context(|| format!("{} must be true or false", name)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => anyhow::bail!("invalid boolean value: {}", other),
    }
}
