use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup aborts if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_url: String,
    pub mongodb_database: String,
    pub gcs_bucket: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gcs_bucket = require_env("GCS_BUCKET")?;
        if gcs_bucket.trim().is_empty() {
            bail!("GCS_BUCKET must not be empty");
        }

        Ok(Config {
            mongodb_url: require_env("MONGODB_URL")?,
            mongodb_database: require_env("MONGODB_DATABASE")?,
            gcs_bucket,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
