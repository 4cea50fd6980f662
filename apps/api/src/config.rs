use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables. Every key
/// has a local-friendly default so a bare `cargo run` works against the
/// sample data.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the candidate/job/feedback CSV files.
    pub data_dir: PathBuf,
    /// Canonical Q-table snapshot path — one per deployment.
    pub q_table_path: PathBuf,
    /// Directory evaluation audit artifacts are written to.
    pub outputs_dir: PathBuf,
    /// External embedding service. When unset, the deterministic local
    /// embedder is used instead.
    pub embedding_endpoint: Option<String>,
    pub embedding_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: path_env("DATA_DIR", "data"),
            q_table_path: path_env("Q_TABLE_PATH", "models/q_table.json"),
            outputs_dir: path_env("OUTPUTS_DIR", "outputs"),
            embedding_endpoint: std::env::var("EMBEDDING_ENDPOINT").ok(),
            embedding_timeout_secs: std::env::var("EMBEDDING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("EMBEDDING_TIMEOUT_SECS must be a number of seconds")?,
        })
    }
}

fn path_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
