use std::env;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    /// Optional JSON file with users, entitlements and requests to start from.
    pub seed_path: Option<PathBuf>,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = lookup("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET must be set"))?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        let rate_protected_per_min = var("RATE_PROTECTED_PER_MIN", "1000")
            .parse::<u32>()
            .context("RATE_PROTECTED_PER_MIN must be a non-negative integer")?;

        let log_level = var("LOG_LEVEL", "info")
            .parse::<tracing::Level>()
            .map_err(|_| anyhow!("LOG_LEVEL must be one of trace, debug, info, warn, error"))?;

        Ok(Self {
            server_addr: var("SERVER_ADDR", "127.0.0.1:8080"),
            jwt_secret,
            api_prefix: var("API_PREFIX", "/api"),
            rate_protected_per_min,
            seed_path: lookup("SEED_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            log_dir: var("LOG_DIR", "logs"),
            log_level,
        })
    }
}
