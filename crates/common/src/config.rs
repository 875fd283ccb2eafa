//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the protected API surface requests are relayed to
    pub upstream_base_url: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .map_err(|_| anyhow::anyhow!("UPSTREAM_BASE_URL is required"))?,

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "edgegate=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        };

        Ok(config)
    }
}
