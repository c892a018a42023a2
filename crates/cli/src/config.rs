//! Console configuration.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `COMPTOIR_API_URL` - Backend base URL (default: `http://localhost:3000/api`)
//! - `COMPTOIR_TIMEOUT_SECS` - Per-request timeout in seconds
//! - `COMPTOIR_SESSION_FILE` - Session file (default: `.comptoir-session.json`)
//! - `COMPTOIR_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `RUST_LOG` - Log filter (default: `comptoir=info`)

use std::path::PathBuf;

use comptoir_client::{ClientConfig, ConfigError};

/// Session file used when `COMPTOIR_SESSION_FILE` is not set.
pub const DEFAULT_SESSION_FILE: &str = ".comptoir-session.json";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub client: ClientConfig,
    pub session_file: PathBuf,
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client = ClientConfig::from_env()?;

        let session_file = std::env::var("COMPTOIR_SESSION_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let log_format = match std::env::var("COMPTOIR_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            client,
            session_file,
            log_format,
        })
    }
}
