//! Console commands, one module per backend resource.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use comptoir_client::ApiError;
use comptoir_core::Quantity;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The backend call failed; the message is the server's.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Output could not be rendered as JSON.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Arguments are missing or inconsistent.
    #[error("{0}")]
    InvalidInput(String),
}

/// `clap` value parser for quantities (at least 1).
pub fn parse_quantity(value: &str) -> Result<Quantity, String> {
    let value: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {value}"))?;
    Quantity::new(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").map(Quantity::get), Ok(3));
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-2").is_err());
        assert!(parse_quantity("deux").is_err());
    }
}
