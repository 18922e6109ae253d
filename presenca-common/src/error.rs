//! Shared error type for the presença crates
//!
//! Covers the foundation concerns only (persistence, filesystem,
//! configuration); the report engine layers its own domain error on
//! top of this one.

use thiserror::Error;

/// Common result type for presença operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the foundation layer
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error while opening the database or config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or invariant failure inside the foundation layer
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_errors_convert() {
        let erro: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(erro, Error::Database(_)));
    }

    #[test]
    fn test_display_carries_the_detail() {
        let erro = Error::Config("bad value for http_timeout_secs".to_string());
        assert!(erro.to_string().contains("http_timeout_secs"));
    }
}
