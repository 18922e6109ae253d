//! Domain error type for report generation
//!
//! A hard provider failure aborts the whole report computation; the
//! single [`ModelError`] wrapper is what callers (web layer, scheduled
//! sender, CLI) see. Variants carry plain strings so results can be
//! cloned through the in-flight task registry's watch channels.

use thiserror::Error;

use crate::models::Casa;

/// Result alias for report-engine operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Domain error surfaced by the report engine
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Hard failure of an underlying data provider (connectivity,
    /// non-success status, malformed payload). Fatal to the current
    /// report computation; nothing is persisted.
    #[error("Provider failure for {casa}: {detalhe}")]
    Provider { casa: Casa, detalhe: String },

    /// Parlamentarian id could not be resolved when a report was
    /// requested for it
    #[error("Parlamentar not found: {0}")]
    NaoEncontrado(String),

    /// Persistence failure while saving or loading a report
    #[error("Database error: {0}")]
    Database(String),

    /// Invariant violation inside the engine itself
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ModelError {
    /// Wrap a provider-level error for the given house
    pub fn provider(casa: Casa, detalhe: impl std::fmt::Display) -> Self {
        Self::Provider {
            casa,
            detalhe: detalhe.to_string(),
        }
    }
}
