//! presenca-rel - Report Reconciliation Engine
//!
//! Aggregates attendance and legislative-activity data for individual
//! politicians (federal deputies, state deputies, city councilors)
//! across three heterogeneous open-data sources and reconciles them
//! into one normalized report covering a configurable time window.
//!
//! Pipeline per report request:
//! 1. Resolve the parlamentarian against the house's provider
//! 2. Compute the period window (default 7 days, max 28)
//! 3. Fetch organs, events and propositions for the window
//! 4. Classify every event into one of four presence states
//! 5. Assemble the immutable [`models::Relatorio`] and persist it
//!
//! Identical (parlamentar, casa, data, período) requests reuse the
//! persisted report; concurrent duplicates share one in-flight task.

pub mod adapters;
pub mod classificador;
pub mod db;
pub mod error;
pub mod models;
pub mod periodo;
pub mod providers;
pub mod registry;
pub mod service;

pub use crate::error::{ModelError, ModelResult};
pub use crate::service::{RelatorioService, Solicitacao};
