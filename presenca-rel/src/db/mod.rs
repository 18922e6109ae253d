//! Report persistence
//!
//! The persisted store is the single source of truth for idempotency:
//! a row present means Done, a row absent means the report was never
//! successfully computed (failed computations save nothing).

pub mod relatorios;

pub use relatorios::{carregar, salvar, ChaveRelatorio};
