//! Per-house report adapters
//!
//! One capability trait, three conforming implementations. Each house's
//! data is irregular in its own way (id vs. name attendee matching,
//! string vs. epoch dates, missing feeds), so each adapter carries
//! bespoke normalization, but all of them orchestrate the same way:
//! resolve the parlamentarian, compute the period, fetch, classify,
//! and assemble the [`Relatorio`] once at the end from immutable
//! partial results.

mod alesp;
mod camara;
mod cmsp;

pub use alesp::{AlespAdapter, MENSAGEM_ALESP};
pub use camara::{CamaraAdapter, MENSAGEM_CAMARA};
pub use cmsp::{CmspAdapter, MENSAGEM_CMSP};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ModelResult;
use crate::models::{Casa, Parlamentar, Relatorio};

/// Contract every house adapter implements.
///
/// Error policy: a hard failure of the underlying provider aborts the
/// whole report via `ModelError`; partial reports are never returned.
/// Unknown ids are a soft `Ok(None)` from `obter_parlamentar`, never
/// an error.
#[async_trait]
pub trait CasaAdapter: Send + Sync {
    /// The house this adapter serves
    fn casa(&self) -> Casa;

    /// Resolve one parlamentarian; `None` on unknown or ambiguous id
    async fn obter_parlamentar(&self, id: &str) -> ModelResult<Option<Parlamentar>>;

    /// Full current roster
    async fn obter_parlamentares(&self) -> ModelResult<Vec<Parlamentar>>;

    /// Generate the full report for the window ending at `data_final`
    /// and spanning `dias` days
    async fn obter_relatorio(
        &self,
        id: &str,
        data_final: NaiveDate,
        dias: i64,
    ) -> ModelResult<Relatorio>;
}
