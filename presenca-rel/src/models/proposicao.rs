//! Proposition (bill, amendment, ...) snapshot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::formato;

/// Vote sentinel recorded when a proposition sub-lookup failed. Soft
/// failures never abort the overall report.
pub const VOTO_ERRO: &str = "ERROR";

/// Vote sentinel for a parlamentarian absent from the roll call
pub const VOTO_AUSENTE: &str = "Não votou";

/// A legislative document with the parlamentarian's vote on it, as
/// embedded in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposicao {
    pub id: String,
    /// Type/category code ("PL", "PEC", ...)
    pub tipo: String,
    /// Summary text
    pub ementa: String,
    pub numero: String,
    #[serde(rename = "dataApresentacao", with = "formato::data_br_opt", default)]
    pub data_apresentacao: Option<NaiveDate>,
    #[serde(rename = "urlDocumento")]
    pub url_documento: Option<String>,
    #[serde(rename = "urlAutores")]
    pub url_autores: Option<String>,
    /// The parlamentarian's vote, free text per source, including the
    /// sentinels [`VOTO_AUSENTE`] and [`VOTO_ERRO`]
    pub voto: Option<String>,
    /// Agenda item text this proposition was voted under
    pub pauta: String,
}
