//! Report aggregate root

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classificador::{self, Classificacao};

use super::{formato, Evento, Orgao, Parlamentar, Proposicao};

/// The reconciled attendance report for one parlamentarian over one
/// period.
///
/// Created fresh per request, assembled once by [`Relatorio::montar`]
/// from immutable partial results, persisted once complete, and
/// read-only afterwards.
///
/// Invariants maintained by assembly:
/// - `eventos_previstos` ⊆ `eventos_ausentes` (the code >= 2 subset);
/// - `eventos_ausentes_esperados_total` == `eventos_previstos.len()`;
/// - every embedded event carries its presence code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relatorio {
    pub parlamentar: Parlamentar,
    /// Inclusive start of the query window (not necessarily of data
    /// returned)
    #[serde(rename = "dataInicial", with = "formato::data_br")]
    pub data_inicial: NaiveDate,
    /// Inclusive end of the query window
    #[serde(rename = "dataFinal", with = "formato::data_br")]
    pub data_final: NaiveDate,
    /// Static per-house advisory about known data gaps
    pub mensagem: Option<String>,
    pub orgaos: Vec<Orgao>,
    pub proposicoes: Vec<Proposicao>,
    #[serde(rename = "eventosPresentes")]
    pub eventos_presentes: Vec<Evento>,
    #[serde(rename = "eventosAusentes")]
    pub eventos_ausentes: Vec<Evento>,
    /// Absences the parlamentarian was expected at (presence code >= 2);
    /// a derived subset of `eventos_ausentes`, not disjoint from it
    #[serde(rename = "eventosPrevistos")]
    pub eventos_previstos: Vec<Evento>,
    #[serde(rename = "eventosAusentesEsperadosTotal")]
    pub eventos_ausentes_esperados_total: usize,
    #[serde(rename = "presencaRelativa", with = "formato::porcentagem")]
    pub presenca_relativa: f64,
    #[serde(rename = "presencaTotal", with = "formato::porcentagem")]
    pub presenca_total: f64,
}

impl Relatorio {
    /// Assemble the final report from the orchestration's immutable
    /// partial results. The derived bucket, the expected-absence total
    /// and both percentages are computed here and nowhere else.
    pub fn montar(
        parlamentar: Parlamentar,
        data_inicial: NaiveDate,
        data_final: NaiveDate,
        mensagem: Option<String>,
        orgaos: Vec<Orgao>,
        proposicoes: Vec<Proposicao>,
        classificacao: Classificacao,
    ) -> Self {
        let Classificacao {
            presentes,
            ausentes,
        } = classificacao;

        let previstos: Vec<Evento> = ausentes
            .iter()
            .filter(|e| e.presenca.map(|p| p.ausencia_esperada()).unwrap_or(false))
            .cloned()
            .collect();

        let presenca_total = classificador::presenca_total(presentes.len(), ausentes.len());
        let presenca_relativa =
            classificador::presenca_relativa(presentes.len(), previstos.len());

        Self {
            parlamentar,
            data_inicial,
            data_final,
            mensagem,
            orgaos,
            proposicoes,
            eventos_ausentes_esperados_total: previstos.len(),
            eventos_presentes: presentes,
            eventos_ausentes: ausentes,
            eventos_previstos: previstos,
            presenca_relativa,
            presenca_total,
        }
    }
}
