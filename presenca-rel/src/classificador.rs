//! Event Classifier
//!
//! Partitions the event universe of a period into attended and absent,
//! then sub-classifies absences by expectedness. Not every absence is
//! meaningful: missing a committee the parlamentarian doesn't sit on
//! is not a foul; missing their own committee, the plenary, or an
//! event the house individually forecast them at is.
//!
//! Precedence for absent events, first match wins:
//! 1. event id in the individually-forecast feed -> code 3;
//! 2. primary organ among current commission memberships, or organ
//!    nicknamed `PLEN` -> code 2;
//! 3. otherwise -> code 1.
//!
//! The forecast feed is checked first because it reflects
//! institutional expectation directly, independent of commission
//! membership, which may be stale.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Evento, Presenca};

/// The classified event universe for one report
#[derive(Debug, Clone, Default)]
pub struct Classificacao {
    /// Events the parlamentarian attended (code 0)
    pub presentes: Vec<Evento>,
    /// Every other event, each stamped with code 1, 2 or 3
    pub ausentes: Vec<Evento>,
}

/// Classify the full event universe.
///
/// Attendance detection (id-vs-name matching is source-specific) has
/// already happened: `presentes_ids` holds the ids of attended
/// events. `previstos_ids` is the individually-forecast feed, empty
/// for sources without one. `comissoes` holds the normalized names of
/// the parlamentarian's current commission memberships (see
/// [`normalizar_nome`]).
pub fn classificar_eventos(
    eventos: Vec<Evento>,
    presentes_ids: &HashSet<String>,
    previstos_ids: &HashSet<String>,
    comissoes: &HashSet<String>,
) -> Classificacao {
    let mut classificacao = Classificacao::default();

    for evento in eventos {
        if presentes_ids.contains(&evento.id) {
            classificacao
                .presentes
                .push(evento.classificar(Presenca::Presente));
            continue;
        }

        let presenca = classificar_ausencia(&evento, previstos_ids, comissoes);
        classificacao.ausentes.push(evento.classificar(presenca));
    }

    debug!(
        presentes = classificacao.presentes.len(),
        ausentes = classificacao.ausentes.len(),
        "Classified event universe"
    );

    classificacao
}

/// Sub-classify one absence by the precedence rule
fn classificar_ausencia(
    evento: &Evento,
    previstos_ids: &HashSet<String>,
    comissoes: &HashSet<String>,
) -> Presenca {
    if previstos_ids.contains(&evento.id) {
        return Presenca::AusenciaPrevista;
    }

    if let Some(orgao) = evento.orgao_principal() {
        if orgao.e_plenario() || comissoes.contains(&normalizar_nome(&orgao.nome)) {
            return Presenca::AusenciaEsperada;
        }
    }

    Presenca::AusenciaNaoEsperada
}

/// Normalization applied to organ names on both sides of the
/// membership comparison
pub fn normalizar_nome(nome: &str) -> String {
    nome.trim().to_lowercase()
}

/// Absolute attendance percentage: attended relative to all absences.
///
/// Division by zero is a defined boundary, never an error: with no
/// absences the parlamentarian was present at everything there was
/// (100%), unless there were no events at all (0%).
pub fn presenca_total(presentes: usize, ausentes: usize) -> f64 {
    if ausentes == 0 {
        return if presentes > 0 { 100.0 } else { 0.0 };
    }
    100.0 * presentes as f64 / ausentes as f64
}

/// Relative attendance percentage: attended relative to the absences
/// the parlamentarian was actually expected at (code >= 2). Same
/// zero-denominator boundary as [`presenca_total`].
pub fn presenca_relativa(presentes: usize, esperados: usize) -> f64 {
    if esperados == 0 {
        return if presentes > 0 { 100.0 } else { 0.0 };
    }
    100.0 * presentes as f64 / esperados as f64
}
