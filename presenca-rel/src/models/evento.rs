//! Trackable session/meeting/plenary occurrence

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{formato, Orgao, Proposicao};

/// The 4-valued attendance classification of an event.
///
/// Assigned exactly once per event by the classifier and never changed
/// afterwards within a report. Serialized as the integer codes the
/// wire contract expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Presenca {
    /// Parlamentarian appeared in the event's attendee list
    Presente = 0,
    /// Absent from an event nobody expected them at; does not count
    /// against the parlamentarian
    AusenciaNaoEsperada = 1,
    /// Absent from an event of a commission they sit on, or from the
    /// plenary
    AusenciaEsperada = 2,
    /// Absent from an event the house individually forecast them at
    AusenciaPrevista = 3,
}

impl Presenca {
    /// Integer wire code (0-3)
    pub fn codigo(&self) -> u8 {
        *self as u8
    }

    /// Whether this is an absence the parlamentarian was expected at
    /// (code >= 2)
    pub fn ausencia_esperada(&self) -> bool {
        self.codigo() >= 2
    }
}

impl From<Presenca> for u8 {
    fn from(p: Presenca) -> u8 {
        p.codigo()
    }
}

impl TryFrom<u8> for Presenca {
    type Error = String;

    fn try_from(codigo: u8) -> Result<Self, Self::Error> {
        match codigo {
            0 => Ok(Presenca::Presente),
            1 => Ok(Presenca::AusenciaNaoEsperada),
            2 => Ok(Presenca::AusenciaEsperada),
            3 => Ok(Presenca::AusenciaPrevista),
            other => Err(format!("Invalid presence code: {}", other)),
        }
    }
}

/// A session, meeting or plenary occurrence within a house.
///
/// Built by an adapter from the provider's raw record with `presenca`
/// unset; the classifier stamps the presence state once via
/// [`Evento::classificar`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evento {
    pub id: String,
    pub nome: String,
    #[serde(rename = "dataInicial", with = "formato::data_hora_br_opt", default)]
    pub data_inicial: Option<NaiveDateTime>,
    #[serde(rename = "dataFinal", with = "formato::data_hora_br_opt", default)]
    pub data_final: Option<NaiveDateTime>,
    /// Status text, free-form per source ("Encerrada", "Cancelada", ...)
    pub situacao: String,
    pub url: Option<String>,
    pub orgaos: Vec<Orgao>,
    /// Agenda items (propositions) attached to the event
    pub pautas: Vec<Proposicao>,
    /// Presence classification; `None` only before classification
    pub presenca: Option<Presenca>,
}

impl Evento {
    /// Stamp the presence state. Events reach the classifier unset;
    /// stamping an already-classified event is a logic bug.
    pub fn classificar(mut self, presenca: Presenca) -> Self {
        debug_assert!(
            self.presenca.is_none(),
            "event {} classified twice",
            self.id
        );
        self.presenca = Some(presenca);
        self
    }

    /// Primary organ of the event (first attached organ)
    pub fn orgao_principal(&self) -> Option<&Orgao> {
        self.orgaos.first()
    }
}
