//! Commission/committee snapshot

use serde::{Deserialize, Serialize};

/// Nickname sentinel identifying the full plenary. An absence from an
/// event whose organ carries this nickname always counts as expected,
/// regardless of commission membership.
pub const APELIDO_PLENARIO: &str = "PLEN";

/// A commission/committee within a house, as embedded in a report.
///
/// Exists only as a snapshot inside a [`super::Relatorio`]; there is
/// no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orgao {
    pub nome: String,
    pub sigla: String,
    /// Role/title of the parlamentarian within the organ, when known
    pub cargo: Option<String>,
    pub apelido: String,
}

impl Orgao {
    /// Whether this organ is the plenary sentinel
    pub fn e_plenario(&self) -> bool {
        self.apelido.trim() == APELIDO_PLENARIO
    }
}
