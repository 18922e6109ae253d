//! Parlamentarian identity

use serde::{Deserialize, Serialize};

use super::Casa;

/// Identity of a politician as captured from its house's provider.
///
/// Immutable once embedded into a report; looked up fresh per report
/// generation, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parlamentar {
    /// Source-specific identifier (numeric for the Câmara, registry
    /// codes elsewhere); kept as a string throughout
    pub id: String,
    pub nome: String,
    pub partido: Option<String>,
    /// State/region (UF) the parlamentarian represents
    pub uf: Option<String>,
    /// Photo URL, when the source publishes one
    pub foto: Option<String>,
    /// House identifier
    pub cargo: Casa,
}

impl Parlamentar {
    /// Case-insensitive name comparison, used by sources that record
    /// attendance by name instead of id. Unicode-aware: published
    /// names are frequently all-uppercase with accents kept.
    pub fn mesmo_nome(&self, nome: &str) -> bool {
        self.nome.trim().to_lowercase() == nome.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parlamentar(nome: &str) -> Parlamentar {
        Parlamentar {
            id: "10592".to_string(),
            nome: nome.to_string(),
            partido: Some("XYZ".to_string()),
            uf: Some("SP".to_string()),
            foto: None,
            cargo: Casa::Alesp,
        }
    }

    #[test]
    fn test_mesmo_nome_ignores_case_and_whitespace() {
        let p = parlamentar("Maria da Silva");
        assert!(p.mesmo_nome("MARIA DA SILVA"));
        assert!(p.mesmo_nome("  maria da silva "));
        assert!(!p.mesmo_nome("Maria da Costa"));
    }

    #[test]
    fn test_mesmo_nome_folds_accented_uppercase() {
        let p = parlamentar("João Conceição");
        assert!(p.mesmo_nome("JOÃO CONCEIÇÃO"));
    }
}
