//! House (legislative body) identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three supported legislative houses.
///
/// Each house has its own data provider and report adapter; there is
/// no plug-in registry, houses are hardcoded by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Casa {
    /// Câmara dos Deputados (federal deputies)
    #[serde(rename = "BR1")]
    Camara,
    /// Assembleia Legislativa de São Paulo (state deputies)
    #[serde(rename = "SP")]
    Alesp,
    /// Câmara Municipal de São Paulo (city councilors)
    #[serde(rename = "SPM")]
    Cmsp,
}

impl Casa {
    /// Wire/persistence code for this house
    pub fn codigo(&self) -> &'static str {
        match self {
            Casa::Camara => "BR1",
            Casa::Alesp => "SP",
            Casa::Cmsp => "SPM",
        }
    }

    /// Human-readable name of the house
    pub fn nome(&self) -> &'static str {
        match self {
            Casa::Camara => "Câmara dos Deputados",
            Casa::Alesp => "Assembleia Legislativa de São Paulo",
            Casa::Cmsp => "Câmara Municipal de São Paulo",
        }
    }
}

impl fmt::Display for Casa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codigo())
    }
}

impl FromStr for Casa {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BR1" => Ok(Casa::Camara),
            "SP" => Ok(Casa::Alesp),
            "SPM" => Ok(Casa::Cmsp),
            other => Err(format!("Unknown house code: {}", other)),
        }
    }
}
