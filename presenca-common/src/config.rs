//! Configuration loading and data folder resolution
//!
//! Services resolve their settings with the usual priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the data folder (database location)
pub const ENV_DATA_FOLDER: &str = "PRESENCA_DATA_FOLDER";

/// Environment variable naming the config file
pub const ENV_CONFIG_FILE: &str = "PRESENCA_CONFIG";

/// Service configuration loaded from TOML
///
/// All fields are optional in the file; accessors apply compiled
/// defaults so a missing or partial config never blocks startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the SQLite database
    pub data_folder: Option<PathBuf>,
    /// Base URL of the Câmara dos Deputados open-data API
    pub camara_base_url: Option<String>,
    /// Base URL of the ALESP open-data service
    pub alesp_base_url: Option<String>,
    /// Base URL of the Câmara Municipal de São Paulo open-data service
    pub cmsp_base_url: Option<String>,
    /// HTTP timeout for provider calls, in seconds
    pub http_timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// Load configuration following the priority order above.
    ///
    /// A missing config file is not an error (defaults apply); a file
    /// that exists but fails to parse is, since silently ignoring it
    /// would mask operator mistakes.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = match resolve_config_path(cli_path) {
            Some(p) => p,
            None => {
                debug!("No config file found, using compiled defaults");
                return Ok(Self::default());
            }
        };

        let content = std::fs::read_to_string(&path)?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Folder holding the SQLite database, with env/default fallback
    pub fn data_folder(&self) -> PathBuf {
        if let Ok(path) = std::env::var(ENV_DATA_FOLDER) {
            return PathBuf::from(path);
        }
        if let Some(path) = &self.data_folder {
            return path.clone();
        }
        default_data_folder()
    }

    pub fn camara_base_url(&self) -> String {
        self.camara_base_url
            .clone()
            .unwrap_or_else(|| "https://dadosabertos.camara.leg.br/api/v2".to_string())
    }

    pub fn alesp_base_url(&self) -> String {
        self.alesp_base_url
            .clone()
            .unwrap_or_else(|| "https://www.al.sp.gov.br/repositorioDados".to_string())
    }

    pub fn cmsp_base_url(&self) -> String {
        self.cmsp_base_url
            .clone()
            .unwrap_or_else(|| "https://splegisws.saopaulo.sp.leg.br".to_string())
    }

    pub fn http_timeout_secs(&self) -> u64 {
        self.http_timeout_secs.unwrap_or(30)
    }
}

/// Resolve the config file path: CLI arg, then env var, then the
/// platform config directory, then the system-wide location.
fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "Config file given on command line does not exist");
        return None;
    }

    if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = dirs::config_dir() {
        let path = dir.join("presenca").join("config.toml");
        if path.exists() {
            return Some(path);
        }
    }

    let system = PathBuf::from("/etc/presenca/config.toml");
    if system.exists() {
        return Some(system);
    }

    None
}

/// Platform default for the data folder
fn default_data_folder() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("presenca"))
        .unwrap_or_else(|| PathBuf::from("./presenca-data"))
}
