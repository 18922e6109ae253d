//! Câmara Municipal de São Paulo open-data provider
//!
//! JSON service with its own quirks: record keys are `chave` strings,
//! dates travel as epoch seconds and are frequently missing or null,
//! and attendance is recorded by councilor name. No forecast feed, no
//! commission data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{get_json, ProviderError};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VereadorCmsp {
    pub chave: String,
    pub nome: String,
    pub partido: Option<String>,
    #[serde(rename = "urlFoto")]
    pub url_foto: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessaoCmsp {
    pub chave: String,
    pub nome: String,
    pub tipo: Option<String>,
    /// Epoch seconds; missing or null for sessions still being keyed in
    pub inicio: Option<i64>,
    pub fim: Option<i64>,
    pub situacao: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjetoCmsp {
    pub chave: String,
    pub tipo: Option<String>,
    pub numero: Option<String>,
    pub ano: Option<u32>,
    pub ementa: Option<String>,
    /// Presentation date, epoch seconds
    pub data: Option<i64>,
    pub pauta: Option<String>,
}

/// Fetches the CMSP adapter needs
#[async_trait]
pub trait CmspProvider: Send + Sync {
    async fn listar_vereadores(&self) -> Result<Vec<VereadorCmsp>, ProviderError>;

    /// Sessions in the window (ISO date bounds)
    async fn sessoes_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<SessaoCmsp>, ProviderError>;

    /// Names of the councilors recorded present at one session
    async fn presencas_na_sessao(&self, chave: &str) -> Result<Vec<String>, ProviderError>;

    /// Projects voted in the window
    async fn projetos_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<ProjetoCmsp>, ProviderError>;

    /// One councilor's vote on one project, when recorded
    async fn voto_do_vereador(
        &self,
        chave_projeto: &str,
        chave_vereador: &str,
    ) -> Result<Option<String>, ProviderError>;
}

/// reqwest-backed [`CmspProvider`]
pub struct CmspHttp {
    client: reqwest::Client,
    base_url: String,
}

impl CmspHttp {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            client: super::http_client(timeout_secs)?,
            base_url,
        })
    }
}

#[async_trait]
impl CmspProvider for CmspHttp {
    async fn listar_vereadores(&self) -> Result<Vec<VereadorCmsp>, ProviderError> {
        let url = format!("{}/ws/VereadoresCMSPV2.asmx/VereadoresJSON", self.base_url);
        get_json(&self.client, &url).await
    }

    async fn sessoes_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<SessaoCmsp>, ProviderError> {
        let url = format!(
            "{}/ws/SessoesCMSPV2.asmx/SessoesJSON?inicio={}&fim={}",
            self.base_url, inicio, fim
        );
        get_json(&self.client, &url).await
    }

    async fn presencas_na_sessao(&self, chave: &str) -> Result<Vec<String>, ProviderError> {
        let url = format!(
            "{}/ws/SessoesCMSPV2.asmx/PresencaJSON?chave={}",
            self.base_url, chave
        );
        get_json(&self.client, &url).await
    }

    async fn projetos_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<ProjetoCmsp>, ProviderError> {
        let url = format!(
            "{}/ws/ProjetosCMSPV2.asmx/ProjetosVotadosJSON?inicio={}&fim={}",
            self.base_url, inicio, fim
        );
        get_json(&self.client, &url).await
    }

    async fn voto_do_vereador(
        &self,
        chave_projeto: &str,
        chave_vereador: &str,
    ) -> Result<Option<String>, ProviderError> {
        let url = format!(
            "{}/ws/ProjetosCMSPV2.asmx/VotoJSON?chaveProjeto={}&chaveVereador={}",
            self.base_url, chave_projeto, chave_vereador
        );
        match get_json::<Option<String>>(&self.client, &url).await {
            Ok(voto) => Ok(voto),
            Err(ProviderError::Api(404, _)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
