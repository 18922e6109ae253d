//! Câmara dos Deputados open-data provider
//!
//! JSON API; every payload arrives under a `dados` wrapper. Entities
//! use numeric ids and ISO `YYYY-MM-DDTHH:MM` datetimes. This is the
//! only source with an individually-forecast event feed (the events a
//! deputy is expected at) and per-proposition roll-call records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{get_json, ProviderError};

/// Payload wrapper used by every endpoint of the API
#[derive(Debug, Deserialize)]
struct Dados<T> {
    dados: T,
}

/// Deputy record, also the shape of per-event attendee listings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeputadoCamara {
    pub id: u64,
    pub nome: String,
    #[serde(rename = "siglaPartido")]
    pub sigla_partido: Option<String>,
    #[serde(rename = "siglaUf")]
    pub sigla_uf: Option<String>,
    #[serde(rename = "urlFoto")]
    pub url_foto: Option<String>,
}

/// Organ as attached to events and to a deputy's membership listing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrgaoCamara {
    pub nome: Option<String>,
    pub sigla: Option<String>,
    pub apelido: Option<String>,
    /// Role of the deputy within the organ (membership listing only)
    pub titulo: Option<String>,
}

/// Event record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventoCamara {
    pub id: u64,
    #[serde(rename = "dataHoraInicio")]
    pub data_hora_inicio: Option<String>,
    #[serde(rename = "dataHoraFim")]
    pub data_hora_fim: Option<String>,
    #[serde(rename = "descricaoTipo")]
    pub descricao_tipo: Option<String>,
    pub descricao: Option<String>,
    pub situacao: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub orgaos: Vec<OrgaoCamara>,
}

/// One roll call the deputy took part in (or was expected to)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VotacaoCamara {
    pub id: String,
    pub data: Option<String>,
    /// Agenda item text the proposition was voted under
    #[serde(rename = "descricaoItemPauta")]
    pub descricao_item_pauta: Option<String>,
    #[serde(rename = "idProposicao")]
    pub id_proposicao: Option<u64>,
    #[serde(default)]
    pub votos: Vec<VotoCamara>,
}

/// One deputy's vote within a roll call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VotoCamara {
    #[serde(rename = "idDeputado")]
    pub id_deputado: u64,
    pub voto: String,
}

/// Proposition detail record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProposicaoCamara {
    pub id: u64,
    #[serde(rename = "siglaTipo")]
    pub sigla_tipo: Option<String>,
    pub numero: Option<u64>,
    pub ementa: Option<String>,
    #[serde(rename = "dataApresentacao")]
    pub data_apresentacao: Option<String>,
    #[serde(rename = "urlInteiroTeor")]
    pub url_inteiro_teor: Option<String>,
    #[serde(rename = "uriAutores")]
    pub uri_autores: Option<String>,
}

/// Fetches the Câmara adapter needs. The HTTP implementation is
/// [`CamaraHttp`]; tests provide in-memory fakes.
#[async_trait]
pub trait CamaraProvider: Send + Sync {
    async fn obter_deputado(&self, id: &str) -> Result<Option<DeputadoCamara>, ProviderError>;

    async fn listar_deputados(&self) -> Result<Vec<DeputadoCamara>, ProviderError>;

    /// Current commission memberships of a deputy
    async fn orgaos_do_deputado(&self, id: &str) -> Result<Vec<OrgaoCamara>, ProviderError>;

    /// Every event of the house in the window (ISO date bounds)
    async fn eventos_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError>;

    /// Recorded attendee list of one event. Fetched per event; there
    /// is no batch endpoint, which makes this the dominant cost of a
    /// report.
    async fn deputados_no_evento(
        &self,
        evento_id: &str,
    ) -> Result<Vec<DeputadoCamara>, ProviderError>;

    /// Events the house individually forecast this deputy at
    async fn eventos_previstos(
        &self,
        id: &str,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError>;

    /// Roll calls within the window carrying this deputy's votes
    async fn votacoes_do_deputado(
        &self,
        id: &str,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<VotacaoCamara>, ProviderError>;

    /// Proposition detail for one roll call
    async fn obter_proposicao(&self, id: u64) -> Result<ProposicaoCamara, ProviderError>;
}

/// reqwest-backed [`CamaraProvider`]
pub struct CamaraHttp {
    client: reqwest::Client,
    base_url: String,
}

impl CamaraHttp {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            client: super::http_client(timeout_secs)?,
            base_url,
        })
    }
}

#[async_trait]
impl CamaraProvider for CamaraHttp {
    async fn obter_deputado(&self, id: &str) -> Result<Option<DeputadoCamara>, ProviderError> {
        let url = format!("{}/deputados/{}", self.base_url, id);
        match get_json::<Dados<DeputadoCamara>>(&self.client, &url).await {
            Ok(d) => Ok(Some(d.dados)),
            // Unknown id is a soft miss, not a provider failure
            Err(ProviderError::Api(404, _)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn listar_deputados(&self) -> Result<Vec<DeputadoCamara>, ProviderError> {
        let url = format!("{}/deputados?ordenarPor=nome", self.base_url);
        Ok(get_json::<Dados<Vec<DeputadoCamara>>>(&self.client, &url)
            .await?
            .dados)
    }

    async fn orgaos_do_deputado(&self, id: &str) -> Result<Vec<OrgaoCamara>, ProviderError> {
        let url = format!("{}/deputados/{}/orgaos", self.base_url, id);
        Ok(get_json::<Dados<Vec<OrgaoCamara>>>(&self.client, &url)
            .await?
            .dados)
    }

    async fn eventos_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError> {
        let url = format!(
            "{}/eventos?dataInicio={}&dataFim={}&itens=100",
            self.base_url, inicio, fim
        );
        Ok(get_json::<Dados<Vec<EventoCamara>>>(&self.client, &url)
            .await?
            .dados)
    }

    async fn deputados_no_evento(
        &self,
        evento_id: &str,
    ) -> Result<Vec<DeputadoCamara>, ProviderError> {
        let url = format!("{}/eventos/{}/deputados", self.base_url, evento_id);
        Ok(get_json::<Dados<Vec<DeputadoCamara>>>(&self.client, &url)
            .await?
            .dados)
    }

    async fn eventos_previstos(
        &self,
        id: &str,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError> {
        let url = format!(
            "{}/deputados/{}/eventos?dataInicio={}&dataFim={}",
            self.base_url, id, inicio, fim
        );
        Ok(get_json::<Dados<Vec<EventoCamara>>>(&self.client, &url)
            .await?
            .dados)
    }

    async fn votacoes_do_deputado(
        &self,
        id: &str,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<VotacaoCamara>, ProviderError> {
        let url = format!(
            "{}/deputados/{}/votacoes?dataInicio={}&dataFim={}",
            self.base_url, id, inicio, fim
        );
        Ok(get_json::<Dados<Vec<VotacaoCamara>>>(&self.client, &url)
            .await?
            .dados)
    }

    async fn obter_proposicao(&self, id: u64) -> Result<ProposicaoCamara, ProviderError> {
        let url = format!("{}/proposicoes/{}", self.base_url, id);
        Ok(get_json::<Dados<ProposicaoCamara>>(&self.client, &url)
            .await?
            .dados)
    }
}
