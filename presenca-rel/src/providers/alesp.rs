//! ALESP (Assembleia Legislativa de São Paulo) open-data provider
//!
//! The repository serves flat XML documents (one element per record).
//! There is no server-side date filter, so listings are fetched whole
//! and filtered locally against raw datetime bounds. Attendance is
//! recorded by parlamentarian *name*, not id, and there is no
//! individually-forecast event feed.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

use super::{get_text, ProviderError};

/// Datetime format used inside the XML records
const FORMATO_DATA_ALESP: &str = "%d/%m/%Y %H:%M";

#[derive(Debug, Clone)]
pub struct DeputadoAlesp {
    pub id_deputado: String,
    pub nome_parlamentar: String,
    pub partido: Option<String>,
    pub url_foto: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessaoAlesp {
    pub id_sessao: String,
    pub nome: String,
    pub data: Option<NaiveDateTime>,
    pub situacao: Option<String>,
    /// Organ the session belongs to, as published
    pub orgao: Option<String>,
    pub sigla_orgao: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ComissaoAlesp {
    pub nome: String,
    pub sigla: Option<String>,
    /// Efetivo/suplente role of the deputy in the commission
    pub cargo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VotacaoAlesp {
    pub id_documento: String,
    pub tipo: Option<String>,
    pub numero: Option<String>,
    pub ementa: Option<String>,
    pub data: Option<NaiveDateTime>,
    /// The deputy's vote as published, free text
    pub voto: Option<String>,
    pub pauta: Option<String>,
}

/// Fetches the ALESP adapter needs
#[async_trait]
pub trait AlespProvider: Send + Sync {
    /// Full current roster; single-deputy lookup is a local filter
    async fn listar_deputados(&self) -> Result<Vec<DeputadoAlesp>, ProviderError>;

    /// Sessions within raw datetime bounds (no string date filter on
    /// this source)
    async fn sessoes_no_intervalo(
        &self,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<Vec<SessaoAlesp>, ProviderError>;

    /// Names of the parlamentarians recorded present at one session
    async fn presencas_na_sessao(&self, id_sessao: &str) -> Result<Vec<String>, ProviderError>;

    async fn comissoes_do_deputado(&self, id: &str) -> Result<Vec<ComissaoAlesp>, ProviderError>;

    async fn votacoes_do_deputado(
        &self,
        id: &str,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<Vec<VotacaoAlesp>, ProviderError>;
}

/// reqwest-backed [`AlespProvider`] reading the XML repository
pub struct AlespHttp {
    client: reqwest::Client,
    base_url: String,
}

impl AlespHttp {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            client: super::http_client(timeout_secs)?,
            base_url,
        })
    }
}

#[async_trait]
impl AlespProvider for AlespHttp {
    async fn listar_deputados(&self) -> Result<Vec<DeputadoAlesp>, ProviderError> {
        let url = format!("{}/deputados/deputados.xml", self.base_url);
        let xml = get_text(&self.client, &url).await?;
        let registros = registros(&xml, "Deputado")?;

        Ok(registros
            .into_iter()
            .filter_map(|r| {
                Some(DeputadoAlesp {
                    id_deputado: r.get("IdDeputado")?.clone(),
                    nome_parlamentar: r.get("NomeParlamentar")?.clone(),
                    partido: r.get("Partido").cloned(),
                    url_foto: r.get("PathFoto").cloned(),
                })
            })
            .collect())
    }

    async fn sessoes_no_intervalo(
        &self,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<Vec<SessaoAlesp>, ProviderError> {
        let url = format!("{}/processo_legislativo/sessoes.xml", self.base_url);
        let xml = get_text(&self.client, &url).await?;
        let registros = registros(&xml, "Sessao")?;

        Ok(registros
            .into_iter()
            .filter_map(|r| {
                let data = r.get("Data").and_then(|d| data_alesp(d));
                Some(SessaoAlesp {
                    id_sessao: r.get("IdSessao")?.clone(),
                    nome: r.get("Nome").cloned().unwrap_or_default(),
                    data,
                    situacao: r.get("Situacao").cloned(),
                    orgao: r.get("Orgao").cloned(),
                    sigla_orgao: r.get("SiglaOrgao").cloned(),
                })
            })
            // No server-side filter: trim to the window locally
            .filter(|s| s.data.map(|d| d >= inicio && d <= fim).unwrap_or(false))
            .collect())
    }

    async fn presencas_na_sessao(&self, id_sessao: &str) -> Result<Vec<String>, ProviderError> {
        let url = format!(
            "{}/processo_legislativo/presencas.xml?idSessao={}",
            self.base_url, id_sessao
        );
        let xml = get_text(&self.client, &url).await?;
        let registros = registros(&xml, "Presenca")?;

        Ok(registros
            .into_iter()
            .filter_map(|r| r.get("NomeParlamentar").cloned())
            .collect())
    }

    async fn comissoes_do_deputado(&self, id: &str) -> Result<Vec<ComissaoAlesp>, ProviderError> {
        let url = format!(
            "{}/processo_legislativo/comissoes_membros.xml?idDeputado={}",
            self.base_url, id
        );
        let xml = get_text(&self.client, &url).await?;
        let registros = registros(&xml, "Comissao")?;

        Ok(registros
            .into_iter()
            .filter_map(|r| {
                Some(ComissaoAlesp {
                    nome: r.get("NomeComissao")?.clone(),
                    sigla: r.get("SiglaComissao").cloned(),
                    cargo: r.get("Efetivo").cloned(),
                })
            })
            .collect())
    }

    async fn votacoes_do_deputado(
        &self,
        id: &str,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<Vec<VotacaoAlesp>, ProviderError> {
        let url = format!(
            "{}/processo_legislativo/votacoes_deputado.xml?idDeputado={}",
            self.base_url, id
        );
        let xml = get_text(&self.client, &url).await?;
        let registros = registros(&xml, "Votacao")?;

        Ok(registros
            .into_iter()
            .filter_map(|r| {
                let data = r.get("Data").and_then(|d| data_alesp(d));
                Some(VotacaoAlesp {
                    id_documento: r.get("IdDocumento")?.clone(),
                    tipo: r.get("TipoDocumento").cloned(),
                    numero: r.get("NumeroDocumento").cloned(),
                    ementa: r.get("Ementa").cloned(),
                    data,
                    voto: r.get("Voto").cloned(),
                    pauta: r.get("ItemPauta").cloned(),
                })
            })
            .filter(|v| v.data.map(|d| d >= inicio && d <= fim).unwrap_or(false))
            .collect())
    }
}

/// Parse the ALESP datetime format, tolerating date-only values
fn data_alesp(texto: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(texto.trim(), FORMATO_DATA_ALESP)
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(texto.trim(), "%d/%m/%Y")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

/// Collect every `<tag>` element of a flat XML listing into a map of
/// child-element name -> text content.
fn registros(xml: &str, tag: &str) -> Result<Vec<HashMap<String, String>>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut resultado = Vec::new();
    let mut atual: Option<HashMap<String, String>> = None;
    let mut campo: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let nome = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if nome == tag {
                    atual = Some(HashMap::new());
                } else if atual.is_some() {
                    campo = Some(nome);
                }
            }
            Ok(Event::Text(ref t)) => {
                if let (Some(registro), Some(nome)) = (atual.as_mut(), campo.as_ref()) {
                    let valor = t
                        .unescape()
                        .map_err(|e| ProviderError::Parse(e.to_string()))?
                        .into_owned();
                    registro.insert(nome.clone(), valor);
                }
            }
            Ok(Event::End(ref e)) => {
                let nome = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if nome == tag {
                    if let Some(registro) = atual.take() {
                        resultado.push(registro);
                    }
                } else if campo.as_deref() == Some(nome.as_str()) {
                    campo = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ProviderError::Parse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(resultado)
}
