//! Câmara dos Deputados report adapter
//!
//! Quirks of this source: attendees are matched by numeric id, event
//! datetimes are ISO strings, the individually-forecast feed exists
//! (and feeds the code-3 classification), and votes come from
//! roll-call records with a per-proposition detail lookup that fails
//! often enough to deserve the soft `ERROR` sentinel path.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::adapters::CasaAdapter;
use crate::classificador::{self, classificar_eventos};
use crate::error::{ModelError, ModelResult};
use crate::models::{
    Casa, Evento, Orgao, Parlamentar, Proposicao, Relatorio, VOTO_AUSENTE, VOTO_ERRO,
};
use crate::periodo::Periodo;
use crate::providers::camara::{
    CamaraProvider, DeputadoCamara, EventoCamara, OrgaoCamara, VotacaoCamara,
};

/// Static advisory attached to every Câmara report
pub const MENSAGEM_CAMARA: &str =
    "A Câmara dos Deputados não publica a pauta de todos os eventos; \
     algumas proposições podem aparecer sem detalhes.";

/// [`CasaAdapter`] backed by the Câmara open-data provider
pub struct CamaraAdapter<P> {
    provider: P,
}

impl<P: CamaraProvider> CamaraAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn erro(&self, e: crate::providers::ProviderError) -> ModelError {
        ModelError::provider(Casa::Camara, e)
    }

    /// Ids of the events the deputy actually attended. One attendee
    /// fetch per event; no batch endpoint exists, this loop dominates
    /// the cost of a report.
    async fn eventos_presentes(
        &self,
        parlamentar: &Parlamentar,
        eventos: &[Evento],
    ) -> ModelResult<HashSet<String>> {
        let mut presentes = HashSet::new();

        for evento in eventos {
            let participantes = self
                .provider
                .deputados_no_evento(&evento.id)
                .await
                .map_err(|e| self.erro(e))?;

            if participantes
                .iter()
                .any(|d| d.id.to_string() == parlamentar.id)
            {
                presentes.insert(evento.id.clone());
            }
        }

        debug!(
            presentes = presentes.len(),
            eventos = eventos.len(),
            "Attendance resolved for Câmara events"
        );
        Ok(presentes)
    }

    /// Propositions voted in the window, with this deputy's vote on
    /// each. The detail lookup is the soft-failure path: a failed
    /// fetch yields a sentinel proposition, never an aborted report.
    async fn proposicoes(
        &self,
        parlamentar: &Parlamentar,
        inicio: &str,
        fim: &str,
    ) -> ModelResult<Vec<Proposicao>> {
        let votacoes = self
            .provider
            .votacoes_do_deputado(&parlamentar.id, inicio, fim)
            .await
            .map_err(|e| self.erro(e))?;

        let mut proposicoes = Vec::new();

        for votacao in votacoes {
            let id_proposicao = match votacao.id_proposicao {
                Some(id) => id,
                None => {
                    debug!(votacao = %votacao.id, "Roll call without proposition, skipping");
                    continue;
                }
            };

            let voto = voto_do_deputado(&votacao, &parlamentar.id);
            let pauta = votacao.descricao_item_pauta.clone().unwrap_or_default();

            match self.provider.obter_proposicao(id_proposicao).await {
                Ok(detalhe) => proposicoes.push(Proposicao {
                    id: detalhe.id.to_string(),
                    tipo: detalhe.sigla_tipo.unwrap_or_default(),
                    ementa: detalhe.ementa.unwrap_or_default(),
                    numero: detalhe.numero.map(|n| n.to_string()).unwrap_or_default(),
                    data_apresentacao: detalhe
                        .data_apresentacao
                        .as_deref()
                        .and_then(data_iso),
                    url_documento: detalhe.url_inteiro_teor,
                    url_autores: detalhe.uri_autores,
                    voto: Some(voto),
                    pauta,
                }),
                Err(e) => {
                    // Absorbed locally: sentinel values, report goes on
                    warn!(proposicao = id_proposicao, erro = %e, "Proposition detail failed");
                    proposicoes.push(Proposicao {
                        id: id_proposicao.to_string(),
                        tipo: String::new(),
                        ementa: String::new(),
                        numero: String::new(),
                        data_apresentacao: None,
                        url_documento: None,
                        url_autores: None,
                        voto: Some(VOTO_ERRO.to_string()),
                        pauta,
                    });
                }
            }
        }

        Ok(proposicoes)
    }
}

#[async_trait]
impl<P: CamaraProvider> CasaAdapter for CamaraAdapter<P> {
    fn casa(&self) -> Casa {
        Casa::Camara
    }

    async fn obter_parlamentar(&self, id: &str) -> ModelResult<Option<Parlamentar>> {
        let deputado = self
            .provider
            .obter_deputado(id)
            .await
            .map_err(|e| self.erro(e))?;
        Ok(deputado.map(converter_parlamentar))
    }

    async fn obter_parlamentares(&self) -> ModelResult<Vec<Parlamentar>> {
        let deputados = self
            .provider
            .listar_deputados()
            .await
            .map_err(|e| self.erro(e))?;
        Ok(deputados.into_iter().map(converter_parlamentar).collect())
    }

    async fn obter_relatorio(
        &self,
        id: &str,
        data_final: NaiveDate,
        dias: i64,
    ) -> ModelResult<Relatorio> {
        let parlamentar = self
            .obter_parlamentar(id)
            .await?
            .ok_or_else(|| ModelError::NaoEncontrado(format!("BR1/{}", id)))?;

        let periodo = Periodo::calcular(data_final, dias);
        let (inicio, fim) = periodo.formato_iso();
        info!(id, inicio = %inicio, fim = %fim, "Generating Câmara report");

        let orgaos: Vec<Orgao> = self
            .provider
            .orgaos_do_deputado(id)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(converter_orgao)
            .collect();

        let comissoes: HashSet<String> = orgaos
            .iter()
            .map(|o| classificador::normalizar_nome(&o.nome))
            .collect();

        let eventos: Vec<Evento> = self
            .provider
            .eventos_no_periodo(&inicio, &fim)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(converter_evento)
            .collect();

        let presentes_ids = self.eventos_presentes(&parlamentar, &eventos).await?;

        let previstos_ids: HashSet<String> = self
            .provider
            .eventos_previstos(id, &inicio, &fim)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();

        let classificacao =
            classificar_eventos(eventos, &presentes_ids, &previstos_ids, &comissoes);

        let proposicoes = self.proposicoes(&parlamentar, &inicio, &fim).await?;

        Ok(Relatorio::montar(
            parlamentar,
            periodo.data_inicial,
            periodo.data_final,
            Some(MENSAGEM_CAMARA.to_string()),
            orgaos,
            proposicoes,
            classificacao,
        ))
    }
}

fn converter_parlamentar(d: DeputadoCamara) -> Parlamentar {
    Parlamentar {
        id: d.id.to_string(),
        nome: d.nome,
        partido: d.sigla_partido,
        uf: d.sigla_uf,
        foto: d.url_foto,
        cargo: Casa::Camara,
    }
}

fn converter_orgao(o: OrgaoCamara) -> Orgao {
    Orgao {
        nome: o.nome.unwrap_or_default(),
        sigla: o.sigla.unwrap_or_default(),
        cargo: o.titulo,
        apelido: o.apelido.unwrap_or_default(),
    }
}

fn converter_evento(e: EventoCamara) -> Evento {
    Evento {
        id: e.id.to_string(),
        nome: e
            .descricao_tipo
            .or(e.descricao)
            .unwrap_or_else(|| format!("Evento {}", e.id)),
        data_inicial: e.data_hora_inicio.as_deref().and_then(data_hora_iso),
        data_final: e.data_hora_fim.as_deref().and_then(data_hora_iso),
        situacao: e.situacao.unwrap_or_default(),
        url: e.uri,
        orgaos: e.orgaos.into_iter().map(converter_orgao).collect(),
        pautas: vec![],
        presenca: None,
    }
}

/// The API serves datetimes with and without seconds
fn data_hora_iso(texto: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(texto, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(texto, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn data_iso(texto: &str) -> Option<NaiveDate> {
    // Provider-supplied text; a slice landing inside a multi-byte
    // character must degrade to a failed parse, not a panic
    let data = texto.get(..10).unwrap_or(texto);
    NaiveDate::parse_from_str(data, "%Y-%m-%d").ok()
}

/// The deputy's vote in a roll call, or the absent sentinel when they
/// are missing from it
fn voto_do_deputado(votacao: &VotacaoCamara, id: &str) -> String {
    votacao
        .votos
        .iter()
        .find(|v| v.id_deputado.to_string() == id)
        .map(|v| v.voto.clone())
        .unwrap_or_else(|| VOTO_AUSENTE.to_string())
}
