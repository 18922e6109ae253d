//! ALESP report adapter
//!
//! Quirks of this source: attendance is matched by parlamentarian
//! name (case-insensitive), session bounds are raw datetimes, there is
//! no forecast feed, and committee session data simply doesn't exist;
//! every report carries the advisory saying so.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::adapters::CasaAdapter;
use crate::classificador::{self, classificar_eventos};
use crate::error::{ModelError, ModelResult};
use crate::models::{Casa, Evento, Orgao, Parlamentar, Proposicao, Relatorio, VOTO_AUSENTE};
use crate::periodo::Periodo;
use crate::providers::alesp::{AlespProvider, DeputadoAlesp, SessaoAlesp};

/// Static advisory attached to every ALESP report
pub const MENSAGEM_ALESP: &str =
    "A ALESP não disponibiliza dados de sessões de comissões; \
     o relatório considera apenas as sessões publicadas no repositório.";

/// [`CasaAdapter`] backed by the ALESP XML repository
pub struct AlespAdapter<P> {
    provider: P,
}

impl<P: AlespProvider> AlespAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn erro(&self, e: crate::providers::ProviderError) -> ModelError {
        ModelError::provider(Casa::Alesp, e)
    }

    /// Resolve a deputy by id against the full roster. Zero or
    /// multiple matches are a soft `None`: ambiguous source data must
    /// not crash a lookup.
    async fn resolver(&self, id: &str) -> ModelResult<Option<Parlamentar>> {
        let deputados = self
            .provider
            .listar_deputados()
            .await
            .map_err(|e| self.erro(e))?;

        let mut encontrados = deputados.into_iter().filter(|d| d.id_deputado == id);
        let primeiro = encontrados.next();
        if encontrados.next().is_some() {
            debug!(id, "Ambiguous deputy id in ALESP roster");
            return Ok(None);
        }
        Ok(primeiro.map(converter_parlamentar))
    }

    /// Session ids where the deputy's name appears in the attendance
    /// record. One fetch per session.
    async fn sessoes_presentes(
        &self,
        parlamentar: &Parlamentar,
        eventos: &[Evento],
    ) -> ModelResult<HashSet<String>> {
        let mut presentes = HashSet::new();

        for evento in eventos {
            let nomes = self
                .provider
                .presencas_na_sessao(&evento.id)
                .await
                .map_err(|e| self.erro(e))?;

            if nomes.iter().any(|n| parlamentar.mesmo_nome(n)) {
                presentes.insert(evento.id.clone());
            }
        }

        Ok(presentes)
    }
}

#[async_trait]
impl<P: AlespProvider> CasaAdapter for AlespAdapter<P> {
    fn casa(&self) -> Casa {
        Casa::Alesp
    }

    async fn obter_parlamentar(&self, id: &str) -> ModelResult<Option<Parlamentar>> {
        self.resolver(id).await
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
            .resolver(id)
            .await?
            .ok_or_else(|| ModelError::NaoEncontrado(format!("SP/{}", id)))?;

        let periodo = Periodo::calcular(data_final, dias);
        let (inicio, fim) = periodo.intervalo();
        info!(id, inicio = %inicio, fim = %fim, "Generating ALESP report");

        let orgaos: Vec<Orgao> = self
            .provider
            .comissoes_do_deputado(id)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(|c| Orgao {
                apelido: c.sigla.clone().unwrap_or_default(),
                nome: c.nome,
                sigla: c.sigla.unwrap_or_default(),
                cargo: c.cargo,
            })
            .collect();

        let comissoes: HashSet<String> = orgaos
            .iter()
            .map(|o| classificador::normalizar_nome(&o.nome))
            .collect();

        let eventos: Vec<Evento> = self
            .provider
            .sessoes_no_intervalo(inicio, fim)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(converter_evento)
            .collect();

        let presentes_ids = self.sessoes_presentes(&parlamentar, &eventos).await?;

        // No forecast feed on this source; code 3 never applies
        let previstos_ids = HashSet::new();

        let classificacao =
            classificar_eventos(eventos, &presentes_ids, &previstos_ids, &comissoes);

        let proposicoes: Vec<Proposicao> = self
            .provider
            .votacoes_do_deputado(id, inicio, fim)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(|v| Proposicao {
                id: v.id_documento,
                tipo: v.tipo.unwrap_or_default(),
                ementa: v.ementa.unwrap_or_default(),
                numero: v.numero.unwrap_or_default(),
                data_apresentacao: v.data.map(|d| d.date()),
                url_documento: None,
                url_autores: None,
                voto: Some(v.voto.unwrap_or_else(|| VOTO_AUSENTE.to_string())),
                pauta: v.pauta.unwrap_or_default(),
            })
            .collect();

        Ok(Relatorio::montar(
            parlamentar,
            periodo.data_inicial,
            periodo.data_final,
            Some(MENSAGEM_ALESP.to_string()),
            orgaos,
            proposicoes,
            classificacao,
        ))
    }
}

fn converter_parlamentar(d: DeputadoAlesp) -> Parlamentar {
    Parlamentar {
        id: d.id_deputado,
        nome: d.nome_parlamentar,
        partido: d.partido,
        uf: Some("SP".to_string()),
        foto: d.url_foto,
        cargo: Casa::Alesp,
    }
}

fn converter_evento(s: SessaoAlesp) -> Evento {
    let orgaos = match (&s.orgao, &s.sigla_orgao) {
        (None, None) => vec![],
        (orgao, sigla) => vec![Orgao {
            nome: orgao.clone().unwrap_or_default(),
            sigla: sigla.clone().unwrap_or_default(),
            cargo: None,
            apelido: sigla.clone().unwrap_or_default(),
        }],
    };

    Evento {
        id: s.id_sessao,
        nome: s.nome,
        data_inicial: s.data,
        data_final: None,
        situacao: s.situacao.unwrap_or_default(),
        url: None,
        orgaos,
        pautas: vec![],
        presenca: None,
    }
}
