//! Câmara Municipal de São Paulo report adapter
//!
//! Quirks of this source: epoch-seconds dates that are frequently
//! missing, attendance matched by councilor name, no commission data
//! and no forecast feed. Every session is a plenary session of the
//! council, so absences are always expected (code 2) unless the
//! session record is unusable.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::adapters::CasaAdapter;
use crate::classificador::classificar_eventos;
use crate::error::{ModelError, ModelResult};
use crate::models::{
    Casa, Evento, Orgao, Parlamentar, Proposicao, Relatorio, VOTO_AUSENTE, VOTO_ERRO,
};
use crate::periodo::Periodo;
use crate::providers::cmsp::{CmspProvider, ProjetoCmsp, SessaoCmsp, VereadorCmsp};

/// Static advisory attached to every CMSP report
pub const MENSAGEM_CMSP: &str =
    "A Câmara Municipal de São Paulo não disponibiliza dados de comissões \
     nem a agenda prevista dos vereadores; o relatório cobre apenas as \
     sessões plenárias.";

/// [`CasaAdapter`] backed by the CMSP web services
pub struct CmspAdapter<P> {
    provider: P,
}

impl<P: CmspProvider> CmspAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn erro(&self, e: crate::providers::ProviderError) -> ModelError {
        ModelError::provider(Casa::Cmsp, e)
    }

    async fn resolver(&self, id: &str) -> ModelResult<Option<Parlamentar>> {
        let vereadores = self
            .provider
            .listar_vereadores()
            .await
            .map_err(|e| self.erro(e))?;
        Ok(vereadores
            .into_iter()
            .find(|v| v.chave == id)
            .map(converter_parlamentar))
    }

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

    /// Projects voted in the window with the councilor's vote on each.
    /// The per-project vote lookup is this source's soft-failure path.
    async fn proposicoes(
        &self,
        parlamentar: &Parlamentar,
        inicio: &str,
        fim: &str,
    ) -> ModelResult<Vec<Proposicao>> {
        let projetos = self
            .provider
            .projetos_no_periodo(inicio, fim)
            .await
            .map_err(|e| self.erro(e))?;

        let mut proposicoes = Vec::new();

        for projeto in projetos {
            let voto = match self
                .provider
                .voto_do_vereador(&projeto.chave, &parlamentar.id)
                .await
            {
                Ok(Some(voto)) => voto,
                Ok(None) => VOTO_AUSENTE.to_string(),
                Err(e) => {
                    // Absorbed locally: sentinel vote, report goes on
                    warn!(projeto = %projeto.chave, erro = %e, "Vote lookup failed");
                    VOTO_ERRO.to_string()
                }
            };

            proposicoes.push(converter_proposicao(projeto, voto));
        }

        Ok(proposicoes)
    }
}

#[async_trait]
impl<P: CmspProvider> CasaAdapter for CmspAdapter<P> {
    fn casa(&self) -> Casa {
        Casa::Cmsp
    }

    async fn obter_parlamentar(&self, id: &str) -> ModelResult<Option<Parlamentar>> {
        self.resolver(id).await
    }

    async fn obter_parlamentares(&self) -> ModelResult<Vec<Parlamentar>> {
        let vereadores = self
            .provider
            .listar_vereadores()
            .await
            .map_err(|e| self.erro(e))?;
        Ok(vereadores.into_iter().map(converter_parlamentar).collect())
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
            .ok_or_else(|| ModelError::NaoEncontrado(format!("SPM/{}", id)))?;

        let periodo = Periodo::calcular(data_final, dias);
        let (inicio, fim) = periodo.formato_iso();
        info!(id, inicio = %inicio, fim = %fim, "Generating CMSP report");

        let eventos: Vec<Evento> = self
            .provider
            .sessoes_no_periodo(&inicio, &fim)
            .await
            .map_err(|e| self.erro(e))?
            .into_iter()
            .map(converter_evento)
            .collect();

        let presentes_ids = self.sessoes_presentes(&parlamentar, &eventos).await?;

        // No commission data and no forecast feed on this source
        let previstos_ids = HashSet::new();
        let comissoes = HashSet::new();

        let classificacao =
            classificar_eventos(eventos, &presentes_ids, &previstos_ids, &comissoes);

        let proposicoes = self.proposicoes(&parlamentar, &inicio, &fim).await?;

        Ok(Relatorio::montar(
            parlamentar,
            periodo.data_inicial,
            periodo.data_final,
            Some(MENSAGEM_CMSP.to_string()),
            vec![],
            proposicoes,
            classificacao,
        ))
    }
}

fn converter_parlamentar(v: VereadorCmsp) -> Parlamentar {
    Parlamentar {
        id: v.chave,
        nome: v.nome,
        partido: v.partido,
        uf: Some("SP".to_string()),
        foto: v.url_foto,
        cargo: Casa::Cmsp,
    }
}

fn converter_evento(s: SessaoCmsp) -> Evento {
    Evento {
        id: s.chave,
        nome: s.nome,
        data_inicial: s.inicio.and_then(data_epoch),
        data_final: s.fim.and_then(data_epoch),
        situacao: s.situacao.unwrap_or_default(),
        url: None,
        // Council sessions are plenary sessions; absences count as
        // expected via the PLEN rule
        orgaos: vec![Orgao {
            nome: "Plenário".to_string(),
            sigla: "PLEN".to_string(),
            cargo: None,
            apelido: "PLEN".to_string(),
        }],
        pautas: vec![],
        presenca: None,
    }
}

fn converter_proposicao(p: ProjetoCmsp, voto: String) -> Proposicao {
    Proposicao {
        id: p.chave,
        tipo: p.tipo.unwrap_or_default(),
        numero: match (&p.numero, p.ano) {
            (Some(numero), Some(ano)) => format!("{}/{}", numero, ano),
            (Some(numero), None) => numero.clone(),
            _ => String::new(),
        },
        ementa: p.ementa.unwrap_or_default(),
        data_apresentacao: p.data.and_then(data_epoch).map(|dt| dt.date()),
        url_documento: None,
        url_autores: None,
        voto: Some(voto),
        pauta: p.pauta.unwrap_or_default(),
    }
}

/// Epoch seconds to naive datetime; out-of-range values are dropped
/// like missing ones
fn data_epoch(segundos: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(segundos, 0).map(|dt| dt.naive_utc())
}
