//! Shared in-memory fake providers for the end-to-end report tests
//!
//! Each fake implements the provider trait its adapter orchestrates
//! against, serves fixture data, counts calls (for the idempotency
//! assertions) and can be told to fail specific sub-lookups.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use presenca_rel::providers::alesp::{
    AlespProvider, ComissaoAlesp, DeputadoAlesp, SessaoAlesp, VotacaoAlesp,
};
use presenca_rel::providers::camara::{
    CamaraProvider, DeputadoCamara, EventoCamara, OrgaoCamara, ProposicaoCamara, VotacaoCamara,
};
use presenca_rel::providers::cmsp::{CmspProvider, ProjetoCmsp, SessaoCmsp, VereadorCmsp};
use presenca_rel::providers::ProviderError;

fn falha(detalhe: &str) -> ProviderError {
    ProviderError::Api(500, detalhe.to_string())
}

// ============================================================================
// Câmara fake
// ============================================================================

#[derive(Default)]
pub struct CamaraFake {
    pub deputados: Vec<DeputadoCamara>,
    pub orgaos: Vec<OrgaoCamara>,
    pub eventos: Vec<EventoCamara>,
    /// evento id -> attendee list
    pub presencas: HashMap<String, Vec<DeputadoCamara>>,
    pub previstos: Vec<EventoCamara>,
    pub votacoes: Vec<VotacaoCamara>,
    pub proposicoes: HashMap<u64, ProposicaoCamara>,
    /// Proposition ids whose detail fetch must fail (soft path)
    pub proposicoes_com_falha: HashSet<u64>,
    /// Delay inserted into the roster lookup, to force overlap in the
    /// concurrency tests
    pub atraso_ms: u64,
    pub chamadas_eventos: Arc<AtomicUsize>,
}

impl CamaraFake {
    pub fn contagem_eventos(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.chamadas_eventos)
    }
}

#[async_trait]
impl CamaraProvider for CamaraFake {
    async fn obter_deputado(&self, id: &str) -> Result<Option<DeputadoCamara>, ProviderError> {
        if self.atraso_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.atraso_ms)).await;
        }
        Ok(self
            .deputados
            .iter()
            .find(|d| d.id.to_string() == id)
            .cloned())
    }

    async fn listar_deputados(&self) -> Result<Vec<DeputadoCamara>, ProviderError> {
        Ok(self.deputados.clone())
    }

    async fn orgaos_do_deputado(&self, _id: &str) -> Result<Vec<OrgaoCamara>, ProviderError> {
        Ok(self.orgaos.clone())
    }

    async fn eventos_no_periodo(
        &self,
        inicio: &str,
        fim: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError> {
        // The adapter must hand the period down as ISO dates
        assert!(inicio < fim, "window bounds out of order: {} {}", inicio, fim);
        self.chamadas_eventos.fetch_add(1, Ordering::SeqCst);
        Ok(self.eventos.clone())
    }

    async fn deputados_no_evento(
        &self,
        evento_id: &str,
    ) -> Result<Vec<DeputadoCamara>, ProviderError> {
        Ok(self.presencas.get(evento_id).cloned().unwrap_or_default())
    }

    async fn eventos_previstos(
        &self,
        _id: &str,
        _inicio: &str,
        _fim: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError> {
        Ok(self.previstos.clone())
    }

    async fn votacoes_do_deputado(
        &self,
        _id: &str,
        _inicio: &str,
        _fim: &str,
    ) -> Result<Vec<VotacaoCamara>, ProviderError> {
        Ok(self.votacoes.clone())
    }

    async fn obter_proposicao(&self, id: u64) -> Result<ProposicaoCamara, ProviderError> {
        if self.proposicoes_com_falha.contains(&id) {
            return Err(falha("proposition detail unavailable"));
        }
        self.proposicoes
            .get(&id)
            .cloned()
            .ok_or_else(|| falha("unknown proposition"))
    }
}

/// A provider whose every fetch fails hard
pub struct CamaraIndisponivel;

#[async_trait]
impl CamaraProvider for CamaraIndisponivel {
    async fn obter_deputado(&self, _: &str) -> Result<Option<DeputadoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn listar_deputados(&self) -> Result<Vec<DeputadoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn orgaos_do_deputado(&self, _: &str) -> Result<Vec<OrgaoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn eventos_no_periodo(
        &self,
        _: &str,
        _: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn deputados_no_evento(&self, _: &str) -> Result<Vec<DeputadoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn eventos_previstos(
        &self,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<Vec<EventoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn votacoes_do_deputado(
        &self,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<Vec<VotacaoCamara>, ProviderError> {
        Err(falha("connection refused"))
    }
    async fn obter_proposicao(&self, _: u64) -> Result<ProposicaoCamara, ProviderError> {
        Err(falha("connection refused"))
    }
}

// ============================================================================
// ALESP fake
// ============================================================================

#[derive(Default)]
pub struct AlespFake {
    pub deputados: Vec<DeputadoAlesp>,
    pub sessoes: Vec<SessaoAlesp>,
    /// sessão id -> attendee names, as published
    pub presencas: HashMap<String, Vec<String>>,
    pub comissoes: Vec<ComissaoAlesp>,
    pub votacoes: Vec<VotacaoAlesp>,
}

#[async_trait]
impl AlespProvider for AlespFake {
    async fn listar_deputados(&self) -> Result<Vec<DeputadoAlesp>, ProviderError> {
        Ok(self.deputados.clone())
    }

    async fn sessoes_no_intervalo(
        &self,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<Vec<SessaoAlesp>, ProviderError> {
        Ok(self
            .sessoes
            .iter()
            .filter(|s| s.data.map(|d| d >= inicio && d <= fim).unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn presencas_na_sessao(&self, id_sessao: &str) -> Result<Vec<String>, ProviderError> {
        Ok(self.presencas.get(id_sessao).cloned().unwrap_or_default())
    }

    async fn comissoes_do_deputado(&self, _id: &str) -> Result<Vec<ComissaoAlesp>, ProviderError> {
        Ok(self.comissoes.clone())
    }

    async fn votacoes_do_deputado(
        &self,
        _id: &str,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<Vec<VotacaoAlesp>, ProviderError> {
        Ok(self
            .votacoes
            .iter()
            .filter(|v| v.data.map(|d| d >= inicio && d <= fim).unwrap_or(true))
            .cloned()
            .collect())
    }
}

// ============================================================================
// CMSP fake
// ============================================================================

#[derive(Default)]
pub struct CmspFake {
    pub vereadores: Vec<VereadorCmsp>,
    pub sessoes: Vec<SessaoCmsp>,
    pub presencas: HashMap<String, Vec<String>>,
    pub projetos: Vec<ProjetoCmsp>,
    /// projeto chave -> vote; missing means "not recorded"
    pub votos: HashMap<String, String>,
    /// Project keys whose vote lookup must fail (soft path)
    pub votos_com_falha: HashSet<String>,
}

#[async_trait]
impl CmspProvider for CmspFake {
    async fn listar_vereadores(&self) -> Result<Vec<VereadorCmsp>, ProviderError> {
        Ok(self.vereadores.clone())
    }

    async fn sessoes_no_periodo(
        &self,
        _inicio: &str,
        _fim: &str,
    ) -> Result<Vec<SessaoCmsp>, ProviderError> {
        Ok(self.sessoes.clone())
    }

    async fn presencas_na_sessao(&self, chave: &str) -> Result<Vec<String>, ProviderError> {
        Ok(self.presencas.get(chave).cloned().unwrap_or_default())
    }

    async fn projetos_no_periodo(
        &self,
        _inicio: &str,
        _fim: &str,
    ) -> Result<Vec<ProjetoCmsp>, ProviderError> {
        Ok(self.projetos.clone())
    }

    async fn voto_do_vereador(
        &self,
        chave_projeto: &str,
        _chave_vereador: &str,
    ) -> Result<Option<String>, ProviderError> {
        if self.votos_com_falha.contains(chave_projeto) {
            return Err(falha("vote service unavailable"));
        }
        Ok(self.votos.get(chave_projeto).cloned())
    }
}
