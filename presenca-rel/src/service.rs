//! Report Aggregator
//!
//! Single entry point the web layer and the scheduled-report sender
//! depend on: resolve house, check the idempotency layer, dispatch to
//! the adapter, persist on success. Each report computation may issue
//! dozens to hundreds of outbound provider calls, so reusing a
//! persisted report for an identical key is the dominant optimization.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::adapters::CasaAdapter;
use crate::db::{self, ChaveRelatorio};
use crate::error::{ModelError, ModelResult};
use crate::models::{Casa, Parlamentar, Relatorio};
use crate::periodo;
use crate::registry::{aguardar, TaskRegistry};

/// Outcome of a fire-and-forget report request
#[derive(Debug, Clone)]
pub enum Solicitacao {
    /// Report already persisted for this key; returned unmodified
    Pronto(Box<Relatorio>),
    /// This request started a new computation
    Iniciada,
    /// A computation for this key was already in flight
    EmAndamento,
}

/// House registry + idempotency orchestration
#[derive(Clone)]
pub struct RelatorioService {
    pool: SqlitePool,
    registry: TaskRegistry,
    adapters: HashMap<Casa, Arc<dyn CasaAdapter>>,
}

impl RelatorioService {
    /// Build the service over the three hardcoded house adapters
    pub fn new(
        pool: SqlitePool,
        camara: Arc<dyn CasaAdapter>,
        alesp: Arc<dyn CasaAdapter>,
        cmsp: Arc<dyn CasaAdapter>,
    ) -> Self {
        let mut adapters: HashMap<Casa, Arc<dyn CasaAdapter>> = HashMap::new();
        adapters.insert(Casa::Camara, camara);
        adapters.insert(Casa::Alesp, alesp);
        adapters.insert(Casa::Cmsp, cmsp);

        Self {
            pool,
            registry: TaskRegistry::new(),
            adapters,
        }
    }

    fn adapter(&self, casa: Casa) -> Arc<dyn CasaAdapter> {
        // The three houses are inserted at construction; a miss is a
        // bug, not a runtime condition
        Arc::clone(
            self.adapters
                .get(&casa)
                .expect("adapter registered for every house"),
        )
    }

    /// Resolve one parlamentarian; `None` when the id is unknown
    pub async fn obter_parlamentar(
        &self,
        casa: Casa,
        id: &str,
    ) -> ModelResult<Option<Parlamentar>> {
        self.adapter(casa).obter_parlamentar(id).await
    }

    /// Full current roster of a house
    pub async fn obter_parlamentares(&self, casa: Casa) -> ModelResult<Vec<Parlamentar>> {
        self.adapter(casa).obter_parlamentares().await
    }

    /// Synchronous calling convention: always waits, returning the
    /// materialized report (fresh, in-flight or persisted) or the
    /// propagated error.
    pub async fn obter_relatorio(
        &self,
        casa: Casa,
        id: &str,
        data_final: NaiveDate,
        dias: i64,
    ) -> ModelResult<Relatorio> {
        let chave = self.chave(casa, id, data_final, dias);

        if let Some(relatorio) = self.carregar(&chave).await? {
            info!(chave = %chave.nome_tarefa(), "Reusing persisted report");
            return Ok(relatorio);
        }

        let (canal, _) = self.iniciar(&chave).await;
        aguardar(canal).await
    }

    /// Fire-and-forget calling convention: never waits for a fresh
    /// computation, reports which of the three states the key was in.
    pub async fn solicitar_relatorio(
        &self,
        casa: Casa,
        id: &str,
        data_final: NaiveDate,
        dias: i64,
    ) -> ModelResult<Solicitacao> {
        let chave = self.chave(casa, id, data_final, dias);

        if let Some(relatorio) = self.carregar(&chave).await? {
            return Ok(Solicitacao::Pronto(Box::new(relatorio)));
        }

        let (_, iniciada) = self.iniciar(&chave).await;
        if iniciada {
            Ok(Solicitacao::Iniciada)
        } else {
            Ok(Solicitacao::EmAndamento)
        }
    }

    /// Request key with the period interval normalized, so "9d" and an
    /// out-of-range value land on the same key as the default
    fn chave(&self, casa: Casa, id: &str, data_final: NaiveDate, dias: i64) -> ChaveRelatorio {
        ChaveRelatorio {
            casa,
            parlamentar_id: id.to_string(),
            data_final,
            dias: periodo::normalizar_dias(dias),
        }
    }

    async fn carregar(&self, chave: &ChaveRelatorio) -> ModelResult<Option<Relatorio>> {
        db::carregar(&self.pool, chave)
            .await
            .map_err(|e| ModelError::Database(e.to_string()))
    }

    /// Join or start the computation for a key. On success the task
    /// persists the report before publishing; on failure nothing is
    /// saved and the key returns to Absent, permitting retry.
    async fn iniciar(
        &self,
        chave: &ChaveRelatorio,
    ) -> (tokio::sync::watch::Receiver<Option<ModelResult<Relatorio>>>, bool) {
        let adapter = self.adapter(chave.casa);
        let pool = self.pool.clone();
        let chave_tarefa = chave.clone();

        let computar = async move {
            let relatorio = adapter
                .obter_relatorio(
                    &chave_tarefa.parlamentar_id,
                    chave_tarefa.data_final,
                    chave_tarefa.dias,
                )
                .await
                .map_err(|e| {
                    warn!(chave = %chave_tarefa.nome_tarefa(), erro = %e, "Report computation failed");
                    e
                })?;

            db::salvar(&pool, &chave_tarefa, &relatorio)
                .await
                .map_err(|e| ModelError::Database(e.to_string()))?;

            info!(chave = %chave_tarefa.nome_tarefa(), "Report persisted");
            Ok(relatorio)
        };

        let pool = self.pool.clone();
        let chave_pronta = chave.clone();
        self.registry
            .iniciar(
                chave.nome_tarefa(),
                move || async move {
                    // Re-checked under the registry lock: a task that
                    // finished a moment ago already persisted its report
                    match db::carregar(&pool, &chave_pronta).await {
                        Ok(Some(relatorio)) => Some(Ok(relatorio)),
                        Ok(None) => None,
                        Err(e) => Some(Err(ModelError::Database(e.to_string()))),
                    }
                },
                computar,
            )
            .await
    }
}
