//! In-flight report task registry
//!
//! Tracks one named tokio task per report key currently being
//! computed. A second request for the same key while it is computing
//! subscribes to the existing task's result channel instead of
//! spawning a duplicate.
//!
//! Known limitation, kept deliberately: this registry is
//! process-local. Across independent processes only the persisted
//! report store deduplicates (the Absent/Done states); concurrent
//! computations of the same key in two processes are possible. A
//! distributed lock is a candidate future improvement, not something
//! this layer pretends to provide.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::models::Relatorio;

type Resultado = ModelResult<Relatorio>;
type Canal = watch::Receiver<Option<Resultado>>;

/// Registry of in-flight report computations, keyed by task name
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tarefas: Arc<Mutex<HashMap<String, Canal>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result channel of the named task, if one is in flight
    pub async fn observar(&self, nome: &str) -> Option<Canal> {
        self.tarefas.lock().await.get(nome).cloned()
    }

    /// Start a named computation unless one is already in flight.
    ///
    /// `ja_pronto` is re-checked under the registry lock before
    /// spawning: a task that just finished removes itself under the
    /// same lock after persisting, so a request arriving in between
    /// sees either the live channel or the persisted report, never
    /// neither.
    ///
    /// Returns the channel and whether this call started the task.
    pub async fn iniciar<F, P, Fut>(&self, nome: String, ja_pronto: P, computar: F) -> (Canal, bool)
    where
        F: Future<Output = Resultado> + Send + 'static,
        P: FnOnce() -> Fut,
        Fut: Future<Output = Option<Resultado>>,
    {
        let mut tarefas = self.tarefas.lock().await;

        if let Some(canal) = tarefas.get(&nome) {
            debug!(tarefa = %nome, "Computation already in flight");
            return (canal.clone(), false);
        }

        if let Some(resultado) = ja_pronto().await {
            let (tx, rx) = watch::channel(Some(resultado));
            drop(tx);
            return (rx, false);
        }

        let (tx, rx) = watch::channel(None);
        tarefas.insert(nome.clone(), rx.clone());
        drop(tarefas);

        let tarefas = Arc::clone(&self.tarefas);
        tokio::spawn(async move {
            let resultado = computar.await;

            // Remove and publish under the lock so late subscribers
            // either see this channel or a persisted report
            let mut registro = tarefas.lock().await;
            registro.remove(&nome);
            let _ = tx.send(Some(resultado));
            debug!(tarefa = %nome, "Computation finished");
        });

        (rx, true)
    }
}

/// Wait for a task's result on its channel
pub async fn aguardar(mut canal: Canal) -> Resultado {
    loop {
        if let Some(resultado) = canal.borrow().clone() {
            return resultado;
        }
        if canal.changed().await.is_err() {
            // Sender dropped without publishing; treated as a failed
            // computation (nothing was persisted, retry is allowed)
            let pendente = canal.borrow().clone();
            return pendente
                .unwrap_or_else(|| Err(ModelError::Internal("report task vanished".to_string())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::classificador::Classificacao;
    use crate::models::{Casa, Parlamentar};
    use chrono::NaiveDate;

    fn relatorio() -> Relatorio {
        Relatorio::montar(
            Parlamentar {
                id: "1".to_string(),
                nome: "Teste".to_string(),
                partido: None,
                uf: None,
                foto: None,
                cargo: Casa::Camara,
            },
            NaiveDate::from_ymd_opt(2018, 6, 22).unwrap(),
            NaiveDate::from_ymd_opt(2018, 6, 29).unwrap(),
            None,
            vec![],
            vec![],
            Classificacao::default(),
        )
    }

    #[tokio::test]
    async fn test_single_task_completes() {
        let registry = TaskRegistry::new();
        let (canal, iniciada) = registry
            .iniciar(
                "t1".to_string(),
                || async { None },
                async { Ok(relatorio()) },
            )
            .await;
        assert!(iniciada);
        assert!(aguardar(canal).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_name_does_not_start_second_task() {
        let registry = TaskRegistry::new();
        let contador = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&contador);
        let (canal1, iniciada1) = registry
            .iniciar(
                "t1".to_string(),
                || async { None },
                async move {
                    c1.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(relatorio())
                },
            )
            .await;
        assert!(iniciada1);

        let c2 = Arc::clone(&contador);
        let (canal2, iniciada2) = registry
            .iniciar(
                "t1".to_string(),
                || async { None },
                async move {
                    c2.fetch_add(1, Ordering::SeqCst);
                    Ok(relatorio())
                },
            )
            .await;
        assert!(!iniciada2);

        let (r1, r2) = tokio::join!(aguardar(canal1), aguardar(canal2));
        assert!(r1.is_ok());
        assert!(r2.is_ok());
        assert_eq!(contador.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_task_leaves_registry_empty() {
        let registry = TaskRegistry::new();
        let (canal, _) = registry
            .iniciar(
                "t1".to_string(),
                || async { None },
                async { Err(ModelError::Internal("boom".to_string())) },
            )
            .await;

        assert!(aguardar(canal).await.is_err());
        // Key is Absent again; a retry starts a fresh task
        let (canal, iniciada) = registry
            .iniciar(
                "t1".to_string(),
                || async { None },
                async { Ok(relatorio()) },
            )
            .await;
        assert!(iniciada);
        assert!(aguardar(canal).await.is_ok());
    }

    #[tokio::test]
    async fn test_ja_pronto_short_circuits() {
        let registry = TaskRegistry::new();
        let (canal, iniciada) = registry
            .iniciar(
                "t1".to_string(),
                || async { Some(Ok(relatorio())) },
                async { panic!("must not run") },
            )
            .await;
        assert!(!iniciada);
        assert!(aguardar(canal).await.is_ok());
        assert!(registry.observar("t1").await.is_none());
    }
}
