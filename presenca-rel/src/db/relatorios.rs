//! Report table operations

use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use presenca_common::{Error, Result};

use crate::models::{Casa, Relatorio};

/// Identity of one report request. Identical keys always mean the
/// same report; the period interval is normalized before the key is
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChaveRelatorio {
    pub casa: Casa,
    pub parlamentar_id: String,
    pub data_final: NaiveDate,
    pub dias: i64,
}

impl ChaveRelatorio {
    /// Deterministic task name for the in-flight registry; duplicate
    /// computations are detectable by name lookup
    pub fn nome_tarefa(&self) -> String {
        format!(
            "relatorio:{}:{}:{}:{}",
            self.casa,
            self.parlamentar_id,
            self.data_final.format("%Y-%m-%d"),
            self.dias
        )
    }
}

/// Persist a completed report. Upsert keeps a rare duplicate
/// computation harmless: both write the same payload.
pub async fn salvar(pool: &SqlitePool, chave: &ChaveRelatorio, relatorio: &Relatorio) -> Result<()> {
    let payload = serde_json::to_string(relatorio)
        .map_err(|e| Error::Internal(format!("Failed to serialize report: {}", e)))?;
    let data_final = chave.data_final.format("%Y-%m-%d").to_string();
    let criado_em = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO relatorios (
            parlamentar_id, casa, data_final, periodo_dias, payload, criado_em
        ) VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(parlamentar_id, casa, data_final, periodo_dias) DO UPDATE SET
            payload = excluded.payload
        "#,
    )
    .bind(&chave.parlamentar_id)
    .bind(chave.casa.codigo())
    .bind(&data_final)
    .bind(chave.dias)
    .bind(&payload)
    .bind(&criado_em)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a previously persisted report for the exact key, if any
pub async fn carregar(pool: &SqlitePool, chave: &ChaveRelatorio) -> Result<Option<Relatorio>> {
    let data_final = chave.data_final.format("%Y-%m-%d").to_string();

    let row = sqlx::query(
        r#"
        SELECT payload FROM relatorios
        WHERE parlamentar_id = ? AND casa = ? AND data_final = ? AND periodo_dias = ?
        "#,
    )
    .bind(&chave.parlamentar_id)
    .bind(chave.casa.codigo())
    .bind(&data_final)
    .bind(chave.dias)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let payload: String = row.get("payload");
            let relatorio = serde_json::from_str(&payload)
                .map_err(|e| Error::Internal(format!("Failed to parse stored report: {}", e)))?;
            Ok(Some(relatorio))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classificador::Classificacao;
    use crate::models::{Evento, Parlamentar, Presenca};

    fn chave() -> ChaveRelatorio {
        ChaveRelatorio {
            casa: Casa::Camara,
            parlamentar_id: "74171".to_string(),
            data_final: NaiveDate::from_ymd_opt(2018, 6, 29).unwrap(),
            dias: 7,
        }
    }

    fn relatorio() -> Relatorio {
        let evento = Evento {
            id: "e1".to_string(),
            nome: "Sessão Deliberativa".to_string(),
            data_inicial: None,
            data_final: None,
            situacao: "Encerrada".to_string(),
            url: None,
            orgaos: vec![],
            pautas: vec![],
            presenca: None,
        };
        Relatorio::montar(
            Parlamentar {
                id: "74171".to_string(),
                nome: "Deputado Teste".to_string(),
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
            Classificacao {
                presentes: vec![evento.clone().classificar(Presenca::Presente)],
                ausentes: vec![],
            },
        )
    }

    #[test]
    fn test_task_name_is_deterministic() {
        assert_eq!(chave().nome_tarefa(), "relatorio:BR1:74171:2018-06-29:7");
        assert_eq!(chave().nome_tarefa(), chave().nome_tarefa());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let pool = presenca_common::db::init_memory_pool().await.unwrap();
        let original = relatorio();

        salvar(&pool, &chave(), &original).await.unwrap();
        let carregado = carregar(&pool, &chave()).await.unwrap().unwrap();

        assert_eq!(carregado, original);
        assert_eq!(
            carregado.eventos_presentes[0].presenca,
            Some(Presenca::Presente)
        );
    }

    #[tokio::test]
    async fn test_load_missing_key_is_none() {
        let pool = presenca_common::db::init_memory_pool().await.unwrap();
        assert!(carregar(&pool, &chave()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_near_identical_keys_are_distinct() {
        let pool = presenca_common::db::init_memory_pool().await.unwrap();
        salvar(&pool, &chave(), &relatorio()).await.unwrap();

        // A similar-but-not-identical key must never be substituted
        let mut outra = chave();
        outra.dias = 14;
        assert!(carregar(&pool, &outra).await.unwrap().is_none());

        let mut outra = chave();
        outra.casa = Casa::Alesp;
        assert!(carregar(&pool, &outra).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_save_is_harmless() {
        let pool = presenca_common::db::init_memory_pool().await.unwrap();
        salvar(&pool, &chave(), &relatorio()).await.unwrap();
        salvar(&pool, &chave(), &relatorio()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM relatorios")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
