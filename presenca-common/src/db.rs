//! SQLite database initialization
//!
//! Opens (or creates) the service database and ensures the schema
//! exists. Schema changes are additive `CREATE TABLE IF NOT EXISTS`
//! statements run at startup.

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the database connection pool, creating the file and
/// parent directory if needed.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// In-memory pool for tests
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create service tables if they don't exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // Completed reports, keyed by the full request tuple. The payload
    // column holds the serialized report exactly as served to callers.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS relatorios (
            parlamentar_id TEXT NOT NULL,
            casa TEXT NOT NULL,
            data_final TEXT NOT NULL,
            periodo_dias INTEGER NOT NULL,
            payload TEXT NOT NULL,
            criado_em TEXT NOT NULL,
            PRIMARY KEY (parlamentar_id, casa, data_final, periodo_dias)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
