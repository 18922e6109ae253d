//! presenca-rel - Report Reconciliation Engine
//!
//! Command-line entry point: generates attendance reports on demand
//! and looks up parlamentarians, printing the wire-contract JSON to
//! stdout. The web layer and the scheduled sender consume the same
//! service this binary drives.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use presenca_common::config::TomlConfig;
use presenca_rel::adapters::{AlespAdapter, CamaraAdapter, CmspAdapter};
use presenca_rel::models::Casa;
use presenca_rel::providers::alesp::AlespHttp;
use presenca_rel::providers::camara::CamaraHttp;
use presenca_rel::providers::cmsp::CmspHttp;
use presenca_rel::{periodo, RelatorioService};

#[derive(Parser)]
#[command(name = "presenca-rel", about = "Legislative attendance report engine")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "PRESENCA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    comando: Comando,
}

#[derive(Subcommand)]
enum Comando {
    /// Generate the attendance report for one parlamentarian
    Relatorio {
        /// House code (BR1, SP or SPM)
        #[arg(long)]
        casa: Casa,
        /// Source-specific parlamentarian id
        #[arg(long)]
        id: String,
        /// End of the report window (YYYY-MM-DD)
        #[arg(long)]
        data_final: NaiveDate,
        /// Window length in days (7-28; anything else becomes 7)
        #[arg(long, default_value = "7")]
        periodo: String,
    },
    /// Look up one parlamentarian
    Parlamentar {
        #[arg(long)]
        casa: Casa,
        #[arg(long)]
        id: String,
    },
    /// List the current roster of a house
    Parlamentares {
        #[arg(long)]
        casa: Casa,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    info!("Starting presenca-rel");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = TomlConfig::load(cli.config.as_deref())?;

    let db_path = config.data_folder().join("presenca.db");
    info!("Database: {}", db_path.display());
    let pool = presenca_common::db::init_database_pool(&db_path).await?;

    let timeout = config.http_timeout_secs();
    let camara = CamaraHttp::new(config.camara_base_url(), timeout)
        .context("Failed to build Câmara client")?;
    let alesp =
        AlespHttp::new(config.alesp_base_url(), timeout).context("Failed to build ALESP client")?;
    let cmsp =
        CmspHttp::new(config.cmsp_base_url(), timeout).context("Failed to build CMSP client")?;

    let service = RelatorioService::new(
        pool,
        Arc::new(CamaraAdapter::new(camara)),
        Arc::new(AlespAdapter::new(alesp)),
        Arc::new(CmspAdapter::new(cmsp)),
    );

    match cli.comando {
        Comando::Relatorio {
            casa,
            id,
            data_final,
            periodo,
        } => {
            let dias = periodo::dias_de_texto(&periodo);
            let relatorio = service.obter_relatorio(casa, &id, data_final, dias).await?;
            println!("{}", serde_json::to_string_pretty(&relatorio)?);
        }
        Comando::Parlamentar { casa, id } => match service.obter_parlamentar(casa, &id).await? {
            Some(parlamentar) => println!("{}", serde_json::to_string_pretty(&parlamentar)?),
            None => {
                eprintln!("Parlamentar {}/{} não encontrado", casa, id);
                std::process::exit(1);
            }
        },
        Comando::Parlamentares { casa } => {
            let parlamentares = service.obter_parlamentares(casa).await?;
            println!("{}", serde_json::to_string_pretty(&parlamentares)?);
        }
    }

    Ok(())
}
