//! Embed products that are not yet in the vector store.
//!
//! Safe to rerun: products that already have chunks are skipped.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use inventory::domain::EmbeddingIngestionService;
use inventory::outbound::llm::OpenAiClient;
use inventory::outbound::persistence::{DbPool, DieselProductRepository, DieselVectorStore};
use inventory::settings::AppSettings;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `ingest-embeddings` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ingest-embeddings",
    about = "Embed new products into the product vector collection",
    version
)]
struct CliArgs {
    /// Chunks sent to the embedding provider per request.
    #[arg(long = "batch-size", value_name = "n")]
    batch_size: Option<usize>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = AppSettings::load_from_iter([OsString::from("ingest-embeddings")])
        .wrap_err("failed to load configuration")?;
    let pool_config = settings
        .pool_config()
        .ok_or_else(|| eyre!("database URL missing: set INVENTORY_DATABASE_URL"))?;
    let pool = DbPool::new(pool_config).await?;
    let embeddings = OpenAiClient::new(settings.openai_settings()?)?;

    let mut service = EmbeddingIngestionService::new(
        Arc::new(DieselProductRepository::new(pool.clone())),
        Arc::new(embeddings),
        Arc::new(DieselVectorStore::new(pool)),
    );
    if let Some(batch_size) = args.batch_size {
        service = service.with_batch_size(batch_size);
    }
    let report = service.ingest_new_products().await?;

    println!("products_embedded={}", report.products_embedded);
    println!("chunks_stored={}", report.chunks_stored);
    Ok(())
}
