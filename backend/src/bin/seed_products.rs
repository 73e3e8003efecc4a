//! Load products from a CSV file into PostgreSQL.
//!
//! Connection settings come from the `INVENTORY_*` environment; the CSV path
//! and owning user are command-line arguments.

use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use inventory::domain::{ProductSeeder, UserId};
use inventory::outbound::persistence::{DbPool, DieselProductRepository, run_pending_migrations};
use inventory::settings::AppSettings;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `seed-products` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-products",
    about = "Insert products from a CSV file, skipping invalid rows and existing ids",
    version
)]
struct CliArgs {
    /// CSV file with a header row.
    #[arg(value_name = "path", default_value = "products.csv")]
    csv_path: PathBuf,
    /// User recorded as the creator of seeded products.
    #[arg(long = "owner-id", value_name = "id")]
    owner_id: Option<i32>,
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
    let settings = AppSettings::load_from_iter([OsString::from("seed-products")])
        .wrap_err("failed to load configuration")?;
    let pool_config = settings
        .pool_config()
        .ok_or_else(|| eyre!("database URL missing: set INVENTORY_DATABASE_URL"))?;
    let owner = args
        .owner_id
        .map(UserId::new)
        .transpose()
        .wrap_err("--owner-id must be a positive integer")?;

    let applied = run_pending_migrations(pool_config.database_url())?;
    info!(applied, "database migrations complete");
    let pool = DbPool::new(pool_config).await?;

    let file = File::open(&args.csv_path)
        .wrap_err_with(|| format!("failed to open {}", args.csv_path.display()))?;
    let seeder =
        ProductSeeder::new(Arc::new(DieselProductRepository::new(pool))).with_owner(owner);
    let report = seeder.seed_from_reader(file).await?;

    println!("added={}", report.added);
    println!("skipped={}", report.skipped);
    Ok(())
}
