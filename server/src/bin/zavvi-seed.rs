//! Seed the brand policy catalog into a store file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zavvi_server::{seed, store::ZavviStore};

#[derive(Parser, Debug)]
#[command(name = "zavvi-seed", about = "Load the built-in brand catalog into a Zavvi store")]
struct Args {
    /// Path to the store file
    #[arg(long, env = "ZAVVI_STORE_PATH", default_value = "data/zavvi.json")]
    store_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let store = ZavviStore::open(args.store_path.clone())?;

    let summary = seed::apply(&store).await?;
    info!(
        "Seeded {} brands ({} skipped) and {} policies into {}",
        summary.brands_created,
        summary.brands_skipped,
        summary.policies_created,
        args.store_path.display()
    );

    Ok(())
}
