//! NimbusKV Server - In-memory HTTP key-value store
//!
//! Main server process exposing the NimbusKV store over a small JSON
//! HTTP API: PUT/GET/DELETE on `/database/{key}` and a full-dataset CSV
//! export on `/snapshot`.

mod routes;
mod server;

use anyhow::Result;
use clap::Parser;
use nimbus_core::{Config, Store, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nimbus-server")]
#[command(about = "NimbusKV - in-memory HTTP key-value store")]
#[command(version)]
struct Args {
    /// Configuration file (TOML); CLI flags override its values
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// HTTP listen address
    #[arg(short = 'l', long)]
    listen_addr: Option<String>,

    /// Number of store shards (power of 2)
    #[arg(short = 's', long)]
    shards: Option<usize>,

    /// Worker thread count (defaults to one per CPU core)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Also write every snapshot export to this file
    #[arg(long)]
    snapshot_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    let env_filter = EnvFilter::new(format!(
        "nimbus_server={},nimbus_core={}",
        log_level, log_level
    ));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.listen_addr {
        config.server.listen_addr = addr;
    }
    if let Some(shards) = args.shards {
        config.store.num_shards = shards;
    }
    if let Some(workers) = args.workers {
        config.server.worker_threads = Some(workers);
    }
    if let Some(path) = args.snapshot_file {
        config.snapshot.persist_path = Some(path);
    }
    config.validate()?;

    let num_workers = config.server.worker_threads.unwrap_or_else(num_cpus::get);

    info!("NimbusKV server starting");
    info!("  • Listen Address: {}", config.server.listen_addr);
    info!("  • Store Shards: {}", config.store.num_shards);
    info!("  • Worker Threads: {}", num_workers);
    if let Some(path) = &config.snapshot.persist_path {
        info!("  • Snapshot File: {}", path.display());
    }

    let state = Arc::new(routes::AppState {
        store: Store::new(&StoreConfig {
            num_shards: config.store.num_shards,
        }),
        snapshot_persist: config.snapshot.persist_path.clone(),
    });

    server::run(state, &config.server.listen_addr, num_workers)
}
