//! `tzindex-sync`: runs the synchronization engine against a live chain
//! node and Postgres store, in the style of the upstream daemon's own
//! `bin/` entry points (`clap`-derived CLI, `env_logger` for structured
//! logging, `tokio::signal` for graceful shutdown).

use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;

use tzindex::config;
use tzindex::core::storage::postgres::PgStore;
use tzindex::core::storage::Storage;
use tzindex::core::sync::SyncController;
use tzindex::rpc::{HttpRpcClient, RpcClient};

#[derive(Parser, Debug)]
#[command(name = "tzindex-sync", about = "Synchronizes a Tezos chain indexer's local state against a node")]
struct Args {
    /// Chain node RPC endpoint; defaults to TEZOS_NODE_ENDPOINT.
    #[arg(long, env = "TEZOS_NODE_ENDPOINT")]
    node_endpoint: Option<String>,

    /// Postgres connection string; defaults to DB_CONNECTION.
    #[arg(long, env = "DB_CONNECTION")]
    db_connection: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let node_endpoint = args.node_endpoint.unwrap_or_else(|| config::node_endpoint().to_string());
    let db_connection = args.db_connection.unwrap_or_else(|| config::db_connection().to_string());

    info!("starting tzindex-sync against node {node_endpoint}");

    let rpc: Arc<dyn RpcClient> = Arc::new(HttpRpcClient::new(node_endpoint, config::rpc_timeout()));
    let store: Arc<dyn Storage> = Arc::new(PgStore::connect(&db_connection)?);

    let mut controller = SyncController::new(rpc, store);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received, finishing current tick");
            let _ = shutdown_tx.send(true);
        }
    });

    controller.run(shutdown_rx).await?;

    info!("sync controller stopped");
    Ok(())
}
