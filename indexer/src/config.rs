//! Process configuration, read from the environment.
//!
//! Follows the upstream daemon's `lazy_static` + environment-variable
//! pattern: each setting is parsed once on first access and cached. Domain
//! constants describing the indexed chain itself (hash lengths, quorum
//! denominators) live in `tzindex_common::config`, not here.

use std::env;
use std::time::Duration;

use lazy_static::lazy_static;

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => matches!(v.as_str(), "1" | "true" | "TRUE" | "True"),
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

lazy_static! {
    /// Base URL of the chain node's JSON-RPC endpoint.
    static ref TEZOS_NODE_ENDPOINT: String =
        env::var("TEZOS_NODE_ENDPOINT").unwrap_or_else(|_| "http://127.0.0.1:8732".to_string());

    /// Postgres connection string for the data store (C3).
    static ref DB_CONNECTION: String =
        env::var("DB_CONNECTION").unwrap_or_else(|_| "postgres://localhost/tzindex".to_string());

    /// Level to bootstrap `AppState` from instead of replaying from genesis,
    /// when a snapshot loader is wired in by the caller.
    static ref SYNC_START_LEVEL: Option<i32> =
        env::var("SYNC_START_LEVEL").ok().and_then(|v| v.parse().ok());

    static ref SYNC_RPC_TIMEOUT_MS: u64 = env_u64("SYNC_RPC_TIMEOUT_MS", 10_000);
    static ref SYNC_MAX_BACKOFF_MS: u64 = env_u64("SYNC_MAX_BACKOFF_MS", 30_000);
    static ref SYNC_MIN_BACKOFF_MS: u64 = env_u64("SYNC_MIN_BACKOFF_MS", 1_000);

    /// Whether the sync loop should emit a reorg signal observable to
    /// downstream consumers (spec §4.1 "fire a reorg signal").
    static ref REORG_SIGNAL_ENABLED: bool = env_flag("SYNC_REORG_SIGNAL_ENABLED", true);
}

pub fn node_endpoint() -> &'static str {
    &TEZOS_NODE_ENDPOINT
}

pub fn db_connection() -> &'static str {
    &DB_CONNECTION
}

pub fn sync_start_level() -> Option<i32> {
    *SYNC_START_LEVEL
}

pub fn rpc_timeout() -> Duration {
    Duration::from_millis(*SYNC_RPC_TIMEOUT_MS)
}

pub fn min_backoff() -> Duration {
    Duration::from_millis(*SYNC_MIN_BACKOFF_MS)
}

pub fn max_backoff() -> Duration {
    Duration::from_millis(*SYNC_MAX_BACKOFF_MS)
}

pub fn reorg_signal_enabled() -> bool {
    *REORG_SIGNAL_ENABLED
}
