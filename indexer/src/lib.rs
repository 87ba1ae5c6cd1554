// Synchronization engine for a Tezos-style chain indexer.
// Exposes internal modules for the `tzindex-sync` binary and for tests.

#[macro_use]
extern crate log;

pub mod config;
pub mod core;
pub mod error;
pub mod rpc;

pub use error::SyncError;
