//! Data Store (C3): transactional relational store. Owns persistence,
//! batching and constraint enforcement (spec §2). The `Storage` supertrait
//! composes one provider trait per entity concern, mirroring the upstream
//! daemon's `core/storage/mod.rs` composition of `~20` provider traits into
//! a single object-safe `Storage` bound.

pub mod mock;
pub mod postgres;
pub mod providers;
mod schema;

pub use providers::{
    AccountProvider, AppStateProvider, BlockProvider, CycleProvider, OperationProvider,
    ProtocolProvider, QuoteProvider, RightsProvider, VotingProvider,
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("pool error: {0}")]
    Pool(String),
}

/// Union of every provider trait; a transaction handle implements this so
/// operation commits can be written generically over `S: Storage` the way
/// `ApplicableChainState<'a, S: Storage>` is in the upstream daemon.
#[async_trait]
pub trait Storage:
    AppStateProvider
    + ProtocolProvider
    + AccountProvider
    + OperationProvider
    + BlockProvider
    + VotingProvider
    + CycleProvider
    + RightsProvider
    + QuoteProvider
    + Send
    + Sync
    + 'static
{
    /// Begins a transaction boundary. Apply and revert each run inside one
    /// store transaction (spec §4.1); concrete stores open a real SQL
    /// transaction here, the mock store is a no-op since every provider
    /// call already mutates in place.
    async fn begin(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn commit(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn rollback(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
