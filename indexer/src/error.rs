use thiserror::Error;

use crate::core::ops::CommitError;
use crate::core::storage::StorageError;
use crate::rpc::RpcError;

/// Top-level error for one sync-controller step (spec §4.1: "the controller
/// treats RPC errors as transient... database errors or validation errors
/// as fatal for the current step").
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("commit error: {0}")]
    Commit(#[from] CommitError),

    #[error("validation error: {0}")]
    Validation(#[from] tzindex_common::error::ValidationError),

    #[error("protocol {0} has no registered handler")]
    UnknownProtocol(String),
}

impl SyncError {
    /// Transient errors are retried on the next tick; everything else is
    /// fatal for the current step (spec §4.1).
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Rpc(_))
    }
}
