use async_trait::async_trait;

use tzindex_common::block::Level;
use tzindex_common::operation::{Operation, OperationId};

use super::super::StorageError;

#[async_trait]
pub trait OperationProvider {
    async fn get_operation(&self, id: OperationId) -> Result<Option<Operation>, StorageError>;
    async fn insert_operation(&self, op: Operation) -> Result<(), StorageError>;
    async fn delete_operation(&self, id: OperationId) -> Result<(), StorageError>;
    async fn operations_at_level(&self, level: Level) -> Result<Vec<Operation>, StorageError>;

    /// Count of operations of a given sender with the given discriminant
    /// name, used by revert paths that need to recompute aggregates
    /// (invariant 2, spec §3) rather than trusting a running counter.
    async fn count_by_sender_and_kind(
        &self,
        sender_id: tzindex_common::account::AccountId,
        kind: tzindex_common::operation::OperationKind,
    ) -> Result<i64, StorageError>;
}
