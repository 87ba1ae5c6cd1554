use async_trait::async_trait;

use tzindex_common::cycle::Cycle;

use super::super::StorageError;

#[async_trait]
pub trait CycleProvider {
    async fn get_cycle(&self, index: i32) -> Result<Option<Cycle>, StorageError>;
    async fn upsert_cycle(&self, cycle: Cycle) -> Result<(), StorageError>;
    async fn delete_cycle(&self, index: i32) -> Result<(), StorageError>;
}
