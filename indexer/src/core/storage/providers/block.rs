use async_trait::async_trait;

use tzindex_common::block::{BlockHeader, Level};
use tzindex_common::crypto::BlockHash;

use super::super::StorageError;

#[async_trait]
pub trait BlockProvider {
    async fn get_block(&self, level: Level) -> Result<Option<BlockHeader>, StorageError>;
    async fn get_block_by_hash(&self, hash: &BlockHash) -> Result<Option<BlockHeader>, StorageError>;
    async fn insert_block(&self, header: BlockHeader) -> Result<(), StorageError>;
    async fn delete_block(&self, level: Level) -> Result<(), StorageError>;
    async fn max_level(&self) -> Result<Option<Level>, StorageError>;
}
