use async_trait::async_trait;

use tzindex_common::block::Level;
use tzindex_common::rights::{BakingRight, EndorsingRight};

use super::super::StorageError;

#[async_trait]
pub trait RightsProvider {
    async fn baking_rights_at_cycle(&self, cycle: i32) -> Result<Vec<BakingRight>, StorageError>;
    async fn upsert_baking_right(&self, right: BakingRight) -> Result<(), StorageError>;
    async fn endorsing_rights_at_cycle(&self, cycle: i32) -> Result<Vec<EndorsingRight>, StorageError>;
    async fn upsert_endorsing_right(&self, right: EndorsingRight) -> Result<(), StorageError>;
    async fn delete_rights_from_level(&self, level: Level) -> Result<(), StorageError>;
}
