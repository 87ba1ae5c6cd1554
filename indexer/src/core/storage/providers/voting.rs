use async_trait::async_trait;

use tzindex_common::account::AccountId;
use tzindex_common::crypto::ProposalHash;
use tzindex_common::voting::{Proposal, VotingPeriod, VotingSnapshot};

use super::super::StorageError;

#[async_trait]
pub trait VotingProvider {
    async fn get_period(&self, index: i32) -> Result<Option<VotingPeriod>, StorageError>;
    async fn upsert_period(&self, period: VotingPeriod) -> Result<(), StorageError>;

    async fn get_proposal(&self, hash: &ProposalHash) -> Result<Option<Proposal>, StorageError>;
    async fn get_proposal_by_id(&self, id: i64) -> Result<Option<Proposal>, StorageError>;
    async fn upsert_proposal(&self, proposal: Proposal) -> Result<(), StorageError>;
    async fn delete_proposal(&self, id: i64) -> Result<(), StorageError>;
    async fn proposals_in_epoch(&self, epoch: i32) -> Result<Vec<Proposal>, StorageError>;

    async fn get_snapshot(
        &self,
        period: i32,
        baker_id: AccountId,
    ) -> Result<Option<VotingSnapshot>, StorageError>;
    async fn upsert_snapshot(&self, snapshot: VotingSnapshot) -> Result<(), StorageError>;
}
