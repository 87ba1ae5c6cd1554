//! In-memory `Storage` test double, in the style of the upstream daemon's
//! `ConfigurableDelegationProvider`: plain `RwLock<HashMap<...>>` tables plus
//! fault-injection flags so sync-controller tests can exercise the "database
//! errors are fatal for the current step" path (spec §4.1) without a real
//! database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tzindex_common::account::{Account, AccountId};
use tzindex_common::app_state::AppState;
use tzindex_common::block::{BlockHeader, Level};
use tzindex_common::cycle::Cycle;
use tzindex_common::crypto::{Address, BlockHash, ProposalHash};
use tzindex_common::operation::{Operation, OperationId, OperationKind};
use tzindex_common::protocol::Protocol;
use tzindex_common::quote::Quote;
use tzindex_common::rights::{BakingRight, EndorsingRight};
use tzindex_common::voting::{Proposal, VotingPeriod, VotingSnapshot};

use super::providers::{
    AccountProvider, AppStateProvider, BlockProvider, CycleProvider, OperationProvider,
    ProtocolProvider, QuoteProvider, RightsProvider, VotingProvider,
};
use super::{Storage, StorageError};

#[derive(Default)]
pub struct FaultInjection {
    pub fail_on_read: bool,
    pub fail_on_write: bool,
    pub fail_on_delete: bool,
}

#[derive(Default)]
pub struct MockStorage {
    pub faults: RwLock<FaultInjection>,
    app_state: RwLock<Option<AppState>>,
    accounts_by_id: RwLock<HashMap<AccountId, Account>>,
    accounts_by_address: RwLock<HashMap<Address, AccountId>>,
    blocks: RwLock<HashMap<Level, BlockHeader>>,
    blocks_by_hash: RwLock<HashMap<BlockHash, Level>>,
    operations: RwLock<HashMap<OperationId, Operation>>,
    protocols: RwLock<HashMap<ProposalHash, Protocol>>,
    periods: RwLock<HashMap<i32, VotingPeriod>>,
    proposals: RwLock<HashMap<ProposalHash, Proposal>>,
    proposals_by_id: RwLock<HashMap<i64, ProposalHash>>,
    snapshots: RwLock<HashMap<(i32, AccountId), VotingSnapshot>>,
    cycles: RwLock<HashMap<i32, Cycle>>,
    baking_rights: RwLock<HashMap<i32, Vec<BakingRight>>>,
    endorsing_rights: RwLock<HashMap<i32, Vec<EndorsingRight>>>,
    quotes: RwLock<HashMap<Level, Quote>>,
}

impl MockStorage {
    pub fn new() -> Self {
        MockStorage::default()
    }

    fn check_read(&self) -> Result<(), StorageError> {
        if self.faults.read().unwrap().fail_on_read {
            return Err(StorageError::Database("injected read failure".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StorageError> {
        if self.faults.read().unwrap().fail_on_write {
            return Err(StorageError::Database("injected write failure".into()));
        }
        Ok(())
    }

    fn check_delete(&self) -> Result<(), StorageError> {
        if self.faults.read().unwrap().fail_on_delete {
            return Err(StorageError::Database("injected delete failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AppStateProvider for MockStorage {
    async fn get_app_state(&self) -> Result<AppState, StorageError> {
        self.check_read()?;
        self.app_state
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| StorageError::NotFound("app_state".into()))
    }

    async fn set_app_state(&self, state: AppState) -> Result<(), StorageError> {
        self.check_write()?;
        *self.app_state.write().unwrap() = Some(state);
        Ok(())
    }
}

#[async_trait]
impl AccountProvider for MockStorage {
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StorageError> {
        self.check_read()?;
        Ok(self.accounts_by_id.read().unwrap().get(&id).cloned())
    }

    async fn get_account_by_address(&self, address: &Address) -> Result<Option<Account>, StorageError> {
        self.check_read()?;
        let id = self.accounts_by_address.read().unwrap().get(address).copied();
        Ok(id.and_then(|id| self.accounts_by_id.read().unwrap().get(&id).cloned()))
    }

    async fn upsert_account(&self, account: Account) -> Result<(), StorageError> {
        self.check_write()?;
        let id = account.id();
        self.accounts_by_address
            .write()
            .unwrap()
            .insert(account.address().clone(), id);
        self.accounts_by_id.write().unwrap().insert(id, account);
        Ok(())
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), StorageError> {
        self.check_delete()?;
        if let Some(account) = self.accounts_by_id.write().unwrap().remove(&id) {
            self.accounts_by_address.write().unwrap().remove(account.address());
        }
        Ok(())
    }

    async fn list_delegates(&self, skip: usize, limit: usize) -> Result<Vec<Account>, StorageError> {
        self.check_read()?;
        Ok(self
            .accounts_by_id
            .read()
            .unwrap()
            .values()
            .filter(|a| a.is_delegate())
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BlockProvider for MockStorage {
    async fn get_block(&self, level: Level) -> Result<Option<BlockHeader>, StorageError> {
        self.check_read()?;
        Ok(self.blocks.read().unwrap().get(&level).cloned())
    }

    async fn get_block_by_hash(&self, hash: &BlockHash) -> Result<Option<BlockHeader>, StorageError> {
        self.check_read()?;
        let level = self.blocks_by_hash.read().unwrap().get(hash).copied();
        Ok(level.and_then(|l| self.blocks.read().unwrap().get(&l).cloned()))
    }

    async fn insert_block(&self, header: BlockHeader) -> Result<(), StorageError> {
        self.check_write()?;
        self.blocks_by_hash
            .write()
            .unwrap()
            .insert(header.hash.clone(), header.level);
        self.blocks.write().unwrap().insert(header.level, header);
        Ok(())
    }

    async fn delete_block(&self, level: Level) -> Result<(), StorageError> {
        self.check_delete()?;
        if let Some(header) = self.blocks.write().unwrap().remove(&level) {
            self.blocks_by_hash.write().unwrap().remove(&header.hash);
        }
        Ok(())
    }

    async fn max_level(&self) -> Result<Option<Level>, StorageError> {
        self.check_read()?;
        Ok(self.blocks.read().unwrap().keys().copied().max())
    }
}

#[async_trait]
impl OperationProvider for MockStorage {
    async fn get_operation(&self, id: OperationId) -> Result<Option<Operation>, StorageError> {
        self.check_read()?;
        Ok(self.operations.read().unwrap().get(&id).cloned())
    }

    async fn insert_operation(&self, op: Operation) -> Result<(), StorageError> {
        self.check_write()?;
        self.operations.write().unwrap().insert(op.id, op);
        Ok(())
    }

    async fn delete_operation(&self, id: OperationId) -> Result<(), StorageError> {
        self.check_delete()?;
        self.operations.write().unwrap().remove(&id);
        Ok(())
    }

    async fn operations_at_level(&self, level: Level) -> Result<Vec<Operation>, StorageError> {
        self.check_read()?;
        let mut ops: Vec<Operation> = self
            .operations
            .read()
            .unwrap()
            .values()
            .filter(|op| op.level == level)
            .cloned()
            .collect();
        ops.sort_by_key(|op| op.id);
        Ok(ops)
    }

    async fn count_by_sender_and_kind(
        &self,
        sender_id: AccountId,
        kind: OperationKind,
    ) -> Result<i64, StorageError> {
        self.check_read()?;
        Ok(self
            .operations
            .read()
            .unwrap()
            .values()
            .filter(|op| op.sender_id == sender_id && op.kind() == kind)
            .count() as i64)
    }
}

#[async_trait]
impl ProtocolProvider for MockStorage {
    async fn get_protocol(&self, hash: &ProposalHash) -> Result<Option<Protocol>, StorageError> {
        self.check_read()?;
        Ok(self.protocols.read().unwrap().get(hash).cloned())
    }

    async fn get_protocol_by_code(&self, code: i32) -> Result<Option<Protocol>, StorageError> {
        self.check_read()?;
        Ok(self
            .protocols
            .read()
            .unwrap()
            .values()
            .find(|p| p.code == code)
            .cloned())
    }

    async fn insert_protocol(&self, protocol: Protocol) -> Result<(), StorageError> {
        self.check_write()?;
        self.protocols.write().unwrap().insert(protocol.hash.clone(), protocol);
        Ok(())
    }

    async fn seal_protocol(&self, hash: &ProposalHash, last_level: Level) -> Result<(), StorageError> {
        self.check_write()?;
        if let Some(protocol) = self.protocols.write().unwrap().get_mut(hash) {
            protocol.last_level = Some(last_level);
        }
        Ok(())
    }
}

#[async_trait]
impl VotingProvider for MockStorage {
    async fn get_period(&self, index: i32) -> Result<Option<VotingPeriod>, StorageError> {
        self.check_read()?;
        Ok(self.periods.read().unwrap().get(&index).cloned())
    }

    async fn upsert_period(&self, period: VotingPeriod) -> Result<(), StorageError> {
        self.check_write()?;
        self.periods.write().unwrap().insert(period.index, period);
        Ok(())
    }

    async fn get_proposal(&self, hash: &ProposalHash) -> Result<Option<Proposal>, StorageError> {
        self.check_read()?;
        Ok(self.proposals.read().unwrap().get(hash).cloned())
    }

    async fn get_proposal_by_id(&self, id: i64) -> Result<Option<Proposal>, StorageError> {
        self.check_read()?;
        let hash = self.proposals_by_id.read().unwrap().get(&id).cloned();
        Ok(hash.and_then(|h| self.proposals.read().unwrap().get(&h).cloned()))
    }

    async fn upsert_proposal(&self, proposal: Proposal) -> Result<(), StorageError> {
        self.check_write()?;
        self.proposals_by_id
            .write()
            .unwrap()
            .insert(proposal.id, proposal.hash.clone());
        self.proposals.write().unwrap().insert(proposal.hash.clone(), proposal);
        Ok(())
    }

    async fn delete_proposal(&self, id: i64) -> Result<(), StorageError> {
        self.check_delete()?;
        if let Some(hash) = self.proposals_by_id.write().unwrap().remove(&id) {
            self.proposals.write().unwrap().remove(&hash);
        }
        Ok(())
    }

    async fn proposals_in_epoch(&self, epoch: i32) -> Result<Vec<Proposal>, StorageError> {
        self.check_read()?;
        Ok(self
            .proposals
            .read()
            .unwrap()
            .values()
            .filter(|p| p.epoch == epoch)
            .cloned()
            .collect())
    }

    async fn get_snapshot(
        &self,
        period: i32,
        baker_id: AccountId,
    ) -> Result<Option<VotingSnapshot>, StorageError> {
        self.check_read()?;
        Ok(self.snapshots.read().unwrap().get(&(period, baker_id)).cloned())
    }

    async fn upsert_snapshot(&self, snapshot: VotingSnapshot) -> Result<(), StorageError> {
        self.check_write()?;
        self.snapshots
            .write()
            .unwrap()
            .insert((snapshot.period, snapshot.baker_id), snapshot);
        Ok(())
    }
}

#[async_trait]
impl CycleProvider for MockStorage {
    async fn get_cycle(&self, index: i32) -> Result<Option<Cycle>, StorageError> {
        self.check_read()?;
        Ok(self.cycles.read().unwrap().get(&index).cloned())
    }

    async fn upsert_cycle(&self, cycle: Cycle) -> Result<(), StorageError> {
        self.check_write()?;
        self.cycles.write().unwrap().insert(cycle.index, cycle);
        Ok(())
    }

    async fn delete_cycle(&self, index: i32) -> Result<(), StorageError> {
        self.check_delete()?;
        self.cycles.write().unwrap().remove(&index);
        Ok(())
    }
}

#[async_trait]
impl RightsProvider for MockStorage {
    async fn baking_rights_at_cycle(&self, cycle: i32) -> Result<Vec<BakingRight>, StorageError> {
        self.check_read()?;
        Ok(self.baking_rights.read().unwrap().get(&cycle).cloned().unwrap_or_default())
    }

    async fn upsert_baking_right(&self, right: BakingRight) -> Result<(), StorageError> {
        self.check_write()?;
        self.baking_rights
            .write()
            .unwrap()
            .entry(right.cycle)
            .or_default()
            .push(right);
        Ok(())
    }

    async fn endorsing_rights_at_cycle(&self, cycle: i32) -> Result<Vec<EndorsingRight>, StorageError> {
        self.check_read()?;
        Ok(self
            .endorsing_rights
            .read()
            .unwrap()
            .get(&cycle)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_endorsing_right(&self, right: EndorsingRight) -> Result<(), StorageError> {
        self.check_write()?;
        self.endorsing_rights
            .write()
            .unwrap()
            .entry(right.cycle)
            .or_default()
            .push(right);
        Ok(())
    }

    async fn delete_rights_from_level(&self, level: Level) -> Result<(), StorageError> {
        self.check_delete()?;
        for rights in self.baking_rights.write().unwrap().values_mut() {
            rights.retain(|r| r.level < level);
        }
        for rights in self.endorsing_rights.write().unwrap().values_mut() {
            rights.retain(|r| r.level < level);
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteProvider for MockStorage {
    async fn get_quote(&self, level: Level) -> Result<Option<Quote>, StorageError> {
        self.check_read()?;
        Ok(self.quotes.read().unwrap().get(&level).copied())
    }

    async fn upsert_quote(&self, quote: Quote) -> Result<(), StorageError> {
        self.check_write()?;
        self.quotes.write().unwrap().insert(quote.level, quote);
        Ok(())
    }
}

impl Storage for MockStorage {}
