use tzindex_common::account::{Account, AccountId};
use tzindex_common::block::Level;
use tzindex_common::crypto::Address;
use tzindex_common::operation::OperationId;

use crate::core::cache::EntityCache;
use crate::core::storage::{Storage, StorageError};

/// Threaded through every operation commit's `apply`/`revert`: the mutable
/// per-block state object, grounded in the upstream daemon's
/// `ApplicableChainState<'a, S: Storage>` wrapping a `ChainState`.
pub struct CommitContext<'a> {
    pub cache: &'a EntityCache,
    pub store: &'a dyn Storage,
    pub level: Level,
}

impl<'a> CommitContext<'a> {
    pub fn new(cache: &'a EntityCache, store: &'a dyn Storage, level: Level) -> Self {
        CommitContext { cache, store, level }
    }

    pub async fn account(&self, id: AccountId) -> Result<Option<Account>, StorageError> {
        self.cache.get_account(self.store, id).await
    }

    pub async fn account_by_address(&self, address: &Address) -> Result<Option<Account>, StorageError> {
        self.cache.get_account_by_address(self.store, address).await
    }

    pub fn put_account(&self, account: Account) {
        self.cache.put_account(account);
    }

    /// Allocates the next global operation id out of `AppState`, per spec
    /// §4.4 ("`NextOperationId()` is served from AppState atomically inside
    /// the transaction; operation ids never collide").
    pub async fn allocate_operation_id(&self) -> Result<OperationId, StorageError> {
        let mut state = self.cache.get_app_state(self.store).await?;
        let id = state.allocate_operation_ids(1);
        self.cache.put_app_state(state);
        Ok(id)
    }

    pub async fn allocate_account_id(&self) -> Result<AccountId, StorageError> {
        let mut state = self.cache.get_app_state(self.store).await?;
        let id = state.allocate_account_id();
        self.cache.put_app_state(state);
        Ok(id)
    }

    /// The cycle index `self.level` falls in, under the active protocol's
    /// `blocksPerCycle` (spec §4.6). Commits that freeze/unfreeze deposits,
    /// rewards or fees key `DelegateInfo.frozen` by this index.
    pub async fn current_cycle(&self) -> Result<i32, StorageError> {
        let state = self.cache.get_app_state(self.store).await?;
        let constants = match self.store.get_protocol_by_code(state.protocol_code).await? {
            Some(protocol) => protocol.constants,
            None => tzindex_common::protocol::ProtocolConstants::default(),
        };
        Ok(self.level / constants.blocks_per_cycle)
    }
}
