//! Entity Cache (C2): in-memory write-through cache over accounts,
//! proposals, voting periods, protocols and app-state. Enforces identity
//! (one object per key) and tracks dirtiness, grounded in the upstream
//! daemon's `core/storage/cache.rs` and `providers/cache.rs` (dashmap-backed
//! maps plus an LRU eviction bound per entity type).

use std::collections::HashSet;
use std::sync::Mutex;

use dashmap::DashMap;
use lru::LruCache;

use tzindex_common::account::{Account, AccountId};
use tzindex_common::app_state::AppState;
use tzindex_common::crypto::{Address, ProposalHash};
use tzindex_common::protocol::Protocol;
use tzindex_common::voting::{Proposal, VotingPeriod};

use crate::core::storage::{Storage, StorageError};

const DEFAULT_LRU_CAPACITY: usize = 4096;

/// A key identifying one cached entry, used to track dirtiness (spec §4.4
/// "Attachment contract"). Dirty entries are pinned against eviction until
/// the next commit flush.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Account(AccountId),
    Proposal(ProposalHash),
    Period(i32),
    Protocol(ProposalHash),
    AppState,
}

pub struct EntityCache {
    accounts_by_id: DashMap<AccountId, Account>,
    accounts_by_address: DashMap<Address, AccountId>,
    proposals: DashMap<ProposalHash, Proposal>,
    periods: DashMap<i32, VotingPeriod>,
    protocols: DashMap<ProposalHash, Protocol>,
    app_state: Mutex<Option<AppState>>,

    dirty: Mutex<HashSet<CacheKey>>,
    account_lru: Mutex<LruCache<AccountId, ()>>,
    proposal_lru: Mutex<LruCache<ProposalHash, ()>>,
}

impl Default for EntityCache {
    fn default() -> Self {
        EntityCache::new(DEFAULT_LRU_CAPACITY)
    }
}

impl EntityCache {
    pub fn new(capacity: usize) -> Self {
        let cap = std::num::NonZeroUsize::new(capacity.max(1)).unwrap();
        EntityCache {
            accounts_by_id: DashMap::new(),
            accounts_by_address: DashMap::new(),
            proposals: DashMap::new(),
            periods: DashMap::new(),
            protocols: DashMap::new(),
            app_state: Mutex::new(None),
            dirty: Mutex::new(HashSet::new()),
            account_lru: Mutex::new(LruCache::new(cap)),
            proposal_lru: Mutex::new(LruCache::new(cap)),
        }
    }

    fn touch_account(&self, id: AccountId) {
        let evicted = self.account_lru.lock().unwrap().push(id, ());
        if let Some((evicted_id, _)) = evicted {
            if evicted_id != id && !self.is_dirty(&CacheKey::Account(evicted_id)) {
                if let Some((_, account)) = self.accounts_by_id.remove(&evicted_id) {
                    self.accounts_by_address.remove(account.address());
                }
            }
        }
    }

    fn is_dirty(&self, key: &CacheKey) -> bool {
        self.dirty.lock().unwrap().contains(key)
    }

    /// Promotes an entry to dirty, per spec §4.4's attach contract: "before
    /// mutating an entity, a commit calls `attach(e)` which promotes the
    /// entry to dirty... on commit success, dirty flags are cleared".
    fn attach(&self, key: CacheKey) {
        self.dirty.lock().unwrap().insert(key);
    }

    pub async fn get_account(
        &self,
        store: &dyn Storage,
        id: AccountId,
    ) -> Result<Option<Account>, StorageError> {
        if let Some(account) = self.accounts_by_id.get(&id) {
            self.touch_account(id);
            return Ok(Some(account.clone()));
        }
        let loaded = store.get_account(id).await?;
        if let Some(account) = &loaded {
            self.accounts_by_address.insert(account.address().clone(), id);
            self.accounts_by_id.insert(id, account.clone());
            self.touch_account(id);
        }
        Ok(loaded)
    }

    pub async fn get_account_by_address(
        &self,
        store: &dyn Storage,
        address: &Address,
    ) -> Result<Option<Account>, StorageError> {
        if let Some(id) = self.accounts_by_address.get(address).map(|r| *r) {
            return self.get_account(store, id).await;
        }
        let loaded = store.get_account_by_address(address).await?;
        if let Some(account) = &loaded {
            let id = account.id();
            self.accounts_by_address.insert(address.clone(), id);
            self.accounts_by_id.insert(id, account.clone());
            self.touch_account(id);
        }
        Ok(loaded)
    }

    /// Attaches and replaces an account in place. Commits must go through
    /// this rather than constructing a second instance, preserving the
    /// "single source of identity" rule (spec §4.4).
    pub fn put_account(&self, account: Account) {
        let id = account.id();
        self.attach(CacheKey::Account(id));
        self.accounts_by_address.insert(account.address().clone(), id);
        self.accounts_by_id.insert(id, account);
        self.touch_account(id);
    }

    pub fn evict_account(&self, id: AccountId) {
        if let Some((_, account)) = self.accounts_by_id.remove(&id) {
            self.accounts_by_address.remove(account.address());
        }
        self.dirty.lock().unwrap().remove(&CacheKey::Account(id));
    }

    pub async fn get_proposal(
        &self,
        store: &dyn Storage,
        hash: &ProposalHash,
    ) -> Result<Option<Proposal>, StorageError> {
        if let Some(p) = self.proposals.get(hash) {
            self.proposal_lru.lock().unwrap().push(hash.clone(), ());
            return Ok(Some(p.clone()));
        }
        let loaded = store.get_proposal(hash).await?;
        if let Some(p) = &loaded {
            self.proposals.insert(hash.clone(), p.clone());
            self.proposal_lru.lock().unwrap().push(hash.clone(), ());
        }
        Ok(loaded)
    }

    pub fn put_proposal(&self, proposal: Proposal) {
        self.attach(CacheKey::Proposal(proposal.hash.clone()));
        self.proposal_lru.lock().unwrap().push(proposal.hash.clone(), ());
        self.proposals.insert(proposal.hash.clone(), proposal);
    }

    pub fn evict_proposal(&self, hash: &ProposalHash) {
        self.proposals.remove(hash);
        self.dirty.lock().unwrap().remove(&CacheKey::Proposal(hash.clone()));
    }

    /// All proposals for `epoch`, with cache-resident entries overriding the
    /// store's copy so a commit that mutated a sibling proposal earlier in
    /// the same block is visible before the cache is flushed.
    pub async fn proposals_in_epoch(&self, store: &dyn Storage, epoch: i32) -> Result<Vec<Proposal>, StorageError> {
        let mut by_hash: std::collections::HashMap<ProposalHash, Proposal> = store
            .proposals_in_epoch(epoch)
            .await?
            .into_iter()
            .map(|p| (p.hash.clone(), p))
            .collect();
        for entry in self.proposals.iter() {
            if entry.epoch == epoch {
                by_hash.insert(entry.hash.clone(), entry.clone());
            }
        }
        Ok(by_hash.into_values().collect())
    }

    pub async fn get_period(
        &self,
        store: &dyn Storage,
        index: i32,
    ) -> Result<Option<VotingPeriod>, StorageError> {
        if let Some(p) = self.periods.get(&index) {
            return Ok(Some(p.clone()));
        }
        let loaded = store.get_period(index).await?;
        if let Some(p) = &loaded {
            self.periods.insert(index, p.clone());
        }
        Ok(loaded)
    }

    pub fn put_period(&self, period: VotingPeriod) {
        self.attach(CacheKey::Period(period.index));
        self.periods.insert(period.index, period);
    }

    pub async fn get_protocol(
        &self,
        store: &dyn Storage,
        hash: &ProposalHash,
    ) -> Result<Option<Protocol>, StorageError> {
        if let Some(p) = self.protocols.get(hash) {
            return Ok(Some(p.clone()));
        }
        let loaded = store.get_protocol(hash).await?;
        if let Some(p) = &loaded {
            self.protocols.insert(hash.clone(), p.clone());
        }
        Ok(loaded)
    }

    pub fn put_protocol(&self, protocol: Protocol) {
        self.attach(CacheKey::Protocol(protocol.hash.clone()));
        self.protocols.insert(protocol.hash.clone(), protocol);
    }

    pub async fn get_app_state(&self, store: &dyn Storage) -> Result<AppState, StorageError> {
        if let Some(state) = self.app_state.lock().unwrap().clone() {
            return Ok(state);
        }
        let loaded = store.get_app_state().await?;
        *self.app_state.lock().unwrap() = Some(loaded.clone());
        Ok(loaded)
    }

    pub fn put_app_state(&self, state: AppState) {
        self.attach(CacheKey::AppState);
        *self.app_state.lock().unwrap() = Some(state);
    }

    /// Flushes every dirty entry to `store` in one go, then clears dirty
    /// flags (spec §4.4: "on commit success, dirty flags are cleared").
    pub async fn flush(&self, store: &dyn Storage) -> Result<(), StorageError> {
        let keys: Vec<CacheKey> = self.dirty.lock().unwrap().iter().cloned().collect();
        for key in &keys {
            match key {
                CacheKey::Account(id) => {
                    if let Some(account) = self.accounts_by_id.get(id) {
                        store.upsert_account(account.clone()).await?;
                    }
                }
                CacheKey::Proposal(hash) => {
                    if let Some(p) = self.proposals.get(hash) {
                        store.upsert_proposal(p.clone()).await?;
                    }
                }
                CacheKey::Period(index) => {
                    if let Some(p) = self.periods.get(index) {
                        store.upsert_period(p.clone()).await?;
                    }
                }
                CacheKey::Protocol(hash) => {
                    if let Some(p) = self.protocols.get(hash) {
                        store.insert_protocol(p.clone()).await?;
                    }
                }
                CacheKey::AppState => {
                    if let Some(state) = self.app_state.lock().unwrap().clone() {
                        store.set_app_state(state).await?;
                    }
                }
            }
        }
        self.dirty.lock().unwrap().clear();
        Ok(())
    }

    /// On a failed transaction, dirty entries are dropped from the cache so
    /// the next read refetches from the store (spec §4.4 "on failure, the
    /// dirty entries are refetched from the store or removed").
    pub fn discard_dirty(&self) {
        let keys: Vec<CacheKey> = self.dirty.lock().unwrap().drain().collect();
        for key in keys {
            match key {
                CacheKey::Account(id) => {
                    self.evict_account(id);
                }
                CacheKey::Proposal(hash) => {
                    self.proposals.remove(&hash);
                }
                CacheKey::Period(index) => {
                    self.periods.remove(&index);
                }
                CacheKey::Protocol(hash) => {
                    self.protocols.remove(&hash);
                }
                CacheKey::AppState => {
                    *self.app_state.lock().unwrap() = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::mock::MockStorage;

    fn dummy_account(id: AccountId, addr: &str) -> Account {
        Account::Ghost {
            header: tzindex_common::account::AccountHeader::new(
                id,
                Address::parse(addr).unwrap(),
                1,
            ),
        }
    }

    #[tokio::test]
    async fn put_then_flush_persists_to_store() {
        let cache = EntityCache::new(16);
        let store = MockStorage::new();
        cache.put_account(dummy_account(1, "tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"));
        cache.flush(&store).await.unwrap();
        assert!(store.get_account(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn discard_dirty_drops_unflushed_account() {
        let cache = EntityCache::new(16);
        cache.put_account(dummy_account(2, "tz1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"));
        cache.discard_dirty();
        let store = MockStorage::new();
        let cached = cache.get_account(&store, 2).await.unwrap();
        assert!(cached.is_none());
    }
}
