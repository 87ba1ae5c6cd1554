//! Cycle / Rights / Snapshot Engine (C6), per spec §4.6. At the first
//! block of a cycle: records the roll snapshot and the cycle's baking and
//! endorsing rights. At the last block of cycle `c - preservedCycles`:
//! unfreezes deposits/rewards/fees back into delegates' spendable
//! balances.

use std::collections::BTreeSet;

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::cycle::Cycle;
use tzindex_common::rights::{BakingRight, EndorsingRight};

use crate::core::ops::{credit, CommitContext, CommitError};

const MAX_DELEGATES: usize = usize::MAX;

#[derive(Default)]
pub struct CycleEngine;

impl CycleEngine {
    pub fn new() -> Self {
        CycleEngine
    }

    /// Persists the roll snapshot and the precomputed rights for a cycle
    /// (spec §4.6 steps 1-2). `baking_rights`/`endorsing_rights` are
    /// assumed already fetched from C1 for the cycle's snapshot.
    pub async fn begin_cycle(
        &self,
        ctx: &CommitContext<'_>,
        index: i32,
        snapshot_level: Level,
        snapshot_index: i32,
        total_rolls: i64,
        total_staking: i64,
        seed: String,
        baking_rights: Vec<BakingRight>,
        endorsing_rights: Vec<EndorsingRight>,
    ) -> Result<(), CommitError> {
        let selected_bakers: Vec<AccountId> = baking_rights
            .iter()
            .map(|r| r.baker_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cycle = Cycle {
            index,
            snapshot_level,
            snapshot_index,
            total_rolls,
            total_staking,
            selected_bakers,
            seed,
        };
        ctx.store.upsert_cycle(cycle).await?;

        for right in baking_rights {
            ctx.store.upsert_baking_right(right).await?;
        }
        for right in endorsing_rights {
            ctx.store.upsert_endorsing_right(right).await?;
        }
        Ok(())
    }

    /// Unfreezes and distributes rewards/fees/deposits for cycle
    /// `cycle_index - preserved_cycles` back to delegates' spendable
    /// balances (spec §4.6 steps 4-5).
    pub async fn end_cycle(
        &self,
        ctx: &CommitContext<'_>,
        cycle_index: i32,
        preserved_cycles: i32,
    ) -> Result<(), CommitError> {
        let unfreeze_cycle = cycle_index - preserved_cycles;
        if unfreeze_cycle < 0 {
            return Ok(());
        }

        let delegates = ctx.store.list_delegates(0, MAX_DELEGATES).await?;
        for mut account in delegates {
            let frozen = match account.as_delegate_mut() {
                Some(delegate) => delegate.frozen.remove(&unfreeze_cycle),
                None => None,
            };
            if let Some(frozen) = frozen {
                let total = frozen.deposit + frozen.reward + frozen.fees;
                account.header_mut().balance = credit(account.header().balance, total)?;
                ctx.put_account(account);
            }
        }
        Ok(())
    }

    /// Reorg safety (spec §4.6): rolling back level `level` deletes any
    /// rights rows materialized at or after it.
    pub async fn revert_from_level(&self, ctx: &CommitContext<'_>, level: Level) -> Result<(), CommitError> {
        ctx.store.delete_rights_from_level(level).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::EntityCache;
    use crate::core::storage::mock::MockStorage;
    use tzindex_common::account::{Account, AccountHeader, DelegateInfo, FrozenBalance};
    use tzindex_common::crypto::Address;

    fn delegate_with_frozen(id: AccountId, cycle: i32, frozen: FrozenBalance) -> Account {
        let header = AccountHeader::new(id, Address::parse("tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap(), 1);
        let mut delegate = DelegateInfo::default();
        delegate.frozen.insert(cycle, frozen);
        Account::Delegate {
            header,
            delegate,
            revealed_key: None,
        }
    }

    #[tokio::test]
    async fn end_cycle_unfreezes_into_spendable_balance() {
        let store = MockStorage::new();
        let frozen = FrozenBalance {
            deposit: 640,
            reward: 16,
            fees: 0,
        };
        store.upsert_account(delegate_with_frozen(1, 10, frozen)).await.unwrap();
        let cache = EntityCache::new(16);
        let ctx = CommitContext::new(&cache, &store, 1);

        let engine = CycleEngine::new();
        engine.end_cycle(&ctx, 15, 5).await.unwrap();

        let account = ctx.account(1).await.unwrap().unwrap();
        assert_eq!(account.header().balance, 656);
        assert!(account.as_delegate().unwrap().frozen.is_empty());
    }

    #[tokio::test]
    async fn end_cycle_before_preserved_cycles_elapsed_is_noop() {
        let store = MockStorage::new();
        let engine = CycleEngine::new();
        let cache = EntityCache::new(16);
        let ctx = CommitContext::new(&cache, &store, 1);
        engine.end_cycle(&ctx, 2, 5).await.unwrap();
    }
}
