//! TransactionCommit, per spec §4.3: resolves sender and target accounts.
//! For `applied`, debits `sender.balance -= (amount + bakerFee + storageFee +
//! allocationFee)` and credits `target.balance += amount`. For
//! `failed/backtracked/skipped`, only the baker fee is debited.

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{Operation, OperationContent, OperationId, OperationStatus, TransactionContent};

use super::{credit, debit, new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: TransactionContent,
) -> Result<Operation, CommitError> {
    let total_fee = content.baker_fee + content.storage_fee + content.allocation_fee;

    let mut sender = ctx
        .account(sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(sender_id.to_string()))?;
    let debited = if matches!(status, OperationStatus::Applied) {
        debit(sender.header().balance, content.amount + total_fee)?
    } else {
        debit(sender.header().balance, content.baker_fee)?
    };
    sender.header_mut().balance = debited;
    sender.header_mut().touch(level);
    sender.header_mut().counter += 1;
    sender.header_mut().counters.transactions_count += 1;
    ctx.put_account(sender);

    if matches!(status, OperationStatus::Applied) {
        if let Some(target_id) = content.target_id {
            let mut target = ctx
                .account(target_id)
                .await?
                .ok_or_else(|| CommitError::AccountNotFound(target_id.to_string()))?;
            target.header_mut().balance = credit(target.header().balance, content.amount)?;
            target.header_mut().touch(level);
            target.header_mut().counters.transactions_count += 1;
            ctx.put_account(target);
        }
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Transaction(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Transaction(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-transaction content".into(),
        )));
    };
    let total_fee = content.baker_fee + content.storage_fee + content.allocation_fee;

    let mut sender = ctx
        .account(op.sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(op.sender_id.to_string()))?;
    let credited = if matches!(op.status, OperationStatus::Applied) {
        credit(sender.header().balance, content.amount + total_fee)?
    } else {
        credit(sender.header().balance, content.baker_fee)?
    };
    sender.header_mut().balance = credited;
    sender.header_mut().counter -= 1;
    sender.header_mut().counters.transactions_count -= 1;
    ctx.put_account(sender);

    if matches!(op.status, OperationStatus::Applied) {
        if let Some(target_id) = content.target_id {
            let mut target = ctx
                .account(target_id)
                .await?
                .ok_or_else(|| CommitError::AccountNotFound(target_id.to_string()))?;
            target.header_mut().balance = debit(target.header().balance, content.amount)?;
            target.header_mut().counters.transactions_count -= 1;
            ctx.put_account(target);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::EntityCache;
    use crate::core::storage::mock::MockStorage;
    use tzindex_common::account::{Account, AccountHeader};
    use tzindex_common::crypto::Address;

    fn account(id: AccountId, addr: &str, balance: i64) -> Account {
        let mut header = AccountHeader::new(id, Address::parse(addr).unwrap(), 1);
        header.balance = balance;
        Account::User {
            header,
            delegate_id: None,
            revealed_key: None,
        }
    }

    fn op_hash() -> OperationHash {
        OperationHash::parse(&"A".repeat(54)).unwrap()
    }

    #[tokio::test]
    async fn apply_moves_balance_and_bumps_counters_s1() {
        let store = MockStorage::new();
        store.upsert_account(account(1, "tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 1_000_000)).await.unwrap();
        store.upsert_account(account(2, "tz1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", 0)).await.unwrap();
        let cache = EntityCache::new(16);
        let ctx = CommitContext::new(&cache, &store, 101);

        let content = TransactionContent {
            target_id: Some(2),
            target_address: Address::parse("tz1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap(),
            amount: 500_000,
            baker_fee: 1_000,
            storage_fee: 0,
            allocation_fee: 0,
            parameters_micheline: None,
            parameters_json: None,
            internal_results: vec![],
        };
        apply(
            &ctx,
            1,
            101,
            chrono::Utc::now(),
            op_hash(),
            1,
            OperationStatus::Applied,
            content,
        )
        .await
        .unwrap();

        let sender = ctx.account(1).await.unwrap().unwrap();
        assert_eq!(sender.header().balance, 499_000);
        assert_eq!(sender.header().counters.transactions_count, 1);
        let target = ctx.account(2).await.unwrap().unwrap();
        assert_eq!(target.header().balance, 500_000);
        assert_eq!(target.header().counters.transactions_count, 1);
    }

    #[tokio::test]
    async fn apply_then_revert_is_identity() {
        let store = MockStorage::new();
        store.upsert_account(account(1, "tz1aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 1_000_000)).await.unwrap();
        store.upsert_account(account(2, "tz1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", 0)).await.unwrap();
        let cache = EntityCache::new(16);
        let ctx = CommitContext::new(&cache, &store, 101);

        let content = TransactionContent {
            target_id: Some(2),
            target_address: Address::parse("tz1bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap(),
            amount: 500_000,
            baker_fee: 1_000,
            storage_fee: 0,
            allocation_fee: 0,
            parameters_micheline: None,
            parameters_json: None,
            internal_results: vec![],
        };
        let op = apply(
            &ctx,
            1,
            101,
            chrono::Utc::now(),
            op_hash(),
            1,
            OperationStatus::Applied,
            content,
        )
        .await
        .unwrap();

        revert(&ctx, &op).await.unwrap();

        let sender = ctx.account(1).await.unwrap().unwrap();
        assert_eq!(sender.header().balance, 1_000_000);
        assert_eq!(sender.header().counters.transactions_count, 0);
        let target = ctx.account(2).await.unwrap().unwrap();
        assert_eq!(target.header().balance, 0);
        assert_eq!(target.header().counters.transactions_count, 0);
    }
}
