//! MigrationCommit, per spec §4.3: synthetic operations the protocol
//! handler emits itself at an upgrade boundary (bootstrap airdrops, code
//! changes, subsidies, ...), never originating from the node's mempool.
//! `balance_change` may be negative (e.g. a subsidy clawback).

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{MigrationContent, Operation, OperationContent, OperationId, OperationStatus};

use super::{new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: MigrationContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        if let Some(account_id) = content.account_id {
            let mut account = ctx
                .account(account_id)
                .await?
                .ok_or_else(|| CommitError::AccountNotFound(account_id.to_string()))?;
            let balance = account.header().balance.checked_add(content.balance_change).ok_or(
                tzindex_common::error::BalanceError::Overflow,
            )?;
            account.header_mut().balance = balance;
            account.header_mut().touch(level);
            ctx.put_account(account);
        }
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Migration(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Migration(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-migration content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    if let Some(account_id) = content.account_id {
        let mut account = ctx
            .account(account_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(account_id.to_string()))?;
        let balance = account
            .header()
            .balance
            .checked_sub(content.balance_change)
            .ok_or(tzindex_common::error::BalanceError::Overflow)?;
        account.header_mut().balance = balance;
        ctx.put_account(account);
    }

    Ok(())
}
