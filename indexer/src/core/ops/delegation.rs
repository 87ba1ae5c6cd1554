//! DelegationCommit, per spec §4.3: records the sender's previous delegate
//! id into `priorDelegateId` before changing it, so revert is an exact
//! restoration rather than a derived lookup. Also maintains the old and new
//! delegate's `stakingBalance`/`delegatorsCount` (invariant 3: `stakingBalance
//! = sum(delegator.balance) + delegate.balance`), and promotes a
//! self-delegating sender to `Account::Delegate`.

use chrono::{DateTime, Utc};

use tzindex_common::account::{Account, AccountId, DelegateInfo};
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{DelegationContent, Operation, OperationContent, OperationId, OperationStatus};

use super::{credit, debit, new_operation, CommitContext, CommitError};

fn set_delegate(account: &mut Account, delegate_id: Option<AccountId>) {
    if let Account::User { delegate_id: d, .. } = account {
        *d = delegate_id;
    }
}

/// Converts a self-delegating `User` into its own `Delegate`, seeding
/// `stakingBalance` with its own balance (invariant 3's `delegate.balance`
/// term) and an empty delegator/frozen set.
fn promote_to_delegate(account: Account, level: Level) -> Account {
    match account {
        Account::User { header, revealed_key, .. } => {
            let staking_balance = header.balance;
            Account::Delegate {
                header,
                delegate: DelegateInfo {
                    staking_balance,
                    delegators_count: 0,
                    active_since: level,
                    deactivation_level: None,
                    frozen: Default::default(),
                },
                revealed_key,
            }
        }
        other => other,
    }
}

/// Mirror image of `promote_to_delegate`, used on revert.
fn demote_to_user(account: Account, delegate_id: Option<AccountId>) -> Account {
    match account {
        Account::Delegate { header, revealed_key, .. } => Account::User {
            header,
            delegate_id,
            revealed_key,
        },
        other => other,
    }
}

async fn adjust_delegate(
    ctx: &CommitContext<'_>,
    delegate_id: AccountId,
    balance_delta: i64,
    count_delta: i32,
) -> Result<(), CommitError> {
    let mut delegate = ctx
        .account(delegate_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(delegate_id.to_string()))?;
    if let Some(info) = delegate.as_delegate_mut() {
        info.staking_balance += balance_delta;
        info.delegators_count += count_delta;
    }
    ctx.put_account(delegate);
    Ok(())
}

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    mut content: DelegationContent,
) -> Result<Operation, CommitError> {
    let mut sender = ctx
        .account(sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(sender_id.to_string()))?;
    sender.header_mut().balance = debit(sender.header().balance, content.baker_fee)?;
    sender.header_mut().touch(level);
    sender.header_mut().counter += 1;
    sender.header_mut().counters.delegations_count += 1;

    content.prior_delegate_id = sender.delegate_id();

    if matches!(status, OperationStatus::Applied) {
        let old_id = content.prior_delegate_id;
        let new_id = content.new_delegate_id;

        if old_id != new_id {
            let sender_balance = sender.header().balance;

            match new_id {
                Some(new) if new == sender_id => {
                    sender = promote_to_delegate(sender, level);
                }
                Some(new) => {
                    adjust_delegate(ctx, new, sender_balance, 1).await?;
                    set_delegate(&mut sender, Some(new));
                }
                None => {
                    set_delegate(&mut sender, None);
                }
            }

            if let Some(old) = old_id {
                adjust_delegate(ctx, old, -sender_balance, -1).await?;
            }
        }
    }
    ctx.put_account(sender);

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Delegation(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Delegation(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-delegation content".into(),
        )));
    };

    let mut sender = ctx
        .account(op.sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(op.sender_id.to_string()))?;

    if matches!(op.status, OperationStatus::Applied) {
        let old_id = content.prior_delegate_id;
        let new_id = content.new_delegate_id;

        if old_id != new_id {
            let sender_balance = sender.header().balance;

            match new_id {
                Some(new) if new == op.sender_id => {
                    sender = demote_to_user(sender, old_id);
                }
                Some(new) => {
                    adjust_delegate(ctx, new, -sender_balance, -1).await?;
                    set_delegate(&mut sender, old_id);
                }
                None => {
                    set_delegate(&mut sender, old_id);
                }
            }

            if let Some(old) = old_id {
                adjust_delegate(ctx, old, sender_balance, 1).await?;
            }
        }
    }

    sender.header_mut().balance = credit(sender.header().balance, content.baker_fee)?;
    sender.header_mut().counter -= 1;
    sender.header_mut().counters.delegations_count -= 1;
    ctx.put_account(sender);

    Ok(())
}
