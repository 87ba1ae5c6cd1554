//! ActivationCommit, per spec §4.3: unlocks a fundraiser account, turning
//! a pre-existing `Ghost` placeholder (seeded at genesis) into a funded
//! `User` account. Reverting turns it back into a zero-balance `Ghost`.

use chrono::{DateTime, Utc};

use tzindex_common::account::{Account, AccountId};
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{ActivationContent, Operation, OperationContent, OperationId, OperationStatus};

use super::{new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: ActivationContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        let account = ctx
            .account(content.account_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(content.account_id.to_string()))?;
        let mut header = account.header().clone();
        header.balance = content.balance;
        header.touch(level);
        header.counters.activations_count += 1;
        ctx.put_account(Account::User {
            header,
            delegate_id: None,
            revealed_key: None,
        });
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Activation(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Activation(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-activation content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    let account = ctx
        .account(content.account_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(content.account_id.to_string()))?;
    let mut header = account.header().clone();
    header.balance = 0;
    header.counters.activations_count -= 1;
    ctx.put_account(Account::Ghost { header });

    Ok(())
}
