//! EndorsementCommit, per spec §4.3: freezes the endorser's security
//! deposit and reward for the cycle (glossary "Freeze / unfreeze"; spec §4.3
//! "Credits deposit + reward, accumulated into frozen balances, released at
//! cycle unfreeze"). Revert exactly unwinds both frozen fields.

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{EndorsementContent, Operation, OperationContent, OperationId, OperationStatus};

use super::{adjust_frozen, new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: EndorsementContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        let cycle = ctx.current_cycle().await?;
        let mut delegate = ctx
            .account(content.delegate_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(content.delegate_id.to_string()))?;
        adjust_frozen(&mut delegate, cycle, content.deposit, content.reward, 0);
        delegate.header_mut().counters.endorsements_count += 1;
        ctx.put_account(delegate);
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Endorsement(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Endorsement(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-endorsement content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    let cycle = ctx.current_cycle().await?;
    let mut delegate = ctx
        .account(content.delegate_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(content.delegate_id.to_string()))?;
    adjust_frozen(&mut delegate, cycle, -content.deposit, -content.reward, 0);
    delegate.header_mut().counters.endorsements_count -= 1;
    ctx.put_account(delegate);

    Ok(())
}
