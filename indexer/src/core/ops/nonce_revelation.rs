//! NonceRevelationCommit, per spec §4.3: freezes the revealing baker's fixed
//! `seedNonceRevelationTip` reward the node already computed, released at
//! cycle unfreeze like every other baking reward (glossary "Freeze /
//! unfreeze").

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{NonceRevelationContent, Operation, OperationContent, OperationId, OperationStatus};

use super::{adjust_frozen, new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: NonceRevelationContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        let cycle = ctx.current_cycle().await?;
        let mut baker = ctx
            .account(content.baker_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(content.baker_id.to_string()))?;
        adjust_frozen(&mut baker, cycle, 0, content.reward, 0);
        baker.header_mut().counters.nonce_revelations_count += 1;
        ctx.put_account(baker);
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::NonceRevelation(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::NonceRevelation(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-nonce-revelation content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    let cycle = ctx.current_cycle().await?;
    let mut baker = ctx
        .account(content.baker_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(content.baker_id.to_string()))?;
    adjust_frozen(&mut baker, cycle, 0, -content.reward, 0);
    baker.header_mut().counters.nonce_revelations_count -= 1;
    ctx.put_account(baker);

    Ok(())
}
