//! RegisterConstantCommit, per spec §4.3: registers a global Michelson
//! constant expression, debiting the registrant for its storage cost. The
//! constant table itself is append-only at the protocol level; the
//! indexer's job is only to account for the fee and bump the counter.

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{Operation, OperationContent, OperationId, OperationStatus, RegisterConstantContent};

use super::{credit, debit, new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: RegisterConstantContent,
) -> Result<Operation, CommitError> {
    let mut sender = ctx
        .account(sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(sender_id.to_string()))?;
    sender.header_mut().balance = debit(sender.header().balance, content.storage_fee)?;
    sender.header_mut().touch(level);
    sender.header_mut().counter += 1;
    if matches!(status, OperationStatus::Applied) {
        sender.header_mut().counters.register_constants_count += 1;
    }
    ctx.put_account(sender);

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::RegisterConstant(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::RegisterConstant(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-register-constant content".into(),
        )));
    };

    let mut sender = ctx
        .account(op.sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(op.sender_id.to_string()))?;
    sender.header_mut().balance = credit(sender.header().balance, content.storage_fee)?;
    sender.header_mut().counter -= 1;
    if matches!(op.status, OperationStatus::Applied) {
        sender.header_mut().counters.register_constants_count -= 1;
    }
    ctx.put_account(sender);

    Ok(())
}
