//! RevealCommit, per spec §4.3: attaches the sender's public key; a no-op
//! on revert beyond clearing it back out and restoring the fee.

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{Operation, OperationContent, OperationId, OperationStatus, RevealContent};

use super::{credit, debit, new_operation, CommitContext, CommitError};

fn set_key(account: &mut tzindex_common::account::Account, key: Option<tzindex_common::crypto::PublicKey>) {
    match account {
        tzindex_common::account::Account::User { revealed_key, .. } => *revealed_key = key,
        tzindex_common::account::Account::Delegate { revealed_key, .. } => *revealed_key = key,
        _ => {}
    }
}

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: RevealContent,
) -> Result<Operation, CommitError> {
    let mut sender = ctx
        .account(sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(sender_id.to_string()))?;
    sender.header_mut().balance = debit(sender.header().balance, content.baker_fee)?;
    sender.header_mut().touch(level);
    sender.header_mut().counter += 1;
    sender.header_mut().counters.reveals_count += 1;
    if matches!(status, OperationStatus::Applied) {
        set_key(&mut sender, Some(content.public_key.clone()));
    }
    ctx.put_account(sender);

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Reveal(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Reveal(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-reveal content".into(),
        )));
    };

    let mut sender = ctx
        .account(op.sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(op.sender_id.to_string()))?;
    sender.header_mut().balance = credit(sender.header().balance, content.baker_fee)?;
    sender.header_mut().counter -= 1;
    sender.header_mut().counters.reveals_count -= 1;
    if matches!(op.status, OperationStatus::Applied) {
        set_key(&mut sender, None);
    }
    ctx.put_account(sender);

    Ok(())
}
