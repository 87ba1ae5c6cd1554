//! Free-standing match-based dispatch from a decoded `OperationContent` to
//! its commit module. Kept separate from `ProtocolHandler` so a handler
//! can reuse the same table regardless of which kinds it declares support
//! for (spec §4.2 "later protocols... override only the ops whose
//! semantics change").

use chrono::{DateTime, Utc};

use tzindex_common::block::{Level, RawOperation};
use tzindex_common::operation::{Operation, OperationContent};

use crate::core::ops::{self, CommitContext, CommitError};

pub async fn apply_operation(
    ctx: &CommitContext<'_>,
    level: Level,
    timestamp: DateTime<Utc>,
    raw: &RawOperation,
) -> Result<Operation, CommitError> {
    let id = ctx.allocate_operation_id().await?;
    let op_hash = raw.op_hash.clone();
    let sender_id = raw.sender_id;
    let status = raw.status;

    match raw.content.clone() {
        OperationContent::Transaction(c) => {
            ops::transaction::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Origination(c) => {
            ops::origination::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Delegation(c) => {
            ops::delegation::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Reveal(c) => {
            ops::reveal::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Proposals(c) => {
            ops::proposals::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Ballot(c) => {
            ops::ballot::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::DoubleBaking(c) => {
            ops::double_baking::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::DoubleEndorsing(c) => {
            ops::double_endorsing::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::NonceRevelation(c) => {
            ops::nonce_revelation::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Endorsement(c) => {
            ops::endorsement::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Activation(c) => {
            ops::activation::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::Migration(c) => {
            ops::migration::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
        OperationContent::RegisterConstant(c) => {
            ops::register_constant::apply(ctx, id, level, timestamp, op_hash, sender_id, status, c).await
        }
    }
}

pub async fn revert_operation(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    match &op.content {
        OperationContent::Transaction(_) => ops::transaction::revert(ctx, op).await,
        OperationContent::Origination(_) => ops::origination::revert(ctx, op).await,
        OperationContent::Delegation(_) => ops::delegation::revert(ctx, op).await,
        OperationContent::Reveal(_) => ops::reveal::revert(ctx, op).await,
        OperationContent::Proposals(_) => ops::proposals::revert(ctx, op).await,
        OperationContent::Ballot(_) => ops::ballot::revert(ctx, op).await,
        OperationContent::DoubleBaking(_) => ops::double_baking::revert(ctx, op).await,
        OperationContent::DoubleEndorsing(_) => ops::double_endorsing::revert(ctx, op).await,
        OperationContent::NonceRevelation(_) => ops::nonce_revelation::revert(ctx, op).await,
        OperationContent::Endorsement(_) => ops::endorsement::revert(ctx, op).await,
        OperationContent::Activation(_) => ops::activation::revert(ctx, op).await,
        OperationContent::Migration(_) => ops::migration::revert(ctx, op).await,
        OperationContent::RegisterConstant(_) => ops::register_constant::revert(ctx, op).await,
    }
}
