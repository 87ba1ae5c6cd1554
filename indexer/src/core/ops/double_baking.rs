//! DoubleBakingCommit, per spec §4.3: wipes the offending baker's frozen
//! deposit/reward/fees for the accused cycle and pays the accuser half of
//! the lost deposit into the accuser's own frozen reward (spec §4.3 "Debits
//! offender frozen deposit, reward and fees... credits half of the lost
//! deposit to the accuser as reward"; seed scenario S6).

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{DoubleBakingContent, Operation, OperationContent, OperationId, OperationStatus};

use super::{adjust_frozen, new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: DoubleBakingContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        let cycle = ctx.current_cycle().await?;

        let mut offender = ctx
            .account(content.offender_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(content.offender_id.to_string()))?;
        adjust_frozen(
            &mut offender,
            cycle,
            -content.lost_deposit,
            -content.lost_reward,
            -content.lost_fees,
        );
        ctx.put_account(offender);

        let mut accuser = ctx
            .account(content.accuser_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(content.accuser_id.to_string()))?;
        adjust_frozen(&mut accuser, cycle, 0, content.lost_deposit / 2, 0);
        ctx.put_account(accuser);
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::DoubleBaking(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::DoubleBaking(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-double-baking content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    let cycle = ctx.current_cycle().await?;

    let mut offender = ctx
        .account(content.offender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(content.offender_id.to_string()))?;
    adjust_frozen(
        &mut offender,
        cycle,
        content.lost_deposit,
        content.lost_reward,
        content.lost_fees,
    );
    ctx.put_account(offender);

    let mut accuser = ctx
        .account(content.accuser_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(content.accuser_id.to_string()))?;
    adjust_frozen(&mut accuser, cycle, 0, -(content.lost_deposit / 2), 0);
    ctx.put_account(accuser);

    Ok(())
}
