//! BallotCommit, per spec §4.3: records a yay/nay/pass vote weighted by the
//! baker's snapshot rolls into the period's running tallies, and marks the
//! baker's `VotingSnapshot.status` so the same baker cannot vote twice.

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{BallotContent, BallotVote, Operation, OperationContent, OperationId, OperationStatus};
use tzindex_common::voting::SnapshotStatus;

use super::{new_operation, CommitContext, CommitError};

fn vote_status(vote: BallotVote) -> SnapshotStatus {
    match vote {
        BallotVote::Yay => SnapshotStatus::VotedYay,
        BallotVote::Nay => SnapshotStatus::VotedNay,
        BallotVote::Pass => SnapshotStatus::VotedPass,
    }
}

fn apply_tally(period: &mut tzindex_common::voting::VotingPeriod, vote: BallotVote, rolls: i64) {
    match vote {
        BallotVote::Yay => period.yay_rolls += rolls,
        BallotVote::Nay => period.nay_rolls += rolls,
        BallotVote::Pass => period.pass_rolls += rolls,
    }
}

fn revert_tally(period: &mut tzindex_common::voting::VotingPeriod, vote: BallotVote, rolls: i64) {
    match vote {
        BallotVote::Yay => period.yay_rolls -= rolls,
        BallotVote::Nay => period.nay_rolls -= rolls,
        BallotVote::Pass => period.pass_rolls -= rolls,
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
    content: BallotContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        let mut period = ctx
            .cache
            .get_period(ctx.store, content.period_index)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(format!("period {}", content.period_index)))?;
        apply_tally(&mut period, content.vote, content.rolls);
        ctx.cache.put_period(period);

        let mut snapshot = ctx
            .store
            .get_snapshot(content.period_index, sender_id)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(format!("snapshot {}/{}", content.period_index, sender_id)))?;
        snapshot.status = vote_status(content.vote);
        ctx.store.upsert_snapshot(snapshot).await?;
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Ballot(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Ballot(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-ballot content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    let mut period = ctx
        .cache
        .get_period(ctx.store, content.period_index)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(format!("period {}", content.period_index)))?;
    revert_tally(&mut period, content.vote, content.rolls);
    ctx.cache.put_period(period);

    if let Some(mut snapshot) = ctx.store.get_snapshot(content.period_index, op.sender_id).await? {
        snapshot.status = SnapshotStatus::Upvoted;
        ctx.store.upsert_snapshot(snapshot).await?;
    }

    Ok(())
}
