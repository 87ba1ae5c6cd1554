//! ProposalsCommit, per spec §4.3: upvotes one or more proposal hashes in
//! the sender's current voting period. Duplicate `(period, sender, hash)`
//! triples (already flagged by the RPC decoder into `content.duplicates`)
//! are skipped; new hashes allocate a `Proposal` row, existing ones just
//! gain upvotes/rolls. Also bumps the period's `topUpvotes`/`topRolls` so
//! the cycle engine can later decide whether the proposal quorum was met.

use chrono::{DateTime, Utc};

use tzindex_common::account::AccountId;
use tzindex_common::block::Level;
use tzindex_common::crypto::{OperationHash, ProposalHash};
use tzindex_common::operation::{Operation, OperationContent, OperationId, OperationStatus, ProposalsContent};
use tzindex_common::voting::{Proposal, ProposalStatus};

use super::{new_operation, CommitContext, CommitError};

/// Derives a stable row id for a proposal from its hash, in place of a
/// dedicated id allocator (there is exactly one proposal row per hash, so
/// a deterministic derivation is sufficient and trivially reversible).
fn proposal_id(hash: &ProposalHash) -> i64 {
    let bytes = hash.as_str().as_bytes();
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    (h & 0x7fff_ffff_ffff_ffff) as i64
}

async fn rolls_for(ctx: &CommitContext<'_>, period_index: i32, baker_id: AccountId) -> Result<i64, CommitError> {
    Ok(ctx
        .store
        .get_snapshot(period_index, baker_id)
        .await?
        .map(|s| s.rolls)
        .unwrap_or(0))
}

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: AccountId,
    status: OperationStatus,
    content: ProposalsContent,
) -> Result<Operation, CommitError> {
    if matches!(status, OperationStatus::Applied) {
        let rolls = rolls_for(ctx, content.period_index, sender_id).await?;
        let mut period = ctx
            .cache
            .get_period(ctx.store, content.period_index)
            .await?
            .ok_or_else(|| CommitError::AccountNotFound(format!("period {}", content.period_index)))?;

        for (hash, &dup) in content.proposal_hashes.iter().zip(content.duplicates.iter()) {
            if dup {
                continue;
            }
            let mut proposal = match ctx.cache.get_proposal(ctx.store, hash).await? {
                Some(existing) => existing,
                None => Proposal {
                    id: proposal_id(hash),
                    hash: hash.clone(),
                    epoch: period.epoch,
                    first_period: period.index,
                    last_period: period.index,
                    initiator_id: sender_id,
                    upvotes: 0,
                    rolls: 0,
                    status: ProposalStatus::Active,
                },
            };
            proposal.upvotes += 1;
            proposal.rolls += rolls;
            proposal.last_period = period.index;
            if proposal.upvotes == 1 {
                period.proposals_count += 1;
            }
            if proposal.rolls > period.top_rolls {
                period.top_rolls = proposal.rolls;
                period.top_upvotes = proposal.upvotes;
            }
            ctx.cache.put_proposal(proposal);
        }
        ctx.cache.put_period(period);
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Proposals(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Proposals(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-proposals content".into(),
        )));
    };
    if !matches!(op.status, OperationStatus::Applied) {
        return Ok(());
    }

    let rolls = rolls_for(ctx, content.period_index, op.sender_id).await?;
    let mut period = ctx
        .cache
        .get_period(ctx.store, content.period_index)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(format!("period {}", content.period_index)))?;

    for (hash, &dup) in content.proposal_hashes.iter().zip(content.duplicates.iter()) {
        if dup {
            continue;
        }
        if let Some(mut proposal) = ctx.cache.get_proposal(ctx.store, hash).await? {
            proposal.upvotes -= 1;
            proposal.rolls -= rolls;
            if proposal.upvotes == 0 {
                period.proposals_count -= 1;
                ctx.cache.evict_proposal(hash);
                ctx.store.delete_proposal(proposal.id).await?;
            } else {
                ctx.cache.put_proposal(proposal);
            }
        }
    }

    let remaining = ctx.cache.proposals_in_epoch(ctx.store, period.epoch).await?;
    if remaining.is_empty() {
        period.top_rolls = 0;
        period.top_upvotes = 0;
    } else {
        let max_rolls = remaining.iter().map(|p| p.rolls).max().unwrap();
        let rolls_tied: Vec<&Proposal> = remaining.iter().filter(|p| p.rolls == max_rolls).collect();
        let max_upvotes = rolls_tied.iter().map(|p| p.upvotes).max().unwrap();
        let upvotes_tied: Vec<&Proposal> = rolls_tied.into_iter().filter(|p| p.upvotes == max_upvotes).collect();

        let winner = if upvotes_tied.len() > 1 {
            let winner = *upvotes_tied.iter().min_by_key(|p| p.id).unwrap();
            warn!(
                "epoch {} proposal tie-break: {} proposals tied at rolls={} upvotes={}, picked lowest id {}",
                period.epoch,
                upvotes_tied.len(),
                max_rolls,
                max_upvotes,
                winner.id
            );
            winner
        } else {
            upvotes_tied[0]
        };
        period.top_rolls = winner.rolls;
        period.top_upvotes = winner.upvotes;
    }
    ctx.cache.put_period(period);

    Ok(())
}
