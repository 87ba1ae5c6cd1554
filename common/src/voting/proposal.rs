use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::crypto::ProposalHash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Active,
    Accepted,
    Rejected,
    Skipped,
}

/// [id, hash (51-char base58 per spec §6), epoch, firstPeriod, lastPeriod,
/// initiatorId, upvotes, rolls, status] per spec §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub hash: ProposalHash,
    pub epoch: i32,
    pub first_period: i32,
    pub last_period: i32,
    pub initiator_id: AccountId,
    pub upvotes: i64,
    pub rolls: i64,
    pub status: ProposalStatus,
}
