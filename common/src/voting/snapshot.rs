use serde::{Deserialize, Serialize};

use crate::account::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotStatus {
    None,
    Upvoted,
    VotedYay,
    VotedNay,
    VotedPass,
}

/// [period, bakerId, rolls, status] per spec §3. Taken at the first block
/// of each voting period and immutable thereafter except for `status`
/// (spec §3 "Taken at the first block of each voting period; immutable
/// thereafter except for status").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingSnapshot {
    pub period: i32,
    pub baker_id: AccountId,
    pub rolls: i64,
    pub status: SnapshotStatus,
}
