use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::block::Level;

/// [index, snapshotLevel, snapshotIndex, totalRolls, totalStaking,
/// selectedBakers, seed] per spec §3. Populated before the cycle begins by
/// the cycle engine (C6) and finalized at its end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    pub index: i32,
    pub snapshot_level: Level,
    pub snapshot_index: i32,
    pub total_rolls: i64,
    pub total_staking: i64,
    pub selected_bakers: Vec<AccountId>,
    pub seed: String,
}
