use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::block::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RightStatus {
    Future,
    Realized,
    Uncovered,
    Missed,
}

/// [cycle, level, bakerId, priority, status] per spec §3. Precomputed at
/// cycle start by the cycle engine (C6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BakingRight {
    pub cycle: i32,
    pub level: Level,
    pub baker_id: AccountId,
    pub priority: i32,
    pub status: RightStatus,
}

/// [cycle, level, bakerId, slot, status] per spec §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndorsingRight {
    pub cycle: i32,
    pub level: Level,
    pub baker_id: AccountId,
    pub slot: i32,
    pub status: RightStatus,
}
