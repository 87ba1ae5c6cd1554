use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Level;
use crate::crypto::BlockHash;

/// Header fields for a single block, per spec §3 "Block".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockHeader {
    pub level: Level,
    pub hash: BlockHash,
    pub predecessor: BlockHash,
    pub timestamp: DateTime<Utc>,
    /// Small integer identifying the `Protocol` row active for this block.
    pub protocol_code: i32,
    pub baker_id: i64,
    pub priority: i32,
    pub validation_passes: i32,
    pub reward: i64,
    pub fees: i64,
    pub deposit: i64,
    /// Bitmask of which validation passes carried at least one operation.
    pub operations_bitmask: i32,
    /// Liquidity-baking escape hatch vote, present from the protocol that
    /// introduces it onward (spec §4.3 "ActivationOp"/Proto-10 mentions).
    pub lb_escape_vote: Option<bool>,
    pub lb_escape_ema: Option<i64>,
}

impl BlockHeader {
    /// Structural validation described in spec §4.2 "Validate header
    /// structure (hash, level, predecessor, protocol, timestamp)". This
    /// never touches signatures or consensus rules (Non-goal); it only
    /// checks the shape the sync controller depends on to chain blocks.
    pub fn validate_against_predecessor(
        &self,
        predecessor_level: Level,
        predecessor_hash: &BlockHash,
    ) -> Result<(), crate::error::ValidationError> {
        if self.level != predecessor_level + 1 {
            return Err(crate::error::ValidationError::Other(format!(
                "non-contiguous level: predecessor {predecessor_level}, block {}",
                self.level
            )));
        }
        if &self.predecessor != predecessor_hash {
            return Err(crate::error::ValidationError::Other(format!(
                "predecessor hash mismatch at level {}",
                self.level
            )));
        }
        Ok(())
    }
}
