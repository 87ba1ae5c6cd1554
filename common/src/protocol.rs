use serde::{Deserialize, Serialize};

use crate::block::Level;
use crate::crypto::ProposalHash;

/// Fixed-point ratio with denominator `QUORUM_DENOMINATOR` (spec §6),
/// used for the quorum/supermajority thresholds below.
pub type Permille = u64;

/// Concrete fields every operation commit in spec §4.3 actually reads off
/// the RPC-shaped `ProtocolConstants`, per SPEC_FULL.md §4's expansion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProtocolConstants {
    pub blocks_per_cycle: i32,
    pub blocks_per_snapshot: i32,
    pub preserved_cycles: i32,
    pub tokens_per_roll: i64,
    /// Reward for `NonceRevelationOp`; defaults to 125_000 (spec §9 Open
    /// Questions) for protocols that do not override it.
    pub seed_nonce_revelation_tip: i64,
    pub block_security_deposit: i64,
    pub endorsement_security_deposit: i64,
    pub block_reward: i64,
    pub endorsement_reward: i64,
    pub proposal_quorum: Permille,
    pub quorum_min: Permille,
    pub quorum_max: Permille,
    pub min_proposal_quorum: Permille,
    pub supermajority: Permille,
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        ProtocolConstants {
            blocks_per_cycle: 4096,
            blocks_per_snapshot: 256,
            preserved_cycles: 5,
            tokens_per_roll: 8_000_000_000,
            seed_nonce_revelation_tip: crate::config::DEFAULT_SEED_NONCE_REVELATION_TIP,
            block_security_deposit: 512_000_000,
            endorsement_security_deposit: 64_000_000,
            block_reward: 1_250_000,
            endorsement_reward: 1_250_000,
            proposal_quorum: 500,
            quorum_min: 2000,
            quorum_max: 7000,
            min_proposal_quorum: 500,
            supermajority: crate::config::SUPERMAJORITY_NUMERATOR * crate::config::QUORUM_DENOMINATOR
                / crate::config::SUPERMAJORITY_DENOMINATOR,
        }
    }
}

/// [hash, code, firstLevel, lastLevel?, constants] per spec §3. Inserted
/// on first encounter, `last_level` sealed when superseded (spec §4.2
/// "When the block header carries a new protocol hash for the first
/// time, the registry installs the handler...").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Protocol {
    pub hash: ProposalHash,
    pub code: i32,
    pub first_level: Level,
    pub last_level: Option<Level>,
    pub constants: ProtocolConstants,
}
