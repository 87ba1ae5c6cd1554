use serde::{Deserialize, Serialize};

use tzindex_common::block::Level;
use tzindex_common::crypto::{BlockHash, ProposalHash};
use tzindex_common::protocol::ProtocolConstants;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderRpc {
    pub level: Level,
    pub hash: BlockHash,
    pub predecessor: BlockHash,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub protocol: ProposalHash,
    pub proto: i32,
    pub validation_pass: i32,
}

/// Raw `context/constants` shape; converted into the domain
/// `ProtocolConstants` once the handler for the protocol is known (some
/// fields carry protocol-specific defaults the RPC response omits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantsRpc {
    pub blocks_per_cycle: i32,
    pub blocks_per_roll_snapshot: i32,
    pub preserved_cycles: i32,
    pub tokens_per_roll: String,
    pub seed_nonce_revelation_tip: Option<String>,
    pub block_security_deposit: String,
    pub endorsement_security_deposit: String,
    pub block_reward: String,
    pub endorsement_reward: String,
    pub min_proposal_quorum: u64,
    pub quorum_min: u64,
    pub quorum_max: u64,
}

impl From<ConstantsRpc> for ProtocolConstants {
    fn from(rpc: ConstantsRpc) -> Self {
        let defaults = ProtocolConstants::default();
        ProtocolConstants {
            blocks_per_cycle: rpc.blocks_per_cycle,
            blocks_per_snapshot: rpc.blocks_per_roll_snapshot,
            preserved_cycles: rpc.preserved_cycles,
            tokens_per_roll: rpc.tokens_per_roll.parse().unwrap_or(defaults.tokens_per_roll),
            seed_nonce_revelation_tip: rpc
                .seed_nonce_revelation_tip
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.seed_nonce_revelation_tip),
            block_security_deposit: rpc
                .block_security_deposit
                .parse()
                .unwrap_or(defaults.block_security_deposit),
            endorsement_security_deposit: rpc
                .endorsement_security_deposit
                .parse()
                .unwrap_or(defaults.endorsement_security_deposit),
            block_reward: rpc.block_reward.parse().unwrap_or(defaults.block_reward),
            endorsement_reward: rpc
                .endorsement_reward
                .parse()
                .unwrap_or(defaults.endorsement_reward),
            proposal_quorum: rpc.min_proposal_quorum,
            quorum_min: rpc.quorum_min,
            quorum_max: rpc.quorum_max,
            min_proposal_quorum: rpc.min_proposal_quorum,
            supermajority: defaults.supermajority,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightRpc {
    pub level: Level,
    pub delegate: String,
    pub priority: Option<i32>,
    pub slot: Option<i32>,
}
