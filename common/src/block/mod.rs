mod header;

pub use header::BlockHeader;

use serde::{Deserialize, Serialize};

use crate::crypto::BlockHash;

/// The height of a block, starting from genesis at 1 (spec GLOSSARY).
pub type Level = i32;

/// One operation as decoded off the wire: the envelope fields every kind
/// shares (spec §3 "Operation ... Common: id, level, timestamp, opHash,
/// senderId, status, errors") alongside its kind-specific content. `id` is
/// not assigned yet at this stage — it is allocated from `AppState` at
/// commit time (spec §4.4 `NextOperationId()`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOperation {
    pub op_hash: crate::crypto::OperationHash,
    pub sender_id: crate::account::AccountId,
    pub status: crate::operation::OperationStatus,
    pub content: crate::operation::OperationContent,
}

/// A fully fetched block: its header plus the operations carried in it,
/// grouped the way the node groups them (spec §4.2: "group operations by
/// validation pass").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub consensus: Vec<RawOperation>,
    pub voting: Vec<RawOperation>,
    pub anonymous: Vec<RawOperation>,
    pub manager: Vec<RawOperation>,
}

impl Block {
    pub fn level(&self) -> Level {
        self.header.level
    }

    pub fn hash(&self) -> &BlockHash {
        &self.header.hash
    }

    /// Every operation in the block in validation-pass order
    /// (consensus, voting, anonymous, manager), per spec §4.2.
    pub fn operations_in_pass_order(&self) -> impl Iterator<Item = &RawOperation> {
        self.consensus
            .iter()
            .chain(self.voting.iter())
            .chain(self.anonymous.iter())
            .chain(self.manager.iter())
    }
}
