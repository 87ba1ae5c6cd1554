use serde::{Deserialize, Serialize};

/// Per-kind operation counts attached to an account, satisfying invariant 2
/// (spec §3: `Account.kCount == count(Op of kind K where Account is sender
/// or target)`) without a virtual-dispatch table: one field per kind, each
/// bumped by the matching operation commit in `indexer::core::ops`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounters {
    pub transactions_count: i32,
    pub originations_count: i32,
    pub delegations_count: i32,
    pub reveals_count: i32,
    pub proposals_count: i32,
    pub ballots_count: i32,
    pub double_baking_count: i32,
    pub double_endorsing_count: i32,
    pub nonce_revelations_count: i32,
    pub endorsements_count: i32,
    pub activations_count: i32,
    pub register_constants_count: i32,
}
