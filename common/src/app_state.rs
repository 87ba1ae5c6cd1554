use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::block::Level;
use crate::crypto::BlockHash;
use crate::operation::OperationId;

/// Singleton durable row: [id, level, hash, protocol hash, timestamp,
/// nextOperationId, nextAccountId, managerCounter, knownHead] per spec §3.
/// Mutated at every block boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    pub id: i32,
    pub level: Level,
    pub hash: BlockHash,
    pub protocol_code: i32,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub next_operation_id: OperationId,
    pub next_account_id: AccountId,
    pub manager_counter: i64,
    pub known_head: Level,
}

impl AppState {
    /// Allocates a contiguous range of `count` operation ids, per invariant
    /// 6 (spec §3: "Operation ids are strictly increasing globally;
    /// per-block ids form a contiguous range"). Returns the first id in
    /// the range.
    pub fn allocate_operation_ids(&mut self, count: i64) -> OperationId {
        let first = self.next_operation_id;
        self.next_operation_id += count;
        first
    }

    pub fn allocate_account_id(&mut self) -> AccountId {
        let id = self.next_account_id;
        self.next_account_id += 1;
        id
    }
}
