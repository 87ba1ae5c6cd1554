mod content;
mod kind;

pub use content::{
    ActivationContent, BallotContent, BallotVote, DelegationContent, DoubleBakingContent,
    DoubleEndorsingContent, EndorsementContent, MigrationContent, NonceRevelationContent,
    OperationContent, OriginationContent, ProposalsContent, RegisterConstantContent,
    RevealContent, TransactionContent,
};
pub use kind::{MigrationKind, OperationKind, OperationStatus};

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::block::Level;
use crate::crypto::OperationHash;

pub type OperationId = i64;

/// An operation row as persisted, per spec §3 "Operation": fields common to
/// every kind, plus the kind-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    pub level: Level,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub op_hash: OperationHash,
    pub sender_id: AccountId,
    pub status: OperationStatus,
    pub errors: Option<String>,
    pub content: OperationContent,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        self.content.kind()
    }

    /// Only `applied` manager operations mutate balances/counters beyond the
    /// baker fee debit (spec §4.3 "For failed/backtracked/skipped: applies
    /// only bakerFee debit").
    pub fn is_applied(&self) -> bool {
        matches!(self.status, OperationStatus::Applied)
    }
}
