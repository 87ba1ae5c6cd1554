use serde::{Deserialize, Serialize};

/// Every operation kind the registry knows how to commit, per spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Transaction,
    Origination,
    Delegation,
    Reveal,
    Proposals,
    Ballot,
    DoubleBaking,
    DoubleEndorsing,
    NonceRevelation,
    Endorsement,
    Activation,
    Migration,
    RegisterConstant,
}

/// Outcome of a manager operation, per spec §3 "Operation" common fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    Applied,
    Failed,
    Backtracked,
    Skipped,
}

/// `MigrationOp` sub-kinds, per spec §4.3: "`Type` on the report is `11 +
/// kind`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationKind {
    Bootstrap = 0,
    ActivateDelegate = 1,
    Airdrop = 2,
    ProposalInvoice = 3,
    CodeChange = 4,
    ImplicitOrigination = 5,
    Subsidy = 6,
}

impl MigrationKind {
    pub fn report_type(self) -> i32 {
        11 + self as i32
    }
}
