use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::crypto::{Address, ProposalHash, PublicKey};

use super::kind::MigrationKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionContent {
    pub target_id: Option<AccountId>,
    pub target_address: Address,
    pub amount: i64,
    pub baker_fee: i64,
    pub storage_fee: i64,
    pub allocation_fee: i64,
    /// Canonical micheline, kept alongside the JSON rendering the read side
    /// expects (spec §4.3: "stored as canonical micheline + JSON").
    pub parameters_micheline: Option<String>,
    pub parameters_json: Option<String>,
    pub internal_results: Vec<TransactionContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginationContent {
    pub contract_id: Option<AccountId>,
    pub contract_address: Address,
    pub balance: i64,
    pub delegate_id: Option<AccountId>,
    pub script: Option<String>,
    pub storage: Option<String>,
    pub type_hash: i64,
    pub code_hash: i64,
    pub baker_fee: i64,
    pub storage_fee: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationContent {
    pub new_delegate_id: Option<AccountId>,
    /// Stored so revert can restore the prior delegate id exactly
    /// (spec §4.3 "Revert restores the prior delegate id exactly").
    pub prior_delegate_id: Option<AccountId>,
    pub baker_fee: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealContent {
    pub public_key: PublicKey,
    pub baker_fee: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalsContent {
    pub period_index: i32,
    pub proposal_hashes: Vec<ProposalHash>,
    /// Which of `proposal_hashes` were detected as duplicates of an
    /// already-upvoted `(period, sender, proposalHash)` triple.
    pub duplicates: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotVote {
    Yay,
    Nay,
    Pass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotContent {
    pub period_index: i32,
    pub proposal_hash: ProposalHash,
    pub vote: BallotVote,
    pub rolls: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleBakingContent {
    pub offender_id: AccountId,
    pub accuser_id: AccountId,
    pub lost_deposit: i64,
    pub lost_reward: i64,
    pub lost_fees: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoubleEndorsingContent {
    pub offender_id: AccountId,
    pub accuser_id: AccountId,
    pub lost_deposit: i64,
    pub lost_reward: i64,
    pub lost_fees: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceRevelationContent {
    pub baker_id: AccountId,
    pub revealed_level: i32,
    pub reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndorsementContent {
    pub delegate_id: AccountId,
    pub slots: i32,
    pub deposit: i64,
    pub reward: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationContent {
    pub account_id: AccountId,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationContent {
    pub kind: MigrationKind,
    pub account_id: Option<AccountId>,
    pub balance_change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterConstantContent {
    pub constant_id: i64,
    pub expression: String,
    pub storage_fee: i64,
}

/// The kind-specific payload of an operation, per spec §4.3's per-kind
/// attribute list. Wrapped by `Operation` for the fields common to all
/// kinds (id, level, sender, status, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OperationContent {
    Transaction(TransactionContent),
    Origination(OriginationContent),
    Delegation(DelegationContent),
    Reveal(RevealContent),
    Proposals(ProposalsContent),
    Ballot(BallotContent),
    DoubleBaking(DoubleBakingContent),
    DoubleEndorsing(DoubleEndorsingContent),
    NonceRevelation(NonceRevelationContent),
    Endorsement(EndorsementContent),
    Activation(ActivationContent),
    Migration(MigrationContent),
    RegisterConstant(RegisterConstantContent),
}

impl OperationContent {
    pub fn kind(&self) -> super::kind::OperationKind {
        use super::kind::OperationKind as K;
        match self {
            OperationContent::Transaction(_) => K::Transaction,
            OperationContent::Origination(_) => K::Origination,
            OperationContent::Delegation(_) => K::Delegation,
            OperationContent::Reveal(_) => K::Reveal,
            OperationContent::Proposals(_) => K::Proposals,
            OperationContent::Ballot(_) => K::Ballot,
            OperationContent::DoubleBaking(_) => K::DoubleBaking,
            OperationContent::DoubleEndorsing(_) => K::DoubleEndorsing,
            OperationContent::NonceRevelation(_) => K::NonceRevelation,
            OperationContent::Endorsement(_) => K::Endorsement,
            OperationContent::Activation(_) => K::Activation,
            OperationContent::Migration(_) => K::Migration,
            OperationContent::RegisterConstant(_) => K::RegisterConstant,
        }
    }
}
