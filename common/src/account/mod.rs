mod counters;

pub use counters::OperationCounters;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::block::Level;
use crate::crypto::Address;

pub type AccountId = i64;

/// Fields shared by every account variant, per spec §3 and Design Notes
/// ("Polymorphic Account: use a tagged variant ... with a common header
/// struct ... embedded and variant-specific tails behind the tag").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHeader {
    pub id: AccountId,
    pub address: Address,
    pub first_level: Level,
    pub last_level: Level,
    pub balance: i64,
    pub counter: i64,
    pub counters: OperationCounters,
}

impl AccountHeader {
    pub fn new(id: AccountId, address: Address, first_level: Level) -> Self {
        AccountHeader {
            id,
            address,
            first_level,
            last_level: first_level,
            balance: 0,
            counter: 0,
            counters: OperationCounters::default(),
        }
    }

    /// Invariant 7 (spec §3): `firstLevel <= lastLevel <= AppState.level`.
    pub fn touch(&mut self, level: Level) {
        if level > self.last_level {
            self.last_level = level;
        }
    }
}

/// Frozen deposit/reward/fees for one cycle, reversible by construction:
/// revert subtracts exactly what apply added (Design Notes "Reversibility").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrozenBalance {
    pub deposit: i64,
    pub reward: i64,
    pub fees: i64,
}

/// Delegate-only staking aggregates, per spec §3 "Account" bullet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelegateInfo {
    pub staking_balance: i64,
    pub delegators_count: i32,
    pub active_since: Level,
    pub deactivation_level: Option<Level>,
    /// Keyed by cycle index; unfrozen and removed by the cycle engine
    /// (spec §4.6) once `preservedCycles` has elapsed.
    pub frozen: BTreeMap<i32, FrozenBalance>,
}

/// Contract-only attributes, per spec §3 "Account" bullet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractInfo {
    pub creator_id: AccountId,
    pub manager_id: AccountId,
    pub delegate_id: Option<AccountId>,
    pub kind: ContractKind,
    pub script_id: Option<i64>,
    pub storage_id: Option<i64>,
    pub type_hash: i64,
    pub code_hash: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractKind {
    SmartContract,
    Asset,
}

/// Polymorphic account, matching the Design Notes guidance: pattern-match
/// on the tag wherever the source would have dispatched virtually.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Account {
    User {
        header: AccountHeader,
        delegate_id: Option<AccountId>,
        revealed_key: Option<crate::crypto::PublicKey>,
    },
    Delegate {
        header: AccountHeader,
        delegate: DelegateInfo,
        revealed_key: Option<crate::crypto::PublicKey>,
    },
    Contract {
        header: AccountHeader,
        contract: ContractInfo,
    },
    Ghost {
        header: AccountHeader,
    },
}

impl Account {
    pub fn header(&self) -> &AccountHeader {
        match self {
            Account::User { header, .. }
            | Account::Delegate { header, .. }
            | Account::Contract { header, .. }
            | Account::Ghost { header } => header,
        }
    }

    pub fn header_mut(&mut self) -> &mut AccountHeader {
        match self {
            Account::User { header, .. }
            | Account::Delegate { header, .. }
            | Account::Contract { header, .. }
            | Account::Ghost { header } => header,
        }
    }

    pub fn id(&self) -> AccountId {
        self.header().id
    }

    pub fn address(&self) -> &Address {
        &self.header().address
    }

    pub fn delegate_id(&self) -> Option<AccountId> {
        match self {
            Account::User { delegate_id, .. } => *delegate_id,
            Account::Contract { contract, .. } => contract.delegate_id,
            Account::Delegate { .. } | Account::Ghost { .. } => None,
        }
    }

    pub fn is_delegate(&self) -> bool {
        matches!(self, Account::Delegate { .. })
    }

    pub fn as_delegate_mut(&mut self) -> Option<&mut DelegateInfo> {
        match self {
            Account::Delegate { delegate, .. } => Some(delegate),
            _ => None,
        }
    }

    pub fn as_delegate(&self) -> Option<&DelegateInfo> {
        match self {
            Account::Delegate { delegate, .. } => Some(delegate),
            _ => None,
        }
    }
}
