//! Operation Commits (C5): one commit module per operation kind. Every
//! commit implements the pair of transitions from spec §4.3:
//!
//! ```text
//! apply(block, op, content)   : updates state, inserts the persisted row
//! revert(block, op)           : undoes exactly the state change apply
//!                                produced, deletes the persisted row
//! ```

pub mod activation;
pub mod ballot;
mod context;
pub mod delegation;
pub mod double_baking;
pub mod double_endorsing;
pub mod endorsement;
pub mod migration;
pub mod nonce_revelation;
pub mod origination;
pub mod proposals;
pub mod register_constant;
pub mod reveal;
pub mod transaction;

pub use context::CommitContext;

use thiserror::Error;

use tzindex_common::error::{BalanceError, ValidationError};

use crate::core::storage::StorageError;

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error("account not found: {0}")]
    AccountNotFound(String),
}

/// Debits `amount` off `balance`, rejecting an overflow into the negative
/// the way spec invariants require balances to stay reversible: a revert
/// must be able to add the same amount back without saturating.
pub fn debit(balance: i64, amount: i64) -> Result<i64, BalanceError> {
    balance.checked_sub(amount).ok_or(BalanceError::Insufficient {
        need: amount,
        have: balance,
    })
}

pub fn credit(balance: i64, amount: i64) -> Result<i64, BalanceError> {
    balance.checked_add(amount).ok_or(BalanceError::Overflow)
}

/// Adjusts a delegate's frozen deposit/reward/fees for `cycle` (spec §4.6
/// glossary "Freeze / unfreeze"). A no-op on any non-`Delegate` account,
/// since only delegates carry a frozen pool.
pub fn adjust_frozen(
    account: &mut tzindex_common::account::Account,
    cycle: i32,
    deposit_delta: i64,
    reward_delta: i64,
    fees_delta: i64,
) {
    if let Some(info) = account.as_delegate_mut() {
        let entry = info.frozen.entry(cycle).or_default();
        entry.deposit += deposit_delta;
        entry.reward += reward_delta;
        entry.fees += fees_delta;
    }
}

pub fn new_operation(
    id: tzindex_common::operation::OperationId,
    level: tzindex_common::block::Level,
    timestamp: chrono::DateTime<chrono::Utc>,
    op_hash: tzindex_common::crypto::OperationHash,
    sender_id: tzindex_common::account::AccountId,
    status: tzindex_common::operation::OperationStatus,
    content: tzindex_common::operation::OperationContent,
) -> tzindex_common::operation::Operation {
    tzindex_common::operation::Operation {
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        errors: None,
        content,
    }
}
