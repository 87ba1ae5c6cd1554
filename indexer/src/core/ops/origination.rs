//! OriginationCommit, per spec §4.3: allocates a new contract account (or
//! reuses its id on revert of a later block), debits the originator's
//! balance by `balance + bakerFee + storageFee`, and sets up the contract's
//! `ContractInfo` (delegate, script/storage ids, type/code hashes).

use chrono::{DateTime, Utc};

use tzindex_common::account::{Account, AccountHeader, ContractInfo, ContractKind};
use tzindex_common::block::Level;
use tzindex_common::crypto::OperationHash;
use tzindex_common::operation::{Operation, OperationContent, OperationId, OperationStatus, OriginationContent};

use super::{credit, debit, new_operation, CommitContext, CommitError};

pub async fn apply(
    ctx: &CommitContext<'_>,
    id: OperationId,
    level: Level,
    timestamp: DateTime<Utc>,
    op_hash: OperationHash,
    sender_id: tzindex_common::account::AccountId,
    status: OperationStatus,
    mut content: OriginationContent,
) -> Result<Operation, CommitError> {
    let total_fee = content.baker_fee + content.storage_fee;
    let debited = if matches!(status, OperationStatus::Applied) {
        total_fee + content.balance
    } else {
        total_fee
    };

    let mut sender = ctx
        .account(sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(sender_id.to_string()))?;
    sender.header_mut().balance = debit(sender.header().balance, debited)?;
    sender.header_mut().touch(level);
    sender.header_mut().counter += 1;
    sender.header_mut().counters.originations_count += 1;
    ctx.put_account(sender);

    if matches!(status, OperationStatus::Applied) {
        let contract_id = ctx.allocate_account_id().await?;
        content.contract_id = Some(contract_id);

        let mut header = AccountHeader::new(contract_id, content.contract_address.clone(), level);
        header.balance = content.balance;
        header.touch(level);
        let contract = Account::Contract {
            header,
            contract: ContractInfo {
                creator_id: sender_id,
                manager_id: sender_id,
                delegate_id: content.delegate_id,
                kind: ContractKind::SmartContract,
                script_id: None,
                storage_id: None,
                type_hash: content.type_hash,
                code_hash: content.code_hash,
            },
        };
        ctx.put_account(contract);
    }

    Ok(new_operation(
        id,
        level,
        timestamp,
        op_hash,
        sender_id,
        status,
        OperationContent::Origination(content),
    ))
}

pub async fn revert(ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
    let OperationContent::Origination(content) = &op.content else {
        return Err(CommitError::Validation(tzindex_common::error::ValidationError::Other(
            "revert called with non-origination content".into(),
        )));
    };
    let total_fee = content.baker_fee + content.storage_fee;
    let credited = if content.contract_id.is_some() {
        total_fee + content.balance
    } else {
        total_fee
    };

    let mut sender = ctx
        .account(op.sender_id)
        .await?
        .ok_or_else(|| CommitError::AccountNotFound(op.sender_id.to_string()))?;
    sender.header_mut().balance = credit(sender.header().balance, credited)?;
    sender.header_mut().counter -= 1;
    sender.header_mut().counters.originations_count -= 1;
    ctx.put_account(sender);

    if let Some(contract_id) = content.contract_id {
        ctx.cache.evict_account(contract_id);
        ctx.store.delete_account(contract_id).await?;
    }

    Ok(())
}
