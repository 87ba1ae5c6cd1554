use async_trait::async_trait;

use tzindex_common::account::{Account, AccountId};
use tzindex_common::crypto::Address;

use super::super::StorageError;

#[async_trait]
pub trait AccountProvider {
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StorageError>;
    async fn get_account_by_address(&self, address: &Address) -> Result<Option<Account>, StorageError>;
    async fn upsert_account(&self, account: Account) -> Result<(), StorageError>;
    async fn delete_account(&self, id: AccountId) -> Result<(), StorageError>;

    /// Pagination helper for bootstrap/report tooling, in the style of the
    /// upstream daemon's `list_all_delegation_records(skip, limit)`.
    async fn list_delegates(&self, skip: usize, limit: usize) -> Result<Vec<Account>, StorageError>;
}
