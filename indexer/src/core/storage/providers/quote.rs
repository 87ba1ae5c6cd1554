use async_trait::async_trait;

use tzindex_common::block::Level;
use tzindex_common::quote::Quote;

use super::super::StorageError;

#[async_trait]
pub trait QuoteProvider {
    async fn get_quote(&self, level: Level) -> Result<Option<Quote>, StorageError>;
    async fn upsert_quote(&self, quote: Quote) -> Result<(), StorageError>;
}
