use async_trait::async_trait;

use tzindex_common::app_state::AppState;

use super::super::StorageError;

/// The singleton `AppState` row (spec §3), mutated at every block boundary.
#[async_trait]
pub trait AppStateProvider {
    async fn get_app_state(&self) -> Result<AppState, StorageError>;
    async fn set_app_state(&self, state: AppState) -> Result<(), StorageError>;
}
