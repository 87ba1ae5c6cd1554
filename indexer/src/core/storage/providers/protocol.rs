use async_trait::async_trait;

use tzindex_common::block::Level;
use tzindex_common::crypto::ProposalHash;
use tzindex_common::protocol::Protocol;

use super::super::StorageError;

#[async_trait]
pub trait ProtocolProvider {
    async fn get_protocol(&self, hash: &ProposalHash) -> Result<Option<Protocol>, StorageError>;
    async fn get_protocol_by_code(&self, code: i32) -> Result<Option<Protocol>, StorageError>;
    async fn insert_protocol(&self, protocol: Protocol) -> Result<(), StorageError>;

    /// Seals `last_level` on the previously active protocol when the
    /// registry installs a new one (spec §4.2 "lastLevel sealed when
    /// superseded").
    async fn seal_protocol(&self, hash: &ProposalHash, last_level: Level) -> Result<(), StorageError>;
}
