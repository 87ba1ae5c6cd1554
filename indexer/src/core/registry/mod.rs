//! Protocol Handler Registry (C4): selects the handler for a given
//! protocol hash and dispatches a block's operations to it, grounded in
//! the upstream daemon's height/version dispatch pattern.

pub mod dispatch;
mod handler;

pub use handler::{DefaultHandler, ProtocolHandler};

use std::collections::HashMap;
use std::sync::Arc;

use tzindex_common::block::Block;
use tzindex_common::crypto::ProposalHash;
use tzindex_common::operation::Operation;

use crate::core::ops::{CommitContext, CommitError};
use crate::SyncError;

/// `protocol hash → handler factory`, per spec §4.2. Installed the first
/// time a block header carries a new protocol hash.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<ProposalHash, Arc<dyn ProtocolHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ProtocolHandler>) {
        self.handlers.insert(handler.protocol_hash().clone(), handler);
    }

    pub fn get(&self, hash: &ProposalHash) -> Option<Arc<dyn ProtocolHandler>> {
        self.handlers.get(hash).cloned()
    }

    /// Resolves the handler for a protocol hash or raises the fatal
    /// "protocol-unknown" error (spec §7.5): no retry, requires a code
    /// update to register the new protocol.
    pub fn resolve(&self, hash: &ProposalHash) -> Result<Arc<dyn ProtocolHandler>, SyncError> {
        self.get(hash).ok_or_else(|| SyncError::UnknownProtocol(hash.to_string()))
    }

    /// Operation phase for one block (spec §4.2): applies every operation
    /// in validation-pass order, in-block, returning the persisted rows so
    /// the caller can later revert them in exact reverse order.
    pub async fn apply_block(
        &self,
        handler: &dyn ProtocolHandler,
        ctx: &CommitContext<'_>,
        block: &Block,
    ) -> Result<Vec<Operation>, CommitError> {
        let mut applied = Vec::with_capacity(block.consensus.len() + block.manager.len());
        for raw in block.operations_in_pass_order() {
            let op = handler
                .apply_operation(ctx, block.level(), block.header.timestamp, raw)
                .await?;
            applied.push(op);
        }
        Ok(applied)
    }

    /// Mirror image of `apply_block`, in reverse order (spec §4.2 "Revert
    /// is the mirror image, in reverse order").
    pub async fn revert_block(
        &self,
        handler: &dyn ProtocolHandler,
        ctx: &CommitContext<'_>,
        ops: &[Operation],
    ) -> Result<(), CommitError> {
        for op in ops.iter().rev() {
            handler.revert_operation(ctx, op).await?;
        }
        Ok(())
    }
}
