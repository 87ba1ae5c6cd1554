//! A protocol handler: the set of operation kinds one protocol version
//! declares, plus the dispatch it uses to apply/revert them. Per the
//! Design Notes ("Polymorphic operation handlers"), later protocols are
//! built by structurally copying a prior handler's kind table and layering
//! overrides on top, rather than a class hierarchy.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tzindex_common::block::{Level, RawOperation};
use tzindex_common::crypto::ProposalHash;
use tzindex_common::error::ValidationError;
use tzindex_common::operation::{Operation, OperationKind};

use crate::core::ops::{CommitContext, CommitError};

use super::dispatch;

#[async_trait]
pub trait ProtocolHandler: Send + Sync {
    fn protocol_hash(&self) -> &ProposalHash;
    fn protocol_code(&self) -> i32;
    fn supported_kinds(&self) -> &HashSet<OperationKind>;

    /// Rejects a kind this protocol doesn't declare (spec §7 "Protocol-unknown:
    /// a block under a protocol hash not registered... Policy: fatal") before
    /// handing off to the shared dispatch table.
    async fn apply_operation(
        &self,
        ctx: &CommitContext<'_>,
        level: Level,
        timestamp: DateTime<Utc>,
        raw: &RawOperation,
    ) -> Result<Operation, CommitError> {
        if !self.supported_kinds().contains(&raw.content.kind()) {
            return Err(CommitError::Validation(ValidationError::UnknownOperationKind {
                kind: format!("{:?}", raw.content.kind()),
                protocol: self.protocol_hash().to_string(),
            }));
        }
        dispatch::apply_operation(ctx, level, timestamp, raw).await
    }

    async fn revert_operation(&self, ctx: &CommitContext<'_>, op: &Operation) -> Result<(), CommitError> {
        dispatch::revert_operation(ctx, op).await
    }
}

/// A handler built purely from its supported-kind set, with no overridden
/// semantics of its own — the common case, since most protocol upgrades
/// only add or drop kinds rather than changing an existing one's formula.
pub struct DefaultHandler {
    hash: ProposalHash,
    code: i32,
    kinds: HashSet<OperationKind>,
}

impl DefaultHandler {
    pub fn new(hash: ProposalHash, code: i32, kinds: HashSet<OperationKind>) -> Self {
        DefaultHandler { hash, code, kinds }
    }

    /// Copies `prior`'s kind table and layers `additional` on top, modeling
    /// "Proto-11 adds register-constant" (spec §4.2) without re-listing
    /// every kind a new protocol inherits unchanged.
    pub fn inherit(
        hash: ProposalHash,
        code: i32,
        prior: &dyn ProtocolHandler,
        additional: impl IntoIterator<Item = OperationKind>,
    ) -> Self {
        let mut kinds = prior.supported_kinds().clone();
        kinds.extend(additional);
        DefaultHandler { hash, code, kinds }
    }
}

impl ProtocolHandler for DefaultHandler {
    fn protocol_hash(&self) -> &ProposalHash {
        &self.hash
    }

    fn protocol_code(&self) -> i32 {
        self.code
    }

    fn supported_kinds(&self) -> &HashSet<OperationKind> {
        &self.kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u8) -> ProposalHash {
        ProposalHash::parse(&std::iter::repeat((b'A' + n) as char).take(51).collect::<String>()).unwrap()
    }

    #[test]
    fn inherit_copies_prior_kinds_and_adds_new_ones() {
        let base = DefaultHandler::new(
            hash(0),
            1,
            [OperationKind::Transaction, OperationKind::Reveal].into_iter().collect(),
        );
        let next = DefaultHandler::inherit(hash(1), 2, &base, [OperationKind::RegisterConstant]);
        assert!(next.supported_kinds().contains(&OperationKind::Transaction));
        assert!(next.supported_kinds().contains(&OperationKind::Reveal));
        assert!(next.supported_kinds().contains(&OperationKind::RegisterConstant));
    }
}
