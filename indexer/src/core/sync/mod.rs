//! Sync Controller (C7), per spec §4.1: the top-level loop. Advances the
//! head, detects reorgs, and decides per tick whether to apply the next
//! block or revert the current head. Runs as a single cooperative task;
//! every suspension point (RPC await, DB await) is where the shutdown
//! signal is observed, mirroring the upstream daemon's `tokio::select!`
//! based chain-sync loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};

use tzindex_common::account::AccountId;
use tzindex_common::block::{Block, BlockHeader, Level, RawOperation};
use tzindex_common::crypto::{Address, ProposalHash};
use tzindex_common::operation::OperationKind;
use tzindex_common::protocol::{Protocol, ProtocolConstants};
use tzindex_common::rights::{BakingRight, EndorsingRight, RightStatus};

use crate::config;
use crate::core::cache::EntityCache;
use crate::core::cycle_engine::CycleEngine;
use crate::core::ops::CommitContext;
use crate::core::registry::{DefaultHandler, HandlerRegistry, ProtocolHandler};
use crate::core::storage::Storage;
use crate::rpc::RpcClient;
use crate::SyncError;

fn all_operation_kinds() -> HashSet<OperationKind> {
    use OperationKind::*;
    [
        Transaction,
        Origination,
        Delegation,
        Reveal,
        Proposals,
        Ballot,
        DoubleBaking,
        DoubleEndorsing,
        NonceRevelation,
        Endorsement,
        Activation,
        Migration,
        RegisterConstant,
    ]
    .into_iter()
    .collect()
}

/// The JSON shape this controller expects from `block_operations`: four
/// arrays, one per validation pass, each entry shaped to deserialize
/// directly into `RawOperation` (spec §4.2 "group operations by
/// validation pass").
fn parse_block_operations(value: serde_json::Value) -> Result<Vec<Vec<RawOperation>>, SyncError> {
    serde_json::from_value(value).map_err(|err| {
        SyncError::Validation(tzindex_common::error::ValidationError::TypeMismatch {
            path: "operations".into(),
            expected: err.to_string(),
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Applied(Level),
    Reverted(Level),
    Idle,
}

pub struct SyncController {
    rpc: Arc<dyn RpcClient>,
    store: Arc<dyn Storage>,
    cache: EntityCache,
    registry: HandlerRegistry,
    cycle_engine: CycleEngine,
    reorg_tx: broadcast::Sender<Level>,
    next_protocol_code: i32,
    backoff: Duration,
}

impl SyncController {
    pub fn new(rpc: Arc<dyn RpcClient>, store: Arc<dyn Storage>) -> Self {
        let (reorg_tx, _) = broadcast::channel(16);
        SyncController {
            rpc,
            store,
            cache: EntityCache::default(),
            registry: HandlerRegistry::new(),
            cycle_engine: CycleEngine::new(),
            reorg_tx,
            next_protocol_code: 1,
            backoff: config::min_backoff(),
        }
    }

    /// Subscribes to the reorg signal (spec §4.1 "fire a reorg signal
    /// observable to downstream"), e.g. for the WebSocket processor.
    pub fn subscribe_reorg(&self) -> broadcast::Receiver<Level> {
        self.reorg_tx.subscribe()
    }

    /// Runs until `shutdown` reports `true`, observed between ticks and
    /// during the idle backoff sleep (spec §5 "Cancellation").
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), SyncError> {
        loop {
            if *shutdown.borrow() {
                return Ok(());
            }

            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return Ok(());
                    }
                }
                outcome = self.tick() => {
                    match outcome {
                        Ok(TickOutcome::Idle) => {
                            tokio::select! {
                                _ = tokio::time::sleep(self.backoff) => {
                                    self.backoff = (self.backoff * 2).min(config::max_backoff());
                                }
                                _ = shutdown.changed() => {
                                    if *shutdown.borrow() {
                                        return Ok(());
                                    }
                                }
                            }
                        }
                        Ok(_) => {
                            self.backoff = config::min_backoff();
                        }
                        Err(err) if err.is_transient() => {
                            warn!("transient sync error, retrying next tick: {err}");
                        }
                        Err(err) => {
                            error!("fatal sync error: {err}");
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    /// One step of spec §4.1's algorithm.
    pub async fn tick(&mut self) -> Result<TickOutcome, SyncError> {
        let state = self.cache.get_app_state(self.store.as_ref()).await?;

        let local_header = self.rpc.header_at(state.level).await?;
        let matches_local = local_header.as_ref().map(|h| h.hash == state.hash).unwrap_or(false);
        if !matches_local {
            let level = state.level;
            self.revert_one_block(level).await?;
            return Ok(TickOutcome::Reverted(level));
        }

        let next_level = state.level + 1;
        match self.rpc.header_at(next_level).await? {
            None => Ok(TickOutcome::Idle),
            Some(_) => {
                self.apply_one_block(next_level).await?;
                Ok(TickOutcome::Applied(next_level))
            }
        }
    }

    async fn ensure_protocol(
        &mut self,
        hash: &ProposalHash,
        level: Level,
    ) -> Result<(Arc<dyn ProtocolHandler>, ProtocolConstants), SyncError> {
        if let Some(handler) = self.registry.get(hash) {
            let protocol = self
                .store
                .get_protocol(hash)
                .await?
                .ok_or_else(|| SyncError::UnknownProtocol(hash.to_string()))?;
            return Ok((handler, protocol.constants));
        }

        let constants: ProtocolConstants = self.rpc.constants_at(level).await?.into();
        let code = self.next_protocol_code;
        self.next_protocol_code += 1;

        let protocol = Protocol {
            hash: hash.clone(),
            code,
            first_level: level,
            last_level: None,
            constants,
        };
        self.store.insert_protocol(protocol).await?;

        let handler: Arc<dyn ProtocolHandler> = Arc::new(DefaultHandler::new(hash.clone(), code, all_operation_kinds()));
        self.registry.register(handler.clone());
        Ok((handler, constants))
    }

    async fn resolve_right_account(ctx: &CommitContext<'_>, address: &str) -> Result<AccountId, SyncError> {
        let address = Address::parse(address).map_err(|err| {
            SyncError::Validation(tzindex_common::error::ValidationError::Other(err.to_string()))
        })?;
        Ok(ctx.account_by_address(&address).await?.map(|a| a.id()).unwrap_or(0))
    }

    async fn apply_one_block(&mut self, level: Level) -> Result<(), SyncError> {
        let header_rpc = self
            .rpc
            .header_at(level)
            .await?
            .ok_or_else(|| SyncError::UnknownProtocol(format!("missing header at {level}")))?;
        let raw_ops = self.rpc.block_operations(level).await?;
        let mut passes = parse_block_operations(raw_ops)?;
        while passes.len() < 4 {
            passes.push(Vec::new());
        }

        let (handler, constants) = self.ensure_protocol(&header_rpc.protocol, level).await?;

        let header = BlockHeader {
            level: header_rpc.level,
            hash: header_rpc.hash,
            predecessor: header_rpc.predecessor,
            timestamp: header_rpc.timestamp,
            protocol_code: handler.protocol_code(),
            baker_id: 0,
            priority: 0,
            validation_passes: header_rpc.validation_pass,
            reward: 0,
            fees: 0,
            deposit: 0,
            operations_bitmask: 0,
            lb_escape_vote: None,
            lb_escape_ema: None,
        };
        let block = Block {
            header: header.clone(),
            consensus: std::mem::take(&mut passes[0]),
            voting: std::mem::take(&mut passes[1]),
            anonymous: std::mem::take(&mut passes[2]),
            manager: std::mem::take(&mut passes[3]),
        };

        let result: Result<(), SyncError> = async {
            let ctx = CommitContext::new(&self.cache, self.store.as_ref(), level);

            let applied = self.registry.apply_block(handler.as_ref(), &ctx, &block).await?;

            if level % constants.blocks_per_cycle == 1 {
                let cycle_index = level / constants.blocks_per_cycle;
                let baking_rpc = self.rpc.baking_rights(cycle_index).await?;
                let endorsing_rpc = self.rpc.endorsing_rights(cycle_index).await?;

                let mut baking_rights = Vec::with_capacity(baking_rpc.len());
                for right in baking_rpc {
                    let baker_id = Self::resolve_right_account(&ctx, &right.delegate).await?;
                    baking_rights.push(BakingRight {
                        cycle: cycle_index,
                        level: right.level,
                        baker_id,
                        priority: right.priority.unwrap_or(0),
                        status: RightStatus::Future,
                    });
                }
                let mut endorsing_rights = Vec::with_capacity(endorsing_rpc.len());
                for right in endorsing_rpc {
                    let baker_id = Self::resolve_right_account(&ctx, &right.delegate).await?;
                    endorsing_rights.push(EndorsingRight {
                        cycle: cycle_index,
                        level: right.level,
                        baker_id,
                        slot: right.slot.unwrap_or(0),
                        status: RightStatus::Future,
                    });
                }

                self.cycle_engine
                    .begin_cycle(&ctx, cycle_index, level, 0, 0, 0, String::new(), baking_rights, endorsing_rights)
                    .await?;
            }
            if level % constants.blocks_per_cycle == 0 {
                let cycle_index = level / constants.blocks_per_cycle - 1;
                self.cycle_engine.end_cycle(&ctx, cycle_index, constants.preserved_cycles).await?;
            }

            self.store.insert_block(header.clone()).await?;
            for op in &applied {
                self.store.insert_operation(op.clone()).await?;
            }

            let mut state = self.cache.get_app_state(self.store.as_ref()).await?;
            state.level = level;
            state.hash = header.hash.clone();
            state.protocol_code = header.protocol_code;
            state.timestamp = header.timestamp;
            state.known_head = state.known_head.max(level);
            self.cache.put_app_state(state);

            self.cache.flush(self.store.as_ref()).await?;
            Ok(())
        }
        .await;

        if result.is_err() {
            self.cache.discard_dirty();
        }
        result
    }

    async fn revert_one_block(&mut self, level: Level) -> Result<(), SyncError> {
        let result: Result<BlockHeader, SyncError> = async {
            let block_header = self
                .store
                .get_block(level)
                .await?
                .ok_or_else(|| SyncError::UnknownProtocol(format!("no indexed block at {level}")))?;
            let protocol = self
                .store
                .get_protocol_by_code(block_header.protocol_code)
                .await?
                .ok_or_else(|| SyncError::UnknownProtocol(format!("protocol code {}", block_header.protocol_code)))?;
            let handler = self.registry.resolve(&protocol.hash)?;

            let ops = self.store.operations_at_level(level).await?;
            let ctx = CommitContext::new(&self.cache, self.store.as_ref(), level);
            self.registry.revert_block(handler.as_ref(), &ctx, &ops).await?;
            self.cycle_engine.revert_from_level(&ctx, level).await?;

            for op in &ops {
                self.store.delete_operation(op.id).await?;
            }
            self.store.delete_block(level).await?;

            let predecessor = self.store.get_block(level - 1).await?;
            let mut state = self.cache.get_app_state(self.store.as_ref()).await?;
            state.level = level - 1;
            if let Some(predecessor) = &predecessor {
                state.hash = predecessor.hash.clone();
                state.protocol_code = predecessor.protocol_code;
                state.timestamp = predecessor.timestamp;
            } else {
                state.hash = block_header.predecessor.clone();
            }
            self.cache.put_app_state(state);

            self.cache.flush(self.store.as_ref()).await?;
            Ok(block_header)
        }
        .await;

        match result {
            Ok(_) => {
                if config::reorg_signal_enabled() {
                    let _ = self.reorg_tx.send(level);
                }
                Ok(())
            }
            Err(err) => {
                self.cache.discard_dirty();
                Err(err)
            }
        }
    }
}
