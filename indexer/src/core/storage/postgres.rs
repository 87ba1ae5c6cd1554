//! Postgres-backed `Storage` implementation via `diesel` + `r2d2`, following
//! the connection-pool-plus-blocking-pool pattern used by relational
//! indexers in this ecosystem (sourced from `aptos-labs-aptos-core`'s
//! `crates/indexer`, the pack's only relational-DB precedent — see
//! DESIGN.md). Diesel is synchronous, so every query runs inside
//! `tokio::task::spawn_blocking`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use tzindex_common::account::{Account, AccountId};
use tzindex_common::app_state::AppState;
use tzindex_common::block::{BlockHeader, Level};
use tzindex_common::cycle::Cycle;
use tzindex_common::crypto::{Address, BlockHash, ProposalHash};
use tzindex_common::operation::{Operation, OperationId, OperationKind};
use tzindex_common::protocol::Protocol;
use tzindex_common::quote::Quote;
use tzindex_common::rights::{BakingRight, EndorsingRight};
use tzindex_common::voting::{Proposal, VotingPeriod, VotingSnapshot};

use super::providers::{
    AccountProvider, AppStateProvider, BlockProvider, CycleProvider, OperationProvider,
    ProtocolProvider, QuoteProvider, RightsProvider, VotingProvider,
};
use super::{Storage, StorageError};

type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn connect(database_url: &str) -> Result<Self, StorageError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| StorageError::Pool(e.to_string()))?;
        Ok(PgStore { pool: Arc::new(pool) })
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StorageError> {
        self.pool.get().map_err(|e| StorageError::Pool(e.to_string()))
    }

    /// Runs a blocking diesel closure on the blocking thread pool, the way
    /// async consumers of a sync ORM have to (diesel has no async API).
    async fn run<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, diesel::result::Error> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.conn()?;
            f(&mut conn).map_err(|e| StorageError::Database(e.to_string()))
        })
        .await
        .map_err(|e| StorageError::Database(format!("blocking task panicked: {e}")))?
    }
}

#[async_trait]
impl AppStateProvider for PgStore {
    async fn get_app_state(&self) -> Result<AppState, StorageError> {
        self.run(|conn| {
            use super::schema::app_state::dsl::*;
            let row: AppStateRow = app_state.filter(id.eq(1)).first(conn)?;
            Ok(row.into())
        })
        .await
    }

    async fn set_app_state(&self, state: AppState) -> Result<(), StorageError> {
        let row = AppStateRow::from(state);
        self.run(move |conn| {
            use super::schema::app_state::dsl::*;
            diesel::insert_into(app_state)
                .values(&row)
                .on_conflict(id)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::app_state)]
struct AppStateRow {
    id: i32,
    level: i32,
    hash: String,
    protocol_code: i32,
    timestamp: chrono::DateTime<chrono::Utc>,
    next_operation_id: i64,
    next_account_id: i64,
    manager_counter: i64,
    known_head: i32,
}

impl From<AppState> for AppStateRow {
    fn from(s: AppState) -> Self {
        AppStateRow {
            id: s.id,
            level: s.level,
            hash: s.hash.to_string(),
            protocol_code: s.protocol_code,
            timestamp: s.timestamp,
            next_operation_id: s.next_operation_id,
            next_account_id: s.next_account_id,
            manager_counter: s.manager_counter,
            known_head: s.known_head,
        }
    }
}

impl From<AppStateRow> for AppState {
    fn from(r: AppStateRow) -> Self {
        AppState {
            id: r.id,
            level: r.level,
            hash: BlockHash::parse(&r.hash).expect("persisted hash is always well-formed"),
            protocol_code: r.protocol_code,
            timestamp: r.timestamp,
            next_operation_id: r.next_operation_id,
            next_account_id: r.next_account_id,
            manager_counter: r.manager_counter,
            known_head: r.known_head,
        }
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::protocols)]
struct ProtocolRow {
    hash: String,
    code: i32,
    first_level: i32,
    last_level: Option<i32>,
    constants: serde_json::Value,
}

impl From<Protocol> for ProtocolRow {
    fn from(p: Protocol) -> Self {
        ProtocolRow {
            hash: p.hash.to_string(),
            code: p.code,
            first_level: p.first_level,
            last_level: p.last_level,
            constants: serde_json::to_value(&p.constants).expect("constants always serialize"),
        }
    }
}

impl TryFrom<ProtocolRow> for Protocol {
    type Error = StorageError;

    fn try_from(r: ProtocolRow) -> Result<Self, Self::Error> {
        Ok(Protocol {
            hash: ProposalHash::parse(&r.hash).map_err(|e| StorageError::Database(e.to_string()))?,
            code: r.code,
            first_level: r.first_level,
            last_level: r.last_level,
            constants: serde_json::from_value(r.constants)
                .map_err(|e| StorageError::Database(e.to_string()))?,
        })
    }
}

#[async_trait]
impl ProtocolProvider for PgStore {
    async fn get_protocol(&self, hash: &ProposalHash) -> Result<Option<Protocol>, StorageError> {
        let hash = hash.to_string();
        let row: Option<ProtocolRow> = self
            .run(move |conn| {
                use super::schema::protocols::dsl;
                dsl::protocols.filter(dsl::hash.eq(hash)).first(conn).optional()
            })
            .await?;
        row.map(Protocol::try_from).transpose()
    }

    async fn get_protocol_by_code(&self, code_value: i32) -> Result<Option<Protocol>, StorageError> {
        let row: Option<ProtocolRow> = self
            .run(move |conn| {
                use super::schema::protocols::dsl::*;
                protocols.filter(code.eq(code_value)).first(conn).optional()
            })
            .await?;
        row.map(Protocol::try_from).transpose()
    }

    async fn insert_protocol(&self, protocol: Protocol) -> Result<(), StorageError> {
        let row = ProtocolRow::from(protocol);
        self.run(move |conn| {
            use super::schema::protocols::dsl::*;
            diesel::insert_into(protocols)
                .values(&row)
                .on_conflict(hash)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn seal_protocol(&self, protocol_hash: &ProposalHash, last: Level) -> Result<(), StorageError> {
        let protocol_hash = protocol_hash.to_string();
        self.run(move |conn| {
            use super::schema::protocols::dsl::*;
            diesel::update(protocols.filter(hash.eq(protocol_hash)))
                .set(last_level.eq(Some(last)))
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::accounts)]
struct AccountRow {
    id: i64,
    address: String,
    kind: String,
    first_level: i32,
    last_level: i32,
    balance: i64,
    counter: i64,
    data: serde_json::Value,
}

impl From<Account> for AccountRow {
    fn from(a: Account) -> Self {
        let kind = match &a {
            Account::User { .. } => "user",
            Account::Delegate { .. } => "delegate",
            Account::Contract { .. } => "contract",
            Account::Ghost { .. } => "ghost",
        }
        .to_string();
        let header = a.header().clone();
        AccountRow {
            id: header.id,
            address: header.address.to_string(),
            kind,
            first_level: header.first_level,
            last_level: header.last_level,
            balance: header.balance,
            counter: header.counter,
            data: serde_json::to_value(&a).expect("account always serializes"),
        }
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = StorageError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        serde_json::from_value(r.data).map_err(|e| StorageError::Database(e.to_string()))
    }
}

#[async_trait]
impl AccountProvider for PgStore {
    async fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, StorageError> {
        let row: Option<AccountRow> = self
            .run(move |conn| {
                use super::schema::accounts::dsl::*;
                accounts.filter(id.eq(account_id)).first(conn).optional()
            })
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn get_account_by_address(&self, addr: &Address) -> Result<Option<Account>, StorageError> {
        let addr = addr.to_string();
        let row: Option<AccountRow> = self
            .run(move |conn| {
                use super::schema::accounts::dsl::*;
                accounts.filter(address.eq(addr)).first(conn).optional()
            })
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn upsert_account(&self, account: Account) -> Result<(), StorageError> {
        let row = AccountRow::from(account);
        self.run(move |conn| {
            use super::schema::accounts::dsl::*;
            diesel::insert_into(accounts)
                .values(&row)
                .on_conflict(id)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_account(&self, account_id: AccountId) -> Result<(), StorageError> {
        self.run(move |conn| {
            use super::schema::accounts::dsl::*;
            diesel::delete(accounts.filter(id.eq(account_id))).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn list_delegates(&self, skip: usize, limit: usize) -> Result<Vec<Account>, StorageError> {
        let rows: Vec<AccountRow> = self
            .run(move |conn| {
                use super::schema::accounts::dsl::*;
                accounts
                    .filter(kind.eq("delegate"))
                    .offset(skip as i64)
                    .limit(limit as i64)
                    .load(conn)
            })
            .await?;
        rows.into_iter().map(Account::try_from).collect()
    }
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = super::schema::blocks)]
struct BlockRow {
    level: i32,
    hash: String,
    predecessor: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    protocol_code: i32,
    baker_id: i64,
    priority: i32,
    validation_passes: i32,
    reward: i64,
    fees: i64,
    deposit: i64,
    operations_bitmask: i32,
    lb_escape_vote: Option<bool>,
    lb_escape_ema: Option<i64>,
}

impl From<BlockHeader> for BlockRow {
    fn from(h: BlockHeader) -> Self {
        BlockRow {
            level: h.level,
            hash: h.hash.to_string(),
            predecessor: h.predecessor.to_string(),
            timestamp: h.timestamp,
            protocol_code: h.protocol_code,
            baker_id: h.baker_id,
            priority: h.priority,
            validation_passes: h.validation_passes,
            reward: h.reward,
            fees: h.fees,
            deposit: h.deposit,
            operations_bitmask: h.operations_bitmask,
            lb_escape_vote: h.lb_escape_vote,
            lb_escape_ema: h.lb_escape_ema,
        }
    }
}

impl TryFrom<BlockRow> for BlockHeader {
    type Error = StorageError;

    fn try_from(r: BlockRow) -> Result<Self, Self::Error> {
        Ok(BlockHeader {
            level: r.level,
            hash: BlockHash::parse(&r.hash).map_err(|e| StorageError::Database(e.to_string()))?,
            predecessor: BlockHash::parse(&r.predecessor)
                .map_err(|e| StorageError::Database(e.to_string()))?,
            timestamp: r.timestamp,
            protocol_code: r.protocol_code,
            baker_id: r.baker_id,
            priority: r.priority,
            validation_passes: r.validation_passes,
            reward: r.reward,
            fees: r.fees,
            deposit: r.deposit,
            operations_bitmask: r.operations_bitmask,
            lb_escape_vote: r.lb_escape_vote,
            lb_escape_ema: r.lb_escape_ema,
        })
    }
}

#[async_trait]
impl BlockProvider for PgStore {
    async fn get_block(&self, level_value: Level) -> Result<Option<BlockHeader>, StorageError> {
        let row: Option<BlockRow> = self
            .run(move |conn| {
                use super::schema::blocks::dsl::*;
                blocks.filter(level.eq(level_value)).first(conn).optional()
            })
            .await?;
        row.map(BlockHeader::try_from).transpose()
    }

    async fn get_block_by_hash(&self, h: &BlockHash) -> Result<Option<BlockHeader>, StorageError> {
        let h = h.to_string();
        let row: Option<BlockRow> = self
            .run(move |conn| {
                use super::schema::blocks::dsl::*;
                blocks.filter(hash.eq(h)).first(conn).optional()
            })
            .await?;
        row.map(BlockHeader::try_from).transpose()
    }

    async fn insert_block(&self, header: BlockHeader) -> Result<(), StorageError> {
        let row = BlockRow::from(header);
        self.run(move |conn| {
            use super::schema::blocks::dsl::*;
            diesel::insert_into(blocks).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_block(&self, level_value: Level) -> Result<(), StorageError> {
        self.run(move |conn| {
            use super::schema::blocks::dsl::*;
            diesel::delete(blocks.filter(level.eq(level_value))).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn max_level(&self) -> Result<Option<Level>, StorageError> {
        self.run(|conn| {
            use super::schema::blocks::dsl::*;
            blocks.select(diesel::dsl::max(level)).first(conn)
        })
        .await
    }
}

fn operation_kind_label(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Transaction => "transaction",
        OperationKind::Origination => "origination",
        OperationKind::Delegation => "delegation",
        OperationKind::Reveal => "reveal",
        OperationKind::Proposals => "proposals",
        OperationKind::Ballot => "ballot",
        OperationKind::DoubleBaking => "double_baking",
        OperationKind::DoubleEndorsing => "double_endorsing",
        OperationKind::NonceRevelation => "nonce_revelation",
        OperationKind::Endorsement => "endorsement",
        OperationKind::Activation => "activation",
        OperationKind::Migration => "migration",
        OperationKind::RegisterConstant => "register_constant",
    }
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = super::schema::operations)]
struct OperationRow {
    id: i64,
    level: i32,
    timestamp: chrono::DateTime<chrono::Utc>,
    op_hash: String,
    sender_id: i64,
    status: String,
    kind: String,
    errors: Option<String>,
    content: serde_json::Value,
}

impl From<Operation> for OperationRow {
    fn from(op: Operation) -> Self {
        let status = match op.status {
            tzindex_common::operation::OperationStatus::Applied => "applied",
            tzindex_common::operation::OperationStatus::Failed => "failed",
            tzindex_common::operation::OperationStatus::Backtracked => "backtracked",
            tzindex_common::operation::OperationStatus::Skipped => "skipped",
        }
        .to_string();
        OperationRow {
            id: op.id,
            level: op.level,
            timestamp: op.timestamp,
            op_hash: op.op_hash.to_string(),
            sender_id: op.sender_id,
            status,
            kind: operation_kind_label(op.kind()).to_string(),
            errors: op.errors,
            content: serde_json::to_value(&op.content).expect("operation content always serializes"),
        }
    }
}

impl TryFrom<OperationRow> for Operation {
    type Error = StorageError;

    fn try_from(r: OperationRow) -> Result<Self, Self::Error> {
        use tzindex_common::operation::OperationStatus as S;
        let status = match r.status.as_str() {
            "applied" => S::Applied,
            "failed" => S::Failed,
            "backtracked" => S::Backtracked,
            _ => S::Skipped,
        };
        Ok(Operation {
            id: r.id,
            level: r.level,
            timestamp: r.timestamp,
            op_hash: tzindex_common::crypto::OperationHash::parse(&r.op_hash)
                .map_err(|e| StorageError::Database(e.to_string()))?,
            sender_id: r.sender_id,
            status,
            errors: r.errors,
            content: serde_json::from_value(r.content).map_err(|e| StorageError::Database(e.to_string()))?,
        })
    }
}

#[async_trait]
impl OperationProvider for PgStore {
    async fn get_operation(&self, op_id: OperationId) -> Result<Option<Operation>, StorageError> {
        let row: Option<OperationRow> = self
            .run(move |conn| {
                use super::schema::operations::dsl::*;
                operations.filter(id.eq(op_id)).first(conn).optional()
            })
            .await?;
        row.map(Operation::try_from).transpose()
    }

    async fn insert_operation(&self, op: Operation) -> Result<(), StorageError> {
        let row = OperationRow::from(op);
        self.run(move |conn| {
            use super::schema::operations::dsl::*;
            diesel::insert_into(operations).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_operation(&self, op_id: OperationId) -> Result<(), StorageError> {
        self.run(move |conn| {
            use super::schema::operations::dsl::*;
            diesel::delete(operations.filter(id.eq(op_id))).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn operations_at_level(&self, level_value: Level) -> Result<Vec<Operation>, StorageError> {
        let rows: Vec<OperationRow> = self
            .run(move |conn| {
                use super::schema::operations::dsl::*;
                operations.filter(level.eq(level_value)).order(id.asc()).load(conn)
            })
            .await?;
        rows.into_iter().map(Operation::try_from).collect()
    }

    async fn count_by_sender_and_kind(
        &self,
        sender: AccountId,
        op_kind: OperationKind,
    ) -> Result<i64, StorageError> {
        let label = operation_kind_label(op_kind).to_string();
        self.run(move |conn| {
            use super::schema::operations::dsl::*;
            operations
                .filter(sender_id.eq(sender))
                .filter(kind.eq(label))
                .count()
                .get_result(conn)
        })
        .await
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::voting_periods)]
struct VotingPeriodRow {
    index: i32,
    epoch: i32,
    kind: String,
    first_level: i32,
    last_level: i32,
    status: String,
    top_upvotes: i64,
    top_rolls: i64,
    proposals_count: i32,
    ballot_quorum: Option<i64>,
    participation_ema: Option<i64>,
    total_rolls: i64,
    yay_rolls: i64,
    nay_rolls: i64,
    pass_rolls: i64,
}

impl From<VotingPeriod> for VotingPeriodRow {
    fn from(p: VotingPeriod) -> Self {
        use tzindex_common::voting::{PeriodKind as K, PeriodStatus as S};
        let kind = match p.kind {
            K::Proposal => "proposal",
            K::Exploration => "exploration",
            K::Cooldown => "cooldown",
            K::Promotion => "promotion",
            K::Adoption => "adoption",
        }
        .to_string();
        let status = match p.status {
            S::InProgress => "in_progress",
            S::NoProposal => "no_proposal",
            S::NoQuorum => "no_quorum",
            S::NoSupermajority => "no_supermajority",
            S::Successful => "successful",
        }
        .to_string();
        VotingPeriodRow {
            index: p.index,
            epoch: p.epoch,
            kind,
            first_level: p.first_level,
            last_level: p.last_level,
            status,
            top_upvotes: p.top_upvotes,
            top_rolls: p.top_rolls,
            proposals_count: p.proposals_count,
            ballot_quorum: p.ballot_quorum.map(|v| v as i64),
            participation_ema: p.participation_ema.map(|v| v as i64),
            total_rolls: p.total_rolls,
            yay_rolls: p.yay_rolls,
            nay_rolls: p.nay_rolls,
            pass_rolls: p.pass_rolls,
        }
    }
}

impl From<VotingPeriodRow> for VotingPeriod {
    fn from(r: VotingPeriodRow) -> Self {
        use tzindex_common::voting::{PeriodKind as K, PeriodStatus as S};
        let kind = match r.kind.as_str() {
            "proposal" => K::Proposal,
            "exploration" => K::Exploration,
            "cooldown" => K::Cooldown,
            "promotion" => K::Promotion,
            _ => K::Adoption,
        };
        let status = match r.status.as_str() {
            "in_progress" => S::InProgress,
            "no_proposal" => S::NoProposal,
            "no_quorum" => S::NoQuorum,
            "no_supermajority" => S::NoSupermajority,
            _ => S::Successful,
        };
        VotingPeriod {
            index: r.index,
            epoch: r.epoch,
            kind,
            first_level: r.first_level,
            last_level: r.last_level,
            status,
            top_upvotes: r.top_upvotes,
            top_rolls: r.top_rolls,
            proposals_count: r.proposals_count,
            ballot_quorum: r.ballot_quorum.map(|v| v as u64),
            participation_ema: r.participation_ema.map(|v| v as u64),
            total_rolls: r.total_rolls,
            yay_rolls: r.yay_rolls,
            nay_rolls: r.nay_rolls,
            pass_rolls: r.pass_rolls,
        }
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::proposals)]
struct ProposalRow {
    id: i64,
    hash: String,
    epoch: i32,
    first_period: i32,
    last_period: i32,
    initiator_id: i64,
    upvotes: i64,
    rolls: i64,
    status: String,
}

impl From<Proposal> for ProposalRow {
    fn from(p: Proposal) -> Self {
        use tzindex_common::voting::ProposalStatus as S;
        let status = match p.status {
            S::Active => "active",
            S::Accepted => "accepted",
            S::Rejected => "rejected",
            S::Skipped => "skipped",
        }
        .to_string();
        ProposalRow {
            id: p.id,
            hash: p.hash.to_string(),
            epoch: p.epoch,
            first_period: p.first_period,
            last_period: p.last_period,
            initiator_id: p.initiator_id,
            upvotes: p.upvotes,
            rolls: p.rolls,
            status,
        }
    }
}

impl TryFrom<ProposalRow> for Proposal {
    type Error = StorageError;

    fn try_from(r: ProposalRow) -> Result<Self, Self::Error> {
        use tzindex_common::voting::ProposalStatus as S;
        let status = match r.status.as_str() {
            "active" => S::Active,
            "accepted" => S::Accepted,
            "rejected" => S::Rejected,
            _ => S::Skipped,
        };
        Ok(Proposal {
            id: r.id,
            hash: ProposalHash::parse(&r.hash).map_err(|e| StorageError::Database(e.to_string()))?,
            epoch: r.epoch,
            first_period: r.first_period,
            last_period: r.last_period,
            initiator_id: r.initiator_id,
            upvotes: r.upvotes,
            rolls: r.rolls,
            status,
        })
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::voting_snapshots)]
struct SnapshotRow {
    period: i32,
    baker_id: i64,
    rolls: i64,
    status: String,
}

impl From<VotingSnapshot> for SnapshotRow {
    fn from(s: VotingSnapshot) -> Self {
        use tzindex_common::voting::SnapshotStatus as S;
        let status = match s.status {
            S::None => "none",
            S::Upvoted => "upvoted",
            S::VotedYay => "voted_yay",
            S::VotedNay => "voted_nay",
            S::VotedPass => "voted_pass",
        }
        .to_string();
        SnapshotRow {
            period: s.period,
            baker_id: s.baker_id,
            rolls: s.rolls,
            status,
        }
    }
}

impl From<SnapshotRow> for VotingSnapshot {
    fn from(r: SnapshotRow) -> Self {
        use tzindex_common::voting::SnapshotStatus as S;
        let status = match r.status.as_str() {
            "upvoted" => S::Upvoted,
            "voted_yay" => S::VotedYay,
            "voted_nay" => S::VotedNay,
            "voted_pass" => S::VotedPass,
            _ => S::None,
        };
        VotingSnapshot {
            period: r.period,
            baker_id: r.baker_id,
            rolls: r.rolls,
            status,
        }
    }
}

#[async_trait]
impl VotingProvider for PgStore {
    async fn get_period(&self, index_value: i32) -> Result<Option<VotingPeriod>, StorageError> {
        let row: Option<VotingPeriodRow> = self
            .run(move |conn| {
                use super::schema::voting_periods::dsl::*;
                voting_periods.filter(index.eq(index_value)).first(conn).optional()
            })
            .await?;
        Ok(row.map(VotingPeriod::from))
    }

    async fn upsert_period(&self, period: VotingPeriod) -> Result<(), StorageError> {
        let row = VotingPeriodRow::from(period);
        self.run(move |conn| {
            use super::schema::voting_periods::dsl::*;
            diesel::insert_into(voting_periods)
                .values(&row)
                .on_conflict(index)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn get_proposal(&self, hash_value: &ProposalHash) -> Result<Option<Proposal>, StorageError> {
        let hash_value = hash_value.to_string();
        let row: Option<ProposalRow> = self
            .run(move |conn| {
                use super::schema::proposals::dsl::*;
                proposals.filter(hash.eq(hash_value)).first(conn).optional()
            })
            .await?;
        row.map(Proposal::try_from).transpose()
    }

    async fn get_proposal_by_id(&self, id_value: i64) -> Result<Option<Proposal>, StorageError> {
        let row: Option<ProposalRow> = self
            .run(move |conn| {
                use super::schema::proposals::dsl::*;
                proposals.filter(id.eq(id_value)).first(conn).optional()
            })
            .await?;
        row.map(Proposal::try_from).transpose()
    }

    async fn upsert_proposal(&self, proposal: Proposal) -> Result<(), StorageError> {
        let row = ProposalRow::from(proposal);
        self.run(move |conn| {
            use super::schema::proposals::dsl::*;
            diesel::insert_into(proposals)
                .values(&row)
                .on_conflict(id)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_proposal(&self, id_value: i64) -> Result<(), StorageError> {
        self.run(move |conn| {
            use super::schema::proposals::dsl::*;
            diesel::delete(proposals.filter(id.eq(id_value))).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn proposals_in_epoch(&self, epoch_value: i32) -> Result<Vec<Proposal>, StorageError> {
        let rows: Vec<ProposalRow> = self
            .run(move |conn| {
                use super::schema::proposals::dsl::*;
                proposals.filter(epoch.eq(epoch_value)).load(conn)
            })
            .await?;
        rows.into_iter().map(Proposal::try_from).collect()
    }

    async fn get_snapshot(
        &self,
        period_value: i32,
        baker: AccountId,
    ) -> Result<Option<VotingSnapshot>, StorageError> {
        let row: Option<SnapshotRow> = self
            .run(move |conn| {
                use super::schema::voting_snapshots::dsl::*;
                voting_snapshots
                    .filter(period.eq(period_value))
                    .filter(baker_id.eq(baker))
                    .first(conn)
                    .optional()
            })
            .await?;
        Ok(row.map(VotingSnapshot::from))
    }

    async fn upsert_snapshot(&self, snapshot: VotingSnapshot) -> Result<(), StorageError> {
        let row = SnapshotRow::from(snapshot);
        self.run(move |conn| {
            use super::schema::voting_snapshots::dsl::*;
            diesel::insert_into(voting_snapshots)
                .values(&row)
                .on_conflict((period, baker_id))
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::cycles)]
struct CycleRow {
    index: i32,
    snapshot_level: i32,
    snapshot_index: i32,
    total_rolls: i64,
    total_staking: i64,
    selected_bakers: serde_json::Value,
    seed: String,
}

impl From<Cycle> for CycleRow {
    fn from(c: Cycle) -> Self {
        CycleRow {
            index: c.index,
            snapshot_level: c.snapshot_level,
            snapshot_index: c.snapshot_index,
            total_rolls: c.total_rolls,
            total_staking: c.total_staking,
            selected_bakers: serde_json::to_value(&c.selected_bakers)
                .expect("baker id list always serializes"),
            seed: c.seed,
        }
    }
}

impl TryFrom<CycleRow> for Cycle {
    type Error = StorageError;

    fn try_from(r: CycleRow) -> Result<Self, Self::Error> {
        Ok(Cycle {
            index: r.index,
            snapshot_level: r.snapshot_level,
            snapshot_index: r.snapshot_index,
            total_rolls: r.total_rolls,
            total_staking: r.total_staking,
            selected_bakers: serde_json::from_value(r.selected_bakers)
                .map_err(|e| StorageError::Database(e.to_string()))?,
            seed: r.seed,
        })
    }
}

#[async_trait]
impl CycleProvider for PgStore {
    async fn get_cycle(&self, index_value: i32) -> Result<Option<Cycle>, StorageError> {
        let row: Option<CycleRow> = self
            .run(move |conn| {
                use super::schema::cycles::dsl::*;
                cycles.filter(index.eq(index_value)).first(conn).optional()
            })
            .await?;
        row.map(Cycle::try_from).transpose()
    }

    async fn upsert_cycle(&self, cycle: Cycle) -> Result<(), StorageError> {
        let row = CycleRow::from(cycle);
        self.run(move |conn| {
            use super::schema::cycles::dsl::*;
            diesel::insert_into(cycles)
                .values(&row)
                .on_conflict(index)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_cycle(&self, index_value: i32) -> Result<(), StorageError> {
        self.run(move |conn| {
            use super::schema::cycles::dsl::*;
            diesel::delete(cycles.filter(index.eq(index_value))).execute(conn)?;
            Ok(())
        })
        .await
    }
}

fn right_status_label(status: tzindex_common::rights::RightStatus) -> &'static str {
    use tzindex_common::rights::RightStatus as S;
    match status {
        S::Future => "future",
        S::Realized => "realized",
        S::Uncovered => "uncovered",
        S::Missed => "missed",
    }
}

fn right_status_from(label: &str) -> tzindex_common::rights::RightStatus {
    use tzindex_common::rights::RightStatus as S;
    match label {
        "realized" => S::Realized,
        "uncovered" => S::Uncovered,
        "missed" => S::Missed,
        _ => S::Future,
    }
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = super::schema::baking_rights)]
struct BakingRightRow {
    cycle: i32,
    level: i32,
    baker_id: i64,
    priority: i32,
    status: String,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = super::schema::endorsing_rights)]
struct EndorsingRightRow {
    cycle: i32,
    level: i32,
    baker_id: i64,
    slot: i32,
    status: String,
}

#[async_trait]
impl RightsProvider for PgStore {
    async fn baking_rights_at_cycle(&self, cycle_value: i32) -> Result<Vec<BakingRight>, StorageError> {
        let rows: Vec<BakingRightRow> = self
            .run(move |conn| {
                use super::schema::baking_rights::dsl::*;
                baking_rights.filter(cycle.eq(cycle_value)).load(conn)
            })
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| BakingRight {
                cycle: r.cycle,
                level: r.level,
                baker_id: r.baker_id,
                priority: r.priority,
                status: right_status_from(&r.status),
            })
            .collect())
    }

    async fn upsert_baking_right(&self, right: BakingRight) -> Result<(), StorageError> {
        let row = BakingRightRow {
            cycle: right.cycle,
            level: right.level,
            baker_id: right.baker_id,
            priority: right.priority,
            status: right_status_label(right.status).to_string(),
        };
        self.run(move |conn| {
            use super::schema::baking_rights::dsl::*;
            diesel::insert_into(baking_rights)
                .values(&row)
                .on_conflict((cycle, level, baker_id))
                .do_update()
                .set(status.eq(&row.status))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn endorsing_rights_at_cycle(&self, cycle_value: i32) -> Result<Vec<EndorsingRight>, StorageError> {
        let rows: Vec<EndorsingRightRow> = self
            .run(move |conn| {
                use super::schema::endorsing_rights::dsl::*;
                endorsing_rights.filter(cycle.eq(cycle_value)).load(conn)
            })
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| EndorsingRight {
                cycle: r.cycle,
                level: r.level,
                baker_id: r.baker_id,
                slot: r.slot,
                status: right_status_from(&r.status),
            })
            .collect())
    }

    async fn upsert_endorsing_right(&self, right: EndorsingRight) -> Result<(), StorageError> {
        let row = EndorsingRightRow {
            cycle: right.cycle,
            level: right.level,
            baker_id: right.baker_id,
            slot: right.slot,
            status: right_status_label(right.status).to_string(),
        };
        self.run(move |conn| {
            use super::schema::endorsing_rights::dsl::*;
            diesel::insert_into(endorsing_rights)
                .values(&row)
                .on_conflict((cycle, level, baker_id))
                .do_update()
                .set(status.eq(&row.status))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_rights_from_level(&self, level_value: Level) -> Result<(), StorageError> {
        self.run(move |conn| {
            use super::schema::baking_rights::dsl as br;
            use super::schema::endorsing_rights::dsl as er;
            diesel::delete(br::baking_rights.filter(br::level.ge(level_value))).execute(conn)?;
            diesel::delete(er::endorsing_rights.filter(er::level.ge(level_value))).execute(conn)?;
            Ok(())
        })
        .await
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::quotes)]
struct QuoteRow {
    level: i32,
    btc: f64,
    eur: f64,
    usd: f64,
    cny: f64,
    jpy: f64,
    krw: f64,
    eth: f64,
    gbp: f64,
}

impl From<Quote> for QuoteRow {
    fn from(q: Quote) -> Self {
        QuoteRow {
            level: q.level,
            btc: q.btc,
            eur: q.eur,
            usd: q.usd,
            cny: q.cny,
            jpy: q.jpy,
            krw: q.krw,
            eth: q.eth,
            gbp: q.gbp,
        }
    }
}

impl From<QuoteRow> for Quote {
    fn from(r: QuoteRow) -> Self {
        Quote {
            level: r.level,
            btc: r.btc,
            eur: r.eur,
            usd: r.usd,
            cny: r.cny,
            jpy: r.jpy,
            krw: r.krw,
            eth: r.eth,
            gbp: r.gbp,
        }
    }
}

#[async_trait]
impl QuoteProvider for PgStore {
    async fn get_quote(&self, level_value: Level) -> Result<Option<Quote>, StorageError> {
        let row: Option<QuoteRow> = self
            .run(move |conn| {
                use super::schema::quotes::dsl::*;
                quotes.filter(level.eq(level_value)).first(conn).optional()
            })
            .await?;
        Ok(row.map(Quote::from))
    }

    async fn upsert_quote(&self, quote: Quote) -> Result<(), StorageError> {
        let row = QuoteRow::from(quote);
        self.run(move |conn| {
            use super::schema::quotes::dsl::*;
            diesel::insert_into(quotes)
                .values(&row)
                .on_conflict(level)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}

impl Storage for PgStore {}
