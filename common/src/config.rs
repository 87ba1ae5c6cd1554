//! Domain-wide constants for the indexed chain.
//!
//! Process configuration (RPC endpoint, DSN, sync tunables) lives in the
//! `indexer` crate's `config` module; this module only holds constants that
//! describe the chain's own encoding rules.

/// Denominator used for fixed-point percentages (quorums, supermajority).
pub const QUORUM_DENOMINATOR: u64 = 10_000;

/// Supermajority threshold: yay / (yay + nay) >= 8 / 10.
pub const SUPERMAJORITY_NUMERATOR: u64 = 8;
pub const SUPERMAJORITY_DENOMINATOR: u64 = 10;

/// Base58 string lengths, per spec §6 ("Bit-exact formats").
pub const BLOCK_HASH_LEN: usize = 51;
pub const OPERATION_HASH_LEN: usize = 54;
pub const PROPOSAL_HASH_LEN: usize = 51;

/// Default reward for a seed-nonce revelation when a protocol does not
/// override `ProtocolConstants.seed_nonce_revelation_tip`.
///
/// Per spec §9 Open Questions, this was hardcoded upstream; we model it as a
/// protocol constant with this value as the fallback.
pub const DEFAULT_SEED_NONCE_REVELATION_TIP: i64 = 125_000;
