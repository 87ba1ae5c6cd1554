mod hash;

pub use hash::{BlockHash, OperationHash, ProposalHash};

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid base58 identifier: {0}")]
    InvalidBase58(String),

    #[error("unexpected identifier length for {kind}: expected {expected}, got {got}")]
    UnexpectedLength {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
}

/// A bech32-style account address (`tz1...`, `tz2...`, `tz3...`, `KT1...`).
///
/// The upstream node is trusted (spec Non-goals exclude validating
/// cryptographic signatures or consensus rules), so this wrapper only
/// enforces that the value decodes as base58 and carries a known prefix; it
/// never reconstructs or verifies the underlying curve point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, CryptoError> {
        bs58::decode(raw)
            .into_vec()
            .map_err(|_| CryptoError::InvalidBase58(raw.to_string()))?;
        Ok(Address(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_contract(&self) -> bool {
        self.0.starts_with("KT1")
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

/// A baker's revealed public key, opaque to the indexer beyond its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    pub fn new(raw: String) -> Self {
        PublicKey(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
