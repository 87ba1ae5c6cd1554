use thiserror::Error;

/// Errors raised while parsing a node RPC response into a typed value.
///
/// Per spec §6: "missing mandatory fields -> ValidationFailure(kind=MissingField,
/// path=...); present but wrong type -> ValidationFailure(kind=TypeMismatch)".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing field at {path}")]
    MissingField { path: String },

    #[error("type mismatch at {path}: expected {expected}")]
    TypeMismatch { path: String, expected: String },

    #[error("unknown operation kind {kind} for protocol {protocol}")]
    UnknownOperationKind { kind: String, protocol: String },

    #[error("duplicate operation id {0}")]
    DuplicateOperationId(i64),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while mutating an account's balance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("balance overflow")]
    Overflow,

    #[error("insufficient balance: need {need}, have {have}")]
    Insufficient { need: i64, have: i64 },
}
