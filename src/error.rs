//! Error types for ledgers and content loading

use thiserror::Error;

/// Misuse of the economy ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("ledger amount must be non-negative, got {amount}")]
    NegativeAmount { amount: i64 },
    #[error("ledger balance would overflow")]
    Overflow,
}

/// Problems found while loading or validating content
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("{kind} id must not be empty")]
    EmptyId { kind: &'static str },
    #[error("duplicate prize id `{0}`")]
    DuplicatePrize(String),
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("unknown prize `{prize}` referenced by `{by}`")]
    UnknownPrize { prize: String, by: String },
    #[error("unknown loot table `{table}` referenced by machine `{machine}`")]
    UnknownLootTable { table: String, machine: String },
    #[error("no loot table with id `{0}`")]
    MissingLootTable(String),
}
