//! Error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Error, Debug)]
pub enum JournalError {
    /// A calculator was handed a trade in the wrong lifecycle state.
    #[error("Invalid state: trade {id} is {actual}, expected {expected}")]
    InvalidState {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Incomplete trade {id}: closed trade is missing {field}")]
    IncompleteTrade { id: String, field: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
