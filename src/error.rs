use crate::models::Currency;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// A debit asked for more than the customer has available in the
    /// requested currency. The ledger is left unchanged.
    #[error("Insufficient credit: requested {requested}, available {available} {currency}")]
    InsufficientCredit {
        requested: i64,
        available: i64,
        currency: Currency,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
