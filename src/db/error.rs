//! Typed failures for account and trade operations.

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures the web layer turns into apology pages. Everything else is a
/// plain database error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username taken, please choose a different one")]
    UsernameTaken(String),

    #[error("you have insufficient funds")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("no shares of this stock owned")]
    NotOwned(String),

    #[error("can't sell more shares than amount owned")]
    InsufficientShares { owned: i64, requested: i64 },

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}
