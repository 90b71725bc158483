//! Ledger Error Types
//!
//! One enum for every failure the ledger can surface. The distinction that
//! matters operationally is a single bit: is the error a retryable
//! optimistic-lock conflict or not. `is_retryable()` is the only thing the
//! retry wrapper inspects; everything else is diagnostic payload for the
//! caller-facing message.

use crate::account::AccountId;
use crate::money::MoneyError;
use thiserror::Error;

/// Ledger error kinds
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A negative or unrepresentable amount was supplied at the boundary.
    #[error("amount cannot be negative")]
    InvalidAmount,

    /// Withdrawal would make the balance negative. Never committed.
    #[error("account [{id}] has not enough money: requested {requested}, available {available}")]
    InsufficientFunds {
        id: AccountId,
        requested: u64,
        available: u64,
    },

    /// Lookup of an unknown account id.
    #[error("there is no account with id [{0}]")]
    AccountNotFound(AccountId),

    /// Optimistic lock failed: the stored version moved since the read.
    /// The only retryable kind.
    #[error("optimistic lock failed for account [{0}]")]
    Conflict(AccountId),

    /// Any other persistence-layer failure. Not retryable.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Rollback itself failed while unwinding `source`. The original error
    /// is wrapped, never swallowed.
    #[error("cannot rollback ({rollback}); original error: {source}")]
    RollbackFailed {
        rollback: String,
        #[source]
        source: Box<LedgerError>,
    },
}

impl LedgerError {
    /// True only for the conflict signal consumed by `RetriableOperation`.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Conflict(_))
    }

    /// HTTP status suggestion for the gateway mapping.
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::InvalidAmount => 400,
            LedgerError::InsufficientFunds { .. } => 422,
            LedgerError::AccountNotFound(_) => 404,
            LedgerError::Conflict(_)
            | LedgerError::Storage(_)
            | LedgerError::RollbackFailed { .. } => 500,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Storage(e.to_string())
    }
}

impl From<MoneyError> for LedgerError {
    fn from(_: MoneyError) -> Self {
        LedgerError::InvalidAmount
    }
}
