//! Unit-of-Work Wrappers
//!
//! A unit of work is one self-contained read-mutate-write operation (a
//! deposit, a transfer). Two wrappers compose around it:
//!
//! - [`TransactionalOperation`] scopes the unit inside one storage
//!   transaction: commit on success, rollback on any error.
//! - [`RetriableOperation`] re-runs the whole unit on an optimistic-lock
//!   conflict, up to a fixed attempt budget.
//!
//! The usual composition is retriable-outside, transactional-inside: every
//! re-attempt gets a brand-new transaction and re-reads current state, so
//! the unit is safe to re-run wholesale.

use std::future::Future;

use futures::future::BoxFuture;
use tracing::{error, warn};

use crate::error::LedgerError;
use crate::storage::{Storage, TransactionalStorage};

/// Runs a unit of work inside a single storage transaction.
pub struct TransactionalOperation<'a> {
    storage: &'a dyn TransactionalStorage,
}

impl<'a> TransactionalOperation<'a> {
    pub fn new(storage: &'a dyn TransactionalStorage) -> Self {
        Self { storage }
    }

    /// Begin a transaction, hand its storage view to the unit, then commit
    /// on success or roll back on any error, re-raising that error. Exactly
    /// one commit-or-rollback happens per run; the transactional context is
    /// released on every exit path.
    ///
    /// A rollback failure is reported as [`LedgerError::RollbackFailed`],
    /// wrapping the unit's original error rather than hiding it.
    pub async fn run<T, F>(&self, unit: F) -> Result<T, LedgerError>
    where
        F: for<'t> FnOnce(&'t dyn Storage) -> BoxFuture<'t, Result<T, LedgerError>>,
    {
        let tx = self.storage.begin().await?;
        let outcome = unit(tx.as_storage()).await;
        match outcome {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => match tx.rollback().await {
                Ok(()) => Err(err),
                Err(rollback_err) => Err(LedgerError::RollbackFailed {
                    rollback: rollback_err.to_string(),
                    source: Box::new(err),
                }),
            },
        }
    }
}

/// Re-runs a unit of work on optimistic-lock conflicts, up to a fixed
/// number of attempts.
///
/// Only errors whose [`LedgerError::is_retryable`] is true trigger a
/// re-attempt; anything else propagates immediately. The budget is fixed at
/// construction: one instance can serve many independent `run` calls, each
/// getting the full budget.
pub struct RetriableOperation {
    attempts: u32,
}

impl RetriableOperation {
    /// `attempts` is the total number of invocations granted to the unit,
    /// clamped to at least 1.
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run the unit until it succeeds, fails with a non-retryable error, or
    /// the attempt budget is exhausted (the final conflict is then raised).
    pub async fn run<T, F, Fut>(&self, mut unit: F) -> Result<T, LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let mut remaining = self.attempts;
        loop {
            match unit().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    remaining -= 1;
                    if remaining == 0 {
                        error!("Retries no more, exc [{}]", err);
                        return Err(err);
                    }
                    warn!("Retries left [{}], exc [{}]", remaining, err);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
