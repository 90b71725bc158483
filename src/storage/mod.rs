//! Account Storage Contract
//!
//! Storage is the single source of truth for accounts and the locus of the
//! concurrency protocol: `update` is a compare-and-swap on `(id, version)`.
//! No other locking exists anywhere in the system — two callers racing on
//! the same account are resolved entirely by one of them losing the version
//! check and retrying.
//!
//! Two implementations:
//! - [`memory::MemoryStorage`] — DashMap-backed, for tests and local runs
//! - [`postgres::PgStorage`] — PostgreSQL via sqlx, for production

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use crate::account::{Account, AccountId};
use crate::error::LedgerError;
use async_trait::async_trait;

/// Durable account repository.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Point lookup. Fails with `AccountNotFound` for an unknown id.
    async fn details(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Persist a brand-new account at version 0. A duplicate id fails, it
    /// never overwrites.
    async fn create(&self, account: &Account) -> Result<(), LedgerError>;

    /// Conditional write: applies only when the stored version equals
    /// `account.version`, persisting the new balance and `version + 1`.
    /// A version mismatch fails with `Conflict` — the retryable signal.
    async fn update(&self, account: &Account) -> Result<(), LedgerError>;

    /// Full snapshot scan. No ordering guarantee.
    async fn all_accounts(&self) -> Result<Vec<Account>, LedgerError>;
}

/// Storage that can scope writes into an atomic transaction.
#[async_trait]
pub trait TransactionalStorage: Storage {
    /// Open a fresh transactional context. The context must never be shared
    /// across concurrent callers.
    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, LedgerError>;
}

/// A live transactional context. All `Storage` calls made through it commit
/// together or not at all. Dropping an unfinished transaction rolls it back
/// and releases its resources.
#[async_trait]
pub trait StorageTransaction: Storage {
    /// The `Storage` view handed to a unit of work.
    fn as_storage(&self) -> &dyn Storage;

    async fn commit(self: Box<Self>) -> Result<(), LedgerError>;

    async fn rollback(self: Box<Self>) -> Result<(), LedgerError>;
}
