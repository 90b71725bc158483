//! optibank - Optimistic-Concurrency Money Ledger
//!
//! A money-ledger core that moves funds between accounts under concurrent
//! access without locking them. Correctness rests on one mechanism: every
//! write is a compare-and-swap on the account's version, and a bounded
//! retry wrapper re-runs the whole read-mutate-write unit when a write
//! loses its version race.
//!
//! # Modules
//!
//! - [`money`] - Non-negative monetary value type
//! - [`account`] - Account snapshot (id, balance, optimistic-lock version)
//! - [`error`] - Error kinds; `Conflict` is the only retryable one
//! - [`storage`] - Storage contract + in-memory and PostgreSQL backends
//! - [`ledger`] - Business operations (create/deposit/transfer)
//! - [`operation`] - Transactional and retriable unit-of-work wrappers
//! - [`gateway`] - Axum REST surface

pub mod account;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod money;
pub mod operation;
pub mod storage;

// Convenient re-exports at crate root
pub use account::{Account, AccountId};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use money::{Money, MoneyError};
pub use operation::{RetriableOperation, TransactionalOperation};
pub use storage::{MemoryStorage, PgStorage, Storage, StorageTransaction, TransactionalStorage};
