//! Ledger Business Service
//!
//! Orchestrates account operations over a [`Storage`]. A `Ledger` is a thin
//! borrow of a storage view and is constructed per call — for plain reads
//! over the pool storage, for writes over a transaction view. It never
//! caches account state across calls; every operation re-reads.
//!
//! Concurrency strategy: no account is ever locked. A transfer updates its
//! two accounts as two independent version-checked writes, so transfers on
//! disjoint account pairs never contend. The price is that a write can lose
//! its version race and fail with the retryable conflict; the enclosing
//! [`RetriableOperation`](crate::operation::RetriableOperation) re-runs the
//! whole read-mutate-write unit against current state.

use tracing::debug;

use crate::account::{Account, AccountId};
use crate::error::LedgerError;
use crate::money::Money;
use crate::storage::Storage;

/// Business operations over a borrowed storage view.
pub struct Ledger<'a> {
    storage: &'a dyn Storage,
}

impl<'a> Ledger<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a brand-new account (zero balance, version 0).
    pub async fn create_account(&self) -> Result<Account, LedgerError> {
        let account = Account::new();
        self.storage.create(&account).await?;
        debug!(account_id = %account.id, "account created");
        Ok(account)
    }

    pub async fn account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.storage.details(id).await
    }

    pub async fn all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.storage.all_accounts().await
    }

    /// One read, one conditional write. Returns the post-deposit snapshot
    /// (balance updated, version still the version it was read at — storage
    /// owns the version advance). Retry on conflict is the caller's concern.
    pub async fn deposit(&self, id: AccountId, amount: Money) -> Result<Account, LedgerError> {
        let account = self.storage.details(id).await?;
        let deposited = account.deposit(amount)?;
        self.storage.update(&deposited).await?;
        debug!(account_id = %id, amount = %amount, "deposit applied");
        Ok(deposited)
    }

    /// Move `amount` between two accounts.
    ///
    /// The two accounts are read and written independently, each write
    /// guarded only by its own version check. If either write loses its
    /// race the whole unit fails with the retryable conflict; undoing the
    /// already-applied leg is the enclosing transaction's job.
    pub async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Money,
    ) -> Result<(), LedgerError> {
        if from == to {
            return Ok(());
        }
        if amount.is_zero() {
            return Ok(());
        }

        let from_account = self.storage.details(from).await?;
        let to_account = self.storage.details(to).await?;

        // InsufficientFunds surfaces here, before any write.
        let withdrawn = from_account.withdraw(amount)?;
        let deposited = to_account.deposit(amount)?;

        self.storage.update(&withdrawn).await?;
        self.storage.update(&deposited).await?;

        debug!(from = %from, to = %to, amount = %amount, "transfer applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    async fn account_with_balance(storage: &MemoryStorage, cents: u64) -> Account {
        let ledger = Ledger::new(storage);
        let account = ledger.create_account().await.unwrap();
        if cents > 0 {
            ledger.deposit(account.id, Money::new(cents)).await.unwrap();
        }
        ledger.account(account.id).await.unwrap()
    }

    #[tokio::test]
    async fn create_account_persists_empty_account() {
        let storage = MemoryStorage::new();
        let ledger = Ledger::new(&storage);

        let account = ledger.create_account().await.unwrap();
        let stored = ledger.account(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::ZERO);
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn deposit_returns_post_deposit_snapshot() {
        let storage = MemoryStorage::new();
        let ledger = Ledger::new(&storage);
        let account = ledger.create_account().await.unwrap();

        let returned = ledger.deposit(account.id, Money::new(250)).await.unwrap();
        assert_eq!(returned.balance, Money::new(250));

        let stored = ledger.account(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::new(250));
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn deposit_unknown_account_fails() {
        let storage = MemoryStorage::new();
        let ledger = Ledger::new(&storage);
        let err = ledger
            .deposit(AccountId::new(), Money::new(10))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn transfer_moves_funds_and_bumps_both_versions() {
        let storage = MemoryStorage::new();
        let a = account_with_balance(&storage, 1000).await;
        let b = account_with_balance(&storage, 500).await;

        let ledger = Ledger::new(&storage);
        ledger.transfer(a.id, b.id, Money::new(200)).await.unwrap();

        let a_after = ledger.account(a.id).await.unwrap();
        let b_after = ledger.account(b.id).await.unwrap();
        assert_eq!(a_after.balance, Money::new(800));
        assert_eq!(b_after.balance, Money::new(700));
        assert_eq!(a_after.version, a.version + 1);
        assert_eq!(b_after.version, b.version + 1);
    }

    #[tokio::test]
    async fn transfer_more_than_balance_fails_without_writes() {
        let storage = MemoryStorage::new();
        let a = account_with_balance(&storage, 100).await;
        let b = account_with_balance(&storage, 0).await;

        let ledger = Ledger::new(&storage);
        let err = ledger
            .transfer(a.id, b.id, Money::new(101))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not enough money"));

        // storage unmodified
        let a_after = ledger.account(a.id).await.unwrap();
        let b_after = ledger.account(b.id).await.unwrap();
        assert_eq!(a_after.balance, Money::new(100));
        assert_eq!(a_after.version, a.version);
        assert_eq!(b_after.balance, Money::ZERO);
        assert_eq!(b_after.version, b.version);
    }

    #[tokio::test]
    async fn transfer_missing_counterparty_fails_before_writes() {
        let storage = MemoryStorage::new();
        let a = account_with_balance(&storage, 100).await;

        let ledger = Ledger::new(&storage);
        let err = ledger
            .transfer(a.id, AccountId::new(), Money::new(10))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(_)));

        let a_after = ledger.account(a.id).await.unwrap();
        assert_eq!(a_after.balance, Money::new(100));
        assert_eq!(a_after.version, a.version);
    }
}
