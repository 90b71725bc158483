//! In-Memory Storage
//!
//! DashMap-backed implementation for tests and single-process runs. The
//! version compare-and-swap in `update` happens under the map's shard lock,
//! which makes it atomic with respect to concurrent writers.
//!
//! Transactions keep an undo journal of before-images. Writes land in the
//! shared map immediately; rollback restores the recorded images in reverse
//! order, so a transfer's two legs are undone together.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{Storage, StorageTransaction, TransactionalStorage};
use crate::account::{Account, AccountId};
use crate::error::LedgerError;

/// In-memory account store. Cheap to clone, clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    accounts: Arc<DashMap<AccountId, Account>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts (test helper).
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn details(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.accounts
            .get(&id)
            .map(|stored| *stored)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    async fn create(&self, account: &Account) -> Result<(), LedgerError> {
        match self.accounts.entry(account.id) {
            Entry::Occupied(_) => Err(LedgerError::Storage(format!(
                "cannot create account [{}]: id already exists",
                account.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(*account);
                Ok(())
            }
        }
    }

    async fn update(&self, account: &Account) -> Result<(), LedgerError> {
        // Shard lock held for the whole compare-and-swap.
        match self.accounts.get_mut(&account.id) {
            None => Err(LedgerError::AccountNotFound(account.id)),
            Some(mut stored) if stored.version == account.version => {
                stored.balance = account.balance;
                stored.version = account.version + 1;
                Ok(())
            }
            Some(_) => Err(LedgerError::Conflict(account.id)),
        }
    }

    async fn all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.accounts.iter().map(|entry| *entry.value()).collect())
    }
}

#[async_trait]
impl TransactionalStorage for MemoryStorage {
    async fn begin(&self) -> Result<Box<dyn StorageTransaction>, LedgerError> {
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            journal: Mutex::new(Vec::new()),
        }))
    }
}

/// Before-image journal entry.
enum Undo {
    Created(AccountId),
    Updated(Account),
}

/// Journaling transaction over [`MemoryStorage`].
pub struct MemoryTransaction {
    store: MemoryStorage,
    journal: Mutex<Vec<Undo>>,
}

impl MemoryTransaction {
    fn record(&self, undo: Undo) {
        self.journal
            .lock()
            .expect("undo journal lock poisoned")
            .push(undo);
    }

    fn undo_all(&self) {
        let mut journal = self.journal.lock().expect("undo journal lock poisoned");
        for undo in journal.drain(..).rev() {
            match undo {
                Undo::Created(id) => {
                    self.store.accounts.remove(&id);
                }
                Undo::Updated(before) => {
                    self.store.accounts.insert(before.id, before);
                }
            }
        }
    }
}

#[async_trait]
impl Storage for MemoryTransaction {
    async fn details(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store.details(id).await
    }

    async fn create(&self, account: &Account) -> Result<(), LedgerError> {
        self.store.create(account).await?;
        self.record(Undo::Created(account.id));
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), LedgerError> {
        let before = self.store.details(account.id).await?;
        self.store.update(account).await?;
        self.record(Undo::Updated(before));
        Ok(())
    }

    async fn all_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.store.all_accounts().await
    }
}

#[async_trait]
impl StorageTransaction for MemoryTransaction {
    fn as_storage(&self) -> &dyn Storage {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), LedgerError> {
        self.journal
            .lock()
            .expect("undo journal lock poisoned")
            .clear();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), LedgerError> {
        self.undo_all();
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        // Uncommitted writes do not survive the transaction.
        self.undo_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[tokio::test]
    async fn create_then_details_roundtrip() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();

        let read = storage.details(account.id).await.unwrap();
        assert_eq!(read, account);
    }

    #[tokio::test]
    async fn details_unknown_id_fails_with_id_in_message() {
        let storage = MemoryStorage::new();
        let id = AccountId::new();
        let err = storage.details(id).await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(_)));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[tokio::test]
    async fn duplicate_create_fails() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();
        let err = storage.create(&account).await.unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[tokio::test]
    async fn update_advances_version_by_one() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();

        let mutated = account.deposit(Money::new(100)).unwrap();
        storage.update(&mutated).await.unwrap();

        let stored = storage.details(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::new(100));
        assert_eq!(stored.version, account.version + 1);
    }

    #[tokio::test]
    async fn stale_version_update_conflicts() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();

        // First writer wins the round.
        let first = account.deposit(Money::new(10)).unwrap();
        storage.update(&first).await.unwrap();

        // Second writer still holds version 0 and must lose.
        let second = account.deposit(Money::new(20)).unwrap();
        let err = storage.update(&second).await.unwrap_err();
        assert!(err.is_retryable());

        // Re-read and retry against current state: now it lands.
        let current = storage.details(account.id).await.unwrap();
        let retried = current.deposit(Money::new(20)).unwrap();
        storage.update(&retried).await.unwrap();

        let stored = storage.details(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::new(30));
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn rollback_restores_before_images() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();

        let tx = storage.begin().await.unwrap();
        let mutated = account.deposit(Money::new(75)).unwrap();
        tx.as_storage().update(&mutated).await.unwrap();
        tx.rollback().await.unwrap();

        let stored = storage.details(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::ZERO);
        assert_eq!(stored.version, 0);
    }

    #[tokio::test]
    async fn commit_keeps_writes() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();

        let tx = storage.begin().await.unwrap();
        let mutated = account.deposit(Money::new(75)).unwrap();
        tx.as_storage().update(&mutated).await.unwrap();
        tx.commit().await.unwrap();

        let stored = storage.details(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::new(75));
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let storage = MemoryStorage::new();
        let account = Account::new();
        storage.create(&account).await.unwrap();

        {
            let tx = storage.begin().await.unwrap();
            let mutated = account.deposit(Money::new(75)).unwrap();
            tx.as_storage().update(&mutated).await.unwrap();
            // dropped without commit
        }

        let stored = storage.details(account.id).await.unwrap();
        assert_eq!(stored.balance, Money::ZERO);
    }
}
