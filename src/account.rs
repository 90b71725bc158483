//! Bank Account
//!
//! An `Account` held in memory is a snapshot: the balance as of the version
//! it was read at. `withdraw`/`deposit` are pure transformations of that
//! snapshot and never touch storage or the version — only a successful
//! storage write advances the version, by exactly one.

use crate::error::LedgerError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque unique account identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Account snapshot: identity, balance, and the optimistic-lock version the
/// balance was read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Money,
    pub version: u64,
}

impl Account {
    /// Brand-new account: fresh id, zero balance, version 0.
    pub fn new() -> Self {
        Self::with_id(AccountId::new())
    }

    pub fn with_id(id: AccountId) -> Self {
        Self {
            id,
            balance: Money::ZERO,
            version: 0,
        }
    }

    /// Rebuild a snapshot as read from storage.
    pub fn restore(id: AccountId, balance: Money, version: u64) -> Self {
        Self {
            id,
            balance,
            version,
        }
    }

    /// Reduce the balance. Fails with `InsufficientFunds` when the amount
    /// exceeds the balance; the snapshot is left untouched in that case.
    pub fn withdraw(&self, amount: Money) -> Result<Account, LedgerError> {
        let balance =
            self.balance
                .subtract(amount)
                .map_err(|_| LedgerError::InsufficientFunds {
                    id: self.id,
                    requested: amount.cents(),
                    available: self.balance.cents(),
                })?;
        Ok(Account { balance, ..*self })
    }

    /// Increase the balance. No upper bound short of `u64::MAX`.
    pub fn deposit(&self, amount: Money) -> Result<Account, LedgerError> {
        let balance = self.balance.add(amount)?;
        Ok(Account { balance, ..*self })
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}
