//! Money Value Type
//!
//! All amounts are carried as `u64` in the smallest currency unit (cents).
//! Non-negativity is enforced by the type itself; arithmetic that would
//! produce a negative or unrepresentable result fails instead of clamping
//! or wrapping.
//!
//! `Money` is a pure value: every operation returns a fresh value and never
//! mutates in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Money arithmetic errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount cannot be negative")]
    NegativeAmount,

    #[error("amount too large, would overflow")]
    Overflow,
}

/// A non-negative amount in the smallest currency unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(cents: u64) -> Self {
        Self(cents)
    }

    /// Accept a signed amount from an external boundary (JSON, CLI).
    ///
    /// The gateway deserializes amounts as `i64` so that a negative input is
    /// rejected here rather than silently reinterpreted.
    pub fn from_signed(cents: i64) -> Result<Self, MoneyError> {
        if cents < 0 {
            return Err(MoneyError::NegativeAmount);
        }
        Ok(Self(cents as u64))
    }

    #[inline]
    pub fn cents(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Sum of two amounts. Fails with `Overflow` past `u64::MAX`.
    pub fn add(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Difference of two amounts. Fails when the result would be negative.
    pub fn subtract(self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(MoneyError::NegativeAmount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Money {
    fn from(cents: u64) -> Self {
        Money(cents)
    }
}
