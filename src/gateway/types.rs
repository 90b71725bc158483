//! Gateway request/response types

use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountId};
use crate::error::LedgerError;

/// Account representation returned by every account endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: AccountId,
    pub balance: u64,
    pub version: u64,
}

impl From<&Account> for AccountDto {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            balance: account.balance.cents(),
            version: account.version,
        }
    }
}

/// POST /account/{id}/deposit request body.
///
/// The amount is deserialized signed so a negative input is rejected at
/// this boundary instead of being reinterpreted as a huge deposit.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: i64,
}

/// POST /account/{id}/transfer request body.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub to: AccountId,
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Stable error code string for the HTTP surface.
pub fn error_code(err: &LedgerError) -> &'static str {
    match err {
        LedgerError::InvalidAmount => "INVALID_AMOUNT",
        LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        LedgerError::Conflict(_) => "CONFLICT",
        LedgerError::Storage(_) | LedgerError::RollbackFailed { .. } => "STORAGE_FAILURE",
    }
}
