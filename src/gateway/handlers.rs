//! REST handlers
//!
//! Thin adapters over [`Ledger`]: decode the request, run the business
//! operation, map the outcome to a status code. Deposit and transfer run
//! inside the retriable+transactional composition; reads go straight to
//! storage.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::state::AppState;
use super::types::{AccountDto, DepositRequest, ErrorResponse, TransferRequest, error_code};
use crate::account::AccountId;
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::money::Money;
use crate::operation::{RetriableOperation, TransactionalOperation};
use crate::storage::Storage;

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: &LedgerError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse::new(error_code(err), err.to_string())),
    )
}

/// POST /account
pub async fn create_account(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AccountDto>, HandlerError> {
    let storage: &dyn Storage = &*state.storage;
    let account = Ledger::new(storage)
        .create_account()
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(AccountDto::from(&account)))
}

/// GET /account/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> Result<Json<AccountDto>, HandlerError> {
    let storage: &dyn Storage = &*state.storage;
    let account = Ledger::new(storage)
        .account(id)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(AccountDto::from(&account)))
}

/// GET /account
pub async fn get_all_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AccountDto>>, HandlerError> {
    let storage: &dyn Storage = &*state.storage;
    let accounts = Ledger::new(storage)
        .all_accounts()
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(accounts.iter().map(AccountDto::from).collect()))
}

/// POST /account/{id}/deposit
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<AccountDto>, HandlerError> {
    let amount = Money::from_signed(req.amount)
        .map_err(|e| error_response(&LedgerError::from(e)))?;

    let storage = &*state.storage;
    let retriable = RetriableOperation::new(state.number_of_retries);
    let account = retriable
        .run(move || async move {
            TransactionalOperation::new(storage)
                .run(|view| Box::pin(async move { Ledger::new(view).deposit(id, amount).await }))
                .await
        })
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(AccountDto::from(&account)))
}

/// POST /account/{id}/transfer
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Path(from): Path<AccountId>,
    Json(req): Json<TransferRequest>,
) -> Result<StatusCode, HandlerError> {
    tracing::debug!("Transfer amount [{}] from [{}] to [{}]", req.amount, from, req.to);

    let amount = Money::from_signed(req.amount)
        .map_err(|e| error_response(&LedgerError::from(e)))?;
    let to = req.to;

    let storage = &*state.storage;
    let retriable = RetriableOperation::new(state.number_of_retries);
    retriable
        .run(move || async move {
            TransactionalOperation::new(storage)
                .run(|view| {
                    Box::pin(async move { Ledger::new(view).transfer(from, to, amount).await })
                })
                .await
        })
        .await
        .map_err(|e| error_response(&e))?;

    Ok(StatusCode::OK)
}
