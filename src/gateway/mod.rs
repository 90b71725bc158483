//! HTTP Gateway
//!
//! REST surface over the ledger. Routing only — every business decision,
//! including the retry protocol, lives behind the handlers.

pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::storage::TransactionalStorage;
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/account",
            post(handlers::create_account).get(handlers::get_all_accounts),
        )
        .route("/account/{id}", get(handlers::get_account))
        .route("/account/{id}/deposit", post(handlers::deposit))
        .route("/account/{id}/transfer", post(handlers::transfer))
        .with_state(state)
}

/// Start the HTTP gateway server
pub async fn run_server(
    host: &str,
    port: u16,
    storage: Arc<dyn TransactionalStorage>,
    number_of_retries: u32,
) {
    let state = Arc::new(AppState::new(storage, number_of_retries));
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
