use std::sync::Arc;

use crate::storage::TransactionalStorage;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    /// Account storage (in-memory or PostgreSQL)
    pub storage: Arc<dyn TransactionalStorage>,
    /// Attempt budget handed to every deposit/transfer unit of work
    pub number_of_retries: u32,
}

impl AppState {
    pub fn new(storage: Arc<dyn TransactionalStorage>, number_of_retries: u32) -> Self {
        Self {
            storage,
            number_of_retries,
        }
    }
}
