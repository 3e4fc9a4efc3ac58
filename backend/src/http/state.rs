//! Application state for the HTTP server.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::db::repository::YardRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn YardRepository>,
    /// Fixed "today" for deterministic runs; the local date when unset.
    pub today: Option<NaiveDate>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn YardRepository>) -> Self {
        Self {
            repository,
            today: None,
        }
    }

    /// Pin the date handlers treat as today.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The date used for default report weeks and submission stamps.
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
