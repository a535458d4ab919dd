use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::services::TaxAdvisor;

/// Shared application state
///
/// Holds the models loaded at startup. Nothing mutates them afterwards, so
/// handlers read them concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    advisor: Arc<TaxAdvisor>,
    loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Wraps a fully loaded advisor
    pub fn new(advisor: TaxAdvisor) -> Self {
        Self {
            advisor: Arc::new(advisor),
            loaded_at: Utc::now(),
        }
    }

    /// Read-only access to the loaded models
    pub fn advisor(&self) -> &TaxAdvisor {
        &self.advisor
    }

    /// When the model artifacts were loaded
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
