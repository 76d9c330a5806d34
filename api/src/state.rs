use axum::extract::FromRef;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Instant;

use crate::repository::Repository;
use crate::validation::ValidationLimits;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub limits: ValidationLimits,
    pub started_at: Instant,
    pub registry: Registry,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, limits: ValidationLimits, registry: Registry) -> Self {
        Self {
            repo,
            limits,
            started_at: Instant::now(),
            registry,
        }
    }
}

impl FromRef<AppState> for ValidationLimits {
    fn from_ref(state: &AppState) -> Self {
        state.limits
    }
}
