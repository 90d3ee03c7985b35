use crate::config::AuthConfig;
use crate::summary::SummaryPipeline;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Summary pipeline (owns the store and generator)
    pub pipeline: Arc<SummaryPipeline>,

    /// Accepted bearer tokens
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(pipeline: Arc<SummaryPipeline>, auth: AuthConfig) -> Self {
        Self {
            pipeline,
            auth: Arc::new(auth),
        }
    }
}
