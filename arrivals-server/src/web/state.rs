//! Application state for the web layer.

use std::sync::Arc;

use crate::service::ArrivalsService;

/// Shared application state.
///
/// Generic over the feed sources so the same routes serve live clients or
/// file-backed mocks.
pub struct AppState<S, B, P> {
    /// Arrivals service (router + direct provider + estimation pipeline)
    pub service: Arc<ArrivalsService<S, B, P>>,
}

impl<S, B, P> AppState<S, B, P> {
    /// Create a new app state.
    pub fn new(service: ArrivalsService<S, B, P>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// Manual impl: derive would require the sources themselves to be Clone.
impl<S, B, P> Clone for AppState<S, B, P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}
