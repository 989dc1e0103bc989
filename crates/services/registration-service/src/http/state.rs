//! Application state for dependency injection.

use std::sync::Arc;

use crate::repository::UserStore;
use crate::service::UserRegistration;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registrar: Arc<dyn UserRegistration>,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    /// Create new app state.
    pub fn new(registrar: Arc<dyn UserRegistration>, store: Arc<dyn UserStore>) -> Self {
        Self { registrar, store }
    }
}
