//! Shared application state

use std::sync::Arc;

use sg_core::SessionService;

/// State handed to every handler through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionService>,
}

impl AppState {
    pub fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }
}
