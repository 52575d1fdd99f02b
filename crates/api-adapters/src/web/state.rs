//! State shared across all axum handlers.

use std::sync::Arc;

use services::{AuthResolver, UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
    pub auth: AuthResolver,
}

impl AppState {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        let auth = AuthResolver::new(Arc::clone(&directory));
        Self { directory, auth }
    }
}
