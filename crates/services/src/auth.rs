//! # Auth Resolver
//!
//! Classifies a claimed username/password pair. Stateless: no lockout, no
//! attempt counting, plaintext comparison.

use std::sync::Arc;

use domains::{LoginOutcome, User};

use crate::directory::UserDirectory;

/// Classifies a login attempt against an already looked-up user.
pub fn classify(user: Option<&User>, password: &str) -> LoginOutcome {
    match user {
        None => LoginOutcome::NoMatch,
        Some(user) if user.password != password => LoginOutcome::WrongPassword,
        Some(_) => LoginOutcome::Correct,
    }
}

/// Resolves login attempts against the shared directory.
#[derive(Clone)]
pub struct AuthResolver {
    directory: Arc<UserDirectory>,
}

impl AuthResolver {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn classify(&self, username: &str, password: &str) -> LoginOutcome {
        let user = self.directory.lookup(username).await;
        classify(user.as_ref(), password)
    }
}
