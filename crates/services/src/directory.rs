//! # User Directory
//!
//! The single authoritative registry of users for the process lifetime.
//!
//! The user list and the id counter sit behind one async mutex, so
//! "check-exists-then-register" is atomic and two mutations of the same user
//! never interleave. Account files are written while the lock is held.

use std::sync::Arc;

use domains::{validate_credentials, AccountStore, DomainError, Post, Result, User};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ledger;

struct Registry {
    /// Ordered by id.
    users: Vec<User>,
    next_id: u64,
}

impl Registry {
    fn position(&self, username: &str) -> Option<usize> {
        self.users.iter().position(|u| u.username == username)
    }
}

/// In-memory users backed by an [`AccountStore`].
pub struct UserDirectory {
    store: Arc<dyn AccountStore>,
    registry: Mutex<Registry>,
}

impl UserDirectory {
    /// Loads every stored account and builds the directory from them.
    pub async fn open(store: Arc<dyn AccountStore>) -> Result<Self> {
        let users = store.load_all().await?;
        Ok(Self::with_users(store, users))
    }

    /// Builds a directory from already loaded accounts.
    ///
    /// Accounts are ordered by id; when two share a username the one with the
    /// lower id is kept. The id counter resumes after the highest loaded id.
    pub fn with_users(store: Arc<dyn AccountStore>, mut loaded: Vec<User>) -> Self {
        loaded.sort_by_key(|u| u.id);

        let mut users: Vec<User> = Vec::with_capacity(loaded.len());
        for user in loaded {
            if users.iter().any(|u| u.username == user.username) {
                warn!(username = %user.username, id = user.id, "duplicate account ignored");
                continue;
            }
            users.push(user);
        }

        let next_id = users.iter().map(|u| u.id).max().map_or(1, |max| max + 1);
        info!(users = users.len(), next_id, "user directory loaded");

        Self {
            store,
            registry: Mutex::new(Registry { users, next_id }),
        }
    }

    /// First user named `username`, if any.
    pub async fn lookup(&self, username: &str) -> Option<User> {
        let registry = self.registry.lock().await;
        registry.users.iter().find(|u| u.username == username).cloned()
    }

    pub async fn exists(&self, username: &str) -> bool {
        self.registry.lock().await.position(username).is_some()
    }

    /// Snapshot of every user, by id.
    pub async fn users(&self) -> Vec<User> {
        self.registry.lock().await.users.clone()
    }

    pub async fn len(&self) -> usize {
        self.registry.lock().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Creates, persists and inserts a new user.
    ///
    /// An id is consumed only once the credentials pass validation. If the
    /// account file cannot be written the user is not inserted and the id is
    /// not handed out again.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let mut registry = self.registry.lock().await;

        if registry.position(username).is_some() {
            debug!(username, "registration rejected: username taken");
            return Err(DomainError::DuplicateUsername(username.to_owned()));
        }
        validate_credentials(username, password)?;

        let id = registry.next_id;
        registry.next_id += 1;

        let user = User::new(username, password, id);
        self.store.save(&user).await?;
        registry.users.push(user.clone());

        info!(username, id, "user registered");
        Ok(user)
    }

    /// Appends `post` to the named user's ledger and rewrites their file.
    ///
    /// The in-memory user is replaced only after the file write succeeds.
    pub async fn append_post(&self, username: &str, post: Post) -> Result<User> {
        let mut registry = self.registry.lock().await;

        let index = registry
            .position(username)
            .ok_or_else(|| DomainError::UnknownUser(username.to_owned()))?;

        let mut updated = registry.users[index].clone();
        ledger::append(&mut updated, post)?;
        self.store.save(&updated).await?;
        registry.users[index] = updated.clone();

        debug!(username, post_count = updated.post_count, "post appended");
        Ok(updated)
    }
}
