//! # Ports
//!
//! The persistence contract the directory is written against. The file-backed
//! implementation lives in `storage-adapters`.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::User;

/// Durable storage of user accounts, one record per user.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns every account that could be read and validated.
    ///
    /// Unreadable records are skipped; only failure to enumerate the store as
    /// a whole is an error.
    async fn load_all(&self) -> Result<Vec<User>, StorageError>;

    /// Overwrites the stored record for `user.username`.
    async fn save(&self, user: &User) -> Result<(), StorageError>;
}
