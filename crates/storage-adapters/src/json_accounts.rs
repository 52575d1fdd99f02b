//! # JSON account files
//!
//! Filesystem implementation of `AccountStore`: one `<username>.txt` file per
//! user holding the JSON encoding of the account. Saves overwrite the whole
//! file; there is no partial-write protection, so a crash mid-write can only
//! damage that one user's file. A file whose name differs from the username
//! it holds is skipped on load.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domains::{validate_user, AccountStore, StorageError, User};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Extension of every account file.
pub const ACCOUNT_FILE_EXTENSION: &str = "txt";

pub struct JsonAccountStore {
    /// Accounts directory (e.g., "./data/accounts")
    root_path: PathBuf,
}

impl JsonAccountStore {
    /// Opens the accounts directory, creating it when missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root_path = root.into();
        fs::create_dir_all(&root_path)
            .await
            .map_err(|source| StorageError::Io {
                path: root_path.clone(),
                source,
            })?;
        Ok(Self { root_path })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Path of the file holding `username`'s account.
    pub fn account_path(&self, username: &str) -> PathBuf {
        self.root_path
            .join(format!("{username}.{ACCOUNT_FILE_EXTENSION}"))
    }

    async fn read_account(path: &Path) -> Result<User, StorageError> {
        let data = fs::read(path).await.map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let user: User = serde_json::from_slice(&data).map_err(|source| StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        validate_user(&user).map_err(|source| StorageError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        // Saves always target `<username>.txt`.
        if path.file_stem() != Some(OsStr::new(&user.username)) {
            return Err(StorageError::Misplaced {
                path: path.to_path_buf(),
                username: user.username,
            });
        }
        Ok(user)
    }
}

#[async_trait]
impl AccountStore for JsonAccountStore {
    /// Reads every regular file in the accounts directory.
    ///
    /// A file that cannot be read, parsed or validated is logged and skipped;
    /// the rest still load.
    async fn load_all(&self) -> Result<Vec<User>, StorageError> {
        let dir_error = |source| StorageError::Io {
            path: self.root_path.clone(),
            source,
        };
        let mut entries = fs::read_dir(&self.root_path).await.map_err(dir_error)?;

        let mut users = Vec::new();
        let mut skipped = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
            let path = entry.path();
            match entry.file_type().await {
                Ok(kind) if kind.is_file() => {}
                Ok(_) => continue,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot stat account entry");
                    skipped += 1;
                    continue;
                }
            }

            match Self::read_account(&path).await {
                Ok(user) => users.push(user),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping account file");
                    skipped += 1;
                }
            }
        }

        info!(
            dir = %self.root_path.display(),
            loaded = users.len(),
            skipped,
            "accounts loaded"
        );
        Ok(users)
    }

    /// Serializes `user` and overwrites its account file.
    async fn save(&self, user: &User) -> Result<(), StorageError> {
        let path = self.account_path(&user.username);

        // The username becomes a file name, so it has to pass the same
        // rules a loaded account does.
        validate_user(user).map_err(|source| StorageError::Invalid {
            path: path.clone(),
            source,
        })?;

        let data = serde_json::to_vec(user).map_err(|source| StorageError::Malformed {
            path: path.clone(),
            source,
        })?;
        write_private(&path, &data)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(
            username = %user.username,
            posts = user.posts.len(),
            bytes = data.len(),
            "account file written"
        );
        Ok(())
    }
}

/// Truncating write, readable by the owner only on unix.
async fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::Post;
    use tempfile::TempDir;

    async fn store() -> (TempDir, JsonAccountStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonAccountStore::open(dir.path().join("accounts")).await.unwrap();
        (dir, store)
    }

    fn alice() -> User {
        let mut user = User::new("alice", "secret1", 1);
        user.posts = vec![
            Post::new("second", "more words", "01.03.2024 08:00:00"),
            Post::new("first", "hello there", "01.02.2024 10:11:12"),
        ];
        user.post_count = 2;
        user
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let (_dir, store) = store().await;
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_dir, store) = store().await;
        store.save(&alice()).await.unwrap();

        assert!(store.account_path("alice").is_file());
        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, vec![alice()]);
    }

    #[tokio::test]
    async fn save_overwrites_previous_contents() {
        let (_dir, store) = store().await;
        store.save(&alice()).await.unwrap();

        let fresh = User::new("alice", "secret1", 1);
        store.save(&fresh).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), vec![fresh]);
    }

    #[tokio::test]
    async fn save_rejects_unsafe_username() {
        let (_dir, store) = store().await;
        let err = store
            .save(&User::new("../evil", "secret1", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Invalid { .. }));
    }

    #[tokio::test]
    async fn bad_files_are_skipped_not_fatal() {
        let (_dir, store) = store().await;
        store.save(&alice()).await.unwrap();

        let root = store.root();
        std::fs::write(root.join("broken.txt"), b"{not json").unwrap();
        std::fs::write(
            root.join("x.txt"),
            br#"{"Username":"x","Password":"secret1","ID":2,"PostCount":0,"Posts":[]}"#,
        )
        .unwrap();
        std::fs::create_dir(root.join("nested")).unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].username, "alice");
    }

    #[tokio::test]
    async fn file_named_after_another_user_is_skipped() {
        let (_dir, store) = store().await;
        let path = store.account_path("bob");
        std::fs::write(
            &path,
            br#"{"Username":"alice","Password":"secret1","ID":1,"PostCount":0,"Posts":[]}"#,
        )
        .unwrap();

        assert!(store.load_all().await.unwrap().is_empty());
        assert!(matches!(
            JsonAccountStore::read_account(&path).await,
            Err(StorageError::Misplaced { username, .. }) if username == "alice"
        ));
    }

    #[tokio::test]
    async fn loads_files_with_null_posts() {
        let (_dir, store) = store().await;
        std::fs::write(
            store.account_path("bob"),
            br#"{"Username":"bob","Password":"hunter22","ID":4,"PostCount":0,"Posts":null}"#,
        )
        .unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, vec![User::new("bob", "hunter22", 4)]);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let (_dir, store) = store().await;
        std::fs::remove_dir(store.root()).unwrap();

        assert!(matches!(
            store.load_all().await,
            Err(StorageError::Io { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn account_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = store().await;
        store.save(&alice()).await.unwrap();
        let mode = std::fs::metadata(store.account_path("alice"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
