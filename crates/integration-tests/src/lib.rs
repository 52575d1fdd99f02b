//! Shared fixtures for the end-to-end tests: a real account directory on disk
//! behind a real `UserDirectory`.

use std::path::Path;
use std::sync::Arc;

use domains::{Post, User};
use services::UserDirectory;
use storage_adapters::JsonAccountStore;

/// Opens the accounts under `dir` the way the binary does at startup.
pub async fn open_directory(dir: &Path) -> Arc<UserDirectory> {
    let store = JsonAccountStore::open(dir).await.expect("open account store");
    let directory = UserDirectory::open(Arc::new(store))
        .await
        .expect("load accounts");
    Arc::new(directory)
}

/// Writes `user` straight to `dir` as a stored account file.
pub fn write_account(dir: &Path, user: &User) {
    std::fs::create_dir_all(dir).expect("create accounts dir");
    let data = serde_json::to_vec(user).expect("encode user");
    std::fs::write(dir.join(format!("{}.txt", user.username)), data).expect("write account");
}

/// A user with `titles.len()` posts, newest first.
pub fn user_with_posts(username: &str, id: u64, titles: &[&str]) -> User {
    let mut user = User::new(username, "secret1", id);
    user.posts = titles
        .iter()
        .map(|t| Post::new(*t, "body", "01.02.2024 10:11:12"))
        .collect();
    user.post_count = titles.len() as u64;
    user
}
