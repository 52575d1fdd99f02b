//! # Post Ledger
//!
//! Append-only maintenance of a single user's feed. Every successful append
//! puts the new post first and drops any stored sentinel posts.

use domains::{validate_append, Post, User, ValidationError};

/// Validates `candidate` and prepends it to `user.posts`.
///
/// On failure the user is left untouched, including when `post_count` is
/// already at its maximum. `post_count` is bumped by one per
/// successful append even when pruning shortened the list, so it counts
/// appends rather than tracking `posts.len()`.
pub fn append(user: &mut User, candidate: Post) -> Result<(), ValidationError> {
    validate_append(user, &candidate)?;

    let previous = std::mem::take(&mut user.posts);
    let mut posts = Vec::with_capacity(previous.len() + 1);
    posts.push(candidate);
    posts.extend(previous.into_iter().filter(|p| !p.is_sentinel()));

    user.posts = posts;
    user.post_count += 1;
    Ok(())
}
