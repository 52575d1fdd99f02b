//! # Errors
//!
//! Centralized error handling for microblog. Validation and duplicate
//! registrations are recoverable and routed back to the caller; storage
//! failures carry the path of the account file involved.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// The primary error type for directory and ledger operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A field failed its length/charset rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Registration target already exists.
    #[error("username `{0}` is already taken")]
    DuplicateUsername(String),

    /// No user with that username is known to the directory.
    #[error("user `{0}` not found")]
    UnknownUser(String),

    /// Reading or writing an account file failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the persistence gateway.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed account file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but the account it holds breaks a field rule.
    #[error("account file {} failed validation: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    /// The file name does not match the username stored inside it.
    #[error("account file {} holds user `{username}`", .path.display())]
    Misplaced { path: PathBuf, username: String },
}

/// A specialized Result type for microblog logic.
pub type Result<T> = std::result::Result<T, DomainError>;
