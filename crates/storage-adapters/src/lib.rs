//! # storage-adapters
//!
//! Implementations of the persistence ports defined in `domains`.

pub mod json_accounts;

pub use json_accounts::JsonAccountStore;
