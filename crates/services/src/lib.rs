//! microblog/crates/services/src/lib.rs
//!
//! Use-cases over the domain: the user directory, the post ledger and login
//! classification.

pub mod auth;
pub mod directory;
pub mod ledger;

pub use auth::AuthResolver;
pub use directory::UserDirectory;
