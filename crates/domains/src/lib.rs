//! microblog/crates/domains/src/lib.rs
//!
//! The central domain types, rules and port definitions for microblog.

pub mod error;
pub mod models;
pub mod ports;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
pub use validation::*;
