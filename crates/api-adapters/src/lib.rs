//! # api-adapters
//!
//! The HTTP surface of microblog. Routing, cookie transport and page
//! rendering live here; every decision about users and posts is delegated to
//! `services`.

pub mod templates;

#[cfg(feature = "web-axum")]
pub mod web;
