//! # hearth_core
//!
//! Core domain logic for Hearth: identities and sessions, the social feed,
//! and neighbour help requests matched to nearby helpers.

pub mod ai;
pub mod assistant;
pub mod auth;
pub mod feed;
pub mod geo;
pub mod help;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
