//! Domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! structs in `hearth_api` (which carry `#[serde(rename_all = "camelCase")]`).

pub mod auth;
pub mod feed;
pub mod geo;
pub mod help;
