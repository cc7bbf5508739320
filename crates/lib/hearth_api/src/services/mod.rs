//! Business flows composed from `hearth_core` components.

pub mod auth;
pub mod neighbour;
