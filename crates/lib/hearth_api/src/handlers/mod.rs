//! Request handlers.

pub mod assistant;
pub mod auth;
pub mod feed;
pub mod health;
pub mod neighbour;
