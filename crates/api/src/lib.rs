//! Reelshelf API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests, the server binary and the seed binary can all use them.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod seed;
pub mod state;
