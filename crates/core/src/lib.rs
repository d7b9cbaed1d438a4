//! Domain core for Reelshelf: owner-scoped movie records, poster assets and
//! the ports the persistence and transport layers plug into.
//!
//! This crate has no knowledge of HTTP or SQL.

pub mod accounts;
pub mod assets;
pub mod clock;
pub mod error;
pub mod movies;
pub mod types;
