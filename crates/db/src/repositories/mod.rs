//! Repository layer: one zero-sized `*Repo` per table with `&PgPool`-first
//! query functions, plus the adapters that expose them through the core
//! ports.

pub mod movie_repo;
pub mod user_repo;

pub use movie_repo::{MovieRepo, PgMovieRepository};
pub use user_repo::{PgUserDirectory, UserRepo};

use reelshelf_core::error::CoreError;

/// Translate a driver error into the core error space.
///
/// Unique violations on `uq_` constraints become `Conflict`; everything else
/// is an opaque repository failure.
pub(crate) fn to_core_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                return CoreError::Conflict(format!("Duplicate value violates {constraint}"));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Repository(err.to_string())
}
