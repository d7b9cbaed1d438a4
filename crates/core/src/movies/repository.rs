//! Record repository port.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::movies::model::{Movie, MovieChanges, NewMovie};
use crate::types::{DbId, OwnerId};

/// Durable storage of movie records.
///
/// The repository owns record lifetime; callers hold only ids. Mutations are
/// always scoped by both `id` and owner so a write can never land on another
/// user's row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert a new row, returning it with its generated id.
    async fn insert(&self, input: &NewMovie) -> Result<Movie, CoreError>;

    /// Look a record up by id alone, regardless of owner.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, CoreError>;

    /// The owner's records ordered by `created_at DESC, id DESC`.
    async fn list_by_owner(
        &self,
        owner: OwnerId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, CoreError>;

    /// Total number of records belonging to `owner`.
    async fn count_by_owner(&self, owner: OwnerId) -> Result<i64, CoreError>;

    /// Apply `changes` to the row matching both `id` and `owner`.
    ///
    /// Returns `None` if no such row exists.
    async fn update(
        &self,
        id: DbId,
        owner: OwnerId,
        changes: &MovieChanges,
    ) -> Result<Option<Movie>, CoreError>;

    /// Remove the row matching both `id` and `owner`. Returns `true` if a row
    /// was removed.
    async fn delete(&self, id: DbId, owner: OwnerId) -> Result<bool, CoreError>;
}
