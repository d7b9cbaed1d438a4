//! In-process [`MovieRepository`] backed by a `BTreeMap`.
//!
//! Used by tests and by tooling that does not need PostgreSQL. Ids come from
//! a monotonically increasing counter and are never reused.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::movies::model::{Movie, MovieChanges, NewMovie};
use crate::movies::repository::MovieRepository;
use crate::types::{DbId, OwnerId};

#[derive(Debug)]
pub struct InMemoryMovieRepository {
    rows: RwLock<BTreeMap<DbId, Movie>>,
    next_id: AtomicI64,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored rows across all owners.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for InMemoryMovieRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn insert(&self, input: &NewMovie) -> Result<Movie, CoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let movie = Movie {
            id,
            title: input.title.clone(),
            publishing_year: input.publishing_year,
            poster_ref: input.poster_ref.clone(),
            user_id: input.owner.get(),
            created_at: input.created_at,
            updated_at: input.created_at,
        };
        self.rows.write().await.insert(id, movie.clone());
        Ok(movie)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, CoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, CoreError> {
        let rows = self.rows.read().await;
        let mut owned: Vec<&Movie> = rows.values().filter(|m| m.is_owned_by(owner)).collect();
        owned.sort_by_key(|m| (Reverse(m.created_at), Reverse(m.id)));

        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(owned.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count_by_owner(&self, owner: OwnerId) -> Result<i64, CoreError> {
        let rows = self.rows.read().await;
        let count = rows.values().filter(|m| m.is_owned_by(owner)).count();
        i64::try_from(count).map_err(|e| CoreError::Repository(e.to_string()))
    }

    async fn update(
        &self,
        id: DbId,
        owner: OwnerId,
        changes: &MovieChanges,
    ) -> Result<Option<Movie>, CoreError> {
        let mut rows = self.rows.write().await;
        let Some(movie) = rows.get_mut(&id).filter(|m| m.is_owned_by(owner)) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            movie.title = title.clone();
        }
        if let Some(year) = changes.publishing_year {
            movie.publishing_year = year;
        }
        if let Some(poster_ref) = &changes.poster_ref {
            movie.poster_ref = Some(poster_ref.clone());
        }
        movie.updated_at = changes.updated_at;
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: DbId, owner: OwnerId) -> Result<bool, CoreError> {
        let mut rows = self.rows.write().await;
        match rows.get(&id) {
            Some(movie) if movie.is_owned_by(owner) => {
                rows.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
