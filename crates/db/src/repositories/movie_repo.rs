//! Repository for the `movies` table.

use async_trait::async_trait;
use reelshelf_core::error::CoreError;
use reelshelf_core::movies::{Movie, MovieChanges, MovieRepository, NewMovie};
use reelshelf_core::types::{DbId, OwnerId};
use sqlx::PgPool;

use super::to_core_error;
use crate::models::movie::MovieRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, publishing_year, poster, user_id, created_at, updated_at";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the created row. `updated_at` starts
    /// equal to `created_at`.
    pub async fn create(pool: &PgPool, input: &NewMovie) -> Result<MovieRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, publishing_year, poster, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(&input.title)
            .bind(input.publishing_year)
            .bind(&input.poster_ref)
            .bind(input.owner.get())
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a movie by ID, whoever owns it.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MovieRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of a user's movies, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MovieRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Update a movie. Only non-`None` fields in `input` are applied;
    /// `updated_at` is always set.
    ///
    /// Returns `None` if no row with the given `id` belongs to `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &MovieChanges,
    ) -> Result<Option<MovieRow>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = COALESCE($3, title),
                publishing_year = COALESCE($4, publishing_year),
                poster = COALESCE($5, poster),
                updated_at = $6
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(input.publishing_year)
            .bind(&input.poster_ref)
            .bind(input.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a movie. Returns `true` if a row owned by `user_id` was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// [`MovieRepository`] over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn insert(&self, input: &NewMovie) -> Result<Movie, CoreError> {
        MovieRepo::create(&self.pool, input)
            .await
            .map(Movie::from)
            .map_err(to_core_error)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, CoreError> {
        MovieRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(Movie::from))
            .map_err(to_core_error)
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, CoreError> {
        let rows = MovieRepo::list_by_user(&self.pool, owner.get(), offset, limit)
            .await
            .map_err(to_core_error)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn count_by_owner(&self, owner: OwnerId) -> Result<i64, CoreError> {
        MovieRepo::count_by_user(&self.pool, owner.get())
            .await
            .map_err(to_core_error)
    }

    async fn update(
        &self,
        id: DbId,
        owner: OwnerId,
        changes: &MovieChanges,
    ) -> Result<Option<Movie>, CoreError> {
        MovieRepo::update(&self.pool, id, owner.get(), changes)
            .await
            .map(|row| row.map(Movie::from))
            .map_err(to_core_error)
    }

    async fn delete(&self, id: DbId, owner: OwnerId) -> Result<bool, CoreError> {
        MovieRepo::delete(&self.pool, id, owner.get())
            .await
            .map_err(to_core_error)
    }
}
