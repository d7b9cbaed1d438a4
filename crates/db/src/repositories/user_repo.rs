//! Repository for the `users` table.

use async_trait::async_trait;
use reelshelf_core::accounts::{normalize_email, NewUserAccount, UserAccount, UserDirectory};
use reelshelf_core::error::CoreError;
use sqlx::PgPool;

use super::to_core_error;
use crate::models::user::UserRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

/// Provides the user queries needed for login and seeding.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation on `uq_users_email` if the email is taken
    /// (compared case-insensitively).
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}

/// [`UserDirectory`] over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, CoreError> {
        UserRepo::find_by_email(&self.pool, &normalize_email(email))
            .await
            .map(|row| row.map(UserAccount::from))
            .map_err(to_core_error)
    }

    async fn create(&self, input: &NewUserAccount) -> Result<UserAccount, CoreError> {
        UserRepo::create(&self.pool, &normalize_email(&input.email), &input.password_hash)
            .await
            .map(UserAccount::from)
            .map_err(to_core_error)
    }
}
