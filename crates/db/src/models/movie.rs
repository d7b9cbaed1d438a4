//! Movie row model.

use reelshelf_core::movies::Movie;
use reelshelf_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: DbId,
    pub title: String,
    pub publishing_year: i32,
    pub poster: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            publishing_year: row.publishing_year,
            poster_ref: row.poster,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
