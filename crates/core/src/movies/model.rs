//! Movie value types shared by the service, the repository port and the
//! transport.

use serde::{Deserialize, Serialize};

use crate::assets::PosterUpload;
use crate::types::{DbId, OwnerId, Timestamp};

/// A persisted movie record.
///
/// Serializes to the wire/persisted shape
/// `{id, title, publishingYear, poster, userId, createdAt, updatedAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub publishing_year: i32,
    /// Opaque reference to the poster asset (`/uploads/<name>.<ext>` or an
    /// absolute URL). `None` means the movie has no poster.
    #[serde(rename = "poster")]
    pub poster_ref: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Movie {
    pub fn owner(&self) -> OwnerId {
        OwnerId(self.user_id)
    }

    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.user_id == owner.get()
    }
}

/// Where a poster for a create/update request comes from.
#[derive(Debug, Clone)]
pub enum PosterSource {
    /// Raw file bytes to be written to the asset store.
    Upload(PosterUpload),
    /// An already-hosted absolute `http(s)` URL, stored as-is.
    External(String),
}

/// Payload for [`MovieService::create`](super::MovieService::create).
#[derive(Debug, Clone)]
pub struct CreateMovie {
    pub title: String,
    pub publishing_year: i32,
    pub poster: Option<PosterSource>,
}

/// Partial payload for [`MovieService::update`](super::MovieService::update).
///
/// Only the mutable fields exist here; owner, id and creation time cannot be
/// expressed.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub publishing_year: Option<i32>,
    pub poster: Option<PosterSource>,
}

/// Row to insert, fully resolved by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub publishing_year: i32,
    pub poster_ref: Option<String>,
    pub owner: OwnerId,
    /// Used for both `created_at` and `updated_at`.
    pub created_at: Timestamp,
}

/// Field changes to apply to an existing row. `None` leaves the column as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub publishing_year: Option<i32>,
    pub poster_ref: Option<String>,
    pub updated_at: Timestamp,
}

/// Pagination envelope returned by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}
