//! Handlers for the `/movies` resource.
//!
//! Create and update take `multipart/form-data` with the fields `title`,
//! `publishingYear` and `poster`. A `poster` part carrying a file is an
//! upload; a plain text `poster` part is an external image URL.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use reelshelf_core::assets::PosterUpload;
use reelshelf_core::error::CoreError;
use reelshelf_core::movies::{CreateMovie, Movie, MoviePage, PosterSource, UpdateMovie};
use reelshelf_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{Path, Query};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::state::AppState;

/// Fields collected from a movie form. Every field is optional at this
/// stage; create enforces the required ones.
#[derive(Debug, Default)]
struct MovieForm {
    title: Option<String>,
    publishing_year: Option<i32>,
    poster: Option<PosterSource>,
}

/// GET /api/v1/movies?page=&limit=
///
/// The caller's movies, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<MoviePage>> {
    let page = state
        .movies
        .list(auth.owner, params.page, params.limit)
        .await?;
    Ok(Json(page))
}

/// POST /api/v1/movies
///
/// Returns 201 with the created record.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let form = read_movie_form(multipart).await?;

    let input = CreateMovie {
        title: form
            .title
            .ok_or_else(|| CoreError::invalid_field("title", "is required"))?,
        publishing_year: form
            .publishing_year
            .ok_or_else(|| CoreError::invalid_field("publishingYear", "is required"))?,
        poster: form.poster,
    };

    let movie = state.movies.create(input, auth.owner).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET /api/v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Movie>> {
    let movie = state.movies.get(id, auth.owner).await?;
    Ok(Json(movie))
}

/// PATCH /api/v1/movies/{id}
///
/// Only the fields present in the form are changed.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Movie>> {
    let form = read_movie_form(multipart).await?;

    let input = UpdateMovie {
        title: form.title,
        publishing_year: form.publishing_year,
        poster: form.poster,
    };

    let movie = state.movies.update(id, input, auth.owner).await?;
    Ok(Json(movie))
}

/// DELETE /api/v1/movies/{id}
///
/// Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.movies.delete(id, auth.owner).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_movie_form(mut multipart: Multipart) -> AppResult<MovieForm> {
    let mut form = MovieForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "publishingYear" => {
                let raw = field.text().await?;
                form.publishing_year = Some(parse_year(&raw)?);
            }
            "poster" => {
                let file_name = field.file_name().map(str::to_string);
                match file_name {
                    Some(file_name) => {
                        let content_type = field
                            .content_type()
                            .unwrap_or("application/octet-stream")
                            .to_string();
                        let bytes = field.bytes().await?;
                        // Browsers send an empty part when no file was picked.
                        if file_name.is_empty() && bytes.is_empty() {
                            continue;
                        }
                        form.poster = Some(PosterSource::Upload(PosterUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        }));
                    }
                    None => {
                        let url = field.text().await?;
                        if !url.trim().is_empty() {
                            form.poster = Some(PosterSource::External(url.trim().to_string()));
                        }
                    }
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

fn parse_year(raw: &str) -> Result<i32, CoreError> {
    let raw = raw.trim();
    raw.parse().map_err(|_| {
        CoreError::invalid_field("publishingYear", format!("must be an integer, got '{raw}'"))
    })
}
