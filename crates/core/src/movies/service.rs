//! Owner-scoped movie CRUD.
//!
//! [`MovieService`] is the only component that decides who may see or change
//! a movie. It validates payloads, resolves ownership, orchestrates poster
//! writes through the [`AssetStore`] and computes pagination metadata. The
//! caller identity arrives as an already-verified [`OwnerId`].

use std::sync::Arc;

use crate::assets::{AssetStore, PosterCleanup};
use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::movies::model::{
    CreateMovie, Movie, MovieChanges, MoviePage, NewMovie, PosterSource, UpdateMovie,
};
use crate::movies::pagination::{total_pages, PageRequest};
use crate::movies::repository::MovieRepository;
use crate::movies::validation::{
    validate_external_poster, validate_publishing_year, validate_title,
};
use crate::types::{DbId, OwnerId};

const ENTITY: &str = "Movie";

/// A poster reference produced for the current request.
struct ResolvedPoster {
    poster_ref: String,
    /// `true` when this request wrote the file, i.e. it is ours to clean up.
    written: bool,
}

#[derive(Clone)]
pub struct MovieService {
    repo: Arc<dyn MovieRepository>,
    assets: Arc<dyn AssetStore>,
    clock: Arc<dyn Clock>,
    cleanup: PosterCleanup,
}

impl MovieService {
    /// Service with the system clock and the `Retain` cleanup policy.
    pub fn new(repo: Arc<dyn MovieRepository>, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            repo,
            assets,
            clock: Arc::new(SystemClock),
            cleanup: PosterCleanup::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cleanup(mut self, cleanup: PosterCleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Create a movie owned by `owner`.
    ///
    /// Fields are validated before anything is written. A poster upload is
    /// stored first; if that fails no record is inserted.
    pub async fn create(&self, input: CreateMovie, owner: OwnerId) -> Result<Movie, CoreError> {
        validate_title(&input.title)?;
        validate_publishing_year(input.publishing_year, self.clock.current_year())?;
        check_poster_source(input.poster.as_ref())?;

        let poster = self.resolve_poster(input.poster).await?;

        let new_movie = NewMovie {
            title: input.title,
            publishing_year: input.publishing_year,
            poster_ref: poster.as_ref().map(|p| p.poster_ref.clone()),
            owner,
            created_at: self.clock.now(),
        };

        match self.repo.insert(&new_movie).await {
            Ok(movie) => {
                tracing::info!(movie_id = movie.id, user_id = owner.get(), "Movie created");
                Ok(movie)
            }
            Err(err) => {
                if let Some(poster) = poster.filter(|p| p.written) {
                    self.release_poster(&poster.poster_ref, "insert failed").await;
                }
                Err(err)
            }
        }
    }

    /// One page of the owner's movies, newest first.
    pub async fn list(
        &self,
        owner: OwnerId,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<MoviePage, CoreError> {
        let window = PageRequest::new(page, limit);
        let total = self.repo.count_by_owner(owner).await?;
        let movies = self
            .repo
            .list_by_owner(owner, window.offset(), window.limit)
            .await?;

        Ok(MoviePage {
            movies,
            total,
            page: window.page,
            total_pages: total_pages(total, window.limit),
        })
    }

    /// Fetch a single movie.
    ///
    /// `NotFound` if no movie has this id, `Forbidden` if it belongs to
    /// someone else.
    pub async fn get(&self, id: DbId, owner: OwnerId) -> Result<Movie, CoreError> {
        self.find_and_authorize(id, owner, "view").await
    }

    /// Apply a partial update. Errors as for [`MovieService::get`].
    ///
    /// Ownership is resolved before the payload is looked at, so a caller
    /// that does not own the movie gets `NotFound`/`Forbidden` whatever it
    /// sent. A new poster replaces the reference; the superseded file is only
    /// removed under [`PosterCleanup::Purge`].
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateMovie,
        owner: OwnerId,
    ) -> Result<Movie, CoreError> {
        let existing = self.find_and_authorize(id, owner, "update").await?;

        if let Some(title) = &input.title {
            validate_title(title)?;
        }
        if let Some(year) = input.publishing_year {
            validate_publishing_year(year, self.clock.current_year())?;
        }
        check_poster_source(input.poster.as_ref())?;

        let poster = self.resolve_poster(input.poster).await?;
        let changes = MovieChanges {
            title: input.title,
            publishing_year: input.publishing_year,
            poster_ref: poster.as_ref().map(|p| p.poster_ref.clone()),
            updated_at: self.clock.now(),
        };

        // `None` here means the row vanished after the ownership check.
        let outcome = self
            .repo
            .update(id, owner, &changes)
            .await
            .and_then(|row| row.ok_or(CoreError::NotFound { entity: ENTITY, id }));
        let updated = match outcome {
            Ok(movie) => movie,
            Err(err) => {
                if let Some(poster) = poster.as_ref().filter(|p| p.written) {
                    self.release_poster(&poster.poster_ref, "update failed").await;
                }
                return Err(err);
            }
        };

        if poster.is_some() {
            if let Some(old) = existing
                .poster_ref
                .filter(|old| updated.poster_ref.as_ref() != Some(old))
            {
                self.release_poster(&old, "superseded").await;
            }
        }

        tracing::info!(movie_id = id, user_id = owner.get(), "Movie updated");
        Ok(updated)
    }

    /// Delete a movie. Errors as for [`MovieService::get`].
    pub async fn delete(&self, id: DbId, owner: OwnerId) -> Result<(), CoreError> {
        let existing = self.find_and_authorize(id, owner, "delete").await?;

        if !self.repo.delete(id, owner).await? {
            return Err(CoreError::NotFound { entity: ENTITY, id });
        }

        if let Some(poster_ref) = existing.poster_ref {
            self.release_poster(&poster_ref, "movie deleted").await;
        }

        tracing::info!(movie_id = id, user_id = owner.get(), "Movie deleted");
        Ok(())
    }

    /// Look the movie up by id alone, then check the owner.
    async fn find_and_authorize(
        &self,
        id: DbId,
        owner: OwnerId,
        action: &str,
    ) -> Result<Movie, CoreError> {
        let movie = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;

        if !movie.is_owned_by(owner) {
            return Err(CoreError::Forbidden(format!(
                "Cannot {action} another user's movie"
            )));
        }

        Ok(movie)
    }

    async fn resolve_poster(
        &self,
        source: Option<PosterSource>,
    ) -> Result<Option<ResolvedPoster>, CoreError> {
        match source {
            None => Ok(None),
            Some(PosterSource::External(url)) => Ok(Some(ResolvedPoster {
                poster_ref: url,
                written: false,
            })),
            Some(PosterSource::Upload(upload)) => {
                let poster_ref = self.assets.store(upload).await?;
                Ok(Some(ResolvedPoster {
                    poster_ref,
                    written: true,
                }))
            }
        }
    }

    /// Drop a poster nothing points at any more, if the policy says so.
    /// Failures are logged and swallowed; the record write already happened.
    async fn release_poster(&self, poster_ref: &str, reason: &str) {
        if self.cleanup == PosterCleanup::Retain {
            return;
        }
        match self.assets.remove(poster_ref).await {
            Ok(removed) => {
                tracing::debug!(poster = %poster_ref, removed, reason, "Released poster");
            }
            Err(e) => {
                tracing::warn!(poster = %poster_ref, reason, error = %e, "Failed to release poster");
            }
        }
    }
}

fn check_poster_source(source: Option<&PosterSource>) -> Result<(), CoreError> {
    match source {
        Some(PosterSource::External(url)) => validate_external_poster(url),
        _ => Ok(()),
    }
}
