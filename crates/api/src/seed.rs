//! Demo catalogue used by the `reelshelf-seed` binary.

use std::sync::Arc;

use reelshelf_core::assets::MemoryAssetStore;
use reelshelf_core::movies::{CreateMovie, MovieRepository, MovieService, PosterSource};
use reelshelf_core::types::OwnerId;

/// Account the catalogue is created for when `DEFAULT_USER_EMAIL` is unset.
pub const DEFAULT_SEED_EMAIL: &str = "user@example.com";

/// Placeholder image used as every demo film's poster.
pub const DEMO_POSTER_URL: &str = "https://picsum.photos/450/500";

/// `(title, publishing year)` of each demo film.
pub const DEMO_MOVIES: &[(&str, i32)] = &[
    ("The Matrix", 1999),
    ("Inception", 2010),
    ("The Dark Knight", 2008),
    ("Pulp Fiction", 1994),
    ("The Shawshank Redemption", 1994),
    ("Forrest Gump", 1994),
    ("The Godfather", 1972),
    ("Interstellar", 2014),
    ("The Lord of the Rings: The Fellowship of the Ring", 2001),
    ("Fight Club", 1999),
    ("The Avengers", 2012),
    ("Titanic", 1997),
    ("Avatar", 2009),
    ("The Lion King", 1994),
    ("Gladiator", 2000),
    ("The Departed", 2006),
    ("The Prestige", 2006),
    ("Django Unchained", 2012),
    ("The Revenant", 2015),
    ("Mad Max: Fury Road", 2015),
    ("Blade Runner 2049", 2017),
    ("Parasite", 2019),
    ("Joker", 2019),
    ("Dune", 2021),
    ("Everything Everywhere All at Once", 2022),
];

/// Settings of the `reelshelf-seed` binary.
///
/// | Env var                 | Default            |
/// |-------------------------|--------------------|
/// | `DATABASE_URL`          | required           |
/// | `DEFAULT_USER_EMAIL`    | `user@example.com` |
/// | `DEFAULT_USER_PASSWORD` | required           |
#[derive(Clone)]
pub struct SeedConfig {
    pub database_url: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl SeedConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Names the first missing
    /// required variable on failure.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let required = |key: &str| lookup(key).ok_or_else(|| format!("{key} must be set"));
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            email: lookup("DEFAULT_USER_EMAIL").unwrap_or_else(|| DEFAULT_SEED_EMAIL.to_string()),
            password: required("DEFAULT_USER_PASSWORD")?,
        })
    }
}

/// Movie service for seeding. Demo posters are external URLs, so no file
/// ever reaches the asset store.
pub fn seed_movie_service(repo: Arc<dyn MovieRepository>) -> MovieService {
    MovieService::new(repo, Arc::new(MemoryAssetStore::new()))
}

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub failed: Vec<String>,
}

/// Create every demo film for `owner`. A failing film is logged and
/// recorded; the rest are still attempted.
pub async fn seed_demo_movies(movies: &MovieService, owner: OwnerId) -> SeedReport {
    let mut report = SeedReport::default();

    for &(title, year) in DEMO_MOVIES {
        let input = CreateMovie {
            title: title.to_string(),
            publishing_year: year,
            poster: Some(PosterSource::External(DEMO_POSTER_URL.to_string())),
        };
        match movies.create(input, owner).await {
            Ok(movie) => {
                tracing::info!(movie_id = movie.id, title, "Seeded movie");
                report.created += 1;
            }
            Err(e) => {
                tracing::error!(title, error = %e, "Failed to seed movie");
                report.failed.push(title.to_string());
            }
        }
    }

    tracing::info!(
        created = report.created,
        total = DEMO_MOVIES.len(),
        "Seeding finished"
    );
    report
}
