//! Seed the database with the default user and the demo catalogue.
//!
//! Settings are described on [`SeedConfig`].

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use reelshelf_core::types::OwnerId;
use reelshelf_db::{PgMovieRepository, PgUserDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelshelf_api::accounts::ensure_default_user;
use reelshelf_api::seed::{seed_demo_movies, seed_movie_service, SeedConfig, DEMO_MOVIES};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelshelf_api=info,reelshelf_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SeedConfig::from_env().map_err(|e| anyhow!(e))?;

    let pool = reelshelf_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    reelshelf_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let users = PgUserDirectory::new(pool.clone());
    let user = ensure_default_user(&users, &config.email, &config.password)
        .await
        .context("Failed to create or find default user")?;

    let movies = seed_movie_service(Arc::new(PgMovieRepository::new(pool)));
    let report = seed_demo_movies(&movies, OwnerId(user.id)).await;
    println!("Seeded {} out of {} movies.", report.created, DEMO_MOVIES.len());

    if report.created == 0 {
        bail!("no movies were seeded");
    }
    Ok(())
}
