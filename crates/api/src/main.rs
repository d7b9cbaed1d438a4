use std::net::SocketAddr;
use std::sync::Arc;

use reelshelf_core::accounts::UserDirectory;
use reelshelf_core::assets::LocalAssetStore;
use reelshelf_core::movies::MovieService;
use reelshelf_db::{PgMovieRepository, PgUserDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelshelf_api::accounts::ensure_default_user;
use reelshelf_api::config::ServerConfig;
use reelshelf_api::router::build_app_router;
use reelshelf_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelshelf_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = reelshelf_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    reelshelf_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    reelshelf_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Services ---
    let assets = Arc::new(LocalAssetStore::new(
        config.upload_dir.clone(),
        config.upload_public_prefix.clone(),
    ));
    tokio::fs::create_dir_all(assets.root())
        .await
        .expect("Failed to create upload directory");
    tracing::info!(
        dir = %assets.root().display(),
        prefix = %assets.public_prefix(),
        cleanup = ?config.poster_cleanup,
        "Poster store ready"
    );

    let movies = MovieService::new(Arc::new(PgMovieRepository::new(pool.clone())), assets)
        .with_cleanup(config.poster_cleanup);
    let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool));

    // --- Default account ---
    if let Some(default_user) = &config.default_user {
        ensure_default_user(users.as_ref(), &default_user.email, &default_user.password)
            .await
            .expect("Failed to seed default user");
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        movies: Arc::new(movies),
        users,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
