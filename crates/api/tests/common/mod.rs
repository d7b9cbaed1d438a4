#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reelshelf_core::accounts::{InMemoryUserDirectory, UserDirectory};
use reelshelf_core::assets::{LocalAssetStore, PosterCleanup};
use reelshelf_core::movies::{InMemoryMovieRepository, MovieService};
use reelshelf_core::types::DbId;
use tempfile::TempDir;
use tower::ServiceExt;

use reelshelf_api::auth::jwt::{generate_access_token, JwtConfig};
use reelshelf_api::config::ServerConfig;
use reelshelf_api::router::build_app_router;
use reelshelf_api::state::AppState;

pub const BOUNDARY: &str = "reelshelf-test-boundary";

/// A running application over in-memory adapters and a temporary upload
/// directory. Keep it alive for the duration of the test.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub repo: Arc<InMemoryMovieRepository>,
    pub users: Arc<InMemoryUserDirectory>,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// A fresh clone of the router for a single `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Mint a bearer token for `user_id` without going through login.
    pub fn token_for(&self, user_id: DbId) -> String {
        generate_access_token(user_id, &self.config.jwt).expect("token generation should succeed")
    }

    pub fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.path().to_path_buf(),
        upload_public_prefix: "/uploads".to_string(),
        max_upload_bytes: 64 * 1024,
        poster_cleanup: PosterCleanup::Retain,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        default_user: None,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over in-memory adapters.
pub fn build_test_app() -> TestApp {
    build_test_app_with(PosterCleanup::Retain)
}

pub fn build_test_app_with(cleanup: PosterCleanup) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("create temp upload dir");
    let mut config = test_config(&upload_dir);
    config.poster_cleanup = cleanup;

    let repo = Arc::new(InMemoryMovieRepository::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let assets = Arc::new(LocalAssetStore::new(
        config.upload_dir.clone(),
        config.upload_public_prefix.clone(),
    ));
    let movies = MovieService::new(repo.clone(), assets).with_cleanup(cleanup);

    let state = AppState {
        config: Arc::new(config.clone()),
        movies: Arc::new(movies),
        users: users.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        repo,
        users,
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// One part of a `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A tiny payload with a PNG signature; the store does not decode images.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

pub fn png_part(bytes: &[u8]) -> Part<'_> {
    Part::File {
        name: "poster",
        file_name: "poster.png",
        content_type: "image/png",
        bytes,
    }
}
