//! HTTP-level integration tests for the `/movies` resource.
//!
//! Covers authentication, multipart create/update, owner scoping,
//! pagination, poster serving and error bodies.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_bytes, body_json, delete_auth, get, get_auth, png_part, send_multipart, Part,
    PNG_BYTES,
};
use reelshelf_core::assets::PosterCleanup;

const ALICE: i64 = 1;
const BOB: i64 = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a movie over HTTP and return its JSON body.
async fn create_movie(
    app: &common::TestApp,
    token: &str,
    title: &str,
    year: &str,
    with_poster: bool,
) -> serde_json::Value {
    let mut parts = vec![Part::Text("title", title), Part::Text("publishingYear", year)];
    if with_poster {
        parts.push(png_part(PNG_BYTES));
    }
    let response = send_multipart(app.app(), Method::POST, "/api/v1/movies", token, &parts).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = build();

    let response = get(app.app(), "/api/v1/movies").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = get(app.app(), "/api/v1/movies/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let app = build();
    let response = get_auth(app.app(), "/api/v1/movies", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_with_poster_returns_record_and_serves_file() {
    let app = build();
    let token = app.token_for(ALICE);

    let json = create_movie(&app, &token, "The Matrix", "1999", true).await;

    assert!(json["id"].is_number());
    assert_eq!(json["title"], "The Matrix");
    assert_eq!(json["publishingYear"], 1999);
    assert_eq!(json["userId"], ALICE);
    assert!(json["createdAt"].is_string());
    assert_eq!(json["createdAt"], json["updatedAt"]);

    let poster = json["poster"].as_str().expect("poster ref");
    assert!(poster.starts_with("/uploads/"));
    assert!(poster.ends_with(".png"));

    let response = get(app.app(), poster).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, PNG_BYTES);
}

#[tokio::test]
async fn create_without_poster_has_null_poster() {
    let app = build();
    let json = create_movie(&app, &app.token_for(ALICE), "Heat", "1995", false).await;
    assert!(json["poster"].is_null());
}

#[tokio::test]
async fn create_accepts_external_poster_url() {
    let app = build();
    let parts = [
        Part::Text("title", "Dune"),
        Part::Text("publishingYear", "2021"),
        Part::Text("poster", "https://picsum.photos/450/500"),
    ];
    let response = send_multipart(
        app.app(),
        Method::POST,
        "/api/v1/movies",
        &app.token_for(ALICE),
        &parts,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["poster"], "https://picsum.photos/450/500");
}

#[tokio::test]
async fn create_requires_title() {
    let app = build();
    let parts = [Part::Text("publishingYear", "1999")];
    let response = send_multipart(
        app.app(),
        Method::POST,
        "/api/v1/movies",
        &app.token_for(ALICE),
        &parts,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "title");
}

#[tokio::test]
async fn create_rejects_out_of_range_year() {
    let app = build();
    let token = app.token_for(ALICE);

    for year in ["1887", "abc"] {
        let parts = [Part::Text("title", "Too early"), Part::Text("publishingYear", year)];
        let response =
            send_multipart(app.app(), Method::POST, "/api/v1/movies", &token, &parts).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "year {year}");
        let json = body_json(response).await;
        assert_eq!(json["field"], "publishingYear");
    }

    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn create_rejects_text_plain_poster_without_writing() {
    let app = build();
    let parts = [
        Part::Text("title", "Notes"),
        Part::Text("publishingYear", "2000"),
        Part::File {
            name: "poster",
            file_name: "notes.txt",
            content_type: "text/plain",
            bytes: b"hello",
        },
    ];
    let response = send_multipart(
        app.app(),
        Method::POST,
        "/api/v1/movies",
        &app.token_for(ALICE),
        &parts,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "poster");

    assert!(app.repo.is_empty().await);
    let written = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(written, 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = build();
    let big = vec![0u8; app.config.max_upload_bytes * 2];
    let parts = [
        Part::Text("title", "Huge"),
        Part::Text("publishingYear", "2000"),
        png_part(&big),
    ];
    let response = send_multipart(
        app.app(),
        Method::POST,
        "/api/v1/movies",
        &app.token_for(ALICE),
        &parts,
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.repo.is_empty().await);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_paginates_newest_first() {
    let app = build();
    let token = app.token_for(ALICE);

    let mut ids = Vec::new();
    for n in 0..10 {
        let json = create_movie(&app, &token, &format!("Film {n}"), "2001", false).await;
        ids.push(json["id"].as_i64().unwrap());
    }
    create_movie(&app, &app.token_for(BOB), "Bob's film", "2001", false).await;
    ids.reverse();

    let response = get_auth(app.app(), "/api/v1/movies?page=1&limit=8", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 10);
    assert_eq!(json["page"], 1);
    assert_eq!(json["totalPages"], 2);
    let first: Vec<i64> = json["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(first, ids[..8]);

    let json = body_json(get_auth(app.app(), "/api/v1/movies?page=2&limit=8", &token).await).await;
    assert_eq!(json["page"], 2);
    assert_eq!(json["movies"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_defaults_and_empty_collection() {
    let app = build();
    let json = body_json(get_auth(app.app(), "/api/v1/movies", &app.token_for(ALICE)).await).await;

    assert_eq!(json["movies"], serde_json::json!([]));
    assert_eq!(json["total"], 0);
    assert_eq!(json["page"], 1);
    assert_eq!(json["totalPages"], 0);
}

// ---------------------------------------------------------------------------
// Get / update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn other_owner_is_forbidden_and_missing_is_not_found() {
    let app = build();
    let created = create_movie(&app, &app.token_for(ALICE), "Private", "2000", false).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let response = get_auth(app.app(), &uri, &app.token_for(BOB)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let parts = [Part::Text("title", "Hijacked")];
    let response =
        send_multipart(app.app(), Method::PATCH, &uri, &app.token_for(BOB), &parts).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.app(), &uri, &app.token_for(BOB)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.app(), "/api/v1/movies/9999", &app.token_for(ALICE)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let json = body_json(get_auth(app.app(), &uri, &app.token_for(ALICE)).await).await;
    assert_eq!(json["title"], "Private");
}

#[tokio::test]
async fn patch_title_only_keeps_other_fields() {
    let app = build();
    let token = app.token_for(ALICE);
    let created = create_movie(&app, &token, "Old", "1999", true).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let parts = [Part::Text("title", "New")];
    let response = send_multipart(app.app(), Method::PATCH, &uri, &token, &parts).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "New");
    assert_eq!(json["publishingYear"], 1999);
    assert_eq!(json["poster"], created["poster"]);
    assert_eq!(json["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn patch_with_new_poster_replaces_reference() {
    let app = build();
    let token = app.token_for(ALICE);
    let created = create_movie(&app, &token, "Alien", "1979", true).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let parts = [png_part(b"\x89PNGsecond")];
    let json = body_json(send_multipart(app.app(), Method::PATCH, &uri, &token, &parts).await).await;

    assert_ne!(json["poster"], created["poster"]);
    let response = get(app.app(), json["poster"].as_str().unwrap()).await;
    assert_eq!(body_bytes(response).await, b"\x89PNGsecond");

    // Retain policy: the superseded file is still served.
    let response = get(app.app(), created["poster"].as_str().unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn patch_with_text_plain_poster_is_rejected() {
    let app = build();
    let token = app.token_for(ALICE);
    let created = create_movie(&app, &token, "Keep", "2000", false).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let parts = [
        Part::Text("title", "Changed"),
        Part::File {
            name: "poster",
            file_name: "notes.txt",
            content_type: "text/plain",
            bytes: b"hello",
        },
    ];
    let response = send_multipart(app.app(), Method::PATCH, &uri, &token, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get_auth(app.app(), &uri, &token).await).await;
    assert_eq!(json["title"], "Keep");
}

#[tokio::test]
async fn delete_returns_no_content_then_not_found() {
    let app = build();
    let token = app.token_for(ALICE);
    let created = create_movie(&app, &token, "Brief", "2000", false).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let response = delete_auth(app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app.app(), &uri, &app.token_for(BOB)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purge_policy_removes_poster_file_on_delete() {
    let app = common::build_test_app_with(PosterCleanup::Purge);
    let token = app.token_for(ALICE);
    let created = create_movie(&app, &token, "Alien", "1979", true).await;
    let poster = created["poster"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/movies/{}", created["id"]);
    assert_eq!(delete_auth(app.app(), &uri, &token).await.status(), StatusCode::NO_CONTENT);

    let response = get(app.app(), &poster).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_ignores_owner_id_and_creation_time() {
    let app = build();
    let token = app.token_for(ALICE);
    let created = create_movie(&app, &token, "Mine", "2000", false).await;
    let uri = format!("/api/v1/movies/{}", created["id"]);

    let parts = [
        Part::Text("title", "Still mine"),
        Part::Text("userId", "2"),
        Part::Text("id", "999"),
        Part::Text("createdAt", "2001-01-01T00:00:00Z"),
    ];
    let response = send_multipart(app.app(), Method::PATCH, &uri, &token, &parts).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Still mine");
    assert_eq!(json["id"], created["id"]);
    assert_eq!(json["userId"], ALICE);
    assert_eq!(json["createdAt"], created["createdAt"]);

    let response = get_auth(app.app(), &uri, &app.token_for(BOB)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.app(), "/api/v1/movies/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_json_bad_request() {
    let app = build();
    let response = get_auth(app.app(), "/api/v1/movies/abc", &app.token_for(ALICE)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn malformed_page_query_is_json_bad_request() {
    let app = build();
    let response = get_auth(app.app(), "/api/v1/movies?page=abc", &app.token_for(ALICE)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

fn build() -> common::TestApp {
    common::build_test_app()
}
