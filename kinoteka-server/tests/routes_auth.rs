//! Router-level tests that exercise authentication gating and request
//! validation. The pool is lazy and never connects: every asserted response
//! is produced before any query would run.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use kinoteka_config::Config;
use kinoteka_server::{AppState, create_api_router};

fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://kinoteka@localhost/kinoteka_test")
        .expect("lazy pool");
    create_api_router(AppState::new(pool, Arc::new(Config::default())))
}

async fn get(app: Router, uri: &str) -> StatusCode {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    response.status()
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    for (method, uri) in [
        ("POST", "/api/v1/review/create/"),
        ("POST", "/api/v1/review/action/"),
        ("DELETE", "/api/v1/review/7/delete/"),
        ("POST", "/api/v1/add-rating/"),
        ("POST", "/api/v1/add-watchlist/3/"),
        ("DELETE", "/api/v1/remove-watchlist/"),
        ("GET", "/api/v1/user-watchlist/"),
        ("GET", "/api/v1/search-watchlist/?title=dune"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .expect("request");
        let response = test_app().oneshot(request).await.expect("response");
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should be gated"
        );
    }
}

#[tokio::test]
async fn unauthorized_body_is_the_json_error_envelope() {
    let response = test_app()
        .oneshot(
            Request::get("/api/v1/user-watchlist/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["error"]["status"], 401);
    assert_eq!(body["error"]["message"], "Authentication required");
}

#[tokio::test]
async fn catalog_movies_requires_count_and_section() {
    assert_eq!(
        get(test_app(), "/api/v1/catalog-movies/").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get(test_app(), "/api/v1/catalog-movies/?section=most-popular").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get(test_app(), "/api/v1/catalog-movies/?count=&section=most-popular").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn catalog_movies_rejects_non_numeric_count_and_bad_section() {
    assert_eq!(
        get(test_app(), "/api/v1/catalog-movies/?count=six&section=most-popular").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get(test_app(), "/api/v1/catalog-movies/?count=6&section=editor-picks").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn new_movies_requires_a_numeric_count() {
    assert_eq!(
        get(test_app(), "/api/v1/new-movies/").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get(test_app(), "/api/v1/new-movies/?count=eight").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn empty_search_title_is_rejected_before_the_database() {
    assert_eq!(
        get(test_app(), "/api/v1/search-movie/").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        get(test_app(), "/api/v1/search-movie/?title=%20%20").await,
        StatusCode::BAD_REQUEST
    );
}
