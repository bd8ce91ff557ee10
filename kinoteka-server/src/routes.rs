//! API router. Everything lives under `/api/v1`; write endpoints and the
//! watchlist sit behind the session-auth middleware, the public read
//! endpoints get the optional variant so authenticated reads can carry
//! requester-specific fields.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth;
use crate::handlers::{movies, ratings, reference, reviews, watchlist};
use crate::state::AppState;

pub fn create_api_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/movies/", get(movies::list_movies))
        .route("/movie/{id}/", get(movies::movie_detail))
        .route("/movie/{id}/reviews/", get(reviews::movie_reviews))
        .route("/search-movie/", get(movies::search_movies))
        .route("/catalog-movies/", get(movies::catalog_movies))
        .route("/new-movies/", get(movies::new_movies))
        .route("/home-page-video/", get(movies::home_page_video))
        .route("/genres/", get(reference::genres))
        .route("/platforms/", get(reference::platforms))
        .route("/directors/", get(reference::directors))
        .route("/director/{id}/", get(reference::director_detail))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth_middleware,
        ));

    let protected = Router::new()
        .route("/review/create/", post(reviews::create_review))
        .route("/review/action/", post(reviews::review_action))
        .route("/review/{id}/delete/", delete(reviews::delete_review))
        .route("/add-rating/", post(ratings::add_rating))
        .route("/add-watchlist/{movie_id}/", post(watchlist::toggle_watchlist))
        .route("/remove-watchlist/", delete(watchlist::remove_watchlist))
        .route("/user-watchlist/", get(watchlist::user_watchlist))
        .route("/search-watchlist/", get(watchlist::search_watchlist))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}
