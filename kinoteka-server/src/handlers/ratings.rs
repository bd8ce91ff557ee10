//! Star rating upsert endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use kinoteka_core::types::User;

use crate::errors::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RatingRequest {
    pub star: i16,
    pub movie: i64,
}

/// `POST /add-rating/` - create or overwrite the requester's rating for a
/// movie; one row per (user, movie) pair.
pub async fn add_rating(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<RatingRequest>,
) -> AppResult<(StatusCode, Json<RatingRequest>)> {
    state
        .ratings
        .upsert(user.id, request.movie, request.star)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}
