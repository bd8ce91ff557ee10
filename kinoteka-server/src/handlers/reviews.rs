//! Review endpoints: the nested per-movie listing, creation, the combined
//! like/unlike/reply action and owner-only deletion.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use kinoteka_core::api_types::{MovieReviews, ReviewNode};
use kinoteka_core::types::User;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// `GET /movie/{id}/reviews/`
pub async fn movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    user: Option<Extension<User>>,
) -> AppResult<Json<MovieReviews>> {
    let requester = user.map(|Extension(user)| user.id);
    let reviews = state.reviews.list_for_movie(movie_id, requester).await?;
    Ok(Json(reviews))
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub movie: i64,
    pub content: String,
    #[serde(default)]
    pub spoiler: bool,
}

/// `POST /review/create/` - top-level review.
pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewNode>)> {
    let review = state
        .reviews
        .create(user.id, request.movie, &request.content, request.spoiler)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[derive(Debug, Deserialize)]
pub struct ReviewActionRequest {
    pub review_id: i64,
    pub action: String,
    pub content: Option<String>,
}

/// `POST /review/action/` - like, unlike or reply, dispatched on the
/// normalized action name.
pub async fn review_action(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<ReviewActionRequest>,
) -> AppResult<(StatusCode, Json<ReviewNode>)> {
    let review_id = request.review_id;
    match request.action.trim().to_lowercase().as_str() {
        "like" => {
            let review = state.reviews.toggle_like(user.id, review_id).await?;
            Ok((StatusCode::OK, Json(review)))
        }
        "unlike" => {
            let review = state.reviews.toggle_unlike(user.id, review_id).await?;
            Ok((StatusCode::OK, Json(review)))
        }
        "reply" => {
            let content = request.content.as_deref().unwrap_or("");
            let review = state.reviews.create_reply(user.id, review_id, content).await?;
            Ok((StatusCode::CREATED, Json(review)))
        }
        _ => Err(AppError::bad_request(
            "This is not a valid action for review",
        )),
    }
}

/// `DELETE /review/{id}/delete/` - owner only.
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(review_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.reviews.delete(user.id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
