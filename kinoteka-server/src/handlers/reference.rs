//! Lookup endpoints: genres, streaming platforms and directors.

use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
};
use serde::Deserialize;

use kinoteka_core::api_types::Paginated;
use kinoteka_core::catalog::Page;
use kinoteka_core::types::{Director, Genre, PlatformSummary};

use crate::errors::AppResult;
use crate::pagination::paginated;
use crate::state::AppState;

/// `GET /genres/`
pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.reference.genres().await?))
}

/// `GET /platforms/`
pub async fn platforms(State(state): State<AppState>) -> AppResult<Json<Vec<PlatformSummary>>> {
    Ok(Json(state.reference.platforms().await?))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<i64>,
    page_size: Option<i64>,
}

/// `GET /directors/`
pub async fn directors(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<Director>>> {
    let page = Page::new(query.page, query.page_size);
    let (count, directors) = state.reference.directors(page).await?;
    Ok(Json(paginated(&uri, page, count, directors)))
}

/// `GET /director/{id}/`
pub async fn director_detail(
    State(state): State<AppState>,
    Path(director_id): Path<i64>,
) -> AppResult<Json<Director>> {
    Ok(Json(state.reference.director(director_id).await?))
}
