//! Watchlist endpoints, all requiring an authenticated user.

use axum::{
    Extension, Json,
    extract::{OriginalUri, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use kinoteka_core::api_types::{MovieSummary, Paginated, WatchlistItem};
use kinoteka_core::catalog::parse_id_list;
use kinoteka_core::types::User;

use crate::errors::AppResult;
use crate::handlers::movies::{MovieListQuery, TitleQuery};
use crate::pagination::paginated;
use crate::state::AppState;

/// `POST /add-watchlist/{movie_id}/` - flip the movie's membership in the
/// requester's watchlist.
pub async fn toggle_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let toggle = state.watchlist.toggle(user.id, movie_id).await?;
    let message = if toggle.added {
        format!("{} added to your watchlist", toggle.title)
    } else {
        format!("{} removed from your watchlist", toggle.title)
    };
    Ok(Json(json!({ "message": message })))
}

/// `GET /user-watchlist/` - the requester's watchlist with the catalog
/// filters and ordering applied.
pub async fn user_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<MovieListQuery>,
) -> AppResult<Json<Paginated<WatchlistItem>>> {
    let page = query.page();
    let (count, items) = state
        .watchlist
        .list(user.id, &query.filter(), query.ordering(), page)
        .await?;
    Ok(Json(paginated(&uri, page, count, items)))
}

/// `GET /search-watchlist/` - capped title search scoped to the requester's
/// watchlist.
pub async fn search_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state
        .watchlist
        .search(user.id, query.title.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct RemoveWatchlistRequest {
    pub ids: String,
}

#[derive(Debug, Serialize)]
pub struct RemovedMovies {
    pub movies: Vec<String>,
}

/// `DELETE /remove-watchlist/` - remove a comma-separated set of movie ids,
/// all or nothing. Responds with the removed titles.
pub async fn remove_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<RemoveWatchlistRequest>,
) -> AppResult<Json<RemovedMovies>> {
    let movie_ids = parse_id_list(&request.ids)?;
    let movies = state.watchlist.bulk_remove(user.id, &movie_ids).await?;
    Ok(Json(RemovedMovies { movies }))
}
