//! Catalog endpoints: listing, detail, search, curated sections and the
//! homepage strip.

use axum::{
    Extension, Json,
    extract::{OriginalUri, Path, Query, State},
};
use serde::Deserialize;

use kinoteka_core::api_types::{HomePageVideo, MovieDetail, MovieSummary, Paginated};
use kinoteka_core::catalog::{
    CatalogSection, MovieFilter, MovieOrdering, Page, coerce_new_movies_count,
    coerce_section_count, parse_slug_set,
};
use kinoteka_core::types::User;

use crate::errors::{AppError, AppResult};
use crate::pagination::paginated;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    genres: Option<String>,
    rate: Option<String>,
    platforms: Option<String>,
    imdb_min: Option<f64>,
    imdb_max: Option<f64>,
    year_min: Option<i32>,
    year_max: Option<i32>,
    search: Option<String>,
    ordering: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

impl MovieListQuery {
    pub(crate) fn filter(&self) -> MovieFilter {
        MovieFilter {
            genres: parse_slug_set(self.genres.as_deref()),
            rate: parse_slug_set(self.rate.as_deref()),
            platforms: parse_slug_set(self.platforms.as_deref()),
            imdb_min: self.imdb_min,
            imdb_max: self.imdb_max,
            year_min: self.year_min,
            year_max: self.year_max,
            search: self.search.clone(),
        }
    }

    pub(crate) fn ordering(&self) -> Option<MovieOrdering> {
        self.ordering
            .as_deref()
            .map(|raw| MovieOrdering::parse(Some(raw)))
    }

    pub(crate) fn page(&self) -> Page {
        Page::new(self.page, self.page_size)
    }
}

/// `GET /movies/` - filtered, ordered, paginated non-draft listing.
pub async fn list_movies(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<MovieListQuery>,
) -> AppResult<Json<Paginated<MovieSummary>>> {
    let page = query.page();
    let (count, movies) = state
        .catalog
        .list_movies(&query.filter(), query.ordering().unwrap_or_default(), page)
        .await?;
    Ok(Json(paginated(&uri, page, count, movies)))
}

/// `GET /movie/{id}/` - movie detail; the requester-specific fields are
/// populated only for authenticated requests.
pub async fn movie_detail(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    user: Option<Extension<User>>,
) -> AppResult<Json<MovieDetail>> {
    let requester = user.map(|Extension(user)| user.id);
    let detail = state.catalog.movie_detail(movie_id, requester).await?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

/// `GET /search-movie/` - capped title search across the catalog.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state
        .catalog
        .search_movies(query.title.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct SectionQuery {
    count: Option<String>,
    section: Option<String>,
}

/// `GET /catalog-movies/` - one of the fixed curated sections.
pub async fn catalog_movies(
    State(state): State<AppState>,
    Query(query): Query<SectionQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let (count, section) = match (query.count.as_deref(), query.section.as_deref()) {
        (Some(count), Some(section)) if !count.is_empty() && !section.is_empty() => {
            (count, section)
        }
        _ => return Err(AppError::bad_request("count and section are required")),
    };
    let count: i64 = count
        .parse()
        .map_err(|_| AppError::bad_request("This field has to be a number"))?;
    let section = CatalogSection::parse(section)?;

    let movies = state
        .catalog
        .section(section, coerce_section_count(count))
        .await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    count: Option<String>,
}

/// `GET /new-movies/` - the recent pool minus the homepage pick.
pub async fn new_movies(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let count = query
        .count
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::bad_request("This field is required"))?;
    let count: i64 = count
        .parse()
        .map_err(|_| AppError::bad_request("This field has to be number"))?;

    let movies = state.catalog.new_movies(coerce_new_movies_count(count)).await?;
    Ok(Json(movies))
}

/// `GET /home-page-video/` - trailer pick for the homepage.
pub async fn home_page_video(State(state): State<AppState>) -> AppResult<Json<HomePageVideo>> {
    let video = state
        .catalog
        .home_page_video()
        .await?
        .ok_or_else(|| AppError::not_found("No movies available for the home page"))?;
    Ok(Json(video))
}
