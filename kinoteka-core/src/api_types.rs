//! Response shapes used across the API boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::types::Genre;

/// Movie as it appears in lists and strips.
#[derive(Debug, Clone, Serialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub genres: Vec<String>,
    pub imdb: Option<f64>,
}

/// IMDb info on the movie detail; votes carry thousands separators.
#[derive(Debug, Clone, Serialize)]
pub struct ImdbInfo {
    pub point: Option<f64>,
    pub votes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub country: String,
    pub runtime: String,
    pub description: String,
    pub image: String,
    pub premiere: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub tagline: String,
    pub trailer: String,
    pub year: i32,
    /// Formatted with thousands separators.
    pub budget: String,
    /// Formatted with thousands separators.
    pub box_office: String,
    pub movie_slug: Option<String>,
    pub genres: Vec<Genre>,
    pub directors: Vec<String>,
    pub production: Vec<String>,
    pub streaming: Vec<String>,
    pub certificate: Option<String>,
    pub imdb: Option<ImdbInfo>,
    /// The requester's own star, when authenticated and rated.
    pub rating_user: Option<i16>,
    /// Movie-wide average star; null when the movie is unrated.
    pub middle_star: Option<f64>,
    pub count_votes: i64,
    pub is_watchlist: bool,
}

/// One node of the nested review tree. Children share this shape at every
/// depth.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewNode {
    pub id: i64,
    pub username: String,
    pub content: String,
    pub likes: i64,
    pub is_like: bool,
    pub unlikes: i64,
    pub is_unlike: bool,
    pub spoiler: bool,
    pub is_reply: bool,
    pub timestamp: DateTime<Utc>,
    pub parent: Option<ParentAuthor>,
    pub children: Vec<ReviewNode>,
}

/// The parent review is represented by its author only.
#[derive(Debug, Clone, Serialize)]
pub struct ParentAuthor {
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieReviews {
    pub review_count: usize,
    pub reviews: Vec<ReviewNode>,
}

/// Paginated listing envelope: next/previous links plus the total count.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub links: PageLinks,
    pub count: i64,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePageVideo {
    pub title: String,
    pub video_id: String,
    pub welcome_text: String,
}

/// A watchlist entry carries the movie's list representation.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistItem {
    pub movie: MovieSummary,
}
