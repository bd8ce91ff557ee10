//! Persistent entity types shared across the crate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An account known to the catalog. Account management and credential
/// issuance live in the external auth service; this is the local mirror
/// referenced by reviews, ratings and watchlists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub icon_path: Option<String>,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Director {
    pub id: i64,
    pub name: String,
}

/// Streaming platform as shown in the platform strip: logo and slug only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlatformSummary {
    pub logo_path: Option<String>,
    pub slug: String,
}

/// Input for editorial movie creation. The slug is derived from the title
/// inside the insert transaction, never supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub country: String,
    pub runtime: String,
    #[serde(default)]
    pub description: String,
    pub poster_path: String,
    pub premiere: NaiveDate,
    #[serde(default)]
    pub tagline: String,
    pub trailer: String,
    pub year: i32,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub box_office: i64,
    #[serde(default)]
    pub draft: bool,
    pub certificate_id: Option<i64>,
    pub imdb_id: Option<i64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub production_ids: Vec<i64>,
    #[serde(default)]
    pub streaming_ids: Vec<i64>,
    #[serde(default)]
    pub director_ids: Vec<i64>,
}

/// Outcome of a watchlist toggle.
#[derive(Debug, Clone)]
pub struct WatchlistToggle {
    pub title: String,
    pub added: bool,
}

/// One review as stored, flattened with its read-time aggregates. The nested
/// tree is assembled from these rows in memory.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub username: String,
    pub content: String,
    pub spoiler: bool,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub unlikes: i64,
    pub is_like: bool,
    pub is_unlike: bool,
}
