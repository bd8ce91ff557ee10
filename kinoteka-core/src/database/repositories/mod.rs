mod catalog;
mod ratings;
mod reference;
mod reviews;
mod users;
mod watchlist;

pub use catalog::CatalogRepository;
pub use ratings::RatingRepository;
pub use reference::ReferenceRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;
pub use watchlist::WatchlistRepository;

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api_types::MovieSummary;
use crate::catalog::{MovieFilter, MovieOrdering};
use crate::error::Result;

/// Escape `%`, `_` and `\` so user text is matched literally inside ILIKE
/// patterns built with `ESCAPE E'\\'`.
pub(crate) fn escape_like_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Movie row as selected by every listing query. Aliases: `m` for movies,
/// `i` for the left-joined imdb_ratings.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MovieSummaryRow {
    pub id: i64,
    pub title: String,
    pub poster_path: String,
    pub point: Option<f64>,
}

/// Append the shared catalog filter predicates. The surrounding query must
/// expose the `m` and `i` aliases and already contain a WHERE clause.
pub(crate) fn push_movie_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &MovieFilter) {
    if !filter.genres.is_empty() {
        builder.push(
            " AND m.id IN (SELECT mg.movie_id FROM movie_genres mg \
             JOIN genres g ON g.id = mg.genre_id WHERE g.slug = ANY(",
        );
        builder.push_bind(filter.genres.clone());
        builder.push("))");
    }
    if !filter.rate.is_empty() {
        builder.push(" AND m.certificate_id IN (SELECT c.id FROM certificates c WHERE c.slug = ANY(");
        builder.push_bind(filter.rate.clone());
        builder.push("))");
    }
    if !filter.platforms.is_empty() {
        builder.push(
            " AND m.id IN (SELECT ms.movie_id FROM movie_streaming ms \
             JOIN streaming_services s ON s.id = ms.service_id WHERE s.slug = ANY(",
        );
        builder.push_bind(filter.platforms.clone());
        builder.push("))");
    }
    if let Some(imdb_min) = filter.imdb_min {
        builder.push(" AND i.point >= ");
        builder.push_bind(imdb_min);
    }
    if let Some(imdb_max) = filter.imdb_max {
        builder.push(" AND i.point <= ");
        builder.push_bind(imdb_max);
    }
    if let Some(year_min) = filter.year_min {
        builder.push(" AND m.year >= ");
        builder.push_bind(year_min);
    }
    if let Some(year_max) = filter.year_max {
        builder.push(" AND m.year <= ");
        builder.push_bind(year_max);
    }
    if let Some(search) = filter.search.as_deref()
        && !search.trim().is_empty()
    {
        let pattern = format!("%{}%", escape_like_literal(search.trim()));
        builder.push(" AND m.title ILIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE E'\\\\'");
    }
}

pub(crate) fn order_clause(ordering: MovieOrdering) -> &'static str {
    match ordering {
        MovieOrdering::Default => " ORDER BY m.premiere DESC, i.point DESC NULLS LAST",
        MovieOrdering::ImdbAsc => " ORDER BY i.point ASC NULLS LAST",
        MovieOrdering::ImdbDesc => " ORDER BY i.point DESC NULLS LAST",
        MovieOrdering::YearAsc => " ORDER BY m.year ASC",
        MovieOrdering::YearDesc => " ORDER BY m.year DESC",
    }
}

/// Attach genre names to listing rows with a single grouped query.
pub(crate) async fn hydrate_summaries(
    pool: &PgPool,
    rows: Vec<MovieSummaryRow>,
) -> Result<Vec<MovieSummary>> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut genres: HashMap<i64, Vec<String>> = HashMap::new();
    if !ids.is_empty() {
        let pairs: Vec<(i64, String)> = sqlx::query_as(
            "SELECT mg.movie_id, g.name FROM movie_genres mg \
             JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = ANY($1) ORDER BY g.name",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;
        for (movie_id, name) in pairs {
            genres.entry(movie_id).or_default().push(name);
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| MovieSummary {
            genres: genres.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            image: row.poster_path,
            imdb: row.point,
        })
        .collect())
}
