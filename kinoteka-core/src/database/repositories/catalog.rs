//! Catalog queries: filtered listings, the fixed curated sections, the
//! homepage pool, title search, the movie detail and editorial creation.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api_types::{HomePageVideo, ImdbInfo, MovieDetail, MovieSummary};
use crate::catalog::{
    CatalogSection, MOST_POPULAR_MIN_VOTES, MOST_POPULAR_POINT_MAX, MOST_POPULAR_POINT_MIN,
    MOST_RATED_MIN_VOTES, MovieFilter, MovieOrdering, NEW_ADDED_WINDOW_DAYS, Page,
    RECENT_POOL_LOOKBACK_DAYS, RECENT_POOL_MIN_POINT, SEARCH_RESULT_LIMIT,
};
use crate::display::{thousands, trailer_video_id};
use crate::error::{CoreError, Result};
use crate::slug::slugify;
use crate::types::{Genre, NewMovie};

use super::{MovieSummaryRow, hydrate_summaries, order_clause, push_movie_filters};

const WELCOME_TEXT: &str = "We are very happy to welcome you to the our movie site. \
     We are doing some interesting works here and we are hopeful that \
     you enjoys this site, popular and new movies, \
     tv-series will be available for you!";

const SUMMARY_SELECT: &str = "SELECT m.id, m.title, m.poster_path, i.point \
     FROM movies m LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
     WHERE m.draft = FALSE";

const SUMMARY_COUNT: &str = "SELECT COUNT(*) \
     FROM movies m LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
     WHERE m.draft = FALSE";

#[derive(Debug, sqlx::FromRow)]
struct MovieDetailRow {
    id: i64,
    title: String,
    country: String,
    runtime: String,
    description: String,
    poster_path: String,
    premiere: NaiveDate,
    created_at: DateTime<Utc>,
    tagline: String,
    trailer: String,
    year: i32,
    budget: i64,
    box_office: i64,
    slug: Option<String>,
    certificate: Option<String>,
    point: Option<f64>,
    votes: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, ordered, paginated non-draft movie listing. Returns the
    /// total matching count alongside the requested page.
    pub async fn list_movies(
        &self,
        filter: &MovieFilter,
        ordering: MovieOrdering,
        page: Page,
    ) -> Result<(i64, Vec<MovieSummary>)> {
        let mut count_builder = QueryBuilder::<Postgres>::new(SUMMARY_COUNT);
        push_movie_filters(&mut count_builder, filter);
        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new(SUMMARY_SELECT);
        push_movie_filters(&mut builder, filter);
        builder.push(order_clause(ordering));
        builder.push(" LIMIT ");
        builder.push_bind(page.size);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build_query_as::<MovieSummaryRow>()
            .fetch_all(&self.pool)
            .await?;
        let movies = hydrate_summaries(&self.pool, rows).await?;
        Ok((count, movies))
    }

    /// One of the fixed curated sections, already clamped to 6 or 12 entries.
    pub async fn section(&self, section: CatalogSection, count: i64) -> Result<Vec<MovieSummary>> {
        let rows = match section {
            CatalogSection::NewAdded => {
                sqlx::query_as::<_, MovieSummaryRow>(
                    "SELECT m.id, m.title, m.poster_path, i.point \
                     FROM movies m LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
                     WHERE m.draft = FALSE \
                       AND m.created_at >= NOW() - make_interval(days => $1) \
                       AND m.premiere < (NOW() - make_interval(days => $1))::date \
                     ORDER BY m.created_at DESC LIMIT $2",
                )
                .bind(NEW_ADDED_WINDOW_DAYS as i32)
                .bind(count)
                .fetch_all(&self.pool)
                .await?
            }
            CatalogSection::MostPopular => {
                sqlx::query_as::<_, MovieSummaryRow>(
                    "SELECT m.id, m.title, m.poster_path, i.point \
                     FROM movies m JOIN imdb_ratings i ON i.id = m.imdb_id \
                     WHERE m.draft = FALSE \
                       AND i.point BETWEEN $1 AND $2 AND i.votes >= $3 \
                     ORDER BY m.premiere DESC LIMIT $4",
                )
                .bind(MOST_POPULAR_POINT_MIN)
                .bind(MOST_POPULAR_POINT_MAX)
                .bind(MOST_POPULAR_MIN_VOTES)
                .bind(count)
                .fetch_all(&self.pool)
                .await?
            }
            CatalogSection::MostRated => {
                sqlx::query_as::<_, MovieSummaryRow>(
                    "SELECT m.id, m.title, m.poster_path, i.point \
                     FROM movies m JOIN imdb_ratings i ON i.id = m.imdb_id \
                     WHERE m.draft = FALSE AND i.votes >= $1 \
                     ORDER BY i.point DESC NULLS LAST LIMIT $2",
                )
                .bind(MOST_RATED_MIN_VOTES)
                .bind(count)
                .fetch_all(&self.pool)
                .await?
            }
        };
        hydrate_summaries(&self.pool, rows).await
    }

    /// The homepage trailer: top of the recent pool by vote count.
    pub async fn home_page_video(&self) -> Result<Option<HomePageVideo>> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT m.title, m.trailer \
             FROM movies m JOIN imdb_ratings i ON i.id = m.imdb_id \
             WHERE m.draft = FALSE \
               AND m.premiere >= (NOW() - make_interval(days => $1))::date \
               AND i.point >= $2 \
             ORDER BY i.votes DESC NULLS LAST LIMIT 1",
        )
        .bind(RECENT_POOL_LOOKBACK_DAYS as i32)
        .bind(RECENT_POOL_MIN_POINT)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(title, trailer)| HomePageVideo {
            video_id: trailer_video_id(&trailer).to_string(),
            title,
            welcome_text: WELCOME_TEXT.to_string(),
        }))
    }

    /// The "new movies" strip: the recent pool minus its top entry, which is
    /// reserved for the homepage video.
    pub async fn new_movies(&self, count: i64) -> Result<Vec<MovieSummary>> {
        let rows = sqlx::query_as::<_, MovieSummaryRow>(
            "SELECT m.id, m.title, m.poster_path, i.point \
             FROM movies m JOIN imdb_ratings i ON i.id = m.imdb_id \
             WHERE m.draft = FALSE \
               AND m.premiere >= (NOW() - make_interval(days => $1))::date \
               AND i.point >= $2 \
             ORDER BY i.votes DESC NULLS LAST OFFSET 1 LIMIT $3",
        )
        .bind(RECENT_POOL_LOOKBACK_DAYS as i32)
        .bind(RECENT_POOL_MIN_POINT)
        .bind(count)
        .fetch_all(&self.pool)
        .await?;
        hydrate_summaries(&self.pool, rows).await
    }

    /// Title substring search across the whole catalog, capped at 5.
    pub async fn search_movies(&self, title: &str) -> Result<Vec<MovieSummary>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation(
                "For searching you need write something".to_string(),
            ));
        }
        let pattern = format!("%{}%", super::escape_like_literal(title));
        let rows = sqlx::query_as::<_, MovieSummaryRow>(
            "SELECT m.id, m.title, m.poster_path, i.point \
             FROM movies m LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
             WHERE m.draft = FALSE AND m.title ILIKE $1 ESCAPE E'\\\\' \
             ORDER BY i.votes DESC NULLS LAST LIMIT $2",
        )
        .bind(pattern)
        .bind(SEARCH_RESULT_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        hydrate_summaries(&self.pool, rows).await
    }

    /// Full movie detail with rating aggregates and the requester-specific
    /// fields (own star, watchlist membership) when a user is present.
    pub async fn movie_detail(&self, movie_id: i64, requester: Option<i64>) -> Result<MovieDetail> {
        let row = sqlx::query_as::<_, MovieDetailRow>(
            "SELECT m.id, m.title, m.country, m.runtime, m.description, \
                    m.poster_path, m.premiere, m.created_at, m.tagline, \
                    m.trailer, m.year, m.budget, m.box_office, m.slug, \
                    c.rated AS certificate, i.point, i.votes \
             FROM movies m \
             LEFT JOIN certificates c ON c.id = m.certificate_id \
             LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
             WHERE m.id = $1 AND m.draft = FALSE",
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Movie {movie_id} not found")))?;

        let (middle_star, count_votes): (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rs.value)::float8, COUNT(r.id) \
             FROM ratings r JOIN rating_stars rs ON rs.id = r.star_id \
             WHERE r.movie_id = $1",
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        let (rating_user, is_watchlist) = match requester {
            Some(user_id) => {
                let star: Option<i16> = sqlx::query_scalar(
                    "SELECT rs.value FROM ratings r \
                     JOIN rating_stars rs ON rs.id = r.star_id \
                     WHERE r.movie_id = $1 AND r.user_id = $2",
                )
                .bind(movie_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
                let in_watchlist: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM watchlist_entries we \
                     JOIN watchlists w ON w.id = we.watchlist_id \
                     WHERE w.user_id = $1 AND we.movie_id = $2)",
                )
                .bind(user_id)
                .bind(movie_id)
                .fetch_one(&self.pool)
                .await?;
                (star, in_watchlist)
            }
            None => (None, false),
        };

        let genres = sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name, g.icon_path, g.slug \
             FROM movie_genres mg JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = $1 ORDER BY g.name",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        let directors: Vec<String> = sqlx::query_scalar(
            "SELECT d.name FROM movie_directors md \
             JOIN directors d ON d.id = md.director_id \
             WHERE md.movie_id = $1 ORDER BY d.name",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        let production: Vec<String> = sqlx::query_scalar(
            "SELECT p.name FROM movie_productions mp \
             JOIN productions p ON p.id = mp.production_id \
             WHERE mp.movie_id = $1 ORDER BY p.name",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        let streaming: Vec<String> = sqlx::query_scalar(
            "SELECT s.name FROM movie_streaming ms \
             JOIN streaming_services s ON s.id = ms.service_id \
             WHERE ms.movie_id = $1 ORDER BY s.name",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        let imdb = (row.point.is_some() || row.votes.is_some()).then(|| ImdbInfo {
            point: row.point,
            votes: row.votes.map(|v| thousands(v as i64)),
        });

        Ok(MovieDetail {
            id: row.id,
            title: row.title,
            country: row.country,
            runtime: row.runtime,
            description: row.description,
            image: row.poster_path,
            premiere: row.premiere,
            timestamp: row.created_at,
            tagline: row.tagline,
            trailer: row.trailer,
            year: row.year,
            budget: thousands(row.budget),
            box_office: thousands(row.box_office),
            movie_slug: row.slug,
            genres,
            directors,
            production,
            streaming,
            certificate: row.certificate,
            imdb,
            rating_user,
            middle_star,
            count_votes,
            is_watchlist,
        })
    }

    /// Editorial movie creation. The slug is derived from the title and
    /// written together with the movie and its relation rows in one
    /// transaction.
    pub async fn create_movie(&self, new: &NewMovie) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let slug = slugify(&new.title);
        let movie_id: i64 = sqlx::query_scalar(
            "INSERT INTO movies (title, country, runtime, description, poster_path, \
                                 premiere, tagline, trailer, year, budget, box_office, \
                                 slug, draft, certificate_id, imdb_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING id",
        )
        .bind(&new.title)
        .bind(&new.country)
        .bind(&new.runtime)
        .bind(&new.description)
        .bind(&new.poster_path)
        .bind(new.premiere)
        .bind(&new.tagline)
        .bind(&new.trailer)
        .bind(new.year)
        .bind(new.budget)
        .bind(new.box_office)
        .bind(slug)
        .bind(new.draft)
        .bind(new.certificate_id)
        .bind(new.imdb_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &new.genre_ids {
            sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2)")
                .bind(movie_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }
        for production_id in &new.production_ids {
            sqlx::query("INSERT INTO movie_productions (movie_id, production_id) VALUES ($1, $2)")
                .bind(movie_id)
                .bind(production_id)
                .execute(&mut *tx)
                .await?;
        }
        for service_id in &new.streaming_ids {
            sqlx::query("INSERT INTO movie_streaming (movie_id, service_id) VALUES ($1, $2)")
                .bind(movie_id)
                .bind(service_id)
                .execute(&mut *tx)
                .await?;
        }
        for director_id in &new.director_ids {
            sqlx::query("INSERT INTO movie_directors (movie_id, director_id) VALUES ($1, $2)")
                .bind(movie_id)
                .bind(director_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(movie_id, title = %new.title, "created movie");
        Ok(movie_id)
    }
}
