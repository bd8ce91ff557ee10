//! Per-user watchlists: membership toggle, filtered listing, scoped search
//! and all-or-nothing bulk removal.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api_types::{MovieSummary, WatchlistItem};
use crate::catalog::{MovieFilter, MovieOrdering, Page, SEARCH_RESULT_LIMIT};
use crate::error::{CoreError, Result};
use crate::types::WatchlistToggle;

use super::{MovieSummaryRow, hydrate_summaries, order_clause, push_movie_filters};

const ENTRY_SELECT: &str = "SELECT m.id, m.title, m.poster_path, i.point \
     FROM watchlist_entries we \
     JOIN watchlists w ON w.id = we.watchlist_id \
     JOIN movies m ON m.id = we.movie_id \
     LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
     WHERE w.user_id = ";

const ENTRY_COUNT: &str = "SELECT COUNT(*) \
     FROM watchlist_entries we \
     JOIN watchlists w ON w.id = we.watchlist_id \
     JOIN movies m ON m.id = we.movie_id \
     LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
     WHERE w.user_id = ";

#[derive(Debug, Clone)]
pub struct WatchlistRepository {
    pool: PgPool,
}

impl WatchlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flip the movie's membership in the user's watchlist. The watchlist is
    /// created lazily on first use; the whole operation is one transaction.
    pub async fn toggle(&self, user_id: i64, movie_id: i64) -> Result<WatchlistToggle> {
        let mut tx = self.pool.begin().await?;

        let title: String = sqlx::query_scalar("SELECT title FROM movies WHERE id = $1")
            .bind(movie_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Movie {movie_id} not found")))?;

        sqlx::query("INSERT INTO watchlists (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let watchlist_id: i64 =
            sqlx::query_scalar("SELECT id FROM watchlists WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let removed = sqlx::query(
            "DELETE FROM watchlist_entries WHERE watchlist_id = $1 AND movie_id = $2",
        )
        .bind(watchlist_id)
        .bind(movie_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let added = removed == 0;
        if added {
            sqlx::query(
                "INSERT INTO watchlist_entries (watchlist_id, movie_id) VALUES ($1, $2) \
                 ON CONFLICT (watchlist_id, movie_id) DO NOTHING",
            )
            .bind(watchlist_id)
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(WatchlistToggle { title, added })
    }

    /// The user's watchlist, newest-added first by default, with the catalog
    /// filters applied through the movie relation.
    pub async fn list(
        &self,
        user_id: i64,
        filter: &MovieFilter,
        ordering: Option<MovieOrdering>,
        page: Page,
    ) -> Result<(i64, Vec<WatchlistItem>)> {
        let mut count_builder = QueryBuilder::<Postgres>::new(ENTRY_COUNT);
        count_builder.push_bind(user_id);
        push_movie_filters(&mut count_builder, filter);
        let count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
        builder.push_bind(user_id);
        push_movie_filters(&mut builder, filter);
        match ordering {
            Some(ordering) => builder.push(order_clause(ordering)),
            None => builder.push(" ORDER BY we.added_at DESC"),
        };
        builder.push(" LIMIT ");
        builder.push_bind(page.size);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build_query_as::<MovieSummaryRow>()
            .fetch_all(&self.pool)
            .await?;
        let items = hydrate_summaries(&self.pool, rows)
            .await?
            .into_iter()
            .map(|movie| WatchlistItem { movie })
            .collect();
        Ok((count, items))
    }

    /// Title substring search limited to the user's watchlist.
    pub async fn search(&self, user_id: i64, title: &str) -> Result<Vec<MovieSummary>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation(
                "For searching you need write something".to_string(),
            ));
        }
        let pattern = format!("%{}%", super::escape_like_literal(title));
        let rows = sqlx::query_as::<_, MovieSummaryRow>(
            "SELECT m.id, m.title, m.poster_path, i.point \
             FROM movies m \
             JOIN watchlist_entries we ON we.movie_id = m.id \
             JOIN watchlists w ON w.id = we.watchlist_id AND w.user_id = $1 \
             LEFT JOIN imdb_ratings i ON i.id = m.imdb_id \
             WHERE m.draft = FALSE AND m.title ILIKE $2 ESCAPE E'\\\\' \
             ORDER BY i.votes DESC NULLS LAST LIMIT $3",
        )
        .bind(user_id)
        .bind(pattern)
        .bind(SEARCH_RESULT_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        hydrate_summaries(&self.pool, rows).await
    }

    /// Remove a set of movies from the watchlist, all or nothing: every
    /// requested id must currently be present, otherwise nothing is deleted.
    /// Returns the removed titles.
    pub async fn bulk_remove(&self, user_id: i64, movie_ids: &[i64]) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let matched: Vec<(i64, String)> = sqlx::query_as(
            "SELECT we.id, m.title \
             FROM watchlist_entries we \
             JOIN watchlists w ON w.id = we.watchlist_id \
             JOIN movies m ON m.id = we.movie_id \
             WHERE w.user_id = $1 AND we.movie_id = ANY($2) \
             FOR UPDATE OF we",
        )
        .bind(user_id)
        .bind(movie_ids)
        .fetch_all(&mut *tx)
        .await?;

        if matched.is_empty() || matched.len() != movie_ids.len() {
            return Err(CoreError::NotFound(
                "These movies not found in your watchlist".to_string(),
            ));
        }

        let entry_ids: Vec<i64> = matched.iter().map(|(id, _)| *id).collect();
        sqlx::query("DELETE FROM watchlist_entries WHERE id = ANY($1)")
            .bind(&entry_ids)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(matched.into_iter().map(|(_, title)| title).collect())
    }
}
