//! Review persistence: creation, threading, like/unlike toggling, deletion
//! and the nested per-movie listing.

use sqlx::PgPool;

use crate::api_types::{MovieReviews, ReviewNode};
use crate::catalog::MAX_REVIEW_LENGTH;
use crate::error::{CoreError, Result};
use crate::review_tree::{build_tree, find_node};
use crate::types::ReviewRow;

/// Flat per-movie fetch; like/unlike counts and the requester's membership
/// flags are computed in the same statement. `$2` is the requester and may
/// be NULL, which makes both flags false.
const REVIEW_ROWS: &str = "SELECT r.id, r.parent_id, u.username, r.content, r.spoiler, r.created_at, \
            (SELECT COUNT(*) FROM review_likes rl WHERE rl.review_id = r.id) AS likes, \
            (SELECT COUNT(*) FROM review_unlikes ru WHERE ru.review_id = r.id) AS unlikes, \
            EXISTS(SELECT 1 FROM review_likes rl \
                   WHERE rl.review_id = r.id AND rl.user_id = $2) AS is_like, \
            EXISTS(SELECT 1 FROM review_unlikes ru \
                   WHERE ru.review_id = r.id AND ru.user_id = $2) AS is_unlike \
     FROM reviews r JOIN users u ON u.id = r.user_id \
     WHERE r.movie_id = $1 \
     ORDER BY r.created_at DESC";

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a top-level review. Content is length-capped; the movie must
    /// exist.
    pub async fn create(
        &self,
        user_id: i64,
        movie_id: i64,
        content: &str,
        spoiler: bool,
    ) -> Result<ReviewNode> {
        if content.chars().count() > MAX_REVIEW_LENGTH {
            return Err(CoreError::Validation("This review is too long".to_string()));
        }
        let movie_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(movie_id)
            .fetch_one(&self.pool)
            .await?;
        if !movie_exists {
            return Err(CoreError::NotFound(format!("Movie {movie_id} not found")));
        }

        let review_id: i64 = sqlx::query_scalar(
            "INSERT INTO reviews (content, spoiler, user_id, movie_id) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(content)
        .bind(spoiler)
        .bind(user_id)
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        self.node(review_id, movie_id, Some(user_id)).await
    }

    /// Create a reply under an existing review. The reply joins the parent's
    /// movie; empty content is rejected.
    pub async fn create_reply(
        &self,
        user_id: i64,
        parent_id: i64,
        content: &str,
    ) -> Result<ReviewNode> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation(
                "You cannot post empty review".to_string(),
            ));
        }
        let movie_id = self.movie_of(parent_id).await?;

        let review_id: i64 = sqlx::query_scalar(
            "INSERT INTO reviews (content, user_id, movie_id, parent_id) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(content)
        .bind(user_id)
        .bind(movie_id)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await?;

        self.node(review_id, movie_id, Some(user_id)).await
    }

    /// Flip the user's like on a review. Turning a like on removes any
    /// standing unlike first, so the two sets stay exclusive.
    pub async fn toggle_like(&self, user_id: i64, review_id: i64) -> Result<ReviewNode> {
        let movie_id = self
            .toggle(user_id, review_id, "review_likes", "review_unlikes")
            .await?;
        self.node(review_id, movie_id, Some(user_id)).await
    }

    /// Symmetric to [`Self::toggle_like`].
    pub async fn toggle_unlike(&self, user_id: i64, review_id: i64) -> Result<ReviewNode> {
        let movie_id = self
            .toggle(user_id, review_id, "review_unlikes", "review_likes")
            .await?;
        self.node(review_id, movie_id, Some(user_id)).await
    }

    async fn toggle(
        &self,
        user_id: i64,
        review_id: i64,
        table: &str,
        opposite: &str,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let movie_id: i64 = sqlx::query_scalar("SELECT movie_id FROM reviews WHERE id = $1 FOR UPDATE")
            .bind(review_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Review {review_id} not found")))?;

        let present: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE review_id = $1 AND user_id = $2)"
        ))
        .bind(review_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if present {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE review_id = $1 AND user_id = $2"
            ))
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(&format!(
                "INSERT INTO {table} (review_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
            ))
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
            sqlx::query(&format!(
                "DELETE FROM {opposite} WHERE review_id = $1 AND user_id = $2"
            ))
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(movie_id)
    }

    /// Delete a review. Only the owner may delete; replies go with it via
    /// the store's cascading delete.
    pub async fn delete(&self, user_id: i64, review_id: i64) -> Result<()> {
        let owner: i64 = sqlx::query_scalar("SELECT user_id FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Review {review_id} not found")))?;
        if owner != user_id {
            return Err(CoreError::PermissionDenied(
                "You can only delete your own reviews".to_string(),
            ));
        }
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The nested review tree for a movie: top-level reviews newest first,
    /// replies recursively beneath their parents.
    pub async fn list_for_movie(
        &self,
        movie_id: i64,
        requester: Option<i64>,
    ) -> Result<MovieReviews> {
        let movie_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1 AND draft = FALSE)")
                .bind(movie_id)
                .fetch_one(&self.pool)
                .await?;
        if !movie_exists {
            return Err(CoreError::NotFound(format!("Movie {movie_id} not found")));
        }

        let rows = self.movie_rows(movie_id, requester).await?;
        let review_count = rows.len();
        Ok(MovieReviews {
            review_count,
            reviews: build_tree(rows),
        })
    }

    async fn movie_rows(&self, movie_id: i64, requester: Option<i64>) -> Result<Vec<ReviewRow>> {
        let rows = sqlx::query_as::<_, ReviewRow>(REVIEW_ROWS)
            .bind(movie_id)
            .bind(requester)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn movie_of(&self, review_id: i64) -> Result<i64> {
        sqlx::query_scalar("SELECT movie_id FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Review {review_id} not found")))
    }

    /// Re-read a single review in its listed shape, children included.
    async fn node(&self, review_id: i64, movie_id: i64, requester: Option<i64>) -> Result<ReviewNode> {
        let tree = build_tree(self.movie_rows(movie_id, requester).await?);
        find_node(&tree, review_id)
            .cloned()
            .ok_or_else(|| CoreError::Internal(format!("review {review_id} vanished during read")))
    }
}
