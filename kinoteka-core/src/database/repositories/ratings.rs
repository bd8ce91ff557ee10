//! Star rating upsert.

use sqlx::PgPool;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert-or-update the user's rating for a movie in one statement, so a
    /// (user, movie) pair can never end up with two rows. The star value
    /// must be one of the configured discrete values.
    pub async fn upsert(&self, user_id: i64, movie_id: i64, star_value: i16) -> Result<()> {
        let star_id: i64 = sqlx::query_scalar("SELECT id FROM rating_stars WHERE value = $1")
            .bind(star_value)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                CoreError::Validation(format!("{star_value} is not a valid star value"))
            })?;

        let movie_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
                .bind(movie_id)
                .fetch_one(&self.pool)
                .await?;
        if !movie_exists {
            return Err(CoreError::NotFound(format!("Movie {movie_id} not found")));
        }

        sqlx::query(
            "INSERT INTO ratings (user_id, movie_id, star_id) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, movie_id) DO UPDATE SET star_id = EXCLUDED.star_id",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(star_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
