//! Reference/lookup entities attached to movies: genres, streaming
//! platforms and directors.

use sqlx::PgPool;

use crate::catalog::Page;
use crate::error::{CoreError, Result};
use crate::types::{Director, Genre, PlatformSummary};

#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    pool: PgPool,
}

impl ReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        let genres =
            sqlx::query_as::<_, Genre>("SELECT id, name, icon_path, slug FROM genres ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(genres)
    }

    pub async fn platforms(&self) -> Result<Vec<PlatformSummary>> {
        let platforms = sqlx::query_as::<_, PlatformSummary>(
            "SELECT logo_path, slug FROM streaming_services ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(platforms)
    }

    pub async fn directors(&self, page: Page) -> Result<(i64, Vec<Director>)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM directors")
            .fetch_one(&self.pool)
            .await?;
        let directors = sqlx::query_as::<_, Director>(
            "SELECT id, name FROM directors ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok((count, directors))
    }

    pub async fn director(&self, director_id: i64) -> Result<Director> {
        sqlx::query_as::<_, Director>("SELECT id, name FROM directors WHERE id = $1")
            .bind(director_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Director {director_id} not found")))
    }
}
