//! Session-token lookup against the identity mirror. Token issuance and
//! account management belong to the external auth service.

use sqlx::PgPool;

use crate::error::Result;
use crate::types::User;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve an unexpired bearer token to its user.
    pub async fn find_by_session(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username \
             FROM user_sessions s JOIN users u ON u.id = s.user_id \
             WHERE s.token = $1 AND s.expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
