use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{models::UserId, RepositoryError};

/// Resolves an API token to the account it was issued for.
///
/// Tokens are issued elsewhere; this only looks them up.
#[async_trait]
pub trait TokenAuthenticator: Send + Sync + 'static {
    async fn authenticate(&self, token: &str) -> Result<Option<UserId>, RepositoryError>;
}

pub struct PostgresTokenAuthenticator {
    pool: PgPool,
}

impl PostgresTokenAuthenticator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenAuthenticator for PostgresTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let user_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT user_id
            FROM auth_tokens
            WHERE key = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::Database(err.to_string()))?;

        Ok(user_id.map(UserId::new))
    }
}
