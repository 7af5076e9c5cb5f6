use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::domain::{
    models::{Profile, ProfileChanges, StorageKey, UserId},
    ports::outbound::ProfileRepository,
    RepositoryError,
};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: i32,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    bio: String,
    avatar_key: Option<String>,
    followers_count: i32,
    following_count: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            avatar_key: row.avatar_key.map(StorageKey::from),
            followers_count: row.followers_count,
            following_count: row.following_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(user_id: &UserId, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            RepositoryError::UserNotFound(*user_id)
        }
        _ => RepositoryError::Database(err.to_string()),
    }
}

async fn fetch_profile<'e, E>(executor: E, user_id: &UserId) -> Result<Profile, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT
            user_profiles.user_id,
            users.username,
            users.email,
            users.first_name,
            users.last_name,
            user_profiles.bio,
            user_profiles.avatar_key,
            user_profiles.followers_count,
            user_profiles.following_count,
            user_profiles.created_at,
            user_profiles.updated_at
        FROM user_profiles
        INNER JOIN users ON users.id = user_profiles.user_id
        WHERE user_profiles.user_id = $1
        "#,
    )
    .bind(user_id.as_i32())
    .fetch_optional(executor)
    .await
    .map_err(|err| database_error(user_id, err))?
    .ok_or(RepositoryError::UserNotFound(*user_id))?;

    Ok(row.into())
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn get_or_create(&self, user_id: &UserId) -> Result<Profile, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_i32())
        .execute(&self.pool)
        .await
        .map_err(|err| database_error(user_id, err))?;

        fetch_profile(&self.pool, user_id).await
    }

    async fn replace_avatar_key(
        &self,
        user_id: &UserId,
        key: Option<&StorageKey>,
    ) -> Result<Option<StorageKey>, RepositoryError> {
        // The locked subquery reads the key being replaced in the same
        // statement that replaces it.
        let previous = sqlx::query_scalar::<_, Option<String>>(
            r#"
            UPDATE user_profiles
            SET avatar_key = $2,
                updated_at = now()
            FROM (
                SELECT user_id, avatar_key
                FROM user_profiles
                WHERE user_id = $1
                FOR UPDATE
            ) AS previous
            WHERE user_profiles.user_id = previous.user_id
            RETURNING previous.avatar_key
            "#,
        )
        .bind(user_id.as_i32())
        .bind(key.map(StorageKey::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| database_error(user_id, err))?
        .ok_or(RepositoryError::UserNotFound(*user_id))?;

        Ok(previous.map(StorageKey::from))
    }

    async fn update_details(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Profile, RepositoryError> {
        let to_repo_error = |err| database_error(user_id, err);
        let mut tx = self.pool.begin().await.map_err(to_repo_error)?;

        sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i32())
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(to_repo_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE user_profiles
            SET bio = COALESCE($2, bio),
                updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i32())
        .bind(changes.bio.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(to_repo_error)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::UserNotFound(*user_id));
        }

        let profile = fetch_profile(&mut *tx, user_id).await?;
        tx.commit().await.map_err(to_repo_error)?;

        Ok(profile)
    }
}
