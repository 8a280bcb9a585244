//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use bikenode_core::entities::User;
use bikenode_core::traits::{RepoResult, UserRepository};
use bikenode_core::value_objects::Snowflake;

use crate::models::{UpsertedUserModel, UserModel};

use super::error::map_db_error;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, discord_id, username, discriminator, avatar, email,
                   access_token, refresh_token, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_discord_id(&self, discord_id: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, discord_id, username, discriminator, avatar, email,
                   access_token, refresh_token, created_at, updated_at
            FROM users
            WHERE discord_id = $1
            ",
        )
        .bind(discord_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    // Tokens stay out of the span
    #[instrument(skip(self, user), fields(discord_id = %user.discord_id))]
    async fn upsert_by_discord_id(&self, user: &User) -> RepoResult<(User, bool)> {
        let row = sqlx::query_as::<_, UpsertedUserModel>(
            r"
            INSERT INTO users (id, discord_id, username, discriminator, avatar, email,
                               access_token, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (discord_id) DO UPDATE
            SET username = EXCLUDED.username,
                discriminator = EXCLUDED.discriminator,
                avatar = EXCLUDED.avatar,
                email = EXCLUDED.email,
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                updated_at = GREATEST(EXCLUDED.updated_at, users.updated_at)
            RETURNING id, discord_id, username, discriminator, avatar, email,
                      access_token, refresh_token, created_at, updated_at,
                      (xmax = 0) AS inserted
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.discord_id)
        .bind(&user.username)
        .bind(&user.discriminator)
        .bind(&user.avatar)
        .bind(&user.email)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((User::from(row.user), row.inserted))
    }
}
