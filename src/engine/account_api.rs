use super::Engine;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Executor, Row};

use crate::{api::AccountAPI, entities::User, error::Error};

#[async_trait]
impl AccountAPI for Engine {
    /// Find-or-create keyed by the provider's subject id. The unique
    /// constraint on social_id makes the upsert safe under concurrent
    /// first logins.
    #[tracing::instrument(skip(self))]
    async fn login(
        &self,
        social_id: String,
        nickname: Option<String>,
        email: Option<String>,
    ) -> Result<User, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(
                sqlx::query("SELECT id, social_id, nickname, email FROM users WHERE social_id = $1")
                    .bind(&social_id),
            )
            .await?;

        if let Some(row) = maybe_result {
            return user_from_row(&row);
        }

        let row = conn
            .fetch_one(
                sqlx::query(
                    "INSERT INTO users (social_id, nickname, email) VALUES ($1, $2, $3) ON CONFLICT (social_id) DO UPDATE SET social_id = EXCLUDED.social_id RETURNING id, social_id, nickname, email",
                )
                .bind(&social_id)
                .bind(&nickname)
                .bind(&email),
            )
            .await?;

        user_from_row(&row)
    }
}

fn user_from_row(row: &PgRow) -> Result<User, Error> {
    Ok(User {
        id: row.try_get("id")?,
        social_id: row.try_get("social_id")?,
        nickname: row.try_get("nickname")?,
        email: row.try_get("email")?,
    })
}
