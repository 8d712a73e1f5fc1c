use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::reset::errors::ResetError;
use crate::domain::reset::models::PasswordResetToken;
use crate::domain::reset::ports::PasswordResetTokenRepository;
use crate::domain::user::models::UserId;

pub struct PostgresResetTokenRepository {
    pool: PgPool,
}

impl PostgresResetTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ResetTokenRow {
    id: Uuid,
    user_id: Uuid,
    created_by_user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<ResetTokenRow> for PasswordResetToken {
    fn from(row: ResetTokenRow) -> Self {
        PasswordResetToken {
            id: row.id,
            user_id: UserId(row.user_id),
            created_by_user_id: UserId(row.created_by_user_id),
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            used_at: row.used_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl PasswordResetTokenRepository for PostgresResetTokenRepository {
    async fn create(
        &self,
        token: PasswordResetToken,
    ) -> Result<PasswordResetToken, ResetError> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens
                (id, user_id, created_by_user_id, token_hash, expires_at, used_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(token.id)
        .bind(token.user_id.0)
        .bind(token.created_by_user_id.0)
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.used_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ResetError::Database(e.to_string()))?;

        Ok(token)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, ResetError> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            r#"
            SELECT id, user_id, created_by_user_id, token_hash, expires_at, used_at, created_at
            FROM password_reset_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ResetError::Database(e.to_string()))?;

        Ok(row.map(PasswordResetToken::from))
    }

    async fn mark_used(&self, id: &Uuid, used_at: DateTime<Utc>) -> Result<(), ResetError> {
        let result =
            sqlx::query("UPDATE password_reset_tokens SET used_at = $2 WHERE id = $1")
                .bind(id)
                .bind(used_at)
                .execute(&self.pool)
                .await
                .map_err(|e| ResetError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ResetError::Database(format!(
                "reset token {id} vanished before it could be marked used"
            )));
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ResetError> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| ResetError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
