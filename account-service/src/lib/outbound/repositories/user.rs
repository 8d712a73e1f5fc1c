use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: Option<String>,
    phone: Option<String>,
    name: String,
    password_hash: String,
    role: String,
    status: String,
    failed_login_count: i32,
    lockout_until: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: row.email.map(EmailAddress::new).transpose()?,
            phone: row.phone,
            name: row.name,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            status: row.status.parse()?,
            failed_login_count: row.failed_login_count,
            lockout_until: row.lockout_until,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, username, email, phone, name, password_hash, role, status, \
                            failed_login_count, lockout_until, last_login_at, created_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, phone, name, password_hash, role, status,
                               failed_login_count, lockout_until, last_login_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(user.phone.as_deref())
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.failed_login_count)
        .bind(user.lockout_until)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_username_key") {
                        return UserError::UsernameAlreadyExists(
                            user.username.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        let email = user
                            .email
                            .as_ref()
                            .map(|e| e.as_str().to_string())
                            .unwrap_or_default();
                        return UserError::EmailAlreadyExists(email);
                    }
                    if db_err.constraint() == Some("users_phone_key") {
                        return UserError::PhoneAlreadyExists(
                            user.phone.clone().unwrap_or_default(),
                        );
                    }
                }
            }
            UserError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError> {
        // Single lookup for both identifier kinds; when the same string is
        // one user's username and another's email, the username match
        // sorts first.
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE username = $1 OR email = $1
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn record_login_success(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_login_count = 0, lockout_until = NULL, last_login_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn record_login_failure(
        &self,
        id: &UserId,
        lock_threshold: i32,
        lockout_until: DateTime<Utc>,
    ) -> Result<i32, UserError> {
        // Single conditional update: concurrent failures against the same
        // account cannot lose increments, and the lockout stamp rides the
        // same statement as the count that triggers it.
        let new_count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET failed_login_count = failed_login_count + 1,
                lockout_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN $3
                    ELSE lockout_until
                END
            WHERE id = $1
            RETURNING failed_login_count
            "#,
        )
        .bind(id.0)
        .bind(lock_threshold)
        .bind(lockout_until)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Database(e.to_string()))?
        .ok_or(UserError::NotFound(id.to_string()))?;

        Ok(new_count)
    }

    async fn set_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), UserError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id.0)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
