use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginSuccess;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionId;
use crate::domain::auth::ports::SessionRepository;
use crate::domain::user::models::UserStatus;
use crate::user::ports::UserRepository;

/// Consecutive failed logins that trigger a lockout window.
const MAX_FAILED_LOGINS: i32 = 5;

/// Length of the lockout window once triggered.
const LOCKOUT_WINDOW_MINUTES: i64 = 15;

/// Domain service orchestrating login and logout.
///
/// Stateless over injected stores; all lockout state lives on the user
/// row and is mutated through single-statement repository updates.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    password_hasher: auth::PasswordHasher,
    session_ttl: Duration,
}

impl AuthService {
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `sessions` - Session persistence implementation
    /// * `session_ttl` - Fixed lifetime for newly issued sessions
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            password_hasher: auth::PasswordHasher::new(),
            session_ttl,
        }
    }

    /// Authenticate a user and issue a session.
    ///
    /// Resolution tries username and email through a single store lookup;
    /// username wins when both match. An unknown identifier, a wrong
    /// password, a disabled account, and an account inside its lockout
    /// window all fail with variants that differ for logging; the HTTP
    /// layer presents them identically.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password
    /// * `AccountLocked` - Status LOCKED, or inside the lockout window
    /// * `AccountDisabled` - Status DISABLED
    /// * `Database` - Store operation failed
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginSuccess, AuthError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        match user.status {
            UserStatus::Active => {}
            UserStatus::Disabled => {
                tracing::info!(user_id = %user.id, "Login rejected: account disabled");
                return Err(AuthError::AccountDisabled);
            }
            UserStatus::Locked => {
                tracing::info!(user_id = %user.id, "Login rejected: account locked");
                return Err(AuthError::AccountLocked);
            }
        }

        // Inside the lockout window: reject before any hashing work, and
        // without touching the counters (a denied attempt must not extend
        // the window).
        if let Some(lockout_until) = user.lockout_until {
            if now < lockout_until {
                tracing::info!(
                    user_id = %user.id,
                    lockout_until = %lockout_until,
                    "Login rejected: account in lockout window"
                );
                return Err(AuthError::AccountLocked);
            }
        }

        if self.password_hasher.verify(password, &user.password_hash) {
            self.users.record_login_success(&user.id, now).await?;

            let session = Session {
                id: SessionId::generate(),
                user_id: user.id,
                expires_at: now + self.session_ttl,
                created_at: now,
            };
            let session = self.sessions.create(session).await?;

            tracing::info!(user_id = %user.id, "Login succeeded");

            Ok(LoginSuccess {
                user_id: user.id,
                session_id: session.id,
            })
        } else {
            let failed_count = self
                .users
                .record_login_failure(
                    &user.id,
                    MAX_FAILED_LOGINS,
                    now + Duration::minutes(LOCKOUT_WINDOW_MINUTES),
                )
                .await?;

            if failed_count >= MAX_FAILED_LOGINS {
                tracing::warn!(
                    user_id = %user.id,
                    failed_login_count = failed_count,
                    "Account lockout triggered"
                );
            }

            Err(AuthError::InvalidCredentials)
        }
    }

    /// Destroy a session.
    ///
    /// Idempotent: logging out a session that does not exist (or was
    /// already deleted) succeeds.
    pub async fn logout(&self, session_id: &SessionId) -> Result<(), AuthError> {
        self.sessions.delete(session_id).await
    }
}
