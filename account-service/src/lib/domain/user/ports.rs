use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Persistence operations for the user aggregate.
///
/// The login-state methods are the only mutation paths for the lockout
/// fields; both are single-statement updates in the store so concurrent
/// logins against one account cannot lose counter increments.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PhoneAlreadyExists` - Phone is already registered
    /// * `Database` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Resolve a login identifier to a user in a single lookup.
    ///
    /// Matches username or email; when the same string matches one user's
    /// username and another's email, the username match wins.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError>;

    /// Record a successful login: zero the failure counter, clear the
    /// lockout timestamp, and stamp `last_login_at`.
    async fn record_login_success(&self, id: &UserId, now: DateTime<Utc>)
        -> Result<(), UserError>;

    /// Record a failed login attempt.
    ///
    /// Increments `failed_login_count` and, when the incremented count
    /// reaches `lock_threshold`, sets `lockout_until` in the same update.
    ///
    /// # Returns
    /// The incremented failure count.
    async fn record_login_failure(
        &self,
        id: &UserId,
        lock_threshold: i32,
        lockout_until: DateTime<Utc>,
    ) -> Result<i32, UserError>;

    /// Replace the stored credential hash.
    async fn set_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), UserError>;
}
