use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionId;

/// Persistence operations for sessions.
///
/// Sessions are create/delete only. Expired rows are removed by the
/// periodic sweep, never by the lookup path.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session.
    ///
    /// Id uniqueness is enforced by the store; the id space is large
    /// enough that collisions are not retried.
    async fn create(&self, session: Session) -> Result<Session, AuthError>;

    /// Retrieve a session by id.
    ///
    /// # Returns
    /// Optional session (None if not found). Expiry is NOT checked here;
    /// callers compare `expires_at` against their own `now`.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, AuthError>;

    /// Delete a session. Deleting a session that does not exist is not an
    /// error.
    async fn delete(&self, id: &SessionId) -> Result<(), AuthError>;

    /// Delete all sessions with `expires_at <= now`.
    ///
    /// # Returns
    /// Number of sessions removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}
