use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;

/// Server-side session record binding an opaque bearer token to a user.
///
/// Immutable once created: the only lifecycle operations are create and
/// delete (logout or expiry sweep). A user may hold any number of
/// concurrent sessions.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Opaque session identifier.
///
/// The identifier doubles as the bearer token, so it is drawn from the
/// same 32-byte random space as reset tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh unguessable session id.
    pub fn generate() -> Self {
        Self(auth::token::generate())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub user_id: UserId,
    pub session_id: SessionId,
}

/// Identity attached to a request once its session has been resolved.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}
