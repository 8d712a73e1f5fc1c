use thiserror::Error;

use crate::user::errors::UserError;

/// Error type for login, logout, and session resolution.
///
/// The variants are distinguished for server-side logging only; the HTTP
/// layer collapses `InvalidCredentials`, `AccountLocked`, and
/// `AccountDisabled` into one generic client message so responses cannot
/// be used to enumerate accounts.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is locked")]
    AccountLocked,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Database(msg) => AuthError::Database(msg),
            other => AuthError::Database(other.to_string()),
        }
    }
}
