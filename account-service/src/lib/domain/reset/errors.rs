use thiserror::Error;

use crate::user::errors::UserError;

/// Error type for password-reset issuance and redemption.
///
/// `InvalidToken` deliberately covers not-found, already-used, and
/// expired: the redeemer learns nothing about which condition failed.
#[derive(Debug, Clone, Error)]
pub enum ResetError {
    #[error("Invalid, expired, or already used reset token")]
    InvalidToken,

    #[error("Target user not found: {0}")]
    UserNotFound(String),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UserError> for ResetError {
    fn from(err: UserError) -> Self {
        ResetError::Database(err.to_string())
    }
}
