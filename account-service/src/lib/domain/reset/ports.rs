use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::reset::errors::ResetError;
use crate::domain::reset::models::PasswordResetToken;

/// Persistence operations for password-reset tokens.
#[async_trait]
pub trait PasswordResetTokenRepository: Send + Sync + 'static {
    /// Persist a new token record.
    async fn create(&self, token: PasswordResetToken)
        -> Result<PasswordResetToken, ResetError>;

    /// Look up a token by the digest of its raw secret.
    ///
    /// # Returns
    /// Optional token record (None if no such digest). Used/expired
    /// records are returned as-is; redemption rules live in the service.
    async fn find_by_hash(&self, token_hash: &str)
        -> Result<Option<PasswordResetToken>, ResetError>;

    /// Stamp a token as redeemed.
    async fn mark_used(&self, id: &Uuid, used_at: DateTime<Utc>) -> Result<(), ResetError>;

    /// Delete all tokens with `expires_at <= now`.
    ///
    /// # Returns
    /// Number of tokens removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ResetError>;
}
