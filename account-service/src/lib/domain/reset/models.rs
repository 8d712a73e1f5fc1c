use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::UserId;

/// Administrator-issued, single-use, time-limited password-reset token.
///
/// Only the SHA-256 digest of the raw secret is persisted; the raw value
/// exists exactly once, in the return value of
/// [`crate::domain::reset::service::PasswordResetService::issue_token`].
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub created_by_user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Whether the token can still be redeemed at `now`.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && now < self.expires_at
    }
}

/// Result of issuing a reset token. Carries the raw secret for
/// out-of-band delivery by the caller.
#[derive(Debug)]
pub struct IssuedReset {
    pub raw_token: String,
}
