use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::reset::errors::ResetError;
use crate::domain::reset::models::IssuedReset;
use crate::domain::reset::models::PasswordResetToken;
use crate::domain::reset::ports::PasswordResetTokenRepository;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Domain service for the password-reset lifecycle.
///
/// Issuance is administrator-initiated; redemption is the only path that
/// changes a password without knowing the old one. The raw secret is never
/// persisted and never logged.
pub struct PasswordResetService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn PasswordResetTokenRepository>,
    password_hasher: auth::PasswordHasher,
    token_ttl: Duration,
}

impl PasswordResetService {
    /// Create a new password-reset service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `tokens` - Token persistence implementation
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn PasswordResetTokenRepository>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            password_hasher: auth::PasswordHasher::new(),
            token_ttl,
        }
    }

    /// Issue a reset token for `target` on behalf of `issued_by`.
    ///
    /// The returned raw secret is the caller's to deliver out-of-band;
    /// only its digest is stored.
    ///
    /// # Errors
    /// * `UserNotFound` - Target user does not exist
    /// * `Database` - Store operation failed
    pub async fn issue_token(
        &self,
        issued_by: &UserId,
        target: &UserId,
        now: DateTime<Utc>,
    ) -> Result<IssuedReset, ResetError> {
        let user = self
            .users
            .find_by_id(target)
            .await?
            .ok_or(ResetError::UserNotFound(target.to_string()))?;

        let raw_token = auth::token::generate();
        let record = PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_by_user_id: *issued_by,
            token_hash: auth::token::digest(&raw_token),
            expires_at: now + self.token_ttl,
            used_at: None,
            created_at: now,
        };
        self.tokens.create(record).await?;

        tracing::info!(
            target_user_id = %user.id,
            issued_by = %issued_by,
            "Password reset token issued"
        );

        Ok(IssuedReset { raw_token })
    }

    /// Redeem a reset token and set a new password.
    ///
    /// Strength policy is the route layer's concern; by the time this
    /// runs the password has already been validated. The token is
    /// consumed first and stays consumed even if the credential write
    /// fails afterwards: strict single-use, not retry-on-error. Used and
    /// expired tokens are rejected with the same error as unknown ones.
    ///
    /// # Errors
    /// * `InvalidToken` - Unknown, already used, or expired token
    /// * `Password` - Hashing the new password failed
    /// * `Database` - Store operation failed
    pub async fn reset_password(
        &self,
        raw_token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ResetError> {
        let token = self
            .tokens
            .find_by_hash(&auth::token::digest(raw_token))
            .await?
            .ok_or(ResetError::InvalidToken)?;

        if !token.is_redeemable(now) {
            tracing::info!(
                token_id = %token.id,
                user_id = %token.user_id,
                "Reset token rejected: used or expired"
            );
            return Err(ResetError::InvalidToken);
        }

        self.tokens.mark_used(&token.id, now).await?;

        let password_hash = self.password_hasher.hash(new_password)?;
        self.users
            .set_password_hash(&token.user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %token.user_id, "Password reset completed");

        Ok(())
    }

    /// Acknowledge a self-service reset request.
    ///
    /// Token issuance stays administrator-initiated; this only records
    /// that a request happened. The route layer answers 200 either way,
    /// so nothing here may influence the response.
    pub async fn acknowledge_request(&self, identifier: &str) -> Result<(), ResetError> {
        match self.users.find_by_identifier(identifier).await? {
            Some(user) => {
                tracing::info!(
                    user_id = %user.id,
                    "Password reset requested; awaiting administrator issuance"
                );
            }
            None => {
                tracing::debug!("Password reset requested for unknown identifier");
            }
        }
        Ok(())
    }
}
