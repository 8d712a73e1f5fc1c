use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn confirm_reset(
    State(state): State<AppState>,
    Json(body): Json<ConfirmResetBody>,
) -> Result<ApiSuccess<ConfirmResetResponseData>, ApiError> {
    validate_password_strength(&body.new_password).map_err(ApiError::BadRequest)?;

    state
        .reset_service
        .reset_password(&body.token, &body.new_password, Utc::now())
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ConfirmResetResponseData {
            message: "Password updated".to_string(),
        },
    ))
}

/// Strength policy enforced here so the reset service can assume a
/// pre-validated password.
fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err("Password must contain at least one letter and one digit".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResetBody {
    token: String,
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmResetResponseData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength_policy() {
        assert!(validate_password_strength("NewPass12!").is_ok());
        assert!(validate_password_strength("abcdef1g").is_ok());

        // Too short
        assert!(validate_password_strength("Ab1!").is_err());
        // No digit
        assert!(validate_password_strength("abcdefgh").is_err());
        // No letter
        assert!(validate_password_strength("12345678").is_err());
    }
}
