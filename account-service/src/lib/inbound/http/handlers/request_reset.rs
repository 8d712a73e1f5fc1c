use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Always answers 200 so the response cannot reveal whether the
/// identifier maps to an account. Store failures are logged and swallowed
/// for the same reason.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<RequestResetBody>,
) -> Result<ApiSuccess<RequestResetResponseData>, ApiError> {
    if let Err(e) = state
        .reset_service
        .acknowledge_request(&body.identifier)
        .await
    {
        tracing::error!("Failed to record password reset request: {e}");
    }

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RequestResetResponseData {
            message: "If the account exists, an administrator has been notified".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestResetBody {
    identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestResetResponseData {
    pub message: String,
}
