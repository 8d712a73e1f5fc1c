use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::AuthenticatedUser;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn issue_reset(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<IssueResetResponseData>, ApiError> {
    let target = UserId::from_string(&user_id)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    let issued = state
        .reset_service
        .issue_token(&identity.user_id, &target, Utc::now())
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        IssueResetResponseData {
            reset_token: issued.raw_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResetResponseData {
    pub reset_token: String,
}
