use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::AuthenticatedUser;

pub async fn current_identity(
    Extension(identity): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<IdentityResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        IdentityResponseData {
            user_id: identity.user_id.to_string(),
            username: identity.username,
            role: identity.role.as_str().to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponseData {
    pub user_id: String,
    pub username: String,
    pub role: String,
}
