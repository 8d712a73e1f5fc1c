use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::SESSION_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<Response, ApiError> {
    let outcome = state
        .auth_service
        .login(&body.identifier, &body.password, Utc::now())
        .await
        .map_err(ApiError::from)?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        outcome.session_id.as_str(),
        state.session_ttl_secs,
    );

    let success = ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user_id: outcome.user_id.to_string(),
            // Also returned in the body for header-based API clients.
            session_id: outcome.session_id.as_str().to_string(),
        },
    );

    Ok(([(header::SET_COOKIE, cookie)], success).into_response())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    identifier: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub user_id: String,
    pub session_id: String,
}
