use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::Utc;

use crate::domain::auth::models::AuthenticatedUser;
use crate::domain::auth::models::SessionId;
use crate::domain::user::models::Role;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Header carrying the session id. Takes precedence over the cookie.
pub const SESSION_HEADER: &str = "x-session-id";

/// Cookie carrying the session id for browser clients.
pub const SESSION_COOKIE: &str = "session_id";

/// Middleware resolving the request's session to a user identity.
///
/// Fails closed with 401 at every step: no session id, unknown session,
/// expired session, or a session whose user no longer exists (sessions
/// should never outlive their user, but the store is not trusted on it).
/// Expired sessions are left in place; the periodic sweep deletes them.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let session_id = extract_session_id(req.headers()).ok_or_else(|| {
        ApiError::Unauthorized("Authentication required".to_string()).into_response()
    })?;

    let now = Utc::now();
    let session = state
        .sessions
        .find_by_id(&SessionId::new(session_id))
        .await
        .map_err(|e| ApiError::from(e).into_response())?
        .filter(|session| now < session.expires_at)
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid or expired session".to_string()).into_response()
        })?;

    let user = state
        .users
        .find_by_id(&session.user_id)
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()).into_response())?
        .ok_or_else(|| {
            tracing::warn!(
                user_id = %session.user_id,
                "Session resolved to a missing user"
            );
            ApiError::Unauthorized("Invalid or expired session".to_string()).into_response()
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username.as_str().to_string(),
        role: user.role,
    });

    Ok(next.run(req).await)
}

/// Second-tier check for admin-only routes. Runs after `authenticate`.
///
/// 403 distinguishes "authenticated but forbidden" from the 401 the
/// authentication tier produces.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    match req.extensions().get::<AuthenticatedUser>() {
        Some(identity) if identity.role == Role::Admin => Ok(next.run(req).await),
        Some(identity) => {
            tracing::debug!(user_id = %identity.user_id, "Admin route denied");
            Err(ApiError::Forbidden("Administrator role required".to_string()).into_response())
        }
        None => Err(ApiError::Unauthorized("Authentication required".to_string()).into_response()),
    }
}

/// Extract the session id from the request.
///
/// The `x-session-id` header wins over the `session_id` cookie when both
/// are present.
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(SESSION_HEADER) {
        if let Ok(value) = value.to_str() {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    let cookie_header = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
