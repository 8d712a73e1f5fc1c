use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin_create_user::create_user;
use super::handlers::admin_issue_reset::issue_reset;
use super::handlers::confirm_reset::confirm_reset;
use super::handlers::current_identity::current_identity;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::request_reset::request_reset;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::auth::ports::SessionRepository;
use crate::domain::auth::service::AuthService;
use crate::domain::reset::service::PasswordResetService;
use crate::domain::user::service::UserService;
use crate::user::ports::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub reset_service: Arc<PasswordResetService>,
    pub user_service: Arc<UserService>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub session_ttl_secs: i64,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/reset/request", post(request_reset))
        .route("/api/auth/reset/confirm", post(confirm_reset));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(current_identity))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers run outermost-first: session resolution, then the role tier.
    let admin_routes = Router::new()
        .route("/api/admin/users", post(create_user))
        .route("/api/admin/users/:user_id/reset", post(issue_reset))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
