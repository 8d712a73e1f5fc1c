use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::auth::ports::SessionRepository;
use account_service::domain::auth::service::AuthService;
use account_service::domain::reset::ports::PasswordResetTokenRepository;
use account_service::domain::reset::service::PasswordResetService;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::outbound::repositories::PostgresResetTokenRepository;
use account_service::outbound::repositories::PostgresSessionRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use chrono::Duration;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// How often the expiry sweep runs. Expired rows are inert in between;
/// the sweep only reclaims storage.
const SWEEP_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        session_ttl_hours = config.auth.session_ttl_hours,
        reset_token_ttl_minutes = config.auth.reset_token_ttl_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository: Arc<PostgresUserRepository> =
        Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let session_repository: Arc<PostgresSessionRepository> =
        Arc::new(PostgresSessionRepository::new(pg_pool.clone()));
    let token_repository: Arc<PostgresResetTokenRepository> =
        Arc::new(PostgresResetTokenRepository::new(pg_pool));

    let session_ttl = Duration::hours(config.auth.session_ttl_hours);
    let token_ttl = Duration::minutes(config.auth.reset_token_ttl_minutes);

    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        session_repository.clone(),
        session_ttl,
    ));
    let reset_service = Arc::new(PasswordResetService::new(
        user_repository.clone(),
        token_repository.clone(),
        token_ttl,
    ));
    let user_service = Arc::new(UserService::new(user_repository.clone()));

    let state = AppState {
        auth_service,
        reset_service,
        user_service,
        users: user_repository,
        sessions: session_repository.clone(),
        session_ttl_secs: session_ttl.num_seconds(),
    };

    spawn_expiry_sweeper(session_repository, token_repository);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}

/// Periodic garbage collection for expired sessions and reset tokens.
///
/// Runs on its own schedule with no coordination: deleting an
/// already-expired row changes nothing the request path can observe.
fn spawn_expiry_sweeper(
    sessions: Arc<PostgresSessionRepository>,
    tokens: Arc<PostgresResetTokenRepository>,
) {
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            let now = Utc::now();

            match sessions.delete_expired(now).await {
                Ok(deleted) if deleted > 0 => {
                    tracing::debug!(deleted, "Expired sessions swept");
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Session sweep failed: {e}"),
            }

            match tokens.delete_expired(now).await {
                Ok(deleted) if deleted > 0 => {
                    tracing::debug!(deleted, "Expired reset tokens swept");
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Reset token sweep failed: {e}"),
            }
        }
    });
}
