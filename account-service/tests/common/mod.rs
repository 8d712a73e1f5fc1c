use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::auth::errors::AuthError;
use account_service::domain::auth::models::Session;
use account_service::domain::auth::models::SessionId;
use account_service::domain::auth::ports::SessionRepository;
use account_service::domain::auth::service::AuthService;
use account_service::domain::reset::errors::ResetError;
use account_service::domain::reset::models::PasswordResetToken;
use account_service::domain::reset::ports::PasswordResetTokenRepository;
use account_service::domain::reset::service::PasswordResetService;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::Role;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::models::UserStatus;
use account_service::domain::user::models::Username;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::user::errors::UserError;
use account_service::user::ports::UserRepository;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

/// In-memory user store mirroring the Postgres repository's semantics,
/// including the single-step conditional failure increment.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(&id.0).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        for existing in users.values() {
            if existing.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if existing.email.is_some() && existing.email == user.email {
                let email = user
                    .email
                    .as_ref()
                    .map(|e| e.as_str().to_string())
                    .unwrap_or_default();
                return Err(UserError::EmailAlreadyExists(email));
            }
            if existing.phone.is_some() && existing.phone == user.phone {
                return Err(UserError::PhoneAlreadyExists(
                    user.phone.clone().unwrap_or_default(),
                ));
            }
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        let by_username = users
            .values()
            .find(|u| u.username.as_str() == identifier)
            .cloned();
        if by_username.is_some() {
            return Ok(by_username);
        }
        Ok(users
            .values()
            .find(|u| u.email.as_ref().map(|e| e.as_str()) == Some(identifier))
            .cloned())
    }

    async fn record_login_success(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id.0)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.failed_login_count = 0;
        user.lockout_until = None;
        user.last_login_at = Some(now);
        Ok(())
    }

    async fn record_login_failure(
        &self,
        id: &UserId,
        lock_threshold: i32,
        lockout_until: DateTime<Utc>,
    ) -> Result<i32, UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id.0)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.failed_login_count += 1;
        if user.failed_login_count >= lock_threshold {
            user.lockout_until = Some(lockout_until);
        }
        Ok(user.failed_login_count)
    }

    async fn set_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id.0)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    pub fn count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, AuthError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.as_str().to_string(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.lock().unwrap().get(id.as_str()).cloned())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), AuthError> {
        self.sessions.lock().unwrap().remove(id.as_str());
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryResetTokenRepository {
    tokens: Mutex<Vec<PasswordResetToken>>,
}

#[async_trait]
impl PasswordResetTokenRepository for InMemoryResetTokenRepository {
    async fn create(
        &self,
        token: PasswordResetToken,
    ) -> Result<PasswordResetToken, ResetError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, ResetError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn mark_used(&self, id: &Uuid, used_at: DateTime<Utc>) -> Result<(), ResetError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| ResetError::Database(format!("no such token: {id}")))?;
        token.used_at = Some(used_at);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ResetError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.expires_at > now);
        Ok((before - tokens.len()) as u64)
    }
}

/// Test application running the real router over in-memory stores.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub tokens: Arc<InMemoryResetTokenRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let sessions = Arc::new(InMemorySessionRepository::default());
        let tokens = Arc::new(InMemoryResetTokenRepository::default());

        let session_ttl = Duration::hours(24);
        let state = AppState {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                sessions.clone(),
                session_ttl,
            )),
            reset_service: Arc::new(PasswordResetService::new(
                users.clone(),
                tokens.clone(),
                Duration::minutes(60),
            )),
            user_service: Arc::new(UserService::new(users.clone())),
            users: users.clone(),
            sessions: sessions.clone(),
            session_ttl_secs: session_ttl.num_seconds(),
        };

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            sessions,
            tokens,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Insert a user with a known password directly into the store.
    pub async fn seed_user(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: Role,
    ) -> UserId {
        let hasher = auth::PasswordHasher::new();
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: email.map(|e| EmailAddress::new(e.to_string()).unwrap()),
            phone: None,
            name: username.to_string(),
            password_hash: hasher.hash(password).unwrap(),
            role,
            status: UserStatus::Active,
            failed_login_count: 0,
            lockout_until: None,
            last_login_at: None,
            created_at: Utc::now(),
        };
        self.users.create(user).await.unwrap().id
    }

    /// Log in and return the session id from the response body.
    pub async fn login_session(&self, identifier: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["sessionId"].as_str().unwrap().to_string()
    }
}
