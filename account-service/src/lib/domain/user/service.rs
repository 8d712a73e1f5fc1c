use std::sync::Arc;

use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStatus;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Domain service for administrator-driven user provisioning.
///
/// New accounts are created with an Argon2 hash of a random secret that is
/// never returned to anyone, so the account cannot be logged into until a
/// password-reset token has been redeemed.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    password_hasher: auth::PasswordHasher,
}

impl UserService {
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Provision a new user account.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Database` - Database operation failed
    pub async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let placeholder_secret = auth::token::generate();
        let password_hash = self.password_hasher.hash(&placeholder_secret)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            phone: command.phone,
            name: command.name,
            password_hash,
            role: command.role,
            status: UserStatus::Active,
            failed_login_count: 0,
            lockout_until: None,
            last_login_at: None,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            role = %created_user.role,
            "User provisioned"
        );

        Ok(created_user)
    }

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Database operation failed
    pub async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError>;
            async fn record_login_success(&self, id: &UserId, now: DateTime<Utc>) -> Result<(), UserError>;
            async fn record_login_failure(
                &self,
                id: &UserId,
                lock_threshold: i32,
                lockout_until: DateTime<Utc>,
            ) -> Result<i32, UserError>;
            async fn set_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), UserError>;
        }
    }

    fn command(username: &str) -> CreateUserCommand {
        CreateUserCommand::new(
            Username::new(username.to_string()).unwrap(),
            None,
            None,
            "Test User".to_string(),
            Role::User,
        )
    }

    #[tokio::test]
    async fn test_create_user_stores_unusable_credential() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "newuser"
                    && user.password_hash.starts_with("$argon2")
                    && user.status == UserStatus::Active
                    && user.failed_login_count == 0
                    && user.lockout_until.is_none()
                    && user.last_login_at.is_none()
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(repository));

        let user = service.create_user(command("newuser")).await.unwrap();
        assert_eq!(user.username.as_str(), "newuser");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository));

        let result = service.create_user(command("taken")).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
