//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{CreateAccount, Store};
use crate::models::account::{Account, Role, SessionUser};
use crate::services::auth_service::{
    AuthError, AuthService, MIN_PASSWORD_CHARS, MIN_USERNAME_CHARS, RegisterRequest,
};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
        if username.chars().count() < MIN_USERNAME_CHARS {
            return Err(AuthError::Validation(format!(
                "Username must be at least {MIN_USERNAME_CHARS} characters"
            )));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        Ok(())
    }

    async fn create(&self, username: &str, password: &str, role: Role) -> Result<SessionUser, AuthError> {
        match self
            .store
            .create_account(username, password, role, &self.security)
            .await?
        {
            CreateAccount::Created(id) => {
                info!(id, username, %role, "Account created");
                Ok(SessionUser {
                    id,
                    username: username.to_string(),
                    role,
                })
            }
            CreateAccount::UsernameTaken => Err(AuthError::UsernameTaken(username.to_string())),
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let Some((account, password_hash)) =
            self.store.get_account_with_password(username).await?
        else {
            info!(username, "Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !account.is_active {
            info!(username, "Login refused: account disabled");
            return Err(AuthError::AccountDisabled);
        }

        if !self
            .store
            .verify_account_password(password_hash, password)
            .await?
        {
            info!(username, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.store.touch_last_login(account.id).await?;
        info!(id = account.id, username, "User logged in");

        Ok(SessionUser::from(&account))
    }

    async fn register(&self, request: RegisterRequest) -> Result<SessionUser, AuthError> {
        let username = request.username.trim();
        Self::validate_credentials(username, &request.password)?;

        if let Some(confirm) = &request.confirm
            && confirm != &request.password
        {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        self.create(username, &request.password, Role::User).await
    }

    async fn create_admin(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        let username = username.trim();
        Self::validate_credentials(username, password)?;
        self.create(username, password, Role::Admin).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AuthError> {
        Ok(self.store.list_accounts().await?)
    }

    async fn toggle_active(&self, id: i32) -> Result<bool, AuthError> {
        let account = self
            .store
            .get_account(id)
            .await?
            .ok_or(AuthError::NotFound(id))?;

        let is_active = !account.is_active;
        if !self.store.set_account_active(id, is_active).await? {
            return Err(AuthError::NotFound(id));
        }

        info!(id, username = %account.username, is_active, "Account active flag toggled");
        Ok(is_active)
    }

    async fn delete_account(&self, actor: &SessionUser, id: i32) -> Result<(), AuthError> {
        if actor.id == id {
            warn!(id, "Admin attempted to delete own account");
            return Err(AuthError::Forbidden(
                "Cannot delete your own account".to_string(),
            ));
        }

        if !self.store.delete_account(id).await? {
            return Err(AuthError::NotFound(id));
        }

        info!(id, by = %actor.username, "Account deleted");
        Ok(())
    }
}
