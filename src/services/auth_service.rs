//! Domain service for authentication and account administration.
//!
//! Handles login, self-registration, and the admin-only account operations.

use serde::Deserialize;
use thiserror::Error;

use crate::models::account::{Account, SessionUser};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Account {0} not found")]
    NotFound(i32),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm: Option<String>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and records the login time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username or a
    /// wrong password, and [`AuthError::AccountDisabled`] for a known but
    /// inactive account.
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError>;

    /// Creates a regular user account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for short credentials or a mismatched
    /// confirmation and [`AuthError::UsernameTaken`] for a duplicate.
    async fn register(&self, request: RegisterRequest) -> Result<SessionUser, AuthError>;

    /// Creates an admin account (CLI only).
    async fn create_admin(&self, username: &str, password: &str) -> Result<SessionUser, AuthError>;

    async fn list_accounts(&self) -> Result<Vec<Account>, AuthError>;

    /// Flips `is_active` and returns the new value.
    async fn toggle_active(&self, id: i32) -> Result<bool, AuthError>;

    /// Deletes an account on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] when `actor` targets their own account.
    async fn delete_account(&self, actor: &SessionUser, id: i32) -> Result<(), AuthError>;
}
