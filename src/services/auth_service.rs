//! Domain service for registration and authentication.

use thiserror::Error;

use crate::credentials::CredentialError;
use crate::db::StoreError;
use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => Self::UsernameTaken,
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Hashing task failed: {err}"))
    }
}

/// Registration input as received from the client.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Hashes the password and stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username is already registered.
    async fn register(&self, registration: Registration) -> Result<User, AuthError>;

    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Looks up a user by id.
    async fn get_user(&self, id: i32) -> Result<User, AuthError>;
}
