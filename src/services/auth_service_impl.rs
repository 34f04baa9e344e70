//! In-memory implementation of the `AuthService` trait.

use tokio::task;
use tracing::{info, warn};

use crate::credentials;
use crate::db::Store;
use crate::models::{NewUser, User};
use crate::services::auth_service::{AuthError, AuthService, Registration};

pub struct MemoryAuthService {
    store: Store,
}

impl MemoryAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl AuthService for MemoryAuthService {
    async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let username = registration.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }

        // Checked again under the store's write lock on insert.
        if self.store.get_user_by_username(&username).await.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password = registration.password;
        // scrypt is CPU and memory heavy; keep it off the async workers.
        let credential = task::spawn_blocking(move || credentials::derive(&password)).await??;

        let user = self
            .store
            .create_user(NewUser {
                username,
                credential,
                first_name: registration.first_name,
                last_name: registration.last_name,
            })
            .await?;

        metrics::counter!("auth_registrations_total").increment(1);
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // Stored usernames are trimmed at registration.
        let username = username.trim();
        let Some(user) = self.store.get_user_by_username(username).await else {
            metrics::counter!("auth_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials);
        };

        let record = user.credential.clone();
        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || record.verify(&password)).await??;

        if !is_valid {
            warn!(username = %username, "Failed login attempt");
            metrics::counter!("auth_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> Result<User, AuthError> {
        self.store.get_user(id).await.ok_or(AuthError::UserNotFound)
    }
}
