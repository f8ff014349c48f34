//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::db::repositories::user::hash_password;
use crate::services::auth_service::{AuthError, AuthService};
use anyhow::Context;
use async_trait::async_trait;
use tokio::task;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if self.store.username_exists(username).await? {
            return Err(AuthError::UsernameTaken);
        }

        if self.store.email_exists(email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = password.to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        // A concurrent signup can still win the race between the checks above
        // and this insert; the unique indexes catch it.
        let Some(user) = self
            .store
            .create_user(username, email, password_hash)
            .await?
        else {
            return Err(if self.store.username_exists(username).await? {
                AuthError::UsernameTaken
            } else {
                AuthError::EmailTaken
            });
        };

        info!(user_id = %user.id, "New account registered: {}", user.username);
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        self.store
            .verify_user_credentials(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn get_user(&self, user_id: &str) -> Result<User, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmAuthService {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let security = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        SeaOrmAuthService::new(store, security)
    }

    #[tokio::test]
    async fn signup_then_login() {
        let auth = service().await;
        let created = auth.signup("alice", "alice@example.com", "pw").await.unwrap();

        let logged_in = auth.login("alice", "pw").await.unwrap();
        assert_eq!(logged_in, created);
        assert_eq!(auth.get_user(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn signup_conflicts_are_distinguished() {
        let auth = service().await;
        auth.signup("alice", "alice@example.com", "pw").await.unwrap();

        assert!(matches!(
            auth.signup("alice", "new@example.com", "pw").await,
            Err(AuthError::UsernameTaken)
        ));
        assert!(matches!(
            auth.signup("bob", "alice@example.com", "pw").await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let auth = service().await;
        auth.signup("alice", "alice@example.com", "pw").await.unwrap();

        let wrong_password = auth.login("alice", "nope").await.unwrap_err();
        let unknown_user = auth.login("mallory", "pw").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn unknown_session_user() {
        let auth = service().await;
        assert!(matches!(
            auth.get_user("00000000-0000-0000-0000-000000000000").await,
            Err(AuthError::UserNotFound)
        ));
    }
}
