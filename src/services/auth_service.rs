//! Domain service for accounts: signup, credential checks and session user lookup.
//!
//! Session bookkeeping itself stays in the HTTP layer; this service only
//! decides who the caller is.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already taken. Please choose a different one or log in instead.")]
    UsernameTaken,

    #[error("A user with this email address already exists. Please log in instead.")]
    EmailTaken,

    /// Deliberately covers both unknown usernames and wrong passwords.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new account after checking username and email are free.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] or [`AuthError::EmailTaken`] on collision.
    async fn signup(&self, username: &str, email: &str, password: &str)
    -> Result<User, AuthError>;

    /// Verifies credentials and returns the matching user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong password alike.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Loads the user a session points at.
    async fn get_user(&self, user_id: &str) -> Result<User, AuthError>;
}
