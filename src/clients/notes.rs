//! Typed HTTP client for the notes API.
//!
//! Every call funnels through [`NotesClient::fetch`], which turns non-2xx
//! responses into [`ClientError::Api`] carrying the server's error message.
//! The session cookie set by signup/login is kept in the client's cookie jar.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::api::{ErrorBody, NoteDto, UserDto};
use crate::constants::http::USER_AGENT;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a failure status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::Url(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotesClient {
    client: Client,
    base_url: Url,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Send `request`, turning failure statuses into [`ClientError::Api`].
    ///
    /// The error message comes from the JSON `error` field, falling back to
    /// the raw body or the status reason when the body is not JSON.
    pub async fn fetch(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, "Request failed: {body}");

        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if !body.trim().is_empty() => body,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };

        Err(ClientError::Api { status, message })
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_logged_in_user(&self) -> Result<UserDto, ClientError> {
        let url = self.endpoint("api/users/")?;
        let response = self.fetch(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<UserDto, ClientError> {
        let url = self.endpoint("api/users/signup")?;
        let response = self.fetch(self.client.post(url).json(credentials)).await?;
        Ok(response.json().await?)
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserDto, ClientError> {
        let url = self.endpoint("api/users/login")?;
        let response = self.fetch(self.client.post(url).json(credentials)).await?;
        Ok(response.json().await?)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = self.endpoint("api/users/logout")?;
        self.fetch(self.client.post(url)).await?;
        Ok(())
    }

    // ========================================================================
    // Notes
    // ========================================================================

    pub async fn fetch_notes(&self) -> Result<Vec<NoteDto>, ClientError> {
        let url = self.endpoint("api/notes")?;
        let response = self.fetch(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    pub async fn fetch_note(&self, note_id: &str) -> Result<NoteDto, ClientError> {
        let url = self.endpoint(&format!("api/notes/{note_id}"))?;
        let response = self.fetch(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    pub async fn create_note(&self, note: &NoteInput) -> Result<NoteDto, ClientError> {
        let url = self.endpoint("api/notes")?;
        let response = self.fetch(self.client.post(url).json(note)).await?;
        Ok(response.json().await?)
    }

    pub async fn update_note(&self, note_id: &str, note: &NoteInput) -> Result<NoteDto, ClientError> {
        let url = self.endpoint(&format!("api/notes/{note_id}"))?;
        let response = self.fetch(self.client.patch(url).json(note)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_note(&self, note_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("api/notes/{note_id}"))?;
        self.fetch(self.client.delete(url)).await?;
        Ok(())
    }
}
