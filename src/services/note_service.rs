//! Domain service for notes.

use thiserror::Error;
use uuid::Uuid;

use crate::db::Note;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Note not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for NoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for note CRUD.
///
/// Ids arrive already parsed; malformed ids are rejected at the HTTP edge.
#[async_trait::async_trait]
pub trait NoteService: Send + Sync {
    async fn list(&self) -> Result<Vec<Note>, NoteError>;

    async fn get(&self, id: Uuid) -> Result<Note, NoteError>;

    async fn create(&self, title: &str, text: Option<&str>) -> Result<Note, NoteError>;

    /// Replaces title and text and bumps `updated_at`.
    async fn update(&self, id: Uuid, title: &str, text: Option<&str>) -> Result<Note, NoteError>;

    async fn delete(&self, id: Uuid) -> Result<(), NoteError>;
}
