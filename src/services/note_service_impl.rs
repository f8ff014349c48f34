//! `SeaORM` implementation of the `NoteService` trait.

use crate::db::{Note, Store};
use crate::services::note_service::{NoteError, NoteService};
use async_trait::async_trait;
use uuid::Uuid;

pub struct SeaOrmNoteService {
    store: Store,
}

impl SeaOrmNoteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NoteService for SeaOrmNoteService {
    async fn list(&self) -> Result<Vec<Note>, NoteError> {
        Ok(self.store.list_notes().await?)
    }

    async fn get(&self, id: Uuid) -> Result<Note, NoteError> {
        self.store
            .get_note(&id.to_string())
            .await?
            .ok_or(NoteError::NotFound(id))
    }

    async fn create(&self, title: &str, text: Option<&str>) -> Result<Note, NoteError> {
        Ok(self.store.add_note(title, text).await?)
    }

    async fn update(&self, id: Uuid, title: &str, text: Option<&str>) -> Result<Note, NoteError> {
        self.store
            .update_note(&id.to_string(), title, text)
            .await?
            .ok_or(NoteError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), NoteError> {
        if self.store.remove_note(&id.to_string()).await? {
            Ok(())
        } else {
            Err(NoteError::NotFound(id))
        }
    }
}
