use crate::entities::{notes, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use tracing::{debug, info};

/// Repository for note operations
pub struct NoteRepository {
    conn: DatabaseConnection,
}

impl NoteRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_note_model(n: notes::Model) -> Note {
        Note {
            id: n.id,
            title: n.title,
            text: n.text,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Note>> {
        let rows = Notes::find()
            .order_by_asc(notes::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list notes")?;

        Ok(rows.into_iter().map(Self::map_note_model).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Note>> {
        let row = Notes::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query note {id}"))?;

        Ok(row.map(Self::map_note_model))
    }

    /// Creation and modification timestamps start out identical.
    pub async fn add(&self, title: &str, text: Option<&str>) -> Result<Note> {
        let now = crate::db::timestamp_now();
        let note = Note {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            text: text.map(str::to_string),
            created_at: now.clone(),
            updated_at: now,
        };

        let active_model = notes::ActiveModel {
            id: Set(note.id.clone()),
            title: Set(note.title.clone()),
            text: Set(note.text.clone()),
            created_at: Set(note.created_at.clone()),
            updated_at: Set(note.updated_at.clone()),
        };

        Notes::insert(active_model)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert note")?;

        info!("Created note {}", note.id);
        Ok(note)
    }

    /// Replace title and text. `None` text clears the stored body.
    pub async fn update(&self, id: &str, title: &str, text: Option<&str>) -> Result<Option<Note>> {
        let Some(existing) = Notes::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query note {id}"))?
        else {
            return Ok(None);
        };

        let mut active: notes::ActiveModel = existing.into();
        active.title = Set(title.to_string());
        active.text = Set(text.map(str::to_string));
        active.updated_at = Set(crate::db::timestamp_now());

        let updated = Self::updated_row(active.update(&self.conn).await, id)?;
        if updated.is_some() {
            debug!("Updated note {id}");
        }
        Ok(updated)
    }

    /// A row deleted between the lookup and the write reads as a missing note.
    fn updated_row(result: Result<notes::Model, DbErr>, id: &str) -> Result<Option<Note>> {
        match result {
            Ok(model) => Ok(Some(Self::map_note_model(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to update note {id}")),
        }
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = Notes::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete note {id}"))?;

        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub text: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
