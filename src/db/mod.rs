use anyhow::Result;
use chrono::SecondsFormat;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;
pub mod session_store;

pub use repositories::note::Note;
pub use repositories::user::User;
pub use session_store::DbSessionStore;

/// RFC 3339 UTC timestamp with millisecond precision.
///
/// Fixed width, so stored values order lexically by time.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn note_repo(&self) -> repositories::note::NoteRepository {
        repositories::note::NoteRepository::new(self.conn.clone())
    }

    /// Session store sharing this connection pool.
    #[must_use]
    pub fn session_store(&self) -> DbSessionStore {
        DbSessionStore::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().username_exists(username).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(username, email, password_hash)
            .await
    }

    pub async fn verify_user_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo()
            .verify_credentials(username, password)
            .await
    }

    // ========================================================================
    // Notes
    // ========================================================================

    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.note_repo().list_all().await
    }

    pub async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        self.note_repo().get(id).await
    }

    pub async fn add_note(&self, title: &str, text: Option<&str>) -> Result<Note> {
        self.note_repo().add(title, text).await
    }

    pub async fn update_note(
        &self,
        id: &str,
        title: &str,
        text: Option<&str>,
    ) -> Result<Option<Note>> {
        self.note_repo().update(id, title, text).await
    }

    pub async fn remove_note(&self, id: &str) -> Result<bool> {
        self.note_repo().remove(id).await
    }

    pub async fn note_count(&self) -> Result<u64> {
        use sea_orm::{EntityTrait, PaginatorTrait};

        Ok(crate::entities::prelude::Notes::find()
            .count(&self.conn)
            .await?)
    }

    pub async fn user_count(&self) -> Result<u64> {
        use sea_orm::{EntityTrait, PaginatorTrait};

        Ok(crate::entities::prelude::Users::find()
            .count(&self.conn)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_have_fixed_width() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[tokio::test]
    async fn note_lifecycle() {
        let store = Store::new("sqlite::memory:").await.unwrap();

        let note = store.add_note("A", Some("B")).await.unwrap();
        assert_eq!(note.created_at, note.updated_at);

        let fetched = store.get_note(&note.id).await.unwrap().unwrap();
        assert_eq!(fetched, note);

        let updated = store
            .update_note(&note.id, "A2", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.text, None);
        assert!(updated.updated_at >= updated.created_at);

        assert!(store.remove_note(&note.id).await.unwrap());
        assert!(!store.remove_note(&note.id).await.unwrap());
        assert!(store.get_note(&note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_is_rejected_by_index() {
        let store = Store::new("sqlite::memory:").await.unwrap();

        let first = store
            .create_user("alice", "alice@example.com", "hash".to_string())
            .await
            .unwrap();
        assert!(first.is_some());

        let same_name = store
            .create_user("alice", "other@example.com", "hash".to_string())
            .await
            .unwrap();
        assert!(same_name.is_none());

        let same_email = store
            .create_user("bob", "alice@example.com", "hash".to_string())
            .await
            .unwrap();
        assert!(same_email.is_none());

        assert_eq!(store.user_count().await.unwrap(), 1);
    }
}
