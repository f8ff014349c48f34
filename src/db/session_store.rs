//! Database-backed implementation of the `tower_sessions` store interface.
//!
//! Rows live in the `sessions` table: the session id, the session data map
//! encoded as JSON, and the expiry as a unix timestamp. Expired rows are
//! never returned by `load` and are swept by [`DbSessionStore::delete_expired`].

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    sea_query::OnConflict,
};
use time::OffsetDateTime;
use tower_sessions::{
    SessionStore,
    session::{Id, Record},
    session_store,
};
use tracing::debug;

use crate::entities::{prelude::*, sessions};

#[derive(Debug, Clone)]
pub struct DbSessionStore {
    conn: DatabaseConnection,
}

impl DbSessionStore {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_active_model(record: &Record) -> session_store::Result<sessions::ActiveModel> {
        let data = serde_json::to_string(&record.data)
            .map_err(|e| session_store::Error::Encode(e.to_string()))?;

        Ok(sessions::ActiveModel {
            id: Set(record.id.to_string()),
            data: Set(data),
            expiry_date: Set(record.expiry_date.unix_timestamp()),
        })
    }

    /// Remove every session whose expiry has passed. Returns the number removed.
    pub async fn delete_expired(&self) -> anyhow::Result<u64> {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let result = Sessions::delete_many()
            .filter(sessions::Column::ExpiryDate.lte(now))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            debug!(removed = result.rows_affected, "Deleted expired sessions");
        }

        Ok(result.rows_affected)
    }
}

fn backend_error(err: &DbErr) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

#[async_trait]
impl SessionStore for DbSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            let model = Self::to_active_model(record)?;

            match Sessions::insert(model)
                .exec_without_returning(&self.conn)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    record.id = Id::default();
                }
                Err(e) => return Err(backend_error(&e)),
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let model = Self::to_active_model(record)?;

        Sessions::insert(model)
            .on_conflict(
                OnConflict::column(sessions::Column::Id)
                    .update_columns([sessions::Column::Data, sessions::Column::ExpiryDate])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .map_err(|e| backend_error(&e))?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let Some(row) = Sessions::find_by_id(session_id.to_string())
            .filter(sessions::Column::ExpiryDate.gt(now))
            .one(&self.conn)
            .await
            .map_err(|e| backend_error(&e))?
        else {
            return Ok(None);
        };

        let data = serde_json::from_str(&row.data)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;
        let expiry_date = OffsetDateTime::from_unix_timestamp(row.expiry_date)
            .map_err(|e| session_store::Error::Decode(e.to_string()))?;

        Ok(Some(Record {
            id: *session_id,
            data,
            expiry_date,
        }))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        Sessions::delete_by_id(session_id.to_string())
            .exec(&self.conn)
            .await
            .map_err(|e| backend_error(&e))?;

        Ok(())
    }
}
