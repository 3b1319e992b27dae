//! SQLite-backed key/value store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::store::models::NewKvEntry;
use crate::store::{KeyValueStore, KvEntry, StoreError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Key/value store persisted in a SQLite file.
///
/// Each call opens its own connection, so the store is cheap to clone and
/// safe to share. In-memory SQLite paths do not survive between calls; use
/// [`MemoryStore`](crate::MemoryStore) for that instead.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StoreError> {
        info!(path = %db_path, "Opening SqliteStore");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migration failed: {}", e)))?;
        info!(applied = applied.len(), "Store schema ready");
        Ok(store)
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Lists every stored entry, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn entries(&self) -> Result<Vec<KvEntry>, StoreError> {
        let mut conn = self.connection()?;
        let entries = schema::kv_entries::table
            .order(schema::kv_entries::key.asc())
            .select(KvEntry::as_select())
            .load(&mut conn)?;
        debug!(count = entries.len(), "Entries loaded");
        Ok(entries)
    }
}

impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        let value = schema::kv_entries::table
            .filter(schema::kv_entries::key.eq(key))
            .select(schema::kv_entries::value)
            .first::<String>(&mut conn)
            .optional()?;
        debug!(key, found = value.is_some(), "Read entry");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        diesel::replace_into(schema::kv_entries::table)
            .values(&NewKvEntry::new(key, &value))
            .execute(&mut conn)?;
        debug!(key, "Wrote entry");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(schema::kv_entries::table.filter(schema::kv_entries::key.eq(key)))
            .execute(&mut conn)?;
        debug!(key, removed, "Removed entry");
        Ok(())
    }
}
