//! Persisted key/value records for players, settings and round setup.

mod error;
mod memory;
mod models;
mod records;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::KvEntry;
pub use records::{StoreKey, load, remove, save};
pub use repository::SqliteStore;

/// An opaque string-keyed store holding JSON-encoded values.
///
/// Implementations must be shareable across the async runtime; only one
/// screen writes at a time, so no cross-call ordering is required.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
