//! Key-value persistence primitive.
//!
//! Everything criminal-intent persists goes through [`KeyValueStore`]: the
//! record collection as one JSON blob and the selected theme id. Two backends
//! are provided, a `SQLite` file ([`SqliteStore`]) and a process-local map
//! ([`MemoryStore`]).

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// An asynchronous string-to-string store.
///
/// Implementations report a failed `set` or `remove` as
/// [`Error::StoreWrite`](crate::Error::StoreWrite) and a failed `get` as
/// [`Error::StoreRead`](crate::Error::StoreRead). A missing key is not an
/// error.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}
