//! Storage gateway for crime records.
//!
//! [`CrimeStorage`] is the only component that reads or writes the record
//! collection. The whole collection lives under a single key as one JSON
//! array; every operation loads it, works on it in memory, and writes all of
//! it back.
//!
//! By default nothing serializes that read-modify-write cycle, so two
//! overlapping saves can lose one of the updates. Enable
//! [`CrimeStorage::with_serialized_writes`] to queue mutations behind a lock.

mod form;

pub use form::{load_form, submit_form};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::crime::Crime;
use crate::error::{Error, Result};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::kv::KeyValueStore;

/// Key under which the record collection is stored.
pub const CRIMES_STORAGE_KEY: &str = "crimes";

/// Gateway between in-memory [`Crime`] values and their persisted form.
///
/// Cloning is cheap; clones share the store, clock, id generator and write
/// lock.
#[derive(Debug, Clone)]
pub struct CrimeStorage {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl CrimeStorage {
    /// Create a gateway over `store` using the system clock and UUID ids.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            write_lock: None,
        }
    }

    /// Use `clock` for `created_at`/`updated_at` stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use `ids` to mint identifiers for new records.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Serialize save, delete and clear so each read-modify-write completes
    /// before the next one starts.
    ///
    /// Only covers callers sharing this gateway (or its clones). Other
    /// processes writing the same store are not coordinated.
    #[must_use]
    pub fn with_serialized_writes(mut self, enabled: bool) -> Self {
        self.write_lock = enabled.then(|| Arc::new(Mutex::new(())));
        self
    }

    /// Check if mutations are serialized.
    #[must_use]
    pub fn serializes_writes(&self) -> bool {
        self.write_lock.is_some()
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Mint a fresh record identifier.
    #[must_use]
    pub fn new_id(&self) -> String {
        self.ids.generate()
    }

    /// The current time according to the gateway's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Load every stored record.
    ///
    /// A key that was never set (or holds an empty string) yields an empty
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStorage`] if the stored blob is not a JSON
    /// array of records, or a store error if the read fails.
    pub async fn get_all_crimes(&self) -> Result<Vec<Crime>> {
        let Some(raw) = self.store.get(CRIMES_STORAGE_KEY).await? else {
            debug!("No stored crimes");
            return Ok(Vec::new());
        };
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let crimes: Vec<Crime> =
            serde_json::from_str(&raw).map_err(|source| Error::MalformedStorage {
                key: CRIMES_STORAGE_KEY.to_string(),
                source,
            })?;
        debug!(count = crimes.len(), "Loaded crimes");
        Ok(crimes)
    }

    /// Find a record by id.
    ///
    /// Returns `None` if no record has that id.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`get_all_crimes`](Self::get_all_crimes).
    pub async fn get_crime_by_id(&self, id: &str) -> Result<Option<Crime>> {
        let crimes = self.get_all_crimes().await?;
        Ok(crimes.into_iter().find(|crime| crime.id == id))
    }

    /// Insert or replace a record, returning it as stored.
    ///
    /// A record whose id is already present replaces the stored one in place;
    /// the stored `created_at` is kept and `updated_at` is set to now. A new
    /// record is appended with both timestamps set to now, whatever the caller
    /// put in them.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the store rejects the write.
    pub async fn save_crime(&self, crime: Crime) -> Result<Crime> {
        let _guard = self.write_guard().await;
        let mut crimes = self.get_all_crimes().await?;
        let now = self.clock.now();

        let stored = match crimes.iter().position(|c| c.id == crime.id) {
            Some(index) => {
                let stored = Crime {
                    created_at: crimes[index].created_at,
                    updated_at: now,
                    ..crime
                };
                debug!(id = %stored.id, "Updating crime");
                crimes[index] = stored.clone();
                stored
            }
            None => {
                let stored = Crime {
                    created_at: now,
                    updated_at: now,
                    ..crime
                };
                debug!(id = %stored.id, "Adding crime");
                crimes.push(stored.clone());
                stored
            }
        };

        self.write_all(&crimes).await?;
        Ok(stored)
    }

    /// Delete a record by id.
    ///
    /// Returns `true` if a record was removed. The collection is written back
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the store rejects the write.
    pub async fn delete_crime(&self, id: &str) -> Result<bool> {
        let _guard = self.write_guard().await;
        let mut crimes = self.get_all_crimes().await?;
        let before = crimes.len();
        crimes.retain(|crime| crime.id != id);
        let removed = crimes.len() < before;

        self.write_all(&crimes).await?;
        debug!(id, removed, "Deleted crime");
        Ok(removed)
    }

    /// Remove every record by dropping the storage key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal.
    pub async fn clear_all_crimes(&self) -> Result<()> {
        let _guard = self.write_guard().await;
        self.store.remove(CRIMES_STORAGE_KEY).await?;
        info!("Cleared all crimes");
        Ok(())
    }

    /// Summarize the stored collection.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`get_all_crimes`](Self::get_all_crimes).
    pub async fn stats(&self) -> Result<CrimeStats> {
        let crimes = self.get_all_crimes().await?;
        Ok(CrimeStats::from_crimes(&crimes))
    }

    async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    async fn write_all(&self, crimes: &[Crime]) -> Result<()> {
        let json = serde_json::to_string(crimes)?;
        self.store.set(CRIMES_STORAGE_KEY, &json).await
    }
}

/// Statistics about the stored records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrimeStats {
    /// Total number of records.
    pub total: usize,
    /// Records marked solved.
    pub solved: usize,
    /// Records with a photo attached.
    pub with_photo: usize,
    /// Earliest incident date.
    pub oldest: Option<DateTime<Utc>>,
    /// Latest incident date.
    pub newest: Option<DateTime<Utc>>,
}

impl CrimeStats {
    /// Compute statistics over `crimes`.
    #[must_use]
    pub fn from_crimes(crimes: &[Crime]) -> Self {
        Self {
            total: crimes.len(),
            solved: crimes.iter().filter(|c| c.is_solved).count(),
            with_photo: crimes.iter().filter(|c| c.has_photo()).count(),
            oldest: crimes.iter().map(|c| c.date).min(),
            newest: crimes.iter().map(|c| c.date).max(),
        }
    }

    /// Records not yet solved.
    #[must_use]
    pub fn open(&self) -> usize {
        self.total - self.solved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::crime::CrimeFormData;
    use crate::ids::SequentialIdGenerator;
    use crate::kv::{MemoryStore, SqliteStore};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn create_test_storage(store: Arc<dyn KeyValueStore>) -> CrimeStorage {
        CrimeStorage::new(store)
            .with_clock(Arc::new(ManualClock::new(t0(), Duration::seconds(1))))
            .with_id_generator(Arc::new(SequentialIdGenerator::new("crime")))
    }

    fn memory_storage() -> (Arc<MemoryStore>, CrimeStorage) {
        let store = Arc::new(MemoryStore::new());
        let storage = create_test_storage(store.clone());
        (store, storage)
    }

    fn create_test_crime(id: &str, title: &str) -> Crime {
        let form = CrimeFormData {
            title: title.to_string(),
            details: format!("details of {title}"),
            ..CrimeFormData::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        };
        // Caller stamps are deliberately far in the past
        Crime::from_form(id, form, Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_empty_state_default() {
        let (_, storage) = memory_storage();
        assert!(storage.get_all_crimes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_string_is_empty_collection() {
        let store = Arc::new(MemoryStore::with_entries([(CRIMES_STORAGE_KEY, "")]));
        let storage = create_test_storage(store);
        assert!(storage.get_all_crimes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (_, storage) = memory_storage();
        let before = storage.now();

        let saved = storage
            .save_crime(create_test_crime("a", "Theft"))
            .await
            .unwrap();
        let fetched = storage.get_crime_by_id("a").await.unwrap().unwrap();

        assert_eq!(fetched, saved);
        assert!(fetched.updated_at >= before);
        assert_eq!(fetched.title, "Theft");
        assert_eq!(fetched.details, "details of Theft");
    }

    #[tokio::test]
    async fn test_new_record_gets_gateway_stamps() {
        let (_, storage) = memory_storage();
        let saved = storage
            .save_crime(create_test_crime("a", "Theft"))
            .await
            .unwrap();

        assert_eq!(saved.created_at, saved.updated_at);
        assert!(saved.created_at >= t0());
    }

    #[tokio::test]
    async fn test_upsert_on_id() {
        let (_, storage) = memory_storage();

        let first = storage
            .save_crime(create_test_crime("a", "Theft"))
            .await
            .unwrap();
        let second = storage
            .save_crime(create_test_crime("a", "Grand Theft"))
            .await
            .unwrap();

        let all = storage.get_all_crimes().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Grand Theft");
        assert_eq!(all[0].created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let (_, storage) = memory_storage();
        for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
            storage.save_crime(create_test_crime(id, title)).await.unwrap();
        }

        storage
            .save_crime(create_test_crime("b", "B2"))
            .await
            .unwrap();

        let all = storage.get_all_crimes().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B2", "C"]);
    }

    #[tokio::test]
    async fn test_scenario_update_existing() {
        let stored = r#"[{"id":"a","title":"Theft","date":"2024-01-01","isSolved":false,"createdAt":"2024-01-01T09:00:00Z","updatedAt":"2024-01-01T09:00:00Z"}]"#;
        let store = Arc::new(MemoryStore::with_entries([(CRIMES_STORAGE_KEY, stored)]));
        let storage = create_test_storage(store).with_clock(Arc::new(ManualClock::new(
            t0() + Duration::hours(1),
            Duration::zero(),
        )));

        let mut update = create_test_crime("a", "Grand Theft");
        update.is_solved = true;
        storage.save_crime(update).await.unwrap();

        let all = storage.get_all_crimes().await.unwrap();
        assert_eq!(all.len(), 1);
        let crime = &all[0];
        assert_eq!(crime.id, "a");
        assert_eq!(crime.title, "Grand Theft");
        assert!(crime.is_solved);
        assert_eq!(crime.created_at, t0());
        assert!(crime.updated_at > t0());
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (_, storage) = memory_storage();
        let mut saved = Vec::new();
        for (id, title) in [("a", "A"), ("b", "B"), ("c", "C")] {
            saved.push(storage.save_crime(create_test_crime(id, title)).await.unwrap());
        }

        assert!(storage.delete_crime("b").await.unwrap());

        let all = storage.get_all_crimes().await.unwrap();
        assert_eq!(all, vec![saved[0].clone(), saved[2].clone()]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let (_, storage) = memory_storage();
        let saved = storage
            .save_crime(create_test_crime("a", "A"))
            .await
            .unwrap();

        assert!(!storage.delete_crime("zzz").await.unwrap());
        assert_eq!(storage.get_all_crimes().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn test_not_found_is_none() {
        let (_, storage) = memory_storage();
        for id in ["a", "b", "c"] {
            storage.save_crime(create_test_crime(id, id)).await.unwrap();
        }
        assert!(storage.get_crime_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_resets_to_empty() {
        let (store, storage) = memory_storage();
        storage.save_crime(create_test_crime("a", "A")).await.unwrap();
        storage.save_crime(create_test_crime("b", "B")).await.unwrap();

        storage.clear_all_crimes().await.unwrap();

        assert!(storage.get_all_crimes().await.unwrap().is_empty());
        assert!(store.get(CRIMES_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_storage_propagates() {
        let store = Arc::new(MemoryStore::with_entries([(CRIMES_STORAGE_KEY, "{not json")]));
        let storage = create_test_storage(store);

        let err = storage.get_all_crimes().await.unwrap_err();
        assert!(err.is_malformed_storage());

        let err = storage.get_crime_by_id("a").await.unwrap_err();
        assert!(err.is_malformed_storage());

        let err = storage
            .save_crime(create_test_crime("a", "A"))
            .await
            .unwrap_err();
        assert!(err.is_malformed_storage());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_malformed() {
        let store = Arc::new(MemoryStore::with_entries([(
            CRIMES_STORAGE_KEY,
            r#"{"id":"a"}"#,
        )]));
        let storage = create_test_storage(store);
        assert!(storage
            .get_all_crimes()
            .await
            .unwrap_err()
            .is_malformed_storage());
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let (store, storage) = memory_storage();
        storage.save_crime(create_test_crime("a", "A")).await.unwrap();
        store.set_read_only(true);

        assert!(storage
            .save_crime(create_test_crime("b", "B"))
            .await
            .unwrap_err()
            .is_write_failure());
        assert!(storage.delete_crime("a").await.unwrap_err().is_write_failure());
        assert!(storage.clear_all_crimes().await.unwrap_err().is_write_failure());

        // Nothing changed
        let all = storage.get_all_crimes().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "a");
    }

    #[tokio::test]
    async fn test_blob_format() {
        let (store, storage) = memory_storage();
        let mut crime = create_test_crime("a", "Theft");
        crime.photo_uri = Some("file:///photo.jpg".to_string());
        storage.save_crime(crime).await.unwrap();

        let raw = store.get(CRIMES_STORAGE_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];

        assert_eq!(first["id"], "a");
        assert_eq!(first["isSolved"], false);
        assert_eq!(first["photoUri"], "file:///photo.jpg");
        assert_eq!(first["date"], "2024-01-01T00:00:00Z");
        assert_eq!(first["createdAt"], "2024-01-01T09:00:00Z");
    }

    #[tokio::test]
    async fn test_stats() {
        let (_, storage) = memory_storage();
        assert_eq!(storage.stats().await.unwrap(), CrimeStats::default());

        let mut solved = create_test_crime("a", "A");
        solved.is_solved = true;
        solved.date = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        storage.save_crime(solved).await.unwrap();

        let mut with_photo = create_test_crime("b", "B");
        with_photo.photo_uri = Some("file:///b.jpg".to_string());
        storage.save_crime(with_photo).await.unwrap();

        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.solved, 1);
        assert_eq!(stats.open(), 1);
        assert_eq!(stats.with_photo, 1);
        assert_eq!(
            stats.oldest,
            Some(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            stats.newest,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_sqlite_backend() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let storage = create_test_storage(store);

        storage.save_crime(create_test_crime("a", "A")).await.unwrap();
        storage.save_crime(create_test_crime("b", "B")).await.unwrap();
        storage.delete_crime("a").await.unwrap();

        let all = storage.get_all_crimes().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "b");
    }

    #[test]
    fn test_new_id_uses_generator() {
        let (_, storage) = memory_storage();
        assert_eq!(storage.new_id(), "crime-1");
        assert_eq!(storage.new_id(), "crime-2");
    }

    /// Store that yields after every read so overlapping callers interleave.
    #[derive(Debug, Default)]
    struct InterleavingStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for InterleavingStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let value = self.inner.get(key).await?;
            tokio::task::yield_now().await;
            Ok(value)
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_saves_lose_update_by_default() {
        let storage = create_test_storage(Arc::new(InterleavingStore::default()));
        assert!(!storage.serializes_writes());

        let (a, b) = tokio::join!(
            storage.save_crime(create_test_crime("a", "A")),
            storage.save_crime(create_test_crime("b", "B")),
        );
        a.unwrap();
        b.unwrap();

        let all = storage.get_all_crimes().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "b");
    }

    #[tokio::test]
    async fn test_serialized_writes_keep_both_updates() {
        let storage = create_test_storage(Arc::new(InterleavingStore::default()))
            .with_serialized_writes(true);
        assert!(storage.serializes_writes());

        let (a, b) = tokio::join!(
            storage.save_crime(create_test_crime("a", "A")),
            storage.save_crime(create_test_crime("b", "B")),
        );
        a.unwrap();
        b.unwrap();

        let mut ids: Vec<String> = storage
            .get_all_crimes()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
