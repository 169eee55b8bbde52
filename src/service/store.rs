//! Keyed storage for users and combat sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Get/put/delete by id. Values are cloned in and out.
pub trait Store<T>: Send + Sync {
    fn get(&self, id: &str) -> StoreResult<Option<T>>;

    fn put(&self, id: &str, value: T) -> StoreResult<()>;

    /// Removes and returns the value, if any.
    fn delete(&self, id: &str) -> StoreResult<Option<T>>;

    /// All ids, sorted.
    fn ids(&self) -> StoreResult<Vec<String>>;

    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }
}

pub struct InMemoryStore<T> {
    entries: RwLock<HashMap<String, T>>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, T)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> Store<T> for InMemoryStore<T> {
    fn get(&self, id: &str) -> StoreResult<Option<T>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(id).cloned())
    }

    fn put(&self, id: &str, value: T) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(id.to_string(), value);
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<Option<T>> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.remove(id))
    }

    fn ids(&self) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut ids: Vec<String> = entries.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn contains(&self, id: &str) -> StoreResult<bool> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.contains_key(id))
    }
}
