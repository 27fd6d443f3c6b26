use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::storage::{self, CacheStorage};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] storage::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// A query whose raw result data can be cached.
///
/// Implementations are immutable per-call value objects: the cache key is
/// deterministic and derived from the query content, and `fetch` produces
/// the raw data for exactly this query.
pub trait Cacheable {
    type Value: Serialize + DeserializeOwned;

    fn cache_key(&self) -> String;

    /// Produce fresh data, or `None` if no usable data could be obtained.
    fn fetch(&self) -> Option<Self::Value>;
}

/// Cache-aside accessor over an external key-value store.
#[derive(Debug)]
pub struct Cache<S> {
    storage: S,
}

impl<S: CacheStorage> Cache<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Return cached data for the query, fetching and storing it on a miss.
    ///
    /// Absent fetch results are never stored.
    pub fn get_data<Q: Cacheable>(&self, query: &Q) -> Result<Option<Q::Value>> {
        let key = query.cache_key();
        if let Some(cached) = self.storage.get(&key)? {
            return Ok(Some(serde_json::from_str(&cached)?));
        }
        self.store_fetched(&key, query.fetch())
    }

    /// Force-refresh: fetch unconditionally, bypassing the cache read,
    /// and store the result if there is one.
    pub fn update_data<Q: Cacheable>(&self, query: &Q) -> Result<Option<Q::Value>> {
        self.store_fetched(&query.cache_key(), query.fetch())
    }

    fn store_fetched<V: Serialize>(&self, key: &str, data: Option<V>) -> Result<Option<V>> {
        if let Some(data) = &data {
            self.storage.set(key, &serde_json::to_string(data)?)?;
        }
        Ok(data)
    }
}
