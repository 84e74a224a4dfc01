//! Query cache with invalidate-and-refetch semantics.
//!
//! Values are stored as JSON keyed by query key (`"adjustments?status=pending"`).
//! Mutations never patch entries; they drop every key under a prefix so the
//! next read refetches.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, fetch: F) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let cached = self.entries.lock().get(key).cloned();
        if let Some(value) = cached {
            debug!(key, "Query cache hit");
            return serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()));
        }

        let fresh = fetch().await?;
        let value = serde_json::to_value(&fresh).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.entries.lock().insert(key.to_string(), value);
        Ok(fresh)
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate(&self, prefix: &str) {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        debug!(prefix, dropped = before - entries.len(), "Query cache invalidated");
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
