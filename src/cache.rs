//! Bounded, time-limited cache for geocoding results
//!
//! [`LookupCache`] wraps any [`PlaceLocator`] and remembers successful
//! lookups for a fixed TTL. Misses and skips are never stored, so a place
//! that was not found is looked up again next time. Weather is never cached.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::CacheConfig;
use crate::geocoding::PlaceLocator;
use crate::models::{Coordinate, Lookup, PlaceQuery};

#[derive(Debug, Clone, Copy)]
struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

pub struct LookupCache<L> {
    inner: L,
    entries: Mutex<HashMap<String, StoredEntry<Coordinate>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<L: PlaceLocator> LookupCache<L> {
    pub fn new(inner: L, ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_config(inner: L, config: &CacheConfig) -> Self {
        Self::new(inner, Duration::from_secs(config.ttl_seconds), config.max_entries)
    }

    /// Retrieves a coordinate if it exists and has not expired
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Option<Coordinate> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value)
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Stores a coordinate, evicting the entry closest to expiry when full
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self))]
    async fn put(&self, key: String, value: Coordinate) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            entries.retain(|_, entry| now < entry.expires_at);
            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!("Evicting {}", oldest);
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            StoredEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<L: PlaceLocator> PlaceLocator for LookupCache<L> {
    async fn locate(&self, query: &PlaceQuery) -> Lookup<Coordinate> {
        if query.is_empty() {
            return Lookup::Skipped;
        }

        let key = query.cache_key();
        if let Some(coordinate) = self.get(&key).await {
            return Lookup::Found(coordinate);
        }

        let result = self.inner.locate(query).await;
        if let Lookup::Found(coordinate) = result {
            self.put(key, coordinate).await;
        }
        result
    }
}
