use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

use crate::domain::Clock;

pub const DEFAULT_TTL_MILLIS: u64 = 5 * 60 * 1000;

struct CacheEntry<V> {
    value: V,
    stored_at_ms: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

// String-keyed response cache. Stale entries are kept so a failed refresh
// can still answer with the last good value.
pub struct TtlCache<V, C> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl_millis: u64,
    clock: C,
}

impl<V, C> TtlCache<V, C>
where
    V: Clone,
    C: Clock,
{
    pub fn new(clock: C) -> Self {
        Self::with_ttl(clock, DEFAULT_TTL_MILLIS)
    }

    pub fn with_ttl(clock: C, ttl_millis: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_millis,
            clock,
        }
    }

    // Fresh value only.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lookup(key, self.ttl_millis).0
    }

    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        self.get_or_fetch_for(key, self.ttl_millis, fetch).await
    }

    pub async fn get_or_fetch_for<F, Fut, E>(
        &self,
        key: &str,
        ttl_millis: u64,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Display,
    {
        let (fresh, stale) = self.lookup(key, ttl_millis);
        if let Some(value) = fresh {
            tracing::trace!(key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(key, "cache miss");
        match fetch().await {
            Ok(value) => {
                self.insert(key, value.clone());
                Ok(value)
            }
            Err(err) => match stale {
                Some(value) => {
                    tracing::warn!(key, error = %err, "fetch failed, serving stale cache");
                    Ok(value)
                }
                None => Err(err),
            },
        }
    }

    pub fn insert(&self, key: &str, value: V) {
        let stored_at_ms = self.clock.now_epoch_millis();
        self.entries().insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at_ms,
            },
        );
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    // Drops every key containing the pattern; returns how many went.
    pub fn invalidate_matching(&self, pattern: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.contains(pattern));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }

    // Returns (fresh, stale) copies of the entry for the given ttl.
    fn lookup(&self, key: &str, ttl_millis: u64) -> (Option<V>, Option<V>) {
        let now = self.clock.now_epoch_millis();
        let entries = self.entries();
        match entries.get(key) {
            Some(entry) if now.saturating_sub(entry.stored_at_ms) < ttl_millis => {
                (Some(entry.value.clone()), None)
            }
            Some(entry) => (None, Some(entry.value.clone())),
            None => (None, None),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
