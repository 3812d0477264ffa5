//! In-memory template cache.
//!
//! Remote reference playlists change rarely, so their text is kept for a while
//! instead of being fetched on every request. Entries expire a fixed time after
//! they were fetched and can be dropped explicitly when a template is replaced.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Entry in the template cache.
struct CacheEntry {
    text: Arc<str>,
    fetched_at: Instant,
    last_accessed: Instant,
}

/// Thread-safe, bounded cache of playlist template text keyed by URL.
pub struct TemplateCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
    ttl: Duration,
}

impl TemplateCache {
    /// Create a new template cache.
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Get a template if it is cached and still fresh.
    pub fn get(&self, url: &str) -> Option<Arc<str>> {
        if let Some(mut entry) = self.entries.get_mut(url) {
            if entry.fetched_at.elapsed() < self.ttl {
                entry.last_accessed = Instant::now();
                return Some(Arc::clone(&entry.text));
            }
            drop(entry);
            self.entries.remove(url);
        }
        None
    }

    /// Store freshly fetched template text.
    pub fn insert(&self, url: &str, text: impl Into<Arc<str>>) -> Arc<str> {
        let text = text.into();

        if !self.entries.contains_key(url) && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest();
            }
        }

        let now = Instant::now();
        self.entries.insert(
            url.to_string(),
            CacheEntry {
                text: Arc::clone(&text),
                fetched_at: now,
                last_accessed: now,
            },
        );
        text
    }

    /// Drop one template so the next request fetches it again.
    pub fn invalidate(&self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove expired entries.
    pub fn cleanup_expired(&self) {
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_accessed)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            tracing::debug!(url = %key, "Evicting template from cache");
            self.entries.remove(&key);
        }
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        // Default: 64 entries, 5 minute TTL
        Self::new(64, 300)
    }
}
