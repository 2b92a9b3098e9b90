//! In-process cache store.
//!
//! [`MemoryStore`] keeps payloads in nested hash maps partitioned by
//! namespace, behind a `parking_lot::RwLock`. It implements the store
//! protocol faithfully: no TTL and no eviction, so entries persist until a
//! namespace is invalidated or the store is cleared. The backing tables are
//! assumed append-only or invalidated out of band.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_cache::{MemoryStore, MemoryStoreConfig};
//!
//! let store = MemoryStore::new(MemoryStoreConfig::default());
//! // or with a hard capacity cap:
//! let store = MemoryStore::with_max_entries(100_000);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tracing::warn;

use crate::store::{CacheStore, StoreResult};

/// Configuration for the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// Maximum number of entries across all namespaces.
    ///
    /// When set, writes of new keys past the cap are dropped with a
    /// warning; existing entries are never evicted.
    pub max_entries: Option<usize>,
}

impl MemoryStoreConfig {
    /// Create a config with a hard capacity cap.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
        }
    }
}

/// In-process store, one payload map per namespace.
pub struct MemoryStore {
    config: MemoryStoreConfig,
    namespaces: RwLock<HashMap<String, HashMap<String, Vec<u8>>>>,
    entry_count: AtomicUsize,
}

impl MemoryStore {
    /// Create a new memory store with the given config.
    pub fn new(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            namespaces: RwLock::new(HashMap::new()),
            entry_count: AtomicUsize::new(0),
        }
    }

    /// Create a store with a hard capacity cap.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self::new(MemoryStoreConfig::with_max_entries(max_entries))
    }

    /// Get the config.
    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// Number of entries in one namespace.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .get(namespace)
            .map_or(0, |entries| entries.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

impl CacheStore for MemoryStore {
    async fn exists(&self, namespace: &str, key: &str) -> StoreResult<bool> {
        let namespaces = self.namespaces.read();
        Ok(namespaces
            .get(namespace)
            .is_some_and(|entries| entries.contains_key(key)))
    }

    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let namespaces = self.namespaces.read();
        Ok(namespaces
            .get(namespace)
            .and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, namespace: &str, key: &str, payload: &[u8]) -> StoreResult<()> {
        let mut namespaces = self.namespaces.write();
        let entries = namespaces.entry(namespace.to_string()).or_default();
        let is_new = !entries.contains_key(key);

        if is_new {
            if let Some(max) = self.config.max_entries {
                if self.entry_count.load(Ordering::Relaxed) >= max {
                    warn!(
                        namespace = %namespace,
                        max_entries = max,
                        "memory store at capacity, dropping write"
                    );
                    return Ok(());
                }
            }
        }

        entries.insert(key.to_string(), payload.to_vec());
        if is_new {
            self.entry_count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn invalidate_namespace(&self, namespace: &str) -> StoreResult<u64> {
        let mut namespaces = self.namespaces.write();
        let removed = namespaces
            .remove(namespace)
            .map_or(0, |entries| entries.len());
        self.entry_count.fetch_sub(removed, Ordering::Relaxed);
        Ok(removed as u64)
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut namespaces = self.namespaces.write();
        namespaces.clear();
        self.entry_count.store(0, Ordering::Relaxed);
        Ok(())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.entry_count.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryStore::default();

        store.set("users", "k1", b"hello").await.unwrap();

        assert!(store.exists("users", "k1").await.unwrap());
        assert_eq!(
            store.get("users", "k1").await.unwrap(),
            Some(b"hello".to_vec())
        );
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_namespaces_are_partitioned() {
        let store = MemoryStore::default();

        store.set("users", "k1", b"u").await.unwrap();
        store.set("orders", "k1", b"o").await.unwrap();

        assert_eq!(store.get("users", "k1").await.unwrap(), Some(b"u".to_vec()));
        assert_eq!(
            store.get("orders", "k1").await.unwrap(),
            Some(b"o".to_vec())
        );
    }

    #[tokio::test]
    async fn test_overwrite_is_idempotent() {
        let store = MemoryStore::default();

        store.set("users", "k1", b"v").await.unwrap();
        store.set("users", "k1", b"v").await.unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
        assert_eq!(store.get("users", "k1").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_invalidate_namespace() {
        let store = MemoryStore::default();

        for i in 0..5 {
            store
                .set("users", &format!("k{}", i), b"v")
                .await
                .unwrap();
        }
        store.set("orders", "k0", b"v").await.unwrap();

        let removed = store.invalidate_namespace("users").await.unwrap();
        assert_eq!(removed, 5);
        assert_eq!(store.len().await.unwrap(), 1);
        assert!(!store.exists("users", "k0").await.unwrap());
        assert!(store.exists("orders", "k0").await.unwrap());
    }

    #[tokio::test]
    async fn test_capacity_cap_drops_new_writes() {
        let store = MemoryStore::with_max_entries(2);

        store.set("t", "k1", b"a").await.unwrap();
        store.set("t", "k2", b"b").await.unwrap();
        store.set("t", "k3", b"c").await.unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        assert!(store.get("t", "k3").await.unwrap().is_none());

        // Overwrites of existing keys still go through at capacity
        store.set("t", "k1", b"a2").await.unwrap();
        assert_eq!(store.get("t", "k1").await.unwrap(), Some(b"a2".to_vec()));
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::default();

        store.set("users", "k1", b"v").await.unwrap();
        store.clear().await.unwrap();

        assert!(store.is_empty().await.unwrap());
        assert_eq!(store.namespace_len("users"), 0);
    }
}
