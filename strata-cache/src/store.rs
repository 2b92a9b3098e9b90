//! Cache store protocol and core types.
//!
//! The store is a consumed collaborator: any key-value backend that can
//! check, read, and write opaque byte payloads under a `(namespace, key)`
//! pair can sit behind the read-through layer. Namespaces partition the
//! cache by table so a whole table's entries can be dropped at once.

use std::future::Future;

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Store failures are never fatal to a query: the read-through layer absorbs
/// them and falls back to the database.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Operation timeout.
    #[error("operation timed out")]
    Timeout,

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The key-value protocol consumed by the read-through layer.
///
/// Namespace and key are both opaque strings from the store's perspective;
/// payloads are opaque bytes (the codec lives outside the store). Entries
/// persist until invalidated; the protocol defines no TTL or eviction.
pub trait CacheStore: Send + Sync + 'static {
    /// Check whether a key exists in a namespace.
    fn exists(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Get the payload stored under `(namespace, key)`.
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl Future<Output = StoreResult<Option<Vec<u8>>>> + Send;

    /// Store a payload under `(namespace, key)`, replacing any previous one.
    ///
    /// Overwrites are idempotent: writing the same payload twice leaves the
    /// store in the same observable state as writing it once.
    fn set(
        &self,
        namespace: &str,
        key: &str,
        payload: &[u8],
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Drop every entry in a namespace. Returns the number of entries removed.
    fn invalidate_namespace(
        &self,
        namespace: &str,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Remove all entries.
    fn clear(&self) -> impl Future<Output = StoreResult<()>> + Send;

    /// Get the number of entries across all namespaces.
    fn len(&self) -> impl Future<Output = StoreResult<usize>> + Send;

    /// Check if the store is empty.
    fn is_empty(&self) -> impl Future<Output = StoreResult<bool>> + Send {
        async move { Ok(self.len().await? == 0) }
    }
}

/// A store that doesn't cache anything.
///
/// Useful for testing or when caching should be structurally disabled:
/// every read misses, every write succeeds without storing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl CacheStore for NoopStore {
    async fn exists(&self, _namespace: &str, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn get(&self, _namespace: &str, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _namespace: &str, _key: &str, _payload: &[u8]) -> StoreResult<()> {
        Ok(())
    }

    async fn invalidate_namespace(&self, _namespace: &str) -> StoreResult<u64> {
        Ok(0)
    }

    async fn clear(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_store() {
        let store = NoopStore;

        // Set succeeds but stores nothing
        store.set("users", "abc", b"payload").await.unwrap();

        assert!(!store.exists("users", "abc").await.unwrap());
        assert!(store.get("users", "abc").await.unwrap().is_none());
        assert_eq!(store.invalidate_namespace("users").await.unwrap(), 0);
        assert!(store.is_empty().await.unwrap());
    }
}
