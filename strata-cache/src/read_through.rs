//! The read-through orchestrator.
//!
//! [`ReadThrough`] wraps a [`QueryEngine`] and a [`CacheStore`] and sequences
//! one query invocation through the cache: resolve participation, derive the
//! fingerprint, probe the store, decode on a hit, otherwise execute against
//! the database and write the populated destination back.
//!
//! Failure policy: the database is authoritative. A store read failure reads
//! as a miss; a store write failure is logged and ignored; a payload that no
//! longer decodes is replaced after the fallback execution. Only database
//! errors and the distinguished not-found condition reach the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_cache::{CacheOptions, MemoryStore, ReadThrough};
//! use strata_query::Statement;
//!
//! let cache = ReadThrough::new(engine, MemoryStore::default());
//! let stmt = Statement::new("SELECT * FROM users WHERE active = $1").bind(true);
//!
//! // First call executes against the database and writes the cache;
//! // an identical second call is served from the store.
//! let users = cache.fetch_many::<User>(&stmt, None).await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use strata_query::{QueryEngine, QueryError, QueryResult, Record, Statement};
use tracing::{debug, warn};

use crate::codec;
use crate::key::Fingerprint;
use crate::policy::CacheOptions;
use crate::resolver;
use crate::stats::{CacheMetrics, CacheStats};
use crate::store::{CacheStore, StoreResult};

/// Where a fetched result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Served from the cache store; the database was not touched.
    Cache,
    /// Executed against the database.
    Database,
}

/// A query result together with its provenance.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// The destination value.
    pub value: T,
    /// Where the value came from.
    pub source: Source,
    /// Rows physically scanned from the database. Stays at zero when the
    /// result was served from the cache.
    pub rows_scanned: u64,
}

impl<T> Fetched<T> {
    /// Whether the result was served from the cache.
    pub fn is_from_cache(&self) -> bool {
        self.source == Source::Cache
    }

    /// Consume the wrapper, returning the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Read-through cache around a query engine.
///
/// Both collaborators are injected; there is no process-global client. Each
/// invocation is independent and the orchestrator holds no locks of its own,
/// so a `ReadThrough` can be shared freely across tasks. Concurrent misses
/// for the same fingerprint may each execute against the database and each
/// write the same key; the payload is a pure function of the query, so the
/// overwrite is idempotent.
pub struct ReadThrough<E, S> {
    engine: E,
    store: S,
    defaults: CacheOptions,
    metrics: Arc<CacheMetrics>,
}

impl<E: QueryEngine, S: CacheStore> ReadThrough<E, S> {
    /// Wrap an engine and a store with read-through defaults.
    pub fn new(engine: E, store: S) -> Self {
        Self::with_options(engine, store, CacheOptions::read_through())
    }

    /// Wrap an engine and a store with explicit default options.
    pub fn with_options(engine: E, store: S, defaults: CacheOptions) -> Self {
        Self {
            engine,
            store,
            defaults,
            metrics: Arc::new(CacheMetrics::new()),
        }
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The default options applied when a call passes `None`.
    pub fn defaults(&self) -> &CacheOptions {
        &self.defaults
    }

    /// The metrics collector.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot()
    }

    /// Fetch a collection destination.
    ///
    /// An empty result is cached like any other: repeated queries for data
    /// that is not there skip the database too.
    pub async fn fetch_many<M: Record>(
        &self,
        statement: &Statement,
        options: Option<&CacheOptions>,
    ) -> QueryResult<Fetched<Vec<M>>> {
        let options = options.unwrap_or(&self.defaults);
        let (value, source) = self
            .fetch_payload(statement, options, M::TABLE_NAME, "fetch_many", || {
                self.engine.query_many::<M>(statement)
            })
            .await?;

        let rows_scanned = match source {
            Source::Database => value.len() as u64,
            Source::Cache => 0,
        };
        Ok(Fetched {
            value,
            source,
            rows_scanned,
        })
    }

    /// Fetch an optional single-record destination.
    pub async fn fetch_optional<M: Record>(
        &self,
        statement: &Statement,
        options: Option<&CacheOptions>,
    ) -> QueryResult<Fetched<Option<M>>> {
        let options = options.unwrap_or(&self.defaults);
        let (value, source) = self
            .fetch_payload(statement, options, M::TABLE_NAME, "fetch_optional", || {
                self.engine.query_optional::<M>(statement)
            })
            .await?;

        let rows_scanned = match source {
            Source::Database => value.is_some() as u64,
            Source::Cache => 0,
        };
        Ok(Fetched {
            value,
            source,
            rows_scanned,
        })
    }

    /// Fetch a required single-record destination.
    ///
    /// Zero rows surfaces the distinguished not-found error, from the cached
    /// and the uncached path alike. The empty result is still written to the
    /// cache first, so the next identical query reports not-found without a
    /// database round trip.
    pub async fn fetch_one<M: Record>(
        &self,
        statement: &Statement,
        options: Option<&CacheOptions>,
    ) -> QueryResult<Fetched<M>> {
        let fetched = self.fetch_optional::<M>(statement, options).await?;
        match fetched.value {
            Some(value) => Ok(Fetched {
                value,
                source: fetched.source,
                rows_scanned: fetched.rows_scanned,
            }),
            None => Err(QueryError::not_found(M::MODEL_NAME).with_sql(statement.sql())),
        }
    }

    /// Drop every cached entry for a record's table.
    pub async fn invalidate<M: Record>(&self) -> StoreResult<u64> {
        self.invalidate_table(M::TABLE_NAME).await
    }

    /// Drop every cached entry for a table by name.
    pub async fn invalidate_table(&self, table: &str) -> StoreResult<u64> {
        self.store.invalidate_namespace(table).await
    }

    /// The shared control flow under the typed fetch methods.
    ///
    /// `run` performs the real database execution; it is invoked at most
    /// once, and only when the cache could not serve the query.
    async fn fetch_payload<P, F, Fut>(
        &self,
        statement: &Statement,
        options: &CacheOptions,
        table: &str,
        operation: &'static str,
        run: F,
    ) -> QueryResult<(P, Source)>
    where
        P: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = QueryResult<P>>,
    {
        let Some(namespace) = resolver::resolve(options, statement, table) else {
            // Not participating: plain execute-and-scan.
            let value = run().await?;
            return Ok((value, Source::Database));
        };

        let fingerprint = Fingerprint::of(statement);

        if options.policy.reads_cache() {
            match self.store.get(&namespace, fingerprint.as_str()).await {
                Ok(Some(payload)) => match codec::decode::<P>(&payload) {
                    Ok(value) => {
                        self.metrics.record_hit();
                        debug!(
                            namespace = %namespace,
                            key = %fingerprint,
                            operation,
                            "cache hit"
                        );
                        return Ok((value, Source::Cache));
                    }
                    Err(err) => {
                        // Stale or corrupt payload: fall through to the
                        // database; the write below replaces it.
                        self.metrics.record_decode_failure();
                        warn!(
                            namespace = %namespace,
                            key = %fingerprint,
                            error = %err,
                            "cached payload failed to decode, falling back to database"
                        );
                    }
                },
                Ok(None) => {
                    self.metrics.record_miss();
                    debug!(
                        namespace = %namespace,
                        key = %fingerprint,
                        operation,
                        "cache miss"
                    );
                }
                Err(err) => {
                    // A store outage reads as a miss.
                    self.metrics.record_store_error();
                    warn!(
                        namespace = %namespace,
                        error = %err,
                        "cache store read failed, falling back to database"
                    );
                }
            }
        }

        // Database errors propagate verbatim; nothing is cached for them.
        let value = run().await?;

        if options.policy.writes_cache() {
            match codec::encode(&value) {
                Ok(payload) => {
                    match self
                        .store
                        .set(&namespace, fingerprint.as_str(), &payload)
                        .await
                    {
                        Ok(()) => {
                            self.metrics.record_write();
                            debug!(
                                namespace = %namespace,
                                key = %fingerprint,
                                bytes = payload.len(),
                                "cache write"
                            );
                        }
                        Err(err) => {
                            // Best effort: the query already succeeded.
                            self.metrics.record_store_error();
                            warn!(
                                namespace = %namespace,
                                error = %err,
                                "cache store write failed, result unaffected"
                            );
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        namespace = %namespace,
                        error = %err,
                        "payload encode failed, skipping cache write"
                    );
                }
            }
        }

        Ok((value, Source::Database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde::Deserialize;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use strata_query::BoxFuture;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Gadget {
        id: i64,
        name: String,
    }

    impl Record for Gadget {
        const MODEL_NAME: &'static str = "Gadget";
        const TABLE_NAME: &'static str = "gadgets";
        const PRIMARY_KEY: &'static [&'static str] = &["id"];
        const COLUMNS: &'static [&'static str] = &["id", "name"];
    }

    /// Engine that returns pre-scripted rows and counts real executions.
    #[derive(Clone, Default)]
    struct ScriptedEngine {
        rows: Arc<Mutex<Vec<serde_json::Value>>>,
        executions: Arc<AtomicUsize>,
    }

    impl ScriptedEngine {
        fn with_rows(rows: Vec<serde_json::Value>) -> Self {
            Self {
                rows: Arc::new(Mutex::new(rows)),
                executions: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn executions(&self) -> usize {
            self.executions.load(Ordering::SeqCst)
        }
    }

    impl QueryEngine for ScriptedEngine {
        fn query_many<'a, M: Record>(
            &'a self,
            _statement: &'a Statement,
        ) -> BoxFuture<'a, QueryResult<Vec<M>>> {
            Box::pin(async move {
                self.executions.fetch_add(1, Ordering::SeqCst);
                let rows = self.rows.lock().unwrap().clone();
                rows.into_iter()
                    .map(|row| {
                        serde_json::from_value::<M>(row)
                            .map_err(|e| QueryError::deserialization(e.to_string()))
                    })
                    .collect()
            })
        }

        fn query_optional<'a, M: Record>(
            &'a self,
            statement: &'a Statement,
        ) -> BoxFuture<'a, QueryResult<Option<M>>> {
            Box::pin(async move {
                let mut rows = self.query_many::<M>(statement).await?;
                Ok(if rows.is_empty() {
                    None
                } else {
                    Some(rows.remove(0))
                })
            })
        }
    }

    fn gadget_row(id: i64) -> serde_json::Value {
        serde_json::json!({ "id": id, "name": format!("gadget-{}", id) })
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let engine = ScriptedEngine::with_rows(vec![gadget_row(1), gadget_row(2)]);
        let cache = ReadThrough::new(engine.clone(), MemoryStore::default());
        let stmt = Statement::new("SELECT * FROM gadgets WHERE id > $1").bind(0);

        let first = cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        assert_eq!(first.source, Source::Database);
        assert_eq!(first.rows_scanned, 2);

        let second = cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.rows_scanned, 0);
        assert_eq!(second.value, first.value);

        assert_eq!(engine.executions(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
    }

    #[tokio::test]
    async fn test_disabled_policy_skips_store() {
        let engine = ScriptedEngine::with_rows(vec![gadget_row(1)]);
        let cache = ReadThrough::with_options(
            engine.clone(),
            MemoryStore::default(),
            CacheOptions::disabled(),
        );
        let stmt = Statement::new("SELECT * FROM gadgets");

        cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();

        assert_eq!(engine.executions(), 2);
        assert_eq!(cache.store().len().await.unwrap(), 0);
        assert_eq!(cache.stats().total_reads(), 0);
    }

    #[tokio::test]
    async fn test_refresh_overwrites_stale_entry() {
        let engine = ScriptedEngine::with_rows(vec![gadget_row(1)]);
        let cache = ReadThrough::new(engine.clone(), MemoryStore::default());
        let stmt = Statement::new("SELECT * FROM gadgets");

        cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();

        // The table changed behind the cache's back.
        *engine.rows.lock().unwrap() = vec![gadget_row(1), gadget_row(2)];

        // A read-through still serves the stale entry...
        let stale = cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        assert_eq!(stale.value.len(), 1);

        // ...until a refresh overwrites it.
        let refreshed = cache
            .fetch_many::<Gadget>(&stmt, Some(&CacheOptions::refresh()))
            .await
            .unwrap();
        assert_eq!(refreshed.source, Source::Database);
        assert_eq!(refreshed.value.len(), 2);

        let after = cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        assert_eq!(after.source, Source::Cache);
        assert_eq!(after.value.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_namespace_override_falls_back_to_metadata() {
        let engine = ScriptedEngine::with_rows(vec![gadget_row(1)]);
        let cache = ReadThrough::new(engine.clone(), MemoryStore::default());
        let stmt = Statement::new("SELECT 1");
        let opts = CacheOptions::read_through().with_namespace("");

        cache
            .fetch_many::<Gadget>(&stmt, Some(&opts))
            .await
            .unwrap();

        // The entry landed under the record's table metadata.
        assert_eq!(cache.store().namespace_len(Gadget::TABLE_NAME), 1);

        let second = cache
            .fetch_many::<Gadget>(&stmt, Some(&opts))
            .await
            .unwrap();
        assert_eq!(second.source, Source::Cache);
    }

    #[tokio::test]
    async fn test_invalidate_drops_table_partition() {
        let engine = ScriptedEngine::with_rows(vec![gadget_row(1)]);
        let cache = ReadThrough::new(engine.clone(), MemoryStore::default());
        let stmt = Statement::new("SELECT * FROM gadgets");

        cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        assert_eq!(cache.invalidate::<Gadget>().await.unwrap(), 1);

        let fetched = cache.fetch_many::<Gadget>(&stmt, None).await.unwrap();
        assert_eq!(fetched.source, Source::Database);
        assert_eq!(engine.executions(), 2);
    }
}
