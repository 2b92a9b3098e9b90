//! # strata-cache
//!
//! Read-through result caching for the Strata executor protocol.
//!
//! Every SELECT-style query issued through a [`QueryEngine`] can be
//! intercepted here: its result is served from a key-value store when a
//! previous identical invocation populated it, and written through after a
//! real database round trip otherwise. The database stays authoritative:
//! any store failure degrades to a plain database query.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Application                          │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │                 ReadThrough<Engine, Store>                 │
//! │                                                            │
//! │  resolver ──▶ fingerprint ──▶ store probe ──▶ hit: decode  │
//! │                                    │                       │
//! │                                    └──▶ miss: QueryEngine  │
//! │                                           └──▶ write-back  │
//! └────────────────────────────────────────────────────────────┘
//!          │                                      │
//!          ▼                                      ▼
//! ┌──────────────────┐                  ┌──────────────────────┐
//! │   CacheStore     │                  │       Database       │
//! │ (namespace, key) │                  │  (via QueryEngine)   │
//! └──────────────────┘                  └──────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use strata_cache::{CacheOptions, MemoryStore, ReadThrough};
//! use strata_query::Statement;
//!
//! let cache = ReadThrough::new(engine, MemoryStore::default());
//!
//! let stmt = Statement::new("SELECT * FROM users WHERE active = $1").bind(true);
//! let users = cache.fetch_many::<User>(&stmt, None).await?;
//!
//! // Opt out per query:
//! let fresh = cache
//!     .fetch_many::<User>(&stmt, Some(&CacheOptions::refresh()))
//!     .await?;
//!
//! // Coarse invalidation, one table at a time:
//! cache.invalidate::<User>().await?;
//! ```
//!
//! # What is (deliberately) not here
//!
//! The store protocol defines no TTL, eviction, or fine-grained
//! invalidation: entries persist until a namespace is dropped. That is
//! appropriate when the backing tables are append-only or invalidated out of
//! band, and wrong otherwise. Choose participation per query accordingly.
//! Concurrent misses for the same fingerprint are not coalesced; they write
//! identical payloads.
//!
//! [`QueryEngine`]: strata_query::QueryEngine

pub mod codec;
pub mod key;
pub mod memory;
pub mod policy;
pub mod read_through;
pub mod resolver;
pub mod stats;
pub mod store;

pub use codec::CodecError;
pub use key::Fingerprint;
pub use memory::{MemoryStore, MemoryStoreConfig};
pub use policy::{CacheOptions, CachePolicy};
pub use read_through::{Fetched, ReadThrough, Source};
pub use stats::{CacheMetrics, CacheStats};
pub use store::{CacheStore, NoopStore, StoreError, StoreResult};

/// Commonly used types.
pub mod prelude {
    pub use crate::memory::MemoryStore;
    pub use crate::policy::{CacheOptions, CachePolicy};
    pub use crate::read_through::{Fetched, ReadThrough, Source};
    pub use crate::store::{CacheStore, NoopStore, StoreError, StoreResult};
}
