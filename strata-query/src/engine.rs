//! The query executor protocol.
//!
//! A [`QueryEngine`] is implemented by a database backend: it runs a finished
//! [`Statement`] against the database, scans the resulting rows into records,
//! and reports how the read went. The cache layer consumes this trait and
//! never talks to a driver directly.
//!
//! The three methods correspond to the three destination shapes a caller can
//! ask for: a collection (`query_many`), an optional single record
//! (`query_optional`), and a required single record (`query_one`, which
//! surfaces the distinguished not-found error on zero rows).

use crate::error::{QueryError, QueryResult};
use crate::model::Record;
use crate::statement::Statement;

/// A boxed future, as returned by [`QueryEngine`] methods.
pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, T>;

/// The executor protocol consumed by the cache layer.
///
/// Engines are cheaply cloneable handles (typically wrapping a connection
/// pool behind an `Arc`).
pub trait QueryEngine: Clone + Send + Sync + 'static {
    /// Run the statement and scan every row into a record.
    ///
    /// An empty result is `Ok(vec![])`, not an error.
    fn query_many<'a, M: Record>(
        &'a self,
        statement: &'a Statement,
    ) -> BoxFuture<'a, QueryResult<Vec<M>>>;

    /// Run the statement and scan at most one row.
    fn query_optional<'a, M: Record>(
        &'a self,
        statement: &'a Statement,
    ) -> BoxFuture<'a, QueryResult<Option<M>>>;

    /// Run the statement and scan exactly one row.
    ///
    /// Zero rows is [`QueryError::not_found`] for the record's model name.
    fn query_one<'a, M: Record>(
        &'a self,
        statement: &'a Statement,
    ) -> BoxFuture<'a, QueryResult<M>> {
        Box::pin(async move {
            self.query_optional::<M>(statement)
                .await?
                .ok_or_else(|| QueryError::not_found(M::MODEL_NAME))
        })
    }
}
