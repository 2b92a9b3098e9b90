//! The record capability trait.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record type that can be queried through a [`QueryEngine`] and round-trip
/// a self-describing payload.
///
/// [`QueryEngine`]: crate::engine::QueryEngine
///
/// Implementations are normally generated from a schema definition; the
/// consts expose the executor-side metadata (model name, table name, columns)
/// that the cache layer uses for namespacing and error messages. The
/// `Serialize`/`DeserializeOwned` supertraits are what make a record
/// cacheable: a populated destination can always be encoded to a
/// field-name-keyed payload and reconstructed from one.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use strata_query::Record;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct User {
///     id: i64,
///     email: String,
/// }
///
/// impl Record for User {
///     const MODEL_NAME: &'static str = "User";
///     const TABLE_NAME: &'static str = "users";
///     const PRIMARY_KEY: &'static [&'static str] = &["id"];
///     const COLUMNS: &'static [&'static str] = &["id", "email"];
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The model name (e.g. "User").
    const MODEL_NAME: &'static str;
    /// The database table backing this model.
    const TABLE_NAME: &'static str;
    /// The primary key column(s).
    const PRIMARY_KEY: &'static [&'static str];
    /// All mapped columns.
    const COLUMNS: &'static [&'static str];
}
