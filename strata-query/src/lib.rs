//! # strata-query
//!
//! The query executor protocol for the Strata result cache.
//!
//! This crate defines the seam between a database backend and the cache
//! layer:
//!
//! - [`Statement`] - a finished SQL string with its bound parameters
//! - [`ParamValue`] - the dynamically-typed parameter value
//! - [`Record`] - the per-model capability trait (table metadata + a
//!   serde round trip through a self-describing payload)
//! - [`QueryEngine`] - the executor trait a backend implements
//! - [`QueryError`] / [`ErrorCode`] - the query error taxonomy, including
//!   the distinguished not-found condition
//!
//! A backend implements [`QueryEngine`]; the `strata-cache` crate wraps any
//! such engine with read-through caching without knowing anything about the
//! driver underneath.
//!
//! ## Statements
//!
//! ```rust
//! use strata_query::{ParamValue, Statement};
//!
//! let stmt = Statement::new("SELECT * FROM users WHERE id = $1").bind(42);
//! assert_eq!(stmt.param_count(), 1);
//! assert_eq!(stmt.params()[0], ParamValue::Int(42));
//! ```
//!
//! ## Errors
//!
//! ```rust
//! use strata_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::not_found("User");
//! assert_eq!(err.code, ErrorCode::RecordNotFound);
//! assert!(err.is_not_found());
//! ```

pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod statement;
pub mod value;

pub use engine::{BoxFuture, QueryEngine};
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use model::Record;
pub use statement::Statement;
pub use value::ParamValue;

/// Commonly used types.
pub mod prelude {
    pub use crate::engine::{BoxFuture, QueryEngine};
    pub use crate::error::{ErrorCode, QueryError, QueryResult};
    pub use crate::model::Record;
    pub use crate::statement::Statement;
    pub use crate::value::ParamValue;
}
