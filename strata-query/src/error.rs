//! Error types for query execution.
//!
//! Error codes follow a pattern: S{category}{number}
//! - 1xxx: Query errors (not found, etc.)
//! - 3xxx: Connection errors
//! - 5xxx: Execution errors
//! - 6xxx: Data errors (type, serialization)
//! - 9xxx: Internal errors
//!
//! ```rust
//! use strata_query::{QueryError, ErrorCode};
//!
//! let err = QueryError::not_found("User");
//! assert_eq!(err.code, ErrorCode::RecordNotFound);
//! assert!(err.is_not_found());
//! ```

use std::fmt;

use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Query errors (1xxx)
    /// Record not found (S1001).
    RecordNotFound = 1001,
    /// Multiple records found when expecting one (S1002).
    NotUnique = 1002,

    // Connection errors (3xxx)
    /// Database connection failed (S3001).
    ConnectionFailed = 3001,
    /// Connection timeout (S3003).
    ConnectionTimeout = 3003,

    // Query execution errors (5xxx)
    /// SQL syntax error (S5002).
    SqlSyntax = 5002,
    /// Invalid parameter (S5003).
    InvalidParameter = 5003,
    /// General database error (S5005).
    DatabaseError = 5005,

    // Data errors (6xxx)
    /// Invalid data type (S6001).
    InvalidDataType = 6001,
    /// Serialization error (S6002).
    SerializationError = 6002,
    /// Deserialization error (S6003).
    DeserializationError = 6003,

    // Internal errors (9xxx)
    /// Internal error (S9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "S1001").
    pub fn code(&self) -> String {
        format!("S{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RecordNotFound => "Record not found",
            Self::NotUnique => "Multiple records found",
            Self::ConnectionFailed => "Database connection failed",
            Self::ConnectionTimeout => "Connection timeout",
            Self::SqlSyntax => "SQL syntax error",
            Self::InvalidParameter => "Invalid parameter",
            Self::DatabaseError => "Database error",
            Self::InvalidDataType => "Invalid data type",
            Self::SerializationError => "Serialization error",
            Self::DeserializationError => "Deserialization error",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The model involved.
    pub model: Option<String>,
    /// The SQL query (if available).
    pub sql: Option<String>,
}

/// Errors that can occur during query operations.
#[derive(Error, Debug)]
#[error("[{code}] {message}")]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the SQL query.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.context.sql = Some(sql.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create a not found error.
    pub fn not_found(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::RecordNotFound,
            format!("No {} record found matching the query", model),
        )
        .with_model(model)
    }

    /// Create a not unique error.
    pub fn not_unique(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::NotUnique,
            format!("Expected unique {} record but found multiple", model),
        )
        .with_model(model)
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConnectionFailed, message)
    }

    /// Create a general database execution error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeserializationError, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    // ============== Predicates ==============

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::RecordNotFound
    }

    /// Check if this is a connection-level error.
    pub fn is_connection(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ConnectionFailed | ErrorCode::ConnectionTimeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string() {
        assert_eq!(ErrorCode::RecordNotFound.code(), "S1001");
        assert_eq!(ErrorCode::DatabaseError.code(), "S5005");
        assert_eq!(ErrorCode::Internal.code(), "S9001");
    }

    #[test]
    fn test_not_found() {
        let err = QueryError::not_found("User");
        assert_eq!(err.code, ErrorCode::RecordNotFound);
        assert!(err.is_not_found());
        assert_eq!(err.context.model.as_deref(), Some("User"));
        assert!(err.to_string().contains("S1001"));
        assert!(err.to_string().contains("User"));
    }

    #[test]
    fn test_builder_context() {
        let err = QueryError::database("deadlock detected")
            .with_operation("fetch_many")
            .with_sql("SELECT 1");

        assert_eq!(err.context.operation.as_deref(), Some("fetch_many"));
        assert_eq!(err.context.sql.as_deref(), Some("SELECT 1"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = QueryError::connection("could not reach database").with_source(io);

        assert!(err.is_connection());
        assert!(std::error::Error::source(&err).is_some());
    }
}
