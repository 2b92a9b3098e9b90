//! Finished statements with bound parameters.
//!
//! A [`Statement`] is the immutable output of a query builder: the final SQL
//! text plus the ordered parameter values bound to its placeholders. It is
//! produced once per query invocation and consumed by the executor and by the
//! cache layer's fingerprint derivation.
//!
//! ```rust
//! use strata_query::Statement;
//!
//! let stmt = Statement::new("SELECT * FROM users WHERE id = $1").bind(42);
//! assert_eq!(stmt.sql(), "SELECT * FROM users WHERE id = $1");
//! assert_eq!(stmt.param_count(), 1);
//! ```
//!
//! All values are bound as parameters and never interpolated into the SQL
//! text, so statements remain safe to log and to hash.

use std::fmt;

use tracing::debug;

use crate::value::ParamValue;

/// A finished SQL statement with its bound parameter values, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The SQL text.
    sql: String,
    /// The bound parameter values.
    params: Vec<ParamValue>,
}

impl Statement {
    /// Create a statement from finished SQL text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create a statement with a pre-built parameter list.
    pub fn with_params(sql: impl Into<String>, params: Vec<ParamValue>) -> Self {
        let stmt = Self {
            sql: sql.into(),
            params,
        };
        debug!(
            sql_len = stmt.sql.len(),
            params = stmt.params.len(),
            placeholders = stmt.placeholder_count(),
            "Statement::with_params()"
        );
        stmt
    }

    /// Bind the next parameter value.
    pub fn bind(mut self, value: impl Into<ParamValue>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Get the SQL text.
    #[inline]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the bound parameters, in bind order.
    #[inline]
    pub fn params(&self) -> &[ParamValue] {
        &self.params
    }

    /// Number of bound parameters.
    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Count the parameter placeholders in the SQL text.
    ///
    /// Recognizes PostgreSQL-style `$1, $2, ...` (the count is the highest
    /// index seen) and MySQL/SQLite-style `?`. Useful as a sanity check that
    /// the bound parameter list matches the statement.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut chars = self.sql.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' {
                let mut num = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        num.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if !num.is_empty() {
                    if let Ok(n) = num.parse::<usize>() {
                        count = count.max(n);
                    }
                }
            } else if c == '?' {
                count += 1;
            }
        }

        count
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} params]", self.sql, self.params.len())
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for Statement {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statement_bind() {
        let stmt = Statement::new("SELECT * FROM users WHERE id = $1 AND active = $2")
            .bind(42)
            .bind(true);

        assert_eq!(stmt.param_count(), 2);
        assert_eq!(stmt.params()[0], ParamValue::Int(42));
        assert_eq!(stmt.params()[1], ParamValue::Bool(true));
    }

    #[test]
    fn test_placeholder_count_postgres() {
        let stmt = Statement::new("SELECT * FROM users WHERE id = $1 AND name = $2");
        assert_eq!(stmt.placeholder_count(), 2);

        let stmt = Statement::new("SELECT * FROM users WHERE id = $10");
        assert_eq!(stmt.placeholder_count(), 10);
    }

    #[test]
    fn test_placeholder_count_question_mark() {
        let stmt = Statement::new("SELECT * FROM users WHERE id = ? AND name = ?");
        assert_eq!(stmt.placeholder_count(), 2);
    }

    #[test]
    fn test_placeholder_count_matches_params() {
        let stmt = Statement::new("SELECT * FROM orders WHERE total > $1").bind(100i64);
        assert_eq!(stmt.placeholder_count(), stmt.param_count());
    }

    #[test]
    fn test_statement_equality() {
        let a = Statement::new("SELECT 1").bind(1);
        let b = Statement::new("SELECT 1").bind(1);
        let c = Statement::new("SELECT 1").bind(2);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let stmt = Statement::new("SELECT 1").bind(1);
        assert_eq!(stmt.to_string(), "SELECT 1 [1 params]");
    }
}
