//! Cacheability resolution.
//!
//! Decides, per query, whether the result participates in caching and which
//! namespace (table) partitions it. Participation is governed entirely by
//! the explicit [`CachePolicy`] on the call; the namespace comes from, in
//! order: an explicit override on the options, the executor's table
//! metadata, and finally the statement text itself (the first table name
//! after a `FROM` or `JOIN` keyword).
//!
//! Resolution is pure: it never executes the query and never mutates the
//! statement.
//!
//! [`CachePolicy`]: crate::policy::CachePolicy

use std::sync::OnceLock;

use regex_lite::Regex;
use strata_query::Statement;
use tracing::debug;

use crate::policy::CacheOptions;

/// Resolve the cache namespace for one query invocation.
///
/// Returns `None` when the query does not participate: either the policy is
/// disabled, or no namespace can be derived from any source. A query whose
/// table cannot be determined is simply not cached.
pub fn resolve(
    options: &CacheOptions,
    statement: &Statement,
    table_metadata: &str,
) -> Option<String> {
    if !options.policy.participates() {
        return None;
    }

    if let Some(namespace) = options.namespace.as_deref() {
        if !namespace.is_empty() {
            return Some(namespace.to_string());
        }
    }

    if !table_metadata.is_empty() {
        return Some(table_metadata.to_string());
    }

    let parsed = table_from_sql(statement.sql());
    if parsed.is_none() {
        debug!(sql = statement.sql(), "no namespace derivable, skipping cache");
    }
    parsed
}

/// Extract the primary table name from raw SQL text.
///
/// Finds the first identifier following a `FROM` or `JOIN` keyword; first
/// match wins when multiple tables are referenced. This is a fallback for
/// statements whose table metadata is unavailable; it makes no attempt to
/// understand subqueries or quoted multi-part names.
pub fn table_from_sql(sql: &str) -> Option<String> {
    static TABLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = TABLE_RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:from|join)\s+["'`]?([A-Za-z_][A-Za-z0-9_]*)"#)
            .expect("table pattern is valid")
    });

    re.captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
