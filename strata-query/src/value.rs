//! Bound parameter values.
//!
//! A [`ParamValue`] is the dynamically-typed form of a value bound to a SQL
//! parameter placeholder. Backends convert these into their native parameter
//! types; the cache layer serializes them when deriving a statement
//! fingerprint.
//!
//! ```rust
//! use strata_query::ParamValue;
//!
//! let val: ParamValue = 42.into();
//! assert!(matches!(val, ParamValue::Int(42)));
//!
//! let val: ParamValue = "hello".into();
//! assert!(matches!(val, ParamValue::String(_)));
//!
//! let val: ParamValue = true.into();
//! assert!(matches!(val, ParamValue::Bool(true)));
//! ```

use serde::Serialize;

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParamValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// JSON value.
    Json(serde_json::Value),
    /// List of values.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the contained type, used in logs and errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Json(_) => "json",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert_eq!(ParamValue::from(42i32), ParamValue::Int(42));
        assert_eq!(ParamValue::from(42i64), ParamValue::Int(42));
        assert_eq!(ParamValue::from(true), ParamValue::Bool(true));
        assert_eq!(
            ParamValue::from("x"),
            ParamValue::String("x".to_string())
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ParamValue::from(None::<i64>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some(1i64)), ParamValue::Int(1));
        assert!(ParamValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_from_vec() {
        let val = ParamValue::from(vec![1i64, 2, 3]);
        assert_eq!(
            val,
            ParamValue::List(vec![
                ParamValue::Int(1),
                ParamValue::Int(2),
                ParamValue::Int(3)
            ])
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(ParamValue::Null.type_name(), "null");
        assert_eq!(ParamValue::Int(1).type_name(), "int");
        assert_eq!(ParamValue::Json(serde_json::json!({})).type_name(), "json");
    }
}
