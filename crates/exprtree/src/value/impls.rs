//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use indexmap::IndexMap;
use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a decimal value
    pub fn bignumber(n: BigNumber) -> Self {
        Value::BigNumber(n)
    }

    /// Create a complex value
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex::new(re, im))
    }

    /// Create a unit value
    pub fn unit(u: UnitValue) -> Self {
        Value::Unit(Arc::new(u))
    }

    /// Create a matrix value
    pub fn matrix(items: Vec<Value>) -> Self {
        Value::Matrix(Arc::new(items))
    }

    /// Create an object value
    pub fn object(entries: IndexMap<String, Value>) -> Self {
        Value::Object(Arc::new(entries))
    }

    /// Create a block result set
    pub fn result_set(entries: Vec<Value>) -> Self {
        Value::ResultSet(Arc::new(entries))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════
    /// Check if value is any numeric kind (number, decimal, complex)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Number(_) | Value::BigNumber(_) | Value::Complex(_)
        )
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════
    /// Extract as f64 (booleans coerce to 0/1, decimals convert lossily)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::BigNumber(n) => Some(n.to_f64()),
            _ => None,
        }
    }

    /// Read a plain number (or boolean as 0/1), failing with
    /// [`crate::ExprError::TypeError`] for any other kind.
    pub fn to_number(&self) -> crate::Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(crate::ExprError::TypeError {
                expected: "number".to_string(),
                got: crate::type_name(other).to_string(),
            }),
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract matrix or result set entries as slice
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Matrix(v) | Value::ResultSet(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Evaluate the truthiness predicate on this value.
    pub fn is_truthy(&self) -> crate::Result<bool> {
        is_truthy(Some(self))
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,

            // NaN never equals itself, same as f64
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,

            (Value::BigNumber(a), Value::BigNumber(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Unit(a), Value::Unit(b)) => a == b,

            // Collections (element-wise comparison)
            (Value::Matrix(a), Value::Matrix(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::ResultSet(a), Value::ResultSet(b)) => a == b,

            // Different kinds are never equal
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<BigNumber> for Value {
    fn from(n: BigNumber) -> Self {
        Value::BigNumber(n)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl From<UnitValue> for Value {
    fn from(u: UnitValue) -> Self {
        Value::unit(u)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::matrix(v.into_iter().map(Into::into).collect())
    }
}
