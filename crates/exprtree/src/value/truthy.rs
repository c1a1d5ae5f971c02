//! Truthiness predicate used to select conditional branches

use super::Value;
use crate::error::{type_name, ExprError, Result};

fn number_truthy(n: f64) -> bool {
    n != 0.0 && !n.is_nan()
}

/// Decide whether a condition result selects its branch.
///
/// `None` is the absent outcome of an expression that produced no value.
/// Checks run in a fixed order: plain scalars, decimals, complex numbers,
/// units, then null. Container kinds have no truth value and fail with
/// [`ExprError::UnsupportedConditionType`].
pub fn is_truthy(value: Option<&Value>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value {
        Value::Number(n) => Ok(number_truthy(*n)),
        Value::Bool(b) => Ok(*b),
        Value::String(s) => Ok(!s.is_empty()),

        Value::BigNumber(n) => Ok(!n.is_zero()),
        Value::Complex(c) => Ok(number_truthy(c.re) || number_truthy(c.im)),
        Value::Unit(u) => Ok(u.value.is_some_and(number_truthy)),

        Value::Null => Ok(false),

        Value::Matrix(_) | Value::Object(_) | Value::ResultSet(_) => {
            Err(ExprError::UnsupportedConditionType {
                kind: type_name(value).to_string(),
            })
        }
    }
}
