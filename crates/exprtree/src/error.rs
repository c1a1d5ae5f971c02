//! Error types for expression-tree construction, compilation and evaluation

use thiserror::Error;

use crate::value::Value;

/// Main error type for exprtree operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// A node was constructed with arguments that violate its invariants
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A rebuild callback did not produce a node for one of the children
    #[error("Callback function must return a Node (while rebuilding {node_type} at `{path}`)")]
    InvalidRebuildResult {
        /// Variant being rebuilt
        node_type: &'static str,
        /// Position of the child whose replacement was missing
        path: String,
    },

    /// The truthiness predicate met a value kind it does not handle
    #[error("Unsupported type of condition \"{kind}\"")]
    UnsupportedConditionType {
        /// Name of the offending value kind
        kind: String,
    },

    /// A persisted record carries a tag with no registered constructor
    #[error("Unregistered node type \"{tag}\"")]
    UnregisteredNodeType {
        /// The unknown tag
        tag: String,
    },

    /// A persisted record could not be decoded
    #[error("Malformed {tag} record: {message}")]
    MalformedRecord {
        /// Tag of the record being decoded
        tag: String,
        /// What went wrong
        message: String,
    },

    /// Symbol not found in args, scope or dispatch constants
    #[error("Undefined symbol {name}")]
    UndefinedSymbol {
        /// Symbol name
        name: String,
    },

    /// Operator or function name not present in the dispatch table
    #[error("Unknown function {name}")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// A dispatched function reported an error
    #[error("Error in function {name}: {message}")]
    FunctionFailed {
        /// Function name
        name: String,
        /// Message reported by the function
        message: String,
    },

    /// Type mismatch error
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type
        expected: String,
        /// Actual type received
        got: String,
    },
}

impl ExprError {
    /// Shorthand for an [`ExprError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ExprError::InvalidArgument(message.into())
    }

    pub(crate) fn malformed(tag: &str, message: impl ToString) -> Self {
        ExprError::MalformedRecord {
            tag: tag.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for exprtree operations
pub type Result<T> = std::result::Result<T, ExprError>;

/// Human-readable name of a value's kind, used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::BigNumber(_) => "BigNumber",
        Value::Complex(_) => "Complex",
        Value::Unit(_) => "Unit",
        Value::Matrix(_) => "Matrix",
        Value::Object(_) => "Object",
        Value::ResultSet(_) => "ResultSet",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_condition_message_names_kind() {
        let err = ExprError::UnsupportedConditionType {
            kind: "Matrix".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported type of condition \"Matrix\"");
    }

    #[test]
    fn test_rebuild_message_mentions_path() {
        let err = ExprError::InvalidRebuildResult {
            node_type: "IfElseNode",
            path: "elseBlock".to_string(),
        };
        assert!(err.to_string().contains("must return a Node"));
        assert!(err.to_string().contains("elseBlock"));
    }

    #[test]
    fn test_type_name_covers_kinds() {
        assert_eq!(type_name(&Value::Null), "null");
        assert_eq!(type_name(&Value::Number(1.0)), "number");
        assert_eq!(type_name(&Value::matrix(vec![])), "Matrix");
        assert_eq!(type_name(&Value::result_set(vec![])), "ResultSet");
    }
}
