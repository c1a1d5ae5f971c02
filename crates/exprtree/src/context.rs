//! Evaluation context configuration

use crate::value::Value;

/// Ambient state passed through every compiled closure unchanged.
///
/// Nodes never mutate the context. Functions and callers may use the
/// attached value to carry information across an evaluation.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// Opaque value made available to the whole evaluation
    pub value: Option<Value>,

    /// Whether to trace evaluation (branch selection, assignments)
    pub trace: bool,
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context carrying an ambient value.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Enable or disable evaluation tracing (builder pattern).
    pub fn traced(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// The ambient value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}
