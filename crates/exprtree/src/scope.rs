//! Variable scope and statically bound arguments

use indexmap::{IndexMap, IndexSet};

use crate::value::Value;

/// Names of parameters that are statically bound when compiling.
///
/// Symbol nodes whose name is in this set read from [`Args`] instead of
/// the dynamic [`Scope`].
pub type ArgNames = IndexSet<String>;

/// The mutable variable mapping shared by one evaluation of a tree.
///
/// Assignment nodes write into it; symbol nodes read from it. Bindings keep
/// insertion order so the scope prints predictably.
///
/// # Example
///
/// ```
/// use exprtree::{Scope, Value};
///
/// let mut scope = Scope::new();
/// scope.set("x", Value::Number(1.0));
/// scope.set("x", Value::Number(10.0)); // Overwrites
///
/// assert_eq!(scope.get("x"), Some(&Value::Number(10.0)));
/// assert_eq!(scope.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: IndexMap<String, Value>,
}

impl Scope {
    /// Create a new empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Bind `name` to `value`, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    /// Check if a binding exists.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Remove a binding, preserving the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.shift_remove(name)
    }

    /// Iterate over all bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get all binding names.
    pub fn names(&self) -> Vec<&str> {
        self.bindings.keys().map(String::as_str).collect()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the scope is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Values of statically bound parameters, supplied per evaluation.
///
/// Read-only from the point of view of compiled closures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: IndexMap<String, Value>,
}

impl Args {
    /// Create an empty argument mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument (builder pattern).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if an argument is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The names of all supplied arguments, usable as compile-time [`ArgNames`].
    pub fn names(&self) -> ArgNames {
        self.values.keys().cloned().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut scope = Scope::new();
        assert!(scope.is_empty());
        assert_eq!(scope.set("a", Value::Number(1.0)), None);
        assert_eq!(scope.set("a", Value::Number(2.0)), Some(Value::Number(1.0)));
        assert_eq!(scope.get("a"), Some(&Value::Number(2.0)));
        assert!(scope.contains("a"));
        assert!(!scope.contains("b"));
    }

    #[test]
    fn test_insertion_order_survives_remove() {
        let mut scope: Scope = [
            ("x", Value::Number(1.0)),
            ("y", Value::Number(2.0)),
            ("z", Value::Number(3.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(scope.remove("y"), Some(Value::Number(2.0)));
        assert_eq!(scope.names(), vec!["x", "z"]);
    }

    #[test]
    fn test_clear() {
        let mut scope = Scope::new();
        scope.set("a", Value::Bool(true));
        scope.clear();
        assert_eq!(scope.len(), 0);
    }

    #[test]
    fn test_args_names() {
        let args = Args::new()
            .with("x", Value::Number(1.0))
            .with("y", Value::Number(2.0));
        let names = args.names();
        assert!(names.contains("x"));
        assert!(names.contains("y"));
        assert_eq!(args.get("x"), Some(&Value::Number(1.0)));
        assert!(!args.contains("z"));
    }
}
