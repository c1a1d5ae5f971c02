//! Operator/function namespace consulted while compiling
//!
//! The compiler resolves operator and function names here once, at compile
//! time. The standard prelude covers plain numbers and booleans; it also
//! provides constructors for the extended numeric kinds, but no arithmetic
//! on them.

use indexmap::IndexMap;
use std::f64::consts;
use std::sync::Arc;

use crate::error::{type_name, ExprError, Result};
use crate::value::{is_truthy, BigNumber, UnitValue, Value};

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr = Arc<dyn Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync>;

/// A built-in native function.
///
/// These are Rust functions exposed to compiled expressions.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Wrap a closure as a builtin.
    pub fn new(
        name: impl Into<String>,
        arity: i32,
        func: impl Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Invoke the function, checking arity first.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if self.arity >= 0 && args.len() != self.arity as usize {
            return Err(ExprError::FunctionFailed {
                name: self.name.clone(),
                message: format!("expected {} argument(s), got {}", self.arity, args.len()),
            });
        }
        (self.func)(args).map_err(|message| ExprError::FunctionFailed {
            name: self.name.clone(),
            message,
        })
    }
}

impl std::fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

/// Table of functions and constants available to compiled expressions.
#[derive(Debug, Clone, Default)]
pub struct Dispatch {
    functions: IndexMap<String, BuiltinFn>,
    constants: IndexMap<String, Value>,
}

impl Dispatch {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the standard prelude loaded.
    pub fn with_prelude() -> Self {
        let mut dispatch = Self::new();
        dispatch.load_prelude();
        dispatch
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn define_builtin(&mut self, builtin: BuiltinFn) {
        self.functions.insert(builtin.name.clone(), builtin);
    }

    /// Register a named constant.
    pub fn define_constant(&mut self, name: impl Into<String>, value: Value) {
        self.constants.insert(name.into(), value);
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&BuiltinFn> {
        self.functions.get(name)
    }

    /// Look up a function, failing with [`ExprError::UnknownFunction`].
    pub fn resolve(&self, name: &str) -> Result<BuiltinFn> {
        self.function(name)
            .cloned()
            .ok_or_else(|| ExprError::UnknownFunction {
                name: name.to_string(),
            })
    }

    /// Look up a constant by name.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    /// Load the standard prelude into this table.
    pub fn load_prelude(&mut self) {
        self.define_constant("pi", Value::Number(consts::PI));
        self.define_constant("e", Value::Number(consts::E));
        self.define_constant("Infinity", Value::Number(f64::INFINITY));
        self.define_constant("NaN", Value::Number(f64::NAN));
        self.define_constant("null", Value::Null);

        // Arithmetic
        self.define_builtin(binary_numeric("add", |a, b| a + b));
        self.define_builtin(binary_numeric("subtract", |a, b| a - b));
        self.define_builtin(binary_numeric("multiply", |a, b| a * b));
        self.define_builtin(binary_numeric("divide", |a, b| a / b));
        self.define_builtin(binary_numeric("mod", |a, b| a - b * (a / b).floor()));
        self.define_builtin(binary_numeric("pow", f64::powf));
        self.define_builtin(unary_numeric("unaryMinus", |a| -a));
        self.define_builtin(unary_numeric("unaryPlus", |a| a));

        // Comparison
        self.define_builtin(BuiltinFn::new("equal", 2, |args| {
            Ok(Value::Bool(loose_equal(&args[0], &args[1])))
        }));
        self.define_builtin(BuiltinFn::new("unequal", 2, |args| {
            Ok(Value::Bool(!loose_equal(&args[0], &args[1])))
        }));
        self.define_builtin(compare("smaller", |a, b| a < b));
        self.define_builtin(compare("larger", |a, b| a > b));
        self.define_builtin(compare("smallerEq", |a, b| a <= b));
        self.define_builtin(compare("largerEq", |a, b| a >= b));

        // Logic
        self.define_builtin(BuiltinFn::new("not", 1, |args| {
            Ok(Value::Bool(!truthy(&args[0])?))
        }));
        self.define_builtin(BuiltinFn::new("and", 2, |args| {
            Ok(Value::Bool(truthy(&args[0])? && truthy(&args[1])?))
        }));
        self.define_builtin(BuiltinFn::new("or", 2, |args| {
            Ok(Value::Bool(truthy(&args[0])? || truthy(&args[1])?))
        }));

        // Constructors for the extended kinds
        self.define_builtin(BuiltinFn::new("bignumber", 1, builtin_bignumber));
        self.define_builtin(BuiltinFn::new("complex", 2, |args| {
            let re = number(&args[0])?;
            let im = number(&args[1])?;
            Ok(Value::complex(re, im))
        }));
        self.define_builtin(BuiltinFn::new("unit", -1, builtin_unit));
        self.define_builtin(BuiltinFn::new("matrix", -1, |args| {
            Ok(Value::matrix(args.to_vec()))
        }));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Prelude Helpers
// ═══════════════════════════════════════════════════════════════════

fn number(value: &Value) -> std::result::Result<f64, String> {
    value.to_number().map_err(|e| e.to_string())
}

fn truthy(value: &Value) -> std::result::Result<bool, String> {
    is_truthy(Some(value)).map_err(|e| e.to_string())
}

fn loose_equal(a: &Value, b: &Value) -> bool {
    match (number(a), number(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

fn binary_numeric(name: &str, op: fn(f64, f64) -> f64) -> BuiltinFn {
    BuiltinFn::new(name, 2, move |args| {
        Ok(Value::Number(op(number(&args[0])?, number(&args[1])?)))
    })
}

fn unary_numeric(name: &str, op: fn(f64) -> f64) -> BuiltinFn {
    BuiltinFn::new(name, 1, move |args| Ok(Value::Number(op(number(&args[0])?))))
}

fn compare(name: &str, op: fn(f64, f64) -> bool) -> BuiltinFn {
    BuiltinFn::new(name, 2, move |args| {
        Ok(Value::Bool(op(number(&args[0])?, number(&args[1])?)))
    })
}

fn builtin_bignumber(args: &[Value]) -> std::result::Result<Value, String> {
    match &args[0] {
        Value::String(s) => s
            .parse::<BigNumber>()
            .map(Value::BigNumber)
            .map_err(|e| e.to_string()),
        Value::Number(n) => n
            .to_string()
            .parse::<BigNumber>()
            .map(Value::BigNumber)
            .map_err(|e| e.to_string()),
        Value::BigNumber(n) => Ok(Value::BigNumber(n.clone())),
        other => Err(format!("cannot convert {} to BigNumber", type_name(other))),
    }
}

fn builtin_unit(args: &[Value]) -> std::result::Result<Value, String> {
    match args {
        [Value::String(name)] => Ok(Value::unit(UnitValue::bare(name.as_str()))),
        [magnitude, Value::String(name)] => {
            Ok(Value::unit(UnitValue::new(number(magnitude)?, name.as_str())))
        }
        _ => Err("expected unit(name) or unit(value, name)".to_string()),
    }
}
