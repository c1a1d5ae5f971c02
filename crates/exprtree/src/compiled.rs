//! Compiled expression types.
//!
//! Compilation turns a node tree into a [`CompiledExpression`] once; the
//! closure can then be evaluated any number of times against different
//! scopes without walking the tree again.

use std::fmt;

use crate::context::EvalContext;
use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::scope::{ArgNames, Args, Scope};
use crate::value::Value;

/// A compiled expression represented as a dynamically-dispatched closure.
///
/// The closure takes three parameters:
/// - `&mut Scope`: variables shared by one evaluation, mutated by assignments
/// - `&Args`: values of statically bound parameters
/// - `&EvalContext`: ambient context, passed through unchanged
///
/// `Ok(None)` is the absent outcome (e.g. a conditional with no matching
/// branch and no else branch). It is not an error.
pub type CompiledExpression =
    Box<dyn Fn(&mut Scope, &Args, &EvalContext) -> Result<Option<Value>> + Send + Sync>;

/// Box a closure as a [`CompiledExpression`].
///
/// Going through this helper lets the closure's argument types be inferred
/// from the `Fn` bound.
pub fn compiled_fn<F>(f: F) -> CompiledExpression
where
    F: Fn(&mut Scope, &Args, &EvalContext) -> Result<Option<Value>> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Trait for compiling AST nodes into closures.
///
/// Every node variant implements this; [`crate::Node`] dispatches to them.
pub trait Compile {
    /// Compile this node, resolving operators and functions against
    /// `dispatch`. Symbols named in `arg_names` are read from [`Args`].
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression>;
}

/// A compiled tree ready for evaluation.
pub struct Expression {
    compiled: CompiledExpression,
}

impl Expression {
    /// Wrap a compiled closure.
    pub fn new(compiled: CompiledExpression) -> Self {
        Self { compiled }
    }

    /// Evaluate against `scope` with no bound arguments and a default context.
    pub fn evaluate(&self, scope: &mut Scope) -> Result<Option<Value>> {
        self.evaluate_with(scope, &Args::default(), &EvalContext::default())
    }

    /// Evaluate with explicit arguments and context.
    pub fn evaluate_with(
        &self,
        scope: &mut Scope,
        args: &Args,
        ctx: &EvalContext,
    ) -> Result<Option<Value>> {
        (self.compiled)(scope, args, ctx)
    }

    /// Unwrap the underlying closure.
    pub fn into_inner(self) -> CompiledExpression {
        self.compiled
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression(<compiled>)")
    }
}
