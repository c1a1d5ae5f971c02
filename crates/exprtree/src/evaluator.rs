//! Front door for compiling and evaluating trees
//!
//! An [`Evaluator`] owns the dispatch table consulted while compiling and
//! the context handed to every evaluation it runs.

use tracing::{debug, instrument};

use crate::compiled::{Compile, Expression};
use crate::context::EvalContext;
use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::node::Node;
use crate::scope::{ArgNames, Args, Scope};
use crate::value::Value;

/// Compiles nodes against a dispatch table.
#[derive(Debug, Clone)]
pub struct Evaluator {
    dispatch: Dispatch,
    context: EvalContext,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the standard prelude.
    pub fn new() -> Self {
        Self::with_dispatch(Dispatch::with_prelude())
    }

    /// Create an evaluator using a custom dispatch table.
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch,
            context: EvalContext::default(),
        }
    }

    /// Use `context` for evaluations started through [`Evaluator::evaluate`].
    pub fn with_context(mut self, context: EvalContext) -> Self {
        self.context = context;
        self
    }

    /// The dispatch table.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Mutable access to the dispatch table, e.g. to define functions.
    pub fn dispatch_mut(&mut self) -> &mut Dispatch {
        &mut self.dispatch
    }

    /// The evaluation context.
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    /// Compile `node` with no statically bound parameters.
    pub fn compile(&self, node: &Node) -> Result<Expression> {
        self.compile_with_args(node, &ArgNames::new())
    }

    /// Compile `node`; symbols named in `arg_names` read from [`Args`].
    #[instrument(level = "debug", skip_all, fields(node = node.type_name()))]
    pub fn compile_with_args(&self, node: &Node, arg_names: &ArgNames) -> Result<Expression> {
        let compiled = node.compile(&self.dispatch, arg_names)?;
        debug!(args = arg_names.len(), "compiled");
        Ok(Expression::new(compiled))
    }

    /// Compile `node` and evaluate it once against `scope`.
    #[instrument(level = "debug", skip_all, fields(node = node.type_name()))]
    pub fn evaluate(&self, node: &Node, scope: &mut Scope) -> Result<Option<Value>> {
        let expression = self.compile(node)?;
        expression.evaluate_with(scope, &Args::new(), &self.context)
    }
}
