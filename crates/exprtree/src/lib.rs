//! # exprtree
//!
//! Expression trees that compile once into closures and evaluate many times.
//!
//! A parser (not part of this crate) produces a tree of [`Node`]s. Each node
//! compiles itself into a [`CompiledExpression`] against a [`Dispatch`]
//! table, and the closure is then evaluated against a mutable [`Scope`].
//!
//! ## Architecture
//!
//! - **Nodes**: an immutable, structurally shared tree ([`node`])
//! - **Compilation**: per-variant [`Compile`] impls producing closures
//! - **Conditionals**: [`IfElseNode`] with lazy, first-match-wins branches
//!   driven by [`is_truthy`]
//! - **Tree walking**: [`Node::traverse`], [`Node::rebuild`] and the
//!   recursive [`TreeWalk`] utilities
//! - **Persistence**: tagged JSON records rebuilt through a [`NodeRegistry`]
//!
//! ## Example
//!
//! ```
//! use exprtree::{ConstantNode, Evaluator, IfElseNode, Node, Scope, SymbolNode, Value};
//!
//! let node = Node::from(IfElseNode::new(
//!     vec![Node::from(SymbolNode::new("flag")).shared()],
//!     vec![
//!         Node::from(ConstantNode::new("yes")).shared(),
//!         Node::from(ConstantNode::new("no")).shared(),
//!     ],
//! )?);
//!
//! let mut scope = Scope::new();
//! scope.set("flag", Value::Bool(false));
//! let result = Evaluator::new().evaluate(&node, &mut scope)?;
//! assert_eq!(result, Some(Value::string("no")));
//! # Ok::<(), exprtree::ExprError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compiled;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod node;
pub mod options;
pub mod scope;
pub mod serializer;
pub mod value;
pub mod walk;

// Re-export main types
pub use compiled::{compiled_fn, Compile, CompiledExpression, Expression};
pub use context::EvalContext;
pub use dispatch::{BuiltinFn, BuiltinFnPtr, Dispatch};
pub use error::{type_name, ExprError, Result};
pub use evaluator::Evaluator;
pub use node::{
    AssignmentNode, BlockEntry, BlockNode, ChildPath, ConstantNode, FunctionNode, IfElseNode,
    Node, NodeRef, OperatorNode, ParenthesisNode, SymbolNode,
};
pub use options::{Parenthesis, RenderOptions};
pub use scope::{ArgNames, Args, Scope};
pub use serializer::{registry, NodeConstructor, NodeRegistry, TAG_FIELD};
pub use value::{is_truthy, BigNumber, Complex, UnitValue, Value};
pub use walk::TreeWalk;

/// exprtree version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
