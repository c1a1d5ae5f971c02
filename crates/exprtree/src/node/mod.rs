//! Expression tree nodes
//!
//! [`Node`] is a closed sum type over every node variant. Each consumer
//! (compiler, traversal, rebuild, serializer, renderer) matches on it
//! exhaustively, so adding a variant is a compile-time checked change.
//!
//! Nodes are immutable. Children are held as [`NodeRef`]s, so rebuilding a
//! node allocates only the new parent and shares every untouched subtree.

mod assignment;
mod block;
mod constant;
mod function;
mod if_else;
mod operator;
mod parenthesis;
pub(crate) mod render;
mod symbol;

pub use assignment::AssignmentNode;
pub use block::{BlockEntry, BlockNode};
pub use constant::ConstantNode;
pub use function::FunctionNode;
pub use if_else::IfElseNode;
pub use operator::OperatorNode;
pub use parenthesis::ParenthesisNode;
pub use symbol::SymbolNode;

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::compiled::{Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::{ExprError, Result};
use crate::options::{Parenthesis, RenderOptions};
use crate::scope::ArgNames;
use render::Notation;

/// Shared reference to a node. Subtrees are shared, never deep-copied.
pub type NodeRef = Arc<Node>;

/// Structural position of a child within its parent.
///
/// Displays as the path label used by traversal callbacks, e.g.
/// `ifCondition` or `elseIfBlock[2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildPath {
    /// First condition of a conditional
    IfCondition,
    /// Condition `i >= 1` of a conditional
    ElseIfCondition(usize),
    /// Block guarded by the first condition
    IfBlock,
    /// Block guarded by condition `i >= 1`
    ElseIfBlock(usize),
    /// Trailing unconditional block
    ElseBlock,
    /// Assignment target
    Object,
    /// Assigned value
    Value,
    /// Statement `i` of a block
    Block(usize),
    /// Operand or argument `i`
    Arg(usize),
    /// Content of a parenthesis
    Content,
}

impl fmt::Display for ChildPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildPath::IfCondition => write!(f, "ifCondition"),
            ChildPath::ElseIfCondition(i) => write!(f, "elseIfCondition[{}]", i),
            ChildPath::IfBlock => write!(f, "ifBlock"),
            ChildPath::ElseIfBlock(i) => write!(f, "elseIfBlock[{}]", i),
            ChildPath::ElseBlock => write!(f, "elseBlock"),
            ChildPath::Object => write!(f, "object"),
            ChildPath::Value => write!(f, "value"),
            ChildPath::Block(i) => write!(f, "blocks[{}]", i),
            ChildPath::Arg(i) => write!(f, "args[{}]", i),
            ChildPath::Content => write!(f, "content"),
        }
    }
}

/// One node of an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal value
    Constant(ConstantNode),
    /// Variable reference
    Symbol(SymbolNode),
    /// `name = value`
    Assignment(AssignmentNode),
    /// Sequence of statements
    Block(BlockNode),
    /// Unary or binary operator
    Operator(OperatorNode),
    /// Explicit parentheses
    Parenthesis(ParenthesisNode),
    /// Function call
    Function(FunctionNode),
    /// if / else if / else chain
    IfElse(IfElseNode),
}

impl Node {
    /// Wrap this node in a shared reference.
    pub fn shared(self) -> NodeRef {
        Arc::new(self)
    }

    /// The variant tag, also used as the serialization tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Constant(_) => ConstantNode::TYPE,
            Node::Symbol(_) => SymbolNode::TYPE,
            Node::Assignment(_) => AssignmentNode::TYPE,
            Node::Block(_) => BlockNode::TYPE,
            Node::Operator(_) => OperatorNode::TYPE,
            Node::Parenthesis(_) => ParenthesisNode::TYPE,
            Node::Function(_) => FunctionNode::TYPE,
            Node::IfElse(_) => IfElseNode::TYPE,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Traversal and Rebuild
    // ═══════════════════════════════════════════════════════════════════

    /// Call `visit(child, path, parent)` once per immediate child, in
    /// declaration order. Not recursive. `parent` is always `self`.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&NodeRef, ChildPath, &Node),
    {
        let mut each = |child: &NodeRef, path: ChildPath| visit(child, path, self);
        match self {
            Node::Constant(_) | Node::Symbol(_) => {}
            Node::Assignment(n) => n.for_each_child(&mut each),
            Node::Block(n) => n.for_each_child(&mut each),
            Node::Operator(n) => n.for_each_child(&mut each),
            Node::Parenthesis(n) => n.for_each_child(&mut each),
            Node::Function(n) => n.for_each_child(&mut each),
            Node::IfElse(n) => n.for_each_child(&mut each),
        }
    }

    /// Immediate children in traversal order.
    pub fn children(&self) -> Vec<NodeRef> {
        let mut children = Vec::new();
        self.traverse(|child, _, _| children.push(Arc::clone(child)));
        children
    }

    /// Build a same-variant node whose children are `f(child, path, parent)`.
    ///
    /// Children are visited in traversal order. The first error returned by
    /// `f` aborts the rebuild. The variant's construction invariants are
    /// checked again on the new children.
    pub fn try_rebuild<F>(&self, mut f: F) -> Result<Node>
    where
        F: FnMut(&NodeRef, ChildPath, &Node) -> Result<NodeRef>,
    {
        let mut each = |child: &NodeRef, path: ChildPath| f(child, path, self);
        Ok(match self {
            Node::Constant(n) => Node::Constant(n.clone()),
            Node::Symbol(n) => Node::Symbol(n.clone()),
            Node::Assignment(n) => Node::Assignment(n.map_children(&mut each)?),
            Node::Block(n) => Node::Block(n.map_children(&mut each)?),
            Node::Operator(n) => Node::Operator(n.map_children(&mut each)?),
            Node::Parenthesis(n) => Node::Parenthesis(n.map_children(&mut each)?),
            Node::Function(n) => Node::Function(n.map_children(&mut each)?),
            Node::IfElse(n) => Node::IfElse(n.map_children(&mut each)?),
        })
    }

    /// Build a same-variant node whose children are `f(child, path, parent)`.
    ///
    /// A callback returning `None` fails with
    /// [`ExprError::InvalidRebuildResult`].
    pub fn rebuild<F>(&self, mut f: F) -> Result<Node>
    where
        F: FnMut(&NodeRef, ChildPath, &Node) -> Option<NodeRef>,
    {
        let node_type = self.type_name();
        self.try_rebuild(|child, path, parent| {
            f(child, path, parent).ok_or_else(|| ExprError::InvalidRebuildResult {
                node_type,
                path: path.to_string(),
            })
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Serialization
    // ═══════════════════════════════════════════════════════════════════

    /// Encode this node (and its children, recursively) as a tagged record.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Node::Constant(n) => n.to_json(),
            Node::Symbol(n) => n.to_json(),
            Node::Assignment(n) => n.to_json(),
            Node::Block(n) => n.to_json(),
            Node::Operator(n) => n.to_json(),
            Node::Parenthesis(n) => n.to_json(),
            Node::Function(n) => n.to_json(),
            Node::IfElse(n) => n.to_json(),
        }
    }

    /// Decode a tagged record using the global registry.
    pub fn from_json(record: &serde_json::Value) -> Result<Node> {
        crate::serializer::registry().deserialize(record)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Rendering
    // ═══════════════════════════════════════════════════════════════════

    /// Render as expression text.
    pub fn render(&self, options: &RenderOptions) -> String {
        self.render_as(options, Notation::Text)
    }

    /// Render as LaTeX.
    pub fn render_tex(&self, options: &RenderOptions) -> String {
        self.render_as(options, Notation::Tex)
    }

    /// Render as HTML markup.
    pub fn render_html(&self, options: &RenderOptions) -> String {
        self.render_as(options, Notation::Html)
    }

    pub(crate) fn render_as(&self, options: &RenderOptions, notation: Notation) -> String {
        match self {
            Node::Constant(n) => n.render(notation),
            Node::Symbol(n) => n.render(notation),
            Node::Assignment(n) => n.render(options, notation),
            Node::Block(n) => n.render(options, notation),
            Node::Operator(n) => n.render(options, notation),
            Node::Parenthesis(n) => n.render(options, notation),
            Node::Function(n) => n.render(options, notation),
            Node::IfElse(n) => n.render(options, notation),
        }
    }

    /// Display precedence used to decide parenthesization.
    ///
    /// `None` means the node never needs parentheses on its own account.
    /// Under anything but `keep`, a parenthesis node is transparent and
    /// reports its content's precedence.
    pub fn precedence(&self, parenthesis: Parenthesis) -> Option<u8> {
        match self {
            Node::Parenthesis(p) if parenthesis != Parenthesis::Keep => {
                p.content().precedence(parenthesis)
            }
            Node::Assignment(_) | Node::IfElse(_) => Some(render::PRECEDENCE_CONTROL),
            Node::Operator(op) => render::operator_precedence(op.fn_name()),
            Node::Constant(_)
            | Node::Symbol(_)
            | Node::Block(_)
            | Node::Parenthesis(_)
            | Node::Function(_) => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Compilation Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Compile for Node {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        match self {
            Node::Constant(n) => n.compile(dispatch, arg_names),
            Node::Symbol(n) => n.compile(dispatch, arg_names),
            Node::Assignment(n) => n.compile(dispatch, arg_names),
            Node::Block(n) => n.compile(dispatch, arg_names),
            Node::Operator(n) => n.compile(dispatch, arg_names),
            Node::Parenthesis(n) => n.compile(dispatch, arg_names),
            Node::Function(n) => n.compile(dispatch, arg_names),
            Node::IfElse(n) => n.compile(dispatch, arg_names),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&RenderOptions::default()))
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

impl_from_variant!(
    Constant(ConstantNode),
    Symbol(SymbolNode),
    Assignment(AssignmentNode),
    Block(BlockNode),
    Operator(OperatorNode),
    Parenthesis(ParenthesisNode),
    Function(FunctionNode),
    IfElse(IfElseNode),
);
