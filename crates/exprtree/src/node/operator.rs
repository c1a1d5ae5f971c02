//! Unary and binary operators

use serde::Deserialize;
use serde_json::{json, Value as Json};

use super::render::{escape_html, operator_precedence, parens, Notation};
use super::{ChildPath, Node, NodeRef};
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::{ExprError, Result};
use crate::options::{Parenthesis, RenderOptions};
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};
use crate::value::Value;

/// An operator application such as `a + b` or `-a`.
///
/// `op` is the display symbol; `fn_name` is the dispatch entry that
/// implements it.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorNode {
    op: String,
    fn_name: String,
    args: Vec<NodeRef>,
}

#[derive(Deserialize)]
struct OperatorRecord {
    op: String,
    #[serde(rename = "fn")]
    fn_name: String,
    args: Json,
}

impl OperatorNode {
    /// Serialization tag
    pub const TYPE: &'static str = "OperatorNode";

    /// Create an operator node with one or two operands.
    pub fn new(op: impl Into<String>, fn_name: impl Into<String>, args: Vec<NodeRef>) -> Result<Self> {
        let op = op.into();
        if args.is_empty() || args.len() > 2 {
            return Err(ExprError::invalid_argument(format!(
                "OperatorNode: `{}` takes 1 or 2 operands, got {}",
                op,
                args.len()
            )));
        }
        Ok(Self {
            op,
            fn_name: fn_name.into(),
            args,
        })
    }

    /// Prefix operator.
    pub fn unary(op: impl Into<String>, fn_name: impl Into<String>, operand: NodeRef) -> Self {
        Self {
            op: op.into(),
            fn_name: fn_name.into(),
            args: vec![operand],
        }
    }

    /// Infix operator.
    pub fn binary(
        op: impl Into<String>,
        fn_name: impl Into<String>,
        lhs: NodeRef,
        rhs: NodeRef,
    ) -> Self {
        Self {
            op: op.into(),
            fn_name: fn_name.into(),
            args: vec![lhs, rhs],
        }
    }

    /// Display symbol.
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Name of the implementing function.
    pub fn fn_name(&self) -> &str {
        &self.fn_name
    }

    /// Operands.
    pub fn args(&self) -> &[NodeRef] {
        &self.args
    }

    /// Whether this is a prefix operator.
    pub fn is_unary(&self) -> bool {
        self.args.len() == 1
    }

    pub(crate) fn for_each_child(&self, visit: &mut dyn FnMut(&NodeRef, ChildPath)) {
        for (i, arg) in self.args.iter().enumerate() {
            visit(arg, ChildPath::Arg(i));
        }
    }

    pub(crate) fn map_children(
        &self,
        f: &mut dyn FnMut(&NodeRef, ChildPath) -> Result<NodeRef>,
    ) -> Result<Self> {
        let args = self
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| f(arg, ChildPath::Arg(i)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(self.op.clone(), self.fn_name.clone(), args)
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({
            TAG_FIELD: Self::TYPE,
            "op": self.op,
            "fn": self.fn_name,
            "args": self.args.iter().map(|n| n.to_json()).collect::<Vec<_>>(),
        })
    }

    pub(crate) fn from_record(record: &Json, registry: &NodeRegistry) -> Result<Node> {
        let record: OperatorRecord = decode_record(Self::TYPE, record)?;
        let args = registry.children(Self::TYPE, "args", &record.args)?;
        Ok(Node::Operator(Self::new(record.op, record.fn_name, args)?))
    }

    /// Whether operand `position` must be wrapped to keep its grouping.
    fn operand_needs_parens(&self, operand: &Node, position: usize, options: &RenderOptions) -> bool {
        let Some(child) = operand.precedence(options.parenthesis) else {
            return false;
        };
        if options.parenthesis == Parenthesis::All {
            return true;
        }
        let Some(own) = operator_precedence(&self.fn_name) else {
            return false;
        };
        if child != own {
            return child < own;
        }
        if self.is_unary() {
            return true;
        }
        match position {
            // `^` groups to the right
            0 => self.fn_name == "pow",
            _ => !matches!(
                self.fn_name.as_str(),
                "add" | "multiply" | "and" | "or" | "pow"
            ),
        }
    }

    fn operand(&self, position: usize, options: &RenderOptions, notation: Notation) -> String {
        let node = &self.args[position];
        let text = node.render_as(options, notation);
        if self.operand_needs_parens(node, position, options) {
            parens(&text, notation)
        } else {
            text
        }
    }

    // Control words carry a trailing space so they never run into an operand
    fn tex_symbol(&self) -> &str {
        match self.fn_name.as_str() {
            "multiply" => "\\cdot ",
            "unequal" => "\\neq ",
            "smallerEq" => "\\leq ",
            "largerEq" => "\\geq ",
            "and" => "\\wedge ",
            "or" => "\\vee ",
            "not" => "\\neg ",
            "mod" => "\\mod ",
            _ => &self.op,
        }
    }

    pub(crate) fn render(&self, options: &RenderOptions, notation: Notation) -> String {
        if self.is_unary() {
            let operand = self.operand(0, options, notation);
            let word = self.op.chars().all(char::is_alphabetic);
            return match notation {
                Notation::Text if word => format!("{} {}", self.op, operand),
                Notation::Text => format!("{}{}", self.op, operand),
                Notation::Tex => format!("{}{}", self.tex_symbol(), operand),
                Notation::Html => format!(
                    "<span class=\"math-operator math-unary-operator \
                     math-lefthand-unary-operator\">{}</span>{}",
                    escape_html(&self.op),
                    operand
                ),
            };
        }

        match notation {
            Notation::Text => format!(
                "{} {} {}",
                self.operand(0, options, notation),
                self.op,
                self.operand(1, options, notation)
            ),
            // A fraction bar groups both sides already
            Notation::Tex if self.fn_name == "divide" => format!(
                "\\frac{{{}}}{{{}}}",
                self.args[0].render_as(options, notation),
                self.args[1].render_as(options, notation)
            ),
            Notation::Tex if self.fn_name == "pow" => format!(
                "{{{}}}^{{{}}}",
                self.operand(0, options, notation),
                self.args[1].render_as(options, notation)
            ),
            Notation::Tex => format!(
                "{}{}{}",
                self.operand(0, options, notation),
                self.tex_symbol(),
                self.operand(1, options, notation)
            ),
            Notation::Html => format!(
                "{}<span class=\"math-operator math-binary-operator \
                 math-explicit-binary-operator\">{}</span>{}",
                self.operand(0, options, notation),
                escape_html(&self.op),
                self.operand(1, options, notation)
            ),
        }
    }
}

impl Compile for OperatorNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        let func = dispatch.resolve(&self.fn_name)?;
        let operands = self
            .args
            .iter()
            .map(|arg| arg.compile(dispatch, arg_names))
            .collect::<Result<Vec<_>>>()?;

        Ok(compiled_fn(move |scope, args, ctx| {
            let mut values = Vec::with_capacity(operands.len());
            for operand in &operands {
                values.push(operand(scope, args, ctx)?.unwrap_or(Value::Null));
            }
            func.call(&values).map(Some)
        }))
    }
}
