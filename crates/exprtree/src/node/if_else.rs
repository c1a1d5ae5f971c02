//! Conditional chain: `if c0 b0 else if c1 b1 ... [else bn] end`
//!
//! Conditions are tested strictly in order and only the block guarded by the
//! first truthy condition runs. Nothing after the match is evaluated, so
//! side effects in later conditions or blocks never happen.

use serde::Deserialize;
use serde_json::{json, Value as Json};
use tracing::trace;

use super::render::{indent, needs_parens_loose, parens, Notation, PRECEDENCE_CONTROL};
use super::{ChildPath, Node, NodeRef};
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::{ExprError, Result};
use crate::options::RenderOptions;
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};
use crate::value::is_truthy;

/// An if / else if / else chain.
///
/// `blocks` holds either one block per condition, or one extra block which
/// is the else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElseNode {
    conditions: Vec<NodeRef>,
    blocks: Vec<NodeRef>,
}

#[derive(Deserialize)]
struct IfElseRecord {
    conditions: Json,
    #[serde(rename = "blockNodes")]
    block_nodes: Json,
}

impl IfElseNode {
    /// Serialization tag
    pub const TYPE: &'static str = "IfElseNode";

    /// Create a conditional chain.
    ///
    /// Fails with [`ExprError::InvalidArgument`] if either list is empty, or
    /// if `blocks` is not the same length as `conditions` or one longer.
    pub fn new(conditions: Vec<NodeRef>, blocks: Vec<NodeRef>) -> Result<Self> {
        if conditions.is_empty() {
            return Err(ExprError::invalid_argument(
                "IfElseNode: conditions must contain at least one Node",
            ));
        }
        if blocks.is_empty() {
            return Err(ExprError::invalid_argument(
                "IfElseNode: blocks must contain at least one Node",
            ));
        }
        if blocks.len() != conditions.len() && blocks.len() != conditions.len() + 1 {
            return Err(ExprError::invalid_argument(format!(
                "IfElseNode: expected {} or {} blocks for {} condition(s), got {}",
                conditions.len(),
                conditions.len() + 1,
                conditions.len(),
                blocks.len()
            )));
        }
        Ok(Self { conditions, blocks })
    }

    /// The guard conditions, in test order.
    pub fn conditions(&self) -> &[NodeRef] {
        &self.conditions
    }

    /// Every block, the else branch (if any) last.
    pub fn blocks(&self) -> &[NodeRef] {
        &self.blocks
    }

    /// Whether the chain ends in an unconditional block.
    pub fn has_else(&self) -> bool {
        self.blocks.len() > self.conditions.len()
    }

    /// The else branch, if present.
    pub fn else_block(&self) -> Option<&NodeRef> {
        if self.has_else() {
            self.blocks.last()
        } else {
            None
        }
    }

    fn condition_path(i: usize) -> ChildPath {
        if i == 0 {
            ChildPath::IfCondition
        } else {
            ChildPath::ElseIfCondition(i)
        }
    }

    fn block_path(i: usize) -> ChildPath {
        if i == 0 {
            ChildPath::IfBlock
        } else {
            ChildPath::ElseIfBlock(i)
        }
    }

    pub(crate) fn for_each_child(&self, visit: &mut dyn FnMut(&NodeRef, ChildPath)) {
        for (i, (condition, block)) in self.conditions.iter().zip(&self.blocks).enumerate() {
            visit(condition, Self::condition_path(i));
            visit(block, Self::block_path(i));
        }
        if let Some(else_block) = self.else_block() {
            visit(else_block, ChildPath::ElseBlock);
        }
    }

    pub(crate) fn map_children(
        &self,
        f: &mut dyn FnMut(&NodeRef, ChildPath) -> Result<NodeRef>,
    ) -> Result<Self> {
        let mut conditions = Vec::with_capacity(self.conditions.len());
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for (i, (condition, block)) in self.conditions.iter().zip(&self.blocks).enumerate() {
            conditions.push(f(condition, Self::condition_path(i))?);
            blocks.push(f(block, Self::block_path(i))?);
        }
        if let Some(else_block) = self.else_block() {
            blocks.push(f(else_block, ChildPath::ElseBlock)?);
        }
        Self::new(conditions, blocks)
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({
            TAG_FIELD: Self::TYPE,
            "conditions": self.conditions.iter().map(|n| n.to_json()).collect::<Vec<_>>(),
            "blockNodes": self.blocks.iter().map(|n| n.to_json()).collect::<Vec<_>>(),
        })
    }

    pub(crate) fn from_record(record: &Json, registry: &NodeRegistry) -> Result<Node> {
        let record: IfElseRecord = decode_record(Self::TYPE, record)?;
        let conditions = registry.children(Self::TYPE, "conditions", &record.conditions)?;
        let blocks = registry.children(Self::TYPE, "blockNodes", &record.block_nodes)?;
        Ok(Node::IfElse(Self::new(conditions, blocks)?))
    }

    pub(crate) fn render(&self, options: &RenderOptions, notation: Notation) -> String {
        // Only the text notation lays out conditional chains
        if notation != Notation::Text {
            return String::new();
        }

        let mut out = String::new();
        for (i, (condition, block)) in self.conditions.iter().zip(&self.blocks).enumerate() {
            let keyword = if i == 0 { "if" } else { "else if" };
            let mut cond = condition.render_as(options, notation);
            if needs_parens_loose(condition, PRECEDENCE_CONTROL, options) {
                cond = parens(&cond, notation);
            }
            out.push_str(&format!(
                "{} {}\n\t{}\n",
                keyword,
                cond,
                indent(&block.render_as(options, notation))
            ));
        }
        if let Some(else_block) = self.else_block() {
            out.push_str(&format!(
                "else\n\t{}\n",
                indent(&else_block.render_as(options, notation))
            ));
        }
        out.push_str("end");
        out
    }
}

impl Compile for IfElseNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        let conditions = self
            .conditions
            .iter()
            .map(|c| c.compile(dispatch, arg_names))
            .collect::<Result<Vec<_>>>()?;
        let mut branches = self
            .blocks
            .iter()
            .map(|b| b.compile(dispatch, arg_names))
            .collect::<Result<Vec<_>>>()?;
        let otherwise = if self.has_else() { branches.pop() } else { None };

        Ok(compiled_fn(move |scope, args, ctx| {
            for (i, (condition, branch)) in conditions.iter().zip(&branches).enumerate() {
                let test = condition(scope, args, ctx)?;
                if is_truthy(test.as_ref())? {
                    if ctx.trace {
                        trace!(branch = i, "condition matched");
                    }
                    return branch(scope, args, ctx);
                }
            }
            match &otherwise {
                Some(branch) => {
                    if ctx.trace {
                        trace!("no condition matched, taking else branch");
                    }
                    branch(scope, args, ctx)
                }
                None => Ok(None),
            }
        }))
    }
}
