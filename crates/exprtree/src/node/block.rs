//! Statement sequences

use serde::Deserialize;
use serde_json::{json, Value as Json};

use super::render::Notation;
use super::{ChildPath, Node, NodeRef};
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::{ExprError, Result};
use crate::options::RenderOptions;
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};
use crate::value::Value;

/// One statement of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntry {
    /// The statement
    pub node: NodeRef,
    /// Whether the statement's result is part of the block's result.
    /// Statements terminated by `;` are hidden.
    pub visible: bool,
}

impl BlockEntry {
    /// A statement whose result is kept.
    pub fn visible(node: NodeRef) -> Self {
        Self { node, visible: true }
    }

    /// A statement evaluated only for its effects.
    pub fn hidden(node: NodeRef) -> Self {
        Self {
            node,
            visible: false,
        }
    }
}

#[derive(Deserialize)]
struct BlockRecord {
    blocks: Json,
}

#[derive(Deserialize)]
struct BlockEntryRecord {
    node: Json,
    #[serde(default = "visible_by_default")]
    visible: bool,
}

fn visible_by_default() -> bool {
    true
}

/// A sequence of statements evaluated in order.
///
/// Evaluates to a result set holding the result of every visible statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    entries: Vec<BlockEntry>,
}

impl BlockNode {
    /// Serialization tag
    pub const TYPE: &'static str = "BlockNode";

    /// Create a block. At least one statement is required.
    pub fn new(entries: Vec<BlockEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ExprError::invalid_argument(
                "BlockNode: blocks must contain at least one statement",
            ));
        }
        Ok(Self { entries })
    }

    /// The statements, in order.
    pub fn entries(&self) -> &[BlockEntry] {
        &self.entries
    }

    pub(crate) fn for_each_child(&self, visit: &mut dyn FnMut(&NodeRef, ChildPath)) {
        for (i, entry) in self.entries.iter().enumerate() {
            visit(&entry.node, ChildPath::Block(i));
        }
    }

    pub(crate) fn map_children(
        &self,
        f: &mut dyn FnMut(&NodeRef, ChildPath) -> Result<NodeRef>,
    ) -> Result<Self> {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Ok(BlockEntry {
                    node: f(&entry.node, ChildPath::Block(i))?,
                    visible: entry.visible,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub(crate) fn to_json(&self) -> Json {
        let blocks: Vec<Json> = self
            .entries
            .iter()
            .map(|entry| json!({ "node": entry.node.to_json(), "visible": entry.visible }))
            .collect();
        json!({ TAG_FIELD: Self::TYPE, "blocks": blocks })
    }

    pub(crate) fn from_record(record: &Json, registry: &NodeRegistry) -> Result<Node> {
        let record: BlockRecord = decode_record(Self::TYPE, record)?;
        let items = record.blocks.as_array().ok_or_else(|| {
            ExprError::invalid_argument(format!("{}: `blocks` must be an array", Self::TYPE))
        })?;
        let entries = items
            .iter()
            .map(|item| {
                let entry: BlockEntryRecord = decode_record(Self::TYPE, item)?;
                Ok(BlockEntry {
                    node: registry.child(Self::TYPE, "blocks", &entry.node)?,
                    visible: entry.visible,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Node::Block(Self::new(entries)?))
    }

    pub(crate) fn render(&self, options: &RenderOptions, notation: Notation) -> String {
        let separator = match notation {
            Notation::Text => "\n",
            Notation::Tex => "\\;\\;\n",
            Notation::Html => "<span class=\"math-separator\"><br /></span>",
        };
        self.entries
            .iter()
            .map(|entry| {
                let text = entry.node.render_as(options, notation);
                if entry.visible {
                    text
                } else {
                    format!("{};", text)
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Compile for BlockNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        let statements = self
            .entries
            .iter()
            .map(|entry| Ok((entry.node.compile(dispatch, arg_names)?, entry.visible)))
            .collect::<Result<Vec<_>>>()?;

        Ok(compiled_fn(move |scope, args, ctx| {
            let mut results = Vec::new();
            for (statement, visible) in &statements {
                let value = statement(scope, args, ctx)?;
                if *visible {
                    if let Some(value) = value {
                        results.push(value);
                    }
                }
            }
            Ok(Some(Value::result_set(results)))
        }))
    }
}
