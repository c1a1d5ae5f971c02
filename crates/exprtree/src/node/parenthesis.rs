//! Explicit parentheses

use serde::Deserialize;
use serde_json::{json, Value as Json};

use super::render::{parens, Notation};
use super::{ChildPath, Node, NodeRef};
use crate::compiled::{Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::options::{Parenthesis, RenderOptions};
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};

/// Parentheses written in the source. Evaluates to its content.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesisNode {
    content: NodeRef,
}

#[derive(Deserialize)]
struct ParenthesisRecord {
    content: Json,
}

impl ParenthesisNode {
    /// Serialization tag
    pub const TYPE: &'static str = "ParenthesisNode";

    /// Wrap `content` in parentheses.
    pub fn new(content: NodeRef) -> Self {
        Self { content }
    }

    /// The wrapped node.
    pub fn content(&self) -> &NodeRef {
        &self.content
    }

    pub(crate) fn for_each_child(&self, visit: &mut dyn FnMut(&NodeRef, ChildPath)) {
        visit(&self.content, ChildPath::Content);
    }

    pub(crate) fn map_children(
        &self,
        f: &mut dyn FnMut(&NodeRef, ChildPath) -> Result<NodeRef>,
    ) -> Result<Self> {
        Ok(Self::new(f(&self.content, ChildPath::Content)?))
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({ TAG_FIELD: Self::TYPE, "content": self.content.to_json() })
    }

    pub(crate) fn from_record(record: &Json, registry: &NodeRegistry) -> Result<Node> {
        let record: ParenthesisRecord = decode_record(Self::TYPE, record)?;
        let content = registry.child(Self::TYPE, "content", &record.content)?;
        Ok(Node::Parenthesis(Self::new(content)))
    }

    pub(crate) fn render(&self, options: &RenderOptions, notation: Notation) -> String {
        let inner = self.content.render_as(options, notation);
        match options.parenthesis {
            Parenthesis::Keep => parens(&inner, notation),
            // Surrounding nodes decide from the content's own precedence
            Parenthesis::All => inner,
        }
    }
}

impl Compile for ParenthesisNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        self.content.compile(dispatch, arg_names)
    }
}
