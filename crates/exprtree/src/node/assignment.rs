//! Assignment node: `name = value`

use serde::Deserialize;
use serde_json::{json, Value as Json};
use std::sync::Arc;
use tracing::trace;

use super::render::{needs_parens_loose, parens, Notation, PRECEDENCE_CONTROL};
use super::{ChildPath, Node, NodeRef};
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::{ExprError, Result};
use crate::options::RenderOptions;
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};
use crate::value::Value;

/// Stores the result of `value` in the scope under the name of `object`.
///
/// Evaluates to the assigned value. An absent value is stored as null.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    object: NodeRef,
    value: NodeRef,
}

#[derive(Deserialize)]
struct AssignmentRecord {
    object: Json,
    value: Json,
}

impl AssignmentNode {
    /// Serialization tag
    pub const TYPE: &'static str = "AssignmentNode";

    /// Create an assignment. `object` must be a [`Node::Symbol`].
    pub fn new(object: NodeRef, value: NodeRef) -> Result<Self> {
        if !matches!(object.as_ref(), Node::Symbol(_)) {
            return Err(ExprError::invalid_argument(format!(
                "AssignmentNode: object must be a SymbolNode, got {}",
                object.type_name()
            )));
        }
        Ok(Self { object, value })
    }

    /// Shorthand for assigning `value` to a fresh symbol `name`.
    pub fn named(name: impl Into<String>, value: NodeRef) -> Self {
        Self {
            object: Arc::new(Node::Symbol(super::SymbolNode::new(name))),
            value,
        }
    }

    /// The assignment target.
    pub fn object(&self) -> &NodeRef {
        &self.object
    }

    /// The assigned expression.
    pub fn value(&self) -> &NodeRef {
        &self.value
    }

    fn name(&self) -> &str {
        match self.object.as_ref() {
            Node::Symbol(s) => s.name(),
            // Guarded by `new`
            _ => "",
        }
    }

    pub(crate) fn for_each_child(&self, visit: &mut dyn FnMut(&NodeRef, ChildPath)) {
        visit(&self.object, ChildPath::Object);
        visit(&self.value, ChildPath::Value);
    }

    pub(crate) fn map_children(
        &self,
        f: &mut dyn FnMut(&NodeRef, ChildPath) -> Result<NodeRef>,
    ) -> Result<Self> {
        let object = f(&self.object, ChildPath::Object)?;
        let value = f(&self.value, ChildPath::Value)?;
        Self::new(object, value)
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({
            TAG_FIELD: Self::TYPE,
            "object": self.object.to_json(),
            "value": self.value.to_json(),
        })
    }

    pub(crate) fn from_record(record: &Json, registry: &NodeRegistry) -> Result<Node> {
        let record: AssignmentRecord = decode_record(Self::TYPE, record)?;
        let object = registry.child(Self::TYPE, "object", &record.object)?;
        let value = registry.child(Self::TYPE, "value", &record.value)?;
        Ok(Node::Assignment(Self::new(object, value)?))
    }

    pub(crate) fn render(&self, options: &RenderOptions, notation: Notation) -> String {
        let target = self.object.render_as(options, notation);
        let mut value = self.value.render_as(options, notation);
        if needs_parens_loose(&self.value, PRECEDENCE_CONTROL, options) {
            value = parens(&value, notation);
        }
        match notation {
            Notation::Text => format!("{} = {}", target, value),
            Notation::Tex => format!("{}:={}", target, value),
            Notation::Html => format!(
                "{}<span class=\"math-operator math-assignment-operator \
                 math-variable-assignment-operator math-binary-operator\">=</span>{}",
                target, value
            ),
        }
    }
}

impl Compile for AssignmentNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        let name = self.name().to_string();
        let value = self.value.compile(dispatch, arg_names)?;

        Ok(compiled_fn(move |scope, args, ctx| {
            let result = value(scope, args, ctx)?.unwrap_or(Value::Null);
            if ctx.trace {
                trace!(name = %name, value = %result, "assign");
            }
            scope.set(name.clone(), result.clone());
            Ok(Some(result))
        }))
    }
}
