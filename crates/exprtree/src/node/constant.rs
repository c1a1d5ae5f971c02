//! Literal value node

use serde::Deserialize;
use serde_json::{json, Value as Json};

use super::render::{escape_html, Notation};
use super::Node;
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};
use crate::value::Value;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNode {
    value: Value,
}

#[derive(Deserialize)]
struct ConstantRecord {
    value: Value,
}

impl ConstantNode {
    /// Serialization tag
    pub const TYPE: &'static str = "ConstantNode";

    /// Create a constant node.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The literal value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({ TAG_FIELD: Self::TYPE, "value": self.value.to_json() })
    }

    pub(crate) fn from_record(record: &Json, _registry: &NodeRegistry) -> Result<Node> {
        let record: ConstantRecord = decode_record(Self::TYPE, record)?;
        Ok(Node::Constant(Self::new(record.value)))
    }

    pub(crate) fn render(&self, notation: Notation) -> String {
        match notation {
            Notation::Text => format!("{:?}", self.value),
            Notation::Tex => match &self.value {
                Value::Number(n) if n.is_infinite() => {
                    let tex = if *n > 0.0 { "\\infty" } else { "-\\infty" };
                    tex.to_string()
                }
                Value::String(s) => format!("\\mathtt{{\"{}\"}}", s),
                Value::Bool(_) | Value::Null => format!("\\mathrm{{{}}}", self.value),
                other => format!("{:?}", other),
            },
            Notation::Html => {
                let class = match &self.value {
                    Value::String(_) => "math-string",
                    Value::Bool(_) => "math-boolean",
                    Value::Null => "math-null-symbol",
                    _ => "math-number",
                };
                format!(
                    "<span class=\"{}\">{}</span>",
                    class,
                    escape_html(&format!("{:?}", self.value))
                )
            }
        }
    }
}

impl Compile for ConstantNode {
    fn compile(&self, _dispatch: &Dispatch, _arg_names: &ArgNames) -> Result<CompiledExpression> {
        let value = self.value.clone();
        Ok(compiled_fn(move |_scope, _args, _ctx| Ok(Some(value.clone()))))
    }
}
