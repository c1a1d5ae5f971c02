//! Variable reference node

use serde::Deserialize;
use serde_json::{json, Value as Json};

use super::render::{escape_html, Notation};
use super::Node;
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::{ExprError, Result};
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};

/// A reference to a variable, parameter or named constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolNode {
    name: String,
}

#[derive(Deserialize)]
struct SymbolRecord {
    name: String,
}

impl SymbolNode {
    /// Serialization tag
    pub const TYPE: &'static str = "SymbolNode";

    /// Create a symbol node.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The referenced name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({ TAG_FIELD: Self::TYPE, "name": self.name })
    }

    pub(crate) fn from_record(record: &Json, _registry: &NodeRegistry) -> Result<Node> {
        let record: SymbolRecord = decode_record(Self::TYPE, record)?;
        Ok(Node::Symbol(Self::new(record.name)))
    }

    pub(crate) fn render(&self, notation: Notation) -> String {
        match notation {
            Notation::Text => self.name.clone(),
            Notation::Tex => match self.name.as_str() {
                "pi" => "\\pi".to_string(),
                name if name.chars().count() == 1 => name.to_string(),
                name => format!("\\mathrm{{{}}}", name),
            },
            Notation::Html => format!(
                "<span class=\"math-symbol\">{}</span>",
                escape_html(&self.name)
            ),
        }
    }
}

impl Compile for SymbolNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        let name = self.name.clone();

        if arg_names.contains(&name) {
            return Ok(compiled_fn(move |_scope, args, _ctx| {
                args.get(&name)
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| ExprError::UndefinedSymbol { name: name.clone() })
            }));
        }

        // Scope bindings shadow dispatch constants
        let fallback = dispatch.constant(&name).cloned();
        Ok(compiled_fn(move |scope, _args, _ctx| {
            match scope.get(&name).or(fallback.as_ref()) {
                Some(value) => Ok(Some(value.clone())),
                None => Err(ExprError::UndefinedSymbol { name: name.clone() }),
            }
        }))
    }
}
