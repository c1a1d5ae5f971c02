//! Function calls: `name(arg, ...)`

use serde::Deserialize;
use serde_json::{json, Value as Json};

use super::render::{escape_html, Notation};
use super::{ChildPath, Node, NodeRef};
use crate::compiled::{compiled_fn, Compile, CompiledExpression};
use crate::dispatch::Dispatch;
use crate::error::Result;
use crate::options::RenderOptions;
use crate::scope::ArgNames;
use crate::serializer::{decode_record, NodeRegistry, TAG_FIELD};
use crate::value::Value;

/// A call to a dispatch function. The name is resolved at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    name: String,
    args: Vec<NodeRef>,
}

#[derive(Deserialize)]
struct FunctionRecord {
    #[serde(rename = "fn")]
    name: String,
    args: Json,
}

impl FunctionNode {
    /// Serialization tag
    pub const TYPE: &'static str = "FunctionNode";

    /// Create a function call.
    pub fn new(name: impl Into<String>, args: Vec<NodeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Called function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call arguments.
    pub fn args(&self) -> &[NodeRef] {
        &self.args
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
        Ok(Self::new(self.name.clone(), args))
    }

    pub(crate) fn to_json(&self) -> Json {
        json!({
            TAG_FIELD: Self::TYPE,
            "fn": self.name,
            "args": self.args.iter().map(|n| n.to_json()).collect::<Vec<_>>(),
        })
    }

    pub(crate) fn from_record(record: &Json, registry: &NodeRegistry) -> Result<Node> {
        let record: FunctionRecord = decode_record(Self::TYPE, record)?;
        let args = registry.children(Self::TYPE, "args", &record.args)?;
        Ok(Node::Function(Self::new(record.name, args)))
    }

    pub(crate) fn render(&self, options: &RenderOptions, notation: Notation) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.render_as(options, notation))
            .collect();
        match notation {
            Notation::Text => format!("{}({})", self.name, args.join(", ")),
            Notation::Tex => format!("\\mathrm{{{}}}\\left({}\\right)", self.name, args.join(",")),
            Notation::Html => format!(
                "<span class=\"math-function\">{}</span>\
                 <span class=\"math-parenthesis math-round-parenthesis\">(</span>{}\
                 <span class=\"math-parenthesis math-round-parenthesis\">)</span>",
                escape_html(&self.name),
                args.join("<span class=\"math-separator\">,</span>")
            ),
        }
    }
}

impl Compile for FunctionNode {
    fn compile(&self, dispatch: &Dispatch, arg_names: &ArgNames) -> Result<CompiledExpression> {
        let func = dispatch.resolve(&self.name)?;
        let params = self
            .args
            .iter()
            .map(|arg| arg.compile(dispatch, arg_names))
            .collect::<Result<Vec<_>>>()?;

        Ok(compiled_fn(move |scope, args, ctx| {
            let mut values = Vec::with_capacity(params.len());
            for param in &params {
                values.push(param(scope, args, ctx)?.unwrap_or(Value::Null));
            }
            func.call(&values).map(Some)
        }))
    }
}
