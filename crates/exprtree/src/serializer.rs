//! Tag-keyed reconstruction of persisted trees
//!
//! Every node serializes to a JSON record whose `"kind"` field names its
//! variant. The [`NodeRegistry`] maps each tag to a constructor that rebuilds
//! the node, decoding children recursively through the same registry.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

use crate::error::{ExprError, Result};
use crate::node::{
    AssignmentNode, BlockNode, ConstantNode, FunctionNode, IfElseNode, Node, NodeRef,
    OperatorNode, ParenthesisNode, SymbolNode,
};

/// Name of the field carrying the variant tag in every node record.
pub const TAG_FIELD: &str = "kind";

/// Rebuilds a node from its record. Children are decoded through the
/// registry passed in.
pub type NodeConstructor = fn(&Json, &NodeRegistry) -> Result<Node>;

/// Registry mapping node tags to constructors.
///
/// Safe to share between threads; registration takes `&self`.
pub struct NodeRegistry {
    constructors: DashMap<String, NodeConstructor>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// Create a registry with no tags registered.
    pub fn empty() -> Self {
        Self {
            constructors: DashMap::new(),
        }
    }

    /// Create a registry with every built-in node variant registered.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register(ConstantNode::TYPE, ConstantNode::from_record);
        registry.register(SymbolNode::TYPE, SymbolNode::from_record);
        registry.register(AssignmentNode::TYPE, AssignmentNode::from_record);
        registry.register(BlockNode::TYPE, BlockNode::from_record);
        registry.register(OperatorNode::TYPE, OperatorNode::from_record);
        registry.register(ParenthesisNode::TYPE, ParenthesisNode::from_record);
        registry.register(FunctionNode::TYPE, FunctionNode::from_record);
        registry.register(IfElseNode::TYPE, IfElseNode::from_record);
        registry
    }

    /// Register (or replace) the constructor for `tag`.
    ///
    /// Returns the constructor previously registered under that tag.
    pub fn register(&self, tag: impl Into<String>, constructor: NodeConstructor) -> Option<NodeConstructor> {
        let tag = tag.into();
        debug!(tag = %tag, "registering node constructor");
        self.constructors.insert(tag, constructor)
    }

    /// Check whether a tag has a constructor.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// All registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.constructors.iter().map(|e| e.key().clone()).collect();
        tags.sort();
        tags
    }

    /// Rebuild a node from a tagged record.
    pub fn deserialize(&self, record: &Json) -> Result<Node> {
        let tag = record
            .as_object()
            .and_then(|map| map.get(TAG_FIELD))
            .and_then(Json::as_str)
            .ok_or_else(|| {
                ExprError::invalid_argument(format!(
                    "expected a node record with a \"{}\" tag",
                    TAG_FIELD
                ))
            })?;
        self.deserialize_tagged(tag, record)
    }

    /// Rebuild a node from a record using the constructor registered for `tag`.
    pub fn deserialize_tagged(&self, tag: &str, record: &Json) -> Result<Node> {
        // Copy the fn pointer out so no shard lock is held while children decode.
        let constructor = self
            .constructors
            .get(tag)
            .map(|entry| *entry.value())
            .ok_or_else(|| ExprError::UnregisteredNodeType {
                tag: tag.to_string(),
            })?;
        trace!(tag, "deserializing node");
        constructor(record, self)
    }

    /// Parse JSON text and rebuild the node it describes.
    pub fn deserialize_str(&self, text: &str) -> Result<Node> {
        let json: Json =
            serde_json::from_str(text).map_err(|e| ExprError::malformed("JSON", e))?;
        self.deserialize(&json)
    }

    /// Decode one child record of a `tag` record.
    pub(crate) fn child(&self, tag: &str, field: &str, json: &Json) -> Result<NodeRef> {
        if !json.is_object() {
            return Err(ExprError::invalid_argument(format!(
                "{}: `{}` must be a Node record",
                tag, field
            )));
        }
        self.deserialize(json).map(Arc::new)
    }

    /// Decode an array of child records of a `tag` record.
    pub(crate) fn children(&self, tag: &str, field: &str, json: &Json) -> Result<Vec<NodeRef>> {
        let items = json.as_array().ok_or_else(|| {
            ExprError::invalid_argument(format!("{}: `{}` must be an array", tag, field))
        })?;
        items
            .iter()
            .map(|item| self.child(tag, field, item))
            .collect()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Decode the fields of a `tag` record into a serde record struct.
pub(crate) fn decode_record<T: DeserializeOwned>(tag: &str, record: &Json) -> Result<T> {
    T::deserialize(record).map_err(|e| ExprError::malformed(tag, e))
}

/// The process-wide registry, populated with the built-in variants on first use.
pub fn registry() -> &'static NodeRegistry {
    static REGISTRY: OnceLock<NodeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(NodeRegistry::new)
}
