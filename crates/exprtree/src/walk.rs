//! Recursive tree utilities built on [`Node::traverse`] and
//! [`Node::try_rebuild`].
//!
//! Callbacks receive the node, its position in the parent and the parent
//! itself. Both are `None` for the node the walk starts from.

use std::sync::Arc;

use crate::error::{ExprError, Result};
use crate::node::{ChildPath, Node, NodeRef};

/// Deep traversal, filtering and rewriting of a tree.
pub trait TreeWalk {
    /// Visit every node of the tree in preorder, this node first.
    fn traverse_deep<F>(&self, visit: F)
    where
        F: FnMut(&NodeRef, Option<ChildPath>, Option<&Node>);

    /// Collect every node (this one included) matching `predicate`, in
    /// preorder.
    fn filter<P>(&self, predicate: P) -> Vec<NodeRef>
    where
        P: FnMut(&NodeRef, Option<ChildPath>, Option<&Node>) -> bool;

    /// Rewrite the tree bottom-up.
    ///
    /// Children are transformed before their parent; the parent is rebuilt
    /// from the transformed children and then passed to `rewrite`. The root
    /// is rewritten last. A node whose children all come back unchanged is
    /// reused rather than reallocated. The `parent` handed to `rewrite` is
    /// the parent as it was before the rewrite.
    fn transform<F>(&self, rewrite: F) -> Result<NodeRef>
    where
        F: FnMut(&NodeRef, Option<ChildPath>, Option<&Node>) -> Result<NodeRef>;
}

impl TreeWalk for NodeRef {
    fn traverse_deep<F>(&self, mut visit: F)
    where
        F: FnMut(&NodeRef, Option<ChildPath>, Option<&Node>),
    {
        walk(self, None, None, &mut visit);
    }

    fn filter<P>(&self, mut predicate: P) -> Vec<NodeRef>
    where
        P: FnMut(&NodeRef, Option<ChildPath>, Option<&Node>) -> bool,
    {
        let mut found = Vec::new();
        self.traverse_deep(|node, path, parent| {
            if predicate(node, path, parent) {
                found.push(Arc::clone(node));
            }
        });
        found
    }

    fn transform<F>(&self, mut rewrite: F) -> Result<NodeRef>
    where
        F: FnMut(&NodeRef, Option<ChildPath>, Option<&Node>) -> Result<NodeRef>,
    {
        transform_node(self, None, None, &mut rewrite)
    }
}

type Visitor<'a> = dyn FnMut(&NodeRef, Option<ChildPath>, Option<&Node>) + 'a;
type Rewriter<'a> = dyn FnMut(&NodeRef, Option<ChildPath>, Option<&Node>) -> Result<NodeRef> + 'a;

fn walk(node: &NodeRef, path: Option<ChildPath>, parent: Option<&Node>, visit: &mut Visitor<'_>) {
    visit(node, path, parent);
    node.traverse(|child, path, parent| walk(child, Some(path), Some(parent), visit));
}

fn transform_node(
    node: &NodeRef,
    path: Option<ChildPath>,
    parent: Option<&Node>,
    rewrite: &mut Rewriter<'_>,
) -> Result<NodeRef> {
    let mut children = Vec::new();
    let mut failure = None;
    node.traverse(|child, path, parent| {
        if failure.is_some() {
            return;
        }
        match transform_node(child, Some(path), Some(parent), rewrite) {
            Ok(replaced) => children.push((Arc::ptr_eq(&replaced, child), replaced)),
            Err(err) => failure = Some(err),
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }

    let current = if children.iter().all(|(same, _)| *same) {
        Arc::clone(node)
    } else {
        let mut replacements = children.into_iter().map(|(_, replaced)| replaced);
        let rebuilt = node.try_rebuild(|_, path, _| {
            replacements
                .next()
                .ok_or_else(|| ExprError::InvalidRebuildResult {
                    node_type: node.type_name(),
                    path: path.to_string(),
                })
        })?;
        Arc::new(rebuilt)
    };
    rewrite(&current, path, parent)
}
