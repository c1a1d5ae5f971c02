//! Traversal, rebuild, filter and transform over trees

use std::sync::Arc;

use exprtree::*;

fn constant(value: impl Into<Value>) -> NodeRef {
    Node::from(ConstantNode::new(value)).shared()
}

fn assign_a(n: f64) -> NodeRef {
    Node::from(AssignmentNode::named("a", constant(n))).shared()
}

fn if_else(conditions: Vec<NodeRef>, blocks: Vec<NodeRef>) -> NodeRef {
    Node::from(IfElseNode::new(conditions, blocks).unwrap()).shared()
}

// ═══════════════════════════════════════════════════════════════════════
// Traverse
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_traverse_order_and_parent() {
    let cond = constant(true);
    let (a1, a2, a3) = (assign_a(1.0), assign_a(2.0), assign_a(3.0));
    let node = if_else(
        vec![Arc::clone(&cond), Arc::clone(&cond)],
        vec![Arc::clone(&a1), Arc::clone(&a2), Arc::clone(&a3)],
    );

    let mut visited = Vec::new();
    let mut paths = Vec::new();
    node.traverse(|child, path, parent| {
        assert!(std::ptr::eq(parent, node.as_ref()));
        visited.push(Arc::clone(child));
        paths.push(path);
    });

    assert_eq!(visited.len(), 5);
    assert!(Arc::ptr_eq(&visited[0], &cond));
    assert!(Arc::ptr_eq(&visited[1], &a1));
    assert!(Arc::ptr_eq(&visited[2], &cond));
    assert!(Arc::ptr_eq(&visited[3], &a2));
    assert!(Arc::ptr_eq(&visited[4], &a3));
    assert_eq!(
        paths,
        vec![
            ChildPath::IfCondition,
            ChildPath::IfBlock,
            ChildPath::ElseIfCondition(1),
            ChildPath::ElseIfBlock(1),
            ChildPath::ElseBlock,
        ]
    );
}

#[test]
fn test_traverse_is_not_recursive() {
    let node = if_else(vec![constant(true)], vec![assign_a(0.0)]);
    let mut count = 0;
    node.traverse(|_, _, _| count += 1);
    assert_eq!(count, 2);
}

// ═══════════════════════════════════════════════════════════════════════
// Rebuild
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_rebuild_replaces_blocks() -> anyhow::Result<()> {
    let cond = constant(true);
    let a1 = assign_a(1.0);
    let node = if_else(
        vec![Arc::clone(&cond), Arc::clone(&cond)],
        vec![Arc::clone(&a1), Arc::clone(&a1), Arc::clone(&a1)],
    );
    let replacement = Node::from(AssignmentNode::named("a", constant(9.0))).shared();

    let mut visited = 0;
    let rebuilt = node.rebuild(|child, _, parent| {
        assert!(std::ptr::eq(parent, node.as_ref()));
        visited += 1;
        match child.as_ref() {
            Node::Assignment(_) => Some(Arc::clone(&replacement)),
            _ => Some(Arc::clone(child)),
        }
    })?;

    assert_eq!(visited, 5);
    let Node::IfElse(rebuilt) = rebuilt else {
        panic!("rebuild changed the variant");
    };
    for block in rebuilt.blocks() {
        assert!(Arc::ptr_eq(block, &replacement));
    }
    for condition in rebuilt.conditions() {
        assert!(Arc::ptr_eq(condition, &cond));
    }
    // The input tree is untouched
    let Node::IfElse(input) = node.as_ref() else {
        unreachable!()
    };
    assert!(Arc::ptr_eq(&input.blocks()[0], &a1));
    Ok(())
}

#[test]
fn test_rebuild_missing_child_fails() {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0), assign_a(2.0)]);
    let err = node.rebuild(|_, _, _| None).unwrap_err();
    assert_eq!(
        err,
        ExprError::InvalidRebuildResult {
            node_type: "IfElseNode",
            path: "ifCondition".to_string(),
        }
    );
    assert!(err.to_string().contains("Callback function must return a Node"));
}

#[test]
fn test_try_rebuild_propagates_error() {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0)]);
    let err = node
        .try_rebuild(|_, path, _| match path {
            ChildPath::IfBlock => Err(ExprError::invalid_argument("stop")),
            _ => Ok(constant(false)),
        })
        .unwrap_err();
    assert_eq!(err, ExprError::InvalidArgument("stop".to_string()));
}

#[test]
fn test_clone_shares_children() {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0)]);
    let copy = node.as_ref().clone();
    assert_eq!(&copy, node.as_ref());

    let (Node::IfElse(a), Node::IfElse(b)) = (node.as_ref(), &copy) else {
        unreachable!()
    };
    assert!(Arc::ptr_eq(&a.conditions()[0], &b.conditions()[0]));
    assert!(Arc::ptr_eq(&a.blocks()[0], &b.blocks()[0]));
}

// ═══════════════════════════════════════════════════════════════════════
// Filter
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_filter() {
    let zero = constant(0.0);
    let a0 = Node::from(AssignmentNode::named("a", Arc::clone(&zero))).shared();
    let node = if_else(vec![constant(true)], vec![Arc::clone(&a0)]);

    let found = node.filter(|n, _, _| matches!(n.as_ref(), Node::IfElse(_)));
    assert_eq!(found.len(), 1);
    assert!(Arc::ptr_eq(&found[0], &node));

    let found = node.filter(|n, _, _| matches!(n.as_ref(), Node::Assignment(_)));
    assert_eq!(found.len(), 1);
    assert!(Arc::ptr_eq(&found[0], &a0));

    let found = node.filter(|n, _, _| match n.as_ref() {
        Node::Constant(c) => c.value() == &Value::Number(0.0),
        _ => false,
    });
    assert_eq!(found.len(), 1);
    assert!(Arc::ptr_eq(&found[0], &zero));
}

#[test]
fn test_filter_reports_paths() {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0), assign_a(2.0)]);
    let mut paths = Vec::new();
    node.filter(|_, path, _| {
        paths.push(path.map(|p| p.to_string()));
        false
    });
    assert_eq!(
        paths,
        vec![
            None,
            Some("ifCondition".to_string()),
            Some("ifBlock".to_string()),
            Some("object".to_string()),
            Some("value".to_string()),
            Some("elseBlock".to_string()),
            Some("object".to_string()),
            Some("value".to_string()),
        ]
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Transform
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_transform_conditions() -> anyhow::Result<()> {
    let yes = constant(true);
    let no = constant(false);
    let a1 = assign_a(1.0);
    let node = if_else(
        vec![Arc::clone(&yes), Arc::clone(&yes)],
        vec![Arc::clone(&a1), Arc::clone(&a1), Arc::clone(&a1)],
    );

    let transformed = node.transform(|n, _, _| match n.as_ref() {
        Node::Constant(c) if c.value() == &Value::Bool(true) => Ok(Arc::clone(&no)),
        _ => Ok(Arc::clone(n)),
    })?;

    assert!(!Arc::ptr_eq(&transformed, &node));
    let Node::IfElse(result) = transformed.as_ref() else {
        panic!("transform changed the variant");
    };
    assert_eq!(result.conditions(), &[Arc::clone(&no), Arc::clone(&no)]);
    for block in result.blocks() {
        assert!(Arc::ptr_eq(block, &a1));
    }
    Ok(())
}

#[test]
fn test_transform_is_post_order() -> anyhow::Result<()> {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0)]);
    let mut order = Vec::new();
    node.transform(|n, _, _| {
        order.push(n.type_name());
        Ok(Arc::clone(n))
    })?;
    assert_eq!(
        order,
        vec![
            "ConstantNode",
            "SymbolNode",
            "ConstantNode",
            "AssignmentNode",
            "IfElseNode"
        ]
    );
    Ok(())
}

#[test]
fn test_transform_rewrites_root() -> anyhow::Result<()> {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0)]);
    let replacement = constant("replaced");
    let result = node.transform(|n, path, _| {
        if path.is_none() {
            Ok(Arc::clone(&replacement))
        } else {
            Ok(Arc::clone(n))
        }
    })?;
    assert!(Arc::ptr_eq(&result, &replacement));
    Ok(())
}

#[test]
fn test_transform_sees_rebuilt_children() -> anyhow::Result<()> {
    // Rewriting the constant inside `a = 1` must be visible when the
    // assignment itself is rewritten.
    let node = assign_a(1.0);
    let mut seen = None;
    node.transform(|n, _, _| match n.as_ref() {
        Node::Constant(_) => Ok(constant(7.0)),
        Node::Assignment(a) => {
            seen = Some(a.value().to_string());
            Ok(Arc::clone(n))
        }
        _ => Ok(Arc::clone(n)),
    })?;
    assert_eq!(seen.as_deref(), Some("7"));
    Ok(())
}

#[test]
fn test_transform_error_aborts() {
    let node = if_else(vec![constant(true)], vec![assign_a(1.0)]);
    let result = node.transform(|n, _, _| match n.as_ref() {
        Node::Symbol(_) => Ok(constant(0.0)),
        _ => Ok(Arc::clone(n)),
    });
    // Replacing an assignment target with a constant violates its invariant
    assert!(matches!(result, Err(ExprError::InvalidArgument(_))));
}
