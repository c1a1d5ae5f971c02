//! Construction and evaluation of conditional chains

use exprtree::*;

fn constant(value: impl Into<Value>) -> NodeRef {
    Node::from(ConstantNode::new(value)).shared()
}

/// `a = n`
fn assign_a(n: f64) -> NodeRef {
    Node::from(AssignmentNode::named("a", constant(n))).shared()
}

fn conditions(flags: &[bool]) -> Vec<NodeRef> {
    flags.iter().map(|&b| constant(b)).collect()
}

fn assignments(values: &[f64]) -> Vec<NodeRef> {
    values.iter().map(|&n| assign_a(n)).collect()
}

fn eval(flags: &[bool], values: &[f64]) -> Option<Value> {
    let node = Node::from(IfElseNode::new(conditions(flags), assignments(values)).unwrap());
    Evaluator::new().evaluate(&node, &mut Scope::new()).unwrap()
}

fn num(n: f64) -> Option<Value> {
    Some(Value::Number(n))
}

// ═══════════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_create() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(conditions(&[true]), assignments(&[0.0]))?);
    assert_eq!(node.type_name(), "IfElseNode");
    assert!(matches!(node, Node::IfElse(_)));
    Ok(())
}

#[test]
fn test_missing_arguments_rejected() {
    assert!(matches!(
        IfElseNode::new(vec![], vec![]),
        Err(ExprError::InvalidArgument(_))
    ));
    assert!(matches!(
        IfElseNode::new(conditions(&[true]), vec![]),
        Err(ExprError::InvalidArgument(_))
    ));
    assert!(matches!(
        IfElseNode::new(vec![], assignments(&[0.0])),
        Err(ExprError::InvalidArgument(_))
    ));
}

#[test]
fn test_more_conditions_than_blocks_rejected() {
    let result = IfElseNode::new(conditions(&[true, false]), assignments(&[0.0]));
    assert!(matches!(result, Err(ExprError::InvalidArgument(_))));
}

#[test]
fn test_two_extra_blocks_rejected() {
    let result = IfElseNode::new(conditions(&[true]), assignments(&[0.0, 1.0, 2.0]));
    assert!(matches!(result, Err(ExprError::InvalidArgument(_))));
}

// ═══════════════════════════════════════════════════════════════════════
// Lazy Evaluation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_lazy_evaluation_side_effects() -> anyhow::Result<()> {
    let evaluator = Evaluator::new();
    let cases: [(&[bool], &[f64], f64); 3] = [
        (&[true], &[0.0], 0.0),
        (&[false, false, true], &[0.0, 1.0, 2.0], 2.0),
        (&[false, false], &[0.0, 1.0, 3.0], 3.0),
    ];

    for (flags, values, expected) in cases {
        let node = Node::from(IfElseNode::new(conditions(flags), assignments(values))?);
        let mut scope = Scope::new();
        assert_eq!(evaluator.evaluate(&node, &mut scope)?, num(expected));
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.get("a"), Some(&Value::Number(expected)));
    }
    Ok(())
}

#[test]
fn test_conditions_after_match_not_evaluated() -> anyhow::Result<()> {
    // The second condition would assign `b` if it ran
    let node = Node::from(IfElseNode::new(
        vec![
            constant(true),
            Node::from(AssignmentNode::named("b", constant(true))).shared(),
        ],
        assignments(&[1.0, 2.0]),
    )?);
    let mut scope = Scope::new();
    Evaluator::new().evaluate(&node, &mut scope)?;
    assert!(!scope.contains("b"));
    assert_eq!(scope.get("a"), Some(&Value::Number(1.0)));
    Ok(())
}

#[test]
fn test_no_match_leaves_scope_untouched() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(conditions(&[false]), assignments(&[1.0]))?);
    let mut scope = Scope::new();
    assert_eq!(Evaluator::new().evaluate(&node, &mut scope)?, None);
    assert!(scope.is_empty());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Branch Selection
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_single_if() {
    assert_eq!(eval(&[true], &[1.0]), num(1.0));
    assert_eq!(eval(&[false], &[1.0]), None);
}

#[test]
fn test_if_else() {
    assert_eq!(eval(&[true], &[1.0, 2.0]), num(1.0));
    assert_eq!(eval(&[false], &[1.0, 2.0]), num(2.0));
}

#[test]
fn test_if_else_if() {
    assert_eq!(eval(&[true, true], &[1.0, 2.0]), num(1.0));
    assert_eq!(eval(&[false, true], &[1.0, 2.0]), num(2.0));
    assert_eq!(eval(&[false, false], &[1.0, 2.0]), None);
}

#[test]
fn test_if_else_if_else() {
    assert_eq!(eval(&[true, true], &[1.0, 2.0, 3.0]), num(1.0));
    assert_eq!(eval(&[false, true], &[1.0, 2.0, 3.0]), num(2.0));
    assert_eq!(eval(&[false, false], &[1.0, 2.0, 3.0]), num(3.0));
}

#[test]
fn test_multiple_else_if_with_else() {
    let values = [1.0, 2.0, 3.0, 0.0];
    assert_eq!(eval(&[true, true, true], &values), num(1.0));
    assert_eq!(eval(&[false, true, true], &values), num(2.0));
    assert_eq!(eval(&[false, false, true], &values), num(3.0));
    assert_eq!(eval(&[false, false, false], &values), num(0.0));
}

#[test]
fn test_multiple_else_if_without_else() {
    let values = [1.0, 2.0, 3.0, 0.0];
    assert_eq!(eval(&[true, true, true, true], &values), num(1.0));
    assert_eq!(eval(&[false, true, true, true], &values), num(2.0));
    assert_eq!(eval(&[false, false, true, true], &values), num(3.0));
    assert_eq!(eval(&[false, false, false, true], &values), num(0.0));
    assert_eq!(eval(&[false, false, false, false], &values), None);
}

#[test]
fn test_truthy_non_boolean_conditions() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(
        vec![
            constant(0.0),
            constant(""),
            constant(Value::complex(0.0, 1.0)),
        ],
        vec![constant("zero"), constant("empty"), constant("complex")],
    )?);
    let result = Evaluator::new().evaluate(&node, &mut Scope::new())?;
    assert_eq!(result, Some(Value::string("complex")));
    Ok(())
}

#[test]
fn test_condition_error_skips_else() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(
        vec![Node::from(SymbolNode::new("missing")).shared()],
        assignments(&[1.0, 2.0]),
    )?);
    let mut scope = Scope::new();
    let err = Evaluator::new().evaluate(&node, &mut scope).unwrap_err();
    assert_eq!(
        err,
        ExprError::UndefinedSymbol {
            name: "missing".to_string()
        }
    );
    assert!(scope.is_empty());
    Ok(())
}

#[test]
fn test_unsupported_condition_type() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(
        vec![Node::from(FunctionNode::new("matrix", vec![constant(1.0)])).shared()],
        assignments(&[1.0, 2.0]),
    )?);
    let err = Evaluator::new()
        .evaluate(&node, &mut Scope::new())
        .unwrap_err();
    assert!(matches!(err, ExprError::UnsupportedConditionType { ref kind } if kind == "Matrix"));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Compiled Reuse
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_reevaluate_against_fresh_scopes() -> anyhow::Result<()> {
    let larger = Node::from(OperatorNode::binary(
        ">",
        "larger",
        Node::from(SymbolNode::new("x")).shared(),
        constant(10.0),
    ))
    .shared();
    let node = Node::from(IfElseNode::new(
        vec![larger],
        vec![constant("big"), constant("small")],
    )?);
    let expression = Evaluator::new().compile(&node)?;

    let mut scope = Scope::new();
    scope.set("x", Value::Number(50.0));
    assert_eq!(expression.evaluate(&mut scope)?, Some(Value::string("big")));

    let mut scope = Scope::new();
    scope.set("x", Value::Number(5.0));
    assert_eq!(expression.evaluate(&mut scope)?, Some(Value::string("small")));
    Ok(())
}

#[test]
fn test_bound_args_shadow_scope() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(
        vec![Node::from(SymbolNode::new("flag")).shared()],
        vec![constant("arg"), constant("scope")],
    )?);
    let args = Args::new().with("flag", Value::Bool(true));
    let expression = Evaluator::new().compile_with_args(&node, &args.names())?;

    let mut scope = Scope::new();
    scope.set("flag", Value::Bool(false));
    let result = expression.evaluate_with(&mut scope, &args, &EvalContext::new())?;
    assert_eq!(result, Some(Value::string("arg")));
    Ok(())
}

#[test]
fn test_traced_evaluation_matches_untraced() -> anyhow::Result<()> {
    let node = Node::from(IfElseNode::new(conditions(&[false, true]), assignments(&[1.0, 2.0]))?);
    let expression = Evaluator::new().compile(&node)?;
    let traced = EvalContext::new().traced(true);
    let result = expression.evaluate_with(&mut Scope::new(), &Args::new(), &traced)?;
    assert_eq!(result, num(2.0));
    Ok(())
}
