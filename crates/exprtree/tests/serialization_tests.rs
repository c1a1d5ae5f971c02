//! Persisted record format and registry round trips

use exprtree::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn constant(value: impl Into<Value>) -> NodeRef {
    Node::from(ConstantNode::new(value)).shared()
}

fn sym(name: &str) -> NodeRef {
    Node::from(SymbolNode::new(name)).shared()
}

fn sample_tree() -> Node {
    let cond = Node::from(OperatorNode::binary(
        "<",
        "smaller",
        sym("x"),
        constant(1.5),
    ))
    .shared();
    let block = Node::from(
        BlockNode::new(vec![
            BlockEntry::hidden(
                Node::from(AssignmentNode::named("y", constant(BigNumber::new(15, 1)))).shared(),
            ),
            BlockEntry::visible(
                Node::from(FunctionNode::new("complex", vec![sym("x"), constant(2.0)])).shared(),
            ),
        ])
        .unwrap(),
    )
    .shared();
    let other = Node::from(ParenthesisNode::new(
        Node::from(OperatorNode::unary("-", "unaryMinus", sym("x"))).shared(),
    ))
    .shared();
    Node::from(IfElseNode::new(vec![cond], vec![block, other]).unwrap())
}

#[test]
fn test_if_else_record_shape() {
    let node = Node::from(IfElseNode::new(vec![constant(true)], vec![constant(1.0)]).unwrap());
    assert_eq!(
        node.to_json(),
        json!({
            "kind": "IfElseNode",
            "conditions": [{"kind": "ConstantNode", "value": true}],
            "blockNodes": [{"kind": "ConstantNode", "value": 1.0}],
        })
    );
}

#[test]
fn test_round_trip_structurally_equal() -> anyhow::Result<()> {
    let node = sample_tree();
    let restored = registry().deserialize(&node.to_json())?;
    assert_eq!(restored, node);
    Ok(())
}

#[test]
fn test_round_trip_through_text() -> anyhow::Result<()> {
    let node = sample_tree();
    let text = serde_json::to_string(&node)?;
    let restored = registry().deserialize_str(&text)?;
    assert_eq!(restored, node);
    assert_eq!(Node::from_json(&node.to_json())?, node);
    Ok(())
}

#[test]
fn test_round_trip_preserves_behaviour() -> anyhow::Result<()> {
    let node = sample_tree();
    let restored = registry().deserialize(&node.to_json())?;
    let evaluator = Evaluator::new();

    for x in [1.0, 2.0] {
        let mut a = Scope::new();
        a.set("x", Value::Number(x));
        let mut b = a.clone();
        assert_eq!(
            evaluator.evaluate(&node, &mut a)?,
            evaluator.evaluate(&restored, &mut b)?
        );
    }
    Ok(())
}

#[test]
fn test_unknown_tag() {
    let err = registry()
        .deserialize(&json!({"kind": "WhileNode", "body": []}))
        .unwrap_err();
    assert_eq!(
        err,
        ExprError::UnregisteredNodeType {
            tag: "WhileNode".to_string()
        }
    );
}

#[test]
fn test_conditions_must_be_array() {
    let err = registry()
        .deserialize(&json!({
            "kind": "IfElseNode",
            "conditions": "true",
            "blockNodes": [{"kind": "ConstantNode", "value": 1}],
        }))
        .unwrap_err();
    assert!(matches!(err, ExprError::InvalidArgument(_)));
}

#[test]
fn test_elements_must_be_nodes() {
    let err = registry()
        .deserialize(&json!({
            "kind": "IfElseNode",
            "conditions": [true],
            "blockNodes": [{"kind": "ConstantNode", "value": 1}],
        }))
        .unwrap_err();
    assert!(matches!(err, ExprError::InvalidArgument(_)));
}

#[test]
fn test_length_invariant_checked_on_decode() {
    let err = registry()
        .deserialize(&json!({
            "kind": "IfElseNode",
            "conditions": [],
            "blockNodes": [{"kind": "ConstantNode", "value": 1}],
        }))
        .unwrap_err();
    assert!(matches!(err, ExprError::InvalidArgument(_)));
}

#[test]
fn test_missing_field_is_malformed() {
    let err = registry()
        .deserialize(&json!({"kind": "IfElseNode", "conditions": []}))
        .unwrap_err();
    assert!(matches!(err, ExprError::MalformedRecord { ref tag, .. } if tag == "IfElseNode"));
}

#[test]
fn test_custom_registration() -> anyhow::Result<()> {
    fn decode_as_null(_: &serde_json::Value, _: &NodeRegistry) -> Result<Node> {
        Ok(Node::from(ConstantNode::new(Value::Null)))
    }

    let local = NodeRegistry::new();
    local.register("NullNode", decode_as_null);
    let node = local.deserialize(&json!({
        "kind": "IfElseNode",
        "conditions": [{"kind": "NullNode"}],
        "blockNodes": [{"kind": "ConstantNode", "value": 1}],
    }))?;
    assert_eq!(node.render(&RenderOptions::default()), "if null\n\t1\nend");
    assert!(!registry().is_registered("NullNode"));
    Ok(())
}

#[test]
fn test_bignumber_constants_round_trip() -> anyhow::Result<()> {
    let values = [
        BigNumber::new(i128::MIN, 0),
        BigNumber::new(i128::MAX, 7),
        "1e39".parse::<BigNumber>()?,
        "123456789012345678901234567890123456789012".parse::<BigNumber>()?,
        BigNumber::new(3, i64::MIN),
        BigNumber::new(-3, i64::MAX),
    ];
    for value in values {
        let node = Node::from(ConstantNode::new(value));
        assert_eq!(Node::from_json(&node.to_json())?, node);
    }
    Ok(())
}

#[test]
fn test_bignumber_record_stays_compact() -> anyhow::Result<()> {
    let node = Node::from(ConstantNode::new("1e-10000000".parse::<BigNumber>()?));
    let json = node.to_json();
    assert_eq!(
        json,
        json!({"kind": "ConstantNode", "value": {"kind": "BigNumber", "value": "1e-10000000"}})
    );
    assert!(serde_json::to_string(&json)?.len() < 100);
    assert_eq!(Node::from_json(&json)?, node);
    Ok(())
}

fn bignumber() -> impl Strategy<Value = BigNumber> {
    prop_oneof![
        (any::<i128>(), any::<i64>()).prop_map(|(m, s)| BigNumber::new(m, s)),
        (any::<i128>(), -40i64..40).prop_map(|(m, s)| BigNumber::new(m, s)),
        Just(BigNumber::new(i128::MIN, 0)),
        "-?[0-9]{30,60}(\\.[0-9]{1,20})?(e-?[0-9]{1,12})?"
            .prop_filter_map("decimal literal", |text| text.parse::<BigNumber>().ok()),
    ]
}

fn finite() -> impl Strategy<Value = f64> {
    -1e12f64..1e12
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        finite().prop_map(Value::Number),
        prop_oneof![Just(f64::INFINITY), Just(f64::NEG_INFINITY)].prop_map(Value::Number),
        "[a-z ]{0,8}".prop_map(|s| Value::string(s)),
        bignumber().prop_map(Value::bignumber),
        (finite(), finite()).prop_map(|(re, im)| Value::complex(re, im)),
        (prop::option::of(finite()), "[a-z]{1,3}").prop_map(|(value, unit)| {
            Value::unit(UnitValue { value, unit })
        }),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => scalar(),
        1 => prop::collection::vec(scalar(), 0..4).prop_map(Value::matrix),
    ]
}

fn leaf() -> impl Strategy<Value = NodeRef> {
    prop_oneof![
        3 => value().prop_map(|v| constant(v)),
        1 => "[a-z]{1,6}".prop_map(|s| sym(&s)),
    ]
}

fn tree() -> impl Strategy<Value = NodeRef> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Node::from(OperatorNode::binary("+", "add", a, b)).shared()),
            (prop::collection::vec(inner.clone(), 1..3), any::<bool>(), inner.clone()).prop_map(
                |(conditions, has_else, extra)| {
                    let mut blocks = conditions.clone();
                    if has_else {
                        blocks.push(extra);
                    }
                    Node::from(IfElseNode::new(conditions, blocks).unwrap()).shared()
                }
            ),
            inner.prop_map(|n| Node::from(ParenthesisNode::new(n)).shared()),
        ]
    })
}

proptest! {
    #[test]
    fn prop_round_trip(node in tree()) {
        let restored = registry().deserialize(&node.to_json()).unwrap();
        prop_assert_eq!(&restored, node.as_ref());
    }
}
