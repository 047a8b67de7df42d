//! Tests for the merge operation.

use confit::{merge, Node};
use std::collections::BTreeMap;

fn obj(entries: &[(&str, Node)]) -> Node {
    Node::Object(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn arr(items: &[Node]) -> Node {
    Node::Array(items.to_vec())
}

fn n(v: f64) -> Node {
    Node::Number(v)
}

#[test]
fn test_scalar_right_bias() {
    assert_eq!(merge(n(1.0), n(2.0)), n(2.0));
    assert_eq!(merge(Node::Bool(false), Node::Bool(true)), Node::Bool(true));
    assert_eq!(
        merge(Node::String("a".into()), Node::String("b".into())),
        Node::String("b".into())
    );
}

#[test]
fn test_shape_mismatch_takes_right() {
    assert_eq!(merge(n(0.0), Node::Bool(false)), Node::Bool(false));
    assert_eq!(merge(Node::Bool(true), n(0.0)), n(0.0));
    assert_eq!(merge(obj(&[("a", n(1.0))]), n(5.0)), n(5.0));
    assert_eq!(merge(arr(&[n(1.0)]), obj(&[])), obj(&[]));
    assert_eq!(merge(Node::Null, obj(&[("a", n(1.0))])), obj(&[("a", n(1.0))]));
}

#[test]
fn test_mapping_union() {
    let a = obj(&[("a", n(1.0)), ("b", n(2.0))]);
    let b = obj(&[("b", n(3.0)), ("c", n(4.0))]);
    assert_eq!(
        merge(a, b),
        obj(&[("a", n(1.0)), ("b", n(3.0)), ("c", n(4.0))])
    );
}

#[test]
fn test_sequence_overlay() {
    assert_eq!(
        merge(arr(&[n(1.0), n(2.0), n(3.0)]), arr(&[n(9.0)])),
        arr(&[n(9.0), n(2.0), n(3.0)])
    );
    assert_eq!(
        merge(arr(&[n(1.0)]), arr(&[n(2.0), n(3.0)])),
        arr(&[n(2.0), n(3.0)])
    );
    assert_eq!(merge(arr(&[]), arr(&[Node::Bool(true)])), arr(&[Node::Bool(true)]));
}

#[test]
fn test_sequence_elements_merge_recursively() {
    let a = arr(&[obj(&[("x", n(1.0)), ("y", n(2.0))])]);
    let b = arr(&[obj(&[("y", n(9.0))])]);
    assert_eq!(merge(a, b), arr(&[obj(&[("x", n(1.0)), ("y", n(9.0))])]));
}

#[test]
fn test_left_fold_is_associative_in_effect() {
    let a = obj(&[("x", n(1.0))]);
    let b = obj(&[("y", n(2.0))]);
    let c = obj(&[("x", n(3.0))]);

    let folded = merge(merge(a.clone(), b.clone()), c.clone());
    let grouped = merge(a, merge(b, c));
    assert_eq!(folded, grouped);
    assert_eq!(folded, obj(&[("x", n(3.0)), ("y", n(2.0))]));
}

#[test]
fn test_not_commutative() {
    let a = obj(&[("x", n(1.0))]);
    let b = obj(&[("x", n(2.0))]);
    assert_ne!(merge(a.clone(), b.clone()), merge(b, a));
}
