//! Tests for the pipeline accumulator: slot lifecycle, operation
//! sequencing, query, and template rendering.

use confit::{decode_str, Node, Pipeline, RenderError};
use std::collections::BTreeMap;

fn obj(entries: &[(&str, Node)]) -> Node {
    Node::Object(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn test_merge_sequence_like_cli() {
    let mut p = Pipeline::new();
    p.merge(vec![decode_str(r#"{"blep":2,"mlem":6}"#).unwrap()]);
    p.merge(vec![decode_str(r#"{"blep":4}"#).unwrap()]);
    assert_eq!(
        p.value(0),
        Some(&obj(&[
            ("blep", Node::Number(4.0)),
            ("mlem", Node::Number(6.0)),
        ]))
    );
}

#[test]
fn test_merge_then_diff_like_cli() {
    let mut p = Pipeline::new();
    p.merge(vec![decode_str(r#"{"blep":2,"mlem":6}"#).unwrap()]);
    p.diff(vec![decode_str(r#"{"blep":4,"mlem":6}"#).unwrap()]);
    assert_eq!(p.value(0), Some(&obj(&[("blep", Node::Number(4.0))])));
}

#[test]
fn test_operations_observe_prior_results() {
    let mut p = Pipeline::new();
    p.merge(vec![decode_str(r#"{"cute":{"blep":3,"mlem":5}}"#).unwrap()]);
    p.filter("cute.blep");
    p.query(".cute.blep");
    assert_eq!(p.value(0), Some(&Node::Number(3.0)));
}

#[test]
fn test_filter_variants_apply_to_every_slot() {
    let mut p = Pipeline::new();
    p.merge(vec![
        decode_str(r#"{"keep":1,"drop":2}"#).unwrap(),
        decode_str(r#"{"keep":3}"#).unwrap(),
    ]);
    p.filter("keep");
    assert_eq!(p.value(0), Some(&obj(&[("keep", Node::Number(1.0))])));
    assert_eq!(p.value(1), Some(&obj(&[("keep", Node::Number(3.0))])));
}

#[test]
fn test_filter_without_match_nulls_the_slot() {
    let mut p = Pipeline::new();
    p.merge(vec![Node::Bool(true)]);
    p.filter("nah");
    assert_eq!(p.value(0), Some(&Node::Null));
}

#[test]
fn test_query_failure_nulls_the_slot() {
    let mut p = Pipeline::new();
    p.merge(vec![obj(&[("a", Node::Number(1.0))])]);
    p.query(".[(");
    assert_eq!(p.value(0), Some(&Node::Null));
}

#[test]
fn test_query_extracts() {
    let mut p = Pipeline::new();
    p.merge(vec![decode_str(r#"{"a":{"b":[10,20]}}"#).unwrap()]);
    p.query(".a.b[1]");
    assert_eq!(p.value(0), Some(&Node::Number(20.0)));
}

#[test]
fn test_render_all_slots_in_order() {
    let mut p = Pipeline::new();
    p.merge(vec![
        obj(&[("cute", Node::String("blep".into()))]),
        obj(&[("cute", Node::String("mlem".into()))]),
    ]);
    let mut out = Vec::new();
    p.render(&mut out, "kitty gon {{ cute }}\n").unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "kitty gon blep\nkitty gon mlem\n"
    );
}

#[test]
fn test_render_fails_fast_on_first_bad_slot() {
    let mut p = Pipeline::new();
    p.merge(vec![
        obj(&[("items", Node::Array(vec![Node::Number(1.0)]))]),
        obj(&[("items", Node::Number(3.0))]),
        obj(&[("items", Node::Array(vec![Node::Number(2.0)]))]),
    ]);
    let mut out = Vec::new();
    let err = p
        .render(&mut out, "{% for i in items %}{{ i }}{% endfor %}")
        .unwrap_err();
    assert!(matches!(err, RenderError::Render(_)));
    // the first slot rendered before the second failed; the third never ran
    assert_eq!(String::from_utf8(out).unwrap(), "1");
}

#[test]
fn test_multi_document_input_spreads_across_slots() {
    let mut decoder = confit::Decoder::from_input("---\na: 1\n---\na: 2\n");
    let mut values = Vec::new();
    loop {
        match decoder.decode() {
            Ok(v) => values.push(v),
            Err(e) if e.is_no_more() => break,
            Err(e) => panic!("{e}"),
        }
    }
    let mut p = Pipeline::new();
    p.merge(values);
    assert_eq!(p.values().len(), 2);
    assert_eq!(p.value(0), Some(&obj(&[("a", Node::Number(1.0))])));
    assert_eq!(p.value(1), Some(&obj(&[("a", Node::Number(2.0))])));
}
