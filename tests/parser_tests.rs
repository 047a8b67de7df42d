//! Tests for decoding, multi-document streams, multi-source merging, and
//! typed remapping.

use confit::{decode_str, Decoder, DocumentSource, Encoder, FieldMap, Format, Node};
use serde::Deserialize;
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
fn test_autodetect_all_three_formats() {
    let expected = obj(&[("cute", Node::String("blep".into()))]);
    assert_eq!(decode_str("cute: blep").unwrap(), expected);
    assert_eq!(decode_str(r#"{"cute":"blep"}"#).unwrap(), expected);
    assert_eq!(decode_str("cute = \"blep\"").unwrap(), expected);
}

#[test]
fn test_decode_failures() {
    assert!(decode_str("=").is_err());
    assert!(decode_str("foo:\n\tbaz: true").is_err());
}

#[test]
fn test_decode_passes() {
    assert!(decode_str("").is_ok());
    assert!(decode_str("foo:\n  baz: true").is_ok());
    assert!(decode_str("{\n\t\"x\":1\n}").is_ok());
}

#[test]
fn test_hazards_surface_when_yaml_parse_is_doomed() {
    let err = decode_str("foo:\n\tbaz: true\n\tmlem: 1").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("2:1: yaml: tab indents are not valid"));
    assert!(text.contains("3:1: yaml: tab indents are not valid"));
}

#[test]
fn test_yaml_document_stream() {
    let mut source = DocumentSource::new("---\na: 1\n---\nb: 2\n".to_string());
    assert_eq!(
        source.next_document().unwrap(),
        obj(&[("a", Node::Number(1.0))])
    );
    assert_eq!(
        source.next_document().unwrap(),
        obj(&[("b", Node::Number(2.0))])
    );
    assert!(source.next_document().unwrap_err().is_no_more());
}

#[test]
fn test_json_value_stream() {
    let mut source = DocumentSource::new("{\"a\":1}\n{\"b\":2}\n".to_string());
    assert_eq!(
        source.next_document().unwrap(),
        obj(&[("a", Node::Number(1.0))])
    );
    assert_eq!(
        source.next_document().unwrap(),
        obj(&[("b", Node::Number(2.0))])
    );
    assert!(source.next_document().unwrap_err().is_no_more());
}

#[test]
fn test_exhausted_source_stays_exhausted() {
    let mut source = DocumentSource::new("a: 1\n".to_string());
    source.next_document().unwrap();
    for _ in 0..3 {
        assert!(source.next_document().unwrap_err().is_no_more());
    }
}

#[test]
fn test_multi_source_merge_rightmost_wins() {
    let mut decoder = Decoder::new();
    decoder.push_source("a", "a: blep");
    decoder.push_source("b", r#"{"b":"blep"}"#);
    decoder.push_source("c", "b = \"mlem\"");
    let merged = decoder.decode().unwrap();
    assert_eq!(
        merged,
        obj(&[
            ("a", Node::String("blep".into())),
            ("b", Node::String("mlem".into())),
        ])
    );
    assert!(decoder.decode().unwrap_err().is_no_more());
}

#[test]
fn test_source_errors_carry_identity() {
    let mut decoder = Decoder::new();
    decoder.push_source("good.yml", "a: 1");
    decoder.push_source("bad.toml", "=");
    let err = decoder.decode().unwrap_err();
    assert!(!err.is_no_more());
    assert!(err.to_string().contains("source bad.toml"));
}

#[test]
fn test_from_paths_skips_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.yml");
    std::fs::write(&present, "a: 1\n").unwrap();
    let missing = dir.path().join("missing.yml");

    let mut decoder = Decoder::from_paths(&[present, missing]).unwrap();
    assert_eq!(
        decoder.decode().unwrap(),
        obj(&[("a", Node::Number(1.0))])
    );
}

#[test]
fn test_empty_decoder_is_immediately_exhausted() {
    let mut decoder = Decoder::new();
    assert!(decoder.decode().unwrap_err().is_no_more());
}

fn round_trip(format: Format, value: &Node) {
    let mut out = Vec::new();
    Encoder::new(&mut out)
        .with_format(format)
        .encode(value)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    let back = decode_str(&text).unwrap();
    assert_eq!(&back, value, "format {format:?} via {text:?}");
}

#[test]
fn test_encode_decode_round_trips() {
    let fixtures = [
        obj(&[("b", Node::Bool(true))]),
        obj(&[("f", Node::Number(13.37))]),
        obj(&[("s", Node::String("foo baz".into()))]),
        obj(&[(
            "a",
            Node::Array(vec![
                Node::String("a".into()),
                Node::String("b".into()),
                Node::String("x".into()),
            ]),
        )]),
        obj(&[("foo \"= baz", Node::Bool(true))]),
    ];
    for value in &fixtures {
        round_trip(Format::Yaml, value);
        round_trip(Format::Json, value);
        round_trip(Format::Toml, value);
    }
}

#[test]
fn test_encoded_yaml_stream_round_trips() {
    let a = obj(&[("a", Node::Number(1.0))]);
    let b = obj(&[("b", Node::Number(2.0))]);
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out);
        encoder.encode(&a).unwrap();
        encoder.encode(&b).unwrap();
    }
    let mut source = DocumentSource::new(String::from_utf8(out).unwrap());
    assert_eq!(source.next_document().unwrap(), a);
    assert_eq!(source.next_document().unwrap(), b);
    assert!(source.next_document().unwrap_err().is_no_more());
}

#[derive(Debug, Deserialize, PartialEq)]
struct Nested {
    a: String,
    b: String,
}

#[test]
fn test_decode_into_with_field_expressions() {
    let mut decoder = Decoder::from_input(r#"{"a":{"a":{"a":"blep"},"b":{"a":"mlem"}}}"#);
    let fields = FieldMap::new().path("a", ".a.a.a").path("b", ".a.b.a");
    let nested: Nested = decoder.decode_into(&fields).unwrap();
    assert_eq!(
        nested,
        Nested {
            a: "blep".into(),
            b: "mlem".into()
        }
    );
}

#[derive(Debug, Deserialize, PartialEq)]
struct Columns {
    names: Vec<String>,
    counts: Vec<f64>,
}

#[test]
fn test_decode_into_transposes_rows() {
    let mut decoder =
        Decoder::from_input(r#"[{"a":"blep","b":1},{"a":"mlem","b":-1}]"#);
    let fields = FieldMap::new()
        .path("names", "[.[] | .a]")
        .path("counts", "[.[] | .b]");
    let columns: Columns = decoder.decode_into(&fields).unwrap();
    assert_eq!(
        columns,
        Columns {
            names: vec!["blep".into(), "mlem".into()],
            counts: vec![1.0, -1.0],
        }
    );
}

#[derive(Debug, Deserialize)]
struct Merged {
    a: String,
    b: String,
}

#[test]
fn test_decode_into_merges_sources_first() {
    let mut decoder = Decoder::new();
    decoder.push_source("a", "a: blep");
    decoder.push_source("b", r#"{"b":"blep"}"#);
    decoder.push_source("c", "b = \"mlem\"");
    let merged: Merged = decoder.decode_into(&FieldMap::new()).unwrap();
    assert_eq!(merged.a, "blep");
    assert_eq!(merged.b, "mlem");
}

#[test]
fn test_decode_into_reports_conversion_path() {
    let mut decoder = Decoder::from_input(r#"{"a":{"a":{"a":42},"b":{"a":"mlem"}}}"#);
    let fields = FieldMap::new().path("a", ".a.a.a").path("b", ".a.b.a");
    let err = decoder.decode_into::<Nested>(&fields).unwrap_err();
    assert!(err.to_string().contains("a"));
}
