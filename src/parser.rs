//! Decoding of YAML, JSON, and TOML input into trees.
//!
//! The format is auto-detected per document: the sniffer classifies the
//! buffer and collects hazards, TOML is parsed whole, JSON is decided by a
//! strict parse attempt (which then locks the source to a JSON value
//! stream), and everything else goes to the YAML parser one `---`-separated
//! document at a time.
//!
//! A [`Decoder`] reads from one or more sources; each call to
//! [`Decoder::decode`] takes one document from every source and folds them
//! left-to-right with [`merge`], rightmost winning.

use crate::encode::node_to_json;
use crate::error::{ConfitError, DecodeError, RemapError};
use crate::merge::merge;
use crate::remap::{self, FieldMap};
use crate::sniff::{self, Language};
use crate::tree::Node;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Decodes a single document from a string, auto-detecting the format.
pub fn decode_str(input: &str) -> Result<Node, DecodeError> {
    DocumentSource::new(input.to_string()).next_document()
}

/// One input buffer, yielding documents until exhausted.
pub struct DocumentSource {
    buf: String,
    // set once the source is locked to a JSON value stream
    json_pos: Option<usize>,
    started: bool,
}

impl DocumentSource {
    pub fn new(input: String) -> Self {
        Self {
            buf: input,
            json_pos: None,
            started: false,
        }
    }

    /// Decodes the next document.
    ///
    /// Returns [`DecodeError::NoMoreInput`] once the buffer is exhausted,
    /// and keeps returning it on every later call.
    pub fn next_document(&mut self) -> Result<Node, DecodeError> {
        if let Some(pos) = self.json_pos {
            return self.next_json_document(pos);
        }
        if self.started && self.buf.is_empty() {
            return Err(DecodeError::NoMoreInput);
        }
        let first = !self.started;
        self.started = true;

        let analysis = sniff::analyze(self.buf.as_bytes());
        if analysis.language == Language::Toml {
            let value: toml::Value = toml::from_str(&self.buf)?;
            self.buf.clear();
            return Ok(toml_to_node(value));
        }

        if first {
            // strict JSON parse attempt: a binary-decidable oracle that also
            // shields valid JSON from yaml-specific hazards
            let mut stream = serde_json::Deserializer::from_str(&self.buf)
                .into_iter::<serde_json::Value>();
            if let Some(Ok(value)) = stream.next() {
                self.json_pos = Some(stream.byte_offset());
                return Ok(json_to_node(value));
            }
        }

        if !analysis.hazards.is_empty() {
            return Err(analysis.into_error(6));
        }

        // "\n---\n" can only be a yaml document separator, so splitting on
        // it before the real parse is safe
        let body_start = if self.buf.starts_with("---\n") { 4 } else { 0 };
        let (head_end, tail_start) = match self.buf[body_start..].find("\n---\n") {
            Some(i) => (body_start + i, body_start + i + 5),
            None => (self.buf.len(), self.buf.len()),
        };
        let head = &self.buf[body_start..head_end];
        let value = if head.trim().is_empty() {
            Node::Null
        } else {
            yaml_to_node(serde_yaml::from_str(head)?)
        };
        let tail = self.buf[tail_start..].to_string();
        self.buf = tail;
        Ok(value)
    }

    fn next_json_document(&mut self, pos: usize) -> Result<Node, DecodeError> {
        let mut stream =
            serde_json::Deserializer::from_str(&self.buf[pos..]).into_iter::<serde_json::Value>();
        match stream.next() {
            None => Err(DecodeError::NoMoreInput),
            Some(Ok(value)) => {
                self.json_pos = Some(pos + stream.byte_offset());
                Ok(json_to_node(value))
            }
            Some(Err(e)) => Err(DecodeError::Json(e)),
        }
    }
}

/// Reads documents from one or more named sources, merging across them.
#[derive(Default)]
pub struct Decoder {
    sources: Vec<(String, DocumentSource)>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder over a single anonymous input.
    pub fn from_input(content: impl Into<String>) -> Self {
        let mut decoder = Self::new();
        decoder.push_source("input", content);
        decoder
    }

    /// A decoder over files. Paths that do not exist are skipped. Files are
    /// read fully up front; no handle outlives this call.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DecodeError> {
        let mut decoder = Self::new();
        for p in paths {
            let path = p.as_ref();
            if !path.exists() {
                continue;
            }
            let name = path.to_string_lossy().to_string();
            let content = fs::read_to_string(path)
                .map_err(|e| DecodeError::Io(e).attributed(name.clone()))?;
            decoder.push_source(name, content);
        }
        Ok(decoder)
    }

    pub fn push_source(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.sources
            .push((name.into(), DocumentSource::new(content.into())));
    }

    /// Takes one document from each source and merges them left-to-right,
    /// rightmost winning. A source that is already exhausted contributes
    /// nothing; when every source is exhausted this returns
    /// [`DecodeError::NoMoreInput`], repeatedly. Real errors carry the
    /// source's name.
    pub fn decode(&mut self) -> Result<Node, DecodeError> {
        let mut merged = Node::Null;
        let mut exhausted = 0;
        for (name, source) in &mut self.sources {
            match source.next_document() {
                Ok(value) => merged = merge(merged, value),
                Err(e) if e.is_no_more() => exhausted += 1,
                Err(e) => return Err(e.attributed(name.clone())),
            }
        }
        if exhausted == self.sources.len() {
            return Err(DecodeError::NoMoreInput);
        }
        Ok(merged)
    }

    /// Decodes and remaps onto a typed shape.
    ///
    /// Each entry of `fields` names a target field and the query expression
    /// that extracts it (defaulting to a lookup by field name); the remapped
    /// object is then deserialized into `T`, with conversion failures
    /// reported against their path.
    pub fn decode_into<T: DeserializeOwned>(&mut self, fields: &FieldMap) -> Result<T, ConfitError> {
        let value = self.decode()?;
        let value = if fields.is_empty() {
            value
        } else {
            remap::remap(&value, fields)?
        };
        serde_path_to_error::deserialize(node_to_json(&value)).map_err(|err| {
            let path = err.path().to_string();
            ConfitError::Remap(RemapError::Convert {
                path,
                message: err.into_inner().to_string(),
            })
        })
    }
}

/// Converts a `serde_json::Value` into a tree.
pub fn json_to_node(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Null => Node::Null,
        serde_json::Value::Bool(b) => Node::Bool(b),
        serde_json::Value::Number(n) => Node::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Node::String(s),
        serde_json::Value::Array(arr) => Node::Array(arr.into_iter().map(json_to_node).collect()),
        serde_json::Value::Object(obj) => Node::Object(
            obj.into_iter()
                .map(|(k, v)| (k, json_to_node(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

/// Converts a `serde_yaml::Value` into a tree.
///
/// Non-string mapping keys are converted to strings; tagged values are
/// unwrapped to their inner value.
pub fn yaml_to_node(value: serde_yaml::Value) -> Node {
    match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                Node::Number(f)
            } else if let Some(i) = n.as_i64() {
                Node::Number(i as f64)
            } else {
                Node::Number(n.as_u64().map(|u| u as f64).unwrap_or(0.0))
            }
        }
        serde_yaml::Value::String(s) => Node::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Node::Array(seq.into_iter().map(yaml_to_node).collect())
        }
        serde_yaml::Value::Mapping(map) => Node::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let key = match k {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        serde_yaml::Value::Null => "null".to_string(),
                        other => format!("{:?}", other),
                    };
                    (key, yaml_to_node(v))
                })
                .collect::<BTreeMap<_, _>>(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

/// Converts a `toml::Value` into a tree. Datetimes become strings.
pub fn toml_to_node(value: toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::String(s),
        toml::Value::Integer(i) => Node::Number(i as f64),
        toml::Value::Float(f) => Node::Number(f),
        toml::Value::Boolean(b) => Node::Bool(b),
        toml::Value::Datetime(dt) => Node::String(dt.to_string()),
        toml::Value::Array(arr) => Node::Array(arr.into_iter().map(toml_to_node).collect()),
        toml::Value::Table(table) => Node::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_node(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}
