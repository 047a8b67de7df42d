//! Encoding of trees as YAML, JSON, TOML, or a Rust struct definition.

use crate::error::EncodeError;
use crate::tree::Node;
use crate::typegen;
use std::io::Write;

/// The output formats an [`Encoder`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
    Toml,
    /// A Rust struct definition derived from the value's shape.
    Struct,
}

impl Format {
    /// Maps a CLI encoding flag to a format. Unrecognized values fall back
    /// to YAML.
    pub fn from_flag(flag: &str) -> Format {
        match flag {
            "j" | "json" => Format::Json,
            "t" | "toml" => Format::Toml,
            "s" | "struct" => Format::Struct,
            _ => Format::Yaml,
        }
    }
}

/// Writes trees to a writer in a configured format. The default is YAML.
pub struct Encoder<W: Write> {
    w: W,
    format: Format,
}

impl<W: Write> Encoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            format: Format::Yaml,
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Encodes one tree. YAML documents carry a `---` marker so that
    /// encoded streams round-trip through the decoder; JSON documents are
    /// newline-terminated for the same reason.
    pub fn encode(&mut self, v: &Node) -> Result<(), EncodeError> {
        match self.format {
            Format::Yaml => {
                let s = serde_yaml::to_string(&node_to_yaml(v))?;
                if !s.starts_with("---\n") {
                    self.w.write_all(b"---\n")?;
                }
                self.w.write_all(s.as_bytes())?;
            }
            Format::Json => {
                let s = serde_json::to_string(&node_to_json(v))?;
                self.w.write_all(s.as_bytes())?;
                self.w.write_all(b"\n")?;
            }
            Format::Toml => {
                let s = toml::to_string(&node_to_toml(v)?)?;
                self.w.write_all(s.as_bytes())?;
            }
            Format::Struct => typegen::write_struct(&mut self.w, v)?,
        }
        Ok(())
    }
}

/// Converts a tree to a `serde_json::Value`. Integral numbers encode as
/// integers so that decode/encode round-trips do not grow `.0` suffixes.
pub fn node_to_json(v: &Node) -> serde_json::Value {
    match v {
        Node::Null => serde_json::Value::Null,
        Node::Bool(b) => serde_json::Value::Bool(*b),
        Node::Number(n) => serde_json::Value::Number(json_number(*n)),
        Node::String(s) => serde_json::Value::String(s.clone()),
        Node::Array(items) => serde_json::Value::Array(items.iter().map(node_to_json).collect()),
        Node::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), node_to_json(v)))
                .collect(),
        ),
    }
}

fn json_number(n: f64) -> serde_json::Number {
    if is_integral(n) {
        serde_json::Number::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).unwrap_or_else(|| serde_json::Number::from(0))
    }
}

/// Converts a tree to a `serde_yaml::Value`.
pub fn node_to_yaml(v: &Node) -> serde_yaml::Value {
    match v {
        Node::Null => serde_yaml::Value::Null,
        Node::Bool(b) => serde_yaml::Value::Bool(*b),
        Node::Number(n) => {
            if is_integral(*n) {
                serde_yaml::Value::Number(serde_yaml::Number::from(*n as i64))
            } else {
                serde_yaml::Value::Number(serde_yaml::Number::from(*n))
            }
        }
        Node::String(s) => serde_yaml::Value::String(s.clone()),
        Node::Array(items) => {
            serde_yaml::Value::Sequence(items.iter().map(node_to_yaml).collect())
        }
        Node::Object(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), node_to_yaml(v)))
                .collect(),
        ),
    }
}

/// Converts a tree to a `toml::Value`. Null has no TOML representation and
/// is an error.
pub fn node_to_toml(v: &Node) -> Result<toml::Value, EncodeError> {
    match v {
        Node::Null => Err(EncodeError::TomlUnsupported("null")),
        Node::Bool(b) => Ok(toml::Value::Boolean(*b)),
        Node::Number(n) => Ok(if is_integral(*n) {
            toml::Value::Integer(*n as i64)
        } else {
            toml::Value::Float(*n)
        }),
        Node::String(s) => Ok(toml::Value::String(s.clone())),
        Node::Array(items) => Ok(toml::Value::Array(
            items.iter().map(node_to_toml).collect::<Result<_, _>>()?,
        )),
        Node::Object(map) => Ok(toml::Value::Table(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), node_to_toml(v)?)))
                .collect::<Result<_, EncodeError>>()?,
        )),
    }
}

fn is_integral(n: f64) -> bool {
    n.fract() == 0.0 && n.is_finite() && n.abs() < 9.007_199_254_740_992e15
}
