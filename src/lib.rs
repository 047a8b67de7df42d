//! confit - a pipeline for structured data.
//!
//! Decode YAML, JSON, or TOML (auto-detected); merge, diff, filter, query,
//! and template the resulting trees; encode as YAML, JSON, TOML, or a Rust
//! struct definition.
//!
//! The heart of the crate is a small tree algebra over [`Node`]:
//! right-biased [`merge`], its transpose [`diff`], and a family of
//! path-driven filters. Decoding runs a one-pass [`sniff`](crate::sniff)
//! scan first, classifying the input and collecting positional hazards
//! before any real parser sees the bytes.
//!
//! # Example
//!
//! ```
//! use confit::{decode_str, filter, merge, Node};
//!
//! let base = decode_str("blep: 2\nmlem: 6").unwrap();
//! let over = decode_str(r#"{"blep":4}"#).unwrap();
//! let merged = merge(base, over);
//!
//! let kept = filter(&merged, "blep").unwrap();
//! assert_eq!(kept, decode_str(r#"{"blep":4}"#).unwrap());
//! ```

pub mod diff;
pub mod encode;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod merge;
pub mod parser;
mod path;
pub mod pipeline;
pub mod query;
pub mod remap;
pub mod render;
pub mod sniff;
pub mod tree;
pub mod typegen;

// Re-export commonly used types for convenience
pub use diff::diff;
pub use encode::{node_to_json, node_to_toml, node_to_yaml, Encoder, Format};
pub use error::{
    ConfitError, DecodeError, EncodeError, QueryError, RemapError, RenderError,
};
pub use filter::{
    drop_null, filter, filter_inverted, filter_inverted_recursive, filter_recursive,
};
pub use highlight::{Painter, Syntax};
pub use merge::merge;
pub use parser::{
    decode_str, json_to_node, toml_to_node, yaml_to_node, Decoder, DocumentSource,
};
pub use pipeline::Pipeline;
pub use query::eval as query;
pub use remap::{remap, FieldMap};
pub use render::render_all;
pub use sniff::{analyze, Analysis, Hazard, HazardKind, Language};
pub use tree::Node;
