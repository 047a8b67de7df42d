//! Remapping a tree onto a typed shape via per-field query expressions.
//!
//! A [`FieldMap`] is an explicit table: target field name → query
//! expression. Fields without an expression default to a lookup by their
//! own name. The remapped object is what a typed decode deserializes from
//! (see [`Decoder::decode_into`](crate::parser::Decoder::decode_into)).

use crate::error::RemapError;
use crate::query;
use crate::tree::Node;
use std::collections::BTreeMap;

/// The field mapping table driving a typed decode.
///
/// # Examples
///
/// ```
/// use confit::FieldMap;
///
/// let fields = FieldMap::new()
///     .field("name")                  // looks up .name
///     .path("city", ".address.city"); // explicit expression
/// assert!(!fields.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    expr: Option<String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field resolved by name lookup.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            expr: None,
        });
        self
    }

    /// Adds a field resolved by an explicit query expression.
    pub fn path(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            expr: Some(expr.into()),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builds an object holding one entry per mapped field, each resolved by
/// running its query expression against `value`.
pub fn remap(value: &Node, fields: &FieldMap) -> Result<Node, RemapError> {
    let mut out = BTreeMap::new();
    for spec in &fields.fields {
        let expr = match &spec.expr {
            Some(expr) => expr.clone(),
            None => default_expr(&spec.name),
        };
        let resolved = query::eval(&expr, value).map_err(|e| RemapError::Eval {
            field: spec.name.clone(),
            source: e,
        })?;
        out.insert(spec.name.clone(), resolved);
    }
    Ok(Node::Object(out))
}

fn default_expr(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        format!(".{name}")
    } else {
        format!(".[{name:?}]")
    }
}
