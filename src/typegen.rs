//! Derives a Rust type skeleton from a value's shape.
//!
//! Objects become named structs (nested objects get derived type names),
//! arrays become `Vec<T>` when their element shapes unify under merge, and
//! anything without a single shape falls back to `serde_json::Value`.

use crate::error::EncodeError;
use crate::merge::merge;
use crate::tree::Node;
use std::io::Write;

struct StructDef {
    name: String,
    fields: Vec<FieldDef>,
}

struct FieldDef {
    ident: String,
    rename: Option<String>,
    ty: String,
}

/// Writes a Rust struct definition (or type alias, for non-object roots)
/// describing `v` to the writer.
pub fn write_struct<W: Write>(w: &mut W, v: &Node) -> Result<(), EncodeError> {
    let mut defs = Vec::new();
    let root_ty = type_of(v, "Root", &mut defs);
    if defs.first().map(|d| d.name.as_str()) != Some("Root") {
        writeln!(w, "type Root = {};", root_ty)?;
        if !defs.is_empty() {
            writeln!(w)?;
        }
    }
    for (i, def) in defs.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "#[derive(Debug, serde::Serialize, serde::Deserialize)]")?;
        writeln!(w, "struct {} {{", def.name)?;
        for field in &def.fields {
            if let Some(rename) = &field.rename {
                writeln!(w, "    #[serde(rename = {:?})]", rename)?;
            }
            writeln!(w, "    {}: {},", field.ident, field.ty)?;
        }
        writeln!(w, "}}")?;
    }
    Ok(())
}

fn type_of(v: &Node, name: &str, defs: &mut Vec<StructDef>) -> String {
    match v {
        Node::Null => "serde_json::Value".to_string(),
        Node::Bool(_) => "bool".to_string(),
        Node::Number(_) => "f64".to_string(),
        Node::String(_) => "String".to_string(),
        Node::Array(items) => {
            let Some(first) = items.first() else {
                return "Vec<serde_json::Value>".to_string();
            };
            if items.iter().any(|i| i.type_name() != first.type_name()) {
                return "Vec<serde_json::Value>".to_string();
            }
            let elem = if first.as_object().is_some() {
                // unify element shapes so optional keys from any element
                // appear in the struct
                let unified = items
                    .iter()
                    .fold(Node::Null, |acc, item| merge(acc, item.clone()));
                type_of(&unified, &format!("{name}Item"), defs)
            } else {
                type_of(first, name, defs)
            };
            format!("Vec<{elem}>")
        }
        Node::Object(map) => {
            let type_name = unique_name(name, defs);
            let index = defs.len();
            defs.push(StructDef {
                name: type_name.clone(),
                fields: Vec::new(),
            });
            let mut fields = Vec::new();
            for (key, value) in map {
                if key.is_empty() {
                    continue;
                }
                let ident = field_ident(key);
                let ty = type_of(value, &format!("{type_name}{}", pascal_case(key)), defs);
                let rename = (ident != *key).then(|| key.clone());
                fields.push(FieldDef { ident, rename, ty });
            }
            defs[index].fields = fields;
            type_name
        }
    }
}

fn unique_name(base: &str, defs: &[StructDef]) -> String {
    if !defs.iter().any(|d| d.name == base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}{n}");
        if !defs.iter().any(|d| d.name == candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn field_ident(key: &str) -> String {
    let mut ident = String::new();
    for c in key.chars() {
        match c {
            'a'..='z' | '0'..='9' | '_' => ident.push(c),
            'A'..='Z' => ident.push(c.to_ascii_lowercase()),
            _ => {
                if !ident.ends_with('_') && !ident.is_empty() {
                    ident.push('_');
                }
            }
        }
    }
    let ident = ident.trim_end_matches('_').to_string();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("field_{ident}")
    } else {
        ident
    }
}

fn pascal_case(key: &str) -> String {
    let mut out = String::new();
    let mut upper_next = true;
    for c in key.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}
