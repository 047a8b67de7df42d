//! Template execution against pipeline slots, delegated to minijinja.

use crate::encode::node_to_json;
use crate::error::RenderError;
use crate::tree::Node;
use minijinja::Environment;
use std::io::Write;

/// Compiles `template` once and renders it against each value in order,
/// writing everything to one stream. The first parse or render error aborts
/// without attempting later values.
///
/// Each value is exposed to the template as `data`; when the value is an
/// object its keys are additionally exposed as top-level variables.
pub fn render_all<W: Write>(
    out: &mut W,
    template: &str,
    values: &[Node],
) -> Result<(), RenderError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    let tmpl = env
        .template_from_str(template)
        .map_err(RenderError::Parse)?;
    for value in values {
        let rendered = tmpl.render(context_for(value)).map_err(RenderError::Render)?;
        out.write_all(rendered.as_bytes())?;
    }
    Ok(())
}

fn context_for(value: &Node) -> serde_json::Value {
    let data = node_to_json(value);
    let mut ctx = match &data {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    ctx.insert("data".to_string(), data);
    serde_json::Value::Object(ctx)
}
