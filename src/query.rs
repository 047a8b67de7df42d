//! Query evaluation over trees, delegated to jaq.

use crate::encode::node_to_json;
use crate::error::QueryError;
use crate::parser::json_to_node;
use crate::tree::Node;
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;

/// Compiles `expr` as a jq filter and runs it over `input`.
///
/// Zero outputs yield `Null`, one output yields that value, and several
/// outputs collect into an array.
pub fn eval(expr: &str, input: &Node) -> Result<Node, QueryError> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File {
        code: expr,
        path: (),
    };

    let modules = loader.load(&arena, program).map_err(load_error)?;
    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(compile_error)?;

    let inputs = RcIter::new(core::iter::empty());
    let mut outputs = Vec::new();
    for item in filter.run((Ctx::new([], &inputs), Val::from(node_to_json(input)))) {
        let val = item.map_err(|e| QueryError::Eval(format!("{e:?}")))?;
        // Val displays as JSON text
        let value: serde_json::Value =
            serde_json::from_str(&format!("{val}")).map_err(|e| QueryError::Eval(e.to_string()))?;
        outputs.push(json_to_node(value));
    }

    Ok(match outputs.len() {
        0 => Node::Null,
        1 => outputs.swap_remove(0),
        _ => Node::Array(outputs),
    })
}

fn load_error(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> QueryError {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("{err:?} in `{}`\n", file.code));
    }
    QueryError::Load(s.trim_end().to_string())
}

fn compile_error(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> QueryError {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undefined) in list {
            s.push_str(&format!(
                "undefined `{name}`: {undefined:?} in `{}`\n",
                file.code
            ));
        }
    }
    QueryError::Compile(s.trim_end().to_string())
}
