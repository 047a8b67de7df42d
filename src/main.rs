//! confit command-line interface.
//!
//! Flags form a processing pipeline over a generic data tree and an output
//! buffer, applied strictly left-to-right in argv order. Missing pieces are
//! completed implicitly: a pipeline that does not start with a merge or
//! diff reads standard input, and one that does not end with an output
//! writes standard output.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use confit::{Decoder, Encoder, Format, Node, Painter, Pipeline, Syntax};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Merge,
    Diff,
    Exec,
    Encode,
    Output,
    Filter,
    FilterInverted,
    FilterRecursive,
    FilterInvertedRecursive,
    Query,
}

#[derive(Debug, Clone)]
struct Op {
    kind: OpKind,
    arg: String,
}

const OP_IDS: &[(&str, OpKind)] = &[
    ("merge", OpKind::Merge),
    ("diff", OpKind::Diff),
    ("exec", OpKind::Exec),
    ("encode", OpKind::Encode),
    ("output", OpKind::Output),
    ("filter", OpKind::Filter),
    ("filter-inverted", OpKind::FilterInverted),
    ("filter-recursive", OpKind::FilterRecursive),
    ("filter-inverted-recursive", OpKind::FilterInvertedRecursive),
    ("query", OpKind::Query),
];

fn main() {
    let matches = build_command().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("Error: {err:#}");
        process::exit(2);
    }
}

fn build_command() -> Command {
    fn op(id: &'static str, short: char, value: &'static str, help: &'static str) -> Arg {
        Arg::new(id)
            .short(short)
            .value_name(value)
            .action(ArgAction::Append)
            .help(help)
    }

    Command::new("confit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode yaml, json or toml; merge, diff, filter, query and template data trees; encode the result")
        .after_help(PIPELINE_HELP)
        .arg(op("merge", 'm', "IN", "merge input (-, @file, literal) (yaml, json, toml)"))
        .arg(op("diff", 'd', "IN", "diff input (-, @file, literal) (yaml, json, toml)"))
        .arg(op("exec", 'x', "IN", "execute template input against the tree (-, @file, literal)"))
        .arg(op("encode", 'e', "ENC", "encode to the output buffer (yaml, json, toml, struct)"))
        .arg(op("output", 'o', "OUT", "write the output buffer (-, file)"))
        .arg(op("filter", 'f', "PATH", "filter, plain"))
        .arg(op("filter-inverted", 'F', "PATH", "filter, inverted"))
        .arg(op("filter-recursive", 'r', "PATH", "filter, recursive"))
        .arg(op("filter-inverted-recursive", 'R', "PATH", "filter, recursive inverted"))
        .arg(op("query", 'q', "EXPR", "jq query"))
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("trace pipeline operations to stderr"),
        )
        .arg(
            Arg::new("inputs")
                .value_name("INPUT")
                .num_args(0..)
                .help("inputs merged before the flag pipeline (-, @file, literal)"),
        )
}

// Flag occurrences are replayed in argv order, with positional arguments
// prepended as merges.
fn collect_ops(matches: &ArgMatches) -> Vec<Op> {
    let mut indexed: Vec<(usize, Op)> = Vec::new();
    for (id, kind) in OP_IDS {
        if let (Some(values), Some(indices)) = (matches.get_many::<String>(id), matches.indices_of(id)) {
            for (value, index) in values.zip(indices) {
                indexed.push((
                    index,
                    Op {
                        kind: *kind,
                        arg: value.clone(),
                    },
                ));
            }
        }
    }
    indexed.sort_by_key(|(index, _)| *index);

    let mut ops: Vec<Op> = Vec::new();
    if let Some(inputs) = matches.get_many::<String>("inputs") {
        ops.extend(inputs.map(|value| Op {
            kind: OpKind::Merge,
            arg: value.clone(),
        }));
    }
    ops.extend(indexed.into_iter().map(|(_, op)| op));
    ops
}

// Pipelines must start with a merge or diff and end with an output; anything
// missing is filled in from standard input and standard output.
fn complete_ops(mut ops: Vec<Op>) -> Vec<Op> {
    let (mut needs_input, mut needs_output) = (true, true);
    for op in &ops {
        match op.kind {
            OpKind::Output => needs_output = false,
            OpKind::Merge | OpKind::Diff => {
                needs_input = false;
                needs_output = true;
            }
            _ => needs_output = true,
        }
    }
    if needs_input {
        ops.insert(
            0,
            Op {
                kind: OpKind::Merge,
                arg: "-".into(),
            },
        );
    }
    if needs_output {
        ops.push(Op {
            kind: OpKind::Output,
            arg: "-".into(),
        });
    }
    ops
}

#[derive(Default)]
struct OutBuffer {
    text: String,
    syntax: Syntax,
}

fn run(matches: &ArgMatches) -> Result<()> {
    let verbose = matches.get_flag("verbose");
    let ops = complete_ops(collect_ops(matches));
    let mut pipeline = Pipeline::new();
    let mut buffer = OutBuffer::default();
    for op in &ops {
        if verbose {
            eprintln!("{:?} {}", op.kind, op.arg);
        }
        apply(&mut pipeline, &mut buffer, op)?;
    }
    Ok(())
}

fn apply(pipeline: &mut Pipeline, buffer: &mut OutBuffer, op: &Op) -> Result<()> {
    match op.kind {
        OpKind::Merge => {
            let values = decode_all(&op.arg).context("merge")?;
            pipeline.merge(values);
        }
        OpKind::Diff => {
            let values = decode_all(&op.arg).context("diff")?;
            pipeline.diff(values);
        }
        OpKind::Filter => pipeline.filter(&op.arg),
        OpKind::FilterInverted => pipeline.filter_inverted(&op.arg),
        OpKind::FilterRecursive => pipeline.filter_recursive(&op.arg),
        OpKind::FilterInvertedRecursive => pipeline.filter_inverted_recursive(&op.arg),
        OpKind::Query => pipeline.query(&op.arg),
        OpKind::Exec => exec_template(pipeline, buffer, &op.arg).context("exec")?,
        OpKind::Encode => encode_slots(pipeline, buffer, &op.arg).context("encode")?,
        OpKind::Output => write_output(pipeline, buffer, &op.arg).context("output")?,
    }
    Ok(())
}

// An input is "-" for stdin, @file, or a literal document.
fn read_source(input: &str) -> Result<(String, String)> {
    match input {
        "-" => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("read stdin")?;
            Ok(("stdin".to_string(), content))
        }
        _ if input.starts_with('@') => {
            let path = &input[1..];
            let content = fs::read_to_string(path).with_context(|| path.to_string())?;
            Ok((path.to_string(), content))
        }
        _ => Ok(("argument".to_string(), input.to_string())),
    }
}

// Decodes every document from one input; a multi-document input spreads
// across pipeline slots by index.
fn decode_all(input: &str) -> Result<Vec<Node>> {
    let (name, content) = read_source(input)?;
    let mut decoder = Decoder::new();
    decoder.push_source(name, content);
    let mut values = Vec::new();
    loop {
        match decoder.decode() {
            Ok(value) => values.push(value),
            Err(e) if e.is_no_more() => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(values)
}

fn encode_slots(pipeline: &Pipeline, buffer: &mut OutBuffer, flag: &str) -> Result<()> {
    let format = Format::from_flag(flag);
    if format == Format::Toml && pipeline.values().len() > 1 {
        bail!("multiple documents were decoded, encoding as toml is not supported");
    }
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out).with_format(format);
        for value in pipeline.values() {
            encoder.encode(value)?;
        }
    }
    buffer.syntax = match format {
        Format::Yaml => Syntax::Yaml,
        Format::Json => Syntax::Json,
        Format::Toml => Syntax::Toml,
        Format::Struct => Syntax::Plain,
    };
    buffer
        .text
        .push_str(&String::from_utf8(out).context("encoded output was not utf-8")?);
    Ok(())
}

fn exec_template(pipeline: &Pipeline, buffer: &mut OutBuffer, input: &str) -> Result<()> {
    buffer.syntax = template_syntax(input);
    let (_, template) = read_source(input)?;
    let mut out = Vec::new();
    pipeline.render(&mut out, &template)?;
    buffer
        .text
        .push_str(&String::from_utf8(out).context("rendered output was not utf-8")?);
    Ok(())
}

// The buffer's syntax follows the template's file name, when there is one.
fn template_syntax(input: &str) -> Syntax {
    let name = match input.strip_prefix('@') {
        Some(name) => name,
        None => return Syntax::Plain,
    };
    let is = |ext: &str| {
        name.ends_with(&format!(".{ext}")) || name.contains(&format!(".{ext}."))
    };
    if is("yml") || is("yaml") {
        Syntax::Yaml
    } else if is("json") {
        Syntax::Json
    } else if is("toml") {
        Syntax::Toml
    } else {
        Syntax::Plain
    }
}

fn write_output(pipeline: &Pipeline, buffer: &mut OutBuffer, target: &str) -> Result<()> {
    if buffer.text.is_empty() {
        // nothing was encoded: implicit yaml encode
        encode_slots(pipeline, buffer, "yaml")?;
    }
    match target {
        "-" => {
            let stdout = io::stdout();
            if stdout.is_terminal() {
                let painted = Painter {
                    syntax: buffer.syntax,
                }
                .paint(&buffer.text);
                stdout.lock().write_all(painted.as_bytes())?;
            } else {
                stdout.lock().write_all(buffer.text.as_bytes())?;
            }
        }
        path => fs::write(path, &buffer.text).with_context(|| path.to_string())?,
    }
    buffer.text.clear();
    Ok(())
}

const PIPELINE_HELP: &str = "\
Pipeline:
  Flags form a processing pipeline for a generic data tree and an output
  buffer, applied from left to right. Positional arguments are prepended
  as merges.

Inputs:
  Inputs are @file, - for stdin, or a literal string. Merge (-m) overlays
  the input onto the tree, the input winning at matching positions. Diff
  (-d) is the transpose of merge: only what the input adds or changes
  remains. Input format (yaml, json, toml) is detected automatically.
  Exec (-x) runs a template against the tree.

Encoding and output:
  Encode (-e) writes yaml, json, toml, or a Rust struct definition to the
  output buffer (y, j, t, s also work). Output (-o) goes to a file or
  stdout (-); an empty buffer is encoded as yaml implicitly. A pipeline
  that does not start with a merge or diff reads stdin, and one that does
  not end with an output writes stdout, so the bare command converts
  stdin to yaml.

Filters:
  Filters discard parts of the tree according to a path. Map keys are
  addressed by name and separated by dots; * matches any key. Lists use
  index and slice notation: [], [n], [a:], [:b], [a:b]. A path may end
  with ==value to match a specific value; the value is decoded as yaml,
  json, or toml.

  -f matches from the root and keeps matches; -F keeps everything else;
  -r matches at any depth and keeps matches; -R drops matches at any
  depth.

Queries:
  Query (-q) applies a jq expression to the tree and replaces it with the
  result.";
