//! Terminal syntax painting for encoded output.
//!
//! Presentation only: a [`Painter`] is request-local configuration, built
//! where output is written and dropped with it. Painting never changes the
//! visible characters, only wraps them in color codes when colors are
//! enabled.

use colored::Colorize;

/// The syntax the output buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    #[default]
    Plain,
    Yaml,
    Json,
    Toml,
}

/// Paints encoded text for terminal display.
pub struct Painter {
    pub syntax: Syntax,
}

impl Painter {
    pub fn paint(&self, text: &str) -> String {
        match self.syntax {
            Syntax::Plain => text.to_string(),
            Syntax::Yaml => paint_lines(text, paint_yaml_line),
            Syntax::Toml => paint_lines(text, paint_toml_line),
            Syntax::Json => paint_json(text),
        }
    }
}

fn paint_lines(text: &str, paint_line: fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in text.split_inclusive('\n') {
        let line = piece.strip_suffix('\n');
        out.push_str(&paint_line(line.unwrap_or(piece)));
        if line.is_some() {
            out.push('\n');
        }
    }
    out
}

fn paint_yaml_line(line: &str) -> String {
    if line == "---" {
        return line.bold().to_string();
    }
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];
    let (marker, rest) = match trimmed.strip_prefix("- ") {
        Some(rest) => ("- ", rest),
        None => ("", trimmed),
    };
    match split_key(rest, ':') {
        Some((key, value)) => format!(
            "{indent}{marker}{}:{}",
            key.cyan(),
            paint_scalar(value)
        ),
        None => format!("{indent}{marker}{}", paint_scalar(rest)),
    }
}

fn paint_toml_line(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return line.cyan().bold().to_string();
    }
    match split_key(line, '=') {
        Some((key, value)) => format!("{}={}", key.cyan(), paint_scalar(value)),
        None => paint_scalar(line),
    }
}

// Splits at the first separator outside quotes, returning None when the
// line has no unquoted separator.
fn split_key(line: &str, sep: char) -> Option<(&str, &str)> {
    let (mut squote, mut dquote) = (false, false);
    for (i, c) in line.char_indices() {
        match c {
            '\'' if !dquote => squote = !squote,
            '"' if !squote => dquote = !dquote,
            _ if squote || dquote => {}
            c if c == sep => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

fn paint_scalar(text: &str) -> String {
    let trimmed = text.trim();
    let painted = if trimmed.is_empty() {
        return text.to_string();
    } else if trimmed == "true" || trimmed == "false" || trimmed == "null" || trimmed == "~" {
        trimmed.magenta().to_string()
    } else if trimmed.parse::<f64>().is_ok() {
        trimmed.yellow().to_string()
    } else if trimmed.starts_with('"') || trimmed.starts_with('\'') {
        trimmed.green().to_string()
    } else {
        trimmed.to_string()
    };
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    format!("{}{}{}", &text[..start], painted, &text[end..])
}

// One pass over JSON text: keys cyan, strings green, numbers yellow,
// keywords magenta, punctuation untouched.
fn paint_json(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                let end = i.min(bytes.len());
                let token = &text[start..end];
                let mut lookahead = end;
                while lookahead < bytes.len() && bytes[lookahead] == b' ' {
                    lookahead += 1;
                }
                if lookahead < bytes.len() && bytes[lookahead] == b':' {
                    out.push_str(&token.cyan().to_string());
                } else {
                    out.push_str(&token.green().to_string());
                }
            }
            b'0'..=b'9' | b'-' => {
                let start = i;
                while i < bytes.len()
                    && matches!(bytes[i], b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
                {
                    i += 1;
                }
                out.push_str(&text[start..i].yellow().to_string());
            }
            b't' | b'f' | b'n' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let token = &text[start..i];
                if matches!(token, "true" | "false" | "null") {
                    out.push_str(&token.magenta().to_string());
                } else {
                    out.push_str(token);
                }
            }
            c => {
                out.push(c as char);
                i += 1;
            }
        }
    }
    out
}
