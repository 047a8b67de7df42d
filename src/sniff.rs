//! Pre-parse analysis of raw input.
//!
//! A single forward scan over the bytes of a document, skipping quoted runs,
//! that does two jobs before any real parser gets involved: guess the
//! language from its discriminating punctuation, and collect positional
//! hazards (tab indentation, type tags) that would otherwise surface as
//! opaque parser errors. The scan is a heuristic pre-check, not a validator.

use crate::error::DecodeError;
use std::fmt;

/// The language guessed from a sample's punctuation.
///
/// JSON never appears here: it is binary-decidable by a strict parse
/// attempt, which the decoder performs itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Unknown,
    Yaml,
    Toml,
}

/// What a hazard is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    /// A tab inside a line's leading indentation run.
    TabIndent,
    /// A `!` positioned where it could begin a type tag.
    TypeTag,
}

/// A structural warning anchored to a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hazard {
    pub line: usize,
    pub col: usize,
    pub kind: HazardKind,
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HazardKind::TabIndent => {
                write!(f, "{}:{}: yaml: tab indents are not valid", self.line, self.col)
            }
            HazardKind::TypeTag => {
                write!(f, "{}:{}: yaml: tags are not supported", self.line, self.col)
            }
        }
    }
}

/// The result of scanning one input buffer.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub language: Language,
    pub hazards: Vec<Hazard>,
}

impl Analysis {
    /// Folds up to `limit` hazards into a decode error, with a trailing
    /// summary line when more were collected.
    pub fn into_error(self, limit: usize) -> DecodeError {
        let shown = self.hazards.len().min(limit);
        let mut message = self
            .hazards
            .iter()
            .take(shown)
            .map(Hazard::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        if self.hazards.len() > shown {
            message.push_str(&format!("\n{} more errors", self.hazards.len() - shown));
        }
        DecodeError::Hazards { message }
    }
}

// Flags tabs while still inside a line's leading indentation run.
struct TabScanner {
    armed: bool,
}

impl TabScanner {
    fn step(&mut self, c: u8, line: usize, col: usize, hazards: &mut Vec<Hazard>) {
        match c {
            b'\n' => self.armed = true,
            _ if !self.armed => {}
            b' ' => {}
            b'\t' => hazards.push(Hazard {
                line,
                col,
                kind: HazardKind::TabIndent,
            }),
            _ => self.armed = false,
        }
    }
}

// Flags a `!` that could begin a type tag: warm after `: [ { ,` until a
// space arms hot, hot at line start or after whitespace.
struct TagScanner {
    warm: bool,
    hot: bool,
}

impl TagScanner {
    fn step(&mut self, c: u8, line: usize, col: usize, hazards: &mut Vec<Hazard>) {
        match c {
            b':' | b'[' | b'{' | b',' => {
                self.warm = true;
                self.hot = false;
            }
            b'\n' => self.hot = true,
            _ if !(self.warm || self.hot) => {}
            b' ' => self.hot = true,
            _ if !self.hot => {}
            b'!' => hazards.push(Hazard {
                line,
                col,
                kind: HazardKind::TypeTag,
            }),
            _ => {
                self.warm = false;
                self.hot = false;
            }
        }
    }
}

// Classifies by the first discriminating punctuation outside quotes: a `:`
// followed by a space pins YAML (and sticks); failing that, a bare `=` pins
// TOML.
struct LangScanner {
    hot: bool,
    language: Language,
}

impl LangScanner {
    fn step(&mut self, c: u8) {
        match c {
            b':' => self.hot = true,
            b' ' if self.hot => self.language = Language::Yaml,
            _ if self.hot => self.hot = false,
            _ if self.language == Language::Yaml => {}
            b'=' => self.language = Language::Toml,
            _ => {}
        }
    }
}

/// Scans `input` once, dispatching every unquoted, unescaped byte with its
/// 1-based (line, column) position to the hazard scanners and the language
/// classifier.
pub fn analyze(input: &[u8]) -> Analysis {
    let mut hazards = Vec::new();
    let mut tabs = TabScanner { armed: true };
    let mut tags = TagScanner {
        warm: false,
        hot: true,
    };
    let mut lang = LangScanner {
        hot: false,
        language: Language::Unknown,
    };

    let (mut escape, mut squote, mut dquote) = (false, false, false);
    let (mut line, mut col) = (1usize, 0usize);

    for &c in input {
        if c == b'\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }

        if escape {
            escape = false;
            continue;
        }
        match c {
            b'\\' => {
                escape = true;
                continue;
            }
            b'\'' if !dquote => {
                squote = !squote;
                continue;
            }
            b'"' if !squote => {
                dquote = !dquote;
                continue;
            }
            _ if squote || dquote => continue,
            _ => {}
        }

        tabs.step(c, line, col, &mut hazards);
        tags.step(c, line, col, &mut hazards);
        lang.step(c);
    }

    Analysis {
        language: lang.language,
        hazards,
    }
}
