//! Error types for decoding, encoding, querying, remapping, and rendering.
//!
//! Every error returns to the immediate caller; nothing in the core retries
//! or recovers locally. The binary decides whether to abort (it does, on the
//! first error).

/// Errors produced while decoding input into a tree.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Sentinel, not a failure: the input stream is exhausted. Decode loops
    /// check for it with [`DecodeError::is_no_more`] and stop cleanly;
    /// repeated calls keep returning it.
    #[error("no more to decode")]
    NoMoreInput,

    #[error("read failed")]
    Io(#[from] std::io::Error),

    #[error("invalid json")]
    Json(#[from] serde_json::Error),

    #[error("invalid yaml")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid toml")]
    Toml(#[from] toml::de::Error),

    /// Positional hazards collected by the sniffer, escalated because the
    /// primary parse for the guessed format also failed.
    #[error("{message}")]
    Hazards { message: String },

    /// Wraps an underlying error with the originating input's identity.
    #[error("source {name}")]
    Source {
        name: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// True for the exhaustion sentinel, including when wrapped with a
    /// source attribution.
    pub fn is_no_more(&self) -> bool {
        match self {
            DecodeError::NoMoreInput => true,
            DecodeError::Source { source, .. } => source.is_no_more(),
            _ => false,
        }
    }

    pub fn attributed(self, name: impl Into<String>) -> Self {
        DecodeError::Source {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

/// Errors produced while encoding a tree.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("write failed")]
    Io(#[from] std::io::Error),

    #[error("json encoding failed")]
    Json(#[from] serde_json::Error),

    #[error("yaml encoding failed")]
    Yaml(#[from] serde_yaml::Error),

    #[error("toml encoding failed")]
    Toml(#[from] toml::ser::Error),

    #[error("{0} cannot be represented in toml")]
    TomlUnsupported(&'static str),
}

/// Errors produced by the query evaluator.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("query parse failed: {0}")]
    Load(String),

    #[error("query compile failed: {0}")]
    Compile(String),

    #[error("query failed: {0}")]
    Eval(String),
}

/// Errors produced while remapping a tree onto a typed shape.
#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    #[error("field {field}")]
    Eval {
        field: String,
        #[source]
        source: QueryError,
    },

    #[error("at {path}: {message}")]
    Convert { path: String, message: String },
}

/// Errors produced by template execution.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid template")]
    Parse(#[source] minijinja::Error),

    #[error("template execution failed")]
    Render(#[source] minijinja::Error),

    #[error("write failed")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for library callers that drive whole pipelines.
#[derive(Debug, thiserror::Error)]
pub enum ConfitError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Remap(#[from] RemapError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
