use std::fmt::{self, Write};

use ferry_api::{Kind, WireTag, WireValue};

/// Longest key text kept in a `Key` or `Value` error, before the `...`.
const KEY_REPR_LIMIT: usize = 128;

/// Why a string could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("invalid syntax")]
    Syntax,

    #[error("value out of range")]
    Range,
}

/// Failure of a single conversion call.
///
/// Nested failures keep the inner error as `source` and render outward:
/// `element 2: key "x": cannot convert to int64: got list`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot convert to {expected}: got {actual}")]
    TypeMismatch { expected: Kind, actual: WireTag },

    #[error("cannot parse {text:?}: {cause}")]
    Parse {
        text: String,
        #[source]
        cause: ParseFailure,
    },

    #[error("expected unsigned value, got negative integer {0}")]
    NegativeForUnsigned(i64),

    #[error("unsupported target kind: {0}")]
    UnsupportedKind(Kind),

    #[error("cannot infer target kind for {0} value")]
    CannotInferKind(WireTag),

    #[error("missing element descriptor")]
    MissingElementDescriptor,

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        source: Box<ConvertError>,
    },

    #[error("key {key}: {source}")]
    Key {
        key: String,
        source: Box<ConvertError>,
    },

    #[error("element for key {key}: {source}")]
    Value {
        key: String,
        source: Box<ConvertError>,
    },

    #[error("nesting depth exceeds limit of {limit}")]
    MaxDepthExceeded { limit: usize },

    #[error("converted value does not fit host type {expected}")]
    HostShape { expected: &'static str },
}

impl ConvertError {
    pub(crate) fn mismatch(expected: Kind, actual: &WireValue) -> Self {
        ConvertError::TypeMismatch {
            expected,
            actual: actual.tag(),
        }
    }

    pub(crate) fn parse(text: &str, cause: ParseFailure) -> Self {
        ConvertError::Parse {
            text: text.to_string(),
            cause,
        }
    }

    pub(crate) fn element(index: usize, source: ConvertError) -> Self {
        ConvertError::Element {
            index,
            source: Box::new(source),
        }
    }

    pub(crate) fn key(key: &WireValue, source: ConvertError) -> Self {
        ConvertError::Key {
            key: key_repr(key),
            source: Box::new(source),
        }
    }

    pub(crate) fn value(key: &WireValue, source: ConvertError) -> Self {
        ConvertError::Value {
            key: key_repr(key),
            source: Box::new(source),
        }
    }

    /// Innermost error, with all index/key context stripped.
    pub fn root_cause(&self) -> &ConvertError {
        match self {
            ConvertError::Element { source, .. }
            | ConvertError::Key { source, .. }
            | ConvertError::Value { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Display form of a wire key, capped at `KEY_REPR_LIMIT` bytes.
pub(crate) fn key_repr(key: &WireValue) -> String {
    let mut out = Capped {
        buf: String::new(),
        room: KEY_REPR_LIMIT,
    };
    if write!(out, "{key}").is_err() {
        out.buf.push_str("...");
    }
    out.buf
}

/// Writer that stops with `fmt::Error` once `room` is used up.
struct Capped {
    buf: String,
    room: usize,
}

impl Write for Capped {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() <= self.room {
            self.buf.push_str(s);
            self.room -= s.len();
            return Ok(());
        }
        let mut end = self.room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.push_str(&s[..end]);
        self.room = 0;
        Err(fmt::Error)
    }
}

/// Failure to load or validate a `ConvertConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config parse error ({path}): {source}")]
    ParseFile {
        path: String,
        source: toml::de::Error,
    },

    #[error("io error ({path}): {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Add context to the error.
    ///
    /// `Invalid` gets the context prepended to its message, a bare `Parse`
    /// becomes `ParseFile` with the context as its path.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            ConfigError::Invalid(msg) => ConfigError::Invalid(format!("{ctx}: {msg}")),
            ConfigError::Parse(source) => ConfigError::ParseFile {
                path: ctx.to_string(),
                source,
            },
            other => other,
        }
    }
}
