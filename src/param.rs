//! Typed command-line parameters.
//!
//! Every argument handed to an external tool is a `Param` that knows its
//! own rendering style, so commands are assembled from typed pieces
//! instead of format strings.

use std::fmt;

/// How a parameter appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `--name="value"` — the value is quoted even when empty.
    LongEquals,
    /// `-name value`
    ShortSpaced,
    /// `-name` — any value is ignored.
    ShortFlag,
    /// `--name` — any value is ignored.
    LongFlag,
    /// `value` — the name is ignored.
    Positional,
}

/// A single command-line argument or flag.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    value: String,
    kind: ParamKind,
}

impl Param {
    /// Create a flag-style parameter carrying no value.
    pub fn flag(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            kind,
        }
    }

    /// Create a parameter carrying a value.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }

    /// Create a bare positional value.
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            value: value.into(),
            kind: ParamKind::Positional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Render as discrete argv tokens. This is the form processes are
    /// spawned with; no shell quoting is needed or applied.
    pub fn tokens(&self) -> Vec<String> {
        match self.kind {
            ParamKind::LongEquals => vec![format!("--{}={}", self.name, self.value)],
            ParamKind::ShortSpaced => vec![format!("-{}", self.name), self.value.clone()],
            ParamKind::ShortFlag => vec![format!("-{}", self.name)],
            ParamKind::LongFlag => vec![format!("--{}", self.name)],
            ParamKind::Positional => vec![self.value.clone()],
        }
    }
}

/// Parameters are equal when their names match. Value and kind are not
/// compared: a command spec holds at most one parameter per name.
impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::LongEquals => write!(f, "--{}=\"{}\"", self.name, self.value),
            ParamKind::ShortSpaced => write!(f, "-{} {}", self.name, self.value),
            ParamKind::ShortFlag => write!(f, "-{}", self.name),
            ParamKind::LongFlag => write!(f, "--{}", self.name),
            ParamKind::Positional => write!(f, "{}", self.value),
        }
    }
}
