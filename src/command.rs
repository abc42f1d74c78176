//! Command assembly with name-based deduplication.

use crate::param::{Param, ParamKind};

/// An external command invocation: a program plus its parameters.
///
/// Named parameters are inserted at the front of the sequence; inserting a
/// parameter whose name is already present is a no-op, so the first value
/// set for a name wins while the most recent call decides position.
/// Positional values keep their call order and always render after every
/// named parameter.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    named: Vec<Param>,
    positional: Vec<Param>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            named: Vec::new(),
            positional: Vec::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Insert a named parameter at the front of the sequence, unless a
    /// parameter with the same non-empty name is already present.
    pub fn add_param(&mut self, param: Param) {
        if !param.name().is_empty() && self.named.contains(&param) {
            return;
        }
        self.named.insert(0, param);
    }

    /// Insert a flag with no value.
    pub fn add_flag(&mut self, name: &str, kind: ParamKind) {
        self.add_param(Param::flag(name, kind));
    }

    /// Insert a parameter carrying a value.
    pub fn add_value(&mut self, name: &str, value: &str, kind: ParamKind) {
        self.add_param(Param::with_value(name, value, kind));
    }

    /// Append a positional value after all named parameters.
    pub fn add_positional(&mut self, value: impl Into<String>) {
        self.positional.push(Param::positional(value));
    }

    /// Drop every parameter. The escape hatch for callers that need to
    /// replace a value instead of relying on first-write-wins.
    pub fn reset_params(&mut self) {
        self.named.clear();
        self.positional.clear();
    }

    fn params(&self) -> impl Iterator<Item = &Param> {
        self.named.iter().chain(self.positional.iter())
    }

    /// Shell-style display string for logging. Never used to spawn the
    /// process; see [`tokens`](Self::tokens).
    pub fn render(&self) -> String {
        let mut out = self.program.clone();
        for param in self.params() {
            out.push(' ');
            out.push_str(&param.to_string());
        }
        out
    }

    /// Discrete argv tokens, program first. This is the form handed to the
    /// process spawner, so no shell ever interprets the arguments.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.program.clone()];
        for param in self.params() {
            tokens.extend(param.tokens());
        }
        tokens
    }
}
