//! Command catalog: identifier → command spec.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

use super::argument::Argument;
use super::{print, set, Command, CommandKind};

// ── LineGrammar ───────────────────────────────────────────────────────────────

/// Splits the argument text of one invocation line into raw arguments.
///
/// Each capture group of `pattern` yields one argument, trimmed.  An
/// unmatched optional group either ends the list or, with `pad_missing`,
/// still yields an empty argument so the count stays fixed.
#[derive(Debug, Clone)]
pub struct LineGrammar {
    pattern: Regex,
    pad_missing: bool,
}

impl LineGrammar {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { pattern: Regex::new(pattern)?, pad_missing: false })
    }

    /// Like [`LineGrammar::new`], but every group always yields an argument.
    pub fn padded(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { pattern: Regex::new(pattern)?, pad_missing: true })
    }

    /// Split `line`.  A line the pattern does not match yields no arguments.
    pub fn split(&self, line: &str) -> Vec<Argument> {
        let Some(caps) = self.pattern.captures(line) else {
            return Vec::new();
        };
        let mut args = Vec::new();
        for group in caps.iter().skip(1) {
            match group {
                Some(m) => args.push(Argument::new(m.as_str().trim())),
                None if self.pad_missing => args.push(Argument::new("")),
                None => break,
            }
        }
        args
    }
}

// ── CommandSpec ───────────────────────────────────────────────────────────────

/// Everything needed to instantiate a command from a quoted line.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    id: String,
    grammar: LineGrammar,
    kind: CommandKind,
}

impl CommandSpec {
    pub fn new(id: impl Into<String>, grammar: LineGrammar, kind: CommandKind) -> Self {
        Self { id: id.into(), grammar, kind }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grammar(&self) -> &LineGrammar {
        &self.grammar
    }

    /// Split one invocation line with this command's grammar.
    pub fn parse_line_arguments(&self, line: &str) -> Vec<Argument> {
        self.grammar.split(line)
    }

    /// Build a command instance with the given arguments.
    pub fn instantiate(&self, arguments: Vec<Argument>) -> Command {
        Command::new(self.id.clone(), self.kind.clone(), arguments)
    }
}

// ── CommandCatalog ────────────────────────────────────────────────────────────

/// Lookup failure for a command identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command `{}`", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

/// Registered commands, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    commands: HashMap<String, CommandSpec>,
}

impl CommandCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in `set` and `print` commands.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(set::spec());
        catalog.register(print::spec());
        catalog
    }

    /// Register `spec` under its identifier, replacing any previous entry.
    pub fn register(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.id.clone(), spec);
    }

    /// Remove a command.  Returns `true` if it existed.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.commands.remove(id).is_some()
    }

    pub fn resolve(&self, id: &str) -> Result<&CommandSpec, UnknownCommand> {
        self.commands
            .get(id)
            .ok_or_else(|| UnknownCommand(id.to_owned()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::command::{Env, Handler};
    use crate::context::Context;

    fn values(args: &[Argument]) -> Vec<&str> {
        args.iter().map(Argument::value).collect()
    }

    #[test]
    fn builtins_registered() {
        let catalog = CommandCatalog::with_builtins();
        assert_eq!(catalog.ids(), ["print", "set"]);
        assert!(catalog.contains("set"));
        assert!(!catalog.contains("http"));
    }

    #[test]
    fn resolve_unknown_names_identifier() {
        let catalog = CommandCatalog::with_builtins();
        let err = catalog.resolve("http").unwrap_err();
        assert_eq!(err.to_string(), "unknown command `http`");
    }

    #[test]
    fn register_overwrites() {
        let mut catalog = CommandCatalog::with_builtins();
        let grammar = LineGrammar::new(r"^(.*)$").unwrap();
        let handler: Handler = Arc::new(|_: &[Argument], _: &mut Context, _: &mut Env<'_>| Ok(()));
        catalog.register(CommandSpec::new("set", grammar, CommandKind::Custom(handler)));
        let spec = catalog.resolve("set").unwrap();
        assert!(matches!(spec.instantiate(Vec::new()).kind(), CommandKind::Custom(_)));
        assert_eq!(catalog.ids().len(), 2);
    }

    #[test]
    fn unpadded_grammar_stops_at_missing_group() {
        let grammar = LineGrammar::new(r"^(\w+)(?:\s+(\w+))?$").unwrap();
        assert_eq!(values(&grammar.split("a b")), ["a", "b"]);
        assert_eq!(values(&grammar.split("a")), ["a"]);
        assert!(grammar.split("a b c").is_empty());
    }

    #[test]
    fn padded_grammar_fills_missing_group() {
        let grammar = LineGrammar::padded(r"^(\w+)(?:\s+(\w+))?$").unwrap();
        assert_eq!(values(&grammar.split("a")), ["a", ""]);
    }
}
