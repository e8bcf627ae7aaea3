//! Commands invoked from quoted lines.
//!
//! A quote such as `> set greeting "Hello {{ name }}"` names a command and
//! passes it raw arguments.  The [`CommandCatalog`] maps the name to a
//! [`CommandSpec`], whose [`LineGrammar`] splits the rest of the line into
//! [`Argument`]s.  Fenced code blocks following the quote are appended as
//! block arguments.
//!
//! | Command                     | Effect                                        |
//! |-----------------------------|-----------------------------------------------|
//! | `set <name> <value>`        | `context[name] = value` (typed)               |
//! | `set <name>` + yaml block   | merge the decoded keys into the context       |
//! | `print <value> [> dest]`    | emit the interpolated value                   |
//!
//! Callers extend the catalog with [`CommandKind::Custom`] handlers.

pub mod argument;
pub mod catalog;
pub mod print;
pub mod set;

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::interpolation::{InterpolationError, Interpolator};
use crate::value::Value;

pub use argument::{Argument, BlockInfo};
pub use catalog::{CommandCatalog, CommandSpec, LineGrammar, UnknownCommand};
pub use print::Printed;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a command failed.  Failures mark the owning test case as failed; they
/// never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    Arity {
        command: String,
        expected: usize,
        actual: usize,
    },
    Interpolation {
        command: String,
        source: InterpolationError,
    },
    /// A structured block argument could not be decoded.
    Decode {
        content_type: String,
        message: String,
    },
    /// A custom command reported failure.
    Failed {
        command: String,
        message: String,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Arity { command, expected, actual } => write!(
                f,
                "invalid number of arguments passed to `{command}` command: expected {expected}, got {actual}"
            ),
            CommandError::Interpolation { command, source } => write!(f, "{command}: {source}"),
            CommandError::Decode { content_type, message } => {
                write!(f, "cannot decode `{content_type}` block: {message}")
            }
            CommandError::Failed { command, message } => write!(f, "{command}: {message}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Interpolation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fail with [`CommandError::Arity`] unless exactly `expected` arguments were given.
pub fn check_arity(command: &str, args: &[Argument], expected: usize) -> Result<(), CommandError> {
    if args.len() != expected {
        return Err(CommandError::Arity {
            command: command.to_owned(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

// ── Execution environment ─────────────────────────────────────────────────────

/// Collaborators a command may use besides the context it mutates.
pub struct Env<'a> {
    pub engine: &'a Interpolator,
    /// Lines emitted by `print`, in execution order.
    pub output: &'a mut Vec<Printed>,
}

impl Env<'_> {
    /// Interpolate `arg`, tagging failures with the command name.
    pub fn interpolate(&self, command: &str, arg: &Argument, ctx: &Context) -> Result<String, CommandError> {
        arg.interpolate(ctx, self.engine)
            .map_err(|source| CommandError::Interpolation { command: command.to_owned(), source })
    }

    /// Coerce `arg` to a typed value, tagging failures with the command name.
    pub fn parse(&self, command: &str, arg: &Argument, ctx: &Context) -> Result<Value, CommandError> {
        arg.parse(ctx, self.engine)
            .map_err(|source| CommandError::Interpolation { command: command.to_owned(), source })
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// Execution logic of a caller-registered command.
pub type Handler =
    Arc<dyn Fn(&[Argument], &mut Context, &mut Env<'_>) -> Result<(), CommandError> + Send + Sync>;

/// What a command does when executed.
#[derive(Clone)]
pub enum CommandKind {
    Set,
    Print,
    Custom(Handler),
}

impl fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Set => write!(f, "Set"),
            CommandKind::Print => write!(f, "Print"),
            CommandKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// A command instance attached to a test case.
#[derive(Debug, Clone)]
pub struct Command {
    id: String,
    kind: CommandKind,
    arguments: Vec<Argument>,
}

impl Command {
    pub fn new(id: impl Into<String>, kind: CommandKind, arguments: Vec<Argument>) -> Self {
        Self { id: id.into(), kind, arguments }
    }

    /// `set` with the given arguments.
    pub fn set(arguments: Vec<Argument>) -> Self {
        Self::new(set::ID, CommandKind::Set, arguments)
    }

    /// `print` with the given arguments.
    pub fn print(arguments: Vec<Argument>) -> Self {
        Self::new(print::ID, CommandKind::Print, arguments)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Run the command against `ctx`.
    pub fn execute(&self, ctx: &mut Context, env: &mut Env<'_>) -> Result<(), CommandError> {
        match &self.kind {
            CommandKind::Set => set::execute(&self.arguments, ctx, env),
            CommandKind::Print => print::execute(&self.arguments, ctx, env),
            CommandKind::Custom(handler) => handler(&self.arguments, ctx, env),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        for arg in &self.arguments {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Registry;

    #[test]
    fn arity_message_names_command_and_counts() {
        let err = check_arity("set", &[Argument::new("x")], 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of arguments passed to `set` command: expected 2, got 1"
        );
    }

    #[test]
    fn display_lists_arguments() {
        let cmd = Command::set(vec![Argument::new("cfg"), Argument::block("a: 1", "yaml", "")]);
        assert_eq!(cmd.to_string(), "set cfg code@yaml");
    }

    #[test]
    fn custom_handler_runs() {
        let handler: Handler = Arc::new(|args: &[Argument], ctx: &mut Context, _env: &mut Env<'_>| {
            ctx.set("seen", args.len() as i64);
            Ok(())
        });
        let cmd = Command::new("count", CommandKind::Custom(handler), vec![Argument::new("a")]);
        let engine = Interpolator::new(Registry::new());
        let mut output = Vec::new();
        let mut env = Env { engine: &engine, output: &mut output };
        let mut ctx = Context::new();
        cmd.execute(&mut ctx, &mut env).unwrap();
        assert_eq!(ctx.get("seen"), Some(&Value::Int(1)));
    }
}
