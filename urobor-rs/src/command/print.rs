//! `print <value> [> <destination>]`: emit an interpolated value.

use tracing::info;

use super::argument::Argument;
use super::catalog::{CommandSpec, LineGrammar};
use super::{check_arity, CommandError, CommandKind, Env};
use crate::context::Context;

pub const ID: &str = "print";

/// Value up to an optional `>`, then the destination.
const GRAMMAR: &str = r"(?s)^\s*([^>]*?[^>\s])\s*(?:>\s*(.*?))?\s*$";

/// One value emitted by `print`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printed {
    pub text: String,
    /// Target file; `None` means standard output.
    pub destination: Option<String>,
}

pub fn spec() -> CommandSpec {
    let grammar = LineGrammar::padded(GRAMMAR).expect("print grammar is a valid regex");
    CommandSpec::new(ID, grammar, CommandKind::Print)
}

pub fn execute(args: &[Argument], ctx: &mut Context, env: &mut Env<'_>) -> Result<(), CommandError> {
    check_arity(ID, args, 2)?;
    let text = env.interpolate(ID, &args[0], ctx)?;
    let destination = env.interpolate(ID, &args[1], ctx)?;
    let destination = (!destination.is_empty()).then_some(destination);

    info!(target: "urobor::command", destination = ?destination, "{text}");
    env.output.push(Printed { text, destination });
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
