//! `set <name> <value>`: bind a context variable.
//!
//! The value is coerced with [`Argument::parse`].  When the value comes from
//! a `yaml`/`yml`/`json` block it is interpolated first, then decoded.  A
//! decoded mapping is merged key by key into the context itself; any other
//! document is bound to `name`.

use tracing::debug;

use super::argument::Argument;
use super::catalog::{CommandSpec, LineGrammar};
use super::{check_arity, CommandError, CommandKind, Env};
use crate::context::Context;
use crate::value::Value;

pub const ID: &str = "set";

/// Variable name, then everything else on the line.
const GRAMMAR: &str = r"(?s)^\s*([_a-z][_a-z0-9.-]*)(?:\s+(.+?))?\s*$";

pub fn spec() -> CommandSpec {
    let grammar = LineGrammar::new(GRAMMAR).expect("set grammar is a valid regex");
    CommandSpec::new(ID, grammar, CommandKind::Set)
}

pub fn execute(args: &[Argument], ctx: &mut Context, env: &mut Env<'_>) -> Result<(), CommandError> {
    check_arity(ID, args, 2)?;
    let name = env.parse(ID, &args[0], ctx)?.to_string();
    let value = &args[1];

    if value.is_structured() {
        let text = env.interpolate(ID, value, ctx)?;
        match decode(value, &text)? {
            Value::Map(vars) => {
                debug!(target: "urobor::command", keys = vars.len(), "merging structured value");
                ctx.merge(vars);
            }
            other => {
                debug!(target: "urobor::command", name = %name, "set structured value");
                ctx.set(name, other);
            }
        }
    } else {
        let parsed = env.parse(ID, value, ctx)?;
        debug!(target: "urobor::command", name = %name, value = %parsed, "set");
        ctx.set(name, parsed);
    }
    Ok(())
}

fn decode(arg: &Argument, text: &str) -> Result<Value, CommandError> {
    // JSON is a subset of YAML 1.2, so one decoder serves every structured type.
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .map(Value::from)
        .map_err(|e| CommandError::Decode {
            content_type: arg
                .block_info()
                .map(|b| b.content_type.clone())
                .unwrap_or_default(),
            message: e.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
