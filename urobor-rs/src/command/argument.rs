//! Command arguments and their typed coercion.

use std::fmt;

use crate::context::Context;
use crate::interpolation::{InterpolationError, Interpolator};
use crate::value::Value;

/// Content types whose (interpolated) text decodes to structured data.
pub const STRUCTURED_CONTENT_TYPES: &[&str] = &["yaml", "yml", "json"];

/// Metadata of an argument sourced from a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    /// First word of the fence info string, e.g. `yaml`.
    pub content_type: String,
    /// Remainder of the info string.
    pub extra: String,
}

/// One raw argument of a command invocation.
///
/// The text is kept verbatim; coercion to a [`Value`] happens in
/// [`Argument::parse`] because it may need the current context.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    value: String,
    block: Option<BlockInfo>,
}

impl Argument {
    /// A line argument.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), block: None }
    }

    /// A block argument taken from a fenced code block.
    pub fn block(value: impl Into<String>, content_type: impl Into<String>, extra: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            block: Some(BlockInfo {
                content_type: content_type.into(),
                extra: extra.into(),
            }),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn block_info(&self) -> Option<&BlockInfo> {
        self.block.as_ref()
    }

    pub fn is_block(&self) -> bool {
        self.block.is_some()
    }

    /// Whether this is a block argument whose content decodes to a mapping
    /// or sequence rather than a single string.
    pub fn is_structured(&self) -> bool {
        self.block.as_ref().is_some_and(|b| {
            STRUCTURED_CONTENT_TYPES
                .iter()
                .any(|t| b.content_type.eq_ignore_ascii_case(t))
        })
    }

    /// Coerce to a typed value:
    ///
    /// 1. `true` / `false` → boolean
    /// 2. leading `0` not followed by `.` (e.g. `0044…`) → interpolated string
    /// 3. integer
    /// 4. float
    /// 5. interpolated string
    pub fn parse(&self, ctx: &Context, engine: &Interpolator) -> Result<Value, InterpolationError> {
        match self.literal() {
            Some(value) => Ok(value),
            None => self.interpolate(ctx, engine).map(Value::Str),
        }
    }

    /// Steps 1 to 4 of [`Argument::parse`]: the boolean or number the text
    /// spells, if any.
    pub fn literal(&self) -> Option<Value> {
        match self.value.as_str() {
            "true" => return Some(Value::Bool(true)),
            "false" => return Some(Value::Bool(false)),
            _ => {}
        }

        let bytes = self.value.as_bytes();
        if bytes.len() > 1 && bytes[0] == b'0' && bytes[1] != b'.' {
            return None;
        }
        if let Ok(n) = self.value.parse::<i64>() {
            return Some(Value::Int(n));
        }
        self.value.parse::<f64>().ok().map(Value::Float)
    }

    /// Interpolate the raw text against the context, skipping coercion.
    pub fn interpolate(&self, ctx: &Context, engine: &Interpolator) -> Result<String, InterpolationError> {
        engine.interpolate(&self.value, ctx.vars())
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.block {
            Some(block) => write!(f, "code@{}", block.content_type),
            None => write!(f, "{}", self.value),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::Registry;

    fn parse(raw: &str, ctx: &Context) -> Value {
        Argument::new(raw)
            .parse(ctx, &Interpolator::new(Registry::new()))
            .expect("parse failed")
    }

    #[test]
    fn booleans() {
        let ctx = Context::new();
        assert_eq!(parse("true", &ctx), Value::Bool(true));
        assert_eq!(parse("false", &ctx), Value::Bool(false));
        assert_eq!(parse("True", &ctx), Value::Str("True".into()));
    }

    #[test]
    fn numbers() {
        let ctx = Context::new();
        assert_eq!(parse("10", &ctx), Value::Int(10));
        assert_eq!(parse("-3", &ctx), Value::Int(-3));
        assert_eq!(parse("0", &ctx), Value::Int(0));
        assert_eq!(parse("1.5", &ctx), Value::Float(1.5));
        assert_eq!(parse("0.25", &ctx), Value::Float(0.25));
    }

    #[test]
    fn leading_zero_stays_text() {
        let ctx = Context::new();
        assert_eq!(parse("0044123456", &ctx), Value::Str("0044123456".into()));
        assert_eq!(parse("007", &ctx), Value::Str("007".into()));
    }

    #[test]
    fn literal_skips_interpolation() {
        assert_eq!(Argument::new("2.5").literal(), Some(Value::Float(2.5)));
        assert_eq!(Argument::new("{{ x }}").literal(), None);
        assert_eq!(Argument::new("0123").literal(), None);
    }

    #[test]
    fn falls_back_to_interpolation() {
        let ctx: Context = [("other", "value")].into_iter().collect();
        assert_eq!(parse("{{ other }}", &ctx), Value::Str("value".into()));
        assert_eq!(parse("plain text", &ctx), Value::Str("plain text".into()));
    }

    #[test]
    fn interpolation_errors_propagate() {
        let err = Argument::new("{{ a b }}")
            .parse(&Context::new(), &Interpolator::new(Registry::new()))
            .unwrap_err();
        assert!(matches!(err, InterpolationError::Syntax { .. }));
    }

    #[test]
    fn structured_blocks() {
        assert!(Argument::block("a: 1", "yaml", "").is_structured());
        assert!(Argument::block("{}", "JSON", "").is_structured());
        assert!(!Argument::block("text", "text", "").is_structured());
        assert!(!Argument::new("a: 1").is_structured());
    }

    #[test]
    fn display() {
        assert_eq!(Argument::new("name").to_string(), "name");
        assert_eq!(Argument::block("a: 1", "yaml", "title").to_string(), "code@yaml");
    }
}
