//! `.uroborrc` configuration file parser.
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | seed a context variable |
//! | `/markers <open> <close>` | placeholder markers (default `{{` `}}`) |
//! | `/loglevel <level>` | default log level when neither `-d`, `-q` nor `RUST_LOG` is given |
//! | Lines starting with `;` | comment, ignored |
//!
//! `/set` values are typed like command arguments (booleans, numbers) but are
//! never interpolated.

use std::path::Path;

use crate::command::Argument;
use crate::context::Context;
use crate::interpolation::{InterpolationError, Interpolator, Registry};
use crate::value::Value;

/// Levels accepted by `/loglevel`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Parsed configuration: initial variables, markers and log level.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub vars: Context,
    /// `(open, close)` placeholder markers, if overridden.
    pub markers: Option<(String, String)>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config string.
    ///
    /// Every line is processed; malformed or unknown directives are reported
    /// in the returned list and otherwise skipped.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some(rest) = line.strip_prefix('/') else {
                errors.push(ConfigError {
                    line: lineno,
                    message: format!("expected a /directive, found `{line}`"),
                });
                continue;
            };

            let (cmd, args_str) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));
            let tokens = split_args(args_str.trim());

            let result = match cmd {
                "set" => parse_set(&tokens, &mut config.vars),
                "markers" => parse_markers(&tokens).map(|m| config.markers = Some(m)),
                "loglevel" => parse_loglevel(&tokens).map(|l| config.log_level = Some(l)),
                other => Err(format!("unknown directive `/{other}`")),
            };
            if let Err(message) = result {
                errors.push(ConfigError { line: lineno, message });
            }
        }

        (config, errors)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Set `name` from a raw `value`, typed like `/set`.
    pub fn define(&mut self, name: &str, value: &str) {
        self.vars.set(name, coerce(value));
    }

    /// An interpolator using the configured markers and `registry`.
    pub fn interpolator(&self, registry: Registry) -> Result<Interpolator, InterpolationError> {
        match &self.markers {
            Some((open, close)) => Interpolator::with_markers(open, close, registry),
            None => Ok(Interpolator::new(registry)),
        }
    }
}

fn coerce(raw: &str) -> Value {
    Argument::new(raw)
        .literal()
        .unwrap_or_else(|| Value::Str(raw.to_owned()))
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited tokens, honouring double-quoted strings
/// and `\"` escapes within them.
pub fn split_args(s: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    cur.push(escaped);
                }
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !cur.is_empty() {
                    args.push(std::mem::take(&mut cur));
                }
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() {
        args.push(cur);
    }
    args
}

// ── Directives ────────────────────────────────────────────────────────────────

/// `/set <name>=<value>` or `/set <name> <value>`.
fn parse_set(tokens: &[String], vars: &mut Context) -> Result<(), String> {
    if tokens.is_empty() {
        return Err("/set: requires an argument".into());
    }

    let (name, value) = if let Some((name, first)) = tokens[0].split_once('=') {
        let rest = tokens[1..].iter().map(String::as_str);
        let value: Vec<&str> = std::iter::once(first).chain(rest).collect();
        (name.to_owned(), value.join(" "))
    } else if tokens.len() >= 2 {
        (tokens[0].clone(), tokens[1..].join(" "))
    } else {
        return Err(format!("/set: missing value for '{}'", tokens[0]));
    };

    if name.is_empty() {
        return Err("/set: variable name cannot be empty".into());
    }

    vars.set(name, coerce(&value));
    Ok(())
}

fn parse_markers(tokens: &[String]) -> Result<(String, String), String> {
    match tokens {
        [open, close] => {
            Interpolator::with_markers(open, close, Registry::new()).map_err(|e| format!("/markers: {e}"))?;
            Ok((open.clone(), close.clone()))
        }
        _ => Err(format!("/markers: expected 2 arguments, got {}", tokens.len())),
    }
}

fn parse_loglevel(tokens: &[String]) -> Result<String, String> {
    match tokens {
        [level] => {
            let level = level.to_ascii_lowercase();
            if LOG_LEVELS.contains(&level.as_str()) {
                Ok(level)
            } else {
                Err(format!("/loglevel: unknown level `{level}`"))
            }
        }
        _ => Err(format!("/loglevel: expected 1 argument, got {}", tokens.len())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- split_args -----------------------------------------------------------

    #[test]
    fn split_simple() {
        assert_eq!(split_args("foo bar baz"), ["foo", "bar", "baz"]);
    }

    #[test]
    fn split_quoted_spaces() {
        assert_eq!(split_args(r#""hello world" 42"#), ["hello world", "42"]);
    }

    #[test]
    fn split_escaped_quote_inside_quotes() {
        assert_eq!(split_args(r#""say \"hi\"""#), [r#"say "hi""#]);
    }

    // -- /set -----------------------------------------------------------------

    #[test]
    fn set_equals_syntax() {
        let (cfg, errs) = Config::load_str("/set retries=3");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.vars.get("retries"), Some(&Value::Int(3)));
    }

    #[test]
    fn set_space_syntax() {
        let (cfg, errs) = Config::load_str("/set verbose true");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.vars.get("verbose"), Some(&Value::Bool(true)));
    }

    #[test]
    fn set_value_with_spaces() {
        let (cfg, errs) = Config::load_str("/set greeting hello world");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.vars.get("greeting"), Some(&Value::Str("hello world".into())));
    }

    #[test]
    fn set_keeps_placeholders_verbatim() {
        let (cfg, errs) = Config::load_str("/set phone=0044123\n/set later={{ x }}");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.vars.get("phone"), Some(&Value::Str("0044123".into())));
        assert_eq!(cfg.vars.get("later"), Some(&Value::Str("{{ x }}".into())));
    }

    #[test]
    fn set_without_value_is_error() {
        let (_, errs) = Config::load_str("/set lonely");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].line, 1);
    }

    // -- /markers, /loglevel --------------------------------------------------

    #[test]
    fn markers_override() {
        let (cfg, errs) = Config::load_str("/markers <% %>");
        assert!(errs.is_empty(), "{errs:?}");
        let engine = cfg.interpolator(Registry::new()).unwrap();
        assert_eq!(engine.open_marker(), "<%");
        assert_eq!(engine.close_marker(), "%>");
    }

    #[test]
    fn invalid_markers_rejected() {
        let (cfg, errs) = Config::load_str("/markers %% %%\n/markers only");
        assert_eq!(errs.len(), 2);
        assert!(cfg.markers.is_none());
    }

    #[test]
    fn loglevel_is_validated() {
        let (cfg, errs) = Config::load_str("/loglevel DEBUG\n/loglevel chatty");
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].line, 2);
    }

    // -- Comments & errors ----------------------------------------------------

    #[test]
    fn comments_and_blank_lines_ignored() {
        let (cfg, errs) = Config::load_str(";; header\n\n; note\n/set real=yes\n\n");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.vars.len(), 1);
    }

    #[test]
    fn unknown_directive_reported_and_skipped() {
        let (cfg, errs) = Config::load_str("/def foo\n/set loaded=yes\nplain text");
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].to_string(), "line 1: unknown directive `/def`");
        assert_eq!(errs[1].line, 3);
        assert!(cfg.vars.contains("loaded"));
    }

    #[test]
    fn define_coerces() {
        let mut cfg = Config::new();
        cfg.define("n", "1.5");
        assert_eq!(cfg.vars.get("n"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn load_file_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "/set project=urobor\n/loglevel info").unwrap();
        let (cfg, errs) = Config::load_file(file.path()).unwrap();
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.vars.get("project"), Some(&Value::Str("urobor".into())));
        assert_eq!(cfg.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn load_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_file(&dir.path().join("nope")).is_err());
    }
}
