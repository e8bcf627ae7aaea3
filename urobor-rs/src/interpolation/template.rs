//! The placeholder engine.
//!
//! An [`Interpolator`] owns a marker pair, the grammar compiled for it and a
//! [`Registry`].  Substitution runs in three steps:
//!
//! 1. Escaped markers (`` `{{` `` / `` `}}` ``) are swapped for same-length
//!    sentinels, so byte offsets in the working copy still line up with the
//!    original template.
//! 2. Each `open … close` span is matched against the placeholder grammar and
//!    replaced by its resolved value.
//! 3. Sentinels in the literal text are restored to bare markers.
//!
//! The sentinel characters (`\u{1}`, `\u{2}`) are reserved: a template that
//! contains one is rejected with a located syntax error.

use std::borrow::Cow;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::{Captures, Regex};
use tracing::trace;

use crate::value::{Map, Value};
use super::error::InterpolationError;
use super::registry::Registry;

pub const DEFAULT_OPEN: &str = "{{";
pub const DEFAULT_CLOSE: &str = "}}";

// ── Grammar ───────────────────────────────────────────────────────────────────

const NAME: &str = r"[_a-z][_a-z0-9-]*";
const VARIABLE: &str = r"[_a-z][_a-z0-9.-]*";

/// Build the anchored grammar for the text between two markers:
/// identifier, filter chain, then anything left over (which must be empty).
fn body_pattern() -> String {
    let function = format!(r"{NAME}\s?\([^)]*\)\s*");
    let filter = format!(r"{NAME}(?:\s*[^|]*)?");
    format!(
        r"(?s)\A\s*(?P<name>{function}|{VARIABLE})\s*(?P<filters>(?:\|\s*(?:{filter})\s*)*)(?P<invalid>.*?)\s*\z"
    )
}

const SENTINEL_OPEN: char = '\u{1}';
const SENTINEL_CLOSE: char = '\u{2}';

fn is_sentinel(c: char) -> bool {
    c == SENTINEL_OPEN || c == SENTINEL_CLOSE
}

/// Compiled state for one marker configuration.
#[derive(Debug, Clone)]
struct Grammar {
    open: String,
    close: String,
    body: Regex,
    escapes: AhoCorasick,
    sentinels: AhoCorasick,
    escape_open: String,
    escape_close: String,
}

impl Grammar {
    fn new(open: &str, close: &str) -> Result<Self, InterpolationError> {
        if open.is_empty() || close.is_empty() {
            return Err(InterpolationError::InvalidMarkers("markers must not be empty".into()));
        }
        if open == close {
            return Err(InterpolationError::InvalidMarkers(format!(
                "open and close markers are both `{open}`"
            )));
        }
        if open.contains('`') || close.contains('`') {
            return Err(InterpolationError::InvalidMarkers(
                "markers must not contain backticks".into(),
            ));
        }
        let body = Regex::new(&body_pattern())
            .map_err(|e| InterpolationError::InvalidMarkers(e.to_string()))?;

        let literal_open = format!("`{open}`");
        let literal_close = format!("`{close}`");
        let escape_open = SENTINEL_OPEN.to_string().repeat(literal_open.len());
        let escape_close = SENTINEL_CLOSE.to_string().repeat(literal_close.len());
        let escapes = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .build([literal_open, literal_close]);
        let sentinels = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .build([escape_open.as_str(), escape_close.as_str()]);

        Ok(Self {
            open: open.to_owned(),
            close: close.to_owned(),
            body,
            escapes,
            sentinels,
            escape_open,
            escape_close,
        })
    }

    fn escape(&self, template: &str) -> String {
        self.escapes
            .replace_all(template, &[self.escape_open.as_str(), self.escape_close.as_str()])
    }

    fn unescape(&self, text: &str) -> String {
        self.sentinels
            .replace_all(text, &[self.open.as_str(), self.close.as_str()])
    }
}

// ── Interpolator ──────────────────────────────────────────────────────────────

/// Placeholder engine bound to one marker pair and one registry.
#[derive(Debug, Clone)]
pub struct Interpolator {
    grammar: Grammar,
    registry: Registry,
}

impl Default for Interpolator {
    /// Default markers with the built-in filters and functions.
    fn default() -> Self {
        Self::new(Registry::with_builtins())
    }
}

impl Interpolator {
    /// Default markers (`{{` / `}}`) with the given registry.
    pub fn new(registry: Registry) -> Self {
        Self::with_markers(DEFAULT_OPEN, DEFAULT_CLOSE, registry)
            .expect("default placeholder markers are valid")
    }

    /// Custom markers.  Fails if the markers are empty, identical or contain
    /// backticks (which are reserved for escaping).
    pub fn with_markers(open: &str, close: &str, registry: Registry) -> Result<Self, InterpolationError> {
        Ok(Self {
            grammar: Grammar::new(open, close)?,
            registry,
        })
    }

    pub fn open_marker(&self) -> &str {
        &self.grammar.open
    }

    pub fn close_marker(&self) -> &str {
        &self.grammar.close
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Substitute every placeholder in `template` using `vars`.
    pub fn interpolate(&self, template: &str, vars: &Map) -> Result<String, InterpolationError> {
        if let Some((offset, c)) = template.char_indices().find(|&(_, c)| is_sentinel(c)) {
            let (line, column) = locate(template, offset);
            return Err(InterpolationError::Syntax {
                invalid: c.escape_unicode().to_string(),
                line,
                column,
            });
        }

        let open = self.grammar.open.as_str();
        let close = self.grammar.close.as_str();
        let work = self.grammar.escape(template);

        let mut out = String::with_capacity(work.len());
        let mut copied = 0;
        let mut cursor = 0;

        while let Some(rel) = work[cursor..].find(open) {
            let mut start = cursor + rel;
            let mut body_start = start + open.len();
            let Some(rel_end) = work[body_start..].find(close) else {
                break;
            };
            let end = body_start + rel_end;
            // `{{ {{ name }}`: the innermost opener owns the close marker.
            if let Some(inner) = work[body_start..end].rfind(open) {
                start = body_start + inner;
                body_start = start + open.len();
            }

            if let Some(caps) = self.grammar.body.captures(&work[body_start..end]) {
                let value = self.expand(&caps, template, body_start, vars)?;
                out.push_str(&self.grammar.unescape(&work[copied..start]));
                out.push_str(&value);
                copied = end + close.len();
            }
            cursor = end + close.len();
        }
        out.push_str(&self.grammar.unescape(&work[copied..]));
        Ok(out)
    }

    /// Resolve one matched placeholder.
    fn expand(
        &self,
        caps: &Captures<'_>,
        template: &str,
        body_start: usize,
        vars: &Map,
    ) -> Result<String, InterpolationError> {
        if let Some(invalid) = caps.name("invalid").filter(|m| !m.as_str().is_empty()) {
            let (line, column) = locate(template, body_start + invalid.start());
            return Err(InterpolationError::Syntax {
                invalid: invalid.as_str().to_owned(),
                line,
                column,
            });
        }

        let name = caps.name("name").map_or("", |m| m.as_str()).trim();
        let filters = caps.name("filters").map_or("", |m| m.as_str());
        trace!(placeholder = name, filters, "resolving placeholder");

        let mut value = self.resolve(name, vars)?.to_string();
        for item in filters.split('|').skip(1).map(str::trim) {
            value = self.apply_filter(item, &value)?;
        }
        Ok(value)
    }

    /// Identifier resolution:
    ///
    /// 1. dotted path → nested lookup (`""` when any segment is missing)
    /// 2. top-level key
    /// 3. `name(args)` → registered function
    /// 4. anything else → `""`
    fn resolve<'v>(&self, name: &str, vars: &'v Map) -> Result<Cow<'v, Value>, InterpolationError> {
        if name.contains('.') {
            let mut segments = name.split('.');
            let found = segments
                .next()
                .and_then(|first| vars.get(first))
                .and_then(|root| root.lookup(segments));
            return Ok(found.map_or(Cow::Owned(Value::Null), Cow::Borrowed));
        }

        if let Some(value) = vars.get(name) {
            return Ok(Cow::Borrowed(value));
        }

        if name.ends_with(')') {
            return self.call(name).map(|s| Cow::Owned(Value::Str(s)));
        }

        Ok(Cow::Owned(Value::Null))
    }

    fn call(&self, call: &str) -> Result<String, InterpolationError> {
        let paren = call.find('(').unwrap_or(call.len());
        let func_name = call[..paren].trim();
        let extra = call
            .get(paren + 1..call.len() - 1)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let function = self
            .registry
            .function(func_name)
            .ok_or_else(|| InterpolationError::UnknownFunction(func_name.to_owned()))?;
        function(extra).map_err(|message| InterpolationError::Function {
            name: func_name.to_owned(),
            message,
        })
    }

    fn apply_filter(&self, item: &str, value: &str) -> Result<String, InterpolationError> {
        let (filter_name, extra) = match item.split_once(char::is_whitespace) {
            Some((name, extra)) => (name, Some(extra.trim()).filter(|s| !s.is_empty())),
            None => (item, None),
        };
        let filter = self
            .registry
            .filter(filter_name)
            .ok_or_else(|| InterpolationError::UnknownFilter(filter_name.to_owned()))?;
        filter(value, extra).map_err(|message| InterpolationError::Filter {
            name: filter_name.to_owned(),
            message,
        })
    }
}

/// 1-based line and column of byte `offset` in `text`, counted in characters.
fn locate(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in text.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
