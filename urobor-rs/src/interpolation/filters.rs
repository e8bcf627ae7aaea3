//! Built-in filters.
//!
//! | Filter          | Effect                                                  |
//! |-----------------|---------------------------------------------------------|
//! | `snake-case`    | `Project Name` → `project_name`                         |
//! | `hyphens`       | `Project Name` → `project-name`                         |
//! | `strip`         | Trim surrounding whitespace                             |
//! | `lower-case`    | Lowercase                                               |
//! | `upper-case`    | Uppercase                                               |
//! | `replace a > b` | Replace every `a` with `b`                              |

use super::registry::Registry;

/// Install every built-in filter into `registry`.
pub fn register_builtins(registry: &mut Registry) {
    let builtins: [(&str, fn(&str, Option<&str>) -> Result<String, String>); 6] = [
        ("snake-case", |s, _| Ok(snake_case(s))),
        ("hyphens", |s, _| Ok(hyphens(s))),
        ("strip", |s, _| Ok(s.trim().to_owned())),
        ("lower-case", |s, _| Ok(s.to_lowercase())),
        ("upper-case", |s, _| Ok(s.to_uppercase())),
        ("replace", replace),
    ];
    for (name, filter) in builtins {
        // Built-in names are always valid.
        let _ = registry.register_filter(name, filter);
    }
}

/// Convert to `snake_case`.
///
/// Every run of non-word characters (and `-`, `.`, whitespace) becomes a
/// single `_`, the first character is lowercased and each later ASCII
/// uppercase letter starts a new `_`-separated word.
pub fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if !(c.is_alphanumeric() || c == '_') {
            out.push('_');
        } else if i == 0 {
            out.extend(c.to_lowercase());
        } else if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    collapse_underscores(&out)
}

/// Convert to `hyphen-case` (snake case with `-` separators).
pub fn hyphens(s: &str) -> String {
    snake_case(s).replace('_', "-")
}

/// `replace from > to`
pub fn replace(s: &str, extra: Option<&str>) -> Result<String, String> {
    let extra = extra.unwrap_or_default();
    let params: Vec<&str> = extra.split('>').map(str::trim).collect();
    match params.as_slice() {
        [from, to, ..] => Ok(s.replace(from, to)),
        _ => Err(format!(
            "expects `from > to` format, `{extra}` passed instead"
        )),
    }
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_underscore = false;
    for c in s.chars() {
        if c == '_' {
            if !last_underscore {
                out.push(c);
            }
            last_underscore = true;
        } else {
            out.push(c);
            last_underscore = false;
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
