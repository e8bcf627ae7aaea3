//! Filter and function registries.
//!
//! A [`Registry`] is owned by one [`Interpolator`](super::Interpolator);
//! there is no process-wide table.  Names are case-insensitive and treat `_`
//! and `-` as the same character, so `snake_case`, `Snake-Case` and
//! `snake-case` all refer to one filter.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::InterpolationError;
use super::{filters, functions};

/// A filter: receives the stringified value and the optional inline argument.
pub type FilterFn = Arc<dyn Fn(&str, Option<&str>) -> Result<String, String> + Send + Sync>;

/// A function: receives the raw argument text between the parentheses, if any.
pub type FunctionFn = Arc<dyn Fn(Option<&str>) -> Result<String, String> + Send + Sync>;

/// Named filters and functions available to placeholders.
#[derive(Clone, Default)]
pub struct Registry {
    filters: HashMap<String, FilterFn>,
    functions: HashMap<String, FunctionFn>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut filters: Vec<_> = self.filters.keys().collect();
        let mut functions: Vec<_> = self.functions.keys().collect();
        filters.sort();
        functions.sort();
        f.debug_struct("Registry")
            .field("filters", &filters)
            .field("functions", &functions)
            .finish()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in filters and functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        filters::register_builtins(&mut registry);
        functions::register_builtins(&mut registry);
        registry
    }

    /// Register (or replace) a filter.
    pub fn register_filter<F>(&mut self, name: &str, filter: F) -> Result<(), InterpolationError>
    where
        F: Fn(&str, Option<&str>) -> Result<String, String> + Send + Sync + 'static,
    {
        let key = canonical_name(name)?;
        self.filters.insert(key, Arc::new(filter));
        Ok(())
    }

    /// Register (or replace) a function.
    pub fn register_function<F>(&mut self, name: &str, function: F) -> Result<(), InterpolationError>
    where
        F: Fn(Option<&str>) -> Result<String, String> + Send + Sync + 'static,
    {
        let key = canonical_name(name)?;
        self.functions.insert(key, Arc::new(function));
        Ok(())
    }

    /// Remove a filter.  Returns `true` if it existed.
    pub fn unregister_filter(&mut self, name: &str) -> bool {
        canonical_name(name).is_ok_and(|key| self.filters.remove(&key).is_some())
    }

    /// Remove a function.  Returns `true` if it existed.
    pub fn unregister_function(&mut self, name: &str) -> bool {
        canonical_name(name).is_ok_and(|key| self.functions.remove(&key).is_some())
    }

    pub fn filter(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(&canonical_name(name).ok()?)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionFn> {
        self.functions.get(&canonical_name(name).ok()?)
    }

    /// Drop every registration, returning to the clean state.
    pub fn clear(&mut self) {
        self.filters.clear();
        self.functions.clear();
    }

    /// Registered filter names in canonical form, sorted.
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered function names in canonical form, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ── Name handling ─────────────────────────────────────────────────────────────

fn is_name_start(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

/// Lowercase `name`, check it against `[_a-z][_a-z0-9-]*` and fold `_` to `-`.
pub fn canonical_name(name: &str) -> Result<String, InterpolationError> {
    let lower = name.trim().to_ascii_lowercase();
    let mut chars = lower.chars();
    let valid = chars.next().is_some_and(is_name_start) && chars.all(is_name_continue);
    if !valid {
        return Err(InterpolationError::InvalidName(name.to_owned()));
    }
    Ok(lower.replace('_', "-"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_name("snake-case").unwrap(), "snake-case");
        assert_eq!(canonical_name("Snake_Case").unwrap(), "snake-case");
        assert_eq!(canonical_name("_private").unwrap(), "-private");
        assert!(canonical_name("").is_err());
        assert!(canonical_name("9lives").is_err());
        assert!(canonical_name("has space").is_err());
    }

    #[test]
    fn register_and_lookup_is_separator_insensitive() {
        let mut registry = Registry::new();
        registry
            .register_filter("upper_case", |s, _| Ok(s.to_uppercase()))
            .unwrap();
        let filter = registry.filter("upper-case").expect("registered");
        assert_eq!(filter("abc", None).unwrap(), "ABC");
    }

    #[test]
    fn invalid_name_is_rejected() {
        let mut registry = Registry::new();
        let err = registry.register_function("bad name", |_| Ok(String::new()));
        assert_eq!(err, Err(InterpolationError::InvalidName("bad name".into())));
    }

    #[test]
    fn unregister_reports_presence() {
        let mut registry = Registry::new();
        registry.register_function("name", |_| Ok("Bob".into())).unwrap();
        assert!(registry.unregister_function("name"));
        assert!(!registry.unregister_function("name"));
        assert!(registry.function("name").is_none());
    }

    #[test]
    fn clear_restores_clean_state() {
        let mut registry = Registry::with_builtins();
        assert!(!registry.filter_names().is_empty());
        assert!(!registry.function_names().is_empty());
        registry.clear();
        assert!(registry.filter_names().is_empty());
        assert!(registry.function_names().is_empty());
    }

    #[test]
    fn builtins_present() {
        let registry = Registry::with_builtins();
        for name in ["snake-case", "hyphens", "strip", "lower-case", "upper-case", "replace"] {
            assert!(registry.filter(name).is_some(), "missing filter {name}");
        }
        for name in ["iso-time", "iso-date", "iso-datetime", "uuid", "object-id"] {
            assert!(registry.function(name).is_some(), "missing function {name}");
        }
    }
}
