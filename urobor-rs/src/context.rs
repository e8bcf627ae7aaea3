//! Variable context for one branch of test execution.
//!
//! Every test case runs against its own [`Context`].  Children receive a deep
//! copy via [`Context::copy`], so a variable set in one subtree is never
//! visible in a sibling subtree.

use crate::value::{Map, Value};

/// Mapping from variable name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    vars: Map,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from an existing mapping.
    pub fn from_map(vars: Map) -> Self {
        Self { vars }
    }

    /// Set (or overwrite) a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Merge `vars` into the top level, key by key.  Last write wins.
    pub fn merge(&mut self, vars: Map) {
        self.vars.extend(vars);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Remove a variable.  Returns `true` if it existed.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Deep, independent clone used when branching into a child test case.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// The underlying mapping, as seen by the interpolation engine.
    pub fn vars(&self) -> &Map {
        &self.vars
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
