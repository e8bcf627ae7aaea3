//! Placeholder interpolation.
//!
//! Templates reference context variables through placeholders:
//!
//! | Form                          | Meaning                                          |
//! |-------------------------------|--------------------------------------------------|
//! | `{{ name }}`                  | Top-level variable `name`                        |
//! | `{{ a.b.c }}`                 | Nested lookup; any missing segment yields `""`   |
//! | `{{ uuid() }}`                | Call a registered function with no argument      |
//! | `{{ name(a, b) }}`            | Call with the raw argument text `a, b`           |
//! | `{{ name \| upper-case }}`    | Apply a registered filter                        |
//! | `{{ name \| replace a > e }}` | Filter with an inline argument                   |
//! | `` `{{` `` / `` `}}` ``       | Literal markers, never scanned for placeholders  |
//!
//! Missing variables are not errors.  Malformed placeholders are, and carry
//! the line and column of the offending text.
//!
//! # Quick start
//!
//! ```rust
//! use urobor::context::Context;
//! use urobor::interpolation::Interpolator;
//!
//! let engine = Interpolator::default();
//! let ctx: Context = [("project", "Tasty Flavour")].into_iter().collect();
//! let out = engine.interpolate("{{ project | snake-case }}", ctx.vars()).unwrap();
//! assert_eq!(out, "tasty_flavour");
//! ```

pub mod error;
pub mod filters;
pub mod functions;
pub mod registry;
pub mod template;

pub use error::InterpolationError;
pub use registry::{FilterFn, FunctionFn, Registry};
pub use template::Interpolator;
