//! Interpolation failures.

use std::fmt;

/// Error returned by a single interpolation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    /// A placeholder with trailing content the grammar does not accept.
    /// `line` and `column` are 1-based and point into the original template.
    Syntax {
        invalid: String,
        line: usize,
        column: usize,
    },
    UnknownFilter(String),
    UnknownFunction(String),
    /// A registered filter rejected its input.
    Filter { name: String, message: String },
    /// A registered function failed.
    Function { name: String, message: String },
    /// A filter or function name outside `[_a-z][_a-z0-9-]*`.
    InvalidName(String),
    InvalidMarkers(String),
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::Syntax { invalid, line, column } => write!(
                f,
                "invalid placeholder `{invalid}` on line {line}, at column {column}"
            ),
            InterpolationError::UnknownFilter(name) => write!(f, "filter `{name}` not found"),
            InterpolationError::UnknownFunction(name) => {
                write!(f, "call to unknown function `{name}`")
            }
            InterpolationError::Filter { name, message } => write!(f, "filter `{name}`: {message}"),
            InterpolationError::Function { name, message } => {
                write!(f, "function `{name}`: {message}")
            }
            InterpolationError::InvalidName(name) => {
                write!(f, "`{name}` is not a valid filter or function name")
            }
            InterpolationError::InvalidMarkers(msg) => write!(f, "invalid markers: {msg}"),
        }
    }
}

impl std::error::Error for InterpolationError {}
