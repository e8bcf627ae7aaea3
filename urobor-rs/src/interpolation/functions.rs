//! Built-in value-generating functions.
//!
//! | Function         | Result                                        |
//! |------------------|-----------------------------------------------|
//! | `iso-time()`     | Current UTC time, `HH:MM:SS`                  |
//! | `iso-date()`     | Current UTC date, `YYYY-MM-DD`                |
//! | `iso-datetime()` | Current UTC timestamp, `YYYY-MM-DDTHH:MM:SS`  |
//! | `uuid()`         | Random (v4) UUID                              |
//! | `object-id()`    | 24 hex chars: seconds timestamp + random tail |
//!
//! None of them take arguments.

use std::fmt::Write;

use chrono::Utc;
use uuid::Uuid;

use super::registry::Registry;

/// Install every built-in function into `registry`.
pub fn register_builtins(registry: &mut Registry) {
    let builtins: [(&str, fn() -> String); 5] = [
        ("iso-time", iso_time),
        ("iso-date", iso_date),
        ("iso-datetime", iso_datetime),
        ("uuid", uuid_v4),
        ("object-id", object_id),
    ];
    for (name, generate) in builtins {
        let _ = registry.register_function(name, move |extra| no_args(name, extra).map(|()| generate()));
    }
}

fn no_args(name: &str, extra: Option<&str>) -> Result<(), String> {
    match extra {
        Some(extra) => Err(format!("{name}() takes no arguments, got `{extra}`")),
        None => Ok(()),
    }
}

pub fn iso_time() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

pub fn iso_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn iso_datetime() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn uuid_v4() -> String {
    Uuid::new_v4().to_string()
}

/// A 12-byte identifier rendered as hex: 4 bytes of big-endian Unix seconds
/// followed by 8 random bytes.
pub fn object_id() -> String {
    let seconds = Utc::now().timestamp() as u32;
    let tail: [u8; 8] = rand::random();
    let mut out = String::with_capacity(24);
    for byte in seconds.to_be_bytes().iter().chain(tail.iter()) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
