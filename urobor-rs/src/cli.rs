//! Command-line argument parsing.
//!
//! Usage:
//!   urobor [-dq] [-f[<file>]] [-D<name>=<value>]... <document.md>...

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

pub const USAGE: &str = "Usage: urobor [-dq] [-f[<file>]] [-D<name>=<value>]... <document.md>...";

/// File name looked up in the home and working directories.
const RC_NAME: &str = ".uroborrc";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Errors only (`-q`).
    pub quiet: bool,
    /// Which config file to load.
    pub config: ConfigFile,
    /// `-D name=value` definitions, in command-line order.
    pub defines: Vec<(String, String)>,
    /// Documents to run.
    pub documents: Vec<PathBuf>,
}

/// How to choose the user config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// Search the standard locations (default).
    #[default]
    Search,
    /// `-f` with no file argument: skip user config.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            args.documents.extend(argv[i + 1..].iter().map(PathBuf::from));
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            args.documents.push(PathBuf::from(arg));
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'q' => args.quiet = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else {
                        args.config = ConfigFile::Skip;
                    }
                }

                // -D<name>=<value> or -D <name>=<value>
                'D' => {
                    let def = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-D requires a name=value argument".to_owned());
                    };
                    args.defines.push(parse_define(&def)?);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    if args.documents.is_empty() {
        return Err("no document given".to_owned());
    }
    Ok(args)
}

fn parse_define(def: &str) -> Result<(String, String), String> {
    match def.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("-D expects name=value, got `{def}`")),
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Candidate config paths, in search order: the platform config directory,
/// `~/.uroborrc`, `./.uroborrc`.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dirs) = ProjectDirs::from("", "", "urobor") {
        paths.push(dirs.config_dir().join("uroborrc"));
    }
    if let Some(base) = BaseDirs::new() {
        paths.push(base.home_dir().join(RC_NAME));
    }
    paths.push(PathBuf::from(".").join(RC_NAME));
    paths
}

/// Search for the user config file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_user_config() -> Option<PathBuf> {
    config_candidates().into_iter().find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn documents_required() {
        assert!(parse_argv(&argv(&[])).is_err());
        assert!(parse_argv(&argv(&["-d"])).is_err());
    }

    #[test]
    fn documents_positional() {
        let a = parse_argv(&argv(&["a.md", "b.md"])).unwrap();
        assert_eq!(a.documents, [PathBuf::from("a.md"), PathBuf::from("b.md")]);
        assert_eq!(a.config, ConfigFile::Search);
    }

    #[test]
    fn bool_flags() {
        let a = parse_argv(&argv(&["-d", "-q", "x.md"])).unwrap();
        assert!(a.debug);
        assert!(a.quiet);
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-dq", "x.md"])).unwrap();
        assert!(a.debug && a.quiet);
    }

    #[test]
    fn config_skip() {
        let a = parse_argv(&argv(&["-f", "x.md"])).unwrap();
        assert_eq!(a.config, ConfigFile::Skip);
        assert_eq!(a.documents, [PathBuf::from("x.md")]);
    }

    #[test]
    fn config_explicit_embedded() {
        let a = parse_argv(&argv(&["-fmy.rc", "x.md"])).unwrap();
        assert_eq!(a.config, ConfigFile::Explicit(PathBuf::from("my.rc")));
    }

    #[test]
    fn defines_embedded_and_separate() {
        let a = parse_argv(&argv(&["-Dname=World", "-D", "greeting=hi there", "x.md"])).unwrap();
        assert_eq!(
            a.defines,
            [
                ("name".to_owned(), "World".to_owned()),
                ("greeting".to_owned(), "hi there".to_owned())
            ]
        );
    }

    #[test]
    fn define_without_equals_is_error() {
        assert!(parse_argv(&argv(&["-Dname", "x.md"])).is_err());
        assert!(parse_argv(&argv(&["x.md", "-D"])).is_err());
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["--", "-odd.md"])).unwrap();
        assert_eq!(a.documents, [PathBuf::from("-odd.md")]);
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&argv(&["-z", "x.md"])).is_err());
    }

    #[test]
    fn candidates_end_with_working_directory() {
        let candidates = config_candidates();
        assert_eq!(candidates.last(), Some(&PathBuf::from("./.uroborrc")));
    }
}
