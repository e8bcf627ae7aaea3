use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{info, warn};

use urobor::cli::{self, ConfigFile};
use urobor::command::{CommandCatalog, Printed};
use urobor::config::Config;
use urobor::document::{CompileError, Compiler};
use urobor::interpolation::{InterpolationError, Registry};
use urobor::logging;
use urobor::runtime::Runner;
use urobor::test_case::Status;

const EXIT_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Anything that stops a document (or the whole run) from executing.
#[derive(Debug)]
enum RunError {
    Io { path: PathBuf, source: std::io::Error },
    Markers(InterpolationError),
    Compile(CompileError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            RunError::Markers(e) => write!(f, "config: {e}"),
            RunError::Compile(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<CompileError> for RunError {
    fn from(e: CompileError) -> Self {
        RunError::Compile(e)
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("urobor: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // ── Load user config ──────────────────────────────────────────────────────
    let path = match &args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path.clone()),
        ConfigFile::Search => cli::find_user_config(),
    };
    let (mut config, config_errors) = match &path {
        None => (Config::new(), Vec::new()),
        Some(path) => match Config::load_file(path) {
            Ok(loaded) => loaded,
            Err(source) => {
                eprintln!("urobor: {}", RunError::Io { path: path.clone(), source });
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    logging::init(logging::choose_level(args.debug, args.quiet, config.log_level.as_deref()));
    if let Some(path) = &path {
        info!("loaded config {}", path.display());
        for e in &config_errors {
            warn!("{}: {e}", path.display());
        }
    }

    for (name, value) in &args.defines {
        config.define(name, value);
    }

    let engine = match config.interpolator(Registry::with_builtins()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("urobor: {}", RunError::Markers(e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // ── Run documents ─────────────────────────────────────────────────────────
    let catalog = CommandCatalog::with_builtins();
    let mut runner = Runner::new(engine);
    let mut code = 0u8;

    for document in &args.documents {
        match run_document(document, &catalog, &mut runner, &config) {
            Ok(Status::Passed) => {}
            Ok(_) => code = code.max(EXIT_FAILED),
            Err(e) => {
                eprintln!("urobor: {e}");
                code = EXIT_ERROR;
            }
        }
    }

    ExitCode::from(code)
}

/// Compile and run one document, printing its outline.  Returns the root status.
fn run_document(
    path: &Path,
    catalog: &CommandCatalog,
    runner: &mut Runner,
    config: &Config,
) -> Result<Status, RunError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| RunError::Io { path: path.to_owned(), source })?;
    let source = path.display().to_string();
    let mut tree = Compiler::new(catalog).with_source(&source).compile_markdown(&text)?;

    let status = runner.run(&mut tree, config.vars.copy());
    emit(&runner.take_output());

    let (passed, failed, total) = tree.summary();
    println!("{source}: {status} ({passed} passed, {failed} failed, {total} total)");
    print!("{tree}");
    Ok(status)
}

/// Write `print` output to stdout or append it to its destination file.
fn emit(printed: &[Printed]) {
    for p in printed {
        match &p.destination {
            None => println!("{}", p.text),
            Some(dest) => {
                let written = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dest)
                    .and_then(|mut file| writeln!(file, "{}", p.text));
                if let Err(e) = written {
                    warn!("cannot write to {dest}: {e}");
                }
            }
        }
    }
}
