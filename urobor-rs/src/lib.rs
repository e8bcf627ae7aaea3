//! Markdown-driven test specifications.
//!
//! A document's headings form a tree of test cases; block quotes invoke
//! commands (`> set name value`, `> print {{ name }}`) on the enclosing case,
//! and fenced code blocks right after a quote become extra arguments.  Values
//! may reference variables through `{{ placeholder | filter }}` interpolation.
//!
//! ```
//! use urobor::context::Context;
//! use urobor::test_case::Status;
//!
//! let doc = "# Greeting\n\n> set name World\n\n> print Hello {{ name }}\n";
//! let (tree, output) = urobor::run_markdown(doc, "greeting.md", Context::new()).unwrap();
//! assert_eq!(tree[tree.root()].status(), Status::Passed);
//! assert_eq!(output[0].text, "Hello World");
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod document;
pub mod interpolation;
pub mod logging;
pub mod runtime;
pub mod test_case;
pub mod value;

use command::{CommandCatalog, Printed};
use context::Context;
use document::{CompileError, Compiler};
use runtime::Runner;
use test_case::TestTree;

/// Compile `text` with the built-in commands and run it against `ctx` using
/// the default interpolator.  Returns the executed tree and everything printed.
pub fn run_markdown(text: &str, source: &str, ctx: Context) -> Result<(TestTree, Vec<Printed>), CompileError> {
    let catalog = CommandCatalog::with_builtins();
    let mut tree = Compiler::new(&catalog).with_source(source).compile_markdown(text)?;
    let mut runner = Runner::default();
    runner.run(&mut tree, ctx);
    Ok((tree, runner.take_output()))
}
