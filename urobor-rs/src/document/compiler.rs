//! Token stream → [`TestTree`].
//!
//! Headings become test cases nested by level; each block quote becomes a
//! command on the current test case, with any fenced code blocks that follow
//! it (up to the next quote or heading) appended as block arguments.

use std::fmt;

use tracing::{debug, trace};

use super::markdown;
use super::token::{concat_text, Token, TokenKind};
use crate::command::{Argument, CommandCatalog};
use crate::test_case::{TestCaseId, TestTree};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A quote names a command the catalog does not know.
    UnknownCommand {
        command: String,
        source: String,
        line: usize,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnknownCommand { command, source, line } => {
                write!(f, "unknown command `{command}`, in `{source}:{line}`")
            }
        }
    }
}

impl std::error::Error for CompileError {}

// ── Compiler ──────────────────────────────────────────────────────────────────

pub struct Compiler<'c> {
    catalog: &'c CommandCatalog,
    source: String,
}

impl<'c> Compiler<'c> {
    pub fn new(catalog: &'c CommandCatalog) -> Self {
        Self { catalog, source: "<input>".to_owned() }
    }

    /// Name reported in errors, usually the document path.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Tokenize and compile a markdown document.
    pub fn compile_markdown(&self, text: &str) -> Result<TestTree, CompileError> {
        self.compile(&markdown::tokenize(text))
    }

    pub fn compile(&self, tokens: &[Token]) -> Result<TestTree, CompileError> {
        let mut tree = TestTree::new();
        let mut current = tree.root();
        let mut cursor = Cursor { tokens, index: 0 };

        while let Some(token) = cursor.peek() {
            match token.kind {
                TokenKind::HeadingOpen => {
                    current = self.heading(&mut tree, current, &mut cursor);
                }
                TokenKind::BlockquoteOpen => {
                    let line = token.line;
                    let args = self.command(&mut tree, current, &mut cursor, line)?;
                    trace!(target: "urobor::compile", line, args, "command");
                }
                _ => cursor.advance(),
            }
        }
        debug!(target: "urobor::compile", source = %self.source, nodes = tree.len(), "compiled");
        Ok(tree)
    }

    /// Consume a heading and place its test case.  Returns the new current node.
    fn heading(&self, tree: &mut TestTree, current: TestCaseId, cursor: &mut Cursor<'_>) -> TestCaseId {
        let level = cursor.peek().map_or(0, |t| t.level);
        cursor.advance();
        let name = paragraphs(cursor.seek(&[TokenKind::HeadingClose]));
        let name = name.trim();

        let parent = placement(tree, current, level);
        debug!(target: "urobor::compile", level, name, "test case");
        tree.add_child(parent, name, level)
    }

    /// Consume a quote, attach its command to `current`.  Returns the argument count.
    fn command(
        &self,
        tree: &mut TestTree,
        current: TestCaseId,
        cursor: &mut Cursor<'_>,
        line: usize,
    ) -> Result<usize, CompileError> {
        cursor.advance();
        let text = paragraphs(cursor.seek(&[TokenKind::BlockquoteClose]));
        cursor.advance();

        let text = text.trim();
        let (id, rest) = text.split_once(' ').unwrap_or((text, ""));
        let spec = self
            .catalog
            .resolve(id)
            .map_err(|_| CompileError::UnknownCommand {
                command: id.to_owned(),
                source: self.source.clone(),
                line,
            })?;

        let mut args = spec.parse_line_arguments(rest);
        let ahead = cursor.ahead(&[TokenKind::BlockquoteOpen, TokenKind::HeadingOpen]);
        for fence in ahead.iter().filter(|t| t.kind == TokenKind::Fence) {
            let (content_type, extra) = fence.info.split_once(' ').unwrap_or((fence.info.as_str(), ""));
            args.push(Argument::block(fence.content.clone(), content_type, extra.trim()));
        }

        let count = args.len();
        tree.push_command(current, spec.instantiate(args));
        Ok(count)
    }
}

/// Text of each block joined by one space, so `> set a` / `>` / `> b`
/// reads as `set a b`.
fn paragraphs(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| concat_text(std::slice::from_ref(t)))
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parent for a new heading of `level`, given the current node.
fn placement(tree: &TestTree, current: TestCaseId, level: u8) -> TestCaseId {
    let mut node = current;
    while tree[node].level() >= level {
        match tree[node].parent() {
            Some(parent) => node = parent,
            None => break,
        }
    }
    node
}

// ── Cursor ────────────────────────────────────────────────────────────────────

struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    /// Step over one token; a no-op at the end of the stream.
    fn advance(&mut self) {
        self.index = (self.index + 1).min(self.tokens.len());
    }

    /// Advance up to (not past) the first token of one of `stop` kinds and
    /// return the tokens skipped.
    fn seek(&mut self, stop: &[TokenKind]) -> &'t [Token] {
        let start = self.index;
        self.index = self.find(stop);
        &self.tokens[start..self.index]
    }

    /// Tokens from the cursor up to the first of `stop` kinds, without moving.
    fn ahead(&self, stop: &[TokenKind]) -> &'t [Token] {
        &self.tokens[self.index..self.find(stop)]
    }

    fn find(&self, stop: &[TokenKind]) -> usize {
        self.tokens
            .get(self.index..)
            .unwrap_or_default()
            .iter()
            .position(|t| stop.contains(&t.kind))
            .map_or(self.tokens.len(), |offset| self.index + offset)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;

    fn compile(text: &str) -> TestTree {
        let catalog = CommandCatalog::with_builtins();
        Compiler::new(&catalog).compile_markdown(text).expect("compile failed")
    }

    fn names(tree: &TestTree, id: TestCaseId) -> Vec<&str> {
        tree[id].children().iter().map(|&c| tree[c].name()).collect()
    }

    #[test]
    fn siblings_under_one_parent() {
        let tree = compile("# Top\n\n## One\n\n## Two\n\n## Three\n");
        assert_eq!(names(&tree, tree.root()), ["Top"]);
        let top = tree.find(&["Top"]).unwrap();
        assert_eq!(names(&tree, top), ["One", "Two", "Three"]);
    }

    #[test]
    fn shallower_heading_walks_up() {
        let tree = compile("# A\n## A1\n### A1a\n## A2\n# B\n### B1\n");
        assert_eq!(names(&tree, tree.root()), ["A", "B"]);
        let a = tree.find(&["A"]).unwrap();
        assert_eq!(names(&tree, a), ["A1", "A2"]);
        let b = tree.find(&["B"]).unwrap();
        assert_eq!(names(&tree, b), ["B1"]);
        assert_eq!(tree[tree.find(&["B", "B1"]).unwrap()].level(), 3);
    }

    #[test]
    fn jump_back_past_skipped_level() {
        let tree = compile("## A\n#### deep\n### mid\n");
        let a = tree.find(&["A"]).unwrap();
        assert_eq!(names(&tree, a), ["deep", "mid"]);
    }

    #[test]
    fn commands_attach_to_current_case() {
        let tree = compile("> set top 1\n\n# Case\n\n> set name value\n\n> print {{ name }}\n");
        assert_eq!(tree[tree.root()].commands().len(), 1);

        let case = tree.find(&["Case"]).unwrap();
        let commands = tree[case].commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].id(), "set");
        assert!(matches!(commands[1].kind(), CommandKind::Print));
        let args: Vec<&str> = commands[1].arguments().iter().map(Argument::value).collect();
        assert_eq!(args, ["{{ name }}", ""]);
    }

    #[test]
    fn fences_become_block_arguments() {
        let doc = "# Case\n\n> set cfg\n\n```yaml settings\na: 1\n```\n\n> print x\n\n```text\nnot mine\n```\n";
        let tree = compile(doc);
        let case = tree.find(&["Case"]).unwrap();
        let set = &tree[case].commands()[0];
        assert_eq!(set.arguments().len(), 2);
        let block = &set.arguments()[1];
        assert_eq!(block.value(), "a: 1\n");
        let info = block.block_info().unwrap();
        assert_eq!(info.content_type, "yaml");
        assert_eq!(info.extra, "settings");

        let print = &tree[case].commands()[1];
        assert_eq!(print.arguments().len(), 3);
    }

    #[test]
    fn fence_after_heading_is_not_attached() {
        let tree = compile("# A\n\n> set cfg\n\n# B\n\n```yaml\na: 1\n```\n");
        let a = tree.find(&["A"]).unwrap();
        assert_eq!(tree[a].commands()[0].arguments().len(), 1);
    }

    #[test]
    fn unknown_command_reports_source_and_line() {
        let catalog = CommandCatalog::with_builtins();
        let err = Compiler::new(&catalog)
            .with_source("doc.md")
            .compile_markdown("# Case\n\n> http get /\n")
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownCommand { command: "http".into(), source: "doc.md".into(), line: 3 }
        );
        assert_eq!(err.to_string(), "unknown command `http`, in `doc.md:3`");
    }

    #[test]
    fn other_tokens_are_ignored() {
        let tree = compile("Some prose.\n\n- a list\n\n# Case\n\nMore prose.\n");
        assert_eq!(names(&tree, tree.root()), ["Case"]);
        assert!(tree[tree.find(&["Case"]).unwrap()].commands().is_empty());
    }

    #[test]
    fn unclosed_quote_at_end_of_stream() {
        let catalog = CommandCatalog::with_builtins();
        let tokens = [
            Token::new(TokenKind::BlockquoteOpen, 1),
            Token::inline(vec![Token::text("set a 1", 1)], 1),
        ];
        let tree = Compiler::new(&catalog).compile(&tokens).unwrap();
        let commands = tree[tree.root()].commands();
        assert_eq!(commands.len(), 1);
        let args: Vec<&str> = commands[0].arguments().iter().map(Argument::value).collect();
        assert_eq!(args, ["a", "1"]);

        let tree = Compiler::new(&catalog)
            .compile(&[Token::heading_open(1, 1), Token::text("Cut", 1)])
            .unwrap();
        assert_eq!(names(&tree, tree.root()), ["Cut"]);
    }

    #[test]
    fn quote_paragraphs_join_with_a_space() {
        let tree = compile("# Case\n\n> set a\n>\n> b\n");
        let case = tree.find(&["Case"]).unwrap();
        let args: Vec<&str> = tree[case].commands()[0].arguments().iter().map(Argument::value).collect();
        assert_eq!(args, ["a", "b"]);
    }
}
