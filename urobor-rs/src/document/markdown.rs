//! Markdown → [`Token`] stream, backed by pulldown-cmark.
//!
//! Only the structure the compiler cares about survives: headings, block
//! quotes, fenced code and the inline text inside them.  Soft and hard line
//! breaks become a single space.  Indented code blocks are [`TokenKind::Other`].

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use super::token::{Token, TokenKind};

/// Blocks whose end event closes something we emitted.
enum Open {
    Heading(u8),
    Blockquote,
    Fence,
    Code,
    /// Inline markup such as emphasis; text keeps flowing into the same run.
    Span,
    Other,
}

struct Tokenizer {
    line_starts: Vec<usize>,
    tokens: Vec<Token>,
    stack: Vec<Open>,
    inline: Vec<Token>,
    inline_line: usize,
    fence: Option<Token>,
}

/// Tokenize a whole markdown document.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(source);
    let parser = Parser::new_ext(source, Options::empty()).into_offset_iter();
    for (event, range) in parser {
        let line = tokenizer.line_of(range.start);
        tokenizer.event(event, line);
    }
    tokenizer.flush_inline();
    tokenizer.tokens
}

impl Tokenizer {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            tokens: Vec::new(),
            stack: Vec::new(),
            inline: Vec::new(),
            inline_line: 0,
            fence: None,
        }
    }

    /// 1-based line containing byte `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    fn event(&mut self, event: Event<'_>, line: usize) {
        match event {
            Event::Start(tag) => self.start(tag, line),
            Event::End(_) => self.end(line),
            Event::Text(text) | Event::Code(text) => {
                if let Some(fence) = self.fence.as_mut() {
                    fence.content.push_str(&text);
                } else if !matches!(self.stack.last(), Some(Open::Code)) {
                    self.push_inline(Token::text(text.to_string(), line));
                }
            }
            Event::SoftBreak | Event::HardBreak => self.push_inline(Token::text(" ", line)),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, line: usize) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_inline();
                let level = heading_depth(level);
                self.tokens.push(Token::heading_open(level, line));
                self.stack.push(Open::Heading(level));
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.tokens.push(Token::new(TokenKind::BlockquoteOpen, line));
                self.stack.push(Open::Blockquote);
            }
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                self.flush_inline();
                self.fence = Some(Token::fence(info.trim(), "", line));
                self.stack.push(Open::Fence);
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => {
                self.flush_inline();
                self.tokens.push(Token::new(TokenKind::Other, line));
                self.stack.push(Open::Code);
            }
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. } => {
                self.stack.push(Open::Span)
            }
            _ => self.stack.push(Open::Other),
        }
    }

    fn end(&mut self, line: usize) {
        match self.stack.pop() {
            Some(Open::Heading(level)) => {
                self.flush_inline();
                self.tokens.push(Token::heading_close(level, line));
            }
            Some(Open::Blockquote) => {
                self.flush_inline();
                self.tokens.push(Token::new(TokenKind::BlockquoteClose, line));
            }
            Some(Open::Fence) => {
                if let Some(fence) = self.fence.take() {
                    self.tokens.push(fence);
                }
            }
            Some(Open::Span) => {}
            Some(Open::Code) | Some(Open::Other) | None => self.flush_inline(),
        }
    }

    fn push_inline(&mut self, token: Token) {
        if self.inline.is_empty() {
            self.inline_line = token.line;
        }
        self.inline.push(token);
    }

    fn flush_inline(&mut self) {
        if self.inline.is_empty() {
            return;
        }
        let children = std::mem::take(&mut self.inline);
        self.tokens.push(Token::inline(children, self.inline_line));
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
