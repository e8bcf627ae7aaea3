//! Token stream consumed by the compiler.

/// Token type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    BlockquoteOpen,
    BlockquoteClose,
    /// Fenced code block; `info` holds the info string, `content` the code.
    Fence,
    /// Container of inline [`TokenKind::Text`] children.
    Inline,
    Text,
    Other,
}

/// One token.  Fields that do not apply to a kind are left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Heading depth for heading tokens, 0 otherwise.
    pub level: u8,
    pub info: String,
    pub content: String,
    pub children: Vec<Token>,
    /// 1-based source line the token starts on.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            level: 0,
            info: String::new(),
            content: String::new(),
            children: Vec::new(),
            line,
        }
    }

    pub fn heading_open(level: u8, line: usize) -> Self {
        Self { level, ..Self::new(TokenKind::HeadingOpen, line) }
    }

    pub fn heading_close(level: u8, line: usize) -> Self {
        Self { level, ..Self::new(TokenKind::HeadingClose, line) }
    }

    pub fn text(content: impl Into<String>, line: usize) -> Self {
        Self { content: content.into(), ..Self::new(TokenKind::Text, line) }
    }

    pub fn inline(children: Vec<Token>, line: usize) -> Self {
        Self { children, ..Self::new(TokenKind::Inline, line) }
    }

    pub fn fence(info: impl Into<String>, content: impl Into<String>, line: usize) -> Self {
        Self {
            info: info.into(),
            content: content.into(),
            ..Self::new(TokenKind::Fence, line)
        }
    }
}

/// Concatenate the literal content of `tokens`, descending into children.
pub fn concat_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    push_text(&mut out, tokens);
    out
}

fn push_text(out: &mut String, tokens: &[Token]) {
    for token in tokens {
        if token.children.is_empty() {
            out.push_str(&token.content);
        } else {
            push_text(out, &token.children);
        }
    }
}
