//! Markdown documents → test trees.
//!
//! | Module       | Role                                            |
//! |--------------|-------------------------------------------------|
//! | [`token`]    | token stream shared by tokenizer and compiler   |
//! | [`markdown`] | pulldown-cmark adapter producing that stream    |
//! | [`compiler`] | heading/quote/fence stream → [`TestTree`]       |
//!
//! [`TestTree`]: crate::test_case::TestTree

pub mod compiler;
pub mod markdown;
pub mod token;

pub use compiler::{CompileError, Compiler};
pub use token::{Token, TokenKind};
