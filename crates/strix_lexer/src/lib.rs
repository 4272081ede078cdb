//! strix_lexer: the token-stream producer for the strix front-end.
//!
//! One token of lookahead, O(1) save/rewind checkpoints, and explicit
//! rescan entry points for the places where tokenization depends on the
//! grammar (templates, regexes, generics).

mod scanner;
mod token;

pub use scanner::{LexError, LexResult, Lexer, LexerState};
pub use token::{classify_ident, Kw, Token, TokenFlags, TokenKind};
