//! The lexer: source text to tokens, one token of lookahead.
//!
//! The parser drives this with `next_token`, checkpoints with
//! `save`/`rewind` for speculative parses, and re-enters tokenization
//! rules with the rescan methods (template continuations, regexes, and
//! the `<<`/`>>` splits used by type-argument parsing).

use crate::token::{classify_ident, Token, TokenFlags, TokenKind};
use strix_core::text::{TextPos, TextRange};
use unicode_xid::UnicodeXID;

/// A lexical error: message plus the position it was detected at. The
/// parser converts this into the positioned front-end error.
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub pos: TextPos,
}

pub type LexResult<T> = Result<T, LexError>;

/// Saved cursor for speculative parsing. Cheap to take; rewinding is an
/// exact restore of a previously observed token position.
#[derive(Clone)]
pub struct LexerState {
    pos: usize,
    token: Token,
}

pub struct Lexer {
    text: Vec<char>,
    /// Cursor just past the current token.
    pos: usize,
    /// Current lookahead token.
    token: Token,
}

fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphabetic() || (ch as u32 > 0x7F && UnicodeXID::is_xid_start(ch))
}

fn is_id_part(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphanumeric() || (ch as u32 > 0x7F && UnicodeXID::is_xid_continue(ch))
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl Lexer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            pos: 0,
            token: Token::new(TokenKind::Eos, TextRange::empty(0)),
        }
    }

    /// Skip `#!...` on the very first line. Call before the first scan.
    pub fn skip_shebang(&mut self) {
        if self.pos == 0 && self.text.len() >= 2 && self.text[0] == '#' && self.text[1] == '!' {
            self.pos = 2;
            while let Some(&ch) = self.text.get(self.pos) {
                if is_line_break(ch) {
                    break;
                }
                self.pos += 1;
            }
        }
    }

    /// The current lookahead token. No side effect.
    #[inline]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The first raw character after the current token, used for
    /// one-character disambiguation.
    #[inline]
    pub fn lookahead_char(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    /// Checkpoint the cursor.
    pub fn save(&self) -> LexerState {
        LexerState { pos: self.pos, token: self.token.clone() }
    }

    /// Restore a checkpoint taken earlier on this lexer.
    pub fn rewind(&mut self, state: LexerState) {
        self.pos = state.pos;
        self.token = state.token;
    }

    /// Reinterpret the current `<<` (or `<<=`) token as a single `<`,
    /// leaving the cursor on the second character. Restored by `rewind`.
    pub fn split_left_shift(&mut self) {
        debug_assert!(matches!(self.token.kind, TokenKind::LtLt | TokenKind::LtLtEq));
        let start = self.token.range.pos;
        let flags = self.token.flags;
        self.token = Token::new(TokenKind::Lt, TextRange::new(start, start + 1));
        self.token.flags = flags;
        self.pos = start as usize + 1;
    }

    /// Reinterpret a compound `>`-leading token as a single `>`. Used
    /// when closing nested type-argument lists.
    pub fn split_greater_than(&mut self) {
        debug_assert!(matches!(
            self.token.kind,
            TokenKind::GtGt | TokenKind::GtGtGt | TokenKind::GtEq | TokenKind::GtGtEq | TokenKind::GtGtGtEq
        ));
        let start = self.token.range.pos;
        let flags = self.token.flags;
        self.token = Token::new(TokenKind::Gt, TextRange::new(start, start + 1));
        self.token.flags = flags;
        self.pos = start as usize + 1;
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let ch = self.text.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    #[inline]
    fn eat(&mut self, ch: char) -> bool {
        if self.peek(0) == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn err(&self, message: impl Into<String>, pos: usize) -> LexError {
        LexError { message: message.into(), pos: pos as TextPos }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }

    // ------------------------------------------------------------------
    // Main scan
    // ------------------------------------------------------------------

    /// Advance past the current token and scan the next one.
    pub fn next_token(&mut self) -> LexResult<()> {
        let mut flags = TokenFlags::NONE;
        loop {
            match self.peek(0) {
                Some(ch) if is_line_break(ch) => {
                    flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                Some(ch) if ch.is_whitespace() => {
                    self.pos += 1;
                }
                Some('/') if self.peek(1) == Some('/') => {
                    self.pos += 2;
                    while let Some(ch) = self.peek(0) {
                        if is_line_break(ch) {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some('/') if self.peek(1) == Some('*') => {
                    let comment_start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek(0) {
                            None => return Err(self.err("Unterminated multi-line comment", comment_start)),
                            Some('*') if self.peek(1) == Some('/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(ch) => {
                                if is_line_break(ch) {
                                    flags |= TokenFlags::PRECEDING_LINE_BREAK;
                                }
                                self.pos += 1;
                            }
                        }
                    }
                }
                _ => break,
            }
        }

        let start = self.pos;
        let ch = match self.bump() {
            None => {
                self.token = Token::new(TokenKind::Eos, TextRange::empty(start as TextPos));
                self.token.flags = flags;
                return Ok(());
            }
            Some(ch) => ch,
        };

        let kind = match ch {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,
            '~' => TokenKind::Tilde,
            '.' => {
                if self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    return self.finish_number(start, flags);
                }
                if self.peek(0) == Some('.') && self.peek(1) == Some('.') {
                    self.pos += 2;
                    TokenKind::DotDotDot
                } else {
                    TokenKind::Dot
                }
            }
            '?' => {
                if self.peek(0) == Some('.') && !self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                    TokenKind::QuestionDot
                } else if self.eat('?') {
                    if self.eat('=') {
                        TokenKind::QuestionQuestionEq
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else {
                    TokenKind::Question
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::LtLtEq
                    } else {
                        TokenKind::LtLt
                    }
                } else if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            TokenKind::GtGtGtEq
                        } else {
                            TokenKind::GtGtGt
                        }
                    } else if self.eat('=') {
                        TokenKind::GtGtEq
                    } else {
                        TokenKind::GtGt
                    }
                } else if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::NotEqEq
                    } else {
                        TokenKind::NotEq
                    }
                } else {
                    TokenKind::Not
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    if self.eat('=') {
                        TokenKind::StarStarEq
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '&' => {
                if self.eat('&') {
                    if self.eat('=') {
                        TokenKind::AmpAmpEq
                    } else {
                        TokenKind::AmpAmp
                    }
                } else if self.eat('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    if self.eat('=') {
                        TokenKind::BarBarEq
                    } else {
                        TokenKind::BarBar
                    }
                } else if self.eat('=') {
                    TokenKind::BarEq
                } else {
                    TokenKind::Bar
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            '\'' | '"' => return self.finish_string(start, ch, flags),
            '`' => return self.finish_template(start, flags),
            '#' => {
                if self.peek(0).is_some_and(is_id_start) {
                    while self.peek(0).is_some_and(is_id_part) {
                        self.pos += 1;
                    }
                    let mut token = Token::new(
                        TokenKind::PrivateIdent,
                        TextRange::new(start as TextPos, self.pos as TextPos),
                    );
                    token.value = self.slice(start + 1, self.pos);
                    token.flags = flags;
                    self.token = token;
                    return Ok(());
                }
                return Err(self.err("Invalid character", start));
            }
            _ if ch.is_ascii_digit() => return self.finish_number(start, flags),
            _ if is_id_start(ch) => {
                while self.peek(0).is_some_and(is_id_part) {
                    self.pos += 1;
                }
                let text = self.slice(start, self.pos);
                let (kind, kw) = classify_ident(&text);
                let mut token = Token::new(kind, TextRange::new(start as TextPos, self.pos as TextPos));
                token.kw = kw;
                token.value = text;
                token.flags = flags;
                self.token = token;
                return Ok(());
            }
            _ => return Err(self.err("Invalid character", start)),
        };

        let mut token = Token::new(kind, TextRange::new(start as TextPos, self.pos as TextPos));
        token.flags = flags;
        self.token = token;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    fn scan_digits(&mut self, radix: u32) -> LexResult<String> {
        let mut digits = String::new();
        let mut last_was_separator = false;
        let mut seen_digit = false;
        loop {
            match self.peek(0) {
                Some('_') => {
                    if !seen_digit || last_was_separator {
                        return Err(self.err("Invalid numeric separator", self.pos));
                    }
                    last_was_separator = true;
                    self.pos += 1;
                }
                Some(ch) if ch.is_digit(radix) => {
                    digits.push(ch);
                    seen_digit = true;
                    last_was_separator = false;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if last_was_separator {
            return Err(self.err("Invalid numeric separator", self.pos));
        }
        Ok(digits)
    }

    fn finish_number(&mut self, start: usize, flags: TokenFlags) -> LexResult<()> {
        let mut token_flags = flags;
        let first = self.text[start];

        let (digits, radix) = if first == '0'
            && matches!(self.peek(0), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            let radix = match self.bump().unwrap() {
                'x' | 'X' => 16,
                'o' | 'O' => 8,
                _ => 2,
            };
            token_flags |= TokenFlags::NUMBER_NON_DECIMAL;
            let digits = self.scan_digits(radix)?;
            if digits.is_empty() {
                return Err(self.err("Invalid numeric literal", start));
            }
            (digits, radix)
        } else {
            // Decimal. `start` may point at a digit or at `.` for `.5`.
            self.pos = start;
            let int_part = self.scan_digits(10)?;
            let mut repr = int_part;
            if self.peek(0) == Some('.') {
                self.pos += 1;
                repr.push('.');
                repr.push_str(&self.scan_digits(10)?);
            }
            if matches!(self.peek(0), Some('e' | 'E')) {
                let exp_pos = self.pos;
                self.pos += 1;
                let mut exp = String::from("e");
                if matches!(self.peek(0), Some('+' | '-')) {
                    exp.push(self.bump().unwrap());
                }
                let exp_digits = self.scan_digits(10)?;
                if exp_digits.is_empty() {
                    return Err(self.err("Invalid numeric literal", exp_pos));
                }
                exp.push_str(&exp_digits);
                repr.push_str(&exp);
            }
            (repr, 10)
        };

        let is_bigint = self.eat('n');
        if is_bigint && radix == 10 && (digits.contains('.') || digits.contains('e')) {
            return Err(self.err("Invalid bigint literal", start));
        }

        let kind = if is_bigint {
            token_flags |= TokenFlags::NUMBER_BIGINT;
            TokenKind::BigInt
        } else {
            TokenKind::Number
        };
        let num = if radix == 10 {
            digits.parse::<f64>().unwrap_or(0.0)
        } else {
            u128::from_str_radix(&digits, radix).map(|v| v as f64).unwrap_or(0.0)
        };

        if self.peek(0).is_some_and(|c| is_id_start(c) || c.is_ascii_digit()) {
            return Err(self.err("Identifier cannot follow a numeric literal", self.pos));
        }

        let mut token = Token::new(kind, TextRange::new(start as TextPos, self.pos as TextPos));
        token.flags = token_flags;
        token.value = digits;
        token.num = num;
        self.token = token;
        Ok(())
    }

    /// Cook one escape sequence after the backslash. Returns `None` for
    /// a line continuation.
    fn scan_escape(&mut self, literal_start: usize) -> LexResult<Option<char>> {
        let pos = self.pos;
        let ch = self
            .bump()
            .ok_or_else(|| self.err("Unterminated string literal", literal_start))?;
        let cooked = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' if !self.peek(0).is_some_and(|c| c.is_ascii_digit()) => '\0',
            'x' => {
                let mut code = 0u32;
                for _ in 0..2 {
                    let digit = self
                        .bump()
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| self.err("Invalid hexadecimal escape sequence", pos))?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).ok_or_else(|| self.err("Invalid hexadecimal escape sequence", pos))?
            }
            'u' => {
                let mut code = 0u32;
                if self.eat('{') {
                    let mut seen = false;
                    while let Some(ch) = self.peek(0) {
                        if ch == '}' {
                            break;
                        }
                        let digit = ch
                            .to_digit(16)
                            .ok_or_else(|| self.err("Invalid Unicode escape sequence", pos))?;
                        code = code * 16 + digit;
                        seen = true;
                        self.pos += 1;
                        if code > 0x10FFFF {
                            return Err(self.err("Invalid Unicode escape sequence", pos));
                        }
                    }
                    if !seen || !self.eat('}') {
                        return Err(self.err("Invalid Unicode escape sequence", pos));
                    }
                } else {
                    for _ in 0..4 {
                        let digit = self
                            .bump()
                            .and_then(|c| c.to_digit(16))
                            .ok_or_else(|| self.err("Invalid Unicode escape sequence", pos))?;
                        code = code * 16 + digit;
                    }
                }
                char::from_u32(code).ok_or_else(|| self.err("Invalid Unicode escape sequence", pos))?
            }
            ch if is_line_break(ch) => {
                if ch == '\r' {
                    self.eat('\n');
                }
                return Ok(None);
            }
            other => other,
        };
        Ok(Some(cooked))
    }

    fn finish_string(&mut self, start: usize, quote: char, flags: TokenFlags) -> LexResult<()> {
        let mut value = String::new();
        let mut token_flags = flags;
        loop {
            let ch = match self.peek(0) {
                None => return Err(self.err("Unterminated string literal", start)),
                Some(ch) if is_line_break(ch) => {
                    return Err(self.err("Unterminated string literal", start))
                }
                Some(ch) => ch,
            };
            self.pos += 1;
            if ch == quote {
                break;
            }
            if ch == '\\' {
                token_flags |= TokenFlags::HAS_ESCAPE;
                if let Some(cooked) = self.scan_escape(start)? {
                    value.push(cooked);
                }
            } else {
                value.push(ch);
            }
        }
        let mut token = Token::new(TokenKind::String, TextRange::new(start as TextPos, self.pos as TextPos));
        token.flags = token_flags;
        token.value = value;
        self.token = token;
        Ok(())
    }

    /// Scan a template span starting after a backtick (head) or after the
    /// `}` that closed a substitution (continuation).
    fn scan_template_span(&mut self, start: usize, is_head: bool, flags: TokenFlags) -> LexResult<()> {
        let mut value = String::new();
        let mut token_flags = flags;
        let kind = loop {
            let ch = match self.peek(0) {
                None => return Err(self.err("Unterminated template literal", start)),
                Some(ch) => ch,
            };
            if ch == '`' {
                self.pos += 1;
                break if is_head {
                    TokenKind::NoSubstitutionTemplate
                } else {
                    TokenKind::TemplateTail
                };
            }
            if ch == '$' && self.peek(1) == Some('{') {
                self.pos += 2;
                break if is_head { TokenKind::TemplateHead } else { TokenKind::TemplateMiddle };
            }
            self.pos += 1;
            if ch == '\\' {
                token_flags |= TokenFlags::HAS_ESCAPE;
                if let Some(cooked) = self.scan_escape(start)? {
                    value.push(cooked);
                }
            } else {
                if ch == '\r' {
                    // Normalized per the template semantics.
                    self.eat('\n');
                    value.push('\n');
                    continue;
                }
                value.push(ch);
            }
        };
        let mut token = Token::new(kind, TextRange::new(start as TextPos, self.pos as TextPos));
        token.flags = token_flags;
        token.value = value;
        self.token = token;
        Ok(())
    }

    fn finish_template(&mut self, start: usize, flags: TokenFlags) -> LexResult<()> {
        self.scan_template_span(start, true, flags)
    }

    /// After the parser consumed the `}` ending a template substitution,
    /// continue the enclosing template. The produced token's range
    /// includes the `}`.
    pub fn rescan_template_continuation(&mut self) -> LexResult<()> {
        debug_assert!(self.token.kind == TokenKind::CloseBrace);
        let start = self.token.range.pos as usize;
        self.pos = start + 1;
        self.scan_template_span(start, false, TokenFlags::NONE)
    }

    /// Reinterpret the current `/` or `/=` as the start of a regular
    /// expression literal.
    pub fn rescan_regex(&mut self) -> LexResult<()> {
        debug_assert!(matches!(self.token.kind, TokenKind::Slash | TokenKind::SlashEq));
        let start = self.token.range.pos as usize;
        self.pos = start + 1;
        let mut in_class = false;
        loop {
            let ch = match self.peek(0) {
                None => return Err(self.err("Unterminated regular expression", start)),
                Some(ch) if is_line_break(ch) => {
                    return Err(self.err("Unterminated regular expression", start))
                }
                Some(ch) => ch,
            };
            self.pos += 1;
            match ch {
                '\\' => {
                    // The next character is never a terminator.
                    if self.peek(0).is_some_and(|c| !is_line_break(c)) {
                        self.pos += 1;
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while self.peek(0).is_some_and(is_id_part) {
            self.pos += 1;
        }
        let mut token = Token::new(TokenKind::Regex, TextRange::new(start as TextPos, self.pos as TextPos));
        token.value = self.slice(start, self.pos);
        self.token = token;
        Ok(())
    }
}
