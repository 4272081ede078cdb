//! Lexer integration tests.

use strix_lexer::{Kw, Lexer, TokenFlags, TokenKind};

/// Helper: collect token kinds until end of source.
fn kinds(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        lexer.next_token().expect("scan failed");
        let kind = lexer.token().kind;
        if kind == TokenKind::Eos {
            break;
        }
        out.push(kind);
    }
    out
}

#[test]
fn punctuation_maximal_munch() {
    assert_eq!(
        kinds("a >>>= b ** c ??= d"),
        vec![
            TokenKind::Ident,
            TokenKind::GtGtGtEq,
            TokenKind::Ident,
            TokenKind::StarStar,
            TokenKind::Ident,
            TokenKind::QuestionQuestionEq,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn optional_chain_vs_ternary_with_number() {
    // `?.3` is a conditional with the decimal `.3`, not optional chaining.
    assert_eq!(
        kinds("a?.b"),
        vec![TokenKind::Ident, TokenKind::QuestionDot, TokenKind::Ident]
    );
    assert_eq!(
        kinds("a ? .3 : b"),
        vec![
            TokenKind::Ident,
            TokenKind::Question,
            TokenKind::Number,
            TokenKind::Colon,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn reserved_words_and_contextual_keywords() {
    let mut lexer = Lexer::new("class let of");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Class);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Ident);
    assert_eq!(lexer.token().kw, Some(Kw::Let));
    lexer.next_token().unwrap();
    assert!(lexer.token().is_kw(Kw::Of));
}

#[test]
fn preceding_line_break_flag() {
    let mut lexer = Lexer::new("a\nb c");
    lexer.next_token().unwrap();
    assert!(!lexer.token().has_preceding_line_break());
    lexer.next_token().unwrap();
    assert!(lexer.token().has_preceding_line_break());
    lexer.next_token().unwrap();
    assert!(!lexer.token().has_preceding_line_break());
}

#[test]
fn line_break_inside_block_comment_counts() {
    let mut lexer = Lexer::new("a /* x\ny */ b");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Ident);
    assert!(lexer.token().has_preceding_line_break());
}

#[test]
fn numeric_literals() {
    let mut lexer = Lexer::new("0xFF 1_000 6.02e23 10n");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().num, 255.0);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().num, 1000.0);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().num, 6.02e23);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::BigInt);
    assert!(lexer.token().flags.contains(TokenFlags::NUMBER_BIGINT));
}

#[test]
fn invalid_numeric_separator_rejected() {
    let mut lexer = Lexer::new("1__0");
    assert!(lexer.next_token().is_err());
    let mut lexer = Lexer::new("1_");
    assert!(lexer.next_token().is_err());
}

#[test]
fn string_escapes_cooked() {
    let mut lexer = Lexer::new(r#"'a\nb\u{1F600}'"#);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::String);
    assert_eq!(lexer.token().value, "a\nb\u{1F600}");
    assert!(lexer.token().flags.contains(TokenFlags::HAS_ESCAPE));
}

#[test]
fn unterminated_string_is_error() {
    let mut lexer = Lexer::new("'abc\n'");
    let err = lexer.next_token().unwrap_err();
    assert_eq!(err.pos, 0);
}

#[test]
fn template_head_middle_tail() {
    let mut lexer = Lexer::new("`a${x}b${y}c`");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::TemplateHead);
    assert_eq!(lexer.token().value, "a");
    lexer.next_token().unwrap(); // x
    lexer.next_token().unwrap(); // }
    assert_eq!(lexer.token().kind, TokenKind::CloseBrace);
    lexer.rescan_template_continuation().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::TemplateMiddle);
    assert_eq!(lexer.token().value, "b");
    lexer.next_token().unwrap(); // y
    lexer.next_token().unwrap(); // }
    lexer.rescan_template_continuation().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::TemplateTail);
    assert_eq!(lexer.token().value, "c");
}

#[test]
fn no_substitution_template() {
    let mut lexer = Lexer::new("`plain`");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::NoSubstitutionTemplate);
    assert_eq!(lexer.token().value, "plain");
}

#[test]
fn regex_rescan() {
    let mut lexer = Lexer::new("/a[/]b/gi");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Slash);
    lexer.rescan_regex().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Regex);
    assert_eq!(lexer.token().value, "/a[/]b/gi");
}

#[test]
fn save_rewind_roundtrip() {
    let mut lexer = Lexer::new("a < b");
    lexer.next_token().unwrap();
    let saved = lexer.save();
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Ident);
    lexer.rewind(saved);
    assert_eq!(lexer.token().kind, TokenKind::Ident);
    assert_eq!(lexer.token().value, "a");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Lt);
}

#[test]
fn split_left_shift_yields_two_less_thans() {
    let mut lexer = Lexer::new("a<<T>");
    lexer.next_token().unwrap(); // a
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::LtLt);
    let saved = lexer.save();
    lexer.split_left_shift();
    assert_eq!(lexer.token().kind, TokenKind::Lt);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Lt);
    lexer.rewind(saved);
    assert_eq!(lexer.token().kind, TokenKind::LtLt);
}

#[test]
fn split_greater_than_in_nested_generics() {
    let mut lexer = Lexer::new(">>");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::GtGt);
    lexer.split_greater_than();
    assert_eq!(lexer.token().kind, TokenKind::Gt);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::Gt);
}

#[test]
fn shebang_skipped() {
    let mut lexer = Lexer::new("#!/usr/bin/env node\nlet x");
    lexer.skip_shebang();
    lexer.next_token().unwrap();
    assert!(lexer.token().is_kw(Kw::Let));
}

#[test]
fn private_identifier() {
    let mut lexer = Lexer::new("#field");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token().kind, TokenKind::PrivateIdent);
    assert_eq!(lexer.token().value, "field");
}

#[test]
fn lookahead_char_after_token() {
    let mut lexer = Lexer::new("static (");
    lexer.next_token().unwrap();
    assert_eq!(lexer.lookahead_char(), Some(' '));
}
