//! Token kinds and the token value type produced by the lexer.

use strix_core::text::TextRange;

bitflags::bitflags! {
    /// Per-token flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        const NONE                 = 0;
        /// A line terminator occurred between this token and the previous one.
        const PRECEDING_LINE_BREAK = 1 << 0;
        /// The token text contains at least one escape sequence.
        const HAS_ESCAPE           = 1 << 1;
        /// Numeric literal with a bigint `n` suffix.
        const NUMBER_BIGINT        = 1 << 2;
        /// Numeric literal written in a non-decimal base.
        const NUMBER_NON_DECIMAL   = 1 << 3;
    }
}

/// Structural token kind. Reserved words get their own kind; identifier-like
/// keywords lex as `Ident` with a [`Kw`] sub-kind on the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Sentinels
    Eos,

    // Identifiers and literals
    Ident,
    PrivateIdent,
    Number,
    BigInt,
    String,
    Regex,
    NoSubstitutionTemplate,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Dot,
    DotDotDot,
    Semicolon,
    Comma,
    Colon,
    At,
    Arrow,
    Question,
    QuestionDot,
    QuestionQuestion,
    QuestionQuestionEq,

    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    LtLt,
    GtGt,
    GtGtGt,

    Amp,
    Bar,
    Caret,
    Not,
    Tilde,
    AmpAmp,
    BarBar,
    AmpAmpEq,
    BarBarEq,

    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    StarStarEq,
    SlashEq,
    PercentEq,
    LtLtEq,
    GtGtEq,
    GtGtGtEq,
    AmpEq,
    BarEq,
    CaretEq,

    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    InstanceOf,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,
}

impl TokenKind {
    /// Whether this kind is a reserved word.
    pub fn is_reserved_word(self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Class
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Debugger
                | TokenKind::Default
                | TokenKind::Delete
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::Enum
                | TokenKind::Export
                | TokenKind::Extends
                | TokenKind::False
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::Import
                | TokenKind::In
                | TokenKind::InstanceOf
                | TokenKind::New
                | TokenKind::Null
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::Switch
                | TokenKind::This
                | TokenKind::Throw
                | TokenKind::True
                | TokenKind::Try
                | TokenKind::TypeOf
                | TokenKind::Var
                | TokenKind::Void
                | TokenKind::While
                | TokenKind::With
        )
    }

    /// Whether this kind can begin an assignment-level expression.
    pub fn starts_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::PrivateIdent
                | TokenKind::Number
                | TokenKind::BigInt
                | TokenKind::String
                | TokenKind::NoSubstitutionTemplate
                | TokenKind::TemplateHead
                | TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::OpenBrace
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Not
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Lt
                | TokenKind::Slash
                | TokenKind::SlashEq
                | TokenKind::New
                | TokenKind::Delete
                | TokenKind::Void
                | TokenKind::TypeOf
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::Import
                | TokenKind::Function
                | TokenKind::Class
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// The punctuation or keyword spelling, for error messages.
    pub fn text(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::DotDotDot => "...",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::At => "@",
            TokenKind::Arrow => "=>",
            TokenKind::Question => "?",
            TokenKind::QuestionDot => "?.",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionQuestionEq => "??=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEqEq => "!==",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::LtLt => "<<",
            TokenKind::GtGt => ">>",
            TokenKind::GtGtGt => ">>>",
            TokenKind::Amp => "&",
            TokenKind::Bar => "|",
            TokenKind::Caret => "^",
            TokenKind::Not => "!",
            TokenKind::Tilde => "~",
            TokenKind::AmpAmp => "&&",
            TokenKind::BarBar => "||",
            TokenKind::AmpAmpEq => "&&=",
            TokenKind::BarBarEq => "||=",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::StarStarEq => "**=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::LtLtEq => "<<=",
            TokenKind::GtGtEq => ">>=",
            TokenKind::GtGtGtEq => ">>>=",
            TokenKind::AmpEq => "&=",
            TokenKind::BarEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Catch => "catch",
            TokenKind::Class => "class",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Debugger => "debugger",
            TokenKind::Default => "default",
            TokenKind::Delete => "delete",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Export => "export",
            TokenKind::Extends => "extends",
            TokenKind::False => "false",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::In => "in",
            TokenKind::InstanceOf => "instanceof",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Super => "super",
            TokenKind::Switch => "switch",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::TypeOf => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::With => "with",
            _ => return None,
        })
    }
}

/// Identifier-like keyword sub-kind. These only have meaning in specific
/// syntactic positions; everywhere else the token is an ordinary identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kw {
    Abstract,
    Accessor,
    Any,
    As,
    Asserts,
    Async,
    Await,
    Bigint,
    Boolean,
    Constructor,
    Declare,
    From,
    Get,
    Global,
    Implements,
    Infer,
    Interface,
    Is,
    Keyof,
    Let,
    Meta,
    Module,
    Namespace,
    Never,
    Number,
    Object,
    Of,
    Out,
    Package,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    Satisfies,
    Set,
    Static,
    String,
    Symbol,
    Target,
    Type,
    Undefined,
    Unique,
    Unknown,
    Yield,
}

/// Map an identifier spelling to its reserved kind or keyword sub-kind.
pub fn classify_ident(text: &str) -> (TokenKind, Option<Kw>) {
    let reserved = match text {
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "class" => TokenKind::Class,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "debugger" => TokenKind::Debugger,
        "default" => TokenKind::Default,
        "delete" => TokenKind::Delete,
        "do" => TokenKind::Do,
        "else" => TokenKind::Else,
        "enum" => TokenKind::Enum,
        "export" => TokenKind::Export,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "finally" => TokenKind::Finally,
        "for" => TokenKind::For,
        "function" => TokenKind::Function,
        "if" => TokenKind::If,
        "import" => TokenKind::Import,
        "in" => TokenKind::In,
        "instanceof" => TokenKind::InstanceOf,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "return" => TokenKind::Return,
        "super" => TokenKind::Super,
        "switch" => TokenKind::Switch,
        "this" => TokenKind::This,
        "throw" => TokenKind::Throw,
        "true" => TokenKind::True,
        "try" => TokenKind::Try,
        "typeof" => TokenKind::TypeOf,
        "var" => TokenKind::Var,
        "void" => TokenKind::Void,
        "while" => TokenKind::While,
        "with" => TokenKind::With,
        _ => {
            let kw = match text {
                "abstract" => Some(Kw::Abstract),
                "accessor" => Some(Kw::Accessor),
                "any" => Some(Kw::Any),
                "as" => Some(Kw::As),
                "asserts" => Some(Kw::Asserts),
                "async" => Some(Kw::Async),
                "await" => Some(Kw::Await),
                "bigint" => Some(Kw::Bigint),
                "boolean" => Some(Kw::Boolean),
                "constructor" => Some(Kw::Constructor),
                "declare" => Some(Kw::Declare),
                "from" => Some(Kw::From),
                "get" => Some(Kw::Get),
                "global" => Some(Kw::Global),
                "implements" => Some(Kw::Implements),
                "infer" => Some(Kw::Infer),
                "interface" => Some(Kw::Interface),
                "is" => Some(Kw::Is),
                "keyof" => Some(Kw::Keyof),
                "let" => Some(Kw::Let),
                "meta" => Some(Kw::Meta),
                "module" => Some(Kw::Module),
                "namespace" => Some(Kw::Namespace),
                "never" => Some(Kw::Never),
                "number" => Some(Kw::Number),
                "object" => Some(Kw::Object),
                "of" => Some(Kw::Of),
                "out" => Some(Kw::Out),
                "package" => Some(Kw::Package),
                "private" => Some(Kw::Private),
                "protected" => Some(Kw::Protected),
                "public" => Some(Kw::Public),
                "readonly" => Some(Kw::Readonly),
                "require" => Some(Kw::Require),
                "satisfies" => Some(Kw::Satisfies),
                "set" => Some(Kw::Set),
                "static" => Some(Kw::Static),
                "string" => Some(Kw::String),
                "symbol" => Some(Kw::Symbol),
                "target" => Some(Kw::Target),
                "type" => Some(Kw::Type),
                "undefined" => Some(Kw::Undefined),
                "unique" => Some(Kw::Unique),
                "unknown" => Some(Kw::Unknown),
                "yield" => Some(Kw::Yield),
                _ => None,
            };
            return (TokenKind::Ident, kw);
        }
    };
    (reserved, None)
}

/// A scanned token. `value` holds the cooked text for identifiers,
/// strings, templates, and regexes; `num` holds the numeric value for
/// `Number` tokens.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub kw: Option<Kw>,
    pub range: TextRange,
    pub flags: TokenFlags,
    pub value: String,
    pub num: f64,
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self {
            kind,
            kw: None,
            range,
            flags: TokenFlags::NONE,
            value: String::new(),
            num: 0.0,
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether this token is the identifier-like keyword `kw`.
    #[inline]
    pub fn is_kw(&self, kw: Kw) -> bool {
        self.kind == TokenKind::Ident && self.kw == Some(kw)
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Whether the token can serve as an identifier in a binding position.
    pub fn is_identifier_like(&self) -> bool {
        self.kind == TokenKind::Ident
    }
}
