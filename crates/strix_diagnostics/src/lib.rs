//! strix_diagnostics: the parse error type and its message catalog.
//!
//! The front-end is fail-fast: the first grammar violation aborts the
//! whole parse, so there is a single structured error rather than a
//! diagnostic collection. Every error carries the 1-based line/column of
//! the offending token.

use strix_core::text::LineCol;
use thiserror::Error;

/// Error taxonomy. `Syntax` is any grammar violation; `Generic` is an
/// infrastructure failure (allocation, embedding misuse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Generic,
}

/// A positioned parse error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} [{file}:{line}:{column}] {message}", kind_str(*.kind))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
}

fn kind_str(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Syntax => "SyntaxError",
        ErrorKind::Generic => "Error",
    }
}

impl Error {
    pub fn syntax(message: impl Into<String>, file: impl Into<String>, at: LineCol) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            message: message.into(),
            file: file.into(),
            line: at.line,
            column: at.column,
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Generic,
            message: message.into(),
            file: String::new(),
            line: 0,
            column: 0,
        }
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }
}

/// Result alias used by every parse function.
pub type Result<T> = std::result::Result<T, Error>;

/// Message catalog. Texts that the parser raises in more than one place
/// live here so tests can match on them.
pub mod messages {
    pub const UNEXPECTED_TOKEN: &str = "Unexpected token";
    pub const UNEXPECTED_TOKEN_ID: &str = "Unexpected token, expected an identifier";
    pub const UNEXPECTED_TOKEN_ARROW: &str = "Unexpected token, arrow (=>)";
    pub const EXPECTED_EXPRESSION: &str = "Expected an expression";
    pub const UNEXPECTED_EOS: &str = "Unexpected end of script";
    pub const IDENTIFIER_EXPECTED: &str = "Identifier expected";
    pub const SEMICOLON_EXPECTED: &str = "Semicolon expected";
    pub const UNTERMINATED_STRING: &str = "Unterminated string literal";
    pub const UNTERMINATED_TEMPLATE: &str = "Unterminated template literal";
    pub const UNTERMINATED_REGEX: &str = "Unterminated regular expression";
    pub const INVALID_CHARACTER: &str = "Invalid character";
    pub const INVALID_NUMERIC_SEPARATOR: &str = "Invalid numeric separator";
    pub const INVALID_DESTRUCTURING_TARGET: &str = "Invalid destructuring assignment target";
    pub const INVALID_LEFT_HAND_SIDE: &str = "Invalid left-hand side in assignment expression";
    pub const REST_MUST_BE_LAST: &str = "Rest element must be last element";
    pub const REST_NO_DEFAULT: &str = "Rest element cannot have a default initializer";
    pub const NULLISH_NEEDS_PARENS: &str =
        "Nullish coalescing operator ?? requires parens when mixing with logical operators";
    pub const TAGGED_TEMPLATE_IN_CHAIN: &str =
        "Tagged Template Literals are not allowed in optionalChain";
    pub const LEXICAL_IN_SINGLE_STATEMENT: &str =
        "Lexical declaration is not allowed in single statement context";
    pub const ILLEGAL_BREAK: &str = "Illegal break statement";
    pub const ILLEGAL_CONTINUE: &str = "Illegal continue statement";
    pub const UNDEFINED_LABEL: &str = "Undefined label";
    pub const DUPLICATE_LABEL: &str = "Label already declared";
    pub const CONTINUE_LABEL_NOT_ITERATION: &str =
        "A 'continue' statement can only jump to a label of an enclosing iteration statement";
    pub const MULTIPLE_CONSTRUCTORS: &str = "Multiple constructor implementations are not allowed";
    pub const CONSTRUCTOR_NOT_SPECIAL: &str =
        "Class constructor can not be a getter, setter, async or generator";
    pub const DUPLICATE_MODIFIER: &str = "Duplicated modifier is not allowed";
    pub const UNEXPECTED_MODIFIER: &str = "Unexpected modifier";
    pub const AMBIENT_INITIALIZER: &str = "Initializers are not allowed in ambient contexts";
    pub const DECLARE_NO_BODY: &str =
        "An implementation cannot be declared in ambient contexts";
    pub const MISSING_INITIALIZER_CONST: &str =
        "Missing initializer in const declaration";
    pub const MISSING_INITIALIZER_DESTRUCTURING: &str =
        "Missing initializer in destructuring declaration";
    pub const ENUM_CONST_MERGE: &str =
        "Enum declarations can only merge with namespace or other enum declarations";
    pub const AWAIT_RESERVED: &str =
        "'await' is only allowed within async functions";
    pub const YIELD_OUTSIDE_GENERATOR: &str =
        "'yield' is only allowed within generator functions";
    pub const NEW_LINE_BEFORE_ARROW: &str = "expected '=>' on the same line after an argument list";
    pub const INVALID_TYPE: &str = "Invalid type";
    pub const CALL_OR_TEMPLATE_EXPECTED: &str = "'(' or '`' expected";
    pub const TYPE_EXPECTED: &str = "Type expected";
    pub const TYPE_ANNOTATION_EXPECTED: &str = "Type annotation expected";
    pub const SETTER_ONE_PARAM: &str = "A 'set' accessor must have exactly one parameter";
    pub const SETTER_NO_REST: &str = "A 'set' accessor cannot have rest parameter";
    pub const GETTER_NO_PARAMS: &str = "A 'get' accessor cannot have parameters";
    pub const ACCESSOR_VISIBILITY_MISMATCH: &str =
        "A get and set accessor must have the same visibility";
    pub const PRIVATE_NAME_CONSTRUCTOR: &str = "Classes may not have a private field named '#constructor'";
    pub const DECORATORS_INVALID_HERE: &str = "Decorators are not valid here";
    pub const STRICT_MODE_RESERVED: &str = "Unexpected reserved word in strict mode";
    pub const IMPORT_TOP_LEVEL: &str =
        "'import' and 'export' may only appear at the top level";
    pub const IMPORT_MODULE_ONLY: &str =
        "'import' and 'export' may appear only with 'sourceType: module'";
    pub const FOR_IN_OF_SINGLE_BINDING: &str =
        "for in/of loop variable declaration may not have an initializer";
    pub const INVALID_LABEL_FUNCTION: &str =
        "In strict mode code, functions can only be declared at top level or inside a block";
}

/// Render a parameterized message. Placeholders are `{}` in order.
pub fn format_args_message(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut parts = template.split("{}").peekable();
    while let Some(part) = parts.next() {
        out.push_str(part);
        if parts.peek().is_some() {
            out.push_str(args.next().copied().unwrap_or(""));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use strix_core::text::LineCol;

    #[test]
    fn error_display_has_position() {
        let err = Error::syntax("Unexpected token", "a.ts", LineCol { line: 3, column: 7 });
        assert_eq!(err.to_string(), "SyntaxError [a.ts:3:7] Unexpected token");
        assert!(err.is_syntax());
    }

    #[test]
    fn generic_error_display() {
        let err = Error::generic("Unsuccessful allocation during parsing");
        assert_eq!(err.kind, ErrorKind::Generic);
        assert!(err.to_string().starts_with("Error"));
    }

    #[test]
    fn message_formatting() {
        let msg = format_args_message("Variable '{}' has already been declared.", &["x"]);
        assert_eq!(msg, "Variable 'x' has already been declared.");
    }
}
