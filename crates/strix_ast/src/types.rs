//! Flag and id types shared across the AST.

use std::fmt;

/// Index of a scope in the binder's scope table. Scope-owning nodes
/// record the id so the binding pass can re-enter the right scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// Placeholder used while a node is under construction.
    pub const INVALID: ScopeId = ScopeId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The dialect a file is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptExtension {
    Js,
    Ts,
    /// ArkTS sources; grammar-wise a TypeScript dialect.
    As,
}

impl ScriptExtension {
    /// TypeScript grammar branches are enabled for `Ts` and `As`.
    pub fn is_typed(self) -> bool {
        matches!(self, ScriptExtension::Ts | ScriptExtension::As)
    }
}

/// How the file participates in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Script,
    Module,
    CommonJs,
}

impl ScriptKind {
    pub fn is_module(self) -> bool {
        matches!(self, ScriptKind::Module)
    }
}

bitflags::bitflags! {
    /// Modifier flags for declarations and class members.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u16 {
        const NONE      = 0;
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC    = 1 << 3;
        const READONLY  = 1 << 4;
        const ABSTRACT  = 1 << 5;
        const ASYNC     = 1 << 6;
        const DECLARE   = 1 << 7;
        const EXPORT    = 1 << 8;
        const DEFAULT   = 1 << 9;
        const CONST     = 1 << 10;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const PARAMETER_PROPERTY = Self::ACCESSIBILITY.bits() | Self::READONLY.bits();
    }
}

impl ModifierFlags {
    /// Printable name of the accessibility modifier, if one is set.
    pub fn accessibility_name(self) -> Option<&'static str> {
        if self.contains(ModifierFlags::PUBLIC) {
            Some("public")
        } else if self.contains(ModifierFlags::PRIVATE) {
            Some("private")
        } else if self.contains(ModifierFlags::PROTECTED) {
            Some("protected")
        } else {
            None
        }
    }
}

bitflags::bitflags! {
    /// Flags carried by every function-like node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FunctionFlags: u16 {
        const NONE            = 0;
        const ASYNC           = 1 << 0;
        const GENERATOR       = 1 << 1;
        const ARROW           = 1 << 2;
        /// Arrow function whose body is an expression rather than a block.
        const EXPRESSION_BODY = 1 << 3;
        const CONSTRUCTOR     = 1 << 4;
        const METHOD          = 1 << 5;
        const GETTER          = 1 << 6;
        const SETTER          = 1 << 7;
        /// Signature without a body (overload or ambient declaration).
        const OVERLOAD        = 1 << 8;
    }
}

/// Kind of a `var`-family declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }

    pub fn is_lexical(self) -> bool {
        !matches!(self, VariableKind::Var)
    }
}

/// Kind of a class method or object accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// Kind of an object-literal property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

/// `++` and `--`, shared by prefix and postfix forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Binary operators, logical operators included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Inequality,
    StrictEquality,
    StrictInequality,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Instanceof,
    In,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
}

impl BinaryOp {
    /// Binding strength, higher binds tighter. Nullish coalescing sits
    /// alone at the bottom so mixing with `&&`/`||` can be rejected.
    pub fn precedence(self) -> u8 {
        use BinaryOp::*;
        match self {
            NullishCoalescing => 1,
            LogicalOr => 2,
            LogicalAnd | BitOr => 3,
            BitXor => 4,
            BitAnd => 5,
            Equality | Inequality | StrictEquality | StrictInequality => 6,
            Less | Greater | LessEqual | GreaterEqual | Instanceof | In => 7,
            LeftShift | RightShift | UnsignedRightShift => 8,
            Add | Subtract => 9,
            Multiply | Divide | Modulo => 10,
            Exponent => 11,
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOp::NullishCoalescing | BinaryOp::LogicalOr | BinaryOp::LogicalAnd
        )
    }

    /// Exponentiation is the one right-associative binary operator; it is
    /// excluded from the left-associativity rotation.
    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOp::Exponent)
    }

    pub fn as_str(self) -> &'static str {
        use BinaryOp::*;
        match self {
            NullishCoalescing => "??",
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Equality => "==",
            Inequality => "!=",
            StrictEquality => "===",
            StrictInequality => "!==",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Instanceof => "instanceof",
            In => "in",
            LeftShift => "<<",
            RightShift => ">>",
            UnsignedRightShift => ">>>",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Exponent => "**",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment operators, compound forms included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    ExponentAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishAssign,
}

impl AssignOp {
    /// Plain `=` is the only form that accepts a destructuring target.
    pub fn is_simple(self) -> bool {
        matches!(self, AssignOp::Assign)
    }
}

/// `new.target` and `import.meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaPropertyKind {
    NewTarget,
    ImportMeta,
}

/// Keyword types of the TypeScript type grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsKeywordTypeKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Object,
    BigInt,
}

/// Prefix type operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsTypeOperatorKind {
    Keyof,
    Unique,
    Readonly,
}
