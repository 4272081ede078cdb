//! AST node definitions for the strix front-end.
//!
//! Nodes are allocated in a [`bumpalo::Bump`] arena and reference their
//! children through shared `&'a` borrows, so the enums that tie the tree
//! together (`Expression`, `Statement`, `Pattern`, `TsType`) are `Copy`.
//! The tree is immutable once built; the few places that need grouping
//! information keep an explicit parenthesized wrapper instead of a flag.

use crate::types::*;
use strix_core::intern::InternedString;
use strix_core::text::TextRange;

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Identifiers and literals
// ============================================================================

#[derive(Debug)]
pub struct Ident<'a> {
    pub range: TextRange,
    pub sym: InternedString,
    /// Arena copy of the identifier text, kept for diagnostics.
    pub name: &'a str,
}

/// `#name` inside a class body.
#[derive(Debug)]
pub struct PrivateName<'a> {
    pub range: TextRange,
    pub sym: InternedString,
    pub name: &'a str,
}

#[derive(Debug)]
pub struct NumberLit {
    pub range: TextRange,
    pub value: f64,
}

/// BigInt literals keep their digit text; no numeric conversion happens
/// in the front-end.
#[derive(Debug)]
pub struct BigIntLit<'a> {
    pub range: TextRange,
    pub value: &'a str,
}

#[derive(Debug)]
pub struct StringLit<'a> {
    pub range: TextRange,
    /// Cooked value, escapes resolved.
    pub value: &'a str,
}

#[derive(Debug)]
pub struct BoolLit {
    pub range: TextRange,
    pub value: bool,
}

#[derive(Debug)]
pub struct NullLit {
    pub range: TextRange,
}

/// Regex literals keep their verbatim source text.
#[derive(Debug)]
pub struct RegexLit<'a> {
    pub range: TextRange,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct TemplateLit<'a> {
    pub range: TextRange,
    /// Always one longer than `expressions`.
    pub quasis: NodeList<'a, TemplateElement<'a>>,
    pub expressions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateElement<'a> {
    pub range: TextRange,
    pub cooked: &'a str,
    pub tail: bool,
}

#[derive(Debug)]
pub struct TaggedTemplate<'a> {
    pub range: TextRange,
    pub tag: Expression<'a>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
    pub quasi: &'a TemplateLit<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Expression<'a> {
    Ident(&'a Ident<'a>),
    PrivateName(&'a PrivateName<'a>),
    Number(&'a NumberLit),
    BigInt(&'a BigIntLit<'a>),
    String(&'a StringLit<'a>),
    Bool(&'a BoolLit),
    Null(&'a NullLit),
    Regex(&'a RegexLit<'a>),
    Template(&'a TemplateLit<'a>),
    TaggedTemplate(&'a TaggedTemplate<'a>),
    Array(&'a ArrayExpr<'a>),
    Object(&'a ObjectExpr<'a>),
    Function(&'a ScriptFunction<'a>),
    Arrow(&'a ScriptFunction<'a>),
    Class(&'a ClassDefinition<'a>),
    Paren(&'a ParenExpr<'a>),
    Unary(&'a UnaryExpr<'a>),
    Update(&'a UpdateExpr<'a>),
    Binary(&'a BinaryExpr<'a>),
    Assignment(&'a AssignmentExpr<'a>),
    Conditional(&'a ConditionalExpr<'a>),
    Sequence(&'a SequenceExpr<'a>),
    Call(&'a CallExpr<'a>),
    New(&'a NewExpr<'a>),
    Member(&'a MemberExpr<'a>),
    Chain(&'a ChainExpr<'a>),
    This(&'a ThisExpr),
    Super(&'a SuperExpr),
    MetaProperty(&'a MetaProperty),
    Import(&'a ImportExpr<'a>),
    Yield(&'a YieldExpr<'a>),
    Await(&'a AwaitExpr<'a>),
    Spread(&'a SpreadElement<'a>),
    TsAs(&'a TsAsExpr<'a>),
    TsTypeAssertion(&'a TsTypeAssertion<'a>),
    TsNonNull(&'a TsNonNullExpr<'a>),
}

impl<'a> Expression<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            Expression::Ident(n) => n.range,
            Expression::PrivateName(n) => n.range,
            Expression::Number(n) => n.range,
            Expression::BigInt(n) => n.range,
            Expression::String(n) => n.range,
            Expression::Bool(n) => n.range,
            Expression::Null(n) => n.range,
            Expression::Regex(n) => n.range,
            Expression::Template(n) => n.range,
            Expression::TaggedTemplate(n) => n.range,
            Expression::Array(n) => n.range,
            Expression::Object(n) => n.range,
            Expression::Function(n) => n.range,
            Expression::Arrow(n) => n.range,
            Expression::Class(n) => n.range,
            Expression::Paren(n) => n.range,
            Expression::Unary(n) => n.range,
            Expression::Update(n) => n.range,
            Expression::Binary(n) => n.range,
            Expression::Assignment(n) => n.range,
            Expression::Conditional(n) => n.range,
            Expression::Sequence(n) => n.range,
            Expression::Call(n) => n.range,
            Expression::New(n) => n.range,
            Expression::Member(n) => n.range,
            Expression::Chain(n) => n.range,
            Expression::This(n) => n.range,
            Expression::Super(n) => n.range,
            Expression::MetaProperty(n) => n.range,
            Expression::Import(n) => n.range,
            Expression::Yield(n) => n.range,
            Expression::Await(n) => n.range,
            Expression::Spread(n) => n.range,
            Expression::TsAs(n) => n.range,
            Expression::TsTypeAssertion(n) => n.range,
            Expression::TsNonNull(n) => n.range,
        }
    }

    /// Strips parenthesized wrappers.
    pub fn unwrap_parens(self) -> Expression<'a> {
        let mut expr = self;
        while let Expression::Paren(p) = expr {
            expr = p.expr;
        }
        expr
    }

    pub fn is_ident(&self) -> bool {
        matches!(self, Expression::Ident(_))
    }
}

/// Elements may be `None` for elisions (`[a, , b]`).
#[derive(Debug)]
pub struct ArrayExpr<'a> {
    pub range: TextRange,
    pub elements: NodeList<'a, Option<Expression<'a>>>,
    pub trailing_comma: bool,
}

#[derive(Debug)]
pub struct ObjectExpr<'a> {
    pub range: TextRange,
    pub properties: NodeList<'a, ObjectMember<'a>>,
    pub trailing_comma: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ObjectMember<'a> {
    Property(&'a Property<'a>),
    Spread(&'a SpreadElement<'a>),
}

#[derive(Debug)]
pub struct Property<'a> {
    pub range: TextRange,
    pub kind: PropertyKind,
    pub key: PropertyKey<'a>,
    pub value: Expression<'a>,
    pub computed: bool,
    pub shorthand: bool,
    pub method: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum PropertyKey<'a> {
    Ident(&'a Ident<'a>),
    Private(&'a PrivateName<'a>),
    String(&'a StringLit<'a>),
    Number(&'a NumberLit),
    Computed(Expression<'a>),
}

impl<'a> PropertyKey<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            PropertyKey::Ident(n) => n.range,
            PropertyKey::Private(n) => n.range,
            PropertyKey::String(n) => n.range,
            PropertyKey::Number(n) => n.range,
            PropertyKey::Computed(e) => e.range(),
        }
    }

    /// Textual name for non-computed keys, used for duplicate checks.
    pub fn static_name(&self) -> Option<&'a str> {
        match self {
            PropertyKey::Ident(n) => Some(n.name),
            PropertyKey::Private(n) => Some(n.name),
            PropertyKey::String(n) => Some(n.value),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ParenExpr<'a> {
    pub range: TextRange,
    pub expr: Expression<'a>,
}

#[derive(Debug)]
pub struct UnaryExpr<'a> {
    pub range: TextRange,
    pub op: UnaryOp,
    pub argument: Expression<'a>,
}

#[derive(Debug)]
pub struct UpdateExpr<'a> {
    pub range: TextRange,
    pub op: UpdateOp,
    pub prefix: bool,
    pub argument: Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpr<'a> {
    pub range: TextRange,
    pub op: BinaryOp,
    pub left: Expression<'a>,
    pub right: Expression<'a>,
}

#[derive(Debug)]
pub struct AssignmentExpr<'a> {
    pub range: TextRange,
    pub op: AssignOp,
    pub left: Expression<'a>,
    pub right: Expression<'a>,
}

#[derive(Debug)]
pub struct ConditionalExpr<'a> {
    pub range: TextRange,
    pub test: Expression<'a>,
    pub consequent: Expression<'a>,
    pub alternate: Expression<'a>,
}

#[derive(Debug)]
pub struct SequenceExpr<'a> {
    pub range: TextRange,
    pub expressions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct CallExpr<'a> {
    pub range: TextRange,
    pub callee: Expression<'a>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
    pub arguments: NodeList<'a, Expression<'a>>,
    /// `?.()` call.
    pub optional: bool,
}

#[derive(Debug)]
pub struct NewExpr<'a> {
    pub range: TextRange,
    pub callee: Expression<'a>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
    /// `None` when the argument list is absent (`new Foo`).
    pub arguments: Option<NodeList<'a, Expression<'a>>>,
}

#[derive(Debug)]
pub struct MemberExpr<'a> {
    pub range: TextRange,
    pub object: Expression<'a>,
    pub property: Expression<'a>,
    pub computed: bool,
    /// `?.` access.
    pub optional: bool,
}

/// Wraps the outermost expression of an optional chain so that the
/// short-circuit boundary survives in the tree.
#[derive(Debug)]
pub struct ChainExpr<'a> {
    pub range: TextRange,
    pub expression: Expression<'a>,
}

#[derive(Debug)]
pub struct ThisExpr {
    pub range: TextRange,
}

#[derive(Debug)]
pub struct SuperExpr {
    pub range: TextRange,
}

#[derive(Debug)]
pub struct MetaProperty {
    pub range: TextRange,
    pub kind: MetaPropertyKind,
}

/// Dynamic `import(source)`.
#[derive(Debug)]
pub struct ImportExpr<'a> {
    pub range: TextRange,
    pub source: Expression<'a>,
}

#[derive(Debug)]
pub struct YieldExpr<'a> {
    pub range: TextRange,
    pub argument: Option<Expression<'a>>,
    pub delegate: bool,
}

#[derive(Debug)]
pub struct AwaitExpr<'a> {
    pub range: TextRange,
    pub argument: Expression<'a>,
}

/// `...expr`, used in call arguments, array literals, and as the rest
/// position of a permissively parsed pattern.
#[derive(Debug)]
pub struct SpreadElement<'a> {
    pub range: TextRange,
    pub argument: Expression<'a>,
}

#[derive(Debug)]
pub struct TsAsExpr<'a> {
    pub range: TextRange,
    pub expr: Expression<'a>,
    pub type_ann: TsType<'a>,
}

/// `<T>expr`.
#[derive(Debug)]
pub struct TsTypeAssertion<'a> {
    pub range: TextRange,
    pub type_ann: TsType<'a>,
    pub expr: Expression<'a>,
}

/// `expr!`.
#[derive(Debug)]
pub struct TsNonNullExpr<'a> {
    pub range: TextRange,
    pub expr: Expression<'a>,
}

// ============================================================================
// Patterns
// ============================================================================

/// Binding patterns for declaration positions. Assignment-destructuring
/// targets stay as expressions and are validated in place.
#[derive(Debug, Clone, Copy)]
pub enum Pattern<'a> {
    Ident(&'a BindingIdent<'a>),
    Array(&'a ArrayPattern<'a>),
    Object(&'a ObjectPattern<'a>),
    Assign(&'a AssignPattern<'a>),
    Rest(&'a RestPattern<'a>),
}

impl<'a> Pattern<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            Pattern::Ident(n) => n.range,
            Pattern::Array(n) => n.range,
            Pattern::Object(n) => n.range,
            Pattern::Assign(n) => n.range,
            Pattern::Rest(n) => n.range,
        }
    }

    /// Walks every bound identifier of the pattern, left to right.
    pub fn each_binding(&self, f: &mut impl FnMut(&'a BindingIdent<'a>)) {
        match self {
            Pattern::Ident(id) => f(id),
            Pattern::Array(arr) => {
                for elem in arr.elements.iter().flatten() {
                    elem.each_binding(f);
                }
            }
            Pattern::Object(obj) => {
                for prop in obj.properties {
                    match prop {
                        ObjectPatternProp::KeyValue(p) => p.value.each_binding(f),
                        ObjectPatternProp::Rest(r) => r.argument.each_binding(f),
                    }
                }
            }
            Pattern::Assign(assign) => assign.target.each_binding(f),
            Pattern::Rest(rest) => rest.argument.each_binding(f),
        }
    }
}

/// Identifier in binding position, optionally annotated.
#[derive(Debug)]
pub struct BindingIdent<'a> {
    pub range: TextRange,
    pub ident: &'a Ident<'a>,
    pub type_ann: Option<TsType<'a>>,
    /// `?` optional marker in parameter position.
    pub optional: bool,
}

#[derive(Debug)]
pub struct ArrayPattern<'a> {
    pub range: TextRange,
    pub elements: NodeList<'a, Option<Pattern<'a>>>,
    pub type_ann: Option<TsType<'a>>,
}

#[derive(Debug)]
pub struct ObjectPattern<'a> {
    pub range: TextRange,
    pub properties: NodeList<'a, ObjectPatternProp<'a>>,
    pub type_ann: Option<TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ObjectPatternProp<'a> {
    KeyValue(&'a KeyValuePatternProp<'a>),
    Rest(&'a RestPattern<'a>),
}

#[derive(Debug)]
pub struct KeyValuePatternProp<'a> {
    pub range: TextRange,
    pub key: PropertyKey<'a>,
    pub value: Pattern<'a>,
    pub computed: bool,
    pub shorthand: bool,
}

#[derive(Debug)]
pub struct AssignPattern<'a> {
    pub range: TextRange,
    pub target: Pattern<'a>,
    pub default: Expression<'a>,
}

#[derive(Debug)]
pub struct RestPattern<'a> {
    pub range: TextRange,
    pub argument: Pattern<'a>,
}

/// Function or method parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param<'a> {
    pub range: TextRange,
    pub pattern: Pattern<'a>,
    /// Parameter-property modifiers, constructors only.
    pub modifiers: ModifierFlags,
}

// ============================================================================
// Functions and classes
// ============================================================================

/// Shared body of function declarations, function expressions, arrows,
/// and methods.
#[derive(Debug)]
pub struct ScriptFunction<'a> {
    pub range: TextRange,
    pub ident: Option<&'a Ident<'a>>,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<TsType<'a>>,
    pub body: Option<FunctionBody<'a>>,
    pub flags: FunctionFlags,
    pub param_scope: ScopeId,
    pub scope: ScopeId,
}

impl<'a> ScriptFunction<'a> {
    pub fn is_async(&self) -> bool {
        self.flags.contains(FunctionFlags::ASYNC)
    }

    pub fn is_generator(&self) -> bool {
        self.flags.contains(FunctionFlags::GENERATOR)
    }

    pub fn is_overload(&self) -> bool {
        self.flags.contains(FunctionFlags::OVERLOAD)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FunctionBody<'a> {
    Block(&'a BlockStatement<'a>),
    Expr(Expression<'a>),
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub range: TextRange,
    pub function: &'a ScriptFunction<'a>,
    pub modifiers: ModifierFlags,
}

#[derive(Debug)]
pub struct ClassDeclaration<'a> {
    pub range: TextRange,
    pub definition: &'a ClassDefinition<'a>,
}

#[derive(Debug)]
pub struct ClassDefinition<'a> {
    pub range: TextRange,
    pub ident: Option<&'a Ident<'a>>,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub super_class: Option<Expression<'a>>,
    pub super_type_args: Option<&'a TsTypeArgs<'a>>,
    pub implements: NodeList<'a, TsClassImplements<'a>>,
    pub body: NodeList<'a, ClassElement<'a>>,
    pub modifiers: ModifierFlags,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy)]
pub struct TsClassImplements<'a> {
    pub range: TextRange,
    pub expr: TsEntityName<'a>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Decorator<'a> {
    pub range: TextRange,
    pub expr: Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ClassElement<'a> {
    Method(&'a MethodDefinition<'a>),
    Property(&'a ClassProperty<'a>),
    IndexSignature(&'a TsIndexSignature<'a>),
}

#[derive(Debug)]
pub struct MethodDefinition<'a> {
    pub range: TextRange,
    pub kind: MethodKind,
    pub key: PropertyKey<'a>,
    pub function: &'a ScriptFunction<'a>,
    pub modifiers: ModifierFlags,
    pub computed: bool,
    pub optional: bool,
    pub decorators: NodeList<'a, Decorator<'a>>,
}

#[derive(Debug)]
pub struct ClassProperty<'a> {
    pub range: TextRange,
    pub key: PropertyKey<'a>,
    pub value: Option<Expression<'a>>,
    pub type_ann: Option<TsType<'a>>,
    pub modifiers: ModifierFlags,
    pub computed: bool,
    pub optional: bool,
    /// `!` definite-assignment marker.
    pub definite: bool,
    pub decorators: NodeList<'a, Decorator<'a>>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    Block(&'a BlockStatement<'a>),
    Empty(&'a EmptyStatement),
    Expr(&'a ExpressionStatement<'a>),
    Variable(&'a VariableDeclaration<'a>),
    Function(&'a FunctionDeclaration<'a>),
    Class(&'a ClassDeclaration<'a>),
    If(&'a IfStatement<'a>),
    For(&'a ForStatement<'a>),
    ForIn(&'a ForInStatement<'a>),
    ForOf(&'a ForOfStatement<'a>),
    While(&'a WhileStatement<'a>),
    DoWhile(&'a DoWhileStatement<'a>),
    Switch(&'a SwitchStatement<'a>),
    Break(&'a BreakStatement<'a>),
    Continue(&'a ContinueStatement<'a>),
    Return(&'a ReturnStatement<'a>),
    Throw(&'a ThrowStatement<'a>),
    Try(&'a TryStatement<'a>),
    Labeled(&'a LabeledStatement<'a>),
    Debugger(&'a DebuggerStatement),
    TsEnum(&'a TsEnumDeclaration<'a>),
    TsInterface(&'a TsInterfaceDeclaration<'a>),
    TsTypeAlias(&'a TsTypeAliasDeclaration<'a>),
    TsModule(&'a TsModuleDeclaration<'a>),
    TsImportEquals(&'a TsImportEqualsDeclaration<'a>),
    TsExportAssignment(&'a TsExportAssignment<'a>),
    Import(&'a ImportDeclaration<'a>),
    ExportNamed(&'a ExportNamedDeclaration<'a>),
    ExportDefault(&'a ExportDefaultDeclaration<'a>),
    ExportAll(&'a ExportAllDeclaration<'a>),
}

impl<'a> Statement<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            Statement::Block(n) => n.range,
            Statement::Empty(n) => n.range,
            Statement::Expr(n) => n.range,
            Statement::Variable(n) => n.range,
            Statement::Function(n) => n.range,
            Statement::Class(n) => n.range,
            Statement::If(n) => n.range,
            Statement::For(n) => n.range,
            Statement::ForIn(n) => n.range,
            Statement::ForOf(n) => n.range,
            Statement::While(n) => n.range,
            Statement::DoWhile(n) => n.range,
            Statement::Switch(n) => n.range,
            Statement::Break(n) => n.range,
            Statement::Continue(n) => n.range,
            Statement::Return(n) => n.range,
            Statement::Throw(n) => n.range,
            Statement::Try(n) => n.range,
            Statement::Labeled(n) => n.range,
            Statement::Debugger(n) => n.range,
            Statement::TsEnum(n) => n.range,
            Statement::TsInterface(n) => n.range,
            Statement::TsTypeAlias(n) => n.range,
            Statement::TsModule(n) => n.range,
            Statement::TsImportEquals(n) => n.range,
            Statement::TsExportAssignment(n) => n.range,
            Statement::Import(n) => n.range,
            Statement::ExportNamed(n) => n.range,
            Statement::ExportDefault(n) => n.range,
            Statement::ExportAll(n) => n.range,
        }
    }

    /// True for declarations that may not appear as the lone body of an
    /// `if`/loop statement.
    pub fn is_lexical_declaration(&self) -> bool {
        match self {
            Statement::Variable(decl) => decl.kind.is_lexical(),
            Statement::Class(_)
            | Statement::TsEnum(_)
            | Statement::TsInterface(_)
            | Statement::TsTypeAlias(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct BlockStatement<'a> {
    pub range: TextRange,
    pub statements: NodeList<'a, Statement<'a>>,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct EmptyStatement {
    pub range: TextRange,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub range: TextRange,
    pub expr: Expression<'a>,
    /// Set for directive-prologue strings such as `"use strict"`.
    pub directive: Option<&'a str>,
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub range: TextRange,
    pub kind: VariableKind,
    pub declarators: NodeList<'a, &'a VariableDeclarator<'a>>,
    pub declare: bool,
}

#[derive(Debug)]
pub struct VariableDeclarator<'a> {
    pub range: TextRange,
    pub id: Pattern<'a>,
    pub init: Option<Expression<'a>>,
    /// `!` definite-assignment marker.
    pub definite: bool,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub range: TextRange,
    pub test: Expression<'a>,
    pub consequent: Statement<'a>,
    pub alternate: Option<Statement<'a>>,
}

/// Initializer of a `for`-family statement head.
#[derive(Debug, Clone, Copy)]
pub enum ForInit<'a> {
    Var(&'a VariableDeclaration<'a>),
    Expr(Expression<'a>),
}

#[derive(Debug)]
pub struct ForStatement<'a> {
    pub range: TextRange,
    pub init: Option<ForInit<'a>>,
    pub test: Option<Expression<'a>>,
    pub update: Option<Expression<'a>>,
    pub body: Statement<'a>,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct ForInStatement<'a> {
    pub range: TextRange,
    pub left: ForInit<'a>,
    pub right: Expression<'a>,
    pub body: Statement<'a>,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct ForOfStatement<'a> {
    pub range: TextRange,
    pub left: ForInit<'a>,
    pub right: Expression<'a>,
    pub body: Statement<'a>,
    pub is_await: bool,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub range: TextRange,
    pub test: Expression<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct DoWhileStatement<'a> {
    pub range: TextRange,
    pub body: Statement<'a>,
    pub test: Expression<'a>,
}

#[derive(Debug)]
pub struct SwitchStatement<'a> {
    pub range: TextRange,
    pub discriminant: Expression<'a>,
    pub cases: NodeList<'a, SwitchCase<'a>>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy)]
pub struct SwitchCase<'a> {
    pub range: TextRange,
    /// `None` for the `default` clause.
    pub test: Option<Expression<'a>>,
    pub consequent: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct BreakStatement<'a> {
    pub range: TextRange,
    pub label: Option<&'a Ident<'a>>,
}

#[derive(Debug)]
pub struct ContinueStatement<'a> {
    pub range: TextRange,
    pub label: Option<&'a Ident<'a>>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub range: TextRange,
    pub argument: Option<Expression<'a>>,
}

#[derive(Debug)]
pub struct ThrowStatement<'a> {
    pub range: TextRange,
    pub argument: Expression<'a>,
}

#[derive(Debug)]
pub struct TryStatement<'a> {
    pub range: TextRange,
    pub block: &'a BlockStatement<'a>,
    pub handler: Option<&'a CatchClause<'a>>,
    pub finalizer: Option<&'a BlockStatement<'a>>,
}

#[derive(Debug)]
pub struct CatchClause<'a> {
    pub range: TextRange,
    pub param: Option<Pattern<'a>>,
    pub body: &'a BlockStatement<'a>,
    pub param_scope: ScopeId,
    pub scope: ScopeId,
}

#[derive(Debug)]
pub struct LabeledStatement<'a> {
    pub range: TextRange,
    pub label: &'a Ident<'a>,
    pub body: Statement<'a>,
}

#[derive(Debug)]
pub struct DebuggerStatement {
    pub range: TextRange,
}

// ============================================================================
// TypeScript declarations
// ============================================================================

#[derive(Debug)]
pub struct TsEnumDeclaration<'a> {
    pub range: TextRange,
    pub ident: &'a Ident<'a>,
    pub members: NodeList<'a, TsEnumMember<'a>>,
    pub is_const: bool,
    pub declare: bool,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy)]
pub struct TsEnumMember<'a> {
    pub range: TextRange,
    pub key: PropertyKey<'a>,
    pub init: Option<Expression<'a>>,
}

#[derive(Debug)]
pub struct TsInterfaceDeclaration<'a> {
    pub range: TextRange,
    pub ident: &'a Ident<'a>,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub extends: NodeList<'a, TsInterfaceHeritage<'a>>,
    pub body: NodeList<'a, TsTypeElement<'a>>,
    pub declare: bool,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy)]
pub struct TsInterfaceHeritage<'a> {
    pub range: TextRange,
    pub expr: TsEntityName<'a>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
}

#[derive(Debug)]
pub struct TsTypeAliasDeclaration<'a> {
    pub range: TextRange,
    pub ident: &'a Ident<'a>,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub type_ann: TsType<'a>,
    pub declare: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum TsModuleName<'a> {
    Ident(&'a Ident<'a>),
    String(&'a StringLit<'a>),
}

impl<'a> TsModuleName<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            TsModuleName::Ident(n) => n.range,
            TsModuleName::String(n) => n.range,
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            TsModuleName::Ident(n) => n.name,
            TsModuleName::String(n) => n.value,
        }
    }
}

#[derive(Debug)]
pub struct TsModuleDeclaration<'a> {
    pub range: TextRange,
    pub name: TsModuleName<'a>,
    /// `None` for a bodiless ambient shorthand (`declare module "m";`).
    pub body: Option<NodeList<'a, Statement<'a>>>,
    pub declare: bool,
    pub global: bool,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy)]
pub enum TsModuleRef<'a> {
    /// `require("...")`.
    External(&'a StringLit<'a>),
    Entity(TsEntityName<'a>),
}

#[derive(Debug)]
pub struct TsImportEqualsDeclaration<'a> {
    pub range: TextRange,
    pub ident: &'a Ident<'a>,
    pub module_ref: TsModuleRef<'a>,
    pub is_export: bool,
}

/// TS `export = expr`.
#[derive(Debug)]
pub struct TsExportAssignment<'a> {
    pub range: TextRange,
    pub expr: Expression<'a>,
}

// ============================================================================
// Imports and exports
// ============================================================================

#[derive(Debug)]
pub struct ImportDeclaration<'a> {
    pub range: TextRange,
    pub specifiers: NodeList<'a, ImportSpecifier<'a>>,
    pub source: &'a StringLit<'a>,
    pub type_only: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ImportSpecifier<'a> {
    Default(&'a ImportDefaultSpecifier<'a>),
    Namespace(&'a ImportNamespaceSpecifier<'a>),
    Named(&'a ImportNamedSpecifier<'a>),
}

#[derive(Debug)]
pub struct ImportDefaultSpecifier<'a> {
    pub range: TextRange,
    pub local: &'a Ident<'a>,
}

#[derive(Debug)]
pub struct ImportNamespaceSpecifier<'a> {
    pub range: TextRange,
    pub local: &'a Ident<'a>,
}

#[derive(Debug)]
pub struct ImportNamedSpecifier<'a> {
    pub range: TextRange,
    pub local: &'a Ident<'a>,
    pub imported: ModuleExportName<'a>,
    pub type_only: bool,
}

/// Import or export name, either an identifier or a string literal
/// (`export { x as "string name" }`).
#[derive(Debug, Clone, Copy)]
pub enum ModuleExportName<'a> {
    Ident(&'a Ident<'a>),
    String(&'a StringLit<'a>),
}

impl<'a> ModuleExportName<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            ModuleExportName::Ident(n) => n.range,
            ModuleExportName::String(n) => n.range,
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            ModuleExportName::Ident(n) => n.name,
            ModuleExportName::String(n) => n.value,
        }
    }
}

#[derive(Debug)]
pub struct ExportNamedDeclaration<'a> {
    pub range: TextRange,
    /// `export <declaration>` form.
    pub declaration: Option<Statement<'a>>,
    /// `export { ... }` form.
    pub specifiers: NodeList<'a, ExportSpecifier<'a>>,
    /// Set for re-exports (`export { x } from "m"`).
    pub source: Option<&'a StringLit<'a>>,
    pub type_only: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportSpecifier<'a> {
    pub range: TextRange,
    pub local: ModuleExportName<'a>,
    pub exported: ModuleExportName<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ExportDefaultPayload<'a> {
    Expr(Expression<'a>),
    Function(&'a FunctionDeclaration<'a>),
    Class(&'a ClassDeclaration<'a>),
    TsInterface(&'a TsInterfaceDeclaration<'a>),
}

#[derive(Debug)]
pub struct ExportDefaultDeclaration<'a> {
    pub range: TextRange,
    pub payload: ExportDefaultPayload<'a>,
}

#[derive(Debug)]
pub struct ExportAllDeclaration<'a> {
    pub range: TextRange,
    pub source: &'a StringLit<'a>,
    /// `export * as ns from "m"`.
    pub exported: Option<&'a Ident<'a>>,
}

// ============================================================================
// Type nodes
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum TsType<'a> {
    Keyword(&'a TsKeywordType),
    This(&'a TsThisType),
    Ref(&'a TsTypeRef<'a>),
    Union(&'a TsUnionType<'a>),
    Intersection(&'a TsIntersectionType<'a>),
    Array(&'a TsArrayType<'a>),
    IndexedAccess(&'a TsIndexedAccessType<'a>),
    Tuple(&'a TsTupleType<'a>),
    Function(&'a TsFnType<'a>),
    Constructor(&'a TsConstructorType<'a>),
    TypeLit(&'a TsTypeLit<'a>),
    Typeof(&'a TsTypeQuery<'a>),
    Literal(&'a TsLitType<'a>),
    Predicate(&'a TsTypePredicate<'a>),
    Operator(&'a TsTypeOperator<'a>),
    Paren(&'a TsParenType<'a>),
    Import(&'a TsImportType<'a>),
}

impl<'a> TsType<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            TsType::Keyword(n) => n.range,
            TsType::This(n) => n.range,
            TsType::Ref(n) => n.range,
            TsType::Union(n) => n.range,
            TsType::Intersection(n) => n.range,
            TsType::Array(n) => n.range,
            TsType::IndexedAccess(n) => n.range,
            TsType::Tuple(n) => n.range,
            TsType::Function(n) => n.range,
            TsType::Constructor(n) => n.range,
            TsType::TypeLit(n) => n.range,
            TsType::Typeof(n) => n.range,
            TsType::Literal(n) => n.range,
            TsType::Predicate(n) => n.range,
            TsType::Operator(n) => n.range,
            TsType::Paren(n) => n.range,
            TsType::Import(n) => n.range,
        }
    }
}

#[derive(Debug)]
pub struct TsKeywordType {
    pub range: TextRange,
    pub kind: TsKeywordTypeKind,
}

#[derive(Debug)]
pub struct TsThisType {
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy)]
pub enum TsEntityName<'a> {
    Ident(&'a Ident<'a>),
    Qualified(&'a TsQualifiedName<'a>),
}

impl<'a> TsEntityName<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            TsEntityName::Ident(n) => n.range,
            TsEntityName::Qualified(n) => n.range,
        }
    }

    /// Leftmost identifier of the name, the one subject to binding.
    pub fn base_ident(&self) -> &'a Ident<'a> {
        match self {
            TsEntityName::Ident(n) => n,
            TsEntityName::Qualified(q) => q.left.base_ident(),
        }
    }
}

#[derive(Debug)]
pub struct TsQualifiedName<'a> {
    pub range: TextRange,
    pub left: TsEntityName<'a>,
    pub right: &'a Ident<'a>,
}

#[derive(Debug)]
pub struct TsTypeRef<'a> {
    pub range: TextRange,
    pub name: TsEntityName<'a>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
}

#[derive(Debug)]
pub struct TsUnionType<'a> {
    pub range: TextRange,
    pub types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug)]
pub struct TsIntersectionType<'a> {
    pub range: TextRange,
    pub types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug)]
pub struct TsArrayType<'a> {
    pub range: TextRange,
    pub element: TsType<'a>,
}

#[derive(Debug)]
pub struct TsIndexedAccessType<'a> {
    pub range: TextRange,
    pub object: TsType<'a>,
    pub index: TsType<'a>,
}

#[derive(Debug)]
pub struct TsTupleType<'a> {
    pub range: TextRange,
    pub elements: NodeList<'a, TsTupleElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTupleElement<'a> {
    pub range: TextRange,
    pub label: Option<&'a Ident<'a>>,
    pub ty: TsType<'a>,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Debug)]
pub struct TsFnType<'a> {
    pub range: TextRange,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: TsType<'a>,
}

#[derive(Debug)]
pub struct TsConstructorType<'a> {
    pub range: TextRange,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: TsType<'a>,
    pub is_abstract: bool,
}

#[derive(Debug)]
pub struct TsTypeLit<'a> {
    pub range: TextRange,
    pub members: NodeList<'a, TsTypeElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsTypeElement<'a> {
    Property(&'a TsPropertySignature<'a>),
    Method(&'a TsMethodSignature<'a>),
    Call(&'a TsCallSignature<'a>),
    Construct(&'a TsConstructSignature<'a>),
    Index(&'a TsIndexSignature<'a>),
}

#[derive(Debug)]
pub struct TsPropertySignature<'a> {
    pub range: TextRange,
    pub key: PropertyKey<'a>,
    pub type_ann: Option<TsType<'a>>,
    pub optional: bool,
    pub readonly: bool,
    pub computed: bool,
}

#[derive(Debug)]
pub struct TsMethodSignature<'a> {
    pub range: TextRange,
    pub kind: MethodKind,
    pub key: PropertyKey<'a>,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<TsType<'a>>,
    pub optional: bool,
    pub computed: bool,
}

#[derive(Debug)]
pub struct TsCallSignature<'a> {
    pub range: TextRange,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<TsType<'a>>,
}

#[derive(Debug)]
pub struct TsConstructSignature<'a> {
    pub range: TextRange,
    pub type_params: Option<&'a TsTypeParamDecl<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<TsType<'a>>,
}

#[derive(Debug)]
pub struct TsIndexSignature<'a> {
    pub range: TextRange,
    pub param: Param<'a>,
    pub type_ann: TsType<'a>,
    pub readonly: bool,
    pub is_static: bool,
}

#[derive(Debug)]
pub struct TsTypeQuery<'a> {
    pub range: TextRange,
    pub expr_name: TsEntityName<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsLit<'a> {
    Number(&'a NumberLit),
    String(&'a StringLit<'a>),
    Bool(&'a BoolLit),
    BigInt(&'a BigIntLit<'a>),
}

#[derive(Debug)]
pub struct TsLitType<'a> {
    pub range: TextRange,
    pub lit: TsLit<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsPredicateParam<'a> {
    Ident(&'a Ident<'a>),
    This(TextRange),
}

/// `param is T` / `asserts param`.
#[derive(Debug)]
pub struct TsTypePredicate<'a> {
    pub range: TextRange,
    pub param: TsPredicateParam<'a>,
    pub type_ann: Option<TsType<'a>>,
    pub asserts: bool,
}

#[derive(Debug)]
pub struct TsTypeOperator<'a> {
    pub range: TextRange,
    pub op: TsTypeOperatorKind,
    pub type_ann: TsType<'a>,
}

#[derive(Debug)]
pub struct TsParenType<'a> {
    pub range: TextRange,
    pub type_ann: TsType<'a>,
}

/// `import("m").T`.
#[derive(Debug)]
pub struct TsImportType<'a> {
    pub range: TextRange,
    pub source: &'a StringLit<'a>,
    pub qualifier: Option<TsEntityName<'a>>,
    pub type_args: Option<&'a TsTypeArgs<'a>>,
}

#[derive(Debug)]
pub struct TsTypeParamDecl<'a> {
    pub range: TextRange,
    pub params: NodeList<'a, TsTypeParam<'a>>,
}

/// `in`/`out` variance annotations on a type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsVariance {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeParam<'a> {
    pub range: TextRange,
    pub name: &'a Ident<'a>,
    pub variance: Option<TsVariance>,
    pub constraint: Option<TsType<'a>>,
    pub default: Option<TsType<'a>>,
}

#[derive(Debug)]
pub struct TsTypeArgs<'a> {
    pub range: TextRange,
    pub args: NodeList<'a, TsType<'a>>,
}
