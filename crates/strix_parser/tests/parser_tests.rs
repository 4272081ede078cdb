//! Parser integration tests.
//!
//! Each test parses a small source and checks either the AST shape, the
//! module record, or the exact error message.

use bumpalo::Bump;
use strix_ast::{BinaryOp, Expression, Pattern, ScriptExtension, ScriptKind, Statement};
use strix_parser::ParserImpl;

fn statement_count(source: &str) -> usize {
    let arena = Bump::new();
    let parser = ParserImpl::new(ScriptExtension::Ts);
    let program = parser
        .parse(&arena, "test.ts", source, "test.ts", ScriptKind::Module)
        .unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    program.ast.statements.len()
}

fn parse_error(source: &str) -> String {
    let arena = Bump::new();
    let parser = ParserImpl::new(ScriptExtension::Ts);
    match parser.parse(&arena, "test.ts", source, "test.ts", ScriptKind::Module) {
        Ok(_) => panic!("expected a parse error for {source:?}"),
        Err(e) => e.message,
    }
}

fn parse_error_js_script(source: &str) -> String {
    let arena = Bump::new();
    let parser = ParserImpl::new(ScriptExtension::Js);
    match parser.parse(&arena, "test.js", source, "test.js", ScriptKind::Script) {
        Ok(_) => panic!("expected a parse error for {source:?}"),
        Err(e) => e.message,
    }
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn const_declaration() {
    assert_eq!(statement_count("const x = 42;"), 1);
}

#[test]
fn multiple_declarations() {
    assert_eq!(statement_count("const a = 1; let b = 2; var c = 3;"), 3);
}

#[test]
fn typed_declaration() {
    assert_eq!(statement_count("const x: number = 42;"), 1);
}

#[test]
fn function_declaration() {
    assert_eq!(statement_count("function foo(a: string, b = 1) { return a; }"), 1);
}

#[test]
fn for_of_with_destructuring() {
    assert_eq!(
        statement_count("const pairs: [string, number][] = []; for (const [a, b] of pairs) { a; b; }"),
        2
    );
}

#[test]
fn missing_const_initializer_is_rejected() {
    assert_eq!(parse_error("const x;"), "Missing initializer in const declaration");
}

#[test]
fn lexical_in_single_statement_is_rejected() {
    assert_eq!(
        parse_error("if (true) let x = 1;"),
        "Lexical declaration is not allowed in single statement context"
    );
}

#[test]
fn redeclaration_is_rejected() {
    assert_eq!(parse_error("let x = 1; let x = 2;"), "Variable 'x' has already been declared.");
}

#[test]
fn var_merges_with_var() {
    assert_eq!(statement_count("var x = 1; var x = 2;"), 2);
}

#[test]
fn return_outside_function_is_rejected() {
    assert_eq!(parse_error("return 1;"), "return keyword should be used in function body");
}

#[test]
fn labeled_continue_requires_iteration() {
    assert_eq!(
        parse_error("foo: { continue foo; }"),
        "A 'continue' statement can only jump to a label of an enclosing iteration statement"
    );
}

// ============================================================================
// Expressions
// ============================================================================

fn first_expression<'a>(program: &strix_parser::Program<'a>) -> Expression<'a> {
    match program.ast.statements[0] {
        Statement::Expr(stmt) => stmt.expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn subtraction_is_left_associative() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "a - b - c;", "t.js", ScriptKind::Script)
        .unwrap();
    match first_expression(&program) {
        Expression::Binary(outer) => {
            assert_eq!(outer.op, BinaryOp::Subtract);
            assert!(
                matches!(outer.left, Expression::Binary(inner) if inner.op == BinaryOp::Subtract)
            );
            assert!(matches!(outer.right, Expression::Ident(id) if id.name == "c"));
        }
        other => panic!("expected a binary expression, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "a + b * c;", "t.js", ScriptKind::Script)
        .unwrap();
    match first_expression(&program) {
        Expression::Binary(outer) => {
            assert_eq!(outer.op, BinaryOp::Add);
            assert!(matches!(outer.left, Expression::Ident(id) if id.name == "a"));
            assert!(
                matches!(outer.right, Expression::Binary(inner) if inner.op == BinaryOp::Multiply)
            );
        }
        other => panic!("expected a binary expression, got {other:?}"),
    }
}

#[test]
fn exponentiation_is_right_associative() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "a ** b ** c;", "t.js", ScriptKind::Script)
        .unwrap();
    match first_expression(&program) {
        Expression::Binary(outer) => {
            assert_eq!(outer.op, BinaryOp::Exponent);
            assert!(matches!(outer.left, Expression::Ident(id) if id.name == "a"));
            assert!(
                matches!(outer.right, Expression::Binary(inner) if inner.op == BinaryOp::Exponent)
            );
        }
        other => panic!("expected a binary expression, got {other:?}"),
    }
}

#[test]
fn grouping_defeats_rotation() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "a * (b + c);", "t.js", ScriptKind::Script)
        .unwrap();
    match first_expression(&program) {
        Expression::Binary(outer) => {
            assert_eq!(outer.op, BinaryOp::Multiply);
            assert!(matches!(outer.right, Expression::Paren(_)));
        }
        other => panic!("expected a binary expression, got {other:?}"),
    }
}

#[test]
fn nullish_mixed_with_logical_needs_parens() {
    assert_eq!(
        parse_error("a ?? b || c;"),
        "Nullish coalescing operator ?? requires parens when mixing with logical operators"
    );
}

#[test]
fn unparenthesized_exponent_of_unary_is_rejected() {
    assert_eq!(
        parse_error("-a ** b;"),
        "Illegal expression. Wrap left hand side or entire exponentiation in parentheses."
    );
}

#[test]
fn optional_chain_shapes() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "a?.b.c;", "t.js", ScriptKind::Script)
        .unwrap();
    match first_expression(&program) {
        Expression::Chain(chain) => {
            assert!(matches!(chain.expression, Expression::Member(_)));
        }
        other => panic!("expected a chain expression, got {other:?}"),
    }
}

#[test]
fn template_literal_with_substitutions() {
    assert_eq!(statement_count("const s = `a${1 + 2}b${x}c`;"), 1);
}

#[test]
fn await_outside_async_is_rejected() {
    assert_eq!(
        parse_error_js_script("function f() { return await p; }"),
        "'await' is only allowed within async functions"
    );
}

// ============================================================================
// Arrow functions
// ============================================================================

#[test]
fn arrow_with_destructured_params() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "(a, {b, c: [d, ...e]}) => a;", "t.js", ScriptKind::Script)
        .unwrap();
    match first_expression(&program) {
        Expression::Arrow(func) => {
            assert_eq!(func.params.len(), 2);
        }
        other => panic!("expected an arrow function, got {other:?}"),
    }
}

#[test]
fn invalid_arrow_parameter_is_rejected() {
    assert_eq!(parse_error("(a + 1) => a;"), "Unexpected token, arrow (=>)");
}

#[test]
fn async_arrow_single_param() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "async x => x;", "t.js", ScriptKind::Script)
        .unwrap();
    assert!(matches!(first_expression(&program), Expression::Arrow(_)));
}

#[test]
fn generic_arrow_in_ts() {
    assert_eq!(statement_count("const id = <T>(x: T): T => x;"), 1);
}

#[test]
fn generic_arrow_shapes() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Ts)
        .parse(&arena, "t.ts", "<T, U>(a: T, b = 1, ...rest: U[]) => a;", "t.ts", ScriptKind::Module)
        .unwrap();
    match first_expression(&program) {
        Expression::Arrow(func) => {
            assert_eq!(func.type_params.unwrap().params.len(), 2);
            assert_eq!(func.params.len(), 3);
            assert!(func.return_type.is_none());
        }
        other => panic!("expected an arrow function, got {other:?}"),
    }
}

#[test]
fn newline_before_arrow_is_rejected() {
    assert_eq!(
        parse_error("const f = (a, b)\n=> a;"),
        "expected '=>' on the same line after an argument list"
    );
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn class_with_private_field() {
    assert_eq!(
        statement_count("class A { #count = 0; increment() { this.#count++; } }"),
        1
    );
}

#[test]
fn multiple_constructor_implementations_are_rejected() {
    assert_eq!(
        parse_error("class A { constructor() {} constructor() {} }"),
        "Multiple constructor implementations are not allowed"
    );
}

#[test]
fn generator_constructor_is_rejected() {
    assert_eq!(
        parse_error("class A { *constructor() {} }"),
        "Class constructor can not be a getter, setter, async or generator"
    );
}

#[test]
fn accessor_pair_over_private_field() {
    assert_eq!(
        statement_count(
            "class A { #x = 1; get val() { return this.#x; } set val(v) { this.#x = v; } }"
        ),
        1
    );
}

#[test]
fn getter_with_parameter_is_rejected() {
    assert_eq!(
        parse_error("class A { get x(a) {} }"),
        "A 'get' accessor cannot have parameters"
    );
}

#[test]
fn setter_arity_is_checked() {
    assert_eq!(
        parse_error("class A { set prop() {} }"),
        "A 'set' accessor must have exactly one parameter"
    );
}

#[test]
fn member_modifier_order_is_enforced() {
    assert_eq!(parse_error("class A { async static m() {} }"), "Unexpected modifier");
    assert_eq!(parse_error("class A { readonly static x = 1; }"), "Unexpected modifier");
    assert_eq!(
        parse_error("class A { declare abstract x: number; }"),
        "Unexpected modifier"
    );
    assert_eq!(parse_error("class A { async public m() {} }"), "Unexpected modifier");
}

#[test]
fn member_modifiers_in_canonical_order() {
    assert_eq!(
        statement_count(
            "abstract class A { public static readonly x = 1; protected abstract m(): void; static async run() {} }"
        ),
        1
    );
}

#[test]
fn constructor_overloads_merge_with_implementation() {
    assert_eq!(
        statement_count(
            "class A { constructor(a: string); constructor(a: number); constructor(a: unknown) {} }"
        ),
        1
    );
}

#[test]
fn parameter_properties_parse() {
    assert_eq!(
        statement_count("class A { constructor(private readonly x: number, public y: string) {} }"),
        1
    );
}

#[test]
fn class_and_member_decorators_parse() {
    assert_eq!(
        statement_count("@sealed class A { @readonly x = 1; @log(2) m() {} }"),
        1
    );
}

#[test]
fn decorator_without_class_is_rejected() {
    assert_eq!(parse_error("@dec function f() {}"), "Decorators are not valid here");
}

// ============================================================================
// TypeScript declarations and types
// ============================================================================

#[test]
fn interface_declaration() {
    assert_eq!(
        statement_count(
            "interface User { id: number; name?: string; readonly tag: string; greet(): void; }"
        ),
        1
    );
}

#[test]
fn type_parameter_variance_modifiers() {
    assert_eq!(
        statement_count("interface Box<in T, out U, in out V> { unwrap(): U; }"),
        1
    );
}

#[test]
fn template_literal_type_is_a_string_literal() {
    assert_eq!(statement_count("type Tag = `section`;"), 1);
}

#[test]
fn export_assignment_parses() {
    assert_eq!(statement_count("const config = {}; export = config;"), 2);
}

#[test]
fn exported_import_equals_adds_local_export() {
    let record = parse_module_record("export import Alias = Lib.Thing;");
    assert_eq!(record.local_export_entries().len(), 1);
    assert_eq!(
        record.local_export_entries()[0].export_name.as_deref(),
        Some("Alias")
    );
}

#[test]
fn type_alias_with_union_and_tuple() {
    assert_eq!(
        statement_count("type Pair = [first: string, second?: number] | null;"),
        1
    );
}

#[test]
fn function_type_and_indexed_access() {
    assert_eq!(
        statement_count("type Handler = (e: Event) => void; type V = Config['values'][number];"),
        2
    );
}

#[test]
fn const_enum_declaration() {
    assert_eq!(statement_count("const enum Direction { Up, Down = 10, Left, Right }"), 1);
}

#[test]
fn namespace_with_exports() {
    assert_eq!(
        statement_count("namespace Geometry { export const PI = 3.14159; export function area(r: number) { return PI * r * r; } }"),
        1
    );
}

#[test]
fn ambient_initializer_is_rejected() {
    assert_eq!(
        parse_error("declare const x: number = 1;"),
        "Initializers are not allowed in ambient contexts"
    );
}

#[test]
fn ambient_function_body_is_rejected() {
    assert_eq!(
        parse_error("declare function f(): void {}"),
        "An implementation cannot be declared in ambient contexts"
    );
}

#[test]
fn type_assertion_expression() {
    assert_eq!(statement_count("const n = <number>value;"), 1);
}

#[test]
fn as_cast_expression() {
    assert_eq!(statement_count("const n = value as number;"), 1);
}

#[test]
fn generic_call_disambiguation() {
    // `f<T>(x)` is a generic call in TS; `a < b > (c)` stays a comparison.
    assert_eq!(statement_count("f<number>(1);"), 1);
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.js", "a < b > (c);", "t.js", ScriptKind::Script)
        .unwrap();
    assert!(matches!(first_expression(&program), Expression::Binary(_)));
}

#[test]
fn generic_call_ending_the_script_is_rejected() {
    assert_eq!(parse_error("f<number>"), "'(' or '`' expected");
}

#[test]
fn left_shift_is_not_a_generic_call() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Ts)
        .parse(&arena, "t.ts", "a << b;", "t.ts", ScriptKind::Module)
        .unwrap();
    match first_expression(&program) {
        Expression::Binary(bin) => assert_eq!(bin.op, BinaryOp::LeftShift),
        other => panic!("expected a binary expression, got {other:?}"),
    }
}

// ============================================================================
// Modules
// ============================================================================

fn parse_module_record(source: &str) -> strix_module::SourceTextModuleRecord {
    let arena = Bump::new();
    let parser = ParserImpl::new(ScriptExtension::Ts);
    let program = parser
        .parse(&arena, "test.ts", source, "test.ts", ScriptKind::Module)
        .unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    program.module_record.expect("module parse must produce a record")
}

#[test]
fn import_entries_are_recorded() {
    let record = parse_module_record("import def, { a, b as c } from 'mod'; import * as ns from 'other';");
    assert_eq!(record.module_requests(), ["mod", "other"]);
    let regular = record.regular_import_entries();
    assert_eq!(regular.len(), 3);
    assert_eq!(regular[0].local_name, "def");
    assert_eq!(regular[0].import_name.as_deref(), Some("default"));
    assert_eq!(regular[2].local_name, "c");
    assert_eq!(regular[2].import_name.as_deref(), Some("b"));
    let namespace = record.namespace_import_entries();
    assert_eq!(namespace.len(), 1);
    assert_eq!(namespace[0].local_name, "ns");
    assert_eq!(namespace[0].import_name, None);
}

#[test]
fn module_requests_are_deduplicated() {
    let record = parse_module_record("import { a } from 'm'; import { b } from 'm';");
    assert_eq!(record.module_requests(), ["m"]);
}

#[test]
fn local_exports_are_recorded() {
    let record = parse_module_record("export const x = 1, y = 2; export function f() {}");
    let locals = record.local_export_entries();
    assert_eq!(locals.len(), 3);
    assert_eq!(locals[0].export_name.as_deref(), Some("x"));
    assert_eq!(locals[2].export_name.as_deref(), Some("f"));
}

#[test]
fn export_star_as_namespace_desugars() {
    let record = parse_module_record("export * as ns from 'm';");
    let namespace = record.namespace_import_entries();
    assert_eq!(namespace.len(), 1);
    assert_eq!(namespace[0].local_name, "=ens0");
    let locals = record.local_export_entries();
    assert_eq!(locals.len(), 1);
    assert_eq!(locals[0].export_name.as_deref(), Some("ns"));
    assert_eq!(locals[0].local_name.as_deref(), Some("=ens0"));
}

#[test]
fn indirect_exports_are_recorded() {
    let record = parse_module_record("export { a, b as c } from 'm';");
    let indirect = record.indirect_export_entries();
    assert_eq!(indirect.len(), 2);
    assert_eq!(indirect[1].export_name.as_deref(), Some("c"));
    assert_eq!(indirect[1].import_name.as_deref(), Some("b"));
}

#[test]
fn duplicate_export_name_is_rejected() {
    assert_eq!(
        parse_error("export const ns = 1; export * as ns from 'm';"),
        "Duplicate export name of 'ns'"
    );
}

#[test]
fn default_export_of_expression() {
    let record = parse_module_record("export default 1 + 2;");
    let locals = record.local_export_entries();
    assert_eq!(locals.len(), 1);
    assert_eq!(locals[0].export_name.as_deref(), Some("default"));
    assert_eq!(locals[0].local_name.as_deref(), Some("*default*"));
}

#[test]
fn default_export_of_named_function() {
    let record = parse_module_record("export default function main() {}");
    let locals = record.local_export_entries();
    assert_eq!(locals[0].export_name.as_deref(), Some("default"));
    assert_eq!(locals[0].local_name.as_deref(), Some("main"));
}

#[test]
fn import_in_script_is_rejected() {
    assert_eq!(
        parse_error_js_script("import { a } from 'm';"),
        "'import' and 'export' may appear only with 'sourceType: module'"
    );
}

#[test]
fn export_in_nested_scope_is_rejected() {
    assert_eq!(
        parse_error("function f() { export const x = 1; }"),
        "'import' and 'export' may only appear at the top level"
    );
}

#[test]
fn import_type_is_marked() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Ts)
        .parse(&arena, "t.ts", "import type { User } from 'm';", "t.ts", ScriptKind::Module)
        .unwrap();
    match program.ast.statements[0] {
        Statement::Import(decl) => assert!(decl.type_only),
        other => panic!("expected an import declaration, got {other:?}"),
    }
}

#[test]
fn side_effect_import() {
    let record = parse_module_record("import 'polyfill';");
    assert_eq!(record.module_requests(), ["polyfill"]);
    assert!(record.regular_import_entries().is_empty());
}

#[test]
fn dynamic_import_is_an_expression() {
    assert_eq!(statement_count("const p = import('./m');"), 1);
}

#[test]
fn import_meta_requires_module() {
    assert_eq!(statement_count("const url = import.meta.url;"), 1);
    assert_eq!(
        parse_error_js_script("const url = import.meta.url;"),
        "'import.meta' may appear only with 'sourceType: module'"
    );
}

#[test]
fn import_equals_with_require() {
    assert_eq!(statement_count("import fs = require('fs');"), 1);
}

// ============================================================================
// CommonJS
// ============================================================================

#[test]
fn commonjs_source_is_wrapped() {
    let arena = Bump::new();
    let program = ParserImpl::new(ScriptExtension::Js)
        .parse(&arena, "t.cjs", "module.exports = 1;", "t.cjs", ScriptKind::CommonJs)
        .unwrap();
    assert_eq!(program.ast.statements.len(), 1);
    let call = match first_expression(&program) {
        Expression::Call(call) => call,
        other => panic!("expected the wrapper call, got {other:?}"),
    };
    // Reflect.apply(wrapper, exports, [exports, require, module, __filename, __dirname])
    assert!(matches!(call.callee, Expression::Member(_)));
    assert_eq!(call.arguments.len(), 3);
    let func = match call.arguments[0] {
        Expression::Function(f) => f,
        other => panic!("expected the wrapper function, got {other:?}"),
    };
    let names: Vec<&str> = func
        .params
        .iter()
        .map(|p| match p.pattern {
            Pattern::Ident(b) => b.ident.name,
            other => panic!("expected identifier parameters, got {other:?}"),
        })
        .collect();
    assert_eq!(names, ["exports", "require", "module", "__filename", "__dirname"]);
    assert!(matches!(call.arguments[1], Expression::Ident(id) if id.name == "exports"));
    assert!(matches!(call.arguments[2], Expression::Array(args) if args.elements.len() == 5));
}
