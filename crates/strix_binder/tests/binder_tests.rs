//! Binder unit tests: redeclaration rules, var hoisting, and the
//! TypeScript binding namespaces.

use strix_ast::{ScriptExtension, ScriptKind};
use strix_binder::{Binder, DeclFlags, DeclKind, ScopeKind};
use strix_core::intern::StringInterner;
use strix_core::text::TextRange;

fn binder(extension: ScriptExtension) -> (Binder, StringInterner) {
    let interner = StringInterner::new();
    let binder = Binder::new(ScriptKind::Script, extension, interner.clone());
    (binder, interner)
}

fn at(pos: u32) -> TextRange {
    TextRange::new(pos, pos + 1)
}

#[test]
fn var_var_redeclaration_allowed() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    b.add_decl(x, DeclKind::Var, DeclFlags::NONE, at(0)).unwrap();
    b.add_decl(x, DeclKind::Var, DeclFlags::NONE, at(10)).unwrap();
}

#[test]
fn let_redeclaration_rejected() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    b.add_decl(x, DeclKind::Let, DeclFlags::NONE, at(0)).unwrap();
    let err = b
        .add_decl(x, DeclKind::Let, DeclFlags::NONE, at(10))
        .unwrap_err();
    assert_eq!(err.message, "Variable 'x' has already been declared.");
    assert_eq!(err.pos, 10);
}

#[test]
fn var_then_let_and_let_then_var_both_rejected() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    b.add_decl(x, DeclKind::Var, DeclFlags::NONE, at(0)).unwrap();
    assert!(b.add_decl(x, DeclKind::Let, DeclFlags::NONE, at(10)).is_err());

    let y = i.intern("y");
    b.add_decl(y, DeclKind::Const, DeclFlags::NONE, at(20)).unwrap();
    assert!(b.add_decl(y, DeclKind::Var, DeclFlags::NONE, at(30)).is_err());
}

#[test]
fn class_conflicts_with_everything() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    b.add_decl(x, DeclKind::Class, DeclFlags::NONE, at(0)).unwrap();
    assert!(b.add_decl(x, DeclKind::Var, DeclFlags::NONE, at(10)).is_err());
    assert!(b.add_decl(x, DeclKind::Class, DeclFlags::NONE, at(20)).is_err());
}

#[test]
fn var_in_block_hoists_to_function_scope() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    let top = b.top_scope();
    b.enter_scope(ScopeKind::Block);
    b.add_decl(x, DeclKind::Var, DeclFlags::NONE, at(5)).unwrap();
    b.exit_scope();
    assert!(b.scope(top).find_local(x).is_some());
}

#[test]
fn hoisted_var_clashes_with_outer_let() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    b.add_decl(x, DeclKind::Let, DeclFlags::NONE, at(0)).unwrap();
    b.enter_scope(ScopeKind::Block);
    assert!(b.add_decl(x, DeclKind::Var, DeclFlags::NONE, at(10)).is_err());
}

#[test]
fn block_scoped_let_shadows_outer_let() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let x = i.intern("x");
    b.add_decl(x, DeclKind::Let, DeclFlags::NONE, at(0)).unwrap();
    let inner = b.enter_scope(ScopeKind::Block);
    b.add_decl(x, DeclKind::Let, DeclFlags::NONE, at(10)).unwrap();
    let (found_in, _) = b.find(inner, x).unwrap();
    assert_eq!(found_in, inner);
}

#[test]
fn function_overload_signatures_merge_in_typescript() {
    let (mut b, i) = binder(ScriptExtension::Ts);
    let f = i.intern("f");
    b.add_decl(f, DeclKind::Function { is_overload: true }, DeclFlags::NONE, at(0))
        .unwrap();
    b.add_decl(f, DeclKind::Function { is_overload: true }, DeclFlags::NONE, at(10))
        .unwrap();
    // Implementation after its signatures.
    b.add_decl(f, DeclKind::Function { is_overload: false }, DeclFlags::NONE, at(20))
        .unwrap();
    // A second implementation is a true redeclaration.
    assert!(b
        .add_decl(f, DeclKind::Function { is_overload: false }, DeclFlags::NONE, at(30))
        .is_err());
}

#[test]
fn function_redeclaration_allowed_in_js_only() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let f = i.intern("f");
    b.add_decl(f, DeclKind::Function { is_overload: false }, DeclFlags::NONE, at(0))
        .unwrap();
    b.add_decl(f, DeclKind::Function { is_overload: false }, DeclFlags::NONE, at(10))
        .unwrap();

    let (mut b, i) = binder(ScriptExtension::Ts);
    let f = i.intern("f");
    b.add_decl(f, DeclKind::Function { is_overload: false }, DeclFlags::NONE, at(0))
        .unwrap();
    assert!(b
        .add_decl(f, DeclKind::Function { is_overload: false }, DeclFlags::NONE, at(10))
        .is_err());
}

#[test]
fn enum_merging_requires_matching_constness() {
    let (mut b, i) = binder(ScriptExtension::Ts);
    let e = i.intern("E");
    b.add_decl(e, DeclKind::Enum { is_const: false }, DeclFlags::NONE, at(0))
        .unwrap();
    b.add_decl(e, DeclKind::Enum { is_const: false }, DeclFlags::NONE, at(10))
        .unwrap();
    assert!(b
        .add_decl(e, DeclKind::Enum { is_const: true }, DeclFlags::NONE, at(20))
        .is_err());
}

#[test]
fn interface_coexists_with_value_binding() {
    let (mut b, i) = binder(ScriptExtension::Ts);
    let x = i.intern("X");
    b.add_decl(x, DeclKind::Interface, DeclFlags::NONE, at(0)).unwrap();
    b.add_decl(x, DeclKind::Const, DeclFlags::NONE, at(10)).unwrap();
    b.add_decl(x, DeclKind::Interface, DeclFlags::NONE, at(20)).unwrap();
}

#[test]
fn namespace_merging() {
    let (mut b, i) = binder(ScriptExtension::Ts);
    let n = i.intern("N");
    b.add_decl(n, DeclKind::Namespace, DeclFlags::NONE, at(0)).unwrap();
    b.add_decl(n, DeclKind::Namespace, DeclFlags::NONE, at(10)).unwrap();
    assert!(b.add_decl(n, DeclKind::ImportEquals, DeclFlags::NONE, at(20)).is_err());
}

#[test]
fn duplicate_parameter_rejected() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let a = i.intern("a");
    b.enter_scope(ScopeKind::FunctionParam);
    b.add_param_decl(a, at(0)).unwrap();
    assert!(b.add_param_decl(a, at(5)).is_err());
}

#[test]
fn var_may_shadow_parameter() {
    let (mut b, i) = binder(ScriptExtension::Js);
    let a = i.intern("a");
    b.enter_scope(ScopeKind::FunctionParam);
    b.add_param_decl(a, at(0)).unwrap();
    // Function body scope sits inside the param scope.
    b.enter_scope(ScopeKind::Function);
    b.add_decl(a, DeclKind::Var, DeclFlags::NONE, at(10)).unwrap();
}

#[test]
fn exported_decl_recorded_as_export_var() {
    let interner = StringInterner::new();
    let mut b = Binder::new(ScriptKind::Module, ScriptExtension::Ts, interner.clone());
    let x = interner.intern("x");
    b.add_decl(x, DeclKind::Const, DeclFlags::EXPORT, at(0)).unwrap();
    let top = b.top_scope();
    assert!(b.scope(top).has_export_var(x));
}
