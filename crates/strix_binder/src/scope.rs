//! Lexical scopes and declarations.
//!
//! Scopes live in one flat table owned by the binder and reference each
//! other by [`ScopeId`]; the AST records the id of every scope-owning
//! node so the resolution pass can re-enter the same scopes.
//!
//! Value bindings and TypeScript-only bindings (namespaces, enums,
//! interfaces, import-equals aliases) are tracked in separate maps, so
//! `interface X` and `const X` may coexist while two `const X` may not.

use rustc_hash::{FxHashMap, FxHashSet};
use strix_ast::ScopeId;
use strix_core::intern::InternedString;
use strix_core::text::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    FunctionParam,
    Block,
    Loop,
    Catch,
    CatchParam,
    Class,
    TsModule,
    TypeParam,
}

impl ScopeKind {
    /// Scopes that own variable slots (targets of `var` hoisting are
    /// the function-like subset below).
    pub fn is_variable_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::TsModule
                | ScopeKind::Loop
        )
    }

    /// `var` declarations hoist to the nearest scope of this kind.
    pub fn is_function_variable_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global | ScopeKind::Module | ScopeKind::Function | ScopeKind::TsModule
        )
    }

    pub fn is_param_scope(self) -> bool {
        matches!(self, ScopeKind::FunctionParam | ScopeKind::CatchParam)
    }
}

/// What kind of declaration introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
    Class,
    /// `is_overload` marks a body-less signature that later
    /// declarations of the same name may merge with.
    Function { is_overload: bool },
    Param,
    Enum { is_const: bool },
    Interface,
    Namespace,
    ImportEquals,
    TypeParam,
}

impl DeclKind {
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            DeclKind::Let | DeclKind::Const | DeclKind::Class | DeclKind::TypeParam
        )
    }

    /// TS-only declarations kept apart from value bindings.
    pub fn is_ts_binding(self) -> bool {
        matches!(
            self,
            DeclKind::Enum { .. } | DeclKind::Interface | DeclKind::Namespace | DeclKind::ImportEquals
        )
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeclFlags: u8 {
        const NONE             = 0;
        /// Binding is exported from the enclosing module.
        const EXPORT           = 1 << 0;
        /// Binding was created by an import declaration.
        const IMPORT           = 1 << 1;
        /// `import * as ns` binding; exempt from TDZ-style checks.
        const NAMESPACE_IMPORT = 1 << 2;
    }
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub name: InternedString,
    pub kind: DeclKind,
    pub flags: DeclFlags,
    pub range: TextRange,
}

/// One lexical scope.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    bindings: FxHashMap<InternedString, Decl>,
    ts_bindings: FxHashMap<InternedString, Decl>,
    /// Names exported from a `namespace`/`module` body.
    export_vars: FxHashSet<InternedString>,
}

/// Outcome of trying to add a declaration to a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddDeclResult {
    Added,
    /// Compatible with an existing binding (`var`+`var`, overload
    /// merging, enum/interface/namespace merging).
    Merged,
    Conflict,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            bindings: FxHashMap::default(),
            ts_bindings: FxHashMap::default(),
            export_vars: FxHashSet::default(),
        }
    }

    pub fn find_local(&self, name: InternedString) -> Option<&Decl> {
        self.bindings.get(&name)
    }

    pub fn find_local_ts(&self, name: InternedString) -> Option<&Decl> {
        self.ts_bindings.get(&name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Decl> {
        self.bindings.values()
    }

    pub fn add_export_var(&mut self, name: InternedString) {
        self.export_vars.insert(name);
    }

    pub fn has_export_var(&self, name: InternedString) -> bool {
        self.export_vars.contains(&name)
    }

    /// Inserts a value binding, applying the per-kind compatibility
    /// rules against whatever currently occupies the slot.
    pub fn add_binding(&mut self, decl: Decl, typescript: bool) -> AddDeclResult {
        if decl.kind.is_ts_binding() {
            return self.add_ts_binding(decl);
        }

        let current = match self.bindings.get(&decl.name) {
            None => {
                self.bindings.insert(decl.name, decl);
                return AddDeclResult::Added;
            }
            Some(current) => current,
        };

        match decl.kind {
            DeclKind::Var => match current.kind {
                // The newest var declaration wins the slot.
                DeclKind::Var => {
                    self.bindings.insert(decl.name, decl);
                    AddDeclResult::Merged
                }
                DeclKind::Param | DeclKind::Function { .. } => AddDeclResult::Merged,
                _ => AddDeclResult::Conflict,
            },
            DeclKind::Function { is_overload } => {
                if typescript {
                    // Overload signatures merge; anything else clashes.
                    match current.kind {
                        DeclKind::Function { is_overload: true } => {
                            self.bindings.insert(decl.name, decl);
                            AddDeclResult::Merged
                        }
                        DeclKind::Function { is_overload: false } if is_overload => {
                            AddDeclResult::Merged
                        }
                        _ => AddDeclResult::Conflict,
                    }
                } else {
                    match current.kind {
                        DeclKind::Var | DeclKind::Function { .. } => {
                            self.bindings.insert(decl.name, decl);
                            AddDeclResult::Merged
                        }
                        _ => AddDeclResult::Conflict,
                    }
                }
            }
            DeclKind::Param => {
                if current.kind == DeclKind::Param {
                    AddDeclResult::Conflict
                } else {
                    self.bindings.insert(decl.name, decl);
                    AddDeclResult::Merged
                }
            }
            // Lexical declarations never share a slot.
            _ => AddDeclResult::Conflict,
        }
    }

    fn add_ts_binding(&mut self, decl: Decl) -> AddDeclResult {
        let current = match self.ts_bindings.get(&decl.name) {
            None => {
                self.ts_bindings.insert(decl.name, decl);
                return AddDeclResult::Added;
            }
            Some(current) => current,
        };

        let compatible = match (current.kind, decl.kind) {
            (DeclKind::Enum { is_const: a }, DeclKind::Enum { is_const: b }) => a == b,
            (DeclKind::Interface, DeclKind::Interface) => true,
            (DeclKind::Namespace, DeclKind::Namespace) => true,
            _ => false,
        };

        if compatible {
            AddDeclResult::Merged
        } else {
            AddDeclResult::Conflict
        }
    }
}
