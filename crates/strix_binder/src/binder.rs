//! The binder: declaration collection during parsing and identifier
//! resolution over the finished tree.

use rustc_hash::FxHashMap;
use strix_ast::*;
use strix_core::intern::{InternedString, StringInterner};
use strix_core::text::TextRange;
use tracing::trace;

use crate::scope::{AddDeclResult, Decl, DeclFlags, DeclKind, Scope, ScopeKind};

/// Binder-level failure, positioned by source offset. The caller owns
/// the line map and turns this into a located syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    pub message: String,
    pub pos: u32,
}

pub type BindResult<T> = Result<T, BindError>;

bitflags::bitflags! {
    /// Selects how much of the tree the resolution pass touches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResolveBindingFlags: u8 {
        /// Full resolution, plain JavaScript.
        const ALL = 1 << 0;
        /// TypeScript before transformation: type positions are not
        /// resolved so they cannot leak into runtime scope lookups.
        const TS_BEFORE_TRANSFORM = 1 << 1;
    }
}

/// Scope stack plus declaration table for one parse.
pub struct Binder {
    scopes: Vec<Scope>,
    current: ScopeId,
    typescript: bool,
    interner: StringInterner,
    /// Identifier start offset -> scope that declares the name.
    resolutions: FxHashMap<u32, ScopeId>,
}

impl Binder {
    pub fn new(kind: ScriptKind, extension: ScriptExtension, interner: StringInterner) -> Self {
        let top_kind = if kind.is_module() {
            ScopeKind::Module
        } else {
            ScopeKind::Global
        };
        Binder {
            scopes: vec![Scope::new(top_kind, None)],
            current: ScopeId(0),
            typescript: extension.is_typed(),
            interner,
            resolutions: FxHashMap::default(),
        }
    }

    pub fn top_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Opens a child of the current scope and makes it current.
    pub fn enter_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(self.current)));
        trace!(?kind, id = id.0, "enter scope");
        self.current = id;
        id
    }

    pub fn exit_scope(&mut self) {
        let parent = self.scopes[self.current.index()]
            .parent
            .unwrap_or(ScopeId(0));
        self.current = parent;
    }

    fn redeclaration_error(&self, name: InternedString, range: TextRange) -> BindError {
        BindError {
            message: format!(
                "Variable '{}' has already been declared.",
                self.interner.resolve(name)
            ),
            pos: range.pos,
        }
    }

    /// Registers a declaration in the current scope, hoisting `var` to
    /// the nearest function-like scope.
    pub fn add_decl(
        &mut self,
        name: InternedString,
        kind: DeclKind,
        flags: DeclFlags,
        range: TextRange,
    ) -> BindResult<()> {
        let decl = Decl {
            name,
            kind,
            flags,
            range,
        };

        if kind == DeclKind::Var {
            return self.add_var_decl(decl);
        }

        let typescript = self.typescript;
        let result = self.scopes[self.current.index()].add_binding(decl, typescript);
        if result == AddDeclResult::Conflict {
            return Err(self.redeclaration_error(name, range));
        }
        if flags.contains(DeclFlags::EXPORT) {
            self.scopes[self.current.index()].add_export_var(name);
        }
        Ok(())
    }

    /// `var` walks every scope on the way to its hoist target; a
    /// lexical binding of the same name anywhere on that path is a
    /// redeclaration.
    fn add_var_decl(&mut self, decl: Decl) -> BindResult<()> {
        let name = decl.name;
        let range = decl.range;
        let mut id = self.current;
        loop {
            let scope = &self.scopes[id.index()];
            if scope.kind.is_function_variable_scope() {
                break;
            }
            if let Some(existing) = scope.find_local(name) {
                if existing.kind.is_lexical() {
                    return Err(self.redeclaration_error(name, range));
                }
            }
            id = scope.parent.unwrap_or(ScopeId(0));
        }

        let export = decl.flags.contains(DeclFlags::EXPORT);
        let typescript = self.typescript;
        let result = self.scopes[id.index()].add_binding(decl, typescript);
        if result == AddDeclResult::Conflict {
            return Err(self.redeclaration_error(name, range));
        }
        if export {
            self.scopes[id.index()].add_export_var(name);
        }
        Ok(())
    }

    /// Adds one parameter binding into the active parameter scope.
    /// Duplicate parameter names are rejected outright.
    pub fn add_param_decl(&mut self, name: InternedString, range: TextRange) -> BindResult<()> {
        debug_assert!(self.scopes[self.current.index()].kind.is_param_scope());
        if self.scopes[self.current.index()].find_local(name).is_some() {
            return Err(self.redeclaration_error(name, range));
        }
        let decl = Decl {
            name,
            kind: DeclKind::Param,
            flags: DeclFlags::NONE,
            range,
        };
        self.scopes[self.current.index()].add_binding(decl, self.typescript);
        Ok(())
    }

    /// Finds a name by walking the scope chain upward from `from`.
    pub fn find(&self, from: ScopeId, name: InternedString) -> Option<(ScopeId, &Decl)> {
        let mut id = Some(from);
        while let Some(scope_id) = id {
            let scope = &self.scopes[scope_id.index()];
            if let Some(decl) = scope.find_local(name) {
                return Some((scope_id, decl));
            }
            id = scope.parent;
        }
        None
    }

    /// Scope that declares the identifier starting at `pos`, recorded
    /// by [`Binder::identifier_analysis`].
    pub fn resolution(&self, pos: u32) -> Option<ScopeId> {
        self.resolutions.get(&pos).copied()
    }

    // ------------------------------------------------------------------
    // End-of-parse resolution walk
    // ------------------------------------------------------------------

    /// Resolves identifier references over the completed tree and
    /// validates bare `export { x }` specifiers against the module
    /// scope.
    pub fn identifier_analysis(
        &mut self,
        statements: &[Statement<'_>],
        flags: ResolveBindingFlags,
    ) -> BindResult<()> {
        debug_assert_eq!(self.current, self.top_scope());
        let skip_types = flags.contains(ResolveBindingFlags::TS_BEFORE_TRANSFORM);
        let mut walker = ResolveWalker {
            binder: self,
            skip_types,
        };
        for stmt in statements {
            walker.statement(stmt)?;
        }
        Ok(())
    }

    fn lookup_reference(&mut self, ident: &Ident<'_>) {
        if let Some((scope, _)) = self.find(self.current, ident.sym) {
            self.resolutions.insert(ident.range.pos, scope);
        }
    }
}

struct ResolveWalker<'b> {
    binder: &'b mut Binder,
    skip_types: bool,
}

impl<'b> ResolveWalker<'b> {
    fn in_scope(
        &mut self,
        id: ScopeId,
        f: impl FnOnce(&mut Self) -> BindResult<()>,
    ) -> BindResult<()> {
        let saved = self.binder.current;
        self.binder.current = id;
        let result = f(self);
        self.binder.current = saved;
        result
    }

    fn statement(&mut self, stmt: &Statement<'_>) -> BindResult<()> {
        match stmt {
            Statement::Block(block) => self.block(block),
            Statement::Empty(_) | Statement::Debugger(_) => Ok(()),
            Statement::Expr(expr) => self.expression(&expr.expr),
            Statement::Variable(decl) => self.variable_declaration(decl),
            Statement::Function(decl) => self.function(decl.function),
            Statement::Class(decl) => self.class(decl.definition),
            Statement::If(stmt) => {
                self.expression(&stmt.test)?;
                self.statement(&stmt.consequent)?;
                if let Some(alt) = &stmt.alternate {
                    self.statement(alt)?;
                }
                Ok(())
            }
            Statement::For(stmt) => self.in_scope(stmt.scope, |w| {
                if let Some(init) = &stmt.init {
                    w.for_init(init)?;
                }
                if let Some(test) = &stmt.test {
                    w.expression(test)?;
                }
                if let Some(update) = &stmt.update {
                    w.expression(update)?;
                }
                w.statement(&stmt.body)
            }),
            Statement::ForIn(stmt) => self.in_scope(stmt.scope, |w| {
                w.for_init(&stmt.left)?;
                w.expression(&stmt.right)?;
                w.statement(&stmt.body)
            }),
            Statement::ForOf(stmt) => self.in_scope(stmt.scope, |w| {
                w.for_init(&stmt.left)?;
                w.expression(&stmt.right)?;
                w.statement(&stmt.body)
            }),
            Statement::While(stmt) => {
                self.expression(&stmt.test)?;
                self.statement(&stmt.body)
            }
            Statement::DoWhile(stmt) => {
                self.statement(&stmt.body)?;
                self.expression(&stmt.test)
            }
            Statement::Switch(stmt) => {
                self.expression(&stmt.discriminant)?;
                self.in_scope(stmt.scope, |w| {
                    for case in stmt.cases {
                        if let Some(test) = &case.test {
                            w.expression(test)?;
                        }
                        for s in case.consequent {
                            w.statement(s)?;
                        }
                    }
                    Ok(())
                })
            }
            Statement::Break(_) | Statement::Continue(_) => Ok(()),
            Statement::Return(stmt) => match &stmt.argument {
                Some(arg) => self.expression(arg),
                None => Ok(()),
            },
            Statement::Throw(stmt) => self.expression(&stmt.argument),
            Statement::Try(stmt) => {
                self.block(stmt.block)?;
                if let Some(handler) = stmt.handler {
                    self.in_scope(handler.param_scope, |w| {
                        if let Some(param) = &handler.param {
                            w.pattern(param)?;
                        }
                        w.block(handler.body)
                    })?;
                }
                if let Some(finalizer) = stmt.finalizer {
                    self.block(finalizer)?;
                }
                Ok(())
            }
            Statement::Labeled(stmt) => self.statement(&stmt.body),
            Statement::TsEnum(decl) => self.in_scope(decl.scope, |w| {
                for member in decl.members {
                    if let Some(init) = &member.init {
                        w.expression(init)?;
                    }
                }
                Ok(())
            }),
            Statement::TsInterface(_) | Statement::TsTypeAlias(_) => Ok(()),
            Statement::TsModule(decl) => match &decl.body {
                Some(body) => self.in_scope(decl.scope, |w| {
                    for s in *body {
                        w.statement(s)?;
                    }
                    Ok(())
                }),
                None => Ok(()),
            },
            Statement::TsImportEquals(_) | Statement::Import(_) => Ok(()),
            Statement::TsExportAssignment(decl) => self.expression(&decl.expr),
            Statement::ExportNamed(decl) => self.export_named(decl),
            Statement::ExportDefault(decl) => match &decl.payload {
                ExportDefaultPayload::Expr(expr) => self.expression(expr),
                ExportDefaultPayload::Function(f) => self.function(f.function),
                ExportDefaultPayload::Class(c) => self.class(c.definition),
                ExportDefaultPayload::TsInterface(_) => Ok(()),
            },
            Statement::ExportAll(_) => Ok(()),
        }
    }

    fn export_named(&mut self, decl: &ExportNamedDeclaration<'_>) -> BindResult<()> {
        if let Some(inner) = &decl.declaration {
            return self.statement(inner);
        }
        if decl.source.is_some() || decl.type_only {
            return Ok(());
        }
        // `export { x }` requires x to resolve in the module scope.
        for spec in decl.specifiers {
            if let ModuleExportName::Ident(local) = &spec.local {
                if self.binder.find(self.binder.current, local.sym).is_none() {
                    return Err(BindError {
                        message: format!("Export name '{}' is not defined.", local.name),
                        pos: local.range.pos,
                    });
                }
                self.binder.lookup_reference(local);
            }
        }
        Ok(())
    }

    fn block(&mut self, block: &BlockStatement<'_>) -> BindResult<()> {
        self.in_scope(block.scope, |w| {
            for stmt in block.statements {
                w.statement(stmt)?;
            }
            Ok(())
        })
    }

    fn for_init(&mut self, init: &ForInit<'_>) -> BindResult<()> {
        match init {
            ForInit::Var(decl) => self.variable_declaration(decl),
            ForInit::Expr(expr) => self.expression(expr),
        }
    }

    fn variable_declaration(&mut self, decl: &VariableDeclaration<'_>) -> BindResult<()> {
        for declarator in decl.declarators {
            self.pattern(&declarator.id)?;
            if let Some(init) = &declarator.init {
                self.expression(init)?;
            }
        }
        Ok(())
    }

    /// Type positions are only resolved under full resolution; before
    /// the TS transform they must stay invisible to value lookups.
    fn ts_type(&mut self, ty: &TsType<'_>) -> BindResult<()> {
        if self.skip_types {
            return Ok(());
        }
        match ty {
            TsType::Ref(r) => {
                self.binder.lookup_reference(r.name.base_ident());
                Ok(())
            }
            TsType::Typeof(q) => {
                self.binder.lookup_reference(q.expr_name.base_ident());
                Ok(())
            }
            TsType::Union(u) => u.types.iter().try_for_each(|t| self.ts_type(t)),
            TsType::Intersection(i) => i.types.iter().try_for_each(|t| self.ts_type(t)),
            TsType::Array(a) => self.ts_type(&a.element),
            TsType::IndexedAccess(ia) => {
                self.ts_type(&ia.object)?;
                self.ts_type(&ia.index)
            }
            TsType::Tuple(t) => t.elements.iter().try_for_each(|e| self.ts_type(&e.ty)),
            TsType::Paren(p) => self.ts_type(&p.type_ann),
            TsType::Operator(op) => self.ts_type(&op.type_ann),
            _ => Ok(()),
        }
    }

    fn pattern(&mut self, pattern: &Pattern<'_>) -> BindResult<()> {
        match pattern {
            // Binding identifiers declare rather than reference.
            Pattern::Ident(id) => match &id.type_ann {
                Some(ty) => self.ts_type(ty),
                None => Ok(()),
            },
            Pattern::Array(arr) => {
                for elem in arr.elements.iter().flatten() {
                    self.pattern(elem)?;
                }
                Ok(())
            }
            Pattern::Object(obj) => {
                for prop in obj.properties {
                    match prop {
                        ObjectPatternProp::KeyValue(p) => {
                            if p.computed {
                                self.property_key(&p.key)?;
                            }
                            self.pattern(&p.value)?;
                        }
                        ObjectPatternProp::Rest(rest) => self.pattern(&rest.argument)?,
                    }
                }
                Ok(())
            }
            Pattern::Assign(assign) => {
                self.expression(&assign.default)?;
                self.pattern(&assign.target)
            }
            Pattern::Rest(rest) => self.pattern(&rest.argument),
        }
    }

    fn property_key(&mut self, key: &PropertyKey<'_>) -> BindResult<()> {
        if let PropertyKey::Computed(expr) = key {
            self.expression(expr)?;
        }
        Ok(())
    }

    fn function(&mut self, func: &ScriptFunction<'_>) -> BindResult<()> {
        self.in_scope(func.param_scope, |w| {
            for param in func.params {
                w.pattern(&param.pattern)?;
            }
            w.in_scope(func.scope, |w| match &func.body {
                Some(FunctionBody::Block(block)) => {
                    for stmt in block.statements {
                        w.statement(stmt)?;
                    }
                    Ok(())
                }
                Some(FunctionBody::Expr(expr)) => w.expression(expr),
                None => Ok(()),
            })
        })
    }

    fn class(&mut self, def: &ClassDefinition<'_>) -> BindResult<()> {
        if let Some(super_class) = &def.super_class {
            self.expression(super_class)?;
        }
        self.in_scope(def.scope, |w| {
            for element in def.body {
                match element {
                    ClassElement::Method(method) => {
                        w.property_key(&method.key)?;
                        w.function(method.function)?;
                    }
                    ClassElement::Property(prop) => {
                        w.property_key(&prop.key)?;
                        if let Some(value) = &prop.value {
                            w.expression(value)?;
                        }
                    }
                    ClassElement::IndexSignature(_) => {}
                }
            }
            Ok(())
        })
    }

    fn expression(&mut self, expr: &Expression<'_>) -> BindResult<()> {
        match expr {
            Expression::Ident(ident) => {
                self.binder.lookup_reference(ident);
                Ok(())
            }
            Expression::PrivateName(_)
            | Expression::Number(_)
            | Expression::BigInt(_)
            | Expression::String(_)
            | Expression::Bool(_)
            | Expression::Null(_)
            | Expression::Regex(_)
            | Expression::This(_)
            | Expression::Super(_)
            | Expression::MetaProperty(_) => Ok(()),
            Expression::Template(tpl) => {
                for e in tpl.expressions {
                    self.expression(e)?;
                }
                Ok(())
            }
            Expression::TaggedTemplate(tagged) => {
                self.expression(&tagged.tag)?;
                for e in tagged.quasi.expressions {
                    self.expression(e)?;
                }
                Ok(())
            }
            Expression::Array(arr) => {
                for elem in arr.elements.iter().flatten() {
                    self.expression(elem)?;
                }
                Ok(())
            }
            Expression::Object(obj) => {
                for member in obj.properties {
                    match member {
                        ObjectMember::Property(prop) => {
                            self.property_key(&prop.key)?;
                            self.expression(&prop.value)?;
                        }
                        ObjectMember::Spread(spread) => self.expression(&spread.argument)?,
                    }
                }
                Ok(())
            }
            Expression::Function(func) | Expression::Arrow(func) => self.function(func),
            Expression::Class(def) => self.class(def),
            Expression::Paren(paren) => self.expression(&paren.expr),
            Expression::Unary(unary) => self.expression(&unary.argument),
            Expression::Update(update) => self.expression(&update.argument),
            Expression::Binary(binary) => {
                self.expression(&binary.left)?;
                self.expression(&binary.right)
            }
            Expression::Assignment(assign) => {
                self.expression(&assign.left)?;
                self.expression(&assign.right)
            }
            Expression::Conditional(cond) => {
                self.expression(&cond.test)?;
                self.expression(&cond.consequent)?;
                self.expression(&cond.alternate)
            }
            Expression::Sequence(seq) => {
                for e in seq.expressions {
                    self.expression(e)?;
                }
                Ok(())
            }
            Expression::Call(call) => {
                self.expression(&call.callee)?;
                for arg in call.arguments {
                    self.expression(arg)?;
                }
                Ok(())
            }
            Expression::New(new) => {
                self.expression(&new.callee)?;
                if let Some(args) = &new.arguments {
                    for arg in *args {
                        self.expression(arg)?;
                    }
                }
                Ok(())
            }
            Expression::Member(member) => {
                self.expression(&member.object)?;
                if member.computed {
                    self.expression(&member.property)?;
                }
                Ok(())
            }
            Expression::Chain(chain) => self.expression(&chain.expression),
            Expression::Import(import) => self.expression(&import.source),
            Expression::Yield(y) => match &y.argument {
                Some(arg) => self.expression(arg),
                None => Ok(()),
            },
            Expression::Await(a) => self.expression(&a.argument),
            Expression::Spread(spread) => self.expression(&spread.argument),
            Expression::TsAs(e) => self.expression(&e.expr),
            Expression::TsTypeAssertion(e) => self.expression(&e.expr),
            Expression::TsNonNull(e) => self.expression(&e.expr),
        }
    }
}
