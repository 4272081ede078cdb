//! Import and export declarations.
//!
//! Every declaration updates both the binder (local bindings) and the
//! source-text module record (import/export entries). `export * as ns`
//! is desugared into a synthetic namespace import plus a local export
//! of that internal name.

use strix_ast::*;
use strix_binder::{DeclFlags, DeclKind};
use strix_core::text::TextRange;
use strix_diagnostics::{messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::context::{ExpressionParseFlags, ParserStatus, StatementParseFlags, VariableParseFlags};
use crate::parser_impl::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_import_statement(
        &mut self,
        flags: StatementParseFlags,
    ) -> Result<Statement<'a>> {
        let start = self.token_start();
        let saved = self.save();
        self.next()?;

        // `import(...)` and `import.meta` are expressions.
        if matches!(self.token_kind(), TokenKind::OpenParen | TokenKind::Dot) {
            self.rewind(saved);
            return self.parse_expression_statement();
        }

        // TS `import id = ...`.
        if self.is_ts() && self.token().is_identifier_like() {
            let after_import = self.save();
            let probe_ident = self.token().kw != Some(Kw::Type);
            self.next()?;
            if probe_ident && self.token().is(TokenKind::Eq) {
                self.rewind(saved);
                return self.parse_ts_import_equals(false);
            }
            self.rewind(after_import);
        }

        if !flags.contains(StatementParseFlags::GLOBAL) {
            return Err(self.error_at(start, messages::IMPORT_TOP_LEVEL));
        }
        if !self.kind.is_module() {
            return Err(self.error_at(start, messages::IMPORT_MODULE_ONLY));
        }

        // Side-effect import.
        if self.token().is(TokenKind::String) {
            let source = self.parse_string_literal()?;
            self.register_module_request(source.value);
            self.consume_semicolon()?;
            return Ok(Statement::Import(self.arena.alloc(ImportDeclaration {
                range: TextRange::new(start, source.range.end),
                specifiers: &[],
                source,
                type_only: false,
            })));
        }

        let type_only = self.eat_import_type_marker()?;

        let mut specifiers = Vec::new();
        let mut default_local: Option<&'a Ident<'a>> = None;
        let mut namespace_local: Option<&'a Ident<'a>> = None;
        let mut named: Vec<(&'a Ident<'a>, ModuleExportName<'a>, bool)> = Vec::new();

        if self.token().is_identifier_like() {
            let local = self.parse_ident()?;
            default_local = Some(local);
            specifiers.push(ImportSpecifier::Default(self.arena.alloc(
                ImportDefaultSpecifier { range: local.range, local },
            )));
            if self.eat(TokenKind::Comma)?
                && !matches!(self.token_kind(), TokenKind::Star | TokenKind::OpenBrace)
            {
                return Err(self.error_here(messages::UNEXPECTED_TOKEN));
            }
        }

        if self.token().is(TokenKind::Star) {
            let star_start = self.token_start();
            self.next()?;
            if !self.token().is_kw(Kw::As) {
                return Err(self.error_here("Unexpected token, expected 'as'"));
            }
            self.next()?;
            let local = self.parse_ident()?;
            namespace_local = Some(local);
            specifiers.push(ImportSpecifier::Namespace(self.arena.alloc(
                ImportNamespaceSpecifier {
                    range: TextRange::new(star_start, local.range.end),
                    local,
                },
            )));
        } else if self.token().is(TokenKind::OpenBrace) {
            self.next()?;
            while !self.token().is(TokenKind::CloseBrace) {
                let spec_type_only = !type_only && self.eat_import_type_marker()?;
                let imported = self.parse_module_export_name()?;
                let local = if self.token().is_kw(Kw::As) {
                    self.next()?;
                    self.parse_ident()?
                } else {
                    match imported {
                        ModuleExportName::Ident(id) => id,
                        ModuleExportName::String(_) => {
                            return Err(self.error_here("Unexpected token, expected 'as'"))
                        }
                    }
                };
                named.push((local, imported, spec_type_only));
                specifiers.push(ImportSpecifier::Named(self.arena.alloc(
                    ImportNamedSpecifier {
                        range: TextRange::new(imported.range().pos, local.range.end),
                        local,
                        imported,
                        type_only: spec_type_only,
                    },
                )));
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::CloseBrace)?;
        } else if default_local.is_none() {
            return Err(self.error_here(messages::UNEXPECTED_TOKEN));
        }

        if !self.token().is_kw(Kw::From) {
            return Err(self.error_here("Unexpected token, expected 'from'"));
        }
        self.next()?;
        if !self.token().is(TokenKind::String) {
            return Err(self.error_here(messages::UNEXPECTED_TOKEN));
        }
        let source = self.parse_string_literal()?;
        let request = self.register_module_request(source.value);

        if let Some(record) = self.module_record.as_mut() {
            if let Some(local) = default_local {
                record.add_import_entry(strix_module::ImportEntry {
                    local_name: local.name.to_owned(),
                    import_name: Some("default".to_owned()),
                    module_request: request,
                    range: local.range,
                });
            }
            if let Some(local) = namespace_local {
                record.add_star_import_entry(strix_module::ImportEntry {
                    local_name: local.name.to_owned(),
                    import_name: None,
                    module_request: request,
                    range: local.range,
                });
            }
            for (local, imported, _) in &named {
                record.add_import_entry(strix_module::ImportEntry {
                    local_name: local.name.to_owned(),
                    import_name: Some(imported.text().to_owned()),
                    module_request: request,
                    range: local.range,
                });
            }
        }

        if let Some(local) = default_local {
            self.add_import_binding(local, DeclFlags::IMPORT)?;
        }
        if let Some(local) = namespace_local {
            self.add_import_binding(local, DeclFlags::IMPORT | DeclFlags::NAMESPACE_IMPORT)?;
        }
        for (local, _, _) in &named {
            self.add_import_binding(local, DeclFlags::IMPORT)?;
        }

        self.consume_semicolon()?;
        Ok(Statement::Import(self.arena.alloc(ImportDeclaration {
            range: TextRange::new(start, source.range.end),
            specifiers: alloc_slice(self.arena, &specifiers),
            source,
            type_only,
        })))
    }

    /// Consumes a `type` marker if the token after it still leaves a
    /// valid import clause (`import type X`, `import type {..}`, but
    /// not `import type from "m"` or `{ type as x }`).
    fn eat_import_type_marker(&mut self) -> Result<bool> {
        if !self.is_ts() || !self.token().is_kw(Kw::Type) {
            return Ok(false);
        }
        let saved = self.save();
        self.next()?;
        let marker = match self.token_kind() {
            TokenKind::OpenBrace | TokenKind::Star => true,
            TokenKind::Ident => !self.token().is_kw(Kw::From) && !self.token().is_kw(Kw::As),
            _ => false,
        };
        if marker {
            Ok(true)
        } else {
            self.rewind(saved);
            Ok(false)
        }
    }

    fn parse_module_export_name(&mut self) -> Result<ModuleExportName<'a>> {
        if self.token().is(TokenKind::String) {
            return Ok(ModuleExportName::String(self.parse_string_literal()?));
        }
        if self.token().is_identifier_like() || self.token_kind().is_reserved_word() {
            let id = self.ident_from_token();
            self.next()?;
            return Ok(ModuleExportName::Ident(id));
        }
        Err(self.error_here(messages::IDENTIFIER_EXPECTED))
    }

    fn add_import_binding(&mut self, local: &'a Ident<'a>, flags: DeclFlags) -> Result<()> {
        self.binder
            .add_decl(local.sym, DeclKind::Const, flags, local.range)
            .map_err(|e| self.bind_error(e))
    }

    fn register_module_request(&mut self, specifier: &str) -> strix_module::ModuleRequestIdx {
        match self.module_record.as_mut() {
            Some(record) => record.add_module_request(specifier),
            None => 0,
        }
    }

    fn add_local_export(&mut self, export_name: &str, local_name: &str, range: TextRange) -> Result<()> {
        if let Some(record) = self.module_record.as_mut() {
            let entry = strix_module::ExportEntry::local(export_name, local_name, range);
            if !record.add_local_export_entry(entry) {
                return Err(self.error_at(
                    range.pos,
                    format!("Duplicate export name of '{export_name}'"),
                ));
            }
        }
        Ok(())
    }

    // ======================================================================
    // Exports
    // ======================================================================

    pub(crate) fn parse_export_statement(
        &mut self,
        flags: StatementParseFlags,
    ) -> Result<Statement<'a>> {
        let start = self.token_start();
        if !flags.contains(StatementParseFlags::GLOBAL) {
            return Err(self.error_at(start, messages::IMPORT_TOP_LEVEL));
        }
        if !self.kind.is_module() && !self.in_status(ParserStatus::TS_MODULE) {
            return Err(self.error_at(start, messages::IMPORT_MODULE_ONLY));
        }
        self.next()?;

        match self.token_kind() {
            TokenKind::Star => self.parse_export_all(start),
            TokenKind::Default => self.parse_export_default(start),
            TokenKind::OpenBrace => self.parse_named_exports(start, false),
            TokenKind::Eq if self.is_ts() => self.parse_ts_export_assignment(start),
            TokenKind::Import if self.is_ts() => self.parse_ts_import_equals(true),
            TokenKind::Ident
                if self.is_ts()
                    && self.token().is_kw(Kw::Type)
                    && self.lookahead_is(TokenKind::OpenBrace)? =>
            {
                self.next()?;
                self.parse_named_exports(start, true)
            }
            _ => self.parse_export_declaration(start),
        }
    }

    /// TS `export = expr`. No module-record entry; the assigned value
    /// replaces the module's export surface at transform time.
    fn parse_ts_export_assignment(&mut self, start: u32) -> Result<Statement<'a>> {
        self.expect(TokenKind::Eq)?;
        let expr = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
        self.consume_semicolon()?;
        Ok(Statement::TsExportAssignment(self.arena.alloc(
            TsExportAssignment {
                range: TextRange::new(start, expr.range().end),
                expr,
            },
        )))
    }

    /// `export * from "m"` and `export * as ns from "m"`. The latter is
    /// desugared into a namespace import under a synthetic internal name
    /// plus a local export of it.
    fn parse_export_all(&mut self, start: u32) -> Result<Statement<'a>> {
        self.expect(TokenKind::Star)?;
        let exported = if self.token().is_kw(Kw::As) {
            self.next()?;
            Some(self.parse_ident()?)
        } else {
            None
        };
        if !self.token().is_kw(Kw::From) {
            return Err(self.error_here("Unexpected token, expected 'from'"));
        }
        self.next()?;
        if !self.token().is(TokenKind::String) {
            return Err(self.error_here(messages::UNEXPECTED_TOKEN));
        }
        let source = self.parse_string_literal()?;
        let request = self.register_module_request(source.value);

        match exported {
            None => {
                if let Some(record) = self.module_record.as_mut() {
                    record.add_star_export_entry(strix_module::ExportEntry::star(
                        request,
                        source.range,
                    ));
                }
            }
            Some(ns) => {
                let internal = match self.module_record.as_mut() {
                    Some(record) => {
                        let internal = record.next_namespace_export_name();
                        record.add_star_import_entry(strix_module::ImportEntry {
                            local_name: internal.clone(),
                            import_name: None,
                            module_request: request,
                            range: ns.range,
                        });
                        internal
                    }
                    None => String::new(),
                };
                self.add_local_export(ns.name, &internal, ns.range)?;
                let sym = self.interner.intern(&internal);
                self.binder
                    .add_decl(
                        sym,
                        DeclKind::Const,
                        DeclFlags::IMPORT | DeclFlags::NAMESPACE_IMPORT | DeclFlags::EXPORT,
                        ns.range,
                    )
                    .map_err(|e| self.bind_error(e))?;
            }
        }

        self.consume_semicolon()?;
        Ok(Statement::ExportAll(self.arena.alloc(ExportAllDeclaration {
            range: TextRange::new(start, source.range.end),
            source,
            exported,
        })))
    }

    fn parse_export_default(&mut self, start: u32) -> Result<Statement<'a>> {
        self.expect(TokenKind::Default)?;
        let modifiers = ModifierFlags::EXPORT | ModifierFlags::DEFAULT;

        let (payload, local_name, local_range, end) = match self.token_kind() {
            TokenKind::Function => {
                let decl =
                    self.parse_function_declaration(start, FunctionFlags::NONE, modifiers, true)?;
                let (name, range) = self.default_local(decl.function.ident)?;
                (ExportDefaultPayload::Function(decl), name, range, decl.range.end)
            }
            TokenKind::Ident
                if self.token().is_kw(Kw::Async) && self.lookahead_is(TokenKind::Function)? =>
            {
                self.next()?;
                let decl =
                    self.parse_function_declaration(start, FunctionFlags::ASYNC, modifiers, true)?;
                let (name, range) = self.default_local(decl.function.ident)?;
                (ExportDefaultPayload::Function(decl), name, range, decl.range.end)
            }
            TokenKind::Class => {
                let class_start = self.token_start();
                match self.parse_class_statement_from(class_start, modifiers)? {
                    Statement::Class(decl) => {
                        let (name, range) = self.default_local(decl.definition.ident)?;
                        (ExportDefaultPayload::Class(decl), name, range, decl.range.end)
                    }
                    _ => unreachable!("class parse yields a class statement"),
                }
            }
            TokenKind::Ident
                if self.is_ts()
                    && self.token().is_kw(Kw::Interface)
                    && self.lookahead_is_identifier()? =>
            {
                match self.parse_ts_interface(false)? {
                    Statement::TsInterface(decl) => {
                        let name = decl.ident.name.to_owned();
                        (
                            ExportDefaultPayload::TsInterface(decl),
                            name,
                            decl.ident.range,
                            decl.range.end,
                        )
                    }
                    _ => unreachable!("interface parse yields an interface statement"),
                }
            }
            _ => {
                let expr = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
                self.consume_semicolon()?;
                let range = expr.range();
                let sym = self.interner.intern(strix_module::DEFAULT_LOCAL_NAME);
                self.binder
                    .add_decl(sym, DeclKind::Const, DeclFlags::EXPORT, range)
                    .map_err(|e| self.bind_error(e))?;
                (
                    ExportDefaultPayload::Expr(expr),
                    strix_module::DEFAULT_LOCAL_NAME.to_owned(),
                    range,
                    range.end,
                )
            }
        };

        self.add_local_export(strix_module::DEFAULT_EXTERNAL_NAME, &local_name, local_range)?;
        Ok(Statement::ExportDefault(self.arena.alloc(
            ExportDefaultDeclaration {
                range: TextRange::new(start, end),
                payload,
            },
        )))
    }

    /// Local slot for a default export: the declared name, or the
    /// synthetic `*default*` binding for anonymous payloads.
    fn default_local(
        &mut self,
        ident: Option<&'a Ident<'a>>,
    ) -> Result<(String, TextRange)> {
        match ident {
            Some(id) => Ok((id.name.to_owned(), id.range)),
            None => {
                let sym = self.interner.intern(strix_module::DEFAULT_LOCAL_NAME);
                self.binder
                    .add_decl(sym, DeclKind::Const, DeclFlags::EXPORT, TextRange::empty(0))
                    .map_err(|e| self.bind_error(e))?;
                Ok((strix_module::DEFAULT_LOCAL_NAME.to_owned(), TextRange::empty(0)))
            }
        }
    }

    fn parse_named_exports(&mut self, start: u32, type_only: bool) -> Result<Statement<'a>> {
        self.expect(TokenKind::OpenBrace)?;
        let mut specifiers = Vec::new();
        while !self.token().is(TokenKind::CloseBrace) {
            let spec_start = self.token_start();
            let local = self.parse_module_export_name()?;
            let exported = if self.token().is_kw(Kw::As) {
                self.next()?;
                self.parse_module_export_name()?
            } else {
                local
            };
            specifiers.push(ExportSpecifier {
                range: TextRange::new(spec_start, exported.range().end),
                local,
                exported,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        let mut end = self.expect(TokenKind::CloseBrace)?.end;

        let source = if self.token().is_kw(Kw::From) {
            self.next()?;
            if !self.token().is(TokenKind::String) {
                return Err(self.error_here(messages::UNEXPECTED_TOKEN));
            }
            let source = self.parse_string_literal()?;
            end = source.range.end;
            Some(source)
        } else {
            None
        };

        if !type_only {
            match source {
                Some(source) => {
                    let request = self.register_module_request(source.value);
                    for spec in &specifiers {
                        let export_name = spec.exported.text().to_owned();
                        let import_name = spec.local.text().to_owned();
                        let taken = match self.module_record.as_mut() {
                            Some(record) => !record.add_indirect_export_entry(
                                strix_module::ExportEntry::indirect(
                                    &export_name,
                                    &import_name,
                                    request,
                                    spec.range,
                                ),
                            ),
                            None => false,
                        };
                        if taken {
                            return Err(self.error_at(
                                spec.range.pos,
                                format!("Duplicate export name of '{export_name}'"),
                            ));
                        }
                    }
                }
                None => {
                    for spec in &specifiers {
                        let export_name = spec.exported.text().to_owned();
                        let local_name = spec.local.text().to_owned();
                        self.add_local_export(&export_name, &local_name, spec.range)?;
                    }
                }
            }
        }

        self.consume_semicolon()?;
        Ok(Statement::ExportNamed(self.arena.alloc(
            ExportNamedDeclaration {
                range: TextRange::new(start, end),
                declaration: None,
                specifiers: alloc_slice(self.arena, &specifiers),
                source,
                type_only,
            },
        )))
    }

    /// `export <declaration>`.
    fn parse_export_declaration(&mut self, start: u32) -> Result<Statement<'a>> {
        let declaration = match self.token_kind() {
            TokenKind::Var => self.parse_exported_variable(VariableKind::Var)?,
            TokenKind::Const => {
                if self.is_ts() && self.lookahead_is(TokenKind::Enum)? {
                    let enum_start = self.token_start();
                    self.next()?;
                    self.parse_exported_enum(enum_start, true)?
                } else {
                    self.parse_exported_variable(VariableKind::Const)?
                }
            }
            TokenKind::Enum if self.is_ts() => {
                let enum_start = self.token_start();
                self.parse_exported_enum(enum_start, false)?
            }
            TokenKind::Function => {
                let func_start = self.token_start();
                let decl = self.parse_function_declaration(
                    func_start,
                    FunctionFlags::NONE,
                    ModifierFlags::EXPORT,
                    false,
                )?;
                self.export_declared_ident(decl.function.ident)?;
                Statement::Function(decl)
            }
            TokenKind::Class => {
                let stmt = self.parse_class_statement(ModifierFlags::EXPORT)?;
                if let Statement::Class(decl) = stmt {
                    self.export_declared_ident(decl.definition.ident)?;
                }
                stmt
            }
            TokenKind::Ident => {
                let kw = self.token().kw;
                match kw {
                    Some(Kw::Let) => self.parse_exported_variable(VariableKind::Let)?,
                    Some(Kw::Async) if self.lookahead_is(TokenKind::Function)? => {
                        let func_start = self.token_start();
                        self.next()?;
                        let decl = self.parse_function_declaration(
                            func_start,
                            FunctionFlags::ASYNC,
                            ModifierFlags::EXPORT,
                            false,
                        )?;
                        self.export_declared_ident(decl.function.ident)?;
                        Statement::Function(decl)
                    }
                    Some(Kw::Abstract)
                        if self.is_ts() && self.lookahead_is(TokenKind::Class)? =>
                    {
                        let class_start = self.token_start();
                        self.next()?;
                        let stmt = self.parse_class_statement_from(
                            class_start,
                            ModifierFlags::EXPORT | ModifierFlags::ABSTRACT,
                        )?;
                        if let Statement::Class(decl) = stmt {
                            self.export_declared_ident(decl.definition.ident)?;
                        }
                        stmt
                    }
                    Some(Kw::Interface) if self.is_ts() => self.parse_ts_interface(false)?,
                    Some(Kw::Type) if self.is_ts() => self.parse_ts_type_alias(false)?,
                    Some(Kw::Namespace) | Some(Kw::Module) if self.is_ts() => {
                        self.parse_ts_module(false)?
                    }
                    Some(Kw::Declare)
                        if self.is_ts() && self.lookahead_starts_declaration()? =>
                    {
                        self.parse_declare_statement(
                            StatementParseFlags::GLOBAL | StatementParseFlags::ALLOW_LEXICAL,
                        )?
                    }
                    _ => return Err(self.error_here(messages::UNEXPECTED_TOKEN)),
                }
            }
            _ => return Err(self.error_here(messages::UNEXPECTED_TOKEN)),
        };

        Ok(Statement::ExportNamed(self.arena.alloc(
            ExportNamedDeclaration {
                range: TextRange::new(start, declaration.range().end),
                declaration: Some(declaration),
                specifiers: &[],
                source: None,
                type_only: false,
            },
        )))
    }

    fn parse_exported_variable(&mut self, kind: VariableKind) -> Result<Statement<'a>> {
        let mut var_flags = VariableParseFlags::EXPORTED;
        if self.in_status(ParserStatus::IN_AMBIENT_CONTEXT) {
            var_flags |= VariableParseFlags::AMBIENT;
        }
        let decl = self.parse_variable_declaration(kind, var_flags)?;
        self.consume_semicolon()?;

        let mut bound = Vec::new();
        for declarator in decl.declarators {
            declarator
                .id
                .each_binding(&mut |id| bound.push((id.ident.name, id.ident.range)));
        }
        for (name, range) in bound {
            self.add_local_export(name, name, range)?;
        }
        Ok(Statement::Variable(decl))
    }

    fn parse_exported_enum(&mut self, start: u32, is_const: bool) -> Result<Statement<'a>> {
        let stmt = self.parse_ts_enum(start, is_const, false)?;
        if let Statement::TsEnum(decl) = stmt {
            self.add_local_export(decl.ident.name, decl.ident.name, decl.ident.range)?;
        }
        Ok(stmt)
    }

    fn export_declared_ident(&mut self, ident: Option<&'a Ident<'a>>) -> Result<()> {
        if let Some(id) = ident {
            self.add_local_export(id.name, id.name, id.range)?;
        }
        Ok(())
    }
}
