//! TypeScript declaration statements: `declare`, enums, interfaces,
//! type aliases, namespaces and modules, and `import x = ...`.

use strix_ast::*;
use strix_binder::{DeclFlags, DeclKind, ScopeKind};
use strix_core::text::TextRange;
use strix_diagnostics::{messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::context::{
    ExpressionParseFlags, ParserStatus, StatementParseFlags, VariableParseFlags,
};
use crate::parser_impl::Parser;

impl<'a> Parser<'a> {
    /// `declare <declaration>`. The inner declaration parses in ambient
    /// context, where initializers and bodies are rejected.
    pub(crate) fn parse_declare_statement(
        &mut self,
        _flags: StatementParseFlags,
    ) -> Result<Statement<'a>> {
        let start = self.token_start();
        self.next()?;
        self.with_status(ParserStatus::IN_AMBIENT_CONTEXT, |p| {
            match p.token_kind() {
                TokenKind::Var => p.parse_ambient_variable(start, VariableKind::Var),
                TokenKind::Const => {
                    if p.lookahead_is(TokenKind::Enum)? {
                        p.next()?;
                        p.parse_ts_enum(start, true, true)
                    } else {
                        p.parse_ambient_variable(start, VariableKind::Const)
                    }
                }
                TokenKind::Function => {
                    let decl = p.parse_function_declaration(
                        start,
                        FunctionFlags::NONE,
                        ModifierFlags::DECLARE,
                        false,
                    )?;
                    Ok(Statement::Function(decl))
                }
                TokenKind::Class => p.parse_class_statement_from(start, ModifierFlags::DECLARE),
                TokenKind::Enum => p.parse_ts_enum(start, false, true),
                TokenKind::Ident => {
                    let kw = p.token().kw;
                    match kw {
                        Some(Kw::Let) => p.parse_ambient_variable(start, VariableKind::Let),
                        Some(Kw::Async) if p.lookahead_is(TokenKind::Function)? => Err(
                            p.error_here("'declare' modifier cannot appear on an async function"),
                        ),
                        Some(Kw::Abstract) if p.lookahead_is(TokenKind::Class)? => {
                            p.next()?;
                            p.parse_class_statement_from(
                                start,
                                ModifierFlags::DECLARE | ModifierFlags::ABSTRACT,
                            )
                        }
                        Some(Kw::Interface) => p.parse_ts_interface(true),
                        Some(Kw::Type) => p.parse_ts_type_alias(true),
                        Some(Kw::Namespace) | Some(Kw::Module) | Some(Kw::Global) => {
                            p.parse_ts_module(true)
                        }
                        _ => Err(p.error_here(messages::UNEXPECTED_TOKEN)),
                    }
                }
                _ => Err(p.error_here(messages::UNEXPECTED_TOKEN)),
            }
        })
    }

    fn parse_ambient_variable(
        &mut self,
        start: u32,
        kind: VariableKind,
    ) -> Result<Statement<'a>> {
        let decl = self.parse_variable_declaration(kind, VariableParseFlags::AMBIENT)?;
        self.consume_semicolon()?;
        let decl = self.arena.alloc(VariableDeclaration {
            range: TextRange::new(start, decl.range.end),
            kind: decl.kind,
            declarators: decl.declarators,
            declare: true,
        });
        Ok(Statement::Variable(decl))
    }

    /// `enum E { A, B = 1 }`. The current token is the `enum` keyword;
    /// a leading `const` has already been consumed by the caller.
    pub(crate) fn parse_ts_enum(
        &mut self,
        start: u32,
        is_const: bool,
        declare: bool,
    ) -> Result<Statement<'a>> {
        self.expect(TokenKind::Enum)?;
        let ident = self.parse_ident()?;
        self.binder
            .add_decl(
                ident.sym,
                DeclKind::Enum { is_const },
                DeclFlags::NONE,
                ident.range,
            )
            .map_err(|e| self.bind_error(e))?;

        let scope = self.binder.enter_scope(ScopeKind::Block);
        self.expect(TokenKind::OpenBrace)?;
        let mut members = Vec::new();
        while !self.token().is(TokenKind::CloseBrace) {
            let member_start = self.token_start();
            let key = if self.token().is(TokenKind::String) {
                PropertyKey::String(self.parse_string_literal()?)
            } else if self.token().is_identifier_like() || self.token_kind().is_reserved_word() {
                let id = self.ident_from_token();
                self.next()?;
                PropertyKey::Ident(id)
            } else {
                return Err(self.error_here(messages::IDENTIFIER_EXPECTED));
            };
            let init = if self.eat(TokenKind::Eq)? {
                Some(self.parse_expression(ExpressionParseFlags::NO_OPTS)?)
            } else {
                None
            };
            let end = init.map_or(key.range().end, |e| e.range().end);
            members.push(TsEnumMember {
                range: TextRange::new(member_start, end),
                key,
                init,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBrace)?.end;
        self.binder.exit_scope();

        Ok(Statement::TsEnum(self.arena.alloc(TsEnumDeclaration {
            range: TextRange::new(start, end),
            ident,
            members: alloc_slice(self.arena, &members),
            is_const,
            declare,
            scope,
        })))
    }

    /// `interface I<T> extends A.B<T> { ... }`.
    pub(crate) fn parse_ts_interface(&mut self, declare: bool) -> Result<Statement<'a>> {
        let start = self.token_start();
        self.next()?;
        let ident = self.parse_ident()?;
        self.binder
            .add_decl(ident.sym, DeclKind::Interface, DeclFlags::NONE, ident.range)
            .map_err(|e| self.bind_error(e))?;

        let type_params = if self.token().is(TokenKind::Lt) {
            Some(self.parse_type_params()?)
        } else {
            None
        };

        let mut extends = Vec::new();
        if self.eat(TokenKind::Extends)? {
            loop {
                let heritage_start = self.token_start();
                let expr = self.parse_ts_entity_name()?;
                let type_args = if self.token().is(TokenKind::Lt) {
                    self.parse_type_args(true)?
                } else {
                    None
                };
                let end = type_args.map_or(expr.range().end, |a| a.range.end);
                extends.push(TsInterfaceHeritage {
                    range: TextRange::new(heritage_start, end),
                    expr,
                    type_args,
                });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }

        let scope = self.binder.enter_scope(ScopeKind::Block);
        let (body, end) = self.parse_ts_type_members()?;
        self.binder.exit_scope();

        Ok(Statement::TsInterface(self.arena.alloc(
            TsInterfaceDeclaration {
                range: TextRange::new(start, end),
                ident,
                type_params,
                extends: alloc_slice(self.arena, &extends),
                body,
                declare,
                scope,
            },
        )))
    }

    /// `type T<U> = ...;`.
    pub(crate) fn parse_ts_type_alias(&mut self, declare: bool) -> Result<Statement<'a>> {
        let start = self.token_start();
        self.next()?;
        let ident = self.parse_ident()?;
        self.binder
            .add_decl(ident.sym, DeclKind::Interface, DeclFlags::NONE, ident.range)
            .map_err(|e| self.bind_error(e))?;

        let type_params = if self.token().is(TokenKind::Lt) {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        self.expect(TokenKind::Eq)?;
        let type_ann = self.parse_ts_type()?;
        self.consume_semicolon()?;

        Ok(Statement::TsTypeAlias(self.arena.alloc(
            TsTypeAliasDeclaration {
                range: TextRange::new(start, type_ann.range().end),
                ident,
                type_params,
                type_ann,
                declare,
            },
        )))
    }

    /// `namespace A.B { ... }`, `module "m" { ... }`, `declare global { ... }`.
    pub(crate) fn parse_ts_module(&mut self, declare: bool) -> Result<Statement<'a>> {
        let start = self.token_start();
        let global = self.token().is_kw(Kw::Global);
        if !global {
            self.next()?;
        }

        let name = if global {
            let id = self.parse_ident()?;
            TsModuleName::Ident(id)
        } else if self.token().is(TokenKind::String) {
            TsModuleName::String(self.parse_string_literal()?)
        } else {
            let id = self.parse_ident()?;
            self.binder
                .add_decl(id.sym, DeclKind::Namespace, DeclFlags::NONE, id.range)
                .map_err(|e| self.bind_error(e))?;
            TsModuleName::Ident(id)
        };

        // Dotted names nest: `namespace A.B {}` is `A` wrapping `B`.
        if !global && self.token().is(TokenKind::Dot) {
            if let TsModuleName::Ident(_) = name {
                self.next()?;
                let scope = self.binder.enter_scope(ScopeKind::TsModule);
                let inner = self.parse_ts_nested_module(declare)?;
                self.binder.exit_scope();
                let body = alloc_slice(self.arena, &[inner]);
                return Ok(Statement::TsModule(self.arena.alloc(TsModuleDeclaration {
                    range: TextRange::new(start, inner.range().end),
                    name,
                    body: Some(body),
                    declare,
                    global: false,
                    scope,
                })));
            }
        }

        let string_name = matches!(name, TsModuleName::String(_));
        if string_name && !self.in_status(ParserStatus::IN_AMBIENT_CONTEXT) && !declare {
            return Err(self.error_at(
                start,
                "Only ambient modules can use quoted names",
            ));
        }

        // Bodiless ambient shorthand.
        if !self.token().is(TokenKind::OpenBrace) {
            let end = name.range().end;
            self.consume_semicolon()?;
            return Ok(Statement::TsModule(self.arena.alloc(TsModuleDeclaration {
                range: TextRange::new(start, end),
                name,
                body: None,
                declare,
                global,
                scope: self.binder.current_scope(),
            })));
        }

        let scope = self.binder.enter_scope(ScopeKind::TsModule);
        let (body, end) = self.with_status(ParserStatus::TS_MODULE, |p| {
            p.expect(TokenKind::OpenBrace)?;
            let mut statements = Vec::new();
            while !matches!(p.token_kind(), TokenKind::CloseBrace | TokenKind::Eos) {
                statements.push(p.parse_statement(
                    StatementParseFlags::GLOBAL | StatementParseFlags::ALLOW_LEXICAL,
                )?);
            }
            let end = p.expect(TokenKind::CloseBrace)?.end;
            Ok((alloc_slice(p.arena, &statements), end))
        })?;
        self.binder.exit_scope();

        Ok(Statement::TsModule(self.arena.alloc(TsModuleDeclaration {
            range: TextRange::new(start, end),
            name,
            body: Some(body),
            declare,
            global,
            scope,
        })))
    }

    fn parse_ts_nested_module(&mut self, declare: bool) -> Result<Statement<'a>> {
        let start = self.token_start();
        let id = self.parse_ident()?;
        self.binder
            .add_decl(id.sym, DeclKind::Namespace, DeclFlags::NONE, id.range)
            .map_err(|e| self.bind_error(e))?;
        let name = TsModuleName::Ident(id);

        if self.eat(TokenKind::Dot)? {
            let scope = self.binder.enter_scope(ScopeKind::TsModule);
            let inner = self.parse_ts_nested_module(declare)?;
            self.binder.exit_scope();
            let body = alloc_slice(self.arena, &[inner]);
            return Ok(Statement::TsModule(self.arena.alloc(TsModuleDeclaration {
                range: TextRange::new(start, inner.range().end),
                name,
                body: Some(body),
                declare,
                global: false,
                scope,
            })));
        }

        let scope = self.binder.enter_scope(ScopeKind::TsModule);
        let (body, end) = self.with_status(ParserStatus::TS_MODULE, |p| {
            p.expect(TokenKind::OpenBrace)?;
            let mut statements = Vec::new();
            while !matches!(p.token_kind(), TokenKind::CloseBrace | TokenKind::Eos) {
                statements.push(p.parse_statement(
                    StatementParseFlags::GLOBAL | StatementParseFlags::ALLOW_LEXICAL,
                )?);
            }
            let end = p.expect(TokenKind::CloseBrace)?.end;
            Ok((alloc_slice(p.arena, &statements), end))
        })?;
        self.binder.exit_scope();

        Ok(Statement::TsModule(self.arena.alloc(TsModuleDeclaration {
            range: TextRange::new(start, end),
            name,
            body: Some(body),
            declare,
            global: false,
            scope,
        })))
    }

    /// `import x = require("m");` and `import x = A.B;`.
    pub(crate) fn parse_ts_import_equals(&mut self, is_export: bool) -> Result<Statement<'a>> {
        let start = self.token_start();
        self.expect(TokenKind::Import)?;
        let ident = self.parse_ident()?;
        let mut flags = DeclFlags::NONE;
        if is_export {
            flags |= DeclFlags::EXPORT;
        }
        self.binder
            .add_decl(ident.sym, DeclKind::ImportEquals, flags, ident.range)
            .map_err(|e| self.bind_error(e))?;
        self.expect(TokenKind::Eq)?;

        let module_ref = if self.token().is_kw(Kw::Require)
            && self.lookahead_is(TokenKind::OpenParen)?
        {
            self.next()?;
            self.expect(TokenKind::OpenParen)?;
            if !self.token().is(TokenKind::String) {
                return Err(self.error_here("String literal expected."));
            }
            let source = self.parse_string_literal()?;
            self.expect(TokenKind::CloseParen)?;
            TsModuleRef::External(source)
        } else {
            TsModuleRef::Entity(self.parse_ts_entity_name()?)
        };

        let end = match module_ref {
            TsModuleRef::External(s) => s.range.end,
            TsModuleRef::Entity(e) => e.range().end,
        };
        self.consume_semicolon()?;

        if is_export {
            self.add_local_export_for_import_equals(ident)?;
        }

        Ok(Statement::TsImportEquals(self.arena.alloc(
            TsImportEqualsDeclaration {
                range: TextRange::new(start, end),
                ident,
                module_ref,
                is_export,
            },
        )))
    }

    fn add_local_export_for_import_equals(&mut self, ident: &'a Ident<'a>) -> Result<()> {
        if let Some(record) = self.module_record.as_mut() {
            let entry =
                strix_module::ExportEntry::local(ident.name, ident.name, ident.range);
            if !record.add_local_export_entry(entry) {
                return Err(self.error_at(
                    ident.range.pos,
                    format!("Duplicate export name of '{}'", ident.name),
                ));
            }
        }
        Ok(())
    }
}
