//! Class definitions, shared by declarations and expressions.

use rustc_hash::FxHashMap;
use strix_ast::*;
use strix_binder::{DeclFlags, DeclKind, ScopeKind};
use strix_core::text::TextRange;
use strix_diagnostics::{messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::context::{ExpressionParseFlags, ParserStatus};
use crate::parser_impl::Parser;

impl<'a> Parser<'a> {
    /// Modifiers that may follow an accessibility keyword.
    const AFTER_ACCESSIBILITY: ModifierFlags = ModifierFlags::ASYNC
        .union(ModifierFlags::STATIC)
        .union(ModifierFlags::READONLY)
        .union(ModifierFlags::DECLARE)
        .union(ModifierFlags::ABSTRACT);

    pub(crate) fn parse_class_statement(
        &mut self,
        modifiers: ModifierFlags,
    ) -> Result<Statement<'a>> {
        let start = self.token_start();
        self.parse_class_statement_from(start, modifiers)
    }

    pub(crate) fn parse_class_statement_from(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
    ) -> Result<Statement<'a>> {
        self.parse_class_statement_decorated(start, modifiers, &[])
    }

    /// `@dec class C {}` and `@dec abstract class C {}` in statement
    /// position. Decorators may precede nothing else at this level.
    pub(crate) fn parse_decorated_class_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.token_start();
        let decorators = self.parse_decorators()?;
        let mut modifiers = ModifierFlags::NONE;
        if self.is_ts()
            && self.token().is_kw(Kw::Abstract)
            && self.lookahead_is(TokenKind::Class)?
        {
            self.next()?;
            modifiers |= ModifierFlags::ABSTRACT;
        }
        // The error belongs to the decorator list, not the token after it.
        if !self.token().is(TokenKind::Class) {
            return Err(self.error_at(start, messages::DECORATORS_INVALID_HERE));
        }
        self.parse_class_statement_decorated(start, modifiers, decorators)
    }

    fn parse_class_statement_decorated(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        decorators: &'a [Decorator<'a>],
    ) -> Result<Statement<'a>> {
        let definition = self.parse_class_definition_impl(start, true, modifiers, decorators)?;
        if let Some(ident) = definition.ident {
            let decl_flags = if modifiers.contains(ModifierFlags::EXPORT) {
                DeclFlags::EXPORT
            } else {
                DeclFlags::NONE
            };
            self.binder
                .add_decl(ident.sym, DeclKind::Class, decl_flags, ident.range)
                .map_err(|e| self.bind_error(e))?;
        }
        Ok(Statement::Class(self.arena.alloc(ClassDeclaration {
            range: definition.range,
            definition,
        })))
    }

    /// `class` in expression position; the name is optional.
    pub(crate) fn parse_class_definition(
        &mut self,
        is_declaration: bool,
    ) -> Result<&'a ClassDefinition<'a>> {
        let start = self.token_start();
        self.parse_class_definition_impl(start, is_declaration, ModifierFlags::NONE, &[])
    }

    fn parse_class_definition_impl(
        &mut self,
        start: u32,
        require_ident: bool,
        modifiers: ModifierFlags,
        decorators: &'a [Decorator<'a>],
    ) -> Result<&'a ClassDefinition<'a>> {
        self.expect(TokenKind::Class)?;

        let ident = if self.token().is_identifier_like()
            && !matches!(
                self.token().kw,
                Some(Kw::Implements)
            )
        {
            self.check_restricted_binding()?;
            let id = self.ident_from_token();
            self.next()?;
            Some(id)
        } else if require_ident && !modifiers.contains(ModifierFlags::DEFAULT) {
            return Err(self.error_here(messages::IDENTIFIER_EXPECTED));
        } else {
            None
        };

        let type_params = if self.is_ts() && self.token().is(TokenKind::Lt) {
            Some(self.parse_type_params()?)
        } else {
            None
        };

        let scope = self.binder.enter_scope(ScopeKind::Class);
        let result = self.parse_class_tail(start, ident, type_params, modifiers, decorators, scope);
        self.binder.exit_scope();
        result
    }

    fn parse_class_tail(
        &mut self,
        start: u32,
        ident: Option<&'a Ident<'a>>,
        type_params: Option<&'a TsTypeParamDecl<'a>>,
        modifiers: ModifierFlags,
        decorators: &'a [Decorator<'a>],
        scope: ScopeId,
    ) -> Result<&'a ClassDefinition<'a>> {
        let (super_class, super_type_args) = if self.eat(TokenKind::Extends)? {
            let callee = self.parse_lhs_for_heritage()?;
            let type_args = if self.is_ts() && self.token().is(TokenKind::Lt) {
                self.parse_type_args(true)?
            } else {
                None
            };
            (Some(callee), type_args)
        } else {
            (None, None)
        };

        let mut implements = Vec::new();
        if self.is_ts() && self.token().is_kw(Kw::Implements) {
            self.next()?;
            loop {
                let impl_start = self.token_start();
                let expr = self.parse_ts_entity_name()?;
                let type_args = if self.token().is(TokenKind::Lt) {
                    self.parse_type_args(true)?
                } else {
                    None
                };
                let end = type_args.map(|t| t.range.end).unwrap_or(expr.range().end);
                implements.push(TsClassImplements {
                    range: TextRange::new(impl_start, end),
                    expr,
                    type_args,
                });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }

        self.expect(TokenKind::OpenBrace)?;

        let mut set = ParserStatus::IN_CLASS_BODY;
        if modifiers.contains(ModifierFlags::DECLARE) {
            set |= ParserStatus::IN_AMBIENT_CONTEXT;
        }
        let has_super = super_class.is_some();
        let body = self.with_status(set, |p| p.parse_class_body(has_super))?;

        let end = self.expect(TokenKind::CloseBrace)?.end;
        Ok(self.arena.alloc(ClassDefinition {
            range: TextRange::new(start, end),
            ident,
            type_params,
            super_class,
            super_type_args,
            implements: alloc_slice(self.arena, &implements),
            body: alloc_slice(self.arena, &body),
            modifiers,
            decorators,
            scope,
        }))
    }

    /// Heritage clauses take a LeftHandSideExpression; type arguments,
    /// if any, are handled by the caller.
    fn parse_lhs_for_heritage(&mut self) -> Result<Expression<'a>> {
        let primary = self.parse_primary_for_heritage()?;
        let mut expr = primary;
        let start = expr.range().pos;
        loop {
            match self.token_kind() {
                TokenKind::Dot => {
                    self.next()?;
                    let property = Expression::Ident(self.ident_from_token());
                    self.next()?;
                    expr = Expression::Member(self.arena.alloc(MemberExpr {
                        range: TextRange::new(start, property.range().end),
                        object: expr,
                        property,
                        computed: false,
                        optional: false,
                    }));
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary_for_heritage(&mut self) -> Result<Expression<'a>> {
        if self.token().is_identifier_like() {
            let id = self.ident_from_token();
            self.next()?;
            Ok(Expression::Ident(id))
        } else {
            // Arbitrary expressions (`class A extends mix(B)`).
            self.parse_expression(ExpressionParseFlags::DISALLOW_YIELD)
        }
    }

    fn parse_class_body(&mut self, has_super: bool) -> Result<Vec<ClassElement<'a>>> {
        let mut elements = Vec::new();
        let mut ctor_impl_seen = false;
        let mut ctor_overloads = 0usize;
        let mut ctor_range = TextRange::empty(0);
        // Accessibility of seen accessors, keyed by name, for the
        // get/set visibility agreement check.
        let mut accessor_visibility: FxHashMap<String, ModifierFlags> = FxHashMap::default();

        while !self.token().is(TokenKind::CloseBrace) {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            if self.token().is(TokenKind::Eos) {
                return Err(self.error_here(messages::UNEXPECTED_EOS));
            }
            let element = self.parse_class_element(
                has_super,
                &mut ctor_impl_seen,
                &mut ctor_overloads,
                &mut ctor_range,
                &mut accessor_visibility,
            )?;
            elements.push(element);
        }

        if ctor_overloads > 0 && !ctor_impl_seen {
            return Err(self.error_at(ctor_range.pos, "Constructor implementation is missing."));
        }
        Ok(elements)
    }

    fn parse_class_element(
        &mut self,
        has_super: bool,
        ctor_impl_seen: &mut bool,
        ctor_overloads: &mut usize,
        ctor_range: &mut TextRange,
        accessor_visibility: &mut FxHashMap<String, ModifierFlags>,
    ) -> Result<ClassElement<'a>> {
        let start = self.token_start();
        let decorators = self.parse_decorators()?;
        let modifiers = self.parse_member_modifiers()?;

        // Index signatures look like a computed key but open with an
        // identifier directly followed by a colon.
        if self.is_ts() && self.token().is(TokenKind::OpenBracket) {
            if let Some(sig) = self.try_parse_index_signature(start, modifiers)? {
                self.consume_semicolon()?;
                return Ok(ClassElement::IndexSignature(sig));
            }
        }

        let mut func_flags = FunctionFlags::NONE;
        let mut kind = MethodKind::Method;
        if modifiers.contains(ModifierFlags::ASYNC) {
            func_flags |= FunctionFlags::ASYNC;
        }
        if self.token().is_kw(Kw::Get) && self.class_modifier_starts_member()? {
            kind = MethodKind::Get;
            self.next()?;
        } else if self.token().is_kw(Kw::Set) && self.class_modifier_starts_member()? {
            kind = MethodKind::Set;
            self.next()?;
        }
        if self.eat(TokenKind::Star)? {
            func_flags |= FunctionFlags::GENERATOR;
        }

        let (key, computed) = self.parse_property_key()?;

        if let PropertyKey::Private(p) = key {
            if p.name == "constructor" {
                return Err(self.error_at(p.range.pos, messages::PRIVATE_NAME_CONSTRUCTOR));
            }
        }

        let is_ctor_name = !computed && key.static_name() == Some("constructor");
        if is_ctor_name && modifiers.contains(ModifierFlags::STATIC) {
            return Err(self.error_at(start, "Static modifier can not appear on a constructor"));
        }

        let optional = self.is_ts() && self.eat(TokenKind::Question)?;

        // Method forms.
        if self.token().is(TokenKind::OpenParen) || (self.is_ts() && self.token().is(TokenKind::Lt))
        {
            if is_ctor_name && (kind != MethodKind::Method || !func_flags.is_empty()) {
                return Err(self.error_at(start, messages::CONSTRUCTOR_NOT_SPECIAL));
            }
            let kind = if is_ctor_name { MethodKind::Constructor } else { kind };

            let accessor_flags = match kind {
                MethodKind::Get => FunctionFlags::GETTER,
                MethodKind::Set => FunctionFlags::SETTER,
                MethodKind::Constructor => FunctionFlags::CONSTRUCTOR,
                MethodKind::Method => FunctionFlags::NONE,
            };
            let mut extra_status = ParserStatus::ALLOW_SUPER | ParserStatus::IN_METHOD_DEFINITION;
            if kind == MethodKind::Constructor {
                extra_status |= ParserStatus::CONSTRUCTOR_FUNCTION;
                if has_super {
                    extra_status |= ParserStatus::ALLOW_SUPER_CALL;
                }
            }
            let allow_overload = self.is_ts();
            let allow_param_props = kind == MethodKind::Constructor;

            let function = self.parse_function_rest(
                key.range().pos,
                None,
                func_flags | accessor_flags | FunctionFlags::METHOD,
                extra_status,
                allow_overload,
                allow_param_props,
            )?;

            match kind {
                MethodKind::Constructor => {
                    *ctor_range = key.range();
                    if function.is_overload() {
                        *ctor_overloads += 1;
                    } else {
                        if *ctor_impl_seen {
                            return Err(self.error_at(start, messages::MULTIPLE_CONSTRUCTORS));
                        }
                        *ctor_impl_seen = true;
                    }
                }
                MethodKind::Get => {
                    self.check_accessor_arity(PropertyKind::Get, function)?;
                    self.check_accessor_visibility(accessor_visibility, &key, modifiers)?;
                }
                MethodKind::Set => {
                    self.check_accessor_arity(PropertyKind::Set, function)?;
                    self.check_accessor_visibility(accessor_visibility, &key, modifiers)?;
                }
                MethodKind::Method => {}
            }

            return Ok(ClassElement::Method(self.arena.alloc(MethodDefinition {
                range: TextRange::new(start, function.range.end),
                kind,
                key,
                function,
                modifiers,
                computed,
                optional,
                decorators,
            })));
        }

        if kind != MethodKind::Method || !func_flags.is_empty() {
            return Err(self.error_here(messages::UNEXPECTED_TOKEN));
        }

        // Property form.
        let definite = self.is_ts()
            && self.token().is(TokenKind::Not)
            && !self.token().has_preceding_line_break()
            && self.eat(TokenKind::Not)?;
        let type_ann = if self.is_ts() && self.eat(TokenKind::Colon)? {
            Some(self.parse_ts_type()?)
        } else {
            None
        };
        let value = if self.token().is(TokenKind::Eq) {
            if self.in_status(ParserStatus::IN_AMBIENT_CONTEXT) && !self.is_dts {
                return Err(self.error_here(messages::AMBIENT_INITIALIZER));
            }
            self.next()?;
            Some(self.parse_expression(ExpressionParseFlags::NO_OPTS)?)
        } else {
            None
        };
        let end = value
            .map(|e| e.range().end)
            .or(type_ann.map(|t| t.range().end))
            .unwrap_or(key.range().end);
        self.consume_semicolon()?;

        Ok(ClassElement::Property(self.arena.alloc(ClassProperty {
            range: TextRange::new(start, end),
            key,
            value,
            type_ann,
            modifiers,
            computed,
            optional,
            definite,
            decorators,
        })))
    }

    fn check_accessor_visibility(
        &self,
        seen: &mut FxHashMap<String, ModifierFlags>,
        key: &PropertyKey<'a>,
        modifiers: ModifierFlags,
    ) -> Result<()> {
        let Some(name) = key.static_name() else { return Ok(()) };
        let visibility = modifiers & ModifierFlags::ACCESSIBILITY;
        match seen.get(name) {
            Some(prev) if *prev != visibility => {
                Err(self.error_at(key.range().pos, messages::ACCESSOR_VISIBILITY_MISMATCH))
            }
            Some(_) => Ok(()),
            None => {
                seen.insert(name.to_owned(), visibility);
                Ok(())
            }
        }
    }

    fn parse_decorators(&mut self) -> Result<&'a [Decorator<'a>]> {
        if !self.token().is(TokenKind::At) {
            return Ok(&[]);
        }
        let mut decorators = Vec::new();
        while self.token().is(TokenKind::At) {
            let start = self.token_start();
            self.next()?;
            let expr = self.with_status(ParserStatus::IN_DECORATOR | ParserStatus::DISALLOW_AWAIT, |p| {
                p.parse_lhs_expression(ExpressionParseFlags::NO_OPTS)
            })?;
            decorators.push(Decorator {
                range: TextRange::new(start, expr.range().end),
                expr,
            });
        }
        Ok(alloc_slice(self.arena, &decorators))
    }

    /// Leading member modifiers. Contextual keywords count only when a
    /// member name can still follow. Each accepted modifier narrows the
    /// set allowed after it, fixing the order accessibility < static <
    /// async < readonly; `abstract` and `declare` come before
    /// accessibility.
    fn parse_member_modifiers(&mut self) -> Result<ModifierFlags> {
        let mut modifiers = ModifierFlags::NONE;
        let mut allowed_next = ModifierFlags::all();
        loop {
            let (flag, next) = match self.token().kw {
                Some(Kw::Public) => (ModifierFlags::PUBLIC, Self::AFTER_ACCESSIBILITY),
                Some(Kw::Private) => (ModifierFlags::PRIVATE, Self::AFTER_ACCESSIBILITY),
                Some(Kw::Protected) => (ModifierFlags::PROTECTED, Self::AFTER_ACCESSIBILITY),
                Some(Kw::Static) => (
                    ModifierFlags::STATIC,
                    ModifierFlags::ASYNC
                        | ModifierFlags::READONLY
                        | ModifierFlags::DECLARE
                        | ModifierFlags::ABSTRACT,
                ),
                Some(Kw::Async) => (
                    ModifierFlags::ASYNC,
                    ModifierFlags::READONLY | ModifierFlags::DECLARE | ModifierFlags::ABSTRACT,
                ),
                Some(Kw::Abstract) => (
                    ModifierFlags::ABSTRACT,
                    ModifierFlags::ACCESSIBILITY
                        | ModifierFlags::ASYNC
                        | ModifierFlags::STATIC
                        | ModifierFlags::READONLY
                        | ModifierFlags::DECLARE,
                ),
                Some(Kw::Declare) => (
                    ModifierFlags::DECLARE,
                    ModifierFlags::ACCESSIBILITY
                        | ModifierFlags::ASYNC
                        | ModifierFlags::STATIC
                        | ModifierFlags::READONLY,
                ),
                Some(Kw::Readonly) => (
                    ModifierFlags::READONLY,
                    ModifierFlags::ASYNC | ModifierFlags::DECLARE | ModifierFlags::ABSTRACT,
                ),
                _ => break,
            };
            if !flag.intersects(ModifierFlags::STATIC | ModifierFlags::ASYNC) && !self.is_ts() {
                break;
            }
            if !self.class_modifier_starts_member()? {
                break;
            }
            if !allowed_next.intersects(flag) {
                return Err(self.error_here(messages::UNEXPECTED_MODIFIER));
            }
            if modifiers.contains(flag)
                || (flag.intersects(ModifierFlags::ACCESSIBILITY)
                    && modifiers.intersects(ModifierFlags::ACCESSIBILITY))
            {
                return Err(self.error_here(messages::DUPLICATE_MODIFIER));
            }
            modifiers |= flag;
            allowed_next = next;
            self.next()?;
        }
        Ok(modifiers)
    }

    /// Whether the current contextual keyword acts as a modifier, i.e.
    /// a member name, `*`, or a computed/private key follows on the same
    /// line.
    fn class_modifier_starts_member(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let is_modifier = !self.token().has_preceding_line_break()
            && (self.token().is_identifier_like()
                || self.token_kind().is_reserved_word()
                || matches!(
                    self.token_kind(),
                    TokenKind::OpenBracket
                        | TokenKind::PrivateIdent
                        | TokenKind::Star
                        | TokenKind::String
                        | TokenKind::Number
                ));
        self.rewind(saved);
        Ok(is_modifier)
    }

    /// `[name: KeyType]: ValueType`. Returns `None` (after rewinding)
    /// when the bracket opens an ordinary computed key.
    pub(crate) fn try_parse_index_signature(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
    ) -> Result<Option<&'a TsIndexSignature<'a>>> {
        let saved = self.save();
        self.next()?;
        if !self.token().is_identifier_like() {
            self.rewind(saved);
            return Ok(None);
        }
        let ident = self.ident_from_token();
        self.next()?;
        if !self.token().is(TokenKind::Colon) {
            self.rewind(saved);
            return Ok(None);
        }
        self.next()?;
        let key_type = self.parse_ts_type()?;
        self.expect(TokenKind::CloseBracket)?;
        self.expect(TokenKind::Colon)?;
        let type_ann = self.parse_ts_type()?;

        let binding = &*self.arena.alloc(BindingIdent {
            range: ident.range,
            ident,
            type_ann: Some(key_type),
            optional: false,
        });
        let param = Param {
            range: ident.range,
            pattern: Pattern::Ident(binding),
            modifiers: ModifierFlags::NONE,
        };
        Ok(Some(self.arena.alloc(TsIndexSignature {
            range: TextRange::new(start, type_ann.range().end),
            param,
            type_ann,
            readonly: modifiers.contains(ModifierFlags::READONLY),
            is_static: modifiers.contains(ModifierFlags::STATIC),
        })))
    }
}
