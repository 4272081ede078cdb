//! Function tails, parameter lists, and binding patterns, shared by
//! declarations, expressions, methods, and arrow conversion.

use strix_ast::*;
use strix_binder::ScopeKind;
use strix_core::text::TextRange;
use strix_diagnostics::{messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::context::{ExpressionParseFlags, ParserStatus};
use crate::parser_impl::Parser;

impl<'a> Parser<'a> {
    /// Everything after the function keyword, name, and `*` marker:
    /// type parameters, parameter list, return type, and body. The body
    /// may be absent for TS overload signatures and ambient contexts
    /// when `allow_overload` is set.
    pub(crate) fn parse_function_rest(
        &mut self,
        start: u32,
        ident: Option<&'a Ident<'a>>,
        mut flags: FunctionFlags,
        extra_status: ParserStatus,
        allow_overload: bool,
        allow_param_props: bool,
    ) -> Result<&'a ScriptFunction<'a>> {
        let mut set = extra_status;
        if flags.contains(FunctionFlags::ASYNC) {
            set |= ParserStatus::ASYNC_FUNCTION;
        }
        if flags.contains(FunctionFlags::GENERATOR) {
            set |= ParserStatus::GENERATOR_FUNCTION;
        }

        self.with_function_status(set, |p| {
            let type_params = if p.is_ts() && p.token().is(TokenKind::Lt) {
                Some(p.parse_type_params()?)
            } else {
                None
            };

            let param_scope = p.binder.enter_scope(ScopeKind::FunctionParam);
            let params = p.parse_function_params(allow_param_props)?;

            let return_type = if p.is_ts() && p.eat(TokenKind::Colon)? {
                Some(p.parse_ts_type_or_predicate()?)
            } else {
                None
            };

            let scope = p.binder.enter_scope(ScopeKind::Function);
            let (body, end) = if p.token().is(TokenKind::OpenBrace) {
                if p.in_status(ParserStatus::IN_AMBIENT_CONTEXT) {
                    return Err(p.error_here(messages::DECLARE_NO_BODY));
                }
                let block = p.parse_block_in_current_scope()?;
                (Some(FunctionBody::Block(block)), block.range.end)
            } else if p.is_ts()
                && (allow_overload || p.in_status(ParserStatus::IN_AMBIENT_CONTEXT))
            {
                flags |= FunctionFlags::OVERLOAD;
                let end = p.token_start();
                p.consume_semicolon()?;
                (None, end)
            } else {
                return Err(p.error_here("Unexpected token, expected '{'"));
            };
            p.binder.exit_scope();
            p.binder.exit_scope();

            Ok(&*p.arena.alloc(ScriptFunction {
                range: TextRange::new(start, end),
                ident,
                type_params,
                params: alloc_slice(p.arena, &params),
                return_type,
                body,
                flags,
                param_scope,
                scope,
            }))
        })
    }

    /// `( ... )` parameter list. The caller has already entered the
    /// parameter scope.
    pub(crate) fn parse_function_params(
        &mut self,
        allow_param_props: bool,
    ) -> Result<Vec<Param<'a>>> {
        self.with_status(ParserStatus::FUNCTION_PARAM, |p| {
            p.expect(TokenKind::OpenParen)?;
            let mut params = Vec::new();
            while !p.token().is(TokenKind::CloseParen) {
                let param = p.parse_parameter(allow_param_props)?;
                let is_rest = matches!(param.pattern, Pattern::Rest(_));
                p.add_param_pattern_decls(&param.pattern)?;
                params.push(param);
                if p.token().is(TokenKind::Comma) {
                    if is_rest {
                        return Err(p.error_here(messages::REST_MUST_BE_LAST));
                    }
                    p.next()?;
                } else {
                    break;
                }
            }
            p.expect(TokenKind::CloseParen)?;
            Ok(params)
        })
    }

    fn parse_parameter(&mut self, allow_param_props: bool) -> Result<Param<'a>> {
        let start = self.token_start();
        let mut modifiers = ModifierFlags::NONE;
        if allow_param_props && self.is_ts() {
            loop {
                let flag = match self.token().kw {
                    Some(Kw::Public) => ModifierFlags::PUBLIC,
                    Some(Kw::Private) => ModifierFlags::PRIVATE,
                    Some(Kw::Protected) => ModifierFlags::PROTECTED,
                    Some(Kw::Readonly) => ModifierFlags::READONLY,
                    _ => break,
                };
                if !self.next_starts_pattern()? {
                    break;
                }
                if modifiers.contains(flag)
                    || (flag != ModifierFlags::READONLY
                        && modifiers.intersects(ModifierFlags::ACCESSIBILITY))
                {
                    return Err(self.error_here(messages::DUPLICATE_MODIFIER));
                }
                modifiers |= flag;
                self.next()?;
            }
        }
        let pattern = self.parse_pattern_element(false, true)?;
        Ok(Param {
            range: TextRange::new(start, pattern.range().end),
            pattern,
            modifiers,
        })
    }

    /// Whether the token after the current one can begin a binding
    /// pattern, deciding modifier-versus-name for parameter properties.
    fn next_starts_pattern(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let starts = self.token().is_identifier_like()
            || matches!(
                self.token_kind(),
                TokenKind::OpenBracket | TokenKind::OpenBrace | TokenKind::DotDotDot
            );
        self.rewind(saved);
        Ok(starts)
    }

    /// One element of a binding pattern: identifier, nested pattern, or
    /// rest, with optional `?`, type annotation, and default.
    pub(crate) fn parse_pattern_element(
        &mut self,
        in_rest: bool,
        allow_default: bool,
    ) -> Result<Pattern<'a>> {
        let start = self.token_start();
        let pattern = match self.token_kind() {
            TokenKind::DotDotDot => {
                self.next()?;
                let argument = self.parse_pattern_element(true, false)?;
                if self.token().is(TokenKind::Eq) {
                    return Err(self.error_here(messages::REST_NO_DEFAULT));
                }
                return Ok(Pattern::Rest(self.arena.alloc(RestPattern {
                    range: TextRange::new(start, argument.range().end),
                    argument,
                })));
            }
            TokenKind::OpenBracket => self.parse_array_pattern()?,
            TokenKind::OpenBrace => self.parse_object_pattern()?,
            _ if self.token().is_identifier_like() => {
                self.check_restricted_binding()?;
                let ident = self.ident_from_token();
                self.next()?;
                let mut end = ident.range.end;
                let mut optional = false;
                if self.is_ts() && self.token().is(TokenKind::Question) {
                    if in_rest {
                        return Err(self.error_here("A rest parameter cannot be optional"));
                    }
                    optional = true;
                    end = self.token_end();
                    self.next()?;
                }
                let type_ann = if self.is_ts() && self.eat(TokenKind::Colon)? {
                    let ty = self.parse_ts_type()?;
                    end = ty.range().end;
                    Some(ty)
                } else {
                    None
                };
                Pattern::Ident(self.arena.alloc(BindingIdent {
                    range: TextRange::new(ident.range.pos, end),
                    ident,
                    type_ann,
                    optional,
                }))
            }
            _ => return Err(self.error_here(messages::IDENTIFIER_EXPECTED)),
        };

        if allow_default && self.token().is(TokenKind::Eq) {
            self.next()?;
            let default = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
            return Ok(Pattern::Assign(self.arena.alloc(AssignPattern {
                range: TextRange::new(start, default.range().end),
                target: pattern,
                default,
            })));
        }
        Ok(pattern)
    }

    fn parse_array_pattern(&mut self) -> Result<Pattern<'a>> {
        let start = self.expect(TokenKind::OpenBracket)?.pos;
        let mut elements: Vec<Option<Pattern<'a>>> = Vec::new();
        while !self.token().is(TokenKind::CloseBracket) {
            if self.token().is(TokenKind::Comma) {
                elements.push(None);
                self.next()?;
                continue;
            }
            let element = self.parse_pattern_element(false, true)?;
            let is_rest = matches!(element, Pattern::Rest(_));
            elements.push(Some(element));
            if self.token().is(TokenKind::Comma) {
                if is_rest {
                    return Err(self.error_here(messages::REST_MUST_BE_LAST));
                }
                self.next()?;
            } else {
                break;
            }
        }
        let mut end = self.expect(TokenKind::CloseBracket)?.end;
        let type_ann = if self.is_ts() && self.eat(TokenKind::Colon)? {
            let ty = self.parse_ts_type()?;
            end = ty.range().end;
            Some(ty)
        } else {
            None
        };
        Ok(Pattern::Array(self.arena.alloc(ArrayPattern {
            range: TextRange::new(start, end),
            elements: alloc_slice(self.arena, &elements),
            type_ann,
        })))
    }

    fn parse_object_pattern(&mut self) -> Result<Pattern<'a>> {
        let start = self.expect(TokenKind::OpenBrace)?.pos;
        let mut properties = Vec::new();
        while !self.token().is(TokenKind::CloseBrace) {
            if self.token().is(TokenKind::DotDotDot) {
                let rest_start = self.token_start();
                self.next()?;
                let argument = self.parse_pattern_element(true, false)?;
                properties.push(ObjectPatternProp::Rest(self.arena.alloc(RestPattern {
                    range: TextRange::new(rest_start, argument.range().end),
                    argument,
                })));
                if self.token().is(TokenKind::Comma) {
                    return Err(self.error_here(messages::REST_MUST_BE_LAST));
                }
                break;
            }

            let prop_start = self.token_start();
            let (key, computed) = self.parse_property_key()?;
            if self.eat(TokenKind::Colon)? {
                let value = self.parse_pattern_element(false, true)?;
                properties.push(ObjectPatternProp::KeyValue(self.arena.alloc(
                    KeyValuePatternProp {
                        range: TextRange::new(prop_start, value.range().end),
                        key,
                        value,
                        computed,
                        shorthand: false,
                    },
                )));
            } else {
                // Shorthand binding, optionally with a default.
                let ident = match key {
                    PropertyKey::Ident(id) => id,
                    _ => return Err(self.error_here(messages::IDENTIFIER_EXPECTED)),
                };
                if matches!(ident.name, "eval" | "arguments") {
                    return Err(self.error_at(
                        ident.range.pos,
                        format!("Binding '{}' in strict mode is invalid", ident.name),
                    ));
                }
                let binding = Pattern::Ident(self.arena.alloc(BindingIdent {
                    range: ident.range,
                    ident,
                    type_ann: None,
                    optional: false,
                }));
                let value = if self.token().is(TokenKind::Eq) {
                    self.next()?;
                    let default = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
                    Pattern::Assign(self.arena.alloc(AssignPattern {
                        range: TextRange::new(prop_start, default.range().end),
                        target: binding,
                        default,
                    }))
                } else {
                    binding
                };
                properties.push(ObjectPatternProp::KeyValue(self.arena.alloc(
                    KeyValuePatternProp {
                        range: TextRange::new(prop_start, value.range().end),
                        key,
                        value,
                        computed: false,
                        shorthand: true,
                    },
                )));
            }

            if self.token().is(TokenKind::Comma) {
                self.next()?;
            } else {
                break;
            }
        }
        let mut end = self.expect(TokenKind::CloseBrace)?.end;
        let type_ann = if self.is_ts() && self.eat(TokenKind::Colon)? {
            let ty = self.parse_ts_type()?;
            end = ty.range().end;
            Some(ty)
        } else {
            None
        };
        Ok(Pattern::Object(self.arena.alloc(ObjectPattern {
            range: TextRange::new(start, end),
            properties: alloc_slice(self.arena, &properties),
            type_ann,
        })))
    }
}
