//! TypeScript type annotations: keyword types, references, unions and
//! intersections, tuples, function and constructor types, literal
//! types, type queries, predicates, and type parameter/argument lists.

use strix_ast::*;
use strix_core::text::TextRange;
use strix_diagnostics::{messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::parser_impl::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_ts_type(&mut self) -> Result<TsType<'a>> {
        match self.token_kind() {
            TokenKind::Lt => return self.parse_ts_fn_type(),
            TokenKind::New => return self.parse_ts_ctor_type(false),
            TokenKind::Ident
                if self.token().is_kw(Kw::Abstract) && self.lookahead_is(TokenKind::New)? =>
            {
                let start = self.token_start();
                self.next()?;
                let ctor = self.parse_ts_ctor_type(true)?;
                if let TsType::Constructor(inner) = ctor {
                    return Ok(TsType::Constructor(self.arena.alloc(TsConstructorType {
                        range: TextRange::new(start, inner.range.end),
                        type_params: inner.type_params,
                        params: inner.params,
                        return_type: inner.return_type,
                        is_abstract: true,
                    })));
                }
                return Ok(ctor);
            }
            TokenKind::OpenParen => {
                // `(x: T) => U` versus `(T)`.
                let saved = self.save();
                if let Ok(fn_type) = self.parse_ts_fn_type() {
                    return Ok(fn_type);
                }
                self.rewind(saved);
            }
            _ => {}
        }
        self.parse_ts_union_type()
    }

    /// Return types admit predicates: `x is T`, `this is T`, `asserts x`.
    pub(crate) fn parse_ts_type_or_predicate(&mut self) -> Result<TsType<'a>> {
        let start = self.token_start();

        if self.token().is_kw(Kw::Asserts) {
            let saved = self.save();
            self.next()?;
            let param = match self.token_kind() {
                TokenKind::This => {
                    let range = self.token().range;
                    self.next()?;
                    Some(TsPredicateParam::This(range))
                }
                TokenKind::Ident => {
                    let ident = self.ident_from_token();
                    self.next()?;
                    Some(TsPredicateParam::Ident(ident))
                }
                _ => None,
            };
            match param {
                Some(param) => {
                    let (type_ann, end) = if self.token().is_kw(Kw::Is) {
                        self.next()?;
                        let ty = self.parse_ts_type()?;
                        (Some(ty), ty.range().end)
                    } else {
                        (None, param_end(&param))
                    };
                    return Ok(TsType::Predicate(self.arena.alloc(TsTypePredicate {
                        range: TextRange::new(start, end),
                        param,
                        type_ann,
                        asserts: true,
                    })));
                }
                None => self.rewind(saved),
            }
        }

        if self.token().is(TokenKind::This) || self.token_kind() == TokenKind::Ident {
            let saved = self.save();
            let param = if self.token().is(TokenKind::This) {
                let range = self.token().range;
                self.next()?;
                TsPredicateParam::This(range)
            } else {
                let ident = self.ident_from_token();
                self.next()?;
                TsPredicateParam::Ident(ident)
            };
            if self.token().is_kw(Kw::Is) && !self.token().has_preceding_line_break() {
                self.next()?;
                let ty = self.parse_ts_type()?;
                return Ok(TsType::Predicate(self.arena.alloc(TsTypePredicate {
                    range: TextRange::new(start, ty.range().end),
                    param,
                    type_ann: Some(ty),
                    asserts: false,
                })));
            }
            self.rewind(saved);
        }

        self.parse_ts_type()
    }

    fn parse_ts_union_type(&mut self) -> Result<TsType<'a>> {
        let start = self.token_start();
        let leading = self.eat(TokenKind::Bar)?;
        let first = self.parse_ts_intersection_type()?;
        if !leading && !self.token().is(TokenKind::Bar) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat(TokenKind::Bar)? {
            types.push(self.parse_ts_intersection_type()?);
        }
        let end = types.last().map_or(start, |t| t.range().end);
        Ok(TsType::Union(self.arena.alloc(TsUnionType {
            range: TextRange::new(start, end),
            types: alloc_slice(self.arena, &types),
        })))
    }

    fn parse_ts_intersection_type(&mut self) -> Result<TsType<'a>> {
        let start = self.token_start();
        let leading = self.eat(TokenKind::Amp)?;
        let first = self.parse_ts_operator_type()?;
        if !leading && !self.token().is(TokenKind::Amp) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat(TokenKind::Amp)? {
            types.push(self.parse_ts_operator_type()?);
        }
        let end = types.last().map_or(start, |t| t.range().end);
        Ok(TsType::Intersection(self.arena.alloc(TsIntersectionType {
            range: TextRange::new(start, end),
            types: alloc_slice(self.arena, &types),
        })))
    }

    fn parse_ts_operator_type(&mut self) -> Result<TsType<'a>> {
        let op = match self.token().kw {
            Some(Kw::Keyof) => Some(TsTypeOperatorKind::Keyof),
            Some(Kw::Unique) => Some(TsTypeOperatorKind::Unique),
            Some(Kw::Readonly) => Some(TsTypeOperatorKind::Readonly),
            _ => None,
        };
        match op {
            Some(op) => {
                let start = self.token_start();
                self.next()?;
                let type_ann = self.parse_ts_operator_type()?;
                Ok(TsType::Operator(self.arena.alloc(TsTypeOperator {
                    range: TextRange::new(start, type_ann.range().end),
                    op,
                    type_ann,
                })))
            }
            None => self.parse_ts_postfix_type(),
        }
    }

    /// Array (`T[]`) and indexed-access (`T[K]`) suffixes.
    fn parse_ts_postfix_type(&mut self) -> Result<TsType<'a>> {
        let start = self.token_start();
        let mut ty = self.parse_ts_primary_type()?;
        while self.token().is(TokenKind::OpenBracket) && !self.token().has_preceding_line_break() {
            self.next()?;
            if self.token().is(TokenKind::CloseBracket) {
                let end = self.expect(TokenKind::CloseBracket)?.end;
                ty = TsType::Array(self.arena.alloc(TsArrayType {
                    range: TextRange::new(start, end),
                    element: ty,
                }));
            } else {
                let index = self.parse_ts_type()?;
                let end = self.expect(TokenKind::CloseBracket)?.end;
                ty = TsType::IndexedAccess(self.arena.alloc(TsIndexedAccessType {
                    range: TextRange::new(start, end),
                    object: ty,
                    index,
                }));
            }
        }
        Ok(ty)
    }

    fn parse_ts_primary_type(&mut self) -> Result<TsType<'a>> {
        let start = self.token_start();
        match self.token_kind() {
            TokenKind::This => {
                let range = self.token().range;
                self.next()?;
                Ok(TsType::This(self.arena.alloc(TsThisType { range })))
            }
            TokenKind::Void => self.parse_ts_keyword_type(TsKeywordTypeKind::Void),
            TokenKind::Null => self.parse_ts_keyword_type(TsKeywordTypeKind::Null),
            TokenKind::TypeOf => {
                self.next()?;
                let expr_name = self.parse_ts_entity_name()?;
                Ok(TsType::Typeof(self.arena.alloc(TsTypeQuery {
                    range: TextRange::new(start, expr_name.range().end),
                    expr_name,
                })))
            }
            TokenKind::Import => self.parse_ts_import_type(),
            TokenKind::OpenBrace => {
                let (members, end) = self.parse_ts_type_members()?;
                Ok(TsType::TypeLit(self.arena.alloc(TsTypeLit {
                    range: TextRange::new(start, end),
                    members,
                })))
            }
            TokenKind::OpenBracket => self.parse_ts_tuple_type(),
            TokenKind::OpenParen => {
                self.next()?;
                let type_ann = self.parse_ts_type()?;
                let end = self.expect(TokenKind::CloseParen)?.end;
                Ok(TsType::Paren(self.arena.alloc(TsParenType {
                    range: TextRange::new(start, end),
                    type_ann,
                })))
            }
            TokenKind::String | TokenKind::Number | TokenKind::BigInt => {
                self.parse_ts_literal_type(start, false)
            }
            // A substitution-free template type degrades to its cooked
            // string literal.
            TokenKind::NoSubstitutionTemplate => {
                let token = self.token();
                let range = token.range;
                let node = &*self.arena.alloc(StringLit {
                    range,
                    value: self.arena.alloc_str(&token.value),
                });
                self.next()?;
                Ok(TsType::Literal(self.arena.alloc(TsLitType {
                    range,
                    lit: TsLit::String(node),
                })))
            }
            TokenKind::Minus if self.lookahead_is(TokenKind::Number)? => {
                self.next()?;
                self.parse_ts_literal_type(start, true)
            }
            TokenKind::True | TokenKind::False => {
                let value = self.token().is(TokenKind::True);
                let range = self.token().range;
                self.next()?;
                let lit = TsLit::Bool(self.arena.alloc(BoolLit { range, value }));
                Ok(TsType::Literal(self.arena.alloc(TsLitType { range, lit })))
            }
            TokenKind::Ident => {
                if let Some(kind) = keyword_type_kind(self.token().kw) {
                    return self.parse_ts_keyword_type(kind);
                }
                let name = self.parse_ts_entity_name()?;
                let type_args = if self.token().is(TokenKind::Lt) {
                    self.parse_type_args(true)?
                } else {
                    None
                };
                let end = type_args.map_or(name.range().end, |a| a.range.end);
                Ok(TsType::Ref(self.arena.alloc(TsTypeRef {
                    range: TextRange::new(start, end),
                    name,
                    type_args,
                })))
            }
            _ => Err(self.error_here(messages::TYPE_EXPECTED)),
        }
    }

    fn parse_ts_keyword_type(&mut self, kind: TsKeywordTypeKind) -> Result<TsType<'a>> {
        let range = self.token().range;
        self.next()?;
        Ok(TsType::Keyword(self.arena.alloc(TsKeywordType { range, kind })))
    }

    fn parse_ts_literal_type(&mut self, start: u32, negative: bool) -> Result<TsType<'a>> {
        let token = self.token();
        let lit = match token.kind {
            TokenKind::String => TsLit::String(self.parse_string_literal()?),
            TokenKind::Number => {
                let value = if negative { -token.num } else { token.num };
                let node = &*self.arena.alloc(NumberLit {
                    range: token.range,
                    value,
                });
                self.next()?;
                TsLit::Number(node)
            }
            TokenKind::BigInt => {
                let node = &*self.arena.alloc(BigIntLit {
                    range: token.range,
                    value: self.arena.alloc_str(&token.value),
                });
                self.next()?;
                TsLit::BigInt(node)
            }
            _ => return Err(self.error_here(messages::TYPE_EXPECTED)),
        };
        let end = match lit {
            TsLit::String(n) => n.range.end,
            TsLit::Number(n) => n.range.end,
            TsLit::BigInt(n) => n.range.end,
            TsLit::Bool(n) => n.range.end,
        };
        Ok(TsType::Literal(self.arena.alloc(TsLitType {
            range: TextRange::new(start, end),
            lit,
        })))
    }

    /// `import("m").A.B<T>`.
    fn parse_ts_import_type(&mut self) -> Result<TsType<'a>> {
        let start = self.expect(TokenKind::Import)?.pos;
        self.expect(TokenKind::OpenParen)?;
        if !self.token().is(TokenKind::String) {
            return Err(self.error_here("String literal expected."));
        }
        let source = self.parse_string_literal()?;
        let mut end = self.expect(TokenKind::CloseParen)?.end;
        let qualifier = if self.eat(TokenKind::Dot)? {
            let name = self.parse_ts_entity_name()?;
            end = name.range().end;
            Some(name)
        } else {
            None
        };
        let type_args = if self.token().is(TokenKind::Lt) {
            let args = self.parse_type_args(true)?;
            if let Some(args) = args {
                end = args.range.end;
            }
            args
        } else {
            None
        };
        Ok(TsType::Import(self.arena.alloc(TsImportType {
            range: TextRange::new(start, end),
            source,
            qualifier,
            type_args,
        })))
    }

    fn parse_ts_tuple_type(&mut self) -> Result<TsType<'a>> {
        let start = self.expect(TokenKind::OpenBracket)?.pos;
        let mut elements = Vec::new();
        while !self.token().is(TokenKind::CloseBracket) {
            let elem_start = self.token_start();
            let rest = self.eat(TokenKind::DotDotDot)?;

            // `name: T` and `name?: T` labeled elements.
            let label = if self.token_kind() == TokenKind::Ident {
                let saved = self.save();
                let ident = self.ident_from_token();
                self.next()?;
                let labeled = match self.token_kind() {
                    TokenKind::Colon => true,
                    TokenKind::Question => self.lookahead_is(TokenKind::Colon)?,
                    _ => false,
                };
                if labeled {
                    Some(ident)
                } else {
                    self.rewind(saved);
                    None
                }
            } else {
                None
            };

            let mut optional = false;
            if label.is_some() {
                if self.eat(TokenKind::Question)? {
                    optional = true;
                }
                self.expect(TokenKind::Colon)?;
            }
            let ty = self.parse_ts_type()?;
            elements.push(TsTupleElement {
                range: TextRange::new(elem_start, ty.range().end),
                label,
                ty,
                optional,
                rest,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBracket)?.end;
        Ok(TsType::Tuple(self.arena.alloc(TsTupleType {
            range: TextRange::new(start, end),
            elements: alloc_slice(self.arena, &elements),
        })))
    }

    /// `<T>(params) => R` and `(params) => R`.
    fn parse_ts_fn_type(&mut self) -> Result<TsType<'a>> {
        let start = self.token_start();
        let type_params = if self.token().is(TokenKind::Lt) {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let (params, _) = self.parse_ts_signature_params()?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_ts_type()?;
        Ok(TsType::Function(self.arena.alloc(TsFnType {
            range: TextRange::new(start, return_type.range().end),
            type_params,
            params: alloc_slice(self.arena, &params),
            return_type,
        })))
    }

    fn parse_ts_ctor_type(&mut self, is_abstract: bool) -> Result<TsType<'a>> {
        let start = self.expect(TokenKind::New)?.pos;
        let type_params = if self.token().is(TokenKind::Lt) {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let (params, _) = self.parse_ts_signature_params()?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_ts_type()?;
        Ok(TsType::Constructor(self.arena.alloc(TsConstructorType {
            range: TextRange::new(start, return_type.range().end),
            type_params,
            params: alloc_slice(self.arena, &params),
            return_type,
            is_abstract,
        })))
    }

    /// Parameter list of a signature in type position. Unlike value
    /// parameter lists these never touch the binder. Returns the params
    /// and the closing paren end offset.
    fn parse_ts_signature_params(&mut self) -> Result<(Vec<Param<'a>>, u32)> {
        self.expect(TokenKind::OpenParen)?;
        let mut params = Vec::new();
        while !self.token().is(TokenKind::CloseParen) {
            let start = self.token_start();
            let pattern = self.parse_pattern_element(false, false)?;
            let is_rest = matches!(pattern, Pattern::Rest(_));
            params.push(Param {
                range: TextRange::new(start, pattern.range().end),
                pattern,
                modifiers: ModifierFlags::NONE,
            });
            if self.token().is(TokenKind::Comma) {
                if is_rest {
                    return Err(self.error_here(messages::REST_MUST_BE_LAST));
                }
                self.next()?;
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseParen)?.end;
        Ok((params, end))
    }

    /// `A`, `A.B.C`.
    pub(crate) fn parse_ts_entity_name(&mut self) -> Result<TsEntityName<'a>> {
        if self.token_kind() != TokenKind::Ident {
            return Err(self.error_here(messages::IDENTIFIER_EXPECTED));
        }
        let ident = self.ident_from_token();
        self.next()?;
        let mut name = TsEntityName::Ident(ident);
        while self.token().is(TokenKind::Dot) {
            self.next()?;
            if !self.token().is_identifier_like() && !self.token_kind().is_reserved_word() {
                return Err(self.error_here(messages::IDENTIFIER_EXPECTED));
            }
            let right = self.ident_from_token();
            self.next()?;
            name = TsEntityName::Qualified(self.arena.alloc(TsQualifiedName {
                range: TextRange::new(name.range().pos, right.range.end),
                left: name,
                right,
            }));
        }
        Ok(name)
    }

    // ======================================================================
    // Type members
    // ======================================================================

    /// `{ ... }` body shared by interfaces and type literals. Returns
    /// the members and the closing brace end offset.
    pub(crate) fn parse_ts_type_members(
        &mut self,
    ) -> Result<(&'a [TsTypeElement<'a>], u32)> {
        self.expect(TokenKind::OpenBrace)?;
        let mut members = Vec::new();
        while !matches!(self.token_kind(), TokenKind::CloseBrace | TokenKind::Eos) {
            members.push(self.parse_ts_type_member()?);
            // Members separate with `,` or `;`, both optional before `}`.
            if !self.eat(TokenKind::Comma)? {
                let _ = self.eat(TokenKind::Semicolon)?;
            }
        }
        let end = self.expect(TokenKind::CloseBrace)?.end;
        Ok((alloc_slice(self.arena, &members), end))
    }

    fn parse_ts_type_member(&mut self) -> Result<TsTypeElement<'a>> {
        let start = self.token_start();

        // Call and construct signatures.
        if matches!(self.token_kind(), TokenKind::OpenParen | TokenKind::Lt) {
            let (type_params, params, return_type, end) = self.parse_ts_member_signature()?;
            return Ok(TsTypeElement::Call(self.arena.alloc(TsCallSignature {
                range: TextRange::new(start, end),
                type_params,
                params,
                return_type,
            })));
        }
        if self.token().is(TokenKind::New)
            && self.signature_follows_lookahead(TokenKind::New)?
        {
            self.next()?;
            let (type_params, params, return_type, end) = self.parse_ts_member_signature()?;
            return Ok(TsTypeElement::Construct(self.arena.alloc(
                TsConstructSignature {
                    range: TextRange::new(start, end),
                    type_params,
                    params,
                    return_type,
                },
            )));
        }

        let mut readonly = false;
        if self.token().is_kw(Kw::Readonly) && self.modifier_precedes_member_name()? {
            readonly = true;
            self.next()?;
        }

        // Index signatures.
        if self.token().is(TokenKind::OpenBracket) {
            let modifiers = if readonly {
                ModifierFlags::READONLY
            } else {
                ModifierFlags::NONE
            };
            if let Some(index) = self.try_parse_index_signature(start, modifiers)? {
                return Ok(TsTypeElement::Index(index));
            }
        }

        // Accessors.
        let mut kind = MethodKind::Method;
        if (self.token().is_kw(Kw::Get) || self.token().is_kw(Kw::Set))
            && self.modifier_precedes_member_name()?
        {
            kind = if self.token().is_kw(Kw::Get) {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next()?;
        }

        let (key, computed) = self.parse_property_key()?;
        let optional = self.eat(TokenKind::Question)?;

        if matches!(self.token_kind(), TokenKind::OpenParen | TokenKind::Lt)
            || kind != MethodKind::Method
        {
            let (type_params, params, return_type, end) = self.parse_ts_member_signature()?;
            match kind {
                MethodKind::Get if !params.is_empty() => {
                    return Err(self.error_at(start, messages::GETTER_NO_PARAMS));
                }
                MethodKind::Set if params.len() != 1 => {
                    return Err(self.error_at(start, messages::SETTER_ONE_PARAM));
                }
                MethodKind::Set if matches!(params[0].pattern, Pattern::Rest(_)) => {
                    return Err(self.error_at(start, messages::SETTER_NO_REST));
                }
                _ => {}
            }
            return Ok(TsTypeElement::Method(self.arena.alloc(TsMethodSignature {
                range: TextRange::new(start, end),
                kind,
                key,
                type_params,
                params,
                return_type,
                optional,
                computed,
            })));
        }

        let (type_ann, end) = if self.eat(TokenKind::Colon)? {
            let ty = self.parse_ts_type()?;
            (Some(ty), ty.range().end)
        } else {
            (None, key.range().end)
        };
        Ok(TsTypeElement::Property(self.arena.alloc(
            TsPropertySignature {
                range: TextRange::new(start, end),
                key,
                type_ann,
                optional,
                readonly,
                computed,
            },
        )))
    }

    fn parse_ts_member_signature(
        &mut self,
    ) -> Result<(
        Option<&'a TsTypeParamDecl<'a>>,
        &'a [Param<'a>],
        Option<TsType<'a>>,
        u32,
    )> {
        let type_params = if self.token().is(TokenKind::Lt) {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let (params, params_end) = self.parse_ts_signature_params()?;
        let params = alloc_slice(self.arena, &params);
        let (return_type, end) = if self.eat(TokenKind::Colon)? {
            let ty = self.parse_ts_type_or_predicate()?;
            (Some(ty), ty.range().end)
        } else {
            (None, params_end)
        };
        Ok((type_params, params, return_type, end))
    }

    /// Whether `new` here begins a construct signature rather than a
    /// member named `new`.
    fn signature_follows_lookahead(&mut self, kind: TokenKind) -> Result<bool> {
        debug_assert_eq!(self.token_kind(), kind);
        let saved = self.save();
        self.next()?;
        let hit = matches!(self.token_kind(), TokenKind::OpenParen | TokenKind::Lt);
        self.rewind(saved);
        Ok(hit)
    }

    /// Distinguishes `readonly x: T` from a member named `readonly`.
    fn modifier_precedes_member_name(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let hit = !self.token().has_preceding_line_break()
            && (self.token().is_identifier_like()
                || self.token_kind().is_reserved_word()
                || matches!(
                    self.token_kind(),
                    TokenKind::String | TokenKind::Number | TokenKind::OpenBracket
                ));
        self.rewind(saved);
        Ok(hit)
    }

    // ======================================================================
    // Type parameters and arguments
    // ======================================================================

    pub(crate) fn parse_type_params(&mut self) -> Result<&'a TsTypeParamDecl<'a>> {
        let start = self.expect(TokenKind::Lt)?.pos;
        if self.close_type_list()? {
            return Err(self.error_at(start, "Type parameter list cannot be empty."));
        }
        let mut params = Vec::new();
        loop {
            let param_start = self.token_start();
            let variance = self.parse_ts_variance()?;
            let name = self.parse_ident()?;
            let constraint = if self.eat(TokenKind::Extends)? {
                Some(self.parse_ts_type()?)
            } else {
                None
            };
            let default = if self.eat(TokenKind::Eq)? {
                Some(self.parse_ts_type()?)
            } else {
                None
            };
            let end = default
                .or(constraint)
                .map_or(name.range.end, |t| t.range().end);
            params.push(TsTypeParam {
                range: TextRange::new(param_start, end),
                name,
                variance,
                constraint,
                default,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        let end_range = self.expect_type_list_close()?;
        Ok(self.arena.alloc(TsTypeParamDecl {
            range: TextRange::new(start, end_range.end),
            params: alloc_slice(self.arena, &params),
        }))
    }

    /// `in`/`out` modifiers before a type parameter name. `out` is
    /// contextual; it counts only when a name follows.
    fn parse_ts_variance(&mut self) -> Result<Option<TsVariance>> {
        let mut variance = None;
        if self.token().is(TokenKind::In) {
            self.next()?;
            variance = Some(TsVariance::In);
        }
        if self.token().is_kw(Kw::Out) && self.lookahead_is_identifier()? {
            self.next()?;
            variance = Some(match variance {
                Some(TsVariance::In) => TsVariance::InOut,
                _ => TsVariance::Out,
            });
        }
        Ok(variance)
    }

    /// `<T, U>` type-argument list. With `throw_error` unset the two
    /// recoverable shapes fail softly: a token that cannot open a type,
    /// and a list with no closing `>`. The cursor is rewound and `None`
    /// returned so the caller can fall back to the expression grammar.
    /// Errors raised inside a committed type still propagate either way.
    pub(crate) fn parse_type_args(
        &mut self,
        throw_error: bool,
    ) -> Result<Option<&'a TsTypeArgs<'a>>> {
        let saved = self.save();
        let start = self.expect(TokenKind::Lt)?.pos;
        let mut args = Vec::new();
        loop {
            if !self.token_starts_type() {
                if throw_error {
                    return Err(self.error_here(messages::TYPE_EXPECTED));
                }
                self.rewind(saved);
                return Ok(None);
            }
            args.push(self.parse_ts_type()?);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        if !self.close_type_list()? && !throw_error {
            self.rewind(saved);
            return Ok(None);
        }
        let end_range = self.expect_type_list_close()?;
        Ok(Some(self.arena.alloc(TsTypeArgs {
            range: TextRange::new(start, end_range.end),
            args: alloc_slice(self.arena, &args),
        })))
    }

    /// Whether the current token can open a type.
    fn token_starts_type(&self) -> bool {
        self.token().is_identifier_like()
            || matches!(
                self.token_kind(),
                TokenKind::Lt
                    | TokenKind::New
                    | TokenKind::OpenParen
                    | TokenKind::OpenBrace
                    | TokenKind::OpenBracket
                    | TokenKind::This
                    | TokenKind::Void
                    | TokenKind::Null
                    | TokenKind::TypeOf
                    | TokenKind::Import
                    | TokenKind::String
                    | TokenKind::Number
                    | TokenKind::BigInt
                    | TokenKind::NoSubstitutionTemplate
                    | TokenKind::Minus
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Bar
                    | TokenKind::Amp
            )
    }

    fn close_type_list(&mut self) -> Result<bool> {
        Ok(matches!(
            self.token_kind(),
            TokenKind::Gt
                | TokenKind::GtGt
                | TokenKind::GtGtGt
                | TokenKind::GtEq
                | TokenKind::GtGtEq
                | TokenKind::GtGtGtEq
        ))
    }

    /// Consumes one closing `>`, splitting compound tokens such as `>>`
    /// left over from nested lists.
    fn expect_type_list_close(&mut self) -> Result<TextRange> {
        match self.token_kind() {
            TokenKind::Gt => {}
            TokenKind::GtGt
            | TokenKind::GtGtGt
            | TokenKind::GtEq
            | TokenKind::GtGtEq
            | TokenKind::GtGtGtEq => self.lexer.split_greater_than(),
            _ => return Err(self.error_here("'>' expected")),
        }
        self.expect(TokenKind::Gt)
    }
}

fn keyword_type_kind(kw: Option<Kw>) -> Option<TsKeywordTypeKind> {
    match kw? {
        Kw::Any => Some(TsKeywordTypeKind::Any),
        Kw::Unknown => Some(TsKeywordTypeKind::Unknown),
        Kw::Never => Some(TsKeywordTypeKind::Never),
        Kw::Undefined => Some(TsKeywordTypeKind::Undefined),
        Kw::Boolean => Some(TsKeywordTypeKind::Boolean),
        Kw::Number => Some(TsKeywordTypeKind::Number),
        Kw::String => Some(TsKeywordTypeKind::String),
        Kw::Symbol => Some(TsKeywordTypeKind::Symbol),
        Kw::Object => Some(TsKeywordTypeKind::Object),
        Kw::Bigint => Some(TsKeywordTypeKind::BigInt),
        _ => None,
    }
}

fn param_end(param: &TsPredicateParam<'_>) -> u32 {
    match param {
        TsPredicateParam::Ident(n) => n.range.end,
        TsPredicateParam::This(r) => r.end,
    }
}
