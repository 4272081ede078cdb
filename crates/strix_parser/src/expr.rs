//! Expression grammar.
//!
//! Binary expressions are parsed by right recursion followed by a
//! rotation pass: the right operand is parsed as a complete expression,
//! then operators of lower or equal precedence are rotated off its left
//! spine to restore left associativity. Parenthesized operands are
//! distinct `Paren` nodes and never participate in the rotation.

use strix_ast::*;
use strix_binder::ScopeKind;
use strix_core::text::TextRange;
use strix_diagnostics::{format_args_message, messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::context::{ExpressionParseFlags, ParserStatus};
use crate::parser_impl::Parser;
use crate::precedence::{assign_op_for, binary_op_for};

impl<'a> Parser<'a> {
    /// Entry point for one expression. `ACCEPT_COMMA` lets a comma
    /// extend the result into a sequence.
    pub(crate) fn parse_expression(
        &mut self,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let expr = if self.token().is_kw(Kw::Yield)
            && !flags.contains(ExpressionParseFlags::DISALLOW_YIELD)
            && self.in_status(ParserStatus::GENERATOR_FUNCTION)
        {
            self.parse_yield_expression()?
        } else {
            let unary = self.parse_unary_or_prefix(flags)?;
            self.parse_assignment_expression(unary, flags)?
        };

        if flags.contains(ExpressionParseFlags::ACCEPT_COMMA)
            && self.token().is(TokenKind::Comma)
        {
            return self.parse_sequence(expr, flags);
        }
        Ok(expr)
    }

    fn parse_sequence(
        &mut self,
        first: Expression<'a>,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let start = first.range().pos;
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            if self.token().is(TokenKind::CloseParen) {
                // Trailing comma, only meaningful for arrow covers.
                break;
            }
            if self.token().is(TokenKind::DotDotDot) {
                if !flags.contains(ExpressionParseFlags::ACCEPT_REST) {
                    return Err(self.error_here(messages::UNEXPECTED_TOKEN));
                }
                expressions.push(self.parse_spread_element()?);
                if self.token().is(TokenKind::Comma) {
                    return Err(self.error_here(messages::REST_MUST_BE_LAST));
                }
                break;
            }
            let unary = self.parse_unary_or_prefix(flags)?;
            expressions.push(self.parse_assignment_expression(unary, flags)?);
        }
        let end = expressions.last().map(|e| e.range().end).unwrap_or(start);
        Ok(Expression::Sequence(self.arena.alloc(SequenceExpr {
            range: TextRange::new(start, end),
            expressions: alloc_slice(self.arena, &expressions),
        })))
    }

    fn parse_yield_expression(&mut self) -> Result<Expression<'a>> {
        let start = self.token_start();
        if self.in_status(ParserStatus::FUNCTION_PARAM) {
            return Err(self.error_here("Yield is not allowed in generator parameters"));
        }
        self.next()?;

        let mut delegate = false;
        let mut argument = None;
        let mut end = self.token_start();
        if self.token().is(TokenKind::Star) {
            delegate = true;
            self.next()?;
            let arg = self.parse_expression(ExpressionParseFlags::DISALLOW_YIELD)?;
            end = arg.range().end;
            argument = Some(arg);
        } else if !self.token().has_preceding_line_break()
            && self.token_kind().starts_expression()
        {
            let arg = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
            end = arg.range().end;
            argument = Some(arg);
        }
        Ok(Expression::Yield(self.arena.alloc(YieldExpr {
            range: TextRange::new(start, end),
            argument,
            delegate,
        })))
    }

    // ======================================================================
    // Assignment level
    // ======================================================================

    /// Continues the expression that starts with `lhs`: conditional,
    /// binary, arrow, `as`, and assignment forms.
    fn parse_assignment_expression(
        &mut self,
        lhs: Expression<'a>,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let allow_in = !flags.contains(ExpressionParseFlags::STOP_AT_IN);
        match self.token_kind() {
            TokenKind::Question => {
                self.next()?;
                let consequent = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
                self.expect(TokenKind::Colon)?;
                let alternate = self
                    .parse_expression(flags & ExpressionParseFlags::STOP_AT_IN)?;
                Ok(Expression::Conditional(self.arena.alloc(ConditionalExpr {
                    range: TextRange::new(lhs.range().pos, alternate.range().end),
                    test: lhs,
                    consequent,
                    alternate,
                })))
            }
            TokenKind::Arrow => {
                let params = self.arrow_params_from_expression(lhs)?;
                self.parse_arrow_tail(lhs.range().pos, params, None, None, false)
            }
            TokenKind::Eq => {
                self.validate_assignment_target(lhs)?;
                self.next()?;
                let right =
                    self.parse_expression(flags & ExpressionParseFlags::STOP_AT_IN)?;
                Ok(Expression::Assignment(self.arena.alloc(AssignmentExpr {
                    range: TextRange::new(lhs.range().pos, right.range().end),
                    op: AssignOp::Assign,
                    left: lhs,
                    right,
                })))
            }
            kind if assign_op_for(kind).is_some() => {
                let op = assign_op_for(kind).unwrap();
                self.validate_lvalue_simple(lhs)?;
                self.next()?;
                let right =
                    self.parse_expression(flags & ExpressionParseFlags::STOP_AT_IN)?;
                Ok(Expression::Assignment(self.arena.alloc(AssignmentExpr {
                    range: TextRange::new(lhs.range().pos, right.range().end),
                    op,
                    left: lhs,
                    right,
                })))
            }
            _ if binary_op_for(self.token(), allow_in).is_some() => {
                let expr = self.parse_binary_expression(lhs, flags)?;
                self.parse_assignment_expression(expr, flags)
            }
            _ if self.is_ts()
                && self.token().is_kw(Kw::As)
                && !self.token().has_preceding_line_break()
                && !flags.contains(ExpressionParseFlags::EXP_DISALLOW_AS) =>
            {
                self.next()?;
                let type_ann = self.parse_ts_type()?;
                let node = self.arena.alloc(TsAsExpr {
                    range: TextRange::new(lhs.range().pos, type_ann.range().end),
                    expr: lhs,
                    type_ann,
                });
                self.parse_assignment_expression(Expression::TsAs(node), flags)
            }
            _ => Ok(lhs),
        }
    }

    // ======================================================================
    // Binary expressions and the rotation
    // ======================================================================

    fn parse_binary_expression(
        &mut self,
        left: Expression<'a>,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let allow_in = !flags.contains(ExpressionParseFlags::STOP_AT_IN);
        let op = binary_op_for(self.token(), allow_in)
            .unwrap_or(BinaryOp::Add);
        let op_pos = self.token_start();

        if op == BinaryOp::Exponent {
            if let Expression::Unary(_) = left {
                return Err(self.error_at(
                    left.range().pos,
                    "Illegal expression. Wrap left hand side or entire exponentiation in parentheses.",
                ));
            }
        }
        self.next()?;

        // The right side is parsed as a full expression and rotated
        // afterwards, so `a * b + c` first produces `b + c` and then
        // gets amended into `(a * b) + c`.
        let rhs_flags = ExpressionParseFlags::DISALLOW_YIELD
            | (flags & ExpressionParseFlags::STOP_AT_IN);
        let right = self.parse_expression(rhs_flags)?;

        let (cond, right_core) = match right {
            Expression::Conditional(c) => (Some(c), c.test),
            other => (None, other),
        };

        let combined = match right_core {
            Expression::Binary(rb) if Self::should_amend(rb, op) => {
                self.amend_left_spine(rb, op, left, op_pos)?
            }
            _ => self.make_binary(op, left, right_core, op_pos)?,
        };

        match cond {
            Some(c) => Ok(Expression::Conditional(self.arena.alloc(ConditionalExpr {
                range: TextRange::new(combined.range().pos, c.range.end),
                test: combined,
                consequent: c.consequent,
                alternate: c.alternate,
            }))),
            None => Ok(combined),
        }
    }

    fn should_amend(right: &BinaryExpr<'a>, op: BinaryOp) -> bool {
        right.op.precedence() <= op.precedence()
            && !(op == BinaryOp::Exponent && right.op == BinaryOp::Exponent)
    }

    /// Rebuilds `node` with `left` attached at the deepest amendable
    /// point of its left spine.
    fn amend_left_spine(
        &mut self,
        node: &'a BinaryExpr<'a>,
        op: BinaryOp,
        left: Expression<'a>,
        op_pos: u32,
    ) -> Result<Expression<'a>> {
        let new_left = match node.left {
            Expression::Binary(inner) if Self::should_amend(inner, op) => {
                self.amend_left_spine(inner, op, left, op_pos)?
            }
            other => self.make_binary(op, left, other, op_pos)?,
        };
        self.make_binary(node.op, new_left, node.right, op_pos)
    }

    fn make_binary(
        &mut self,
        op: BinaryOp,
        left: Expression<'a>,
        right: Expression<'a>,
        op_pos: u32,
    ) -> Result<Expression<'a>> {
        let mixes_logical = |e: &Expression<'a>| {
            matches!(e, Expression::Binary(b)
                if matches!(b.op, BinaryOp::LogicalOr | BinaryOp::LogicalAnd))
        };
        let mixes_nullish = |e: &Expression<'a>| {
            matches!(e, Expression::Binary(b) if b.op == BinaryOp::NullishCoalescing)
        };
        let bad = match op {
            BinaryOp::NullishCoalescing => mixes_logical(&left) || mixes_logical(&right),
            BinaryOp::LogicalOr | BinaryOp::LogicalAnd => {
                mixes_nullish(&left) || mixes_nullish(&right)
            }
            _ => false,
        };
        if bad {
            return Err(self.error_at(op_pos, messages::NULLISH_NEEDS_PARENS));
        }
        Ok(Expression::Binary(self.arena.alloc(BinaryExpr {
            range: TextRange::new(left.range().pos, right.range().end),
            op,
            left,
            right,
        })))
    }

    // ======================================================================
    // Unary and update
    // ======================================================================

    fn parse_unary_or_prefix(
        &mut self,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let start = self.token_start();
        let unary_op = match self.token_kind() {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::TypeOf => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = unary_op {
            self.next()?;
            let argument = self.parse_unary_or_prefix(flags)?;
            if op == UnaryOp::Delete {
                match argument.unwrap_parens() {
                    Expression::Ident(_) => {
                        return Err(
                            self.error_at(start, "Deleting local variable in strict mode")
                        )
                    }
                    Expression::Member(m)
                        if matches!(m.property, Expression::PrivateName(_)) =>
                    {
                        return Err(self.error_at(start, "Private fields can not be deleted"))
                    }
                    _ => {}
                }
            }
            return Ok(Expression::Unary(self.arena.alloc(UnaryExpr {
                range: TextRange::new(start, argument.range().end),
                op,
                argument,
            })));
        }

        if matches!(self.token_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let op = if self.token().is(TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.next()?;
            let argument = self.parse_unary_or_prefix(flags)?;
            self.check_update_target(&argument, true)?;
            return Ok(Expression::Update(self.arena.alloc(UpdateExpr {
                range: TextRange::new(start, argument.range().end),
                op,
                prefix: true,
                argument,
            })));
        }

        if self.token().is_kw(Kw::Await) {
            if self.in_status(ParserStatus::ASYNC_FUNCTION) {
                if self.in_status(ParserStatus::FUNCTION_PARAM) {
                    return Err(self.error_here(
                        "Illegal await-expression in formal parameters of async function",
                    ));
                }
                if self.in_status(ParserStatus::DISALLOW_AWAIT) {
                    return Err(self.error_here(messages::AWAIT_RESERVED));
                }
                self.next()?;
                let argument = self.parse_unary_or_prefix(flags)?;
                return Ok(Expression::Await(self.arena.alloc(AwaitExpr {
                    range: TextRange::new(start, argument.range().end),
                    argument,
                })));
            }
            // Outside an async context `await` is an error only when an
            // operand follows; otherwise it stays a plain identifier.
            if self.lookahead_starts_await_operand()? {
                return Err(self.error_here(messages::AWAIT_RESERVED));
            }
        }

        let expr = self.parse_lhs_expression(flags)?;

        if matches!(self.token_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.token().has_preceding_line_break()
        {
            let op = if self.token().is(TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.check_update_target(&expr, false)?;
            let end = self.token_end();
            self.next()?;
            return Ok(Expression::Update(self.arena.alloc(UpdateExpr {
                range: TextRange::new(start, end),
                op,
                prefix: false,
                argument: expr,
            })));
        }
        Ok(expr)
    }

    fn lookahead_starts_await_operand(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let starts = !self.token().has_preceding_line_break()
            && (self.token().is_identifier_like()
                || matches!(
                    self.token_kind(),
                    TokenKind::Number
                        | TokenKind::String
                        | TokenKind::BigInt
                        | TokenKind::NoSubstitutionTemplate
                        | TokenKind::TemplateHead
                        | TokenKind::OpenParen
                        | TokenKind::OpenBracket
                        | TokenKind::This
                        | TokenKind::New
                        | TokenKind::Function
                        | TokenKind::Super
                        | TokenKind::True
                        | TokenKind::False
                        | TokenKind::Null
                ));
        self.rewind(saved);
        Ok(starts)
    }

    fn check_update_target(&self, expr: &Expression<'a>, prefix: bool) -> Result<()> {
        match expr.unwrap_parens() {
            Expression::Ident(_) | Expression::Member(_) | Expression::TsNonNull(_) => Ok(()),
            other => {
                let msg = if prefix {
                    "Invalid left-hand side in prefix operation"
                } else {
                    "Invalid left-hand side in postfix operation"
                };
                Err(self.error_at(other.range().pos, msg))
            }
        }
    }

    // ======================================================================
    // Member and call chains
    // ======================================================================

    pub(crate) fn parse_lhs_expression(
        &mut self,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let primary = if self.token().is(TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression(flags)?
        };
        self.parse_post_primary(primary)
    }

    fn parse_post_primary(&mut self, mut expr: Expression<'a>) -> Result<Expression<'a>> {
        let start = expr.range().pos;
        let mut in_chain = false;
        loop {
            match self.token_kind() {
                TokenKind::QuestionDot => {
                    in_chain = true;
                    self.next()?;
                    match self.token_kind() {
                        TokenKind::OpenParen => {
                            let (arguments, end) = self.parse_arguments()?;
                            expr = Expression::Call(self.arena.alloc(CallExpr {
                                range: TextRange::new(start, end),
                                callee: expr,
                                type_args: None,
                                arguments,
                                optional: true,
                            }));
                        }
                        TokenKind::OpenBracket => {
                            expr = self.parse_computed_member(start, expr, true)?;
                        }
                        TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                            return Err(self.error_here(messages::TAGGED_TEMPLATE_IN_CHAIN));
                        }
                        _ => {
                            let property = self.parse_member_property()?;
                            expr = Expression::Member(self.arena.alloc(MemberExpr {
                                range: TextRange::new(start, property.range().end),
                                object: expr,
                                property,
                                computed: false,
                                optional: true,
                            }));
                        }
                    }
                }
                TokenKind::Dot => {
                    self.next()?;
                    let property = self.parse_member_property()?;
                    expr = Expression::Member(self.arena.alloc(MemberExpr {
                        range: TextRange::new(start, property.range().end),
                        object: expr,
                        property,
                        computed: false,
                        optional: false,
                    }));
                }
                TokenKind::OpenBracket => {
                    expr = self.parse_computed_member(start, expr, false)?;
                }
                TokenKind::OpenParen => {
                    let (arguments, end) = self.parse_arguments()?;
                    expr = Expression::Call(self.arena.alloc(CallExpr {
                        range: TextRange::new(start, end),
                        callee: expr,
                        type_args: None,
                        arguments,
                        optional: false,
                    }));
                }
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                    if in_chain {
                        return Err(self.error_here(messages::TAGGED_TEMPLATE_IN_CHAIN));
                    }
                    let quasi = self.parse_template_literal()?;
                    expr = Expression::TaggedTemplate(self.arena.alloc(TaggedTemplate {
                        range: TextRange::new(start, quasi.range.end),
                        tag: expr,
                        type_args: None,
                        quasi,
                    }));
                }
                TokenKind::Not
                    if self.is_ts() && !self.token().has_preceding_line_break() =>
                {
                    let end = self.token_end();
                    self.next()?;
                    expr = Expression::TsNonNull(self.arena.alloc(TsNonNullExpr {
                        range: TextRange::new(start, end),
                        expr,
                    }));
                }
                TokenKind::Lt | TokenKind::LtLt if self.is_ts() => {
                    match self.try_generic_call(start, expr, in_chain)? {
                        Some(next) => expr = next,
                        None => break,
                    }
                }
                _ => break,
            }
        }
        if in_chain {
            expr = Expression::Chain(self.arena.alloc(ChainExpr {
                range: expr.range(),
                expression: expr,
            }));
        }
        Ok(expr)
    }

    fn parse_computed_member(
        &mut self,
        start: u32,
        object: Expression<'a>,
        optional: bool,
    ) -> Result<Expression<'a>> {
        self.expect(TokenKind::OpenBracket)?;
        let property = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        let end = self.expect(TokenKind::CloseBracket)?.end;
        Ok(Expression::Member(self.arena.alloc(MemberExpr {
            range: TextRange::new(start, end),
            object,
            property,
            computed: true,
            optional,
        })))
    }

    /// Member names admit reserved words and private names.
    fn parse_member_property(&mut self) -> Result<Expression<'a>> {
        if self.token().is(TokenKind::PrivateIdent) {
            let token = self.token();
            let sym = self.interner.intern(&token.value);
            let node = &*self.arena.alloc(PrivateName {
                range: token.range,
                sym,
                name: self.arena.alloc_str(&self.token().value),
            });
            self.next()?;
            return Ok(Expression::PrivateName(node));
        }
        if self.token().is_identifier_like() || self.token_kind().is_reserved_word() {
            let ident = self.ident_from_token();
            self.next()?;
            return Ok(Expression::Ident(ident));
        }
        Err(self.error_here(messages::IDENTIFIER_EXPECTED))
    }

    /// Speculative `callee<TypeArgs>(...)`. A `<<` token is split into
    /// two `<` first; rewinding restores it. A recoverable type-argument
    /// failure, or anything but a call or template afterwards, rewinds
    /// and leaves the `<` for the relational grammar. Hard errors inside
    /// the type arguments are swallowed only for the split `<<`; on a
    /// plain `<` they propagate.
    fn try_generic_call(
        &mut self,
        start: u32,
        callee: Expression<'a>,
        in_chain: bool,
    ) -> Result<Option<Expression<'a>>> {
        let saved = self.save();
        let is_left_shift = self.token().is(TokenKind::LtLt);
        if is_left_shift {
            self.lexer.split_left_shift();
        }
        let parsed = self.parse_type_args(false);
        let type_args = match parsed {
            Ok(Some(args)) => args,
            Ok(None) => {
                self.rewind(saved);
                return Ok(None);
            }
            Err(err) => {
                if !is_left_shift {
                    return Err(err);
                }
                self.rewind(saved);
                return Ok(None);
            }
        };
        if self.token().is(TokenKind::Eos) {
            return Err(self.error_here(messages::CALL_OR_TEMPLATE_EXPECTED));
        }
        match self.token_kind() {
            TokenKind::OpenParen => {
                let (arguments, end) = self.parse_arguments()?;
                Ok(Some(Expression::Call(self.arena.alloc(CallExpr {
                    range: TextRange::new(start, end),
                    callee,
                    type_args: Some(type_args),
                    arguments,
                    optional: false,
                }))))
            }
            TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                if in_chain {
                    return Err(self.error_here(messages::TAGGED_TEMPLATE_IN_CHAIN));
                }
                let quasi = self.parse_template_literal()?;
                Ok(Some(Expression::TaggedTemplate(self.arena.alloc(
                    TaggedTemplate {
                        range: TextRange::new(start, quasi.range.end),
                        tag: callee,
                        type_args: Some(type_args),
                        quasi,
                    },
                ))))
            }
            _ => {
                self.rewind(saved);
                Ok(None)
            }
        }
    }

    pub(crate) fn parse_arguments(
        &mut self,
    ) -> Result<(&'a [Expression<'a>], u32)> {
        self.expect(TokenKind::OpenParen)?;
        let mut arguments = Vec::new();
        while !self.token().is(TokenKind::CloseParen) {
            let arg = if self.token().is(TokenKind::DotDotDot) {
                self.parse_spread_element()?
            } else {
                self.parse_expression(ExpressionParseFlags::NO_OPTS)?
            };
            arguments.push(arg);
            if !self.token().is(TokenKind::CloseParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        let end = self.expect(TokenKind::CloseParen)?.end;
        Ok((alloc_slice(self.arena, &arguments), end))
    }

    fn parse_spread_element(&mut self) -> Result<Expression<'a>> {
        let start = self.expect(TokenKind::DotDotDot)?.pos;
        let argument = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
        Ok(Expression::Spread(self.arena.alloc(SpreadElement {
            range: TextRange::new(start, argument.range().end),
            argument,
        })))
    }

    fn parse_new_expression(&mut self) -> Result<Expression<'a>> {
        let start = self.expect(TokenKind::New)?.pos;

        if self.token().is(TokenKind::Dot) {
            self.next()?;
            if !self.token().is_kw(Kw::Target) {
                return Err(self.error_here("'new.target' is the only valid meta property for new"));
            }
            if !self.in_status(ParserStatus::IN_FUNCTION) {
                return Err(self.error_at(start, "'new.target' is not allowed here"));
            }
            let end = self.token_end();
            self.next()?;
            return Ok(Expression::MetaProperty(self.arena.alloc(MetaProperty {
                range: TextRange::new(start, end),
                kind: MetaPropertyKind::NewTarget,
            })));
        }

        let callee = self.parse_member_expression_for_new()?;

        let type_args = if self.is_ts() && self.token().is(TokenKind::Lt) {
            let saved = self.save();
            match self.parse_type_args(false)? {
                Some(args) if self.token().is(TokenKind::OpenParen) => Some(args),
                _ => {
                    self.rewind(saved);
                    None
                }
            }
        } else {
            None
        };

        let (arguments, end) = if self.token().is(TokenKind::OpenParen) {
            let (args, end) = self.parse_arguments()?;
            (Some(args), end)
        } else {
            (None, callee.range().end)
        };

        Ok(Expression::New(self.arena.alloc(NewExpr {
            range: TextRange::new(start, end),
            callee,
            type_args,
            arguments,
        })))
    }

    /// Callee of a `new` expression: member accesses bind to the callee,
    /// call parentheses belong to `new` itself.
    fn parse_member_expression_for_new(&mut self) -> Result<Expression<'a>> {
        let mut expr = if self.token().is(TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression(ExpressionParseFlags::NO_OPTS)?
        };
        let start = expr.range().pos;
        loop {
            match self.token_kind() {
                TokenKind::Dot => {
                    self.next()?;
                    let property = self.parse_member_property()?;
                    expr = Expression::Member(self.arena.alloc(MemberExpr {
                        range: TextRange::new(start, property.range().end),
                        object: expr,
                        property,
                        computed: false,
                        optional: false,
                    }));
                }
                TokenKind::OpenBracket => {
                    expr = self.parse_computed_member(start, expr, false)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    // ======================================================================
    // Primary expressions
    // ======================================================================

    fn parse_primary_expression(
        &mut self,
        flags: ExpressionParseFlags,
    ) -> Result<Expression<'a>> {
        let token_range = self.token().range;
        match self.token_kind() {
            TokenKind::This => {
                self.next()?;
                Ok(Expression::This(self.arena.alloc(ThisExpr { range: token_range })))
            }
            TokenKind::Super => self.parse_super_expression(),
            TokenKind::True | TokenKind::False => {
                let value = self.token().is(TokenKind::True);
                self.next()?;
                Ok(Expression::Bool(self.arena.alloc(BoolLit { range: token_range, value })))
            }
            TokenKind::Null => {
                self.next()?;
                Ok(Expression::Null(self.arena.alloc(NullLit { range: token_range })))
            }
            TokenKind::Number => {
                let value = self.token().num;
                self.next()?;
                Ok(Expression::Number(self.arena.alloc(NumberLit { range: token_range, value })))
            }
            TokenKind::BigInt => {
                let value = self.arena.alloc_str(&self.token().value);
                self.next()?;
                Ok(Expression::BigInt(self.arena.alloc(BigIntLit { range: token_range, value })))
            }
            TokenKind::String => {
                let node = self.parse_string_literal()?;
                Ok(Expression::String(node))
            }
            TokenKind::Slash | TokenKind::SlashEq => {
                self.lexer.rescan_regex().map_err(|e| self.lex_error(e))?;
                let token = self.token();
                let node = &*self.arena.alloc(RegexLit {
                    range: token.range,
                    text: self.arena.alloc_str(&token.value),
                });
                self.next()?;
                Ok(Expression::Regex(node))
            }
            TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                Ok(Expression::Template(self.parse_template_literal()?))
            }
            TokenKind::OpenBracket => self.parse_array_literal(flags),
            TokenKind::OpenBrace => self.parse_object_literal(flags),
            TokenKind::OpenParen => {
                self.parse_cover_parenthesized(token_range.pos, false)
            }
            TokenKind::Function => {
                self.parse_function_expression(token_range.pos, FunctionFlags::NONE)
            }
            TokenKind::Class => {
                let def = self.parse_class_definition(false)?;
                Ok(Expression::Class(def))
            }
            TokenKind::Import => self.parse_import_expression(),
            TokenKind::New => self.parse_new_expression(),
            TokenKind::PrivateIdent => {
                if !self.in_status(ParserStatus::IN_CLASS_BODY) {
                    return Err(
                        self.error_here("Private identifier is not allowed outside class body")
                    );
                }
                let sym = self.interner.intern(&self.token().value);
                let node = &*self.arena.alloc(PrivateName {
                    range: token_range,
                    sym,
                    name: self.arena.alloc_str(&self.token().value),
                });
                self.next()?;
                if !self.token().is(TokenKind::In) {
                    return Err(self.error_here(messages::UNEXPECTED_TOKEN));
                }
                Ok(Expression::PrivateName(node))
            }
            TokenKind::Lt if self.is_ts() => self.parse_type_assertion_or_generic_arrow(),
            TokenKind::Ident => {
                if self.token().is_kw(Kw::Async) {
                    return self.parse_async_prefixed();
                }
                let ident = self.ident_from_token();
                self.next()?;
                Ok(Expression::Ident(ident))
            }
            TokenKind::Eos => Err(self.error_here(messages::UNEXPECTED_EOS)),
            _ => Err(self.error_here(messages::EXPECTED_EXPRESSION)),
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> Result<&'a StringLit<'a>> {
        let token = self.token();
        let node = &*self.arena.alloc(StringLit {
            range: token.range,
            value: self.arena.alloc_str(&self.token().value),
        });
        self.next()?;
        Ok(node)
    }

    fn parse_super_expression(&mut self) -> Result<Expression<'a>> {
        let range = self.token().range;
        self.next()?;
        let ok = match self.token_kind() {
            TokenKind::Dot | TokenKind::OpenBracket => {
                self.in_status(ParserStatus::ALLOW_SUPER)
            }
            TokenKind::OpenParen => self.in_status(ParserStatus::ALLOW_SUPER_CALL),
            _ => false,
        };
        if !ok {
            return Err(self.error_at(range.pos, "'super' keyword unexpected here"));
        }
        Ok(Expression::Super(self.arena.alloc(SuperExpr { range })))
    }

    fn parse_import_expression(&mut self) -> Result<Expression<'a>> {
        let start = self.expect(TokenKind::Import)?.pos;
        if self.token().is(TokenKind::Dot) {
            self.next()?;
            if !self.token().is_kw(Kw::Meta) {
                return Err(self.error_here("The only valid meta property for import is import.meta"));
            }
            if !self.kind.is_module() {
                return Err(self.error_at(
                    start,
                    "'import.meta' may appear only with 'sourceType: module'",
                ));
            }
            let end = self.token_end();
            self.next()?;
            return Ok(Expression::MetaProperty(self.arena.alloc(MetaProperty {
                range: TextRange::new(start, end),
                kind: MetaPropertyKind::ImportMeta,
            })));
        }
        self.expect(TokenKind::OpenParen)?;
        let source = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
        let end = self.expect(TokenKind::CloseParen)?.end;
        Ok(Expression::Import(self.arena.alloc(ImportExpr {
            range: TextRange::new(start, end),
            source,
        })))
    }

    /// `async` at expression head: async function, async arrow in its
    /// several shapes, or the plain identifier.
    fn parse_async_prefixed(&mut self) -> Result<Expression<'a>> {
        let start = self.token_start();
        let saved = self.save();
        self.next()?;

        if !self.token().has_preceding_line_break() {
            match self.token_kind() {
                TokenKind::Function => {
                    return self.parse_function_expression(start, FunctionFlags::ASYNC);
                }
                TokenKind::OpenParen => {
                    return self.parse_cover_parenthesized(start, true);
                }
                TokenKind::Lt => {
                    if let Some(arrow) = self.try_parse_generic_arrow(start, true)? {
                        return Ok(arrow);
                    }
                }
                TokenKind::Ident => {
                    let inner = self.save();
                    self.check_restricted_binding()?;
                    let param_ident = self.ident_from_token();
                    self.next()?;
                    if self.token().is(TokenKind::Arrow) {
                        let binding = &*self.arena.alloc(BindingIdent {
                            range: param_ident.range,
                            ident: param_ident,
                            type_ann: None,
                            optional: false,
                        });
                        let params = vec![Param {
                            range: param_ident.range,
                            pattern: Pattern::Ident(binding),
                            modifiers: ModifierFlags::NONE,
                        }];
                        return self.parse_arrow_tail(start, params, None, None, true);
                    }
                    self.rewind(inner);
                }
                _ => {}
            }
        }

        self.rewind(saved);
        let ident = self.ident_from_token();
        self.next()?;
        Ok(Expression::Ident(ident))
    }

    pub(crate) fn parse_function_expression(
        &mut self,
        start: u32,
        mut flags: FunctionFlags,
    ) -> Result<Expression<'a>> {
        self.expect(TokenKind::Function)?;
        if self.eat(TokenKind::Star)? {
            flags |= FunctionFlags::GENERATOR;
        }
        let ident = if self.token().is_identifier_like() {
            let id = self.ident_from_token();
            self.next()?;
            Some(id)
        } else {
            None
        };
        let function = self.parse_function_rest(
            start,
            ident,
            flags,
            ParserStatus::NO_OPTS,
            false,
            false,
        )?;
        Ok(Expression::Function(function))
    }

    // ======================================================================
    // Templates
    // ======================================================================

    pub(crate) fn parse_template_literal(&mut self) -> Result<&'a TemplateLit<'a>> {
        let start = self.token_start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        if self.token().is(TokenKind::NoSubstitutionTemplate) {
            let token = self.token();
            let end = token.range.end;
            quasis.push(TemplateElement {
                range: token.range,
                cooked: self.arena.alloc_str(&self.token().value),
                tail: true,
            });
            self.next()?;
            return Ok(self.arena.alloc(TemplateLit {
                range: TextRange::new(start, end),
                quasis: alloc_slice(self.arena, &quasis),
                expressions: &[],
            }));
        }

        quasis.push(TemplateElement {
            range: self.token().range,
            cooked: self.arena.alloc_str(&self.token().value),
            tail: false,
        });
        self.next()?;
        let end;
        loop {
            expressions.push(self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?);
            if !self.token().is(TokenKind::CloseBrace) {
                return Err(self.error_here("Unexpected token, expected '}'"));
            }
            self.lexer
                .rescan_template_continuation()
                .map_err(|e| self.lex_error(e))?;
            let tail = self.token().is(TokenKind::TemplateTail);
            quasis.push(TemplateElement {
                range: self.token().range,
                cooked: self.arena.alloc_str(&self.token().value),
                tail,
            });
            if tail {
                end = self.token_end();
                self.next()?;
                break;
            }
            self.next()?;
        }
        Ok(self.arena.alloc(TemplateLit {
            range: TextRange::new(start, end),
            quasis: alloc_slice(self.arena, &quasis),
            expressions: alloc_slice(self.arena, &expressions),
        }))
    }

    // ======================================================================
    // Array and object literals
    // ======================================================================

    fn parse_array_literal(&mut self, flags: ExpressionParseFlags) -> Result<Expression<'a>> {
        let start = self.expect(TokenKind::OpenBracket)?.pos;
        let carried = flags & ExpressionParseFlags::POTENTIALLY_IN_PATTERN;
        let mut elements: Vec<Option<Expression<'a>>> = Vec::new();
        let mut trailing_comma = false;
        while !self.token().is(TokenKind::CloseBracket) {
            if self.token().is(TokenKind::Comma) {
                elements.push(None);
                self.next()?;
                continue;
            }
            let element = if self.token().is(TokenKind::DotDotDot) {
                self.parse_spread_element()?
            } else {
                self.parse_expression(carried | ExpressionParseFlags::POTENTIALLY_IN_PATTERN)?
            };
            elements.push(Some(element));
            if self.token().is(TokenKind::Comma) {
                self.next()?;
                if self.token().is(TokenKind::CloseBracket) {
                    trailing_comma = true;
                }
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBracket)?.end;
        Ok(Expression::Array(self.arena.alloc(ArrayExpr {
            range: TextRange::new(start, end),
            elements: alloc_slice(self.arena, &elements),
            trailing_comma,
        })))
    }

    fn parse_object_literal(&mut self, _flags: ExpressionParseFlags) -> Result<Expression<'a>> {
        let start = self.expect(TokenKind::OpenBrace)?.pos;
        let mut properties = Vec::new();
        let mut trailing_comma = false;
        while !self.token().is(TokenKind::CloseBrace) {
            if self.token().is(TokenKind::DotDotDot) {
                let spread_start = self.token_start();
                self.next()?;
                let argument = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
                properties.push(ObjectMember::Spread(self.arena.alloc(SpreadElement {
                    range: TextRange::new(spread_start, argument.range().end),
                    argument,
                })));
            } else {
                properties.push(ObjectMember::Property(self.parse_property_definition()?));
            }
            if self.token().is(TokenKind::Comma) {
                self.next()?;
                if self.token().is(TokenKind::CloseBrace) {
                    trailing_comma = true;
                }
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::CloseBrace)?.end;
        Ok(Expression::Object(self.arena.alloc(ObjectExpr {
            range: TextRange::new(start, end),
            properties: alloc_slice(self.arena, &properties),
            trailing_comma,
        })))
    }

    fn parse_property_definition(&mut self) -> Result<&'a Property<'a>> {
        let start = self.token_start();
        let mut func_flags = FunctionFlags::NONE;
        let mut kind = PropertyKind::Init;

        // `async`, `get`, and `set` are modifiers only when a key
        // follows; otherwise they are ordinary keys themselves.
        if self.token().is_kw(Kw::Async) && self.modifier_starts_member()? {
            func_flags |= FunctionFlags::ASYNC;
        } else if self.token().is_kw(Kw::Get) && self.modifier_starts_member()? {
            kind = PropertyKind::Get;
        } else if self.token().is_kw(Kw::Set) && self.modifier_starts_member()? {
            kind = PropertyKind::Set;
        }
        if self.eat(TokenKind::Star)? {
            func_flags |= FunctionFlags::GENERATOR;
        }

        let (key, computed) = self.parse_property_key()?;
        if matches!(key, PropertyKey::Private(_)) {
            return Err(self.error_at(key.range().pos, messages::UNEXPECTED_TOKEN));
        }

        // Method forms.
        if self.token().is(TokenKind::OpenParen)
            || (self.is_ts() && self.token().is(TokenKind::Lt))
        {
            let accessor_flags = match kind {
                PropertyKind::Get => FunctionFlags::GETTER,
                PropertyKind::Set => FunctionFlags::SETTER,
                PropertyKind::Init => FunctionFlags::NONE,
            };
            let function = self.parse_function_rest(
                key.range().pos,
                None,
                func_flags | accessor_flags | FunctionFlags::METHOD,
                ParserStatus::ALLOW_SUPER,
                false,
                false,
            )?;
            self.check_accessor_arity(kind, function)?;
            return Ok(self.arena.alloc(Property {
                range: TextRange::new(start, function.range.end),
                kind,
                key,
                value: Expression::Function(function),
                computed,
                shorthand: false,
                method: kind == PropertyKind::Init,
            }));
        }

        if kind != PropertyKind::Init || !func_flags.is_empty() {
            return Err(self.error_here(messages::UNEXPECTED_TOKEN));
        }

        if self.eat(TokenKind::Colon)? {
            let value = self.parse_expression(ExpressionParseFlags::POTENTIALLY_IN_PATTERN)?;
            return Ok(self.arena.alloc(Property {
                range: TextRange::new(start, value.range().end),
                kind: PropertyKind::Init,
                key,
                value,
                computed,
                shorthand: false,
                method: false,
            }));
        }

        // Shorthand, optionally with a cover initializer that only a
        // destructuring context may keep.
        let ident = match key {
            PropertyKey::Ident(id) => id,
            _ => return Err(self.error_here(messages::UNEXPECTED_TOKEN)),
        };
        let mut value = Expression::Ident(ident);
        if self.token().is(TokenKind::Eq) {
            self.next()?;
            let default = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
            value = Expression::Assignment(self.arena.alloc(AssignmentExpr {
                range: TextRange::new(ident.range.pos, default.range().end),
                op: AssignOp::Assign,
                left: Expression::Ident(ident),
                right: default,
            }));
        }
        Ok(self.arena.alloc(Property {
            range: TextRange::new(start, value.range().end),
            kind: PropertyKind::Init,
            key,
            value,
            computed: false,
            shorthand: true,
            method: false,
        }))
    }

    /// Whether the current `async`/`get`/`set` token is a modifier, i.e.
    /// a member name follows rather than the punctuation that would make
    /// it a key itself.
    fn modifier_starts_member(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let is_modifier = !matches!(
            self.token_kind(),
            TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::CloseBrace
                | TokenKind::CloseParen
                | TokenKind::OpenParen
                | TokenKind::Eq
                | TokenKind::Question
                | TokenKind::Lt
        ) && !self.token().has_preceding_line_break();
        if !is_modifier {
            self.rewind(saved);
        }
        Ok(is_modifier)
    }

    pub(crate) fn check_accessor_arity(
        &self,
        kind: PropertyKind,
        function: &ScriptFunction<'a>,
    ) -> Result<()> {
        match kind {
            PropertyKind::Get if !function.params.is_empty() => Err(self.error_at(
                function.range.pos,
                messages::GETTER_NO_PARAMS,
            )),
            PropertyKind::Set => {
                if function.params.len() != 1 {
                    return Err(
                        self.error_at(function.range.pos, messages::SETTER_ONE_PARAM)
                    );
                }
                if matches!(function.params[0].pattern, Pattern::Rest(_)) {
                    return Err(self.error_at(function.range.pos, messages::SETTER_NO_REST));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn parse_property_key(&mut self) -> Result<(PropertyKey<'a>, bool)> {
        let token_range = self.token().range;
        match self.token_kind() {
            TokenKind::String => Ok((PropertyKey::String(self.parse_string_literal()?), false)),
            TokenKind::Number => {
                let value = self.token().num;
                self.next()?;
                Ok((
                    PropertyKey::Number(self.arena.alloc(NumberLit { range: token_range, value })),
                    false,
                ))
            }
            TokenKind::OpenBracket => {
                self.next()?;
                let expr = self.parse_expression(ExpressionParseFlags::NO_OPTS)?;
                self.expect(TokenKind::CloseBracket)?;
                Ok((PropertyKey::Computed(expr), true))
            }
            TokenKind::PrivateIdent => {
                let sym = self.interner.intern(&self.token().value);
                let node = &*self.arena.alloc(PrivateName {
                    range: token_range,
                    sym,
                    name: self.arena.alloc_str(&self.token().value),
                });
                self.next()?;
                Ok((PropertyKey::Private(node), false))
            }
            kind if kind == TokenKind::Ident || kind.is_reserved_word() => {
                let ident = self.ident_from_token();
                self.next()?;
                Ok((PropertyKey::Ident(ident), false))
            }
            _ => Err(self.error_here(messages::UNEXPECTED_TOKEN)),
        }
    }

    // ======================================================================
    // Parenthesized covers and arrows
    // ======================================================================

    /// Parses `( ... )` without yet knowing whether it is a grouped
    /// expression, arrow parameters, or (for `async`) call arguments.
    fn parse_cover_parenthesized(
        &mut self,
        start: u32,
        is_async: bool,
    ) -> Result<Expression<'a>> {
        self.expect(TokenKind::OpenParen)?;

        if self.token().is(TokenKind::CloseParen) {
            let close = self.token().range;
            self.next()?;
            let return_type = self.try_parse_arrow_return_type()?;
            if self.token().is(TokenKind::Arrow) || return_type.is_some() {
                return self.parse_arrow_tail(start, Vec::new(), None, return_type, is_async);
            }
            if is_async {
                // `async()` with no arguments.
                let callee = self.make_async_callee(start);
                return Ok(Expression::Call(self.arena.alloc(CallExpr {
                    range: TextRange::new(start, close.end),
                    callee,
                    type_args: None,
                    arguments: &[],
                    optional: false,
                })));
            }
            return Err(self.error_here(messages::EXPECTED_EXPRESSION));
        }

        let inner = if self.token().is(TokenKind::DotDotDot) {
            self.parse_spread_element()?
        } else {
            self.parse_expression(
                ExpressionParseFlags::ACCEPT_COMMA
                    | ExpressionParseFlags::ACCEPT_REST
                    | ExpressionParseFlags::POTENTIALLY_IN_PATTERN,
            )?
        };
        let close = self.expect(TokenKind::CloseParen)?;

        let return_type = self.try_parse_arrow_return_type()?;
        if self.token().is(TokenKind::Arrow) || return_type.is_some() {
            let params = self.arrow_params_from_expression(inner)?;
            return self.parse_arrow_tail(start, params, None, return_type, is_async);
        }

        if is_async {
            let callee = self.make_async_callee(start);
            let arguments = match inner {
                Expression::Sequence(seq) => seq.expressions,
                other => alloc_slice(self.arena, &[other]),
            };
            return Ok(Expression::Call(self.arena.alloc(CallExpr {
                range: TextRange::new(start, close.end),
                callee,
                type_args: None,
                arguments,
                optional: false,
            })));
        }

        self.reject_stray_spread(inner)?;
        Ok(Expression::Paren(self.arena.alloc(ParenExpr {
            range: TextRange::new(start, close.end),
            expr: inner,
        })))
    }

    fn make_async_callee(&mut self, start: u32) -> Expression<'a> {
        let sym = self.interner.intern("async");
        Expression::Ident(self.arena.alloc(Ident {
            range: TextRange::new(start, start + 5),
            sym,
            name: "async",
        }))
    }

    /// A spread is only valid in a paren cover that becomes an arrow.
    fn reject_stray_spread(&self, expr: Expression<'a>) -> Result<()> {
        let check = |e: &Expression<'a>| match e {
            Expression::Spread(s) => Err(self.error_at(s.range.pos, messages::UNEXPECTED_TOKEN)),
            _ => Ok(()),
        };
        match expr {
            Expression::Sequence(seq) => {
                for e in seq.expressions {
                    check(e)?;
                }
                Ok(())
            }
            other => check(&other),
        }
    }

    /// `): T =>` return-type speculation. Leaves the cursor untouched
    /// unless an arrow genuinely follows the type.
    fn try_parse_arrow_return_type(&mut self) -> Result<Option<TsType<'a>>> {
        if !self.is_ts() || !self.token().is(TokenKind::Colon) {
            return Ok(None);
        }
        let saved = self.save();
        self.next()?;
        match self.parse_ts_type_or_predicate() {
            Ok(ty) if self.token().is(TokenKind::Arrow) => Ok(Some(ty)),
            _ => {
                self.rewind(saved);
                Ok(None)
            }
        }
    }

    /// `<T>(...) => ...` speculation; returns `None` after rewinding if
    /// the tokens do not form a generic arrow head. The parameter list
    /// is parsed as real annotated bindings rather than through the
    /// expression cover.
    pub(crate) fn try_parse_generic_arrow(
        &mut self,
        start: u32,
        is_async: bool,
    ) -> Result<Option<Expression<'a>>> {
        let saved = self.save();
        let type_params = match self.parse_type_params() {
            Ok(tp) => tp,
            Err(_) => {
                self.rewind(saved);
                return Ok(None);
            }
        };
        if !self.token().is(TokenKind::OpenParen) {
            self.rewind(saved);
            return Ok(None);
        }
        let params = match self.parse_generic_arrow_params() {
            Ok(params) => params,
            Err(_) => {
                self.rewind(saved);
                return Ok(None);
            }
        };
        let return_type = if self.token().is(TokenKind::Colon) {
            self.next()?;
            match self.parse_ts_type_or_predicate() {
                Ok(ty) => Some(ty),
                Err(_) => {
                    self.rewind(saved);
                    return Ok(None);
                }
            }
        } else {
            None
        };
        if !self.token().is(TokenKind::Arrow) {
            self.rewind(saved);
            return Ok(None);
        }
        self.parse_arrow_tail(start, params, Some(type_params), return_type, is_async)
            .map(Some)
    }

    /// Arrow parameter list parsed without touching the binder; the
    /// arrow tail registers the bindings once `=>` commits the parse.
    fn parse_generic_arrow_params(&mut self) -> Result<Vec<Param<'a>>> {
        self.with_status(ParserStatus::FUNCTION_PARAM, |p| {
            p.expect(TokenKind::OpenParen)?;
            let mut params = Vec::new();
            while !p.token().is(TokenKind::CloseParen) {
                let param_start = p.token_start();
                let pattern = p.parse_pattern_element(false, true)?;
                let is_rest = matches!(pattern, Pattern::Rest(_));
                params.push(Param {
                    range: TextRange::new(param_start, pattern.range().end),
                    pattern,
                    modifiers: ModifierFlags::NONE,
                });
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

    /// `<T>expr` type assertion, tried only after the generic arrow
    /// speculation fails.
    fn parse_type_assertion_or_generic_arrow(&mut self) -> Result<Expression<'a>> {
        let start = self.token_start();
        if let Some(arrow) = self.try_parse_generic_arrow(start, false)? {
            return Ok(arrow);
        }
        self.expect(TokenKind::Lt)?;
        let type_ann = self.parse_ts_type()?;
        self.expect(TokenKind::Gt)?;
        let expr = self.parse_unary_or_prefix(ExpressionParseFlags::NO_OPTS)?;
        Ok(Expression::TsTypeAssertion(self.arena.alloc(TsTypeAssertion {
            range: TextRange::new(start, expr.range().end),
            type_ann,
            expr,
        })))
    }

    fn arrow_params_from_expression(
        &mut self,
        expr: Expression<'a>,
    ) -> Result<Vec<Param<'a>>> {
        let mut params = Vec::new();
        match expr {
            Expression::Sequence(seq) => {
                for e in seq.expressions {
                    params.push(self.convert_to_arrow_param(*e)?);
                }
            }
            other => params.push(self.convert_to_arrow_param(other)?),
        }
        Ok(params)
    }

    fn convert_to_arrow_param(&mut self, expr: Expression<'a>) -> Result<Param<'a>> {
        let range = expr.range();
        let pattern = match expr {
            Expression::Ident(id) => {
                if matches!(id.name, "arguments" | "eval") {
                    return Err(self.error_at(
                        range.pos,
                        format_args_message("Binding '{}' in strict mode is invalid", &[id.name]),
                    ));
                }
                Pattern::Ident(self.arena.alloc(BindingIdent {
                    range,
                    ident: id,
                    type_ann: None,
                    optional: false,
                }))
            }
            Expression::Assignment(a) if a.op.is_simple() => {
                if matches!(
                    a.right,
                    Expression::Yield(_) | Expression::Await(_)
                ) {
                    return Err(
                        self.error_at(a.right.range().pos, messages::UNEXPECTED_TOKEN_ARROW)
                    );
                }
                let target = self.convert_expression_to_pattern(a.left)?;
                Pattern::Assign(self.arena.alloc(AssignPattern {
                    range,
                    target,
                    default: a.right,
                }))
            }
            Expression::Object(_) | Expression::Array(_) => {
                self.convert_expression_to_pattern(expr)?
            }
            Expression::Spread(s) => {
                if matches!(s.argument, Expression::Assignment(_)) {
                    return Err(self.error_at(range.pos, messages::REST_NO_DEFAULT));
                }
                let argument = self.convert_expression_to_pattern(s.argument)?;
                Pattern::Rest(self.arena.alloc(RestPattern { range, argument }))
            }
            _ => return Err(self.error_at(range.pos, messages::UNEXPECTED_TOKEN_ARROW)),
        };
        Ok(Param { range, pattern, modifiers: ModifierFlags::NONE })
    }

    /// Reinterprets an expression parsed with the pattern cover flags as
    /// a binding pattern.
    fn convert_expression_to_pattern(&mut self, expr: Expression<'a>) -> Result<Pattern<'a>> {
        let range = expr.range();
        match expr {
            Expression::Ident(id) => Ok(Pattern::Ident(self.arena.alloc(BindingIdent {
                range,
                ident: id,
                type_ann: None,
                optional: false,
            }))),
            Expression::Assignment(a) if a.op.is_simple() => {
                let target = self.convert_expression_to_pattern(a.left)?;
                Ok(Pattern::Assign(self.arena.alloc(AssignPattern {
                    range,
                    target,
                    default: a.right,
                })))
            }
            Expression::Spread(s) => {
                if matches!(s.argument, Expression::Assignment(_)) {
                    return Err(self.error_at(range.pos, messages::REST_NO_DEFAULT));
                }
                let argument = self.convert_expression_to_pattern(s.argument)?;
                Ok(Pattern::Rest(self.arena.alloc(RestPattern { range, argument })))
            }
            Expression::Array(arr) => {
                let mut elements: Vec<Option<Pattern<'a>>> = Vec::new();
                let count = arr.elements.len();
                for (i, element) in arr.elements.iter().enumerate() {
                    match element {
                        None => elements.push(None),
                        Some(e) => {
                            if matches!(e, Expression::Spread(_)) && i + 1 != count {
                                return Err(
                                    self.error_at(e.range().pos, messages::REST_MUST_BE_LAST)
                                );
                            }
                            elements.push(Some(self.convert_expression_to_pattern(*e)?));
                        }
                    }
                }
                Ok(Pattern::Array(self.arena.alloc(ArrayPattern {
                    range,
                    elements: alloc_slice(self.arena, &elements),
                    type_ann: None,
                })))
            }
            Expression::Object(obj) => {
                let mut properties = Vec::new();
                let count = obj.properties.len();
                for (i, member) in obj.properties.iter().enumerate() {
                    match member {
                        ObjectMember::Spread(s) => {
                            if i + 1 != count {
                                return Err(
                                    self.error_at(s.range.pos, messages::REST_MUST_BE_LAST)
                                );
                            }
                            let argument = self.convert_expression_to_pattern(s.argument)?;
                            properties.push(ObjectPatternProp::Rest(
                                self.arena.alloc(RestPattern { range: s.range, argument }),
                            ));
                        }
                        ObjectMember::Property(p) => {
                            if p.method || p.kind != PropertyKind::Init {
                                return Err(self.error_at(
                                    p.range.pos,
                                    messages::INVALID_DESTRUCTURING_TARGET,
                                ));
                            }
                            let value = self.convert_expression_to_pattern(p.value)?;
                            properties.push(ObjectPatternProp::KeyValue(self.arena.alloc(
                                KeyValuePatternProp {
                                    range: p.range,
                                    key: p.key,
                                    value,
                                    computed: p.computed,
                                    shorthand: p.shorthand,
                                },
                            )));
                        }
                    }
                }
                Ok(Pattern::Object(self.arena.alloc(ObjectPattern {
                    range,
                    properties: alloc_slice(self.arena, &properties),
                    type_ann: None,
                })))
            }
            _ => Err(self.error_at(range.pos, messages::INVALID_DESTRUCTURING_TARGET)),
        }
    }

    /// Shared tail of every arrow form. The current token must be the
    /// `=>`, on the same line as the parameter list.
    pub(crate) fn parse_arrow_tail(
        &mut self,
        start: u32,
        params: Vec<Param<'a>>,
        type_params: Option<&'a TsTypeParamDecl<'a>>,
        return_type: Option<TsType<'a>>,
        is_async: bool,
    ) -> Result<Expression<'a>> {
        if self.token().has_preceding_line_break() {
            return Err(self.error_here(messages::NEW_LINE_BEFORE_ARROW));
        }
        self.expect(TokenKind::Arrow)?;

        let param_scope = self.binder.enter_scope(ScopeKind::FunctionParam);
        for param in &params {
            self.add_param_pattern_decls(&param.pattern)?;
        }
        let scope = self.binder.enter_scope(ScopeKind::Function);

        let mut flags = FunctionFlags::ARROW;
        if is_async {
            flags |= FunctionFlags::ASYNC;
        }
        // Arrows inherit `super` and constructor context.
        let inherited = self.status
            & (ParserStatus::ALLOW_SUPER
                | ParserStatus::ALLOW_SUPER_CALL
                | ParserStatus::CONSTRUCTOR_FUNCTION);
        let mut set = ParserStatus::ARROW_FUNCTION | inherited;
        if is_async {
            set |= ParserStatus::ASYNC_FUNCTION;
        }

        let body = self.with_function_status(set, |p| {
            if p.token().is(TokenKind::OpenBrace) {
                Ok(FunctionBody::Block(p.parse_block_in_current_scope()?))
            } else {
                Ok(FunctionBody::Expr(
                    p.parse_expression(ExpressionParseFlags::NO_OPTS)?,
                ))
            }
        })?;
        if matches!(body, FunctionBody::Expr(_)) {
            flags |= FunctionFlags::EXPRESSION_BODY;
        }
        self.binder.exit_scope();
        self.binder.exit_scope();

        let end = match body {
            FunctionBody::Block(b) => b.range.end,
            FunctionBody::Expr(e) => e.range().end,
        };
        Ok(Expression::Arrow(self.arena.alloc(ScriptFunction {
            range: TextRange::new(start, end),
            ident: None,
            type_params,
            params: alloc_slice(self.arena, &params),
            return_type,
            body: Some(body),
            flags,
            param_scope,
            scope,
        })))
    }

    // ======================================================================
    // Assignment target validation
    // ======================================================================

    /// Compound assignment targets: a simple reference only.
    fn validate_lvalue_simple(&self, expr: Expression<'a>) -> Result<()> {
        match expr.unwrap_parens() {
            Expression::Ident(_)
            | Expression::Member(_)
            | Expression::TsAs(_)
            | Expression::TsNonNull(_)
            | Expression::TsTypeAssertion(_) => Ok(()),
            other => Err(self.error_at(other.range().pos, messages::INVALID_LEFT_HAND_SIDE)),
        }
    }

    /// `=` targets additionally admit destructuring literals, validated
    /// in place without rebuilding them as patterns.
    pub(crate) fn validate_assignment_target(&self, expr: Expression<'a>) -> Result<()> {
        match expr.unwrap_parens() {
            Expression::Array(arr) => {
                let count = arr.elements.len();
                for (i, element) in arr.elements.iter().enumerate() {
                    if let Some(e) = element {
                        if matches!(e, Expression::Spread(_)) && i + 1 != count {
                            return Err(
                                self.error_at(e.range().pos, messages::REST_MUST_BE_LAST)
                            );
                        }
                        self.validate_destructuring_element(*e)?;
                    }
                }
                Ok(())
            }
            Expression::Object(obj) => {
                let count = obj.properties.len();
                for (i, member) in obj.properties.iter().enumerate() {
                    match member {
                        ObjectMember::Spread(s) => {
                            if i + 1 != count {
                                return Err(
                                    self.error_at(s.range.pos, messages::REST_MUST_BE_LAST)
                                );
                            }
                            self.validate_assignment_target(s.argument)?;
                        }
                        ObjectMember::Property(p) => {
                            if p.method || p.kind != PropertyKind::Init {
                                return Err(self.error_at(
                                    p.range.pos,
                                    messages::INVALID_DESTRUCTURING_TARGET,
                                ));
                            }
                            self.validate_destructuring_element(p.value)?;
                        }
                    }
                }
                Ok(())
            }
            other => self.validate_lvalue_simple(other),
        }
    }

    fn validate_destructuring_element(&self, expr: Expression<'a>) -> Result<()> {
        match expr {
            Expression::Assignment(a) if a.op.is_simple() => {
                self.validate_assignment_target(a.left)
            }
            Expression::Spread(s) => self.validate_assignment_target(s.argument),
            other => self.validate_assignment_target(other),
        }
    }
}
