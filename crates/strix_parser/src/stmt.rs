//! Statement grammar.

use strix_ast::*;
use strix_binder::{DeclFlags, DeclKind, ScopeKind};
use strix_core::text::TextRange;
use strix_diagnostics::{messages, Result};
use strix_lexer::{Kw, TokenKind};

use crate::context::{ExpressionParseFlags, ParserStatus, StatementParseFlags, VariableParseFlags};
use crate::parser_impl::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement_list_global(&mut self) -> Result<&'a [Statement<'a>]> {
        self.parse_statement_list(
            TokenKind::Eos,
            StatementParseFlags::GLOBAL | StatementParseFlags::ALLOW_LEXICAL,
        )
    }

    fn parse_statement_list(
        &mut self,
        terminator: TokenKind,
        flags: StatementParseFlags,
    ) -> Result<&'a [Statement<'a>]> {
        let mut statements = Vec::new();
        let mut in_prologue = true;
        while !self.token().is(terminator) {
            if self.token().is(TokenKind::Eos) {
                return Err(self.error_here(messages::UNEXPECTED_EOS));
            }
            let mut stmt = self.parse_statement(flags)?;
            if in_prologue {
                match self.as_directive(stmt) {
                    Some(directive) => stmt = directive,
                    None => in_prologue = false,
                }
            }
            statements.push(stmt);
        }
        Ok(alloc_slice(self.arena, &statements))
    }

    /// Re-tags a prologue string statement as a directive.
    fn as_directive(&self, stmt: Statement<'a>) -> Option<Statement<'a>> {
        if let Statement::Expr(es) = stmt {
            if let Expression::String(s) = es.expr {
                return Some(Statement::Expr(self.arena.alloc(ExpressionStatement {
                    range: es.range,
                    expr: es.expr,
                    directive: Some(s.value),
                })));
            }
        }
        None
    }

    pub(crate) fn parse_statement(
        &mut self,
        flags: StatementParseFlags,
    ) -> Result<Statement<'a>> {
        match self.token_kind() {
            TokenKind::OpenBrace => self.parse_block_statement_node(),
            TokenKind::Semicolon => {
                let range = self.token().range;
                self.next()?;
                Ok(Statement::Empty(self.arena.alloc(EmptyStatement { range })))
            }
            TokenKind::Var => self.parse_variable_statement(VariableKind::Var, flags),
            TokenKind::Const => {
                if self.is_ts() && self.lookahead_is(TokenKind::Enum)? {
                    self.require_lexical(flags)?;
                    let start = self.token_start();
                    self.next()?;
                    return self.parse_ts_enum(start, true, false);
                }
                self.require_lexical(flags)?;
                self.parse_variable_statement(VariableKind::Const, flags)
            }
            TokenKind::Function => self.parse_function_statement(flags, FunctionFlags::NONE),
            TokenKind::Class => {
                self.require_lexical(flags)?;
                self.parse_class_statement(ModifierFlags::NONE)
            }
            TokenKind::Enum if self.is_ts() => {
                self.require_lexical(flags)?;
                let start = self.token_start();
                self.parse_ts_enum(start, false, false)
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Debugger => {
                let range = self.token().range;
                self.next()?;
                self.consume_semicolon()?;
                Ok(Statement::Debugger(self.arena.alloc(DebuggerStatement { range })))
            }
            TokenKind::At => {
                self.require_lexical(flags)?;
                self.parse_decorated_class_statement()
            }
            TokenKind::Import => self.parse_import_statement(flags),
            TokenKind::Export => self.parse_export_statement(flags),
            TokenKind::Ident => self.parse_ident_led_statement(flags),
            _ => self.parse_expression_statement(),
        }
    }

    fn require_lexical(&self, flags: StatementParseFlags) -> Result<()> {
        if flags.contains(StatementParseFlags::ALLOW_LEXICAL) {
            Ok(())
        } else {
            Err(self.error_here(messages::LEXICAL_IN_SINGLE_STATEMENT))
        }
    }

    pub(crate) fn lookahead_is(&mut self, kind: TokenKind) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let hit = self.token().is(kind);
        self.rewind(saved);
        Ok(hit)
    }

    /// Statements led by a contextual keyword or a plain identifier:
    /// `let`, `async function`, TS declarations, labels, and expression
    /// statements.
    fn parse_ident_led_statement(
        &mut self,
        flags: StatementParseFlags,
    ) -> Result<Statement<'a>> {
        let kw = self.token().kw;
        match kw {
            Some(Kw::Let) if self.lookahead_starts_binding()? => {
                self.require_lexical(flags)?;
                self.parse_variable_statement(VariableKind::Let, flags)
            }
            Some(Kw::Async) => {
                let saved = self.save();
                let start = self.token_start();
                self.next()?;
                if self.token().is(TokenKind::Function) && !self.token().has_preceding_line_break()
                {
                    return self.parse_function_statement_from(
                        start,
                        flags,
                        FunctionFlags::ASYNC,
                        ModifierFlags::NONE,
                    );
                }
                self.rewind(saved);
                self.parse_label_or_expression_statement()
            }
            Some(Kw::Declare) if self.is_ts() && self.lookahead_starts_declaration()? => {
                self.parse_declare_statement(flags)
            }
            Some(Kw::Interface) if self.is_ts() && self.lookahead_is_identifier()? => {
                self.require_lexical(flags)?;
                self.parse_ts_interface(false)
            }
            Some(Kw::Type) if self.is_ts() && self.lookahead_is_identifier()? => {
                self.require_lexical(flags)?;
                self.parse_ts_type_alias(false)
            }
            Some(Kw::Namespace) | Some(Kw::Module)
                if self.is_ts() && self.lookahead_starts_module_name()? =>
            {
                self.parse_ts_module(false)
            }
            Some(Kw::Global)
                if self.is_ts()
                    && self.in_status(ParserStatus::IN_AMBIENT_CONTEXT)
                    && self.lookahead_is(TokenKind::OpenBrace)? =>
            {
                self.parse_ts_module(false)
            }
            Some(Kw::Abstract) if self.is_ts() && self.lookahead_is(TokenKind::Class)? => {
                self.require_lexical(flags)?;
                let start = self.token_start();
                self.next()?;
                self.parse_class_statement_from(start, ModifierFlags::ABSTRACT)
            }
            _ => self.parse_label_or_expression_statement(),
        }
    }

    fn lookahead_starts_binding(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let starts = self.token().is_identifier_like()
            || matches!(self.token_kind(), TokenKind::OpenBracket | TokenKind::OpenBrace);
        self.rewind(saved);
        Ok(starts)
    }

    pub(crate) fn lookahead_is_identifier(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let hit = self.token().is_identifier_like() && !self.token().has_preceding_line_break();
        self.rewind(saved);
        Ok(hit)
    }

    fn lookahead_starts_module_name(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let hit = (self.token().is_identifier_like() || self.token().is(TokenKind::String))
            && !self.token().has_preceding_line_break();
        self.rewind(saved);
        Ok(hit)
    }

    pub(crate) fn lookahead_starts_declaration(&mut self) -> Result<bool> {
        let saved = self.save();
        self.next()?;
        let hit = match self.token_kind() {
            TokenKind::Var
            | TokenKind::Const
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Enum => true,
            TokenKind::Ident => matches!(
                self.token().kw,
                Some(Kw::Let)
                    | Some(Kw::Type)
                    | Some(Kw::Interface)
                    | Some(Kw::Namespace)
                    | Some(Kw::Module)
                    | Some(Kw::Global)
                    | Some(Kw::Abstract)
                    | Some(Kw::Async)
            ),
            _ => false,
        };
        self.rewind(saved);
        Ok(hit)
    }

    // ======================================================================
    // Blocks
    // ======================================================================

    fn parse_block_statement_node(&mut self) -> Result<Statement<'a>> {
        Ok(Statement::Block(self.parse_block_statement()?))
    }

    /// `{ ... }` opening its own block scope.
    pub(crate) fn parse_block_statement(&mut self) -> Result<&'a BlockStatement<'a>> {
        self.binder.enter_scope(ScopeKind::Block);
        let block = self.parse_block_in_current_scope()?;
        self.binder.exit_scope();
        Ok(block)
    }

    /// `{ ... }` reusing the scope the caller has already entered
    /// (function bodies, catch blocks).
    pub(crate) fn parse_block_in_current_scope(&mut self) -> Result<&'a BlockStatement<'a>> {
        let start = self.expect(TokenKind::OpenBrace)?.pos;
        let statements =
            self.parse_statement_list(TokenKind::CloseBrace, StatementParseFlags::ALLOW_LEXICAL)?;
        let end = self.expect(TokenKind::CloseBrace)?.end;
        Ok(self.arena.alloc(BlockStatement {
            range: TextRange::new(start, end),
            statements,
            scope: self.binder.current_scope(),
        }))
    }

    pub(crate) fn parse_expression_statement(&mut self) -> Result<Statement<'a>> {
        let expr = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        self.consume_semicolon()?;
        Ok(Statement::Expr(self.arena.alloc(ExpressionStatement {
            range: expr.range(),
            expr,
            directive: None,
        })))
    }

    // ======================================================================
    // Variable declarations
    // ======================================================================

    fn parse_variable_statement(
        &mut self,
        kind: VariableKind,
        _flags: StatementParseFlags,
    ) -> Result<Statement<'a>> {
        let var_flags = if self.in_status(ParserStatus::IN_AMBIENT_CONTEXT) {
            VariableParseFlags::AMBIENT
        } else {
            VariableParseFlags::NO_OPTS
        };
        let decl = self.parse_variable_declaration(kind, var_flags)?;
        self.consume_semicolon()?;
        Ok(Statement::Variable(decl))
    }

    /// Declarator list after the `var`/`let`/`const` keyword, which this
    /// consumes itself.
    pub(crate) fn parse_variable_declaration(
        &mut self,
        kind: VariableKind,
        flags: VariableParseFlags,
    ) -> Result<&'a VariableDeclaration<'a>> {
        let start = self.token_start();
        self.next()?;

        let mut declarators = Vec::new();
        loop {
            let declarator = self.parse_variable_declarator(kind, flags)?;
            declarators.push(declarator);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        let end = declarators.last().map(|d| d.range.end).unwrap_or(start);
        Ok(self.arena.alloc(VariableDeclaration {
            range: TextRange::new(start, end),
            kind,
            declarators: alloc_slice(self.arena, &declarators),
            declare: flags.contains(VariableParseFlags::AMBIENT),
        }))
    }

    fn parse_variable_declarator(
        &mut self,
        kind: VariableKind,
        flags: VariableParseFlags,
    ) -> Result<&'a VariableDeclarator<'a>> {
        if kind.is_lexical() && self.token().is_kw(Kw::Let) {
            return Err(self.error_here("let is disallowed as a lexically bound name"));
        }

        let start = self.token_start();
        let (id, definite) = if self.token().is_identifier_like() {
            self.check_restricted_binding()?;
            let ident = self.ident_from_token();
            self.next()?;
            let mut end = ident.range.end;
            let definite = if self.is_ts()
                && self.token().is(TokenKind::Not)
                && !self.token().has_preceding_line_break()
            {
                end = self.token_end();
                self.next()?;
                true
            } else {
                false
            };
            let type_ann = if self.is_ts() && self.eat(TokenKind::Colon)? {
                let ty = self.parse_ts_type()?;
                end = ty.range().end;
                Some(ty)
            } else {
                None
            };
            let binding = Pattern::Ident(self.arena.alloc(BindingIdent {
                range: TextRange::new(ident.range.pos, end),
                ident,
                type_ann,
                optional: false,
            }));
            (binding, definite)
        } else {
            (self.parse_pattern_element(false, false)?, false)
        };

        let init = if self.token().is(TokenKind::Eq) {
            if flags.contains(VariableParseFlags::AMBIENT) && !self.is_dts {
                return Err(self.error_here(messages::AMBIENT_INITIALIZER));
            }
            self.next()?;
            let stop = if flags.contains(VariableParseFlags::IN_FOR) {
                ExpressionParseFlags::STOP_AT_IN
            } else {
                ExpressionParseFlags::NO_OPTS
            };
            Some(self.parse_expression(stop)?)
        } else {
            None
        };

        if init.is_none() && !flags.intersects(VariableParseFlags::IN_FOR | VariableParseFlags::AMBIENT)
        {
            if kind == VariableKind::Const {
                return Err(self.error_at(start, messages::MISSING_INITIALIZER_CONST));
            }
            if !matches!(id, Pattern::Ident(_)) {
                return Err(self.error_at(start, messages::MISSING_INITIALIZER_DESTRUCTURING));
            }
        }

        let decl_kind = match kind {
            VariableKind::Var => DeclKind::Var,
            VariableKind::Let => DeclKind::Let,
            VariableKind::Const => DeclKind::Const,
        };
        let decl_flags = if flags.contains(VariableParseFlags::EXPORTED) {
            DeclFlags::EXPORT
        } else {
            DeclFlags::NONE
        };
        self.add_pattern_decls(&id, decl_kind, decl_flags)?;

        let end = init.map(|e| e.range().end).unwrap_or(id.range().end);
        Ok(self.arena.alloc(VariableDeclarator {
            range: TextRange::new(start, end),
            id,
            init,
            definite,
        }))
    }

    // ======================================================================
    // Functions
    // ======================================================================

    fn parse_function_statement(
        &mut self,
        flags: StatementParseFlags,
        func_flags: FunctionFlags,
    ) -> Result<Statement<'a>> {
        let start = self.token_start();
        self.parse_function_statement_from(start, flags, func_flags, ModifierFlags::NONE)
    }

    fn parse_function_statement_from(
        &mut self,
        start: u32,
        flags: StatementParseFlags,
        func_flags: FunctionFlags,
        modifiers: ModifierFlags,
    ) -> Result<Statement<'a>> {
        if !flags.contains(StatementParseFlags::ALLOW_LEXICAL) {
            return Err(self.error_here(messages::INVALID_LABEL_FUNCTION));
        }
        let decl = self.parse_function_declaration(start, func_flags, modifiers, false)?;
        Ok(Statement::Function(decl))
    }

    /// `function` declaration starting at the `function` keyword. The
    /// binding is registered in the enclosing scope; TS signatures
    /// without a body register an overload that later declarations may
    /// merge with.
    pub(crate) fn parse_function_declaration(
        &mut self,
        start: u32,
        mut func_flags: FunctionFlags,
        modifiers: ModifierFlags,
        anonymous_ok: bool,
    ) -> Result<&'a FunctionDeclaration<'a>> {
        self.expect(TokenKind::Function)?;
        if self.eat(TokenKind::Star)? {
            func_flags |= FunctionFlags::GENERATOR;
        }
        let ident = if self.token().is_identifier_like() {
            self.check_restricted_binding()?;
            let id = self.ident_from_token();
            self.next()?;
            Some(id)
        } else if anonymous_ok {
            None
        } else {
            return Err(self.error_here(messages::IDENTIFIER_EXPECTED));
        };

        let function =
            self.parse_function_rest(start, ident, func_flags, ParserStatus::NO_OPTS, true, false)?;

        if let Some(id) = ident {
            let decl_flags = if modifiers.contains(ModifierFlags::EXPORT) {
                DeclFlags::EXPORT
            } else {
                DeclFlags::NONE
            };
            self.binder
                .add_decl(
                    id.sym,
                    DeclKind::Function { is_overload: function.is_overload() },
                    decl_flags,
                    id.range,
                )
                .map_err(|e| self.bind_error(e))?;
        }
        Ok(self.arena.alloc(FunctionDeclaration {
            range: function.range,
            function,
            modifiers,
        }))
    }

    // ======================================================================
    // Control flow
    // ======================================================================

    fn parse_if_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.expect(TokenKind::If)?.pos;
        self.expect(TokenKind::OpenParen)?;
        let test = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        self.expect(TokenKind::CloseParen)?;
        let consequent = self.parse_statement(StatementParseFlags::IF_ELSE)?;
        let alternate = if self.eat(TokenKind::Else)? {
            Some(self.parse_statement(StatementParseFlags::IF_ELSE)?)
        } else {
            None
        };
        let end = alternate
            .map(|s| s.range().end)
            .unwrap_or(consequent.range().end);
        Ok(Statement::If(self.arena.alloc(IfStatement {
            range: TextRange::new(start, end),
            test,
            consequent,
            alternate,
        })))
    }

    fn parse_while_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.expect(TokenKind::While)?.pos;
        self.expect(TokenKind::OpenParen)?;
        let test = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        self.expect(TokenKind::CloseParen)?;
        let body = self.with_status(ParserStatus::IN_ITERATION, |p| {
            p.parse_statement(StatementParseFlags::IF_ELSE)
        })?;
        Ok(Statement::While(self.arena.alloc(WhileStatement {
            range: TextRange::new(start, body.range().end),
            test,
            body,
        })))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.expect(TokenKind::Do)?.pos;
        let body = self.with_status(ParserStatus::IN_ITERATION, |p| {
            p.parse_statement(StatementParseFlags::IF_ELSE)
        })?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::OpenParen)?;
        let test = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        let mut end = self.expect(TokenKind::CloseParen)?.end;
        if self.token().is(TokenKind::Semicolon) {
            end = self.token_end();
            self.next()?;
        }
        Ok(Statement::DoWhile(self.arena.alloc(DoWhileStatement {
            range: TextRange::new(start, end),
            body,
            test,
        })))
    }

    fn parse_for_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.expect(TokenKind::For)?.pos;
        let is_await = if self.token().is_kw(Kw::Await) {
            if !self.in_status(ParserStatus::ASYNC_FUNCTION) {
                return Err(self.error_here(messages::AWAIT_RESERVED));
            }
            self.next()?;
            true
        } else {
            false
        };
        self.expect(TokenKind::OpenParen)?;
        let scope = self.binder.enter_scope(ScopeKind::Loop);

        let result = self.parse_for_statement_rest(start, is_await, scope);
        self.binder.exit_scope();
        result
    }

    fn parse_for_statement_rest(
        &mut self,
        start: u32,
        is_await: bool,
        scope: ScopeId,
    ) -> Result<Statement<'a>> {
        // Head led by a declaration keyword.
        let decl_kind = match self.token_kind() {
            TokenKind::Var => Some(VariableKind::Var),
            TokenKind::Const => Some(VariableKind::Const),
            TokenKind::Ident if self.token().is_kw(Kw::Let) && self.lookahead_starts_binding()? => {
                Some(VariableKind::Let)
            }
            _ => None,
        };

        if let Some(kind) = decl_kind {
            let decl_start = self.token_start();
            self.next()?;
            let first = self.parse_variable_declarator(kind, VariableParseFlags::IN_FOR)?;

            if self.token().is(TokenKind::In) || self.token().is_kw(Kw::Of) {
                if first.init.is_some() {
                    return Err(self.error_at(first.range.pos, messages::FOR_IN_OF_SINGLE_BINDING));
                }
                let is_of = self.token().is_kw(Kw::Of);
                self.next()?;
                let decl = &*self.arena.alloc(VariableDeclaration {
                    range: TextRange::new(decl_start, first.range.end),
                    kind,
                    declarators: alloc_slice(self.arena, &[first]),
                    declare: false,
                });
                return self.parse_for_in_of_tail(start, ForInit::Var(decl), is_of, is_await, scope);
            }

            let mut declarators = vec![first];
            while self.eat(TokenKind::Comma)? {
                declarators.push(self.parse_variable_declarator(kind, VariableParseFlags::IN_FOR)?);
            }
            let decl = &*self.arena.alloc(VariableDeclaration {
                range: TextRange::new(
                    decl_start,
                    declarators.last().map(|d| d.range.end).unwrap_or(decl_start),
                ),
                kind,
                declarators: alloc_slice(self.arena, &declarators),
                declare: false,
            });
            return self.parse_plain_for_tail(start, Some(ForInit::Var(decl)), is_await, scope);
        }

        if self.token().is(TokenKind::Semicolon) {
            return self.parse_plain_for_tail(start, None, is_await, scope);
        }

        // Expression head; may still turn out to be a for-in/of left.
        let left = self.parse_expression(
            ExpressionParseFlags::ACCEPT_COMMA
                | ExpressionParseFlags::STOP_AT_IN
                | ExpressionParseFlags::EXP_DISALLOW_AS
                | ExpressionParseFlags::POTENTIALLY_IN_PATTERN,
        )?;
        if self.token().is(TokenKind::In) || self.token().is_kw(Kw::Of) {
            let is_of = self.token().is_kw(Kw::Of);
            self.validate_assignment_target(left).map_err(|_| {
                let name = if is_of { "ForOfStatement" } else { "ForInStatement" };
                self.error_at(
                    left.range().pos,
                    format!("Invalid left-hand side in '{name}'"),
                )
            })?;
            self.next()?;
            return self.parse_for_in_of_tail(start, ForInit::Expr(left), is_of, is_await, scope);
        }
        self.parse_plain_for_tail(start, Some(ForInit::Expr(left)), is_await, scope)
    }

    fn parse_plain_for_tail(
        &mut self,
        start: u32,
        init: Option<ForInit<'a>>,
        is_await: bool,
        scope: ScopeId,
    ) -> Result<Statement<'a>> {
        if is_await {
            return Err(self.error_at(start, messages::UNEXPECTED_TOKEN));
        }
        self.expect(TokenKind::Semicolon)?;
        let test = if self.token().is(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.token().is(TokenKind::CloseParen) {
            None
        } else {
            Some(self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?)
        };
        self.expect(TokenKind::CloseParen)?;
        let body = self.with_status(ParserStatus::IN_ITERATION, |p| {
            p.parse_statement(StatementParseFlags::IF_ELSE)
        })?;
        Ok(Statement::For(self.arena.alloc(ForStatement {
            range: TextRange::new(start, body.range().end),
            init,
            test,
            update,
            body,
            scope,
        })))
    }

    fn parse_for_in_of_tail(
        &mut self,
        start: u32,
        left: ForInit<'a>,
        is_of: bool,
        is_await: bool,
        scope: ScopeId,
    ) -> Result<Statement<'a>> {
        if is_await && !is_of {
            return Err(self.error_at(start, messages::UNEXPECTED_TOKEN));
        }
        // for-of right side is an assignment expression, for-in takes a
        // full expression.
        let right = if is_of {
            self.parse_expression(ExpressionParseFlags::NO_OPTS)?
        } else {
            self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?
        };
        self.expect(TokenKind::CloseParen)?;
        let body = self.with_status(ParserStatus::IN_ITERATION, |p| {
            p.parse_statement(StatementParseFlags::IF_ELSE)
        })?;
        let range = TextRange::new(start, body.range().end);
        if is_of {
            Ok(Statement::ForOf(self.arena.alloc(ForOfStatement {
                range,
                left,
                right,
                body,
                is_await,
                scope,
            })))
        } else {
            Ok(Statement::ForIn(self.arena.alloc(ForInStatement {
                range,
                left,
                right,
                body,
                scope,
            })))
        }
    }

    fn parse_switch_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.expect(TokenKind::Switch)?.pos;
        self.expect(TokenKind::OpenParen)?;
        let discriminant = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        self.expect(TokenKind::CloseParen)?;
        let scope = self.binder.enter_scope(ScopeKind::Block);
        self.expect(TokenKind::OpenBrace)?;

        let cases = self.with_status(ParserStatus::IN_SWITCH, |p| {
            let mut cases = Vec::new();
            let mut seen_default = false;
            while !p.token().is(TokenKind::CloseBrace) {
                let case_start = p.token_start();
                let test = match p.token_kind() {
                    TokenKind::Case => {
                        p.next()?;
                        Some(p.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?)
                    }
                    TokenKind::Default => {
                        if seen_default {
                            return Err(p.error_here("Multiple default clauses."));
                        }
                        seen_default = true;
                        p.next()?;
                        None
                    }
                    _ => return Err(p.error_here(messages::UNEXPECTED_TOKEN)),
                };
                p.expect(TokenKind::Colon)?;
                let mut consequent = Vec::new();
                while !matches!(
                    p.token_kind(),
                    TokenKind::Case | TokenKind::Default | TokenKind::CloseBrace
                ) {
                    consequent.push(p.parse_statement(StatementParseFlags::ALLOW_LEXICAL)?);
                }
                let end = consequent
                    .last()
                    .map(|s: &Statement<'a>| s.range().end)
                    .unwrap_or(case_start);
                cases.push(SwitchCase {
                    range: TextRange::new(case_start, end),
                    test,
                    consequent: alloc_slice(p.arena, &consequent),
                });
            }
            Ok(cases)
        })?;

        let end = self.expect(TokenKind::CloseBrace)?.end;
        self.binder.exit_scope();
        Ok(Statement::Switch(self.arena.alloc(SwitchStatement {
            range: TextRange::new(start, end),
            discriminant,
            cases: alloc_slice(self.arena, &cases),
            scope,
        })))
    }

    fn parse_break_statement(&mut self) -> Result<Statement<'a>> {
        let range = self.expect(TokenKind::Break)?;
        let label = self.parse_optional_label()?;
        match label {
            Some(id) => {
                if !self.labels.iter().any(|(sym, _)| *sym == id.sym) {
                    return Err(self.error_at(id.range.pos, messages::UNDEFINED_LABEL));
                }
            }
            None => {
                if !self.in_status(ParserStatus::IN_ITERATION)
                    && !self.in_status(ParserStatus::IN_SWITCH)
                {
                    return Err(self.error_at(range.pos, messages::ILLEGAL_BREAK));
                }
            }
        }
        self.consume_semicolon()?;
        let end = label.map(|l| l.range.end).unwrap_or(range.end);
        Ok(Statement::Break(self.arena.alloc(BreakStatement {
            range: TextRange::new(range.pos, end),
            label,
        })))
    }

    fn parse_continue_statement(&mut self) -> Result<Statement<'a>> {
        let range = self.expect(TokenKind::Continue)?;
        let label = self.parse_optional_label()?;
        match label {
            Some(id) => match self.labels.iter().find(|(sym, _)| *sym == id.sym) {
                Some((_, true)) => {}
                Some((_, false)) => {
                    return Err(
                        self.error_at(id.range.pos, messages::CONTINUE_LABEL_NOT_ITERATION)
                    )
                }
                None => return Err(self.error_at(id.range.pos, messages::UNDEFINED_LABEL)),
            },
            None => {
                if !self.in_status(ParserStatus::IN_ITERATION) {
                    return Err(self.error_at(range.pos, messages::ILLEGAL_CONTINUE));
                }
            }
        }
        self.consume_semicolon()?;
        let end = label.map(|l| l.range.end).unwrap_or(range.end);
        Ok(Statement::Continue(self.arena.alloc(ContinueStatement {
            range: TextRange::new(range.pos, end),
            label,
        })))
    }

    fn parse_optional_label(&mut self) -> Result<Option<&'a Ident<'a>>> {
        if self.token().is_identifier_like() && !self.token().has_preceding_line_break() {
            let id = self.ident_from_token();
            self.next()?;
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }

    fn parse_return_statement(&mut self) -> Result<Statement<'a>> {
        let range = self.expect(TokenKind::Return)?;
        if !self.in_status(ParserStatus::IN_FUNCTION) {
            return Err(self.error_at(range.pos, "return keyword should be used in function body"));
        }
        let argument = if self.token().is(TokenKind::Semicolon)
            || self.token().is(TokenKind::CloseBrace)
            || self.token().is(TokenKind::Eos)
            || self.token().has_preceding_line_break()
        {
            None
        } else {
            Some(self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?)
        };
        self.consume_semicolon()?;
        let end = argument.map(|e| e.range().end).unwrap_or(range.end);
        Ok(Statement::Return(self.arena.alloc(ReturnStatement {
            range: TextRange::new(range.pos, end),
            argument,
        })))
    }

    fn parse_throw_statement(&mut self) -> Result<Statement<'a>> {
        let range = self.expect(TokenKind::Throw)?;
        if self.token().has_preceding_line_break() {
            return Err(self.error_at(range.pos, "Illegal newline after throw"));
        }
        let argument = self.parse_expression(ExpressionParseFlags::ACCEPT_COMMA)?;
        self.consume_semicolon()?;
        Ok(Statement::Throw(self.arena.alloc(ThrowStatement {
            range: TextRange::new(range.pos, argument.range().end),
            argument,
        })))
    }

    fn parse_try_statement(&mut self) -> Result<Statement<'a>> {
        let start = self.expect(TokenKind::Try)?.pos;
        let block = self.parse_block_statement()?;

        let handler = if self.token().is(TokenKind::Catch) {
            let catch_start = self.token_start();
            self.next()?;
            let param_scope = self.binder.enter_scope(ScopeKind::CatchParam);
            let param = if self.eat(TokenKind::OpenParen)? {
                let pattern = self.parse_pattern_element(false, false)?;
                if self.token().is(TokenKind::Eq) {
                    return Err(
                        self.error_here("Catch clause variable cannot have an initializer")
                    );
                }
                self.add_pattern_decls(&pattern, DeclKind::Let, DeclFlags::NONE)?;
                self.expect(TokenKind::CloseParen)?;
                Some(pattern)
            } else {
                None
            };
            let scope = self.binder.enter_scope(ScopeKind::Catch);
            let body = self.parse_block_in_current_scope()?;
            self.binder.exit_scope();
            self.binder.exit_scope();
            Some(&*self.arena.alloc(CatchClause {
                range: TextRange::new(catch_start, body.range.end),
                param,
                body,
                param_scope,
                scope,
            }))
        } else {
            None
        };

        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_here("Missing catch or finally clause"));
        }
        let end = finalizer
            .map(|b| b.range.end)
            .or(handler.map(|h| h.range.end))
            .unwrap_or(block.range.end);
        Ok(Statement::Try(self.arena.alloc(TryStatement {
            range: TextRange::new(start, end),
            block,
            handler,
            finalizer,
        })))
    }

    // ======================================================================
    // Labels
    // ======================================================================

    fn parse_label_or_expression_statement(&mut self) -> Result<Statement<'a>> {
        if self.token().is_identifier_like() && self.lookahead_is(TokenKind::Colon)? {
            return self.parse_labeled_statement();
        }
        self.parse_expression_statement()
    }

    fn parse_labeled_statement(&mut self) -> Result<Statement<'a>> {
        let label = self.ident_from_token();
        self.next()?;
        self.expect(TokenKind::Colon)?;

        if self.labels.iter().any(|(sym, _)| *sym == label.sym) {
            return Err(self.error_at(label.range.pos, messages::DUPLICATE_LABEL));
        }
        let is_iteration = self.upcoming_iteration_statement()?;
        self.labels.push((label.sym, is_iteration));
        let body = self.parse_statement(StatementParseFlags::LABELLED);
        self.labels.pop();
        let body = body?;

        Ok(Statement::Labeled(self.arena.alloc(LabeledStatement {
            range: TextRange::new(label.range.pos, body.range().end),
            label,
            body,
        })))
    }

    /// Looks through a chain of further labels to decide whether this
    /// label names an iteration statement, which `continue` requires.
    fn upcoming_iteration_statement(&mut self) -> Result<bool> {
        let saved = self.save();
        let hit = loop {
            match self.token_kind() {
                TokenKind::For | TokenKind::While | TokenKind::Do => break true,
                TokenKind::Ident => {
                    self.next()?;
                    if !self.token().is(TokenKind::Colon) {
                        break false;
                    }
                    self.next()?;
                }
                _ => break false,
            }
        };
        self.rewind(saved);
        Ok(hit)
    }
}
