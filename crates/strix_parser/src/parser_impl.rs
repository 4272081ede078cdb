//! Parser core: token plumbing, parse-mode dispatch, and the `Program`
//! artifact.

use bumpalo::Bump;
use strix_ast::*;
use strix_binder::{BindError, Binder, DeclFlags, DeclKind, ResolveBindingFlags, ScopeKind};
use strix_core::intern::StringInterner;
use strix_core::text::{LineMap, TextRange};
use strix_diagnostics::{messages, Error, Result};
use strix_lexer::{Kw, LexError, Lexer, LexerState, Token, TokenKind};
use strix_module::SourceTextModuleRecord;
use tracing::debug;

use crate::context::ParserStatus;

/// The front-end entry point. One instance is configured with a script
/// extension and may parse any number of files, one at a time.
pub struct ParserImpl {
    extension: ScriptExtension,
}

impl ParserImpl {
    pub fn new(extension: ScriptExtension) -> Self {
        Self { extension }
    }

    pub fn extension(&self) -> ScriptExtension {
        self.extension
    }

    /// Parses one file into a [`Program`] allocated in `arena`. The
    /// first grammar violation aborts the parse with a positioned
    /// error.
    pub fn parse<'a>(
        &self,
        arena: &'a Bump,
        file_name: &str,
        source: &str,
        record_name: &str,
        kind: ScriptKind,
    ) -> Result<Program<'a>> {
        debug!(file = file_name, ?kind, "parse start");
        let parser = Parser::new(arena, file_name, source, record_name, kind, self.extension);
        parser.run()
    }
}

/// Finished parse artifact, owned by the caller.
pub struct Program<'a> {
    pub kind: ScriptKind,
    pub extension: ScriptExtension,
    pub file_name: String,
    pub record_name: String,
    pub is_dts: bool,
    /// Root block holding the top-level statements.
    pub ast: &'a BlockStatement<'a>,
    pub binder: Binder,
    /// Present for `ScriptKind::Module` parses.
    pub module_record: Option<SourceTextModuleRecord>,
    pub line_map: LineMap,
    pub interner: StringInterner,
}

/// Internal per-parse state.
pub(crate) struct Parser<'a> {
    pub(crate) arena: &'a Bump,
    pub(crate) lexer: Lexer,
    pub(crate) file_name: String,
    pub(crate) record_name: String,
    pub(crate) line_map: LineMap,
    pub(crate) interner: StringInterner,
    pub(crate) binder: Binder,
    pub(crate) module_record: Option<SourceTextModuleRecord>,
    pub(crate) status: ParserStatus,
    pub(crate) extension: ScriptExtension,
    pub(crate) kind: ScriptKind,
    pub(crate) is_dts: bool,
    /// Active label names, innermost last. The flag records whether the
    /// labelled statement is an iteration statement.
    pub(crate) labels: Vec<(strix_core::intern::InternedString, bool)>,
}

impl<'a> Parser<'a> {
    fn new(
        arena: &'a Bump,
        file_name: &str,
        source: &str,
        record_name: &str,
        kind: ScriptKind,
        extension: ScriptExtension,
    ) -> Self {
        let interner = StringInterner::new();
        let binder = Binder::new(kind, extension, interner.clone());
        let module_record = if kind.is_module() {
            Some(SourceTextModuleRecord::new())
        } else {
            None
        };
        let is_dts = extension == ScriptExtension::Ts && file_name.ends_with(".d.ts");
        Parser {
            arena,
            lexer: Lexer::new(source),
            file_name: file_name.to_string(),
            record_name: record_name.to_string(),
            line_map: LineMap::new(source),
            interner,
            binder,
            module_record,
            status: ParserStatus::NO_OPTS,
            extension,
            kind,
            is_dts,
            labels: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Program<'a>> {
        self.lexer.skip_shebang();
        self.next()?;

        let ast = match self.kind {
            ScriptKind::Script => self.parse_script()?,
            ScriptKind::Module => self.parse_module()?,
            ScriptKind::CommonJs => self.parse_commonjs()?,
        };

        if !self.token().is(TokenKind::Eos) {
            return Err(self.error_here(messages::UNEXPECTED_TOKEN));
        }

        let flags = if self.extension.is_typed() {
            ResolveBindingFlags::TS_BEFORE_TRANSFORM
        } else {
            ResolveBindingFlags::ALL
        };
        self.binder
            .identifier_analysis(ast.statements, flags)
            .map_err(|e| self.bind_error(e))?;

        debug!(file = %self.file_name, "parse complete");
        Ok(Program {
            kind: self.kind,
            extension: self.extension,
            file_name: self.file_name,
            record_name: self.record_name,
            is_dts: self.is_dts,
            ast,
            binder: self.binder,
            module_record: self.module_record,
            line_map: self.line_map,
            interner: self.interner,
        })
    }

    fn parse_script(&mut self) -> Result<&'a BlockStatement<'a>> {
        let statements = self.parse_statement_list_global()?;
        Ok(self.alloc_root_block(statements))
    }

    fn parse_module(&mut self) -> Result<&'a BlockStatement<'a>> {
        self.status |= ParserStatus::MODULE;
        let statements = self.parse_statement_list_global()?;
        Ok(self.alloc_root_block(statements))
    }

    /// CommonJS sources are wrapped into
    /// `Reflect.apply(function (exports, require, module, __filename,
    /// __dirname) { ... }, exports, [exports, require, module,
    /// __filename, __dirname])` so the embedder sees a single call.
    fn parse_commonjs(&mut self) -> Result<&'a BlockStatement<'a>> {
        const WRAPPER_PARAMS: [&str; 5] =
            ["exports", "require", "module", "__filename", "__dirname"];

        let param_scope = self.binder.enter_scope(ScopeKind::FunctionParam);
        let mut params = Vec::with_capacity(WRAPPER_PARAMS.len());
        for name in WRAPPER_PARAMS {
            let ident = self.synthetic_ident(name);
            self.binder
                .add_param_decl(ident.ident.sym, ident.range)
                .map_err(|e| self.bind_error(e))?;
            params.push(Param {
                range: ident.range,
                pattern: Pattern::Ident(ident),
                modifiers: ModifierFlags::NONE,
            });
        }

        let func_scope = self.binder.enter_scope(ScopeKind::Function);
        let statements =
            self.with_status(ParserStatus::IN_FUNCTION, |p| p.parse_statement_list_global())?;
        self.binder.exit_scope();
        self.binder.exit_scope();

        let end = self.token().range.end;
        let body = &*self.arena.alloc(BlockStatement {
            range: TextRange::new(0, end),
            statements,
            scope: func_scope,
        });
        let func = &*self.arena.alloc(ScriptFunction {
            range: TextRange::new(0, end),
            ident: None,
            type_params: None,
            params: alloc_slice(self.arena, &params),
            return_type: None,
            body: Some(FunctionBody::Block(body)),
            flags: FunctionFlags::NONE,
            param_scope,
            scope: func_scope,
        });

        let reflect = self.synthetic_ident("Reflect");
        let apply = self.synthetic_ident("apply");
        let callee = &*self.arena.alloc(MemberExpr {
            range: TextRange::empty(0),
            object: Expression::Ident(reflect.ident),
            property: Expression::Ident(apply.ident),
            computed: false,
            optional: false,
        });

        let mut array_args = Vec::with_capacity(WRAPPER_PARAMS.len());
        for name in WRAPPER_PARAMS {
            array_args.push(Some(Expression::Ident(self.synthetic_ident(name).ident)));
        }
        let args_array = &*self.arena.alloc(ArrayExpr {
            range: TextRange::empty(0),
            elements: alloc_slice(self.arena, &array_args),
            trailing_comma: false,
        });

        let this_arg = self.synthetic_ident("exports");
        let call = &*self.arena.alloc(CallExpr {
            range: TextRange::new(0, end),
            callee: Expression::Member(callee),
            type_args: None,
            arguments: alloc_slice(
                self.arena,
                &[
                    Expression::Function(func),
                    Expression::Ident(this_arg.ident),
                    Expression::Array(args_array),
                ],
            ),
            optional: false,
        });
        let stmt = Statement::Expr(self.arena.alloc(ExpressionStatement {
            range: TextRange::new(0, end),
            expr: Expression::Call(call),
            directive: None,
        }));

        let statements = alloc_slice(self.arena, &[stmt]);
        Ok(self.alloc_root_block(statements))
    }

    fn alloc_root_block(&mut self, statements: &'a [Statement<'a>]) -> &'a BlockStatement<'a> {
        let end = self.token().range.end;
        self.arena.alloc(BlockStatement {
            range: TextRange::new(0, end),
            statements,
            scope: self.binder.top_scope(),
        })
    }

    // ======================================================================
    // Token plumbing
    // ======================================================================

    #[inline]
    pub(crate) fn token(&self) -> &Token {
        self.lexer.token()
    }

    #[inline]
    pub(crate) fn token_kind(&self) -> TokenKind {
        self.lexer.token().kind
    }

    #[inline]
    pub(crate) fn token_start(&self) -> u32 {
        self.lexer.token().range.pos
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.lexer.token().range.end
    }

    pub(crate) fn next(&mut self) -> Result<()> {
        self.lexer.next_token().map_err(|e| self.lex_error(e))
    }

    pub(crate) fn save(&self) -> LexerState {
        self.lexer.save()
    }

    pub(crate) fn rewind(&mut self, state: LexerState) {
        self.lexer.rewind(state);
    }

    /// Consumes `kind` or fails with its spelling in the message.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<TextRange> {
        if self.token_kind() == kind {
            let range = self.token().range;
            self.next()?;
            Ok(range)
        } else {
            let text = kind.text().unwrap_or("token");
            Err(self.error_here(format!("Unexpected token, expected '{text}'")))
        }
    }

    /// Consumes `kind` if present.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.token_kind() == kind {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Automatic semicolon insertion: an explicit `;`, a closing brace,
    /// end of input, or a preceding line break all terminate the
    /// statement.
    pub(crate) fn consume_semicolon(&mut self) -> Result<()> {
        if self.token().is(TokenKind::Semicolon) {
            return self.next();
        }
        if self.token().is(TokenKind::CloseBrace)
            || self.token().is(TokenKind::Eos)
            || self.token().has_preceding_line_break()
        {
            return Ok(());
        }
        Err(self.error_here(messages::UNEXPECTED_TOKEN))
    }

    // ======================================================================
    // Errors
    // ======================================================================

    pub(crate) fn error_at(&self, pos: u32, message: impl Into<String>) -> Error {
        Error::syntax(message, &self.file_name, self.line_map.line_col(pos))
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> Error {
        self.error_at(self.token_start(), message)
    }

    pub(crate) fn lex_error(&self, err: LexError) -> Error {
        self.error_at(err.pos, err.message)
    }

    pub(crate) fn bind_error(&self, err: BindError) -> Error {
        self.error_at(err.pos, err.message)
    }

    // ======================================================================
    // Status scoping
    // ======================================================================

    /// Runs `f` with extra status bits set, restoring the outer status
    /// afterwards whether or not `f` succeeds.
    pub(crate) fn with_status<T>(
        &mut self,
        add: ParserStatus,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.status;
        self.status |= add;
        let result = f(self);
        self.status = saved;
        result
    }

    /// Runs `f` with a fresh function-level status, keeping only the
    /// bits in `keep` from the surrounding context.
    pub(crate) fn with_function_status<T>(
        &mut self,
        set: ParserStatus,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.status;
        let kept = saved & (ParserStatus::MODULE | ParserStatus::IN_AMBIENT_CONTEXT | ParserStatus::TS_MODULE);
        self.status = kept | set | ParserStatus::IN_FUNCTION;
        let result = f(self);
        self.status = saved;
        result
    }

    pub(crate) fn in_status(&self, flag: ParserStatus) -> bool {
        self.status.contains(flag)
    }

    pub(crate) fn is_ts(&self) -> bool {
        self.extension.is_typed()
    }

    // ======================================================================
    // Node helpers
    // ======================================================================

    /// Allocates an identifier node from the current token and eats it.
    pub(crate) fn parse_ident(&mut self) -> Result<&'a Ident<'a>> {
        if !self.token().is_identifier_like() {
            return Err(self.error_here(messages::IDENTIFIER_EXPECTED));
        }
        self.check_restricted_binding()?;
        let ident = self.ident_from_token();
        self.next()?;
        Ok(ident)
    }

    /// Allocates an identifier from the current token without consuming
    /// it or applying binding restrictions (member names, labels).
    pub(crate) fn ident_from_token(&mut self) -> &'a Ident<'a> {
        let token = self.lexer.token();
        let sym = self.interner.intern(&token.value);
        self.arena.alloc(Ident {
            range: token.range,
            sym,
            name: self.arena.alloc_str(&token.value),
        })
    }

    /// Reserved-identifier checks for binding positions.
    pub(crate) fn check_restricted_binding(&self) -> Result<()> {
        let token = self.token();
        match token.kw {
            Some(Kw::Await) if self.in_status(ParserStatus::MODULE) => {
                Err(self.error_here("'await' is not permitted as an identifier in module code"))
            }
            Some(Kw::Yield) if self.in_status(ParserStatus::GENERATOR_FUNCTION) => {
                Err(self.error_here("'yield' is not permitted as an identifier in generator bodies"))
            }
            Some(Kw::Let) => Ok(()),
            _ => match token.value.as_str() {
                "eval" => Err(self.error_here("Binding 'eval' in strict mode is invalid")),
                "arguments" => {
                    Err(self.error_here("Binding 'arguments' in strict mode is invalid"))
                }
                _ => Ok(()),
            },
        }
    }

    /// Identifier node with no source backing (module wrappers,
    /// desugared exports).
    pub(crate) fn synthetic_ident(&mut self, name: &str) -> &'a BindingIdent<'a> {
        let sym = self.interner.intern(name);
        let ident = &*self.arena.alloc(Ident {
            range: TextRange::empty(0),
            sym,
            name: self.arena.alloc_str(name),
        });
        self.arena.alloc(BindingIdent {
            range: ident.range,
            ident,
            type_ann: None,
            optional: false,
        })
    }

    /// Registers one declaration for every name bound by `pattern`.
    pub(crate) fn add_pattern_decls(
        &mut self,
        pattern: &Pattern<'a>,
        kind: DeclKind,
        flags: DeclFlags,
    ) -> Result<()> {
        let mut bindings = Vec::new();
        pattern.each_binding(&mut |id| bindings.push((id.ident.sym, id.ident.range)));
        for (sym, range) in bindings {
            self.binder
                .add_decl(sym, kind, flags, range)
                .map_err(|e| self.bind_error(e))?;
        }
        Ok(())
    }

    /// Parameter bindings go through the dedicated parameter rule so
    /// duplicates are tolerated for simple lists and rejected later for
    /// complex ones.
    pub(crate) fn add_param_pattern_decls(&mut self, pattern: &Pattern<'a>) -> Result<()> {
        let mut bindings = Vec::new();
        pattern.each_binding(&mut |id| bindings.push((id.ident.sym, id.ident.range)));
        for (sym, range) in bindings {
            self.binder
                .add_param_decl(sym, range)
                .map_err(|e| self.bind_error(e))?;
        }
        Ok(())
    }
}
