//! Parse-context flags.
//!
//! `ParserStatus` is the lexically scoped status word threaded through
//! recursive calls: each nested construct saves the outer value and
//! restores it on exit, so a flag like `IN_ITERATION` is visible exactly
//! within the loop body that set it.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParserStatus: u32 {
        const NO_OPTS              = 0;
        const IN_FUNCTION          = 1 << 0;
        const ASYNC_FUNCTION       = 1 << 1;
        const GENERATOR_FUNCTION   = 1 << 2;
        const ARROW_FUNCTION       = 1 << 3;
        const CONSTRUCTOR_FUNCTION = 1 << 4;
        const IN_ITERATION         = 1 << 5;
        const IN_SWITCH            = 1 << 6;
        const IN_CLASS_BODY        = 1 << 7;
        const ALLOW_SUPER          = 1 << 8;
        const ALLOW_SUPER_CALL     = 1 << 9;
        const MODULE               = 1 << 10;
        const IN_AMBIENT_CONTEXT   = 1 << 11;
        const TS_MODULE            = 1 << 12;
        const DISALLOW_AWAIT       = 1 << 13;
        const FUNCTION_PARAM       = 1 << 14;
        const IN_METHOD_DEFINITION = 1 << 15;
        const IN_DECORATOR         = 1 << 16;
        /// Non-identifier parameter somewhere in the list.
        const HAS_COMPLEX_PARAM    = 1 << 17;
    }
}

bitflags::bitflags! {
    /// Flags passed down the expression grammar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExpressionParseFlags: u16 {
        const NO_OPTS                = 0;
        /// Comma may extend the expression into a sequence.
        const ACCEPT_COMMA           = 1 << 0;
        /// A trailing rest element is allowed in the sequence.
        const ACCEPT_REST            = 1 << 1;
        /// The expression may later be reinterpreted as a binding
        /// pattern, so cover-grammar shapes are admitted.
        const POTENTIALLY_IN_PATTERN = 1 << 2;
        const DISALLOW_YIELD         = 1 << 3;
        /// Stop before a top-level `in` (for-statement heads).
        const STOP_AT_IN             = 1 << 4;
        /// `as` must not extend the expression (for-of heads).
        const EXP_DISALLOW_AS        = 1 << 5;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatementParseFlags: u8 {
        const NONE          = 0;
        /// Lexical declarations are legal here.
        const ALLOW_LEXICAL = 1 << 0;
        /// Top level of the file.
        const GLOBAL        = 1 << 1;
        /// Direct body of an `if`/loop.
        const IF_ELSE       = 1 << 2;
        const LABELLED      = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Flags for `var`/`let`/`const` declaration parsing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VariableParseFlags: u8 {
        const NO_OPTS   = 0;
        /// Head of a `for` statement: single binding, no `in`.
        const IN_FOR    = 1 << 0;
        /// Binding is exported.
        const EXPORTED  = 1 << 1;
        /// `declare` context.
        const AMBIENT   = 1 << 2;
        /// `for await (... of ...)` head.
        const FOR_AWAIT = 1 << 3;
    }
}
