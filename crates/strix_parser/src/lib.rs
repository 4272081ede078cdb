//! strix_parser: Recursive descent parser for JavaScript and TypeScript.
//!
//! Turns source text into an arena-allocated AST together with the
//! scope table and, for modules, the source-text module record.

mod class;
mod context;
mod expr;
mod function;
mod imports;
mod parser_impl;
mod precedence;
mod stmt;
mod ts_decl;
mod ts_type;

pub use parser_impl::{ParserImpl, Program};
