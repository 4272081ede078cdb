//! strix_binder: lexical scopes, declaration tracking, and identifier
//! resolution.
//!
//! Declarations are collected while the parser runs; full identifier
//! resolution happens once over the finished tree via
//! [`Binder::identifier_analysis`].

mod binder;
mod scope;

pub use binder::{BindError, BindResult, Binder, ResolveBindingFlags};
pub use scope::{AddDeclResult, Decl, DeclFlags, DeclKind, Scope, ScopeKind};
