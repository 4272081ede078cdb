//! strix_core: shared infrastructure for the strix front-end.
//!
//! Text spans and line maps, string interning, and the arena type that
//! every parse allocates into.

pub mod intern;
pub mod text;

/// The arena that owns all AST nodes of a single parse.
///
/// One `Bump` per parse; nothing allocated in it is freed individually.
/// The returned `Program` borrows from it, so the arena must outlive the
/// program.
pub use bumpalo::Bump;
