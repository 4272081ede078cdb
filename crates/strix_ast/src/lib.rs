//! strix_ast: arena-allocated AST for the strix front-end.
//!
//! All nodes live in a [`bumpalo::Bump`] owned by the caller; the tree
//! borrows from it with a single `'a` lifetime and is immutable once
//! built.

pub mod node;
pub mod types;

pub use node::*;
pub use types::*;

use bumpalo::Bump;

/// Moves a temporary `Vec` into the arena as a slice. Node lists are
/// built in ordinary vectors and pinned once their length is known.
pub fn alloc_slice<'a, T: Copy>(arena: &'a Bump, items: &[T]) -> &'a [T] {
    arena.alloc_slice_copy(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strix_core::text::TextRange;

    #[test]
    fn pattern_each_binding_walks_nested_bindings() {
        let arena = Bump::new();
        let interner = strix_core::intern::StringInterner::new();

        let make_ident = |name: &str, pos: u32| -> &BindingIdent<'_> {
            let ident = arena.alloc(Ident {
                range: TextRange::new(pos, pos + name.len() as u32),
                sym: interner.intern(name),
                name: arena.alloc_str(name),
            });
            arena.alloc(BindingIdent {
                range: ident.range,
                ident,
                type_ann: None,
                optional: false,
            })
        };

        // [a, , [b]]
        let a = Pattern::Ident(make_ident("a", 1));
        let b = Pattern::Ident(make_ident("b", 6));
        let inner = Pattern::Array(arena.alloc(ArrayPattern {
            range: TextRange::new(5, 8),
            elements: alloc_slice(&arena, &[Some(b)]),
            type_ann: None,
        }));
        let outer = Pattern::Array(arena.alloc(ArrayPattern {
            range: TextRange::new(0, 9),
            elements: alloc_slice(&arena, &[Some(a), None, Some(inner)]),
            type_ann: None,
        }));

        let mut seen = Vec::new();
        outer.each_binding(&mut |id| seen.push(id.ident.name.to_string()));
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn binary_op_precedence_ordering() {
        assert!(BinaryOp::Exponent.precedence() > BinaryOp::Multiply.precedence());
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::LeftShift.precedence());
        assert_eq!(BinaryOp::NullishCoalescing.precedence(), 1);
        assert!(BinaryOp::Exponent.is_right_associative());
        assert!(!BinaryOp::Add.is_right_associative());
    }

    #[test]
    fn unwrap_parens_strips_nesting() {
        let arena = Bump::new();
        let lit = arena.alloc(NumberLit {
            range: TextRange::new(2, 3),
            value: 1.0,
        });
        let inner = Expression::Number(lit);
        let once = Expression::Paren(arena.alloc(ParenExpr {
            range: TextRange::new(1, 4),
            expr: inner,
        }));
        let twice = Expression::Paren(arena.alloc(ParenExpr {
            range: TextRange::new(0, 5),
            expr: once,
        }));
        assert!(matches!(twice.unwrap_parens(), Expression::Number(_)));
    }
}
