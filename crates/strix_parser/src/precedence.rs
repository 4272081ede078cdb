//! Token-to-operator mapping for the binary expression grammar.

use strix_ast::{AssignOp, BinaryOp};
use strix_lexer::{Token, TokenKind};

/// Maps a token to a binary operator if it can continue a binary
/// expression. `in` only counts when the context permits it.
pub fn binary_op_for(token: &Token, allow_in: bool) -> Option<BinaryOp> {
    let op = match token.kind {
        TokenKind::QuestionQuestion => BinaryOp::NullishCoalescing,
        TokenKind::BarBar => BinaryOp::LogicalOr,
        TokenKind::AmpAmp => BinaryOp::LogicalAnd,
        TokenKind::Bar => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::EqEq => BinaryOp::Equality,
        TokenKind::NotEq => BinaryOp::Inequality,
        TokenKind::EqEqEq => BinaryOp::StrictEquality,
        TokenKind::NotEqEq => BinaryOp::StrictInequality,
        TokenKind::Lt => BinaryOp::Less,
        TokenKind::Gt => BinaryOp::Greater,
        TokenKind::LtEq => BinaryOp::LessEqual,
        TokenKind::GtEq => BinaryOp::GreaterEqual,
        TokenKind::InstanceOf => BinaryOp::Instanceof,
        TokenKind::In if allow_in => BinaryOp::In,
        TokenKind::LtLt => BinaryOp::LeftShift,
        TokenKind::GtGt => BinaryOp::RightShift,
        TokenKind::GtGtGt => BinaryOp::UnsignedRightShift,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::StarStar => BinaryOp::Exponent,
        _ => return None,
    };
    Some(op)
}

/// Maps a token to an assignment operator.
pub fn assign_op_for(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubtractAssign,
        TokenKind::StarEq => AssignOp::MultiplyAssign,
        TokenKind::SlashEq => AssignOp::DivideAssign,
        TokenKind::PercentEq => AssignOp::ModuloAssign,
        TokenKind::StarStarEq => AssignOp::ExponentAssign,
        TokenKind::LtLtEq => AssignOp::LeftShiftAssign,
        TokenKind::GtGtEq => AssignOp::RightShiftAssign,
        TokenKind::GtGtGtEq => AssignOp::UnsignedRightShiftAssign,
        TokenKind::AmpEq => AssignOp::BitAndAssign,
        TokenKind::BarEq => AssignOp::BitOrAssign,
        TokenKind::CaretEq => AssignOp::BitXorAssign,
        TokenKind::AmpAmpEq => AssignOp::LogicalAndAssign,
        TokenKind::BarBarEq => AssignOp::LogicalOrAssign,
        TokenKind::QuestionQuestionEq => AssignOp::NullishAssign,
        _ => return None,
    };
    Some(op)
}
