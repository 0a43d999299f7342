//! Expression trees.
//!
//! Expression nodes are arena-allocated in a [`Design`](crate::design::Design)
//! and refer to their operands by [`ExprId`]. Nodes carry no resolved
//! type: bit-vector resolution is a separate elaboration pass that caches
//! its result per node ID, so construction stays pure and operand types
//! never need to be finalized up front.

use crate::constant::Constant;
use crate::ids::{ExprId, SignalId};
use serde::{Deserialize, Serialize};

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise NOT (`~`). Result keeps the operand's type.
    Not,
    /// Arithmetic negation (`-`). Result is signed, one bit wider.
    Neg,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`). Signed iff either operand is; width `max + 1`.
    Add,
    /// Subtraction (`-`). Signed iff either operand is; width `max + 1`.
    Sub,
    /// Multiplication (`*`). Signed iff either operand is; width sum.
    Mul,
    /// Bitwise AND (`&`). Width `max`, narrower operand extended.
    And,
    /// Bitwise OR (`|`). Width `max`, narrower operand extended.
    Or,
    /// Bitwise XOR (`^`). Width `max`, narrower operand extended.
    Xor,
    /// Left shift (`<<`). Result takes the left operand's type.
    Shl,
    /// Right shift (`>>`). Result takes the left operand's type.
    Shr,
    /// Equality (`==`). Single unsigned bit.
    Eq,
    /// Inequality (`!=`). Single unsigned bit.
    Ne,
    /// Less than (`<`). Single unsigned bit.
    Lt,
    /// Less than or equal (`<=`). Single unsigned bit.
    Le,
    /// Greater than (`>`). Single unsigned bit.
    Gt,
    /// Greater than or equal (`>=`). Single unsigned bit.
    Ge,
}

impl BinaryOp {
    /// Returns `true` for the comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

/// An expression node.
///
/// Pure and side-effect-free; nodes compose by referencing other nodes
/// in the same design's expression arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal constant.
    Const(Constant),
    /// A reference to a signal.
    Signal(SignalId),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand node.
        operand: ExprId,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand side.
        lhs: ExprId,
        /// The right-hand side.
        rhs: ExprId,
    },
    /// A bit slice over the half-open range `[lsb, msb)`.
    ///
    /// `lsb` is the least-significant end, inclusive; `msb` is exclusive.
    /// Bounds are validated against the operand width during elaboration.
    /// The textual backend translates to the target format's inclusive
    /// MSB:LSB convention.
    Slice {
        /// The expression being sliced.
        expr: ExprId,
        /// Inclusive low bound (least-significant bit index).
        lsb: u32,
        /// Exclusive high bound.
        msb: u32,
    },
    /// A concatenation. The *first* operand occupies the lowest-index
    /// bits of the result; the result is always unsigned.
    Cat(Vec<ExprId>),
    /// `count` copies of an expression, concatenated. Result unsigned.
    Replicate {
        /// The expression to replicate.
        expr: ExprId,
        /// The number of copies. Zero yields a zero-width value.
        count: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bv::Bv;

    #[test]
    fn const_node() {
        let e = Expr::Const(Constant::new(7));
        if let Expr::Const(c) = e {
            assert_eq!(c.bv, Bv::new(3));
        } else {
            panic!("expected Const");
        }
    }

    #[test]
    fn slice_is_half_open() {
        let e = Expr::Slice {
            expr: ExprId::from_raw(0),
            lsb: 0,
            msb: 4,
        };
        if let Expr::Slice { lsb, msb, .. } = e {
            assert_eq!(msb - lsb, 4);
        } else {
            panic!("expected Slice");
        }
    }

    #[test]
    fn comparison_classification() {
        assert!(BinaryOp::Eq.is_comparison());
        assert!(BinaryOp::Ge.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(!BinaryOp::Shl.is_comparison());
    }

    #[test]
    fn all_binary_ops_distinct() {
        let ops = [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::And,
            BinaryOp::Or,
            BinaryOp::Xor,
            BinaryOp::Shl,
            BinaryOp::Shr,
            BinaryOp::Eq,
            BinaryOp::Ne,
            BinaryOp::Lt,
            BinaryOp::Le,
            BinaryOp::Gt,
            BinaryOp::Ge,
        ];
        for (i, a) in ops.iter().enumerate() {
            for (j, b) in ops.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }

    #[test]
    fn serde_roundtrip() {
        let e = Expr::Binary {
            op: BinaryOp::Add,
            lhs: ExprId::from_raw(1),
            rhs: ExprId::from_raw(2),
        };
        let json = serde_json::to_string(&e).unwrap();
        let restored: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(e, restored);
    }
}
