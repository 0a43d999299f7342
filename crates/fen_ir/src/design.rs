//! The design construction context.
//!
//! A [`Design`] owns the signal and expression arenas plus the string
//! interner, and is the single entry point for building IR: signals,
//! expression nodes, and checked statements. All operator sugar routes
//! through the same constructors, so no construction path can bypass
//! the lvalue and case-arm checks.

use crate::arena::Arena;
use crate::bv::Bv;
use crate::constant::Constant;
use crate::error::IrError;
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::ids::{ExprId, SignalId};
use crate::signal::Signal;
use crate::stmt::Statement;
use fen_common::{Ident, Interner};

/// The construction context for one elaboration unit.
///
/// Signals and expression nodes are identified by arena IDs; a signal
/// may be referenced from any number of statements across any number of
/// fragments built against the same design.
pub struct Design {
    /// All signals, in creation order.
    pub signals: Arena<SignalId, Signal>,
    /// All expression nodes, in creation order.
    pub exprs: Arena<ExprId, Expr>,
    interner: Interner,
}

impl Design {
    /// Creates an empty design context.
    pub fn new() -> Self {
        Self {
            signals: Arena::new(),
            exprs: Arena::new(),
            interner: Interner::new(),
        }
    }

    /// Interns a string, returning its [`Ident`].
    pub fn intern(&self, s: &str) -> Ident {
        self.interner.get_or_intern(s)
    }

    /// Resolves an [`Ident`] back to its string value.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    // --- signals ---

    /// Creates an unnamed signal with reset value 0.
    pub fn signal(&mut self, bv: Bv) -> SignalId {
        self.signals.alloc(Signal::new(bv))
    }

    /// Creates a signal with a display-name hint.
    pub fn signal_named(&mut self, bv: Bv, name: &str) -> SignalId {
        let ident = self.intern(name);
        self.signals.alloc(Signal::new(bv).named(ident))
    }

    /// Adds a fully configured signal.
    pub fn add_signal(&mut self, signal: Signal) -> SignalId {
        self.signals.alloc(signal)
    }

    /// Returns the declared bit vector of a signal.
    pub fn signal_bv(&self, id: SignalId) -> Bv {
        self.signals[id].bv
    }

    // --- expression nodes ---

    /// Creates a constant node with the minimal derived type.
    pub fn constant(&mut self, value: i128) -> ExprId {
        self.exprs.alloc(Expr::Const(Constant::new(value)))
    }

    /// Creates a constant node with an explicit type, checking the fit.
    pub fn constant_bv(&mut self, value: i128, bv: Bv) -> Result<ExprId, IrError> {
        let c = Constant::with_bv(value, bv)?;
        Ok(self.exprs.alloc(Expr::Const(c)))
    }

    /// Creates a node referencing a signal.
    pub fn signal_expr(&mut self, signal: SignalId) -> ExprId {
        self.exprs.alloc(Expr::Signal(signal))
    }

    /// Creates a unary operator node.
    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.exprs.alloc(Expr::Unary { op, operand })
    }

    /// Creates a binary operator node.
    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.exprs.alloc(Expr::Binary { op, lhs, rhs })
    }

    /// Creates a bit-slice node over the half-open range `[lsb, msb)`.
    ///
    /// Bounds are validated against the operand width during elaboration.
    pub fn slice(&mut self, expr: ExprId, lsb: u32, msb: u32) -> ExprId {
        self.exprs.alloc(Expr::Slice { expr, lsb, msb })
    }

    /// Creates a single-bit slice node.
    pub fn bit(&mut self, expr: ExprId, index: u32) -> ExprId {
        self.slice(expr, index, index + 1)
    }

    /// Creates a concatenation node; the first operand takes the
    /// lowest-index bits.
    pub fn cat(&mut self, parts: Vec<ExprId>) -> ExprId {
        self.exprs.alloc(Expr::Cat(parts))
    }

    /// Creates a replication node.
    pub fn replicate(&mut self, expr: ExprId, count: u32) -> ExprId {
        self.exprs.alloc(Expr::Replicate { expr, count })
    }

    /// Addition. Result is one bit wider than the wider operand.
    pub fn add(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Add, lhs, rhs)
    }

    /// Subtraction. Result is one bit wider than the wider operand.
    pub fn sub(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Sub, lhs, rhs)
    }

    /// Multiplication. Result width is the sum of the operand widths.
    pub fn mul(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Mul, lhs, rhs)
    }

    /// Bitwise AND.
    pub fn and(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::And, lhs, rhs)
    }

    /// Bitwise OR.
    pub fn or(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Or, lhs, rhs)
    }

    /// Bitwise XOR.
    pub fn xor(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Xor, lhs, rhs)
    }

    /// Left shift.
    pub fn shl(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Shl, lhs, rhs)
    }

    /// Right shift.
    pub fn shr(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Shr, lhs, rhs)
    }

    /// Equality comparison; single-bit result.
    pub fn eq(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Eq, lhs, rhs)
    }

    /// Inequality comparison; single-bit result.
    pub fn ne(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Ne, lhs, rhs)
    }

    /// Less-than comparison; single-bit result.
    pub fn lt(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Lt, lhs, rhs)
    }

    /// Less-or-equal comparison; single-bit result.
    pub fn le(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Le, lhs, rhs)
    }

    /// Greater-than comparison; single-bit result.
    pub fn gt(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Gt, lhs, rhs)
    }

    /// Greater-or-equal comparison; single-bit result.
    pub fn ge(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Ge, lhs, rhs)
    }

    /// Bitwise NOT.
    pub fn not(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Not, operand)
    }

    /// Arithmetic negation.
    pub fn neg(&mut self, operand: ExprId) -> ExprId {
        self.unary(UnaryOp::Neg, operand)
    }

    // --- statements ---

    /// Builds an assignment, rejecting non-lvalue targets immediately.
    ///
    /// An lvalue is a signal reference, a slice of an lvalue, or a
    /// concatenation of lvalues.
    pub fn assign(&self, target: ExprId, value: ExprId) -> Result<Statement, IrError> {
        self.check_lvalue(target)?;
        Ok(Statement::Assign { target, value })
    }

    /// Collects the signals underlying an lvalue expression, in
    /// bit order (lowest first for concatenations).
    pub fn lvalue_signals(&self, target: ExprId) -> Vec<SignalId> {
        let mut out = Vec::new();
        self.collect_lvalue_signals(target, &mut out);
        out
    }

    fn collect_lvalue_signals(&self, id: ExprId, out: &mut Vec<SignalId>) {
        match &self.exprs[id] {
            Expr::Signal(sig) => out.push(*sig),
            Expr::Slice { expr, .. } => self.collect_lvalue_signals(*expr, out),
            Expr::Cat(parts) => {
                for part in parts {
                    self.collect_lvalue_signals(*part, out);
                }
            }
            _ => {}
        }
    }

    fn check_lvalue(&self, id: ExprId) -> Result<(), IrError> {
        match &self.exprs[id] {
            Expr::Signal(_) => Ok(()),
            Expr::Slice { expr, .. } => self.check_lvalue(*expr),
            Expr::Cat(parts) => {
                for part in parts {
                    self.check_lvalue(*part)?;
                }
                Ok(())
            }
            Expr::Const(_) => Err(IrError::NotAssignable {
                reason: "constant".to_string(),
            }),
            Expr::Unary { .. } | Expr::Binary { .. } => Err(IrError::NotAssignable {
                reason: "operator node".to_string(),
            }),
            Expr::Replicate { .. } => Err(IrError::NotAssignable {
                reason: "replication".to_string(),
            }),
        }
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
