//! Width and sign resolution.
//!
//! Computes the bit-vector type of every expression node reachable from
//! a fragment, caching per node ID for reuse by later passes and the
//! backend. Resolution follows the synthesizable arithmetic rules:
//!
//! - `+`/`-`: signed iff either operand signed, width `max + 1`
//! - `*`: signed iff either operand signed, width sum
//! - comparisons: one unsigned bit
//! - bitwise ops: width `max`, the narrower operand extended per its own
//!   signedness, result signed iff both operands signed
//! - shifts: the left operand's type
//!
//! Assignments follow the documented truncation policy: a source wider
//! than its target is silently truncated, a narrower source is extended
//! per its own signedness — matching the target format's semantics.

use crate::errors::ElabError;
use fen_ir::{BinaryOp, Bv, Design, Expr, ExprId, Statement, UnaryOp};

/// Resolved bit-vector types, indexed by expression node ID.
#[derive(Debug, Clone)]
pub struct WidthTable {
    widths: Vec<Option<Bv>>,
}

impl WidthTable {
    /// Creates a table sized for the design's expression arena.
    pub fn new(design: &Design) -> Self {
        Self {
            widths: vec![None; design.exprs.len()],
        }
    }

    /// Returns the resolved type of a node.
    ///
    /// # Panics
    ///
    /// Panics if the node was not reachable from the elaborated fragment.
    pub fn get(&self, id: ExprId) -> Bv {
        self.widths[id.as_raw() as usize].expect("expression width not resolved")
    }

    /// Returns the resolved type of a node, if it was reachable.
    pub fn try_get(&self, id: ExprId) -> Option<Bv> {
        self.widths[id.as_raw() as usize]
    }
}

/// Resolves one expression node (and everything it references).
pub fn resolve_expr(
    design: &Design,
    table: &mut WidthTable,
    id: ExprId,
) -> Result<Bv, ElabError> {
    if let Some(bv) = table.widths[id.as_raw() as usize] {
        return Ok(bv);
    }
    let bv = match &design.exprs[id] {
        Expr::Const(c) => c.bv,
        Expr::Signal(sig) => design.signal_bv(*sig),
        Expr::Unary { op, operand } => {
            let o = resolve_operand(design, table, *operand)?;
            match op {
                UnaryOp::Not => o,
                UnaryOp::Neg => Bv::signed(o.width + 1),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let l = resolve_operand(design, table, *lhs)?;
            let r = resolve_operand(design, table, *rhs)?;
            binary_bv(*op, l, r)
        }
        Expr::Slice { expr, lsb, msb } => {
            let inner = resolve_expr(design, table, *expr)?;
            if lsb >= msb || *msb > inner.width {
                return Err(ElabError::Range {
                    reason: format!(
                        "slice [{lsb}, {msb}) is invalid for a {}-bit expression",
                        inner.width
                    ),
                });
            }
            Bv::new(msb - lsb)
        }
        Expr::Cat(parts) => {
            let mut width = 0;
            for part in parts {
                width += resolve_expr(design, table, *part)?.width;
            }
            // Concatenation discards source signedness.
            Bv::new(width)
        }
        Expr::Replicate { expr, count } => {
            let inner = resolve_expr(design, table, *expr)?;
            Bv::new(inner.width * count)
        }
    };
    table.widths[id.as_raw() as usize] = Some(bv);
    Ok(bv)
}

/// Resolves an operator operand, rejecting zero-width values.
fn resolve_operand(design: &Design, table: &mut WidthTable, id: ExprId) -> Result<Bv, ElabError> {
    let bv = resolve_expr(design, table, id)?;
    if bv.width == 0 {
        return Err(ElabError::Range {
            reason: "zero-width value used as an operator operand".to_string(),
        });
    }
    Ok(bv)
}

/// The result type of a binary operation.
pub fn binary_bv(op: BinaryOp, l: Bv, r: Bv) -> Bv {
    match op {
        BinaryOp::Add | BinaryOp::Sub => Bv {
            width: l.width.max(r.width) + 1,
            signed: l.signed || r.signed,
        },
        BinaryOp::Mul => Bv {
            width: l.width + r.width,
            signed: l.signed || r.signed,
        },
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => Bv {
            width: l.width.max(r.width),
            signed: l.signed && r.signed,
        },
        BinaryOp::Shl | BinaryOp::Shr => l,
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            Bv::BIT
        }
    }
}

/// Resolves every expression in a statement tree.
pub fn resolve_statement(
    design: &Design,
    table: &mut WidthTable,
    stmt: &Statement,
) -> Result<(), ElabError> {
    match stmt {
        Statement::Assign { target, value } => {
            // Target resolution also validates lvalue slice bounds.
            resolve_expr(design, table, *target)?;
            resolve_expr(design, table, *value)?;
        }
        Statement::If {
            condition,
            then_body,
            else_body,
        } => {
            resolve_operand(design, table, *condition)?;
            for s in then_body.iter().chain(else_body) {
                resolve_statement(design, table, s)?;
            }
        }
        Statement::Case {
            subject,
            arms,
            default,
        } => {
            let subject_bv = resolve_operand(design, table, *subject)?;
            for arm in arms {
                if !subject_bv.can_hold(arm.match_value.value) {
                    return Err(ElabError::WidthMismatch {
                        reason: format!(
                            "case arm value {} is not representable in the {}-bit {} subject",
                            arm.match_value.value,
                            subject_bv.width,
                            if subject_bv.signed { "signed" } else { "unsigned" },
                        ),
                    });
                }
                for s in &arm.body {
                    resolve_statement(design, table, s)?;
                }
            }
            if let Some(body) = default {
                for s in body {
                    resolve_statement(design, table, s)?;
                }
            }
        }
    }
    Ok(())
}
