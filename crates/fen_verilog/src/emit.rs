//! Expression and statement emission.
//!
//! Translation duties at this boundary, required for bit-exact
//! conformance with the target format:
//!
//! - slices: internal half-open `[lsb, msb)` becomes inclusive
//!   `[msb-1:lsb]`
//! - concatenation: the internal first-operand-lowest-bits order is the
//!   reverse of `{...}`, so operands are emitted last-to-first
//! - mixed signedness: when exactly one operand of a binary operator is
//!   signed, the unsigned one is wrapped in `$signed({1'd0, ...})` so
//!   the target applies signed extension and comparison semantics

use fen_elaborate::{ElabError, Elaborated};
use fen_ir::{BinaryOp, Bv, Constant, Design, Expr, ExprId, Statement, UnaryOp};

/// Formats a sized constant literal.
pub fn constant(c: Constant) -> String {
    sized_literal(c.value, c.bv)
}

/// Formats `value` as a sized literal of the given type.
pub fn sized_literal(value: i128, bv: Bv) -> String {
    if bv.signed {
        if value < 0 {
            format!("-{}'sd{}", bv.width, -value)
        } else {
            format!("{}'sd{}", bv.width, value)
        }
    } else {
        format!("{}'d{}", bv.width, value)
    }
}

/// Emits expressions and statements for one elaborated fragment.
pub struct Emitter<'a> {
    design: &'a Design,
    elab: &'a Elaborated,
}

impl<'a> Emitter<'a> {
    /// Creates an emitter over an elaborated fragment.
    pub fn new(design: &'a Design, elab: &'a Elaborated) -> Self {
        Self { design, elab }
    }

    fn bv(&self, id: ExprId) -> Bv {
        self.elab.widths.get(id)
    }

    /// Renders an expression.
    pub fn expr(&self, id: ExprId) -> Result<String, ElabError> {
        match &self.design.exprs[id] {
            Expr::Const(c) => Ok(constant(*c)),
            Expr::Signal(sig) => Ok(self.elab.names.signal(*sig).to_string()),
            Expr::Unary { op, operand } => {
                let inner = self.expr(*operand)?;
                match op {
                    UnaryOp::Not => Ok(format!("(~{inner})")),
                    UnaryOp::Neg => {
                        // Promote an unsigned operand so negation runs in
                        // signed arithmetic of the widened result.
                        if self.bv(*operand).signed {
                            Ok(format!("(-{inner})"))
                        } else {
                            Ok(format!("(-$signed({{1'd0, {inner}}}))"))
                        }
                    }
                }
            }
            Expr::Binary { op, lhs, rhs } => self.binary(*op, *lhs, *rhs),
            Expr::Slice { expr, lsb, msb } => self.slice(*expr, *lsb, *msb),
            Expr::Cat(parts) => {
                let mut rendered = Vec::with_capacity(parts.len());
                // The target's concatenation order is MSB-first; ours is
                // LSB-first, so reverse.
                for part in parts.iter().rev() {
                    rendered.push(self.expr(*part)?);
                }
                Ok(format!("{{{}}}", rendered.join(", ")))
            }
            Expr::Replicate { expr, count } => {
                let inner = self.expr(*expr)?;
                Ok(format!("{{{count}{{{inner}}}}}"))
            }
        }
    }

    fn binary(&self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> Result<String, ElabError> {
        let l_bv = self.bv(lhs);
        let r_bv = self.bv(rhs);
        let mut l = self.expr(lhs)?;
        let mut r = self.expr(rhs)?;
        let token = match op {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => {
                if l_bv.signed {
                    ">>>"
                } else {
                    ">>"
                }
            }
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        };
        // Shift amounts are self-determined; everything else follows the
        // extend-the-narrower-per-its-own-signedness rule, which the
        // target only applies when both operands are signed.
        if !matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
            if l_bv.signed && !r_bv.signed {
                r = format!("$signed({{1'd0, {r}}})");
            } else if r_bv.signed && !l_bv.signed {
                l = format!("$signed({{1'd0, {l}}})");
            }
        }
        Ok(format!("({l} {token} {r})"))
    }

    fn slice(&self, expr: ExprId, lsb: u32, msb: u32) -> Result<String, ElabError> {
        match &self.design.exprs[expr] {
            Expr::Signal(sig) => {
                let name = self.elab.names.signal(*sig);
                let width = self.design.signal_bv(*sig).width;
                if lsb == 0 && msb == width {
                    Ok(name.to_string())
                } else if msb - lsb == 1 {
                    Ok(format!("{name}[{lsb}]"))
                } else {
                    Ok(format!("{name}[{}:{lsb}]", msb - 1))
                }
            }
            // Nested slices compose into one window over the base signal.
            Expr::Slice {
                expr: inner,
                lsb: inner_lsb,
                ..
            } => self.slice(*inner, inner_lsb + lsb, inner_lsb + msb),
            _ => Err(ElabError::Range {
                reason: "the backend can only slice signals; bind the expression to an \
                         intermediate signal first"
                    .to_string(),
            }),
        }
    }

    /// Renders an assignment target.
    pub fn lvalue(&self, id: ExprId) -> Result<String, ElabError> {
        match &self.design.exprs[id] {
            Expr::Signal(sig) => Ok(self.elab.names.signal(*sig).to_string()),
            Expr::Slice { expr, lsb, msb } => self.slice(*expr, *lsb, *msb),
            Expr::Cat(parts) => {
                let mut rendered = Vec::with_capacity(parts.len());
                for part in parts.iter().rev() {
                    rendered.push(self.lvalue(*part)?);
                }
                Ok(format!("{{{}}}", rendered.join(", ")))
            }
            _ => Err(ElabError::Range {
                reason: "assignment target is not an lvalue".to_string(),
            }),
        }
    }

    /// Emits one statement at the given indentation depth.
    ///
    /// `blocking` selects the assignment operator for non-variable
    /// targets: combinational blocks use `=`, clocked blocks `<=`
    /// (except variable-style signals, which always use `=`).
    pub fn stmt(
        &self,
        out: &mut String,
        stmt: &Statement,
        depth: usize,
        blocking: bool,
    ) -> Result<(), ElabError> {
        let pad = "\t".repeat(depth);
        match stmt {
            Statement::Assign { target, value } => {
                let op = if blocking || self.is_variable_target(*target) {
                    "="
                } else {
                    "<="
                };
                out.push_str(&format!(
                    "{pad}{} {op} {};\n",
                    self.lvalue(*target)?,
                    self.expr(*value)?
                ));
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                out.push_str(&format!("{pad}if ({}) begin\n", self.expr(*condition)?));
                for s in then_body {
                    self.stmt(out, s, depth + 1, blocking)?;
                }
                if else_body.is_empty() {
                    out.push_str(&format!("{pad}end\n"));
                } else {
                    out.push_str(&format!("{pad}end else begin\n"));
                    for s in else_body {
                        self.stmt(out, s, depth + 1, blocking)?;
                    }
                    out.push_str(&format!("{pad}end\n"));
                }
            }
            Statement::Case {
                subject,
                arms,
                default,
            } => {
                let subject_bv = self.bv(*subject);
                out.push_str(&format!("{pad}case ({})\n", self.expr(*subject)?));
                for arm in arms {
                    out.push_str(&format!(
                        "{pad}\t{}: begin\n",
                        sized_literal(arm.match_value.value, subject_bv)
                    ));
                    for s in &arm.body {
                        self.stmt(out, s, depth + 2, blocking)?;
                    }
                    out.push_str(&format!("{pad}\tend\n"));
                }
                if let Some(body) = default {
                    out.push_str(&format!("{pad}\tdefault: begin\n"));
                    for s in body {
                        self.stmt(out, s, depth + 2, blocking)?;
                    }
                    out.push_str(&format!("{pad}\tend\n"));
                }
                out.push_str(&format!("{pad}endcase\n"));
            }
        }
        Ok(())
    }

    fn is_variable_target(&self, target: ExprId) -> bool {
        let sigs = self.design.lvalue_signals(target);
        !sigs.is_empty() && sigs.iter().all(|s| self.design.signals[*s].variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fen_elaborate::elaborate;
    use fen_ir::{Design, Fragment};

    fn emit_expr(build: impl FnOnce(&mut Design) -> (ExprId, Fragment)) -> String {
        let mut d = Design::new();
        let (expr, frag) = build(&mut d);
        let elab = elaborate(&d, &frag).unwrap();
        Emitter::new(&d, &elab).expr(expr).unwrap()
    }

    fn frag_assigning(d: &Design, target: ExprId, value: ExprId) -> Fragment {
        Fragment::new().with_comb([d.assign(target, value).unwrap()])
    }

    #[test]
    fn sized_literals() {
        assert_eq!(sized_literal(5, Bv::new(8)), "8'd5");
        assert_eq!(sized_literal(5, Bv::signed(8)), "8'sd5");
        assert_eq!(sized_literal(-4, Bv::signed(4)), "-4'sd4");
    }

    #[test]
    fn slice_translates_to_inclusive_msb_lsb() {
        let rendered = emit_expr(|d| {
            let a = d.signal_named(Bv::new(8), "a");
            let q = d.signal_named(Bv::new(4), "q");
            let ae = d.signal_expr(a);
            let qe = d.signal_expr(q);
            let sl = d.slice(ae, 2, 6);
            (sl, frag_assigning(d, qe, sl))
        });
        assert_eq!(rendered, "a[5:2]");
    }

    #[test]
    fn single_bit_slice_uses_index_form() {
        let rendered = emit_expr(|d| {
            let a = d.signal_named(Bv::new(8), "a");
            let q = d.signal_named(Bv::BIT, "q");
            let ae = d.signal_expr(a);
            let qe = d.signal_expr(q);
            let sl = d.bit(ae, 3);
            (sl, frag_assigning(d, qe, sl))
        });
        assert_eq!(rendered, "a[3]");
    }

    #[test]
    fn nested_slices_compose() {
        let rendered = emit_expr(|d| {
            let a = d.signal_named(Bv::new(8), "a");
            let q = d.signal_named(Bv::BIT, "q");
            let ae = d.signal_expr(a);
            let qe = d.signal_expr(q);
            let outer = d.slice(ae, 2, 6);
            let inner = d.slice(outer, 1, 2);
            (inner, frag_assigning(d, qe, inner))
        });
        assert_eq!(rendered, "a[3]");
    }

    #[test]
    fn cat_reverses_operand_order() {
        let rendered = emit_expr(|d| {
            let lo = d.signal_named(Bv::new(4), "lo");
            let hi = d.signal_named(Bv::new(4), "hi");
            let q = d.signal_named(Bv::new(8), "q");
            let loe = d.signal_expr(lo);
            let hie = d.signal_expr(hi);
            let qe = d.signal_expr(q);
            let c = d.cat(vec![loe, hie]);
            (c, frag_assigning(d, qe, c))
        });
        // `lo` takes the low bits internally, so it prints last.
        assert_eq!(rendered, "{hi, lo}");
    }

    #[test]
    fn replicate_form() {
        let rendered = emit_expr(|d| {
            let a = d.signal_named(Bv::BIT, "a");
            let q = d.signal_named(Bv::new(4), "q");
            let ae = d.signal_expr(a);
            let qe = d.signal_expr(q);
            let r = d.replicate(ae, 4);
            (r, frag_assigning(d, qe, r))
        });
        assert_eq!(rendered, "{4{a}}");
    }

    #[test]
    fn mixed_signedness_promotes_the_unsigned_operand() {
        let rendered = emit_expr(|d| {
            let a = d.signal_named(Bv::signed(8), "a");
            let b = d.signal_named(Bv::new(8), "b");
            let q = d.signal_named(Bv::signed(9), "q");
            let ae = d.signal_expr(a);
            let be = d.signal_expr(b);
            let qe = d.signal_expr(q);
            let sum = d.add(ae, be);
            (sum, frag_assigning(d, qe, sum))
        });
        assert_eq!(rendered, "(a + $signed({1'd0, b}))");
    }

    #[test]
    fn signed_right_shift_is_arithmetic() {
        let rendered = emit_expr(|d| {
            let a = d.signal_named(Bv::signed(8), "a");
            let q = d.signal_named(Bv::signed(8), "q");
            let ae = d.signal_expr(a);
            let qe = d.signal_expr(q);
            let two = d.constant(2);
            let sh = d.shr(ae, two);
            (sh, frag_assigning(d, qe, sh))
        });
        assert_eq!(rendered, "(a >>> 2'd2)");
    }

    #[test]
    fn composite_slice_operand_is_rejected() {
        let mut d = Design::new();
        let a = d.signal_named(Bv::new(8), "a");
        let b = d.signal_named(Bv::new(8), "b");
        let q = d.signal_named(Bv::new(4), "q");
        let ae = d.signal_expr(a);
        let be = d.signal_expr(b);
        let qe = d.signal_expr(q);
        let sum = d.add(ae, be);
        let sl = d.slice(sum, 0, 4);
        let frag = Fragment::new().with_comb([d.assign(qe, sl).unwrap()]);
        let elab = elaborate(&d, &frag).unwrap();
        let err = Emitter::new(&d, &elab).expr(sl).unwrap_err();
        assert!(matches!(err, ElabError::Range { .. }));
    }
}
