//! Driver analysis: latch-freedom defaulting and conflict detection.
//!
//! Works at signal granularity over the *author's* top-level statements.
//! Three questions are answered per combinational target:
//!
//! 1. Is it driven on every path of its driving statement? If not, a
//!    default drive to the signal's reset value must be synthesized —
//!    the latch-avoidance contract.
//! 2. Is it driven by two or more unconditional statements? That is a
//!    hard conflict.
//! 3. Is it driven from two or more separate statements where at least
//!    one driver is conditional? Exclusivity across independent
//!    statements is not proved symbolically, so this fails closed.
//!
//! Synthesized defaults are reported as data (signal IDs in creation
//! order), not as mutations of the input fragment.

use crate::errors::ElabError;
use crate::signal_label;
use fen_ir::{Design, Expr, Fragment, SignalId, Statement};
use std::collections::{BTreeMap, BTreeSet};

/// Result of the driver analysis passes.
#[derive(Debug)]
pub struct DriverAnalysis {
    /// Signals targeted by combinational statements.
    pub comb_targets: BTreeSet<SignalId>,
    /// Signals targeted by synchronous statements.
    pub sync_targets: BTreeSet<SignalId>,
    /// Combinational targets that need a synthesized reset-value
    /// default, in creation order.
    pub defaults: Vec<SignalId>,
}

/// How one top-level statement drives one signal.
struct Drive {
    unconditional: bool,
    full: bool,
}

/// Per-signal record across all top-level statements of one list.
#[derive(Default)]
struct DriverRecord {
    statements: u32,
    unconditional: u32,
    conditional: u32,
    fully_driven: bool,
}

/// Runs latch-freedom and conflict analysis over a fragment.
pub fn analyze(design: &Design, fragment: &Fragment) -> Result<DriverAnalysis, ElabError> {
    let mut comb = BTreeMap::new();
    for stmt in &fragment.comb {
        record_statement(design, stmt, &mut comb);
    }

    // Instance outputs and memory read ports are unconditional
    // combinational drivers for conflict purposes.
    for inst in &fragment.instances {
        for (_, sig) in &inst.outputs {
            record_external(*sig, &mut comb);
        }
    }
    for mem in &fragment.memories {
        for port in &mem.ports {
            record_external(port.data_read, &mut comb);
        }
    }

    for (sig, rec) in &comb {
        if rec.unconditional >= 2 {
            return Err(ElabError::MultipleDriver {
                signal: signal_label(design, *sig),
                reason: format!(
                    "{} unconditional combinational drivers",
                    rec.unconditional
                ),
            });
        }
        if rec.statements >= 2 && rec.conditional > 0 {
            return Err(ElabError::AmbiguousDriver {
                signal: signal_label(design, *sig),
                reason: format!(
                    "driven from {} separate combinational statements, {} conditional",
                    rec.statements, rec.conditional
                ),
            });
        }
    }

    let mut sync = BTreeMap::new();
    for stmt in &fragment.sync {
        record_statement(design, stmt, &mut sync);
    }
    for (sig, rec) in &sync {
        if rec.unconditional >= 2 {
            return Err(ElabError::MultipleDriver {
                signal: signal_label(design, *sig),
                reason: format!("{} unconditional synchronous drivers", rec.unconditional),
            });
        }
        if comb.contains_key(sig) {
            return Err(ElabError::MultipleDriver {
                signal: signal_label(design, *sig),
                reason: "driven both combinationally and synchronously".to_string(),
            });
        }
    }

    let defaults = comb
        .iter()
        .filter(|(_, rec)| !rec.fully_driven)
        .map(|(sig, _)| *sig)
        .collect();

    Ok(DriverAnalysis {
        comb_targets: comb.keys().copied().collect(),
        sync_targets: sync.keys().copied().collect(),
        defaults,
    })
}

/// Folds one top-level statement's drives into the per-signal records.
fn record_statement(
    design: &Design,
    stmt: &Statement,
    records: &mut BTreeMap<SignalId, DriverRecord>,
) {
    let mut drives = BTreeMap::new();
    collect_drives(design, stmt, false, &mut drives);
    for (sig, drive) in drives {
        let full = drive.full || fully_drives(design, std::slice::from_ref(stmt), sig);
        let rec = records.entry(sig).or_default();
        rec.statements += 1;
        if drive.unconditional {
            rec.unconditional += 1;
        } else {
            rec.conditional += 1;
        }
        rec.fully_driven |= full;
    }
}

/// Records an instance output or memory read port as a driver.
fn record_external(sig: SignalId, records: &mut BTreeMap<SignalId, DriverRecord>) {
    let rec = records.entry(sig).or_default();
    rec.statements += 1;
    rec.unconditional += 1;
    rec.fully_driven = true;
}

/// Collects every signal driven anywhere inside `stmt`, noting whether
/// the drive is conditional.
fn collect_drives(
    design: &Design,
    stmt: &Statement,
    conditional: bool,
    out: &mut BTreeMap<SignalId, Drive>,
) {
    match stmt {
        Statement::Assign { target, .. } => {
            let full_assign = matches!(design.exprs[*target], Expr::Signal(_));
            for sig in design.lvalue_signals(*target) {
                let entry = out.entry(sig).or_insert(Drive {
                    unconditional: false,
                    full: false,
                });
                entry.unconditional |= !conditional;
                entry.full |= !conditional && full_assign;
            }
        }
        Statement::If {
            then_body,
            else_body,
            ..
        } => {
            for s in then_body.iter().chain(else_body) {
                collect_drives(design, s, true, out);
            }
        }
        Statement::Case { arms, default, .. } => {
            for arm in arms {
                for s in &arm.body {
                    collect_drives(design, s, true, out);
                }
            }
            if let Some(body) = default {
                for s in body {
                    collect_drives(design, s, true, out);
                }
            }
        }
    }
}

/// Returns `true` if executing `stmts` always assigns the whole of `sig`.
///
/// A conditional fully drives only when every path does: an `If` needs
/// both branches, a `Case` needs every arm *and* an explicit default.
/// Partial (slice or concatenation) assignments never count as full.
fn fully_drives(design: &Design, stmts: &[Statement], sig: SignalId) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Statement::Assign { target, .. } => {
            matches!(design.exprs[*target], Expr::Signal(t) if t == sig)
        }
        Statement::If {
            then_body,
            else_body,
            ..
        } => fully_drives(design, then_body, sig) && fully_drives(design, else_body, sig),
        Statement::Case { arms, default, .. } => {
            default
                .as_ref()
                .is_some_and(|body| fully_drives(design, body, sig))
                && arms.iter().all(|arm| fully_drives(design, &arm.body, sig))
        }
    })
}
