//! Elaboration pipeline for fen fragments.
//!
//! Turns a frozen, fully-composed [`Fragment`] into an [`Elaborated`]
//! design: resolved widths, synthesized latch-avoidance defaults,
//! verified driver uniqueness, and deterministic names. Passes run in a
//! fixed order — width resolution, latch-freedom insertion, driver
//! checks, naming — and each depends on its predecessor's completion.
//!
//! Elaboration is all-or-nothing: the first detected violation aborts
//! with an [`ElabError`] and no partial result escapes. The input
//! design and fragment are never mutated; everything derived is keyed
//! by arena IDs.

#![warn(missing_docs)]

pub mod drivers;
pub mod errors;
pub mod naming;
pub mod width;

use fen_common::bits_for_range;
use fen_ir::{Bv, Design, Expr, ExprId, Fragment, Instance, Memory, SignalId, Statement};
use std::collections::BTreeSet;

pub use drivers::DriverAnalysis;
pub use errors::ElabError;
pub use naming::{NameTable, CLOCK_NAME, RESET_NAME};
pub use width::WidthTable;

/// A fully elaborated fragment, ready for code generation or direct
/// in-process interpretation.
///
/// Statement lists are exposed as data so a simulator can consume the
/// elaborated design without going through text generation.
#[derive(Debug)]
pub struct Elaborated {
    /// The author's combinational statements, in fragment order.
    pub comb: Vec<Statement>,
    /// The author's synchronous statements, in fragment order.
    pub sync: Vec<Statement>,
    /// Synthesized latch-avoidance defaults: each listed signal is
    /// conceptually driven to its reset value before `comb` runs.
    pub defaults: Vec<SignalId>,
    /// Resolved bit-vector types per expression node.
    pub widths: WidthTable,
    /// Unique output identifiers.
    pub names: NameTable,
    /// All reachable signals, in creation order.
    pub signals: Vec<SignalId>,
    /// Pads, in creation order.
    pub pads: Vec<SignalId>,
    /// Signals driven by combinational statements.
    pub comb_targets: BTreeSet<SignalId>,
    /// Signals driven by synchronous statements.
    pub sync_targets: BTreeSet<SignalId>,
    /// Signals driven by instance output ports.
    pub instance_outputs: BTreeSet<SignalId>,
    /// Signals driven by registered memory read ports.
    pub memory_read_regs: BTreeSet<SignalId>,
    /// Signals driven by asynchronous memory read ports.
    pub memory_read_wires: BTreeSet<SignalId>,
    /// The fragment's instances, in declaration order.
    pub instances: Vec<Instance>,
    /// The fragment's memories, in declaration order.
    pub memories: Vec<Memory>,
}

impl Elaborated {
    /// Returns `true` if any signal is driven at all.
    pub fn has_drivers(&self) -> bool {
        !self.comb_targets.is_empty()
            || !self.sync_targets.is_empty()
            || !self.instance_outputs.is_empty()
            || !self.memory_read_regs.is_empty()
            || !self.memory_read_wires.is_empty()
    }

    /// Returns `true` if the output needs the implicit clock domain.
    pub fn needs_clock(&self) -> bool {
        !self.sync.is_empty()
            || self
                .memories
                .iter()
                .any(|m| m.ports.iter().any(|p| p.synchronous_read || p.write_enable.is_some()))
            || self
                .instances
                .iter()
                .any(|i| i.clock_port.is_some() || i.reset_port.is_some())
    }
}

/// Elaborates a composed fragment against its design context.
pub fn elaborate(design: &Design, fragment: &Fragment) -> Result<Elaborated, ElabError> {
    // Pass 1: width and sign resolution, cached per expression node.
    let mut widths = WidthTable::new(design);
    for stmt in fragment.comb.iter().chain(&fragment.sync) {
        width::resolve_statement(design, &mut widths, stmt)?;
    }
    for inst in &fragment.instances {
        check_instance(design, &mut widths, inst)?;
    }
    for mem in &fragment.memories {
        check_memory(design, mem)?;
    }

    // Reset values feed sized literals and synthesized defaults, so a
    // reset that does not fit its signal's type is rejected here rather
    // than silently coerced downstream.
    let reachable = reachable_signals(design, fragment);
    for &sig in &reachable {
        let signal = &design.signals[sig];
        if !signal.bv.can_hold(signal.reset) {
            return Err(ElabError::WidthMismatch {
                reason: format!(
                    "reset value {} of signal `{}` does not fit its {}-bit {} type",
                    signal.reset,
                    signal_label(design, sig),
                    signal.bv.width,
                    if signal.bv.signed { "signed" } else { "unsigned" }
                ),
            });
        }
    }

    // Passes 2 and 3: latch-freedom defaulting and driver conflicts.
    let analysis = drivers::analyze(design, fragment)?;

    // Pass 4: deterministic naming over the final signal set.
    let names = naming::assign_names(design, fragment, &reachable);

    let mut instance_outputs = BTreeSet::new();
    for inst in &fragment.instances {
        instance_outputs.extend(inst.outputs.iter().map(|(_, sig)| *sig));
    }
    let mut memory_read_regs = BTreeSet::new();
    let mut memory_read_wires = BTreeSet::new();
    for mem in &fragment.memories {
        for port in &mem.ports {
            if port.synchronous_read {
                memory_read_regs.insert(port.data_read);
            } else {
                memory_read_wires.insert(port.data_read);
            }
        }
    }

    // Driver analysis counts instance outputs and memory reads as
    // combinational drivers for conflict purposes; `comb_targets`
    // reports only statement-driven signals.
    let mut comb_targets = analysis.comb_targets;
    for sig in instance_outputs
        .iter()
        .chain(&memory_read_regs)
        .chain(&memory_read_wires)
    {
        comb_targets.remove(sig);
    }

    Ok(Elaborated {
        comb: fragment.comb.clone(),
        sync: fragment.sync.clone(),
        defaults: analysis.defaults,
        widths,
        names,
        signals: reachable.iter().copied().collect(),
        pads: fragment.pads.iter().copied().collect(),
        comb_targets,
        sync_targets: analysis.sync_targets,
        instance_outputs,
        memory_read_regs,
        memory_read_wires,
        instances: fragment.instances.clone(),
        memories: fragment.memories.clone(),
    })
}

/// A display label for error messages: the hint if present, else a
/// synthetic `sig_<raw>` placeholder.
pub(crate) fn signal_label(design: &Design, sig: SignalId) -> String {
    match design.signals[sig].name {
        Some(hint) => design.resolve(hint).to_string(),
        None => format!("sig_{}", sig.as_raw()),
    }
}

/// Validates an instance's port and parameter lists.
fn check_instance(
    design: &Design,
    widths: &mut WidthTable,
    inst: &Instance,
) -> Result<(), ElabError> {
    let mut seen = BTreeSet::new();
    for (port, _) in &inst.outputs {
        if !seen.insert(*port) {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "port `{}` bound twice on instance of `{}`",
                    design.resolve(*port),
                    design.resolve(inst.module)
                ),
            });
        }
    }
    for (port, expr) in &inst.inputs {
        if !seen.insert(*port) {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "port `{}` bound twice on instance of `{}`",
                    design.resolve(*port),
                    design.resolve(inst.module)
                ),
            });
        }
        width::resolve_expr(design, widths, *expr)?;
    }
    let mut params = BTreeSet::new();
    for (name, _) in &inst.params {
        if !params.insert(*name) {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "parameter `{}` bound twice on instance of `{}`",
                    design.resolve(*name),
                    design.resolve(inst.module)
                ),
            });
        }
    }
    Ok(())
}

/// Validates a memory's geometry, initial contents, and port widths.
fn check_memory(design: &Design, mem: &Memory) -> Result<(), ElabError> {
    if mem.width == 0 || mem.depth == 0 {
        return Err(ElabError::PortBinding {
            reason: format!("memory has degenerate geometry {}x{}", mem.width, mem.depth),
        });
    }
    if let Some(init) = &mem.init {
        if init.len() as u64 > u64::from(mem.depth) {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "memory init has {} words but depth is {}",
                    init.len(),
                    mem.depth
                ),
            });
        }
        for (addr, &value) in init.iter().enumerate() {
            if !Bv::new(mem.width).can_hold(value) && !Bv::signed(mem.width).can_hold(value) {
                return Err(ElabError::PortBinding {
                    reason: format!(
                        "memory init word {addr} ({value}) does not fit {} bits",
                        mem.width
                    ),
                });
            }
        }
    }
    for (index, port) in mem.ports.iter().enumerate() {
        if port.write_enable.is_some() != port.data_write.is_some() {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "memory port {index} must pair write-enable with write-data"
                ),
            });
        }
        let addr_bv = design.signal_bv(port.address);
        if addr_bv.signed || addr_bv.width < bits_for_range(mem.depth) {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "memory port {index} address is {}-bit{} but depth {} needs {} unsigned bits",
                    addr_bv.width,
                    if addr_bv.signed { " signed" } else { "" },
                    mem.depth,
                    bits_for_range(mem.depth)
                ),
            });
        }
        if design.signal_bv(port.data_read).width != mem.width {
            return Err(ElabError::PortBinding {
                reason: format!(
                    "memory port {index} read data is {} bits wide, memory word is {}",
                    design.signal_bv(port.data_read).width,
                    mem.width
                ),
            });
        }
        if let Some(dw) = port.data_write {
            if design.signal_bv(dw).width != mem.width {
                return Err(ElabError::PortBinding {
                    reason: format!(
                        "memory port {index} write data is {} bits wide, memory word is {}",
                        design.signal_bv(dw).width,
                        mem.width
                    ),
                });
            }
        }
        if let Some(we) = port.write_enable {
            let expected = if port.write_granularity == 0 {
                1
            } else {
                if mem.width % port.write_granularity != 0 {
                    return Err(ElabError::PortBinding {
                        reason: format!(
                            "write granularity {} does not divide word width {}",
                            port.write_granularity, mem.width
                        ),
                    });
                }
                mem.width / port.write_granularity
            };
            if design.signal_bv(we).width != expected {
                return Err(ElabError::PortBinding {
                    reason: format!(
                        "memory port {index} write enable is {} bits wide, expected {}",
                        design.signal_bv(we).width,
                        expected
                    ),
                });
            }
        }
        if let Some(re) = port.read_enable {
            if !port.synchronous_read {
                return Err(ElabError::PortBinding {
                    reason: format!(
                        "memory port {index} has a read enable but an asynchronous read"
                    ),
                });
            }
            if design.signal_bv(re).width != 1 {
                return Err(ElabError::PortBinding {
                    reason: format!("memory port {index} read enable must be one bit"),
                });
            }
        }
    }
    Ok(())
}

/// Collects every signal referenced by the fragment.
fn reachable_signals(design: &Design, fragment: &Fragment) -> BTreeSet<SignalId> {
    let mut out = BTreeSet::new();
    out.extend(fragment.pads.iter().copied());
    for stmt in fragment.comb.iter().chain(&fragment.sync) {
        collect_stmt_signals(design, stmt, &mut out);
    }
    for inst in &fragment.instances {
        out.extend(inst.outputs.iter().map(|(_, sig)| *sig));
        for (_, expr) in &inst.inputs {
            collect_expr_signals(design, *expr, &mut out);
        }
    }
    for mem in &fragment.memories {
        for port in &mem.ports {
            out.insert(port.address);
            out.insert(port.data_read);
            out.extend(port.write_enable);
            out.extend(port.data_write);
            out.extend(port.read_enable);
        }
    }
    out
}

fn collect_stmt_signals(design: &Design, stmt: &Statement, out: &mut BTreeSet<SignalId>) {
    match stmt {
        Statement::Assign { target, value } => {
            collect_expr_signals(design, *target, out);
            collect_expr_signals(design, *value, out);
        }
        Statement::If {
            condition,
            then_body,
            else_body,
        } => {
            collect_expr_signals(design, *condition, out);
            for s in then_body.iter().chain(else_body) {
                collect_stmt_signals(design, s, out);
            }
        }
        Statement::Case {
            subject,
            arms,
            default,
        } => {
            collect_expr_signals(design, *subject, out);
            for arm in arms {
                for s in &arm.body {
                    collect_stmt_signals(design, s, out);
                }
            }
            if let Some(body) = default {
                for s in body {
                    collect_stmt_signals(design, s, out);
                }
            }
        }
    }
}

fn collect_expr_signals(design: &Design, id: ExprId, out: &mut BTreeSet<SignalId>) {
    match &design.exprs[id] {
        Expr::Const(_) => {}
        Expr::Signal(sig) => {
            out.insert(*sig);
        }
        Expr::Unary { operand, .. } => collect_expr_signals(design, *operand, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_expr_signals(design, *lhs, out);
            collect_expr_signals(design, *rhs, out);
        }
        Expr::Slice { expr, .. } | Expr::Replicate { expr, .. } => {
            collect_expr_signals(design, *expr, out)
        }
        Expr::Cat(parts) => {
            for part in parts {
                collect_expr_signals(design, *part, out);
            }
        }
    }
}
