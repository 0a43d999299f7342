//! Deterministic name assignment.
//!
//! Every signal reachable from the fragment receives a unique textual
//! identifier for the output format. Disambiguation is keyed on signal
//! creation order (arena IDs), never on addresses or hash ordering, so
//! the same input graph always yields the same names.

use fen_ir::{Design, Fragment, SignalId};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Identifiers reserved for the implicit clock domain.
pub const CLOCK_NAME: &str = "sys_clk";
/// The implicit reset identifier.
pub const RESET_NAME: &str = "sys_rst";

const VERILOG_KEYWORDS: &[&str] = &[
    "always", "and", "assign", "begin", "buf", "case", "casex", "casez", "default", "else", "end",
    "endcase", "endfunction", "endgenerate", "endmodule", "endtask", "for", "forever", "function",
    "generate", "genvar", "if", "initial", "inout", "input", "integer", "localparam", "module",
    "negedge", "not", "or", "output", "parameter", "posedge", "reg", "repeat", "signed", "task",
    "wait", "while", "wire", "xor",
];

/// Unique output identifiers for signals, instances, and memories.
#[derive(Debug, Clone)]
pub struct NameTable {
    signal_names: BTreeMap<SignalId, String>,
    /// One name per fragment instance, in declaration order.
    pub instance_names: Vec<String>,
    /// One name per fragment memory, in declaration order.
    pub memory_names: Vec<String>,
}

impl NameTable {
    /// Returns the output identifier assigned to a signal.
    ///
    /// # Panics
    ///
    /// Panics if the signal was not reachable from the fragment.
    pub fn signal(&self, id: SignalId) -> &str {
        &self.signal_names[&id]
    }
}

/// Assigns unique names to all reachable signals and to the fragment's
/// instances and memories.
pub fn assign_names(
    design: &Design,
    fragment: &Fragment,
    reachable: &BTreeSet<SignalId>,
) -> NameTable {
    let mut used: HashSet<String> = HashSet::new();
    used.insert(CLOCK_NAME.to_string());
    used.insert(RESET_NAME.to_string());

    let mut signal_names = BTreeMap::new();
    let mut unnamed = 0u32;
    // BTreeSet iteration is ascending SignalId, i.e. creation order.
    for &sig in reachable {
        let base = match design.signals[sig].name {
            Some(hint) => sanitize(design.resolve(hint)),
            None => {
                let name = format!("sig_{unnamed}");
                unnamed += 1;
                name
            }
        };
        signal_names.insert(sig, claim(base, &mut used));
    }

    let instance_names = fragment
        .instances
        .iter()
        .map(|inst| {
            let base = match inst.name {
                Some(hint) => sanitize(design.resolve(hint)),
                None => "inst".to_string(),
            };
            claim(base, &mut used)
        })
        .collect();

    let memory_names = fragment
        .memories
        .iter()
        .map(|_| claim("mem".to_string(), &mut used))
        .collect();

    NameTable {
        signal_names,
        instance_names,
        memory_names,
    }
}

/// Claims `base`, appending `_<k>` with the smallest free `k` if taken.
fn claim(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut k = 1;
    loop {
        let candidate = format!("{base}_{k}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        k += 1;
    }
}

/// Rewrites a hint into a legal identifier.
fn sanitize(hint: &str) -> String {
    let mut out = String::with_capacity(hint.len());
    for ch in hint.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        out.push_str("sig");
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if VERILOG_KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}
