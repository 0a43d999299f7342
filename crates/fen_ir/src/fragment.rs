//! The fragment: the composable aggregation unit of a design.
//!
//! A [`Fragment`] is a bag of combinational statements, synchronous
//! statements, sub-module instances, memories, and externally-facing
//! pads. Fragments compose only by [`Fragment::union`], which
//! concatenates element-wise, never deduplicates, and never fails.
//! There is no hierarchy at this layer.

use crate::ids::SignalId;
use crate::instance::Instance;
use crate::memory::Memory;
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An aggregation of hardware description elements.
///
/// Built incrementally (directly or by union), then frozen at
/// elaboration entry: elaboration takes `&Fragment` and produces derived
/// tables keyed by ID without touching the fragment itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fragment {
    /// Combinational statements: conceptually continuously re-evaluated.
    pub comb: Vec<Statement>,
    /// Synchronous statements: take effect on the implicit clock edge.
    pub sync: Vec<Statement>,
    /// Black-box sub-module instances.
    pub instances: Vec<Instance>,
    /// On-chip memories.
    pub memories: Vec<Memory>,
    /// Signals exposed as module ports by the backend.
    pub pads: BTreeSet<SignalId>,
}

impl Fragment {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes both fragments, concatenating all five fields.
    ///
    /// Order within each list is preserved (`self` first). Duplicate
    /// statements are legal and kept.
    pub fn union(mut self, other: Fragment) -> Fragment {
        self.comb.extend(other.comb);
        self.sync.extend(other.sync);
        self.instances.extend(other.instances);
        self.memories.extend(other.memories);
        self.pads.extend(other.pads);
        self
    }

    /// Appends combinational statements.
    pub fn with_comb(mut self, stmts: impl IntoIterator<Item = Statement>) -> Self {
        self.comb.extend(stmts);
        self
    }

    /// Appends synchronous statements.
    pub fn with_sync(mut self, stmts: impl IntoIterator<Item = Statement>) -> Self {
        self.sync.extend(stmts);
        self
    }

    /// Appends a sub-module instance.
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    /// Appends a memory.
    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memories.push(memory);
        self
    }

    /// Exposes a signal as a pad.
    pub fn with_pad(mut self, signal: SignalId) -> Self {
        self.pads.insert(signal);
        self
    }
}
