//! Signal definitions.
//!
//! A [`Signal`] represents a value that varies over time — a wire when
//! driven combinationally, a register when driven from a clocked
//! statement. Identity is the [`SignalId`](crate::ids::SignalId) handed
//! out by the owning [`Design`](crate::design::Design); the display-name
//! hint is a diagnostics convenience and two signals may share one.

use crate::bv::Bv;
use fen_common::Ident;
use serde::{Deserialize, Serialize};

/// A signal in a design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// An optional display-name hint. Absent hints get a synthetic name
    /// (`sig_<n>`) during the naming pass.
    pub name: Option<Ident>,
    /// The declared bit-vector type.
    pub bv: Bv,
    /// When `true` and the signal is a clocked-statement target, writes
    /// use blocking (variable-style) semantics in the generated output.
    pub variable: bool,
    /// The power-on/reset value of the register form, and simultaneously
    /// the synthesized default in unmatched combinational branches.
    pub reset: i128,
}

impl Signal {
    /// Creates an unnamed signal with the given type, reset value 0.
    pub fn new(bv: Bv) -> Self {
        Self {
            name: None,
            bv,
            variable: false,
            reset: 0,
        }
    }

    /// Attaches a display-name hint.
    pub fn named(mut self, name: Ident) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the reset/default value.
    pub fn with_reset(mut self, reset: i128) -> Self {
        self.reset = reset;
        self
    }

    /// Marks the signal as variable-style for clocked lowering.
    pub fn as_variable(mut self) -> Self {
        self.variable = true;
        self
    }
}
