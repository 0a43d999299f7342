//! Black-box sub-module instances.
//!
//! An [`Instance`] is an opaque sub-circuit known only by its module
//! type name and port list. The core never looks inside it; the backend
//! emits an instantiation template binding ports to signals and
//! expressions.

use crate::bv::Bv;
use crate::design::Design;
use crate::ids::{ExprId, SignalId};
use fen_common::Ident;
use serde::{Deserialize, Serialize};

/// A parameter value passed to an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// An integer parameter.
    Int(i128),
    /// A string parameter.
    Str(String),
}

/// An opaque black-box sub-circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// The module type name.
    pub module: Ident,
    /// An optional instance-name hint; mangled like signal hints.
    pub name: Option<Ident>,
    /// Output ports: the named port drives the bound signal.
    pub outputs: Vec<(Ident, SignalId)>,
    /// Input ports: the named port is fed by the bound expression.
    pub inputs: Vec<(Ident, ExprId)>,
    /// Parameter bindings.
    pub params: Vec<(Ident, ParamValue)>,
    /// When set, this port is wired to the implicit clock.
    pub clock_port: Option<Ident>,
    /// When set, this port is wired to the implicit reset.
    pub reset_port: Option<Ident>,
}

impl Instance {
    /// Creates an instance of the given module type with no ports bound.
    pub fn new(module: Ident) -> Self {
        Self {
            module,
            name: None,
            outputs: Vec::new(),
            inputs: Vec::new(),
            params: Vec::new(),
            clock_port: None,
            reset_port: None,
        }
    }

    /// Sets the instance-name hint.
    pub fn named(mut self, name: Ident) -> Self {
        self.name = Some(name);
        self
    }

    /// Binds an output port to an existing signal.
    pub fn output(mut self, port: Ident, signal: SignalId) -> Self {
        self.outputs.push((port, signal));
        self
    }

    /// Binds an output port to a freshly allocated signal of the given
    /// type, returning the instance and the new signal's ID.
    pub fn output_bv(mut self, design: &mut Design, port: Ident, bv: Bv) -> (Self, SignalId) {
        let signal = design.signal(bv);
        self.outputs.push((port, signal));
        (self, signal)
    }

    /// Binds an input port to an expression.
    pub fn input(mut self, port: Ident, expr: ExprId) -> Self {
        self.inputs.push((port, expr));
        self
    }

    /// Binds a parameter.
    pub fn param(mut self, name: Ident, value: ParamValue) -> Self {
        self.params.push((name, value));
        self
    }

    /// Routes the implicit clock to the named port.
    pub fn clock(mut self, port: Ident) -> Self {
        self.clock_port = Some(port);
        self
    }

    /// Routes the implicit reset to the named port.
    pub fn reset(mut self, port: Ident) -> Self {
        self.reset_port = Some(port);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_instance() {
        let inst = Instance::new(Ident::from_raw(0));
        assert!(inst.outputs.is_empty());
        assert!(inst.inputs.is_empty());
        assert!(inst.clock_port.is_none());
    }

    #[test]
    fn builder_accumulates_ports() {
        let inst = Instance::new(Ident::from_raw(0))
            .named(Ident::from_raw(1))
            .output(Ident::from_raw(2), SignalId::from_raw(0))
            .input(Ident::from_raw(3), ExprId::from_raw(0))
            .param(Ident::from_raw(4), ParamValue::Int(32))
            .clock(Ident::from_raw(5));
        assert_eq!(inst.outputs.len(), 1);
        assert_eq!(inst.inputs.len(), 1);
        assert_eq!(inst.params.len(), 1);
        assert_eq!(inst.clock_port, Some(Ident::from_raw(5)));
    }

    #[test]
    fn output_bv_allocates_a_fresh_signal() {
        let mut d = Design::new();
        let module = d.intern("ext_fifo");
        let port = d.intern("dout");
        let before = d.signals.len();
        let (inst, sig) = Instance::new(module).output_bv(&mut d, port, Bv::new(8));
        assert_eq!(d.signals.len(), before + 1);
        assert_eq!(d.signal_bv(sig), Bv::new(8));
        assert_eq!(inst.outputs, vec![(port, sig)]);
    }

    #[test]
    fn param_values() {
        assert_ne!(
            ParamValue::Int(1),
            ParamValue::Str("1".to_string()),
        );
    }
}
