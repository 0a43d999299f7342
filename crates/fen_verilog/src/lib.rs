//! Verilog code generation for elaborated fen fragments.
//!
//! [`generate`] turns one [`Elaborated`] fragment into a single,
//! self-contained Verilog-2001 module. The output is fully determined
//! by the design and fragment contents: generating twice from the same
//! inputs yields byte-identical text.
//!
//! Structure of a generated module, in order: port list, signal
//! declarations, one `always @(*)` block carrying latch-avoidance
//! defaults followed by the author's combinational statements, one
//! clocked block with a synchronous reset for the author's register
//! statements, sub-module instantiations, and memory arrays with their
//! port logic.

#![warn(missing_docs)]

pub mod emit;

use fen_elaborate::{elaborate, ElabError, Elaborated, CLOCK_NAME, RESET_NAME};
use fen_ir::{Bv, Design, Fragment, Memory, MemoryPort, ParamValue, SignalId, WriteMode};

use emit::{sized_literal, Emitter};

/// Elaborates and generates in one step.
pub fn compile(design: &Design, fragment: &Fragment, name: &str) -> Result<String, ElabError> {
    let elab = elaborate(design, fragment)?;
    generate(design, &elab, name)
}

/// Generates a Verilog module named `name` from an elaborated fragment.
pub fn generate(design: &Design, elab: &Elaborated, name: &str) -> Result<String, ElabError> {
    Generator::new(design, elab).module(name)
}

struct Generator<'a> {
    design: &'a Design,
    elab: &'a Elaborated,
    emitter: Emitter<'a>,
}

/// How a signal is driven, which fixes its declaration keyword.
#[derive(Clone, Copy, PartialEq, Eq)]
enum DriveKind {
    /// Assigned inside an `always` block; declared `reg`.
    Reg,
    /// Driven by an instance output or a continuous assign; `wire`.
    Wire,
    /// Not driven inside this module.
    None,
}

impl<'a> Generator<'a> {
    fn new(design: &'a Design, elab: &'a Elaborated) -> Self {
        Self {
            design,
            elab,
            emitter: Emitter::new(design, elab),
        }
    }

    fn name(&self, sig: SignalId) -> &str {
        self.elab.names.signal(sig)
    }

    fn drive_kind(&self, sig: SignalId) -> DriveKind {
        let e = self.elab;
        if e.comb_targets.contains(&sig)
            || e.sync_targets.contains(&sig)
            || e.memory_read_regs.contains(&sig)
        {
            DriveKind::Reg
        } else if e.instance_outputs.contains(&sig) || e.memory_read_wires.contains(&sig) {
            DriveKind::Wire
        } else {
            DriveKind::None
        }
    }

    fn module(&self, name: &str) -> Result<String, ElabError> {
        let mut out = String::new();
        self.header(&mut out, name);
        self.declarations(&mut out);
        self.comb_block(&mut out)?;
        self.sync_block(&mut out)?;
        self.instances(&mut out)?;
        self.memories(&mut out)?;
        out.push_str("\nendmodule\n");
        Ok(out)
    }

    fn header(&self, out: &mut String, name: &str) {
        let mut ports: Vec<String> = Vec::new();
        if self.elab.needs_clock() {
            ports.push(format!("\tinput {CLOCK_NAME}"));
            ports.push(format!("\tinput {RESET_NAME}"));
        }
        for &pad in &self.elab.pads {
            let bv = self.design.signal_bv(pad);
            let line = match self.drive_kind(pad) {
                DriveKind::Reg => format!(
                    "\toutput reg{} {} = {}",
                    range(bv),
                    self.name(pad),
                    sized_literal(self.design.signals[pad].reset, bv)
                ),
                DriveKind::Wire => format!("\toutput wire{} {}", range(bv), self.name(pad)),
                DriveKind::None => format!("\tinput{} {}", range(bv), self.name(pad)),
            };
            ports.push(line);
        }
        if ports.is_empty() {
            out.push_str(&format!("module {name}(\n);\n"));
        } else {
            out.push_str(&format!("module {name}(\n{}\n);\n", ports.join(",\n")));
        }
    }

    fn declarations(&self, out: &mut String) {
        let mut wrote = false;
        for &sig in &self.elab.signals {
            if self.elab.pads.contains(&sig) {
                continue;
            }
            let bv = self.design.signal_bv(sig);
            let keyword = match self.drive_kind(sig) {
                DriveKind::Reg => "reg",
                DriveKind::Wire | DriveKind::None => "wire",
            };
            if keyword == "reg" {
                let reset = self.design.signals[sig].reset;
                out.push_str(&format!(
                    "{keyword}{} {} = {};\n",
                    range(bv),
                    self.name(sig),
                    sized_literal(reset, bv)
                ));
            } else {
                out.push_str(&format!("{keyword}{} {};\n", range(bv), self.name(sig)));
            }
            wrote = true;
        }
        if wrote {
            out.push('\n');
        }
    }

    fn comb_block(&self, out: &mut String) -> Result<(), ElabError> {
        if self.elab.comb.is_empty() && self.elab.defaults.is_empty() {
            return Ok(());
        }
        out.push_str("always @(*) begin\n");
        for &sig in &self.elab.defaults {
            let bv = self.design.signal_bv(sig);
            let reset = self.design.signals[sig].reset;
            out.push_str(&format!(
                "\t{} = {};\n",
                self.name(sig),
                sized_literal(reset, bv)
            ));
        }
        for stmt in &self.elab.comb {
            self.emitter.stmt(out, stmt, 1, true)?;
        }
        out.push_str("end\n");
        Ok(())
    }

    fn sync_block(&self, out: &mut String) -> Result<(), ElabError> {
        if self.elab.sync.is_empty() {
            return Ok(());
        }
        out.push_str(&format!("\nalways @(posedge {CLOCK_NAME}) begin\n"));
        out.push_str(&format!("\tif ({RESET_NAME}) begin\n"));
        for &sig in &self.elab.sync_targets {
            let bv = self.design.signal_bv(sig);
            let signal = &self.design.signals[sig];
            let op = if signal.variable { "=" } else { "<=" };
            out.push_str(&format!(
                "\t\t{} {op} {};\n",
                self.name(sig),
                sized_literal(signal.reset, bv)
            ));
        }
        out.push_str("\tend else begin\n");
        for stmt in &self.elab.sync {
            self.emitter.stmt(out, stmt, 2, false)?;
        }
        out.push_str("\tend\nend\n");
        Ok(())
    }

    fn instances(&self, out: &mut String) -> Result<(), ElabError> {
        for (index, inst) in self.elab.instances.iter().enumerate() {
            let inst_name = &self.elab.names.instance_names[index];
            let module = self.design.resolve(inst.module);
            out.push('\n');
            if inst.params.is_empty() {
                out.push_str(&format!("{module} {inst_name} (\n"));
            } else {
                out.push_str(&format!("{module} #(\n"));
                let params: Vec<String> = inst
                    .params
                    .iter()
                    .map(|(name, value)| {
                        let rendered = match value {
                            ParamValue::Int(v) => v.to_string(),
                            ParamValue::Str(s) => format!("\"{s}\""),
                        };
                        format!("\t.{}({rendered})", self.design.resolve(*name))
                    })
                    .collect();
                out.push_str(&params.join(",\n"));
                out.push_str(&format!("\n) {inst_name} (\n"));
            }
            let mut conns: Vec<String> = Vec::new();
            if let Some(port) = inst.clock_port {
                conns.push(format!("\t.{}({CLOCK_NAME})", self.design.resolve(port)));
            }
            if let Some(port) = inst.reset_port {
                conns.push(format!("\t.{}({RESET_NAME})", self.design.resolve(port)));
            }
            for (port, expr) in &inst.inputs {
                conns.push(format!(
                    "\t.{}({})",
                    self.design.resolve(*port),
                    self.emitter.expr(*expr)?
                ));
            }
            for (port, sig) in &inst.outputs {
                conns.push(format!(
                    "\t.{}({})",
                    self.design.resolve(*port),
                    self.name(*sig)
                ));
            }
            out.push_str(&conns.join(",\n"));
            out.push_str("\n);\n");
        }
        Ok(())
    }

    fn memories(&self, out: &mut String) -> Result<(), ElabError> {
        for (index, mem) in self.elab.memories.iter().enumerate() {
            let mem_name = &self.elab.names.memory_names[index];
            out.push('\n');
            out.push_str(&format!(
                "reg{} {mem_name}[0:{}];\n",
                range(Bv::new(mem.width)),
                mem.depth - 1
            ));
            for port in &mem.ports {
                self.memory_port(out, mem, mem_name, port);
            }
            if let Some(init) = &mem.init {
                out.push_str("initial begin\n");
                for (addr, &value) in init.iter().enumerate() {
                    out.push_str(&format!(
                        "\t{mem_name}[{addr}] = {};\n",
                        sized_literal(value, Bv::new(mem.width))
                    ));
                }
                out.push_str("end\n");
            }
        }
        Ok(())
    }

    fn memory_port(&self, out: &mut String, mem: &Memory, mem_name: &str, port: &MemoryPort) {
        let addr = self.name(port.address);
        let dout = self.name(port.data_read);
        if !port.synchronous_read && port.write_enable.is_none() {
            out.push_str(&format!("assign {dout} = {mem_name}[{addr}];\n"));
            return;
        }
        out.push_str(&format!("always @(posedge {CLOCK_NAME}) begin\n"));
        if let (Some(we), Some(dw)) = (port.write_enable, port.data_write) {
            let we = self.name(we);
            let din = self.name(dw);
            if port.write_granularity == 0 {
                out.push_str(&format!("\tif ({we})\n"));
                out.push_str(&format!("\t\t{mem_name}[{addr}] <= {din};\n"));
            } else {
                let g = port.write_granularity;
                for lane in 0..mem.width / g {
                    let hi = (lane + 1) * g - 1;
                    let lo = lane * g;
                    out.push_str(&format!("\tif ({we}[{lane}])\n"));
                    out.push_str(&format!(
                        "\t\t{mem_name}[{addr}][{hi}:{lo}] <= {din}[{hi}:{lo}];\n"
                    ));
                }
            }
        }
        if port.synchronous_read {
            let mut read = String::new();
            self.memory_read(&mut read, mem, mem_name, port);
            match port.read_enable {
                Some(re) => {
                    out.push_str(&format!("\tif ({}) begin\n", self.name(re)));
                    for line in read.lines() {
                        out.push_str(&format!("\t{line}\n"));
                    }
                    out.push_str("\tend\n");
                }
                None => out.push_str(&read),
            }
        }
        out.push_str("end\n");
        if !port.synchronous_read {
            // Write-capable port with an asynchronous read.
            out.push_str(&format!("assign {dout} = {mem_name}[{addr}];\n"));
        }
    }

    /// Emits the registered read for one port, honoring its write mode.
    fn memory_read(&self, out: &mut String, mem: &Memory, mem_name: &str, port: &MemoryPort) {
        let addr = self.name(port.address);
        let dout = self.name(port.data_read);
        let write = port.write_enable.zip(port.data_write);
        match (port.write_mode, write) {
            (_, None) | (WriteMode::ReadFirst, Some(_)) => {
                // Non-blocking reads observe the pre-write word, so
                // read-first needs no interlock with the write above.
                out.push_str(&format!("\t{dout} <= {mem_name}[{addr}];\n"));
            }
            (WriteMode::WriteFirst, Some((we, dw))) => {
                let we = self.name(we);
                let din = self.name(dw);
                if port.write_granularity == 0 {
                    out.push_str(&format!(
                        "\t{dout} <= {we} ? {din} : {mem_name}[{addr}];\n"
                    ));
                } else {
                    let g = port.write_granularity;
                    for lane in 0..mem.width / g {
                        let hi = (lane + 1) * g - 1;
                        let lo = lane * g;
                        out.push_str(&format!(
                            "\t{dout}[{hi}:{lo}] <= {we}[{lane}] ? {din}[{hi}:{lo}] : {mem_name}[{addr}][{hi}:{lo}];\n"
                        ));
                    }
                }
            }
            (WriteMode::NoChange, Some((we, _))) => {
                let we = self.name(we);
                out.push_str(&format!("\tif (!{we})\n"));
                out.push_str(&format!("\t\t{dout} <= {mem_name}[{addr}];\n"));
            }
        }
    }
}

/// The `[msb:0]` range suffix for a declaration, empty for one bit.
fn range(bv: Bv) -> String {
    let mut s = String::new();
    if bv.signed {
        s.push_str(" signed");
    }
    if bv.width > 1 {
        s.push_str(&format!(" [{}:0]", bv.width - 1));
    }
    s
}
