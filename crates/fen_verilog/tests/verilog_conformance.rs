//! Conformance tests for the generated text: memory port templates,
//! naming discipline, and the driver rules surfaced through the full
//! pipeline.

use fen_elaborate::ElabError;
use fen_ir::{Bv, Design, Fragment, Instance, Memory, MemoryPort, Signal, Statement, WriteMode};
use fen_verilog::compile;

fn write_port_memory(d: &mut Design, mode: WriteMode) -> Fragment {
    let addr = d.signal_named(Bv::new(4), "addr");
    let dout = d.signal_named(Bv::new(8), "dout");
    let we = d.signal_named(Bv::BIT, "we");
    let din = d.signal_named(Bv::new(8), "din");
    let port = MemoryPort::read(addr, dout)
        .with_write(we, din)
        .with_mode(mode);
    Fragment::new()
        .with_memory(Memory::new(8, 16).with_port(port))
        .with_pad(addr)
        .with_pad(dout)
        .with_pad(we)
        .with_pad(din)
}

#[test]
fn write_first_port_forwards_write_data() {
    let mut d = Design::new();
    let frag = write_port_memory(&mut d, WriteMode::WriteFirst);
    let text = compile(&d, &frag, "ram").unwrap();
    assert!(text.contains("if (we)\n\t\tmem[addr] <= din;"));
    assert!(text.contains("dout <= we ? din : mem[addr];"));
}

#[test]
fn read_first_port_returns_stored_word() {
    let mut d = Design::new();
    let frag = write_port_memory(&mut d, WriteMode::ReadFirst);
    let text = compile(&d, &frag, "ram").unwrap();
    assert!(text.contains("dout <= mem[addr];"));
    assert!(!text.contains("? din"));
}

#[test]
fn no_change_port_holds_read_data_during_writes() {
    let mut d = Design::new();
    let frag = write_port_memory(&mut d, WriteMode::NoChange);
    let text = compile(&d, &frag, "ram").unwrap();
    assert!(text.contains("if (!we)\n\t\tdout <= mem[addr];"));
}

#[test]
fn granular_write_updates_lanes_independently() {
    let mut d = Design::new();
    let addr = d.signal_named(Bv::new(4), "addr");
    let dout = d.signal_named(Bv::new(16), "dout");
    let we = d.signal_named(Bv::new(2), "we");
    let din = d.signal_named(Bv::new(16), "din");
    let port = MemoryPort::read(addr, dout)
        .with_write(we, din)
        .with_granularity(8)
        .with_mode(WriteMode::ReadFirst);
    let frag = Fragment::new()
        .with_memory(Memory::new(16, 16).with_port(port))
        .with_pad(addr)
        .with_pad(dout)
        .with_pad(we)
        .with_pad(din);
    let text = compile(&d, &frag, "ram16").unwrap();
    assert!(text.contains("if (we[0])\n\t\tmem[addr][7:0] <= din[7:0];"));
    assert!(text.contains("if (we[1])\n\t\tmem[addr][15:8] <= din[15:8];"));
}

#[test]
fn read_enable_gates_the_registered_read() {
    let mut d = Design::new();
    let addr = d.signal_named(Bv::new(4), "addr");
    let dout = d.signal_named(Bv::new(8), "dout");
    let re = d.signal_named(Bv::BIT, "re");
    let port = MemoryPort::read(addr, dout).with_read_enable(re);
    let frag = Fragment::new()
        .with_memory(Memory::new(8, 16).with_port(port))
        .with_pad(addr)
        .with_pad(dout)
        .with_pad(re);
    let text = compile(&d, &frag, "ram").unwrap();
    assert!(text.contains("if (re) begin\n\t\tdout <= mem[addr];\n\tend"));
}

#[test]
fn hint_collisions_get_ordinal_suffixes() {
    let mut d = Design::new();
    let first = d.signal_named(Bv::new(8), "data");
    let second = d.signal_named(Bv::new(8), "data");
    let q = d.signal_named(Bv::new(8), "q");
    let fe = d.signal_expr(first);
    let se = d.signal_expr(second);
    let qe = d.signal_expr(q);
    let x = d.xor(fe, se);
    let frag = Fragment::new()
        .with_comb([d.assign(qe, x).unwrap()])
        .with_pad(first)
        .with_pad(second)
        .with_pad(q);
    let text = compile(&d, &frag, "mix").unwrap();
    assert!(text.contains("input [7:0] data,"));
    assert!(text.contains("input [7:0] data_1"));
    assert!(text.contains("q = (data ^ data_1);"));
}

#[test]
fn clock_and_reset_names_are_reserved() {
    let mut d = Design::new();
    let rogue = d.signal_named(Bv::BIT, "sys_clk");
    let q = d.signal_named(Bv::BIT, "q");
    let re = d.signal_expr(rogue);
    let qe = d.signal_expr(q);
    let frag = Fragment::new()
        .with_sync([d.assign(qe, re).unwrap()])
        .with_pad(rogue)
        .with_pad(q);
    let text = compile(&d, &frag, "clash").unwrap();
    assert!(text.contains("input sys_clk,\n\tinput sys_rst,\n\tinput sys_clk_1"));
}

#[test]
fn keyword_hints_are_escaped() {
    let mut d = Design::new();
    let bad = d.signal_named(Bv::BIT, "wire");
    let q = d.signal_named(Bv::BIT, "q");
    let be = d.signal_expr(bad);
    let qe = d.signal_expr(q);
    let frag = Fragment::new()
        .with_comb([d.assign(qe, be).unwrap()])
        .with_pad(bad)
        .with_pad(q);
    let text = compile(&d, &frag, "kw").unwrap();
    assert!(text.contains("input wire_"));
    assert!(text.contains("q = wire_;"));
}

#[test]
fn unnamed_signals_get_synthetic_names() {
    let mut d = Design::new();
    let anon = d.signal(Bv::new(8));
    let q = d.signal_named(Bv::new(8), "q");
    let ae = d.signal_expr(anon);
    let qe = d.signal_expr(q);
    let frag = Fragment::new()
        .with_comb([d.assign(qe, ae).unwrap()])
        .with_pad(q);
    let text = compile(&d, &frag, "anon").unwrap();
    assert!(text.contains("wire [7:0] sig_0;"));
}

#[test]
fn double_unconditional_comb_drive_is_rejected() {
    let mut d = Design::new();
    let a = d.signal_named(Bv::BIT, "a");
    let b = d.signal_named(Bv::BIT, "b");
    let q = d.signal_named(Bv::BIT, "q");
    let ae = d.signal_expr(a);
    let be = d.signal_expr(b);
    let qe = d.signal_expr(q);
    let frag = Fragment::new()
        .with_comb([d.assign(qe, ae).unwrap(), d.assign(qe, be).unwrap()]);
    let err = compile(&d, &frag, "bad").unwrap_err();
    assert!(matches!(err, ElabError::MultipleDriver { .. }));
}

#[test]
fn mixed_conditional_drive_is_ambiguous() {
    let mut d = Design::new();
    let a = d.signal_named(Bv::BIT, "a");
    let en = d.signal_named(Bv::BIT, "en");
    let q = d.signal_named(Bv::BIT, "q");
    let ae = d.signal_expr(a);
    let ene = d.signal_expr(en);
    let qe = d.signal_expr(q);
    let base = d.assign(qe, ae).unwrap();
    let override_value = d.constant(1);
    let override_stmt = d.assign(qe, override_value).unwrap();
    let frag =
        Fragment::new().with_comb([base, Statement::when(ene, vec![override_stmt])]);
    let err = compile(&d, &frag, "bad").unwrap_err();
    assert!(matches!(err, ElabError::AmbiguousDriver { .. }));
}

#[test]
fn comb_and_sync_may_not_share_a_target() {
    let mut d = Design::new();
    let a = d.signal_named(Bv::BIT, "a");
    let q = d.signal_named(Bv::BIT, "q");
    let ae = d.signal_expr(a);
    let qe = d.signal_expr(q);
    let comb = d.assign(qe, ae).unwrap();
    let sync = d.assign(qe, ae).unwrap();
    let frag = Fragment::new().with_comb([comb]).with_sync([sync]);
    let err = compile(&d, &frag, "bad").unwrap_err();
    assert!(matches!(err, ElabError::MultipleDriver { .. }));
}

#[test]
fn instance_output_conflicts_with_comb_drive() {
    let mut d = Design::new();
    let a = d.signal_named(Bv::BIT, "a");
    let q = d.signal_named(Bv::BIT, "q");
    let ae = d.signal_expr(a);
    let qe = d.signal_expr(q);
    let module = d.intern("sub");
    let port = d.intern("dout");
    let frag = Fragment::new()
        .with_comb([d.assign(qe, ae).unwrap()])
        .with_instance(Instance::new(module).output(port, q));
    let err = compile(&d, &frag, "bad").unwrap_err();
    assert!(matches!(err, ElabError::MultipleDriver { .. }));
}

#[test]
fn variable_signals_assign_blocking_in_clocked_block() {
    let mut d = Design::new();
    let a = d.signal_named(Bv::new(8), "a");
    let acc = d.add_signal(
        Signal::new(Bv::new(8))
            .named(d.intern("acc"))
            .as_variable(),
    );
    let q = d.signal_named(Bv::new(8), "q");
    let ae = d.signal_expr(a);
    let acce = d.signal_expr(acc);
    let qe = d.signal_expr(q);
    let step = d.add(acce, ae);
    let s1 = d.assign(acce, step).unwrap();
    let s2 = d.assign(qe, acce).unwrap();
    let frag = Fragment::new()
        .with_sync([s1, s2])
        .with_pad(a)
        .with_pad(q);
    let text = compile(&d, &frag, "accum").unwrap();
    assert!(text.contains("acc = (acc + a);"));
    assert!(text.contains("q <= acc;"));
}

#[test]
fn truncating_assignment_emits_plain_verilog() {
    // The target's implicit truncation matches the documented semantics,
    // so no masking is emitted.
    let mut d = Design::new();
    let a = d.signal_named(Bv::new(8), "a");
    let b = d.signal_named(Bv::new(8), "b");
    let q = d.signal_named(Bv::new(8), "q");
    let ae = d.signal_expr(a);
    let be = d.signal_expr(b);
    let qe = d.signal_expr(q);
    let sum = d.add(ae, be);
    let frag = Fragment::new()
        .with_comb([d.assign(qe, sum).unwrap()])
        .with_pad(a)
        .with_pad(b)
        .with_pad(q);
    let text = compile(&d, &frag, "add8").unwrap();
    assert!(text.contains("q = (a + b);"));
}

#[test]
fn partial_slice_drive_still_gets_a_default() {
    let mut d = Design::new();
    let a = d.signal_named(Bv::BIT, "a");
    let q = d.signal_named(Bv::new(4), "q");
    let ae = d.signal_expr(a);
    let qe = d.signal_expr(q);
    let low = d.slice(qe, 0, 1);
    let frag = Fragment::new()
        .with_comb([d.assign(low, ae).unwrap()])
        .with_pad(a)
        .with_pad(q);
    let text = compile(&d, &frag, "partial").unwrap();
    // A slice never fully drives its signal, so the latch-avoidance
    // default appears before the author's assignment.
    let default_at = text.find("\tq = 4'd0;").unwrap();
    let author_at = text.find("\tq[0] = a;").unwrap();
    assert!(default_at < author_at);
}
