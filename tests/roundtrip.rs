/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Tests that drive the assembler, disassembler and interpreter together
//! through their public interfaces.

extern crate chip8tk;

use std::io::Cursor;

use chip8tk::{Assembler, Disassembler, Interpreter, Register};

/// Assembles the given source to ROM bytes.
fn assemble(source: &str) -> Vec<u8> {
    let mut input = Cursor::new(source);
    let mut output = Vec::new();
    Assembler::new()
        .assemble(&mut input, &mut output)
        .expect("assembly failed");
    output
}

/// Disassembles the given ROM bytes to a listing.
fn disassemble(rom: &[u8]) -> String {
    let disasm = Disassembler::new(&mut Cursor::new(rom)).expect("could not read ROM");
    let mut out = Vec::new();
    disasm.dump(&mut out).expect("disassembly failed");
    String::from_utf8(out).expect("listing was not UTF-8")
}

/// A disassembly listing is valid assembler input (the leading addresses
/// parse as labels, and all operands are numeric), and reassembling it
/// reproduces the ROM exactly.
#[test]
fn assemble_disassemble_assemble() {
    let source = "start:
        LD V0, 0x0A
        LD V1, 5
        ADD V0, V1
        SE V0, 0x0F
        JP start
        LD I, table
        DRW V0, V1, 0x5
        RND V2, 0x3F
        SKP V3
        SKNP V3
        LD V4, DT
        LD DT, V4
        LD ST, V4
        ADD I, V5
        LD F, V6
        LD B, V7
        LD [I], V8
        LD V9, [I]
        SHR V1
        SHL V2
        SUB V3, V4
        SUBN V5, V6
        OR V0, V1
        AND V2, V3
        XOR V4, V5
        SNE V6, 0x10
        SNE V6, V7
        CALL start
        RET
        JP V0, start
table:  DW 0x8C5A";
    let rom = assemble(source);
    let listing = disassemble(&rom);
    let rom2 = assemble(&listing);
    assert_eq!(rom, rom2);
}

/// An even-length ROM with no SYS words survives disassembly and
/// reassembly byte for byte, including words that decode to nothing (they
/// come back through the listing as `DW` data).
#[test]
fn rom_fixpoint() {
    let rom: Vec<u8> = vec![
        0x00, 0xE0, // CLS
        0xFF, 0xFF, // undecodable
        0x8A, 0xB8, // undecodable
        0x60, 0x0A, // LD V0, 0x0A
        0xD1, 0x24, // DRW V1, V2, 0x4
        0x00, 0xEE, // RET
    ];
    let listing = disassemble(&rom);
    assert_eq!(assemble(&listing), rom);
}

/// The assembled program runs to the expected final state.
#[test]
fn assemble_and_run() {
    let rom = assemble("LD V0, 0x0A\nLD V1, 5\nADD V0, V1");
    assert_eq!(rom, vec![0x60, 0x0A, 0x61, 0x05, 0x80, 0x14]);

    let mut interp = Interpreter::new();
    interp.machine_mut().load_rom(&rom).unwrap();
    for _ in 0..3 {
        interp.step().unwrap();
    }
    let machine = interp.machine();
    assert_eq!(machine.register(Register::V0), 15);
    assert_eq!(machine.register(Register::V1), 5);
    assert_eq!(machine.register(Register::VF), 0);
    assert_eq!(machine.pc(), 0x206);
}

/// A subroutine call and return, assembled from source with labels.
#[test]
fn assemble_and_run_subroutine() {
    // CALL pushes 0x202; the subroutine returns there with SP empty again.
    let rom = assemble("CALL sub\nCLS\nsub: RET");
    assert_eq!(rom, vec![0x22, 0x04, 0x00, 0xE0, 0x00, 0xEE]);

    let mut interp = Interpreter::new();
    interp.machine_mut().load_rom(&rom).unwrap();
    interp.step().unwrap();
    assert_eq!(interp.machine().pc(), 0x204);
    assert_eq!(interp.machine().sp(), 1);
    interp.step().unwrap();
    assert_eq!(interp.machine().pc(), 0x202);
    assert_eq!(interp.machine().sp(), 0);
}

/// A busy loop counting down from 3 in V0, assembled and executed.
#[test]
fn assemble_and_run_loop() {
    let source = "LD V0, 3
        LD V1, 1
loop:   SE V0, 0
        JP body
        JP done
body:   SUB V0, V1
        JP loop
done:   JP done";
    let rom = assemble(source);
    let mut interp = Interpreter::new();
    interp.machine_mut().load_rom(&rom).unwrap();
    // Run enough steps to converge on the final spin loop.
    for _ in 0..40 {
        interp.step().unwrap();
    }
    assert_eq!(interp.machine().register(Register::V0), 0);
    // done: JP done spins at its own address.
    assert_eq!(interp.machine().pc(), 0x20E);
}
