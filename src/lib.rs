/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Core library for the `chip8tk` toolchain.
//!
//! The library is shared by the three binary programs: `c8asm` (the
//! assembler), `c8disasm` (the disassembler) and `c8emu` (the emulator).
//! All three are built on the same instruction codec, so a word assembled
//! by one tool always decodes to the same instruction in the others.

#[macro_use]
extern crate enum_primitive;
extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate num;
extern crate rand;

/// The size of the Chip-8's memory, in bytes.
pub const MEM_SIZE: usize = 0x1000;
/// The address where programs are loaded.
pub const PROG_START: usize = 0x200;
/// The maximum size of a Chip-8 program, in bytes.
pub const PROG_SIZE: usize = MEM_SIZE - PROG_START;

pub mod assembler;
pub mod disassembler;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod periph;
pub mod timer;
pub mod util;

pub use assembler::Assembler;
pub use disassembler::Disassembler;
pub use instruction::{Address, Instruction, Opcode, Register};
pub use interpreter::Interpreter;
pub use machine::Machine;
pub use periph::{Key, NullPeripherals, Peripherals};
