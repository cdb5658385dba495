/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The Chip-8 disassembler.
//!
//! This is a pure decode walk: the ROM is read two bytes at a time from
//! `PROG_START` and every word is printed in its canonical text form, with
//! no execution and no label recovery (addresses appear as raw hex).  Words
//! that decode to nothing render as `DW` data, and a trailing odd byte as
//! `DB`, so the listing covers every byte of the input.

use std::io::{BufWriter, Read, Write};

use failure::Error;

use instruction::{Instruction, Opcode};
use {PROG_SIZE, PROG_START};

/// A Chip-8 disassembler, holding the ROM image being disassembled.
pub struct Disassembler {
    /// The ROM bytes.
    rom: Vec<u8>,
}

impl Disassembler {
    /// Creates a new disassembler from the given ROM input.
    pub fn new<R: Read>(input: &mut R) -> Result<Self, Error> {
        let mut rom = Vec::new();
        input.read_to_end(&mut rom)?;
        if rom.len() > PROG_SIZE {
            warn!(
                "ROM is {} bytes; only {} fit in memory",
                rom.len(),
                PROG_SIZE
            );
        }
        Ok(Disassembler { rom })
    }

    /// Returns the raw ROM bytes.
    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// Writes the disassembly listing to the given output, one line per
    /// word: `0xNNN: MNEMONIC args`.
    pub fn dump<W: Write>(&self, output: &mut W) -> Result<(), Error> {
        let mut output = BufWriter::new(output);

        for (n, chunk) in self.rom.chunks(2).enumerate() {
            let addr = PROG_START + 2 * n;
            if chunk.len() == 1 {
                writeln!(output, "{:#05X}: DB {:#04X}", addr, chunk[0])?;
                continue;
            }
            let opcode = Opcode::from_bytes(chunk[0], chunk[1]);
            writeln!(output, "{:#05X}: {}", addr, Instruction::from_opcode(opcode))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn dump(rom: &[u8]) -> String {
        let disasm = Disassembler::new(&mut Cursor::new(rom)).unwrap();
        let mut out = Vec::new();
        disasm.dump(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// The listing walks the ROM two bytes at a time from PROG_START.
    #[test]
    fn listing_format() {
        let rom = [0x60, 0x0A, 0x61, 0x05, 0x80, 0x14, 0x12, 0x00];
        assert_eq!(
            dump(&rom),
            "0x200: LD V0, 0x0A\n\
             0x202: LD V1, 0x05\n\
             0x204: ADD V0, V1\n\
             0x206: JP 0x200\n"
        );
    }

    /// Undecodable words render as data.
    #[test]
    fn unknown_words_as_data() {
        assert_eq!(dump(&[0xFF, 0xFF]), "0x200: DW 0xFFFF\n");
        assert_eq!(dump(&[0x8A, 0xB8]), "0x200: DW 0x8AB8\n");
    }

    /// A trailing odd byte renders as a single byte of data.
    #[test]
    fn odd_trailing_byte() {
        assert_eq!(dump(&[0x00, 0xE0, 0x42]), "0x200: CLS\n0x202: DB 0x42\n");
    }

    /// SYS words are shown even though the assembler refuses them.
    #[test]
    fn sys_words() {
        assert_eq!(dump(&[0x01, 0x23]), "0x200: SYS 0x123\n");
    }

    /// An empty ROM produces an empty listing.
    #[test]
    fn empty_rom() {
        assert_eq!(dump(&[]), "");
    }
}
