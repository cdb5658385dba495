/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The Chip-8 assembler.
//!
//! This is a straight-forward two-pass assembler.  The first pass walks the
//! tokenized lines and assigns an address to every label; because each
//! logical line assembles to exactly one word, a label's address is just
//! `PROG_START` plus twice its line index.  The second pass encodes each
//! line through the instruction codec, resolving label references against
//! the table built in the first pass.
//!
//! The syntax is described in the manual: one instruction per line, `#`
//! comments, labels ending in `:`, operands separated by commas or
//! whitespace.  Constants are decimal or `0x`-prefixed hex.  `DW` emits a
//! literal word of data.  `SYS` is rejected; no current machine implements
//! it.

use std::collections::BTreeMap;
use std::default::Default;
use std::fmt;
use std::io::{BufWriter, Read, Write};

use failure::{Backtrace, Error, Fail};

use instruction::{AddressOutOfRangeError, Opcode, Register};
use {PROG_SIZE, PROG_START};

mod lexer;
mod operand;

/// An error resulting from an attempt to give a new value to a label.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "label '{}' is already defined", _0)]
pub struct DuplicateLabelError(pub String);

/// An error resulting from being given the wrong number of operands for an
/// operation.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "wrong number of operands to '{}': expected {}, got {}", operation, expected, got)]
pub struct WrongOperandsError {
    pub operation: String,
    pub expected: usize,
    pub got: usize,
}

impl WrongOperandsError {
    /// Returns an error if the actual number of operands differs from the
    /// expected number.
    pub fn test(operation: &str, expected: usize, got: usize) -> Result<(), Self> {
        if expected != got {
            Err(WrongOperandsError {
                operation: operation.to_owned(),
                expected,
                got,
            })
        } else {
            Ok(())
        }
    }
}

/// Fails immediately with an error if the wrong number of operands was
/// given.
macro_rules! expect_operands {
    ($op:expr, $expected:expr, $got:expr) => {
        WrongOperandsError::test($op, $expected, $got)?
    };
}

/// An error resulting from operands whose shapes match no form of the
/// operation.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "invalid operands to '{}': {}", operation, detail)]
pub struct InvalidOperandsError {
    pub operation: String,
    pub detail: String,
}

impl InvalidOperandsError {
    fn new(operation: &str, detail: &str) -> Self {
        InvalidOperandsError {
            operation: operation.to_owned(),
            detail: detail.to_owned(),
        }
    }
}

/// An error resulting from the use of an unknown operation.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "unknown operation '{}'", _0)]
pub struct UnknownOperationError(pub String);

/// An error resulting from the use of an operation this assembler refuses
/// to emit.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "operation '{}' is not supported by this assembler", _0)]
pub struct UnsupportedOperationError(pub String);

/// An error resulting from a program that does not fit in memory.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "program is {} bytes; at most {} fit in memory", _0, _1)]
pub struct ProgramTooBigError(pub usize, pub usize);

/// An error together with the source line that caused it.
#[derive(Debug)]
pub struct ErrorWithLine {
    /// The 1-based source line number where the error occurred.
    line: usize,
    /// The offending line, as tokenized text.
    text: String,
    /// The underlying error.
    inner: Error,
}

impl fmt::Display for ErrorWithLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "on line {} (\"{}\"): {}", self.line, self.text, self.inner)
    }
}

impl Fail for ErrorWithLine {
    fn cause(&self) -> Option<&Fail> {
        Some(self.inner.as_fail())
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        Some(self.inner.backtrace())
    }
}

/// A two-pass Chip-8 assembler.
///
/// An assembler is good for one program; assembling two inputs through the
/// same instance would concatenate them, so the top-level `assemble`
/// consumes it.
pub struct Assembler {
    /// The machine-code words emitted so far.
    words: Vec<Opcode>,
    /// A map of label names to addresses, filled in by the first pass.
    labels: BTreeMap<String, u16>,
}

impl Assembler {
    /// Returns a new assembler.
    pub fn new() -> Self {
        Assembler {
            words: Vec::new(),
            labels: BTreeMap::new(),
        }
    }

    /// Assembles the given input program, writing the ROM image (as binary
    /// data, big-endian words) to the given output.
    pub fn assemble<R: Read, W: Write>(mut self, input: &mut R, output: &mut W) -> Result<(), Error> {
        let mut source = String::new();
        input.read_to_string(&mut source)?;
        let rom = self.assemble_source(&source)?;
        let mut output = BufWriter::new(output);
        output.write_all(&rom)?;
        Ok(())
    }

    /// Assembles source text into ROM bytes.
    pub fn assemble_source(&mut self, source: &str) -> Result<Vec<u8>, Error> {
        let mut lines = lexer::tokenize(source);
        for line in &lines {
            trace!("line {}: {}", line.number, line.text());
        }

        self.collect_labels(&mut lines)?;
        self.encode_lines(&lines)?;

        let size = 2 * self.words.len();
        if size > PROG_SIZE {
            return Err(ProgramTooBigError(size, PROG_SIZE).into());
        }
        Ok(self.rom_bytes())
    }

    /// Returns the label table collected in the first pass.
    pub fn labels(&self) -> &BTreeMap<String, u16> {
        &self.labels
    }

    /// Performs the first pass: removes the label from every labelled line
    /// and records its address.
    ///
    /// Labels are case-sensitive, must be unique, and get the address of the
    /// line they are attached to (`PROG_START + 2 * index`).
    fn collect_labels(&mut self, lines: &mut Vec<lexer::Line>) -> Result<(), ErrorWithLine> {
        for (i, line) in lines.iter_mut().enumerate() {
            let labelled = line.tokens.front().map_or(false, |t| t.ends_with(':'));
            if !labelled {
                continue;
            }
            let number = line.number;
            let text = line.text();
            let mut name = match line.tokens.pop_front() {
                Some(name) => name,
                None => continue,
            };
            name.pop();

            let addr = PROG_START + 2 * i;
            if addr >> 12 != 0 {
                return Err(ErrorWithLine {
                    line: number,
                    text,
                    inner: AddressOutOfRangeError(addr).into(),
                });
            }
            debug!("label '{}' -> {:#05X}", name, addr);
            if let Err(e) = self.define_label(name, addr as u16) {
                return Err(ErrorWithLine {
                    line: number,
                    text,
                    inner: e.into(),
                });
            }
            if line.tokens.is_empty() {
                warn!("label at end of file does not refer to any instruction");
            }
        }
        Ok(())
    }

    /// Records the address of a label.
    fn define_label(&mut self, label: String, addr: u16) -> Result<(), DuplicateLabelError> {
        if self.labels.contains_key(&label) {
            return Err(DuplicateLabelError(label));
        }
        self.labels.insert(label, addr);
        Ok(())
    }

    /// Performs the second pass: encodes every line into a machine-code
    /// word.
    fn encode_lines(&mut self, lines: &[lexer::Line]) -> Result<(), ErrorWithLine> {
        for line in lines {
            if line.tokens.is_empty() {
                continue;
            }
            let word = self.encode_line(line).map_err(|e| ErrorWithLine {
                line: line.number,
                text: line.text(),
                inner: e,
            })?;
            debug!("{:#05X}: {}", PROG_START + 2 * self.words.len(), word);
            self.words.push(word);
        }
        Ok(())
    }

    /// Encodes one logical line (with any label already removed) into a
    /// machine-code word.
    fn encode_line(&self, line: &lexer::Line) -> Result<Opcode, Error> {
        use instruction::Instruction::*;

        let mnemonic = line.tokens[0].to_ascii_uppercase();
        let ops: Vec<&str> = line.tokens.iter().skip(1).map(|t| t.as_str()).collect();
        let op = mnemonic.as_str();

        let instr = match op {
            "CLS" => {
                expect_operands!(op, 0, ops.len());
                Cls
            }
            "RET" => {
                expect_operands!(op, 0, ops.len());
                Ret
            }
            "SYS" => return Err(UnsupportedOperationError(op.to_owned()).into()),
            "JP" => {
                if ops.len() == 2 {
                    // JP V0, addr; the register must be exactly V0.
                    if !operand::is_register(ops[0]) {
                        return Err(InvalidOperandsError::new(
                            op,
                            "the first operand of the two-operand form must be register V0",
                        ).into());
                    }
                    let reg: Register = ops[0].parse()?;
                    if reg != Register::V0 {
                        return Err(InvalidOperandsError::new(
                            op,
                            "the first operand of the two-operand form must be register V0",
                        ).into());
                    }
                    JpV0(operand::address(ops[1], &self.labels)?)
                } else {
                    expect_operands!(op, 1, ops.len());
                    if operand::is_register(ops[0]) {
                        return Err(InvalidOperandsError::new(
                            op,
                            "the one-operand form takes an address, not a register",
                        ).into());
                    }
                    Jp(operand::address(ops[0], &self.labels)?)
                }
            }
            "CALL" => {
                expect_operands!(op, 1, ops.len());
                Call(operand::address(ops[0], &self.labels)?)
            }
            "SE" => {
                expect_operands!(op, 2, ops.len());
                if !operand::is_register(ops[0]) {
                    return Err(InvalidOperandsError::new(op, "the first operand must be a register").into());
                }
                let vx = ops[0].parse()?;
                if operand::is_register(ops[1]) {
                    SeReg(vx, ops[1].parse()?)
                } else {
                    SeByte(vx, operand::byte(ops[1])?)
                }
            }
            "SNE" => {
                expect_operands!(op, 2, ops.len());
                if !operand::is_register(ops[0]) {
                    return Err(InvalidOperandsError::new(op, "the first operand must be a register").into());
                }
                let vx = ops[0].parse()?;
                if operand::is_register(ops[1]) {
                    SneReg(vx, ops[1].parse()?)
                } else {
                    SneByte(vx, operand::byte(ops[1])?)
                }
            }
            "LD" => {
                expect_operands!(op, 2, ops.len());
                // LD has a lot of overloads; the special first operands come
                // first, then the special second operands, then the plain
                // register/byte forms.
                if ops[0].eq_ignore_ascii_case("I") {
                    LdI(operand::address(ops[1], &self.labels)?)
                } else if ops[0].eq_ignore_ascii_case("DT") {
                    LdDtReg(ops[1].parse()?)
                } else if ops[0].eq_ignore_ascii_case("ST") {
                    LdStReg(ops[1].parse()?)
                } else if ops[0].eq_ignore_ascii_case("F") {
                    LdF(ops[1].parse()?)
                } else if ops[0].eq_ignore_ascii_case("B") {
                    LdB(ops[1].parse()?)
                } else if ops[0].eq_ignore_ascii_case("[I]") {
                    LdDerefIReg(ops[1].parse()?)
                } else if operand::is_register(ops[0]) {
                    let vx = ops[0].parse()?;
                    if ops[1].eq_ignore_ascii_case("DT") {
                        LdRegDt(vx)
                    } else if ops[1].eq_ignore_ascii_case("K") {
                        LdKey(vx)
                    } else if ops[1].eq_ignore_ascii_case("[I]") {
                        LdRegDerefI(vx)
                    } else if operand::is_register(ops[1]) {
                        LdReg(vx, ops[1].parse()?)
                    } else {
                        LdByte(vx, operand::byte(ops[1])?)
                    }
                } else {
                    return Err(InvalidOperandsError::new(op, "no form of LD matches these operands").into());
                }
            }
            "ADD" => {
                expect_operands!(op, 2, ops.len());
                if ops[0].eq_ignore_ascii_case("I") {
                    AddI(ops[1].parse()?)
                } else if operand::is_register(ops[0]) {
                    let vx = ops[0].parse()?;
                    if operand::is_register(ops[1]) {
                        AddReg(vx, ops[1].parse()?)
                    } else {
                        AddByte(vx, operand::byte(ops[1])?)
                    }
                } else {
                    return Err(InvalidOperandsError::new(op, "no form of ADD matches these operands").into());
                }
            }
            "OR" => {
                expect_operands!(op, 2, ops.len());
                Or(ops[0].parse()?, ops[1].parse()?)
            }
            "AND" => {
                expect_operands!(op, 2, ops.len());
                And(ops[0].parse()?, ops[1].parse()?)
            }
            "XOR" => {
                expect_operands!(op, 2, ops.len());
                Xor(ops[0].parse()?, ops[1].parse()?)
            }
            "SUB" => {
                expect_operands!(op, 2, ops.len());
                Sub(ops[0].parse()?, ops[1].parse()?)
            }
            "SHR" => {
                expect_operands!(op, 1, ops.len());
                Shr(ops[0].parse()?)
            }
            "SUBN" => {
                expect_operands!(op, 2, ops.len());
                Subn(ops[0].parse()?, ops[1].parse()?)
            }
            "SHL" => {
                expect_operands!(op, 1, ops.len());
                Shl(ops[0].parse()?)
            }
            "RND" => {
                expect_operands!(op, 2, ops.len());
                if operand::is_register(ops[1]) {
                    return Err(InvalidOperandsError::new(op, "the mask must be a byte constant").into());
                }
                Rnd(ops[0].parse()?, operand::byte(ops[1])?)
            }
            "DRW" => {
                expect_operands!(op, 3, ops.len());
                if operand::is_register(ops[2]) {
                    return Err(InvalidOperandsError::new(op, "the sprite height must be a nibble constant").into());
                }
                Drw(ops[0].parse()?, ops[1].parse()?, operand::nibble(ops[2])?)
            }
            "DW" => {
                expect_operands!(op, 1, ops.len());
                return Ok(Opcode(operand::word(ops[0])?));
            }
            _ => return Err(UnknownOperationError(mnemonic).into()),
        };

        Ok(Opcode::from(instr))
    }

    /// Returns the emitted machine code as bytes, high byte of each word
    /// first.
    fn rom_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 * self.words.len());
        for word in &self.words {
            let (b1, b2) = word.bytes();
            bytes.push(b1);
            bytes.push(b2);
        }
        bytes
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new()
    }
}
