/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Operand parsing for the assembler.
//!
//! Integer operands are decimal by default; hexadecimal needs a `0x`
//! prefix.  Address operands may also be labels, resolved against the table
//! built in the first pass.  Register literals are handled by
//! `Register::from_str`, since the codec owns that syntax.

use std::collections::BTreeMap;

use failure::Error;

use instruction::{Address, AddressOutOfRangeError};

/// An integer operand that is neither decimal nor `0x`-prefixed hex.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "invalid integer literal '{}' (decimal, or hex with a 0x prefix)", _0)]
pub struct InvalidIntegerError(pub String);

/// A byte operand that does not fit in 8 bits.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "constant {} is not representable in one byte", _0)]
pub struct ByteOutOfRangeError(pub u64);

/// A nibble operand that does not fit in 4 bits.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "nibble {} is not representable in 4 bits", _0)]
pub struct NibbleOutOfRangeError(pub u64);

/// A word operand that does not fit in 16 bits.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "word {} is not representable in 16 bits", _0)]
pub struct WordOutOfRangeError(pub u64);

/// A reference to a label that was never defined.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "label '{}' is not defined", _0)]
pub struct UndefinedLabelError(pub String);

/// Returns whether the token is shaped like a register operand.
///
/// Only the leading `V` is checked here; this decides which form of an
/// overloaded mnemonic applies, after which the full literal is parsed (and
/// a malformed register is an error rather than a fallback to some other
/// operand kind).
pub fn is_register(token: &str) -> bool {
    token.starts_with('V') || token.starts_with('v')
}

/// Parses an unsigned integer literal.
fn integer(token: &str) -> Result<u64, InvalidIntegerError> {
    let (digits, radix) = if token.starts_with("0x") || token.starts_with("0X") {
        (&token[2..], 16)
    } else {
        (token, 10)
    };
    if digits.is_empty() {
        return Err(InvalidIntegerError(token.to_owned()));
    }
    u64::from_str_radix(digits, radix).map_err(|_| InvalidIntegerError(token.to_owned()))
}

/// Parses a byte constant operand.
pub fn byte(token: &str) -> Result<u8, Error> {
    let val = integer(token)?;
    if val >> 8 != 0 {
        Err(ByteOutOfRangeError(val).into())
    } else {
        Ok(val as u8)
    }
}

/// Parses a nibble constant operand.
pub fn nibble(token: &str) -> Result<u8, Error> {
    let val = integer(token)?;
    if val >> 4 != 0 {
        Err(NibbleOutOfRangeError(val).into())
    } else {
        Ok(val as u8)
    }
}

/// Parses a word constant operand (for `DW`).
pub fn word(token: &str) -> Result<u16, Error> {
    let val = integer(token)?;
    if val >> 16 != 0 {
        Err(WordOutOfRangeError(val).into())
    } else {
        Ok(val as u16)
    }
}

/// Resolves an address operand: a numeric literal if the token starts with
/// a digit, otherwise a label.
pub fn address(token: &str, labels: &BTreeMap<String, u16>) -> Result<Address, Error> {
    if token.chars().next().map_or(false, |c| c.is_digit(10)) {
        let val = integer(token)?;
        if val >> 12 != 0 {
            return Err(AddressOutOfRangeError(val as usize).into());
        }
        Ok(Address::from_u16(val as u16)?)
    } else {
        match labels.get(token) {
            Some(&addr) => Ok(Address::from_u16(addr)?),
            None => Err(UndefinedLabelError(token.to_owned()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(byte("0").unwrap(), 0);
        assert_eq!(byte("255").unwrap(), 255);
        assert_eq!(byte("0x0A").unwrap(), 0x0A);
        assert_eq!(byte("0XFF").unwrap(), 0xFF);
        assert!(byte("256").is_err());
        assert!(byte("0x100").is_err());
        assert!(byte("ten").is_err());
        assert!(byte("-1").is_err());
        assert!(byte("0x").is_err());

        assert_eq!(nibble("15").unwrap(), 15);
        assert_eq!(nibble("0xF").unwrap(), 0xF);
        assert!(nibble("16").is_err());

        assert_eq!(word("0xFFFF").unwrap(), 0xFFFF);
        assert!(word("0x10000").is_err());
    }

    #[test]
    fn addresses() {
        let mut labels = BTreeMap::new();
        labels.insert("start".to_owned(), 0x200u16);

        assert_eq!(address("0x206", &labels).unwrap().addr(), 0x206);
        assert_eq!(address("518", &labels).unwrap().addr(), 0x206);
        assert_eq!(address("start", &labels).unwrap().addr(), 0x200);
        assert!(address("0x1000", &labels).is_err());
        assert!(address("elsewhere", &labels).is_err());
    }

    #[test]
    fn register_shapes() {
        assert!(is_register("V0"));
        assert!(is_register("vAbc"));
        assert!(!is_register("0x56"));
        assert!(!is_register("DT"));
    }
}
