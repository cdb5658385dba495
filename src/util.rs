/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Various utility functions.

use std::io::{self, Write};

/// Writes a hex dump of `bytes` to `output`, `cols` bytes per row, with
/// each row prefixed by the address of its first byte (starting at `base`).
///
/// `cols` must be positive; the drivers validate it before calling.
pub fn hexdump<W: Write>(
    output: &mut W,
    bytes: &[u8],
    base: usize,
    cols: usize,
) -> io::Result<()> {
    for (row, chunk) in bytes.chunks(cols).enumerate() {
        write!(output, "{:#05X}:", base + row * cols)?;
        for b in chunk {
            write!(output, " {:02X}", b)?;
        }
        writeln!(output)?;
    }
    Ok(())
}
