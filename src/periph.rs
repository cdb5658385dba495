/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The peripheral hooks used by the interpreter.
//!
//! The interpreter core knows nothing about screens, keypads or entropy
//! sources; everything it needs from the outside world goes through the
//! `Peripherals` trait.  Hooks are called synchronously and communicate with
//! the machine only through their return values.  Every method has a
//! sensible default, so a frontend only overrides what it actually backs.

use num::FromPrimitive;
use rand;

use machine::{FONT_HEIGHT, FONT_START};

/// The number of keys on the Chip-8 controller.
const N_KEYS: usize = 16;

enum_from_primitive! {
/// The keys on the Chip-8 controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    K0 = 0,
    K1,
    K2,
    K3,
    K4,
    K5,
    K6,
    K7,
    K8,
    K9,
    KA,
    KB,
    KC,
    KD,
    KE,
    KF,
}
}

impl Key {
    /// Returns the key corresponding to the lowest four bits of the given
    /// byte.
    pub fn from_byte(b: u8) -> Key {
        Key::from_u8(b % N_KEYS as u8).unwrap()
    }
}

/// The peripherals attached to an interpreter.
pub trait Peripherals {
    /// Clears the display (`CLS`).
    fn clear_display(&mut self) {}

    /// XOR-draws the given sprite with its top-left corner at `(x, y)`
    /// (`DRW`).
    ///
    /// `sprite` holds one byte per row, most significant bit leftmost.
    /// Returns whether any pixel was erased; the interpreter stores that in
    /// `VF` as the collision flag.
    fn draw_sprite(&mut self, _x: u8, _y: u8, _sprite: &[u8]) -> bool {
        false
    }

    /// Returns whether the given key is currently pressed (`SKP`/`SKNP`).
    fn is_key_pressed(&self, _key: Key) -> bool {
        false
    }

    /// Waits for a key press and returns it (`LD Vx, K`).
    ///
    /// This is the only hook that may block.  Returning `None` cancels
    /// execution: the interpreter stops the machine cleanly rather than
    /// treating it as an error.
    fn wait_key(&mut self) -> Option<Key> {
        None
    }

    /// Returns the address of the sprite for the given hex digit
    /// (`LD F, Vx`).
    fn font_addr(&self, digit: u8) -> u16 {
        (FONT_START + FONT_HEIGHT * (digit as usize % 16)) as u16
    }

    /// Returns a fresh random byte (`RND`).
    fn rand_byte(&mut self) -> u8 {
        rand::random()
    }
}

/// Peripherals that are not attached to anything.
///
/// The display is discarded, no key is ever pressed, and a key wait cancels
/// immediately.  This is what the headless drivers and tests run with.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPeripherals;

impl Peripherals for NullPeripherals {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_byte() {
        assert_eq!(Key::from_byte(0x0), Key::K0);
        assert_eq!(Key::from_byte(0xF), Key::KF);
        // Only the low nibble selects the key.
        assert_eq!(Key::from_byte(0x1A), Key::KA);
    }

    #[test]
    fn default_font_addr() {
        let periph = NullPeripherals;
        assert_eq!(periph.font_addr(0), FONT_START as u16);
        assert_eq!(periph.font_addr(0xA), (FONT_START + 10 * FONT_HEIGHT) as u16);
        assert_eq!(periph.font_addr(0x1A), (FONT_START + 10 * FONT_HEIGHT) as u16);
    }
}
