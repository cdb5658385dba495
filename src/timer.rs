/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! A basic timer.

use std::time::Instant;

const NS_PER_SEC: u64 = 1_000_000_000;

/// A tick counter running at a fixed frequency.
///
/// The emulator driver uses one of these at 60 Hz to decide how many times
/// to decrement the machine's delay and sound timers between instructions.
/// Partial ticks carry over from one lap to the next, so no ticks are lost
/// however unevenly `lap` is called.
#[derive(Debug)]
pub struct Timer {
    /// The frequency of the timer, in Hz.
    frequency: u32,
    /// The instant the timer was last lapped.
    last: Instant,
    /// Nanoseconds of partial tick carried over from the last lap.
    carry_ns: u64,
}

impl Timer {
    /// Returns a new timer running at the given frequency.
    pub fn new(frequency: u32) -> Self {
        Timer {
            frequency,
            last: Instant::now(),
            carry_ns: 0,
        }
    }

    /// Returns the number of whole ticks elapsed since the last lap (or
    /// since creation, for the first lap).
    pub fn lap(&mut self) -> u64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        let ns =
            self.carry_ns + elapsed.as_secs() * NS_PER_SEC + u64::from(elapsed.subsec_nanos());
        let period = NS_PER_SEC / u64::from(self.frequency);
        self.carry_ns = ns % period;
        self.last = now;
        ns / period
    }
}
