//! Sliding window of squared samples, keeping their sum at hand.
//!
//! The sum is updated incrementally on every write, which costs a single
//! subtraction and addition. Incremental updates drift over long runs, so
//! each time the write cursor wraps around the sum is recalculated from the
//! stored squares. The error therefore never accumulates over more than one
//! window.

use core::fmt;

/// Number of samples covered by the window. Must be a power of two.
pub const WINDOW_LENGTH: usize = 128;

const MASK: usize = WINDOW_LENGTH - 1;

const _: () = assert!(WINDOW_LENGTH.is_power_of_two());

#[derive(Clone)]
pub struct EnergyWindow {
    squares: [f32; WINDOW_LENGTH],
    sum: f32,
    write_index: usize,
}

impl fmt::Debug for EnergyWindow {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "EnergyWindow(write_index: {}, sum: {})",
            self.write_index, self.sum
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EnergyWindow {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "EnergyWindow(write_index: {}, sum: {})",
            self.write_index,
            self.sum
        );
    }
}

impl Default for EnergyWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl EnergyWindow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            squares: [0.0; WINDOW_LENGTH],
            sum: 0.0,
            write_index: 0,
        }
    }

    pub fn clear(&mut self) {
        self.squares = [0.0; WINDOW_LENGTH];
        self.sum = 0.0;
        self.write_index = 0;
    }

    /// Replace the oldest square in the window with the square of the given
    /// sample and return the updated sum of the window.
    pub fn push(&mut self, sample: f32) -> f32 {
        let square = sample * sample;

        self.write_index = (self.write_index + 1) & MASK;
        let oldest = self.squares[self.write_index];
        self.squares[self.write_index] = square;

        if self.write_index == 0 {
            self.sum = self.squares.iter().sum();
        } else {
            self.sum += square - oldest;
        }

        self.power()
    }

    /// Sum of all squares in the window.
    #[must_use]
    pub fn power(&self) -> f32 {
        f32::max(self.sum, 0.0)
    }

    /// Average square in the window. Settles on `amplitude²` for a signal of
    /// constant amplitude.
    #[must_use]
    pub fn mean_power(&self) -> f32 {
        self.power() / WINDOW_LENGTH as f32
    }
}
