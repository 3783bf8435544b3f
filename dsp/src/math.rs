//! Conversions between decibels and linear amplitude, shared by both
//! processors.

use libm::{fabsf, log10f, powf};

/// Quietest level that is still converted to decibels. Anything below is
/// treated as this level, which is -120 dB.
pub const MIN_LEVEL: f32 = 1.0e-6;

pub const MIN_DECIBELS: f32 = -120.0;

#[must_use]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

#[must_use]
pub fn linear_to_db(x: f32) -> f32 {
    let level = f32::max(fabsf(x), MIN_LEVEL);
    20.0 * log10f(level)
}

/// Position on a quadratic ramp of the given length, `(position / length)²`.
///
/// The result is clamped to [0, 1]. Ramps of zero length are considered
/// finished at zero.
#[must_use]
pub fn quadratic_ramp(position: f32, length: f32) -> f32 {
    if !(length > 0.0) {
        return 0.0;
    }
    let phase = (position / length).clamp(0.0, 1.0);
    phase * phase
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_decibels_to_linear() {
        assert_relative_eq!(db_to_linear(0.0), 1.0);
        assert_relative_eq!(db_to_linear(-20.0), 0.1);
        assert_relative_eq!(db_to_linear(20.0), 10.0);
        assert_relative_eq!(db_to_linear(-6.0), 0.501_187, epsilon = 1.0e-6);
    }

    #[test]
    fn convert_linear_to_decibels() {
        assert_relative_eq!(linear_to_db(1.0), 0.0);
        assert_relative_eq!(linear_to_db(0.1), -20.0, epsilon = 1.0e-5);
        assert_relative_eq!(linear_to_db(-0.1), -20.0, epsilon = 1.0e-5);
    }

    #[test]
    fn silence_is_floored_before_logarithm() {
        assert_relative_eq!(linear_to_db(0.0), MIN_DECIBELS, epsilon = 1.0e-4);
        assert_relative_eq!(linear_to_db(1.0e-12), MIN_DECIBELS, epsilon = 1.0e-4);
    }

    #[test]
    fn ramp_is_quadratic_and_bounded() {
        assert_relative_eq!(quadratic_ramp(0.0, 10.0), 0.0);
        assert_relative_eq!(quadratic_ramp(5.0, 10.0), 0.25);
        assert_relative_eq!(quadratic_ramp(10.0, 10.0), 1.0);
        assert_relative_eq!(quadratic_ramp(20.0, 10.0), 1.0);
        assert_relative_eq!(quadratic_ramp(-3.0, 10.0), 0.0);
    }

    #[test]
    fn ramp_of_zero_length_is_zero() {
        assert_relative_eq!(quadratic_ramp(1.0, 0.0), 0.0);
        assert_relative_eq!(quadratic_ramp(0.0, 0.0), 0.0);
    }
}
