//! Static curve of the compressor, translating detected level into gain.
//!
//! All values are in decibels. The returned gain is never positive: zero
//! below the knee, a quadratic blend inside of it and the full ratio above.

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Curve {
    threshold: f32,
    knee: f32,
    knee_half: f32,
    slope: f32,
}

impl Curve {
    /// Knee must be non-negative and ratio at least 1. The compressor makes
    /// sure of that before building the curve.
    #[must_use]
    pub fn new(threshold: f32, knee: f32, ratio: f32) -> Self {
        Self {
            threshold,
            knee,
            knee_half: knee / 2.0,
            slope: 1.0 / ratio - 1.0,
        }
    }

    #[must_use]
    pub fn lower_knee(&self) -> f32 {
        self.threshold - self.knee_half
    }

    #[must_use]
    pub fn upper_knee(&self) -> f32 {
        self.threshold + self.knee_half
    }

    #[must_use]
    pub fn reduction(&self, level_in_decibels: f32) -> f32 {
        let overshoot = level_in_decibels - self.threshold;
        if overshoot < -self.knee_half {
            0.0
        } else if overshoot < self.knee_half {
            0.5 * self.slope * ((overshoot + self.knee_half) * (overshoot + self.knee_half))
                / self.knee
        } else {
            self.slope * overshoot
        }
    }
}

/// Gain in decibels the compressor aims for at the given input level.
///
/// Negative knee is treated as zero and ratio below 1 as 1, so the curve never
/// expands.
#[must_use]
pub fn gain_reduction(level_in_decibels: f32, threshold: f32, knee: f32, ratio: f32) -> f32 {
    Curve::new(threshold, f32::max(knee, 0.0), f32::max(ratio, 1.0)).reduction(level_in_decibels)
}
