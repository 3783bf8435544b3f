use libm::fabsf;

use super::envelope::Envelope;
use super::gain_computer::Curve;
use crate::log;
use crate::math;

const MIN_SAMPLE_RATE: f32 = 1.0;

/// Snapshot of user-facing parameters. Times are in seconds, levels in
/// decibels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attributes {
    pub threshold: f32,
    pub knee: f32,
    pub ratio: f32,
    pub attack: f32,
    pub release: f32,
    pub makeup: f32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            threshold: -6.0, // This is 0.5 amplitude
            knee: 6.0,
            ratio: 16.0,
            attack: 0.01,
            release: 0.14,
            makeup: 0.0,
        }
    }
}

impl Attributes {
    // Out of range values are pulled to the closest valid value. Values that
    // are not finite fall back to the default.
    fn sanitized(self) -> Self {
        let default = Self::default();
        Self {
            threshold: finite_or(self.threshold, default.threshold),
            knee: at_least(finite_or(self.knee, default.knee), 0.0),
            ratio: at_least(finite_or(self.ratio, default.ratio), 1.0),
            attack: at_least(finite_or(self.attack, default.attack), 0.0),
            release: at_least(finite_or(self.release, default.release), 0.0),
            makeup: finite_or(self.makeup, default.makeup),
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warning!("Replacing non-finite compressor attribute={:?}", value);
        fallback
    }
}

fn at_least(value: f32, min: f32) -> f32 {
    if value < min {
        log::warning!("Clamping compressor attribute={:?} to {:?}", value, min);
        min
    } else {
        value
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compressor {
    sample_rate: f32,
    attributes: Attributes,
    curve: Curve,
    envelope: Envelope,
    makeup: f32,
}

impl Compressor {
    #[allow(clippy::let_and_return)]
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        let attributes = Attributes::default();

        let mut uninitialized_compressor = Self {
            sample_rate: sanitize_sample_rate(sample_rate),
            attributes,
            curve: Curve::new(attributes.threshold, attributes.knee, attributes.ratio),
            envelope: Envelope::default(),
            makeup: 1.0,
        };

        uninitialized_compressor.set_attributes(attributes);
        let compressor = uninitialized_compressor;

        compressor
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        let attributes = attributes.sanitized();
        self.attributes = attributes;
        self.curve = Curve::new(attributes.threshold, attributes.knee, attributes.ratio);
        self.envelope
            .set_times(self.sample_rate, attributes.attack, attributes.release);
        self.makeup = math::db_to_linear(attributes.makeup);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.set_attributes(self.attributes);
    }

    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    /// Currently applied gain in decibels, excluding makeup. Zero when the
    /// compressor is idle, negative while it compresses.
    #[must_use]
    pub fn gain_reduction(&self) -> f32 {
        self.envelope.value()
    }

    /// Return the smoothed gain back to unity, keeping attributes intact.
    pub fn reset(&mut self) {
        self.envelope.reset();
    }

    pub fn tick(&mut self, left: f32, right: f32) -> (f32, f32) {
        let max = f32::max(fabsf(left), fabsf(right));
        let level_in_decibels = math::linear_to_db(max);

        let compression = self.curve.reduction(level_in_decibels);
        let filtered_compression = self.envelope.tick(compression);
        let gain = math::db_to_linear(filtered_compression) * self.makeup;

        (left * gain, right * gain)
    }

    pub fn process(&mut self, buffer_left: &mut [f32], buffer_right: &mut [f32]) {
        for (l, r) in buffer_left.iter_mut().zip(buffer_right) {
            (*l, *r) = self.tick(*l, *r);
        }
    }

    /// Process into separate output buffers. Only as many frames as fit the
    /// shortest of the four buffers are processed.
    pub fn process_into(
        &mut self,
        input_left: &[f32],
        input_right: &[f32],
        output_left: &mut [f32],
        output_right: &mut [f32],
    ) {
        let inputs = input_left.iter().zip(input_right);
        let outputs = output_left.iter_mut().zip(output_right.iter_mut());
        for ((l, r), (out_l, out_r)) in inputs.zip(outputs) {
            (*out_l, *out_r) = self.tick(*l, *r);
        }
    }
}

fn sanitize_sample_rate(sample_rate: f32) -> f32 {
    if sample_rate.is_finite() && sample_rate >= MIN_SAMPLE_RATE {
        sample_rate
    } else {
        log::warning!("Clamping invalid sample_rate={:?}", sample_rate);
        MIN_SAMPLE_RATE
    }
}
