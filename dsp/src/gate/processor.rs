//! Stereo wrapper routing two channels through one or two gates.

use super::state_machine::{Attributes, Gate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Both channels pass untouched.
    Off,
    /// Only the first channel is gated, keyed by itself.
    First,
    /// Only the second channel is gated, keyed by itself.
    Second,
    /// Each channel is gated by its own state machine.
    Independent,
    /// Both channels share one gate keyed by the louder of them.
    #[default]
    Linked,
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateProcessor {
    mode: Mode,
    gates: [Gate; 2],
}

impl GateProcessor {
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mode: Mode::default(),
            gates: [Gate::new(sample_rate), Gate::new(sample_rate)],
        }
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        for gate in &mut self.gates {
            gate.set_attributes(attributes);
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for gate in &mut self.gates {
            gate.set_sample_rate(sample_rate);
        }
    }

    /// The new mode is used starting with the next processed sample. Gates
    /// keep their state.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Gain currently applied on each channel.
    #[must_use]
    pub fn gains(&self) -> (f32, f32) {
        let [first, second] = &self.gates;
        match self.mode {
            Mode::Off => (1.0, 1.0),
            Mode::First => (first.gain(), 1.0),
            Mode::Second => (1.0, first.gain()),
            Mode::Independent => (first.gain(), second.gain()),
            Mode::Linked => (first.gain(), first.gain()),
        }
    }

    pub fn reset(&mut self) {
        for gate in &mut self.gates {
            gate.reset();
        }
    }

    pub fn tick(&mut self, left: f32, right: f32) -> (f32, f32) {
        let [first, second] = &mut self.gates;
        match self.mode {
            Mode::Off => (left, right),
            Mode::First => {
                first.push_samples(left, 0.0);
                (first.run(left), right)
            }
            Mode::Second => {
                first.push_samples(0.0, right);
                (left, first.run(right))
            }
            Mode::Independent => {
                first.push_samples(left, 0.0);
                second.push_samples(0.0, right);
                (first.run(left), second.run(right))
            }
            Mode::Linked => {
                first.push_samples(left, right);
                let left = first.run(left);
                (left, first.apply(right))
            }
        }
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
