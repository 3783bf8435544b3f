use core::f32::consts::FRAC_1_SQRT_2;

use libm::{ceilf, fabsf, floorf, sqrtf};

use crate::energy_window::EnergyWindow;
use crate::log;
use crate::math;

// Added to the detected level while an attack is in progress, so a level
// hovering around the upper threshold does not open and close the gate
// in rapid succession.
const ATTACK_HYSTERESIS: f32 = 0.1;

/// Default distance of the lower threshold below the upper one, in decibels.
pub const LOWER_THRESHOLD_OFFSET: f32 = 20.0;

const MIN_SAMPLE_RATE: f32 = 1.0;

/// Times are in milliseconds, thresholds in decibels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attributes {
    pub attack: f32,
    pub hold: f32,
    pub decay: f32,
    pub upper_threshold: f32,
    pub lower_threshold: f32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::with_threshold(-40.0, 100.0)
    }
}

impl Attributes {
    /// Attack of 10 ms, hold of 1 ms and lower threshold 20 dB below the
    /// given one.
    #[must_use]
    pub fn with_threshold(threshold: f32, decay: f32) -> Self {
        Self {
            attack: 10.0,
            hold: 1.0,
            decay,
            upper_threshold: threshold,
            lower_threshold: threshold - LOWER_THRESHOLD_OFFSET,
        }
    }

    fn sanitized(self) -> Self {
        let default = Self::default();
        let time = |value: f32, fallback: f32| {
            if !value.is_finite() {
                log::warning!("Replacing non-finite gate time={:?}", value);
                fallback
            } else if value < 0.0 {
                log::warning!("Clamping negative gate time={:?}", value);
                0.0
            } else {
                value
            }
        };

        let upper_threshold = if self.upper_threshold.is_finite() {
            self.upper_threshold
        } else {
            log::warning!("Replacing non-finite upper_threshold={:?}", self.upper_threshold);
            default.upper_threshold
        };
        let lower_threshold = if !self.lower_threshold.is_finite() {
            log::warning!("Replacing non-finite lower_threshold={:?}", self.lower_threshold);
            upper_threshold - LOWER_THRESHOLD_OFFSET
        } else if self.lower_threshold > upper_threshold {
            log::warning!("Clamping lower_threshold={:?} to upper", self.lower_threshold);
            upper_threshold
        } else {
            self.lower_threshold
        };

        Self {
            attack: time(self.attack, default.attack),
            hold: time(self.hold, default.hold),
            decay: time(self.decay, default.decay),
            upper_threshold,
            lower_threshold,
        }
    }
}

/// Observable phase of the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Closed, or ramping open while an attack is in progress.
    Idle,
    /// Fully open.
    Hold,
    /// Ramping closed.
    Decay,
}

// Each variant keeps only the counter that matters for it. All counters are
// in samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    Idle { attack: u32 },
    Hold { hold: u32 },
    Decay { decay: u32 },
}

impl State {
    fn phase(self) -> Phase {
        match self {
            Self::Idle { .. } => Phase::Idle,
            Self::Hold { .. } => Phase::Hold,
            Self::Decay { .. } => Phase::Decay,
        }
    }
}

/// Gate keyed by the louder of two monitored channels.
///
/// For every sample, call [`Gate::push_samples`] first and then either
/// [`Gate::run`] to advance the state machine, or [`Gate::apply`] to reuse
/// the gain of the last step.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gate {
    windows: [EnergyWindow; 2],
    state: State,
    key: f32,
    rms: f32,
    gain: f32,
    sample_rate: f32,
    attributes: Attributes,
    attack_time: f32,
    hold_time: f32,
    decay_time: f32,
    upper_threshold: f32,
    lower_threshold: f32,
}

impl Gate {
    #[allow(clippy::let_and_return)]
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        let mut uninitialized_gate = Self {
            windows: [EnergyWindow::new(), EnergyWindow::new()],
            state: State::Idle { attack: 0 },
            key: 0.0,
            rms: 0.0,
            gain: 0.0,
            sample_rate: sanitize_sample_rate(sample_rate),
            attributes: Attributes::default(),
            attack_time: 0.0,
            hold_time: 0.0,
            decay_time: 0.0,
            upper_threshold: 0.0,
            lower_threshold: 0.0,
        };

        uninitialized_gate.set_attributes(Attributes::default());
        let gate = uninitialized_gate;

        gate
    }

    /// Cheap enough to be called on every block, even with unchanged values.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        let attributes = attributes.sanitized();
        self.attributes = attributes;

        let tau = self.sample_rate / 1000.0;
        self.attack_time = attributes.attack * tau;
        self.hold_time = attributes.hold * tau;
        self.decay_time = attributes.decay * tau;
        self.upper_threshold = math::db_to_linear(attributes.upper_threshold);
        self.lower_threshold = math::db_to_linear(attributes.lower_threshold);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.set_attributes(self.attributes);
    }

    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Gain calculated by the last call to [`Gate::run`], within [0, 1].
    #[must_use]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    #[must_use]
    pub fn key(&self) -> f32 {
        self.key
    }

    /// Close the gate and forget all detected energy.
    pub fn reset(&mut self) {
        for window in &mut self.windows {
            window.clear();
        }
        self.state = State::Idle { attack: 0 };
        self.key = 0.0;
        self.rms = 0.0;
        self.gain = 0.0;
    }

    pub fn push_samples(&mut self, first: f32, second: f32) {
        let key_1 = self.windows[0].push(first);
        let key_2 = self.windows[1].push(second);
        self.key = f32::max(key_1, key_2);
    }

    /// Advance the state machine by one sample and apply the new gain.
    pub fn run(&mut self, x: f32) -> f32 {
        self.rms = fabsf(self.key) * FRAC_1_SQRT_2;

        let (state, gain) = match self.state {
            State::Idle { attack } => self.idle(attack),
            State::Hold { hold } => self.hold(hold),
            State::Decay { decay } => self.decay(decay),
        };

        if state.phase() != self.state.phase() {
            log::trace!("Gate phase={:?} gain={:?}", state.phase(), gain);
        }
        self.state = state;
        self.gain = gain.clamp(0.0, 1.0);

        self.apply(x)
    }

    /// Apply the gain of the last step without advancing the state machine.
    #[must_use]
    pub fn apply(&self, x: f32) -> f32 {
        x * self.gain
    }

    fn idle(&self, attack: u32) -> (State, f32) {
        let mut rms = self.rms;
        if attack != 0 && rms < self.upper_threshold {
            rms += ATTACK_HYSTERESIS;
        }

        if rms > self.upper_threshold {
            self.attack(attack)
        } else if attack != 0 {
            if attack as f32 > self.hold_time {
                (State::Hold { hold: 0 }, 1.0)
            } else {
                // Continue from the current gain down the decay ramp.
                let gain = math::quadratic_ramp(attack as f32, self.attack_time);
                let opened = attack as f32 / self.attack_time;
                let decay = ceilf(self.decay_time * (1.0 - opened)).max(0.0) as u32;
                (State::Decay { decay }, gain)
            }
        } else {
            (State::Idle { attack: 0 }, 0.0)
        }
    }

    fn hold(&self, hold: u32) -> (State, f32) {
        if self.rms > self.lower_threshold {
            return (State::Hold { hold: 0 }, 1.0);
        }

        let hold = hold.saturating_add(1);
        if hold as f32 >= self.hold_time {
            (State::Decay { decay: 0 }, 1.0)
        } else {
            (State::Hold { hold }, 1.0)
        }
    }

    fn decay(&self, decay: u32) -> (State, f32) {
        if self.rms > self.upper_threshold {
            // Resume attack from the position matching the last decay gain.
            let attack = floorf(self.attack_time * sqrtf(self.gain)) as u32;
            self.attack(attack)
        } else if decay as f32 > self.decay_time {
            (State::Idle { attack: 0 }, 0.0)
        } else {
            let gain = math::quadratic_ramp(self.decay_time - decay as f32, self.decay_time);
            (State::Decay { decay: decay.saturating_add(1) }, gain)
        }
    }

    // One step of the attack ramp, opening fully once it passes attack time.
    fn attack(&self, attack: u32) -> (State, f32) {
        let attack = attack.saturating_add(1);
        if attack as f32 > self.attack_time {
            (State::Hold { hold: 0 }, 1.0)
        } else {
            let gain = math::quadratic_ramp(attack as f32, self.attack_time);
            (State::Idle { attack }, gain)
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
