//! One-pole smoothing of the gain with separate attack and release.
//!
//! Based on <https://www.earlevel.com/main/2012/12/15/a-one-pole-filter/>,
//! with the pole picked by the direction the gain moves in. Deeper reduction
//! follows the attack time, recovery follows the release time.

use libm::expf;

#[derive(Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Envelope {
    y_m1: f32,
    alpha_attack: f32,
    alpha_release: f32,
}

impl Envelope {
    pub fn set_times(&mut self, sample_rate: f32, attack: f32, release: f32) {
        self.alpha_attack = coefficient(sample_rate, attack);
        self.alpha_release = coefficient(sample_rate, release);
    }

    pub fn tick(&mut self, x: f32) -> f32 {
        let alpha = if x < self.y_m1 {
            self.alpha_attack
        } else {
            self.alpha_release
        };
        self.y_m1 = alpha * self.y_m1 + (1.0 - alpha) * x;
        self.y_m1
    }

    pub fn value(&self) -> f32 {
        self.y_m1
    }

    pub fn reset(&mut self) {
        self.y_m1 = 0.0;
    }
}

// Time is in seconds. Zero time makes the filter follow its input instantly.
fn coefficient(sample_rate: f32, time: f32) -> f32 {
    if time > 0.0 {
        expf(-1.0 / (sample_rate * time))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_time_follows_input_instantly() {
        let mut envelope = Envelope::default();
        envelope.set_times(48_000.0, 0.0, 0.0);
        assert_relative_eq!(envelope.tick(-6.0), -6.0);
        assert_relative_eq!(envelope.tick(0.0), 0.0);
    }

    #[test]
    fn reach_63_percent_after_one_time_constant() {
        let mut envelope = Envelope::default();
        envelope.set_times(1000.0, 0.1, 1.0);
        for _ in 0..100 {
            envelope.tick(-10.0);
        }
        assert_relative_eq!(envelope.value(), -6.321, epsilon = 0.01);
    }

    #[test]
    fn attack_faster_than_release() {
        let mut envelope = Envelope::default();
        envelope.set_times(1000.0, 0.01, 0.1);

        for _ in 0..10 {
            envelope.tick(-10.0);
        }
        let attacked = envelope.value();
        let attack_progress = attacked / -10.0;

        for _ in 0..10 {
            envelope.tick(0.0);
        }
        let release_progress = (envelope.value() - attacked) / -attacked;

        assert!(attack_progress > 0.6);
        assert!(release_progress < 0.1);
    }

    #[test]
    fn reset_returns_to_unity() {
        let mut envelope = Envelope::default();
        envelope.set_times(1000.0, 0.01, 0.1);
        envelope.tick(-10.0);
        envelope.reset();
        assert_relative_eq!(envelope.value(), 0.0);
    }
}
