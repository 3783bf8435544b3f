//! Fixed compression characters, leaving only the release to the user.

use super::processor::Attributes;

const ATTACK_IN_SECONDS: f32 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    Light,
    Medium,
    Heavy,
    Extreme,
}

impl Preset {
    #[must_use]
    pub fn attributes(self, release: f32) -> Attributes {
        let (threshold, knee, ratio, makeup) = match self {
            Self::Light => (-12.0, 12.0, 2.0, -3.0),
            Self::Medium => (-12.0, 12.0, 3.0, -3.0),
            Self::Heavy => (-15.0, 15.0, 4.0, -3.0),
            Self::Extreme => (-25.0, 15.0, 10.0, -6.0),
        };
        Attributes {
            threshold,
            knee,
            ratio,
            attack: ATTACK_IN_SECONDS,
            release,
            makeup,
        }
    }
}
