//! Feed-forward stereo compressor with a soft knee.
//!
//! Based on the README of <https://github.com/p-hlp/CTAGDRC>.

mod envelope;
pub mod gain_computer;
mod preset;
pub mod processor;

pub use gain_computer::gain_reduction;
pub use preset::Preset;
pub use processor::{Attributes, Compressor};
