//! Noise gate driven by a hysteretic Idle/Hold/Decay state machine.
//!
//! ```text
//! Idle  --(above upper threshold, attack ramp done)--> Hold
//! Idle  --(dropped during attack, past hold time)----> Hold
//! Idle  --(dropped during attack)--------------------> Decay
//! Hold  --(below lower threshold for hold time)------> Decay
//! Decay --(above upper threshold, ramp turns up)-----> Idle
//! Decay --(decay ramp done)--------------------------> Idle
//! ```

pub mod processor;
pub mod state_machine;

pub use processor::{GateProcessor, Mode};
pub use state_machine::{Attributes, Gate, Phase};
