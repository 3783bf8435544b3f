//! Dynamics processors that must run in real-time.
//!
//! Two independent paths are provided: a soft-knee stereo
//! [`compressor`](crate::compressor::Compressor) and a hysteretic noise
//! [`gate`](crate::gate::GateProcessor). Neither of them allocates, locks or
//! fails while processing a block. They are meant to be owned by a single
//! audio callback, which feeds them attributes once per block.
//!
//! ```text
//!   (samples) --> [ EnergyWindow ] --(key)--> [ Gate ] --> [ GateProcessor ]
//!
//!   (samples) --> [ gain_computer ] --(dB)--> [ Compressor ]
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
#[macro_use]
extern crate approx;

mod log;

pub mod compressor;
pub mod energy_window;
pub mod gate;
pub mod math;
