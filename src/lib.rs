//! basicfx - small real-time stereo audio effects
//!
//! provides three effects (gain, delay, chorus/flanger) built around one
//! shared fractional-delay engine.  The effects are driven from a control
//! surface through JSON settings and can be chained on an
//! [`EffectRack`](crate::effects::rack::EffectRack).
#[macro_use]
extern crate num_derive;

pub mod dsp;
pub mod effects;
pub mod utils;
