//! stereo effects that can be chained on an effect rack
//!
//! All effects implement the [`Effect`](crate::effects::effect::Effect) trait
//! so the [`EffectRack`](crate::effects::rack::EffectRack) can hold an
//! arbitrary chain.  The delay and chorus/flanger share one
//! [`ModDelayEngine`](crate::effects::engine::ModDelayEngine).

pub mod chorus_flanger;
pub mod controls;
pub mod delay;
pub mod effect;
pub mod engine;
pub mod gain;
pub mod params;
pub mod rack;
