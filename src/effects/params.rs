//! Lock free parameter cells shared between the control surface and the audio
//! thread.
//!
//! The control thread stores, the audio thread loads once per sample.  Each
//! value is a single machine word so there are no torn reads, and a store
//! landing one block late is fine.  No locks anywhere near the audio side.
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use num::FromPrimitive;

use super::engine::EffectMode;

/// An f32 stored as its raw bits in an AtomicU32.
pub struct FloatCell {
    bits: AtomicU32,
}

impl FloatCell {
    pub fn new(value: f32) -> FloatCell {
        FloatCell {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f32) -> () {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// The engine mode stored by discriminant.
pub struct ModeCell {
    value: AtomicUsize,
}

impl ModeCell {
    pub fn new(mode: EffectMode) -> ModeCell {
        ModeCell {
            value: AtomicUsize::new(num::ToPrimitive::to_usize(&mode).unwrap_or(0)),
        }
    }

    pub fn get(&self) -> EffectMode {
        FromPrimitive::from_usize(self.value.load(Ordering::Relaxed)).unwrap_or(EffectMode::None)
    }

    pub fn set(&self, mode: EffectMode) -> () {
        self.value.store(
            num::ToPrimitive::to_usize(&mode).unwrap_or(0),
            Ordering::Relaxed,
        );
    }
}

/// Every control the mod-delay engine reads, one atomic cell per scalar.
///
/// The delay effect uses dry_wet, feedback and delay_time; the chorus/flanger
/// uses dry_wet, feedback, rate, depth and phase_offset.  Unused cells just
/// sit at their defaults.
pub struct EngineParams {
    pub dry_wet: FloatCell,
    pub feedback: FloatCell,
    pub rate: FloatCell,
    pub depth: FloatCell,
    pub phase_offset: FloatCell,
    pub delay_time: FloatCell,
    pub mode: ModeCell,
}

impl EngineParams {
    pub fn new(mode: EffectMode) -> EngineParams {
        EngineParams {
            dry_wet: FloatCell::new(0.5),
            feedback: FloatCell::new(0.5),
            rate: FloatCell::new(10.0),
            depth: FloatCell::new(0.5),
            phase_offset: FloatCell::new(0.0),
            delay_time: FloatCell::new(0.5),
            mode: ModeCell::new(mode),
        }
    }
}
