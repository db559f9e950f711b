//! Sine LFO with a normalized phase accumulator.
//!
//! Phase lives in [0, 1) and wraps by a single subtraction, which is exact as
//! long as the per sample increment stays below 1 (always true for control
//! rates up to 20 Hz at audio sample rates).
use num::{Float, FromPrimitive, Zero};

pub struct LowFreqOsc<T> {
    phase: T,
    two_pi: T,
}

impl<T: Float + FromPrimitive> LowFreqOsc<T> {
    pub fn new() -> LowFreqOsc<T> {
        LowFreqOsc {
            phase: Zero::zero(),
            two_pi: T::from_f64(std::f64::consts::PI * 2.0).unwrap(),
        }
    }

    pub fn get_phase(&self) -> T {
        self.phase
    }

    pub fn reset(&mut self) -> () {
        self.phase = Zero::zero();
    }

    /// Advance the phase by rate / sample_rate, wrapping above 1 by
    /// subtracting exactly 1.  A zero sample rate leaves the phase alone so
    /// the increment can never divide by zero.
    pub fn advance(&mut self, rate: T, sample_rate: T) -> () {
        if sample_rate > Zero::zero() {
            self.phase = self.phase + rate / sample_rate;
            if self.phase >= T::one() {
                self.phase = self.phase - T::one();
            }
        }
    }

    /// Oscillator output at the current phase, in [-1, 1].
    pub fn value(&self) -> T {
        self.value_at(self.phase)
    }

    /// Output at an arbitrary phase.  Used for the offset right channel.
    pub fn value_at(&self, phase: T) -> T {
        T::sin(self.two_pi * phase)
    }

    /// Phase shifted for the opposite stereo channel.  The offset must stay
    /// in [0, 1); a single subtraction cannot wrap twice.
    pub fn offset_phase(phase: T, offset: T) -> T {
        let shifted = phase + offset;
        if shifted >= T::one() {
            shifted - T::one()
        } else {
            shifted
        }
    }
}
