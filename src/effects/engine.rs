//! The shared mod-delay engine.
//!
//! One parameterized engine covers the delay and the chorus/flanger - the
//! three effects differ only in how the per sample delay target is produced,
//! so the mode picks the mapping instead of duplicating the whole loop.
//!
//! ```text
//!          ┌───────────────────────────────────────────┐
//!          │                                           │
//!          │             ┌────────────┐                ▼
//!          │    ┌────┐   │            │    ┌─────┐   ┌────┐
//!  Input───┴───►│Sum ├──►│ DelayLine  ├─┬─►│ Wet ├──►│Sum ├───► Output
//!               └────┘   │  (per ch)  │ │  └─────┘   └────┘
//!                 ▲      └────────────┘ │               ▲
//!                 │            ▲        │               │
//!                 │            │        │          Dry = 1 - Wet
//!                 │         ┌──┴──┐     │
//!                 │         │ LFO │     │
//!                 │         └─────┘     │
//!                 │        ┌────────┐   │
//!                 └────────┤Feedback│◄──┘
//!                          └────────┘
//!                            0-0.98
//! ```
use log::info;

use crate::dsp::delay_line::DelayLine;
use crate::dsp::low_freq_osc::LowFreqOsc;
use crate::dsp::smoothing_filter::SmoothingFilter;

use super::params::EngineParams;

/// Longest delay the engine supports.  Buffer capacity is derived from this
/// at prepare time.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

/// Chorus sweeps a wide, slow window; flanger a narrow, tight one.  The LFO
/// output in [-1, 1] maps affinely onto these windows (seconds).
const CHORUS_WINDOW: (f32, f32) = (0.005, 0.03);
const FLANGER_WINDOW: (f32, f32) = (0.001, 0.005);

/// Smoothing for the fixed delay time.  Slow on purpose - dragging the time
/// knob should warble like a tape machine, not click.
const DELAY_TIME_SMOOTHING: f32 = 0.001;

#[derive(ToPrimitive, FromPrimitive, Clone, Copy, PartialEq, Debug)]
pub enum EffectMode {
    None,
    Chorus,
    Flanger,
    FixedDelay,
}

/// Affine remap of an LFO value in [-1, 1] onto [lo, hi].
pub fn map_to_range(value: f32, lo: f32, hi: f32) -> f32 {
    lo + (value + 1.0) / 2.0 * (hi - lo)
}

pub struct ModDelayEngine {
    left: DelayLine,
    right: DelayLine,
    osc: LowFreqOsc<f32>,
    time_smoother: SmoothingFilter<f32>,
    sample_rate: f32,
    /// longest delay (seconds) that still reads strictly inside the buffer
    max_delay: f32,
}

impl ModDelayEngine {
    pub fn new() -> ModDelayEngine {
        ModDelayEngine {
            left: DelayLine::new(),
            right: DelayLine::new(),
            osc: LowFreqOsc::new(),
            time_smoother: SmoothingFilter::new(DELAY_TIME_SMOOTHING),
            sample_rate: 0.0,
            max_delay: 0.0,
        }
    }

    /// Size and zero the buffers for the host sample rate, reset the LFO
    /// phase, the feedback state and the time smoother.  Runs on the control
    /// thread; the host guarantees no process call is in flight.
    pub fn prepare(&mut self, sample_rate: f32, initial_delay_time: f32) -> () {
        let capacity = (sample_rate * MAX_DELAY_SECONDS).ceil() as usize;
        self.left.reallocate(capacity);
        self.right.reallocate(capacity);
        self.osc.reset();
        self.sample_rate = sample_rate;
        // capped one sample short of capacity so a read can never land on the
        // slot the write head is about to reuse
        self.max_delay = (capacity.saturating_sub(1)) as f32 / sample_rate;
        self.time_smoother
            .reset(initial_delay_time.min(self.max_delay));
        info!(
            "engine prepared: rate {} capacity {} samples",
            sample_rate, capacity
        );
    }

    /// Drop the buffers.  No process calls until the next prepare.
    pub fn release(&mut self) -> () {
        self.left.release();
        self.right.release();
    }

    /// Process one block in place.  Parameters are re-read from their cells
    /// at the top of every sample, so a knob turned mid block lands mid
    /// block.  Nothing in here allocates, locks, or branches on error.
    pub fn process(&mut self, params: &EngineParams, left: &mut [f32], right: &mut [f32]) -> () {
        for (samp_l, samp_r) in left.iter_mut().zip(right.iter_mut()) {
            let mode = params.mode.get();
            if mode == EffectMode::None {
                continue;
            }
            let dry_wet = params.dry_wet.get();
            let feedback = params.feedback.get();

            // 1. per channel delay target in seconds
            let (time_l, time_r) = match mode {
                EffectMode::Chorus | EffectMode::Flanger => {
                    let depth = params.depth.get();
                    let (lo, hi) = if mode == EffectMode::Chorus {
                        CHORUS_WINDOW
                    } else {
                        FLANGER_WINDOW
                    };
                    let phase_r =
                        LowFreqOsc::offset_phase(self.osc.get_phase(), params.phase_offset.get());
                    let osc_l = self.osc.value() * depth;
                    let osc_r = self.osc.value_at(phase_r) * depth;
                    self.osc.advance(params.rate.get(), self.sample_rate);
                    (map_to_range(osc_l, lo, hi), map_to_range(osc_r, lo, hi))
                }
                _ => {
                    let target = params.delay_time.get().min(self.max_delay);
                    let time = self.time_smoother.get(target);
                    (time, time)
                }
            };

            // 2. seconds to samples
            let delay_l = time_l * self.sample_rate;
            let delay_r = time_r * self.sample_rate;

            // 3. write input plus feedback
            self.left.write(*samp_l);
            self.right.write(*samp_r);

            // 4/5. fractional read
            let wet_l = self.left.read_fractional(delay_l);
            let wet_r = self.right.read_fractional(delay_r);

            // 6. feedback for the next write
            self.left.set_feedback(feedback * wet_l);
            self.right.set_feedback(feedback * wet_r);

            // 7. heads move after both channels are done
            self.left.advance();
            self.right.advance();

            // 8. plain linear crossfade, not equal power
            *samp_l = *samp_l * (1.0 - dry_wet) + wet_l * dry_wet;
            *samp_r = *samp_r * (1.0 - dry_wet) + wet_r * dry_wet;
        }
    }
}

#[cfg(test)]
mod test_mod_delay_engine {
    use super::*;

    fn prepared_engine(params: &EngineParams) -> ModDelayEngine {
        let mut engine = ModDelayEngine::new();
        engine.prepare(44100.0, params.delay_time.get());
        engine
    }

    #[test]
    fn map_to_range_covers_the_window() {
        assert_eq!(map_to_range(-1.0, 0.005, 0.03), 0.005);
        assert!((map_to_range(1.0, 0.005, 0.03) - 0.03).abs() < 1e-7);
        // lfo at rest sits on the window midpoint
        assert!((map_to_range(0.0, 0.005, 0.03) - 0.0175).abs() < 1e-7);
    }

    #[test]
    fn chorus_window_at_the_lfo_quarter_points() {
        // phase 0 -> sin 0 -> 17.5ms, phase 0.25 -> sin 1 -> 30ms
        let osc: LowFreqOsc<f32> = LowFreqOsc::new();
        let mapped_mid = map_to_range(osc.value_at(0.0), CHORUS_WINDOW.0, CHORUS_WINDOW.1);
        let mapped_peak = map_to_range(osc.value_at(0.25), CHORUS_WINDOW.0, CHORUS_WINDOW.1);
        assert!((mapped_mid - 0.0175).abs() < 1e-6);
        assert!((mapped_peak - 0.03).abs() < 1e-6);
    }

    #[test]
    fn none_mode_is_a_pass_through() {
        let params = EngineParams::new(EffectMode::None);
        let mut engine = prepared_engine(&params);
        let mut left = vec![0.1, -0.2, 0.3];
        let mut right = left.clone();
        engine.process(&params, &mut left, &mut right);
        assert_eq!(left, vec![0.1, -0.2, 0.3]);
        assert_eq!(right, left);
    }

    #[test]
    fn fixed_delay_moves_an_impulse() {
        let params = EngineParams::new(EffectMode::FixedDelay);
        params.delay_time.set(0.5);
        params.feedback.set(0.0);
        params.dry_wet.set(1.0);
        let mut engine = prepared_engine(&params);

        let n = 44100;
        let mut left = vec![0.0f32; n];
        let mut right = vec![0.0f32; n];
        left[0] = 1.0;
        right[0] = 1.0;
        engine.process(&params, &mut left, &mut right);

        // 0.5s at 44100 is exactly 22050 samples
        assert_eq!(left[22050], 1.0);
        assert_eq!(right[22050], 1.0);
        let energy: f32 = left.iter().map(|s| s.abs()).sum();
        assert!((energy - 1.0).abs() < 1e-5);
    }

    #[test]
    fn feedback_stays_bounded() {
        let params = EngineParams::new(EffectMode::FixedDelay);
        params.delay_time.set(0.1);
        params.feedback.set(0.9);
        params.dry_wet.set(1.0);
        let mut engine = prepared_engine(&params);

        let mut left = vec![0.0f32; 4410];
        let mut right = vec![0.0f32; 4410];
        left[0] = 1.0;
        right[0] = 1.0;
        // run 50 blocks (5 seconds) of silence after the impulse
        engine.process(&params, &mut left, &mut right);
        for _ in 0..50 {
            let mut l = vec![0.0f32; 4410];
            let mut r = vec![0.0f32; 4410];
            engine.process(&params, &mut l, &mut r);
            for s in l.iter().chain(r.iter()) {
                assert!(s.is_finite());
                assert!(s.abs() <= 1.0);
            }
        }
    }

    #[test]
    fn zero_wet_is_bit_exact_dry() {
        let params = EngineParams::new(EffectMode::Chorus);
        params.dry_wet.set(0.0);
        let mut engine = prepared_engine(&params);
        let input: Vec<f32> = (0..256).map(|i| ((i * 7919) % 101) as f32 / 101.0).collect();
        let mut left = input.clone();
        let mut right = input.clone();
        engine.process(&params, &mut left, &mut right);
        // dry * (1 - 0) + wet * 0 must reproduce the input exactly
        assert_eq!(left, input);
        assert_eq!(right, input);
    }

    #[test]
    fn delay_target_never_reaches_capacity() {
        let params = EngineParams::new(EffectMode::FixedDelay);
        // ask for more than the engine supports; the cap must hold
        params.delay_time.set(10.0);
        params.dry_wet.set(1.0);
        params.feedback.set(0.0);
        let mut engine = prepared_engine(&params);
        let mut left = vec![0.0f32; 1024];
        let mut right = vec![0.0f32; 1024];
        left[0] = 1.0;
        right[0] = 1.0;
        // would panic on an out of range read if the cap failed
        engine.process(&params, &mut left, &mut right);
    }
}
