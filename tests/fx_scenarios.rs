//! End to end scenarios run through the public effect interface, the same way
//! a host would: prepare, settings over JSON, then block processing.
use basicfx_rust::effects::chorus_flanger::ChorusFlanger;
use basicfx_rust::effects::delay::Delay;
use basicfx_rust::effects::effect::Effect;
use basicfx_rust::effects::gain::Gain;
use basicfx_rust::effects::rack::EffectRack;
use serde_json::json;

const SAMPLE_RATE: f32 = 44100.0;

fn impulse(len: usize) -> (Vec<f32>, Vec<f32>) {
    let mut left = vec![0.0f32; len];
    let mut right = vec![0.0f32; len];
    left[0] = 1.0;
    right[0] = 1.0;
    (left, right)
}

#[test]
fn half_second_delay_moves_an_impulse_to_22050() {
    let mut delay = Delay::new();
    delay.change_setting(json!({"name": "duration", "value": 500.0}));
    delay.change_setting(json!({"name": "feedback", "value": 0.0}));
    delay.change_setting(json!({"name": "mix", "value": 1.0}));
    delay.prepare(SAMPLE_RATE, 1024);

    let (mut left, mut right) = impulse(44100);
    delay.process(&mut left, &mut right);

    for (i, samp) in left.iter().enumerate() {
        if i == 22050 {
            assert!((samp - 1.0).abs() < 1e-6, "echo missing at 22050: {}", samp);
        } else {
            assert!(samp.abs() < 1e-6, "unexpected output {} at {}", samp, i);
        }
    }
    assert_eq!(left, right);
}

#[test]
fn fully_dry_delay_is_bit_exact() {
    let mut delay = Delay::new();
    delay.change_setting(json!({"name": "mix", "value": 0.0}));
    delay.prepare(SAMPLE_RATE, 512);

    let input: Vec<f32> = (0..2048)
        .map(|i| ((i as f32) * 0.013).sin() * 0.7)
        .collect();
    let mut left = input.clone();
    let mut right = input.clone();
    // process in host sized blocks
    for start in (0..input.len()).step_by(512) {
        let end = start + 512;
        delay.process(&mut left[start..end], &mut right[start..end]);
    }
    assert_eq!(left, input);
    assert_eq!(right, input);
}

#[test]
fn chorus_at_rest_echoes_at_the_window_midpoint() {
    // with the LFO parked at phase 0 the chorus tap sits at the midpoint of
    // 5-30ms: 17.5ms = 771.75 samples at 44100
    let mut fx = ChorusFlanger::new();
    fx.change_setting(json!({"name": "depth", "value": 1.0}));
    fx.change_setting(json!({"name": "phase", "value": 0.0}));
    fx.change_setting(json!({"name": "feedback", "value": 0.0}));
    fx.change_setting(json!({"name": "mix", "value": 1.0}));
    // park the LFO: a control thread writes the cell directly
    fx.params_handle().rate.set(0.0);
    fx.prepare(SAMPLE_RATE, 1024);

    let (mut left, mut right) = impulse(2048);
    fx.process(&mut left, &mut right);

    // the fractional tap splits the impulse; the peak lands one past the
    // integer part of 771.75 with weight ~0.75
    let peak_idx = left
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().partial_cmp(&b.1.abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak_idx, 772);
    // the window midpoint is not exactly representable, so the split between
    // the two bracketing samples carries a little float noise
    assert!((left[772] - 0.75).abs() < 1e-3);
    assert!((left[771] - 0.25).abs() < 1e-3);
    assert!((left[771] + left[772] - 1.0).abs() < 1e-5);
}

#[test]
fn flanger_echo_arrives_sooner_than_chorus() {
    let first_echo = |type_idx: i64| -> usize {
        let mut fx = ChorusFlanger::new();
        fx.change_setting(json!({"name": "type", "value": type_idx}));
        fx.change_setting(json!({"name": "depth", "value": 1.0}));
        fx.change_setting(json!({"name": "feedback", "value": 0.0}));
        fx.change_setting(json!({"name": "mix", "value": 1.0}));
        fx.params_handle().rate.set(0.0);
        fx.prepare(SAMPLE_RATE, 1024);
        let (mut left, mut right) = impulse(2048);
        fx.process(&mut left, &mut right);
        left.iter().position(|s| s.abs() > 0.1).unwrap()
    };
    let chorus = first_echo(0);
    let flanger = first_echo(1);
    // flanger window is 1-5ms, chorus 5-30ms
    assert!(flanger < chorus);
    assert!(flanger >= (0.001 * SAMPLE_RATE) as usize);
    assert!(chorus >= (0.005 * SAMPLE_RATE) as usize);
}

#[test]
fn feedback_tail_decays_instead_of_growing() {
    let mut delay = Delay::new();
    // 250ms is exactly 11025 samples at 44100, so the echoes stay aligned
    delay.change_setting(json!({"name": "duration", "value": 250.0}));
    delay.change_setting(json!({"name": "feedback", "value": 0.9}));
    delay.change_setting(json!({"name": "mix", "value": 1.0}));
    delay.prepare(SAMPLE_RATE, 1024);

    let (mut left, mut right) = impulse(22050);
    delay.process(&mut left, &mut right);
    let mut peak_early = 0.0f32;
    for s in &left {
        peak_early = peak_early.max(s.abs());
    }
    // the first echo comes through at full level
    assert!((peak_early - 1.0).abs() < 1e-6);

    // ten more seconds of silence through the feedback loop; every echo is
    // 0.9x the last, nothing may grow or go non-finite
    let mut peak_final = 0.0f32;
    for block in 0..100 {
        let mut l = vec![0.0f32; 4410];
        let mut r = vec![0.0f32; 4410];
        delay.process(&mut l, &mut r);
        for s in l.iter().chain(r.iter()) {
            assert!(s.is_finite());
            assert!(s.abs() <= 1.0);
        }
        if block == 99 {
            for s in &l {
                peak_final = peak_final.max(s.abs());
            }
        }
    }
    assert!(peak_final < 0.01, "tail failed to decay: {}", peak_final);
}

#[test]
fn gain_scales_and_release_then_prepare_recovers() {
    let mut gain = Gain::new();
    gain.change_setting(json!({"name": "gain", "value": 0.25}));
    gain.prepare(SAMPLE_RATE, 64);
    let mut left = vec![1.0f32; 64];
    let mut right = vec![1.0f32; 64];
    gain.process(&mut left, &mut right);
    assert!((left[0] - 0.25).abs() < 1e-6);

    gain.release();
    gain.prepare(SAMPLE_RATE, 64);
    let mut left = vec![1.0f32; 64];
    let mut right = vec![1.0f32; 64];
    gain.process(&mut left, &mut right);
    assert!((left[0] - 0.25).abs() < 1e-6);
}

#[test]
fn rack_chains_gain_into_delay() {
    let mut rack = EffectRack::new();
    rack.insert_effect("Gain", 0);
    rack.insert_effect("Delay", 1);
    rack.change_effect_setting(0, json!({"name": "gain", "value": 0.5}));
    rack.change_effect_setting(1, json!({"name": "duration", "value": 250.0}));
    rack.change_effect_setting(1, json!({"name": "feedback", "value": 0.0}));
    rack.change_effect_setting(1, json!({"name": "mix", "value": 1.0}));
    rack.prepare(SAMPLE_RATE, 1024);

    let (mut left, mut right) = impulse(22050);
    rack.process(&mut left, &mut right);

    // impulse scaled by the gain first, then delayed 250ms = 11025 samples
    assert!((left[11025] - 0.5).abs() < 1e-6);
    assert_eq!(left, right);
}

#[test]
fn delay_survives_a_sample_rate_change() {
    let mut delay = Delay::new();
    delay.change_setting(json!({"name": "duration", "value": 500.0}));
    delay.change_setting(json!({"name": "feedback", "value": 0.0}));
    delay.change_setting(json!({"name": "mix", "value": 1.0}));
    delay.prepare(22050.0, 1024);
    let (mut left, mut right) = impulse(22050);
    delay.process(&mut left, &mut right);
    // 0.5s at 22050 Hz
    assert!((left[11025] - 1.0).abs() < 1e-6);

    // host changes rate; buffers resize and old state is gone
    delay.prepare(SAMPLE_RATE, 1024);
    let (mut left, mut right) = impulse(44100);
    delay.process(&mut left, &mut right);
    assert!((left[22050] - 1.0).abs() < 1e-6);
    let energy: f32 = left.iter().map(|s| s.abs()).sum();
    assert!((energy - 1.0).abs() < 1e-4);
}
