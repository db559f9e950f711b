//! Gain effect.  One knob, smoothed so a fast drag never clicks.
use std::sync::Arc;

use serde_json::json;

use crate::dsp::smoothing_filter::SmoothingFilter;

use super::controls::{EffectSetting, SettingType, SettingUnit};
use super::effect::Effect;
use super::params::FloatCell;

/// smoothing per sample for the gain value
const GAIN_SMOOTHING: f32 = 0.004;

pub struct GainParams {
    pub gain: FloatCell,
}

pub struct Gain {
    pub bypass: bool,
    settings: Vec<EffectSetting<f64>>,
    params: Arc<GainParams>,
    smoother: SmoothingFilter<f32>,
}

impl Gain {
    pub fn new() -> Gain {
        let mut gain = Gain {
            bypass: false,
            settings: Vec::new(),
            params: Arc::new(GainParams {
                gain: FloatCell::new(0.5),
            }),
            smoother: SmoothingFilter::new(GAIN_SMOOTHING),
        };
        gain.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "gain",
            vec![],
            0.5,
            0.0,
            1.0,
            0.01,
        ));
        gain.load_from_settings();
        gain
    }

    /// Handle for a control thread that wants to poke the cell directly.
    pub fn params_handle(&self) -> Arc<GainParams> {
        self.params.clone()
    }
}

impl Effect for Gain {
    fn do_change_a_value(&mut self, name: &str, val: &serde_json::Value) {
        match val.as_f64() {
            Some(f) => {
                for setting in &mut self.settings {
                    if setting.get_name() == name {
                        setting.set_value(f);
                    }
                }
            }
            _ => (),
        }
    }

    fn load_from_settings(&mut self) -> () {
        for setting in &mut self.settings {
            if setting.dirty {
                match setting.get_name() {
                    "gain" => {
                        self.params.gain.set(setting.get_value() as f32);
                    }
                    _ => (),
                }
                setting.dirty = false;
            }
        }
    }

    fn prepare(&mut self, _sample_rate: f32, _block_size: usize) -> () {
        self.smoother.reset(self.params.gain.get());
    }

    fn release(&mut self) -> () {}

    fn do_algorithm(&mut self, left: &mut [f32], right: &mut [f32]) -> () {
        for (samp_l, samp_r) in left.iter_mut().zip(right.iter_mut()) {
            let g = self.smoother.get(self.params.gain.get());
            *samp_l *= g;
            *samp_r *= g;
        }
    }

    fn bypass(&self) -> bool {
        self.bypass
    }
    fn set_my_bypass(&mut self, val: bool) -> () {
        self.bypass = val;
    }

    fn as_json(&self, idx: usize) -> serde_json::Value {
        let mut settings: Vec<serde_json::Value> = vec![self.make_bypass()];
        let mut i = 1;
        for item in &self.settings {
            settings.push(item.as_json(i));
            i += 1;
        }
        json!({
            "index": idx,
            "name": "Gain",
            "settings": settings,
        })
    }
}

#[cfg(test)]
mod test_gain_effect {
    use super::*;

    #[test]
    fn can_build() {
        let mut gain = Gain::new();
        gain.prepare(44100.0, 128);
        let mut left = vec![0.2, 0.3, 0.4];
        let mut right = left.clone();
        gain.process(&mut left, &mut right);
        // smoother starts on target so this is a clean scale by 0.5
        assert!((left[0] - 0.1).abs() < 1e-6);
        println!("json: {}", gain.as_json(0));
    }

    #[test]
    fn bypass_leaves_the_block_alone() {
        let mut gain = Gain::new();
        gain.prepare(44100.0, 128);
        gain.set_my_bypass(true);
        let mut left = vec![0.2, 0.3];
        let mut right = vec![0.5, 0.6];
        gain.process(&mut left, &mut right);
        assert_eq!(left, vec![0.2, 0.3]);
        assert_eq!(right, vec![0.5, 0.6]);
    }

    #[test]
    fn setting_change_ramps_not_jumps() {
        let mut gain = Gain::new();
        gain.prepare(44100.0, 128);
        gain.change_setting(serde_json::json!({"name": "gain", "value": 1.0}));
        let mut left = vec![1.0; 4];
        let mut right = vec![1.0; 4];
        gain.process(&mut left, &mut right);
        // ramping up from 0.5 toward 1.0, monotonic, no step
        assert!(left[0] > 0.5 && left[0] < 1.0);
        assert!(left[1] > left[0]);
        assert!(left[3] < 1.0);
    }

    #[test]
    fn out_of_range_setting_is_clamped() {
        let mut gain = Gain::new();
        gain.change_setting(serde_json::json!({"name": "gain", "value": 7.5}));
        assert_eq!(gain.params_handle().gain.get(), 1.0);
    }
}
