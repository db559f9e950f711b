//! Chorus / flanger effect.
//!
//! Both are the same modulated short delay; the type selector only swaps the
//! delay window the LFO sweeps (chorus 5-30ms, flanger 1-5ms).  A phase
//! offset detunes the right channel LFO for stereo width.
use std::sync::Arc;

use num::FromPrimitive;
use serde_json::json;

use super::controls::{EffectSetting, SettingType, SettingUnit};
use super::effect::Effect;
use super::engine::{EffectMode, ModDelayEngine};
use super::params::EngineParams;

pub struct ChorusFlanger {
    pub bypass: bool,
    settings: Vec<EffectSetting<f64>>,
    effect_type: EffectSetting<i64>,
    params: Arc<EngineParams>,
    engine: ModDelayEngine,
}

impl ChorusFlanger {
    pub fn new() -> ChorusFlanger {
        let mut fx = ChorusFlanger {
            bypass: false,
            settings: Vec::new(),
            effect_type: EffectSetting::new(
                SettingUnit::Selector,
                SettingType::Linear,
                "type",
                vec![String::from("chorus"), String::from("flanger")],
                0,
                0,
                1,
                1,
            ),
            params: Arc::new(EngineParams::new(EffectMode::Chorus)),
            engine: ModDelayEngine::new(),
        };
        fx.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "mix",
            vec![],
            0.5,
            0.0,
            1.0,
            0.01,
        ));
        fx.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "depth",
            vec![],
            0.5,
            0.0,
            1.0,
            0.01,
        ));
        fx.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "rate",
            vec![],
            10.0,
            0.1,
            20.0,
            0.1,
        ));
        fx.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "phase",
            vec![],
            0.0,
            0.0,
            0.99,
            0.01,
        ));
        fx.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "feedback",
            vec![],
            0.5,
            0.0,
            0.98,
            0.01,
        ));
        fx.load_from_settings();
        fx
    }

    pub fn params_handle(&self) -> Arc<EngineParams> {
        self.params.clone()
    }
}

impl Effect for ChorusFlanger {
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
        match val.as_i64() {
            Some(i) => {
                if name == "type" {
                    self.effect_type.set_value(i);
                }
            }
            _ => (),
        }
    }

    fn load_from_settings(&mut self) -> () {
        for setting in &mut self.settings {
            if setting.dirty {
                match setting.get_name() {
                    "mix" => {
                        self.params.dry_wet.set(setting.get_value() as f32);
                    }
                    "depth" => {
                        self.params.depth.set(setting.get_value() as f32);
                    }
                    "rate" => {
                        self.params.rate.set(setting.get_value() as f32);
                    }
                    "phase" => {
                        self.params.phase_offset.set(setting.get_value() as f32);
                    }
                    "feedback" => {
                        self.params.feedback.set(setting.get_value() as f32);
                    }
                    _ => (),
                }
                setting.dirty = false;
            }
        }
        if self.effect_type.dirty {
            // selector index 0/1 lines up with Chorus/Flanger right after None
            let mode = FromPrimitive::from_i64(self.effect_type.get_value() + 1)
                .unwrap_or(EffectMode::Chorus);
            self.params.mode.set(mode);
            self.effect_type.dirty = false;
        }
    }

    fn prepare(&mut self, sample_rate: f32, _block_size: usize) -> () {
        self.engine.prepare(sample_rate, self.params.delay_time.get());
    }

    fn release(&mut self) -> () {
        self.engine.release();
    }

    fn do_algorithm(&mut self, left: &mut [f32], right: &mut [f32]) -> () {
        self.engine.process(&self.params, left, right);
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
        settings.push(self.effect_type.as_json(i));
        json!({
            "index": idx,
            "name": "Chorus/Flanger",
            "settings": settings,
        })
    }
}
