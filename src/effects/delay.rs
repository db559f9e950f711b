//! Delay effect.  A fixed (unmodulated) tap on the shared mod-delay engine
//! with feedback and a dry/wet mix.
use std::sync::Arc;

use serde_json::json;

use super::controls::{EffectSetting, SettingType, SettingUnit};
use super::effect::Effect;
use super::engine::{EffectMode, ModDelayEngine};
use super::params::EngineParams;

pub struct Delay {
    pub bypass: bool,
    settings: Vec<EffectSetting<f64>>,
    params: Arc<EngineParams>,
    engine: ModDelayEngine,
}

impl Delay {
    pub fn new() -> Delay {
        let mut delay = Delay {
            bypass: false,
            settings: Vec::new(),
            params: Arc::new(EngineParams::new(EffectMode::FixedDelay)),
            engine: ModDelayEngine::new(),
        };
        delay.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Msec,
            "duration",
            vec![],
            500.0,
            100.0,
            2000.0,
            1.0,
        ));
        delay.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "feedback",
            vec![],
            0.5,
            0.0,
            0.98,
            0.01,
        ));
        delay.settings.push(EffectSetting::new(
            SettingUnit::Continuous,
            SettingType::Linear,
            "mix",
            vec![],
            0.5,
            0.0,
            1.0,
            0.01,
        ));
        delay.load_from_settings();
        delay
    }

    pub fn params_handle(&self) -> Arc<EngineParams> {
        self.params.clone()
    }
}

impl Effect for Delay {
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
                    "duration" => {
                        // knob is in msec, the engine wants seconds
                        self.params
                            .delay_time
                            .set(setting.stype.convert(setting.get_value()) as f32);
                    }
                    "feedback" => {
                        self.params.feedback.set(setting.get_value() as f32);
                    }
                    "mix" => {
                        self.params.dry_wet.set(setting.get_value() as f32);
                    }
                    _ => (),
                }
                setting.dirty = false;
            }
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
        json!({
            "index": idx,
            "name": "Delay",
            "settings": settings,
        })
    }
}
