//! A chain of effects processed in order, stereo in place.
use log::info;
use serde_json::json;

use super::chorus_flanger::ChorusFlanger;
use super::delay::Delay;
use super::effect::Effect;
use super::gain::Gain;

type BoxedEffect = std::boxed::Box<
    dyn Effect
        + std::marker::Send // needed for threads
        + std::marker::Sync, // needed for threads
>;

pub struct EffectRack {
    effects: Vec<BoxedEffect>,
    /// set once the host has called prepare; newly inserted effects get
    /// prepared to match
    prepared: Option<(f32, usize)>,
}

impl EffectRack {
    pub fn new() -> EffectRack {
        EffectRack {
            effects: vec![],
            prepared: None,
        }
    }

    pub fn get_effect_types() -> serde_json::Value {
        json!({
          "Gain": "Output level",
          "Delay": "Fixed delay with feedback",
          "Chorus/Flanger": "Modulated short delay",
        })
    }

    pub fn num_effects(&self) -> usize {
        self.effects.len()
    }

    fn make_effect(type_name: &str) -> Option<BoxedEffect> {
        match type_name {
            "Gain" => Some(Box::new(Gain::new())),
            "Delay" => Some(Box::new(Delay::new())),
            "Chorus/Flanger" => Some(Box::new(ChorusFlanger::new())),
            _ => {
                info!("no effect type named {}", type_name);
                None
            }
        }
    }

    pub fn insert_effect(&mut self, type_name: &str, idx: usize) -> () {
        match Self::make_effect(type_name) {
            Some(mut fx) => {
                if let Some((sample_rate, block_size)) = self.prepared {
                    fx.prepare(sample_rate, block_size);
                }
                if idx > self.effects.len() {
                    self.effects.push(fx)
                } else {
                    self.effects.insert(idx, fx)
                }
            }
            None => (),
        }
    }

    pub fn delete_effect(&mut self, idx: usize) -> () {
        if idx < self.effects.len() {
            self.effects.remove(idx);
        }
    }

    /// Fan prepare out to the whole chain.
    pub fn prepare(&mut self, sample_rate: f32, block_size: usize) -> () {
        self.prepared = Some((sample_rate, block_size));
        for fx in &mut self.effects {
            fx.prepare(sample_rate, block_size);
        }
    }

    pub fn release(&mut self) -> () {
        self.prepared = None;
        for fx in &mut self.effects {
            fx.release();
        }
    }

    /// Run the block through every effect in order, in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> () {
        for fx in &mut self.effects {
            fx.process(left, right);
        }
    }

    pub fn change_effect_setting(&mut self, idx: usize, setting: serde_json::Value) -> () {
        if let Some(fx) = self.effects.get_mut(idx) {
            fx.change_setting(setting);
        }
    }

    pub fn as_json(&self, idx: usize) -> serde_json::Value {
        let mut rval: Vec<serde_json::Value> = vec![];
        let mut i = 0;
        for fx in &self.effects {
            rval.push(fx.as_json(i));
            i += 1;
        }
        json!({
            "channel": idx,
            "name": format!("channel_{}", idx),
            "effects": rval,
        })
    }
}
