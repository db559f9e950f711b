//! The trait every effect implements so a rack can drive them all the same way.
use serde_json::json;

use super::controls::SettingUnit;

pub trait Effect {
    /// Process one block in place.  The default handles bypass by leaving the
    /// buffers untouched.
    fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> () {
        if !self.bypass() {
            self.do_algorithm(left, right);
        }
    }

    /// The actual per block algorithm.  Must not allocate, lock, or do I/O -
    /// this runs on the audio thread against a hard deadline.
    fn do_algorithm(&mut self, left: &mut [f32], right: &mut [f32]) -> ();

    /// Called by the host before processing starts or when the sample rate
    /// changes.  Buffers get (re)allocated and zeroed here, never in
    /// do_algorithm.
    fn prepare(&mut self, sample_rate: f32, block_size: usize) -> ();

    /// Called when the host tears the effect down.  Buffers may be freed; no
    /// process calls until the next prepare.
    fn release(&mut self) -> ();

    fn bypass(&self) -> bool {
        false
    }

    fn set_my_bypass(&mut self, val: bool) -> ();

    fn make_bypass(&self) -> serde_json::Value {
        json!({
            "index": 0,
            "labels": [],
            "max": 1,
            "min": 0,
            "name": "bypass",
            "step": 1,
            "type": num::ToPrimitive::to_usize(&SettingUnit::Footswitch),
            "value": self.bypass(),
        })
    }

    fn as_json(&self, index: usize) -> serde_json::Value;

    /// Entry point for the control surface.  Runs on the UI thread; the new
    /// values land in atomic cells the audio thread reads per sample.
    fn change_setting(&mut self, setting: serde_json::Value) -> () {
        match setting["name"].as_str() {
            Some(v) => match v {
                "bypass" => match setting["value"].as_bool() {
                    Some(b) => {
                        self.set_my_bypass(b);
                    }
                    None => (),
                },
                _ => {
                    self.do_change_a_value(v, &setting["value"]);
                    self.load_from_settings();
                }
            },
            None => (),
        }
    }

    fn do_change_a_value(&mut self, name: &str, value: &serde_json::Value) -> ();

    /// Push the (clamped) setting values into the parameter cells.
    fn load_from_settings(&mut self) -> ();
}
