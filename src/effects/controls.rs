//! Setting descriptors for the control surface.
//!
//! A setting carries its range so values coming in from the UI are clamped
//! here, at configuration time.  That clamping is what lets the audio path
//! assume every parameter is in bounds (a requested delay can never reach the
//! buffer capacity, a rate can never go negative).
use crate::utils::to_lin;
use num::{FromPrimitive, ToPrimitive};
use serde_json::json;

#[derive(ToPrimitive, FromPrimitive)]
pub enum SettingUnit {
    Continuous,
    Selector,
    Footswitch,
}

/// How the stored value converts into the number the algorithm wants.
pub enum SettingType {
    /// milliseconds on the knob, seconds in the algorithm
    Msec,
    /// dB on the knob, linear gain in the algorithm
    DB,
    /// used as is
    Linear,
}

impl SettingType {
    pub fn convert<T: ToPrimitive + FromPrimitive + Copy>(&self, value: T) -> T {
        let v = value.to_f64().unwrap_or(0.0);
        let converted = match self {
            SettingType::Msec => v / 1000.0,
            SettingType::DB => to_lin(v),
            SettingType::Linear => v,
        };
        T::from_f64(converted).unwrap_or(value)
    }
}

pub struct EffectSetting<T> {
    pub dirty: bool,
    pub stype: SettingType,
    units: SettingUnit,
    name: String,
    labels: Vec<String>,
    value: T,
    min: T,
    max: T,
    step: T,
}

impl<T: ToPrimitive + FromPrimitive + PartialOrd + Copy> EffectSetting<T> {
    pub fn new(
        units: SettingUnit,
        stype: SettingType,
        name: &str,
        labels: Vec<String>,
        value: T,
        min: T,
        max: T,
        step: T,
    ) -> EffectSetting<T> {
        let mut setting = EffectSetting {
            dirty: true,
            stype,
            units,
            name: String::from(name),
            labels,
            value,
            min,
            max,
            step,
        };
        setting.set_value(value);
        setting
    }

    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn get_value(&self) -> T {
        self.value
    }

    /// Clamp into range, store, and mark dirty for the next
    /// load_from_settings pass.
    pub fn set_value(&mut self, value: T) -> () {
        self.value = if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        };
        self.dirty = true;
    }

    pub fn as_json(&self, idx: usize) -> serde_json::Value {
        json!({
            "index": idx,
            "labels": self.labels,
            "name": self.name,
            "value": self.value.to_f64(),
            "min": self.min.to_f64(),
            "max": self.max.to_f64(),
            "step": self.step.to_f64(),
            "type": num::ToPrimitive::to_usize(&self.units),
        })
    }
}
