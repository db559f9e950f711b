//! One pole smoother for control values.
//!
//! Steps the current value toward a target by a fixed fraction every sample so
//! a knob move never lands as an audible click.
use num::{Float, FromPrimitive, Zero};
use std::fmt::{self, Display};

use crate::utils::get_coef;

pub struct SmoothingFilter<T> {
    coef: T,
    current: T,
}

impl<T: Float + FromPrimitive> SmoothingFilter<T> {
    /// Build with an explicit per sample coefficient (small, e.g. 0.001).
    pub fn new(coef: T) -> SmoothingFilter<T> {
        SmoothingFilter {
            coef,
            current: Zero::zero(),
        }
    }

    /// Build from a time constant in seconds at the given sample rate.
    pub fn build(time_const: T, sample_rate: T) -> SmoothingFilter<T> {
        Self::new(get_coef(time_const, sample_rate))
    }

    /// Step toward the target and return the new current value.
    pub fn get(&mut self, target: T) -> T {
        self.current = self.current + self.coef * (target - self.current);
        self.current
    }

    pub fn get_last_output(&self) -> T {
        self.current
    }

    /// Jump straight to a value.  Only for reinitialization (prepare), never
    /// mid stream.
    pub fn reset(&mut self, value: T) -> () {
        self.current = value;
    }
}

impl<T: Float + FromPrimitive + Display> Display for SmoothingFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{ coef: {}, current: {} }}", self.coef, self.current)
    }
}
