use num::{Float, FromPrimitive};

// utility functions

/// error type used on the fallible setup paths.
pub type BoxError = std::boxed::Box<
    dyn std::error::Error // must implement Error to satisfy ?
        + std::marker::Send // needed for threads
        + std::marker::Sync, // needed for threads
>;

/// convert a linear gain value into dB
pub fn to_db(v: f64) -> f64 {
    20.0 * v.log10()
}

/// convert a dB value into linear gain
pub fn to_lin(db: f64) -> f64 {
    f64::powf(10.0, db / 20.0)
}

/// one pole filter coefficient for a given time constant (seconds) at a sample rate
pub fn get_coef<T: Float + FromPrimitive>(time_const: T, sample_rate: T) -> T {
    T::one() - T::exp(-T::one() / (time_const * sample_rate))
}
