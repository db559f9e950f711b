//! DSP building blocks shared by the effects, ie: DelayLine, LowFreqOsc, SmoothingFilter

pub mod delay_line;
pub mod low_freq_osc;
pub mod smoothing_filter;
