//! Circular delay buffer with fractional read and a feedback tap.
//!
//! One DelayLine per audio channel.  The write head does not move on write;
//! [`advance`](DelayLine::advance) is a separate step so a caller can write and
//! read both channels of a sample pair before either head moves.

/// Fixed capacity ring buffer of samples.
///
/// The buffer is sized once by [`reallocate`](DelayLine::reallocate) when the
/// host tells us the sample rate.  Nothing in here allocates after that, so
/// every call is safe on the audio thread.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_head: usize,
    feedback: f32,
}

impl DelayLine {
    /// A new line holds no samples.  Call reallocate before processing.
    pub fn new() -> DelayLine {
        DelayLine {
            buffer: Vec::new(),
            write_head: 0,
            feedback: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Replace the buffer with a zeroed one of the given capacity and reset
    /// the head and feedback state.  Only call between processing blocks.
    pub fn reallocate(&mut self, capacity: usize) -> () {
        self.buffer = vec![0.0; capacity];
        self.write_head = 0;
        self.feedback = 0.0;
    }

    /// Zero the stored samples without changing capacity.
    pub fn clear(&mut self) -> () {
        self.buffer.fill(0.0);
        self.write_head = 0;
        self.feedback = 0.0;
    }

    /// Drop the buffer.  No reads or writes until the next reallocate.
    pub fn release(&mut self) -> () {
        self.buffer = Vec::new();
        self.write_head = 0;
        self.feedback = 0.0;
    }

    /// Store input plus the pending feedback sample at the write head.  The
    /// head stays put; advance it explicitly once the sample pair is done.
    pub fn write(&mut self, input: f32) -> () {
        self.buffer[self.write_head] = input + self.feedback;
    }

    /// Read delay_samples behind the write head with linear interpolation.
    ///
    /// The caller must keep delay_samples in [0, capacity) - parameter ranges
    /// are clamped at configuration time so this never needs a check here.
    pub fn read_fractional(&self, delay_samples: f32) -> f32 {
        let capacity = self.buffer.len();
        let mut read_pos = self.write_head as f32 - delay_samples;
        if read_pos < 0.0 {
            read_pos += capacity as f32;
        }
        let x = read_pos as usize;
        let frac = read_pos - x as f32;
        let mut x1 = x + 1;
        if x1 >= capacity {
            x1 -= capacity;
        }
        (1.0 - frac) * self.buffer[x] + frac * self.buffer[x1]
    }

    /// Stash the sample that will be summed into the next write.
    pub fn set_feedback(&mut self, sample: f32) -> () {
        self.feedback = sample;
    }

    pub fn get_feedback(&self) -> f32 {
        self.feedback
    }

    /// Move the write head one sample forward, wrapping at capacity.
    pub fn advance(&mut self) -> () {
        self.write_head += 1;
        if self.write_head >= self.buffer.len() {
            self.write_head = 0;
        }
    }
}
