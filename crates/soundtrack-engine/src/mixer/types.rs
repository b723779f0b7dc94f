//! Mixer output type.

use crate::buffer::AudioBuffer;

/// Result of a mix.
#[derive(Debug, Clone, PartialEq)]
pub struct MixOutput {
    /// The mixed buffer.
    pub buffer: AudioBuffer,
    /// Number of samples (across all channels) that were saturated.
    pub clipped_samples: usize,
    /// Largest absolute sample value before saturation.
    pub peak: f64,
}

impl MixOutput {
    /// Returns true if any sample had to be saturated.
    pub fn clipped(&self) -> bool {
        self.clipped_samples > 0
    }
}
