//! WAV header parameters.

use crate::buffer::SampleFormat;

/// Bit depth of every file written.
pub const BITS_PER_SAMPLE: u16 = 16;

/// WAV header parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates a 16-bit format.
    pub fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }

    /// Bytes per sample of one channel.
    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per frame.
    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Bytes per second.
    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        Self::new(format.channels, format.sample_rate)
    }
}
