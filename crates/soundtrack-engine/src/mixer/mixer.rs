//! Stem mixer.

use log::debug;

use super::processing::hard_clip_buffer;
use super::types::MixOutput;
use crate::buffer::{AudioBuffer, SampleFormat};
use crate::error::{AudioError, AudioResult};

/// Collects stems of one format and sums them.
#[derive(Debug, Default)]
pub struct Mixer {
    /// Stems in mix order.
    stems: Vec<AudioBuffer>,
}

impl Mixer {
    /// Creates an empty mixer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Format every stem must share, set by the first stem.
    pub fn format(&self) -> Option<SampleFormat> {
        self.stems.first().map(AudioBuffer::format)
    }

    /// Number of stems added so far.
    pub fn stem_count(&self) -> usize {
        self.stems.len()
    }

    /// Adds a stem to the mix.
    ///
    /// # Errors
    /// Returns [`AudioError::SampleFormatMismatch`] carrying the new stem's
    /// index if its format differs from the first stem's.
    pub fn add_stem(&mut self, stem: AudioBuffer) -> AudioResult<()> {
        if let Some(expected) = self.format() {
            let found = stem.format();
            if found != expected {
                return Err(AudioError::SampleFormatMismatch {
                    stem: self.stems.len(),
                    expected,
                    found,
                });
            }
        }
        self.stems.push(stem);
        Ok(())
    }

    /// Sums all stems.
    ///
    /// The output is as long as the longest stem; shorter stems contribute
    /// silence past their end. Sums outside [-1.0, 1.0] are saturated and
    /// counted. A single stem is returned as is.
    ///
    /// # Errors
    /// Returns [`AudioError::EmptyMix`] if no stem was added, or
    /// [`AudioError::InvalidParameter`] if the padded output cannot be allocated.
    pub fn mix(self) -> AudioResult<MixOutput> {
        let mut stems = self.stems.into_iter();
        let Some(first) = stems.next() else {
            return Err(AudioError::EmptyMix);
        };
        let rest: Vec<AudioBuffer> = stems.collect();

        if rest.is_empty() {
            let peak = first.peak();
            return Ok(MixOutput {
                buffer: first,
                clipped_samples: 0,
                peak,
            });
        }

        let length = rest.iter().map(AudioBuffer::len).fold(first.len(), usize::max);
        let padding = length - first.len();
        let mut output = first.pad(0, padding)?;

        for stem in &rest {
            for (out, src) in output.channels_mut().iter_mut().zip(stem.channels()) {
                for (acc, sample) in out.iter_mut().zip(src) {
                    *acc += sample;
                }
            }
        }

        let peak = output.peak();
        let clipped_samples = hard_clip_buffer(&mut output);
        debug!(
            "mixed {} stems into {} frames (peak {:.3}, {} clipped)",
            rest.len() + 1,
            length,
            peak,
            clipped_samples
        );

        Ok(MixOutput {
            buffer: output,
            clipped_samples,
            peak,
        })
    }
}

/// Mixes buffers in order.
///
/// See [`Mixer::mix`].
pub fn mix(buffers: Vec<AudioBuffer>) -> AudioResult<MixOutput> {
    let mut mixer = Mixer::new();
    for buffer in buffers {
        mixer.add_stem(buffer)?;
    }
    mixer.mix()
}
