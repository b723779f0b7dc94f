//! Planar PCM audio buffers.
//!
//! Every engine stage consumes and produces [`AudioBuffer`] values. Samples are
//! stored per channel as `f64` in the nominal range [-1.0, 1.0]; values outside
//! that range are only clipped when mixing or when encoded.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::{AudioError, AudioResult};

/// Sample rate and channel count of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SampleFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
}

impl SampleFormat {
    /// Creates a sample format.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz, {} ch", self.sample_rate, self.channels)
    }
}

/// An ordered sequence of sample frames at a fixed rate and channel count.
///
/// All channels always hold the same number of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f64>>,
}

impl AudioBuffer {
    /// Creates a buffer from planar channel data.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidParameter`] if the sample rate is zero, no
    /// channels are given, or the channels differ in length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f64>>) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::invalid_param(
                "sample_rate",
                "must be positive",
            ));
        }
        if channels.is_empty() || channels.len() > u16::MAX as usize {
            return Err(AudioError::invalid_param(
                "channels",
                format!("must be between 1 and {}, got {}", u16::MAX, channels.len()),
            ));
        }
        let frames = channels[0].len();
        if let Some(bad) = channels.iter().position(|c| c.len() != frames) {
            return Err(AudioError::invalid_param(
                "channels",
                format!(
                    "channel {} has {} frames, channel 0 has {}",
                    bad,
                    channels[bad].len(),
                    frames
                ),
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Creates a single-channel buffer.
    pub fn mono(sample_rate: u32, samples: Vec<f64>) -> AudioResult<Self> {
        Self::new(sample_rate, vec![samples])
    }

    /// Creates a zero-amplitude buffer of the given length.
    pub fn silence(format: SampleFormat, frames: usize) -> Self {
        Self {
            sample_rate: format.sample_rate,
            channels: vec![vec![0.0; frames]; format.channels.max(1) as usize],
        }
    }

    /// Creates an empty buffer of the given format.
    pub fn empty(format: SampleFormat) -> Self {
        Self::silence(format, 0)
    }

    /// Creates a buffer from interleaved frames, as decoders deliver them.
    ///
    /// A trailing incomplete frame is dropped.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: u16,
        interleaved: &[f64],
    ) -> AudioResult<Self> {
        if channel_count == 0 {
            return Err(AudioError::invalid_param("channels", "must be at least 1"));
        }
        let count = channel_count as usize;
        let frames = interleaved.len() / count;
        let mut channels = vec![Vec::with_capacity(frames); count];
        for frame in interleaved.chunks_exact(count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Returns the samples interleaved frame by frame.
    pub fn to_interleaved(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.len() * self.channels.len());
        for frame in 0..self.len() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Sample rate and channel count.
    pub fn format(&self) -> SampleFormat {
        SampleFormat::new(self.sample_rate, self.channel_count())
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Returns true if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels, planar.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Converts seconds to frames at this buffer's rate, truncating.
    ///
    /// Negative and non-finite durations give 0 frames.
    pub fn seconds_to_frames(&self, seconds: f64) -> usize {
        seconds_to_frames(seconds, self.sample_rate)
    }

    /// Returns a view over a frame range, clamped to the buffer.
    pub fn region(&self, range: Range<usize>) -> Region<'_> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Region {
            buffer: self,
            range: start..end,
        }
    }

    /// Appends a region of a buffer with the same format.
    pub fn extend_from_region(&mut self, region: &Region<'_>) -> AudioResult<()> {
        let found = region.buffer.format();
        if found != self.format() {
            return Err(AudioError::SampleFormatMismatch {
                stem: 0,
                expected: self.format(),
                found,
            });
        }
        for (dst, src) in self.channels.iter_mut().zip(&region.buffer.channels) {
            dst.extend_from_slice(&src[region.range.clone()]);
        }
        Ok(())
    }

    /// Reserves capacity for `frames` more frames per channel.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidParameter`] if the buffer would grow past
    /// [`MAX_FRAMES`] or the allocation fails.
    pub fn try_reserve(&mut self, frames: usize) -> AudioResult<()> {
        let total = checked_frame_total(&[self.len() as u128, frames as u128])
            .ok_or_else(|| too_many_frames("frames", self.len() as u128 + frames as u128))?;
        for channel in &mut self.channels {
            channel.try_reserve_exact(total - channel.len()).map_err(|e| {
                AudioError::invalid_param("frames", format!("cannot allocate {} frames: {}", total, e))
            })?;
        }
        Ok(())
    }

    /// Multiplies frames starting at `offset` by per-frame gains.
    ///
    /// Gains past the end of the buffer are ignored.
    pub fn apply_gains(&mut self, offset: usize, gains: &[f64]) {
        for channel in &mut self.channels {
            for (sample, gain) in channel.iter_mut().skip(offset).zip(gains) {
                *sample *= gain;
            }
        }
    }

    /// Returns the buffer converted to `count` channels.
    ///
    /// Upmixing repeats the existing channels in order. Downmixing to one
    /// channel sums all channels; downmixing to more than one keeps the first
    /// `count` channels.
    pub fn with_channels(self, count: u16) -> AudioResult<AudioBuffer> {
        let current = self.channels.len();
        let target = count as usize;
        if target == 0 {
            return Err(AudioError::invalid_param("channels", "must be at least 1"));
        }
        if target == current {
            return Ok(self);
        }

        let AudioBuffer {
            sample_rate,
            mut channels,
        } = self;

        if target > current {
            for index in current..target {
                let copy = channels[index % current].clone();
                channels.push(copy);
            }
        } else if target == 1 {
            let mut sum = vec![0.0; channels[0].len()];
            for channel in &channels {
                for (acc, sample) in sum.iter_mut().zip(channel) {
                    *acc += sample;
                }
            }
            channels = vec![sum];
        } else {
            channels.truncate(target);
        }

        Ok(AudioBuffer {
            sample_rate,
            channels,
        })
    }

    /// Returns the buffer with silence added before and after.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidParameter`] if the padded buffer would
    /// exceed [`MAX_FRAMES`] or cannot be allocated.
    pub fn pad(self, lead_frames: usize, trail_frames: usize) -> AudioResult<AudioBuffer> {
        if lead_frames == 0 && trail_frames == 0 {
            return Ok(self);
        }
        let parts = [lead_frames as u128, self.len() as u128, trail_frames as u128];
        let total = checked_frame_total(&parts)
            .ok_or_else(|| too_many_frames("silence", parts.iter().sum()))?;

        let mut channels = Vec::with_capacity(self.channels.len());
        for samples in self.channels {
            let mut padded = Vec::new();
            padded.try_reserve_exact(total).map_err(|e| {
                AudioError::invalid_param("silence", format!("cannot allocate {} frames: {}", total, e))
            })?;
            padded.resize(lead_frames, 0.0);
            padded.extend_from_slice(&samples);
            padded.resize(total, 0.0);
            channels.push(padded);
        }
        Ok(AudioBuffer {
            sample_rate: self.sample_rate,
            channels,
        })
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f64 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f64, |peak, s| peak.max(s.abs()))
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f64>] {
        &mut self.channels
    }
}

/// Largest number of frames per channel a buffer may hold.
///
/// About 93 minutes at 48 kHz. Requests past it fail the track instead of
/// exhausting memory.
pub const MAX_FRAMES: usize = 1 << 28;

/// Sums frame counts, returning `None` past [`MAX_FRAMES`].
pub(crate) fn checked_frame_total(parts: &[u128]) -> Option<usize> {
    let total: u128 = parts.iter().sum();
    usize::try_from(total).ok().filter(|&t| t <= MAX_FRAMES)
}

fn too_many_frames(name: &str, frames: u128) -> AudioError {
    AudioError::invalid_param(
        name,
        format!("{} frames exceeds the limit of {}", frames, MAX_FRAMES),
    )
}

/// Converts seconds to frames, truncating toward zero.
pub fn seconds_to_frames(seconds: f64, sample_rate: u32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * sample_rate as f64) as usize
}

/// Borrowed frame range of a buffer.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    buffer: &'a AudioBuffer,
    range: Range<usize>,
}

impl<'a> Region<'a> {
    /// Number of frames in the region.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns true if the region holds no frames.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Frame range within the underlying buffer.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Copies the region into a new buffer.
    pub fn to_buffer(&self) -> AudioBuffer {
        AudioBuffer {
            sample_rate: self.buffer.sample_rate,
            channels: self
                .buffer
                .channels
                .iter()
                .map(|c| c[self.range.clone()].to_vec())
                .collect(),
        }
    }

    /// Returns the first `frames` frames of the region.
    pub fn head(&self, frames: usize) -> Region<'a> {
        let end = self.range.start + frames.min(self.len());
        Region {
            buffer: self.buffer,
            range: self.range.start..end,
        }
    }
}
