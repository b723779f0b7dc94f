//! Encoded track.

use std::io;

use super::format::WavFormat;
use super::writer::{buffer_to_pcm16, write_wav_to_vec};
use crate::buffer::AudioBuffer;

/// An encoded WAV file and its PCM hash.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM data only.
    pub pcm_hash: String,
    /// Header parameters.
    pub format: WavFormat,
    /// Frames per channel.
    pub num_frames: usize,
}

impl WavResult {
    /// Encodes a buffer.
    pub fn from_buffer(buffer: &AudioBuffer) -> io::Result<Self> {
        let pcm = buffer_to_pcm16(buffer);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let format = WavFormat::from(buffer.format());
        let wav_data = write_wav_to_vec(&format, &pcm)?;

        Ok(Self {
            wav_data,
            pcm_hash,
            format,
            num_frames: buffer.len(),
        })
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.format.sample_rate as f64
    }
}
