//! RIFF writing and PCM conversion.

use std::io::{self, Write};

use super::format::WavFormat;
use crate::buffer::AudioBuffer;

/// Size of the RIFF, fmt, and data chunk headers.
const HEADER_LEN: usize = 44;

/// Writes a complete WAV file.
///
/// # Arguments
/// * `writer` - Output writer
/// * `format` - Header parameters
/// * `pcm_data` - Interleaved little-endian PCM bytes
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PCM data exceeds 4 GiB"))?;
    let riff_size = data_size
        .checked_add(HEADER_LEN as u32 - 8)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "PCM data exceeds 4 GiB"))?;

    writer.write_all(b"RIFF")?;
    writer.write_all(&riff_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Writes a WAV file into memory.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    write_wav(&mut bytes, format, pcm_data)?;
    Ok(bytes)
}

/// Converts a buffer to interleaved 16-bit PCM.
///
/// Samples are clamped to [-1.0, 1.0], scaled by 32767, and rounded.
pub fn buffer_to_pcm16(buffer: &AudioBuffer) -> Vec<u8> {
    buffer
        .to_interleaved()
        .into_iter()
        .flat_map(|sample| ((sample.clamp(-1.0, 1.0) * 32767.0).round() as i16).to_le_bytes())
        .collect()
}
