//! Saturation helpers.

use crate::buffer::AudioBuffer;

/// Largest representable sample magnitude.
pub const CLIP_LIMIT: f64 = 1.0;

/// Saturates samples to [-1.0, 1.0] in place.
///
/// NaN and infinite samples are replaced with silence.
///
/// # Returns
/// Number of samples that were out of range or non-finite.
pub fn hard_clip(samples: &mut [f64]) -> usize {
    let mut clipped = 0;
    for sample in samples.iter_mut() {
        if !sample.is_finite() {
            *sample = 0.0;
            clipped += 1;
        } else if sample.abs() > CLIP_LIMIT {
            *sample = sample.clamp(-CLIP_LIMIT, CLIP_LIMIT);
            clipped += 1;
        }
    }
    clipped
}

/// Saturates every channel of a buffer.
///
/// # Returns
/// Number of samples that were out of range, across all channels.
pub fn hard_clip_buffer(buffer: &mut AudioBuffer) -> usize {
    buffer
        .channels_mut()
        .iter_mut()
        .map(|channel| hard_clip(channel))
        .sum()
}
