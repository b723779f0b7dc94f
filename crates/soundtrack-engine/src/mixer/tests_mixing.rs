//! Tests for stem summation and length handling.

use super::*;
use crate::buffer::{AudioBuffer, SampleFormat};
use crate::error::AudioError;

fn mono(samples: &[f64]) -> AudioBuffer {
    AudioBuffer::mono(44100, samples.to_vec()).unwrap()
}

// ============================================================================
// Single and empty input
// ============================================================================

#[test]
fn test_mix_single_returns_input() {
    let a = mono(&[0.1, -0.2, 0.3]);
    let output = mix(vec![a.clone()]).unwrap();
    assert_eq!(output.buffer, a);
    assert_eq!(output.clipped_samples, 0);
}

#[test]
fn test_mix_empty_fails() {
    assert!(matches!(mix(Vec::new()), Err(AudioError::EmptyMix)));
    assert!(matches!(Mixer::new().mix(), Err(AudioError::EmptyMix)));
}

// ============================================================================
// Summation
// ============================================================================

#[test]
fn test_mix_sums_samples() {
    let output = mix(vec![mono(&[0.1, 0.2]), mono(&[0.3, -0.2]), mono(&[0.1, 0.0])]).unwrap();
    let samples = output.buffer.channel(0).unwrap();
    assert!((samples[0] - 0.5).abs() < 1e-12);
    assert!(samples[1].abs() < 1e-12);
    assert!(!output.clipped());
}

#[test]
fn test_mix_shorter_stem_is_silence_past_end() {
    let a = mono(&[0.1, 0.2, 0.3, 0.4, 0.5]);
    let b = mono(&[0.25, 0.25]);
    let output = mix(vec![a.clone(), b]).unwrap();

    let samples = output.buffer.channel(0).unwrap();
    assert_eq!(samples.len(), 5);
    assert_eq!(&samples[2..], &a.channel(0).unwrap()[2..]);
}

#[test]
fn test_mix_longest_stem_last() {
    let output = mix(vec![mono(&[0.5]), mono(&[0.25, 0.25, 0.25])]).unwrap();
    assert_eq!(output.buffer.channel(0), Some(&[0.75, 0.25, 0.25][..]));
}

#[test]
fn test_mix_stereo_channels_independent() {
    let a = AudioBuffer::new(48000, vec![vec![0.5, 0.5], vec![-0.5, -0.5]]).unwrap();
    let b = AudioBuffer::new(48000, vec![vec![0.25, 0.0], vec![0.25, 0.0]]).unwrap();
    let output = mix(vec![a, b]).unwrap();
    assert_eq!(output.buffer.format(), SampleFormat::new(48000, 2));
    assert_eq!(output.buffer.channel(0), Some(&[0.75, 0.5][..]));
    assert_eq!(output.buffer.channel(1), Some(&[-0.25, -0.5][..]));
}

// ============================================================================
// Format checks
// ============================================================================

#[test]
fn test_mix_rejects_rate_mismatch_with_index() {
    let a = mono(&[0.1]);
    let b = mono(&[0.1]);
    let c = AudioBuffer::mono(22050, vec![0.1]).unwrap();

    let err = mix(vec![a, b, c]).unwrap_err();
    match err {
        AudioError::SampleFormatMismatch {
            stem,
            expected,
            found,
        } => {
            assert_eq!(stem, 2);
            assert_eq!(expected, SampleFormat::new(44100, 1));
            assert_eq!(found, SampleFormat::new(22050, 1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_mixer_rejects_channel_mismatch() {
    let mut mixer = Mixer::new();
    mixer.add_stem(mono(&[0.1])).unwrap();
    let stereo = AudioBuffer::new(44100, vec![vec![0.1], vec![0.1]]).unwrap();
    assert!(mixer.add_stem(stereo).is_err());
    assert_eq!(mixer.stem_count(), 1);
}

#[test]
fn test_mix_is_deterministic() {
    let stems = vec![mono(&[0.3, 0.9, -0.4]), mono(&[0.8, 0.2]), mono(&[-0.1])];
    let a = mix(stems.clone()).unwrap();
    let b = mix(stems).unwrap();
    assert_eq!(a, b);
}
