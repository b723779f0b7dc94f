//! Tests for saturation of out-of-range sums.

use super::*;
use crate::buffer::AudioBuffer;

#[test]
fn test_hard_clip_counts_and_saturates() {
    let mut samples = vec![0.5, 1.5, -2.0, 1.0, -1.0];
    let clipped = hard_clip(&mut samples);
    assert_eq!(clipped, 2);
    assert_eq!(samples, vec![0.5, 1.0, -1.0, 1.0, -1.0]);
}

#[test]
fn test_hard_clip_silences_non_finite_samples() {
    let mut samples = vec![f64::NAN, 0.25, f64::INFINITY, f64::NEG_INFINITY];
    let clipped = hard_clip(&mut samples);
    assert_eq!(clipped, 3);
    assert_eq!(samples, vec![0.0, 0.25, 0.0, 0.0]);
}

#[test]
fn test_mix_counts_nan_from_a_stem() {
    let a = AudioBuffer::mono(8000, vec![f64::NAN, 0.5]).unwrap();
    let b = AudioBuffer::mono(8000, vec![0.25, 0.25]).unwrap();

    let output = mix(vec![a, b]).unwrap();

    assert_eq!(output.buffer.channel(0), Some(&[0.0, 0.75][..]));
    assert_eq!(output.clipped_samples, 1);
    assert!(output.clipped());
}

#[test]
fn test_hard_clip_buffer_counts_all_channels() {
    let mut buffer = AudioBuffer::new(8000, vec![vec![1.2, 0.0], vec![-1.2, 3.0]]).unwrap();
    assert_eq!(hard_clip_buffer(&mut buffer), 3);
    assert_eq!(buffer.peak(), CLIP_LIMIT);
}

#[test]
fn test_mix_saturates_instead_of_wrapping() {
    let a = AudioBuffer::mono(8000, vec![0.8, -0.8, 0.5]).unwrap();
    let b = AudioBuffer::mono(8000, vec![0.8, -0.8, 0.25]).unwrap();

    let output = mix(vec![a, b]).unwrap();

    assert_eq!(output.buffer.channel(0), Some(&[1.0, -1.0, 0.75][..]));
    assert_eq!(output.clipped_samples, 2);
    assert!(output.clipped());
    assert!((output.peak - 1.6).abs() < 1e-12);
}

#[test]
fn test_mix_within_range_reports_no_clipping() {
    let a = AudioBuffer::mono(8000, vec![0.5, -0.5]).unwrap();
    let b = AudioBuffer::mono(8000, vec![0.5, -0.5]).unwrap();

    let output = mix(vec![a, b]).unwrap();
    assert_eq!(output.clipped_samples, 0);
    assert_eq!(output.peak, 1.0);
}
