//! Fade envelope functions.
//!
//! Each [`EnvelopeKind`] maps a normalized position `t` in [0, 1] to a gain
//! between a start and an end gain, both on the 0-100 scale. Every curve is
//! computed as a normalized level in [0, 1] relative to the lower of the two
//! gains, so curves stay monotonic between the endpoints in either direction.

use std::f64::consts::PI;

use soundtrack_spec::EnvelopeKind;

/// Bound on the magnitude of the fade-adjust shape parameter.
pub const SHAPE_LIMIT: f64 = 1.0;

/// Evaluates a fade curve at position `t`.
///
/// `t <= 0` (and NaN) yields `start_gain`, `t >= 1` yields `end_gain`, both
/// exactly. Equal gains give a constant.
///
/// `shape_param` only bends [`EnvelopeKind::Linear`] and is clamped to
/// [-1, 1]:
///
/// * `0` is plain linear interpolation.
/// * `0 < p < 0.5` blends the straight line toward a half-cosine S-curve,
///   reaching the pure S-curve at `p = 0.5`.
/// * `p >= 0.5` raises the S-curve level to the power `1.5 - p`, holding the
///   louder gain longer as `p` grows.
/// * `p < 0` raises the straight-line level to the power `1 - 2p`, dropping
///   toward the quieter gain sooner as `p` falls.
///
/// Clamping keeps every exponent at or above 0.5, so no power ever reaches
/// zero.
///
/// # Arguments
/// * `curve` - Envelope shape
/// * `t` - Normalized position in the fade
/// * `start_gain` - Gain at `t = 0` (0-100)
/// * `end_gain` - Gain at `t = 1` (0-100)
/// * `shape_param` - Curve bend for the linear shape
///
/// # Returns
/// Gain on the 0-100 scale.
pub fn evaluate(
    curve: EnvelopeKind,
    t: f64,
    start_gain: f64,
    end_gain: f64,
    shape_param: f64,
) -> f64 {
    if t.is_nan() || t <= 0.0 {
        return start_gain;
    }
    if t >= 1.0 {
        return end_gain;
    }
    if start_gain == end_gain {
        return start_gain;
    }

    let rising = end_gain > start_gain;
    let (low, high) = if rising {
        (start_gain, end_gain)
    } else {
        (end_gain, start_gain)
    };

    let level = match curve {
        EnvelopeKind::Linear => adjusted_level(t, rising, shape_param),
        EnvelopeKind::Cosine => cosine_level(t, rising),
        EnvelopeKind::EqualPower => {
            let angle = t * PI / 2.0;
            if rising {
                angle.sin()
            } else {
                angle.cos()
            }
        }
        EnvelopeKind::Smoothstep => {
            let s = t * t * (3.0 - 2.0 * t);
            if rising {
                s
            } else {
                1.0 - s
            }
        }
    };

    low + (high - low) * level.clamp(0.0, 1.0)
}

fn linear_level(t: f64, rising: bool) -> f64 {
    if rising {
        t
    } else {
        1.0 - t
    }
}

fn cosine_level(t: f64, rising: bool) -> f64 {
    let c = (PI * t).cos();
    if rising {
        (1.0 - c) / 2.0
    } else {
        (1.0 + c) / 2.0
    }
}

fn adjusted_level(t: f64, rising: bool, shape_param: f64) -> f64 {
    let p = if shape_param.is_nan() {
        0.0
    } else {
        shape_param.clamp(-SHAPE_LIMIT, SHAPE_LIMIT)
    };
    let linear = linear_level(t, rising);

    if p == 0.0 {
        linear
    } else if p < 0.0 {
        linear.powf(1.0 - 2.0 * p)
    } else if p < 0.5 {
        let blend = 2.0 * p;
        linear * (1.0 - blend) + cosine_level(t, rising) * blend
    } else {
        cosine_level(t, rising).powf(1.5 - p)
    }
}

/// Computes per-frame amplitude multipliers for a fade of `len` frames.
///
/// Frame `i` is evaluated at `t = i / (len - 1)`, or `t = 0` for a single
/// frame, and converted from the 0-100 scale to a linear multiplier.
///
/// # Arguments
/// * `curve` - Envelope shape
/// * `len` - Number of frames
/// * `start_gain` - Gain of the first frame (0-100)
/// * `end_gain` - Gain of the last frame (0-100)
/// * `shape_param` - Curve bend for the linear shape
///
/// # Returns
/// One multiplier per frame.
pub fn fade_gains(
    curve: EnvelopeKind,
    len: usize,
    start_gain: f64,
    end_gain: f64,
    shape_param: f64,
) -> Vec<f64> {
    let last = len.saturating_sub(1);
    (0..len)
        .map(|i| {
            let t = if last == 0 {
                0.0
            } else {
                i as f64 / last as f64
            };
            evaluate(curve, t, start_gain, end_gain, shape_param) / 100.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: [f64; 9] = [-1.0, -0.6, -0.25, 0.0, 0.1, 0.3, 0.5, 0.75, 1.0];
    const GAIN_PAIRS: [(f64, f64); 5] = [
        (100.0, 0.0),
        (0.0, 100.0),
        (80.0, 20.0),
        (35.0, 90.0),
        (100.0, 100.0),
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for curve in EnvelopeKind::ALL {
            for shape in SHAPES {
                for (start, end) in GAIN_PAIRS {
                    assert_eq!(evaluate(curve, 0.0, start, end, shape), start);
                    assert_eq!(evaluate(curve, 1.0, start, end, shape), end);
                }
            }
        }
    }

    #[test]
    fn test_monotonic_between_endpoints() {
        for curve in EnvelopeKind::ALL {
            for shape in SHAPES {
                for (start, end) in GAIN_PAIRS {
                    let mut previous = start;
                    for step in 1..=200 {
                        let gain = evaluate(curve, step as f64 / 200.0, start, end, shape);
                        assert!(!gain.is_nan());
                        if end >= start {
                            assert!(gain >= previous - 1e-12, "{curve} p={shape}");
                        } else {
                            assert!(gain <= previous + 1e-12, "{curve} p={shape}");
                        }
                        assert!(gain >= start.min(end) && gain <= start.max(end));
                        previous = gain;
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_shape_is_linear() {
        for step in 0..=10 {
            let t = step as f64 / 10.0;
            let gain = evaluate(EnvelopeKind::Linear, t, 100.0, 0.0, 0.0);
            assert!((gain - 100.0 * (1.0 - t)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_shape_bends_the_line() {
        let straight = evaluate(EnvelopeKind::Linear, 0.25, 100.0, 0.0, 0.0);
        let held = evaluate(EnvelopeKind::Linear, 0.25, 100.0, 0.0, 1.0);
        let dropped = evaluate(EnvelopeKind::Linear, 0.25, 100.0, 0.0, -1.0);
        assert!(held > straight);
        assert!(dropped < straight);
    }

    #[test]
    fn test_shape_continuous_at_half() {
        let below = evaluate(EnvelopeKind::Linear, 0.3, 100.0, 0.0, 0.5 - 1e-9);
        let at = evaluate(EnvelopeKind::Linear, 0.3, 100.0, 0.0, 0.5);
        assert!((below - at).abs() < 1e-6);
    }

    #[test]
    fn test_extreme_and_nan_inputs() {
        let gain = evaluate(EnvelopeKind::Linear, 0.5, 100.0, 0.0, 25.0);
        assert_eq!(gain, evaluate(EnvelopeKind::Linear, 0.5, 100.0, 0.0, 1.0));
        assert!(!evaluate(EnvelopeKind::Linear, 0.5, 100.0, 0.0, f64::NAN).is_nan());
        assert_eq!(
            evaluate(EnvelopeKind::Cosine, f64::NAN, 70.0, 10.0, 0.0),
            70.0
        );
    }

    #[test]
    fn test_cosine_and_equal_power_midpoints() {
        let cosine = evaluate(EnvelopeKind::Cosine, 0.5, 100.0, 0.0, 0.0);
        assert!((cosine - 50.0).abs() < 1e-9);
        let equal_power = evaluate(EnvelopeKind::EqualPower, 0.5, 100.0, 0.0, 0.0);
        assert!((equal_power - 100.0 * (PI / 4.0).cos()).abs() < 1e-9);
    }

    #[test]
    fn test_fade_gains_four_frames() {
        let gains = fade_gains(EnvelopeKind::Linear, 4, 100.0, 0.0, 0.0);
        let expected = [1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0];
        assert_eq!(gains.len(), 4);
        assert_eq!(gains[0], 1.0);
        assert_eq!(gains[3], 0.0);
        for (gain, want) in gains.iter().zip(expected) {
            assert!((gain - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fade_gains_short_lengths() {
        assert!(fade_gains(EnvelopeKind::Cosine, 0, 100.0, 0.0, 0.0).is_empty());
        assert_eq!(
            fade_gains(EnvelopeKind::Cosine, 1, 80.0, 0.0, 0.0),
            vec![0.8]
        );
    }
}
