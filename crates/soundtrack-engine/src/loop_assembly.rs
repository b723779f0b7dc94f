//! Loop assembly.
//!
//! Expands a [`Segment`] into one continuous waveform: the intro, the loop
//! region repeated a number of times, then one trailing partial loop that is
//! either a full unmodified pass or a faded head of the loop region.

use log::debug;
use soundtrack_spec::{FadeSpec, LoopSpec};

use crate::buffer::{checked_frame_total, seconds_to_frames, AudioBuffer, MAX_FRAMES};
use crate::envelope::fade_gains;
use crate::error::{AudioError, AudioResult};
use crate::segment::Segment;

/// Assembles a segment into a single buffer.
///
/// * A fixed segment, or a repeat count of 0, yields the intro followed by one
///   pass of the loop region, unmodified. Any fade is ignored.
/// * Otherwise the output is the intro, `repeat_count` full loop passes, and a
///   tail. Without a fade the tail is one more full pass. With a fade the tail
///   is the first `duration_seconds * sample_rate` frames of the loop region
///   (truncated, at most one loop) with the fade envelope applied. A fade that
///   rounds to 0 frames adds no tail.
///
/// # Arguments
/// * `segment` - The segment to expand
/// * `loop_spec` - Repeat count and optional fade
///
/// # Returns
/// The assembled buffer, in the segment's sample format.
///
/// # Errors
/// Returns [`AudioError::InvalidLoopRegion`] when the loop region is empty and
/// the repeat count is non-zero, and [`AudioError::OutputTooLong`] when the
/// result would exceed [`MAX_FRAMES`]. Nothing is allocated in either case.
pub fn assemble(segment: &Segment, loop_spec: &LoopSpec) -> AudioResult<AudioBuffer> {
    let format = segment.format();
    let mut output = AudioBuffer::empty(format);

    let intro = segment.intro();
    let Some(loop_region) = segment.loop_region() else {
        if let Some(intro) = intro {
            output.extend_from_region(&intro)?;
        }
        debug!("fixed segment: {} frames", output.len());
        return Ok(output);
    };

    let intro_len = intro.as_ref().map_or(0, |r| r.len());
    let loop_len = loop_region.len();

    if loop_spec.repeat_count == 0 {
        output.try_reserve(segment.base_len())?;
        if let Some(intro) = intro {
            output.extend_from_region(&intro)?;
        }
        output.extend_from_region(&loop_region)?;
        debug!(
            "segment played once: {} intro + {} loop frames",
            intro_len, loop_len
        );
        return Ok(output);
    }

    if loop_region.is_empty() {
        let range = loop_region.range();
        return Err(AudioError::InvalidLoopRegion {
            stem: 0,
            start: range.start,
            end: range.end,
            clip_len: range.end,
        });
    }

    let tail_len = match loop_spec.fade {
        Some(ref fade) => fade_len(fade, format.sample_rate, loop_len),
        None => loop_len,
    };

    let repeats = loop_spec.repeat_count as usize;
    let parts = [
        intro_len as u128,
        u128::from(loop_spec.repeat_count) * loop_len as u128,
        tail_len as u128,
    ];
    let total = checked_frame_total(&parts).ok_or_else(|| AudioError::OutputTooLong {
        stem: 0,
        frames: parts.iter().sum(),
        limit: MAX_FRAMES,
    })?;
    output.try_reserve(total)?;

    if let Some(intro) = intro {
        output.extend_from_region(&intro)?;
    }
    for _ in 0..repeats {
        output.extend_from_region(&loop_region)?;
    }

    if tail_len > 0 {
        let offset = output.len();
        output.extend_from_region(&loop_region.head(tail_len))?;
        if let Some(ref fade) = loop_spec.fade {
            let gains = fade_gains(
                fade.curve,
                tail_len,
                fade.start_gain,
                fade.end_gain,
                fade.shape_param,
            );
            output.apply_gains(offset, &gains);
        }
    }

    debug!(
        "assembled {} intro + {} x {} loop + {} tail frames ({})",
        intro_len,
        repeats,
        loop_len,
        tail_len,
        loop_spec
            .fade
            .map_or_else(|| "no fade".to_string(), |f| format!("{} fade", f.curve)),
    );

    Ok(output)
}

/// Fade length in frames, clamped to one loop pass.
fn fade_len(fade: &FadeSpec, sample_rate: u32, loop_len: usize) -> usize {
    let requested = seconds_to_frames(fade.duration_seconds, sample_rate);
    if requested > loop_len {
        debug!(
            "fade of {} frames clamped to loop length {}",
            requested, loop_len
        );
    }
    requested.min(loop_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use soundtrack_spec::EnvelopeKind;

    fn mono(rate: u32, samples: &[f64]) -> AudioBuffer {
        AudioBuffer::mono(rate, samples.to_vec()).unwrap()
    }

    fn samples(buffer: &AudioBuffer) -> Vec<f64> {
        buffer.channel(0).unwrap().to_vec()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-9, "frame {}: {} != {}", i, a, e);
        }
    }

    #[test]
    fn test_faded_tail_over_whole_loop() {
        let segment = Segment::loop_only(mono(4, &[1.0, 2.0, 3.0, 4.0]));
        let spec = LoopSpec::repeat(1).with_fade(FadeSpec::fade_out(EnvelopeKind::Linear, 1.0));

        let output = assemble(&segment, &spec).unwrap();

        assert_close(
            &samples(&output),
            &[
                1.0,
                2.0,
                3.0,
                4.0,
                1.0,
                2.0,
                3.0,
                4.0,
                1.0,
                2.0 * 2.0 / 3.0,
                3.0 / 3.0,
                0.0,
            ],
        );
    }

    #[test]
    fn test_split_loop_without_repeat_is_unchanged() {
        let clip = mono(8000, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let segment = Segment::split_loop(clip.clone(), 2).unwrap();
        let spec = LoopSpec::repeat(0).with_fade(FadeSpec::fade_out(EnvelopeKind::Cosine, 1.0));

        let output = assemble(&segment, &spec).unwrap();
        assert_eq!(output, clip);
    }

    #[test]
    fn test_split_loop_repeats_loop_region() {
        let segment = Segment::split_loop(mono(8000, &[1.0, 2.0, 3.0, 4.0]), 2).unwrap();
        let output = assemble(&segment, &LoopSpec::repeat(1)).unwrap();
        assert_eq!(samples(&output), vec![1.0, 2.0, 3.0, 4.0, 3.0, 4.0, 3.0, 4.0]);
    }

    #[test]
    fn test_length_without_fade() {
        let segment = Segment::intro_loop(mono(100, &[0.5; 7]), mono(100, &[0.25; 5])).unwrap();
        for repeats in 0..4 {
            let output = assemble(&segment, &LoopSpec::repeat(repeats)).unwrap();
            assert_eq!(output.len(), 7 + (repeats as usize + 1) * 5);
        }
    }

    #[test]
    fn test_fade_clamped_to_loop_length() {
        let segment = Segment::intro_loop(mono(100, &[0.5; 3]), mono(100, &[1.0; 10])).unwrap();
        let spec = LoopSpec::repeat(2).with_fade(FadeSpec::fade_out(EnvelopeKind::Linear, 60.0));

        let output = assemble(&segment, &spec).unwrap();
        let out = samples(&output);

        assert_eq!(output.len(), 3 + 3 * 10);
        assert_eq!(out[23], 1.0);
        assert_eq!(out[32], 0.0);
        assert!(out[24..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_partial_fade_keeps_head_of_loop() {
        let segment = Segment::loop_only(mono(10, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        let fade = FadeSpec::fade_out(EnvelopeKind::Linear, 0.3).with_gains(50.0, 50.0);

        let output = assemble(&segment, &LoopSpec::repeat(1).with_fade(fade)).unwrap();
        let out = samples(&output);

        assert_eq!(out.len(), 8 + 3);
        assert_close(&out[8..], &[0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_zero_length_fade_adds_no_tail() {
        let segment = Segment::loop_only(mono(100, &[1.0; 10]));
        let fade = FadeSpec::fade_out(EnvelopeKind::Linear, 0.001);

        let output = assemble(&segment, &LoopSpec::repeat(3).with_fade(fade)).unwrap();
        assert_eq!(output.len(), 30);
        assert!(samples(&output).iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_empty_loop_with_repeats_fails() {
        let segment = Segment::intro_loop(mono(100, &[1.0; 4]), mono(100, &[])).unwrap();

        let err = assemble(&segment, &LoopSpec::repeat(1)).unwrap_err();
        assert!(matches!(
            err,
            AudioError::InvalidLoopRegion {
                start: 0,
                end: 0,
                ..
            }
        ));

        let once = assemble(&segment, &LoopSpec::repeat(0)).unwrap();
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_fixed_ignores_loop_spec() {
        let clip = mono(100, &[0.1, 0.2, 0.3]);
        let segment = Segment::fixed(clip.clone());
        let spec = LoopSpec::repeat(5).with_fade(FadeSpec::fade_out(EnvelopeKind::Linear, 1.0));
        assert_eq!(assemble(&segment, &spec).unwrap(), clip);
    }

    #[test]
    fn test_stereo_tail_fades_every_channel() {
        let loop_clip = AudioBuffer::new(2, vec![vec![1.0, 1.0], vec![-1.0, -1.0]]).unwrap();
        let segment = Segment::loop_only(loop_clip);
        let spec = LoopSpec::repeat(1).with_fade(FadeSpec::fade_out(EnvelopeKind::EqualPower, 1.0));

        let output = assemble(&segment, &spec).unwrap();
        assert_eq!(output.channel(0), Some(&[1.0, 1.0, 1.0, 0.0][..]));
        assert_eq!(output.channel(1), Some(&[-1.0, -1.0, -1.0, 0.0][..]));
    }

    #[test]
    fn test_huge_repeat_count_fails_without_allocating() {
        let segment = Segment::loop_only(mono(44100, &vec![0.1; 1_000_000]));

        let err = assemble(&segment, &LoopSpec::repeat(u32::MAX)).unwrap_err();

        match err {
            AudioError::OutputTooLong { frames, limit, .. } => {
                assert_eq!(frames, (u32::MAX as u128 + 1) * 1_000_000);
                assert_eq!(limit, MAX_FRAMES);
            }
            other => panic!("expected OutputTooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_count_just_past_limit() {
        let segment = Segment::loop_only(mono(100, &[0.5; 4]));
        let max_repeats = (MAX_FRAMES / 4) as u32;
        let err = assemble(&segment, &LoopSpec::repeat(max_repeats)).unwrap_err();
        assert!(matches!(err, AudioError::OutputTooLong { .. }));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let segment = Segment::intro_loop(
            mono(50, &[0.3, -0.2, 0.1]),
            mono(50, &[0.9, -0.7, 0.5, -0.3, 0.2]),
        )
        .unwrap();
        let fade = FadeSpec::fade_out(EnvelopeKind::Linear, 0.08).with_shape(0.7);
        let spec = LoopSpec::repeat(4).with_fade(fade);

        let a = assemble(&segment, &spec).unwrap();
        let b = assemble(&segment, &spec).unwrap();
        assert_eq!(a, b);
    }
}
