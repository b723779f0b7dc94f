//! Soundtrack config validation.
//!
//! Validation runs once, before any audio is loaded, so the engine only ever
//! sees well-formed segments and fades.

use std::collections::HashSet;

use crate::config::{
    FadeConfig, LoopConfig, ShapeError, SilenceConfig, SoundtrackConfig, TrackSource,
};
use crate::curve::EnvelopeKind;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};

/// Upper bound of the gain scale.
pub const MAX_GAIN: f64 = 100.0;

/// Validates a soundtrack config and returns a validation result.
///
/// # Example
/// ```
/// use soundtrack_spec::{validate_config, SoundtrackConfig};
///
/// let config = SoundtrackConfig::from_json(r#"{
///     "tracks": [{"title": "Title Screen", "track": "title.wav", "metadata": {"artist": "A"}}]
/// }"#).unwrap();
///
/// let result = validate_config(&config);
/// assert!(result.is_ok());
/// ```
pub fn validate_config(config: &SoundtrackConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_silence(&config.silence, "silence", &mut result);
    validate_loop(&config.loop_config, "loop", &mut result);

    let mut titles = HashSet::new();
    for (index, track) in config.tracks.iter().enumerate() {
        let path = format!("tracks[{}]", index);

        if track.title.trim().is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::EmptyTitle,
                "track title must not be empty",
                format!("{}.title", path),
            ));
        } else if !titles.insert(track.title.as_str()) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateTitle,
                format!("track title '{}' is used more than once", track.title),
                format!("{}.title", path),
            ));
        }

        let stems = track.stems();
        if stems.is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::NoStems,
                "track must have at least one segment",
                format!("{}.track", path),
            ));
        }
        for (stem_index, stem) in stems.iter().enumerate() {
            let stem_path = if matches!(track.track, TrackSource::Single(_)) {
                format!("{}.track", path)
            } else {
                format!("{}.track[{}]", path, stem_index)
            };
            match stem.shape() {
                Ok(_) => {}
                Err(ShapeError::InvalidShape(message)) => {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::InvalidSegmentShape,
                        message,
                        stem_path.clone(),
                    ));
                }
                Err(err @ ShapeError::InvalidLoopPoint(_)) => {
                    result.add_error(ValidationError::with_path(
                        ErrorCode::InvalidLoopPoint,
                        err.to_string(),
                        format!("{}.loop", stem_path),
                    ));
                }
            }
            if let Some(repeat) = stem.repeat() {
                validate_loop(repeat, &format!("{}.repeat", stem_path), &mut result);
            }
        }

        if let Some(ref loop_config) = track.loop_config {
            validate_loop(loop_config, &format!("{}.loop", path), &mut result);
        }
        if let Some(ref silence) = track.silence {
            validate_silence(silence, &format!("{}.silence", path), &mut result);
        }

        if track.metadata.is_empty() && config.metadata.tags.is_empty() {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::NoTrackTags,
                format!("track '{}' only receives derived tags", track.title),
                path,
            ));
        }
    }

    result
}

fn validate_silence(silence: &SilenceConfig, path: &str, result: &mut ValidationResult) {
    for (value, key) in [(silence.start, "start"), (silence.end, "end")] {
        if !value.is_finite() || value < 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidDuration,
                format!("silence must be a non-negative number of seconds, got {}", value),
                format!("{}.{}", path, key),
            ));
        }
    }
}

fn validate_loop(loop_config: &LoopConfig, path: &str, result: &mut ValidationResult) {
    let Some(ref fade) = loop_config.fade else {
        return;
    };
    let fade_path = format!("{}.fade", path);
    validate_fade(fade, &fade_path, result);

    if loop_config.count == 0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::FadeWithoutRepeat,
            "fade has no effect when the loop count is 0",
            fade_path,
        ));
    }
}

fn validate_fade(fade: &FadeConfig, path: &str, result: &mut ValidationResult) {
    if let Err(err) = fade.curve.parse::<EnvelopeKind>() {
        let known: Vec<&str> = EnvelopeKind::ALL.iter().map(|k| k.as_str()).collect();
        result.add_error(ValidationError::with_path(
            ErrorCode::UnsupportedCurve,
            format!("{} (expected one of: {})", err, known.join(", ")),
            format!("{}.type", path),
        ));
    }

    if !fade.duration.is_finite() || fade.duration < 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            format!(
                "fade duration must be a non-negative number of seconds, got {}",
                fade.duration
            ),
            format!("{}.duration", path),
        ));
    }

    for (gain, key) in [(fade.options.start, "start"), (fade.options.end, "end")] {
        if !(0.0..=MAX_GAIN).contains(&gain) {
            result.add_error(ValidationError::with_path(
                ErrorCode::GainOutOfRange,
                format!("gain must be between 0 and {}, got {}", MAX_GAIN, gain),
                format!("{}.options.{}", path, key),
            ));
        }
    }

    if !(-1.0..=1.0).contains(&fade.options.fade_adjust) {
        result.add_error(ValidationError::with_path(
            ErrorCode::ShapeParamOutOfRange,
            format!(
                "fade_adjust must be between -1 and 1, got {}",
                fade.options.fade_adjust
            ),
            format!("{}.options.fade_adjust", path),
        ));
    }
}
