//! Soundtrack config file types.
//!
//! A config describes every track of a soundtrack: which clips make up each
//! stem, how loops repeat and fade, how much silence surrounds the result,
//! and which tags to attach. Loop, fade, and silence settings cascade from
//! the global level to the track level to the individual stem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::{EnvelopeKind, UnsupportedCurve};
use crate::params::{FadeSpec, LoopSpec, SilenceSpec};
use crate::tags::TagMap;

/// Top-level soundtrack config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundtrackConfig {
    /// Default silence padding for every track.
    #[serde(default)]
    pub silence: SilenceConfig,
    /// Default loop settings for every track.
    #[serde(default, rename = "loop")]
    pub loop_config: LoopConfig,
    /// Soundtrack-wide metadata.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Output directory, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Tracks, in album order.
    pub tracks: Vec<TrackConfig>,
}

impl SoundtrackConfig {
    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Silence padding in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SilenceConfig {
    /// Seconds of silence before the track.
    #[serde(default)]
    pub start: f64,
    /// Seconds of silence after the track.
    #[serde(default)]
    pub end: f64,
}

impl SilenceConfig {
    /// Converts to the engine's silence parameters.
    pub fn resolve(&self) -> SilenceSpec {
        SilenceSpec::new(self.start, self.end)
    }
}

/// Loop repetition settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoopConfig {
    /// Number of full loop repetitions.
    #[serde(default)]
    pub count: u32,
    /// Fade for the trailing partial loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade: Option<FadeConfig>,
}

impl LoopConfig {
    /// Converts to the engine's loop parameters, looking up the curve name.
    pub fn resolve(&self) -> Result<LoopSpec, UnsupportedCurve> {
        let fade = self.fade.as_ref().map(FadeConfig::resolve).transpose()?;
        Ok(LoopSpec {
            repeat_count: self.count,
            fade,
        })
    }
}

/// Fade settings as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FadeConfig {
    /// Curve name (see [`EnvelopeKind`]).
    #[serde(rename = "type", default = "default_curve")]
    pub curve: String,
    /// Fade length in seconds.
    pub duration: f64,
    /// Gains and shaping.
    #[serde(default)]
    pub options: FadeOptions,
}

fn default_curve() -> String {
    EnvelopeKind::Linear.as_str().to_string()
}

impl FadeConfig {
    /// Converts to the engine's fade parameters.
    pub fn resolve(&self) -> Result<FadeSpec, UnsupportedCurve> {
        let curve: EnvelopeKind = self.curve.parse()?;
        Ok(FadeSpec {
            curve,
            duration_seconds: self.duration,
            start_gain: self.options.start,
            end_gain: self.options.end,
            shape_param: self.options.fade_adjust,
        })
    }
}

/// Fade gains (0-100 scale) and the fade-adjust shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FadeOptions {
    /// Gain at the start of the fade.
    #[serde(default = "default_start_gain")]
    pub start: f64,
    /// Gain at the end of the fade.
    #[serde(default)]
    pub end: f64,
    /// Curve bend in [-1, 1].
    #[serde(default)]
    pub fade_adjust: f64,
}

fn default_start_gain() -> f64 {
    100.0
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            start: default_start_gain(),
            end: 0.0,
            fade_adjust: 0.0,
        }
    }
}

/// Soundtrack-wide metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataConfig {
    /// Tags applied to every track, overridden by track tags.
    #[serde(default)]
    pub tags: TagMap,
}

/// One track of the soundtrack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackConfig {
    /// Track title. Also the derived `title` tag.
    pub title: String,
    /// One segment, or several stems mixed together.
    pub track: TrackSource,
    /// Tags for this track only.
    #[serde(default, skip_serializing_if = "TagMap::is_empty")]
    pub metadata: TagMap,
    /// Loop settings overriding the global ones.
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_config: Option<LoopConfig>,
    /// Silence settings overriding the global ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silence: Option<SilenceConfig>,
}

impl TrackConfig {
    /// Returns the stems of this track in mix order.
    pub fn stems(&self) -> &[SegmentEntry] {
        match &self.track {
            TrackSource::Single(entry) => std::slice::from_ref(entry),
            TrackSource::Stems(entries) => entries,
        }
    }

    /// Returns the loop settings in effect for this track.
    pub fn effective_loop<'a>(&'a self, soundtrack: &'a SoundtrackConfig) -> &'a LoopConfig {
        self.loop_config.as_ref().unwrap_or(&soundtrack.loop_config)
    }

    /// Returns the silence settings in effect for this track.
    pub fn effective_silence(&self, soundtrack: &SoundtrackConfig) -> SilenceConfig {
        self.silence.unwrap_or(soundtrack.silence)
    }
}

/// The audio making up a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackSource {
    /// Several stems, summed sample for sample.
    Stems(Vec<SegmentEntry>),
    /// A single segment.
    Single(SegmentEntry),
}

/// A stem: a bare file path or a segment object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentEntry {
    /// A file played once.
    Path(String),
    /// A segment object.
    Segment(SegmentConfig),
}

impl SegmentEntry {
    /// Classifies the entry into a segment shape.
    pub fn shape(&self) -> Result<SegmentShape<'_>, ShapeError> {
        match self {
            SegmentEntry::Path(file) => Ok(SegmentShape::Fixed { file }),
            SegmentEntry::Segment(config) => config.shape(),
        }
    }

    /// Returns the per-stem loop override, if any.
    pub fn repeat(&self) -> Option<&LoopConfig> {
        match self {
            SegmentEntry::Path(_) => None,
            SegmentEntry::Segment(config) => config.repeat.as_ref(),
        }
    }
}

/// Segment keys as written in a config file.
///
/// Which keys are present decides the shape:
///
/// | keys            | shape       |
/// |-----------------|-------------|
/// | `file`          | fixed       |
/// | `file`, `loop`  | split loop (`loop` is a sample index) |
/// | `intro`, `loop` | intro+loop  |
/// | `loop`          | loop only   |
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentConfig {
    /// Whole clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Intro clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    /// Loop clip path, or loop start sample when `file` is set.
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_ref: Option<LoopRef>,
    /// Loop settings for this stem only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<LoopConfig>,
}

/// Value of a segment's `loop` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoopRef {
    /// Sample index.
    Sample(u64),
    /// File path, or a sample index written as a string.
    Text(String),
}

/// Classified segment keys, still referring to files by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentShape<'a> {
    /// Played once.
    Fixed {
        /// Clip path.
        file: &'a str,
    },
    /// Intro once, then the loop clip.
    IntroLoop {
        /// Intro clip path.
        intro: &'a str,
        /// Loop clip path.
        loop_file: &'a str,
    },
    /// Loop clip from frame 0.
    LoopOnly {
        /// Loop clip path.
        loop_file: &'a str,
    },
    /// One clip with a loop start sample.
    SplitLoop {
        /// Clip path.
        file: &'a str,
        /// First frame of the loop region.
        loop_start: u64,
    },
}

/// Why a segment's keys could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The key combination is not a known shape.
    #[error("{0}")]
    InvalidShape(String),
    /// `loop` next to `file` is not a sample index.
    #[error("loop point '{0}' is not a sample index")]
    InvalidLoopPoint(String),
}

impl SegmentConfig {
    /// Classifies the keys into a segment shape.
    pub fn shape(&self) -> Result<SegmentShape<'_>, ShapeError> {
        match (&self.file, &self.intro, &self.loop_ref) {
            (Some(file), None, None) => Ok(SegmentShape::Fixed { file }),
            (Some(file), None, Some(loop_ref)) => {
                let loop_start = match loop_ref {
                    LoopRef::Sample(sample) => *sample,
                    LoopRef::Text(text) => text
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ShapeError::InvalidLoopPoint(text.clone()))?,
                };
                Ok(SegmentShape::SplitLoop { file, loop_start })
            }
            (None, intro, Some(LoopRef::Text(loop_file))) => Ok(match intro {
                Some(intro) => SegmentShape::IntroLoop { intro, loop_file },
                None => SegmentShape::LoopOnly { loop_file },
            }),
            (None, _, Some(LoopRef::Sample(sample))) => Err(ShapeError::InvalidShape(format!(
                "loop sample {} needs a 'file' to loop within",
                sample
            ))),
            (Some(_), Some(_), _) => Err(ShapeError::InvalidShape(
                "'file' and 'intro' cannot be combined".to_string(),
            )),
            (None, Some(_), None) => Err(ShapeError::InvalidShape(
                "'intro' requires a 'loop'".to_string(),
            )),
            (None, None, None) => Err(ShapeError::InvalidShape(
                "segment needs 'file', 'loop', or 'intro' and 'loop'".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segment(json: &str) -> SegmentEntry {
        serde_json::from_str(json).expect("segment should parse")
    }

    #[test]
    fn test_bare_path_is_fixed() {
        let entry = segment(r#""jingle.wav""#);
        assert_eq!(
            entry.shape(),
            Ok(SegmentShape::Fixed {
                file: "jingle.wav"
            })
        );
    }

    #[test]
    fn test_segment_shapes() {
        assert_eq!(
            segment(r#"{"file": "a.wav"}"#).shape(),
            Ok(SegmentShape::Fixed { file: "a.wav" })
        );
        assert_eq!(
            segment(r#"{"intro": "i.wav", "loop": "l.wav"}"#).shape(),
            Ok(SegmentShape::IntroLoop {
                intro: "i.wav",
                loop_file: "l.wav"
            })
        );
        assert_eq!(
            segment(r#"{"loop": "l.wav"}"#).shape(),
            Ok(SegmentShape::LoopOnly {
                loop_file: "l.wav"
            })
        );
        assert_eq!(
            segment(r#"{"file": "a.wav", "loop": 123456}"#).shape(),
            Ok(SegmentShape::SplitLoop {
                file: "a.wav",
                loop_start: 123456
            })
        );
        assert_eq!(
            segment(r#"{"file": "a.wav", "loop": "4410"}"#).shape(),
            Ok(SegmentShape::SplitLoop {
                file: "a.wav",
                loop_start: 4410
            })
        );
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(
            segment(r#"{"file": "a.wav", "loop": "l.wav"}"#).shape(),
            Err(ShapeError::InvalidLoopPoint("l.wav".to_string()))
        );
        assert!(matches!(
            segment(r#"{"intro": "i.wav"}"#).shape(),
            Err(ShapeError::InvalidShape(_))
        ));
        assert!(matches!(
            segment(r#"{"loop": 42}"#).shape(),
            Err(ShapeError::InvalidShape(_))
        ));
        assert!(matches!(
            segment(r#"{"file": "a.wav", "intro": "i.wav", "loop": "l.wav"}"#).shape(),
            Err(ShapeError::InvalidShape(_))
        ));
        assert!(matches!(
            segment(r#"{}"#).shape(),
            Err(ShapeError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_unknown_segment_keys_rejected() {
        let result: Result<SegmentEntry, _> = serde_json::from_str(r#"{"flie": "a.wav"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_fade_defaults() {
        let fade: FadeConfig = serde_json::from_str(r#"{"duration": 5.0}"#).unwrap();
        let spec = fade.resolve().unwrap();
        assert_eq!(spec.curve, EnvelopeKind::Linear);
        assert_eq!(spec.start_gain, 100.0);
        assert_eq!(spec.end_gain, 0.0);
        assert_eq!(spec.shape_param, 0.0);
    }

    #[test]
    fn test_loop_resolve_rejects_unknown_curve() {
        let config = LoopConfig {
            count: 2,
            fade: Some(FadeConfig {
                curve: "sawtooth".to_string(),
                duration: 1.0,
                options: FadeOptions::default(),
            }),
        };
        assert_eq!(config.resolve().unwrap_err().name, "sawtooth");
    }

    #[test]
    fn test_track_overrides_cascade() {
        let json = r#"{
            "silence": {"start": 1.0, "end": 2.0},
            "loop": {"count": 2},
            "tracks": [
                {"title": "A", "track": "a.wav"},
                {"title": "B", "track": "b.wav", "loop": {"count": 5}, "silence": {"end": 0.5}}
            ]
        }"#;
        let config = SoundtrackConfig::from_json(json).unwrap();

        let a = &config.tracks[0];
        assert_eq!(a.effective_loop(&config).count, 2);
        assert_eq!(a.effective_silence(&config).start, 1.0);

        let b = &config.tracks[1];
        assert_eq!(b.effective_loop(&config).count, 5);
        let silence = b.effective_silence(&config);
        assert_eq!(silence.start, 0.0);
        assert_eq!(silence.end, 0.5);
    }

    #[test]
    fn test_stem_list() {
        let json = r#"{
            "title": "Boss",
            "track": [
                {"intro": "i.wav", "loop": "l.wav"},
                {"file": "drums.wav", "loop": "4410", "repeat": {"count": 3}}
            ]
        }"#;
        let track: TrackConfig = serde_json::from_str(json).unwrap();
        let stems = track.stems();
        assert_eq!(stems.len(), 2);
        assert!(stems[0].repeat().is_none());
        assert_eq!(stems[1].repeat().map(|r| r.count), Some(3));
    }
}
