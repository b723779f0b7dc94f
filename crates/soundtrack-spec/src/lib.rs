//! Soundtrack Config Library
//!
//! This crate provides the declarative side of the soundtrack builder: the
//! JSON config model, the registry of named fade curves, the tag model, and
//! config validation. It never touches audio data.
//!
//! # Overview
//!
//! A config lists tracks. Each track is one segment or several stems, where
//! a segment is one of:
//!
//! - **Fixed** - a clip played once
//! - **Intro + loop** - an intro clip followed by a repeating loop clip
//! - **Loop only** - a loop clip repeated from its first frame
//! - **Split loop** - one clip with a loop start sample
//!
//! Loop repetition, the trailing fade, and silence padding cascade from the
//! global level to each track and stem.
//!
//! # Example
//!
//! ```
//! use soundtrack_spec::{validate_config, SoundtrackConfig};
//!
//! let config = SoundtrackConfig::from_json(r#"{
//!     "loop": {"count": 2, "fade": {"type": "linear", "duration": 10}},
//!     "metadata": {"tags": {"album": "Game OST"}},
//!     "tracks": [
//!         {"title": "Title Screen", "track": {"intro": "intro.wav", "loop": "loop.wav"}}
//!     ]
//! }"#).unwrap();
//!
//! let result = validate_config(&config);
//! assert!(result.is_ok());
//!
//! let loop_spec = config.tracks[0].effective_loop(&config).resolve().unwrap();
//! assert_eq!(loop_spec.repeat_count, 2);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Config file types
//! - [`curve`]: Named fade curves
//! - [`error`]: Error and warning types for validation
//! - [`params`]: Resolved loop, fade, and silence parameters
//! - [`tags`]: Tag values and merging
//! - [`validation`]: Config validation

pub mod config;
pub mod curve;
pub mod error;
pub mod params;
pub mod tags;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::{
    FadeConfig, FadeOptions, LoopConfig, LoopRef, MetadataConfig, SegmentConfig, SegmentEntry,
    SegmentShape, ShapeError, SilenceConfig, SoundtrackConfig, TrackConfig, TrackSource,
};
pub use curve::{EnvelopeKind, UnsupportedCurve};
pub use error::{
    BackendError, ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use params::{FadeSpec, LoopSpec, SilenceSpec};
pub use tags::{merge_tags, TagMap, TagValue};
pub use validation::{validate_config, MAX_GAIN};
