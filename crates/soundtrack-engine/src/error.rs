//! Error types for the soundtrack engine.

use soundtrack_spec::{BackendError, UnsupportedCurve};
use thiserror::Error;

use crate::buffer::SampleFormat;

/// Result type for engine operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while assembling a track.
///
/// Every variant is fatal for the track it was raised in. Errors raised
/// inside one stem carry that stem's index.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Fade curve name is not registered.
    #[error("unsupported fade curve '{name}'")]
    UnsupportedCurve {
        /// The rejected curve name.
        name: String,
    },

    /// Loop requested over an empty or out-of-bounds loop region.
    #[error("stem {stem}: invalid loop region {start}..{end} in a clip of {clip_len} frames")]
    InvalidLoopRegion {
        /// Index of the stem at fault.
        stem: usize,
        /// First frame of the loop region.
        start: usize,
        /// One past the last frame of the loop region.
        end: usize,
        /// Frames in the clip holding the region.
        clip_len: usize,
    },

    /// Buffers combined in one operation differ in sample rate or channels.
    #[error("stem {stem}: sample format mismatch, expected {expected}, found {found}")]
    SampleFormatMismatch {
        /// Index of the stem at fault.
        stem: usize,
        /// Format of the buffers already combined.
        expected: SampleFormat,
        /// Format of the offending buffer.
        found: SampleFormat,
    },

    /// Segment keys do not describe a segment.
    #[error("stem {stem}: {message}")]
    InvalidSegment {
        /// Index of the stem at fault.
        stem: usize,
        /// What is wrong with the segment.
        message: String,
    },

    /// Assembled output would exceed [`MAX_FRAMES`](crate::buffer::MAX_FRAMES).
    #[error("stem {stem}: output of {frames} frames exceeds the limit of {limit}")]
    OutputTooLong {
        /// Index of the stem at fault.
        stem: usize,
        /// Frames the output would need.
        frames: u128,
        /// Largest allowed frame count.
        limit: usize,
    },

    /// Mix requested over no buffers.
    #[error("cannot mix an empty list of stems")]
    EmptyMix,

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A source clip could not be loaded.
    #[error("failed to load clip '{path}': {message}")]
    ClipLoad {
        /// Clip path as written in the config.
        path: String,
        /// Loader error message.
        message: String,
    },

    /// The per-track worker pool could not be started.
    #[error("worker pool error: {message}")]
    WorkerPool {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a clip load error.
    pub fn clip_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ClipLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Re-tags a stem-level error with the index of the stem it came from.
    ///
    /// Errors without a stem index are returned unchanged.
    pub fn with_stem(self, index: usize) -> Self {
        match self {
            AudioError::InvalidLoopRegion {
                start,
                end,
                clip_len,
                ..
            } => AudioError::InvalidLoopRegion {
                stem: index,
                start,
                end,
                clip_len,
            },
            AudioError::SampleFormatMismatch {
                expected, found, ..
            } => AudioError::SampleFormatMismatch {
                stem: index,
                expected,
                found,
            },
            AudioError::InvalidSegment { message, .. } => AudioError::InvalidSegment {
                stem: index,
                message,
            },
            AudioError::OutputTooLong { frames, limit, .. } => AudioError::OutputTooLong {
                stem: index,
                frames,
                limit,
            },
            other => other,
        }
    }

    /// Returns the stem index carried by the error, if any.
    pub fn stem(&self) -> Option<usize> {
        match self {
            AudioError::InvalidLoopRegion { stem, .. }
            | AudioError::SampleFormatMismatch { stem, .. }
            | AudioError::InvalidSegment { stem, .. }
            | AudioError::OutputTooLong { stem, .. } => Some(*stem),
            _ => None,
        }
    }
}

impl From<UnsupportedCurve> for AudioError {
    fn from(err: UnsupportedCurve) -> Self {
        AudioError::UnsupportedCurve { name: err.name }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::UnsupportedCurve { .. } => "AUDIO_001",
            AudioError::InvalidLoopRegion { .. } => "AUDIO_002",
            AudioError::SampleFormatMismatch { .. } => "AUDIO_003",
            AudioError::InvalidSegment { .. } => "AUDIO_004",
            AudioError::EmptyMix => "AUDIO_005",
            AudioError::InvalidParameter { .. } => "AUDIO_006",
            AudioError::ClipLoad { .. } => "AUDIO_007",
            AudioError::WorkerPool { .. } => "AUDIO_008",
            AudioError::Io(_) => "AUDIO_009",
            AudioError::OutputTooLong { .. } => "AUDIO_010",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}
