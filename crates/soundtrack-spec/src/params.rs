//! Resolved, strongly-typed loop, fade, and silence parameters.
//!
//! These are what the engine consumes. They are built from the loose config
//! shapes in [`crate::config`] once, at resolution time.

use serde::{Deserialize, Serialize};

use crate::curve::EnvelopeKind;

/// Fade applied to the trailing partial loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeSpec {
    /// Envelope shape.
    pub curve: EnvelopeKind,
    /// Fade length in seconds. Clamped to one loop iteration by the engine.
    pub duration_seconds: f64,
    /// Gain at the first faded frame, on the 0-100 scale.
    pub start_gain: f64,
    /// Gain at the last faded frame, on the 0-100 scale.
    pub end_gain: f64,
    /// Curve bend in [-1, 1]. Only `linear` uses it; 0 is a straight line.
    pub shape_param: f64,
}

impl FadeSpec {
    /// Creates a fade-out from full level to silence.
    pub fn fade_out(curve: EnvelopeKind, duration_seconds: f64) -> Self {
        Self {
            curve,
            duration_seconds,
            start_gain: 100.0,
            end_gain: 0.0,
            shape_param: 0.0,
        }
    }

    /// Sets the start and end gains.
    pub fn with_gains(mut self, start_gain: f64, end_gain: f64) -> Self {
        self.start_gain = start_gain;
        self.end_gain = end_gain;
        self
    }

    /// Sets the shape parameter.
    pub fn with_shape(mut self, shape_param: f64) -> Self {
        self.shape_param = shape_param;
        self
    }
}

/// How many times a loop region repeats, and how the extra pass ends.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoopSpec {
    /// Full, unmodified repetitions after the first pass of the intro.
    pub repeat_count: u32,
    /// Fade for the trailing partial loop. `None` appends a full extra loop.
    pub fade: Option<FadeSpec>,
}

impl LoopSpec {
    /// Creates a loop spec without a fade.
    pub fn repeat(repeat_count: u32) -> Self {
        Self {
            repeat_count,
            fade: None,
        }
    }

    /// Sets the fade for the trailing loop.
    pub fn with_fade(mut self, fade: FadeSpec) -> Self {
        self.fade = Some(fade);
        self
    }
}

/// Silence padding around a finished track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SilenceSpec {
    /// Silence prepended, in seconds.
    pub lead_in_seconds: f64,
    /// Silence appended, in seconds.
    pub trail_out_seconds: f64,
}

impl SilenceSpec {
    /// Creates a silence spec.
    pub fn new(lead_in_seconds: f64, trail_out_seconds: f64) -> Self {
        Self {
            lead_in_seconds,
            trail_out_seconds,
        }
    }
}
