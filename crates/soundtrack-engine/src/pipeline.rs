//! Track pipeline.
//!
//! Turns one immutable [`TrackDescriptor`] into a finished buffer and tag map:
//! every stem is assembled, multiple stems are mixed, silence is added around
//! the result, and the tag sources are merged. No file I/O happens here.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;
use soundtrack_spec::{merge_tags, LoopSpec, SilenceSpec, TagMap, TagValue};

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::loop_assembly::assemble;
use crate::mixer::Mixer;
use crate::segment::Segment;

/// One stem of a track.
#[derive(Debug, Clone, PartialEq)]
pub struct Stem {
    /// The stem's audio.
    pub segment: Segment,
    /// Loop settings for this stem only. `None` uses the track's.
    pub loop_spec: Option<LoopSpec>,
}

impl Stem {
    /// Creates a stem that follows the track's loop settings.
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            loop_spec: None,
        }
    }

    /// Sets stem-specific loop settings.
    pub fn with_loop(mut self, loop_spec: LoopSpec) -> Self {
        self.loop_spec = Some(loop_spec);
        self
    }
}

/// Everything needed to produce one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    /// Track title, also the derived `title` tag.
    pub title: String,
    /// 1-based position in the soundtrack, also the derived `track` tag.
    pub track_number: Option<u32>,
    /// Stems in mix order.
    pub stems: Vec<Stem>,
    /// Loop settings for stems without their own.
    pub loop_spec: LoopSpec,
    /// Silence around the finished track.
    pub silence: SilenceSpec,
    /// Tags given for this track.
    pub tags: TagMap,
    /// Soundtrack-wide tags, overridden by everything else.
    pub global_tags: TagMap,
}

impl TrackDescriptor {
    /// Creates a descriptor with no looping, silence, or tags.
    pub fn new(title: impl Into<String>, stems: Vec<Stem>) -> Self {
        Self {
            title: title.into(),
            track_number: None,
            stems,
            loop_spec: LoopSpec::default(),
            silence: SilenceSpec::default(),
            tags: TagMap::new(),
            global_tags: TagMap::new(),
        }
    }

    /// Sets the track number.
    pub fn with_track_number(mut self, track_number: u32) -> Self {
        self.track_number = Some(track_number);
        self
    }

    /// Sets the track-level loop settings.
    pub fn with_loop(mut self, loop_spec: LoopSpec) -> Self {
        self.loop_spec = loop_spec;
        self
    }

    /// Sets the silence padding.
    pub fn with_silence(mut self, silence: SilenceSpec) -> Self {
        self.silence = silence;
        self
    }

    /// Sets the track tags.
    pub fn with_tags(mut self, tags: TagMap) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the soundtrack-wide tags.
    pub fn with_global_tags(mut self, global_tags: TagMap) -> Self {
        self.global_tags = global_tags;
        self
    }

    /// Tags derived from the descriptor itself.
    pub fn derived_tags(&self) -> TagMap {
        let mut tags = TagMap::new();
        tags.insert("title".to_string(), TagValue::from(self.title.as_str()));
        if let Some(number) = self.track_number {
            tags.insert("track".to_string(), TagValue::Integer(i64::from(number)));
        }
        tags
    }

    /// Final tag map: global, then derived, then track tags, later wins.
    pub fn merged_tags(&self) -> TagMap {
        let derived = self.derived_tags();
        merge_tags([&self.global_tags, &derived, &self.tags])
    }
}

/// Non-fatal condition raised while producing a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackWarning {
    /// Mixed stems exceeded the representable range and were saturated.
    ClippingOccurred {
        /// Samples saturated, across all channels.
        clipped_samples: usize,
        /// Peak magnitude before saturation.
        peak: f64,
    },
}

impl fmt::Display for TrackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackWarning::ClippingOccurred {
                clipped_samples,
                peak,
            } => write!(
                f,
                "mix clipped {} samples (peak {:.3})",
                clipped_samples, peak
            ),
        }
    }
}

/// A finished track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackOutput {
    /// Final audio.
    pub buffer: AudioBuffer,
    /// Final tag map.
    pub tags: TagMap,
    /// Non-fatal conditions met along the way.
    pub warnings: Vec<TrackWarning>,
}

/// Produces one track.
///
/// # Errors
/// Fails with the first stem error, re-tagged with that stem's index, or with
/// [`AudioError::EmptyMix`] if the descriptor has no stems. No partial output
/// is returned.
pub fn produce(descriptor: &TrackDescriptor) -> AudioResult<TrackOutput> {
    if descriptor.stems.is_empty() {
        return Err(AudioError::EmptyMix);
    }

    let mut mixer = Mixer::new();
    for (index, stem) in descriptor.stems.iter().enumerate() {
        let loop_spec = stem.loop_spec.as_ref().unwrap_or(&descriptor.loop_spec);
        let assembled = assemble(&stem.segment, loop_spec).map_err(|e| e.with_stem(index))?;
        debug!(
            "'{}' stem {}: {} frames",
            descriptor.title,
            index,
            assembled.len()
        );
        mixer.add_stem(assembled)?;
    }

    let mixed = mixer.mix()?;
    let mut warnings = Vec::new();
    if mixed.clipped() {
        let warning = TrackWarning::ClippingOccurred {
            clipped_samples: mixed.clipped_samples,
            peak: mixed.peak,
        };
        warn!("'{}': {}", descriptor.title, warning);
        warnings.push(warning);
    }

    let buffer = mixed.buffer;
    let lead = buffer.seconds_to_frames(descriptor.silence.lead_in_seconds);
    let trail = buffer.seconds_to_frames(descriptor.silence.trail_out_seconds);
    let buffer = buffer.pad(lead, trail)?;

    info!(
        "produced '{}': {} stem(s), {} frames ({:.2}s)",
        descriptor.title,
        descriptor.stems.len(),
        buffer.len(),
        buffer.duration_seconds()
    );

    Ok(TrackOutput {
        buffer,
        tags: descriptor.merged_tags(),
        warnings,
    })
}
