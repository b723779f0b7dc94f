//! Descriptor resolution.
//!
//! Turns a validated [`TrackConfig`] into an immutable [`TrackDescriptor`]:
//! clips are fetched through a [`ClipSource`], segment shapes become
//! [`Segment`] values, and the loop, silence, and tag settings are resolved
//! with stem over track over global precedence.

use std::collections::HashMap;

use log::debug;
use soundtrack_spec::{SegmentEntry, SegmentShape, SoundtrackConfig, TrackConfig};

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::pipeline::{Stem, TrackDescriptor};
use crate::segment::Segment;

/// Supplies decoded clips by the path written in the config.
pub trait ClipSource {
    /// Loads one clip.
    ///
    /// # Errors
    /// Implementations report missing or undecodable clips as
    /// [`AudioError::ClipLoad`].
    fn load(&self, path: &str) -> AudioResult<AudioBuffer>;
}

impl ClipSource for HashMap<String, AudioBuffer> {
    fn load(&self, path: &str) -> AudioResult<AudioBuffer> {
        self.get(path)
            .cloned()
            .ok_or_else(|| AudioError::clip_load(path, "no such clip"))
    }
}

/// Resolves one track of a soundtrack.
///
/// Stems with fewer channels than the widest stem are upmixed to match.
/// Sample rates are never converted.
///
/// # Arguments
/// * `index` - 0-based position of the track; the track number is `index + 1`
/// * `track` - The track's config
/// * `config` - The whole soundtrack config, for global settings
/// * `source` - Where clips come from
///
/// # Errors
/// Any segment, curve, or clip error, tagged with the stem index where one
/// applies.
pub fn resolve_track(
    index: usize,
    track: &TrackConfig,
    config: &SoundtrackConfig,
    source: &dyn ClipSource,
) -> AudioResult<TrackDescriptor> {
    let mut stems = Vec::with_capacity(track.stems().len());
    for (stem_index, entry) in track.stems().iter().enumerate() {
        let stem = resolve_stem(entry, source).map_err(|e| e.with_stem(stem_index))?;
        stems.push(stem);
    }

    let widest = stems
        .iter()
        .map(|stem| stem.segment.format().channels)
        .max()
        .unwrap_or(1);
    let stems = stems
        .into_iter()
        .enumerate()
        .map(|(stem_index, stem)| -> AudioResult<Stem> {
            if stem.segment.format().channels == widest {
                return Ok(stem);
            }
            debug!(
                "'{}' stem {}: upmixing to {} channels",
                track.title, stem_index, widest
            );
            Ok(Stem {
                segment: stem.segment.with_channels(widest)?,
                loop_spec: stem.loop_spec,
            })
        })
        .collect::<AudioResult<Vec<_>>>()?;

    let track_number = u32::try_from(index + 1)
        .map_err(|_| AudioError::invalid_param("index", "track number does not fit in u32"))?;

    Ok(TrackDescriptor::new(track.title.clone(), stems)
        .with_track_number(track_number)
        .with_loop(track.effective_loop(config).resolve()?)
        .with_silence(track.effective_silence(config).resolve())
        .with_tags(track.metadata.clone())
        .with_global_tags(config.metadata.tags.clone()))
}

fn resolve_stem(entry: &SegmentEntry, source: &dyn ClipSource) -> AudioResult<Stem> {
    let shape = entry.shape().map_err(|e| AudioError::InvalidSegment {
        stem: 0,
        message: e.to_string(),
    })?;

    let segment = match shape {
        SegmentShape::Fixed { file } => Segment::fixed(source.load(file)?),
        SegmentShape::LoopOnly { loop_file } => Segment::loop_only(source.load(loop_file)?),
        SegmentShape::IntroLoop { intro, loop_file } => {
            let (intro, loop_clip) = match_channels(source.load(intro)?, source.load(loop_file)?)?;
            Segment::intro_loop(intro, loop_clip)?
        }
        SegmentShape::SplitLoop { file, loop_start } => {
            let clip = source.load(file)?;
            let loop_start = usize::try_from(loop_start).unwrap_or(usize::MAX);
            Segment::split_loop(clip, loop_start)?
        }
    };

    let loop_spec = entry.repeat().map(|r| r.resolve()).transpose()?;
    Ok(Stem { segment, loop_spec })
}

/// Brings two clips of one segment to the same channel count.
fn match_channels(a: AudioBuffer, b: AudioBuffer) -> AudioResult<(AudioBuffer, AudioBuffer)> {
    let channels = a.channel_count().max(b.channel_count());
    Ok((a.with_channels(channels)?, b.with_channels(channels)?))
}
