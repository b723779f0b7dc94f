//! Segment model.
//!
//! A segment is the audio of one stem before looping: a clip played once, an
//! intro followed by a loop clip, a loop clip alone, or a single clip split at
//! a loop start frame.

use crate::buffer::{AudioBuffer, Region, SampleFormat};
use crate::error::{AudioError, AudioResult};

/// Audio of one stem, split into an intro and a loop region.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Played once, never repeated.
    Fixed {
        /// The clip.
        clip: AudioBuffer,
    },
    /// Intro played once, then the loop clip repeated.
    IntroLoop {
        /// Intro clip.
        intro: AudioBuffer,
        /// Loop clip.
        loop_clip: AudioBuffer,
    },
    /// Loop clip repeated from its first frame.
    LoopOnly {
        /// Loop clip.
        loop_clip: AudioBuffer,
    },
    /// One clip; frames before `loop_start` are the intro, the rest loops.
    SplitLoop {
        /// The clip.
        clip: AudioBuffer,
        /// First frame of the loop region.
        loop_start: usize,
    },
}

impl Segment {
    /// Creates a fixed segment.
    pub fn fixed(clip: AudioBuffer) -> Self {
        Segment::Fixed { clip }
    }

    /// Creates a loop-only segment.
    pub fn loop_only(loop_clip: AudioBuffer) -> Self {
        Segment::LoopOnly { loop_clip }
    }

    /// Creates an intro + loop segment.
    ///
    /// # Errors
    /// Returns [`AudioError::SampleFormatMismatch`] if the two clips differ in
    /// sample rate or channel count.
    pub fn intro_loop(intro: AudioBuffer, loop_clip: AudioBuffer) -> AudioResult<Self> {
        if intro.format() != loop_clip.format() {
            return Err(AudioError::SampleFormatMismatch {
                stem: 0,
                expected: intro.format(),
                found: loop_clip.format(),
            });
        }
        Ok(Segment::IntroLoop { intro, loop_clip })
    }

    /// Creates a split-loop segment.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidLoopRegion`] unless
    /// `loop_start < clip.len()`.
    pub fn split_loop(clip: AudioBuffer, loop_start: usize) -> AudioResult<Self> {
        if loop_start >= clip.len() {
            return Err(AudioError::InvalidLoopRegion {
                stem: 0,
                start: loop_start,
                end: clip.len(),
                clip_len: clip.len(),
            });
        }
        Ok(Segment::SplitLoop { clip, loop_start })
    }

    /// Sample format shared by every clip of the segment.
    pub fn format(&self) -> SampleFormat {
        match self {
            Segment::Fixed { clip } | Segment::SplitLoop { clip, .. } => clip.format(),
            Segment::IntroLoop { intro, .. } => intro.format(),
            Segment::LoopOnly { loop_clip } => loop_clip.format(),
        }
    }

    /// The part played once before any repetition.
    ///
    /// A fixed segment's whole clip counts as intro.
    pub fn intro(&self) -> Option<Region<'_>> {
        match self {
            Segment::Fixed { clip } => Some(clip.region(0..clip.len())),
            Segment::IntroLoop { intro, .. } => Some(intro.region(0..intro.len())),
            Segment::LoopOnly { .. } => None,
            Segment::SplitLoop { clip, loop_start } => Some(clip.region(0..*loop_start)),
        }
    }

    /// The repeating part, or `None` for a fixed segment.
    ///
    /// The region is clamped to its clip, so it may be empty.
    pub fn loop_region(&self) -> Option<Region<'_>> {
        match self {
            Segment::Fixed { .. } => None,
            Segment::IntroLoop { loop_clip, .. } | Segment::LoopOnly { loop_clip } => {
                Some(loop_clip.region(0..loop_clip.len()))
            }
            Segment::SplitLoop { clip, loop_start } => Some(clip.region(*loop_start..clip.len())),
        }
    }

    /// Total frames of one pass through intro and loop.
    pub fn base_len(&self) -> usize {
        self.intro().map_or(0, |r| r.len()) + self.loop_region().map_or(0, |r| r.len())
    }

    /// Returns the segment with every clip converted to `channels` channels.
    pub fn with_channels(self, channels: u16) -> AudioResult<Self> {
        Ok(match self {
            Segment::Fixed { clip } => Segment::Fixed {
                clip: clip.with_channels(channels)?,
            },
            Segment::IntroLoop { intro, loop_clip } => Segment::IntroLoop {
                intro: intro.with_channels(channels)?,
                loop_clip: loop_clip.with_channels(channels)?,
            },
            Segment::LoopOnly { loop_clip } => Segment::LoopOnly {
                loop_clip: loop_clip.with_channels(channels)?,
            },
            Segment::SplitLoop { clip, loop_start } => Segment::SplitLoop {
                clip: clip.with_channels(channels)?,
                loop_start,
            },
        })
    }
}
