//! Soundtrack Engine
//!
//! This crate turns resolved track descriptors into finished audio:
//!
//! - **Envelopes** - Named fade curves evaluated on a 0-100 gain scale
//! - **Segments** - Fixed clips, intro + loop pairs, loop-only clips, and
//!   clips split at a loop start frame
//! - **Loop assembly** - Intro, repeated loop passes, and a faded partial tail
//! - **Mixing** - Sample-aligned summation of stems with saturation
//! - **Pipeline** - Per-track orchestration, silence padding, and tag merging
//!
//! # Determinism
//!
//! Every stage is a pure function of its inputs. The same descriptor always
//! produces the same buffer, and the WAV encoder writes no timestamps, so the
//! BLAKE3 PCM hash of a render is stable across runs.
//!
//! # Example
//!
//! ```
//! use soundtrack_engine::{produce, AudioBuffer, Segment, Stem, TrackDescriptor, WavResult};
//! use soundtrack_spec::{EnvelopeKind, FadeSpec, LoopSpec};
//!
//! let intro = AudioBuffer::mono(8000, vec![0.1; 800]).unwrap();
//! let loop_clip = AudioBuffer::mono(8000, vec![0.2; 1600]).unwrap();
//! let segment = Segment::intro_loop(intro, loop_clip).unwrap();
//!
//! let descriptor = TrackDescriptor::new("Title Screen", vec![Stem::new(segment)])
//!     .with_loop(LoopSpec::repeat(2).with_fade(FadeSpec::fade_out(EnvelopeKind::Linear, 0.1)));
//!
//! let output = produce(&descriptor).unwrap();
//! assert_eq!(output.buffer.len(), 800 + 2 * 1600 + 800);
//!
//! let wav = WavResult::from_buffer(&output.buffer).unwrap();
//! assert_eq!(wav.num_frames, output.buffer.len());
//! ```
//!
//! # Crate Structure
//!
//! - [`produce()`] - Produces one track from a descriptor
//! - [`produce_all()`] - Produces many tracks on a worker pool
//! - [`resolve_track()`] - Builds a descriptor from a config entry
//! - [`buffer`] - Planar sample buffers
//! - [`envelope`] - Fade curve evaluation
//! - [`loop_assembly`] - Segment expansion
//! - [`mixer`] - Stem summation
//! - [`wav`] - Deterministic WAV encoder

pub mod batch;
pub mod buffer;
pub mod envelope;
pub mod error;
pub mod loop_assembly;
pub mod mixer;
pub mod pipeline;
pub mod resolve;
pub mod segment;
pub mod wav;

// Re-export main types at crate root
pub use batch::{produce_all, BatchResult};
pub use buffer::{AudioBuffer, SampleFormat, MAX_FRAMES};
pub use envelope::{evaluate, fade_gains};
pub use error::{AudioError, AudioResult};
pub use loop_assembly::assemble;
pub use mixer::{mix, MixOutput, Mixer};
pub use pipeline::{produce, Stem, TrackDescriptor, TrackOutput, TrackWarning};
pub use resolve::{resolve_track, ClipSource};
pub use segment::Segment;
pub use wav::WavResult;
