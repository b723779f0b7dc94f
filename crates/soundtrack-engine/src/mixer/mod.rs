//! Stem overlay mixing.
//!
//! This module sums independently assembled stems into one buffer, padding
//! shorter stems with silence and saturating the result to [-1.0, 1.0].

#[allow(clippy::module_inception)]
mod mixer;
mod processing;
mod types;

#[cfg(test)]
mod tests_clipping;
#[cfg(test)]
mod tests_mixing;

// Re-export public API
pub use mixer::{mix, Mixer};
pub use processing::{hard_clip, hard_clip_buffer, CLIP_LIMIT};
pub use types::MixOutput;
