//! Soundtrack CLI library.
//!
//! This crate provides the file-facing side of the soundtrack builder:
//! WAV clip decoding, track output writing, and the `validate` and `build`
//! commands.

pub mod clips;
pub mod commands;
pub mod output;
