//! Deterministic WAV encoding of finished tracks.
//!
//! Buffers are written as 16-bit PCM WAV with no timestamps or variable
//! metadata, so identical buffers always encode to identical bytes. The BLAKE3
//! hash of the PCM data identifies a render.

mod format;
mod pcm;
mod result;
mod writer;


// Re-export public API
pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use result::WavResult;
pub use writer::{buffer_to_pcm16, write_wav, write_wav_to_vec};
