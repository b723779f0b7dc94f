//! WAV clip loading.
//!
//! Decodes the clips a config refers to with `hound`. Paths are resolved
//! against the config's directory, and each file is decoded at most once per
//! run, since intro and loop clips are often shared between tracks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use soundtrack_engine::{AudioBuffer, AudioError, AudioResult, ClipSource};

/// Loads WAV clips relative to a base directory.
#[derive(Debug)]
pub struct WavClipSource {
    base_dir: PathBuf,
    cache: Mutex<HashMap<PathBuf, AudioBuffer>>,
}

impl WavClipSource {
    /// Creates a source resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Absolute path of a clip as written in the config.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Number of distinct clips decoded so far.
    pub fn cached_clips(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl ClipSource for WavClipSource {
    fn load(&self, path: &str) -> AudioResult<AudioBuffer> {
        let full_path = self.resolve_path(path);

        if let Ok(cache) = self.cache.lock() {
            if let Some(buffer) = cache.get(&full_path) {
                return Ok(buffer.clone());
            }
        }

        let buffer = decode_wav(&full_path).map_err(|message| AudioError::clip_load(path, message))?;
        debug!(
            "decoded {} ({}, {} frames)",
            full_path.display(),
            buffer.format(),
            buffer.len()
        );

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(full_path, buffer.clone());
        }
        Ok(buffer)
    }
}

/// Decodes a WAV file to a planar buffer with samples in [-1.0, 1.0].
///
/// Integer PCM of 8, 16, 24, or 32 bits and 32-bit float are supported.
pub fn decode_wav(path: &Path) -> Result<AudioBuffer, String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| format!("failed to open '{}': {}", path.display(), e))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(|e| format!("failed to read float samples: {}", e))?,
        (hound::SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = (1u64 << (bits - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| format!("failed to read {}-bit samples: {}", bits, e))?
        }
        (format, bits) => {
            return Err(format!(
                "unsupported WAV sample format {:?} with {} bits",
                format, bits
            ))
        }
    };

    AudioBuffer::from_interleaved(spec.sample_rate, spec.channels, &interleaved)
        .map_err(|e| e.to_string())
}
