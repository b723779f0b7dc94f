//! Writing finished tracks to disk.
//!
//! Each track becomes `<NN> - <title>.wav` and a `<NN> - <title>.tags.json`
//! sidecar holding its merged tag map.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use soundtrack_engine::{TrackOutput, WavResult};

/// Paths and hash of a written track.
#[derive(Debug, Clone)]
pub struct WrittenTrack {
    /// The WAV file.
    pub wav_path: PathBuf,
    /// The tag sidecar.
    pub tags_path: PathBuf,
    /// BLAKE3 hash of the PCM data.
    pub pcm_hash: String,
    /// Length in seconds.
    pub duration_seconds: f64,
}

/// File name stem for a track: zero-padded number, then the title.
///
/// Characters that are not allowed in file names on common platforms are
/// replaced with `_`.
pub fn track_file_stem(track_number: usize, title: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{:02} - {}", track_number, safe)
}

/// Encodes a track and writes it with its tag sidecar.
pub fn write_track(
    out_dir: &Path,
    track_number: usize,
    title: &str,
    output: &TrackOutput,
) -> Result<WrittenTrack> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let stem = track_file_stem(track_number, title);
    let wav_path = out_dir.join(format!("{}.wav", stem));
    let tags_path = out_dir.join(format!("{}.tags.json", stem));

    let wav = WavResult::from_buffer(&output.buffer)
        .with_context(|| format!("Failed to encode '{}'", title))?;
    fs::write(&wav_path, &wav.wav_data)
        .with_context(|| format!("Failed to write {}", wav_path.display()))?;

    let tags = serde_json::to_string_pretty(&output.tags).context("Failed to serialize tags")?;
    fs::write(&tags_path, tags)
        .with_context(|| format!("Failed to write {}", tags_path.display()))?;

    Ok(WrittenTrack {
        wav_path,
        tags_path,
        pcm_hash: wav.pcm_hash.clone(),
        duration_seconds: wav.duration_seconds(),
    })
}
