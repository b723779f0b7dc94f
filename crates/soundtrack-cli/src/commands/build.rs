//! Build command implementation
//!
//! Validates a config, resolves every track against the clips on disk,
//! produces the tracks on a worker pool, and writes the results.

use anyhow::Result;
use colored::Colorize;
use log::info;
use soundtrack_engine::{produce_all, resolve_track, TrackDescriptor};
use soundtrack_spec::validate_config;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_codes, BuildOutput, JsonError, TrackReport};
use super::load::{load_config, LoadedConfig};
use super::reporting;
use crate::clips::WavClipSource;
use crate::output::{track_file_stem, write_track};

/// Output directory used when neither `-o` nor the config names one.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Run the build command
///
/// # Arguments
/// * `config_path` - Path to the soundtrack config
/// * `output` - Output directory override
/// * `jobs` - Worker threads; 0 picks one per CPU
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if every track was written, 1 otherwise
pub fn run(
    config_path: &str,
    output: Option<&str>,
    jobs: usize,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        let report = build(Path::new(config_path), output.map(Path::new), jobs);
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(exit_code(report.success))
    } else {
        run_human(config_path, output, jobs)
    }
}

fn run_human(config_path: &str, output: Option<&str>, jobs: usize) -> Result<ExitCode> {
    println!("{} {}", "Building:".cyan().bold(), config_path);

    let loaded = load_config(Path::new(config_path))?;
    let out_dir = output_dir(&loaded, output.map(Path::new));
    println!("{} {}", "Output:".dimmed(), out_dir.display());
    println!("{} {}", "Tracks:".dimmed(), loaded.config.tracks.len());

    let report = execute(&loaded, &out_dir, jobs);
    reporting::print_messages(&report.errors, &report.warnings);
    if !report.tracks.is_empty() {
        println!();
    }
    for track in &report.tracks {
        print_track(track);
    }

    let failed = report.tracks.iter().filter(|t| !t.success).count();
    if report.success {
        println!(
            "\n{} Built {} track(s) in {} ms",
            "SUCCESS".green().bold(),
            report.tracks.len(),
            report.duration_ms
        );
    } else if report.tracks.is_empty() {
        println!("\n{} Config has errors", "FAILED".red().bold());
    } else {
        println!(
            "\n{} {} of {} track(s) failed",
            "FAILED".red().bold(),
            failed,
            report.tracks.len()
        );
    }

    Ok(exit_code(report.success))
}

fn print_track(track: &TrackReport) {
    let name = track_file_stem(track.number, &track.title);
    if track.success {
        let hash = track
            .pcm_hash
            .as_deref()
            .map(|h| &h[..h.len().min(16)])
            .unwrap_or("");
        println!(
            "  {} {} ({:.2}s, {})",
            "\u{2713}".green(),
            name,
            track.duration_seconds.unwrap_or(0.0),
            hash.dimmed()
        );
    } else {
        let message = track
            .error
            .as_ref()
            .map(|e| format!("[{}] {}", e.code, e.message))
            .unwrap_or_default();
        println!("  {} {}: {}", "\u{2717}".red(), name, message);
    }
    for warning in &track.warnings {
        println!("    {} {}", "!".yellow(), warning);
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Builds every track of a config and reports the outcome.
///
/// Never fails as a whole: an unreadable config, validation errors, and
/// per-track failures all end up in the returned report.
pub fn build(config_path: &Path, output: Option<&Path>, jobs: usize) -> BuildOutput {
    let start = Instant::now();
    match load_config(config_path) {
        Ok(loaded) => {
            let out_dir = output_dir(&loaded, output);
            execute(&loaded, &out_dir, jobs)
        }
        Err(e) => BuildOutput {
            success: false,
            output_dir: String::new(),
            errors: vec![JsonError::new(error_codes::CONFIG_LOAD, format!("{:#}", e))],
            warnings: Vec::new(),
            tracks: Vec::new(),
            duration_ms: start.elapsed().as_millis() as u64,
        },
    }
}

/// Picks the output directory.
///
/// An explicit override is used as given. Otherwise the config's `output`
/// key, or [`DEFAULT_OUTPUT_DIR`], is taken relative to the config file.
fn output_dir(loaded: &LoadedConfig, output: Option<&Path>) -> PathBuf {
    match output {
        Some(dir) => dir.to_path_buf(),
        None => loaded
            .base_dir
            .join(loaded.config.output.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)),
    }
}

fn execute(loaded: &LoadedConfig, out_dir: &Path, jobs: usize) -> BuildOutput {
    let start = Instant::now();
    let config = &loaded.config;

    let validation = validate_config(config);
    let (errors, warnings) = reporting::validation_to_json(&validation);
    let mut output = BuildOutput {
        success: false,
        output_dir: out_dir.display().to_string(),
        errors,
        warnings,
        tracks: Vec::new(),
        duration_ms: 0,
    };

    // Errors inside one track fail only that track; anything else stops the build.
    let mut invalid: BTreeMap<usize, JsonError> = BTreeMap::new();
    for error in &output.errors {
        match track_index(error.path.as_deref()) {
            Some(index) => {
                invalid.entry(index).or_insert_with(|| error.clone());
            }
            None => {
                output.duration_ms = start.elapsed().as_millis() as u64;
                return output;
            }
        }
    }

    // Resolution decodes clips, which the source caches, so it stays on this
    // thread. Only production runs on the pool.
    let source = WavClipSource::new(&loaded.base_dir);
    let mut descriptors: Vec<TrackDescriptor> = Vec::new();
    let mut numbers: Vec<usize> = Vec::new();
    for (index, track) in config.tracks.iter().enumerate() {
        if let Some(error) = invalid.remove(&index) {
            output
                .tracks
                .push(TrackReport::failed(index + 1, track.title.as_str(), error));
            continue;
        }
        match resolve_track(index, track, config, &source) {
            Ok(descriptor) => {
                descriptors.push(descriptor);
                numbers.push(index + 1);
            }
            Err(e) => output.tracks.push(TrackReport::failed(
                index + 1,
                track.title.as_str(),
                JsonError::from(&e),
            )),
        }
    }
    info!(
        "resolved {} of {} track(s) from {} clip(s)",
        descriptors.len(),
        config.tracks.len(),
        source.cached_clips()
    );

    match produce_all(descriptors, jobs) {
        Ok(results) => {
            for (number, batch) in numbers.into_iter().zip(results) {
                let duration_ms = batch.elapsed.as_millis() as u64;
                let report = match batch.result {
                    Ok(track) => match write_track(out_dir, number, &batch.title, &track) {
                        Ok(written) => TrackReport {
                            number,
                            title: batch.title,
                            success: true,
                            wav_path: Some(written.wav_path.display().to_string()),
                            tags_path: Some(written.tags_path.display().to_string()),
                            pcm_hash: Some(written.pcm_hash),
                            duration_seconds: Some(written.duration_seconds),
                            warnings: track.warnings,
                            error: None,
                            duration_ms,
                        },
                        Err(e) => TrackReport::failed(
                            number,
                            batch.title,
                            JsonError::new(error_codes::OUTPUT_WRITE, format!("{:#}", e)),
                        ),
                    },
                    Err(e) => TrackReport {
                        duration_ms,
                        ..TrackReport::failed(number, batch.title, JsonError::from(&e))
                    },
                };
                output.tracks.push(report);
            }
        }
        Err(e) => output.errors.push(JsonError::from(&e)),
    }

    output.tracks.sort_by_key(|t| t.number);
    output.success = output.errors.is_empty() && output.tracks.iter().all(|t| t.success);
    output.duration_ms = start.elapsed().as_millis() as u64;
    output
}

/// Index of the track a validation path points into, e.g. `tracks[2].loop`.
fn track_index(path: Option<&str>) -> Option<usize> {
    let rest = path?.strip_prefix("tracks[")?;
    rest[..rest.find(']')?].parse().ok()
}
