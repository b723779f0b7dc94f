//! Validate command implementation
//!
//! Checks a config file without loading any audio.

use anyhow::Result;
use colored::Colorize;
use soundtrack_spec::validate_config;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{error_codes, JsonError, ValidateOutput};
use super::load::load_config;
use super::reporting;

/// Run the validate command
///
/// # Arguments
/// * `config_path` - Path to the soundtrack config
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(config_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(config_path)
    } else {
        run_human(config_path)
    }
}

fn run_human(config_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), config_path);

    let loaded = load_config(Path::new(config_path))?;
    let result = validate_config(&loaded.config);

    println!("{} {}", "Tracks:".dimmed(), loaded.config.tracks.len());
    let (errors, warnings) = reporting::validation_to_json(&result);
    reporting::print_messages(&errors, &warnings);

    if result.is_ok() {
        println!("\n{} Config is valid", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Config has {} error(s)",
            "FAILED".red().bold(),
            result.errors.len()
        );
        Ok(ExitCode::from(1))
    }
}

fn run_json(config_path: &str) -> Result<ExitCode> {
    let output = validate_to_output(Path::new(config_path));
    let code = if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

/// Validates a config file and collects the diagnostics.
///
/// A config that cannot be read or parsed is reported as a single error
/// rather than returned as `Err`, so JSON consumers always get a document.
pub fn validate_to_output(config_path: &Path) -> ValidateOutput {
    let loaded = match load_config(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            return ValidateOutput {
                success: false,
                tracks: 0,
                errors: vec![JsonError::new(error_codes::CONFIG_LOAD, format!("{:#}", e))],
                warnings: Vec::new(),
            }
        }
    };

    let result = validate_config(&loaded.config);
    let (errors, warnings) = reporting::validation_to_json(&result);
    ValidateOutput {
        success: result.is_ok(),
        tracks: loaded.config.tracks.len(),
        errors,
        warnings,
    }
}
