use colored::Colorize;
use soundtrack_spec::ValidationResult;

use super::json_output::{JsonError, JsonWarning};

/// Prints errors and warnings in the colored text style.
pub(crate) fn print_messages(errors: &[JsonError], warnings: &[JsonWarning]) {
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in errors {
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.red(),
                location(error.path.as_deref()).dimmed(),
                error.message
            );
        }
    }

    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in warnings {
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.yellow(),
                location(warning.path.as_deref()).dimmed(),
                warning.message
            );
        }
    }
}

fn location(path: Option<&str>) -> String {
    path.map(|p| format!(" at {}", p)).unwrap_or_default()
}

/// Converts validation messages for output.
pub(crate) fn validation_to_json(result: &ValidationResult) -> (Vec<JsonError>, Vec<JsonWarning>) {
    (
        result.errors.iter().map(JsonError::from).collect(),
        result.warnings.iter().map(JsonWarning::from).collect(),
    )
}
