//! JSON output types for machine-readable CLI output.
//!
//! These are printed instead of colored text when `--json` is given.

use serde::{Deserialize, Serialize};
use soundtrack_engine::{AudioError, TrackWarning};
use soundtrack_spec::{BackendError, ValidationError, ValidationWarning};

/// Error codes for CLI-level failures.
pub mod error_codes {
    /// Config file could not be read or parsed
    pub const CONFIG_LOAD: &str = "CLI_001";
    /// Output file could not be written
    pub const OUTPUT_WRITE: &str = "CLI_002";
}

/// A structured error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g. "E003", "AUDIO_002", "CLI_001")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// JSON path of the offending config field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Index of the stem at fault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stem: Option<usize>,
}

impl JsonError {
    /// Creates an error with a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            stem: None,
        }
    }
}

impl From<&ValidationError> for JsonError {
    fn from(error: &ValidationError) -> Self {
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            path: error.path.clone(),
            stem: None,
        }
    }
}

impl From<&AudioError> for JsonError {
    fn from(error: &AudioError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            path: None,
            stem: error.stem(),
        }
    }
}

/// A structured warning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g. "W001")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// JSON path of the config field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ValidationWarning> for JsonWarning {
    fn from(warning: &ValidationWarning) -> Self {
        Self {
            code: warning.code.to_string(),
            message: warning.message.clone(),
            path: warning.path.clone(),
        }
    }
}

/// Output of `soundtrack validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    /// Whether the config is valid
    pub success: bool,
    /// Number of tracks in the config
    pub tracks: usize,
    /// Errors found
    pub errors: Vec<JsonError>,
    /// Warnings found
    pub warnings: Vec<JsonWarning>,
}

/// One track in `soundtrack build --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    /// 1-based track number
    pub number: usize,
    /// Track title
    pub title: String,
    /// Whether the track was written
    pub success: bool,
    /// Written WAV file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wav_path: Option<String>,
    /// Written tag sidecar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags_path: Option<String>,
    /// BLAKE3 hash of the PCM data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_hash: Option<String>,
    /// Length in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    /// Non-fatal conditions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TrackWarning>,
    /// Why the track failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
    /// Time spent producing the track
    pub duration_ms: u64,
}

impl TrackReport {
    /// Creates a failed report.
    pub fn failed(number: usize, title: impl Into<String>, error: JsonError) -> Self {
        Self {
            number,
            title: title.into(),
            success: false,
            wav_path: None,
            tags_path: None,
            pcm_hash: None,
            duration_seconds: None,
            warnings: Vec::new(),
            error: Some(error),
            duration_ms: 0,
        }
    }
}

/// Output of `soundtrack build --json`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    /// Whether every track was written
    pub success: bool,
    /// Output directory
    pub output_dir: String,
    /// Config errors that stopped the build
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
    /// Config warnings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<JsonWarning>,
    /// Per-track results in config order
    pub tracks: Vec<TrackReport>,
    /// Total wall time
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundtrack_spec::ErrorCode;

    #[test]
    fn test_validation_error_conversion() {
        let error =
            ValidationError::with_path(ErrorCode::UnsupportedCurve, "bad curve", "loop.fade.type");
        let json = JsonError::from(&error);
        assert_eq!(json.code, "E003");
        assert_eq!(json.path.as_deref(), Some("loop.fade.type"));
    }

    #[test]
    fn test_audio_error_conversion_keeps_stem() {
        let error = AudioError::InvalidSegment {
            stem: 2,
            message: "bad".to_string(),
        };
        let json = JsonError::from(&error);
        assert_eq!(json.code, "AUDIO_004");
        assert_eq!(json.stem, Some(2));
    }

    #[test]
    fn test_failed_report_skips_empty_fields() {
        let report = TrackReport::failed(1, "A", JsonError::new("AUDIO_005", "empty"));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("wav_path").is_none());
        assert!(value.get("warnings").is_none());
        assert_eq!(value["error"]["code"], "AUDIO_005");
    }
}
