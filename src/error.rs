//! Structured error types for report generation.
//!
//! Data-shape problems never surface here: missing tax ids, odd dates and
//! blank strings degrade locally while the page is laid out. What remains
//! are input parsing, configuration, and output failures.

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type returned by all public API functions.
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON input failed to parse as a valid report request.
    #[error("Failed to parse report data: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A TOML configuration file could not be parsed.
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration parsed but describes an unusable layout.
    #[error("Invalid report configuration: {0}")]
    Config(String),

    /// Reading input or writing the finished document failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The drawing backend failed.
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::Parse { source: e, hint }
    }
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
