//! Structured error types for report generation.
//!
//! Only asset loading, request parsing and page geometry checks can fail.
//! Layout never errors: missing or odd optional data renders blank or is
//! skipped.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Font or logo bytes could not be obtained. Aborts the export.
    #[error("Failed to load asset '{source_name}': {reason}")]
    Asset { source_name: String, reason: String },

    /// Font bytes were fetched but could not be parsed or embedded.
    #[error("Font error: {0}")]
    Font(String),

    /// Logo bytes were fetched but could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// The requested page geometry leaves no room for content.
    #[error("Invalid style: {0}")]
    Style(String),

    /// The JSON request failed to parse.
    #[error("Failed to parse report request: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Writing the finished report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl ReportError {
    pub(crate) fn asset(source_name: &str, reason: impl Into<String>) -> Self {
        ReportError::Asset {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report request shape. Check `kind` and field names."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_hint() {
        let err: ReportError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse report request"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn test_asset_error_names_source() {
        let err = ReportError::asset("./logo.png", "No such file");
        assert_eq!(err.to_string(), "Failed to load asset './logo.png': No such file");
    }
}
