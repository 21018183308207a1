//! # Asset Sources
//!
//! Resolves the strings used to reference fonts and logos into raw bytes.
//!
//! Supported `src` formats:
//! - `data:<mime>;base64,...` - data URI
//! - File path (absolute, `./` or `../` relative) - reads from disk
//! - Raw base64-encoded data
//!
//! Any failure here is fatal for the export that requested the asset.

use crate::error::{ReportError, Result};

/// Resolve the source string to raw bytes.
pub fn load_bytes(src: &str) -> Result<Vec<u8>> {
    let src = src.trim();
    if src.is_empty() {
        return Err(ReportError::asset(src, "empty source"));
    }

    if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| ReportError::asset(preview(src), "invalid data URI: missing comma"))?;
        let header = &src[..comma_pos];
        if !header.ends_with(";base64") {
            return Err(ReportError::asset(
                preview(src),
                "only base64 data URIs are supported",
            ));
        }
        return base64_decode(&src[comma_pos + 1..]).map_err(|e| ReportError::asset(preview(src), e));
    }

    // Only explicit path prefixes count as files; base64 text can contain '/'.
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        #[cfg(not(target_arch = "wasm32"))]
        {
            log::debug!("reading asset from {}", src);
            return std::fs::read(src).map_err(|e| ReportError::asset(src, e.to_string()));
        }
        #[cfg(target_arch = "wasm32")]
        {
            return Err(ReportError::asset(
                src,
                "file paths are not available in WASM; use a data URI or base64",
            ));
        }
    }

    base64_decode(src).map_err(|e| ReportError::asset(preview(src), e))
}

fn base64_decode(input: &str) -> std::result::Result<Vec<u8>, String> {
    use base64::Engine;
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| format!("base64 decode error: {}", e))
}

/// Keep error messages readable when the source is a long inline payload.
fn preview(src: &str) -> &str {
    match src.char_indices().nth(32) {
        Some((idx, _)) => &src[..idx],
        None => src,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_decodes() {
        let bytes = load_bytes("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_raw_base64_decodes() {
        assert_eq!(load_bytes("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_data_uri_without_comma_fails() {
        let err = load_bytes("data:image/png;base64").unwrap_err();
        assert!(matches!(err, ReportError::Asset { .. }));
    }

    #[test]
    fn test_missing_file_is_asset_error() {
        let err = load_bytes("./definitely/not/here.ttf").unwrap_err();
        match err {
            ReportError::Asset { source_name, .. } => {
                assert_eq!(source_name, "./definitely/not/here.ttf")
            }
            other => panic!("expected asset error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_source_fails() {
        assert!(load_bytes("   ").is_err());
    }

    #[test]
    fn test_long_payload_is_truncated_in_error() {
        let junk = "!".repeat(200);
        match load_bytes(&junk).unwrap_err() {
            ReportError::Asset { source_name, .. } => assert_eq!(source_name.len(), 32),
            other => panic!("expected asset error, got {:?}", other),
        }
    }
}
