//! Saving finished reports to disk.
//!
//! The bytes go into a temporary file in the target directory first and are
//! renamed to the report's file name only once fully written. On any error
//! the temporary is dropped, which deletes it.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::GeneratedReport;

/// Write `report` into `dir` under its file name, replacing any existing file.
pub fn save_report(report: &GeneratedReport, dir: &Path) -> Result<PathBuf> {
    let target = dir.join(&report.file_name);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&report.bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| e.error)?;
    log::info!("saved {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportKind;

    fn report() -> GeneratedReport {
        GeneratedReport {
            kind: ReportKind::Supervision,
            file_name: "Supervision_Sam_16-10-2026.pdf".to_string(),
            bytes: b"%PDF-1.7\n%%EOF\n".to_vec(),
        }
    }

    #[test]
    fn test_saves_under_report_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report(&report(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Supervision_Sam_16-10-2026.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), report().bytes);

        // Only the final file remains; the temporary was renamed.
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(&report().file_name), b"old").unwrap();
        let path = save_report(&report(), dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), report().bytes);
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = save_report(&report(), &missing).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Io(_)));
    }
}
