//! # Compliance Reports
//!
//! Paginated PDF exports for HR compliance records: job applications,
//! supervisions and annual appraisals.
//!
//! Every report is a fixed sequence of sections written top to bottom onto
//! pages of the requested size (A4 by default). Nothing is painted until it
//! has been measured, so a box or table row never spills over the bottom
//! margin and every page carries exactly one header and one footer.
//!
//! ## Architecture
//!
//! ```text
//! Request (JSON)
//!       ↓
//!   [model]    - Form records, tolerant of missing and oddly shaped fields
//!       ↓
//!   [reports]  - One builder per kind; loads fonts and logo up front
//!       ↓
//!   [layout]   - Cursor, page breaks, section vocabulary, header/footer
//!       ↓
//!   [pdf]      - Serialize to PDF bytes
//! ```

pub mod assets;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod reports;
pub mod style;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

use chrono::NaiveDate;

pub use error::{ReportError, Result};
pub use model::{Branding, ReportKind, ReportRequest};
pub use reports::delivery::save_report;
pub use reports::{GeneratedReport, ReportContext};

/// Render a report request described as JSON, dated today unless the
/// request carries `generatedOn`.
pub fn render_json(json: &str) -> Result<GeneratedReport> {
    render_json_on(json, chrono::Local::now().date_naive())
}

/// Like [`render_json`] with an explicit fallback date.
pub fn render_json_on(json: &str, today: NaiveDate) -> Result<GeneratedReport> {
    let request: ReportRequest = serde_json::from_str(json)?;
    reports::render_request(&request, today)
}
