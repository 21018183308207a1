//! Integration tests for the report pipeline.
//!
//! These tests exercise the full path from request JSON to PDF bytes.
//! They verify:
//! - Every page carries exactly one header and one footer
//! - Nothing is drawn below the footer reserve or above the header
//! - Boxes that fit a page are never split
//! - Output is byte-identical for identical input and date
//! - The PDF re-parses with page count and metadata intact

use chrono::NaiveDate;

use compliance_reports::layout::{DrawCommand, RenderedDocument};
use compliance_reports::model::{AppraisalForm, JobApplication, SupervisionForm};
use compliance_reports::reports::{appraisal, job_application, supervision};
use compliance_reports::{render_json_on, Branding, ReportContext, ReportError, ReportKind};

// ─── Helpers ────────────────────────────────────────────────────

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn context() -> ReportContext {
    ReportContext::new(date()).with_branding(Branding {
        name: Some("Acme Care".to_string()),
        logo: None,
    })
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(
        bytes.windows(5).any(|w| w == b"%%EOF"),
        "Missing %%EOF marker"
    );
}

/// Every page has one header and one footer, and every rectangle lies
/// between the footer reserve and the top margin.
fn assert_paginated(doc: &RenderedDocument, ctx: &ReportContext) {
    let style = &ctx.style;
    let bottom = style.bottom_limit();
    for (i, page) in doc.pages.iter().enumerate() {
        assert!(page.has_header(), "page {} has no header", i + 1);
        assert!(page.has_footer(), "page {} has no footer", i + 1);

        let footers = page.texts().filter(|t| t.starts_with("Page ")).count();
        assert_eq!(footers, 1, "page {} footer count", i + 1);
        assert!(page.contains_text(&format!("Page {}", i + 1)));

        let top = page.height - style.margin.top;
        for cmd in &page.commands {
            if let DrawCommand::Rect { y, height, .. } = cmd {
                assert!(*y >= bottom - 1e-6, "page {}: rect below bottom limit", i + 1);
                assert!(y + height <= top + 1e-6, "page {}: rect above top margin", i + 1);
            }
        }
    }
}

fn box_fragments(doc: &RenderedDocument) -> usize {
    doc.pages
        .iter()
        .flat_map(|p| &p.commands)
        .filter(|c| {
            matches!(c, DrawCommand::Rect { fill: Some(_), stroke: Some(s), .. } if s.width == 0.75)
        })
        .count()
}

/// DejaVu Sans Mono, relative to the crate root tests run from.
const FIXTURE_FONT: &str = "./tests/fixtures/DejaVuSansMono.ttf";

/// Font dictionaries in a parsed PDF with the given /Subtype.
fn font_dicts(parsed: &lopdf::Document, subtype: &[u8]) -> usize {
    parsed
        .objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .filter(|d| {
            d.get(b"Type").and_then(|t| t.as_name()).map(|t| t == b"Font").unwrap_or(false)
                && d.get(b"Subtype").and_then(|t| t.as_name()).map(|t| t == subtype).unwrap_or(false)
        })
        .count()
}

fn embedded_font_files(parsed: &lopdf::Document) -> usize {
    parsed
        .objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .filter(|d| d.has(b"FontFile2"))
        .count()
}

fn long_supervision(users: usize, words: usize) -> SupervisionForm {
    let comment = "careful ".repeat(words);
    let reviews: Vec<String> = (0..users)
        .map(|i| {
            format!(
                r#"{{"serviceUserName": "Service User {}", "comments": "{}", "bruises": {{"value": "{}"}}, "bruisesCauses": "Knocked a table"}}"#,
                i,
                comment,
                if i % 2 == 0 { "yes" } else { "no" }
            )
        })
        .collect();
    let json = format!(
        r#"{{"employeeName": "Sam Carer", "howAreYou": "{}", "perServiceUser": [{}]}}"#,
        "fine ".repeat(400),
        reviews.join(",")
    );
    serde_json::from_str(&json).unwrap()
}

// ─── Scenarios ──────────────────────────────────────────────────

#[test]
fn test_minimal_job_application() {
    let json = r#"{
        "kind": "jobApplication",
        "branding": {"name": "Acme Care"},
        "data": {"personalInfo": {"fullName": "Jane Doe"}, "availability": {}}
    }"#;
    let report = render_json_on(json, date()).unwrap();
    assert_eq!(report.kind, ReportKind::JobApplication);
    assert_eq!(report.file_name, "Job_Application_Jane_Doe_16-10-2026.pdf");
    assert_valid_pdf(&report.bytes);

    let form: JobApplication =
        serde_json::from_str(r#"{"personalInfo": {"fullName": "Jane Doe"}}"#).unwrap();
    let ctx = context();
    let doc = job_application::render(&form, &ctx);
    assert_paginated(&doc, &ctx);
    assert_eq!(box_fragments(&doc), 0);
    assert!(doc.pages[0].contains_text("Personal Information"));
    assert!(doc.pages[0].contains_text("Jane Doe"));
}

#[test]
fn test_supervision_with_three_service_users() {
    let form: SupervisionForm = serde_json::from_str(
        r#"{
            "employeeName": "Sam Carer",
            "perServiceUser": [
                {"serviceUserName": "Mr A", "bruises": {"value": "yes"}, "bruisesCauses": "Fall"},
                {"serviceUserName": "Mrs B", "bruises": {"value": "no"}},
                {"serviceUserName": "Mr C", "bruises": {"value": "no"}}
            ]
        }"#,
    )
    .unwrap();
    let ctx = context();
    let doc = supervision::render(&form, &ctx);
    assert_paginated(&doc, &ctx);
    assert_eq!(box_fragments(&doc), 3);
    let causes = doc
        .pages
        .iter()
        .flat_map(|p| p.texts())
        .filter(|t| *t == "Causes of bruises:")
        .count();
    assert_eq!(causes, 1);
}

#[test]
fn test_appraisal_all_worst_ratings() {
    let form: AppraisalForm = serde_json::from_str(
        r#"{"employeeName": "Pat Smith", "ratings": {
            "clientCare": "E", "careStandards": "E", "safetyHealth": "E",
            "medicationManagement": "E", "communication": "E",
            "responsiveness": "E", "professionalDevelopment": "E", "attendance": "E"
        }}"#,
    )
    .unwrap();
    let ctx = context();
    let doc = appraisal::render(&form, &ctx);
    assert_paginated(&doc, &ctx);

    let red = compliance_reports::style::Color::hex("#dc2626");
    let worst: Vec<_> = doc
        .pages
        .iter()
        .flat_map(|p| &p.commands)
        .filter_map(|c| match c {
            DrawCommand::Text { text, color, .. } if text.starts_with("E - ") => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(worst.len(), 8);
    assert!(worst.iter().all(|c| *c == red));
    assert!(!doc.pages.iter().any(|p| p.contains_text("Comments")));
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_long_supervision_paginates_cleanly() {
    let form = long_supervision(30, 120);
    let ctx = context();
    let doc = supervision::render(&form, &ctx);
    assert!(doc.pages.len() > 3, "expected several pages, got {}", doc.pages.len());
    assert_paginated(&doc, &ctx);
}

#[test]
fn test_boxes_that_fit_a_page_are_never_split() {
    let form = long_supervision(25, 10);
    let ctx = context();
    let doc = supervision::render(&form, &ctx);
    assert!(doc.pages.len() > 1);
    assert_eq!(box_fragments(&doc), 25);
}

#[test]
fn test_oversized_box_is_split_across_pages() {
    let form = long_supervision(1, 3000);
    let ctx = context();
    let doc = supervision::render(&form, &ctx);
    assert_paginated(&doc, &ctx);
    assert!(box_fragments(&doc) > 1);
}

#[test]
fn test_section_titles_always_have_content_below_them() {
    let ctx = context();
    let style = &ctx.style;
    for (users, words) in [(1, 40), (3, 90), (6, 25), (9, 60), (14, 5)] {
        let doc = supervision::render(&long_supervision(users, words), &ctx);
        for (i, page) in doc.pages.iter().enumerate() {
            let bars = page.commands.iter().filter_map(|c| match c {
                DrawCommand::Rect { y, height, fill: Some(f), stroke: None, .. }
                    if *f == style.title_background && *height == style.section_title_height =>
                {
                    Some(*y)
                }
                _ => None,
            });
            for bar in bars {
                let below = page.commands.iter().any(|c| match c {
                    DrawCommand::Text { y, size, .. } => {
                        *y < bar && *y > style.bottom_limit() && *size == style.font_size
                    }
                    _ => false,
                });
                assert!(below, "{} users: title alone at the foot of page {}", users, i + 1);
            }
        }
    }
}

#[test]
fn test_table_header_repeats_on_continuation_pages() {
    let skills: Vec<String> = (0..150)
        .map(|i| format!(r#""Skill number {:03}": "Good""#, i))
        .collect();
    let json = format!(r#"{{"skillsExperience": {{"skills": {{{}}}}}}}"#, skills.join(","));
    let form: JobApplication = serde_json::from_str(&json).unwrap();
    let ctx = context();
    let doc = job_application::render(&form, &ctx);
    assert_paginated(&doc, &ctx);

    let pages_with_table: Vec<_> = doc
        .pages
        .iter()
        .filter(|p| p.texts().any(|t| t.starts_with("Skill number")))
        .collect();
    assert!(pages_with_table.len() >= 2);
    for page in pages_with_table {
        assert!(page.texts().any(|t| t == "Skill"), "header row missing");
        assert!(page.texts().any(|t| t == "Level"), "header row missing");
    }
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn test_output_is_idempotent() {
    let json = r#"{"kind": "supervision", "data": {"employeeName": "Sam", "workload": "Busy"}}"#;
    let a = render_json_on(json, date()).unwrap();
    let b = render_json_on(json, date()).unwrap();
    assert_eq!(a.file_name, b.file_name);
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn test_pdf_reparses_with_page_count_and_metadata() {
    let form = long_supervision(12, 80);
    let ctx = context();
    let pages = supervision::render(&form, &ctx).pages.len();
    let report = supervision::build(&form, &ctx).unwrap();
    assert_valid_pdf(&report.bytes);

    let parsed = lopdf::Document::load_mem(&report.bytes).unwrap();
    assert_eq!(parsed.get_pages().len(), pages);

    let info = parsed.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = parsed.get_dictionary(info).unwrap();
    let title = info.get(b"Title").unwrap().as_str().unwrap();
    assert_eq!(title, b"Supervision Report - Sam Carer");
    let author = info.get(b"Author").unwrap().as_str().unwrap();
    assert_eq!(author, b"Acme Care");
}

#[test]
fn test_logo_is_embedded() {
    use base64::Engine;

    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([200, 30, 30, 128]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .unwrap();
    let uri = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );
    let json = format!(
        r#"{{"kind": "annualAppraisal", "data": {{}}, "branding": {{"name": "Acme Care", "logo": "{}"}}}}"#,
        uri
    );
    let report = render_json_on(&json, date()).unwrap();
    assert_eq!(report.file_name, "Annual_Appraisal_Unknown_16-10-2026.pdf");
    let parsed = lopdf::Document::load_mem(&report.bytes).unwrap();
    let images = parsed
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|v| v.as_name())
                .map(|n| n == b"Image")
                .unwrap_or(false)
        })
        .count();
    // Colour data plus the soft mask for its transparency.
    assert_eq!(images, 2);
}

#[test]
fn test_custom_font_is_embedded_as_cid_font() {
    let json = format!(
        r#"{{"kind": "supervision", "data": {{"employeeName": "Zoë Ångström"}}, "fonts": {{"regular": "{}"}}}}"#,
        FIXTURE_FONT
    );
    let report = render_json_on(&json, date()).unwrap();
    assert_valid_pdf(&report.bytes);
    assert_eq!(report.file_name, "Supervision_Zoë_Ångström_16-10-2026.pdf");

    let parsed = lopdf::Document::load_mem(&report.bytes).unwrap();
    assert_eq!(parsed.get_pages().len(), 1);
    // Bold falls back to the regular face, so one embedding serves both.
    assert_eq!(font_dicts(&parsed, b"Type0"), 1);
    assert_eq!(font_dicts(&parsed, b"CIDFontType2"), 1);
    assert_eq!(font_dicts(&parsed, b"Type1"), 0);
    assert_eq!(embedded_font_files(&parsed), 1);

    let to_unicode = parsed
        .objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .filter(|d| d.get(b"Subtype").and_then(|t| t.as_name()).map(|t| t == b"Type0").unwrap_or(false))
        .all(|d| d.has(b"ToUnicode"));
    assert!(to_unicode);
}

#[test]
fn test_same_font_for_both_weights_is_embedded_once() {
    let json = format!(
        r#"{{"kind": "annualAppraisal", "data": {{"employeeName": "Sam"}}, "fonts": {{"regular": "{0}", "bold": "{0}"}}}}"#,
        FIXTURE_FONT
    );
    let report = render_json_on(&json, date()).unwrap();
    let parsed = lopdf::Document::load_mem(&report.bytes).unwrap();
    assert_eq!(font_dicts(&parsed, b"Type0"), 1);
    assert_eq!(font_dicts(&parsed, b"CIDFontType2"), 1);
    assert_eq!(embedded_font_files(&parsed), 1);
}

#[test]
fn test_custom_bold_with_standard_regular() {
    let json = format!(
        r#"{{"kind": "jobApplication", "data": {{}}, "fonts": {{"bold": "{}"}}}}"#,
        FIXTURE_FONT
    );
    let report = render_json_on(&json, date()).unwrap();
    let parsed = lopdf::Document::load_mem(&report.bytes).unwrap();
    assert_eq!(font_dicts(&parsed, b"Type0"), 1);
    assert_eq!(font_dicts(&parsed, b"Type1"), 1);
}

// ─── Errors ─────────────────────────────────────────────────────

#[test]
fn test_unknown_kind_is_a_parse_error() {
    let err = render_json_on(r#"{"kind": "payslip", "data": {}}"#, date()).unwrap_err();
    assert!(matches!(err, ReportError::Parse { .. }));
}

#[test]
fn test_unreadable_font_aborts_export() {
    let json = r#"{"kind": "supervision", "data": {}, "fonts": {"regular": "./no/such/font.ttf"}}"#;
    let err = render_json_on(json, date()).unwrap_err();
    assert!(matches!(err, ReportError::Asset { .. }));
}

#[test]
fn test_malformed_optional_data_still_renders() {
    let json = r#"{
        "kind": "jobApplication",
        "data": {
            "personalInfo": {"fullName": "Jane Doe", "telephone": 7700900123, "hasDBS": true},
            "availability": "not an object",
            "references": [{"name": "R"}, 42, null]
        }
    }"#;
    let report = render_json_on(json, date()).unwrap();
    assert_valid_pdf(&report.bytes);
    assert_eq!(report.file_name, "Job_Application_Jane_Doe_16-10-2026.pdf");
}
