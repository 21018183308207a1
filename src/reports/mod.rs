//! # Report Builders
//!
//! One straight-line builder per report kind. Each opens a document, writes
//! the sections of its form in order, and serialises the result:
//!
//! ```text
//! ReportRequest → ReportContext (fonts, logo, style, date)
//!       ↓
//!   build(form, ctx) → SectionRenderer … finish() → PdfWriter
//!       ↓
//!   GeneratedReport { kind, file_name, bytes }  →  delivery::save_report
//! ```
//!
//! Assets are loaded into the context before the first page exists, so a
//! missing font or logo fails the export without producing a partial file.

pub mod appraisal;
pub mod delivery;
pub mod job_application;
pub mod supervision;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::font::FontSet;
use crate::image_loader::{load_image, LoadedImage};
use crate::layout::{
    HeaderAlign, LayoutDocument, Logo, RenderedDocument, Resources, SectionRenderer,
    StandardDecorator,
};
use crate::model::{Branding, ReportRequest};
use crate::pdf::{Metadata, PdfWriter};
use crate::style::ReportStyle;

pub use crate::model::ReportKind;

/// Shown in file names when the form has no person name.
const UNKNOWN_NAME: &str = "Unknown";

/// Everything a builder needs besides the form itself.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub branding: Branding,
    pub fonts: FontSet,
    pub logo: Option<LoadedImage>,
    pub style: ReportStyle,
    pub generated_on: NaiveDate,
}

impl ReportContext {
    /// Standard fonts, default style, no logo.
    pub fn new(generated_on: NaiveDate) -> Self {
        Self {
            branding: Branding::default(),
            fonts: FontSet::standard(),
            logo: None,
            style: ReportStyle::default(),
            generated_on,
        }
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Check the style, then fetch the request's fonts and logo. Any
    /// failure aborts here.
    pub fn load(request: &ReportRequest, today: NaiveDate) -> Result<Self> {
        request.style.validate()?;
        let fonts = FontSet::load(&request.fonts)?;
        let logo = match request.branding.logo.as_deref().map(str::trim) {
            Some(src) if !src.is_empty() => Some(load_image(src)?),
            _ => None,
        };
        Ok(Self {
            branding: request.branding.clone(),
            fonts,
            logo,
            style: request.style.clone(),
            generated_on: request.generated_on.unwrap_or(today),
        })
    }

    pub fn company_name(&self) -> &str {
        self.branding.name.as_deref().map(str::trim).unwrap_or("")
    }

    /// Generation date as printed: DD-MM-YYYY.
    pub fn date_label(&self) -> String {
        format_date(self.generated_on)
    }
}

/// A finished report, ready to save or hand to a browser.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub kind: ReportKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// `<Kind>_<Name>_<DD-MM-YYYY>.pdf`, with whitespace in the name replaced
/// by underscores.
pub fn file_name(kind: ReportKind, person: Option<&str>, date: NaiveDate) -> String {
    let name = person
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join("_"))
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    format!("{}_{}_{}.pdf", kind.file_prefix(), name, format_date(date))
}

/// Render whatever report `request` asks for.
pub fn render_request(request: &ReportRequest, today: NaiveDate) -> Result<GeneratedReport> {
    let ctx = ReportContext::load(request, today)?;
    match request.kind {
        ReportKind::JobApplication => job_application::build(&parse_form(&request.data)?, &ctx),
        ReportKind::Supervision => supervision::build(&parse_form(&request.data)?, &ctx),
        ReportKind::AnnualAppraisal => appraisal::build(&parse_form(&request.data)?, &ctx),
    }
}

fn parse_form<T: DeserializeOwned + Default>(data: &serde_json::Value) -> Result<T> {
    if data.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(data.clone())?)
}

/// Open a document for `kind` with the header and footer every page gets.
pub(crate) fn open_document(
    kind: ReportKind,
    ctx: &ReportContext,
    align: HeaderAlign,
    person: Option<&str>,
) -> SectionRenderer {
    let mut resources = Resources::new(ctx.fonts.clone());
    let logo = ctx.logo.as_ref().map(|image| Logo {
        image: resources.add_image(image.clone()),
        width_px: image.width_px,
        height_px: image.height_px,
    });
    let decorator = StandardDecorator::new(ctx.company_name(), kind.title(), align)
        .with_logo(logo)
        .with_footer_note(format!("Generated {}", ctx.date_label()));

    let company = ctx.company_name();
    let metadata = Metadata {
        title: Some(match person {
            Some(name) => format!("{} - {}", kind.title(), name),
            None => kind.title().to_string(),
        }),
        author: (!company.is_empty()).then(|| company.to_string()),
        subject: Some(kind.title().to_string()),
        creation_date: Some(ctx.generated_on),
    };

    let doc = LayoutDocument::new(ctx.style.clone(), resources, metadata, Box::new(decorator));
    SectionRenderer::new(doc)
}

/// Serialise a laid-out report and name the file.
pub(crate) fn serialize(
    kind: ReportKind,
    doc: &RenderedDocument,
    ctx: &ReportContext,
    person: Option<&str>,
) -> Result<GeneratedReport> {
    let bytes = PdfWriter::new().write(doc)?;
    let file_name = file_name(kind, person, ctx.generated_on);
    log::info!(
        "generated {} ({} page(s), {} bytes)",
        file_name,
        doc.pages.len(),
        bytes.len()
    );
    Ok(GeneratedReport {
        kind,
        file_name,
        bytes,
    })
}
