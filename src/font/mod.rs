//! # Font Management
//!
//! Font handles for measurement and PDF embedding.
//!
//! Without custom fonts every report uses Helvetica and Helvetica-Bold,
//! which PDF viewers supply themselves. Custom TrueType fonts are parsed with
//! ttf-parser, measured from their advance widths, and embedded whole.

pub mod cache;
pub mod metrics;

use std::collections::HashMap;
use std::sync::Arc;

pub use metrics::StandardFontMetrics;

use crate::error::{ReportError, Result};

/// Anything that can tell how wide a string is at a given size.
///
/// This is the only capability the text wrapper needs from a font.
pub trait TextMeasure {
    fn width_of_text_at_size(&self, text: &str, font_size: f64) -> f64;
}

/// The standard PDF fonts this crate draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica => StandardFontMetrics::helvetica(),
            Self::HelveticaBold => StandardFontMetrics::helvetica_bold(),
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    /// Font bounding box in font units: (x_min, y_min, x_max, y_max).
    pub bbox: (i16, i16, i16, i16),
    /// Maps characters to their glyph IDs.
    pub glyph_ids: HashMap<char, u16>,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data.
    pub fn from_font_data(data: &[u8]) -> Result<Self> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| ReportError::Font(format!("failed to parse font data: {}", e)))?;
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                glyph_ids.insert(ch, glyph_id.0);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        let bbox = face.global_bounding_box();
        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender,
            descender,
            cap_height: face.capital_height().unwrap_or(ascender),
            bbox: (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
            glyph_ids,
        })
    }
}

/// A TrueType font loaded from bytes.
#[derive(Debug, Clone)]
pub struct CustomFont {
    /// PDF-safe base font name.
    pub name: String,
    pub data: Vec<u8>,
    pub metrics: CustomFontMetrics,
}

impl CustomFont {
    pub fn parse(name: &str, data: Vec<u8>) -> Result<Self> {
        let metrics = CustomFontMetrics::from_font_data(&data)?;
        Ok(Self {
            name: sanitize_font_name(name),
            data,
            metrics,
        })
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// One of the standard PDF fonts. No embedding needed.
    Standard(StandardFont),
    /// A TrueType font that gets embedded.
    Custom(CustomFont),
}

impl FontData {
    /// The name written as /BaseFont.
    pub fn base_name(&self) -> &str {
        match self {
            FontData::Standard(f) => f.pdf_name(),
            FontData::Custom(f) => &f.name,
        }
    }
}

impl TextMeasure for FontData {
    fn width_of_text_at_size(&self, text: &str, font_size: f64) -> f64 {
        match self {
            FontData::Standard(f) => f.metrics().measure_string(text, font_size),
            FontData::Custom(f) => text
                .chars()
                .map(|ch| f.metrics.char_width(ch, font_size))
                .sum(),
        }
    }
}

/// Shared, immutable font handle.
pub type FontHandle = Arc<FontData>;

/// Which face of the document's font set to draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// The regular/bold pair every report draws with.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: FontHandle,
    bold: FontHandle,
}

impl Default for FontSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl FontSet {
    /// Helvetica and Helvetica-Bold.
    pub fn standard() -> Self {
        Self {
            regular: Arc::new(FontData::Standard(StandardFont::Helvetica)),
            bold: Arc::new(FontData::Standard(StandardFont::HelveticaBold)),
        }
    }

    pub fn new(regular: FontHandle, bold: FontHandle) -> Self {
        Self { regular, bold }
    }

    /// Resolve the configured sources through the process-wide cache.
    ///
    /// A missing bold source reuses the regular face; no sources at all
    /// means the standard fonts.
    pub fn load(sources: &FontSources) -> Result<Self> {
        match (&sources.regular, &sources.bold) {
            (None, None) => Ok(Self::standard()),
            (Some(regular), bold) => {
                let regular = cache::load_font(regular)?;
                let bold = match bold {
                    Some(src) => cache::load_font(src)?,
                    None => {
                        log::warn!("no bold font source given; using the regular face for bold text");
                        regular.clone()
                    }
                };
                Ok(Self::new(regular, bold))
            }
            (None, Some(bold)) => {
                log::warn!("bold font given without a regular face; keeping standard regular");
                Ok(Self::new(
                    Arc::new(FontData::Standard(StandardFont::Helvetica)),
                    cache::load_font(bold)?,
                ))
            }
        }
    }

    pub fn get(&self, weight: FontWeight) -> &FontHandle {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    /// Measure `text` in the given face.
    pub fn measure(&self, text: &str, weight: FontWeight, font_size: f64) -> f64 {
        self.get(weight).width_of_text_at_size(text, font_size)
    }
}

/// Where to fetch custom fonts from (see [`crate::assets`] for formats).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSources {
    pub regular: Option<String>,
    pub bold: Option<String>,
}

/// Sanitize a font name for use as a PDF name object.
pub(crate) fn sanitize_font_name(name: &str) -> String {
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if name.is_empty() {
        "CustomFont".to_string()
    } else {
        name
    }
}
