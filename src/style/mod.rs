//! # Report Style
//!
//! Page geometry, typography and colour constants shared by every report.
//! A `ReportStyle` can be supplied in the request JSON; every field has a
//! default so partial overrides work.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Global style constants for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportStyle {
    pub page_size: PageSize,
    /// Page margins in points (1/72 inch).
    pub margin: Edges,

    // ── Typography ─────────────────────────────────────────────
    /// Body text size.
    pub font_size: f64,
    /// Section title bar text size.
    pub title_font_size: f64,
    /// Company name size in the page header.
    pub header_font_size: f64,
    /// Footer and caption size.
    pub small_font_size: f64,
    /// Vertical advance of one wrapped line.
    pub line_height: f64,

    // ── Spacing ────────────────────────────────────────────────
    pub section_title_height: f64,
    /// Space left after a section's last block.
    pub section_spacing: f64,
    /// Horizontal gap between a key/value label and its value.
    pub label_gap: f64,
    /// Gap between the two columns of a two-column row.
    pub column_gutter: f64,
    pub box_padding: f64,
    /// Vertical gap between consecutive boxes.
    pub box_spacing: f64,
    pub cell_padding: f64,
    /// Floor for a table row's content height.
    pub min_row_height: f64,
    /// Space reserved above the bottom margin for the footer.
    pub footer_height: f64,

    // ── Colour ─────────────────────────────────────────────────
    pub text_color: Color,
    pub muted_color: Color,
    pub title_background: Color,
    pub title_color: Color,
    pub box_background: Color,
    pub border_color: Color,
    pub table_header_background: Color,
    pub rule_color: Color,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: Edges::uniform(40.0),
            font_size: 10.0,
            title_font_size: 12.0,
            header_font_size: 16.0,
            small_font_size: 8.0,
            line_height: 14.0,
            section_title_height: 22.0,
            section_spacing: 10.0,
            label_gap: 6.0,
            column_gutter: 20.0,
            box_padding: 8.0,
            box_spacing: 8.0,
            cell_padding: 4.0,
            min_row_height: 14.0,
            footer_height: 24.0,
            text_color: Color::rgb(0.1, 0.1, 0.12),
            muted_color: Color::rgb(0.45, 0.45, 0.5),
            title_background: Color::hex("#1e3a5f"),
            title_color: Color::WHITE,
            box_background: Color::hex("#f3f5f8"),
            border_color: Color::hex("#c5ccd6"),
            table_header_background: Color::hex("#e2e8f0"),
            rule_color: Color::hex("#94a3b8"),
        }
    }
}

impl ReportStyle {
    /// (width, height) of every page.
    pub fn page_dimensions(&self) -> (f64, f64) {
        self.page_size.dimensions()
    }

    /// Usable width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.page_size.dimensions().0 - self.margin.horizontal()
    }

    /// Lowest y any content line may occupy.
    pub fn bottom_limit(&self) -> f64 {
        self.margin.bottom + self.footer_height
    }

    /// Height between the top margin and the footer reserve.
    pub fn content_height(&self) -> f64 {
        self.page_dimensions().1 - self.margin.top - self.bottom_limit()
    }

    /// Reject geometry that leaves no room to write into.
    ///
    /// Every field deserializes on its own, so a request can still ask for
    /// margins wider than the page or a zero line height. Those are refused
    /// here, before the first page is opened.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_dimensions();
        let lengths = [
            ("page width", width),
            ("page height", height),
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
            ("footerHeight", self.footer_height),
            ("sectionTitleHeight", self.section_title_height),
            ("sectionSpacing", self.section_spacing),
            ("labelGap", self.label_gap),
            ("columnGutter", self.column_gutter),
            ("boxPadding", self.box_padding),
            ("boxSpacing", self.box_spacing),
            ("cellPadding", self.cell_padding),
            ("minRowHeight", self.min_row_height),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ReportError::Style(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        let sizes = [
            ("fontSize", self.font_size),
            ("titleFontSize", self.title_font_size),
            ("headerFontSize", self.header_font_size),
            ("smallFontSize", self.small_font_size),
            ("lineHeight", self.line_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReportError::Style(format!(
                    "{} must be greater than zero, got {}",
                    name, value
                )));
            }
        }
        if self.content_width() <= 2.0 * self.box_padding {
            return Err(ReportError::Style(format!(
                "margins leave {:.1}pt of a {:.1}pt wide page for content",
                self.content_width(),
                width
            )));
        }
        if self.content_height() < self.line_height {
            return Err(ReportError::Style(format!(
                "margins and footer leave {:.1}pt of a {:.1}pt high page for content",
                self.content_height().max(0.0),
                height
            )));
        }
        Ok(())
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`. Anything else is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
