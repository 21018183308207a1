//! # Page Decoration
//!
//! Headers and footers. The tracker calls `header` exactly once when a page
//! is opened (before any content) and `footer` exactly once when the page is
//! left behind, either for a new page or because the document is finished.
//! Decorators must be pure functions of their inputs so that regenerating a
//! report reproduces it byte for byte.

use crate::font::{FontSet, FontWeight};
use crate::layout::page::{Page, Stroke};
use crate::style::ReportStyle;

/// Band height without a logo.
const BAND_HEIGHT: f64 = 40.0;
/// Band height when a logo is present.
const LOGO_BAND_HEIGHT: f64 = 64.0;
/// Gap between the header rule and the first content line.
const CONTENT_GAP: f64 = 12.0;
/// Distance of the footer rule above the bottom margin.
const FOOTER_RULE_OFFSET: f64 = 18.0;

/// What a decorator can see about the page being decorated.
#[derive(Clone, Copy)]
pub struct DecorContext<'a> {
    /// 1-based page number.
    pub page_number: usize,
    pub style: &'a ReportStyle,
    pub fonts: &'a FontSet,
}

/// Per-page decoration.
pub trait PageDecorator {
    /// Paint the header and return the y where content may start.
    fn header(&self, page: &mut Page, ctx: &DecorContext<'_>) -> f64;

    fn footer(&self, page: &mut Page, ctx: &DecorContext<'_>);
}

/// Horizontal placement of the header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAlign {
    Center,
    /// Left aligned, after the logo if there is one.
    Left,
}

/// A registered logo and its drawn size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logo {
    pub image: usize,
    pub width_px: u32,
    pub height_px: u32,
}

/// Company name + report title + rule; page number footer.
#[derive(Debug, Clone)]
pub struct StandardDecorator {
    pub company_name: String,
    pub title: String,
    pub align: HeaderAlign,
    pub logo: Option<Logo>,
    /// Left-hand footer text, e.g. the generation date.
    pub footer_note: Option<String>,
}

impl StandardDecorator {
    pub fn new(company_name: &str, title: &str, align: HeaderAlign) -> Self {
        Self {
            company_name: company_name.trim().to_string(),
            title: title.to_string(),
            align,
            logo: None,
            footer_note: None,
        }
    }

    pub fn with_logo(mut self, logo: Option<Logo>) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_footer_note(mut self, note: impl Into<String>) -> Self {
        self.footer_note = Some(note.into());
        self
    }

    pub fn band_height(&self) -> f64 {
        if self.logo.is_some() {
            LOGO_BAND_HEIGHT
        } else {
            BAND_HEIGHT
        }
    }

    /// Logo size scaled into the band, aspect preserved.
    fn logo_size(&self, logo: &Logo) -> (f64, f64) {
        if logo.width_px == 0 || logo.height_px == 0 {
            return (0.0, 0.0);
        }
        let max_h = self.band_height() - 8.0;
        let max_w = max_h * 3.0;
        let (w, h) = (logo.width_px as f64, logo.height_px as f64);
        let scale = (max_w / w).min(max_h / h);
        (w * scale, h * scale)
    }
}

impl PageDecorator for StandardDecorator {
    fn header(&self, page: &mut Page, ctx: &DecorContext<'_>) -> f64 {
        let style = ctx.style;
        let left = style.margin.left;
        let content_width = page.width - style.margin.horizontal();
        let top = page.height - style.margin.top;
        let band = self.band_height();

        let mut text_left = left;
        if let Some(logo) = &self.logo {
            let (w, h) = self.logo_size(logo);
            page.image(left, top - band + (band - h) / 2.0, w, h, logo.image);
            text_left = left + w + 10.0;
        }

        let name_baseline = top - band / 2.0 + 2.0;
        let title_baseline = name_baseline - 16.0;
        let lines = [
            (&self.company_name, FontWeight::Bold, style.header_font_size, name_baseline),
            (&self.title, FontWeight::Regular, style.title_font_size, title_baseline),
        ];
        for (text, weight, size, baseline) in lines {
            if text.is_empty() {
                continue;
            }
            let x = match self.align {
                HeaderAlign::Left => text_left,
                HeaderAlign::Center => {
                    let w = ctx.fonts.measure(text, weight, size);
                    left + (content_width - w) / 2.0
                }
            };
            page.text(x, baseline, text, weight, size, style.text_color);
        }

        let rule_y = top - band;
        page.line(
            left,
            rule_y,
            left + content_width,
            rule_y,
            Stroke {
                color: style.rule_color,
                width: 0.75,
            },
        );
        rule_y - CONTENT_GAP
    }

    fn footer(&self, page: &mut Page, ctx: &DecorContext<'_>) {
        let style = ctx.style;
        let left = style.margin.left;
        let content_width = page.width - style.margin.horizontal();
        let rule_y = style.margin.bottom + FOOTER_RULE_OFFSET;
        page.line(
            left,
            rule_y,
            left + content_width,
            rule_y,
            Stroke {
                color: style.rule_color,
                width: 0.5,
            },
        );

        let baseline = style.margin.bottom + 6.0;
        let label = format!("Page {}", ctx.page_number);
        let w = ctx.fonts.measure(&label, FontWeight::Regular, style.small_font_size);
        page.text(
            left + (content_width - w) / 2.0,
            baseline,
            &label,
            FontWeight::Regular,
            style.small_font_size,
            style.muted_color,
        );
        if let Some(note) = &self.footer_note {
            page.text(
                left,
                baseline,
                note,
                FontWeight::Regular,
                style.small_font_size,
                style.muted_color,
            );
        }
    }
}
