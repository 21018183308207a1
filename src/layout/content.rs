//! # Content Items
//!
//! The self-describing drawable units the section renderer composes.
//!
//! Every item lays itself out into a [`Block`]: a list of equally tall lines,
//! each holding positioned text runs. Because all lines share the document
//! line height, an item's height is always `lines × line_height`, a block can
//! be cut between any two lines, and boxes are sized by simply adding up the
//! blocks they contain.

use std::ops::Range;

use crate::font::{FontSet, FontWeight};
use crate::layout::page::Page;
use crate::style::{Color, ReportStyle};
use crate::text::wrap_text;

/// What measuring needs: the fonts and the style constants.
#[derive(Clone, Copy)]
pub struct MeasureContext<'a> {
    pub fonts: &'a FontSet,
    pub style: &'a ReportStyle,
}

/// A capability to report rendered size for a given width.
pub trait Measurable {
    /// Lines this item occupies at `width`. Zero means "skip me".
    fn line_count(&self, ctx: &MeasureContext<'_>, width: f64) -> usize;

    fn height(&self, ctx: &MeasureContext<'_>, width: f64) -> f64 {
        self.line_count(ctx, width) as f64 * ctx.style.line_height
    }
}

/// A text run inside a line, offset from the block's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub dx: f64,
    pub text: String,
    pub weight: FontWeight,
    /// `None` paints in the style's text colour.
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
}

/// Laid-out lines of one or more content items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub lines: Vec<Line>,
}

impl Block {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn height(&self, line_height: f64) -> f64 {
        self.lines.len() as f64 * line_height
    }

    pub fn append(&mut self, mut other: Block) {
        self.lines.append(&mut other.lines);
    }

    /// Paint `range` of lines with the first line's top edge at `y_top`.
    /// Returns the painted height.
    pub fn paint(
        &self,
        page: &mut Page,
        range: Range<usize>,
        x: f64,
        y_top: f64,
        style: &ReportStyle,
    ) -> f64 {
        let lh = style.line_height;
        let range = range.start.min(self.lines.len())..range.end.min(self.lines.len());
        let count = range.len();
        for (i, line) in self.lines[range].iter().enumerate() {
            let baseline = y_top - i as f64 * lh - baseline_offset(style);
            for run in &line.runs {
                page.text(
                    x + run.dx,
                    baseline,
                    &run.text,
                    run.weight,
                    style.font_size,
                    run.color.unwrap_or(style.text_color),
                );
            }
        }
        count as f64 * lh
    }
}

/// Distance from a line's top edge to its baseline, centring cap height in
/// the line box.
pub fn baseline_offset(style: &ReportStyle) -> f64 {
    (style.line_height + style.font_size * 0.72) / 2.0
}

/// A drawable unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    /// Bold wrapped text.
    Label(String),
    /// Regular wrapped text, optionally coloured.
    Text { text: String, color: Option<Color> },
    /// Bold label with the value wrapped in a column to its right.
    KeyValue { label: String, value: String },
    /// Bold title over wrapped body; nothing at all when the body is blank.
    Paragraph { title: String, body: Option<String> },
    /// Two key/value cells side by side.
    TwoColumnRow {
        left: (String, String),
        right: Option<(String, String)>,
    },
    /// Table cells with absolute column widths.
    TableRow {
        cells: Vec<String>,
        widths: Vec<f64>,
        header: bool,
    },
}

impl ContentItem {
    pub fn label(text: impl Into<String>) -> Self {
        ContentItem::Label(text.into())
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        ContentItem::Text {
            text: text.into(),
            color: Some(color),
        }
    }

    pub fn key_value(label: impl Into<String>, value: Option<&str>) -> Self {
        ContentItem::KeyValue {
            label: label.into(),
            value: value.unwrap_or_default().to_string(),
        }
    }

    pub fn paragraph(title: impl Into<String>, body: Option<&str>) -> Self {
        ContentItem::Paragraph {
            title: title.into(),
            body: body.map(str::to_string),
        }
    }

    /// Lay out at `width`, producing positioned lines.
    pub fn layout(&self, ctx: &MeasureContext<'_>, width: f64) -> Block {
        let fonts = ctx.fonts;
        let size = ctx.style.font_size;
        match self {
            ContentItem::Label(text) => single_column(text, fonts, FontWeight::Bold, size, width, None),
            ContentItem::Text { text, color } => {
                single_column(text, fonts, FontWeight::Regular, size, width, *color)
            }
            ContentItem::KeyValue { label, value } => key_value_block(label, value, ctx, width),
            ContentItem::Paragraph { title, body } => {
                let body = match body.as_deref().map(str::trim) {
                    Some(b) if !b.is_empty() => b,
                    _ => return Block::default(),
                };
                let mut block = Block::default();
                if !title.trim().is_empty() {
                    block.append(single_column(title, fonts, FontWeight::Bold, size, width, None));
                }
                block.append(single_column(body, fonts, FontWeight::Regular, size, width, None));
                block
            }
            ContentItem::TwoColumnRow { left, right } => {
                let col_width = ((width - ctx.style.column_gutter) / 2.0).max(0.0);
                let left_block = key_value_block(&left.0, &left.1, ctx, col_width);
                let right_block = right
                    .as_ref()
                    .map(|(l, v)| key_value_block(l, v, ctx, col_width))
                    .unwrap_or_default();
                zip_columns(vec![
                    (0.0, left_block),
                    (col_width + ctx.style.column_gutter, right_block),
                ])
            }
            ContentItem::TableRow {
                cells,
                widths,
                header,
            } => {
                let pad = ctx.style.cell_padding;
                let weight = if *header {
                    FontWeight::Bold
                } else {
                    FontWeight::Regular
                };
                let mut columns = Vec::with_capacity(widths.len());
                let mut offset = 0.0;
                for (i, w) in widths.iter().enumerate() {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    let inner = (w - 2.0 * pad).max(0.0);
                    columns.push((offset + pad, single_column(cell, fonts, weight, size, inner, None)));
                    offset += w;
                }
                let mut block = zip_columns(columns);
                if block.is_empty() {
                    block.lines.push(Line::default());
                }
                block
            }
        }
    }
}

impl Measurable for ContentItem {
    fn line_count(&self, ctx: &MeasureContext<'_>, width: f64) -> usize {
        self.layout(ctx, width).line_count()
    }
}

impl Measurable for [ContentItem] {
    fn line_count(&self, ctx: &MeasureContext<'_>, width: f64) -> usize {
        self.iter().map(|item| item.line_count(ctx, width)).sum()
    }
}

fn single_column(
    text: &str,
    fonts: &FontSet,
    weight: FontWeight,
    size: f64,
    width: f64,
    color: Option<Color>,
) -> Block {
    let lines = wrap_text(text, &**fonts.get(weight), size, width)
        .into_iter()
        .map(|text| Line {
            runs: vec![Run {
                dx: 0.0,
                text,
                weight,
                color,
            }],
        })
        .collect();
    Block { lines }
}

/// Label text with a trailing colon, unless it already ends in punctuation.
fn label_text(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() || label.ends_with(':') || label.ends_with('?') {
        label.to_string()
    } else {
        format!("{}:", label)
    }
}

fn key_value_block(label: &str, value: &str, ctx: &MeasureContext<'_>, width: f64) -> Block {
    let fonts = ctx.fonts;
    let size = ctx.style.font_size;
    let gap = ctx.style.label_gap;
    let label = label_text(label);

    // Long questions wrap inside half the width instead of starving the value.
    let natural = fonts.measure(&label, FontWeight::Bold, size) + gap;
    let label_width = natural.min(width / 2.0);
    let label_block = if natural <= width / 2.0 {
        single_column(&label, fonts, FontWeight::Bold, size, width, None)
    } else {
        single_column(&label, fonts, FontWeight::Bold, size, label_width - gap, None)
    };
    let value_block = single_column(
        value,
        fonts,
        FontWeight::Regular,
        size,
        (width - label_width).max(0.0),
        None,
    );
    zip_columns(vec![(0.0, label_block), (label_width, value_block)])
}

/// Merge column blocks line by line, shifting each column by its offset.
fn zip_columns(columns: Vec<(f64, Block)>) -> Block {
    let rows = columns.iter().map(|(_, b)| b.line_count()).max().unwrap_or(0);
    let mut lines = vec![Line::default(); rows];
    for (offset, block) in columns {
        for (i, line) in block.lines.into_iter().enumerate() {
            lines[i].runs.extend(line.runs.into_iter().map(|mut run| {
                run.dx += offset;
                run
            }));
        }
    }
    Block { lines }
}
