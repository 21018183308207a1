//! # Section Renderer
//!
//! The vocabulary report builders write with: section titles, key/value
//! pairs, two-column grids, paragraphs, tables and bordered boxes.
//!
//! Everything is measured before anything is painted. A block that fits is
//! painted below the cursor; one that fits a fresh page moves there whole;
//! one taller than any page is continued across pages at line boundaries.
//! Boxes become one fragment per page and tables repeat their header row, so
//! no line is ever painted outside the rectangle drawn for it.

use crate::layout::content::{Block, ContentItem, Measurable};
use crate::layout::cursor::{decide, lines_that_fit, Placement, EPSILON};
use crate::layout::page::Stroke;
use crate::layout::{LayoutDocument, RenderedDocument};
use crate::font::FontWeight;
use crate::style::Color;

/// Writes sections into a [`LayoutDocument`].
pub struct SectionRenderer {
    doc: LayoutDocument,
    /// Title waiting for the first block of its section.
    pending_title: Option<String>,
}

impl SectionRenderer {
    pub fn new(doc: LayoutDocument) -> Self {
        Self {
            doc,
            pending_title: None,
        }
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.doc
    }

    pub fn finish(mut self) -> RenderedDocument {
        self.flush_title();
        self.doc.finish()
    }

    /// Filled title bar with bold text.
    ///
    /// The bar is painted together with the next block, on the same page:
    /// a block that fits a page moves with its title, a taller one starts
    /// directly under it.
    pub fn section_title(&mut self, text: &str) {
        self.flush_title();
        self.pending_title = Some(text.to_string());
    }

    /// Bold wrapped text.
    pub fn label(&mut self, text: &str) {
        self.item(&ContentItem::label(text));
    }

    pub fn colored(&mut self, text: &str, color: Color) {
        self.item(&ContentItem::colored(text, color));
    }

    /// Muted text, e.g. "No entries".
    pub fn note(&mut self, text: &str) {
        let color = self.doc.style().muted_color;
        self.colored(text, color);
    }

    pub fn key_value(&mut self, label: &str, value: Option<&str>) {
        self.item(&ContentItem::key_value(label, value));
    }

    /// Pairs laid out two per row; an odd trailing pair sits in the left
    /// column alone.
    pub fn two_column_row(&mut self, pairs: &[(&str, Option<&str>)]) {
        for chunk in pairs.chunks(2) {
            let cell = |(label, value): &(&str, Option<&str>)| {
                (label.to_string(), value.unwrap_or_default().to_string())
            };
            let row = ContentItem::TwoColumnRow {
                left: cell(&chunk[0]),
                right: chunk.get(1).map(cell),
            };
            self.item(&row);
        }
    }

    /// Bold title then wrapped body. Nothing at all when the body is blank.
    pub fn paragraph(&mut self, title: &str, body: Option<&str>) {
        let item = ContentItem::paragraph(title, body);
        let block = self.layout(std::slice::from_ref(&item), self.doc.content_width());
        if block.is_empty() {
            return;
        }
        self.flow(&block);
        let gap = self.doc.style().label_gap;
        self.doc.advance(gap);
    }

    /// Question in bold with the answer under it in `color`.
    pub fn rating(&mut self, question: &str, answer: &str, color: Color) {
        let items = [
            ContentItem::label(question),
            ContentItem::colored(answer, color),
        ];
        let block = self.layout(&items, self.doc.content_width());
        self.flow(&block);
        let gap = self.doc.style().label_gap;
        self.doc.advance(gap);
    }

    pub fn spacer(&mut self, dy: f64) {
        self.flush_title();
        self.doc.advance(dy);
    }

    /// Lay out and flow any content item at full content width.
    pub fn item(&mut self, item: &ContentItem) {
        let block = self.layout(std::slice::from_ref(item), self.doc.content_width());
        self.flow(&block);
    }

    /// Table with a filled header row. `fractions` are shares of the content
    /// width per column.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>], fractions: &[f64]) {
        let columns = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }
        let width = self.doc.content_width();
        let widths = column_widths(fractions, columns, width);

        let header = ContentItem::TableRow {
            cells: headers.iter().map(|h| h.to_string()).collect(),
            widths: widths.clone(),
            header: true,
        };
        let header = self.layout(std::slice::from_ref(&header), width);
        let bodies: Vec<Block> = rows
            .iter()
            .map(|cells| {
                let row = ContentItem::TableRow {
                    cells: cells.clone(),
                    widths: widths.clone(),
                    header: false,
                };
                self.layout(std::slice::from_ref(&row), width)
            })
            .collect();

        let header_height = self.row_height(header.line_count());
        let first = bodies.first().map_or(0.0, |b| self.row_height(b.line_count()));
        let capacity = self.place_title(header_height + first, header_height + self.row_height(1));
        if header_height + first <= capacity + EPSILON {
            self.doc.ensure_space(header_height + first);
        } else {
            self.doc.ensure_space(header_height + self.row_height(1));
        }
        self.table_row(&header, 0..header.line_count(), &widths, true);

        // The current page holds nothing of this table but its header.
        let mut fresh = true;
        for body in &bodies {
            let total = body.line_count();
            let mut start = 0;
            while start < total {
                let left = total - start;
                let remaining = self.doc.remaining();
                let pad = 2.0 * self.doc.style().cell_padding;
                let lh = self.doc.style().line_height;

                if self.row_height(left) <= remaining + EPSILON {
                    self.table_row(body, start..total, &widths, false);
                    start = total;
                    fresh = false;
                    continue;
                }

                let fit = lines_that_fit(remaining, lh, pad).min(left);
                let fits_fresh_page =
                    self.row_height(left) <= self.doc.page_capacity() - header_height + EPSILON;
                if !fresh && (fit == 0 || fits_fresh_page) {
                    self.continue_table(&header, &widths);
                    fresh = true;
                    continue;
                }

                log::debug!("splitting table row of {} lines after {} lines", total, start + fit.max(1));
                let end = start + fit.max(1);
                self.table_row(body, start..end, &widths, false);
                start = end;
                fresh = false;
                if start < total {
                    self.continue_table(&header, &widths);
                    fresh = true;
                }
            }
        }
        let spacing = self.doc.style().label_gap;
        self.doc.advance(spacing);
    }

    /// Bordered panel around `items`, measured before it is painted.
    pub fn boxed(&mut self, items: &[ContentItem]) {
        let style = self.doc.style();
        let pad = style.box_padding;
        let lh = style.line_height;
        let spacing = style.box_spacing;
        let inner = (self.doc.content_width() - 2.0 * pad).max(0.0);

        let ctx = self.doc.measure_context();
        let lines = items.line_count(&ctx, inner);
        if lines == 0 {
            return;
        }
        let required = lines as f64 * lh + 2.0 * pad;
        let capacity = self.place_title(required, lh + 2.0 * pad);
        match decide(required, self.doc.remaining(), capacity) {
            Placement::Here => {}
            Placement::NextPage => self.doc.new_page(),
            Placement::Split => {
                log::debug!("box of {} lines is taller than a page, splitting", lines)
            }
        }

        let block = self.layout(items, inner);
        let total = block.line_count();
        let mut start = 0;
        while start < total {
            let mut fit = lines_that_fit(self.doc.remaining(), lh, 2.0 * pad).min(total - start);
            if fit == 0 {
                if !self.doc.at_page_top() {
                    self.doc.new_page();
                    continue;
                }
                fit = 1;
            }
            self.box_fragment(&block, start..start + fit);
            start += fit;
            if start < total {
                self.doc.new_page();
            }
        }
        self.doc.advance(spacing);
    }

    /// Paint the pending title above a block `whole` points tall whose
    /// smallest leading fragment is `first` points. Returns the capacity the
    /// block may plan with: the room under the title once one was painted,
    /// so the block can no longer move away from it.
    fn place_title(&mut self, whole: f64, first: f64) -> f64 {
        let Some(text) = self.pending_title.take() else {
            return self.doc.page_capacity();
        };
        let style = self.doc.style();
        let head = style.section_title_height + style.label_gap;
        let spacing = style.section_spacing;
        let follow = if head + whole <= self.doc.page_capacity() + EPSILON {
            whole
        } else {
            first
        };
        if !self.doc.at_page_top() && !self.doc.ensure_space(spacing + head + follow) {
            self.doc.advance(spacing);
        }
        self.paint_title(&text);
        self.doc.remaining()
    }

    /// A title with nothing measured after it keeps one line free below.
    fn flush_title(&mut self) {
        if self.pending_title.is_some() {
            let lh = self.doc.style().line_height;
            self.place_title(lh, lh);
        }
    }

    fn paint_title(&mut self, text: &str) {
        let x = self.doc.content_x();
        let width = self.doc.content_width();
        let y = self.doc.cursor().y;
        let (page, style) = self.doc.page_and_style();
        let bar = style.section_title_height;
        page.rect(x, y - bar, width, bar, Some(style.title_background), None);
        let baseline = y - bar / 2.0 - style.title_font_size * 0.35;
        page.text(
            x + style.box_padding,
            baseline,
            text,
            FontWeight::Bold,
            style.title_font_size,
            style.title_color,
        );
        let advance = bar + style.label_gap;
        self.doc.advance(advance);
    }

    fn layout(&self, items: &[ContentItem], width: f64) -> Block {
        let ctx = self.doc.measure_context();
        let mut block = Block::default();
        for item in items {
            block.append(item.layout(&ctx, width));
        }
        block
    }

    /// Paint a block at the content edge, moving or splitting it as needed.
    fn flow(&mut self, block: &Block) {
        if block.is_empty() {
            return;
        }
        let lh = self.doc.style().line_height;
        let required = block.height(lh);
        let capacity = self.place_title(required, lh);
        match decide(required, self.doc.remaining(), capacity) {
            Placement::Here => {}
            Placement::NextPage => self.doc.new_page(),
            Placement::Split => log::debug!(
                "block of {} lines is taller than a page, splitting",
                block.line_count()
            ),
        }

        let total = block.line_count();
        let mut start = 0;
        while start < total {
            let mut fit = lines_that_fit(self.doc.remaining(), lh, 0.0).min(total - start);
            if fit == 0 {
                if !self.doc.at_page_top() {
                    self.doc.new_page();
                    continue;
                }
                fit = 1;
            }
            let x = self.doc.content_x();
            let y = self.doc.cursor().y;
            let (page, style) = self.doc.page_and_style();
            let painted = block.paint(page, start..start + fit, x, y, style);
            self.doc.advance(painted);
            start += fit;
        }
    }

    fn row_height(&self, lines: usize) -> f64 {
        let style = self.doc.style();
        (lines as f64 * style.line_height).max(style.min_row_height) + 2.0 * style.cell_padding
    }

    fn table_row(&mut self, block: &Block, range: std::ops::Range<usize>, widths: &[f64], header: bool) {
        let height = self.row_height(range.len());
        let x = self.doc.content_x();
        let y = self.doc.cursor().y;
        let (page, style) = self.doc.page_and_style();
        let fill = header.then_some(style.table_header_background);
        let stroke = Some(Stroke {
            color: style.border_color,
            width: 0.5,
        });
        let mut offset = 0.0;
        for w in widths {
            page.rect(x + offset, y - height, *w, height, fill, stroke);
            offset += w;
        }
        block.paint(page, range, x, y - style.cell_padding, style);
        self.doc.advance(height);
    }

    fn continue_table(&mut self, header: &Block, widths: &[f64]) {
        self.doc.new_page();
        self.table_row(header, 0..header.line_count(), widths, true);
    }

    fn box_fragment(&mut self, block: &Block, range: std::ops::Range<usize>) {
        let x = self.doc.content_x();
        let width = self.doc.content_width();
        let y = self.doc.cursor().y;
        let (page, style) = self.doc.page_and_style();
        let pad = style.box_padding;
        let height = range.len() as f64 * style.line_height + 2.0 * pad;
        page.rect(
            x,
            y - height,
            width,
            height,
            Some(style.box_background),
            Some(Stroke {
                color: style.border_color,
                width: 0.75,
            }),
        );
        block.paint(page, range, x + pad, y - pad, style);
        self.doc.advance(height);
    }
}

/// Absolute column widths from fractions of `width`.
///
/// Non-positive or missing fractions share whatever the given ones leave
/// over; the result is then scaled to fill `width` exactly.
pub fn column_widths(fractions: &[f64], columns: usize, width: f64) -> Vec<f64> {
    if columns == 0 {
        return Vec::new();
    }
    let given: Vec<Option<f64>> = (0..columns)
        .map(|i| fractions.get(i).copied().filter(|f| f.is_finite() && *f > 0.0))
        .collect();
    let known: Vec<f64> = given.iter().flatten().copied().collect();
    let sum: f64 = known.iter().sum();
    let missing = columns - known.len();

    let share = if missing == 0 {
        0.0
    } else if known.is_empty() {
        1.0
    } else if sum < 1.0 - EPSILON {
        (1.0 - sum) / missing as f64
    } else {
        sum / known.len() as f64
    };

    let raw: Vec<f64> = given.iter().map(|f| f.unwrap_or(share)).collect();
    let total: f64 = raw.iter().sum();
    raw.iter().map(|f| f / total * width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::page::DrawCommand;
    use crate::layout::tests::test_document;
    use crate::style::ReportStyle;

    fn renderer() -> SectionRenderer {
        SectionRenderer::new(test_document())
    }

    fn rects(doc: &RenderedDocument, page: usize) -> Vec<(f64, f64, f64, f64)> {
        doc.pages[page]
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect {
                    x, y, width, height, ..
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }

    /// Baselines of body-size text on a page.
    fn body_baselines(doc: &RenderedDocument, page: usize, size: f64) -> Vec<f64> {
        doc.pages[page]
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { y, size: s, .. } if *s == size => Some(*y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_blank_paragraph_does_not_move_cursor() {
        let mut r = renderer();
        let before = r.document().cursor();
        r.paragraph("Other issues", None);
        r.paragraph("Other issues", Some("   "));
        assert_eq!(r.document().cursor(), before);
    }

    #[test]
    fn test_section_title_moves_with_its_content() {
        let mut r = renderer();
        let lh = r.document().style().line_height;
        let remaining = r.document().remaining();
        r.spacer(remaining - lh);
        r.section_title("References");
        r.note("No references provided");
        assert_eq!(r.document().cursor().page_index, 1);
        let doc = r.finish();
        assert!(doc.pages[1].contains_text("References"));
        assert!(!doc.pages[0].contains_text("References"));
        assert!(doc.pages[1].contains_text("No references provided"));
    }

    #[test]
    fn test_section_title_is_not_left_above_a_moved_box() {
        let mut r = renderer();
        let remaining = r.document().remaining();
        r.spacer(remaining - 60.0);
        r.section_title("Service Users");
        let items: Vec<ContentItem> = (0..8)
            .map(|i| ContentItem::key_value(format!("Question {}", i), Some("No")))
            .collect();
        r.boxed(&items);
        let doc = r.finish();

        assert_eq!(doc.pages.len(), 2);
        assert!(!doc.pages[0].contains_text("Service Users"));
        assert!(doc.pages[1].contains_text("Service Users"));
        assert!(doc.pages[1].contains_text("Question 0:"));
    }

    #[test]
    fn test_section_title_stays_above_start_of_long_block() {
        let mut r = renderer();
        let style = r.document().style().clone();
        let remaining = r.document().remaining();
        r.spacer(remaining - 120.0);
        r.section_title("General Discussion");
        let items: Vec<ContentItem> = (0..80)
            .map(|i| ContentItem::key_value(format!("Line {}", i), Some("value")))
            .collect();
        r.boxed(&items);
        let doc = r.finish();

        assert!(doc.pages[0].contains_text("General Discussion"));
        assert!(doc.pages[0].contains_text("Line 0:"));
        let (_, y, _, _) = rects(&doc, 0)
            .into_iter()
            .filter(|(_, _, w, _)| (*w - style.content_width()).abs() < EPSILON)
            .last()
            .unwrap();
        assert!(y >= style.bottom_limit() - EPSILON);
    }

    #[test]
    fn test_trailing_title_is_still_painted() {
        let mut r = renderer();
        r.section_title("Office Use Only");
        let doc = r.finish();
        assert!(doc.pages[0].contains_text("Office Use Only"));
    }

    #[test]
    fn test_cursor_stays_within_page_bounds() {
        let mut r = renderer();
        let style = r.document().style().clone();
        let (_, height) = style.page_dimensions();
        for i in 0..120 {
            r.key_value(&format!("Question {}", i), Some("An answer that is long enough to wrap onto another line of the page, and then some more words"));
            let y = r.document().cursor().y;
            assert!(y >= style.bottom_limit() - EPSILON);
            assert!(y <= height - style.margin.top + EPSILON);
        }
        let doc = r.finish();
        assert!(doc.pages.len() > 2);
        for p in 0..doc.pages.len() {
            for y in body_baselines(&doc, p, style.font_size) {
                assert!(y > style.bottom_limit());
                assert!(y < height - style.margin.top);
            }
        }
    }

    #[test]
    fn test_box_height_is_premeasured() {
        let mut r = renderer();
        let style = r.document().style().clone();
        let items = vec![
            ContentItem::label("Service user 1"),
            ContentItem::key_value("Name", Some("A. Person")),
            ContentItem::key_value("Concerns", Some("None")),
        ];
        r.boxed(&items);
        let doc = r.finish();

        let expected = 3.0 * style.line_height + 2.0 * style.box_padding;
        let (_, y, _, h) = rects(&doc, 0)
            .into_iter()
            .find(|(_, _, w, _)| (*w - style.content_width()).abs() < EPSILON)
            .unwrap();
        assert!((h - expected).abs() < EPSILON);
        for baseline in body_baselines(&doc, 0, style.font_size) {
            assert!(baseline > y && baseline < y + h);
        }
    }

    #[test]
    fn test_oversized_box_splits_into_fragments() {
        let mut r = renderer();
        let style = r.document().style().clone();
        let items: Vec<ContentItem> = (0..120)
            .map(|i| ContentItem::key_value(format!("Line {}", i), Some("value")))
            .collect();
        r.boxed(&items);
        let doc = r.finish();
        assert!(doc.pages.len() >= 3);

        let mut painted_lines = 0;
        for p in 0..doc.pages.len() {
            let boxes: Vec<_> = rects(&doc, p)
                .into_iter()
                .filter(|(_, _, w, _)| (*w - style.content_width()).abs() < EPSILON)
                .collect();
            assert_eq!(boxes.len(), 1, "one fragment per page");
            let (_, y, _, h) = boxes[0];
            assert!(y >= style.bottom_limit() - EPSILON);
            let lines = ((h - 2.0 * style.box_padding) / style.line_height).round() as usize;
            painted_lines += lines;
            let labels = doc.pages[p].texts().filter(|t| t.starts_with("Line ")).count();
            assert_eq!(labels, lines);
        }
        assert_eq!(painted_lines, 120);
    }

    #[test]
    fn test_table_header_repeats_after_break() {
        let mut r = renderer();
        let rows: Vec<Vec<String>> = (0..80)
            .map(|i| vec![format!("Skill {}", i), "Good".to_string()])
            .collect();
        r.table(&["Skill", "Level"], &rows, &[0.6, 0.4]);
        let doc = r.finish();
        assert!(doc.pages.len() > 1);
        for page in &doc.pages {
            assert!(page.texts().any(|t| t == "Skill"), "header on every page");
        }
        let total: usize = doc
            .pages
            .iter()
            .map(|p| p.texts().filter(|t| t.starts_with("Skill ")).count())
            .sum();
        assert_eq!(total, 80);
    }

    #[test]
    fn test_table_row_height_uses_tallest_cell() {
        let mut r = renderer();
        let style = r.document().style().clone();
        let long = "Moving and handling of service users with hoists and slide sheets";
        r.table(&["Skill", "Level"], &[vec![long.to_string(), "Good".to_string()]], &[0.2, 0.8]);
        let doc = r.finish();
        let widths = column_widths(&[0.2, 0.8], 2, style.content_width());
        let row_rects: Vec<_> = rects(&doc, 0)
            .into_iter()
            .filter(|(_, _, w, _)| (*w - widths[0]).abs() < EPSILON)
            .collect();
        assert_eq!(row_rects.len(), 2);
        let body = row_rects[1].3;
        assert!(body > style.line_height * 2.0 + 2.0 * style.cell_padding - EPSILON);
    }

    #[test]
    fn test_column_widths_normalise() {
        let w = column_widths(&[0.5, 0.5], 2, 400.0);
        assert_eq!(w, vec![200.0, 200.0]);

        let w = column_widths(&[1.0, 3.0], 2, 400.0);
        assert_eq!(w, vec![100.0, 300.0]);

        let w = column_widths(&[0.5], 3, 400.0);
        assert_eq!(w, vec![200.0, 100.0, 100.0]);

        let w = column_widths(&[], 4, 400.0);
        assert_eq!(w, vec![100.0; 4]);

        assert!(column_widths(&[0.3], 0, 400.0).is_empty());
    }

    #[test]
    fn test_two_column_row_odd_pair_sits_left() {
        let mut r = renderer();
        r.two_column_row(&[("Name", Some("Jane")), ("Email", None), ("Postcode", Some("LS1"))]);
        let doc = r.finish();
        let x = doc.pages[0]
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { x, text, .. } if text == "Postcode:" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(x, ReportStyle::default().margin.left);
    }
}
