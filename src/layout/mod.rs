//! # Page-Aware Layout
//!
//! Reports are written top to bottom into fixed-size pages. There is no
//! infinite canvas and no slicing afterwards: every block is measured first,
//! then the tracker decides whether it goes below the cursor, on a fresh
//! page, or (when taller than any page) across several pages at line
//! boundaries.
//!
//! ```text
//!   text::wrap_text  →  content (Measurable items → Blocks)
//!                              ↓
//!   LayoutDocument (pages + cursor)  ←  decor (header/footer)
//!                              ↓
//!   section::SectionRenderer (titles, key/values, tables, boxes)
//!                              ↓
//!   RenderedDocument  →  pdf::PdfWriter
//! ```

pub mod content;
pub mod cursor;
pub mod decor;
pub mod page;
pub mod section;

pub use content::{Block, ContentItem, Line, Measurable, MeasureContext, Run};
pub use cursor::{Cursor, Placement, TrackerState};
pub use decor::{DecorContext, HeaderAlign, Logo, PageDecorator, StandardDecorator};
pub use page::{DrawCommand, Page, Stroke};
pub use section::SectionRenderer;

use crate::font::FontSet;
use crate::image_loader::LoadedImage;
use crate::pdf::Metadata;
use crate::style::ReportStyle;

/// Fonts and images a document draws with.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub fonts: FontSet,
    pub images: Vec<LoadedImage>,
}

impl Resources {
    pub fn new(fonts: FontSet) -> Self {
        Self {
            fonts,
            images: Vec::new(),
        }
    }

    /// Register an image and return its index for [`DrawCommand::Image`].
    pub fn add_image(&mut self, image: LoadedImage) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }
}

/// A finished document, ready for serialisation.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pages: Vec<Page>,
    pub resources: Resources,
    pub metadata: Metadata,
}

/// The page list plus the cursor that writes into it.
///
/// Owns the style constants and the decorator; guarantees every page gets
/// exactly one header (when opened) and one footer (when left).
pub struct LayoutDocument {
    style: ReportStyle,
    resources: Resources,
    metadata: Metadata,
    decorator: Box<dyn PageDecorator>,
    pages: Vec<Page>,
    cursor: Cursor,
    state: TrackerState,
    /// y where content starts on the current page, as set by its header.
    content_top: f64,
}

impl LayoutDocument {
    /// Create the document and open its first page.
    pub fn new(
        style: ReportStyle,
        resources: Resources,
        metadata: Metadata,
        decorator: Box<dyn PageDecorator>,
    ) -> Self {
        let mut doc = Self {
            style,
            resources,
            metadata,
            decorator,
            pages: Vec::new(),
            cursor: Cursor {
                page_index: 0,
                y: 0.0,
            },
            state: TrackerState::Writing,
            content_top: 0.0,
        };
        doc.open_page();
        doc
    }

    pub fn style(&self) -> &ReportStyle {
        &self.style
    }

    pub fn fonts(&self) -> &FontSet {
        &self.resources.fonts
    }

    pub fn measure_context(&self) -> MeasureContext<'_> {
        MeasureContext {
            fonts: &self.resources.fonts,
            style: &self.style,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Left edge of the content area.
    pub fn content_x(&self) -> f64 {
        self.style.margin.left
    }

    pub fn content_width(&self) -> f64 {
        self.style.content_width()
    }

    /// Space between the cursor and the bottom limit.
    pub fn remaining(&self) -> f64 {
        (self.cursor.y - self.style.bottom_limit()).max(0.0)
    }

    /// Space a freshly opened page offers.
    pub fn page_capacity(&self) -> f64 {
        (self.content_top - self.style.bottom_limit()).max(0.0)
    }

    /// Whether nothing has been written below the header yet.
    pub fn at_page_top(&self) -> bool {
        (self.cursor.y - self.content_top).abs() < cursor::EPSILON
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        let index = self.cursor.page_index;
        &mut self.pages[index]
    }

    /// Split borrow for painting: the current page plus the style.
    pub(crate) fn page_and_style(&mut self) -> (&mut Page, &ReportStyle) {
        let index = self.cursor.page_index;
        (&mut self.pages[index], &self.style)
    }

    /// Make sure `required` points fit below the cursor, breaking the page if
    /// they don't. Returns whether a break happened.
    ///
    /// A fresh page is never broken again: a block taller than a whole page
    /// has to be split by the caller.
    pub fn ensure_space(&mut self, required: f64) -> bool {
        if required <= self.remaining() + cursor::EPSILON || self.at_page_top() {
            return false;
        }
        self.state = TrackerState::PageBreak;
        log::debug!(
            "page break on page {}: need {:.1}pt, {:.1}pt left",
            self.cursor.page_index + 1,
            required,
            self.remaining()
        );
        self.new_page();
        true
    }

    /// Leave the current page: paint its footer and open the next one.
    pub fn new_page(&mut self) {
        self.close_page();
        self.open_page();
    }

    /// Move the cursor down by `dy`, never past the bottom limit.
    pub fn advance(&mut self, dy: f64) {
        self.cursor.y = (self.cursor.y - dy).max(self.style.bottom_limit());
    }

    /// Paint the last footer and hand over the pages.
    pub fn finish(mut self) -> RenderedDocument {
        self.close_page();
        log::debug!("layout finished with {} page(s)", self.pages.len());
        RenderedDocument {
            pages: self.pages,
            resources: self.resources,
            metadata: self.metadata,
        }
    }

    fn open_page(&mut self) {
        let (width, height) = self.style.page_dimensions();
        let mut page = Page::new(width, height);
        let ctx = DecorContext {
            page_number: self.pages.len() + 1,
            style: &self.style,
            fonts: &self.resources.fonts,
        };
        let top_limit = height - self.style.margin.top;
        let start = self.decorator.header(&mut page, &ctx);
        page.header_painted = true;
        // Not `clamp`: a style that was never validated may put the bottom
        // limit above the top margin.
        let start = start.min(top_limit).max(self.style.bottom_limit());

        self.pages.push(page);
        self.cursor = Cursor {
            page_index: self.pages.len() - 1,
            y: start,
        };
        self.content_top = start;
        self.state = TrackerState::Writing;
    }

    fn close_page(&mut self) {
        let index = self.cursor.page_index;
        let Some(page) = self.pages.get_mut(index) else {
            return;
        };
        if page.footer_painted {
            return;
        }
        let ctx = DecorContext {
            page_number: index + 1,
            style: &self.style,
            fonts: &self.resources.fonts,
        };
        self.decorator.footer(page, &ctx);
        page.footer_painted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn test_document() -> LayoutDocument {
        LayoutDocument::new(
            ReportStyle::default(),
            Resources::default(),
            Metadata::default(),
            Box::new(StandardDecorator::new("Acme Care", "Test", HeaderAlign::Left)),
        )
    }

    #[test]
    fn test_first_page_has_header_before_content() {
        let doc = test_document();
        assert_eq!(doc.pages().len(), 1);
        assert!(doc.pages()[0].has_header());
        assert!(!doc.pages()[0].has_footer());
        assert!(doc.at_page_top());
    }

    #[test]
    fn test_ensure_space_breaks_only_when_needed() {
        let mut doc = test_document();
        assert!(!doc.ensure_space(100.0));
        doc.advance(doc.remaining() - 10.0);
        assert!(doc.ensure_space(11.0));
        assert_eq!(doc.pages().len(), 2);
        assert_eq!(doc.cursor().page_index, 1);
        assert!(doc.pages()[0].has_footer());
        assert_eq!(doc.state(), TrackerState::Writing);
    }

    #[test]
    fn test_fresh_page_is_never_broken_again() {
        let mut doc = test_document();
        let huge = doc.page_capacity() * 3.0;
        assert!(!doc.ensure_space(huge));
        assert_eq!(doc.pages().len(), 1);
    }

    #[test]
    fn test_advance_clamps_at_bottom_limit() {
        let mut doc = test_document();
        doc.advance(10_000.0);
        assert_eq!(doc.cursor().y, doc.style().bottom_limit());
    }

    #[test]
    fn test_every_page_gets_one_header_and_one_footer() {
        let mut doc = test_document();
        doc.new_page();
        doc.new_page();
        let rendered = doc.finish();
        assert_eq!(rendered.pages.len(), 3);
        for (i, page) in rendered.pages.iter().enumerate() {
            assert!(page.has_header() && page.has_footer());
            let footers = page.texts().filter(|t| t.starts_with("Page ")).count();
            assert_eq!(footers, 1, "page {} footer count", i + 1);
            assert!(page.contains_text(&format!("Page {}", i + 1)));
        }
    }

    #[test]
    fn test_page_without_content_area_opens_at_bottom_limit() {
        let style: ReportStyle = serde_json::from_str(
            r#"{ "margin": { "top": 500, "right": 40, "bottom": 500, "left": 40 } }"#,
        )
        .unwrap();
        let mut doc = LayoutDocument::new(
            style,
            Resources::default(),
            Metadata::default(),
            Box::new(StandardDecorator::new("Acme Care", "Test", HeaderAlign::Left)),
        );
        assert_eq!(doc.cursor().y, doc.style().bottom_limit());
        assert_eq!(doc.page_capacity(), 0.0);
        doc.new_page();
        assert_eq!(doc.finish().pages.len(), 2);
    }
}
