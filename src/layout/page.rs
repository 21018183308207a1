//! Pages and the draw commands painted onto them.
//!
//! Coordinates are PDF user space: origin at the bottom-left corner, y
//! growing upwards. Text `y` is the baseline; rectangle `y` is the bottom
//! edge.

use crate::font::FontWeight;
use crate::style::Color;

/// Stroke settings for outlines and rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// One primitive on a page, painted in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        x: f64,
        y: f64,
        text: String,
        weight: FontWeight,
        size: f64,
        color: Color,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    /// An image registered with the document, by index.
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: usize,
    },
}

/// A fixed-size drawable surface.
#[derive(Debug, Clone)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
    pub(crate) header_painted: bool,
    pub(crate) footer_painted: bool,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            header_painted: false,
            footer_painted: false,
        }
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, weight: FontWeight, size: f64, color: Color) {
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            weight,
            size,
            color,
        });
    }

    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
        });
    }

    pub fn image(&mut self, x: f64, y: f64, width: f64, height: f64, image: usize) {
        self.commands.push(DrawCommand::Image {
            x,
            y,
            width,
            height,
            image,
        });
    }

    /// Every text run on the page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn has_header(&self) -> bool {
        self.header_painted
    }

    pub fn has_footer(&self) -> bool {
        self.footer_painted
    }
}
