//! Label text extracted from the grid.

use serde::Serialize;

use crate::{
    color::Color,
    geometry::{Bounds, Point},
};

/// Horizontal placement of a label inside its available span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// A single line of label text, anchored at the start of its baseline.
#[derive(Debug, Clone, Serialize)]
pub struct TextObject {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
    color: Color,
    alignment: Alignment,
    outline: bool,
}

impl TextObject {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size,
            color: Color::default(),
            alignment: Alignment::Left,
            outline: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Baseline anchor (left edge of the first glyph).
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Whether the renderer should draw a contrasting outline around the
    /// glyphs (used for labels placed over custom artwork).
    pub fn has_outline(&self) -> bool {
        self.outline
    }

    pub fn set_outline(&mut self, outline: bool) {
        self.outline = outline;
    }

    /// Centers the label in `[min_x, max_x]` given its measured width.
    pub fn center_horizontally_between(&mut self, min_x: f32, max_x: f32, width: f32) {
        self.x = min_x + (max_x - min_x - width) / 2.0;
        self.alignment = Alignment::Center;
    }

    /// Aligns the right edge of the label to `max_x` given its measured width.
    pub fn align_right_edge_to(&mut self, max_x: f32, width: f32) {
        self.x = max_x - width;
        self.alignment = Alignment::Right;
    }

    /// Positions the baseline so the glyph cap box is centered in
    /// `[min_y, max_y]`.
    pub fn center_vertically_between(&mut self, min_y: f32, max_y: f32) {
        let cap_height = self.font_size * 0.7;
        let offset = (max_y - min_y - cap_height) / 2.0;
        self.y = max_y - offset;
    }

    /// Bounding box of the rendered label, given its measured dimensions.
    pub fn bounds(&self, width: f32, height: f32) -> Bounds {
        Bounds::new(self.x, self.y - height, self.x + width, self.y)
    }
}
