//! Solid-color rectangle element.

use crate::surface::Surface;
use kurbo::Rect;
use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Variant data for a filled rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// CSS color string, kept verbatim for lossless export.
    pub color: String,
}

impl Rectangle {
    pub fn new(color: impl Into<String>) -> Self {
        Self { color: color.into() }
    }

    /// Parse the CSS color, if valid.
    pub fn fill_color(&self) -> Option<Color> {
        parse_color(&self.color)
            .ok()
            .map(|color| color.to_alpha_color::<Srgb>())
    }

    pub(crate) fn paint<S: Surface + ?Sized>(&self, surface: &mut S, body: Rect) {
        match self.fill_color() {
            Some(color) => surface.fill_rect(body, color),
            None => log::warn!("Skipping rectangle with unparseable color {:?}", self.color),
        }
    }
}
