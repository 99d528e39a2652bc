//! Bitmap image element.

use crate::surface::Surface;
use kurbo::Rect;

/// Variant data for an image.
///
/// Decoding happens outside the core; the host reports completion and the
/// element starts painting on the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Image source reference (URL, path or data URI).
    pub source: String,
    /// Whether the host has finished loading the source.
    pub loaded: bool,
}

impl Image {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            loaded: false,
        }
    }

    pub(crate) fn paint<S: Surface + ?Sized>(&self, surface: &mut S, body: Rect) {
        if self.loaded {
            surface.draw_image(&self.source, body);
        }
    }
}
