//! Drawing surface abstraction.
//!
//! The editor core never rasterizes anything itself. It issues a small set of
//! canvas-style calls against a [`Surface`], which the host backs with its
//! renderer of choice.

use kurbo::{Affine, BezPath, Rect, Stroke};
use peniko::Color;

/// Minimal 2D drawing capability consumed by the editor.
pub trait Surface {
    /// Push the current transform onto the state stack.
    fn save(&mut self);
    /// Pop the last saved transform.
    fn restore(&mut self);
    /// Reset the current transform to identity.
    fn reset_transform(&mut self);
    /// Post-multiply the current transform.
    fn transform(&mut self, affine: Affine);
    /// Clear the whole surface.
    fn clear(&mut self);
    /// Resize the backing store, in device pixels.
    fn resize(&mut self, width: u32, height: u32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, color: Color);
    fn fill_path(&mut self, path: &BezPath, color: Color);
    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color);
    /// Blit a previously loaded image into `rect`.
    fn draw_image(&mut self, source: &str, rect: Rect);
}

/// A recorded draw call, with the transform that was current when it was issued.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    FillRect {
        transform: Affine,
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        transform: Affine,
        rect: Rect,
        width: f64,
        dashes: Vec<f64>,
        color: Color,
    },
    FillPath {
        transform: Affine,
        path: BezPath,
        color: Color,
    },
    StrokePath {
        transform: Affine,
        path: BezPath,
        width: f64,
        color: Color,
    },
    DrawImage {
        transform: Affine,
        source: String,
        rect: Rect,
    },
}

/// A [`Surface`] that records the commands of the last frame.
///
/// Hosts can replay the list into their own renderer; tests inspect it directly.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    current: Affine,
    stack: Vec<Affine>,
    width: u32,
    height: u32,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            current: Affine::IDENTITY,
            stack: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn current_transform(&self) -> Affine {
        self.current
    }

    /// Backing store size in device pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Depth of the save/restore stack.
    pub fn saved_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
    }

    fn reset_transform(&mut self) {
        self.current = Affine::IDENTITY;
    }

    fn transform(&mut self, affine: Affine) {
        self.current = self.current * affine;
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            transform: self.current,
            rect,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            transform: self.current,
            rect,
            width: stroke.width,
            dashes: stroke.dash_pattern.iter().copied().collect(),
            color,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            transform: self.current,
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color) {
        self.commands.push(DrawCommand::StrokePath {
            transform: self.current,
            path: path.clone(),
            width: stroke.width,
            color,
        });
    }

    fn draw_image(&mut self, source: &str, rect: Rect) {
        self.commands.push(DrawCommand::DrawImage {
            transform: self.current,
            source: source.to_string(),
            rect,
        });
    }
}
