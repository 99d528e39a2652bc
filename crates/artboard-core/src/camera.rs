//! Camera module for pan/zoom transforms.

use crate::geometry::try_invert;
use kurbo::{Affine, Point, Vec2};
use std::cell::Cell;

/// Default minimum zoom level.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
/// Default maximum zoom level.
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;
/// Normalized wheel deltas are divided by this before being added to the zoom.
pub const ZOOM_DELTA_DIVISOR: f64 = 40.0;

/// Camera manages the view transform for the canvas.
///
/// The world-to-screen transform is `translate(position) · rotate(rotation) ·
/// scale(zoom)`. It is cached and only recomputed after a mutation of the
/// position or zoom.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Screen-space translation of the world origin.
    position: Vec2,
    /// Current zoom level.
    zoom: f64,
    /// Rotation in degrees. Reserved, always 0.
    rotation: f64,
    min_zoom: f64,
    max_zoom: f64,
    /// Last screen pointer while panning.
    pan_anchor: Option<Point>,
    cached_matrix: Cell<Option<Affine>>,
    /// Bumped on every invalidation of the cached transform.
    version: u64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0, DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
    }
}

impl Camera {
    /// Create a camera with explicit position, zoom and zoom bounds.
    pub fn new(position: Vec2, zoom: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            position,
            zoom,
            rotation: 0.0,
            min_zoom,
            max_zoom,
            pan_anchor: None,
            cached_matrix: Cell::new(None),
            version: 0,
        }
    }

    /// Screen-space translation of the world origin.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Camera rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Lower zoom bound used by wheel zoom.
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Upper zoom bound used by wheel zoom.
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Number of times the cached transform has been invalidated.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Enter panning mode, anchored at the given screen point.
    pub fn begin_panning(&mut self, screen: Point) {
        self.pan_anchor = Some(screen);
    }

    /// Move by the screen delta since the last anchor and re-anchor.
    /// Does nothing unless panning.
    pub fn pan_to(&mut self, screen: Point) {
        let Some(anchor) = self.pan_anchor else {
            return;
        };
        self.move_by(screen - anchor);
        self.pan_anchor = Some(screen);
    }

    /// Leave panning mode.
    pub fn end_panning(&mut self) {
        self.pan_anchor = None;
    }

    /// Translate the camera by a screen-space delta.
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
        self.invalidate();
    }

    /// Set the zoom directly, without clamping to the zoom bounds.
    ///
    /// Non-positive or non-finite values are rejected.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !(zoom.is_finite() && zoom > 0.0) {
            log::warn!("Ignoring invalid zoom level {}", zoom);
            return;
        }
        self.zoom = zoom;
        self.invalidate();
    }

    /// Adjust the zoom by a normalized wheel delta, keeping the world point
    /// under `screen` fixed on screen.
    ///
    /// Returns `false` (and leaves the camera untouched) when the clamped
    /// zoom does not change.
    pub fn adjust_zoom_with_bounds(&mut self, zoom_delta: f64, screen: Point) -> bool {
        let next_zoom =
            (self.zoom + zoom_delta / ZOOM_DELTA_DIVISOR).clamp(self.min_zoom, self.max_zoom);
        if (next_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let world = self.screen_to_world(screen);
        self.position = Vec2::new(screen.x - world.x * next_zoom, screen.y - world.y * next_zoom);
        self.zoom = next_zoom;
        self.invalidate();
        true
    }

    /// World-to-screen transform.
    pub fn matrix(&self) -> Affine {
        if let Some(matrix) = self.cached_matrix.get() {
            return matrix;
        }
        let matrix = Affine::translate(self.position)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.zoom);
        self.cached_matrix.set(Some(matrix));
        matrix
    }

    /// Screen-to-world transform.
    pub fn inverse_matrix(&self) -> Affine {
        match try_invert(self.matrix()) {
            Ok(inverse) => inverse,
            Err(e) => {
                log::error!("Camera transform is singular: {}", e);
                Affine::IDENTITY
            }
        }
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.inverse_matrix() * screen
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.matrix() * world
    }

    fn invalidate(&mut self) {
        self.cached_matrix.set(None);
        self.version += 1;
    }
}
