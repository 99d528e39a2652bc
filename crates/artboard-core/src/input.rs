//! Input normalization for pointer and wheel events.
//!
//! [`InteractionManager`] turns raw host input into four callbacks on an
//! [`InputHandler`] and manages pointer capture so drags keep receiving
//! events after the pointer leaves the drawing surface.

use crate::config::WheelScaling;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Host-assigned pointer identifier.
pub type PointerId = u64;

/// Unit of a raw wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WheelDeltaMode {
    /// Delta in pixels (trackpads, high-resolution wheels).
    #[default]
    Pixel,
    /// Delta in lines (notched wheels).
    Line,
}

/// Vertical wheel delta following the DOM convention (positive = scroll down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    pub delta_y: f64,
    pub mode: WheelDeltaMode,
}

#[cfg(feature = "winit")]
impl From<winit::event::MouseScrollDelta> for WheelDelta {
    fn from(delta: winit::event::MouseScrollDelta) -> Self {
        // winit reports scrolling up as positive.
        match delta {
            winit::event::MouseScrollDelta::LineDelta(_, y) => Self {
                delta_y: -(y as f64),
                mode: WheelDeltaMode::Line,
            },
            winit::event::MouseScrollDelta::PixelDelta(pos) => Self {
                delta_y: -pos.y,
                mode: WheelDeltaMode::Pixel,
            },
        }
    }
}

/// Raw input delivered by the host, in surface (layout pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    PointerDown {
        pointer_id: PointerId,
        position: Point,
    },
    PointerUp {
        pointer_id: PointerId,
    },
    PointerMove {
        position: Point,
    },
    Wheel {
        position: Point,
        delta: WheelDelta,
        /// Modifier held (ctrl / pinch): precise zoom.
        precise: bool,
    },
}

/// Receiver of normalized input.
pub trait InputHandler {
    /// Returns whether the press hit something interactive.
    fn on_pointer_down(&mut self, position: Point) -> bool;
    fn on_pointer_up(&mut self);
    /// Returns whether the move was consumed.
    fn on_pointer_move(&mut self, position: Point) -> bool;
    fn on_scroll(&mut self, zoom_delta: f64, position: Point) -> bool;
}

/// Host capability for routing a pointer's events to the surface.
pub trait PointerCapture {
    fn capture(&mut self, pointer_id: PointerId);
    fn release(&mut self, pointer_id: PointerId);
}

/// Capture implementation for hosts that always deliver pointer events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&mut self, _pointer_id: PointerId) {}

    fn release(&mut self, _pointer_id: PointerId) {}
}

/// Normalizes raw input and tracks pointer capture.
#[derive(Debug, Clone)]
pub struct InteractionManager {
    wheel: WheelScaling,
    captured: Option<PointerId>,
}

impl InteractionManager {
    pub fn new(wheel: WheelScaling) -> Self {
        Self {
            wheel,
            captured: None,
        }
    }

    /// Pointer currently captured, if any.
    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.captured
    }

    pub fn wheel_scaling(&self) -> WheelScaling {
        self.wheel
    }

    /// Forward one raw event to `handler`. Returns the handler's verdict
    /// (`true` for pointer-up).
    pub fn dispatch<H, C>(&mut self, input: RawInput, handler: &mut H, capture: &mut C) -> bool
    where
        H: InputHandler + ?Sized,
        C: PointerCapture + ?Sized,
    {
        match input {
            RawInput::PointerDown {
                pointer_id,
                position,
            } => {
                if let Some(previous) = self.captured.take() {
                    capture.release(previous);
                }
                capture.capture(pointer_id);
                self.captured = Some(pointer_id);
                handler.on_pointer_down(position)
            }
            RawInput::PointerUp { pointer_id } => {
                if self.captured == Some(pointer_id) {
                    capture.release(pointer_id);
                    self.captured = None;
                }
                handler.on_pointer_up();
                true
            }
            RawInput::PointerMove { position } => handler.on_pointer_move(position),
            RawInput::Wheel {
                position,
                delta,
                precise,
            } => {
                let zoom_delta = self.wheel.zoom_delta(delta.delta_y, delta.mode, precise);
                handler.on_scroll(zoom_delta, position)
            }
        }
    }
}
