//! Editor configuration.

use crate::camera::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::error::{EditorError, EditorResult};
use crate::input::WheelDeltaMode;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Default trailing delay for coalescing resize notifications.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 200;

/// Platform-dependent scaling of raw wheel deltas into zoom deltas.
///
/// Supplied by the host at construction; the core never inspects the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelScaling {
    /// Divisor for line-based deltas and modifier-held precise zoom.
    pub line_divisor: f64,
    /// Divisor for pixel-based deltas.
    pub pixel_divisor: f64,
}

impl WheelScaling {
    /// Trackpad-style input (macOS).
    pub const fn trackpad() -> Self {
        Self {
            line_divisor: -1.0,
            pixel_divisor: -10.0,
        }
    }

    /// Notched mouse-wheel input.
    pub const fn mouse_wheel() -> Self {
        Self {
            line_divisor: -3.0,
            pixel_divisor: -30.0,
        }
    }

    /// Convert a raw vertical wheel delta into a zoom delta.
    pub fn zoom_delta(&self, delta_y: f64, mode: WheelDeltaMode, precise: bool) -> f64 {
        if precise || mode == WheelDeltaMode::Line {
            delta_y / self.line_divisor
        } else {
            delta_y / self.pixel_divisor
        }
    }
}

impl Default for WheelScaling {
    fn default() -> Self {
        Self::mouse_wheel()
    }
}

/// Construction-time settings for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Ratio of device pixels to layout pixels.
    pub device_pixel_ratio: f64,
    pub wheel: WheelScaling,
    pub resize_debounce_ms: u64,
    /// Artboard painted at the world origin, if any.
    pub artboard: Option<Size>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            device_pixel_ratio: 1.0,
            wheel: WheelScaling::default(),
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            artboard: None,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the camera and viewport rely on.
    pub fn validate(&self) -> EditorResult<()> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(EditorError::Config(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.min_zoom <= self.max_zoom) {
            return Err(EditorError::Config(format!(
                "zoom bounds are inverted: [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.initial_zoom.is_finite() && self.initial_zoom > 0.0) {
            return Err(EditorError::Config(format!(
                "initial_zoom must be positive, got {}",
                self.initial_zoom
            )));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(EditorError::Config(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if self.wheel.line_divisor == 0.0 || self.wheel.pixel_divisor == 0.0 {
            return Err(EditorError::Config("wheel divisors must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.initial_zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.resize_debounce_ms, 200);
        assert_eq!(config.wheel, WheelScaling::mouse_wheel());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = EditorConfig::from_json(
            r#"{"device_pixel_ratio": 2.0, "wheel": {"line_divisor": -1.0, "pixel_divisor": -10.0}}"#,
        )
        .unwrap();
        assert!((config.device_pixel_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.wheel, WheelScaling::trackpad());
        assert!((config.max_zoom - DEFAULT_MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_artboard() {
        let config =
            EditorConfig::from_json(r#"{"artboard": {"width": 1920.0, "height": 1080.0}}"#).unwrap();
        assert_eq!(config.artboard, Some(Size::new(1920.0, 1080.0)));
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"min_zoom": 0.0}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"min_zoom": 5.0, "max_zoom": 2.0}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"device_pixel_ratio": -1.0}"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn test_wheel_scaling() {
        let wheel = WheelScaling::mouse_wheel();
        assert!((wheel.zoom_delta(3.0, WheelDeltaMode::Line, false) + 1.0).abs() < f64::EPSILON);
        assert!((wheel.zoom_delta(30.0, WheelDeltaMode::Pixel, false) + 1.0).abs() < f64::EPSILON);
        assert!((wheel.zoom_delta(3.0, WheelDeltaMode::Pixel, true) + 1.0).abs() < f64::EPSILON);

        let trackpad = WheelScaling::trackpad();
        assert!((trackpad.zoom_delta(-10.0, WheelDeltaMode::Pixel, false) - 1.0).abs() < f64::EPSILON);
    }
}
