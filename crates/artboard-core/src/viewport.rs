//! Device pixel ratio and drawing-surface sizing.

use crate::surface::Surface;
use kurbo::{Affine, Size};

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Surface dimensions in layout pixels and device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub css_width: u32,
    pub css_height: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Trailing debounce for content-rect notifications.
///
/// Every notification restarts the timer; the last rect is released once the
/// delay has elapsed without another notification.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Size, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a new content rect, replacing any pending one.
    pub fn notify(&mut self, content: Size, now: Instant) {
        self.pending = Some((content, now));
    }

    /// Release the pending rect if the delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        let (content, at) = self.pending?;
        if now.saturating_duration_since(at) < self.delay {
            return None;
        }
        self.pending = None;
        Some(content)
    }
}

/// Maps layout pixels to device pixels and sizes the backing store.
#[derive(Debug, Clone)]
pub struct Viewport {
    device_pixel_ratio: f64,
    size: SurfaceSize,
    debouncer: ResizeDebouncer,
}

impl Viewport {
    pub fn new(device_pixel_ratio: f64, resize_delay: Duration) -> Self {
        Self {
            device_pixel_ratio,
            size: SurfaceSize::default(),
            debouncer: ResizeDebouncer::new(resize_delay),
        }
    }

    /// Device pixel ratio.
    pub fn scale(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Apply the layout-to-device scale to the surface.
    pub fn apply_transform<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.transform(Affine::scale(self.device_pixel_ratio));
    }

    /// Size the surface for a content rect, immediately.
    pub fn resize_to(&mut self, content: Size) -> SurfaceSize {
        let css_width = content.width.max(0.0).floor();
        let css_height = content.height.max(0.0).floor();
        self.size = SurfaceSize {
            css_width: css_width as u32,
            css_height: css_height as u32,
            pixel_width: (css_width * self.device_pixel_ratio).floor() as u32,
            pixel_height: (css_height * self.device_pixel_ratio).floor() as u32,
        };
        self.size
    }

    /// Queue a content rect change behind the resize debounce.
    pub fn on_content_resize(&mut self, content: Size, now: Instant) {
        self.debouncer.notify(content, now);
    }

    /// Apply a debounced resize if one is due.
    pub fn poll_resize(&mut self, now: Instant) -> Option<SurfaceSize> {
        let content = self.debouncer.poll(now)?;
        let size = self.resize_to(content);
        log::debug!(
            "Viewport resized to {}x{} ({}x{} device px)",
            size.css_width,
            size.css_height,
            size.pixel_width,
            size.pixel_height
        );
        Some(size)
    }

    pub fn has_pending_resize(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_coalesces_notifications() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(200));

        debouncer.notify(Size::new(100.0, 100.0), start);
        debouncer.notify(Size::new(200.0, 100.0), start + Duration::from_millis(50));
        debouncer.notify(Size::new(300.0, 100.0), start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(250)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(300)),
            Some(Size::new(300.0, 100.0))
        );
        // Released exactly once.
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_resize_floors_and_scales() {
        let mut viewport = Viewport::new(2.0, Duration::from_millis(200));
        let size = viewport.resize_to(Size::new(640.7, 480.2));
        assert_eq!(
            size,
            SurfaceSize {
                css_width: 640,
                css_height: 480,
                pixel_width: 1280,
                pixel_height: 960,
            }
        );
    }

    #[test]
    fn test_poll_resize() {
        let start = Instant::now();
        let mut viewport = Viewport::new(1.5, Duration::from_millis(200));
        viewport.on_content_resize(Size::new(100.0, 50.0), start);
        assert!(viewport.has_pending_resize());
        assert_eq!(viewport.poll_resize(start), None);

        let size = viewport.poll_resize(start + Duration::from_millis(200)).unwrap();
        assert_eq!((size.pixel_width, size.pixel_height), (150, 75));
        assert_eq!(viewport.size(), size);
    }
}
