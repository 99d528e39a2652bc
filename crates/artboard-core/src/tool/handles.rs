//! Handle layout and hit-testing for the transformation tool.

use crate::camera::Camera;
use crate::shapes::SceneElement;
use kurbo::{Point, Vec2};

/// Screen distance between the bottom edge and the rotate handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 32.0;

const CORNER_HANDLE_RADIUS: f64 = 8.0;
const EDGE_HANDLE_RADIUS: f64 = 6.0;
const ROTATE_HANDLE_RADIUS: f64 = 16.0;

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    TopCenter,
    TopRight,
    RightCenter,
    BottomRight,
    BottomCenter,
    BottomLeft,
    LeftCenter,
    Rotate,
    /// The element body.
    Translate,
}

impl HandleKind {
    /// Layout and hit-test order.
    pub const ALL: [HandleKind; 10] = [
        HandleKind::TopLeft,
        HandleKind::TopCenter,
        HandleKind::TopRight,
        HandleKind::RightCenter,
        HandleKind::BottomRight,
        HandleKind::BottomCenter,
        HandleKind::BottomLeft,
        HandleKind::LeftCenter,
        HandleKind::Rotate,
        HandleKind::Translate,
    ];

    /// The handle that stays put while this one scales the element.
    pub fn opposite(self) -> HandleKind {
        match self {
            HandleKind::TopLeft => HandleKind::BottomRight,
            HandleKind::TopCenter => HandleKind::BottomCenter,
            HandleKind::TopRight => HandleKind::BottomLeft,
            HandleKind::RightCenter => HandleKind::LeftCenter,
            HandleKind::BottomRight => HandleKind::TopLeft,
            HandleKind::BottomCenter => HandleKind::TopCenter,
            HandleKind::BottomLeft => HandleKind::TopRight,
            HandleKind::LeftCenter => HandleKind::RightCenter,
            HandleKind::Rotate => HandleKind::Rotate,
            HandleKind::Translate => HandleKind::Translate,
        }
    }

    /// Position in local space as a fraction of the element size.
    pub fn local_anchor(self) -> Vec2 {
        match self {
            HandleKind::TopLeft => Vec2::new(-0.5, -0.5),
            HandleKind::TopCenter => Vec2::new(0.0, -0.5),
            HandleKind::TopRight => Vec2::new(0.5, -0.5),
            HandleKind::RightCenter => Vec2::new(0.5, 0.0),
            HandleKind::BottomRight => Vec2::new(0.5, 0.5),
            HandleKind::BottomCenter => Vec2::new(0.0, 0.5),
            HandleKind::BottomLeft => Vec2::new(-0.5, 0.5),
            HandleKind::LeftCenter => Vec2::new(-0.5, 0.0),
            HandleKind::Rotate | HandleKind::Translate => Vec2::ZERO,
        }
    }

    /// Hit and draw radius in screen pixels.
    pub fn radius(self) -> f64 {
        match self {
            HandleKind::TopLeft
            | HandleKind::TopRight
            | HandleKind::BottomRight
            | HandleKind::BottomLeft => CORNER_HANDLE_RADIUS,
            HandleKind::TopCenter
            | HandleKind::RightCenter
            | HandleKind::BottomCenter
            | HandleKind::LeftCenter => EDGE_HANDLE_RADIUS,
            HandleKind::Rotate | HandleKind::Translate => ROTATE_HANDLE_RADIUS,
        }
    }

    pub fn is_scale(self) -> bool {
        !matches!(self, HandleKind::Rotate | HandleKind::Translate)
    }

    pub fn cursor(self) -> CursorIcon {
        match self {
            HandleKind::TopLeft | HandleKind::BottomRight => CursorIcon::NwseResize,
            HandleKind::TopRight | HandleKind::BottomLeft => CursorIcon::NeswResize,
            HandleKind::TopCenter | HandleKind::BottomCenter => CursorIcon::NsResize,
            HandleKind::RightCenter | HandleKind::LeftCenter => CursorIcon::EwResize,
            HandleKind::Rotate => CursorIcon::Grab,
            HandleKind::Translate => CursorIcon::Move,
        }
    }
}

/// Pointer cursor hint for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorIcon {
    NwseResize,
    NeswResize,
    NsResize,
    EwResize,
    Grab,
    Move,
}

impl CursorIcon {
    /// CSS `cursor` keyword.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorIcon::NwseResize => "nwse-resize",
            CursorIcon::NeswResize => "nesw-resize",
            CursorIcon::NsResize => "ns-resize",
            CursorIcon::EwResize => "ew-resize",
            CursorIcon::Grab => "grab",
            CursorIcon::Move => "move",
        }
    }
}

#[cfg(feature = "winit")]
impl From<CursorIcon> for winit::window::CursorIcon {
    fn from(icon: CursorIcon) -> Self {
        match icon {
            CursorIcon::NwseResize => winit::window::CursorIcon::NwseResize,
            CursorIcon::NeswResize => winit::window::CursorIcon::NeswResize,
            CursorIcon::NsResize => winit::window::CursorIcon::NsResize,
            CursorIcon::EwResize => winit::window::CursorIcon::EwResize,
            CursorIcon::Grab => winit::window::CursorIcon::Grab,
            CursorIcon::Move => winit::window::CursorIcon::Move,
        }
    }
}

/// A manipulation handle placed on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Position in screen coordinates.
    pub position: Point,
}

/// Lay out every handle of `element` in screen space, in [`HandleKind::ALL`] order.
pub fn layout_handles(element: &SceneElement, camera: &Camera) -> [Handle; 10] {
    let ctm = camera.matrix() * element.matrix();
    let [top_left, top_right, bottom_right, bottom_left] = element.local_corners().map(|p| ctm * p);
    let center = ctm * Point::ORIGIN;

    let top_center = top_left.midpoint(top_right);
    let right_center = top_right.midpoint(bottom_right);
    let bottom_center = bottom_right.midpoint(bottom_left);
    let left_center = bottom_left.midpoint(top_left);
    let rotate = rotate_handle_position(center, bottom_left, bottom_center, bottom_right);

    let positions = [
        top_left,
        top_center,
        top_right,
        right_center,
        bottom_right,
        bottom_center,
        bottom_left,
        left_center,
        rotate,
        center,
    ];
    let mut handles = [Handle {
        kind: HandleKind::Translate,
        position: center,
    }; 10];
    for (handle, (kind, position)) in handles
        .iter_mut()
        .zip(HandleKind::ALL.into_iter().zip(positions))
    {
        *handle = Handle { kind, position };
    }
    handles
}

/// Push the bottom-edge midpoint outward along the edge normal.
fn rotate_handle_position(
    center: Point,
    bottom_left: Point,
    bottom_center: Point,
    bottom_right: Point,
) -> Point {
    let edge = bottom_right - bottom_left;
    let normal = Vec2::new(-edge.y, edge.x);
    let length = normal.hypot();
    let mut normal = if length > 0.0 {
        normal / length
    } else {
        Vec2::new(0.0, 1.0)
    };
    if normal.dot(bottom_center - center) < 0.0 {
        normal = -normal;
    }
    bottom_center + normal * ROTATE_HANDLE_OFFSET
}

/// First handle under the screen point. Radius handles are checked first;
/// the element body acts as a catch-all for translation.
pub fn hit_test_handles(
    handles: &[Handle],
    screen: Point,
    element: &SceneElement,
    camera: &Camera,
) -> Option<HandleKind> {
    let radial = handles
        .iter()
        .filter(|h| h.kind != HandleKind::Translate)
        .find(|h| h.position.distance(screen) <= h.kind.radius())
        .map(|h| h.kind);
    if radial.is_some() {
        return radial;
    }

    let has_translate = handles.iter().any(|h| h.kind == HandleKind::Translate);
    if has_translate && element.contains(camera.screen_to_world(screen)) {
        return Some(HandleKind::Translate);
    }
    None
}
