//! Transformation tool: on-screen handles for scaling, rotating and moving
//! the selected element.

mod handles;

pub use handles::{
    CursorIcon, Handle, HandleKind, ROTATE_HANDLE_OFFSET, hit_test_handles, layout_handles,
};

use crate::camera::Camera;
use crate::geometry::{normalize_degrees, rotate_vec};
use crate::shapes::{ElementId, SceneElement};
use crate::surface::Surface;
use kurbo::{Affine, BezPath, Circle, Point, Shape, Stroke, Vec2};
use peniko::Color;
use std::sync::OnceLock;

/// Scale axes never shrink below this.
const MIN_SCALE: f64 = 0.01;
/// Reference offsets shorter than this leave the axis scale untouched.
const SCALE_REFERENCE_EPSILON: f64 = 1e-6;

const HANDLE_FILL_COLOR: Color = Color::from_rgba8(0xff, 0xff, 0xff, 0xff);
const HANDLE_HOVER_COLOR: Color = Color::from_rgba8(0x63, 0x66, 0xf1, 0xff);
const ROTATE_ICON_COLOR: Color = Color::from_rgba8(0x00, 0x00, 0x00, 0xff);

/// Circular arrow glyph drawn inside the rotate handle, on a 32x32 grid.
const ROTATE_ICON_PATH: &str = "M17.91 26.8199L18.26 28.8199C19.7529 28.5596 21.1881 28.0383 22.5 27.2799L21.5 25.5499C20.3872 26.1806 19.172 26.6105 17.91 26.8199ZM24.42 23.0699L26 24.3499C26.9686 23.1869 27.7267 21.8637 28.24 20.4399L26.3701 19.7599C25.9192 20.9691 25.2592 22.0895 24.42 23.0699ZM9.50005 27.2499C10.812 28.0083 12.2472 28.5296 13.74 28.7899L14.09 26.7899C12.8262 26.5712 11.6109 26.1311 10.5 25.4899L9.50005 27.2499ZM5.67005 19.7599L3.80005 20.4399C4.30124 21.8609 5.04566 23.1839 6.00005 24.3499L6.32005 24.0899L7.54005 23.0899C6.71513 22.1065 6.06871 20.9862 5.63005 19.7799L5.67005 19.7599ZM29 15.9999C28.9963 14.4844 28.7255 12.9814 28.2001 11.5599L26.33 12.2399C26.767 13.4456 26.9936 14.7175 27 15.9999H29ZM26 7.64992C24.7801 6.1813 23.2517 4.9994 21.5234 4.18824C19.795 3.37707 17.9093 2.95654 16 2.95654C14.0908 2.95654 12.2051 3.37707 10.4767 4.18824C8.74842 4.9994 7.21998 6.1813 6.00005 7.64992V3.99992H4.00005V11.9999H12V9.99992H6.81005C7.7486 8.5661 9.00918 7.37139 10.4913 6.51107C11.9733 5.65074 13.6359 5.14859 15.3465 5.04466C17.057 4.94072 18.7682 5.23788 20.3435 5.91244C21.9188 6.58699 23.3148 7.62028 24.42 8.92992L26 7.64992Z";
/// Half the icon's native grid size.
const ROTATE_ICON_HALF_EXTENT: f64 = 16.0;

fn rotate_icon() -> Option<&'static BezPath> {
    static ICON: OnceLock<Option<BezPath>> = OnceLock::new();
    ICON.get_or_init(|| match BezPath::from_svg(ROTATE_ICON_PATH) {
        Ok(path) => Some(path),
        Err(e) => {
            log::error!("Failed to parse rotate icon: {}", e);
            None
        }
    })
    .as_ref()
}

/// Observable state of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    Idle,
    HoverHandle(HandleKind),
    DraggingScale(HandleKind),
    DraggingRotate,
    DraggingTranslate,
}

#[derive(Debug, Clone, Copy)]
struct RotationDrag {
    center_world: Point,
    initial_angle: f64,
    initial_rotation: f64,
}

#[derive(Debug, Clone, Copy)]
struct TranslationDrag {
    pointer_offset: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct ScaleDrag {
    handle: HandleKind,
    stationary: HandleKind,
    /// World position of the stationary handle, frozen for the whole drag.
    stationary_world: Point,
}

#[derive(Debug, Clone, Copy)]
enum DragContext {
    Rotate(RotationDrag),
    Translate(TranslationDrag),
    Scale(ScaleDrag),
}

impl DragContext {
    fn state(&self) -> ToolState {
        match self {
            DragContext::Rotate(_) => ToolState::DraggingRotate,
            DragContext::Translate(_) => ToolState::DraggingTranslate,
            DragContext::Scale(drag) => ToolState::DraggingScale(drag.handle),
        }
    }

    fn handle(&self) -> HandleKind {
        match self {
            DragContext::Rotate(_) => HandleKind::Rotate,
            DragContext::Translate(_) => HandleKind::Translate,
            DragContext::Scale(drag) => drag.handle,
        }
    }
}

/// Handles for the selected element and the drag in progress, if any.
///
/// The tool stores only the element id; the element and camera are passed in
/// on every call by the controller that owns them.
#[derive(Debug, Clone)]
pub struct TransformationTool {
    element_id: ElementId,
    handles: [Handle; 10],
    hovered: Option<HandleKind>,
    active: Option<DragContext>,
    /// Whether the current drag has mutated the element.
    transformed: bool,
}

impl TransformationTool {
    pub fn new(element: &SceneElement, camera: &Camera) -> Self {
        Self {
            element_id: element.id(),
            handles: layout_handles(element, camera),
            hovered: None,
            active: None,
            transformed: false,
        }
    }

    /// Id of the element this tool manipulates.
    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Recompute handle positions from the element and camera.
    pub fn update_handles(&mut self, element: &SceneElement, camera: &Camera) {
        self.handles = layout_handles(element, camera);
    }

    pub fn state(&self) -> ToolState {
        match (&self.active, self.hovered) {
            (Some(drag), _) => drag.state(),
            (None, Some(kind)) => ToolState::HoverHandle(kind),
            (None, None) => ToolState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn hovered_handle(&self) -> Option<HandleKind> {
        self.hovered
    }

    /// Cursor for the active handle, else the hovered one.
    pub fn cursor(&self) -> Option<CursorIcon> {
        self.active
            .as_ref()
            .map(DragContext::handle)
            .or(self.hovered)
            .map(HandleKind::cursor)
    }

    /// Start a drag if a handle is under the pointer. Returns whether one was hit.
    pub fn on_pointer_down(&mut self, screen: Point, element: &SceneElement, camera: &Camera) -> bool {
        self.update_handles(element, camera);
        let Some(kind) = hit_test_handles(&self.handles, screen, element, camera) else {
            self.active = None;
            return false;
        };

        let pointer_world = camera.screen_to_world(screen);
        let center_world = element.position();
        let drag = match kind {
            HandleKind::Rotate => {
                let to_pointer = pointer_world - center_world;
                DragContext::Rotate(RotationDrag {
                    center_world,
                    initial_angle: to_pointer.y.atan2(to_pointer.x),
                    initial_rotation: element.rotation(),
                })
            }
            HandleKind::Translate => DragContext::Translate(TranslationDrag {
                pointer_offset: pointer_world - center_world,
            }),
            handle => {
                let stationary = handle.opposite();
                let anchor = stationary.local_anchor();
                let size = element.size();
                let local = Point::new(anchor.x * size.x, anchor.y * size.y);
                DragContext::Scale(ScaleDrag {
                    handle,
                    stationary,
                    stationary_world: element.matrix() * local,
                })
            }
        };
        log::debug!("Begin {:?} drag on element {}", kind, self.element_id);
        self.active = Some(drag);
        true
    }

    /// Apply the active drag, or update the hovered handle when idle.
    /// Returns whether the move was consumed.
    pub fn on_pointer_move(
        &mut self,
        screen: Point,
        element: &mut SceneElement,
        camera: &Camera,
    ) -> bool {
        let Some(drag) = self.active else {
            self.update_handles(element, camera);
            self.hovered = hit_test_handles(&self.handles, screen, element, camera);
            return self.hovered.is_some();
        };

        let pointer_world = camera.screen_to_world(screen);
        match drag {
            DragContext::Rotate(drag) => {
                let to_pointer = pointer_world - drag.center_world;
                let angle_delta = to_pointer.y.atan2(to_pointer.x) - drag.initial_angle;
                element.set_rotation(normalize_degrees(
                    drag.initial_rotation + angle_delta.to_degrees(),
                ));
            }
            DragContext::Translate(drag) => {
                element.set_position(pointer_world - drag.pointer_offset);
            }
            DragContext::Scale(drag) => {
                let (scale, position) = scale_with_handle(&drag, pointer_world, element);
                element.set_scale(scale);
                element.set_position(position);
            }
        }
        self.transformed = true;
        self.update_handles(element, camera);
        true
    }

    /// End the drag. Returns whether it changed the element.
    pub fn on_pointer_up(&mut self) -> bool {
        if self.active.take().is_some() {
            log::debug!("End drag on element {}", self.element_id);
        }
        std::mem::take(&mut self.transformed)
    }

    /// Drop the drag without reporting it.
    pub fn cancel(&mut self) {
        self.active = None;
        self.hovered = None;
        self.transformed = false;
    }

    /// Draw the handles in screen space, scaled by the device pixel ratio.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        element: &SceneElement,
        camera: &Camera,
        device_pixel_ratio: f64,
    ) {
        self.update_handles(element, camera);

        surface.save();
        surface.reset_transform();
        surface.transform(Affine::scale(device_pixel_ratio));

        for handle in self.handles.iter().filter(|h| h.kind != HandleKind::Translate) {
            let radius = handle.kind.radius();
            let circle = Circle::new(handle.position, radius).to_path(0.1);
            surface.fill_path(&circle, HANDLE_FILL_COLOR);
            if self.hovered == Some(handle.kind) {
                surface.stroke_path(&circle, &Stroke::new(2.0), HANDLE_HOVER_COLOR);
            }
            if handle.kind == HandleKind::Rotate {
                draw_rotate_icon(surface, handle.position, radius);
            }
        }

        surface.restore();
    }
}

fn draw_rotate_icon<S: Surface + ?Sized>(surface: &mut S, center: Point, radius: f64) {
    let Some(icon) = rotate_icon() else {
        return;
    };
    let scale = radius * 0.75 / ROTATE_ICON_HALF_EXTENT;
    surface.save();
    surface.transform(
        Affine::translate(center.to_vec2())
            * Affine::scale(scale)
            * Affine::translate((-ROTATE_ICON_HALF_EXTENT, -ROTATE_ICON_HALF_EXTENT)),
    );
    surface.fill_path(icon, ROTATE_ICON_COLOR);
    surface.restore();
}

/// New scale and position for a scale drag, keeping the stationary handle fixed.
fn scale_with_handle(drag: &ScaleDrag, pointer_world: Point, element: &SceneElement) -> (Vec2, Point) {
    let size = element.size();
    let dragged = drag.handle.local_anchor();
    let fixed = drag.stationary.local_anchor();
    let p_drag = Vec2::new(dragged.x * size.x, dragged.y * size.y);
    let p_fixed = Vec2::new(fixed.x * size.x, fixed.y * size.y);

    let reference = p_drag - p_fixed;
    let angle = element.rotation().to_radians();
    let actual = rotate_vec(pointer_world - drag.stationary_world, -angle);

    let mut scale = element.scale();
    if reference.x.abs() > SCALE_REFERENCE_EPSILON {
        scale.x = actual.x / reference.x;
    }
    if reference.y.abs() > SCALE_REFERENCE_EPSILON {
        scale.y = actual.y / reference.y;
    }
    scale.x = scale.x.max(MIN_SCALE);
    scale.y = scale.y.max(MIN_SCALE);

    let offset = rotate_vec(Vec2::new(scale.x * p_fixed.x, scale.y * p_fixed.y), angle);
    (scale, drag.stationary_world - offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::tests::rectangle_config;
    use crate::surface::{DisplayList, DrawCommand};

    fn square() -> SceneElement {
        SceneElement::from_config(&rectangle_config(1, Point::ZERO, Vec2::new(100.0, 100.0)))
    }

    fn handle_position(tool: &TransformationTool, kind: HandleKind) -> Point {
        tool.handles()
            .iter()
            .find(|h| h.kind == kind)
            .map(|h| h.position)
            .unwrap()
    }

    fn world_corner(element: &SceneElement, kind: HandleKind) -> Point {
        let anchor = kind.local_anchor();
        let size = element.size();
        element.matrix() * Point::new(anchor.x * size.x, anchor.y * size.y)
    }

    #[test]
    fn test_scale_keeps_opposite_corner_fixed() {
        let camera = Camera::new(Vec2::new(40.0, -15.0), 1.5, 0.1, 10.0);
        for rotation in [0.0, 45.0, 90.0, 137.0] {
            let mut config = rectangle_config(1, Point::new(10.0, 20.0), Vec2::new(120.0, 80.0));
            config.rotation = rotation;
            let mut element = SceneElement::from_config(&config);
            let mut tool = TransformationTool::new(&element, &camera);

            let before = world_corner(&element, HandleKind::TopLeft);
            let grab = handle_position(&tool, HandleKind::BottomRight);
            assert!(tool.on_pointer_down(grab, &element, &camera));
            assert_eq!(tool.state(), ToolState::DraggingScale(HandleKind::BottomRight));

            assert!(tool.on_pointer_move(grab + Vec2::new(30.0, 17.0), &mut element, &camera));
            assert!(tool.on_pointer_move(grab + Vec2::new(-12.0, 41.0), &mut element, &camera));
            let after = world_corner(&element, HandleKind::TopLeft);

            assert!((before - after).hypot() < 1e-6, "rotation {}", rotation);
            assert!(tool.on_pointer_up());
        }
    }

    #[test]
    fn test_scale_follows_pointer() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);
        assert!(tool.on_pointer_down(Point::new(50.0, 50.0), &element, &camera));
        tool.on_pointer_move(Point::new(150.0, 50.0), &mut element, &camera);

        assert!((element.scale().x - 2.0).abs() < 1e-9);
        assert!((element.scale().y - 1.0).abs() < 1e-9);
        assert!((element.position().x - 50.0).abs() < 1e-9);
        assert!(element.position().y.abs() < 1e-9);
    }

    #[test]
    fn test_edge_handle_scales_one_axis() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);
        assert!(tool.on_pointer_down(Point::new(0.0, -50.0), &element, &camera));
        assert_eq!(tool.state(), ToolState::DraggingScale(HandleKind::TopCenter));
        tool.on_pointer_move(Point::new(25.0, -100.0), &mut element, &camera);

        assert!((element.scale().x - 1.0).abs() < 1e-9);
        assert!((element.scale().y - 1.5).abs() < 1e-9);
        assert!((element.position().y + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_clamps_at_minimum() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);
        assert!(tool.on_pointer_down(Point::new(50.0, 50.0), &element, &camera));
        tool.on_pointer_move(Point::new(-300.0, -300.0), &mut element, &camera);

        assert!((element.scale().x - MIN_SCALE).abs() < f64::EPSILON);
        assert!((element.scale().y - MIN_SCALE).abs() < f64::EPSILON);
        let pivot = world_corner(&element, HandleKind::TopLeft);
        assert!((pivot - Point::new(-50.0, -50.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);

        assert_eq!(handle_position(&tool, HandleKind::Rotate), Point::new(0.0, 82.0));
        assert!(tool.on_pointer_down(Point::new(0.0, 82.0), &element, &camera));
        assert_eq!(tool.state(), ToolState::DraggingRotate);
        tool.on_pointer_move(Point::new(-82.0, 0.0), &mut element, &camera);

        assert!((element.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_wraps_into_range() {
        let camera = Camera::default();
        let mut element = square();
        element.set_rotation(110.0);
        let mut tool = TransformationTool::new(&element, &camera);

        let start = handle_position(&tool, HandleKind::Rotate);
        assert!(tool.on_pointer_down(start, &element, &camera));
        let end = Point::ORIGIN + rotate_vec(start.to_vec2(), std::f64::consts::FRAC_PI_2);
        tool.on_pointer_move(end, &mut element, &camera);

        assert!((element.rotation() + 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_keeps_grab_offset() {
        let camera = Camera::new(Vec2::ZERO, 2.0, 0.1, 10.0);
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);

        assert!(tool.on_pointer_down(Point::new(20.0, 10.0), &element, &camera));
        assert_eq!(tool.state(), ToolState::DraggingTranslate);
        tool.on_pointer_move(Point::new(60.0, 50.0), &mut element, &camera);

        assert_eq!(element.position(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_pointer_up_reports_once() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);

        assert!(tool.on_pointer_down(Point::ZERO, &element, &camera));
        assert!(!tool.on_pointer_up());

        assert!(tool.on_pointer_down(Point::ZERO, &element, &camera));
        tool.on_pointer_move(Point::new(5.0, 5.0), &mut element, &camera);
        tool.on_pointer_move(Point::new(9.0, 5.0), &mut element, &camera);
        assert!(tool.on_pointer_up());
        assert!(!tool.on_pointer_up());
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_miss_and_hover() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);

        assert!(!tool.on_pointer_down(Point::new(300.0, 300.0), &element, &camera));
        assert_eq!(tool.state(), ToolState::Idle);
        assert_eq!(tool.cursor(), None);

        assert!(tool.on_pointer_move(Point::new(50.0, 0.0), &mut element, &camera));
        assert_eq!(tool.state(), ToolState::HoverHandle(HandleKind::RightCenter));
        assert_eq!(tool.cursor(), Some(CursorIcon::EwResize));

        assert!(!tool.on_pointer_move(Point::new(300.0, 0.0), &mut element, &camera));
        assert_eq!(tool.cursor(), None);
    }

    #[test]
    fn test_cursor_prefers_active_handle() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);

        tool.on_pointer_move(Point::new(50.0, 50.0), &mut element, &camera);
        assert!(tool.on_pointer_down(Point::ZERO, &element, &camera));
        assert_eq!(tool.cursor(), Some(CursorIcon::Move));
    }

    #[test]
    fn test_cancel_drops_transform() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);
        assert!(tool.on_pointer_down(Point::ZERO, &element, &camera));
        tool.on_pointer_move(Point::new(5.0, 5.0), &mut element, &camera);
        tool.cancel();
        assert!(!tool.on_pointer_up());
    }

    #[test]
    fn test_draw_handles() {
        let camera = Camera::default();
        let mut element = square();
        let mut tool = TransformationTool::new(&element, &camera);
        tool.on_pointer_move(Point::new(-50.0, -50.0), &mut element, &camera);

        let mut list = DisplayList::new();
        tool.draw(&mut list, &element, &camera, 2.0);

        let fills = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillPath { .. }))
            .count();
        let rings = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
            .count();
        // Nine circles plus the rotate icon.
        assert_eq!(fills, 10);
        assert_eq!(rings, 1);
        assert_eq!(list.saved_depth(), 0);
        match &list.commands()[0] {
            DrawCommand::FillPath { transform, .. } => {
                assert_eq!(*transform, Affine::scale(2.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
