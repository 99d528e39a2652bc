//! Editor controller: owns the scene, camera and tool, routes input and renders.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::events::{SceneEvent, SceneEventManager};
use crate::input::{InputHandler, InteractionManager, PointerCapture, RawInput};
use crate::scene::SceneGraph;
use crate::shapes::{ElementConfig, ElementId};
use crate::surface::Surface;
use crate::tool::{CursorIcon, TransformationTool};
use crate::viewport::{Duration, Instant, SurfaceSize, Viewport};
use kurbo::{Point, Size, Vec2};
use peniko::Color;

const ARTBOARD_COLOR: Color = Color::from_rgba8(0x6b, 0x72, 0x80, 0xff);

/// Ties a drawing surface to the scene and turns input into edits and events.
///
/// Every state change renders immediately.
pub struct Controller<S: Surface> {
    surface: S,
    viewport: Viewport,
    camera: Camera,
    scene: SceneGraph,
    events: SceneEventManager,
    interaction: InteractionManager,
    /// Present while an element is selected.
    tool: Option<TransformationTool>,
    hovered: Option<ElementId>,
    selected: Option<ElementId>,
    artboard: Option<Size>,
    cursor: Option<CursorIcon>,
    frames: u64,
}

impl<S: Surface> Controller<S> {
    /// Create a controller. Fails without a surface or with an invalid config.
    pub fn new(surface: Option<S>, config: EditorConfig) -> EditorResult<Self> {
        let surface = surface.ok_or(EditorError::SurfaceUnavailable)?;
        config.validate()?;
        log::info!(
            "Editor started (zoom {} in [{}, {}], dpr {})",
            config.initial_zoom,
            config.min_zoom,
            config.max_zoom,
            config.device_pixel_ratio
        );
        Ok(Self {
            surface,
            viewport: Viewport::new(
                config.device_pixel_ratio,
                Duration::from_millis(config.resize_debounce_ms),
            ),
            camera: Camera::new(Vec2::ZERO, config.initial_zoom, config.min_zoom, config.max_zoom),
            scene: SceneGraph::new(),
            events: SceneEventManager::new(),
            interaction: InteractionManager::new(config.wheel),
            tool: None,
            hovered: None,
            selected: None,
            artboard: config.artboard,
            cursor: None,
            frames: 0,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn events(&self) -> &SceneEventManager {
        &self.events
    }

    /// Register or remove listeners.
    pub fn events_mut(&mut self) -> &mut SceneEventManager {
        &mut self.events
    }

    pub fn tool(&self) -> Option<&TransformationTool> {
        self.tool.as_ref()
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom()
    }

    /// Cursor hint for the host, recomputed on every pointer move.
    pub fn cursor(&self) -> Option<CursorIcon> {
        self.cursor
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Feed one raw input event through the interaction manager.
    pub fn handle_input<C: PointerCapture + ?Sized>(&mut self, input: RawInput, capture: &mut C) -> bool {
        let mut interaction = self.interaction.clone();
        let handled = interaction.dispatch(input, self, capture);
        self.interaction = interaction;
        handled
    }

    /// Replace the scene with new records.
    ///
    /// Hover and selection survive for ids that still exist. If the selected
    /// element is gone, the tool and any drag on it are dropped silently.
    pub fn on_elements_change(&mut self, configs: &[ElementConfig]) {
        self.scene.replace(configs);

        if let Some(id) = self.hovered {
            match self.scene.get_mut(id) {
                Some(element) => element.set_hovered(true),
                None => self.hovered = None,
            }
        }

        match self.selected.and_then(|id| self.scene.get_mut(id)) {
            Some(element) => {
                element.set_selected(true);
                let keep = self
                    .tool
                    .as_ref()
                    .is_some_and(|tool| tool.element_id() == element.id());
                if keep {
                    if let Some(tool) = self.tool.as_mut() {
                        tool.update_handles(element, &self.camera);
                    }
                } else {
                    self.tool = Some(TransformationTool::new(element, &self.camera));
                }
            }
            None => {
                if let Some(id) = self.selected.take() {
                    log::debug!("Selected element {} removed from scene", id);
                }
                self.tool = None;
            }
        }

        self.refresh_cursor();
        self.render();
    }

    /// Replace the scene from a JSON array of records. On error the current
    /// scene is left untouched.
    pub fn on_elements_json(&mut self, json: &str) -> EditorResult<()> {
        let configs = ElementConfig::parse_collection(json).inspect_err(|e| {
            log::warn!("Rejected scene update: {}", e);
        })?;
        self.on_elements_change(&configs);
        Ok(())
    }

    /// Host-driven hover. No event is published.
    pub fn set_hovered(&mut self, id: Option<ElementId>) {
        self.apply_hover(id);
        self.render();
    }

    /// Host-driven selection. No event is published.
    pub fn set_selected(&mut self, id: Option<ElementId>) {
        self.apply_selection(id);
        self.refresh_cursor();
        self.render();
    }

    /// Set the zoom from the UI, bypassing the zoom bounds.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.render();
    }

    pub fn set_artboard(&mut self, artboard: Option<Size>) {
        self.artboard = artboard;
        self.render();
    }

    /// The host finished loading an image.
    pub fn on_image_loaded(&mut self, id: ElementId) {
        if self.scene.mark_image_loaded(id) {
            self.render();
        }
    }

    /// Queue a content-rect change; applied by [`Self::tick`] after the debounce.
    pub fn on_resize(&mut self, content: Size, now: Instant) {
        self.viewport.on_content_resize(content, now);
    }

    /// Apply a due resize. Returns the new size if one was applied.
    pub fn tick(&mut self, now: Instant) -> Option<SurfaceSize> {
        let size = self.viewport.poll_resize(now)?;
        self.surface.resize(size.pixel_width, size.pixel_height);
        self.render();
        Some(size)
    }

    /// Draw one frame.
    pub fn render(&mut self) {
        let surface = &mut self.surface;
        surface.reset_transform();
        surface.clear();

        surface.save();
        self.viewport.apply_transform(surface);
        surface.transform(self.camera.matrix());
        if let Some(artboard) = self.artboard {
            surface.fill_rect(artboard.to_rect(), ARTBOARD_COLOR);
        }
        self.scene.draw(surface);
        surface.restore();

        if let Some(tool) = self.tool.as_mut() {
            if let Some(element) = self.scene.get(tool.element_id()) {
                tool.draw(surface, element, &self.camera, self.viewport.scale());
            }
        }

        self.frames += 1;
    }

    fn apply_hover(&mut self, id: Option<ElementId>) -> bool {
        let id = id.filter(|id| self.scene.contains(*id));
        if id == self.hovered {
            return false;
        }
        if let Some(previous) = self.hovered.and_then(|prev| self.scene.get_mut(prev)) {
            previous.set_hovered(false);
        }
        if let Some(element) = id.and_then(|id| self.scene.get_mut(id)) {
            element.set_hovered(true);
        }
        self.hovered = id;
        true
    }

    fn apply_selection(&mut self, id: Option<ElementId>) -> bool {
        let id = id.filter(|id| self.scene.contains(*id));
        if id == self.selected {
            return false;
        }
        if let Some(previous) = self.selected.and_then(|prev| self.scene.get_mut(prev)) {
            previous.set_selected(false);
        }
        self.tool = match id.and_then(|id| self.scene.get_mut(id)) {
            Some(element) => {
                element.set_selected(true);
                Some(TransformationTool::new(element, &self.camera))
            }
            None => None,
        };
        self.selected = id;
        true
    }

    fn refresh_cursor(&mut self) {
        self.cursor = self.tool.as_ref().and_then(TransformationTool::cursor);
    }

    /// Give the tool first refusal on a press. Returns whether it claimed it.
    fn tool_pointer_down(&mut self, screen: Point) -> bool {
        let Some(tool) = self.tool.as_mut() else {
            return false;
        };
        match self.scene.get(tool.element_id()) {
            Some(element) => tool.on_pointer_down(screen, element, &self.camera),
            None => false,
        }
    }
}

impl<S: Surface> InputHandler for Controller<S> {
    fn on_pointer_down(&mut self, position: Point) -> bool {
        if self.tool_pointer_down(position) {
            self.refresh_cursor();
            self.render();
            return true;
        }

        let world = self.camera.screen_to_world(position);
        match self.scene.hit_test(world) {
            Some(id) => {
                if self.apply_selection(Some(id)) {
                    self.events.notify(&SceneEvent::ElementSelect(Some(id)));
                }
                // The press that selects an element can also grab one of its handles.
                self.tool_pointer_down(position);
                self.refresh_cursor();
                self.render();
                true
            }
            None => {
                self.camera.begin_panning(position);
                self.render();
                false
            }
        }
    }

    fn on_pointer_up(&mut self) {
        if let Some(tool) = self.tool.as_mut() {
            if tool.on_pointer_up() {
                if let Some(element) = self.scene.get(tool.element_id()) {
                    log::debug!("Element {} transformed", element.id());
                    self.events
                        .notify(&SceneEvent::ElementTransform(element.to_config()));
                }
            }
        }
        self.camera.end_panning();
        self.refresh_cursor();
        self.render();
    }

    fn on_pointer_move(&mut self, position: Point) -> bool {
        if let Some(tool) = self.tool.as_mut().filter(|tool| tool.is_dragging()) {
            match self.scene.get_mut(tool.element_id()) {
                Some(element) => {
                    tool.on_pointer_move(position, element, &self.camera);
                    self.cursor = tool.cursor();
                    self.render();
                    return true;
                }
                None => {
                    self.tool = None;
                    self.cursor = None;
                }
            }
        }

        if self.camera.is_panning() {
            self.camera.pan_to(position);
            self.render();
            return true;
        }

        // Plain hover: handles and elements are both tracked.
        let mut changed = false;
        let mut on_handle = false;
        if let Some(tool) = self.tool.as_mut() {
            match self.scene.get_mut(tool.element_id()) {
                Some(element) => {
                    let before = tool.hovered_handle();
                    on_handle = tool.on_pointer_move(position, element, &self.camera);
                    changed = before != tool.hovered_handle();
                }
                None => self.tool = None,
            }
        }
        let cursor = self.tool.as_ref().and_then(TransformationTool::cursor);
        changed |= cursor != self.cursor;
        self.cursor = cursor;

        let world = self.camera.screen_to_world(position);
        let hit = self.scene.hit_test(world);
        if self.apply_hover(hit) {
            self.events.notify(&SceneEvent::ElementHover(hit));
            changed = true;
        }

        if changed {
            self.render();
        }
        on_handle || hit.is_some()
    }

    fn on_scroll(&mut self, zoom_delta: f64, position: Point) -> bool {
        self.camera.adjust_zoom_with_bounds(zoom_delta, position);
        self.events.notify(&SceneEvent::ZoomChange(self.camera.zoom()));
        self.render();
        true
    }
}

impl<S: Surface> std::fmt::Debug for Controller<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("camera", &self.camera)
            .field("elements", &self.scene.len())
            .field("hovered", &self.hovered)
            .field("selected", &self.selected)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
