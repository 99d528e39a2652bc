//! Artboard Core Library
//!
//! Platform-agnostic geometry and interaction core for the Artboard scene editor:
//! camera, scene graph, transformation tool, input normalization and the
//! controller that ties them to a drawing surface.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod tool;
pub mod viewport;

pub use camera::Camera;
pub use config::{EditorConfig, WheelScaling};
pub use controller::Controller;
pub use error::{EditorError, EditorResult, SceneError, SceneResult};
pub use events::{ListenerId, SceneEvent, SceneEventKind, SceneEventManager};
pub use geometry::GeometryError;
pub use input::{InputHandler, InteractionManager, PointerCapture, RawInput, WheelDelta, WheelDeltaMode};
pub use scene::SceneGraph;
pub use shapes::{ElementConfig, ElementId, ElementKind, ElementKindConfig, SceneElement};
pub use surface::{DisplayList, DrawCommand, Surface};
pub use tool::{CursorIcon, Handle, HandleKind, ToolState, TransformationTool};
pub use viewport::{ResizeDebouncer, SurfaceSize, Viewport};
