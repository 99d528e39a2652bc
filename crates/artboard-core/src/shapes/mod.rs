//! Scene element definitions.

mod image;
mod rectangle;

pub use image::Image;
pub use rectangle::Rectangle;

use crate::error::{SceneError, SceneResult};
use crate::geometry::{element_transform, try_invert};
use crate::surface::Surface;
use kurbo::{Affine, Cap, Point, Rect, Stroke, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Unique identifier for scene elements.
pub type ElementId = u64;

/// Distance between an element's body and its hover/selection outline.
const OUTLINE_OFFSET: f64 = 2.0;
const HOVER_OUTLINE_COLOR: Color = Color::from_rgba8(0x60, 0xa5, 0xfa, 0xff);
const SELECTED_OUTLINE_COLOR: Color = Color::from_rgba8(0xff, 0xff, 0xff, 0xff);

/// Exchange record for a single element.
///
/// Field names follow the host's scene format (`zIndex`, `type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    pub id: ElementId,
    pub position: Point,
    pub size: Vec2,
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
    #[serde(rename = "zIndex")]
    pub z_index: i32,
    #[serde(flatten)]
    pub kind: ElementKindConfig,
}

/// Variant-specific fields of an element record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKindConfig {
    Rectangle { color: String },
    Image { source: String },
}

impl ElementKindConfig {
    /// Type tags accepted in element records.
    pub const TYPE_TAGS: [&'static str; 2] = ["rectangle", "image"];
}

impl ElementConfig {
    /// Parse a single record, reporting unknown type tags explicitly.
    pub fn from_value(value: serde_json::Value) -> SceneResult<Self> {
        match value.get("type") {
            None => return Err(SceneError::MissingType),
            Some(serde_json::Value::String(tag)) => {
                if !ElementKindConfig::TYPE_TAGS.contains(&tag.as_str()) {
                    return Err(SceneError::UnsupportedElementType(tag.clone()));
                }
            }
            Some(other) => return Err(SceneError::UnsupportedElementType(other.to_string())),
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse an ordered collection of records. Fails as a whole on the first bad record.
    pub fn parse_collection(json: &str) -> SceneResult<Vec<Self>> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        values.into_iter().map(Self::from_value).collect()
    }
}

/// Variant data of a live element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Rectangle(Rectangle),
    Image(Image),
}

impl ElementKind {
    fn from_config(config: &ElementKindConfig) -> Self {
        match config {
            ElementKindConfig::Rectangle { color } => ElementKind::Rectangle(Rectangle::new(color)),
            ElementKindConfig::Image { source } => ElementKind::Image(Image::new(source)),
        }
    }

    fn to_config(&self) -> ElementKindConfig {
        match self {
            ElementKind::Rectangle(r) => ElementKindConfig::Rectangle { color: r.color.clone() },
            ElementKind::Image(i) => ElementKindConfig::Image { source: i.source.clone() },
        }
    }

    fn paint<S: Surface + ?Sized>(&self, surface: &mut S, body: Rect) {
        match self {
            ElementKind::Rectangle(r) => r.paint(surface, body),
            ElementKind::Image(i) => i.paint(surface, body),
        }
    }
}

/// A positioned, scaled and rotated shape in the scene.
///
/// The world transform is cached; every setter that affects it clears the
/// cache and the next read recomputes it.
#[derive(Debug, Clone)]
pub struct SceneElement {
    id: ElementId,
    /// Center of the element in world coordinates.
    position: Point,
    /// Unscaled width and height.
    size: Vec2,
    scale: Vec2,
    /// Rotation in degrees around the center.
    rotation: f64,
    z_index: i32,
    selected: bool,
    hovered: bool,
    kind: ElementKind,
    cached_matrix: Cell<Option<Affine>>,
}

impl SceneElement {
    /// Instantiate an element from its exchange record.
    pub fn from_config(config: &ElementConfig) -> Self {
        Self {
            id: config.id,
            position: config.position,
            size: config.size,
            scale: config.scale,
            rotation: config.rotation,
            z_index: config.z_index,
            selected: false,
            hovered: false,
            kind: ElementKind::from_config(&config.kind),
            cached_matrix: Cell::new(None),
        }
    }

    /// Export the element as an exchange record.
    pub fn to_config(&self) -> ElementConfig {
        ElementConfig {
            id: self.id,
            position: self.position,
            size: self.size,
            scale: self.scale,
            rotation: self.rotation,
            z_index: self.z_index,
            kind: self.kind.to_config(),
        }
    }

    /// Element identifier.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Center in world coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the center. Clears the cached transform.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.cached_matrix.set(None);
    }

    /// Unscaled width and height.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Set the unscaled size. The transform does not depend on it.
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Per-axis scale factors.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Set the scale. Clears the cached transform.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.cached_matrix.set(None);
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set the rotation in degrees. Clears the cached transform.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.cached_matrix.set(None);
    }

    /// Paint order key.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Whether the selection outline is drawn.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Toggle the selection outline.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Whether the hover outline is drawn.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Toggle the hover outline.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Variant data.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Mutable variant data.
    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    /// Corners in local space (origin-centered, before the transform), in
    /// top-left, top-right, bottom-right, bottom-left order.
    pub fn local_corners(&self) -> [Point; 4] {
        let half = self.size / 2.0;
        [
            Point::new(-half.x, -half.y),
            Point::new(half.x, -half.y),
            Point::new(half.x, half.y),
            Point::new(-half.x, half.y),
        ]
    }

    /// The element body in local space.
    pub fn local_rect(&self) -> Rect {
        let half = self.size / 2.0;
        Rect::new(-half.x, -half.y, half.x, half.y)
    }

    /// Local-to-world transform.
    pub fn matrix(&self) -> Affine {
        if let Some(matrix) = self.cached_matrix.get() {
            return matrix;
        }
        let matrix = element_transform(self.position, self.rotation, self.scale);
        self.cached_matrix.set(Some(matrix));
        matrix
    }

    /// Whether a world point lies inside the element body (edges inclusive).
    pub fn contains(&self, world: Point) -> bool {
        let inverse = match try_invert(self.matrix()) {
            Ok(inverse) => inverse,
            Err(e) => {
                log::error!("Element {} has a singular transform: {}", self.id, e);
                return false;
            }
        };
        let local = inverse * world;
        let half = self.size / 2.0;
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }

    /// Paint the element with its transform applied; surface state is restored afterwards.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.save();
        surface.transform(self.matrix());

        let body = self.local_rect();
        self.kind.paint(surface, body);

        let outline = body.inflate(OUTLINE_OFFSET, OUTLINE_OFFSET);
        if self.selected {
            surface.stroke_rect(outline, &Stroke::new(2.0), SELECTED_OUTLINE_COLOR);
        } else if self.hovered {
            let dashed = Stroke::new(2.0)
                .with_caps(Cap::Round)
                .with_dashes(0.0, [10.0, 10.0]);
            surface.stroke_rect(outline, &dashed, HOVER_OUTLINE_COLOR);
        }

        surface.restore();
    }
}
