//! Scene graph: a flat, id-keyed collection of elements.

use crate::error::SceneResult;
use crate::shapes::{ElementConfig, ElementId, ElementKind, SceneElement};
use crate::surface::Surface;
use kurbo::Point;
use std::collections::HashMap;

/// All elements of the scene, keyed by id.
///
/// The graph is replaced wholesale whenever the host reports a new scene.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    elements: HashMap<ElementId, SceneElement>,
}

impl SceneGraph {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from exchange records.
    pub fn from_configs(configs: &[ElementConfig]) -> Self {
        let mut scene = Self::new();
        scene.replace(configs);
        scene
    }

    /// Build a scene from a JSON array of records. Nothing is built if any
    /// record is rejected.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let configs = ElementConfig::parse_collection(json)?;
        Ok(Self::from_configs(&configs))
    }

    /// Discard every element and instantiate `configs` in their place.
    ///
    /// When two records share an id, the later one wins.
    pub fn replace(&mut self, configs: &[ElementConfig]) {
        self.elements.clear();
        for config in configs {
            let element = SceneElement::from_config(config);
            if self.elements.insert(config.id, element).is_some() {
                log::warn!("Duplicate element id {} in scene, keeping the last record", config.id);
            }
        }
        log::debug!("Rebuilt scene with {} elements", self.elements.len());
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut SceneElement> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.elements.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Elements back to front: ascending z-index, ties by ascending id.
    pub fn paint_order(&self) -> Vec<&SceneElement> {
        let mut ordered: Vec<&SceneElement> = self.elements.values().collect();
        ordered.sort_by_key(|e| (e.z_index(), e.id()));
        ordered
    }

    /// Elements front to back, the exact reverse of [`Self::paint_order`].
    pub fn hit_order(&self) -> Vec<&SceneElement> {
        let mut ordered = self.paint_order();
        ordered.reverse();
        ordered
    }

    /// Topmost element containing the world point.
    pub fn hit_test(&self, world: Point) -> Option<ElementId> {
        self.hit_order()
            .into_iter()
            .find(|element| element.contains(world))
            .map(SceneElement::id)
    }

    /// Paint every element back to front.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for element in self.paint_order() {
            element.draw(surface);
        }
    }

    /// Flag an image element as loaded. Returns whether anything changed.
    pub fn mark_image_loaded(&mut self, id: ElementId) -> bool {
        match self.elements.get_mut(&id).map(SceneElement::kind_mut) {
            Some(ElementKind::Image(image)) if !image.loaded => {
                image.loaded = true;
                true
            }
            Some(ElementKind::Image(_)) => false,
            Some(_) => {
                log::warn!("Element {} is not an image", id);
                false
            }
            None => false,
        }
    }

    /// Export the scene as records in paint order.
    pub fn to_configs(&self) -> Vec<ElementConfig> {
        self.paint_order()
            .into_iter()
            .map(SceneElement::to_config)
            .collect()
    }
}
