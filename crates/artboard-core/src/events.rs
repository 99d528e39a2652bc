//! Typed publish/subscribe hub for editor notifications.

use crate::shapes::{ElementConfig, ElementId};
use std::collections::HashMap;
use std::fmt;

/// Notification published to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The element under the pointer changed.
    ElementHover(Option<ElementId>),
    /// The selection changed through a pointer press.
    ElementSelect(Option<ElementId>),
    /// A drag on the selected element finished with changes.
    ElementTransform(ElementConfig),
    /// The zoom level changed through the wheel.
    ZoomChange(f64),
}

/// Discriminant of [`SceneEvent`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneEventKind {
    ElementHover,
    ElementSelect,
    ElementTransform,
    ZoomChange,
}

impl SceneEvent {
    pub fn kind(&self) -> SceneEventKind {
        match self {
            SceneEvent::ElementHover(_) => SceneEventKind::ElementHover,
            SceneEvent::ElementSelect(_) => SceneEventKind::ElementSelect,
            SceneEvent::ElementTransform(_) => SceneEventKind::ElementTransform,
            SceneEvent::ZoomChange(_) => SceneEventKind::ZoomChange,
        }
    }
}

/// Handle returned on subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SceneEvent)>;

/// Dispatches [`SceneEvent`]s to listeners registered per kind.
///
/// Listeners run synchronously, in registration order.
#[derive(Default)]
pub struct SceneEventManager {
    next_id: u64,
    listeners: HashMap<SceneEventKind, Vec<(ListenerId, Listener)>>,
}

impl fmt::Debug for SceneEventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<SceneEventKind, usize> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (*kind, listeners.len()))
            .collect();
        f.debug_struct("SceneEventManager")
            .field("listeners", &counts)
            .finish()
    }
}

impl SceneEventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one kind of event.
    pub fn add_listener(
        &mut self,
        kind: SceneEventKind,
        listener: impl FnMut(&SceneEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        for listeners in self.listeners.values_mut() {
            if let Some(index) = listeners.iter().position(|(lid, _)| *lid == id) {
                drop(listeners.remove(index));
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self, kind: SceneEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to every listener of its kind.
    pub fn notify(&mut self, event: &SceneEvent) {
        log::trace!("Scene event {:?}", event);
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    pub fn on_hover(&mut self, mut f: impl FnMut(Option<ElementId>) + 'static) -> ListenerId {
        self.add_listener(SceneEventKind::ElementHover, move |event| {
            if let SceneEvent::ElementHover(id) = event {
                f(*id);
            }
        })
    }

    pub fn on_select(&mut self, mut f: impl FnMut(Option<ElementId>) + 'static) -> ListenerId {
        self.add_listener(SceneEventKind::ElementSelect, move |event| {
            if let SceneEvent::ElementSelect(id) = event {
                f(*id);
            }
        })
    }

    pub fn on_transform(&mut self, mut f: impl FnMut(&ElementConfig) + 'static) -> ListenerId {
        self.add_listener(SceneEventKind::ElementTransform, move |event| {
            if let SceneEvent::ElementTransform(config) = event {
                f(config);
            }
        })
    }

    pub fn on_zoom_change(&mut self, mut f: impl FnMut(f64) + 'static) -> ListenerId {
        self.add_listener(SceneEventKind::ZoomChange, move |event| {
            if let SceneEvent::ZoomChange(zoom) = event {
                f(*zoom);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_by_kind() {
        let mut events = SceneEventManager::new();
        let hovered = Rc::new(RefCell::new(Vec::new()));
        let zooms = Rc::new(RefCell::new(Vec::new()));

        let sink = hovered.clone();
        events.on_hover(move |id| sink.borrow_mut().push(id));
        let sink = zooms.clone();
        events.on_zoom_change(move |zoom| sink.borrow_mut().push(zoom));

        events.notify(&SceneEvent::ElementHover(Some(4)));
        events.notify(&SceneEvent::ElementHover(None));
        events.notify(&SceneEvent::ZoomChange(2.5));
        events.notify(&SceneEvent::ElementSelect(Some(1)));

        assert_eq!(*hovered.borrow(), vec![Some(4), None]);
        assert_eq!(*zooms.borrow(), vec![2.5]);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut events = SceneEventManager::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let sink = order.clone();
            events.on_select(move |_| sink.borrow_mut().push(n));
        }
        events.notify(&SceneEvent::ElementSelect(None));
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_listener() {
        let mut events = SceneEventManager::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = events.add_listener(SceneEventKind::ZoomChange, move |_| *sink.borrow_mut() += 1);
        assert_eq!(events.listener_count(SceneEventKind::ZoomChange), 1);

        events.notify(&SceneEvent::ZoomChange(1.0));
        assert!(events.remove_listener(id));
        assert!(!events.remove_listener(id));
        events.notify(&SceneEvent::ZoomChange(1.0));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(events.listener_count(SceneEventKind::ZoomChange), 0);
    }
}
