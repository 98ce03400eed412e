use super::{GestureEvent, GesturePhase, GestureSignal, Point, Rectangle};
use crate::dom::{Document, ElementId, EventKind, ListenerId};
use crate::error::GestureError;

#[derive(Debug, Clone, Default)]
pub struct DragOptions {
    /// Elements that start a drag. Empty means the element itself.
    pub handles: Vec<ElementId>,
    /// Area the element's whole footprint must stay inside.
    pub bounds: Option<Rectangle>,
}

#[derive(Debug, Clone)]
pub struct DragController<K> {
    owner: K,
    element: ElementId,
    handles: Vec<ElementId>,
    bounds: Option<Rectangle>,
    grab_listeners: Vec<ListenerId>,
    release_listener: Option<ListenerId>,
    track_listener: Option<ListenerId>,
    active: Option<ElementId>,
    anchor: Point,
    last_pointer: Point,
}

impl<K: Copy> DragController<K> {
    pub fn attach<L>(
        doc: &mut Document<L>,
        owner: K,
        element: ElementId,
        options: DragOptions,
    ) -> Result<Self, GestureError>
    where
        L: From<GestureSignal<K>>,
    {
        if !doc.contains(element) {
            return Err(GestureError::MissingElement(element));
        }
        let handles: Vec<ElementId> = if options.handles.is_empty() {
            vec![element]
        } else {
            options
                .handles
                .iter()
                .copied()
                .filter(|h| doc.contains(*h))
                .collect()
        };
        if handles.is_empty() {
            return Err(GestureError::NoHandles);
        }

        let grab_listeners = handles
            .iter()
            .map(|handle| {
                doc.add_listener(
                    *handle,
                    EventKind::PointerDown,
                    GestureSignal::new(owner, GesturePhase::DragGrab).into(),
                )
            })
            .collect();
        let release_listener = doc.add_listener(
            doc.root(),
            EventKind::PointerUp,
            GestureSignal::new(owner, GesturePhase::DragRelease).into(),
        );

        Ok(Self {
            owner,
            element,
            handles,
            bounds: options.bounds.filter(Rectangle::is_good),
            grab_listeners,
            release_listener: Some(release_listener),
            track_listener: None,
            active: None,
            anchor: Point::ORIGIN,
            last_pointer: Point::ORIGIN,
        })
    }

    pub fn owner(&self) -> K {
        self.owner
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn handles(&self) -> &[ElementId] {
        &self.handles
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn bounds(&self) -> Option<Rectangle> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Option<Rectangle>) {
        self.bounds = bounds.filter(Rectangle::is_good);
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Starts a drag from `handle`. Ignored while another handle is active.
    pub fn pointer_down<L>(
        &mut self,
        doc: &mut Document<L>,
        handle: ElementId,
        pointer: Point,
    ) -> Option<GestureEvent>
    where
        L: From<GestureSignal<K>>,
    {
        if self.active.is_some() || !self.handles.contains(&handle) || !pointer.is_valid() {
            return None;
        }
        let rect = doc.local_rect(self.element)?;
        self.anchor = Point::new(rect.left() - pointer.x, rect.top() - pointer.y);
        self.last_pointer = pointer;
        self.active = Some(handle);
        self.track_listener = Some(doc.add_listener(
            doc.root(),
            EventKind::PointerMove,
            GestureSignal::new(self.owner, GesturePhase::DragTrack).into(),
        ));
        Some(GestureEvent::Started { rect })
    }

    pub fn pointer_move<L>(&mut self, doc: &mut Document<L>, pointer: Point) -> Option<GestureEvent> {
        self.active?;
        if !pointer.is_valid() {
            return None;
        }
        let rect = doc.local_rect(self.element)?;
        let (width, height) = (rect.width(), rect.height());
        let mut top = pointer.y + self.anchor.y;
        let mut left = pointer.x + self.anchor.x;
        if let Some(b) = self.bounds {
            top = b.top().max((b.bottom() - height).min(top));
            left = b.left().max((b.right() - width).min(left));
        }
        doc.set_position(self.element, top, left);
        self.last_pointer = pointer;
        Some(GestureEvent::Moved {
            rect: Rectangle::from_origin(left, top, width, height),
        })
    }

    pub fn pointer_up<L>(&mut self, doc: &mut Document<L>) -> Option<GestureEvent> {
        self.active.take()?;
        if let Some(track) = self.track_listener.take() {
            doc.remove_listener(track);
        }
        let rect = doc.local_rect(self.element)?;
        Some(GestureEvent::Stopped { rect })
    }

    /// Detaches every listener this controller added.
    pub fn remove<L>(&mut self, doc: &mut Document<L>) {
        for listener in self.grab_listeners.drain(..) {
            doc.remove_listener(listener);
        }
        for listener in [self.release_listener.take(), self.track_listener.take()]
            .into_iter()
            .flatten()
        {
            doc.remove_listener(listener);
        }
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Doc = Document<GestureSignal<u8>>;

    fn setup(rect: Rectangle) -> (Doc, ElementId, ElementId) {
        let mut doc = Doc::new();
        let el = doc.create_element("div");
        let handle = doc.create_element("div");
        doc.append_child(doc.body(), el);
        doc.append_child(el, handle);
        doc.set_geometry(el, rect);
        (doc, el, handle)
    }

    #[test]
    fn drag_follows_pointer_with_fixed_anchor() {
        let (mut doc, el, handle) = setup(Rectangle::from_origin(10.0, 20.0, 50.0, 40.0));
        let options = DragOptions {
            handles: vec![handle],
            bounds: None,
        };
        let mut drag = DragController::attach(&mut doc, 1, el, options).unwrap_or_else(|e| panic!("{e}"));
        assert!(drag.pointer_down(&mut doc, handle, Point::new(15.0, 25.0)).is_some());
        assert!(drag.pointer_down(&mut doc, handle, Point::new(15.0, 25.0)).is_none());

        let moved = drag.pointer_move(&mut doc, Point::new(35.0, 30.0));
        assert_eq!(moved.map(|e| e.rect()), Some(Rectangle::from_origin(30.0, 25.0, 50.0, 40.0)));
        drag.pointer_move(&mut doc, Point::new(45.0, 50.0));
        assert_eq!(doc.local_rect(el), Some(Rectangle::from_origin(40.0, 45.0, 50.0, 40.0)));

        assert!(matches!(drag.pointer_up(&mut doc), Some(GestureEvent::Stopped { .. })));
        assert!(drag.pointer_move(&mut doc, Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn drag_clamps_to_bounds() {
        let (mut doc, el, _) = setup(Rectangle::from_origin(0.0, 0.0, 200.0, 100.0));
        let options = DragOptions {
            handles: Vec::new(),
            bounds: Some(Rectangle::new(0.0, 0.0, 800.0, 1000.0)),
        };
        let mut drag = DragController::attach(&mut doc, 1, el, options).unwrap_or_else(|e| panic!("{e}"));
        drag.pointer_down(&mut doc, el, Point::new(0.0, 0.0));
        drag.pointer_move(&mut doc, Point::new(990.0, 10.0));
        let rect = doc.local_rect(el).unwrap_or_default();
        assert_eq!(rect.left(), 800.0);
        assert_eq!(rect.top(), 10.0);
        drag.pointer_move(&mut doc, Point::new(-50.0, 900.0));
        let rect = doc.local_rect(el).unwrap_or_default();
        assert_eq!((rect.left(), rect.top()), (0.0, 700.0));
    }

    #[test]
    fn remove_detaches_every_listener() {
        let (mut doc, el, handle) = setup(Rectangle::from_origin(0.0, 0.0, 10.0, 10.0));
        let baseline = doc.listener_count();
        let options = DragOptions {
            handles: vec![handle, el],
            bounds: None,
        };
        let mut drag = DragController::attach(&mut doc, 1, el, options).unwrap_or_else(|e| panic!("{e}"));
        drag.pointer_down(&mut doc, handle, Point::new(1.0, 1.0));
        assert_eq!(doc.listener_count(), baseline + 4);
        drag.remove(&mut doc);
        assert_eq!(doc.listener_count(), baseline);
    }

    #[test]
    fn missing_element_is_rejected() {
        let (mut doc, el, _) = setup(Rectangle::default());
        doc.remove(el);
        assert_eq!(
            DragController::<u8>::attach(&mut doc, 1, el, DragOptions::default()).err(),
            Some(GestureError::MissingElement(el))
        );
    }
}
