use super::{GestureEvent, GesturePhase, GestureSignal, Point, Rectangle};
use crate::constants::RESIZE_HANDLE_SIZE;
use crate::dom::{Display, Document, ElementId, EventKind, ListenerId, Visibility};
use crate::error::GestureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResizeEdge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Top,
        ResizeEdge::Bottom,
        ResizeEdge::Right,
        ResizeEdge::Left,
        ResizeEdge::TopLeft,
        ResizeEdge::TopRight,
        ResizeEdge::BottomLeft,
        ResizeEdge::BottomRight,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "n" => ResizeEdge::Top,
            "s" => ResizeEdge::Bottom,
            "e" => ResizeEdge::Right,
            "w" => ResizeEdge::Left,
            "nw" => ResizeEdge::TopLeft,
            "ne" => ResizeEdge::TopRight,
            "sw" => ResizeEdge::BottomLeft,
            "se" => ResizeEdge::BottomRight,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ResizeEdge::Top => "n",
            ResizeEdge::Bottom => "s",
            ResizeEdge::Right => "e",
            ResizeEdge::Left => "w",
            ResizeEdge::TopLeft => "nw",
            ResizeEdge::TopRight => "ne",
            ResizeEdge::BottomLeft => "sw",
            ResizeEdge::BottomRight => "se",
        }
    }

    /// Parses a comma separated handle list such as `"n,s,e,w"`. Unknown
    /// names are logged and skipped.
    pub fn parse_list(list: &str) -> Vec<Self> {
        let mut edges = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match Self::from_name(name) {
                Some(edge) if !edges.contains(&edge) => edges.push(edge),
                Some(_) => {}
                None => tracing::warn!(handle = %name, "unknown resize handle"),
            }
        }
        edges
    }

    pub fn moves_top(self) -> bool {
        matches!(self, ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeLimits {
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

impl ResizeLimits {
    pub fn min(width: f64, height: f64) -> Self {
        Self {
            min_width: Some(width),
            min_height: Some(height),
            ..Self::default()
        }
    }

    /// The size a side may take, or `None` when the limit would have to grow
    /// an element already below its minimum.
    fn clamp(length: f64, before: f64, min: Option<f64>, max: Option<f64>) -> Option<f64> {
        if let Some(min) = min
            && length < min
        {
            return (before >= min).then_some(min);
        }
        if let Some(max) = max
            && length > max
        {
            return (before <= max).then_some(max);
        }
        Some(length)
    }
}

#[derive(Debug, Clone)]
pub struct ResizeOptions {
    pub edges: Vec<ResizeEdge>,
    pub handle_size: f64,
    pub z_index: Option<i32>,
    pub limits: ResizeLimits,
    pub bounds: Option<Rectangle>,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            edges: vec![ResizeEdge::BottomLeft],
            handle_size: RESIZE_HANDLE_SIZE,
            z_index: None,
            limits: ResizeLimits::default(),
            bounds: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Handle {
    edge: ResizeEdge,
    element: ElementId,
}

#[derive(Debug, Clone)]
pub struct ResizeController<K> {
    owner: K,
    element: ElementId,
    handles: Vec<Handle>,
    handle_size: f64,
    limits: ResizeLimits,
    bounds: Option<Rectangle>,
    release_listener: Option<ListenerId>,
    track_listener: Option<ListenerId>,
    active: Option<ResizeEdge>,
    last_pointer: Point,
}

impl<K: Copy> ResizeController<K> {
    pub fn attach<L>(
        doc: &mut Document<L>,
        owner: K,
        element: ElementId,
        options: ResizeOptions,
    ) -> Result<Self, GestureError>
    where
        L: From<GestureSignal<K>>,
    {
        let parent = doc
            .get(element)
            .and_then(|el| el.parent())
            .ok_or(GestureError::MissingElement(element))?;

        let mut handles = Vec::new();
        for edge in options.edges {
            if handles.iter().any(|h: &Handle| h.edge == edge) {
                continue;
            }
            let handle = doc.create_element("div");
            doc.set_attribute(handle, "class", &format!("resize-handle resize-{}", edge.name()));
            doc.set_attribute(handle, "data-resize-edge", edge.name());
            doc.append_child(parent, handle);
            if let Some(z) = options.z_index {
                doc.set_z_index(handle, z);
            }
            doc.add_listener(
                handle,
                EventKind::PointerDown,
                GestureSignal::new(owner, GesturePhase::ResizeGrab(edge)).into(),
            );
            handles.push(Handle {
                edge,
                element: handle,
            });
        }
        let release_listener = doc.add_listener(
            doc.root(),
            EventKind::PointerUp,
            GestureSignal::new(owner, GesturePhase::ResizeRelease).into(),
        );

        let controller = Self {
            owner,
            element,
            handles,
            handle_size: options.handle_size,
            limits: options.limits,
            bounds: options.bounds.filter(Rectangle::is_good),
            release_listener: Some(release_listener),
            track_listener: None,
            active: None,
            last_pointer: Point::ORIGIN,
        };
        controller.place_handles(doc);
        Ok(controller)
    }

    pub fn owner(&self) -> K {
        self.owner
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn edges(&self) -> Vec<ResizeEdge> {
        self.handles.iter().map(|h| h.edge).collect()
    }

    pub fn handle_element(&self, edge: ResizeEdge) -> Option<ElementId> {
        self.handles
            .iter()
            .find(|h| h.edge == edge)
            .map(|h| h.element)
    }

    pub fn active_edge(&self) -> Option<ResizeEdge> {
        self.active
    }

    pub fn limits(&self) -> ResizeLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: ResizeLimits) {
        self.limits = limits;
    }

    pub fn bounds(&self) -> Option<Rectangle> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Option<Rectangle>) {
        self.bounds = bounds.filter(Rectangle::is_good);
    }

    pub fn set_z_index<L>(&self, doc: &mut Document<L>, z: i32) {
        for handle in &self.handles {
            doc.set_z_index(handle.element, z);
        }
    }

    pub fn set_handles_visible<L>(&self, doc: &mut Document<L>, visible: bool) {
        let display = if visible { Display::Block } else { Display::None };
        for handle in &self.handles {
            doc.set_display(handle.element, display);
        }
    }

    /// Lays every handle along the element's current box. Handles are hidden
    /// while the element itself is hidden.
    pub fn place_handles<L>(&self, doc: &mut Document<L>) {
        let Some(rect) = doc.local_rect(self.element) else {
            return;
        };
        let shown = doc.style(self.element).is_some_and(|s| {
            s.display == Display::Block && s.visibility == Visibility::Visible
        });
        let size = self.handle_size;
        let buffer = size + size;
        for handle in &self.handles {
            let (left, top, width, height) = match handle.edge {
                ResizeEdge::Top => (rect.left() + size, rect.top(), rect.width() - buffer, size),
                ResizeEdge::Bottom => (
                    rect.left() + size,
                    rect.bottom() - size,
                    rect.width() - buffer,
                    size,
                ),
                ResizeEdge::Right => (
                    rect.right() - size,
                    rect.top() + size,
                    size,
                    rect.height() - buffer,
                ),
                ResizeEdge::Left => (rect.left(), rect.top() + size, size, rect.height() - buffer),
                ResizeEdge::TopRight => (rect.right() - size, rect.top(), size, size),
                ResizeEdge::TopLeft => (rect.left(), rect.top(), size, size),
                ResizeEdge::BottomRight => (rect.right() - size, rect.bottom() - size, size, size),
                ResizeEdge::BottomLeft => (rect.left(), rect.bottom() - size, size, size),
            };
            doc.set_geometry(
                handle.element,
                Rectangle::from_origin(left, top, width.max(0.0), height.max(0.0)),
            );
            doc.set_display(
                handle.element,
                if shown { Display::Block } else { Display::None },
            );
        }
    }

    pub fn pointer_down<L>(
        &mut self,
        doc: &mut Document<L>,
        edge: ResizeEdge,
        pointer: Point,
    ) -> Option<GestureEvent>
    where
        L: From<GestureSignal<K>>,
    {
        if self.active.is_some()
            || !pointer.is_valid()
            || !self.handles.iter().any(|h| h.edge == edge)
        {
            return None;
        }
        let rect = doc.local_rect(self.element)?;
        self.active = Some(edge);
        self.last_pointer = pointer;
        self.track_listener = Some(doc.add_listener(
            doc.root(),
            EventKind::PointerMove,
            GestureSignal::new(self.owner, GesturePhase::ResizeTrack).into(),
        ));
        Some(GestureEvent::Started { rect })
    }

    /// Applies one move tick. Returns the resize event and, when the tick was
    /// constrained with the pointer already outside the element, the
    /// synthesized stop.
    pub fn pointer_move<L>(&mut self, doc: &mut Document<L>, pointer: Point) -> Vec<GestureEvent> {
        let Some(edge) = self.active else {
            return Vec::new();
        };
        let Some(rect) = doc.local_rect(self.element) else {
            return Vec::new();
        };
        if !pointer.is_valid() {
            return Vec::new();
        }
        let dx = pointer.x - self.last_pointer.x;
        let dy = pointer.y - self.last_pointer.y;
        self.last_pointer = pointer;

        let (top, bottom, vertical_ok) = resolve_axis(
            (rect.top(), rect.bottom()),
            dy,
            (edge.moves_top(), edge.moves_bottom()),
            (self.limits.min_height, self.limits.max_height),
            self.bounds.map(|b| (b.top(), b.bottom())),
        );
        let (left, right, horizontal_ok) = resolve_axis(
            (rect.left(), rect.right()),
            dx,
            (edge.moves_left(), edge.moves_right()),
            (self.limits.min_width, self.limits.max_width),
            self.bounds.map(|b| (b.left(), b.right())),
        );

        let next = Rectangle::new(top, left, bottom, right);
        if next != rect {
            doc.set_geometry(self.element, next);
        }
        self.place_handles(doc);

        let mut events = vec![GestureEvent::Resized { rect: next, edge }];
        if !(vertical_ok && horizontal_ok) {
            let inside = doc
                .bounding_rect(self.element)
                .is_some_and(|r| r.contains_point(pointer));
            if !inside && let Some(stop) = self.pointer_up(doc) {
                events.push(stop);
            }
        }
        events
    }

    pub fn pointer_up<L>(&mut self, doc: &mut Document<L>) -> Option<GestureEvent> {
        self.active.take()?;
        if let Some(track) = self.track_listener.take() {
            doc.remove_listener(track);
        }
        self.place_handles(doc);
        let rect = doc.local_rect(self.element)?;
        Some(GestureEvent::Stopped { rect })
    }

    /// Deletes the handle elements and detaches every listener.
    pub fn remove<L>(&mut self, doc: &mut Document<L>) {
        for handle in self.handles.drain(..) {
            doc.remove(handle.element);
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

/// Moves the owned sides of one axis by `delta`. Returns the new
/// `(start, end)` and whether the move went through unconstrained.
fn resolve_axis(
    (start, end): (f64, f64),
    delta: f64,
    (moves_start, moves_end): (bool, bool),
    (min, max): (Option<f64>, Option<f64>),
    bounds: Option<(f64, f64)>,
) -> (f64, f64, bool) {
    if !moves_start && !moves_end {
        return (start, end, true);
    }
    let mut next_start = if moves_start { start + delta } else { start };
    let mut next_end = if moves_end { end + delta } else { end };
    let mut free = true;

    let length = next_end - next_start;
    match ResizeLimits::clamp(length, end - start, min, max) {
        Some(clamped) if clamped == length => {}
        Some(clamped) => {
            free = false;
            if moves_start {
                next_start = next_end - clamped;
            } else {
                next_end = next_start + clamped;
            }
        }
        None => return (start, end, false),
    }

    if let Some((low, high)) = bounds
        && ((moves_start && next_start < low) || (moves_end && next_end > high))
    {
        return (start, end, false);
    }
    (next_start, next_end, free)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Doc = Document<GestureSignal<u8>>;

    fn setup(rect: Rectangle, options: ResizeOptions) -> (Doc, ElementId, ResizeController<u8>) {
        let mut doc = Doc::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);
        doc.set_geometry(el, rect);
        let resize = ResizeController::attach(&mut doc, 7, el, options).unwrap_or_else(|e| panic!("{e}"));
        (doc, el, resize)
    }

    fn all_edges() -> ResizeOptions {
        ResizeOptions {
            edges: ResizeEdge::ALL.to_vec(),
            ..ResizeOptions::default()
        }
    }

    #[test]
    fn parse_list_skips_unknown_and_duplicates() {
        assert_eq!(
            ResizeEdge::parse_list("n, se,x,n"),
            vec![ResizeEdge::Top, ResizeEdge::BottomRight]
        );
    }

    #[test]
    fn corner_moves_exactly_its_two_sides() {
        let (mut doc, el, mut resize) = setup(Rectangle::from_origin(100.0, 100.0, 200.0, 150.0), all_edges());
        resize.pointer_down(&mut doc, ResizeEdge::TopRight, Point::new(300.0, 100.0));
        resize.pointer_move(&mut doc, Point::new(320.0, 90.0));
        assert_eq!(doc.local_rect(el), Some(Rectangle::new(90.0, 100.0, 250.0, 320.0)));
    }

    #[test]
    fn west_handle_clamps_at_min_width() {
        let options = ResizeOptions {
            edges: vec![ResizeEdge::Left],
            limits: ResizeLimits::min(100.0, 50.0),
            ..ResizeOptions::default()
        };
        let (mut doc, el, mut resize) = setup(Rectangle::from_origin(0.0, 0.0, 120.0, 100.0), options);
        resize.pointer_down(&mut doc, ResizeEdge::Left, Point::new(0.0, 50.0));
        resize.pointer_move(&mut doc, Point::new(15.0, 50.0));
        assert_eq!(doc.local_rect(el).map(|r| r.width()), Some(105.0));
        resize.pointer_move(&mut doc, Point::new(30.0, 50.0));
        let rect = doc.local_rect(el).unwrap_or_default();
        assert_eq!((rect.left(), rect.width()), (20.0, 100.0));
        resize.pointer_move(&mut doc, Point::new(40.0, 50.0));
        let rect = doc.local_rect(el).unwrap_or_default();
        assert_eq!((rect.left(), rect.width()), (20.0, 100.0));
    }

    #[test]
    fn bounds_crossing_rejects_the_axis_and_stops_outside_pointer() {
        let options = ResizeOptions {
            edges: vec![ResizeEdge::BottomRight],
            bounds: Some(Rectangle::new(0.0, 0.0, 200.0, 200.0)),
            ..ResizeOptions::default()
        };
        let (mut doc, el, mut resize) = setup(Rectangle::from_origin(0.0, 0.0, 100.0, 100.0), options);
        resize.pointer_down(&mut doc, ResizeEdge::BottomRight, Point::new(100.0, 100.0));
        let events = resize.pointer_move(&mut doc, Point::new(250.0, 150.0));
        assert_eq!(doc.local_rect(el), Some(Rectangle::new(0.0, 0.0, 150.0, 100.0)));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], GestureEvent::Stopped { .. }));
        assert_eq!(resize.active_edge(), None);
    }

    #[test]
    fn handles_follow_the_element() {
        let (mut doc, el, resize) = setup(Rectangle::from_origin(10.0, 10.0, 100.0, 50.0), all_edges());
        let se = resize.handle_element(ResizeEdge::BottomRight).unwrap_or_else(|| panic!("no handle"));
        assert_eq!(doc.local_rect(se), Some(Rectangle::from_origin(105.0, 55.0, 5.0, 5.0)));
        doc.set_geometry(el, Rectangle::from_origin(0.0, 0.0, 40.0, 40.0));
        resize.place_handles(&mut doc);
        assert_eq!(doc.local_rect(se), Some(Rectangle::from_origin(35.0, 35.0, 5.0, 5.0)));
        let n = resize.handle_element(ResizeEdge::Top).unwrap_or_else(|| panic!("no handle"));
        assert_eq!(doc.local_rect(n).map(|r| r.width()), Some(30.0));
    }

    #[test]
    fn remove_deletes_handles_and_listeners() {
        let mut doc = Doc::new();
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el);
        doc.set_geometry(el, Rectangle::from_origin(0.0, 0.0, 50.0, 50.0));
        let baseline = doc.listener_count();
        let mut resize = ResizeController::attach(&mut doc, 7, el, all_edges()).unwrap_or_else(|e| panic!("{e}"));
        let handle = resize.handle_element(ResizeEdge::Left).unwrap_or_else(|| panic!("no handle"));
        assert_eq!(doc.listener_count(), baseline + 9);
        resize.remove(&mut doc);
        assert_eq!(doc.listener_count(), baseline);
        assert!(!doc.contains(handle));
    }
}
