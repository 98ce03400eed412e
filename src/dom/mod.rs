//! In-memory element tree the pane engine reads and writes.
//!
//! `Document` stands in for the browser DOM: an arena of elements with
//! attributes, text, form state and an absolute-positioning style, plus a
//! listener table keyed by (target element, event kind). Listener payloads
//! are generic so gesture controllers and the window manager can each route
//! their own signals through the same table.

pub mod fade;
pub mod markup;

use std::collections::BTreeMap;

use crate::layout::rectangle::{Point, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Click,
    Input,
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

impl PointerKind {
    pub fn event_kind(self) -> EventKind {
        match self {
            PointerKind::Down => EventKind::PointerDown,
            PointerKind::Move => EventKind::PointerMove,
            PointerKind::Up => EventKind::PointerUp,
        }
    }
}

/// A pointer sample in container pixels. `target` overrides hit testing when
/// the host already knows which element was under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub point: Point,
    pub target: Option<ElementId>,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            point: Point::new(x, y),
            target: None,
        }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Absolute-positioning style. `top`/`left` are relative to the parent's
/// origin; an element only has a box when both `width` and `height` are set.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i32>,
    pub opacity: f64,
    pub display: Display,
    pub visibility: Visibility,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            top: None,
            left: None,
            width: None,
            height: None,
            z_index: None,
            opacity: 1.0,
            display: Display::Block,
            visibility: Visibility::Visible,
        }
    }
}

impl Style {
    /// Applies the subset of inline CSS the engine understands. Unknown
    /// declarations are ignored.
    pub fn apply_inline(&mut self, css: &str) {
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            match property.as_str() {
                "display" => {
                    self.display = if value.eq_ignore_ascii_case("none") {
                        Display::None
                    } else {
                        Display::Block
                    };
                }
                "visibility" => {
                    self.visibility = if value.eq_ignore_ascii_case("hidden") {
                        Visibility::Hidden
                    } else {
                        Visibility::Visible
                    };
                }
                "top" => self.top = parse_px(value),
                "left" => self.left = parse_px(value),
                "width" => self.width = parse_px(value),
                "height" => self.height = parse_px(value),
                "z-index" => self.z_index = value.parse().ok(),
                "opacity" => {
                    if let Ok(opacity) = value.parse::<f64>() {
                        self.opacity = opacity.clamp(0.0, 1.0);
                    }
                }
                _ => {}
            }
        }
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse::<f64>()
        .ok()
}

pub const TEXT_TAG: &str = "#text";
const ROOT_TAG: &str = "#document";

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    pub style: Style,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    fade_epoch: u64,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            style: Style::default(),
            parent: None,
            children: Vec::new(),
            fade_epoch: 0,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn dom_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Lowercased `type` attribute of an `<input>`.
    pub fn input_type(&self) -> Option<String> {
        (self.tag == "input").then(|| {
            self.attribute("type")
                .unwrap_or("text")
                .to_ascii_lowercase()
        })
    }

    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
struct ListenerEntry<L> {
    target: ElementId,
    kind: EventKind,
    payload: L,
}

#[derive(Debug, Clone)]
pub struct Document<L> {
    nodes: Vec<Option<Element>>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    listeners: BTreeMap<ListenerId, ListenerEntry<L>>,
    next_listener: u64,
}

impl<L> Default for Document<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Document<L> {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
            listeners: BTreeMap::new(),
            next_listener: 0,
        };
        doc.root = doc.alloc(Element::new(ROOT_TAG));
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    fn alloc(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Some(element));
        id
    }

    /// The document node itself. Document-level listeners live here and every
    /// bubbling path ends here.
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn head(&self) -> ElementId {
        self.head
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.alloc(Element::new(tag))
    }

    pub fn create_text(&mut self, text: &str) -> ElementId {
        let mut element = Element::new(TEXT_TAG);
        element.text = text.to_string();
        self.alloc(element)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    /// Refuses to create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_descendant(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
        true
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.get(id).and_then(|el| el.parent) else {
            return;
        };
        if let Some(el) = self.get_mut(parent) {
            el.children.retain(|c| *c != id);
        }
        if let Some(el) = self.get_mut(id) {
            el.parent = None;
        }
    }

    /// Removes `id` and its whole subtree, dropping every listener that
    /// targeted a removed node. Returns the removed ids in pre-order.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if !self.contains(id) || id == self.root {
            return Vec::new();
        }
        self.detach(id);
        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        for node in &removed {
            if let Some(slot) = self.nodes.get_mut(node.0) {
                *slot = None;
            }
        }
        self.listeners
            .retain(|_, entry| !removed.contains(&entry.target));
        removed
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .get(id)
            .map(|el| el.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(el) = self.get(next) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// `node` itself or any node below `ancestor`.
    pub fn is_descendant(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|el| el.parent);
        }
        false
    }

    /// Bubbling path from `id` up to the document node.
    pub fn ancestors_inclusive(&self, id: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cursor = self.contains(id).then_some(id);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.get(current).and_then(|el| el.parent);
        }
        path
    }

    /// First connected element whose `id` attribute equals `dom_id`.
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        self.find_by_dom_id_in(self.root, dom_id)
    }

    /// Like [`Document::find_by_dom_id`] but limited to `scope` and below,
    /// which also works for subtrees not yet attached.
    pub fn find_by_dom_id_in(&self, scope: ElementId, dom_id: &str) -> Option<ElementId> {
        std::iter::once(scope)
            .chain(self.descendants(scope))
            .find(|id| self.get(*id).and_then(Element::dom_id) == Some(dom_id))
    }

    /// `scope` and its descendants carrying attribute `name`.
    pub fn query_attribute(&self, scope: ElementId, name: &str) -> Vec<ElementId> {
        std::iter::once(scope)
            .chain(self.descendants(scope))
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|el| el.attribute(name).is_some())
            })
            .collect()
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?.attribute(name)
    }

    /// Sets an attribute. `style`, `value` and `checked` also update the
    /// live element state, mirroring how markup initializes a node.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "style" => el.style.apply_inline(value),
            "value" => el.value = value.to_string(),
            "checked" => el.checked = true,
            _ => {}
        }
        el.attributes.insert(name, value.to_string());
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.remove(name);
        }
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        if el.has_class(class) {
            return;
        }
        let next = match el.attributes.get("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        el.attributes.insert("class".to_string(), next);
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        if let Some(existing) = el.attributes.get_mut("class") {
            *existing = existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    /// Concatenated text of every text node at or below `id`.
    pub fn text_content(&self, id: ElementId) -> String {
        let Some(el) = self.get(id) else {
            return String::new();
        };
        if el.is_text() {
            return el.text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).filter(|e| e.is_text()))
            .map(|e| e.text.as_str())
            .collect()
    }

    /// Replaces the children of `id` with a single text node.
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        if el.is_text() {
            el.text = text.to_string();
            return;
        }
        let children = el.children.clone();
        for child in children {
            self.remove(child);
        }
        let node = self.create_text(text);
        self.append_child(id, node);
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(el) = self.get_mut(id) {
            el.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(el) = self.get_mut(id) {
            el.checked = checked;
        }
    }

    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.get(id).map(|el| &el.style)
    }

    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut Style> {
        self.get_mut(id).map(|el| &mut el.style)
    }

    pub fn set_position(&mut self, id: ElementId, top: f64, left: f64) {
        if let Some(style) = self.style_mut(id) {
            style.top = Some(top);
            style.left = Some(left);
        }
    }

    pub fn set_size(&mut self, id: ElementId, width: f64, height: f64) {
        if let Some(style) = self.style_mut(id) {
            style.width = Some(width);
            style.height = Some(height);
        }
    }

    pub fn set_geometry(&mut self, id: ElementId, rect: Rectangle) {
        self.set_position(id, rect.top(), rect.left());
        self.set_size(id, rect.width(), rect.height());
    }

    pub fn set_z_index(&mut self, id: ElementId, z: i32) {
        if let Some(style) = self.style_mut(id) {
            style.z_index = Some(z);
        }
    }

    pub fn set_display(&mut self, id: ElementId, display: Display) {
        if let Some(style) = self.style_mut(id) {
            style.display = display;
        }
    }

    pub fn set_visibility(&mut self, id: ElementId, visibility: Visibility) {
        if let Some(style) = self.style_mut(id) {
            style.visibility = visibility;
        }
    }

    pub fn set_opacity(&mut self, id: ElementId, opacity: f64) {
        if let Some(style) = self.style_mut(id) {
            style.opacity = opacity;
        }
    }

    /// Geometry in the parent's coordinate space. Missing values read as 0.
    pub fn local_rect(&self, id: ElementId) -> Option<Rectangle> {
        let style = self.style(id)?;
        Some(Rectangle::from_origin(
            style.left.unwrap_or(0.0),
            style.top.unwrap_or(0.0),
            style.width.unwrap_or(0.0),
            style.height.unwrap_or(0.0),
        ))
    }

    /// Absolute origin: the sum of `left`/`top` offsets up the ancestor chain.
    pub fn absolute_origin(&self, id: ElementId) -> Option<Point> {
        self.get(id)?;
        let mut origin = Point::ORIGIN;
        for node in self.ancestors_inclusive(id) {
            if let Some(style) = self.style(node) {
                origin = origin.offset(style.left.unwrap_or(0.0), style.top.unwrap_or(0.0));
            }
        }
        Some(origin)
    }

    /// Page-space box, only for elements with an explicit size.
    pub fn bounding_rect(&self, id: ElementId) -> Option<Rectangle> {
        let style = self.style(id)?;
        let (width, height) = (style.width?, style.height?);
        let origin = self.absolute_origin(id)?;
        Some(Rectangle::from_origin(origin.x, origin.y, width, height))
    }

    /// The element and every ancestor are displayed and visible.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let path = self.ancestors_inclusive(id);
        !path.is_empty()
            && path.iter().all(|node| {
                self.style(*node).is_some_and(|s| {
                    s.display == Display::Block && s.visibility == Visibility::Visible
                })
            })
    }

    pub fn bump_fade_epoch(&mut self, id: ElementId) -> Option<u64> {
        let el = self.get_mut(id)?;
        el.fade_epoch = el.fade_epoch.wrapping_add(1);
        Some(el.fade_epoch)
    }

    pub fn fade_epoch(&self, id: ElementId) -> Option<u64> {
        self.get(id).map(|el| el.fade_epoch)
    }

    /// Rendered, boxed elements under `body` in paint order. Siblings paint
    /// by ascending z-index, ties in document order; hidden subtrees are
    /// skipped.
    pub fn paint_order(&self) -> Vec<(ElementId, Rectangle)> {
        let mut out = Vec::new();
        self.collect_painted(self.body, Point::ORIGIN, &mut out);
        out
    }

    fn collect_painted(&self, id: ElementId, parent_origin: Point, out: &mut Vec<(ElementId, Rectangle)>) {
        let Some(el) = self.get(id) else {
            return;
        };
        if el.is_text()
            || el.style.display == Display::None
            || el.style.visibility == Visibility::Hidden
        {
            return;
        }
        let origin = parent_origin.offset(
            el.style.left.unwrap_or(0.0),
            el.style.top.unwrap_or(0.0),
        );
        if let (Some(width), Some(height)) = (el.style.width, el.style.height) {
            out.push((id, Rectangle::from_origin(origin.x, origin.y, width, height)));
        }
        let mut children = el.children.clone();
        children.sort_by_key(|child| {
            self.style(*child)
                .and_then(|s| s.z_index)
                .unwrap_or(0)
        });
        for child in children {
            self.collect_painted(child, origin, out);
        }
    }

    /// Topmost rendered element whose box contains `point`.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|(_, rect)| rect.contains_point(point))
            .map(|(id, _)| id)
    }

    pub fn add_listener(&mut self, target: ElementId, kind: EventKind, payload: L) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(
            id,
            ListenerEntry {
                target,
                kind,
                payload,
            },
        );
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners attached to `target` for `kind`, in registration order.
    pub fn listeners_for(&self, target: ElementId, kind: EventKind) -> Vec<(ListenerId, L)>
    where
        L: Clone,
    {
        self.listeners
            .iter()
            .filter(|(_, entry)| entry.target == target && entry.kind == kind)
            .map(|(id, entry)| (*id, entry.payload.clone()))
            .collect()
    }
}
