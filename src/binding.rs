//! Declarative data and click binding.
//!
//! Elements carrying `data-bind="a.b.c"` are linked to a path in the shared
//! [`DataStore`]. A link has a sink: text content, input value or checked
//! state. User edits flow into the store through the element's listener,
//! and programmatic writes through [`BindingLayer::set`] flow back out to
//! every link on the written path or below it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::constants::{DATA_BIND_ATTR, DATA_CLICK_ATTR};
use crate::dom::{Document, ElementId, EventKind, ListenerId};
use crate::handlers::ClickAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    TextContent,
    InputValue,
    Checked,
}

impl Sink {
    fn for_element<L>(doc: &Document<L>, element: ElementId) -> Self {
        let Some(el) = doc.get(element) else {
            return Sink::TextContent;
        };
        match el.input_type().as_deref() {
            Some("checkbox" | "radio") => Sink::Checked,
            Some(_) => Sink::InputValue,
            None if el.tag() == "textarea" => Sink::InputValue,
            None => Sink::TextContent,
        }
    }

    fn edit_event(self) -> Option<EventKind> {
        match self {
            Sink::TextContent => None,
            Sink::InputValue => Some(EventKind::Input),
            Sink::Checked => Some(EventKind::Change),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub element: ElementId,
    pub path: String,
    pub sink: Sink,
    pub listener: Option<ListenerId>,
}

/// JSON tree addressed by dot-separated paths.
#[derive(Debug, Clone, PartialEq)]
pub struct DataStore {
    root: Value,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl DataStore {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |node, key| node.as_object()?.get(key))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Writes `value` at `path`, creating intermediate objects. Fails when a
    /// segment on the way is a non-object value.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        let mut keys = path.split('.').peekable();
        let mut node = &mut self.root;
        while let Some(key) = keys.next() {
            let Some(object) = node.as_object_mut() else {
                return false;
            };
            if keys.peek().is_none() {
                object.insert(key.to_string(), value);
                return true;
            }
            node = object
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        false
    }
}

#[derive(Debug, Clone, Default)]
pub struct BindingLayer {
    store: DataStore,
    links: BTreeMap<LinkId, Link>,
    next: u64,
}

impl BindingLayer {
    pub fn new(data: Value) -> Self {
        Self {
            store: DataStore::new(data),
            links: BTreeMap::new(),
            next: 0,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.store.get(path)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Links every `data-bind` element at or below `scope` whose path exists
    /// in the store, writing the current value into it.
    pub fn scan_data_bindings<L>(&mut self, doc: &mut Document<L>, scope: ElementId) -> Vec<LinkId>
    where
        L: From<LinkId>,
    {
        let mut created = Vec::new();
        for element in doc.query_attribute(scope, DATA_BIND_ATTR) {
            let Some(path) = doc.attribute(element, DATA_BIND_ATTR).map(str::to_string) else {
                continue;
            };
            let Some(value) = self.store.get(&path).cloned() else {
                tracing::debug!(path = %path, "data binding path not present, skipped");
                continue;
            };
            self.next += 1;
            let id = LinkId(self.next);
            let sink = Sink::for_element(doc, element);
            write_sink(doc, element, sink, &value);
            let listener = sink
                .edit_event()
                .map(|kind| doc.add_listener(element, kind, L::from(id)));
            self.links.insert(
                id,
                Link {
                    element,
                    path,
                    sink,
                    listener,
                },
            );
            created.push(id);
        }
        created
    }

    /// Attaches a click listener to every `data-click` element at or below
    /// `scope`.
    pub fn scan_click_bindings<L>(
        &self,
        doc: &mut Document<L>,
        scope: ElementId,
        make: impl Fn(ClickAction) -> L,
    ) -> Vec<ListenerId> {
        let mut listeners = Vec::new();
        for element in doc.query_attribute(scope, DATA_CLICK_ATTR) {
            let Some(action) = doc
                .attribute(element, DATA_CLICK_ATTR)
                .and_then(ClickAction::parse)
            else {
                continue;
            };
            listeners.push(doc.add_listener(element, EventKind::Click, make(action)));
        }
        listeners
    }

    /// Pulls the edited element state of `link` into the store and pushes it
    /// to every other link on the same path. Returns the written path.
    pub fn handle_edit<L>(&mut self, doc: &mut Document<L>, link: LinkId) -> Option<String> {
        let Link {
            element,
            path,
            sink,
            ..
        } = self.links.get(&link)?.clone();
        let el = doc.get(element)?;
        let value = match sink {
            Sink::Checked => Value::Bool(el.checked()),
            Sink::InputValue => Value::String(el.value().to_string()),
            Sink::TextContent => Value::String(doc.text_content(element)),
        };
        self.store.set(&path, value);
        self.notify(doc, &path, Some(link));
        Some(path)
    }

    /// Programmatic write. Every link on `path` or below it is refreshed.
    pub fn set<L>(&mut self, doc: &mut Document<L>, path: &str, value: Value) -> bool {
        if !self.store.set(path, value) {
            tracing::warn!(path = %path, "data path crosses a non-object value");
            return false;
        }
        self.notify(doc, path, None);
        true
    }

    /// Swaps the whole tree and refreshes every link whose path still
    /// resolves.
    pub fn replace<L>(&mut self, doc: &mut Document<L>, data: Value) {
        self.store = DataStore::new(data);
        for link in self.links.values() {
            if let Some(value) = self.store.get(&link.path) {
                write_sink(doc, link.element, link.sink, value);
            }
        }
    }

    fn notify<L>(&self, doc: &mut Document<L>, path: &str, skip: Option<LinkId>) {
        let prefix = format!("{path}.");
        for (id, link) in &self.links {
            if Some(*id) == skip || !(link.path == path || link.path.starts_with(&prefix)) {
                continue;
            }
            if let Some(value) = self.store.get(&link.path) {
                write_sink(doc, link.element, link.sink, value);
            }
        }
    }

    /// Drops links whose element is gone. Their listeners went with the
    /// element.
    pub fn release(&mut self, removed: &[ElementId]) {
        self.links.retain(|_, link| !removed.contains(&link.element));
    }
}

fn write_sink<L>(doc: &mut Document<L>, element: ElementId, sink: Sink, value: &Value) {
    match sink {
        Sink::Checked => doc.set_checked(element, truthy(value)),
        Sink::InputValue => doc.set_value(element, &display(value)),
        Sink::TextContent => doc.set_text(element, &display(value)),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::markup::render_to_element;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Payload {
        Link(LinkId),
        Click(ClickAction),
    }

    impl From<LinkId> for Payload {
        fn from(id: LinkId) -> Self {
            Payload::Link(id)
        }
    }

    fn mount(doc: &mut Document<Payload>, markup: &str) -> ElementId {
        let root = render_to_element(doc, markup).unwrap_or_else(|e| panic!("{e}"));
        doc.append_child(doc.body(), root);
        root
    }

    #[test]
    fn store_paths_create_intermediate_objects() {
        let mut store = DataStore::default();
        assert!(store.set("user.name.first", json!("Jon")));
        assert_eq!(store.get("user.name.first"), Some(&json!("Jon")));
        assert!(!store.set("user.name.first.x", json!(1)));
        assert!(!store.contains("user.age"));
    }

    #[test]
    fn scan_writes_initial_values_and_skips_missing_paths() {
        let mut doc = Document::new();
        let root = mount(
            &mut doc,
            r#"<div><span data-bind="count"></span><input data-bind="name"><input type="checkbox" data-bind="on"><b data-bind="missing"></b></div>"#,
        );
        let mut layer = BindingLayer::new(json!({"count": 3, "name": "Ada", "on": true}));
        let links = layer.scan_data_bindings(&mut doc, root);
        assert_eq!(links.len(), 3);

        let els = doc.query_attribute(root, DATA_BIND_ATTR);
        assert_eq!(doc.text_content(els[0]), "3");
        assert_eq!(doc.get(els[1]).map(|e| e.value().to_string()), Some("Ada".into()));
        assert!(doc.get(els[2]).is_some_and(|e| e.checked()));
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn edits_propagate_to_store_and_sibling_links() {
        let mut doc = Document::new();
        let root = mount(
            &mut doc,
            r#"<div><input data-bind="user.name"><p data-bind="user.name"></p></div>"#,
        );
        let mut layer = BindingLayer::new(json!({"user": {"name": ""}}));
        let links = layer.scan_data_bindings(&mut doc, root);
        let input = layer.link(links[0]).map(|l| l.element).unwrap_or_else(|| panic!("no link"));

        doc.set_value(input, "Grace");
        assert_eq!(layer.handle_edit(&mut doc, links[0]), Some("user.name".to_string()));
        assert_eq!(layer.get("user.name"), Some(&json!("Grace")));
        let p = layer.link(links[1]).map(|l| l.element).unwrap_or_else(|| panic!("no link"));
        assert_eq!(doc.text_content(p), "Grace");
    }

    #[test]
    fn programmatic_set_reaches_nested_links() {
        let mut doc = Document::new();
        let root = mount(&mut doc, r#"<p data-bind="user.name"></p>"#);
        let mut layer = BindingLayer::new(json!({"user": {"name": "a"}}));
        layer.scan_data_bindings(&mut doc, root);
        layer.set(&mut doc, "user", json!({"name": "b"}));
        assert_eq!(doc.text_content(root), "b");
    }

    #[test]
    fn replace_refreshes_links_that_still_resolve() {
        let mut doc = Document::new();
        let root = mount(&mut doc, r#"<div><p data-bind="a"></p><p data-bind="b"></p></div>"#);
        let mut layer = BindingLayer::new(json!({"a": 1, "b": 2}));
        let links = layer.scan_data_bindings(&mut doc, root);
        layer.replace(&mut doc, json!({"a": "one"}));
        let text = |doc: &Document<Payload>, id| {
            layer.link(id).map(|l| doc.text_content(l.element)).unwrap_or_default()
        };
        assert_eq!(text(&doc, links[0]), "one");
        assert_eq!(text(&doc, links[1]), "2");
        assert_eq!(layer.get("b"), None);
    }

    #[test]
    fn click_bindings_register_listeners() {
        let mut doc = Document::new();
        let root = mount(
            &mut doc,
            r#"<div><button data-click="wm:close">x</button><a data-click="">y</a></div>"#,
        );
        let layer = BindingLayer::default();
        let listeners = layer.scan_click_bindings(&mut doc, root, Payload::Click);
        assert_eq!(listeners.len(), 1);
        let button = doc.query_attribute(root, DATA_CLICK_ATTR)[0];
        assert_eq!(
            doc.listeners_for(button, EventKind::Click)
                .into_iter()
                .map(|(_, p)| p)
                .collect::<Vec<_>>(),
            vec![Payload::Click(ClickAction::Close)]
        );
    }

    #[test]
    fn release_drops_links_of_removed_elements() {
        let mut doc = Document::new();
        let root = mount(&mut doc, r#"<div><input data-bind="a"></div>"#);
        let mut layer = BindingLayer::new(json!({"a": 1}));
        layer.scan_data_bindings(&mut doc, root);
        let removed = doc.remove(root);
        layer.release(&removed);
        assert_eq!(layer.link_count(), 0);
        assert_eq!(doc.listener_count(), 0);
    }
}
