use crate::binding::BindingLayer;
use crate::config::{CustomTaskbarItem, ManagerOptions};
use crate::constants::{
    DATA_CLICK_ATTR, TASKBAR_CUSTOM_WIDTH, TASKBAR_DETAILS_WIDTH, TASKBAR_HEIGHT, TASKBAR_START_WIDTH, TASKBAR_Z,
    TRAY_HEIGHT, TRAY_WIDTH, TITLEBAR_BUTTON_WIDTH,
};
use crate::dom::markup::parse_fragment;
use crate::dom::{Document, ElementId, EventKind};
use crate::handlers::ClickAction;
use crate::layout::Rectangle;
use crate::window::{Listener, TrayElements};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarItem {
    Start,
    Trays,
    Details,
    /// Empty cell the host fills with a clock.
    DateTime,
    Custom,
}

impl TaskbarItem {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "start" => TaskbarItem::Start,
            "trays" => TaskbarItem::Trays,
            "details" => TaskbarItem::Details,
            "datetime" => TaskbarItem::DateTime,
            "custom" => TaskbarItem::Custom,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
struct Cell {
    element: ElementId,
    /// `None` shares whatever width the fixed cells leave over.
    width: Option<f64>,
    /// Child stretched over the whole cell.
    fill: Option<ElementId>,
}

#[derive(Debug, Clone)]
pub struct Taskbar {
    root: ElementId,
    cells: Vec<Cell>,
    start_button: Option<ElementId>,
    tray_container: Option<ElementId>,
    details: Option<ElementId>,
    datetime: Option<ElementId>,
    custom: Vec<ElementId>,
}

impl Taskbar {
    pub fn build(
        doc: &mut Document<Listener>,
        bindings: &mut BindingLayer,
        container: ElementId,
        options: &ManagerOptions,
        theme: &str,
        app_id: u64,
    ) -> Self {
        let root = element(doc, container, "div", &format!("taskbar-{app_id}"));
        doc.set_attribute(root, "class", &format!("{theme}-tray"));
        doc.set_z_index(root, TASKBAR_Z);

        let mut taskbar = Self {
            root,
            cells: Vec::new(),
            start_button: None,
            tray_container: None,
            details: None,
            datetime: None,
            custom: Vec::new(),
        };
        let mut custom_items = options.custom_taskbar_items.iter();

        for name in &options.taskbar_items {
            match TaskbarItem::parse(name) {
                Some(TaskbarItem::Start) => {
                    let cell = element(doc, root, "div", &format!("start-td-{app_id}"));
                    let button = element(doc, cell, "button", &format!("start-{app_id}"));
                    doc.set_attribute(button, "class", &format!("{theme}-start-menu"));
                    doc.set_text(button, "Menu");
                    doc.add_listener(button, EventKind::Click, start_menu_listener());
                    taskbar.start_button = Some(button);
                    taskbar.push_cell(cell, Some(TASKBAR_START_WIDTH), Some(button));
                }
                Some(TaskbarItem::Trays) => {
                    let cell = element(doc, root, "div", &format!("trays-td-{app_id}"));
                    let trays = element(doc, cell, "div", &format!("trays-{app_id}"));
                    doc.add_listener(cell, EventKind::Click, Listener::DismissStartMenu);
                    taskbar.tray_container = Some(trays);
                    taskbar.push_cell(cell, None, Some(trays));
                }
                Some(TaskbarItem::Details) => {
                    let cell = element(doc, root, "div", &format!("project-td-{app_id}"));
                    let title = doc.create_text(&options.project_title);
                    let br = doc.create_element("br");
                    let version = doc.create_text(&format!("Ver: {}", options.version));
                    for node in [title, br, version] {
                        doc.append_child(cell, node);
                    }
                    doc.add_listener(cell, EventKind::Click, Listener::DismissStartMenu);
                    taskbar.details = Some(cell);
                    taskbar.push_cell(cell, Some(TASKBAR_DETAILS_WIDTH), None);
                }
                Some(TaskbarItem::DateTime) => {
                    let cell = element(doc, root, "div", &format!("datetime-td-{app_id}"));
                    doc.add_listener(cell, EventKind::Click, Listener::DismissStartMenu);
                    taskbar.datetime = Some(cell);
                    taskbar.push_cell(cell, Some(TASKBAR_DETAILS_WIDTH), None);
                }
                Some(TaskbarItem::Custom) => {
                    let Some(item) = custom_items.next() else {
                        tracing::warn!("custom taskbar item not found, skipping");
                        continue;
                    };
                    let cell = doc.create_element("div");
                    doc.append_child(root, cell);
                    let content = custom_item(doc, bindings, cell, item, theme, app_id);
                    taskbar.custom.push(content);
                    taskbar.push_cell(cell, Some(TASKBAR_CUSTOM_WIDTH), Some(content));
                }
                None => tracing::warn!(item = %name, "invalid taskbar item, skipping"),
            }
        }
        taskbar
    }

    fn push_cell(&mut self, element: ElementId, width: Option<f64>, fill: Option<ElementId>) {
        self.cells.push(Cell {
            element,
            width,
            fill,
        });
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn start_button(&self) -> Option<ElementId> {
        self.start_button
    }

    /// Parent of every tray entry, when the taskbar has a tray cell.
    pub fn tray_container(&self) -> Option<ElementId> {
        self.tray_container
    }

    pub fn details(&self) -> Option<ElementId> {
        self.details
    }

    pub fn datetime(&self) -> Option<ElementId> {
        self.datetime
    }

    pub fn custom_items(&self) -> &[ElementId] {
        &self.custom
    }

    /// Removes the whole strip, tray entries included. Returns the removed
    /// element ids.
    pub fn remove<L>(&self, doc: &mut Document<L>) -> Vec<ElementId> {
        doc.remove(self.root)
    }

    /// Pins the strip to the bottom of a `width` x `height` container and
    /// lays its cells out left to right.
    pub fn layout<L>(&self, doc: &mut Document<L>, width: f64, height: f64) {
        doc.set_geometry(
            self.root,
            Rectangle::from_origin(0.0, (height - TASKBAR_HEIGHT).max(0.0), width, TASKBAR_HEIGHT),
        );
        let fixed: f64 = self.cells.iter().filter_map(|c| c.width).sum();
        let flexible = self.cells.iter().filter(|c| c.width.is_none()).count();
        let share = if flexible == 0 {
            0.0
        } else {
            (width - fixed).max(0.0) / flexible as f64
        };

        let mut left = 0.0;
        for cell in &self.cells {
            let cell_width = cell.width.unwrap_or(share);
            doc.set_geometry(
                cell.element,
                Rectangle::from_origin(left, 0.0, cell_width, TASKBAR_HEIGHT),
            );
            if let Some(fill) = cell.fill {
                doc.set_geometry(fill, Rectangle::from_origin(0.0, 0.0, cell_width, TASKBAR_HEIGHT));
            }
            left += cell_width;
        }
    }

    /// Lines tray entries up in the tray cell, in pane order.
    pub fn layout_trays<L>(&self, doc: &mut Document<L>, trays: &[TrayElements]) {
        let top = (TASKBAR_HEIGHT - TRAY_HEIGHT) / 2.0;
        for (i, tray) in trays.iter().enumerate() {
            doc.set_geometry(
                tray.tray,
                Rectangle::from_origin(i as f64 * TRAY_WIDTH, top, TRAY_WIDTH, TRAY_HEIGHT),
            );
            let bar = tray
                .restore_button
                .or(tray.exit_button)
                .and_then(|button| doc.get(button).and_then(|el| el.parent()));
            if let Some(bar) = bar
                && bar != tray.tray
            {
                doc.set_geometry(bar, Rectangle::from_origin(0.0, 0.0, TRAY_WIDTH, TRAY_HEIGHT));
            }
            if let Some(restore) = tray.restore_button {
                doc.set_geometry(
                    restore,
                    Rectangle::from_origin(0.0, 0.0, TRAY_WIDTH - TITLEBAR_BUTTON_WIDTH, TRAY_HEIGHT),
                );
            }
            if let Some(exit) = tray.exit_button {
                doc.set_geometry(
                    exit,
                    Rectangle::from_origin(
                        TRAY_WIDTH - TITLEBAR_BUTTON_WIDTH,
                        0.0,
                        TITLEBAR_BUTTON_WIDTH,
                        TRAY_HEIGHT,
                    ),
                );
            }
        }
    }
}

fn start_menu_listener() -> Listener {
    Listener::Click {
        action: ClickAction::StartMenu,
        pane: None,
    }
}

fn element<L>(doc: &mut Document<L>, parent: ElementId, tag: &str, dom_id: &str) -> ElementId {
    let el = doc.create_element(tag);
    doc.set_attribute(el, "id", dom_id);
    doc.append_child(parent, el);
    el
}

fn custom_item(
    doc: &mut Document<Listener>,
    bindings: &mut BindingLayer,
    cell: ElementId,
    item: &CustomTaskbarItem,
    theme: &str,
    app_id: u64,
) -> ElementId {
    let click = item.click.as_deref().and_then(ClickAction::parse);
    let tag = if click.is_some() { "button" } else { "div" };
    let el = element(doc, cell, tag, &format!("{}-button-{app_id}", item.name));
    if click.is_some() {
        doc.set_attribute(el, "class", &format!("{theme}-start-menu"));
    }

    let content = item.content.as_deref().unwrap_or(&item.name);
    match parse_fragment(doc, content) {
        Ok(nodes) => {
            for node in nodes {
                doc.append_child(el, node);
            }
        }
        Err(err) => {
            tracing::warn!(item = %item.name, error = %err, "custom taskbar content rejected");
            doc.set_text(el, &item.name);
        }
    }

    match click {
        Some(ClickAction::StartMenu) => {
            doc.add_listener(el, EventKind::Click, start_menu_listener());
        }
        Some(action) => {
            doc.add_listener(el, EventKind::Click, Listener::DismissStartMenu);
            doc.set_attribute(el, DATA_CLICK_ATTR, action.as_str());
            bindings.scan_click_bindings(doc, el, |action| Listener::Click { action, pane: None });
        }
        None => {
            doc.add_listener(el, EventKind::Click, Listener::DismissStartMenu);
        }
    }
    bindings.scan_data_bindings(doc, el);
    el
}

/// Full-size image behind every pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    container: ElementId,
    image: ElementId,
}

impl Background {
    pub fn build(doc: &mut Document<Listener>, parent: ElementId, source: &str, app_id: u64) -> Self {
        let container = element(doc, parent, "div", &format!("background-{app_id}-container"));
        let image = element(doc, container, "img", &format!("background-{app_id}"));
        doc.set_attribute(image, "src", source);
        doc.set_z_index(container, 0);
        doc.add_listener(container, EventKind::Click, Listener::DismissStartMenu);
        Self { container, image }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn image(&self) -> ElementId {
        self.image
    }

    pub fn set_source<L>(&self, doc: &mut Document<L>, source: &str) {
        doc.set_attribute(self.image, "src", source);
    }

    pub fn layout<L>(&self, doc: &mut Document<L>, width: f64, height: f64) {
        let rect = Rectangle::from_origin(0.0, 0.0, width, height);
        doc.set_geometry(self.container, rect);
        doc.set_geometry(self.image, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomTaskbarItem;
    use serde_json::json;

    fn setup() -> (Document<Listener>, ElementId) {
        let mut doc = Document::new();
        let container = doc.create_element("div");
        doc.append_child(doc.body(), container);
        (doc, container)
    }

    #[test]
    fn cells_follow_item_order_and_skip_unknown_names() {
        let (mut doc, container) = setup();
        let options = ManagerOptions {
            taskbar_items: ["start", "clock", "trays", "details", "custom"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..ManagerOptions::default()
        };
        let mut bindings = BindingLayer::default();
        let taskbar = Taskbar::build(&mut doc, &mut bindings, container, &options, "light", 9);
        taskbar.layout(&mut doc, 1000.0, 800.0);

        assert_eq!(doc.local_rect(taskbar.root()), Some(Rectangle::from_origin(0.0, 750.0, 1000.0, 50.0)));
        let trays = taskbar.tray_container().unwrap_or_else(|| panic!("no tray cell"));
        let tray_cell = doc.get(trays).and_then(|el| el.parent()).unwrap_or_else(|| panic!("detached"));
        assert_eq!(
            doc.local_rect(tray_cell),
            Some(Rectangle::from_origin(62.0, 0.0, 858.0, 50.0))
        );
        assert!(taskbar.custom_items().is_empty());
        let details = taskbar.details().unwrap_or_else(|| panic!("no details"));
        assert!(doc.text_content(details).starts_with("pane-wm"));
    }

    #[test]
    fn start_button_and_custom_items_get_listeners() {
        let (mut doc, container) = setup();
        let options = ManagerOptions {
            taskbar_items: vec!["start".into(), "custom".into(), "custom".into()],
            custom_taskbar_items: vec![
                CustomTaskbarItem {
                    name: "apps".into(),
                    click: Some("wm:start-menu".into()),
                    content: None,
                },
                CustomTaskbarItem {
                    name: "user".into(),
                    click: None,
                    content: Some(r#"<span data-bind="user.name"></span>"#.into()),
                },
            ],
            ..ManagerOptions::default()
        };
        let mut bindings = BindingLayer::new(json!({"user": {"name": "ada"}}));
        let taskbar = Taskbar::build(&mut doc, &mut bindings, container, &options, "blue", 3);

        let start = taskbar.start_button().unwrap_or_else(|| panic!("no start button"));
        assert_eq!(doc.attribute(start, "class"), Some("blue-start-menu"));
        assert_eq!(doc.listeners_for(start, EventKind::Click).len(), 1);

        let [apps, user] = taskbar.custom_items() else {
            panic!("expected two custom items");
        };
        assert_eq!(doc.get(*apps).map(|e| e.tag().to_string()), Some("button".into()));
        assert_eq!(
            doc.listeners_for(*apps, EventKind::Click)
                .into_iter()
                .map(|(_, l)| l)
                .collect::<Vec<_>>(),
            vec![start_menu_listener()]
        );
        assert_eq!(doc.text_content(*user), "ada");
        assert_eq!(bindings.link_count(), 1);
    }

    #[test]
    fn trays_line_up_left_to_right() {
        let (mut doc, container) = setup();
        let mut bindings = BindingLayer::default();
        let taskbar = Taskbar::build(&mut doc, &mut bindings, container, &ManagerOptions::default(), "light", 1);
        let parent = taskbar.tray_container().unwrap_or_else(|| panic!("no tray cell"));
        let trays: Vec<TrayElements> = (0..2)
            .map(|_| {
                let tray = doc.create_element("div");
                doc.append_child(parent, tray);
                TrayElements {
                    tray,
                    restore_button: None,
                    exit_button: None,
                }
            })
            .collect();
        taskbar.layout_trays(&mut doc, &trays);
        assert_eq!(doc.local_rect(trays[1].tray).map(|r| r.left()), Some(TRAY_WIDTH));

        let removed = taskbar.remove(&mut doc);
        assert!(removed.contains(&trays[0].tray));
        assert!(!doc.contains(taskbar.root()));
    }
}
