pub mod decorator;
pub mod dialogs;
pub mod registry;
pub mod window_manager;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binding::LinkId;
use crate::dom::ElementId;
use crate::handlers::{ClickAction, PaneEvent};
use crate::layout::{DragController, GestureSignal, Rectangle, ResizeController};

pub use registry::{FocusChange, PaneRegistry, ZOrder};
pub use window_manager::{OpenRequest, OpenResult, WindowManager};

/// Runtime identity of an open pane. Never reused while the pane is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaneId(u64);

impl PaneId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a pane is. Built-in panes have fixed kinds; everything an
/// application opens is `App` with its model number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum PaneKind {
    App(u32),
    StartMenu,
    Overlay,
    Alert,
    Confirm,
    Prompt,
}

impl Default for PaneKind {
    fn default() -> Self {
        PaneKind::App(0)
    }
}

impl From<u32> for PaneKind {
    fn from(code: u32) -> Self {
        match code {
            1 => PaneKind::StartMenu,
            2 => PaneKind::Overlay,
            3 => PaneKind::Alert,
            4 => PaneKind::Confirm,
            5 => PaneKind::Prompt,
            other => PaneKind::App(other),
        }
    }
}

impl From<PaneKind> for u32 {
    fn from(kind: PaneKind) -> Self {
        kind.code()
    }
}

impl PaneKind {
    pub fn code(self) -> u32 {
        match self {
            PaneKind::App(code) => code,
            PaneKind::StartMenu => 1,
            PaneKind::Overlay => 2,
            PaneKind::Alert => 3,
            PaneKind::Confirm => 4,
            PaneKind::Prompt => 5,
        }
    }

    pub fn is_builtin(self) -> bool {
        !matches!(self, PaneKind::App(_))
    }
}

/// Everything a caller can say about a pane before it opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaneSpec {
    pub id: PaneKind,
    pub title: String,
    pub content: String,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub bottom: Option<f64>,
    pub right: Option<f64>,
    pub show_minimize: bool,
    pub show_maximize: bool,
    pub show_exit: bool,
    pub show_titlebar: bool,
    pub show_tray: bool,
    pub show_border: bool,
    pub round_corners: bool,
    pub transparent: bool,
    pub drag: bool,
    pub resize: bool,
    pub one_instance: bool,
    pub is_modal: bool,
    pub can_bookmark: bool,
    /// Carried for the host; the manager does not act on it.
    pub must_login: bool,
    pub start_maximized: bool,
    #[serde(rename = "requireJS")]
    pub require_js: Vec<String>,
    pub req_data: Option<String>,
    pub on_load: Option<String>,
    pub on_exit: Option<String>,
    pub on_maximize: Option<String>,
    pub on_minimize: Option<String>,
    pub on_restore: Option<String>,
    pub on_drag: Option<String>,
    pub on_resize: Option<String>,
    pub on_multiple: Option<String>,
    pub on_focus: Option<String>,
    pub lose_focus: Option<String>,
    pub data: Value,
}

impl Default for PaneSpec {
    fn default() -> Self {
        Self {
            id: PaneKind::default(),
            title: String::new(),
            content: String::new(),
            height: None,
            width: None,
            top: None,
            left: None,
            bottom: None,
            right: None,
            show_minimize: true,
            show_maximize: true,
            show_exit: true,
            show_titlebar: true,
            show_tray: true,
            show_border: true,
            round_corners: false,
            transparent: false,
            drag: true,
            resize: true,
            one_instance: false,
            is_modal: false,
            can_bookmark: false,
            must_login: false,
            start_maximized: false,
            require_js: Vec::new(),
            req_data: None,
            on_load: None,
            on_exit: None,
            on_maximize: None,
            on_minimize: None,
            on_restore: None,
            on_drag: None,
            on_resize: None,
            on_multiple: None,
            on_focus: None,
            lose_focus: None,
            data: Value::Object(Default::default()),
        }
    }
}

impl PaneSpec {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Handler name configured for `event`, if any.
    pub fn callback_for(&self, event: &PaneEvent) -> Option<&str> {
        let name = match event {
            PaneEvent::Load => &self.on_load,
            PaneEvent::Exit => &self.on_exit,
            PaneEvent::Maximize => &self.on_maximize,
            PaneEvent::Minimize => &self.on_minimize,
            PaneEvent::Restore => &self.on_restore,
            PaneEvent::Drag => &self.on_drag,
            PaneEvent::Resize => &self.on_resize,
            PaneEvent::Focus => &self.on_focus,
            PaneEvent::LoseFocus => &self.lose_focus,
            PaneEvent::Multiple { .. } => &self.on_multiple,
            PaneEvent::Click { .. } => return None,
        };
        name.as_deref().filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneState {
    Opening,
    Open,
    Minimized,
    Maximized,
}

/// Chrome elements of a pane, looked up once after its markup is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneElements {
    pub container: ElementId,
    pub titlebar: Option<ElementId>,
    pub content: ElementId,
    pub exit_button: Option<ElementId>,
    pub max_button: Option<ElementId>,
    pub min_button: Option<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayElements {
    pub tray: ElementId,
    pub restore_button: Option<ElementId>,
    pub exit_button: Option<ElementId>,
}

/// Something attached to a pane that must follow its state, such as an
/// application menu bar.
pub trait MenuWidget: fmt::Debug {
    fn refresh(&mut self, state: PaneState, geometry: Rectangle);
}

#[derive(Debug)]
pub struct Pane {
    pub(crate) id: PaneId,
    pub(crate) index: usize,
    pub(crate) wind_id: String,
    pub(crate) spec: PaneSpec,
    pub(crate) geometry: Rectangle,
    pub(crate) restore_rect: Option<Rectangle>,
    pub(crate) maximized: bool,
    pub(crate) minimized: bool,
    pub(crate) finalized: bool,
    pub(crate) z_index: Option<i32>,
    pub(crate) elements: PaneElements,
    pub(crate) tray: Option<TrayElements>,
    pub(crate) drag: Option<DragController<PaneId>>,
    pub(crate) resize: Option<ResizeController<PaneId>>,
    pub(crate) scripts: Vec<ElementId>,
    pub(crate) modal_overlay: Option<PaneId>,
    pub(crate) restore_taskbar: Option<bool>,
    pub(crate) menus: Vec<Box<dyn MenuWidget>>,
}

impl Pane {
    pub(crate) fn new(id: PaneId, wind_id: String, spec: PaneSpec, elements: PaneElements) -> Self {
        Self {
            id,
            index: 0,
            wind_id,
            spec,
            geometry: Rectangle::default(),
            restore_rect: None,
            maximized: false,
            minimized: false,
            finalized: false,
            z_index: None,
            elements,
            tray: None,
            drag: None,
            resize: None,
            scripts: Vec::new(),
            modal_overlay: None,
            restore_taskbar: None,
            menus: Vec::new(),
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn wind_id(&self) -> &str {
        &self.wind_id
    }

    pub fn kind(&self) -> PaneKind {
        self.spec.id
    }

    pub fn title(&self) -> &str {
        &self.spec.title
    }

    pub fn spec(&self) -> &PaneSpec {
        &self.spec
    }

    pub fn data(&self) -> &Value {
        &self.spec.data
    }

    pub fn geometry(&self) -> Rectangle {
        self.geometry
    }

    pub fn restore_rect(&self) -> Option<Rectangle> {
        self.restore_rect
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn z_index(&self) -> Option<i32> {
        self.z_index
    }

    pub fn elements(&self) -> PaneElements {
        self.elements
    }

    pub fn tray(&self) -> Option<TrayElements> {
        self.tray
    }

    pub fn has_drag(&self) -> bool {
        self.drag.is_some()
    }

    pub fn has_resize(&self) -> bool {
        self.resize.is_some()
    }

    pub fn state(&self) -> PaneState {
        if !self.finalized {
            PaneState::Opening
        } else if self.minimized {
            PaneState::Minimized
        } else if self.maximized {
            PaneState::Maximized
        } else {
            PaneState::Open
        }
    }

    pub(crate) fn refresh_menus(&mut self) {
        let (state, geometry) = (self.state(), self.geometry);
        for menu in &mut self.menus {
            menu.refresh(state, geometry);
        }
    }
}

/// Payload of every listener the manager registers in its document.
#[derive(Debug, Clone, PartialEq)]
pub enum Listener {
    Gesture(GestureSignal<PaneId>),
    Click {
        action: ClickAction,
        pane: Option<PaneId>,
    },
    /// Clicking here closes an open start menu.
    DismissStartMenu,
    Bind(LinkId),
}

impl From<GestureSignal<PaneId>> for Listener {
    fn from(signal: GestureSignal<PaneId>) -> Self {
        Listener::Gesture(signal)
    }
}

impl From<LinkId> for Listener {
    fn from(link: LinkId) -> Self {
        Listener::Bind(link)
    }
}
