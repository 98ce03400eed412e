//! The pane manager.
//!
//! [`WindowManager`] owns the document and every pane in it. Hosts feed it
//! pointer and input events plus clock ticks; it answers by mutating the
//! document. Nothing here blocks: work that the desktop would do on a timer
//! (finalizing a new pane, fades, deferred removal, onLoad) goes through the
//! manager's [`Scheduler`] and runs when the host calls [`WindowManager::advance`]
//! or [`WindowManager::settle`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;

use super::decorator::{ChromeIds, DefaultDecorator, PaneDecorator, TrayIds};
use super::dialogs::PendingReply;
use super::{
    Listener, MenuWidget, Pane, PaneElements, PaneId, PaneKind, PaneRegistry, PaneSpec,
    TrayElements, ZOrder,
};
use crate::binding::BindingLayer;
use crate::config::{ChangeEffect, ManagerOptions, OptionChange};
use crate::constants::{
    APP_GUARD_ID, FINALIZE_DELAY_MS, MAXIMIZED_INSET, MAX_SETTLE_STEPS, ONLOAD_DELAY_MS, PANE_BORDER, PANE_X_PAD,
    PANE_Y_PAD, REMOVE_DELAY_MS, RESIZE_HANDLE_SIZE, TASKBAR_HEIGHT, TITLEBAR_BUTTON_WIDTH,
    TITLEBAR_HEIGHT,
};
use crate::dom::fade::{Fade, FadeProgress, FadeSpeed, fade_in, fade_out};
use crate::dom::markup::render_to_element;
use crate::dom::{Display, Document, ElementId, EventKind, PointerEvent, PointerKind};
use crate::error::{ConfigError, FetchError};
use crate::fetch::{DataFetcher, FetchResult, FetchTicket};
use crate::handlers::{CallbackContext, ClickAction, HandlerRegistry, PaneEvent};
use crate::layout::{
    DragController, DragOptions, GestureEvent, GesturePhase, GestureSignal, Point, Rectangle,
    ResizeController, ResizeEdge, ResizeLimits, ResizeOptions,
};
use crate::scheduler::Scheduler;
use crate::taskbar::{Background, Taskbar};

static NEXT_APP_ID: AtomicU64 = AtomicU64::new(1);

/// What to open: a spec in hand, or a url the data fetcher resolves to one.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenRequest {
    Spec(Box<PaneSpec>),
    Url(String),
}

impl From<PaneSpec> for OpenRequest {
    fn from(spec: PaneSpec) -> Self {
        OpenRequest::Spec(Box::new(spec))
    }
}

impl From<&str> for OpenRequest {
    fn from(url: &str) -> Self {
        OpenRequest::Url(url.to_string())
    }
}

impl From<String> for OpenRequest {
    fn from(url: String) -> Self {
        OpenRequest::Url(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenResult {
    Opened(PaneId),
    /// The spec is being fetched; the pane opens when the ticket completes.
    Pending(FetchTicket),
    Rejected,
}

impl OpenResult {
    pub fn pane(self) -> Option<PaneId> {
        match self {
            OpenResult::Opened(id) => Some(id),
            OpenResult::Pending(_) | OpenResult::Rejected => None,
        }
    }
}

#[derive(Debug)]
enum Task {
    Finalize(PaneId),
    Load(PaneId),
    Fade(Fade),
    Remove(Vec<ElementId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchPurpose {
    OpenWindow,
    PaneData(PaneId),
}

#[derive(Debug)]
pub struct WindowManager {
    document: Document<Listener>,
    container: ElementId,
    app_id: u64,
    options: ManagerOptions,
    /// Theme class prefix currently applied to the chrome.
    theme: String,
    viewport: Rectangle,
    registry: PaneRegistry,
    bindings: BindingLayer,
    handlers: HandlerRegistry,
    scheduler: Scheduler<Task>,
    fetcher: Option<Box<dyn DataFetcher>>,
    pending_fetches: BTreeMap<FetchTicket, FetchPurpose>,
    next_ticket: u64,
    taskbar: Option<Taskbar>,
    background: Option<Background>,
    decorator: Arc<dyn PaneDecorator>,
    pub(super) pending_reply: Option<PendingReply>,
    pressed: Option<ElementId>,
    closing: BTreeSet<PaneId>,
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

impl WindowManager {
    /// Takes over the element with DOM id `container_id`. Fails when the
    /// element is missing or another manager already owns the document.
    pub fn new(
        mut document: Document<Listener>,
        container_id: &str,
        options: ManagerOptions,
    ) -> Result<Self, ConfigError> {
        let Some(container) = document.find_by_dom_id(container_id) else {
            tracing::error!(container = %container_id, "container element not found");
            return Err(ConfigError::MissingContainer(container_id.to_string()));
        };
        if let Some(guard) = document.find_by_dom_id(APP_GUARD_ID) {
            tracing::error!(
                running = document.attribute(guard, "data-app-id").unwrap_or("?"),
                "a pane manager is already running in this document"
            );
            return Err(ConfigError::AlreadyInitialized(container_id.to_string()));
        }

        let app_id = NEXT_APP_ID.fetch_add(1, Ordering::Relaxed);
        let guard = document.create_element("div");
        document.set_attribute(guard, "id", APP_GUARD_ID);
        document.set_attribute(guard, "data-app-id", &app_id.to_string());
        document.set_display(guard, Display::None);
        document.append_child(container, guard);

        let theme = options.theme().to_string();
        let bindings = BindingLayer::new(options.data.clone());
        let mut manager = Self {
            document,
            container,
            app_id,
            options,
            theme,
            viewport: Rectangle::default(),
            registry: PaneRegistry::new(),
            bindings,
            handlers: HandlerRegistry::new(),
            scheduler: Scheduler::new(),
            fetcher: None,
            pending_fetches: BTreeMap::new(),
            next_ticket: 0,
            taskbar: None,
            background: None,
            decorator: Arc::new(DefaultDecorator),
            pending_reply: None,
            pressed: None,
            closing: BTreeSet::new(),
        };
        if !manager.options.background.is_empty() {
            manager.update_background();
        }
        manager.rebuild_taskbar();
        manager.refresh_viewport();
        tracing::debug!(app_id, container = %container_id, "pane manager started");
        Ok(manager)
    }

    /// [`WindowManager::new`] followed by `init` on the live manager.
    pub fn start(
        document: Document<Listener>,
        container_id: &str,
        options: ManagerOptions,
        init: impl FnOnce(&mut Self),
    ) -> Result<Self, ConfigError> {
        let mut manager = Self::new(document, container_id, options)?;
        init(&mut manager);
        Ok(manager)
    }

    pub fn document(&self) -> &Document<Listener> {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document<Listener> {
        &mut self.document
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Area panes are placed and clamped in.
    pub fn viewport(&self) -> Rectangle {
        self.viewport
    }

    pub fn panes(&self) -> &PaneRegistry {
        &self.registry
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.registry.get(id)
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.registry.focused()
    }

    pub fn taskbar(&self) -> Option<&Taskbar> {
        self.taskbar.as_ref()
    }

    pub fn background(&self) -> Option<Background> {
        self.background
    }

    pub fn bindings(&self) -> &BindingLayer {
        &self.bindings
    }

    /// Current time on the manager clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_idle() || !self.pending_fetches.is_empty()
    }

    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    pub fn register_handler<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut WindowManager, &CallbackContext) + 'static,
    {
        self.handlers.register(name, handler);
    }

    pub fn set_fetcher(&mut self, fetcher: Box<dyn DataFetcher>) {
        self.fetcher = Some(fetcher);
    }

    /// Chrome builder used for panes opened from now on.
    pub fn set_decorator(&mut self, decorator: Arc<dyn PaneDecorator>) {
        self.decorator = decorator;
    }

    /// Attaches a widget that is refreshed whenever the pane is minimized,
    /// maximized or restored.
    pub fn attach_menu(&mut self, id: PaneId, menu: Box<dyn MenuWidget>) -> bool {
        let Some(pane) = self.registry.get_mut(id) else {
            return false;
        };
        pane.menus.push(menu);
        pane.refresh_menus();
        true
    }

    pub fn open_window(&mut self, request: impl Into<OpenRequest>) -> OpenResult {
        match request.into() {
            OpenRequest::Spec(spec) => self
                .show_window(*spec)
                .map_or(OpenResult::Rejected, OpenResult::Opened),
            OpenRequest::Url(url) => match self.request(&url, FetchPurpose::OpenWindow) {
                Some(ticket) => OpenResult::Pending(ticket),
                None => {
                    tracing::warn!(url = %url, "no data fetcher set, cannot load pane from url");
                    OpenResult::Rejected
                }
            },
        }
    }

    /// Creates a pane from `spec`. The pane is mounted hidden and finishes
    /// opening (placement, controllers, fade-in) on a later tick.
    pub fn show_window(&mut self, spec: PaneSpec) -> Option<PaneId> {
        if spec.one_instance
            && let Some((existing, kind)) = self
                .registry
                .find_by_title(&spec.title)
                .map(|p| (p.id, p.kind()))
        {
            if kind == PaneKind::StartMenu {
                self.close_window(existing, None);
            }
            tracing::debug!(title = %spec.title, existing = ?existing, "one-instance pane already open");
            let event = PaneEvent::Multiple {
                existing: Some(existing),
            };
            if let Some(name) = spec.callback_for(&event) {
                self.call_handler(name, CallbackContext { pane: None, event });
            }
            return None;
        }

        let id = self.registry.allocate_id();
        let wind_id = format!("{}-obj{id}", spec.id.code());
        let ids = ChromeIds::new(self.app_id, &wind_id);
        let markup = self
            .decorator
            .build_pane(&spec, &ids, &self.theme, &self.options.project_title);
        let container = match render_to_element(&mut self.document, &markup) {
            Ok(container) => container,
            Err(err) => {
                tracing::warn!(title = %spec.title, error = %err, "pane markup rejected");
                return None;
            }
        };
        self.document.append_child(self.container, container);

        let find = |doc: &Document<Listener>, dom_id: &str| doc.find_by_dom_id_in(container, dom_id);
        let elements = PaneElements {
            container,
            titlebar: find(&self.document, &ids.titlebar),
            content: find(&self.document, &ids.content).unwrap_or(container),
            exit_button: find(&self.document, &ids.exit_button),
            max_button: find(&self.document, &ids.max_button),
            min_button: find(&self.document, &ids.min_button),
        };

        let (mut modal_overlay, mut restore_taskbar) = (None, None);
        if spec.is_modal {
            modal_overlay = self.modal_overlay();
            restore_taskbar = Some(self.options.taskbar);
            self.set_option(OptionChange::Taskbar(false));
        }

        if let Some(mode) = &spec.req_data {
            let url = format!("{}&mode={mode}", self.options.data_url);
            if self.request(&url, FetchPurpose::PaneData(id)).is_none() {
                tracing::warn!(pane = ?id, url = %url, "no data fetcher set, pane data not requested");
            }
        }
        let scripts = spec
            .require_js
            .iter()
            .map(|src| self.load_script(src))
            .collect();

        let buttons = [
            (elements.exit_button, ClickAction::Close),
            (elements.max_button, ClickAction::Maximize),
            (elements.min_button, ClickAction::Minimize),
        ];
        for (button, action) in buttons {
            if let Some(button) = button {
                self.document.add_listener(
                    button,
                    EventKind::Click,
                    Listener::Click {
                        action,
                        pane: Some(id),
                    },
                );
            }
        }
        if spec.id != PaneKind::StartMenu {
            self.document
                .add_listener(container, EventKind::Click, Listener::DismissStartMenu);
        }
        self.bindings
            .scan_data_bindings(&mut self.document, elements.content);
        self.bindings
            .scan_click_bindings(&mut self.document, elements.content, |action| {
                Listener::Click {
                    action,
                    pane: Some(id),
                }
            });

        let title = spec.title.clone();
        let mut pane = Pane::new(id, wind_id, spec, elements);
        pane.scripts = scripts;
        pane.modal_overlay = modal_overlay;
        pane.restore_taskbar = restore_taskbar;
        self.registry.push(pane);
        self.scheduler
            .schedule(millis(FINALIZE_DELAY_MS), Task::Finalize(id));
        tracing::debug!(pane = ?id, title = %title, "opened pane");
        Some(id)
    }

    fn load_script(&mut self, src: &str) -> ElementId {
        let script = self.document.create_element("script");
        self.document.set_attribute(script, "src", src);
        let head = self.document.head();
        self.document.append_child(head, script);
        script
    }

    fn finalize(&mut self, id: PaneId) {
        let viewport = self.viewport;
        let tray_height = if self.options.taskbar {
            TASKBAR_HEIGHT
        } else {
            0.0
        };
        let Some(pane) = self.registry.get_mut(id) else {
            tracing::debug!(pane = ?id, "pane closed before it finished opening");
            return;
        };
        let spec = &pane.spec;

        let y_pad = PANE_Y_PAD
            + if pane.elements.titlebar.is_some() {
                TITLEBAR_HEIGHT
            } else {
                0.0
            };
        let max_height = (viewport.height() - y_pad).max(0.0);
        let max_width = (viewport.width() - PANE_X_PAD).max(0.0);
        let mut height = spec.height.filter(|h| *h <= max_height).unwrap_or(max_height);
        let mut width = spec.width.filter(|w| *w <= max_width).unwrap_or(max_width);

        let top = match (spec.top, spec.bottom) {
            (Some(top), _) => top,
            (None, Some(bottom)) => viewport.height() - bottom - height,
            (None, None) if height < viewport.height() => {
                (viewport.height() - tray_height - height) / 2.0
            }
            (None, None) => {
                height = viewport.height();
                0.0
            }
        };
        let left = match (spec.left, spec.right) {
            (Some(left), _) => left,
            (None, Some(right)) => viewport.width() - right - width,
            (None, None) if width < viewport.width() => (viewport.width() - width) / 2.0,
            (None, None) => {
                width = viewport.width();
                0.0
            }
        };
        let geometry = if spec.id == PaneKind::Overlay {
            Rectangle::from_origin(0.0, 0.0, viewport.width(), viewport.height())
        } else {
            Rectangle::from_origin(left, top, width, height)
        };
        pane.geometry = geometry;
        pane.finalized = true;

        let elements = pane.elements;
        let spec = pane.spec.clone();
        self.document.set_geometry(elements.container, geometry);
        self.layout_chrome(id);
        let z = self.get_max_z(Some(id));
        self.style_pane(id);

        if spec.show_tray {
            self.make_tray(id);
        }

        let mut drag = None;
        if spec.drag {
            match elements.titlebar {
                Some(titlebar) => {
                    let options = DragOptions {
                        handles: vec![titlebar],
                        bounds: Some(viewport),
                    };
                    match DragController::attach(&mut self.document, id, elements.container, options) {
                        Ok(controller) => drag = Some(controller),
                        Err(err) => tracing::warn!(pane = ?id, error = %err, "drag not attached"),
                    }
                }
                None => tracing::debug!(pane = ?id, "drag needs a titlebar, skipped"),
            }
        }
        let mut resize = None;
        if spec.resize {
            let options = ResizeOptions {
                edges: ResizeEdge::ALL.to_vec(),
                handle_size: RESIZE_HANDLE_SIZE,
                z_index: Some(z + 1),
                limits: ResizeLimits::min(self.options.min_width, self.options.min_height),
                bounds: Some(viewport),
            };
            match ResizeController::attach(&mut self.document, id, elements.container, options) {
                Ok(controller) => resize = Some(controller),
                Err(err) => tracing::warn!(pane = ?id, error = %err, "resize not attached"),
            }
        }
        if let Some(pane) = self.registry.get_mut(id) {
            pane.drag = drag;
            pane.resize = resize;
        }

        if spec.start_maximized {
            self.max_window(id);
        }

        let fade = fade_in(&mut self.document, elements.container, FadeSpeed::Fast);
        self.queue_fade(fade);
        if let Some(tray) = self.registry.get(id).and_then(Pane::tray) {
            let fade = fade_in(&mut self.document, tray.tray, FadeSpeed::Fast);
            self.queue_fade(fade);
        }
        self.place_handles(id);
        self.scheduler
            .schedule(millis(ONLOAD_DELAY_MS), Task::Load(id));
    }

    /// Border, transparency and rounded corners.
    fn style_pane(&mut self, id: PaneId) {
        let Some(pane) = self.registry.get(id) else {
            return;
        };
        let (container, content) = (pane.elements.container, pane.elements.content);
        let spec = &pane.spec;
        if !spec.show_border {
            self.document.add_class(container, "pane-borderless");
        }
        if spec.transparent {
            self.document.add_class(container, "pane-transparent");
            self.document.add_class(content, "pane-transparent");
        }
        if spec.round_corners {
            self.document.add_class(container, "rounded-corners");
            self.document.set_attribute(
                container,
                "data-border-radius",
                &format!("{}px", self.options.border_radius),
            );
        } else {
            self.document.remove_class(container, "rounded-corners");
        }
    }

    /// Sizes the titlebar, its buttons and the content area to the pane.
    fn layout_chrome(&mut self, id: PaneId) {
        let Some(pane) = self.registry.get(id) else {
            return;
        };
        let (elements, geometry) = (pane.elements, pane.geometry);
        let mut content_top = 0.0;
        if let Some(titlebar) = elements.titlebar {
            content_top = TITLEBAR_HEIGHT;
            self.document.set_geometry(
                titlebar,
                Rectangle::from_origin(0.0, 0.0, geometry.width(), TITLEBAR_HEIGHT),
            );
            let buttons = [elements.exit_button, elements.max_button, elements.min_button];
            for (slot, button) in buttons.into_iter().flatten().enumerate() {
                let left = geometry.width() - TITLEBAR_BUTTON_WIDTH * (slot + 1) as f64;
                self.document.set_geometry(
                    button,
                    Rectangle::from_origin(left, 0.0, TITLEBAR_BUTTON_WIDTH, TITLEBAR_HEIGHT),
                );
            }
        }
        if elements.content != elements.container {
            self.document.set_geometry(
                elements.content,
                Rectangle::from_origin(
                    0.0,
                    content_top,
                    geometry.width(),
                    (geometry.height() - content_top).max(0.0),
                ),
            );
        }
    }

    fn place_handles(&mut self, id: PaneId) {
        let Some(pane) = self.registry.get(id) else {
            return;
        };
        if let Some(resize) = &pane.resize {
            if pane.minimized {
                resize.set_handles_visible(&mut self.document, false);
            } else {
                resize.place_handles(&mut self.document);
            }
        }
    }

    fn make_tray(&mut self, id: PaneId) -> Option<TrayElements> {
        let parent = self.taskbar.as_ref()?.tray_container()?;
        let pane = self.registry.get(id)?;
        let ids = TrayIds::new(self.app_id, &pane.wind_id);
        let markup = self.decorator.build_tray(&pane.spec.title, &ids, &self.theme);
        let tray = match render_to_element(&mut self.document, &markup) {
            Ok(tray) => tray,
            Err(err) => {
                tracing::warn!(pane = ?id, error = %err, "tray markup rejected");
                return None;
            }
        };
        self.document.append_child(parent, tray);
        let elements = TrayElements {
            tray,
            restore_button: self.document.find_by_dom_id_in(tray, &ids.restore_button),
            exit_button: self.document.find_by_dom_id_in(tray, &ids.exit_button),
        };
        let buttons = [
            (elements.restore_button, ClickAction::Minimize),
            (elements.exit_button, ClickAction::Close),
        ];
        for (button, action) in buttons {
            if let Some(button) = button {
                self.document.add_listener(
                    button,
                    EventKind::Click,
                    Listener::Click {
                        action,
                        pane: Some(id),
                    },
                );
            }
        }
        if let Some(pane) = self.registry.get_mut(id) {
            pane.tray = Some(elements);
        }
        self.layout_trays();
        Some(elements)
    }

    fn layout_trays(&mut self) {
        let Some(taskbar) = &self.taskbar else {
            return;
        };
        let trays: Vec<TrayElements> = self.registry.iter().filter_map(Pane::tray).collect();
        taskbar.layout_trays(&mut self.document, &trays);
    }

    /// Closes a pane, then opens `next` if given. Unknown ids are ignored.
    pub fn close_window(&mut self, id: PaneId, next: Option<OpenRequest>) -> bool {
        if !self.registry.contains(id) {
            tracing::debug!(pane = ?id, "close ignored, no such pane");
            return false;
        }
        if !self.closing.insert(id) {
            return false;
        }

        let (elements, tray, scripts) = match self.registry.get_mut(id) {
            Some(pane) => (pane.elements, pane.tray, std::mem::take(&mut pane.scripts)),
            None => return false,
        };
        let fade = fade_out(&mut self.document, elements.container, FadeSpeed::Fast);
        self.queue_fade(fade);
        if let Some(tray) = tray {
            let fade = fade_out(&mut self.document, tray.tray, FadeSpeed::Fast);
            self.queue_fade(fade);
        }
        for script in scripts {
            self.document.remove(script);
        }

        self.fire(id, PaneEvent::Exit);

        if let Some(pane) = self.registry.get_mut(id) {
            if let Some(mut drag) = pane.drag.take() {
                drag.remove(&mut self.document);
            }
            if let Some(mut resize) = pane.resize.take() {
                resize.remove(&mut self.document);
            }
        }
        let Some(pane) = self.registry.remove(id) else {
            self.closing.remove(&id);
            return false;
        };

        let mut doomed = vec![elements.container];
        doomed.extend(tray.map(|t| t.tray));
        self.scheduler
            .schedule(millis(REMOVE_DELAY_MS), Task::Remove(doomed));
        if self
            .pending_reply
            .as_ref()
            .is_some_and(|reply| reply.pane() == id)
        {
            self.pending_reply = None;
        }

        if let Some(overlay) = pane.modal_overlay {
            self.close_window(overlay, None);
        }
        if let Some(taskbar) = pane.restore_taskbar {
            self.set_option(OptionChange::Taskbar(taskbar));
        }
        self.closing.remove(&id);
        self.get_max_z(None);
        self.layout_trays();
        tracing::debug!(pane = ?id, title = %pane.spec.title, "closed pane");

        if let Some(next) = next {
            self.open_window(next);
        }
        true
    }

    /// Toggles between maximized and the geometry saved before maximizing.
    pub fn max_window(&mut self, id: PaneId) -> bool {
        let viewport = self.viewport;
        let Some(pane) = self.registry.get_mut(id) else {
            tracing::debug!(pane = ?id, "maximize ignored, no such pane");
            return false;
        };
        if !pane.finalized {
            tracing::debug!(pane = ?id, "maximize ignored, pane still opening");
            return false;
        }

        let (event, reveal) = if pane.maximized {
            pane.maximized = false;
            pane.geometry = pane.restore_rect.take().unwrap_or(pane.geometry);
            (PaneEvent::Restore, false)
        } else {
            pane.restore_rect = Some(pane.geometry);
            pane.maximized = true;
            pane.geometry = maximized_rect(viewport);
            (PaneEvent::Maximize, std::mem::take(&mut pane.minimized))
        };
        let (container, geometry, maximized) = (pane.elements.container, pane.geometry, pane.maximized);

        self.document.set_geometry(container, geometry);
        self.layout_chrome(id);
        if reveal {
            let fade = fade_in(&mut self.document, container, FadeSpeed::Fast);
            self.queue_fade(fade);
        }
        self.fire(id, event);
        self.get_max_z(Some(id));
        self.place_handles(id);
        if let Some(pane) = self.registry.get_mut(id) {
            pane.refresh_menus();
        }
        tracing::debug!(pane = ?id, maximized, "toggled maximize");
        true
    }

    /// Toggles a pane between hidden and shown. It stays in the registry
    /// either way.
    pub fn min_window(&mut self, id: PaneId) -> bool {
        let Some(pane) = self.registry.get_mut(id) else {
            tracing::debug!(pane = ?id, "minimize ignored, no such pane");
            return false;
        };
        if !pane.finalized {
            tracing::debug!(pane = ?id, "minimize ignored, pane still opening");
            return false;
        }
        pane.minimized = !pane.minimized;
        let (container, minimized) = (pane.elements.container, pane.minimized);

        if minimized {
            self.place_handles(id);
            let fade = fade_out(&mut self.document, container, FadeSpeed::Fast);
            self.queue_fade(fade);
            self.fire(id, PaneEvent::Minimize);
            self.get_max_z(None);
        } else {
            self.get_max_z(Some(id));
            let fade = fade_in(&mut self.document, container, FadeSpeed::Fast);
            self.queue_fade(fade);
            self.place_handles(id);
            self.fire(id, PaneEvent::Restore);
        }
        if let Some(pane) = self.registry.get_mut(id) {
            pane.refresh_menus();
        }
        tracing::debug!(pane = ?id, minimized, "toggled minimize");
        true
    }

    /// Renormalizes z-order with `focusing` on top, mirrors it into the
    /// document and fires focus callbacks when the top pane changed. Returns
    /// the z-index of `focusing`, or the next free one.
    pub fn get_max_z(&mut self, focusing: Option<PaneId>) -> i32 {
        // A placed modal backdrop is never raised over its dialog.
        let focusing = focusing.map(|id| self.modal_owner(id).unwrap_or(id));
        let ZOrder { z, focus } = self.registry.get_max_z(focusing);
        let focused = self.registry.focused();
        for pane in self.registry.iter() {
            let container = pane.elements.container;
            if let Some(z) = pane.z_index {
                self.document.set_z_index(container, z);
                if let Some(resize) = &pane.resize {
                    resize.set_z_index(&mut self.document, z + 1);
                }
            }
            let flag = if Some(pane.id) == focused { "true" } else { "false" };
            self.document.set_attribute(container, "data-focused", flag);
        }
        if let Some(change) = focus {
            if let Some(gained) = change.gained {
                self.fire(gained, PaneEvent::Focus);
            }
            for lost in change.lost {
                self.fire(lost, PaneEvent::LoseFocus);
            }
        }
        z
    }

    /// Modal pane backed by `overlay`, once the overlay holds a z-index.
    fn modal_owner(&self, overlay: PaneId) -> Option<PaneId> {
        let backdrop = self.registry.get(overlay)?;
        if backdrop.kind() != PaneKind::Overlay || backdrop.z_index.is_none() {
            return None;
        }
        self.registry
            .iter()
            .find(|p| p.modal_overlay == Some(overlay))
            .map(Pane::id)
    }

    /// Pane whose chrome contains `element`.
    pub fn pane_at(&self, element: ElementId) -> Option<PaneId> {
        self.registry
            .iter()
            .find(|p| self.document.is_descendant(p.elements.container, element))
            .map(Pane::id)
    }

    /// Routes one pointer event. Without an explicit target the topmost
    /// element under the pointer receives it. Pressing anywhere in a pane
    /// raises it, and pressing a modal backdrop raises its dialog instead.
    /// A release inside the pressed element also clicks it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let target = event
            .target
            .filter(|t| self.document.contains(*t))
            .or_else(|| self.document.element_at(event.point))
            .unwrap_or(self.document.root());
        match event.kind {
            PointerKind::Down => {
                self.pressed = Some(target);
                if let Some(id) = self.pane_at(target) {
                    self.get_max_z(Some(id));
                }
                self.dispatch(target, EventKind::PointerDown, event.point)
            }
            PointerKind::Move => self.dispatch(target, EventKind::PointerMove, event.point),
            PointerKind::Up => {
                let mut handled = self.dispatch(target, EventKind::PointerUp, event.point);
                if let Some(pressed) = self.pressed.take()
                    && self.document.is_descendant(pressed, target)
                {
                    handled |= self.dispatch(target, EventKind::Click, event.point);
                }
                handled
            }
        }
    }

    /// Clicks `element` directly.
    pub fn click(&mut self, element: ElementId) -> bool {
        self.dispatch(element, EventKind::Click, Point::ORIGIN)
    }

    /// Delivers an `input` or `change` notification for `element`.
    pub fn handle_input(&mut self, element: ElementId, kind: EventKind) -> bool {
        self.dispatch(element, kind, Point::ORIGIN)
    }

    /// Types `text` into a form control, replacing its value.
    pub fn input_text(&mut self, element: ElementId, text: &str) -> bool {
        if !self.document.contains(element) {
            return false;
        }
        self.document.set_value(element, text);
        self.handle_input(element, EventKind::Input)
    }

    pub fn set_checked_input(&mut self, element: ElementId, checked: bool) -> bool {
        if !self.document.contains(element) {
            return false;
        }
        self.document.set_checked(element, checked);
        self.handle_input(element, EventKind::Change)
    }

    pub fn data(&self, path: &str) -> Option<&Value> {
        self.bindings.get(path)
    }

    /// Writes into the shared data tree and refreshes every bound element.
    pub fn set_data(&mut self, path: &str, value: Value) -> bool {
        self.bindings.set(&mut self.document, path, value)
    }

    fn dispatch(&mut self, target: ElementId, kind: EventKind, point: Point) -> bool {
        let mut handled = false;
        for node in self.document.ancestors_inclusive(target) {
            for (listener, payload) in self.document.listeners_for(node, kind) {
                // An earlier listener may have detached this one.
                if !self.document.has_listener(listener) {
                    continue;
                }
                handled = true;
                self.run_listener(payload, node, target, point);
            }
        }
        handled
    }

    fn run_listener(&mut self, listener: Listener, node: ElementId, target: ElementId, point: Point) {
        match listener {
            Listener::Gesture(signal) => self.route_gesture(signal, node, point),
            Listener::Click { action, pane } => self.run_click(action, pane, node),
            Listener::DismissStartMenu => self.dismiss_start_menu(target),
            Listener::Bind(link) => {
                if let Some(path) = self.bindings.handle_edit(&mut self.document, link) {
                    tracing::debug!(path = %path, "bound element edited");
                }
            }
        }
    }

    fn route_gesture(&mut self, signal: GestureSignal<PaneId>, handle: ElementId, point: Point) {
        let id = signal.owner;
        let Some(pane) = self.registry.get_mut(id) else {
            return;
        };
        let doc = &mut self.document;
        let events: Vec<GestureEvent> = match signal.phase {
            GesturePhase::DragGrab => pane
                .drag
                .as_mut()
                .and_then(|d| d.pointer_down(doc, handle, point))
                .into_iter()
                .collect(),
            GesturePhase::DragTrack => pane
                .drag
                .as_mut()
                .and_then(|d| d.pointer_move(doc, point))
                .into_iter()
                .collect(),
            GesturePhase::DragRelease => pane
                .drag
                .as_mut()
                .and_then(|d| d.pointer_up(doc))
                .into_iter()
                .collect(),
            GesturePhase::ResizeGrab(edge) => pane
                .resize
                .as_mut()
                .and_then(|r| r.pointer_down(doc, edge, point))
                .into_iter()
                .collect(),
            GesturePhase::ResizeTrack => pane
                .resize
                .as_mut()
                .map(|r| r.pointer_move(doc, point))
                .unwrap_or_default(),
            GesturePhase::ResizeRelease => pane
                .resize
                .as_mut()
                .and_then(|r| r.pointer_up(doc))
                .into_iter()
                .collect(),
        };
        for event in events {
            self.apply_gesture(id, signal.phase, event);
        }
    }

    fn apply_gesture(&mut self, id: PaneId, phase: GesturePhase, event: GestureEvent) {
        match event {
            GestureEvent::Started { .. } => {
                if matches!(phase, GesturePhase::ResizeGrab(_)) {
                    self.get_max_z(Some(id));
                }
            }
            GestureEvent::Moved { rect } => {
                if let Some(pane) = self.registry.get_mut(id) {
                    pane.geometry = rect;
                }
                self.place_handles(id);
                self.fire(id, PaneEvent::Drag);
            }
            GestureEvent::Resized { rect, .. } => {
                if let Some(pane) = self.registry.get_mut(id) {
                    pane.geometry = rect;
                }
                self.layout_chrome(id);
                self.fire(id, PaneEvent::Resize);
            }
            GestureEvent::Stopped { .. } => {}
        }
    }

    fn run_click(&mut self, action: ClickAction, pane: Option<PaneId>, element: ElementId) {
        let in_start_menu = self
            .registry
            .find_kind(PaneKind::StartMenu)
            .filter(|menu| self.document.is_descendant(menu.elements.container, element))
            .map(Pane::id);

        match action {
            ClickAction::Close => {
                if let Some(id) = pane {
                    self.close_window(id, None);
                }
            }
            ClickAction::Maximize => {
                if let Some(id) = pane {
                    self.max_window(id);
                }
            }
            ClickAction::Minimize => {
                if let Some(id) = pane {
                    self.min_window(id);
                }
            }
            ClickAction::StartMenu => {
                self.start_menu();
            }
            ClickAction::ConfirmYes => self.answer_confirm(pane, true),
            ClickAction::ConfirmNo => self.answer_confirm(pane, false),
            ClickAction::PromptSubmit => self.submit_prompt(pane),
            ClickAction::Handler(name) => {
                let context = CallbackContext {
                    pane,
                    event: PaneEvent::Click { element },
                };
                self.call_handler(&name, context);
            }
        }

        if let Some(menu) = in_start_menu
            && self.registry.contains(menu)
        {
            self.close_window(menu, None);
        }
    }

    fn dismiss_start_menu(&mut self, target: ElementId) {
        let Some((menu, container)) = self
            .registry
            .find_kind(PaneKind::StartMenu)
            .map(|p| (p.id, p.elements.container))
        else {
            return;
        };
        if !self.document.is_descendant(container, target) {
            self.close_window(menu, None);
        }
    }

    fn fire(&mut self, id: PaneId, event: PaneEvent) {
        let Some(name) = self
            .registry
            .get(id)
            .and_then(|p| p.spec.callback_for(&event))
            .map(str::to_string)
        else {
            return;
        };
        self.call_handler(&name, CallbackContext { pane: Some(id), event });
    }

    fn call_handler(&mut self, name: &str, context: CallbackContext) -> bool {
        match self.handlers.get(name) {
            Some(handler) => {
                handler(self, &context);
                true
            }
            None => {
                tracing::warn!(handler = %name, pane = ?context.pane, "no handler registered");
                false
            }
        }
    }

    /// Resizes the managed container and everything that depends on it.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.document.set_size(self.container, width, height);
        self.refresh_viewport();
    }

    fn refresh_viewport(&mut self) {
        let size = self.document.local_rect(self.container).unwrap_or_default();
        let (width, height) = (size.width(), size.height());
        let reserved = if self.options.taskbar {
            TASKBAR_HEIGHT
        } else {
            0.0
        };
        let viewport = Rectangle::from_origin(
            0.0,
            0.0,
            (width - PANE_BORDER).max(0.0),
            (height - reserved - PANE_BORDER).max(0.0),
        );
        self.viewport = viewport;

        let mut maximized = Vec::new();
        for pane in self.registry.iter_mut() {
            if let Some(drag) = &mut pane.drag {
                drag.set_bounds(Some(viewport));
            }
            if let Some(resize) = &mut pane.resize {
                resize.set_bounds(Some(viewport));
            }
            if pane.maximized {
                pane.geometry = maximized_rect(viewport);
                self.document.set_geometry(pane.elements.container, pane.geometry);
                maximized.push(pane.id);
            }
        }
        for id in maximized {
            self.layout_chrome(id);
        }
        for id in self.registry.ids() {
            self.place_handles(id);
        }

        if let Some(background) = self.background {
            background.layout(&mut self.document, width, height);
        }
        if let Some(taskbar) = &self.taskbar {
            taskbar.layout(&mut self.document, width, height);
        }
        self.layout_trays();
    }

    /// Applies a configuration change and carries out its effect right away.
    pub fn set_option(&mut self, change: OptionChange) {
        match self.options.apply_change(change) {
            ChangeEffect::None => {}
            ChangeEffect::UpdateBackground => self.update_background(),
            ChangeEffect::RebuildTaskbar => {
                self.rebuild_taskbar();
                self.refresh_viewport();
            }
            ChangeEffect::Retheme => self.retheme(),
            ChangeEffect::UpdateResizeLimits => {
                let limits = ResizeLimits::min(self.options.min_width, self.options.min_height);
                for pane in self.registry.iter_mut() {
                    if let Some(resize) = &mut pane.resize {
                        resize.set_limits(limits);
                    }
                }
            }
            ChangeEffect::ReplaceData => {
                let data = self.options.data.clone();
                self.bindings.replace(&mut self.document, data);
            }
        }
    }

    /// Dynamic form of [`WindowManager::set_option`] using the JSON option
    /// names.
    pub fn set_option_value(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let change = OptionChange::from_key_value(key, value)?;
        self.set_option(change);
        Ok(())
    }

    fn update_background(&mut self) {
        match self.background {
            Some(background) => background.set_source(&mut self.document, &self.options.background),
            None => {
                let background = Background::build(
                    &mut self.document,
                    self.container,
                    &self.options.background,
                    self.app_id,
                );
                let size = self.document.local_rect(self.container).unwrap_or_default();
                background.layout(&mut self.document, size.width(), size.height());
                self.background = Some(background);
            }
        }
    }

    fn rebuild_taskbar(&mut self) {
        if let Some(taskbar) = self.taskbar.take() {
            let removed = taskbar.remove(&mut self.document);
            self.bindings.release(&removed);
            for pane in self.registry.iter_mut() {
                pane.tray = None;
            }
        }
        if !self.options.taskbar {
            return;
        }

        let taskbar = Taskbar::build(
            &mut self.document,
            &mut self.bindings,
            self.container,
            &self.options,
            &self.theme,
            self.app_id,
        );
        let size = self.document.local_rect(self.container).unwrap_or_default();
        taskbar.layout(&mut self.document, size.width(), size.height());
        self.taskbar = Some(taskbar);

        let with_trays: Vec<PaneId> = self
            .registry
            .iter()
            .filter(|p| p.finalized && p.spec.show_tray)
            .map(Pane::id)
            .collect();
        for id in with_trays {
            self.make_tray(id);
        }
    }

    fn retheme(&mut self) {
        let theme = self.options.theme().to_string();
        let old = std::mem::replace(&mut self.theme, theme.clone());
        let radius = format!("{}px", self.options.border_radius);
        for pane in self.registry.iter() {
            let elements = pane.elements;
            swap_theme(&mut self.document, elements.container, &old, &theme, "window");
            if let Some(titlebar) = elements.titlebar {
                swap_theme(&mut self.document, titlebar, &old, &theme, "title-bar");
            }
            swap_theme(&mut self.document, elements.content, &old, &theme, "pane-body");
            if pane.spec.round_corners {
                self.document
                    .set_attribute(elements.container, "data-border-radius", &radius);
            }
        }
        self.rebuild_taskbar();
        tracing::debug!(theme = %theme, "applied theme");
    }

    fn request(&mut self, url: &str, purpose: FetchPurpose) -> Option<FetchTicket> {
        let fetcher = self.fetcher.as_mut()?;
        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        fetcher.fetch(ticket, url);
        self.pending_fetches.insert(ticket, purpose);
        Some(ticket)
    }

    /// Delivers the result of a fetch started by the manager. Returns
    /// `false` for tickets it does not know.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: FetchResult) -> bool {
        let Some(purpose) = self.pending_fetches.remove(&ticket) else {
            tracing::debug!(ticket = ?ticket, "unknown fetch ticket");
            return false;
        };
        match (purpose, result) {
            (FetchPurpose::OpenWindow, Ok(payload)) => {
                match serde_json::from_value::<PaneSpec>(payload).map_err(FetchError::from) {
                    Ok(spec) => {
                        self.show_window(spec);
                    }
                    Err(err) => tracing::warn!(ticket = ?ticket, error = %err, "fetched pane rejected"),
                }
            }
            (FetchPurpose::PaneData(id), Ok(payload)) => match self.registry.get_mut(id) {
                Some(pane) => pane.spec.data = payload,
                None => tracing::debug!(pane = ?id, "pane closed before its data arrived"),
            },
            (purpose, Err(err)) => {
                tracing::warn!(ticket = ?ticket, purpose = ?purpose, error = %err, "fetch failed");
            }
        }
        true
    }

    fn poll_fetches(&mut self) {
        let completed = match self.fetcher.as_mut() {
            Some(fetcher) => fetcher.poll(),
            None => return,
        };
        for (ticket, result) in completed {
            self.complete_fetch(ticket, result);
        }
    }

    /// Moves the clock forward by `elapsed`, running everything that falls
    /// due on the way.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.scheduler.now() + elapsed;
        self.poll_fetches();
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.run_task(task);
        }
        self.scheduler.advance_to(deadline);
    }

    /// Runs deferred work until nothing is left. Returns `false` if the
    /// queue never drained.
    pub fn settle(&mut self) -> bool {
        for _ in 0..MAX_SETTLE_STEPS {
            self.poll_fetches();
            let Some(due) = self.scheduler.next_due() else {
                return true;
            };
            while let Some(task) = self.scheduler.pop_due(due) {
                self.run_task(task);
            }
        }
        tracing::warn!(pending = self.scheduler.pending(), "deferred work did not settle");
        false
    }

    fn queue_fade(&mut self, fade: Option<Fade>) {
        if let Some(fade) = fade {
            self.scheduler.schedule(fade.delay(), Task::Fade(fade));
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Finalize(id) => self.finalize(id),
            Task::Load(id) => self.fire(id, PaneEvent::Load),
            Task::Fade(fade) => {
                if fade.step(&mut self.document) == FadeProgress::Continue {
                    self.scheduler.schedule(fade.delay(), Task::Fade(fade));
                }
            }
            Task::Remove(elements) => {
                for element in elements {
                    let removed = self.document.remove(element);
                    if self.pressed.is_some_and(|p| removed.contains(&p)) {
                        self.pressed = None;
                    }
                    self.bindings.release(&removed);
                }
            }
        }
    }
}

fn maximized_rect(viewport: Rectangle) -> Rectangle {
    Rectangle::from_origin(MAXIMIZED_INSET, MAXIMIZED_INSET, viewport.width(), viewport.height())
}

fn swap_theme<L>(doc: &mut Document<L>, element: ElementId, old: &str, new: &str, suffix: &str) {
    doc.remove_class(element, &format!("{old}-{suffix}"));
    doc.add_class(element, &format!("{new}-{suffix}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Visibility;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager(width: f64, height: f64) -> WindowManager {
        let mut doc = Document::new();
        let desk = doc.create_element("div");
        doc.set_attribute(desk, "id", "desk");
        doc.set_size(desk, width, height);
        let body = doc.body();
        doc.append_child(body, desk);
        WindowManager::new(doc, "desk", ManagerOptions::default()).unwrap_or_else(|e| panic!("{e}"))
    }

    fn open(wm: &mut WindowManager, spec: PaneSpec) -> PaneId {
        let id = wm.show_window(spec).unwrap_or_else(|| panic!("pane rejected"));
        wm.settle();
        id
    }

    #[test]
    fn new_pane_is_centered_and_padded_into_the_viewport() {
        let mut wm = manager(1000.0, 800.0);
        assert_eq!(wm.viewport(), Rectangle::from_origin(0.0, 0.0, 998.0, 798.0));
        let id = open(&mut wm, PaneSpec::new("Notes", ""));
        let pane = wm.pane(id).unwrap_or_else(|| panic!("missing pane"));
        assert_eq!(pane.geometry(), Rectangle::from_origin(5.0, 35.0, 988.0, 728.0));
        let container = pane.elements().container;
        assert!(wm.document().is_rendered(container));
        assert_eq!(wm.document().style(container).map(|s| s.opacity), Some(1.0));
    }

    #[test]
    fn explicit_bottom_and_right_anchor_the_pane() {
        let mut wm = manager(1000.0, 800.0);
        let spec = PaneSpec {
            width: Some(300.0),
            height: Some(200.0),
            bottom: Some(10.0),
            right: Some(20.0),
            ..PaneSpec::new("Anchored", "")
        };
        let id = open(&mut wm, spec);
        assert_eq!(
            wm.pane(id).map(Pane::geometry),
            Some(Rectangle::from_origin(678.0, 588.0, 300.0, 200.0))
        );
    }

    #[test]
    fn closing_renumbers_and_ignores_unknown_ids() {
        let mut wm = manager(800.0, 600.0);
        let ids: Vec<PaneId> = (0..3).map(|i| open(&mut wm, PaneSpec::new(format!("p{i}"), ""))).collect();
        assert!(wm.close_window(ids[0], None));
        assert!(!wm.close_window(ids[0], None));
        assert!(!wm.close_window(PaneId::new(999), None));
        let indexes: Vec<usize> = wm.panes().iter().map(Pane::index).collect();
        assert_eq!(indexes, vec![0, 1]);
        wm.settle();
        assert!(wm.document().find_by_dom_id(&ChromeIds::new(wm.app_id(), "0-obj1").container).is_none());
    }

    #[test]
    fn maximize_round_trips_geometry() {
        let mut wm = manager(800.0, 600.0);
        let id = open(&mut wm, PaneSpec::new("Big", ""));
        let before = wm.pane(id).map(Pane::geometry);
        assert!(wm.max_window(id));
        assert_eq!(
            wm.pane(id).map(Pane::geometry),
            Some(Rectangle::from_origin(1.0, 1.0, 798.0, 598.0))
        );
        assert!(wm.max_window(id));
        assert_eq!(wm.pane(id).map(Pane::geometry), before);
        assert_eq!(wm.pane(id).and_then(Pane::restore_rect), None);
    }

    #[test]
    fn minimize_hides_without_closing() {
        let mut wm = manager(800.0, 600.0);
        let id = open(&mut wm, PaneSpec::new("Tiny", ""));
        assert!(wm.min_window(id));
        wm.settle();
        let container = wm.pane(id).map(|p| p.elements().container).unwrap_or_else(|| panic!("gone"));
        assert_eq!(
            wm.document().style(container).map(|s| s.visibility),
            Some(Visibility::Hidden)
        );
        assert_eq!(wm.panes().len(), 1);
        assert_eq!(wm.focused(), None);

        assert!(wm.min_window(id));
        wm.settle();
        assert!(wm.document().is_rendered(container));
        assert_eq!(wm.focused(), Some(id));
    }

    #[test]
    fn focus_callbacks_fire_on_top_changes() {
        let mut wm = manager(800.0, 600.0);
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["focus", "blur"] {
            let log = Rc::clone(&log);
            wm.register_handler(name, move |_, ctx| {
                log.borrow_mut().push((name, ctx.pane));
            });
        }
        let spec = |title: &str| PaneSpec {
            on_focus: Some("focus".into()),
            lose_focus: Some("blur".into()),
            ..PaneSpec::new(title, "")
        };
        let a = open(&mut wm, spec("a"));
        let b = open(&mut wm, spec("b"));
        log.borrow_mut().clear();

        wm.get_max_z(Some(a));
        assert_eq!(*log.borrow(), vec![("focus", Some(a)), ("blur", Some(b))]);
        log.borrow_mut().clear();
        wm.get_max_z(None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unfinished_panes_ignore_max_and_min() {
        let mut wm = manager(800.0, 600.0);
        let id = wm.show_window(PaneSpec::new("Slow", "")).unwrap_or_else(|| panic!("rejected"));
        assert!(!wm.max_window(id));
        assert!(!wm.min_window(id));
        wm.advance(Duration::from_millis(FINALIZE_DELAY_MS));
        assert!(wm.max_window(id));
    }

    #[test]
    fn viewport_resize_refits_maximized_panes_and_bounds() {
        let mut wm = manager(800.0, 600.0);
        let id = open(&mut wm, PaneSpec::new("Big", ""));
        wm.max_window(id);
        wm.resize_viewport(500.0, 400.0);
        assert_eq!(
            wm.pane(id).map(Pane::geometry),
            Some(Rectangle::from_origin(1.0, 1.0, 498.0, 398.0))
        );
    }
}
