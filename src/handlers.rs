use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::ElementId;
use crate::window::PaneId;
use crate::window::window_manager::WindowManager;

pub type Handler = Rc<dyn Fn(&mut WindowManager, &CallbackContext)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneEvent {
    Load,
    Exit,
    Maximize,
    Minimize,
    Restore,
    Drag,
    Resize,
    Focus,
    LoseFocus,
    /// A one-instance pane was requested again; carries the pane already open.
    Multiple { existing: Option<PaneId> },
    Click { element: ElementId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackContext {
    pub pane: Option<PaneId>,
    pub event: PaneEvent,
}

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Handler>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut WindowManager, &CallbackContext) + 'static,
    {
        self.handlers.insert(name.into(), Rc::new(handler));
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    Close,
    Maximize,
    Minimize,
    StartMenu,
    ConfirmYes,
    ConfirmNo,
    PromptSubmit,
    Handler(String),
}

impl ClickAction {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(match value {
            "wm:close" => ClickAction::Close,
            "wm:maximize" => ClickAction::Maximize,
            "wm:minimize" => ClickAction::Minimize,
            "wm:start-menu" => ClickAction::StartMenu,
            "wm:confirm-yes" => ClickAction::ConfirmYes,
            "wm:confirm-no" => ClickAction::ConfirmNo,
            "wm:prompt-submit" => ClickAction::PromptSubmit,
            name => ClickAction::Handler(name.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClickAction::Close => "wm:close",
            ClickAction::Maximize => "wm:maximize",
            ClickAction::Minimize => "wm:minimize",
            ClickAction::StartMenu => "wm:start-menu",
            ClickAction::ConfirmYes => "wm:confirm-yes",
            ClickAction::ConfirmNo => "wm:confirm-no",
            ClickAction::PromptSubmit => "wm:prompt-submit",
            ClickAction::Handler(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_actions_resolve_before_handlers() {
        assert_eq!(ClickAction::parse("wm:close"), Some(ClickAction::Close));
        assert_eq!(ClickAction::parse(" wm:prompt-submit "), Some(ClickAction::PromptSubmit));
        assert_eq!(
            ClickAction::parse("increment"),
            Some(ClickAction::Handler("increment".into()))
        );
        assert_eq!(ClickAction::parse("  "), None);
        assert_eq!(ClickAction::ConfirmNo.as_str(), "wm:confirm-no");
    }

    #[test]
    fn registry_replaces_and_removes() {
        let mut registry = HandlerRegistry::new();
        registry.register("a", |_, _| {});
        registry.register("a", |_, _| {});
        registry.register("b", |_, _| {});
        assert_eq!(registry.len(), 2);
        assert!(registry.unregister("a"));
        assert!(!registry.contains("a"));
        assert_eq!(format!("{registry:?}"), r#"{"b"}"#);
    }
}
