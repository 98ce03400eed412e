use crate::dom::markup::{NodeSpec, render_to_markup};

use super::PaneSpec;

/// DOM ids of the chrome around one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeIds {
    pub container: String,
    pub titlebar: String,
    pub content: String,
    pub exit_button: String,
    pub max_button: String,
    pub min_button: String,
}

impl ChromeIds {
    pub fn new(app_id: u64, wind_id: &str) -> Self {
        let id = |part: &str| format!("app{app_id}-{part}{wind_id}");
        Self {
            container: id("window"),
            titlebar: id("titlebar"),
            content: id("content"),
            exit_button: id("exitButton"),
            max_button: id("maxButton"),
            min_button: id("minButton"),
        }
    }
}

/// DOM ids of a pane's taskbar tray entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayIds {
    pub tray: String,
    pub restore_button: String,
    pub exit_button: String,
}

impl TrayIds {
    pub fn new(app_id: u64, wind_id: &str) -> Self {
        let id = |part: &str| format!("app{app_id}-{part}{wind_id}");
        Self {
            tray: id("tray"),
            restore_button: id("tray-restore"),
            exit_button: id("tray-exit"),
        }
    }
}

/// Produces the markup for pane chrome and tray entries. The manager mounts
/// the markup and looks elements up again by the ids it passed in.
pub trait PaneDecorator: std::fmt::Debug {
    fn build_pane(&self, spec: &PaneSpec, ids: &ChromeIds, theme: &str, project_title: &str) -> String;

    fn build_tray(&self, title: &str, ids: &TrayIds, theme: &str) -> String;
}

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl PaneDecorator for DefaultDecorator {
    fn build_pane(&self, spec: &PaneSpec, ids: &ChromeIds, theme: &str, project_title: &str) -> String {
        let title = if spec.can_bookmark {
            format!("{0} - {project_title}&app={0}", spec.title)
        } else {
            spec.title.clone()
        };

        let mut titlebar = NodeSpec::new("div")
            .id(&ids.titlebar)
            .class(format!("{theme}-title-bar"))
            .child(&NodeSpec::new("span").class("pane-title").text(title));
        let buttons = [
            (spec.show_exit, &ids.exit_button, "X"),
            (spec.show_maximize, &ids.max_button, "\u{25a3}"),
            (spec.show_minimize, &ids.min_button, "\u{25ac}"),
        ];
        for (shown, id, label) in buttons {
            if shown {
                titlebar = titlebar.child(&NodeSpec::new("button").id(id).text(label));
            }
        }

        let body = NodeSpec::new("div")
            .id(&ids.content)
            .class(format!("{theme}-pane-body"))
            .inner(spec.content.clone());

        let mut container = NodeSpec::new("div")
            .id(&ids.container)
            .class(format!("{theme}-window"))
            .attr("style", "display: none;");
        if spec.show_titlebar {
            container = container.child(&titlebar);
        }
        render_to_markup(&container.child(&body))
    }

    fn build_tray(&self, title: &str, ids: &TrayIds, theme: &str) -> String {
        let bar = NodeSpec::new("div")
            .class(format!("{theme}-tray-bar"))
            .child(&NodeSpec::new("button").id(&ids.restore_button).text(title))
            .child(&NodeSpec::new("button").id(&ids.exit_button).text("X"));
        render_to_markup(&NodeSpec::new("div").id(&ids.tray).child(&bar))
    }
}
