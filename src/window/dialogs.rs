use std::fmt;
use std::rc::Rc;

use crate::constants::{DATA_CLICK_ATTR, DATA_ROLE_ATTR};
use crate::dom::markup::{NodeSpec, render_to_markup};
use crate::dom::{Display, ElementId};

use super::{PaneId, PaneKind, PaneSpec, WindowManager};

/// Answer delivered to a prompt's reply callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Accepted(String),
    /// The answer did not match the expected value. The prompt stays open.
    Rejected(String),
}

pub type ConfirmReply = Rc<dyn Fn(&mut WindowManager, bool)>;
pub type PromptReply = Rc<dyn Fn(&mut WindowManager, PromptOutcome)>;

/// Callback waiting on the user's answer to the open confirm or prompt box.
#[derive(Clone)]
pub(crate) enum PendingReply {
    Confirm {
        pane: PaneId,
        reply: ConfirmReply,
    },
    Prompt {
        pane: PaneId,
        compare: Option<String>,
        reply: PromptReply,
    },
}

impl PendingReply {
    pub(crate) fn pane(&self) -> PaneId {
        match self {
            PendingReply::Confirm { pane, .. } | PendingReply::Prompt { pane, .. } => *pane,
        }
    }
}

impl fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingReply::Confirm { pane, .. } => {
                f.debug_struct("Confirm").field("pane", pane).finish_non_exhaustive()
            }
            PendingReply::Prompt { pane, compare, .. } => f
                .debug_struct("Prompt")
                .field("pane", pane)
                .field("compare", compare)
                .finish_non_exhaustive(),
        }
    }
}

fn button(label: &str, action: &str) -> NodeSpec {
    NodeSpec::new("button").attr(DATA_CLICK_ATTR, action).text(label)
}

/// Centered block opening with `message`; buttons are appended as children.
fn message_body(message: &str) -> NodeSpec {
    NodeSpec::new("div")
        .class("center-container")
        .inner(format!("<br />{message}<br /><br />"))
}

fn message_box(kind: PaneKind, title: &str, height: f64, width: f64, content: String, modal: bool) -> PaneSpec {
    PaneSpec {
        id: kind,
        height: Some(height),
        width: Some(width),
        top: Some(100.0),
        resize: false,
        show_maximize: false,
        one_instance: true,
        is_modal: modal,
        round_corners: true,
        ..PaneSpec::new(title, content)
    }
}

impl WindowManager {
    /// Opens a one-button message box.
    pub fn dialog_box(&mut self, message: &str, modal: bool) -> Option<PaneId> {
        let content = message_body(message).child(&button("Continue", "wm:close"));
        let spec = message_box(PaneKind::Alert, "Alert", 130.0, 250.0, render_to_markup(&content), modal);
        self.show_window(spec)
    }

    /// Opens a Cancel / Continue box. `reply` runs once with the choice,
    /// after the box has closed.
    pub fn yes_no_box<F>(&mut self, message: &str, modal: bool, reply: F) -> Option<PaneId>
    where
        F: Fn(&mut WindowManager, bool) + 'static,
    {
        let content = message_body(message)
            .child(&button("Cancel", "wm:confirm-no"))
            .child(&button("Continue", "wm:confirm-yes"));
        let spec = message_box(PaneKind::Confirm, "Confirm", 130.0, 250.0, render_to_markup(&content), modal);
        let pane = self.show_window(spec)?;
        self.pending_reply = Some(PendingReply::Confirm {
            pane,
            reply: Rc::new(reply),
        });
        Some(pane)
    }

    /// Opens a box asking for a line of text. With `compare` set, answers
    /// that differ are reported as [`PromptOutcome::Rejected`] and the box
    /// stays open with an error line.
    pub fn question_box<F>(
        &mut self,
        message: &str,
        compare: Option<String>,
        modal: bool,
        reply: F,
    ) -> Option<PaneId>
    where
        F: Fn(&mut WindowManager, PromptOutcome) + 'static,
    {
        let content = message_body(message)
            .child(
                &NodeSpec::new("input")
                    .attr("type", "text")
                    .attr(DATA_ROLE_ATTR, "answer")
                    .attr("style", "width: 100px;"),
            )
            .child(&button("Continue", "wm:prompt-submit"))
            .child(&NodeSpec::new("br"))
            .child(
                &NodeSpec::new("span")
                    .attr(DATA_ROLE_ATTR, "error")
                    .class("error")
                    .attr("style", "display: none;")
                    .text("Please try again."),
            );
        let spec = message_box(PaneKind::Prompt, "Question", 180.0, 300.0, render_to_markup(&content), modal);
        let pane = self.show_window(spec)?;
        self.pending_reply = Some(PendingReply::Prompt {
            pane,
            compare,
            reply: Rc::new(reply),
        });
        Some(pane)
    }

    /// Opens the start menu, or closes it when it is already open.
    pub fn start_menu(&mut self) -> Option<PaneId> {
        if self.options().start_menu_items.is_empty() {
            tracing::warn!("start menu requested with no items configured");
            return None;
        }

        let mut table = NodeSpec::new("table");
        for pair in self.options().start_menu_items.chunks(2) {
            let mut row = NodeSpec::new("tr");
            for item in pair {
                row = row.child(&NodeSpec::new("td").child(&button(&item.name, &item.click)));
            }
            table = table.child(&row);
        }
        let heading = NodeSpec::new("div")
            .class("center-container")
            .child(&NodeSpec::new("h4").text(self.options().project_title.clone()));
        let menu = NodeSpec::new("div")
            .id(format!("mainmenu-{}", self.app_id()))
            .child(&table);
        let content = render_to_markup(&heading) + &render_to_markup(&menu);

        let spec = PaneSpec {
            id: PaneKind::StartMenu,
            height: Some(200.0),
            width: Some(320.0),
            left: Some(2.0),
            bottom: Some(2.0),
            drag: false,
            resize: false,
            show_titlebar: false,
            show_tray: false,
            one_instance: true,
            round_corners: true,
            ..PaneSpec::new("Start Menu", content)
        };
        self.show_window(spec)
    }

    /// Full-viewport blocker shown behind a modal pane.
    pub(crate) fn modal_overlay(&mut self) -> Option<PaneId> {
        let spec = PaneSpec {
            id: PaneKind::Overlay,
            height: Some(0.0),
            width: Some(0.0),
            top: Some(0.0),
            left: Some(0.0),
            drag: false,
            resize: false,
            show_titlebar: false,
            show_tray: false,
            show_border: false,
            transparent: true,
            one_instance: true,
            round_corners: true,
            ..PaneSpec::new("Overlay", render_to_markup(&NodeSpec::new("div").id("overlay")))
        };
        self.show_window(spec)
    }

    fn role_element(&self, pane: PaneId, role: &str) -> Option<ElementId> {
        let content = self.pane(pane)?.elements().content;
        let doc = self.document();
        doc.query_attribute(content, DATA_ROLE_ATTR)
            .into_iter()
            .find(|el| doc.attribute(*el, DATA_ROLE_ATTR) == Some(role))
    }

    fn take_reply(&mut self, pane: Option<PaneId>) -> Option<PendingReply> {
        let pane = pane?;
        if self.pending_reply.as_ref()?.pane() != pane {
            return None;
        }
        self.pending_reply.take()
    }

    pub(crate) fn answer_confirm(&mut self, pane: Option<PaneId>, yes: bool) {
        match self.take_reply(pane) {
            Some(PendingReply::Confirm { pane, reply }) => {
                self.close_window(pane, None);
                reply(self, yes);
            }
            Some(other) => self.pending_reply = Some(other),
            None => tracing::debug!(pane = ?pane, "confirm answered with no pending reply"),
        }
    }

    pub(crate) fn submit_prompt(&mut self, pane: Option<PaneId>) {
        let (pane, compare, reply) = match self.take_reply(pane) {
            Some(PendingReply::Prompt {
                pane,
                compare,
                reply,
            }) => (pane, compare, reply),
            Some(other) => {
                self.pending_reply = Some(other);
                return;
            }
            None => {
                tracing::debug!(pane = ?pane, "prompt submitted with no pending reply");
                return;
            }
        };

        let answer = self
            .role_element(pane, "answer")
            .and_then(|el| self.document().get(el))
            .map(|el| el.value().to_string())
            .unwrap_or_default();
        let error = self.role_element(pane, "error");

        if compare.as_ref().is_some_and(|expected| *expected != answer) {
            if let Some(error) = error {
                self.document_mut().set_display(error, Display::Block);
            }
            self.pending_reply = Some(PendingReply::Prompt {
                pane,
                compare,
                reply: Rc::clone(&reply),
            });
            reply(self, PromptOutcome::Rejected(answer));
            return;
        }

        if let Some(error) = error {
            self.document_mut().set_display(error, Display::None);
        }
        self.close_window(pane, None);
        reply(self, PromptOutcome::Accepted(answer));
    }
}
