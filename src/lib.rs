//! A desktop-metaphor pane manager.
//!
//! Panes float over a container element with titlebars, drag and resize
//! gestures, z-order focus, a taskbar with per-pane trays, and two-way data
//! binding between form controls and a shared JSON store. The engine is
//! headless: it drives an in-memory [`dom::Document`] that a host renders
//! and feeds events into. [`ui`] and [`drivers`] provide a terminal host.

pub mod binding;
pub mod config;
pub mod constants;
pub mod dom;
pub mod drivers;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod layout;
pub mod scheduler;
pub mod taskbar;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use config::{ManagerOptions, OptionChange};
pub use dom::{Document, ElementId, PointerEvent};
pub use error::{ConfigError, FetchError};
pub use window::dialogs::PromptOutcome;
pub use window::{OpenRequest, OpenResult, PaneId, PaneKind, PaneSpec, WindowManager};
