/// Lowest z-index handed out to panes. Every renormalization packs pane
/// z-indices into a contiguous band starting here.
pub const Z_FLOOR: i32 = 100;

/// z-index given to the taskbar so it paints over every pane band.
pub const TASKBAR_Z: i32 = 5_000;

/// Height of a pane titlebar.
pub const TITLEBAR_HEIGHT: f64 = 20.0;

/// Width reserved for each titlebar button (exit, maximize, minimize).
pub const TITLEBAR_BUTTON_WIDTH: f64 = 20.0;

/// Vertical padding subtracted from the viewport when sizing a new pane.
/// The titlebar height is added on top when the pane shows one.
pub const PANE_Y_PAD: f64 = 50.0;

/// Horizontal padding subtracted from the viewport when sizing a new pane.
pub const PANE_X_PAD: f64 = 10.0;

/// Height of the taskbar strip along the bottom of the container.
pub const TASKBAR_HEIGHT: f64 = 50.0;

/// Combined border width of a pane; the viewport is shrunk by this much.
pub const PANE_BORDER: f64 = 2.0;

/// Offset of a maximized pane from the viewport origin.
pub const MAXIMIZED_INSET: f64 = 1.0;

/// Default edge length of a resize handle overlay.
pub const RESIZE_HANDLE_SIZE: f64 = 5.0;

/// Fixed taskbar cell widths.
pub const TASKBAR_START_WIDTH: f64 = 62.0;
pub const TASKBAR_DETAILS_WIDTH: f64 = 80.0;
pub const TASKBAR_CUSTOM_WIDTH: f64 = 62.0;
pub const TRAY_WIDTH: f64 = 140.0;
pub const TRAY_HEIGHT: f64 = 40.0;

/// Fade step increments, applied once per fade tick until opacity saturates.
pub const FADE_STEP_FAST: f64 = 0.25;
pub const FADE_STEP_SLOW: f64 = 0.05;
pub const FADE_STEP_NORMAL: f64 = 0.1;

/// Deferred-work delays, in milliseconds of the manager clock.
pub const FADE_DELAY_MS: u64 = 50;
pub const FINALIZE_DELAY_MS: u64 = 100;
pub const ONLOAD_DELAY_MS: u64 = 10;
pub const REMOVE_DELAY_MS: u64 = 250;

/// Upper bound on tasks drained by a single `settle` call. Reaching it means
/// something keeps rescheduling itself.
pub const MAX_SETTLE_STEPS: usize = 10_000;

/// Hidden marker element proving a manager already owns this document.
pub const APP_GUARD_ID: &str = "pane-wm-guard";

/// Declarative binding attributes scanned in pane content.
pub const DATA_BIND_ATTR: &str = "data-bind";
pub const DATA_CLICK_ATTR: &str = "data-click";

/// Marks the answer input and error line inside a question box.
pub const DATA_ROLE_ATTR: &str = "data-role";
