use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use indoc::indoc;
use serde_json::json;

use pane_wm::config::StartMenuItem;
use pane_wm::dom::Document;
use pane_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use pane_wm::drivers::mouse::pointer_from_mouse;
use pane_wm::drivers::{InputDriver, OutputDriver};
use pane_wm::ui::{CellScale, render_document};
use pane_wm::{ManagerOptions, PaneSpec, WindowManager, tracing_sub};

const CONTAINER_ID: &str = "desktop";
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(
    name = "pane-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating pane desktop rendered in the terminal"
)]
struct Cli {
    /// JSON file with manager options (camelCase keys).
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the taskbar regardless of the config file.
    #[arg(long = "taskbar")]
    taskbar: bool,

    /// Theme prefix for pane chrome.
    #[arg(long = "theme", value_name = "PREFIX")]
    theme: Option<String>,

    /// Write logs here instead of discarding them while the UI is up.
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        tracing_sub::set_log_file(path)?;
        tracing_sub::init_default();
    }

    let mut options = match &cli.config {
        Some(path) => ManagerOptions::load(path).map_err(io::Error::other)?,
        None => demo_options(),
    };
    options.taskbar |= cli.taskbar;
    if let Some(theme) = cli.theme {
        options.theme_prefix = theme;
    }

    let scale = CellScale::default();
    let mut output = ConsoleOutputDriver::new()?;
    let mut input = ConsoleInputDriver::new();
    let (columns, rows) = output.size()?;
    let (width, height) = scale.pixel_size(columns, rows);

    let mut document = Document::new();
    let desktop = document.create_element("div");
    document.set_attribute(desktop, "id", CONTAINER_ID);
    document.set_size(desktop, width, height);
    let body = document.body();
    document.append_child(body, desktop);

    let mut wm = WindowManager::start(document, CONTAINER_ID, options, install_demo)
        .map_err(io::Error::other)?;

    output.enter()?;
    let result = run(&mut wm, &mut input, &mut output, scale);
    output.exit()?;
    result
}

fn run(
    wm: &mut WindowManager,
    input: &mut ConsoleInputDriver,
    output: &mut ConsoleOutputDriver,
    scale: CellScale,
) -> io::Result<()> {
    let mut last = Instant::now();
    loop {
        output.draw(|mut frame| {
            render_document(&mut frame, wm.document(), scale);
        })?;

        if input.poll(FRAME)? {
            match input.read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let ctrl_c = key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl_c || key.code == KeyCode::Char('q') {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(pointer) = pointer_from_mouse(mouse, scale) {
                        wm.handle_pointer(pointer);
                    }
                }
                Event::Resize(columns, rows) => {
                    let (width, height) = scale.pixel_size(columns, rows);
                    wm.resize_viewport(width, height);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        wm.advance(now.duration_since(last));
        last = now;
    }
}

fn demo_options() -> ManagerOptions {
    ManagerOptions {
        taskbar: true,
        project_title: "pane-wm demo".to_string(),
        start_menu_items: vec![
            StartMenuItem {
                name: "Notes".to_string(),
                click: "open-notes".to_string(),
            },
            StartMenuItem {
                name: "About".to_string(),
                click: "open-about".to_string(),
            },
        ],
        data: json!({"notes": {"title": "Groceries", "done": false}}),
        ..ManagerOptions::default()
    }
}

fn open_notes(wm: &mut WindowManager) {
    let content = indoc! {r#"
        <label>Title</label>
        <input type="text" data-bind="notes.title" />
        <input type="checkbox" data-bind="notes.done" />
        <p data-bind="notes.title"></p>
    "#};
    wm.show_window(PaneSpec {
        width: Some(320.0),
        height: Some(160.0),
        one_instance: true,
        ..PaneSpec::new("Notes", content)
    });
}

fn install_demo(wm: &mut WindowManager) {
    wm.register_handler("open-notes", |wm, _| open_notes(wm));
    wm.register_handler("open-about", |wm, _| {
        let version = wm.options().version.clone();
        wm.dialog_box(&format!("pane-wm {version}"), false);
    });
    open_notes(wm);
}
