use std::io::Write;

use indoc::indoc;
use pane_wm::layout::Rectangle;
use pane_wm::{ConfigError, Document, ManagerOptions, PaneSpec, PointerEvent, WindowManager};
use serde_json::json;

fn manager(options: ManagerOptions) -> WindowManager {
    let mut doc = Document::new();
    let desk = doc.create_element("div");
    doc.set_attribute(desk, "id", "desk");
    doc.set_size(desk, 1000.0, 800.0);
    let body = doc.body();
    doc.append_child(body, desk);
    WindowManager::new(doc, "desk", options).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn options_load_from_a_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|e| panic!("{e}"));
    file.write_all(
        indoc! {r#"
            {
                "taskbar": true,
                "minWidth": 150,
                "dataURL": "api?x=1",
                "themePrefix": "blue",
                "startMenuItems": [{"name": "Notes", "click": "open-notes"}],
                "data": {"notes": {"title": "Groceries"}}
            }
        "#}
        .as_bytes(),
    )
    .unwrap_or_else(|e| panic!("{e}"));

    let options = ManagerOptions::load(file.path()).unwrap_or_else(|e| panic!("{e}"));
    assert!(options.taskbar);
    assert_eq!(options.min_width, 150.0);
    assert_eq!(options.min_height, 100.0);
    assert_eq!(options.data_url, "api?x=1");
    assert_eq!(options.theme(), "blue");
    assert_eq!(options.start_menu_items.len(), 1);

    let wm = manager(options);
    assert_eq!(wm.data("notes.title"), Some(&json!("Groceries")));
    assert!(wm.taskbar().is_some());
}

#[test]
fn unreadable_and_malformed_files_are_errors() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let missing = ManagerOptions::load(dir.path().join("absent.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"taskbar\": ").unwrap_or_else(|e| panic!("{e}"));
    assert!(matches!(ManagerOptions::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn dynamic_options_reject_unknown_keys_and_bad_values() {
    let mut wm = manager(ManagerOptions::default());
    assert!(matches!(
        wm.set_option_value("wobble", json!(1)),
        Err(ConfigError::UnknownOption(key)) if key == "wobble"
    ));
    assert!(matches!(
        wm.set_option_value("minWidth", json!("wide")),
        Err(ConfigError::InvalidValue { key, .. }) if key == "minWidth"
    ));
    assert_eq!(wm.options().min_width, 200.0);

    wm.set_option_value("borderRadius", json!(4)).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(wm.options().border_radius, "4");
}

#[test]
fn theme_changes_swap_chrome_classes() {
    let mut wm = manager(ManagerOptions::default());
    let id = wm
        .show_window(PaneSpec { round_corners: true, ..PaneSpec::new("Themed", "") })
        .unwrap_or_else(|| panic!("rejected"));
    wm.settle();
    let elements = wm.pane(id).map(|p| p.elements()).unwrap_or_else(|| panic!("missing"));
    let has = |wm: &WindowManager, el, class: &str| wm.document().get(el).is_some_and(|e| e.has_class(class));
    assert!(has(&wm, elements.container, "light-window"));

    wm.set_option_value("themePrefix", json!("blue")).unwrap_or_else(|e| panic!("{e}"));
    assert!(has(&wm, elements.container, "blue-window"));
    assert!(!has(&wm, elements.container, "light-window"));
    let titlebar = elements.titlebar.unwrap_or_else(|| panic!("no titlebar"));
    assert!(has(&wm, titlebar, "blue-title-bar"));

    wm.set_option_value("borderRadius", json!("6")).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(wm.document().attribute(elements.container, "data-border-radius"), Some("6px"));
}

#[test]
fn minimum_size_changes_apply_to_open_panes() {
    let mut wm = manager(ManagerOptions::default());
    let id = wm
        .show_window(PaneSpec {
            width: Some(300.0),
            height: Some(200.0),
            left: Some(100.0),
            top: Some(100.0),
            ..PaneSpec::new("Limits", "")
        })
        .unwrap_or_else(|| panic!("rejected"));
    wm.settle();
    wm.set_option_value("minWidth", json!(260)).unwrap_or_else(|e| panic!("{e}"));

    wm.handle_pointer(PointerEvent::down(397.0, 297.0));
    wm.handle_pointer(PointerEvent::moved(297.0, 297.0));
    wm.handle_pointer(PointerEvent::up(297.0, 297.0));
    assert_eq!(
        wm.pane(id).map(|p| p.geometry()),
        Some(Rectangle::from_origin(100.0, 100.0, 260.0, 200.0))
    );
}

#[test]
fn background_option_creates_and_updates_the_image() {
    let mut wm = manager(ManagerOptions::default());
    assert!(wm.background().is_none());
    wm.set_option_value("background", json!("a.png")).unwrap_or_else(|e| panic!("{e}"));
    let background = wm.background().unwrap_or_else(|| panic!("no background"));
    assert_eq!(wm.document().attribute(background.image(), "src"), Some("a.png"));

    wm.set_option_value("background", json!("b.png")).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(wm.background(), Some(background));
    assert_eq!(wm.document().attribute(background.image(), "src"), Some("b.png"));
}
