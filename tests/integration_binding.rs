use std::cell::RefCell;
use std::rc::Rc;

use indoc::indoc;
use serde_json::{Value, json};

use pane_wm::constants::DATA_BIND_ATTR;
use pane_wm::handlers::PaneEvent;
use pane_wm::{Document, ElementId, ManagerOptions, PaneId, PaneSpec, WindowManager};

const FORM: &str = indoc! {r#"
    <input type="text" data-bind="user.name" />
    <span data-bind="user.name"></span>
    <input type="checkbox" data-bind="user.admin" />
    <span data-bind="count"></span>
    <span data-bind="missing.path"></span>
    <button data-click="bump">+</button>
    <button data-click="wm:close">close</button>
"#};

struct Form {
    pane: PaneId,
    name_input: ElementId,
    name_label: ElementId,
    admin: ElementId,
    count: ElementId,
    bump: ElementId,
    close: ElementId,
}

fn setup() -> (WindowManager, Form) {
    let mut doc = Document::new();
    let desk = doc.create_element("div");
    doc.set_attribute(desk, "id", "desk");
    doc.set_size(desk, 800.0, 600.0);
    let body = doc.body();
    doc.append_child(body, desk);
    let options = ManagerOptions {
        data: json!({"user": {"name": "Ada", "admin": false}, "count": 0}),
        ..ManagerOptions::default()
    };
    let mut wm = WindowManager::new(doc, "desk", options).unwrap_or_else(|e| panic!("{e}"));
    wm.register_handler("bump", |wm, _| {
        let next = wm.data("count").and_then(Value::as_i64).unwrap_or(0) + 1;
        wm.set_data("count", json!(next));
    });

    let pane = wm.show_window(PaneSpec::new("Form", FORM)).unwrap_or_else(|| panic!("rejected"));
    wm.settle();
    let content = wm.pane(pane).map(|p| p.elements().content).unwrap_or_else(|| panic!("missing"));
    let doc = wm.document();
    let bound = doc.query_attribute(content, DATA_BIND_ATTR);
    let clicks = doc.query_attribute(content, "data-click");
    assert_eq!((bound.len(), clicks.len()), (5, 2));
    let form = Form {
        pane,
        name_input: bound[0],
        name_label: bound[1],
        admin: bound[2],
        count: bound[3],
        bump: clicks[0],
        close: clicks[1],
    };
    (wm, form)
}

fn value(wm: &WindowManager, element: ElementId) -> String {
    wm.document().get(element).map(|e| e.value().to_string()).unwrap_or_default()
}

#[test]
fn opening_writes_current_values_and_skips_missing_paths() {
    let (wm, form) = setup();
    assert_eq!(value(&wm, form.name_input), "Ada");
    assert_eq!(wm.document().text_content(form.name_label), "Ada");
    assert_eq!(wm.document().text_content(form.count), "0");
    assert!(!wm.document().get(form.admin).is_some_and(|e| e.checked()));
    assert_eq!(wm.bindings().link_count(), 4);
}

#[test]
fn edits_flow_into_the_store_and_other_links() {
    let (mut wm, form) = setup();
    assert!(wm.input_text(form.name_input, "Grace"));
    assert_eq!(wm.data("user.name"), Some(&json!("Grace")));
    assert_eq!(wm.document().text_content(form.name_label), "Grace");

    assert!(wm.set_checked_input(form.admin, true));
    assert_eq!(wm.data("user.admin"), Some(&json!(true)));
}

#[test]
fn writes_to_a_parent_path_refresh_every_link_below() {
    let (mut wm, form) = setup();
    assert!(wm.set_data("user", json!({"name": "Lin", "admin": true})));
    assert_eq!(value(&wm, form.name_input), "Lin");
    assert_eq!(wm.document().text_content(form.name_label), "Lin");
    assert!(wm.document().get(form.admin).is_some_and(|e| e.checked()));

    assert!(!wm.set_data("user.name.first", json!("L")));
    assert_eq!(wm.data("user.name"), Some(&json!("Lin")));
}

#[test]
fn click_bindings_run_named_handlers_and_builtins() {
    let (mut wm, form) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        wm.register_handler("bump", move |wm, ctx| {
            seen.borrow_mut().push((ctx.pane, ctx.event));
            let next = wm.data("count").and_then(Value::as_i64).unwrap_or(0) + 1;
            wm.set_data("count", json!(next));
        });
    }

    wm.click(form.bump);
    wm.click(form.bump);
    assert_eq!(wm.document().text_content(form.count), "2");
    assert_eq!(
        seen.borrow().first().copied(),
        Some((Some(form.pane), PaneEvent::Click { element: form.bump }))
    );

    wm.click(form.close);
    assert!(wm.pane(form.pane).is_none());
    wm.settle();
    assert_eq!(wm.bindings().link_count(), 0);
}

#[test]
fn replacing_the_data_option_refreshes_resolvable_links() {
    let (mut wm, form) = setup();
    wm.set_option_value("data", json!({"user": {"name": "Zed", "admin": true}}))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(wm.document().text_content(form.name_label), "Zed");
    assert!(wm.document().get(form.admin).is_some_and(|e| e.checked()));
    assert_eq!(wm.document().text_content(form.count), "0");
    assert_eq!(wm.data("count"), None);
}
