use std::cell::Cell;
use std::rc::Rc;

use pane_wm::layout::Rectangle;
use pane_wm::{Document, ManagerOptions, PaneId, PaneSpec, PointerEvent, WindowManager};

fn manager() -> WindowManager {
    let mut doc = Document::new();
    let desk = doc.create_element("div");
    doc.set_attribute(desk, "id", "desk");
    doc.set_size(desk, 1000.0, 800.0);
    let body = doc.body();
    doc.append_child(body, desk);
    WindowManager::new(doc, "desk", ManagerOptions::default()).unwrap_or_else(|e| panic!("{e}"))
}

fn placed(title: &str, left: f64, top: f64) -> PaneSpec {
    PaneSpec {
        width: Some(300.0),
        height: Some(200.0),
        left: Some(left),
        top: Some(top),
        ..PaneSpec::new(title, "<p>body</p>")
    }
}

fn open(wm: &mut WindowManager, spec: PaneSpec) -> PaneId {
    let id = wm.show_window(spec).unwrap_or_else(|| panic!("rejected"));
    wm.settle();
    id
}

fn geometry(wm: &WindowManager, id: PaneId) -> Rectangle {
    wm.pane(id).map(|p| p.geometry()).unwrap_or_else(|| panic!("missing pane"))
}

fn gesture(wm: &mut WindowManager, from: (f64, f64), to: (f64, f64)) {
    wm.handle_pointer(PointerEvent::down(from.0, from.1));
    wm.handle_pointer(PointerEvent::moved(to.0, to.1));
    wm.handle_pointer(PointerEvent::up(to.0, to.1));
}

#[test]
fn titlebar_drag_moves_the_pane_and_its_handles() {
    let mut wm = manager();
    let id = open(&mut wm, placed("Drag", 100.0, 100.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(100.0, 100.0, 300.0, 200.0));

    gesture(&mut wm, (150.0, 110.0), (250.0, 210.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(200.0, 200.0, 300.0, 200.0));
    let container = wm.pane(id).map(|p| p.elements().container).unwrap_or_else(|| panic!("missing"));
    assert_eq!(
        wm.document().local_rect(container),
        Some(Rectangle::from_origin(200.0, 200.0, 300.0, 200.0))
    );

    // The corner handle followed, so a resize grab lands at the new corner.
    gesture(&mut wm, (497.0, 397.0), (517.0, 407.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(200.0, 200.0, 320.0, 210.0));
}

#[test]
fn drag_is_clamped_to_the_viewport() {
    let mut wm = manager();
    let id = open(&mut wm, placed("Clamp", 100.0, 100.0));
    gesture(&mut wm, (150.0, 110.0), (2000.0, 2000.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(698.0, 598.0, 300.0, 200.0));

    gesture(&mut wm, (750.0, 608.0), (-500.0, -500.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(0.0, 0.0, 300.0, 200.0));
}

#[test]
fn corner_resize_grows_and_stops_at_the_minimum_size() {
    let mut wm = manager();
    let id = open(&mut wm, placed("Resize", 100.0, 100.0));

    gesture(&mut wm, (397.0, 297.0), (447.0, 347.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(100.0, 100.0, 350.0, 250.0));

    // Default limits are 200 wide and 100 tall.
    gesture(&mut wm, (447.0, 347.0), (247.0, 147.0));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(100.0, 100.0, 200.0, 100.0));
}

#[test]
fn pressing_a_lower_pane_raises_it() {
    let mut wm = manager();
    let below = open(&mut wm, placed("Below", 100.0, 100.0));
    let above = open(&mut wm, placed("Above", 150.0, 150.0));
    assert_eq!(wm.focused(), Some(above));

    wm.handle_pointer(PointerEvent::down(120.0, 250.0));
    wm.handle_pointer(PointerEvent::up(120.0, 250.0));
    assert_eq!(wm.focused(), Some(below));
    let z = |id| wm.pane(id).and_then(|p| p.z_index());
    assert!(z(below) > z(above));
}

#[test]
fn titlebar_buttons_respond_to_pointer_clicks() {
    let mut wm = manager();
    let id = open(&mut wm, placed("Buttons", 100.0, 100.0));

    // Buttons sit from the right edge: exit, maximize, minimize.
    wm.handle_pointer(PointerEvent::down(370.0, 110.0));
    wm.handle_pointer(PointerEvent::up(370.0, 110.0));
    assert!(wm.pane(id).is_some_and(|p| p.is_maximized()));
    assert_eq!(geometry(&wm, id), Rectangle::from_origin(1.0, 1.0, 998.0, 798.0));

    let exit = Rectangle::from_origin(1.0, 1.0, 998.0, 798.0).right() - 10.0;
    wm.handle_pointer(PointerEvent::down(exit, 10.0));
    wm.handle_pointer(PointerEvent::up(exit, 10.0));
    assert!(wm.pane(id).is_none());
}

#[test]
fn gesture_callbacks_fire_per_move() {
    let mut wm = manager();
    let drags = Rc::new(Cell::new(0));
    let resizes = Rc::new(Cell::new(0));
    {
        let drags = Rc::clone(&drags);
        wm.register_handler("dragged", move |_, _| drags.set(drags.get() + 1));
        let resizes = Rc::clone(&resizes);
        wm.register_handler("resized", move |_, _| resizes.set(resizes.get() + 1));
    }
    let id = open(
        &mut wm,
        PaneSpec {
            on_drag: Some("dragged".into()),
            on_resize: Some("resized".into()),
            ..placed("Callbacks", 100.0, 100.0)
        },
    );

    wm.handle_pointer(PointerEvent::down(150.0, 110.0));
    wm.handle_pointer(PointerEvent::moved(160.0, 110.0));
    wm.handle_pointer(PointerEvent::moved(170.0, 110.0));
    wm.handle_pointer(PointerEvent::up(170.0, 110.0));
    assert_eq!((drags.get(), resizes.get()), (2, 0));

    let rect = geometry(&wm, id);
    gesture(&mut wm, (rect.right() - 2.0, rect.bottom() - 2.0), (rect.right() + 8.0, rect.bottom()));
    assert_eq!((drags.get(), resizes.get()), (2, 1));
}

#[test]
fn panes_without_drag_or_titlebar_stay_put() {
    let mut wm = manager();
    let fixed = open(&mut wm, PaneSpec { drag: false, ..placed("Fixed", 100.0, 100.0) });
    let bare = open(&mut wm, PaneSpec { show_titlebar: false, ..placed("Bare", 500.0, 400.0) });
    assert!(!wm.pane(fixed).is_some_and(|p| p.has_drag()));
    assert!(!wm.pane(bare).is_some_and(|p| p.has_drag()));

    gesture(&mut wm, (150.0, 110.0), (250.0, 210.0));
    assert_eq!(geometry(&wm, fixed), Rectangle::from_origin(100.0, 100.0, 300.0, 200.0));
}
