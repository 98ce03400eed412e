use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::dom::PointerEvent;
use crate::ui::CellScale;

/// Maps a terminal mouse event onto a pointer sample at the center of the
/// cell it hit. Only the left button drives pointers; scrolling and other
/// buttons are dropped.
pub fn pointer_from_mouse(event: MouseEvent, scale: CellScale) -> Option<PointerEvent> {
    let point = scale.to_pixels(event.column, event.row);
    let pointer = match event.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerEvent::down(point.x, point.y),
        MouseEventKind::Up(MouseButton::Left) => PointerEvent::up(point.x, point.y),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            PointerEvent::moved(point.x, point.y)
        }
        _ => return None,
    };
    Some(pointer)
}
