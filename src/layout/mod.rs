//! Geometry values and the pointer gesture controllers built on them.
//!
//! Controllers never call back into their owner. They register document
//! listeners whose payload is a [`GestureSignal`], and the host routes each
//! signal back to the matching controller method. The method returns the
//! resulting [`GestureEvent`]s for the owner to act on.

pub mod drag;
pub mod rectangle;
pub mod resize;

pub use drag::{DragController, DragOptions};
pub use rectangle::{Point, Rectangle};
pub use resize::{ResizeController, ResizeEdge, ResizeLimits, ResizeOptions};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Started { rect: Rectangle },
    Moved { rect: Rectangle },
    Resized { rect: Rectangle, edge: ResizeEdge },
    Stopped { rect: Rectangle },
}

impl GestureEvent {
    pub fn rect(&self) -> Rectangle {
        match self {
            GestureEvent::Started { rect }
            | GestureEvent::Moved { rect }
            | GestureEvent::Resized { rect, .. }
            | GestureEvent::Stopped { rect } => *rect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    DragGrab,
    DragTrack,
    DragRelease,
    ResizeGrab(ResizeEdge),
    ResizeTrack,
    ResizeRelease,
}

/// Listener payload identifying which controller a pointer event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSignal<K> {
    pub owner: K,
    pub phase: GesturePhase,
}

impl<K> GestureSignal<K> {
    pub fn new(owner: K, phase: GesturePhase) -> Self {
        Self { owner, phase }
    }
}
