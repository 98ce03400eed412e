//! Terminal rendering of a [`Document`].
//!
//! The engine works in pixels; a terminal works in cells. [`CellScale`]
//! converts between the two and [`render_document`] paints every boxed
//! element in paint order. All drawing goes through [`UiFrame`], which clips
//! to the visible area so boxes that drift off screen never touch the buffer
//! outside it.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Clear, Widget};

use crate::dom::{Document, ElementId};
use crate::layout::{Point, Rectangle};

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Offscreen frame over an existing buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Writes one line of text at `(x, y)`, cut at the right edge of `bounds`
    /// and of the frame.
    pub fn set_string(&mut self, bounds: Rect, x: u16, y: u16, text: &str, style: Style) {
        if let Some(bounds) = self.clip_rect(bounds) {
            safe_set_string(self.buffer, bounds, x, y, text, style);
        }
    }
}

/// Size of one terminal cell in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

impl CellScale {
    /// Cells covered by `rect`. Parts left of or above the origin are cut off.
    pub fn to_cells(&self, rect: Rectangle) -> Rect {
        let x0 = (rect.left() / self.cell_width).floor().max(0.0);
        let y0 = (rect.top() / self.cell_height).floor().max(0.0);
        let x1 = (rect.right() / self.cell_width).ceil().max(x0);
        let y1 = (rect.bottom() / self.cell_height).ceil().max(y0);
        let clamp = |v: f64| v.min(f64::from(u16::MAX)) as u16;
        Rect {
            x: clamp(x0),
            y: clamp(y0),
            width: clamp(x1 - x0),
            height: clamp(y1 - y0),
        }
    }

    /// Pixel at the center of a cell.
    pub fn to_pixels(&self, column: u16, row: u16) -> Point {
        Point::new(
            (f64::from(column) + 0.5) * self.cell_width,
            (f64::from(row) + 0.5) * self.cell_height,
        )
    }

    /// Pixel size of a terminal of `columns` x `rows`.
    pub fn pixel_size(&self, columns: u16, rows: u16) -> (f64, f64) {
        (
            f64::from(columns) * self.cell_width,
            f64::from(rows) * self.cell_height,
        )
    }
}

enum Paint {
    Window,
    TitleBar,
    Button,
    Taskbar,
    Plain,
}

fn classify<L>(doc: &Document<L>, id: ElementId) -> Paint {
    let Some(element) = doc.get(id) else {
        return Paint::Plain;
    };
    let classes = element.attribute("class").unwrap_or("");
    if element.tag() == "button" {
        Paint::Button
    } else if classes.split_whitespace().any(|c| c.ends_with("-window")) {
        Paint::Window
    } else if classes.split_whitespace().any(|c| c.ends_with("-title-bar")) {
        Paint::TitleBar
    } else if classes.split_whitespace().any(|c| c.ends_with("-tray")) {
        Paint::Taskbar
    } else {
        Paint::Plain
    }
}

/// Text of the element's own text children, whitespace collapsed.
fn own_text<L>(doc: &Document<L>, id: ElementId) -> String {
    let Some(element) = doc.get(id) else {
        return String::new();
    };
    let text: Vec<String> = element
        .children()
        .iter()
        .filter(|child| doc.get(**child).is_some_and(|c| c.is_text()))
        .map(|child| doc.text_content(*child))
        .collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Paints `doc` into `frame`. Returns the number of boxes drawn.
pub fn render_document<L>(frame: &mut UiFrame<'_>, doc: &Document<L>, scale: CellScale) -> usize {
    let mut drawn = 0;
    for (id, rect) in doc.paint_order() {
        let area = scale.to_cells(rect);
        if area.width == 0 || area.height == 0 {
            continue;
        }
        let faded = doc.style(id).is_some_and(|s| s.opacity < 1.0);
        let mut style = Style::default();
        if faded {
            style = style.add_modifier(Modifier::DIM);
        }

        let text = own_text(doc, id);
        let mut text_x = area.x;
        match classify(doc, id) {
            Paint::Window => {
                frame.render_widget(Clear, area);
                frame.render_widget(Block::bordered().border_style(style), area);
            }
            Paint::TitleBar => {
                let bar = style.bg(Color::Blue).fg(Color::White);
                frame.render_widget(Block::default().style(bar), area);
                style = bar;
                text_x = text_x.saturating_add(1);
            }
            Paint::Button => {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Paint::Taskbar => {
                let bar = style.bg(Color::DarkGray);
                frame.render_widget(Block::default().style(bar), area);
                style = bar;
            }
            Paint::Plain => {}
        }
        if !text.is_empty() {
            frame.set_string(area, text_x, area.y, &text, style);
        }
        drawn += 1;
    }
    drawn
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}
