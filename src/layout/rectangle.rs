use serde_json::Value;

use crate::error::RectError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are real numbers.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Reads `{x, y}` from a JSON object. Numeric strings are accepted.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let x = number_from(object.get("x")?)?;
        let y = number_from(object.get("y")?)?;
        Some(Self::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    top: f64,
    left: f64,
    bottom: f64,
    right: f64,
    good: bool,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Rectangle {
    pub const INVALID: Rectangle = Rectangle {
        top: f64::NAN,
        left: f64::NAN,
        bottom: f64::NAN,
        right: f64::NAN,
        good: false,
    };

    /// Corner form. Any NaN argument yields an invalid rectangle.
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        if [top, left, bottom, right].iter().any(|v| v.is_nan()) {
            return Self::INVALID;
        }
        Self {
            top,
            left,
            bottom,
            right,
            good: true,
        }
    }

    /// Origin-plus-size form.
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(y, x, y + height, x + width)
    }

    pub fn try_from_value(value: &Value) -> Result<Self, RectError> {
        let object = value.as_object().ok_or(RectError::NotAnObject)?;
        let field = |name: &'static str| -> Result<f64, RectError> {
            let raw = object.get(name).ok_or(RectError::MissingField(name))?;
            number_from(raw).ok_or(RectError::NotANumber(name))
        };
        let has_any = |names: &[&str]| names.iter().any(|n| object.contains_key(*n));

        if has_any(&["top", "left", "bottom", "right"]) {
            let rect = Self::new(
                field("top")?,
                field("left")?,
                field("bottom")?,
                field("right")?,
            );
            return Ok(rect);
        }
        if has_any(&["x", "y", "width", "height"]) {
            let rect = Self::from_origin(
                field("x")?,
                field("y")?,
                field("width")?,
                field("height")?,
            );
            return Ok(rect);
        }
        Err(RectError::UnknownShape)
    }

    /// Like [`Rectangle::try_from_value`] but reports the problem through
    /// the log and hands back [`Rectangle::INVALID`].
    pub fn from_value(value: &Value) -> Self {
        match Self::try_from_value(value) {
            Ok(rect) => rect,
            Err(err) => {
                tracing::warn!(%err, "rejected rectangle input");
                Self::INVALID
            }
        }
    }

    pub fn is_good(&self) -> bool {
        self.good
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn x(&self) -> f64 {
        self.left
    }

    pub fn y(&self) -> f64 {
        self.top
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Inclusive on every edge. Invalid rectangles and points contain nothing.
    pub fn contains_point(&self, point: Point) -> bool {
        if !self.good || !point.is_valid() {
            return false;
        }
        self.left <= point.x
            && point.x <= self.right
            && self.top <= point.y
            && point.y <= self.bottom
    }

    /// Containment test for an untyped `{x, y}` value.
    pub fn contains_value(&self, value: &Value) -> bool {
        Point::from_value(value).is_some_and(|p| self.contains_point(p))
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.top + dy,
            self.left + dx,
            self.bottom + dy,
            self.right + dx,
        )
    }

    pub fn with_origin(&self, x: f64, y: f64) -> Self {
        Self::from_origin(x, y, self.width(), self.height())
    }

    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self::from_origin(self.left, self.top, width, height)
    }

    /// Replaces whichever edges are given, keeping the rest.
    pub fn with_edges(
        &self,
        top: Option<f64>,
        left: Option<f64>,
        bottom: Option<f64>,
        right: Option<f64>,
    ) -> Self {
        Self::new(
            top.unwrap_or(self.top),
            left.unwrap_or(self.left),
            bottom.unwrap_or(self.bottom),
            right.unwrap_or(self.right),
        )
    }
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches("px").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| !v.is_nan())
}
