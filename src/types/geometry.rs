use serde::{Deserialize, Serialize};

/// Pointer position in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Bounding region of a rendered tab element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open on the right and bottom edges so adjacent tabs never both hit.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// A tab element's label and where it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabBounds {
    pub label: String,
    pub rect: Rect,
}

impl TabBounds {
    pub fn new(label: impl Into<String>, rect: Rect) -> Self {
        Self { label: label.into(), rect }
    }

    /// Lay `labels` out left to right as equal-width tabs; handy for hosts
    /// that draw a plain strip.
    pub fn strip<'a>(labels: impl IntoIterator<Item = &'a str>, tab_width: f64, height: f64) -> Vec<Self> {
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Self::new(label, Rect::new(i as f64 * tab_width, 0.0, tab_width, height)))
            .collect()
    }
}
