//! Rectangles and points in normalized landmark space.
//!
//! All coordinates are normalized to `[0.0, 1.0]` image space.

use serde::{Deserialize, Serialize};

/// Fraction of the raw eye bounding box kept by [`EyeRegion`].
pub const EYE_REGION_SCALE: f32 = 0.8;

/// A 2D normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Image centre; also the gaze fallback when nothing resolves.
    pub const CENTER: Point2D = Point2D { x: 0.5, y: 0.5 };

    /// Arithmetic mean of two points.
    pub fn midpoint(a: &Point2D, b: &Point2D) -> Point2D {
        Point2D {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }

    /// `a * weight + b * (1 - weight)`.
    pub fn blend(a: &Point2D, b: &Point2D, weight: f32) -> Point2D {
        Point2D {
            x: a.x * weight + b.x * (1.0 - weight),
            y: a.y * weight + b.y * (1.0 - weight),
        }
    }
}

/// Axis-aligned bounding box of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Tightest box around the points, or `None` when there are none.
    pub fn enclosing(points: impl IntoIterator<Item = Point2D>) -> Option<Bounds> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let seed = Bounds {
            left: first.x,
            top: first.y,
            right: first.x,
            bottom: first.y,
        };
        Some(points.fold(seed, |b, p| Bounds {
            left: b.left.min(p.x),
            top: b.top.min(p.y),
            right: b.right.max(p.x),
            bottom: b.bottom.max(p.y),
        }))
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Check if a normalized point is within these bounds (inclusive).
    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// The inner rectangle of one eye, shrunk around the raw box centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeRegion {
    pub center: Point2D,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl EyeRegion {
    /// Shrink `raw` to `scale` of its width and height, keeping its centre.
    pub fn from_bounds(raw: &Bounds, scale: f32) -> Self {
        let center = raw.center();
        let width = (raw.width() * scale).max(0.0);
        let height = (raw.height() * scale).max(0.0);
        Self {
            center,
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
            width,
            height,
        }
    }

    /// Area in normalized units squared.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
