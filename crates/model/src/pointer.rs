//! Screen-space pointer output.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since the tracking session started.
pub type TimestampNs = u64;

/// Coordinate published for a hidden pointer.
pub const HIDDEN_SENTINEL: f32 = -1.0;

/// Target screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl ScreenSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A pixel position on the target screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether the point lies within `[0, width] × [0, height]`.
    pub fn is_within(&self, screen: &ScreenSize) -> bool {
        (0.0..=screen.width).contains(&self.x) && (0.0..=screen.height).contains(&self.y)
    }
}

/// What the overlay and cursor sinks should do with the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPosition {
    /// Show the pointer at this position.
    Visible(ScreenPoint),
    /// No face or eyes: hide the pointer and leave the cursor alone.
    Hidden,
}

impl PointerPosition {
    pub fn point(&self) -> Option<ScreenPoint> {
        match self {
            Self::Visible(p) => Some(*p),
            Self::Hidden => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    /// Flat coordinates for sinks that speak the `(-1, -1)` convention.
    pub fn to_sentinel(&self) -> (f32, f32) {
        match self {
            Self::Visible(p) => (p.x, p.y),
            Self::Hidden => (HIDDEN_SENTINEL, HIDDEN_SENTINEL),
        }
    }

    /// Any negative coordinate means hidden.
    pub fn from_sentinel(x: f32, y: f32) -> Self {
        if x < 0.0 || y < 0.0 {
            Self::Hidden
        } else {
            Self::Visible(ScreenPoint::new(x, y))
        }
    }
}

/// Everything the pipeline publishes for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerFrame {
    /// Frame timestamp.
    pub timestamp_ns: TimestampNs,

    /// Unsmoothed position for the overlay renderer.
    pub overlay: PointerPosition,

    /// Smoothed position for cursor injection.
    pub cursor: PointerPosition,

    /// A blink click fired on this frame.
    pub click: bool,
}

impl PointerFrame {
    /// Frame with the pointer hidden everywhere and no click.
    pub fn hidden(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            overlay: PointerPosition::Hidden,
            cursor: PointerPosition::Hidden,
            click: false,
        }
    }
}
