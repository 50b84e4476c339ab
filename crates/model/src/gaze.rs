//! Per-frame gaze output.

use serde::{Deserialize, Serialize};

use crate::region::{EyeRegion, Point2D};

/// One frame's fused gaze signal.
///
/// Every component is finite. When no eye resolved, `gaze_point` is the
/// image centre and `tracked` is false; consumers must hide the pointer
/// rather than move to the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Fused gaze point in normalized image space.
    pub gaze_point: Point2D,

    /// Depth proxy: 0 when the eyes fill the largest expected area
    /// (closest), rising toward 1 as they shrink.
    pub eye_area: f32,

    /// Same as `gaze_point.x`, read by the transfer function.
    pub eye_position_x: f32,

    /// Same as `gaze_point.y`, read by the transfer function.
    pub eye_position_y: f32,

    /// Raw mean eye-region area (normalized units squared). Grows with eye
    /// openness, so this is the signal the blink detector watches.
    pub openness: f32,

    /// Whether any eye resolved this frame.
    pub tracked: bool,
}

impl GazeSample {
    /// The sample for a frame with no usable eyes.
    pub fn no_signal() -> Self {
        Self::at(Point2D::CENTER, 0.0, 0.0, false)
    }

    pub fn at(gaze_point: Point2D, eye_area: f32, openness: f32, tracked: bool) -> Self {
        Self {
            gaze_point,
            eye_area,
            eye_position_x: gaze_point.x,
            eye_position_y: gaze_point.y,
            openness,
            tracked,
        }
    }

    pub fn has_signal(&self) -> bool {
        self.tracked
    }
}

/// Gaze sample plus the per-eye geometry it was fused from, for overlays
/// that draw the eye boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeEstimate {
    pub sample: GazeSample,
    pub left_region: Option<EyeRegion>,
    pub right_region: Option<EyeRegion>,
}
