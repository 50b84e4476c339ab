//! Eye geometry from raw landmarks.
//!
//! Pure functions over a [`LandmarkSet`] and an eye topology. Unresolvable
//! indices are skipped; an eye with no resolvable points has no region.

use ipoint_model::landmark::{EyeTopology, LandmarkSet};
use ipoint_model::region::{Bounds, EyeRegion, Point2D, EYE_REGION_SCALE};

/// Region and pupil position measured for one eye in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyeGeometry {
    pub region: Option<EyeRegion>,
    pub pupil: Option<Point2D>,
}

impl EyeGeometry {
    /// Measure one eye.
    pub fn measure(landmarks: &LandmarkSet, eye: &EyeTopology) -> Self {
        Self {
            region: eye_region(landmarks, &eye.contour),
            pupil: pupil_position(landmarks, eye),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.region.is_some() || self.pupil.is_some()
    }
}

/// Raw bounding box of the resolvable contour points.
pub fn contour_bounds(landmarks: &LandmarkSet, contour: &[usize]) -> Option<Bounds> {
    Bounds::enclosing(landmarks.resolve(contour).map(Point2D::from))
}

/// The eye region: the contour's bounding box shrunk to 80% around its
/// centre, which keeps eyelid and eyebrow jitter out of the signal.
pub fn eye_region(landmarks: &LandmarkSet, contour: &[usize]) -> Option<EyeRegion> {
    contour_bounds(landmarks, contour).map(|raw| EyeRegion::from_bounds(&raw, EYE_REGION_SCALE))
}

/// Centroid of the resolvable contour points.
pub fn pupil_proxy(landmarks: &LandmarkSet, contour: &[usize]) -> Option<Point2D> {
    let (count, sum_x, sum_y) = landmarks
        .resolve(contour)
        .fold((0usize, 0.0f32, 0.0f32), |(n, sx, sy), p| {
            (n + 1, sx + p.x, sy + p.y)
        });

    if count == 0 {
        return None;
    }
    Some(Point2D::new(sum_x / count as f32, sum_y / count as f32))
}

/// Pupil position: the iris landmark when the mesh has one, otherwise
/// the contour centroid.
pub fn pupil_position(landmarks: &LandmarkSet, eye: &EyeTopology) -> Option<Point2D> {
    eye.iris
        .and_then(|index| landmarks.get(index))
        .map(Point2D::from)
        .or_else(|| pupil_proxy(landmarks, &eye.contour))
}
