//! Facial landmark input and the eye topology used to read it.
//!
//! The external face-mesh detector supplies one [`LandmarkSet`] per frame:
//! normalized `(x, y)` points in image space, indexed by a fixed canonical
//! topology of 468 points (478 when iris refinement is enabled). A frame
//! without a face is an empty set.

use serde::{Deserialize, Serialize};

use crate::region::Point2D;

/// Landmark count of the canonical face mesh.
pub const FACE_MESH_LANDMARKS: usize = 468;

/// Landmark count of the face mesh with refined iris points.
pub const REFINED_FACE_MESH_LANDMARKS: usize = 478;

/// Number of contour points per eye.
pub const EYE_CONTOUR_POINTS: usize = 16;

/// Coordinate range a landmark must fall in to be used. Detectors place
/// points slightly outside the image near its edges; anything further out
/// is noise.
pub const LANDMARK_COORD_RANGE: (f32, f32) = (-1.0, 2.0);

/// A single normalized landmark point in image space.
///
/// Serialized compactly as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite and within [`LANDMARK_COORD_RANGE`].
    pub fn is_usable(&self) -> bool {
        let (min, max) = LANDMARK_COORD_RANGE;
        (min..=max).contains(&self.x) && (min..=max).contains(&self.y)
    }
}

impl From<[f32; 2]> for LandmarkPoint {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<LandmarkPoint> for Point2D {
    fn from(point: LandmarkPoint) -> Self {
        Point2D::new(point.x, point.y)
    }
}

impl From<LandmarkPoint> for [f32; 2] {
    fn from(point: LandmarkPoint) -> Self {
        [point.x, point.y]
    }
}

/// All landmarks of one detected face for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// The set for a frame in which no face was found.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resolve a topology index.
    ///
    /// Out-of-range indices and unusable points (non-finite or far outside
    /// the image) both resolve to `None`; callers skip them rather than fail.
    pub fn get(&self, index: usize) -> Option<LandmarkPoint> {
        self.points
            .get(index)
            .copied()
            .filter(LandmarkPoint::is_usable)
    }

    /// Resolve a list of indices, skipping the unresolvable ones.
    pub fn resolve<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl Iterator<Item = LandmarkPoint> + 'a {
        indices.iter().filter_map(move |&i| self.get(i))
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }
}

impl FromIterator<LandmarkPoint> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = LandmarkPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Index topology for one eye: contour points and an optional iris centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeTopology {
    pub contour: [usize; EYE_CONTOUR_POINTS],
    /// Iris centre index. Only resolves on refined meshes.
    pub iris: Option<usize>,
}

impl EyeTopology {
    /// Same contour without the iris lookup.
    pub fn without_iris(self) -> Self {
        Self { iris: None, ..self }
    }
}

/// Left eye contour of the canonical face mesh.
pub const LEFT_EYE: EyeTopology = EyeTopology {
    contour: [
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ],
    iris: Some(468),
};

/// Right eye contour of the canonical face mesh (on-screen left).
pub const RIGHT_EYE: EyeTopology = EyeTopology {
    contour: [
        362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
    ],
    iris: Some(473),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_skips_out_of_range_and_non_finite() {
        let set = LandmarkSet::new(vec![
            LandmarkPoint::new(0.1, 0.2),
            LandmarkPoint::new(f32::NAN, 0.5),
        ]);
        assert_eq!(set.get(0), Some(LandmarkPoint::new(0.1, 0.2)));
        assert_eq!(set.get(1), None);
        assert_eq!(set.get(2), None);
    }

    #[test]
    fn test_points_far_outside_image_are_unresolved() {
        let set = LandmarkSet::new(vec![
            LandmarkPoint::new(-0.05, 1.02),
            LandmarkPoint::new(3.0e38, 0.5),
            LandmarkPoint::new(0.5, -1.5),
            LandmarkPoint::new(f32::INFINITY, 0.5),
        ]);
        assert_eq!(set.get(0), Some(LandmarkPoint::new(-0.05, 1.02)));
        assert_eq!(set.get(1), None);
        assert_eq!(set.get(2), None);
        assert_eq!(set.get(3), None);
    }

    #[test]
    fn test_resolve_keeps_order() {
        let set: LandmarkSet = (0..5)
            .map(|i| LandmarkPoint::new(i as f32 / 10.0, 0.0))
            .collect();
        let xs: Vec<f32> = set.resolve(&[4, 99, 1]).map(|p| p.x).collect();
        assert_eq!(xs, vec![0.4, 0.1]);
    }

    #[test]
    fn test_topologies_fit_the_mesh() {
        for eye in [LEFT_EYE, RIGHT_EYE] {
            assert!(eye.contour.iter().all(|&i| i < FACE_MESH_LANDMARKS));
            let iris = eye.iris.unwrap();
            assert!((FACE_MESH_LANDMARKS..REFINED_FACE_MESH_LANDMARKS).contains(&iris));
        }
    }

    #[test]
    fn test_landmark_set_serializes_as_point_list() {
        let set = LandmarkSet::new(vec![LandmarkPoint::new(0.25, 0.75)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[[0.25,0.75]]");
    }
}
