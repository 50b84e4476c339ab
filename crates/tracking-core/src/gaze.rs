//! Gaze estimation: fuse both eyes' geometry into one gaze sample.
//!
//! # Fusion
//!
//! 1. **Measure** each eye: inner region and pupil position.
//! 2. **Region centre**: in two-eye mode the mean of both region centres,
//!    else whichever exists. In one-eye mode the right eye (on-screen left),
//!    falling back to the left eye.
//! 3. **Gaze point**: with both pupils, 60% pupil midpoint + 40% region
//!    centre; with one pupil, that pupil; otherwise the region centre.
//! 4. **Depth proxy**: mean region area mapped to `[0, 1]`, 0 = closest.
//!
//! When nothing resolves the sample sits at the image centre and is flagged
//! as untracked.

use ipoint_model::gaze::{GazeEstimate, GazeSample};
use ipoint_model::landmark::{EyeTopology, LandmarkSet, LEFT_EYE, RIGHT_EYE};
use ipoint_model::region::{EyeRegion, Point2D};

use crate::geometry::EyeGeometry;

/// Largest eye-region area expected in normalized landmark units.
pub const MAX_EXPECTED_EYE_AREA: f32 = 0.01;

/// Weight of the pupil midpoint when blended with the region centre.
pub const PUPIL_WEIGHT: f32 = 0.6;

/// Gaze estimator. Holds only the eye-mode flag and topology; estimation
/// itself is a pure function of the landmarks.
#[derive(Debug, Clone)]
pub struct GazeEstimator {
    left: EyeTopology,
    right: EyeTopology,
    use_one_eye: bool,
}

impl GazeEstimator {
    /// Estimator over the canonical face-mesh topology.
    pub fn new(use_one_eye: bool) -> Self {
        Self::with_topology(LEFT_EYE, RIGHT_EYE, use_one_eye)
    }

    pub fn with_topology(left: EyeTopology, right: EyeTopology, use_one_eye: bool) -> Self {
        Self {
            left,
            right,
            use_one_eye,
        }
    }

    /// Switch between one-eye and two-eye fusion. Takes effect on the next
    /// call to [`estimate`](Self::estimate).
    pub fn set_use_one_eye(&mut self, use_one_eye: bool) {
        self.use_one_eye = use_one_eye;
    }

    pub fn use_one_eye(&self) -> bool {
        self.use_one_eye
    }

    /// Estimate gaze for one frame, keeping the per-eye regions.
    pub fn estimate(&self, landmarks: &LandmarkSet) -> GazeEstimate {
        let left = EyeGeometry::measure(landmarks, &self.left);
        let right = EyeGeometry::measure(landmarks, &self.right);

        let sample = if self.use_one_eye {
            fuse_one_eye(&left, &right)
        } else {
            fuse_both_eyes(&left, &right)
        };

        GazeEstimate {
            sample,
            left_region: left.region,
            right_region: right.region,
        }
    }
}

impl Default for GazeEstimator {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Estimate gaze over the canonical topology.
pub fn estimate(landmarks: &LandmarkSet, use_one_eye: bool) -> GazeSample {
    GazeEstimator::new(use_one_eye).estimate(landmarks).sample
}

/// Map an eye area to the depth proxy: 0 at or above the largest expected
/// area, approaching 1 as the area shrinks. A zero area (no eyes) maps to 0.
pub fn depth_proxy(area: f32) -> f32 {
    if area <= 0.0 {
        return 0.0;
    }
    (MAX_EXPECTED_EYE_AREA - area).clamp(0.0, MAX_EXPECTED_EYE_AREA) / MAX_EXPECTED_EYE_AREA
}

fn fuse_one_eye(left: &EyeGeometry, right: &EyeGeometry) -> GazeSample {
    let region = right.region.or(left.region);
    let point = right
        .pupil
        .or(left.pupil)
        .or_else(|| region.map(|r| r.center));
    let area = region.map_or(0.0, |r| r.area());
    sample_from(point, area)
}

fn fuse_both_eyes(left: &EyeGeometry, right: &EyeGeometry) -> GazeSample {
    let center = match (&left.region, &right.region) {
        (Some(l), Some(r)) => Some(Point2D::midpoint(&l.center, &r.center)),
        (Some(only), None) | (None, Some(only)) => Some(only.center),
        (None, None) => None,
    };

    let point = match (left.pupil, right.pupil) {
        (Some(lp), Some(rp)) => {
            let pupils = Point2D::midpoint(&lp, &rp);
            Some(match center {
                Some(c) => Point2D::blend(&pupils, &c, PUPIL_WEIGHT),
                None => pupils,
            })
        }
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => center,
    };

    sample_from(point, mean_area(left.region.as_ref(), right.region.as_ref()))
}

fn mean_area(left: Option<&EyeRegion>, right: Option<&EyeRegion>) -> f32 {
    match (left, right) {
        (Some(l), Some(r)) => (l.area() + r.area()) / 2.0,
        (Some(only), None) | (None, Some(only)) => only.area(),
        (None, None) => 0.0,
    }
}

fn sample_from(point: Option<Point2D>, area: f32) -> GazeSample {
    match point {
        Some(p) => GazeSample::at(p, depth_proxy(area), area, true),
        None => GazeSample::no_signal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipoint_model::landmark::{LandmarkPoint, FACE_MESH_LANDMARKS, REFINED_FACE_MESH_LANDMARKS};

    const HIDDEN: LandmarkPoint = LandmarkPoint {
        x: f32::NAN,
        y: f32::NAN,
    };

    /// Place an eye's 16 contour points evenly on an ellipse around `center`
    /// with radii `r`.
    fn place_eye(points: &mut [LandmarkPoint], eye: &EyeTopology, center: (f32, f32), r: (f32, f32)) {
        for (k, &index) in eye.contour.iter().enumerate() {
            let angle = k as f32 * std::f32::consts::TAU / 16.0;
            points[index] = LandmarkPoint::new(
                center.0 + r.0 * angle.cos(),
                center.1 + r.1 * angle.sin(),
            );
        }
    }

    fn face(left: Option<(f32, f32)>, right: Option<(f32, f32)>, len: usize) -> LandmarkSet {
        let mut points = vec![LandmarkPoint::new(0.5, 0.9); len];
        for eye in [LEFT_EYE, RIGHT_EYE] {
            for &index in &eye.contour {
                points[index] = HIDDEN;
            }
        }
        if let Some(c) = left {
            place_eye(&mut points, &LEFT_EYE, c, (0.05, 0.02));
        }
        if let Some(c) = right {
            place_eye(&mut points, &RIGHT_EYE, c, (0.05, 0.02));
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn test_both_eyes_fuse_to_midpoint() {
        let set = face(Some((0.3, 0.5)), Some((0.7, 0.5)), FACE_MESH_LANDMARKS);
        let sample = estimate(&set, false);

        assert!(sample.has_signal());
        assert!((sample.gaze_point.x - 0.5).abs() < 1e-5);
        assert!((sample.gaze_point.y - 0.5).abs() < 1e-5);
        assert_eq!(sample.eye_position_x, sample.gaze_point.x);
    }

    #[test]
    fn test_pupils_outweigh_region_centres() {
        // Iris landmarks pulled right of both eye centres.
        let base = face(Some((0.3, 0.5)), Some((0.7, 0.5)), REFINED_FACE_MESH_LANDMARKS);
        let mut points = base.points().to_vec();
        points[468] = LandmarkPoint::new(0.35, 0.5);
        points[473] = LandmarkPoint::new(0.75, 0.5);
        let set = LandmarkSet::new(points);

        let sample = estimate(&set, false);
        // 0.6 * 0.55 + 0.4 * 0.5
        assert!((sample.gaze_point.x - 0.53).abs() < 1e-5);
    }

    #[test]
    fn test_one_eye_mode_prefers_right_eye() {
        let set = face(Some((0.3, 0.4)), Some((0.7, 0.6)), FACE_MESH_LANDMARKS);
        let sample = estimate(&set, true);
        assert!((sample.gaze_point.x - 0.7).abs() < 1e-5);
        assert!((sample.gaze_point.y - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_one_eye_mode_falls_back_to_left() {
        let set = face(Some((0.3, 0.4)), None, FACE_MESH_LANDMARKS);
        let sample = estimate(&set, true);
        assert!(sample.has_signal());
        assert!((sample.gaze_point.x - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_right_eye_only_is_mode_independent() {
        let set = face(None, Some((0.65, 0.45)), FACE_MESH_LANDMARKS);
        let both = estimate(&set, false);
        let one = estimate(&set, true);
        assert_eq!(both.gaze_point, one.gaze_point);
        assert_eq!(both.eye_area, one.eye_area);
    }

    #[test]
    fn test_empty_frame_is_untracked_center() {
        let sample = estimate(&LandmarkSet::empty(), false);
        assert!(!sample.has_signal());
        assert_eq!(sample.gaze_point, Point2D::CENTER);
        assert_eq!(sample.eye_area, 0.0);

        let sample = estimate(&LandmarkSet::empty(), true);
        assert!(!sample.has_signal());
    }

    #[test]
    fn test_huge_coordinates_do_not_poison_the_sample() {
        let mut points = vec![LandmarkPoint::new(0.5, 0.9); FACE_MESH_LANDMARKS];
        for &index in LEFT_EYE.contour.iter().chain(RIGHT_EYE.contour.iter()) {
            points[index] = LandmarkPoint::new(3.0e38, 0.5);
        }
        let sample = estimate(&LandmarkSet::new(points), false);
        assert!(!sample.has_signal());
        assert_eq!(sample.gaze_point, Point2D::CENTER);

        // One garbage point among good ones is skipped, not averaged in.
        let mut points = face(Some((0.3, 0.5)), Some((0.7, 0.5)), FACE_MESH_LANDMARKS)
            .points()
            .to_vec();
        points[LEFT_EYE.contour[3]] = LandmarkPoint::new(-3.0e38, 0.5);
        let sample = estimate(&LandmarkSet::new(points), false);
        assert!(sample.has_signal());
        assert!(sample.gaze_point.x.is_finite() && sample.eye_area.is_finite());
        assert!((sample.gaze_point.x - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_estimation_is_deterministic() {
        let set = face(Some((0.31, 0.52)), Some((0.69, 0.48)), FACE_MESH_LANDMARKS);
        let estimator = GazeEstimator::default();
        let a = estimator.estimate(&set);
        let b = estimator.estimate(&set);
        assert_eq!(a.sample.gaze_point.x.to_bits(), b.sample.gaze_point.x.to_bits());
        assert_eq!(a.sample.gaze_point.y.to_bits(), b.sample.gaze_point.y.to_bits());
        assert_eq!(a.sample.eye_area.to_bits(), b.sample.eye_area.to_bits());
        assert!(a.left_region.is_some() && a.right_region.is_some());
    }

    #[test]
    fn test_mode_flag_is_hot_swappable() {
        let set = face(Some((0.3, 0.5)), Some((0.7, 0.5)), FACE_MESH_LANDMARKS);
        let mut estimator = GazeEstimator::new(false);
        let fused = estimator.estimate(&set).sample;
        estimator.set_use_one_eye(true);
        let single = estimator.estimate(&set).sample;
        assert!((fused.gaze_point.x - 0.5).abs() < 1e-5);
        assert!((single.gaze_point.x - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_depth_proxy_range() {
        assert_eq!(depth_proxy(0.0), 0.0);
        assert_eq!(depth_proxy(MAX_EXPECTED_EYE_AREA), 0.0);
        assert_eq!(depth_proxy(0.05), 0.0);
        assert!((depth_proxy(0.0025) - 0.75).abs() < 1e-6);
        assert!(depth_proxy(1e-6) < 1.0);
    }

    #[test]
    fn test_eye_area_reports_depth_and_openness() {
        let set = face(Some((0.3, 0.5)), Some((0.7, 0.5)), FACE_MESH_LANDMARKS);
        let sample = estimate(&set, false);
        // Raw box 0.1 x 0.04, shrunk to 0.08 x 0.032.
        assert!((sample.openness - 0.00256).abs() < 1e-6);
        assert!((sample.eye_area - depth_proxy(sample.openness)).abs() < 1e-6);
    }
}
