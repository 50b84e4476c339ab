//! Cursor motion smoothing for the injection sink.
//!
//! Raw gaze positions jitter from frame to frame. The cursor sink gets an
//! exponentially smoothed path; the overlay keeps the raw position so the
//! user still sees where tracking lands.

use ipoint_model::pointer::ScreenPoint;

/// Available smoothing algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingAlgorithm {
    /// Exponential Moving Average.
    ///
    /// `strength` is in [0.0, 1.0], where larger values mean more smoothing.
    Ema { strength: f32 },

    /// No smoothing: pass positions through.
    None,
}

/// Streaming cursor smoother. Feed one position per frame.
#[derive(Debug, Clone)]
pub struct CursorSmoother {
    algorithm: SmoothingAlgorithm,
    last: Option<ScreenPoint>,
}

impl CursorSmoother {
    /// Create a smoother with the given algorithm.
    pub fn new(algorithm: SmoothingAlgorithm) -> Self {
        Self {
            algorithm,
            last: None,
        }
    }

    /// EMA smoother with the given strength.
    pub fn ema(strength: f32) -> Self {
        Self::new(SmoothingAlgorithm::Ema {
            strength: clamp01(strength),
        })
    }

    pub fn algorithm(&self) -> SmoothingAlgorithm {
        self.algorithm
    }

    /// Change EMA strength without losing the current position.
    pub fn set_strength(&mut self, strength: f32) {
        if let SmoothingAlgorithm::Ema { .. } = self.algorithm {
            self.algorithm = SmoothingAlgorithm::Ema {
                strength: clamp01(strength),
            };
        }
    }

    /// Smooth the next target position.
    ///
    /// The first position after construction or [`reset`](Self::reset)
    /// passes through unchanged.
    pub fn push(&mut self, target: ScreenPoint) -> ScreenPoint {
        let next = match (self.algorithm, self.last) {
            (SmoothingAlgorithm::Ema { strength }, Some(prev)) => {
                let alpha = 1.0 - strength;
                ScreenPoint::new(
                    prev.x + (target.x - prev.x) * alpha,
                    prev.y + (target.y - prev.y) * alpha,
                )
            }
            _ => target,
        };
        self.last = Some(next);
        next
    }

    /// Last smoothed position, if any.
    pub fn last(&self) -> Option<ScreenPoint> {
        self.last
    }

    /// Forget the current position (pointer hidden).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for CursorSmoother {
    /// EMA with strength 0.7.
    fn default() -> Self {
        Self::ema(0.7)
    }
}

fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jittery_path() -> Vec<ScreenPoint> {
        // Jittery gaze around (500, 400).
        [
            (500.0, 400.0),
            (530.0, 380.0),
            (480.0, 420.0),
            (520.0, 390.0),
            (490.0, 410.0),
            (510.0, 400.0),
            (500.0, 400.0),
        ]
        .into_iter()
        .map(|(x, y)| ScreenPoint::new(x, y))
        .collect()
    }

    #[test]
    fn test_ema_reduces_jitter() {
        let mut smoother = CursorSmoother::default();
        let smoothed: Vec<ScreenPoint> = jittery_path()
            .into_iter()
            .map(|p| smoother.push(p))
            .collect();

        for p in &smoothed[2..] {
            assert!((p.x - 500.0).abs() < 20.0, "Smoothed x={} too far from center", p.x);
            assert!((p.y - 400.0).abs() < 20.0, "Smoothed y={} too far from center", p.y);
        }
    }

    #[test]
    fn test_first_point_passes_through() {
        let mut smoother = CursorSmoother::ema(0.9);
        assert_eq!(
            smoother.push(ScreenPoint::new(10.0, 20.0)),
            ScreenPoint::new(10.0, 20.0)
        );
    }

    #[test]
    fn test_ema_step() {
        let mut smoother = CursorSmoother::ema(0.7);
        smoother.push(ScreenPoint::new(0.0, 0.0));
        let p = smoother.push(ScreenPoint::new(100.0, 50.0));
        assert!((p.x - 30.0).abs() < 1e-4);
        assert!((p.y - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_smoothing_passes_through() {
        let mut smoother = CursorSmoother::new(SmoothingAlgorithm::None);
        for p in jittery_path() {
            assert_eq!(smoother.push(p), p);
        }
    }

    #[test]
    fn test_reset_restarts_from_next_target() {
        let mut smoother = CursorSmoother::default();
        smoother.push(ScreenPoint::new(0.0, 0.0));
        smoother.reset();
        assert!(smoother.last().is_none());
        assert_eq!(
            smoother.push(ScreenPoint::new(900.0, 700.0)),
            ScreenPoint::new(900.0, 700.0)
        );
    }

    #[test]
    fn test_strength_is_clamped_and_hot_swappable() {
        let mut smoother = CursorSmoother::ema(3.0);
        assert_eq!(smoother.algorithm(), SmoothingAlgorithm::Ema { strength: 1.0 });
        smoother.set_strength(0.0);
        smoother.push(ScreenPoint::new(0.0, 0.0));
        assert_eq!(
            smoother.push(ScreenPoint::new(40.0, 40.0)),
            ScreenPoint::new(40.0, 40.0)
        );
    }
}
