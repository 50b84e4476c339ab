//! Frame pipeline driver.
//!
//! Owns one gaze estimator, one blink detector and one cursor smoother, and
//! runs each frame through them in order:
//!
//! ```text
//! landmarks → GazeEstimator → ┬→ map_to_screen → overlay (raw)
//!                             │                → CursorSmoother → cursor
//!                             └→ BlinkDetector → click
//! ```
//!
//! Settings are read from the shared store once per frame, so changes made
//! from another thread apply on the next frame.

use ipoint_common::clock::RateController;
use ipoint_common::error::{IpointError, IpointResult};
use ipoint_common::settings::{SharedSettings, TrackingSettings};
use ipoint_model::gaze::GazeEstimate;
use ipoint_model::landmark::LandmarkSet;
use ipoint_model::pointer::{PointerFrame, PointerPosition, ScreenSize, TimestampNs};

use crate::blink::BlinkDetector;
use crate::cursor_smooth::CursorSmoother;
use crate::gaze::GazeEstimator;
use crate::sink::PointerSink;
use crate::transfer::map_to_screen;

/// Counters accumulated over a pipeline's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    /// Frames where at least one eye resolved.
    pub tracked_frames: u64,
    pub clicks: u64,
    /// Publish failures reported by sinks.
    pub sink_errors: u64,
}

/// Single-owner tracking pipeline. Not shared between threads; move it into
/// the worker that receives frames.
pub struct TrackingPipeline {
    estimator: GazeEstimator,
    blink: BlinkDetector,
    smoother: CursorSmoother,
    settings: SharedSettings,
    screen: ScreenSize,
    sinks: Vec<Box<dyn PointerSink>>,
    status_rate: RateController,
    face_present: bool,
    last_estimate: Option<GazeEstimate>,
    stats: PipelineStats,
}

impl TrackingPipeline {
    /// Create a pipeline for the given screen.
    pub fn new(settings: SharedSettings, screen: ScreenSize) -> IpointResult<Self> {
        if !screen.is_valid() {
            return Err(IpointError::invalid_screen(screen.width, screen.height));
        }
        let initial = settings.snapshot();

        Ok(Self {
            estimator: GazeEstimator::new(initial.use_one_eye),
            blink: BlinkDetector::new(initial.blink_threshold),
            smoother: CursorSmoother::ema(initial.cursor_smoothing),
            settings,
            screen,
            sinks: Vec::new(),
            status_rate: RateController::new(1),
            face_present: false,
            last_estimate: None,
            stats: PipelineStats::default(),
        })
    }

    /// Register a sink. Frames are published in registration order.
    pub fn add_sink(&mut self, sink: Box<dyn PointerSink>) {
        tracing::debug!(sink = sink.name(), "Pointer sink registered");
        self.sinks.push(sink);
    }

    /// Change the target screen, e.g. after a rotation.
    pub fn set_screen(&mut self, screen: ScreenSize) -> IpointResult<()> {
        if !screen.is_valid() {
            return Err(IpointError::invalid_screen(screen.width, screen.height));
        }
        self.screen = screen;
        self.smoother.reset();
        Ok(())
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Handle to the live settings store.
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Gaze estimate from the most recent frame, for drawing eye boxes.
    pub fn last_estimate(&self) -> Option<&GazeEstimate> {
        self.last_estimate.as_ref()
    }

    /// Run one frame and publish the result to every sink.
    ///
    /// A sink failure is logged and counted, never propagated; one broken
    /// sink must not stall the others.
    pub fn process_frame(
        &mut self,
        landmarks: &LandmarkSet,
        now: TimestampNs,
    ) -> IpointResult<PointerFrame> {
        let settings = self.settings.snapshot();
        self.apply_settings(&settings);

        let estimate = self.estimator.estimate(landmarks);
        self.last_estimate = Some(estimate);
        self.stats.frames += 1;

        let frame = if estimate.sample.has_signal() {
            self.tracked_frame(&estimate, &settings, now)?
        } else {
            self.lost_frame(now)
        };

        if self.status_rate.should_tick(now) {
            let (x, y) = frame.overlay.to_sentinel();
            tracing::info!(
                x,
                y,
                depth = estimate.sample.eye_area,
                eye_x = estimate.sample.eye_position_x,
                eye_y = estimate.sample.eye_position_y,
                frames = self.stats.frames,
                "Tracking status"
            );
        }

        self.publish(&frame);
        Ok(frame)
    }

    fn apply_settings(&mut self, settings: &TrackingSettings) {
        self.estimator.set_use_one_eye(settings.use_one_eye);
        self.blink.set_threshold(settings.blink_threshold);
        self.smoother.set_strength(settings.cursor_smoothing);
    }

    fn tracked_frame(
        &mut self,
        estimate: &GazeEstimate,
        settings: &TrackingSettings,
        now: TimestampNs,
    ) -> IpointResult<PointerFrame> {
        let sample = &estimate.sample;
        let target = map_to_screen(sample, &settings.transfer, self.screen)?;

        if !self.face_present {
            tracing::info!(x = target.x, y = target.y, "Face acquired, showing pointer");
            self.face_present = true;
        }
        self.stats.tracked_frames += 1;

        let blinked = self.blink.process(sample.openness, now);
        let cursor = PointerPosition::Visible(self.smoother.push(target));
        let click = blinked && self.deliver_click(cursor);

        Ok(PointerFrame {
            timestamp_ns: now,
            overlay: PointerPosition::Visible(target),
            cursor,
            click,
        })
    }

    fn lost_frame(&mut self, now: TimestampNs) -> PointerFrame {
        if self.face_present {
            tracing::info!("Face lost, hiding pointer");
            self.face_present = false;
        }
        self.blink.reset();
        self.smoother.reset();
        PointerFrame::hidden(now)
    }

    /// Clicks land on the smoothed cursor position.
    fn deliver_click(&mut self, cursor: PointerPosition) -> bool {
        match cursor.point() {
            Some(p) => {
                self.stats.clicks += 1;
                tracing::info!(x = p.x, y = p.y, "Blink click");
                true
            }
            None => {
                tracing::debug!("Blink click suppressed: pointer hidden");
                false
            }
        }
    }

    fn publish(&mut self, frame: &PointerFrame) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.publish(frame) {
                self.stats.sink_errors += 1;
                tracing::warn!(sink = sink.name(), error = %e, "Failed to publish pointer frame");
            }
        }
    }

    /// Flush every sink, returning the first failure.
    pub fn flush(&mut self) -> IpointResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.flush() {
                tracing::warn!(sink = sink.name(), error = %e, "Failed to flush sink");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Flush sinks and return the final counters.
    pub fn finish(mut self) -> IpointResult<PipelineStats> {
        self.flush()?;
        tracing::info!(
            frames = self.stats.frames,
            tracked = self.stats.tracked_frames,
            clicks = self.stats.clicks,
            "Tracking pipeline finished"
        );
        Ok(self.stats)
    }
}
