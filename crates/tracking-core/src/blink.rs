//! Blink-to-click detection.
//!
//! Watches eye openness over time and fires a click on a deliberate
//! open → closed → open pattern. Openness is judged relative to an
//! adaptive baseline so slow changes in face distance never look like a
//! blink.
//!
//! States: **Uncalibrated** until the first sample seeds the baseline,
//! then **Tracking**. [`BlinkDetector::reset`] returns to Uncalibrated.

use std::collections::VecDeque;

use ipoint_model::pointer::TimestampNs;

/// An open → closed → open pattern must complete within this window.
pub const BLINK_WINDOW_NS: u64 = 500_000_000;

/// Minimum time between two clicks.
pub const CLICK_DEBOUNCE_NS: u64 = 300_000_000;

/// Relative openness the eye must regain after the dip.
pub const REOPEN_RECOVERY: f32 = 0.2;

/// Weight the baseline keeps on every update.
pub const BASELINE_RETENTION: f32 = 0.95;

/// Default fractional drop that counts as "closed".
pub const DEFAULT_BLINK_THRESHOLD: f32 = 0.3;

/// One classified sample in the detection window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeSample {
    pub timestamp_ns: TimestampNs,
    /// Openness divided by the baseline at classification time.
    pub relative_area: f32,
    pub closed: bool,
}

/// Calibration state of a [`BlinkDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkState {
    Uncalibrated,
    Tracking,
}

/// Blink detector. Owned by a single pipeline; `process` takes `&mut self`.
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    threshold: f32,
    baseline: Option<f32>,
    history: VecDeque<EyeSample>,
    last_click_ns: Option<TimestampNs>,
}

impl BlinkDetector {
    /// Create an uncalibrated detector.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            baseline: None,
            history: VecDeque::new(),
            last_click_ns: None,
        }
    }

    /// Create a detector that is already tracking against `baseline`.
    pub fn with_baseline(threshold: f32, baseline: f32) -> Self {
        Self {
            baseline: Some(baseline),
            ..Self::new(threshold)
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Update the closing threshold. Applies from the next sample.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn state(&self) -> BlinkState {
        match self.baseline {
            Some(b) if b > 0.0 => BlinkState::Tracking,
            _ => BlinkState::Uncalibrated,
        }
    }

    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    /// Samples currently held in the detection window.
    pub fn history(&self) -> impl Iterator<Item = &EyeSample> {
        self.history.iter()
    }

    /// Feed one openness sample. Returns true when a click fires.
    pub fn process(&mut self, openness: f32, now: TimestampNs) -> bool {
        let baseline = match self.baseline {
            Some(b) if b > 0.0 => b,
            _ => {
                self.baseline = Some(openness);
                self.history.clear();
                return false;
            }
        };

        let relative_area = openness / baseline;
        let closed = relative_area < 1.0 - self.threshold;
        self.baseline =
            Some(baseline * BASELINE_RETENTION + openness * (1.0 - BASELINE_RETENTION));

        self.history.push_back(EyeSample {
            timestamp_ns: now,
            relative_area,
            closed,
        });
        while self
            .history
            .front()
            .is_some_and(|s| now.saturating_sub(s.timestamp_ns) > BLINK_WINDOW_NS)
        {
            self.history.pop_front();
        }

        if self.find_blink(now) {
            tracing::debug!(
                relative_area,
                threshold = self.threshold,
                "Blink click detected"
            );
            self.last_click_ns = Some(now);
            self.history.clear();
            return true;
        }
        false
    }

    /// Scan for `history[i]` open, `history[i + 1]` closed, last open.
    fn find_blink(&self, now: TimestampNs) -> bool {
        if self.history.len() < 3 {
            return false;
        }
        let debounced = self
            .last_click_ns
            .map_or(true, |last| now.saturating_sub(last) >= CLICK_DEBOUNCE_NS);
        if !debounced {
            return false;
        }

        let Some(last) = self.history.back() else {
            return false;
        };
        (0..self.history.len() - 2).any(|i| {
            let first = &self.history[i];
            let dip = &self.history[i + 1];
            !first.closed
                && dip.closed
                && !last.closed
                && last.timestamp_ns.saturating_sub(first.timestamp_ns) <= BLINK_WINDOW_NS
                && 1.0 - dip.relative_area >= self.threshold
                && last.relative_area - dip.relative_area >= REOPEN_RECOVERY
        })
    }

    /// Drop the baseline and history; the next sample recalibrates.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.history.clear();
    }
}

impl Default for BlinkDetector {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_THRESHOLD)
    }
}
