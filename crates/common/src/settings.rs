//! Tracking settings and the runtime settings store.
//!
//! [`TrackingSettings`] is the plain, serializable value. [`SharedSettings`]
//! is the live store the pipeline reads from: every scalar is an independent
//! atomic, so a settings UI on another thread can change any value at any
//! time and the next frame picks it up without locking.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{IpointError, IpointResult};

/// Valid range for the blink threshold.
pub const BLINK_THRESHOLD_RANGE: (f32, f32) = (0.05, 0.8);

/// Gains applied by the gaze-to-screen transfer function.
///
/// Any finite value is valid, including negatives (which flip an axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Overall X gain.
    pub x_movement_multiplier: f32,
    /// Overall Y gain.
    pub y_movement_multiplier: f32,
    /// Horizontal range amplification knob.
    pub eye_position_x_effect: f32,
    /// Scale applied to `eye_position_x_effect`.
    pub eye_position_x_multiplier: f32,
    /// Vertical range amplification knob.
    pub eye_position_y_effect: f32,
    /// Scale applied to `eye_position_y_effect`.
    pub eye_position_y_multiplier: f32,
    /// Horizontal range change per unit of depth proxy.
    pub distance_x_multiplier: f32,
    /// Vertical range change per unit of depth proxy.
    pub distance_y_multiplier: f32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            x_movement_multiplier: 1.0,
            y_movement_multiplier: 1.0,
            eye_position_x_effect: 1.0,
            eye_position_x_multiplier: 1.0,
            eye_position_y_effect: 1.0,
            eye_position_y_multiplier: 1.0,
            distance_x_multiplier: 1.0,
            distance_y_multiplier: 1.0,
        }
    }
}

impl TransferConfig {
    /// Unit gain with every effect disabled: gaze maps straight to screen.
    pub fn neutral() -> Self {
        Self {
            x_movement_multiplier: 1.0,
            y_movement_multiplier: 1.0,
            eye_position_x_effect: 0.0,
            eye_position_x_multiplier: 1.0,
            eye_position_y_effect: 0.0,
            eye_position_y_multiplier: 1.0,
            distance_x_multiplier: 0.0,
            distance_y_multiplier: 0.0,
        }
    }

    fn named_values(&self) -> [(SettingKey, f32); 8] {
        [
            (SettingKey::XMovementMultiplier, self.x_movement_multiplier),
            (SettingKey::YMovementMultiplier, self.y_movement_multiplier),
            (SettingKey::EyePositionXEffect, self.eye_position_x_effect),
            (
                SettingKey::EyePositionXMultiplier,
                self.eye_position_x_multiplier,
            ),
            (SettingKey::EyePositionYEffect, self.eye_position_y_effect),
            (
                SettingKey::EyePositionYMultiplier,
                self.eye_position_y_multiplier,
            ),
            (SettingKey::DistanceXMultiplier, self.distance_x_multiplier),
            (SettingKey::DistanceYMultiplier, self.distance_y_multiplier),
        ]
    }

    /// Reject NaN or infinite gains.
    pub fn validate(&self) -> IpointResult<()> {
        for (key, value) in self.named_values() {
            key.check(value)?;
        }
        Ok(())
    }
}

/// Every tunable the tracking pipeline reads per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Transfer function gains.
    pub transfer: TransferConfig,

    /// Fractional eye-area drop that counts as "closed".
    pub blink_threshold: f32,

    /// Track a single eye instead of fusing both.
    pub use_one_eye: bool,

    /// Cursor smoothing strength in [0.0, 1.0]; larger is smoother.
    pub cursor_smoothing: f32,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            transfer: TransferConfig::default(),
            blink_threshold: 0.3,
            use_one_eye: false,
            cursor_smoothing: 0.7,
        }
    }
}

impl TrackingSettings {
    /// Check every value against the range the store enforces.
    pub fn validate(&self) -> IpointResult<()> {
        self.transfer.validate()?;
        SettingKey::BlinkThreshold.check(self.blink_threshold)?;
        SettingKey::CursorSmoothing.check(self.cursor_smoothing)?;
        Ok(())
    }
}

/// Name of a numeric setting in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    XMovementMultiplier,
    YMovementMultiplier,
    EyePositionXEffect,
    EyePositionXMultiplier,
    EyePositionYEffect,
    EyePositionYMultiplier,
    DistanceXMultiplier,
    DistanceYMultiplier,
    BlinkThreshold,
    CursorSmoothing,
}

impl SettingKey {
    pub const ALL: [SettingKey; 10] = [
        SettingKey::XMovementMultiplier,
        SettingKey::YMovementMultiplier,
        SettingKey::EyePositionXEffect,
        SettingKey::EyePositionXMultiplier,
        SettingKey::EyePositionYEffect,
        SettingKey::EyePositionYMultiplier,
        SettingKey::DistanceXMultiplier,
        SettingKey::DistanceYMultiplier,
        SettingKey::BlinkThreshold,
        SettingKey::CursorSmoothing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XMovementMultiplier => "x_movement_multiplier",
            Self::YMovementMultiplier => "y_movement_multiplier",
            Self::EyePositionXEffect => "eye_position_x_effect",
            Self::EyePositionXMultiplier => "eye_position_x_multiplier",
            Self::EyePositionYEffect => "eye_position_y_effect",
            Self::EyePositionYMultiplier => "eye_position_y_multiplier",
            Self::DistanceXMultiplier => "distance_x_multiplier",
            Self::DistanceYMultiplier => "distance_y_multiplier",
            Self::BlinkThreshold => "blink_threshold",
            Self::CursorSmoothing => "cursor_smoothing",
        }
    }

    /// Validate a candidate value for this key.
    pub fn check(&self, value: f32) -> IpointResult<()> {
        if !value.is_finite() {
            return Err(IpointError::config(format!(
                "{} must be finite, got {value}",
                self.as_str()
            )));
        }
        let range = match self {
            Self::BlinkThreshold => Some(BLINK_THRESHOLD_RANGE),
            Self::CursorSmoothing => Some((0.0, 1.0)),
            _ => None,
        };
        if let Some((min, max)) = range {
            if !(min..=max).contains(&value) {
                return Err(IpointError::config(format!(
                    "{} must be within [{min}, {max}], got {value}",
                    self.as_str()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = IpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| IpointError::config(format!("unknown setting '{s}'")))
    }
}

/// An `f32` stored as bits in an `AtomicU32`.
#[derive(Debug)]
struct AtomicScalar(AtomicU32);

impl AtomicScalar {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

#[derive(Debug)]
struct SettingsCells {
    scalars: [AtomicScalar; 10],
    use_one_eye: AtomicBool,
}

/// Live, thread-safe settings store.
///
/// Clones share the same cells. Reads are per-scalar atomic; a snapshot
/// taken while another thread writes may mix old and new values of
/// *different* keys, never a torn value of one key.
#[derive(Debug, Clone)]
pub struct SharedSettings {
    cells: Arc<SettingsCells>,
}

impl SharedSettings {
    /// Create a store seeded from validated settings.
    pub fn new(initial: TrackingSettings) -> IpointResult<Self> {
        initial.validate()?;
        Ok(Self::seeded(initial))
    }

    fn seeded(initial: TrackingSettings) -> Self {
        let store = Self {
            cells: Arc::new(SettingsCells {
                scalars: SettingKey::ALL.map(|_| AtomicScalar::new(0.0)),
                use_one_eye: AtomicBool::new(initial.use_one_eye),
            }),
        };
        for (key, value) in initial.transfer.named_values() {
            store.cell(key).store(value);
        }
        store
            .cell(SettingKey::BlinkThreshold)
            .store(initial.blink_threshold);
        store
            .cell(SettingKey::CursorSmoothing)
            .store(initial.cursor_smoothing);
        store
    }

    fn cell(&self, key: SettingKey) -> &AtomicScalar {
        // ALL is declared in the same order as the cells.
        let index = key as usize;
        &self.cells.scalars[index]
    }

    /// Read one numeric setting.
    pub fn get(&self, key: SettingKey) -> f32 {
        self.cell(key).load()
    }

    /// Update one numeric setting after range validation.
    pub fn set(&self, key: SettingKey, value: f32) -> IpointResult<()> {
        key.check(value)?;
        self.cell(key).store(value);
        tracing::debug!(setting = %key, value, "Setting updated");
        Ok(())
    }

    pub fn use_one_eye(&self) -> bool {
        self.cells.use_one_eye.load(Ordering::Relaxed)
    }

    pub fn set_use_one_eye(&self, enabled: bool) {
        self.cells.use_one_eye.store(enabled, Ordering::Relaxed);
        tracing::debug!(use_one_eye = enabled, "Setting updated");
    }

    /// Read every value fresh.
    pub fn snapshot(&self) -> TrackingSettings {
        TrackingSettings {
            transfer: TransferConfig {
                x_movement_multiplier: self.get(SettingKey::XMovementMultiplier),
                y_movement_multiplier: self.get(SettingKey::YMovementMultiplier),
                eye_position_x_effect: self.get(SettingKey::EyePositionXEffect),
                eye_position_x_multiplier: self.get(SettingKey::EyePositionXMultiplier),
                eye_position_y_effect: self.get(SettingKey::EyePositionYEffect),
                eye_position_y_multiplier: self.get(SettingKey::EyePositionYMultiplier),
                distance_x_multiplier: self.get(SettingKey::DistanceXMultiplier),
                distance_y_multiplier: self.get(SettingKey::DistanceYMultiplier),
            },
            blink_threshold: self.get(SettingKey::BlinkThreshold),
            use_one_eye: self.use_one_eye(),
            cursor_smoothing: self.get(SettingKey::CursorSmoothing),
        }
    }
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self::seeded(TrackingSettings::default())
    }
}
