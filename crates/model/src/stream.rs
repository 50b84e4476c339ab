//! Recorded frame streams.
//!
//! Landmark recordings and pointer output are both JSONL: one JSON object
//! per line, `#`-prefixed lines are headers or comments.

use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkSet;
use crate::pointer::{PointerFrame, TimestampNs};

/// One recorded detector frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Monotonic nanoseconds since the session started.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Landmarks of the first detected face; empty when none was found.
    #[serde(default)]
    pub landmarks: LandmarkSet,
}

impl LandmarkFrame {
    pub fn new(timestamp_ns: TimestampNs, landmarks: LandmarkSet) -> Self {
        Self {
            timestamp_ns,
            landmarks,
        }
    }
}

/// Header written as the first (`#`-prefixed) line of a pointer stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    /// Target screen in pixels.
    pub screen_width: f32,
    pub screen_height: f32,
}

/// Flat, serializable form of a [`PointerFrame`].
///
/// Hidden frames carry the `(-1, -1)` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerRecord {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,
    pub x: f32,
    pub y: f32,
    pub visible: bool,
    pub click: bool,
}

impl From<&PointerFrame> for PointerRecord {
    fn from(frame: &PointerFrame) -> Self {
        let (x, y) = frame.cursor.to_sentinel();
        Self {
            timestamp_ns: frame.timestamp_ns,
            x,
            y,
            visible: frame.cursor.is_visible(),
            click: frame.click,
        }
    }
}

/// Whether a JSONL line carries data.
pub fn is_data_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Parse a single frame line. Returns `None` for blank or comment lines.
pub fn parse_frame_line(line: &str) -> Option<Result<LandmarkFrame, serde_json::Error>> {
    is_data_line(line).then(|| serde_json::from_str(line.trim()))
}

/// Parse landmark frames from JSONL content.
pub fn parse_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, serde_json::Error> {
    jsonl.lines().filter_map(parse_frame_line).collect()
}

/// Parse pointer records from JSONL content.
pub fn parse_pointer_records(jsonl: &str) -> Result<Vec<PointerRecord>, serde_json::Error> {
    jsonl
        .lines()
        .filter(|line| is_data_line(line))
        .map(|line| serde_json::from_str(line.trim()))
        .collect()
}
