//! iPoint Tracking Core
//!
//! Turns per-frame facial landmarks into pointer output:
//! - **Geometry:** eye regions and pupil positions from the face mesh
//! - **Gaze:** fuse one or both eyes into a gaze point and depth proxy
//! - **Blink:** detect deliberate blinks as clicks
//! - **Transfer:** map gaze to clamped screen pixels
//! - **Cursor Smoothing:** steady the injected cursor
//! - **Pipeline:** drive a frame through all of the above and publish it
//!
//! Everything except the pipeline's sinks is pure computation with no I/O.

pub mod blink;
pub mod cursor_smooth;
pub mod gaze;
pub mod geometry;
pub mod pipeline;
pub mod sink;
pub mod transfer;

pub use blink::BlinkDetector;
pub use cursor_smooth::CursorSmoother;
pub use gaze::GazeEstimator;
pub use pipeline::{PipelineStats, TrackingPipeline};
pub use sink::{JsonlPointerWriter, PointerSink, RecordingSink};
pub use transfer::map_to_screen;
