//! iPoint Data Model
//!
//! Defines the data contracts shared by the tracking pipeline and its
//! collaborators:
//! - **Landmarks:** per-frame face-mesh points and the eye topology
//! - **Regions:** eye bounding regions in normalized image space
//! - **Gaze:** the fused per-frame gaze sample
//! - **Pointer:** screen points, the hidden sentinel, per-frame output
//! - **Streams:** JSONL recordings of landmark input and pointer output
//!
//! Landmark-space coordinates are normalized to `[0.0, 1.0]`; screen-space
//! coordinates are pixels.

pub mod gaze;
pub mod landmark;
pub mod pointer;
pub mod region;
pub mod stream;

pub use gaze::*;
pub use landmark::*;
pub use pointer::*;
pub use region::*;
pub use stream::*;
