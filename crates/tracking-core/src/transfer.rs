//! Gaze-to-screen transfer function.
//!
//! Effects widen or narrow how far the cursor travels for a given eye
//! offset; none of them shift the origin.
//!
//! # Mapping
//!
//! 1. **Offset** from the centre: `eye_position - 0.5`, in `[-0.5, 0.5]`.
//! 2. **Position range**: multiply by `1 + effect * multiplier` per axis.
//! 3. **Depth range**: multiply by `1 + eye_area * distance_multiplier`.
//! 4. **Scale** to pixels around the screen centre with the overall gain.
//! 5. **Clamp** to `[0, width] × [0, height]`.

use ipoint_common::error::{IpointError, IpointResult};
use ipoint_common::settings::TransferConfig;
use ipoint_model::gaze::GazeSample;
use ipoint_model::pointer::{ScreenPoint, ScreenSize};

/// Map a gaze sample to a clamped screen position.
///
/// Fails on a non-finite or non-positive screen size, a non-finite gain, or
/// a non-finite gaze sample: those are caller bugs, not runtime variation.
pub fn map_to_screen(
    gaze: &GazeSample,
    config: &TransferConfig,
    screen: ScreenSize,
) -> IpointResult<ScreenPoint> {
    if !screen.is_valid() {
        return Err(IpointError::invalid_screen(screen.width, screen.height));
    }
    config.validate()?;
    if ![gaze.eye_position_x, gaze.eye_position_y, gaze.eye_area]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(IpointError::tracking(format!(
            "non-finite gaze sample ({}, {}, depth {})",
            gaze.eye_position_x, gaze.eye_position_y, gaze.eye_area
        )));
    }

    let x = map_axis(
        gaze.eye_position_x,
        gaze.eye_area,
        AxisGains {
            position_effect: config.eye_position_x_effect,
            position_multiplier: config.eye_position_x_multiplier,
            distance_multiplier: config.distance_x_multiplier,
            movement_multiplier: config.x_movement_multiplier,
        },
        screen.width,
    );
    let y = map_axis(
        gaze.eye_position_y,
        gaze.eye_area,
        AxisGains {
            position_effect: config.eye_position_y_effect,
            position_multiplier: config.eye_position_y_multiplier,
            distance_multiplier: config.distance_y_multiplier,
            movement_multiplier: config.y_movement_multiplier,
        },
        screen.height,
    );

    Ok(ScreenPoint::new(x, y))
}

#[derive(Debug, Clone, Copy)]
struct AxisGains {
    position_effect: f32,
    position_multiplier: f32,
    distance_multiplier: f32,
    movement_multiplier: f32,
}

fn map_axis(eye_position: f32, depth: f32, gains: AxisGains, extent: f32) -> f32 {
    let movement = eye_position - 0.5;
    let range = 1.0 + gains.position_effect * gains.position_multiplier;
    let distance_range = 1.0 + depth * gains.distance_multiplier;
    let offset = movement * range * distance_range * gains.movement_multiplier * extent;

    let position = extent / 2.0 + offset;
    // Gains can overflow to ±inf; clamp still lands on an edge.
    if position.is_nan() {
        return extent / 2.0;
    }
    position.clamp(0.0, extent)
}
