//! Evaluate the transfer function for one gaze sample.

use anyhow::Context;

use ipoint_common::config::AppConfig;
use ipoint_model::gaze::GazeSample;
use ipoint_model::pointer::{ScreenPoint, ScreenSize};
use ipoint_model::region::Point2D;
use ipoint_tracking_core::transfer::map_to_screen;

pub fn run(
    config: &AppConfig,
    x: f32,
    y: f32,
    depth: f32,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<()> {
    let screen = super::screen_size(config, width, height)?;
    let point = map_gaze(config, x, y, depth, screen)?;

    println!("Gaze ({x:.3}, {y:.3}) depth {depth:.3}");
    println!(
        "  Screen {}x{} -> ({:.1}, {:.1})",
        screen.width, screen.height, point.x, point.y
    );
    Ok(())
}

fn map_gaze(
    config: &AppConfig,
    x: f32,
    y: f32,
    depth: f32,
    screen: ScreenSize,
) -> anyhow::Result<ScreenPoint> {
    let sample = GazeSample::at(Point2D::new(x, y), depth, 0.0, true);
    map_to_screen(&sample, &config.tracking.transfer, screen).context("Failed to map gaze")
}
