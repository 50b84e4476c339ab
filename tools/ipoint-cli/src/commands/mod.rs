pub mod config;
pub mod map;
pub mod replay;

use ipoint_common::config::AppConfig;
use ipoint_model::pointer::ScreenSize;

/// Screen size from CLI overrides, falling back to the configured screen.
pub fn screen_size(
    config: &AppConfig,
    width: Option<u32>,
    height: Option<u32>,
) -> anyhow::Result<ScreenSize> {
    let screen = ScreenSize::new(
        width.unwrap_or(config.screen.width) as f32,
        height.unwrap_or(config.screen.height) as f32,
    );
    if !screen.is_valid() {
        anyhow::bail!("Invalid screen size {}x{}", screen.width, screen.height);
    }
    Ok(screen)
}
