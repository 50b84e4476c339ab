//! Show, create, and edit the configuration file.

use anyhow::Context;

use ipoint_common::config::{config_file_path, AppConfig};
use ipoint_common::settings::{SettingKey, SharedSettings};

use crate::ConfigAction;

pub fn run(config: AppConfig, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", config_file_path().display());
        }
        ConfigAction::Init { force } => {
            let path = config_file_path();
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            let path = AppConfig::default()
                .save()
                .context("Failed to write default config")?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Set { key, value } => set(config, &key, &value)?,
    }
    Ok(())
}

fn set(mut config: AppConfig, key: &str, value: &str) -> anyhow::Result<()> {
    let store = SharedSettings::new(config.tracking)
        .context("Current tracking settings are invalid")?;

    if key == "use_one_eye" {
        let enabled: bool = value
            .parse()
            .with_context(|| format!("use_one_eye expects true or false, got '{value}'"))?;
        store.set_use_one_eye(enabled);
    } else {
        let key: SettingKey = key.parse()?;
        let value: f32 = value
            .parse()
            .with_context(|| format!("{key} expects a number, got '{value}'"))?;
        store.set(key, value)?;
    }

    config.tracking = store.snapshot();
    let path = config.save().context("Failed to save config")?;
    println!("Updated {key} in {}", path.display());
    Ok(())
}
