//! Storage Layer
//!
//! Platform directories and the persisted user settings.

pub mod settings;

pub use settings::{SettingChange, Settings, SettingsStore};

use anyhow::Result;
use std::path::PathBuf;

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "marquee-ocr", "MarqueeOcr")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}
