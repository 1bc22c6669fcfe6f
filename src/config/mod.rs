//! Application Configuration
//!
//! Read-only settings stored in TOML format. The two user-facing values
//! (panel enabled, API credential) live in the settings store instead.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inference endpoint settings
    pub inference: InferenceConfig,
    /// Overlay settings
    pub overlay: OverlaySettings,
    /// Global hotkeys
    pub hotkeys: HotkeyConfig,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-09-2025".to_string()
}

fn default_instruction() -> String {
    "Extract all visible text from this image verbatim. If there is no text, briefly describe the image."
        .to_string()
}

/// Remote vision-language endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL, without the `/models/...` suffix
    pub endpoint: String,
    /// Model name used in the request path
    pub model: String,
    /// Instruction sent alongside the image
    pub instruction: String,
    /// Request timeout. None waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            instruction: default_instruction(),
            timeout_secs: None,
        }
    }
}

/// Overlay-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Monitor to cover (0 = primary)
    pub monitor_index: usize,
    /// Panel opacity
    pub opacity: f32,
    /// Panel width in logical pixels
    pub panel_width: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            monitor_index: 0,
            opacity: 0.95,
            panel_width: 300.0,
        }
    }
}

/// Global hotkey bindings, e.g. "Ctrl+Shift+O". None disables the binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Show or hide the panel
    pub toggle_panel: Option<String>,
    /// Arm or disarm marquee drawing
    pub toggle_selection: Option<String>,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_panel: Some("Ctrl+Shift+O".to_string()),
            toggle_selection: Some("Ctrl+Shift+S".to_string()),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
