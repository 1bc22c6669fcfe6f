//! Persisted user settings with change notifications
//!
//! Holds exactly two values, `enabled` and `credential`. Every successful
//! `set_*` that changes a value is written back to disk and broadcast to all
//! live subscribers.

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The persisted settings
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether the panel is shown
    pub enabled: bool,
    /// API credential for the inference endpoint
    pub credential: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("enabled", &self.enabled)
            .field("credential", &redacted(&self.credential))
            .finish()
    }
}

fn redacted(credential: &str) -> &'static str {
    if credential.is_empty() {
        "<empty>"
    } else {
        "<set>"
    }
}

/// Name of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Enabled,
    Credential,
}

/// A changed setting and its new value
#[derive(Clone, PartialEq, Eq)]
pub enum SettingChange {
    Enabled(bool),
    Credential(String),
}

impl SettingChange {
    pub fn key(&self) -> SettingKey {
        match self {
            SettingChange::Enabled(_) => SettingKey::Enabled,
            SettingChange::Credential(_) => SettingKey::Credential,
        }
    }
}

// Manual impl so the credential never lands in logs
impl std::fmt::Debug for SettingChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingChange::Enabled(v) => f.debug_tuple("Enabled").field(v).finish(),
            SettingChange::Credential(c) => f
                .debug_tuple("Credential")
                .field(&redacted(c))
                .finish(),
        }
    }
}

/// Key-value settings store backed by a TOML file
pub struct SettingsStore {
    settings: RwLock<Settings>,
    path: Option<PathBuf>,
    subscribers: Mutex<Vec<Sender<SettingChange>>>,
}

impl SettingsStore {
    /// Open the store at `path`, starting from defaults if the file is missing
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let loaded = load_settings(&path)?;
            info!("Loaded settings from {:?}", path);
            loaded
        } else {
            info!("No settings file at {:?}, using defaults", path);
            Settings::default()
        };

        Ok(Self {
            settings: RwLock::new(settings),
            path: Some(path),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// A store that never touches disk
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            path: None,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all settings
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn enabled(&self) -> bool {
        self.settings.read().enabled
    }

    pub fn credential(&self) -> String {
        self.settings.read().credential.clone()
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.apply(SettingChange::Enabled(enabled))
    }

    pub fn set_credential(&self, credential: impl Into<String>) -> Result<()> {
        self.apply(SettingChange::Credential(credential.into()))
    }

    /// Receive every future change
    pub fn subscribe(&self) -> Receiver<SettingChange> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    fn apply(&self, change: SettingChange) -> Result<()> {
        {
            // Held across the save so the file and memory never diverge
            let mut settings = self.settings.write();
            let mut updated = settings.clone();
            match &change {
                SettingChange::Enabled(v) => updated.enabled = *v,
                SettingChange::Credential(c) => updated.credential = c.clone(),
            }
            if updated == *settings {
                return Ok(());
            }

            if let Some(path) = &self.path {
                save_settings(&updated, path)?;
            }
            *settings = updated;
        }

        debug!("Setting changed: {:?}", change);
        self.subscribers
            .lock()
            .retain(|tx| tx.send(change.clone()).is_ok());

        Ok(())
    }
}

/// Load settings from file
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Save settings to file
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.toml")).unwrap();

        assert!(!store.enabled());
        assert!(store.credential().is_empty());
    }

    #[test]
    fn test_set_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");

        let store = SettingsStore::open(&path).unwrap();
        store.set_enabled(true).unwrap();
        store.set_credential("abc123").unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.settings(),
            Settings {
                enabled: true,
                credential: "abc123".to_string()
            }
        );
    }

    #[test]
    fn test_subscribers_receive_changes_in_order() {
        let store = SettingsStore::in_memory(Settings::default());
        let rx = store.subscribe();

        store.set_enabled(true).unwrap();
        store.set_credential("key").unwrap();

        assert_eq!(rx.try_recv().unwrap(), SettingChange::Enabled(true));
        assert_eq!(
            rx.try_recv().unwrap(),
            SettingChange::Credential("key".to_string())
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unchanged_value_is_not_broadcast() {
        let store = SettingsStore::in_memory(Settings::default());
        let rx = store.subscribe();

        store.set_enabled(false).unwrap();
        store.set_credential("").unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let store = SettingsStore::in_memory(Settings::default());
        let dropped = store.subscribe();
        let live = store.subscribe();
        drop(dropped);

        store.set_enabled(true).unwrap();

        assert_eq!(store.subscribers.lock().len(), 1);
        assert_eq!(live.try_recv().unwrap().key(), SettingKey::Enabled);
    }

    #[test]
    fn test_debug_hides_credential() {
        let rendered = format!("{:?}", SettingChange::Credential("secret".to_string()));
        assert!(!rendered.contains("secret"));

        let settings = Settings {
            enabled: true,
            credential: "secret".to_string(),
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<set>"));
    }

    #[test]
    fn test_failed_save_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::open(dir.path().join("missing").join("settings.toml")).unwrap();
        let rx = store.subscribe();

        assert!(store.set_enabled(true).is_err());
        assert!(store.set_credential("key").is_err());

        assert_eq!(store.settings(), Settings::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_retry_after_failed_save_is_applied() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let store = SettingsStore::open(missing.join("settings.toml")).unwrap();
        let rx = store.subscribe();
        assert!(store.set_enabled(true).is_err());

        std::fs::create_dir(&missing).unwrap();
        store.set_enabled(true).unwrap();

        assert!(store.enabled());
        assert_eq!(rx.try_recv().unwrap(), SettingChange::Enabled(true));
    }
}
