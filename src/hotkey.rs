//! Global hotkeys for the panel and selection mode

use anyhow::{anyhow, Result};
use global_hotkey::{hotkey::HotKey, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{info, warn};

use crate::config::HotkeyConfig;

/// What a registered hotkey does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Flip the `enabled` setting
    TogglePanel,
    /// Arm or disarm marquee drawing
    ToggleSelection,
}

/// Parses a hotkey string like "F9", "Ctrl+Shift+O", "Alt+F1" into a HotKey
pub fn parse_hotkey(hotkey_str: &str) -> Result<HotKey> {
    let normalized: Vec<String> = hotkey_str
        .split('+')
        .map(|part| match part.trim().to_uppercase().as_str() {
            "WIN" | "META" => "SUPER".to_string(),
            "ESC" => "ESCAPE".to_string(),
            other => other.to_string(),
        })
        .collect();

    if normalized.iter().any(|p| p.is_empty()) {
        return Err(anyhow!("Empty token in hotkey '{}'", hotkey_str));
    }

    normalized
        .join("+")
        .parse::<HotKey>()
        .map_err(|e| anyhow!("Invalid hotkey '{}': {}", hotkey_str, e))
}

/// Owns the registered hotkeys and maps their events to actions
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    bindings: Vec<(HotKey, HotkeyAction)>,
}

impl HotkeyManager {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| anyhow!("Failed to create hotkey manager: {:?}", e))?;

        Ok(Self {
            manager,
            bindings: Vec::new(),
        })
    }

    /// Register every configured hotkey. A binding that fails to parse or
    /// register is logged and skipped.
    pub fn register_from_config(&mut self, config: &HotkeyConfig) {
        let wanted = [
            (config.toggle_panel.as_deref(), HotkeyAction::TogglePanel),
            (config.toggle_selection.as_deref(), HotkeyAction::ToggleSelection),
        ];

        for (hotkey_str, action) in wanted {
            let Some(hotkey_str) = hotkey_str else {
                continue;
            };
            if let Err(e) = self.register(hotkey_str, action) {
                warn!("Skipping {:?} hotkey: {}", action, e);
            }
        }
    }

    fn register(&mut self, hotkey_str: &str, action: HotkeyAction) -> Result<()> {
        let hotkey = parse_hotkey(hotkey_str)?;
        self.manager
            .register(hotkey)
            .map_err(|e| anyhow!("Failed to register hotkey: {:?}", e))?;
        self.bindings.push((hotkey, action));
        info!("Registered {:?} hotkey: {}", action, hotkey_str);
        Ok(())
    }

    /// Drain pending hotkey presses
    pub fn poll_events(&self) -> Vec<HotkeyAction> {
        let mut actions = Vec::new();
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if let Some(action) = action_for(&self.bindings, event.id) {
                actions.push(action);
            }
        }
        actions
    }
}

fn action_for(bindings: &[(HotKey, HotkeyAction)], id: u32) -> Option<HotkeyAction> {
    bindings
        .iter()
        .find(|(hotkey, _)| hotkey.id() == id)
        .map(|(_, action)| *action)
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        for (hotkey, _) in self.bindings.drain(..) {
            let _ = self.manager.unregister(hotkey);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let hotkey = parse_hotkey("F9").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let hotkey = parse_hotkey("Ctrl+Shift+O").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_alt_key() {
        let hotkey = parse_hotkey("Alt+F1").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            parse_hotkey("ctrl+shift+s").unwrap().id(),
            parse_hotkey("Ctrl+Shift+S").unwrap().id()
        );
    }

    #[test]
    fn test_parse_invalid_key() {
        let result = parse_hotkey("InvalidKey");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty() {
        let result = parse_hotkey("");
        assert!(result.is_err());
    }

    #[test]
    fn test_action_lookup_by_id() {
        let panel = parse_hotkey("Ctrl+Shift+O").unwrap();
        let select = parse_hotkey("Ctrl+Shift+S").unwrap();
        let bindings = vec![
            (panel, HotkeyAction::TogglePanel),
            (select, HotkeyAction::ToggleSelection),
        ];

        assert_eq!(action_for(&bindings, select.id()), Some(HotkeyAction::ToggleSelection));
        assert_eq!(action_for(&bindings, panel.id()), Some(HotkeyAction::TogglePanel));
        assert_eq!(action_for(&bindings, 0), None);
    }
}
