//! Application state owned by the overlay thread

use crate::overlay::selection::RegionSelector;
use crate::storage::Settings;

/// Placeholder shown in an empty result area
pub const RESULT_PLACEHOLDER: &str = "Resulting text will appear here...";

/// Everything the UI mutates, in one place
///
/// Owned by the overlay app and lent to the selector and panel controller by
/// `&mut`; nothing else holds a reference to it.
#[derive(Debug, Default)]
pub struct AppState {
    /// Mirror of the settings store, updated from its change feed
    pub settings: Settings,
    /// Marquee state machine
    pub selector: RegionSelector,
    /// Result panel
    pub panel: PanelState,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let panel = PanelState {
            visible: settings.enabled,
            ..PanelState::default()
        };
        Self {
            settings,
            selector: RegionSelector::new(),
            panel,
        }
    }
}

/// Display state of the result panel
#[derive(Clone, Default)]
pub struct PanelState {
    /// Whether the panel is shown (follows `settings.enabled`)
    pub visible: bool,
    /// Result, error or progress text
    pub text: String,
    /// Number of extractions started but not yet settled
    pub in_flight: usize,
    /// Credential field contents while editing
    pub credential_draft: String,
}

impl std::fmt::Debug for PanelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelState")
            .field("visible", &self.visible)
            .field("text", &self.text)
            .field("in_flight", &self.in_flight)
            .field("credential_draft", &self.credential_draft.len())
            .finish()
    }
}

impl PanelState {
    /// Replace the displayed text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}
