//! Panel controller
//!
//! Owns no state of its own: it applies settings changes, user actions and
//! settled extractions to the `AppState` lent to it by the overlay each frame.
//! Extractions run on the tokio runtime and report back over a channel, which
//! is drained here in settle order.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app::ExtractionPipeline;
use crate::error::ExtractionError;
use crate::shared::{AppState, ExtractionOutcome, PanelAction};
use crate::storage::{SettingChange, SettingsStore};

/// Transient text while a request is in flight
pub const PROCESSING_MESSAGE: &str = "Processing area...";

pub struct PanelController {
    pipeline: ExtractionPipeline,
    runtime: Handle,
    settings: Arc<SettingsStore>,
    settings_rx: Receiver<SettingChange>,
    outcome_tx: Sender<ExtractionOutcome>,
    outcome_rx: Receiver<ExtractionOutcome>,
}

impl PanelController {
    pub fn new(pipeline: ExtractionPipeline, runtime: Handle, settings: Arc<SettingsStore>) -> Self {
        let settings_rx = settings.subscribe();
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            pipeline,
            runtime,
            settings,
            settings_rx,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Apply every settings change published since the last call
    pub fn poll_settings(&self, state: &mut AppState) -> usize {
        let mut applied = 0;
        while let Ok(change) = self.settings_rx.try_recv() {
            self.apply_setting_change(state, change);
            applied += 1;
        }
        applied
    }

    pub fn apply_setting_change(&self, state: &mut AppState, change: SettingChange) {
        debug!("Setting changed: {:?}", change.key());
        match change {
            SettingChange::Enabled(enabled) => {
                state.settings.enabled = enabled;
                state.panel.visible = enabled;
                if !enabled {
                    state.selector.erase();
                    state.selector.exit();
                }
                info!("Panel {}", if enabled { "enabled" } else { "disabled" });
            }
            SettingChange::Credential(credential) => {
                state.settings.credential = credential;
            }
        }
    }

    pub fn handle_action(&self, state: &mut AppState, action: PanelAction) {
        match action {
            PanelAction::ToggleSelection => self.toggle_selection(state),
            PanelAction::RunExtraction => {
                self.run_extraction(state);
            }
            PanelAction::ClearSelection => self.clear_selection(state),
            PanelAction::SaveCredential(credential) => self.save_credential(state, credential),
            PanelAction::Disable => {
                if let Err(e) = self.settings.set_enabled(false) {
                    warn!("Failed to disable panel: {}", e);
                }
            }
        }
    }

    pub fn toggle_selection(&self, state: &mut AppState) {
        if !state.selector.toggle_selection() {
            debug!("Selection toggle ignored mid-gesture");
        }
    }

    pub fn clear_selection(&self, state: &mut AppState) {
        state.selector.erase();
    }

    /// Flip `enabled` through the store; visibility follows via the change feed
    pub fn toggle_panel(&self, state: &AppState) {
        if let Err(e) = self.settings.set_enabled(!state.settings.enabled) {
            warn!("Failed to toggle panel: {}", e);
        }
    }

    fn save_credential(&self, state: &mut AppState, credential: String) {
        let credential = credential.trim().to_string();
        match self.settings.set_credential(credential) {
            Ok(()) => state.panel.credential_draft.clear(),
            Err(e) => {
                warn!("Failed to save credential: {}", e);
                state.panel.set_text(format!("Error: {}", e));
            }
        }
    }

    /// Start one extraction for the current region and credential.
    ///
    /// Returns the request id when a pipeline was spawned. Missing
    /// preconditions are reported in the panel and nothing is captured.
    pub fn run_extraction(&self, state: &mut AppState) -> Option<Uuid> {
        if state.settings.credential.is_empty() {
            state.panel.set_text(ExtractionError::Configuration.display_message());
            return None;
        }
        let Some(region) = state.selector.usable_region() else {
            state.panel.set_text(ExtractionError::Selection.display_message());
            return None;
        };

        let request_id = Uuid::new_v4();
        let credential = state.settings.credential.clone();
        state.panel.set_text(PROCESSING_MESSAGE);
        state.panel.in_flight += 1;
        info!(
            %request_id,
            "Extracting {}x{} at ({}, {})",
            region.width,
            region.height,
            region.x,
            region.y
        );

        let pipeline = self.pipeline.clone();
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let task = tokio::spawn(async move { pipeline.run(request_id, region, credential).await });
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(ExtractionError::Task(e.to_string())),
            };
            let _ = tx.send(ExtractionOutcome { request_id, result });
        });

        Some(request_id)
    }

    /// Show every outcome that settled since the last call, in settle order
    pub fn poll_settled(&self, state: &mut AppState) -> usize {
        let mut settled = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            debug!(request_id = %outcome.request_id, "Extraction settled");
            state.panel.set_text(outcome.display_text());
            state.panel.in_flight = state.panel.in_flight.saturating_sub(1);
            settled += 1;
        }
        settled
    }
}
