//! Message types between the overlay and extraction tasks

use uuid::Uuid;

use crate::error::ExtractionError;

/// A settled extraction, sent from the pipeline task to the overlay
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// Log correlation only; outcomes are never filtered by id
    pub request_id: Uuid,
    pub result: Result<String, ExtractionError>,
}

impl ExtractionOutcome {
    /// Text to show in the panel
    pub fn display_text(&self) -> String {
        match &self.result {
            Ok(text) => text.clone(),
            Err(e) => e.display_message(),
        }
    }
}

/// User actions raised by the panel widgets or hotkeys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Arm or disarm marquee drawing
    ToggleSelection,
    /// Capture and recognize the current selection
    RunExtraction,
    /// Remove the current selection
    ClearSelection,
    /// Store a new API credential
    SaveCredential(String),
    /// Hide the panel (sets `enabled = false`)
    Disable,
}
