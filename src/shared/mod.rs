//! Shared state and messaging
//!
//! The single owned application state, the selection geometry it contains,
//! and the messages that cross from extraction tasks back to the overlay.

pub mod messages;
pub mod region;
pub mod state;

pub use messages::{ExtractionOutcome, PanelAction};
pub use region::{Point, Region};
pub use state::{AppState, RESULT_PLACEHOLDER};
