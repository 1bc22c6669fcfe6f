//! Extraction error taxonomy
//!
//! Every failure of a single capture → crop → recognize attempt ends up as one
//! of these variants. They are rendered into the panel and never propagate
//! past it.

use thiserror::Error;

use crate::vision::crop::CropError;

/// Why an extraction attempt produced no text
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No credential configured
    #[error("Please set your Gemini API key.")]
    Configuration,

    /// No region, or one below the minimum size
    #[error("Draw a selection first.")]
    Selection,

    /// Capture provider failure
    #[error("Could not capture screen: {0}")]
    Capture(String),

    /// The region could not be cut out of the captured frame
    #[error("{0}")]
    Crop(#[from] CropError),

    /// The request never completed
    #[error("Network error: {0}")]
    Transport(String),

    /// A success status whose body is not a valid response document
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// The endpoint answered with a non-success status
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The pipeline task died before settling
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl ExtractionError {
    /// Text written to the result panel
    pub fn display_message(&self) -> String {
        format!("Error: {}", self)
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        ExtractionError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_contains_status() {
        let err = ExtractionError::Http { status: 403 };
        assert_eq!(err.display_message(), "Error: HTTP 403");
    }

    #[test]
    fn test_configuration_error_message() {
        let msg = ExtractionError::Configuration.display_message();
        assert!(msg.starts_with("Error:"));
        assert!(msg.contains("API key"));
    }

    #[test]
    fn test_crop_error_converts() {
        let err: ExtractionError = CropError::EmptyRegion.into();
        assert!(matches!(err, ExtractionError::Crop(CropError::EmptyRegion)));
    }
}
