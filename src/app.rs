//! Extraction Pipeline
//!
//! One capture → crop → recognize pass for a fixed region and credential.
//! Runs on the tokio runtime; every failure comes back as an
//! `ExtractionError` rather than escaping the task.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::capture::CaptureProvider;
use crate::error::ExtractionError;
use crate::shared::Region;
use crate::vision::{crop_to_png, TextRecognizer};

/// Collaborators needed for one extraction
#[derive(Clone)]
pub struct ExtractionPipeline {
    capture: Arc<dyn CaptureProvider>,
    recognizer: Arc<dyn TextRecognizer>,
}

impl ExtractionPipeline {
    pub fn new(capture: Arc<dyn CaptureProvider>, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            capture,
            recognizer,
        }
    }

    /// Run the whole pipeline once
    pub async fn run(
        &self,
        request_id: Uuid,
        region: Region,
        credential: String,
    ) -> Result<String, ExtractionError> {
        let frame = self.capture.capture().await?;
        let (width, height) = frame.dimensions();
        debug!(
            %request_id,
            "Captured {}x{} frame at scale {}",
            width,
            height,
            frame.scale_factor
        );
        let captured_at = frame.captured_at;

        let png = tokio::task::spawn_blocking(move || {
            crop_to_png(&frame.image, &region, frame.scale_factor)
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))??;
        debug!(
            %request_id,
            "Cropped selection to {} byte PNG in {:?}",
            png.len(),
            captured_at.elapsed()
        );

        let result = self.recognizer.recognize(&png, &credential).await;
        match &result {
            Ok(text) => info!(%request_id, "Extraction finished ({} chars)", text.len()),
            Err(e) => warn!(%request_id, "Extraction failed: {}", e),
        }
        result
    }
}
