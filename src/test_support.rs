//! Fake collaborators for pipeline and panel tests

use async_trait::async_trait;
use image::RgbaImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

use crate::capture::{CaptureProvider, CapturedFrame};
use crate::error::ExtractionError;
use crate::vision::TextRecognizer;

/// Blank frame of a fixed size; counts how often it was asked
pub struct FixedCapture {
    pub size: (u32, u32),
    pub scale: f32,
    pub calls: AtomicUsize,
}

impl FixedCapture {
    pub fn new(size: (u32, u32), scale: f32) -> Self {
        Self {
            size,
            scale,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureProvider for FixedCapture {
    async fn capture(&self) -> Result<CapturedFrame, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CapturedFrame::new(
            RgbaImage::new(self.size.0, self.size.1),
            self.scale,
        ))
    }
}

pub struct FailingCapture;

#[async_trait]
impl CaptureProvider for FailingCapture {
    async fn capture(&self) -> Result<CapturedFrame, ExtractionError> {
        Err(ExtractionError::Capture("display unavailable".to_string()))
    }
}

/// Records (width, height, credential) of every image it reads
#[derive(Default)]
pub struct RecordingRecognizer {
    pub seen: Mutex<Vec<(u32, u32, String)>>,
}

#[async_trait]
impl TextRecognizer for RecordingRecognizer {
    async fn recognize(&self, png: &[u8], credential: &str) -> Result<String, ExtractionError> {
        let image = image::load_from_memory(png)
            .map_err(|e| ExtractionError::Task(e.to_string()))?;
        self.seen
            .lock()
            .push((image.width(), image.height(), credential.to_string()));
        Ok("recognized".to_string())
    }
}

/// Holds each request until the test releases the gate registered for its credential
#[derive(Default)]
pub struct GatedRecognizer {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<String, ExtractionError>>>>,
}

impl GatedRecognizer {
    /// Register a gate and return the sender that settles it
    pub fn gate(&self, credential: &str) -> oneshot::Sender<Result<String, ExtractionError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(credential.to_string(), rx);
        tx
    }
}

#[async_trait]
impl TextRecognizer for GatedRecognizer {
    async fn recognize(&self, _png: &[u8], credential: &str) -> Result<String, ExtractionError> {
        let gate = self
            .gates
            .lock()
            .remove(credential)
            .ok_or_else(|| ExtractionError::Transport(format!("no gate for {}", credential)))?;
        gate.await
            .map_err(|_| ExtractionError::Transport("gate dropped".to_string()))?
    }
}
