//! Screen Capture Layer
//!
//! Produces one full-surface frame per extraction. The live implementation
//! grabs a monitor through xcap; the file-backed one replays a saved
//! screenshot for headless runs.

pub mod frame;

use async_trait::async_trait;
use image::RgbaImage;
use std::path::PathBuf;
use tracing::debug;
use xcap::Monitor;

pub use frame::CapturedFrame;

use crate::error::ExtractionError;

/// Source of full-surface frames
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Capture the whole visible surface
    async fn capture(&self) -> Result<CapturedFrame, ExtractionError>;
}

/// Description of a capturable monitor
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub index: usize,
    pub name: String,
    /// Top-left corner in desktop coordinates
    pub position: (i32, i32),
    /// Size in device pixels
    pub size: (u32, u32),
    pub scale_factor: f32,
    pub is_primary: bool,
}

impl MonitorInfo {
    /// Monitor size in logical pixels
    pub fn logical_size(&self) -> (f32, f32) {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        (self.size.0 as f32 / scale, self.size.1 as f32 / scale)
    }
}

/// List monitors in xcap enumeration order
pub fn list_monitors() -> Vec<MonitorInfo> {
    match Monitor::all() {
        Ok(monitors) => monitors
            .iter()
            .enumerate()
            .map(|(index, m)| MonitorInfo {
                index,
                name: m.name().to_string(),
                position: (m.x(), m.y()),
                size: (m.width(), m.height()),
                scale_factor: m.scale_factor(),
                is_primary: m.is_primary(),
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to enumerate monitors: {}", e);
            Vec::new()
        }
    }
}

/// Live capture of a single monitor
#[derive(Debug, Clone)]
pub struct ScreenCapture {
    /// Monitor index as reported by `list_monitors`
    pub monitor_index: usize,
}

impl ScreenCapture {
    pub fn new(monitor_index: usize) -> Self {
        Self { monitor_index }
    }
}

#[async_trait]
impl CaptureProvider for ScreenCapture {
    async fn capture(&self) -> Result<CapturedFrame, ExtractionError> {
        let index = self.monitor_index;
        tokio::task::spawn_blocking(move || capture_monitor(index))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}

fn capture_monitor(index: usize) -> Result<CapturedFrame, ExtractionError> {
    let monitors = Monitor::all().map_err(|e| ExtractionError::Capture(e.to_string()))?;
    let monitor = monitors
        .get(index)
        .ok_or_else(|| ExtractionError::Capture(format!("No monitor at index {}", index)))?;

    let shot = monitor
        .capture_image()
        .map_err(|e| ExtractionError::Capture(e.to_string()))?;

    let (width, height) = (shot.width(), shot.height());
    let image = RgbaImage::from_raw(width, height, shot.into_raw())
        .ok_or_else(|| ExtractionError::Capture("Captured buffer has the wrong size".to_string()))?;

    debug!(
        "Captured monitor {} at {}x{} (scale {})",
        index,
        width,
        height,
        monitor.scale_factor()
    );

    Ok(CapturedFrame::new(image, monitor.scale_factor()))
}

/// Replays an image file as the captured surface
#[derive(Debug, Clone)]
pub struct FileCapture {
    pub path: PathBuf,
    pub scale_factor: f32,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>, scale_factor: f32) -> Self {
        Self {
            path: path.into(),
            scale_factor,
        }
    }
}

#[async_trait]
impl CaptureProvider for FileCapture {
    async fn capture(&self) -> Result<CapturedFrame, ExtractionError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ExtractionError::Capture(format!("{}: {}", self.path.display(), e)))?;

        let scale_factor = self.scale_factor;
        tokio::task::spawn_blocking(move || CapturedFrame::from_encoded(&bytes, scale_factor))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
            .map_err(|e| ExtractionError::Capture(e.to_string()))
    }
}
