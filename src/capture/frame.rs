//! Frame data structures for captured screen content

use image::RgbaImage;
use std::time::Instant;

/// A full-surface capture, consumed by a single crop
#[derive(Debug)]
pub struct CapturedFrame {
    /// Decoded RGBA pixels in device resolution
    pub image: RgbaImage,
    /// Device pixels per logical pixel
    pub scale_factor: f32,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CapturedFrame {
    /// Create a new captured frame
    pub fn new(image: RgbaImage, scale_factor: f32) -> Self {
        Self {
            image,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
            captured_at: Instant::now(),
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...) into a frame
    pub fn from_encoded(bytes: &[u8], scale_factor: f32) -> image::ImageResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::new(image, scale_factor))
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::crop::encode_png;

    #[test]
    fn test_from_encoded_roundtrips_dimensions() {
        let png = encode_png(&RgbaImage::new(12, 7)).unwrap();
        let frame = CapturedFrame::from_encoded(&png, 2.0).unwrap();
        assert_eq!(frame.dimensions(), (12, 7));
        assert_eq!(frame.scale_factor, 2.0);
    }

    #[test]
    fn test_non_positive_scale_falls_back_to_one() {
        let frame = CapturedFrame::new(RgbaImage::new(1, 1), 0.0);
        assert_eq!(frame.scale_factor, 1.0);
    }

    #[test]
    fn test_from_encoded_rejects_garbage() {
        assert!(CapturedFrame::from_encoded(b"not an image", 1.0).is_err());
    }
}
