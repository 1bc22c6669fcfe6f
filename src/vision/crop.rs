//! Cropping a captured frame to the selected region
//!
//! Selections are made in logical pixels while captures are in device pixels,
//! so every coordinate is scaled before the copy. The crop is a straight pixel
//! copy: the output keeps the native resolution of the source.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

use crate::shared::Region;

/// Cropping failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    #[error("Selection has no area at this scale")]
    EmptyRegion,
    #[error("Selection lies outside the captured image")]
    OutsideFrame,
    #[error("Failed to encode PNG: {0}")]
    Encode(String),
}

/// Rectangle in device pixels, before clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Device coordinates are kept within this magnitude; anything larger is off-frame anyway
const MAX_DEVICE_COORD: f64 = i32::MAX as f64;

/// Scale a logical region into device pixels
pub fn device_rect(region: &Region, scale_factor: f32) -> DeviceRect {
    let scale = scale_factor as f64;
    // NaN survives the clamp and casts to 0
    let to_device = |v: f32| (v as f64 * scale).round().clamp(-MAX_DEVICE_COORD, MAX_DEVICE_COORD) as i64;
    DeviceRect {
        x: to_device(region.x),
        y: to_device(region.y),
        width: to_device(region.width),
        height: to_device(region.height),
    }
}

/// Cut `region` out of `frame`
///
/// A rectangle that is partly off the frame is clamped to it; one that misses
/// it entirely is an error.
pub fn crop(frame: &RgbaImage, region: &Region, scale_factor: f32) -> Result<RgbaImage, CropError> {
    let rect = device_rect(region, scale_factor);
    if rect.width <= 0 || rect.height <= 0 {
        return Err(CropError::EmptyRegion);
    }

    let frame_w = frame.width() as i64;
    let frame_h = frame.height() as i64;

    let left = rect.x.max(0);
    let top = rect.y.max(0);
    let right = rect.x.saturating_add(rect.width).min(frame_w);
    let bottom = rect.y.saturating_add(rect.height).min(frame_h);

    if right <= left || bottom <= top {
        return Err(CropError::OutsideFrame);
    }

    let cropped = image::imageops::crop_imm(
        frame,
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    )
    .to_image();

    Ok(cropped)
}

/// Encode an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CropError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| CropError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Crop and encode in one step
pub fn crop_to_png(frame: &RgbaImage, region: &Region, scale_factor: f32) -> Result<Vec<u8>, CropError> {
    let cropped = crop(frame, region, scale_factor)?;
    encode_png(&cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_device_rect_scales_every_coordinate() {
        let region = Region::new(10.0, 10.0, 100.0, 50.0);
        let rect = device_rect(&region, 2.0);
        assert_eq!(
            rect,
            DeviceRect {
                x: 20,
                y: 20,
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn test_crop_output_matches_scaled_size() {
        let frame = gradient(400, 300);

        for (scale, expected) in [(1.0, (100, 50)), (2.0, (200, 100)), (1.5, (150, 75))] {
            let out = crop(&frame, &Region::new(10.0, 10.0, 100.0, 50.0), scale).unwrap();
            assert_eq!(out.dimensions(), expected, "scale {}", scale);
        }
    }

    #[test]
    fn test_crop_copies_native_pixels() {
        let frame = gradient(400, 300);
        let out = crop(&frame, &Region::new(10.0, 10.0, 100.0, 50.0), 2.0).unwrap();

        // Top-left of the crop is device pixel (20, 20) of the source
        assert_eq!(out.get_pixel(0, 0), &Rgba([20, 20, 0, 255]));
        assert_eq!(out.get_pixel(199, 99), &Rgba([219, 119, 0, 255]));
    }

    #[test]
    fn test_crop_clamps_partial_overlap() {
        let frame = gradient(100, 100);
        let out = crop(&frame, &Region::new(-20.0, 80.0, 50.0, 50.0), 1.0).unwrap();
        assert_eq!(out.dimensions(), (30, 20));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 80, 0, 255]));
    }

    #[test]
    fn test_crop_rejects_outside_frame() {
        let frame = gradient(100, 100);
        let result = crop(&frame, &Region::new(150.0, 10.0, 20.0, 20.0), 1.0);
        assert_eq!(result, Err(CropError::OutsideFrame));
    }

    #[test]
    fn test_crop_rejects_zero_area() {
        let frame = gradient(100, 100);
        let result = crop(&frame, &Region::new(10.0, 10.0, 0.0, 20.0), 2.0);
        assert_eq!(result, Err(CropError::EmptyRegion));
    }

    #[test]
    fn test_crop_to_png_decodes_back() {
        let frame = gradient(64, 64);
        let bytes = crop_to_png(&frame, &Region::new(8.0, 8.0, 16.0, 8.0), 2.0).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn test_extreme_coordinates_are_rejected_not_overflowed() {
        let frame = RgbaImage::new(100, 100);

        assert_eq!(
            crop(&frame, &Region::new(f32::MAX, 0.0, 10.0, 10.0), 1.0),
            Err(CropError::OutsideFrame)
        );
        assert_eq!(
            crop(&frame, &Region::new(f32::MIN, f32::MIN, 10.0, 10.0), 2.0),
            Err(CropError::OutsideFrame)
        );
        assert_eq!(
            crop(&frame, &Region::new(f32::NAN, 0.0, 10.0, 10.0), 1.0).map(|i| i.dimensions()),
            Ok((10, 10))
        );
    }

    #[test]
    fn test_huge_region_clamps_to_frame() {
        let frame = RgbaImage::new(100, 80);

        let out = crop(&frame, &Region::new(0.0, 0.0, f32::MAX, f32::MAX), 4.0).unwrap();
        assert_eq!(out.dimensions(), (100, 80));

        let rect = device_rect(&Region::new(0.0, 0.0, f32::MAX, 1.0), 1.0);
        assert_eq!(rect.width, i32::MAX as i64);
    }
}
