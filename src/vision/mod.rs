//! Vision Layer
//!
//! Turns a captured frame into text: crop the selection out at native
//! resolution, then hand the PNG to a remote vision-language model.

pub mod crop;
pub mod gemini;

pub use crop::{crop_to_png, CropError};
pub use gemini::{GeminiClient, TextRecognizer};
