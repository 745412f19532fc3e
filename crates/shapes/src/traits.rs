use image::{GrayImage, Rgb, RgbImage};

use crate::error::Result;

/// Trait for binary-mask preparation stages (thresholding, morphology).
pub trait Preprocessor: Send + Sync {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for smooth-curve reconstruction strategies.
pub trait CurveRenderer: Send + Sync {
    /// Draw a smooth closed approximation of `vertices` onto `target`.
    /// Strategies may silently skip vertex sets they cannot handle.
    fn render(&self, target: &mut RgbImage, vertices: &[[f64; 2]], color: Rgb<u8>);
}
