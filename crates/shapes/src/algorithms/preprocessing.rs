use image::GrayImage;
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::distance_transform::Norm;

use crate::{error::Result, traits::Preprocessor};

/// Fixed-threshold binarization.
///
/// With `invert` false, pixels above the cutoff become foreground; this is
/// the right polarity for line art on a white page (shape interiors stay
/// bright) and for white-on-black solid fills. `invert` flips it for dark
/// strokes that should themselves be the foreground.
#[derive(Debug, Clone)]
pub struct BinaryThreshold {
    pub threshold: u8,
    pub invert: bool,
}

impl Default for BinaryThreshold {
    fn default() -> Self {
        Self {
            threshold: 240,
            invert: false,
        }
    }
}

impl Preprocessor for BinaryThreshold {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let threshold_type = if self.invert {
            ThresholdType::BinaryInverted
        } else {
            ThresholdType::Binary
        };
        Ok(threshold(image, self.threshold, threshold_type))
    }
}

/// Morphological closing with a square structuring element, used to bridge
/// small gaps and speckle noise before contour extraction. A radius of zero
/// is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MorphologicalClose {
    pub radius: u8,
}

impl Preprocessor for MorphologicalClose {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.radius == 0 {
            return Ok(image.clone());
        }
        Ok(imageproc::morphology::close(image, Norm::LInf, self.radius))
    }
}
