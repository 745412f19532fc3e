//! Occlusion completion: fit ellipses to every traced boundary, rasterize
//! the idealized shapes, and diff them against the observed mask to locate
//! the missing arcs.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tracing::{debug, warn};

use crate::algorithms::{ExtractionMode, extract_contours};
use crate::config::AnalyzerConfig;
use crate::error::{Result, ShapeError};
use crate::fit::{self, EllipseFit};
use crate::render::{self, palette};
use crate::traits::Preprocessor;
use crate::types::SkipReason;

/// Recovers occluded parts of elliptical shapes.
///
/// Boundaries are partitioned into outer shells and inner holes via the
/// contour hierarchy, each partition is reconstructed from its fitted
/// ellipses, and the symmetric difference against the observed mask yields
/// the gap regions for that partition.
pub struct CompletionEngine {
    config: AnalyzerConfig,
}

impl CompletionEngine {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn complete(&self, image: RgbImage) -> Result<CompletionReport> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ShapeError::EmptyImage);
        }

        let mut mask = image::imageops::grayscale(&image);
        mask = crate::algorithms::BinaryThreshold {
            threshold: self.config.threshold,
            invert: false,
        }
        .preprocess(&mask)?;
        mask = crate::algorithms::MorphologicalClose {
            radius: self.config.close_kernel_size,
        }
        .preprocess(&mask)?;

        let contours = extract_contours(&mask, ExtractionMode::Tree);
        debug!(count = contours.len(), "traced boundaries for completion");

        let mut outer_ellipses = Vec::new();
        let mut inner_ellipses = Vec::new();
        let mut outer_ideal = GrayImage::new(width, height);
        let mut inner_ideal = GrayImage::new(width, height);
        let mut skipped = Vec::new();
        for contour in &contours {
            if contour.points.len() < fit::MIN_FIT_POINTS {
                skipped.push(SkipReason::TooFewPointsForFit {
                    points: contour.points.len(),
                });
                continue;
            }
            let Some(ellipse) = fit::fit_ellipse(&contour.points) else {
                warn!(points = contour.points.len(), "ellipse fit failed on boundary");
                skipped.push(SkipReason::EllipseFitFailed);
                continue;
            };
            if contour.parent.is_none() {
                render::draw_filled_ellipse_mut(&mut outer_ideal, &ellipse, Luma([255u8]));
                outer_ellipses.push(ellipse);
            } else {
                render::draw_filled_ellipse_mut(&mut inner_ideal, &ellipse, Luma([255u8]));
                inner_ellipses.push(ellipse);
            }
        }

        // Both diffs are taken against the one original mask. A shape with
        // no holes therefore shows up whole in the inner diff; only the
        // outer diff indicates occlusion (see `is_complete`).
        let outer_diff = symmetric_difference(&mask, &outer_ideal);
        let missing_outer = gap_contours(&outer_diff, self.config.min_contour_area);
        let inner_diff = symmetric_difference(&mask, &inner_ideal);
        let missing_inner = gap_contours(&inner_diff, self.config.min_contour_area);

        let mut output = image;
        for ellipse in &outer_ellipses {
            render::draw_ellipse_outline_mut(&mut output, ellipse, palette::OUTER_GAP);
        }
        for ellipse in &inner_ellipses {
            render::draw_ellipse_outline_mut(&mut output, ellipse, palette::INNER_GAP);
        }
        for gap in &missing_outer {
            render::draw_polyline_mut(&mut output, gap, true, palette::OUTER_GAP);
        }
        for gap in &missing_inner {
            render::draw_polyline_mut(&mut output, gap, true, palette::INNER_GAP);
        }

        Ok(CompletionReport {
            image: output,
            outer_ellipses,
            inner_ellipses,
            missing_outer,
            missing_inner,
            skipped,
            width,
            height,
        })
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(AnalyzerConfig::solid_fill())
    }
}

/// Result of one completion pass. Gap regions are closed boundary chains in
/// pixel coordinates; an empty outer gap list means nothing was occluded.
pub struct CompletionReport {
    pub image: RgbImage,
    pub outer_ellipses: Vec<EllipseFit>,
    pub inner_ellipses: Vec<EllipseFit>,
    pub missing_outer: Vec<Vec<[f64; 2]>>,
    pub missing_inner: Vec<Vec<[f64; 2]>>,
    pub skipped: Vec<SkipReason>,
    pub width: u32,
    pub height: u32,
}

impl CompletionReport {
    /// True when the visible silhouette is fully explained by the fitted
    /// outer ellipses.
    ///
    /// Judged on the outer diff alone: the inner diff of a shape without
    /// holes contains the whole silhouette (the inner reconstruction is
    /// empty), so inner gap regions do not by themselves mean occlusion.
    pub fn is_complete(&self) -> bool {
        self.missing_outer.is_empty()
    }
}

/// Pixel-wise XOR of two binary masks, 255 where exactly one input is set.
pub fn symmetric_difference(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let (width, height) = a.dimensions();
    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let set_a = a.get_pixel(x, y)[0] > 0;
        let set_b = b.get_pixel(x, y)[0] > 0;
        if set_a != set_b {
            *pixel = Luma([255]);
        }
    }
    out
}

/// Extract the boundaries of gap regions from a difference mask.
///
/// A one-pixel morphological opening removes the hairline rims that
/// rasterization mismatch leaves along otherwise-complete boundaries, and
/// the area filter drops any residual slivers.
pub fn gap_contours(diff: &GrayImage, min_area: f64) -> Vec<Vec<[f64; 2]>> {
    let opened = morphology::open(diff, Norm::LInf, 1);
    extract_contours(&opened, ExtractionMode::External)
        .into_iter()
        .filter(|contour| contour.area >= min_area)
        .map(|contour| contour.points)
        .collect()
}
