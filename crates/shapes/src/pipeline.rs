//! The shape analysis pipeline: binarize, trace, simplify, classify,
//! derive symmetry, and redraw smooth boundaries onto the output image.

use image::RgbImage;
use tracing::{debug, warn};

use crate::algorithms::{
    BinaryThreshold, ExtractionMode, MorphologicalClose, approximate_polygon, classify,
    extract_contours, symmetry,
};
use crate::config::{AnalyzerConfig, CurveStrategy};
use crate::error::{Result, ShapeError};
use crate::render::{
    self, PeriodicSplineRenderer, QuadraticChainRenderer, draw_symmetry_lines_mut, palette,
};
use crate::traits::{CurveRenderer, Preprocessor};
use crate::types::{ContourOutcome, ShapeAnalysis, ShapeRecord, SkipReason, TracedContour};

/// Classifies every shape in an image and draws the reconstruction
/// overlays.
///
/// The analyzer owns the output buffer for the duration of one `analyze`
/// call and hands it back inside the result; it keeps no state between
/// invocations, so independent images can be processed from independent
/// analyzers concurrently.
pub struct ShapeAnalyzer {
    config: AnalyzerConfig,
    preprocessors: Vec<Box<dyn Preprocessor>>,
    renderer: Box<dyn CurveRenderer>,
}

impl ShapeAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let preprocessors: Vec<Box<dyn Preprocessor>> = vec![
            Box::new(BinaryThreshold {
                threshold: config.threshold,
                invert: false,
            }),
            Box::new(MorphologicalClose {
                radius: config.close_kernel_size,
            }),
        ];
        let renderer: Box<dyn CurveRenderer> = match config.curve_strategy {
            CurveStrategy::Segmentwise => Box::new(QuadraticChainRenderer::default()),
            CurveStrategy::Spline => Box::new(PeriodicSplineRenderer::default()),
        };
        Self {
            config,
            preprocessors,
            renderer,
        }
    }

    /// Replace the curve reconstruction strategy.
    pub fn with_renderer(mut self, renderer: impl CurveRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Process one image to completion.
    ///
    /// Contours that fail area gating or ellipse fitting are reported as
    /// skipped outcomes; the rest of the image is still processed.
    pub fn analyze(&self, image: RgbImage) -> Result<ShapeAnalysis> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ShapeError::EmptyImage);
        }

        let mut mask = image::imageops::grayscale(&image);
        for preprocessor in &self.preprocessors {
            mask = preprocessor.preprocess(&mask)?;
        }

        let contours = extract_contours(&mask, ExtractionMode::External);
        debug!(count = contours.len(), "extracted contours");

        let max_area = self.config.max_contour_area_fraction * (width as f64) * (height as f64);
        let mut output = image;
        let mut outcomes = Vec::with_capacity(contours.len());
        for contour in &contours {
            let outcome = self.process_contour(contour, &mut output, width, height, max_area);
            match &outcome {
                ContourOutcome::Classified(record) => {
                    debug!(label = %record.label, vertices = record.vertex_count, "classified contour");
                }
                ContourOutcome::Skipped(reason) => {
                    warn!(%reason, "skipping contour");
                }
            }
            outcomes.push(outcome);
        }

        Ok(ShapeAnalysis {
            outcomes,
            image: output,
            width,
            height,
        })
    }

    fn process_contour(
        &self,
        contour: &TracedContour,
        output: &mut RgbImage,
        width: u32,
        height: u32,
        max_area: f64,
    ) -> ContourOutcome {
        if contour.area < self.config.min_contour_area || contour.area > max_area {
            return ContourOutcome::Skipped(SkipReason::AreaOutOfRange { area: contour.area });
        }

        let polygon = approximate_polygon(contour, self.config.epsilon_factor);
        self.renderer
            .render(output, &polygon.vertices, palette::CURVE);

        let (label, ellipse) = match classify(&polygon, contour, &self.config) {
            Ok(result) => result,
            Err(reason) => return ContourOutcome::Skipped(reason),
        };
        if let Some(fit) = &ellipse {
            render::draw_ellipse_outline_mut(output, fit, palette::FITTED_ELLIPSE);
        }

        let centroid = symmetry::centroid(contour);
        let symmetry = symmetry::symmetry_lines(contour, label, width, height);
        draw_symmetry_lines_mut(output, &symmetry, palette::SYMMETRY);

        ContourOutcome::Classified(ShapeRecord {
            label,
            vertex_count: polygon.vertex_count(),
            area: contour.area,
            centroid,
            ellipse,
            symmetry,
        })
    }
}

impl Default for ShapeAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeLabel;
    use image::Rgb;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::new(width, height)
    }

    fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
    }

    #[test]
    fn empty_image_is_an_input_error() {
        let analyzer = ShapeAnalyzer::default();
        assert!(matches!(
            analyzer.analyze(RgbImage::new(0, 0)),
            Err(ShapeError::EmptyImage)
        ));
    }

    #[test]
    fn blank_image_yields_no_outcomes() {
        let analyzer = ShapeAnalyzer::default();
        let analysis = analyzer.analyze(blank(100, 100)).unwrap();
        assert!(analysis.outcomes.is_empty());
    }

    #[test]
    fn small_speckle_is_skipped_with_area_reason() {
        let mut image = blank(100, 100);
        fill_rect(&mut image, 10, 10, 14, 14);
        let analyzer = ShapeAnalyzer::default();
        let analysis = analyzer.analyze(image).unwrap();
        assert_eq!(analysis.outcomes.len(), 1);
        assert!(matches!(
            analysis.outcomes[0],
            ContourOutcome::Skipped(SkipReason::AreaOutOfRange { .. })
        ));
        assert_eq!(analysis.records().count(), 0);
    }

    #[test]
    fn oversized_region_is_skipped() {
        // 96x96 of a 100x100 image is above the 0.8 area fraction cap.
        let mut image = blank(100, 100);
        fill_rect(&mut image, 2, 2, 98, 98);
        let analyzer = ShapeAnalyzer::default();
        let analysis = analyzer.analyze(image).unwrap();
        assert_eq!(analysis.outcomes.len(), 1);
        assert!(matches!(
            analysis.outcomes[0],
            ContourOutcome::Skipped(SkipReason::AreaOutOfRange { .. })
        ));
        assert_eq!(analysis.records().count(), 0);
    }

    #[test]
    fn fully_filled_image_yields_no_contours() {
        // All-foreground leaves no background to trace a boundary against.
        let mut image = blank(100, 100);
        fill_rect(&mut image, 0, 0, 100, 100);
        let analyzer = ShapeAnalyzer::default();
        let analysis = analyzer.analyze(image).unwrap();
        assert!(analysis.outcomes.is_empty());
    }

    #[test]
    fn rectangle_is_classified_and_drawn() {
        let mut image = blank(200, 120);
        fill_rect(&mut image, 20, 20, 180, 100);
        let analyzer = ShapeAnalyzer::default();
        let analysis = analyzer.analyze(image).unwrap();

        let record = analysis.records().next().expect("one classified shape");
        assert_eq!(record.label, ShapeLabel::Rectangle);
        assert_eq!(record.vertex_count, 4);
        assert!(record.symmetry.is_empty());
        // The reconstructed boundary is drawn in the curve color.
        assert_eq!(*analysis.image.get_pixel(20, 20), palette::CURVE);
    }

    #[test]
    fn mixed_scene_reports_every_contour() {
        let mut image = blank(300, 150);
        fill_rect(&mut image, 20, 20, 120, 120); // square
        fill_rect(&mut image, 200, 40, 204, 44); // speckle, below min area
        let analyzer = ShapeAnalyzer::default();
        let analysis = analyzer.analyze(image).unwrap();
        assert_eq!(analysis.outcomes.len(), 2);
        assert_eq!(analysis.records().count(), 1);
    }
}
