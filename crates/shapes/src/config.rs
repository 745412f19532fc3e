use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How reconstructed boundary curves are rendered onto the output image.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CurveStrategy {
    /// Chain of quadratic interpolation curves between consecutive polygon
    /// vertices, one curve per edge.
    #[default]
    Segmentwise,
    /// Single closed interpolating spline through all polygon vertices.
    /// Contours with fewer than ten vertices are left undrawn.
    Spline,
}

/// Tuning knobs for the analysis and completion pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Grayscale cutoff used for binarization.
    pub threshold: u8,
    /// Radius of the square structuring element used for morphological
    /// closing before contour extraction. Zero disables closing.
    pub close_kernel_size: u8,
    /// Polygon simplification tolerance, as a fraction of each contour's
    /// arc length.
    pub epsilon_factor: f64,
    /// Contours with a smaller enclosed area are skipped.
    pub min_contour_area: f64,
    /// Contours larger than this fraction of the image area are skipped
    /// (typically the page background).
    pub max_contour_area_fraction: f64,
    pub curve_strategy: CurveStrategy,
    /// Half-width of the bounding-box aspect band treated as square.
    pub square_aspect_tolerance: f64,
    /// Half-width of the ellipse aspect band treated as circular.
    pub circle_aspect_tolerance: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold: 240,
            close_kernel_size: 0,
            epsilon_factor: 0.01,
            min_contour_area: 100.0,
            max_contour_area_fraction: 0.8,
            curve_strategy: CurveStrategy::Segmentwise,
            square_aspect_tolerance: 0.05,
            circle_aspect_tolerance: 0.05,
        }
    }
}

impl AnalyzerConfig {
    /// Preset for line art on a white background: bright pixels are kept as
    /// foreground, so shape interiors become the traced regions.
    pub fn line_art() -> Self {
        Self::default()
    }

    /// Preset for solid-fill inputs, used by occlusion completion.
    pub fn solid_fill() -> Self {
        Self {
            threshold: 127,
            ..Self::default()
        }
    }

    /// Preset for noisy input: closes small gaps before tracing, uses a
    /// tighter simplification tolerance, and renders with a spline.
    pub fn smoothed_spline() -> Self {
        Self {
            close_kernel_size: 2,
            epsilon_factor: 0.005,
            curve_strategy: CurveStrategy::Spline,
            ..Self::default()
        }
    }
}
