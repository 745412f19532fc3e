//! Shape recognition and occlusion completion for 2-D line art.
//!
//! The crate binarizes an input image, traces region boundaries, simplifies
//! them to minimal polygons, and classifies each one (line, triangle,
//! square, rectangle, regular polygon, star, circle, ellipse). Classified
//! shapes get smooth reconstructed outlines and symmetry-line overlays
//! drawn onto the output image. A separate completion engine fits ellipses
//! to partially occluded shapes and reports the missing boundary regions.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use shapes::{AnalyzerConfig, ShapeAnalyzer};
//!
//! fn main() -> shapes::Result<()> {
//!     let image = image::open("drawing.png")?.to_rgb8();
//!     let analyzer = ShapeAnalyzer::new(AnalyzerConfig::line_art());
//!     let analysis = analyzer.analyze(image)?;
//!     for record in analysis.records() {
//!         println!("{} ({} vertices)", record.label, record.vertex_count);
//!     }
//!     analysis.image.save("annotated.png")?;
//!     Ok(())
//! }
//! ```

pub mod algorithms;
pub mod completion;
pub mod config;
pub mod error;
pub mod fit;
pub mod pipeline;
pub mod render;
pub mod traits;
pub mod types;

pub use algorithms::*;
pub use completion::{CompletionEngine, CompletionReport, gap_contours, symmetric_difference};
pub use config::{AnalyzerConfig, CurveStrategy};
pub use error::{Result, ShapeError};
pub use fit::{EllipseFit, MIN_FIT_POINTS, fit_ellipse};
pub use pipeline::ShapeAnalyzer;
pub use render::{PeriodicSplineRenderer, QuadraticChainRenderer, palette};
pub use traits::{CurveRenderer, Preprocessor};
pub use types::{
    ApproxPolygon, ContourOutcome, ShapeAnalysis, ShapeLabel, ShapeRecord, SkipReason,
    SymmetryAxis, SymmetryLine, TracedContour,
};
