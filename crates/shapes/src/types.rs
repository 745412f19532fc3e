use geo::Area;
use geo_types::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::fit::EllipseFit;

/// Category assigned to a contour by the classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum ShapeLabel {
    Line,
    Triangle,
    Square,
    Rectangle,
    RegularPolygon,
    /// Any ten-vertex polygon. This is a coarse heuristic rather than true
    /// star-polygon detection; it receives regular-polygon symmetry.
    Star,
    Circle,
    Ellipse,
    Unclassified,
}

impl ShapeLabel {
    /// Labels that receive vertical and horizontal symmetry lines.
    pub fn has_axis_symmetry(self) -> bool {
        matches!(
            self,
            Self::Circle | Self::Ellipse | Self::Square | Self::RegularPolygon | Self::Star
        )
    }

    /// Labels that additionally receive the two corner-to-corner diagonals.
    pub fn has_diagonal_symmetry(self) -> bool {
        matches!(self, Self::RegularPolygon | Self::Star)
    }
}

/// A closed boundary traced from the binary mask.
///
/// `parent` is an index into the contour set this contour was extracted
/// with; `None` marks an outermost boundary. The flat parent-index layout
/// keeps the nesting hierarchy acyclic by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracedContour {
    pub points: Vec<[f64; 2]>,
    pub parent: Option<usize>,
    /// True for an outer border, false for the border of a hole.
    pub is_outer: bool,
    /// Enclosed area of the closed boundary.
    pub area: f64,
    /// Perimeter of the closed boundary.
    pub arc_length: f64,
}

impl TracedContour {
    pub fn new(points: Vec<[f64; 2]>, parent: Option<usize>, is_outer: bool) -> Self {
        let area = ring_area(&points);
        let arc_length = ring_perimeter(&points);
        Self {
            points,
            parent,
            is_outer,
            area,
            arc_length,
        }
    }

    /// Convert to a geo-types polygon for geometric operations.
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect();
        Polygon::new(LineString::new(coords), vec![])
    }
}

fn ring_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let coords: Vec<Coord<f64>> = points.iter().map(|&[x, y]| Coord { x, y }).collect();
    Polygon::new(LineString::new(coords), vec![]).unsigned_area()
}

fn ring_perimeter(points: &[[f64; 2]]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..points.len() {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % points.len()];
        total += (x1 - x0).hypot(y1 - y0);
    }
    total
}

/// Simplified closed polygon produced from a contour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproxPolygon {
    /// Ordered vertices; the closing edge back to the first vertex is
    /// implicit.
    pub vertices: Vec<[f64; 2]>,
}

impl ApproxPolygon {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    pub fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        for &[x, y] in &self.vertices {
            min[0] = min[0].min(x);
            min[1] = min[1].min(y);
            max[0] = max[0].max(x);
            max[1] = max[1].max(y);
        }
        (min, max)
    }

    /// Bounding-box width over height.
    pub fn aspect_ratio(&self) -> f64 {
        let (min, max) = self.bounding_box();
        let width = max[0] - min[0];
        let height = max[1] - min[1];
        if height <= f64::EPSILON {
            f64::INFINITY
        } else {
            width / height
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryAxis {
    Vertical,
    Horizontal,
    /// Top-left to bottom-right image diagonal.
    DiagonalFalling,
    /// Bottom-left to top-right image diagonal.
    DiagonalRising,
}

/// One symmetry line segment, spanning the full image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetryLine {
    pub axis: SymmetryAxis,
    pub start: [f64; 2],
    pub end: [f64; 2],
}

/// Classification result for a single contour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub label: ShapeLabel,
    pub vertex_count: usize,
    pub area: f64,
    /// Area-moment centroid; `None` for a degenerate zero-area contour.
    pub centroid: Option<[f64; 2]>,
    /// Present only when classification went through the ellipse fit.
    pub ellipse: Option<EllipseFit>,
    pub symmetry: Vec<SymmetryLine>,
}

/// Why a contour was skipped instead of classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("contour area {area} outside the configured range")]
    AreaOutOfRange { area: f64 },
    #[error("ellipse fit needs at least 5 points, contour has {points}")]
    TooFewPointsForFit { points: usize },
    #[error("ellipse fit was numerically degenerate")]
    EllipseFitFailed,
}

/// Per-contour outcome. Skips are surfaced explicitly so callers can tell
/// "no contours found" apart from "contours found but rejected".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ContourOutcome {
    Classified(ShapeRecord),
    Skipped(SkipReason),
}

impl ContourOutcome {
    pub fn record(&self) -> Option<&ShapeRecord> {
        match self {
            Self::Classified(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }
}

/// Result of one analysis pass: per-contour outcomes plus the annotated
/// render target, handed back to the caller.
#[derive(Debug)]
pub struct ShapeAnalysis {
    pub outcomes: Vec<ContourOutcome>,
    pub image: image::RgbImage,
    pub width: u32,
    pub height: u32,
}

impl ShapeAnalysis {
    /// Iterate over successfully classified shapes.
    pub fn records(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.outcomes.iter().filter_map(ContourOutcome::record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
    }

    #[test]
    fn contour_area_and_perimeter() {
        let contour = TracedContour::new(unit_square(), None, true);
        assert!((contour.area - 100.0).abs() < 1e-9);
        assert!((contour.arc_length - 40.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_contour_has_zero_area() {
        let contour = TracedContour::new(vec![[0.0, 0.0], [5.0, 0.0]], None, true);
        assert_eq!(contour.area, 0.0);
    }

    #[test]
    fn polygon_aspect_ratio() {
        let polygon = ApproxPolygon {
            vertices: vec![[0.0, 0.0], [105.0, 0.0], [105.0, 100.0], [0.0, 100.0]],
        };
        assert!((polygon.aspect_ratio() - 1.05).abs() < 1e-12);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = ContourOutcome::Skipped(SkipReason::AreaOutOfRange { area: 3.0 });
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"skipped\""), "{json}");
        assert!(json.contains("area_out_of_range"), "{json}");
    }

    #[test]
    fn star_inherits_regular_polygon_symmetry() {
        assert!(ShapeLabel::Star.has_axis_symmetry());
        assert!(ShapeLabel::Star.has_diagonal_symmetry());
        assert!(!ShapeLabel::Rectangle.has_axis_symmetry());
    }
}
