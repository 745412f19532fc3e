use geo::Centroid;

use crate::types::{ShapeLabel, SymmetryAxis, SymmetryLine, TracedContour};

/// Area-moment centroid of a contour, or `None` when the enclosed area is
/// zero (degenerate contour, no meaningful center).
pub fn centroid(contour: &TracedContour) -> Option<[f64; 2]> {
    if contour.area <= f64::EPSILON {
        return None;
    }
    contour
        .to_geo_polygon()
        .centroid()
        .map(|point| [point.x(), point.y()])
}

/// Symmetry lines for a labeled contour, anchored at its centroid and
/// spanning the full image.
///
/// Circles, ellipses and squares get the vertical and horizontal axes.
/// Regular polygons (and stars, which share their treatment) additionally
/// get the two image diagonals, a coarse stand-in for their true rotational
/// symmetry axes. Other labels get none, as does any zero-area contour.
pub fn symmetry_lines(
    contour: &TracedContour,
    label: ShapeLabel,
    width: u32,
    height: u32,
) -> Vec<SymmetryLine> {
    if !label.has_axis_symmetry() {
        return Vec::new();
    }
    let Some([cx, cy]) = centroid(contour) else {
        return Vec::new();
    };

    let w = width as f64;
    let h = height as f64;
    let mut lines = vec![
        SymmetryLine {
            axis: SymmetryAxis::Vertical,
            start: [cx, 0.0],
            end: [cx, h],
        },
        SymmetryLine {
            axis: SymmetryAxis::Horizontal,
            start: [0.0, cy],
            end: [w, cy],
        },
    ];
    if label.has_diagonal_symmetry() {
        lines.push(SymmetryLine {
            axis: SymmetryAxis::DiagonalFalling,
            start: [0.0, 0.0],
            end: [w, h],
        });
        lines.push(SymmetryLine {
            axis: SymmetryAxis::DiagonalRising,
            start: [0.0, h],
            end: [w, 0.0],
        });
    }
    lines
}
