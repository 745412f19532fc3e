use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

use crate::types::TracedContour;

/// Which part of the contour nesting hierarchy to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Outermost boundaries only.
    #[default]
    External,
    /// All boundaries with parent links intact; holes point at the
    /// boundary enclosing them.
    Tree,
}

/// Trace closed boundaries in a binary mask.
///
/// Boundaries are 8-connected; runs of collinear points are collapsed so a
/// straight edge is represented by its two endpoints. An empty or
/// all-background mask yields an empty set.
pub fn extract_contours(mask: &GrayImage, mode: ExtractionMode) -> Vec<TracedContour> {
    let raw = find_contours::<i32>(mask);
    let contours: Vec<TracedContour> = raw
        .into_iter()
        .map(|contour| {
            let points: Vec<[f64; 2]> = contour
                .points
                .iter()
                .map(|p| [p.x as f64, p.y as f64])
                .collect();
            TracedContour::new(
                collapse_collinear(points),
                contour.parent,
                contour.border_type == BorderType::Outer,
            )
        })
        .collect();

    match mode {
        ExtractionMode::Tree => contours,
        ExtractionMode::External => contours
            .into_iter()
            .filter(|c| c.parent.is_none())
            .collect(),
    }
}

/// Drop points that merely continue a straight run, keeping every point
/// where the boundary changes direction (including reversals on
/// single-pixel-wide features).
pub fn collapse_collinear(points: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let [px, py] = points[(i + n - 1) % n];
        let [cx, cy] = points[i];
        let [nx, ny] = points[(i + 1) % n];
        let (ax, ay) = (cx - px, cy - py);
        let (bx, by) = (nx - cx, ny - cy);
        let cross = ax * by - ay * bx;
        let dot = ax * bx + ay * by;
        if cross != 0.0 || dot <= 0.0 {
            kept.push(points[i]);
        }
    }
    if kept.len() < 2 { points } else { kept }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn filled_rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn empty_mask_yields_no_contours() {
        let mask = GrayImage::new(50, 50);
        assert!(extract_contours(&mask, ExtractionMode::Tree).is_empty());
    }

    #[test]
    fn filled_square_yields_one_external_contour() {
        let mask = filled_rect_mask(60, 60, 10, 10, 50, 50);
        let contours = extract_contours(&mask, ExtractionMode::External);
        assert_eq!(contours.len(), 1);
        let square = &contours[0];
        assert!(square.is_outer);
        assert!(square.parent.is_none());
        // 40x40 pixel block traced along pixel centers encloses 39x39.
        assert!((square.area - 39.0 * 39.0).abs() < 1.0);
        assert_eq!(square.points.len(), 4);
    }

    #[test]
    fn hole_is_linked_to_its_parent() {
        let mut mask = filled_rect_mask(60, 60, 10, 10, 50, 50);
        for y in 25..35 {
            for x in 25..35 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let tree = extract_contours(&mask, ExtractionMode::Tree);
        assert!(tree.iter().any(|c| c.parent.is_none() && c.is_outer));
        assert!(tree.iter().any(|c| c.parent.is_some() && !c.is_outer));

        let external = extract_contours(&mask, ExtractionMode::External);
        assert_eq!(external.len(), 1);
    }

    #[test]
    fn collinear_runs_collapse_to_endpoints() {
        let points: Vec<[f64; 2]> = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [3.0, 0.0],
            [3.0, 1.0],
            [3.0, 2.0],
            [2.0, 2.0],
            [1.0, 2.0],
            [0.0, 2.0],
            [0.0, 1.0],
        ];
        let collapsed = collapse_collinear(points);
        assert_eq!(
            collapsed,
            vec![[0.0, 0.0], [3.0, 0.0], [3.0, 2.0], [0.0, 2.0]]
        );
    }

    #[test]
    fn reversal_points_survive_collapse() {
        // A one-pixel-thick horizontal stroke: out and back along one row.
        let points: Vec<[f64; 2]> = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [2.0, 0.0],
            [3.0, 0.0],
            [2.0, 0.0],
            [1.0, 0.0],
        ];
        let collapsed = collapse_collinear(points);
        assert!(collapsed.contains(&[0.0, 0.0]));
        assert!(collapsed.contains(&[3.0, 0.0]));
        assert!(collapsed.len() <= 3);
    }
}
