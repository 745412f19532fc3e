use crate::config::AnalyzerConfig;
use crate::fit::{self, EllipseFit};
use crate::types::{ApproxPolygon, ShapeLabel, SkipReason, TracedContour};

/// Aspect deviation beyond which a fitted conic counts as an ellipse.
/// Fits between the circle band and this bound stay unclassified.
const ELLIPSE_ASPECT_DEVIATION: f64 = 0.1;

/// Guard against float rounding flipping an exactly-on-boundary ratio.
const BOUNDARY_EPS: f64 = 1e-9;

/// Map a simplified polygon to a shape category.
///
/// The decision is driven by vertex count; only high vertex counts (or
/// degenerate ones) fall through to an ellipse fit on the full contour,
/// which is where a skip can occur. The result is a pure function of the
/// input geometry.
pub fn classify(
    polygon: &ApproxPolygon,
    contour: &TracedContour,
    config: &AnalyzerConfig,
) -> Result<(ShapeLabel, Option<EllipseFit>), SkipReason> {
    match polygon.vertex_count() {
        2 => Ok((ShapeLabel::Line, None)),
        3 => Ok((ShapeLabel::Triangle, None)),
        4 => Ok((
            rect_label(polygon.aspect_ratio(), config.square_aspect_tolerance),
            None,
        )),
        5..=9 => Ok((ShapeLabel::RegularPolygon, None)),
        10 => Ok((ShapeLabel::Star, None)),
        _ => {
            if contour.points.len() < fit::MIN_FIT_POINTS {
                return Err(SkipReason::TooFewPointsForFit {
                    points: contour.points.len(),
                });
            }
            let ellipse =
                fit::fit_ellipse(&contour.points).ok_or(SkipReason::EllipseFitFailed)?;
            let label = ellipse_label(ellipse.aspect_ratio(), config.circle_aspect_tolerance);
            Ok((label, Some(ellipse)))
        }
    }
}

/// Four-vertex polygons: square when the bounding box is near 1:1.
pub fn rect_label(aspect_ratio: f64, tolerance: f64) -> ShapeLabel {
    if (aspect_ratio - 1.0).abs() <= tolerance + BOUNDARY_EPS {
        ShapeLabel::Square
    } else {
        ShapeLabel::Rectangle
    }
}

/// Fitted-ellipse aspect ratios: near 1 is a circle, clearly away from 1 is
/// an ellipse, and the band in between is deliberately left unclassified.
pub fn ellipse_label(aspect_ratio: f64, tolerance: f64) -> ShapeLabel {
    let deviation = (aspect_ratio - 1.0).abs();
    if deviation <= tolerance + BOUNDARY_EPS {
        ShapeLabel::Circle
    } else if deviation > ELLIPSE_ASPECT_DEVIATION + BOUNDARY_EPS {
        ShapeLabel::Ellipse
    } else {
        ShapeLabel::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::EllipseFit;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig::default()
    }

    fn polygon_and_contour(vertices: Vec<[f64; 2]>) -> (ApproxPolygon, TracedContour) {
        let contour = TracedContour::new(vertices.clone(), None, true);
        (ApproxPolygon { vertices }, contour)
    }

    fn regular_ngon(n: usize, radius: f64) -> Vec<[f64; 2]> {
        (0..n)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / n as f64;
                [100.0 + radius * t.cos(), 100.0 + radius * t.sin()]
            })
            .collect()
    }

    fn label_of(vertices: Vec<[f64; 2]>) -> ShapeLabel {
        let (polygon, contour) = polygon_and_contour(vertices);
        classify(&polygon, &contour, &config()).unwrap().0
    }

    #[test]
    fn vertex_count_decision_table() {
        assert_eq!(label_of(vec![[0.0, 0.0], [10.0, 0.0]]), ShapeLabel::Line);
        assert_eq!(label_of(regular_ngon(3, 50.0)), ShapeLabel::Triangle);
        for n in 5..=9 {
            assert_eq!(label_of(regular_ngon(n, 50.0)), ShapeLabel::RegularPolygon);
        }
    }

    #[test]
    fn ten_vertex_polygon_is_labeled_star() {
        // Any ten-vertex polygon, convex or not, takes the star label.
        assert_eq!(label_of(regular_ngon(10, 50.0)), ShapeLabel::Star);
    }

    #[test]
    fn square_aspect_boundary_is_inclusive() {
        let square = vec![[0.0, 0.0], [105.0, 0.0], [105.0, 100.0], [0.0, 100.0]];
        assert_eq!(label_of(square), ShapeLabel::Square);
        let rect = vec![[0.0, 0.0], [105.1, 0.0], [105.1, 100.0], [0.0, 100.0]];
        assert_eq!(label_of(rect), ShapeLabel::Rectangle);
        let tall = vec![[0.0, 0.0], [95.0, 0.0], [95.0, 100.0], [0.0, 100.0]];
        assert_eq!(label_of(tall), ShapeLabel::Square);
    }

    #[test]
    fn rect_label_boundaries() {
        assert_eq!(rect_label(1.05, 0.05), ShapeLabel::Square);
        assert_eq!(rect_label(0.95, 0.05), ShapeLabel::Square);
        assert_eq!(rect_label(1.051, 0.05), ShapeLabel::Rectangle);
        assert_eq!(rect_label(0.949, 0.05), ShapeLabel::Rectangle);
    }

    #[test]
    fn ellipse_label_boundaries_and_dead_zone() {
        assert_eq!(ellipse_label(1.0, 0.05), ShapeLabel::Circle);
        assert_eq!(ellipse_label(1.05, 0.05), ShapeLabel::Circle);
        assert_eq!(ellipse_label(1.051, 0.05), ShapeLabel::Unclassified);
        assert_eq!(ellipse_label(1.08, 0.05), ShapeLabel::Unclassified);
        assert_eq!(ellipse_label(1.1, 0.05), ShapeLabel::Unclassified);
        assert_eq!(ellipse_label(1.11, 0.05), ShapeLabel::Ellipse);
        assert_eq!(ellipse_label(1.3, 0.05), ShapeLabel::Ellipse);
    }

    #[test]
    fn dense_circle_contour_classifies_as_circle() {
        let points = regular_ngon(64, 50.0);
        let (polygon, contour) = polygon_and_contour(points);
        let (label, ellipse) = classify(&polygon, &contour, &config()).unwrap();
        assert_eq!(label, ShapeLabel::Circle);
        let fit = ellipse.expect("ellipse fit should be reported");
        assert!((fit.aspect_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dense_ellipse_contour_classifies_as_ellipse() {
        let points: Vec<[f64; 2]> = EllipseFit {
            center: [100.0, 100.0],
            semi_major: 60.0,
            semi_minor: 40.0,
            rotation: 0.3,
        }
        .boundary_points(64);
        let (polygon, contour) = polygon_and_contour(points);
        let (label, _) = classify(&polygon, &contour, &config()).unwrap();
        assert_eq!(label, ShapeLabel::Ellipse);
    }

    #[test]
    fn short_contour_skips_with_reason() {
        let vertices = vec![[0.0, 0.0]];
        let (polygon, contour) = polygon_and_contour(vertices);
        assert_eq!(
            classify(&polygon, &contour, &config()),
            Err(SkipReason::TooFewPointsForFit { points: 1 })
        );
    }

    #[test]
    fn degenerate_high_vertex_contour_reports_fit_failure() {
        // Twelve collinear points never form an ellipse.
        let vertices: Vec<[f64; 2]> = (0..12).map(|i| [i as f64, i as f64]).collect();
        let (polygon, contour) = polygon_and_contour(vertices);
        assert_eq!(
            classify(&polygon, &contour, &config()),
            Err(SkipReason::EllipseFitFailed)
        );
    }
}
