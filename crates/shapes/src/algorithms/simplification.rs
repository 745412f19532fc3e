use geo::Simplify;
use geo_types::{Coord, LineString};

use crate::types::{ApproxPolygon, TracedContour};

/// Simplify a contour to a minimal-vertex closed polygon using
/// Douglas-Peucker, with the tolerance expressed as a fraction of the
/// contour's arc length.
///
/// The ring is rotated to start at the point farthest from the
/// bounding-box center before simplification, so the anchored endpoints of
/// the closed ring sit on a true extreme point (a corner, for polygonal
/// shapes) rather than an arbitrary trace start.
pub fn approximate_polygon(contour: &TracedContour, epsilon_factor: f64) -> ApproxPolygon {
    let points = &contour.points;
    if points.len() < 3 {
        return ApproxPolygon {
            vertices: points.clone(),
        };
    }

    let start = farthest_from_center(points);
    let mut ring: Vec<Coord<f64>> = (0..points.len())
        .map(|i| {
            let [x, y] = points[(start + i) % points.len()];
            Coord { x, y }
        })
        .collect();
    ring.push(ring[0]);

    let epsilon = epsilon_factor * contour.arc_length;
    let simplified = LineString::new(ring).simplify(&epsilon);

    let mut vertices: Vec<[f64; 2]> = simplified.coords().map(|c| [c.x, c.y]).collect();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    ApproxPolygon { vertices }
}

fn farthest_from_center(points: &[[f64; 2]]) -> usize {
    let mut min = [f64::INFINITY, f64::INFINITY];
    let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
    for &[x, y] in points {
        min[0] = min[0].min(x);
        min[1] = min[1].min(y);
        max[0] = max[0].max(x);
        max[1] = max[1].max(y);
    }
    let cx = (min[0] + max[0]) / 2.0;
    let cy = (min[1] + max[1]) / 2.0;

    let mut best = 0;
    let mut best_dist = f64::NEG_INFINITY;
    for (i, &[x, y]) in points.iter().enumerate() {
        let dist = (x - cx).hypot(y - cy);
        if dist > best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense_square(side: usize) -> TracedContour {
        let s = side as f64;
        let mut points = Vec::new();
        for i in 0..side {
            points.push([i as f64, 0.0]);
        }
        for i in 0..side {
            points.push([s, i as f64]);
        }
        for i in 0..side {
            points.push([s - i as f64, s]);
        }
        for i in 0..side {
            points.push([0.0, s - i as f64]);
        }
        TracedContour::new(points, None, true)
    }

    #[test]
    fn square_simplifies_to_four_vertices() {
        let contour = dense_square(100);
        let polygon = approximate_polygon(&contour, 0.01);
        assert_eq!(polygon.vertex_count(), 4);
    }

    #[test]
    fn vertex_count_never_exceeds_point_count() {
        let contour = dense_square(25);
        let polygon = approximate_polygon(&contour, 0.005);
        assert!(polygon.vertex_count() <= contour.points.len());
    }

    #[test]
    fn circle_keeps_enough_vertices_for_ellipse_path() {
        let count = 360;
        let points: Vec<[f64; 2]> = (0..count)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / count as f64;
                [100.0 + 50.0 * t.cos(), 100.0 + 50.0 * t.sin()]
            })
            .collect();
        let contour = TracedContour::new(points, None, true);
        let polygon = approximate_polygon(&contour, 0.01);
        assert!(polygon.vertex_count() >= 11, "{}", polygon.vertex_count());
    }

    #[test]
    fn tiny_contours_pass_through() {
        let contour = TracedContour::new(vec![[0.0, 0.0], [4.0, 2.0]], None, true);
        let polygon = approximate_polygon(&contour, 0.01);
        assert_eq!(polygon.vertices, contour.points);
    }
}
