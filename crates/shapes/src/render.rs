//! Smooth-curve reconstruction and overlay drawing.

use image::{Rgb, RgbImage};
use imageproc::drawing::{Canvas, draw_line_segment_mut};

use crate::fit::EllipseFit;
use crate::traits::CurveRenderer;
use crate::types::SymmetryLine;

/// Overlay colors.
pub mod palette {
    use image::Rgb;

    pub const CURVE: Rgb<u8> = Rgb([255, 0, 0]);
    pub const SYMMETRY: Rgb<u8> = Rgb([255, 255, 0]);
    pub const FITTED_ELLIPSE: Rgb<u8> = Rgb([255, 255, 0]);
    pub const OUTER_GAP: Rgb<u8> = Rgb([0, 255, 0]);
    pub const INNER_GAP: Rgb<u8> = Rgb([255, 0, 0]);
}

/// Point on a quadratic interpolation curve with control points `p0`, `p1`,
/// `p2` at parameter `t ∈ [0, 1]`. B(0) = p0 and B(1) = p2 exactly.
pub fn quadratic_point(t: f64, p0: [f64; 2], p1: [f64; 2], p2: [f64; 2]) -> [f64; 2] {
    let u = 1.0 - t;
    let w0 = u * u;
    let w1 = 2.0 * u * t;
    let w2 = t * t;
    [
        w0 * p0[0] + w1 * p1[0] + w2 * p2[0],
        w0 * p0[1] + w1 * p1[1] + w2 * p2[1],
    ]
}

/// Renders each polygon edge as a quadratic interpolation curve with the
/// control point at the edge midpoint, sampled at a fixed number of
/// parameter steps.
#[derive(Debug, Clone)]
pub struct QuadraticChainRenderer {
    pub samples: usize,
}

impl Default for QuadraticChainRenderer {
    fn default() -> Self {
        Self { samples: 100 }
    }
}

impl CurveRenderer for QuadraticChainRenderer {
    fn render(&self, target: &mut RgbImage, vertices: &[[f64; 2]], color: Rgb<u8>) {
        if vertices.len() < 2 || self.samples < 2 {
            return;
        }
        for i in 0..vertices.len() {
            let p0 = vertices[i];
            let p2 = vertices[(i + 1) % vertices.len()];
            let p1 = [(p0[0] + p2[0]) / 2.0, (p0[1] + p2[1]) / 2.0];
            let mut prev = p0;
            for step in 1..self.samples {
                let t = step as f64 / (self.samples - 1) as f64;
                let point = quadratic_point(t, p0, p1, p2);
                draw_segment(target, prev, point, color);
                prev = point;
            }
        }
    }
}

/// Renders the whole polygon as one closed interpolating Catmull-Rom
/// spline, sampled uniformly in parameter space. Polygons with fewer than
/// `min_points` vertices are skipped silently.
#[derive(Debug, Clone)]
pub struct PeriodicSplineRenderer {
    pub samples: usize,
    pub min_points: usize,
}

impl Default for PeriodicSplineRenderer {
    fn default() -> Self {
        Self {
            samples: 1000,
            min_points: 10,
        }
    }
}

impl CurveRenderer for PeriodicSplineRenderer {
    fn render(&self, target: &mut RgbImage, vertices: &[[f64; 2]], color: Rgb<u8>) {
        let n = vertices.len();
        if n < self.min_points || self.samples == 0 {
            return;
        }
        let mut prev = sample_closed_spline(vertices, 0.0);
        for step in 1..=self.samples {
            let u = step as f64 * n as f64 / self.samples as f64;
            let point = sample_closed_spline(vertices, u);
            draw_segment(target, prev, point, color);
            prev = point;
        }
    }
}

/// Evaluate the closed Catmull-Rom spline through `vertices` at global
/// parameter `u ∈ [0, n]`, where integer values hit the vertices.
fn sample_closed_spline(vertices: &[[f64; 2]], u: f64) -> [f64; 2] {
    let n = vertices.len();
    let segment = (u.floor() as usize) % n;
    let t = u - u.floor();
    catmull_rom_point(
        vertices[(segment + n - 1) % n],
        vertices[segment],
        vertices[(segment + 1) % n],
        vertices[(segment + 2) % n],
        t,
    )
}

fn catmull_rom_point(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], p3: [f64; 2], t: f64) -> [f64; 2] {
    let t2 = t * t;
    let t3 = t2 * t;
    let mut out = [0.0; 2];
    for axis in 0..2 {
        out[axis] = 0.5
            * (2.0 * p1[axis]
                + (p2[axis] - p0[axis]) * t
                + (2.0 * p0[axis] - 5.0 * p1[axis] + 4.0 * p2[axis] - p3[axis]) * t2
                + (3.0 * p1[axis] - p0[axis] - 3.0 * p2[axis] + p3[axis]) * t3);
    }
    out
}

fn draw_segment(target: &mut RgbImage, from: [f64; 2], to: [f64; 2], color: Rgb<u8>) {
    draw_line_segment_mut(
        target,
        (from[0] as f32, from[1] as f32),
        (to[0] as f32, to[1] as f32),
        color,
    );
}

/// Draw a point chain as line segments, optionally closing it.
pub fn draw_polyline_mut(target: &mut RgbImage, points: &[[f64; 2]], closed: bool, color: Rgb<u8>) {
    if points.len() < 2 {
        return;
    }
    for pair in points.windows(2) {
        draw_segment(target, pair[0], pair[1], color);
    }
    if closed {
        draw_segment(target, points[points.len() - 1], points[0], color);
    }
}

/// Draw the outline of a fitted ellipse.
pub fn draw_ellipse_outline_mut(target: &mut RgbImage, ellipse: &EllipseFit, color: Rgb<u8>) {
    let boundary = ellipse.boundary_points(256);
    draw_polyline_mut(target, &boundary, true, color);
}

/// Fill a fitted ellipse by pixel-center membership. Generic over the
/// canvas so completion can rasterize into grayscale masks.
pub fn draw_filled_ellipse_mut<C: Canvas>(canvas: &mut C, ellipse: &EllipseFit, color: C::Pixel) {
    let (width, height) = canvas.dimensions();
    let (sin, cos) = ellipse.rotation.sin_cos();
    let extent_x = (ellipse.semi_major * cos).hypot(ellipse.semi_minor * sin);
    let extent_y = (ellipse.semi_major * sin).hypot(ellipse.semi_minor * cos);

    let x0 = (ellipse.center[0] - extent_x).floor().max(0.0) as u32;
    let x1 = ((ellipse.center[0] + extent_x).ceil() as i64).clamp(0, width as i64 - 1) as u32;
    let y0 = (ellipse.center[1] - extent_y).floor().max(0.0) as u32;
    let y1 = ((ellipse.center[1] + extent_y).ceil() as i64).clamp(0, height as i64 - 1) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            if ellipse.contains(x as f64, y as f64) {
                canvas.draw_pixel(x, y, color);
            }
        }
    }
}

/// Draw symmetry lines onto the output image.
pub fn draw_symmetry_lines_mut(target: &mut RgbImage, lines: &[SymmetryLine], color: Rgb<u8>) {
    for line in lines {
        draw_segment(target, line.start, line.end, color);
    }
}
