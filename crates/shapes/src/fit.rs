//! Least-squares ellipse fitting.
//!
//! Solves the general conic A x² + B xy + C y² + D x + E y + F = 0 with F
//! fixed, in normalized coordinates for numerical stability, and converts
//! the coefficients to geometric center/axes/rotation parameters.

use nalgebra::{DMatrix, DVector, Matrix2, SymmetricEigen};
use serde::{Deserialize, Serialize};

/// Minimum number of boundary points required for a fit.
pub const MIN_FIT_POINTS: usize = 5;

/// Geometric ellipse parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseFit {
    pub center: [f64; 2],
    pub semi_major: f64,
    pub semi_minor: f64,
    /// Orientation of the major axis, in radians, normalized to [0, π).
    pub rotation: f64,
}

impl EllipseFit {
    /// Major over minor axis length, always ≥ 1 for a valid fit.
    pub fn aspect_ratio(&self) -> f64 {
        self.semi_major / self.semi_minor
    }

    /// True if the point lies inside or on the ellipse.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        let (sin, cos) = self.rotation.sin_cos();
        let u = (dx * cos + dy * sin) / self.semi_major;
        let v = (-dx * sin + dy * cos) / self.semi_minor;
        u * u + v * v <= 1.0
    }

    /// Uniformly sample points along the boundary.
    pub fn boundary_points(&self, samples: usize) -> Vec<[f64; 2]> {
        let (sin, cos) = self.rotation.sin_cos();
        (0..samples)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / samples as f64;
                let (st, ct) = t.sin_cos();
                let px = self.semi_major * ct;
                let py = self.semi_minor * st;
                [
                    self.center[0] + px * cos - py * sin,
                    self.center[1] + px * sin + py * cos,
                ]
            })
            .collect()
    }
}

/// Fit an ellipse to a set of boundary points.
///
/// Returns `None` when there are fewer than [`MIN_FIT_POINTS`] points or
/// when the least-squares conic is degenerate or not an ellipse.
pub fn fit_ellipse(points: &[[f64; 2]]) -> Option<EllipseFit> {
    if points.len() < MIN_FIT_POINTS {
        return None;
    }

    // Shift to the centroid and scale so the mean distance from it is √2.
    let (mean_x, mean_y, scale) = normalization_params(points);

    // Design matrix for A x² + B xy + C y² + D x + E y = 1. Fixing the
    // constant term is safe here because the origin (the point centroid)
    // lies inside any ellipse traced around it.
    let n = points.len();
    let mut design = DMatrix::<f64>::zeros(n, 5);
    for (i, &[px, py]) in points.iter().enumerate() {
        let x = (px - mean_x) * scale;
        let y = (py - mean_y) * scale;
        design[(i, 0)] = x * x;
        design[(i, 1)] = x * y;
        design[(i, 2)] = y * y;
        design[(i, 3)] = x;
        design[(i, 4)] = y;
    }
    let rhs = DVector::from_element(n, 1.0);
    let svd = design.svd(true, true);

    // A rank-deficient system (collinear or repeated points) still has a
    // minimum-norm least-squares solution; reject it before it can pass
    // the ellipse checks below.
    let max_sv = svd.singular_values.max();
    let min_sv = svd.singular_values.min();
    if min_sv <= max_sv * 1e-10 {
        return None;
    }
    let solution = svd.solve(&rhs, 1e-12).ok()?;

    let (mut a, mut b, mut c) = (solution[0], solution[1], solution[2]);
    let (mut d, mut e, mut f) = (solution[3], solution[4], -1.0);

    // Ellipse condition: B² − 4AC < 0.
    if a * c - b * b / 4.0 <= f64::EPSILON {
        return None;
    }
    // Normalize signs so the quadratic form is positive definite.
    if a + c < 0.0 {
        a = -a;
        b = -b;
        c = -c;
        d = -d;
        e = -e;
        f = -f;
    }

    let denom = 4.0 * a * c - b * b;
    let cx = (b * e - 2.0 * c * d) / denom;
    let cy = (b * d - 2.0 * a * e) / denom;

    // Constant term after recentering on (cx, cy); must be negative for a
    // real ellipse.
    let f0 = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;
    if f0 >= -1e-12 {
        return None;
    }

    let quad = Matrix2::new(a, b / 2.0, b / 2.0, c);
    let eigen = SymmetricEigen::new(quad);
    let r0 = (-f0 / eigen.eigenvalues[0]).sqrt();
    let r1 = (-f0 / eigen.eigenvalues[1]).sqrt();

    let major_index = if r0 >= r1 { 0 } else { 1 };
    let axis = eigen.eigenvectors.column(major_index);
    let mut rotation = axis[1].atan2(axis[0]);
    if rotation < 0.0 {
        rotation += std::f64::consts::PI;
    }

    Some(EllipseFit {
        center: [cx / scale + mean_x, cy / scale + mean_y],
        semi_major: r0.max(r1) / scale,
        semi_minor: r0.min(r1) / scale,
        rotation,
    })
}

fn normalization_params(points: &[[f64; 2]]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| (p[0] - mean_x).hypot(p[1] - mean_y))
        .sum::<f64>()
        / n;
    let scale = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mean_x, mean_y, scale)
}
