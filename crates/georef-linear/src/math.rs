//! Numerical conditioning helpers for DLT-style solvers.
//!
//! # Hartley Normalization
//!
//! Normalizing points before building the DLT design matrix centers the data
//! and scales it to unit-ish magnitude. Reference coordinates in projected
//! CRSs carry offsets of 1e5..1e7 which otherwise dominate the `x*u` terms.
//!
//! # Example
//!
//! ```
//! use georef_linear::math::normalize_points_2d;
//! use georef_core::Pt2;
//!
//! let points = vec![
//!     Pt2::new(100.0, 200.0),
//!     Pt2::new(150.0, 250.0),
//!     Pt2::new(120.0, 220.0),
//! ];
//!
//! let (normalized, transform) = normalize_points_2d(&points).unwrap();
//! // normalized points have mean at origin, mean distance = sqrt(2)
//! ```

use georef_core::{Mat3, Pt2, Real};
use nalgebra::DMatrix;

/// Hartley normalization for 2D points.
///
/// Centers points at the origin and scales so that the mean distance from
/// the origin is `√2`.
///
/// # Returns
///
/// * `Some((normalized_points, transform_matrix))` - Normalized points and
///   the 3x3 transformation matrix `T` such that `p_norm = T * p_homogeneous`
/// * `None` - If input is empty or all points coincide (zero mean distance)
///
/// # References
///
/// Hartley & Zisserman, "Multiple View Geometry in Computer Vision", 2nd ed.,
/// Algorithm 4.2 (Normalized DLT)
pub fn normalize_points_2d(points: &[Pt2]) -> Option<(Vec<Pt2>, Mat3)> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as Real;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let cx = sx / n;
    let cy = sy / n;

    let mean_dist = points
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<Real>()
        / n;

    if mean_dist <= Real::EPSILON * (1.0 + cx.abs().max(cy.abs())) {
        return None;
    }

    let scale = (2.0_f64).sqrt() / mean_dist;
    let t = Mat3::new(
        scale,
        0.0,
        -scale * cx,
        0.0,
        scale,
        -scale * cy,
        0.0,
        0.0,
        1.0,
    );

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Some((norm, t))
}

/// Reshape row `row_idx` of `V^T` into a row-major 3×3 matrix.
pub fn mat3_from_svd_row(v_t: &DMatrix<Real>, row_idx: usize) -> Mat3 {
    Mat3::from_fn(|r, c| v_t[(row_idx, 3 * r + c)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_centers_and_scales() {
        let pts = vec![
            Pt2::new(500_000.0, 4_100_000.0),
            Pt2::new(501_000.0, 4_100_000.0),
            Pt2::new(501_000.0, 4_101_000.0),
            Pt2::new(500_000.0, 4_101_000.0),
        ];
        let (norm, t) = normalize_points_2d(&pts).unwrap();

        let cx: Real = norm.iter().map(|p| p.x).sum::<Real>() / 4.0;
        let cy: Real = norm.iter().map(|p| p.y).sum::<Real>() / 4.0;
        assert!(cx.abs() < 1e-9 && cy.abs() < 1e-9);

        let mean = norm.iter().map(|p| p.coords.norm()).sum::<Real>() / 4.0;
        assert!((mean - 2.0_f64.sqrt()).abs() < 1e-9);

        let mapped = t * nalgebra::Vector3::new(pts[2].x, pts[2].y, 1.0);
        assert!((mapped.x - norm[2].x).abs() < 1e-9);
        assert!((mapped.y - norm[2].y).abs() < 1e-9);
    }

    #[test]
    fn normalization_rejects_coincident_points() {
        let pts = vec![Pt2::new(3.0, 4.0); 4];
        assert!(normalize_points_2d(&pts).is_none());
        assert!(normalize_points_2d(&[]).is_none());
    }

    #[test]
    fn svd_row_is_row_major() {
        let v_t = DMatrix::from_fn(2, 9, |r, c| (r * 10 + c) as Real);
        let m = mat3_from_svd_row(&v_t, 1);
        assert_eq!(m[(0, 0)], 10.0);
        assert_eq!(m[(0, 2)], 12.0);
        assert_eq!(m[(1, 0)], 13.0);
        assert_eq!(m[(2, 2)], 18.0);
    }
}
