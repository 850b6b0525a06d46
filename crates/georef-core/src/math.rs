//! Mathematical utilities and type definitions.
//!
//! This module provides the fundamental types used throughout the workspace
//! and the homogeneous-coordinate helpers shared by the solver and the
//! transform stages.

use nalgebra::{Matrix3, Point2, Vector2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;

/// Threshold below which a homogeneous scale or matrix entry counts as zero.
pub const ZERO_EPS: Real = 1e-12;

/// Relative tolerance for the collinearity test in [`is_collinear`].
pub const COLLINEAR_EPS: Real = 1e-10;

/// Convert a 2D point in Euclidean coordinates into homogeneous coordinates.
///
/// Given a point `p = (x, y)`, returns the homogeneous vector `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Convert a 3D homogeneous vector back to a 2D point.
///
/// The input is interpreted as `(x, y, w)` and the result is `(x / w, y / w)`.
/// The caller is responsible for ensuring that `w != 0`.
pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Z component of `(a - o) × (b - o)`, twice the signed triangle area.
pub fn cross2(o: &Pt2, a: &Pt2, b: &Pt2) -> Real {
    let da = a - o;
    let db = b - o;
    da.x * db.y - da.y * db.x
}

/// Scale-relative collinearity test for three points.
///
/// The cross product is compared against the product of the edge lengths,
/// so the result does not depend on the magnitude of the coordinates (pixel
/// units vs. projected metres).
pub fn is_collinear(a: &Pt2, b: &Pt2, c: &Pt2) -> bool {
    let scale = (b - a).norm() * (c - a).norm();
    cross2(a, b, c).abs() <= COLLINEAR_EPS * scale
}

/// Product of the column norms of a 3×3 matrix.
///
/// Upper bound on `|det(m)|` (Hadamard's inequality) that scales with each
/// column independently, so large translation entries do not swamp the
/// linear and perspective parts.
pub fn column_norm_product(m: &Mat3) -> Real {
    m.column_iter().map(|c| c.norm()).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_roundtrip() {
        let p = Pt2::new(3.5, -2.0);
        let back = from_homogeneous(&(to_homogeneous(&p) * 4.0));
        assert!((back - p).norm() < 1e-12);
    }

    #[test]
    fn collinearity_is_scale_free() {
        let a = Pt2::new(500_000.0, 4_000_000.0);
        let b = Pt2::new(500_100.0, 4_000_100.0);
        let c = Pt2::new(500_300.0, 4_000_300.0);
        assert!(is_collinear(&a, &b, &c));

        let d = Pt2::new(500_300.0, 4_000_299.0);
        assert!(!is_collinear(&a, &b, &d));

        let s = 1e-6;
        assert!(!is_collinear(
            &Pt2::new(0.0, 0.0),
            &Pt2::new(s, 0.0),
            &Pt2::new(0.0, s)
        ));
    }

    #[test]
    fn column_norm_product_bounds_determinant() {
        let m = Mat3::new(3.0, 0.0, 0.0, 4.0, 2.0, 0.0, 0.0, 0.0, 1.0);
        assert!((column_norm_product(&m) - 10.0).abs() < 1e-12);

        let skewed = Mat3::new(0.03, 0.002, -2.9e4, -0.001, -0.04, 7.8e4, 4e-7, -3e-7, 1.0);
        assert!(skewed.determinant().abs() <= column_norm_product(&skewed));
    }
}
