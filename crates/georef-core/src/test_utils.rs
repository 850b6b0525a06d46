//! Utilities and common fixtures for testing homography estimation.
//!
//! This module is public to allow use across workspace test suites,
//! but is not intended for production use.

use crate::{from_homogeneous, to_homogeneous, CorrespondenceSet, Mat3, Pt2, Real};

/// Unit square in reference space, counter-clockwise from the origin.
pub fn unit_square() -> [Pt2; 4] {
    [
        Pt2::new(0.0, 0.0),
        Pt2::new(1.0, 0.0),
        Pt2::new(1.0, 1.0),
        Pt2::new(0.0, 1.0),
    ]
}

/// Unit square mapped onto a 100×100 pixel square.
pub fn unit_square_set() -> CorrespondenceSet {
    let reference = unit_square();
    let pixel = reference.map(|p| Pt2::new(p.x * 100.0, p.y * 100.0));
    CorrespondenceSet::from_points(&pixel, &reference).expect("fixture is valid")
}

/// A homography with a real perspective component, mapping projected metres
/// (UTM-like magnitudes) to pixels of a ~4000 px raster.
pub fn perspective_homography() -> Mat3 {
    let origin = Mat3::new(1.0, 0.0, -500_000.0, 0.0, 1.0, -4_100_000.0, 0.0, 0.0, 1.0);
    let warp = Mat3::new(
        1.9, 0.15, 120.0, //
        -0.08, -2.1, 3900.0, //
        2.0e-5, -1.5e-5, 1.0,
    );
    warp * origin
}

/// Four reference points in general position around `(500_000, 4_100_000)`.
pub fn utm_reference_points() -> [Pt2; 4] {
    [
        Pt2::new(500_050.0, 4_100_080.0),
        Pt2::new(501_600.0, 4_100_020.0),
        Pt2::new(501_750.0, 4_101_500.0),
        Pt2::new(500_010.0, 4_101_650.0),
    ]
}

/// Apply `h` to a single point with perspective division.
pub fn project(h: &Mat3, p: &Pt2) -> Pt2 {
    from_homogeneous(&(h * to_homogeneous(p)))
}

/// Build a correspondence set whose pixel side is `h` applied to `reference`.
pub fn synthetic_set(h: &Mat3, reference: &[Pt2; 4]) -> CorrespondenceSet {
    let pixel = reference.map(|p| project(h, &p));
    CorrespondenceSet::from_points(&pixel, reference).expect("fixture is valid")
}

/// Relative closeness test for points, scaled by the larger magnitude.
pub fn points_close(a: &Pt2, b: &Pt2, rel_tol: Real) -> bool {
    let scale = 1.0_f64.max(a.coords.norm()).max(b.coords.norm());
    (a - b).norm() <= rel_tol * scale
}
