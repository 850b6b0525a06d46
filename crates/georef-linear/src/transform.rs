//! Application of a projective matrix to 2D points.
//!
//! Each point is lifted to `(x, y, 1)`, multiplied by `H` and divided by the
//! resulting `w`. The operation is row-independent: the image of a point
//! depends only on that point and `H`, so splitting a batch never changes the
//! result.

use georef_core::{to_homogeneous, ProjectiveMatrix, Pt2, Real, ZERO_EPS};
use thiserror::Error;

/// Perspective division failure for a single input point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("point {index} maps to the line at infinity (w = {w:e})")]
    PointAtInfinity { index: usize, w: Real },
    #[error("point {index} has non-finite coordinates")]
    NonFinite { index: usize },
}

/// Stateless wrapper that applies one matrix to point batches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTransformer {
    matrix: ProjectiveMatrix,
}

impl PointTransformer {
    pub fn new(matrix: ProjectiveMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &ProjectiveMatrix {
        &self.matrix
    }

    /// Transform a batch, failing on the first point whose `w` vanishes.
    pub fn apply(&self, points: &[Pt2]) -> Result<Vec<Pt2>, ProjectionError> {
        apply_homography(&self.matrix, points)
    }
}

/// Apply `h` to every point of `points`, preserving order.
///
/// # Errors
///
/// [`ProjectionError::PointAtInfinity`] when a point lands on (or numerically
/// next to) the line at infinity, i.e. `|w| <= 1e-12 * (|h20 x| + |h21 y| + |h22|)`.
/// [`ProjectionError::NonFinite`] for NaN/inf
/// input or output. No partial result is returned.
pub fn apply_homography(h: &ProjectiveMatrix, points: &[Pt2]) -> Result<Vec<Pt2>, ProjectionError> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| project_indexed(h, p, index))
        .collect()
}

/// Apply `h` to a single point.
pub fn project_point(h: &ProjectiveMatrix, p: &Pt2) -> Result<Pt2, ProjectionError> {
    project_indexed(h, p, 0)
}

fn project_indexed(h: &ProjectiveMatrix, p: &Pt2, index: usize) -> Result<Pt2, ProjectionError> {
    if !p.x.is_finite() || !p.y.is_finite() {
        return Err(ProjectionError::NonFinite { index });
    }
    let m = h.as_mat3();
    let v = m * to_homogeneous(p);
    let w = v.z;
    // Relative to the magnitude of the terms summed into w, so unnormalized
    // matrices (|H[2,2]| ~ 0) are judged on their own scale.
    let w_scale = (m[(2, 0)] * p.x).abs() + (m[(2, 1)] * p.y).abs() + m[(2, 2)].abs();
    if !w.is_finite() || w.abs() <= ZERO_EPS * w_scale {
        return Err(ProjectionError::PointAtInfinity { index, w });
    }
    let out = Pt2::new(v.x / w, v.y / w);
    if !out.x.is_finite() || !out.y.is_finite() {
        return Err(ProjectionError::NonFinite { index });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use georef_core::Mat3;

    fn perspective() -> ProjectiveMatrix {
        ProjectiveMatrix::new(Mat3::new(1.0, 0.2, 3.0, -0.1, 0.9, 4.0, 0.01, 0.02, 1.0))
    }

    #[test]
    fn divides_by_w() {
        let h = ProjectiveMatrix::new(Mat3::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 4.0));
        let out = apply_homography(&h, &[Pt2::new(2.0, 6.0)]).unwrap();
        assert_eq!(out, vec![Pt2::new(1.0, 3.0)]);
    }

    #[test]
    fn batch_split_does_not_change_results() {
        let h = perspective();
        let pts: Vec<Pt2> = (0..10)
            .map(|i| Pt2::new(i as Real * 1.5, 10.0 - i as Real))
            .collect();
        let whole = apply_homography(&h, &pts).unwrap();
        let mut split = apply_homography(&h, &pts[..4]).unwrap();
        split.extend(apply_homography(&h, &pts[4..]).unwrap());
        assert_eq!(whole, split);

        let transformer = PointTransformer::new(h);
        for (p, q) in pts.iter().zip(&whole) {
            assert_eq!(transformer.apply(&[*p]).unwrap()[0], *q);
        }
    }

    #[test]
    fn point_on_vanishing_line_is_an_error() {
        // w = x - 1 vanishes at x == 1.
        let h = ProjectiveMatrix::new(Mat3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0));
        let err = apply_homography(&h, &[Pt2::new(0.0, 0.0), Pt2::new(1.0, 5.0)]).unwrap_err();
        assert_eq!(err, ProjectionError::PointAtInfinity { index: 1, w: 0.0 });
    }

    #[test]
    fn non_finite_input_is_an_error() {
        let err = project_point(&perspective(), &Pt2::new(Real::NAN, 1.0)).unwrap_err();
        assert_eq!(err, ProjectionError::NonFinite { index: 0 });
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(apply_homography(&perspective(), &[]).unwrap().is_empty());
    }

    #[test]
    fn vanishing_w_is_judged_on_matrix_scale() {
        // Unnormalized: H[2,2] == 0 and every entry is tiny.
        let h = ProjectiveMatrix::new(Mat3::new(
            1e-20, 0.0, 0.0, //
            0.0, 1e-20, 0.0, //
            1e-20, 0.0, 0.0,
        ));
        let out = apply_homography(&h, &[Pt2::new(1.0, 2.0)]).unwrap();
        assert!((out[0] - Pt2::new(1.0, 2.0)).norm() < 1e-12);

        let err = project_point(&h, &Pt2::new(0.0, 2.0)).unwrap_err();
        assert!(matches!(err, ProjectionError::PointAtInfinity { index: 0, .. }));
    }
}
