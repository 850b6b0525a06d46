//! 3×3 projective matrix with the `H[2,2] == 1` normalization convention.

use crate::{Mat3, Real, ValidationError, ZERO_EPS};
use serde::{Deserialize, Serialize};

/// Row-major nested array form used by persisted matrix records.
pub type MatrixRows = [[Real; 3]; 3];

/// A projective mapping between two 2D homogeneous coordinate spaces.
///
/// Serialized as a nested row-major `3x3` array. Deserialization accepts any
/// nested numeric array and rejects shapes other than `3x3` with
/// [`ValidationError::MatrixShape`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Real>>", into = "MatrixRows")]
pub struct ProjectiveMatrix(Mat3);

impl ProjectiveMatrix {
    pub fn new(m: Mat3) -> Self {
        Self(m)
    }

    pub fn identity() -> Self {
        Self(Mat3::identity())
    }

    pub fn from_rows(rows: MatrixRows) -> Self {
        Self(Mat3::from_fn(|r, c| rows[r][c]))
    }

    /// Build from a nested array of arbitrary shape, validating `3x3`.
    pub fn try_from_nested(rows: &[Vec<Real>]) -> Result<Self, ValidationError> {
        let bad_row = rows.iter().find(|r| r.len() != 3);
        if rows.len() != 3 || bad_row.is_some() {
            return Err(ValidationError::MatrixShape {
                rows: rows.len(),
                cols: bad_row.or(rows.first()).map_or(0, Vec::len),
            });
        }
        Ok(Self(Mat3::from_fn(|r, c| rows[r][c])))
    }

    pub fn as_mat3(&self) -> &Mat3 {
        &self.0
    }

    pub fn into_inner(self) -> Mat3 {
        self.0
    }

    pub fn to_rows(&self) -> MatrixRows {
        std::array::from_fn(|r| std::array::from_fn(|c| self.0[(r, c)]))
    }

    /// Divide by the bottom-right entry so it equals 1.
    ///
    /// Left unchanged when `|H[2,2]| <= 1e-12` (the line at infinity passes
    /// through the origin of the source space).
    pub fn normalized(&self) -> Self {
        let scale = self.0[(2, 2)];
        if scale.abs() > ZERO_EPS {
            Self(self.0 / scale)
        } else {
            *self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<Mat3> for ProjectiveMatrix {
    fn from(m: Mat3) -> Self {
        Self(m)
    }
}

impl From<ProjectiveMatrix> for MatrixRows {
    fn from(m: ProjectiveMatrix) -> Self {
        m.to_rows()
    }
}

impl TryFrom<Vec<Vec<Real>>> for ProjectiveMatrix {
    type Error = ValidationError;

    fn try_from(rows: Vec<Vec<Real>>) -> Result<Self, Self::Error> {
        Self::try_from_nested(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_by_bottom_right() {
        let h = ProjectiveMatrix::new(Mat3::new(2.0, 0.0, 4.0, 0.0, 2.0, 6.0, 0.0, 0.0, 2.0));
        let n = h.normalized();
        assert_eq!(n.to_rows(), [[1.0, 0.0, 2.0], [0.0, 1.0, 3.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn leaves_matrix_with_zero_corner_unnormalized() {
        let h = ProjectiveMatrix::new(Mat3::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 1.0, 0.0, 1e-15));
        assert_eq!(h.normalized(), h);
    }

    #[test]
    fn serializes_as_nested_rows() {
        let h = ProjectiveMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, "[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]");
        let back: ProjectiveMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = ProjectiveMatrix::try_from_nested(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap_err();
        assert_eq!(err, ValidationError::MatrixShape { rows: 2, cols: 2 });

        let err = ProjectiveMatrix::try_from_nested(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 9.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap_err();
        assert_eq!(err, ValidationError::MatrixShape { rows: 3, cols: 4 });

        assert!(serde_json::from_str::<ProjectiveMatrix>("[[1,0],[0,1],[0,0]]").is_err());
    }
}
