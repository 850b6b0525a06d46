//! Homography estimation from exactly four point correspondences.
//!
//! Implements the Direct Linear Transform. The forward homography `H` maps
//! **reference-CRS points** to **pixel points**: `x_px ~ H x_ref`. The
//! inverse is computed algebraically from the normalized forward matrix.
//!
//! Input points are Hartley-normalized before the design matrix is built and
//! the solution is de-normalized afterwards. For four exact correspondences
//! this selects the same null vector up to scale.

use crate::math::{mat3_from_svd_row, normalize_points_2d};
use crate::transform::project_point;
use georef_core::{
    column_norm_product, CorrespondenceSet, Degeneracy, Mat3, ProjectiveMatrix, Pt2, Real, Side,
    ValidationError, CORRESPONDENCE_COUNT, ZERO_EPS,
};
use log::{debug, warn};
use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HomographyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("svd failed")]
    SvdFailed,
    #[error("de-normalized homography has non-finite entries")]
    NonFiniteSolution,
    #[error("projective matrix is singular (determinant {determinant:e})")]
    Degenerate { determinant: Real },
}

/// Knobs for [`HomographySolver::estimate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomographyOptions {
    /// Reject coincident or collinear control points before solving.
    pub check_degeneracy: bool,
}

impl Default for HomographyOptions {
    fn default() -> Self {
        Self {
            check_degeneracy: true,
        }
    }
}

/// Forward (reference→pixel) and inverse (pixel→reference) matrices of one
/// estimation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomographyPair {
    pub forward: ProjectiveMatrix,
    pub inverse: ProjectiveMatrix,
    /// Largest pixel distance between `forward(reference_i)` and `pixel_i`.
    pub max_residual: Real,
}

/// Four-point homography solver.
#[derive(Debug, Clone, Copy)]
pub struct HomographySolver;

/// Estimate the forward and inverse homographies from bare point lists.
///
/// `reference` and `pixel` are paired by index and must both hold exactly
/// four points.
pub fn dlt_homography(reference: &[Pt2], pixel: &[Pt2]) -> Result<HomographyPair, HomographyError> {
    let set = CorrespondenceSet::from_points(pixel, reference)?;
    HomographySolver::estimate(&set)
}

impl HomographySolver {
    /// Estimate with default options (degeneracy check enabled).
    pub fn estimate(set: &CorrespondenceSet) -> Result<HomographyPair, HomographyError> {
        Self::estimate_with(set, &HomographyOptions::default())
    }

    pub fn estimate_with(
        set: &CorrespondenceSet,
        opts: &HomographyOptions,
    ) -> Result<HomographyPair, HomographyError> {
        if opts.check_degeneracy {
            set.check_configuration()?;
        }

        let reference = set.reference_points();
        let pixel = set.pixel_points();

        let forward = Self::dlt(&reference, &pixel)?;
        let inverse = invert(&forward)?;

        let max_residual = reference
            .iter()
            .zip(pixel.iter())
            .map(|(r, p)| match project_point(&forward, r) {
                Ok(q) => (q - p).norm(),
                Err(_) => Real::INFINITY,
            })
            .fold(0.0, Real::max);
        debug!("homography max control-point residual: {max_residual:.3e} px");

        Ok(HomographyPair {
            forward,
            inverse,
            max_residual,
        })
    }

    /// Solve `A h = 0` for the reference→pixel homography and normalize it.
    pub fn dlt(
        reference: &[Pt2; CORRESPONDENCE_COUNT],
        pixel: &[Pt2; CORRESPONDENCE_COUNT],
    ) -> Result<ProjectiveMatrix, HomographyError> {
        let (ref_n, t_ref) =
            normalize_points_2d(reference).ok_or_else(|| all_coincident(Side::Reference))?;
        let (pix_n, t_pix) =
            normalize_points_2d(pixel).ok_or_else(|| all_coincident(Side::Pixel))?;

        // 8 equations padded with a zero row so the SVD yields the full 9×9 V^T.
        let mut a = DMatrix::<Real>::zeros(9, 9);

        for (i, (pr, pp)) in ref_n.iter().zip(pix_n.iter()).enumerate() {
            let (x, y) = (pr.x, pr.y);
            let (u, v) = (pp.x, pp.y);

            let r0 = 2 * i;
            let r1 = 2 * i + 1;

            a[(r0, 0)] = x;
            a[(r0, 1)] = y;
            a[(r0, 2)] = 1.0;
            a[(r0, 6)] = -u * x;
            a[(r0, 7)] = -u * y;
            a[(r0, 8)] = -u;

            a[(r1, 3)] = x;
            a[(r1, 4)] = y;
            a[(r1, 5)] = 1.0;
            a[(r1, 6)] = -v * x;
            a[(r1, 7)] = -v * y;
            a[(r1, 8)] = -v;
        }

        let svd = a.svd(false, true);
        let v_t = svd.v_t.ok_or(HomographyError::SvdFailed)?;
        let smallest = svd.singular_values.imin();
        debug!("dlt singular values: {:?}", svd.singular_values.as_slice());

        let h_n = mat3_from_svd_row(&v_t, smallest);
        let t_pix_inv = t_pix.try_inverse().ok_or(HomographyError::Degenerate {
            determinant: t_pix.determinant(),
        })?;
        let h = ProjectiveMatrix::new(t_pix_inv * h_n * t_ref).normalized();

        if !h.is_finite() {
            return Err(HomographyError::NonFiniteSolution);
        }
        if h.as_mat3()[(2, 2)].abs() <= ZERO_EPS {
            warn!("forward homography has H[2,2] ~ 0; leaving it unnormalized");
        }
        Ok(h)
    }
}

/// Algebraic inverse of `h`, normalized so that `H^-1[2,2] == 1` when possible.
///
/// Fails with [`HomographyError::Degenerate`] when
/// `|det(h)| <= 1e-12 * Π‖column_j(h)‖`, i.e. relative to the Hadamard bound.
pub fn invert(h: &ProjectiveMatrix) -> Result<ProjectiveMatrix, HomographyError> {
    let m: &Mat3 = h.as_mat3();
    let determinant = m.determinant();
    let bound = column_norm_product(m);
    if !determinant.is_finite() || determinant.abs() <= ZERO_EPS * bound {
        return Err(HomographyError::Degenerate { determinant });
    }
    let inv = m
        .try_inverse()
        .ok_or(HomographyError::Degenerate { determinant })?;
    let inv = ProjectiveMatrix::new(inv).normalized();
    if !inv.is_finite() {
        return Err(HomographyError::NonFiniteSolution);
    }
    Ok(inv)
}

fn all_coincident(side: Side) -> HomographyError {
    HomographyError::Validation(ValidationError::DegenerateConfiguration {
        side,
        indices: (0..CORRESPONDENCE_COUNT).collect(),
        kind: Degeneracy::Coincident,
    })
}
