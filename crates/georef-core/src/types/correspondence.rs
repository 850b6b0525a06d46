//! Control points and the four-point correspondence set.
//!
//! A [`CorrespondenceSet`] pairs four pixel-space control points with four
//! reference-CRS control points. Pairing is positional by default: the i-th
//! pixel point corresponds to the i-th reference point. [`CorrespondenceSet::from_labeled`]
//! pairs by shared label instead and reports any label that has no partner.

use crate::{is_collinear, Degeneracy, Pt2, Real, Side, ValidationError, ZERO_EPS};
use std::collections::HashSet;

/// Number of correspondences required for an exact homography solve.
pub const CORRESPONDENCE_COUNT: usize = 4;

/// Default label for the control point at `index` (`P1`, `P2`, ...).
pub fn default_label(index: usize) -> String {
    format!("P{}", index + 1)
}

/// A labelled point in either pixel or reference space.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    /// Stable label shared by both sides of a correspondence (e.g. `"P1"`).
    pub id: String,
    /// Position in the owning coordinate system.
    pub point: Pt2,
}

impl ControlPoint {
    pub fn new(id: impl Into<String>, point: Pt2) -> Self {
        Self {
            id: id.into(),
            point,
        }
    }
}

/// Exactly four (pixel, reference) control-point pairs, paired by index.
///
/// Immutable once constructed; every constructor validates the counts and
/// rejects non-finite coordinates.
///
/// # Example
///
/// ```
/// use georef_core::{CorrespondenceSet, Pt2};
///
/// let reference = [
///     Pt2::new(0.0, 0.0),
///     Pt2::new(1.0, 0.0),
///     Pt2::new(1.0, 1.0),
///     Pt2::new(0.0, 1.0),
/// ];
/// let pixel = reference.map(|p| Pt2::new(p.x * 100.0, p.y * 100.0));
/// let set = CorrespondenceSet::from_points(&pixel, &reference).unwrap();
///
/// assert_eq!(set.pixel()[2].id, "P3");
/// assert!(set.check_configuration().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondenceSet {
    pixel: [ControlPoint; CORRESPONDENCE_COUNT],
    reference: [ControlPoint; CORRESPONDENCE_COUNT],
}

impl CorrespondenceSet {
    /// Pair pixel and reference control points by position.
    ///
    /// # Errors
    ///
    /// [`ValidationError::CorrespondenceCount`] if either side does not hold
    /// exactly four points, [`ValidationError::NonFinite`] for NaN/inf input.
    pub fn new(
        pixel: Vec<ControlPoint>,
        reference: Vec<ControlPoint>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            pixel: into_side(pixel, Side::Pixel)?,
            reference: into_side(reference, Side::Reference)?,
        })
    }

    /// Pair bare points by position, labelling both sides `P1..P4`.
    pub fn from_points(pixel: &[Pt2], reference: &[Pt2]) -> Result<Self, ValidationError> {
        let label = |pts: &[Pt2]| -> Vec<ControlPoint> {
            pts.iter()
                .enumerate()
                .map(|(i, p)| ControlPoint::new(default_label(i), *p))
                .collect()
        };
        Self::new(label(pixel), label(reference))
    }

    /// Pair pixel and reference control points by their shared label.
    ///
    /// The resulting order follows the pixel side. Labels must be unique on
    /// each side and every label must appear on both sides.
    pub fn from_labeled(
        pixel: Vec<ControlPoint>,
        reference: Vec<ControlPoint>,
    ) -> Result<Self, ValidationError> {
        let pixel = into_side(pixel, Side::Pixel)?;
        let reference = into_side(reference, Side::Reference)?;
        ensure_unique_labels(&pixel, Side::Pixel)?;
        ensure_unique_labels(&reference, Side::Reference)?;

        if let Some(orphan) = reference
            .iter()
            .find(|r| !pixel.iter().any(|p| p.id == r.id))
        {
            return Err(ValidationError::MissingLabel {
                side: Side::Pixel,
                label: orphan.id.clone(),
            });
        }

        let mut paired = Vec::with_capacity(CORRESPONDENCE_COUNT);
        for p in &pixel {
            let r = reference.iter().find(|r| r.id == p.id).ok_or_else(|| {
                ValidationError::MissingLabel {
                    side: Side::Reference,
                    label: p.id.clone(),
                }
            })?;
            paired.push(r.clone());
        }

        Ok(Self {
            pixel,
            reference: into_side(paired, Side::Reference)?,
        })
    }

    pub fn pixel(&self) -> &[ControlPoint; CORRESPONDENCE_COUNT] {
        &self.pixel
    }

    pub fn reference(&self) -> &[ControlPoint; CORRESPONDENCE_COUNT] {
        &self.reference
    }

    pub fn pixel_points(&self) -> [Pt2; CORRESPONDENCE_COUNT] {
        std::array::from_fn(|i| self.pixel[i].point)
    }

    pub fn reference_points(&self) -> [Pt2; CORRESPONDENCE_COUNT] {
        std::array::from_fn(|i| self.reference[i].point)
    }

    /// Iterate over (reference, pixel) pairs in correspondence order.
    pub fn iter(&self) -> impl Iterator<Item = (&ControlPoint, &ControlPoint)> {
        self.reference.iter().zip(self.pixel.iter())
    }

    /// Indices whose labels differ between the two sides.
    ///
    /// Only meaningful for positionally paired sets; a label-paired set never
    /// has mismatches.
    pub fn label_mismatches(&self) -> Vec<usize> {
        self.pixel
            .iter()
            .zip(self.reference.iter())
            .enumerate()
            .filter(|(_, (p, r))| p.id != r.id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Reject coincident or collinear layouts on either side.
    ///
    /// A projective transform is only determined by four points in general
    /// position: no two equal and no three on a line.
    pub fn check_configuration(&self) -> Result<(), ValidationError> {
        check_general_position(&self.pixel_points(), Side::Pixel)?;
        check_general_position(&self.reference_points(), Side::Reference)
    }
}

fn into_side(
    points: Vec<ControlPoint>,
    side: Side,
) -> Result<[ControlPoint; CORRESPONDENCE_COUNT], ValidationError> {
    let actual = points.len();
    let side_points: [ControlPoint; CORRESPONDENCE_COUNT] =
        points
            .try_into()
            .map_err(|_| ValidationError::CorrespondenceCount {
                side,
                expected: CORRESPONDENCE_COUNT,
                actual,
            })?;
    if let Some(index) = side_points
        .iter()
        .position(|cp| !cp.point.x.is_finite() || !cp.point.y.is_finite())
    {
        return Err(ValidationError::NonFinite { index });
    }
    Ok(side_points)
}

fn ensure_unique_labels(points: &[ControlPoint], side: Side) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for cp in points {
        if !seen.insert(cp.id.as_str()) {
            return Err(ValidationError::DuplicateLabel {
                side,
                label: cp.id.clone(),
            });
        }
    }
    Ok(())
}

/// Check that no two points coincide and no three are collinear.
pub fn check_general_position(points: &[Pt2], side: Side) -> Result<(), ValidationError> {
    let extent = points
        .iter()
        .fold(0.0 as Real, |acc, p| acc.max(p.x.abs()).max(p.y.abs()));
    let coincident_tol = ZERO_EPS * (1.0 + extent);

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if (points[j] - points[i]).norm() <= coincident_tol {
                return Err(ValidationError::DegenerateConfiguration {
                    side,
                    indices: vec![i, j],
                    kind: Degeneracy::Coincident,
                });
            }
        }
    }

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            for k in (j + 1)..points.len() {
                if is_collinear(&points[i], &points[j], &points[k]) {
                    return Err(ValidationError::DegenerateConfiguration {
                        side,
                        indices: vec![i, j, k],
                        kind: Degeneracy::Collinear,
                    });
                }
            }
        }
    }
    Ok(())
}
