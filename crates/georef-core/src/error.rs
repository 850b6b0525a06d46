use std::fmt;
use thiserror::Error;

/// Which coordinate system a control point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Raster pixel space.
    Pixel,
    /// Reference CRS space.
    Reference,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Pixel => write!(f, "pixel"),
            Side::Reference => write!(f, "reference"),
        }
    }
}

/// Kind of degenerate control-point layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    Coincident,
    Collinear,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::Coincident => write!(f, "coincident"),
            Degeneracy::Collinear => write!(f, "collinear"),
        }
    }
}

/// Malformed input: wrong counts, shapes, labels or coordinates.
///
/// Always fatal to the current run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{side} side: expected {expected} control points, got {actual}")]
    CorrespondenceCount {
        side: Side,
        expected: usize,
        actual: usize,
    },
    #[error("{side} side: control point label {label:?} appears more than once")]
    DuplicateLabel { side: Side, label: String },
    #[error("control point label {label:?} has no counterpart on the {side} side")]
    MissingLabel { side: Side, label: String },
    #[error("{side} side: control points {indices:?} are {kind}")]
    DegenerateConfiguration {
        side: Side,
        indices: Vec<usize>,
        kind: Degeneracy,
    },
    #[error("projective matrix must be 3x3, got {rows}x{cols}")]
    MatrixShape { rows: usize, cols: usize },
    #[error("malformed coordinate at vertex {index}: {reason}")]
    MalformedCoordinates { index: usize, reason: String },
    #[error("non-finite coordinate at vertex {index}")]
    NonFinite { index: usize },
    #[error("polyline needs at least 2 vertices, got {actual}")]
    TooFewVertices { actual: usize },
}
