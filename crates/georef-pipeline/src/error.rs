use crate::geometry::GeometryError;
use georef_core::ValidationError;
use georef_linear::HomographyError;
use thiserror::Error;

/// Errors returned by the document-level workflows.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid control points")]
    Validation(#[from] ValidationError),
    #[error("homography estimation failed")]
    Homography(#[from] HomographyError),
    #[error("line geometry transform failed")]
    Geometry(#[from] GeometryError),
    #[error("reference feature {feature}: expected a Point geometry, got {kind}")]
    NotAPoint { feature: usize, kind: String },
    #[error("reference feature {feature}: invalid coordinates")]
    ReferenceCoordinates {
        feature: usize,
        #[source]
        source: ValidationError,
    },
}
