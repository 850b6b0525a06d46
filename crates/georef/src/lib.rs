//! High-level entry crate for the `georef-rs` toolbox.
//!
//! A raster image is aligned to a projected coordinate reference system from
//! four control points picked on the image and the same four points exported
//! from a GIS. The workflow has two stages:
//!
//! 1. **Estimate**: solve the reference→pixel homography by four-point DLT
//!    and store it, together with its inverse, in a [`pipeline::MatrixRecord`].
//! 2. **Transform**: push LineString / MultiLineString features through one
//!    of the stored matrices, producing one pixel-space polyline per part.
//!
//! ```no_run
//! use georef::pipeline::{
//!     estimate_from_documents, io, transform_lines, ControlPixelRecord, EstimateConfig,
//!     FeatureCollection, TransformConfig,
//! };
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let control_px: ControlPixelRecord = io::load_json_file(Path::new("control_px.json"))?;
//! let control_crs: FeatureCollection = io::load_json_file(Path::new("control_crs.geojson"))?;
//! let record = estimate_from_documents(&control_px, &control_crs, &EstimateConfig::default())?;
//!
//! let lines: FeatureCollection = io::load_json_file(Path::new("lines.geojson"))?;
//! let (out, summary) =
//!     transform_lines(&record, "lines.geojson", &lines, &TransformConfig::default())?;
//! println!("{} polylines", summary.lines);
//! io::write_json_file(Path::new("lines_px.json"), &out)?;
//! # Ok(())
//! # }
//! ```
//!
//! The solver can also be used directly on in-memory points:
//!
//! ```
//! use georef::prelude::*;
//!
//! let pixel = [Pt2::new(0.0, 0.0), Pt2::new(1.0, 0.0), Pt2::new(1.0, 1.0), Pt2::new(0.0, 1.0)];
//! let reference = pixel;
//! let set = CorrespondenceSet::from_points(&pixel, &reference).unwrap();
//! let pair = HomographySolver::estimate(&set).unwrap();
//! let out = apply_homography(&pair.forward, &[Pt2::new(0.5, 0.5)]).unwrap();
//! assert!((out[0] - Pt2::new(0.5, 0.5)).norm() < 1e-9);
//! ```
//!
//! ## Crate layout
//!
//! - [`core`]: math aliases, correspondence, matrix and polyline types,
//!   validation errors.
//! - [`linear`]: DLT homography estimation, inversion and point application.
//! - [`pipeline`]: persisted documents, run configuration, estimate and
//!   transform runs, control-point picking state.

/// Core math types and validated data entities.
pub mod core {
    pub use georef_core::*;
}

/// Homography estimation and point application.
pub mod linear {
    pub use georef_linear::*;
}

/// Document-level estimate and transform runs.
pub mod pipeline {
    pub use georef_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use georef::prelude::*;` to get started quickly.
pub mod prelude {
    // Common types
    pub use crate::core::{
        ControlPoint, CorrespondenceSet, LineFeature, Mat3, Polyline, ProjectiveMatrix, Pt2,
        Real, ValidationError,
    };

    // Solvers
    pub use crate::linear::{
        apply_homography, HomographyError, HomographyOptions, HomographyPair, HomographySolver,
        PointTransformer, ProjectionError,
    };

    // Pipeline types
    pub use crate::pipeline::{
        estimate_from_documents, transform_lines, ControlPixelRecord, Direction, EstimateConfig,
        FeatureCollection, MatrixRecord, Pairing, PickSession, PipelineError, TransformConfig,
        TransformedLines,
    };
}
